use chrono::NaiveDate;

use crate::{Markers, PerformedEvent, RemainingEntry, Target, Weight, Workout, WorkoutID};

const MISSING: &str = "~";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub title: String,
    pub details: Option<String>,
}

#[must_use]
pub fn header(workout: &Workout, today: NaiveDate) -> Header {
    let mut title = workout.title.clone();

    if let Some(date) = workout.date {
        title.push_str(&format!(" - {}", date.format("%Y-%m-%d")));
        match (date - today).num_days() {
            0 => title.push_str(" (today)"),
            -1 => title.push_str(" (yesterday)"),
            -2 => title.push_str(" (day before yesterday)"),
            _ => {}
        }
    }

    let details = [
        workout.workout_type.as_ref().map(|t| format!("Type: {t}")),
        workout.place.as_ref().map(|p| format!("Location: {p}")),
    ]
    .into_iter()
    .flatten()
    .collect::<Vec<_>>();

    Header {
        title,
        details: if details.is_empty() {
            None
        } else {
            Some(details.join(" | "))
        },
    }
}

/// Table row of a logged set. Missing values are shown as `~`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PerformedRow {
    pub exercise: String,
    pub is_marker: bool,
    pub weight: String,
    pub quantity: String,
    pub effort: String,
    pub time: String,
    pub volume: String,
}

fn weight_label(weight: Option<Weight>) -> String {
    weight.map_or_else(|| MISSING.to_string(), |w| format!("{w} kg"))
}

/// Rows of all events of a workout in chronological order.
///
/// Events without a timestamp are listed last.
#[must_use]
pub fn performed_rows(
    workout_id: &WorkoutID,
    events: &[PerformedEvent],
    markers: &Markers,
) -> Vec<PerformedRow> {
    let mut events = events
        .iter()
        .filter(|e| e.workout_id == *workout_id)
        .collect::<Vec<_>>();
    events.sort_by_key(|e| (e.timestamp.is_none(), e.timestamp));

    events
        .into_iter()
        .map(|e| {
            let quantity = if e.timed {
                e.duration.map(|d| format!("{d} sec"))
            } else {
                e.reps.map(|r| r.to_string())
            };
            let volume = if e.has_volume() {
                let unit = if e.timed { "sec×kg" } else { "kg×reps" };
                Some(format!("{:.1} {unit}", e.volume()))
            } else {
                None
            };
            PerformedRow {
                exercise: e.exercise.clone(),
                is_marker: e.is_marker(markers),
                weight: weight_label(e.weight),
                quantity: quantity.unwrap_or_else(|| MISSING.to_string()),
                effort: e
                    .effort
                    .map_or_else(|| MISSING.to_string(), |e| e.to_string()),
                time: e
                    .timestamp
                    .map_or_else(|| MISSING.to_string(), |t| t.format("%H:%M").to_string()),
                volume: volume.unwrap_or_else(|| MISSING.to_string()),
            }
        })
        .collect()
}

impl RemainingEntry {
    #[must_use]
    pub fn target_label(&self) -> String {
        match self.target {
            Target::Reps(Some(reps)) => reps.to_string(),
            Target::Duration(Some(duration)) => format!("{duration} sec"),
            Target::Reps(None) | Target::Duration(None) => MISSING.to_string(),
        }
    }

    #[must_use]
    pub fn weight_label(&self) -> String {
        weight_label(self.weight)
    }
}
