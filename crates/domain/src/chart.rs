use std::collections::BTreeMap;

use chrono::NaiveDateTime;

use crate::{
    Effort, ExerciseID, ExerciseInfo, Markers, PerformedEvent, Weight, WorkoutID,
    lookup_exercises, marker_timestamp,
};

/// Parallel series of the sets of one exercise, ordered by time.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TimeSeries {
    pub times: Vec<NaiveDateTime>,
    pub efforts: Vec<Option<Effort>>,
    pub volumes: Vec<f32>,
    pub weights: Vec<Option<Weight>>,
    pub timed: bool,
}

impl TimeSeries {
    fn push(&mut self, time: NaiveDateTime, event: &PerformedEvent) {
        self.times.push(time);
        self.efforts.push(event.effort);
        self.volumes.push(event.volume());
        self.weights.push(event.weight);
        self.timed |= event.timed;
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct ProgressDatasets {
    pub series: BTreeMap<ExerciseID, TimeSeries>,
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
}

/// Group the chartable sets of a workout by exercise.
///
/// A set is chartable if it has a timestamp and an effort or a volume. Marker
/// events only contribute the start and end of the workout.
#[must_use]
pub fn build_progress_datasets(events: &[PerformedEvent], markers: &Markers) -> ProgressDatasets {
    let mut chartable = events
        .iter()
        .filter(|e| !e.is_marker(markers))
        .filter(|e| e.effort.is_some() || e.has_volume())
        .filter_map(|e| Some((e.timestamp?, e.exercise_id.as_ref()?, e)))
        .collect::<Vec<_>>();
    chartable.sort_by_key(|(time, _, _)| *time);

    let mut series: BTreeMap<ExerciseID, TimeSeries> = BTreeMap::new();
    for (time, id, event) in chartable {
        series.entry(id.clone()).or_default().push(time, event);
    }

    ProgressDatasets {
        series,
        start: marker_timestamp(events, &markers.start),
        end: marker_timestamp(events, &markers.end),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Volume,
    Effort,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartLine {
    pub label: String,
    pub axis: Axis,
    pub points: Vec<(NaiveDateTime, f32)>,
}

impl ProgressDatasets {
    /// A volume line and an effort line per exercise.
    ///
    /// Missing efforts are plotted as zero.
    #[must_use]
    pub fn chart_lines(&self, exercises: &[ExerciseInfo]) -> Vec<ChartLine> {
        let lookup = lookup_exercises(exercises);
        self.series
            .iter()
            .flat_map(|(id, series)| {
                let name = lookup
                    .get(id)
                    .map_or_else(|| id.to_string(), |e| e.name.clone());
                let volume_label = if series.timed {
                    format!("{name} (Duration×Weight)")
                } else {
                    format!("{name} (Volume)")
                };
                [
                    ChartLine {
                        label: volume_label,
                        axis: Axis::Volume,
                        points: series
                            .times
                            .iter()
                            .copied()
                            .zip(series.volumes.iter().copied())
                            .collect(),
                    },
                    ChartLine {
                        label: format!("{name} (Effort)"),
                        axis: Axis::Effort,
                        points: series
                            .times
                            .iter()
                            .copied()
                            .zip(series.efforts.iter().map(|e| e.map_or(0.0, f32::from)))
                            .collect(),
                    },
                ]
            })
            .collect()
    }

    /// Upper bound of the volume axis with some headroom above the largest volume.
    #[must_use]
    pub fn suggested_max_volume(&self) -> f32 {
        self.series
            .values()
            .flat_map(|s| s.volumes.iter().copied())
            .fold(0.0, f32::max)
            * 1.2
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

/// Logged weight of an exercise at one point in time.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryPoint {
    pub time: NaiveDateTime,
    pub workout_id: WorkoutID,
    pub weight: Weight,
}

/// Weight progression of an exercise across workouts, ordered by time.
///
/// Sets without a timestamp or a weight are skipped.
#[must_use]
pub fn exercise_history(
    exercise_id: &ExerciseID,
    events: &[PerformedEvent],
) -> Vec<HistoryPoint> {
    let mut result = events
        .iter()
        .filter(|e| e.exercise_id.as_ref() == Some(exercise_id))
        .filter_map(|e| {
            Some(HistoryPoint {
                time: e.timestamp?,
                workout_id: e.workout_id.clone(),
                weight: e.weight?,
            })
        })
        .collect::<Vec<_>>();
    result.sort_by_key(|p| p.time);
    result
}
