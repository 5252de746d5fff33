use chrono::{NaiveDate, NaiveDateTime};
use derive_more::{AsRef, Deref, Display};
use log::debug;

use crate::{Effort, ExerciseID, ReadError, Reps, Time, Weight};

pub trait WorkoutRepository {
    fn read_workout(&self, id: &WorkoutID) -> Result<Workout, ReadError>;
}

pub trait PerformedEventRepository {
    /// All events logged for the given workout, including marker events.
    fn read_performed_events(&self, id: &WorkoutID) -> Result<Vec<PerformedEvent>, ReadError>;
    /// Events of one exercise across all workouts.
    fn read_exercise_events(&self, id: &ExerciseID) -> Result<Vec<PerformedEvent>, ReadError>;
}

/// Static declaration of a workout note.
#[derive(Debug, Clone, PartialEq)]
pub struct Workout {
    pub id: WorkoutID,
    pub title: String,
    pub workout_type: Option<String>,
    pub place: Option<String>,
    pub date: Option<NaiveDate>,
    pub exercises: Vec<PlannedSet>,
}

#[derive(AsRef, Deref, Display, Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct WorkoutID(String);

impl WorkoutID {
    pub fn new(id: &str) -> Result<Self, WorkoutIDError> {
        let trimmed_id = id.trim();

        if trimmed_id.is_empty() {
            return Err(WorkoutIDError::Empty);
        }

        Ok(Self(trimmed_id.to_string()))
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum WorkoutIDError {
    #[error("Workout ID must not be empty")]
    Empty,
}

/// One required repetition of an exercise within a workout plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedSet {
    pub exercise_id: ExerciseID,
}

impl From<&str> for PlannedSet {
    fn from(value: &str) -> Self {
        Self {
            exercise_id: value.into(),
        }
    }
}

/// A logged set. Events without a resolvable exercise id are kept in the log
/// but excluded from every aggregation.
#[derive(Debug, Clone, PartialEq)]
pub struct PerformedEvent {
    pub workout_id: WorkoutID,
    pub exercise_id: Option<ExerciseID>,
    pub exercise: String,
    pub timestamp: Option<NaiveDateTime>,
    pub weight: Option<Weight>,
    pub reps: Option<Reps>,
    pub duration: Option<Time>,
    pub effort: Option<Effort>,
    pub timed: bool,
}

impl PerformedEvent {
    /// Weight times reps, or weight times duration for timed exercises.
    ///
    /// A missing operand yields zero.
    #[must_use]
    pub fn volume(&self) -> f32 {
        match (self.weight, self.timed) {
            (Some(weight), false) => self.reps.map_or(0.0, |reps| weight * reps),
            (Some(weight), true) => self.duration.map_or(0.0, |duration| weight * duration),
            (None, _) => 0.0,
        }
    }

    /// Whether both operands selected by the `timed` flag are present.
    #[must_use]
    pub fn has_volume(&self) -> bool {
        match (self.weight, self.timed) {
            (Some(_), false) => self.reps.is_some(),
            (Some(_), true) => self.duration.is_some(),
            (None, _) => false,
        }
    }

    #[must_use]
    pub fn is_marker(&self, markers: &Markers) -> bool {
        self.exercise_id
            .as_ref()
            .is_some_and(|id| *id == markers.start || *id == markers.end)
    }

    fn is(&self, id: &ExerciseID) -> bool {
        self.exercise_id.as_ref() == Some(id)
    }
}

/// Sentinel exercise ids of the events which start and end a workout.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Markers {
    pub start: ExerciseID,
    pub end: ExerciseID,
}

impl Default for Markers {
    fn default() -> Self {
        Self {
            start: ExerciseID::from("workout-start"),
            end: ExerciseID::from("workout-end"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkoutState {
    NotStarted,
    InProgress,
    Ended,
}

/// Derive the lifecycle state of a workout from its event log.
///
/// Duplicate marker events are accepted. An end marker without a start marker
/// still ends the workout.
#[must_use]
pub fn workout_state(
    workout_id: &WorkoutID,
    events: &[PerformedEvent],
    markers: &Markers,
) -> WorkoutState {
    let count = |marker: &ExerciseID| {
        events
            .iter()
            .filter(|e| e.workout_id == *workout_id && e.is(marker))
            .count()
    };
    let starts = count(&markers.start);
    let ends = count(&markers.end);

    if starts > 1 || ends > 1 {
        debug!("workout {workout_id} has {starts} start and {ends} end markers");
    }

    if ends > 0 {
        WorkoutState::Ended
    } else if starts > 0 {
        WorkoutState::InProgress
    } else {
        WorkoutState::NotStarted
    }
}

#[must_use]
pub fn has_ended(workout_id: &WorkoutID, events: &[PerformedEvent], markers: &Markers) -> bool {
    events
        .iter()
        .any(|e| e.workout_id == *workout_id && e.is(&markers.end))
}

/// Timestamp of the first event carrying the given marker.
#[must_use]
pub fn marker_timestamp(events: &[PerformedEvent], marker: &ExerciseID) -> Option<NaiveDateTime> {
    events
        .iter()
        .filter(|e| e.is(marker))
        .filter_map(|e| e.timestamp)
        .min()
}
