use std::collections::BTreeMap;

use crate::{
    ExerciseID, ExerciseInfo, Markers, PerformedEvent, PlannedSet, WorkoutID, has_ended,
    index_exercises, is_completed, performed, planned_counts, progress::compare_names,
};

/// Entry of the menu offered when logging the next set of a workout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuItem {
    Start,
    Exercise {
        exercise_id: ExerciseID,
        name: String,
        performed: u32,
        planned: u32,
    },
    /// Template for logging a set of an exercise without reference data.
    Custom {
        name: String,
    },
    ShowAll,
    EndWorkout,
}

impl MenuItem {
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            MenuItem::Start => String::from("Start"),
            MenuItem::Exercise {
                name,
                performed,
                planned,
                ..
            } => {
                if *planned > 0 {
                    format!("{name} ({}/{planned})", performed + 1)
                } else {
                    name.clone()
                }
            }
            MenuItem::Custom { name } => name.clone(),
            MenuItem::ShowAll => String::from("Show all exercises"),
            MenuItem::EndWorkout => String::from("End Workout"),
        }
    }
}

struct Progress {
    planned: BTreeMap<ExerciseID, u32>,
    performed: BTreeMap<ExerciseID, u32>,
    events: usize,
}

impl Progress {
    fn new(workout_id: &WorkoutID, plan: &[PlannedSet], events: &[PerformedEvent]) -> Self {
        let events = events
            .iter()
            .filter(|e| e.workout_id == *workout_id)
            .cloned()
            .collect::<Vec<_>>();
        Self {
            planned: planned_counts(plan),
            performed: performed(&events).counts,
            events: events.len(),
        }
    }

    fn is_completed(&self, id: &ExerciseID) -> bool {
        is_completed(id, &self.planned, &self.performed)
    }

    fn item(&self, exercise: &ExerciseInfo) -> MenuItem {
        MenuItem::Exercise {
            exercise_id: exercise.id.clone(),
            name: exercise.name.clone(),
            performed: self.performed.get(&exercise.id).copied().unwrap_or(0),
            planned: self.planned.get(&exercise.id).copied().unwrap_or(0),
        }
    }
}

fn sorted(mut exercises: Vec<&ExerciseInfo>) -> Vec<&ExerciseInfo> {
    exercises.sort_by(|a, b| compare_names(&a.name, &b.name));
    exercises
}

/// Choices for the next set of a workout.
///
/// Before anything was logged, only the start of the workout is offered.
/// Afterwards the incomplete planned exercises follow in alphabetical order,
/// then the custom template if there is one, the option to show all exercises
/// and the option to end the workout. Nothing is offered once the workout has
/// ended.
#[must_use]
pub fn selection_menu(
    workout_id: &WorkoutID,
    plan: &[PlannedSet],
    events: &[PerformedEvent],
    exercises: &[ExerciseInfo],
    custom: Option<&str>,
    markers: &Markers,
) -> Vec<MenuItem> {
    if has_ended(workout_id, events, markers) {
        return vec![];
    }

    let progress = Progress::new(workout_id, plan, events);

    if progress.events == 0 {
        return vec![MenuItem::Start];
    }

    let mut result = sorted(
        index_exercises(exercises)
            .into_values()
            .filter(|e| progress.planned.contains_key(&e.id) && !progress.is_completed(&e.id))
            .collect(),
    )
    .into_iter()
    .map(|e| progress.item(e))
    .collect::<Vec<_>>();

    if let Some(name) = custom {
        result.push(MenuItem::Custom {
            name: name.to_string(),
        });
    }

    if progress
        .planned
        .keys()
        .any(|id| !progress.is_completed(id))
    {
        result.push(MenuItem::ShowAll);
    }
    result.push(MenuItem::EndWorkout);

    result
}

/// Every exercise except the planned ones which are already completed.
///
/// Exercises outside the plan are listed as well, so that sets of unplanned
/// exercises can be logged.
#[must_use]
pub fn all_exercises_menu(
    workout_id: &WorkoutID,
    plan: &[PlannedSet],
    events: &[PerformedEvent],
    exercises: &[ExerciseInfo],
) -> Vec<MenuItem> {
    let progress = Progress::new(workout_id, plan, events);

    sorted(
        index_exercises(exercises)
            .into_values()
            .filter(|e| !progress.planned.contains_key(&e.id) || !progress.is_completed(&e.id))
            .collect(),
    )
    .into_iter()
    .map(|e| progress.item(e))
    .collect()
}
