use std::collections::{BTreeMap, BTreeSet};

use log::debug;

use crate::{
    ExerciseID, ExerciseInfo, Markers, PerformedEvent, PlannedSet, PreconditionError, Target,
    Weight, WorkoutID, has_ended, lookup_exercises,
};

/// Number of planned sets per exercise.
#[must_use]
pub fn planned_counts(plan: &[PlannedSet]) -> BTreeMap<ExerciseID, u32> {
    let mut result: BTreeMap<ExerciseID, u32> = BTreeMap::new();
    for set in plan {
        *result.entry(set.exercise_id.clone()).or_insert(0) += 1;
    }
    result
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Performed {
    pub counts: BTreeMap<ExerciseID, u32>,
    pub volumes: BTreeMap<ExerciseID, f32>,
}

/// Count performed sets and accumulate their volume per exercise.
///
/// Events without an exercise id are skipped. An event only adds to the
/// volume if both of its operands are present.
#[must_use]
pub fn performed(events: &[PerformedEvent]) -> Performed {
    let mut result = Performed::default();
    for event in events {
        let Some(id) = &event.exercise_id else {
            debug!("ignoring event without exercise id: {}", event.exercise);
            continue;
        };
        *result.counts.entry(id.clone()).or_insert(0) += 1;
        if event.has_volume() {
            *result.volumes.entry(id.clone()).or_insert(0.0) += event.volume();
        }
    }
    result
}

#[must_use]
pub fn is_completed(
    id: &ExerciseID,
    planned: &BTreeMap<ExerciseID, u32>,
    performed: &BTreeMap<ExerciseID, u32>,
) -> bool {
    performed.get(id).copied().unwrap_or(0) >= planned.get(id).copied().unwrap_or(0)
}

fn remaining_count(
    id: &ExerciseID,
    planned: &BTreeMap<ExerciseID, u32>,
    performed: &BTreeMap<ExerciseID, u32>,
) -> u32 {
    planned
        .get(id)
        .copied()
        .unwrap_or(0)
        .saturating_sub(performed.get(id).copied().unwrap_or(0))
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProgressSummary {
    pub planned: u32,
    pub performed: u32,
    pub remaining: u32,
    pub total_volume: f32,
}

/// Progress of every exercise which is planned or has been performed.
///
/// Marker events are not exercises and get no summary.
#[must_use]
pub fn summarize(
    plan: &[PlannedSet],
    events: &[PerformedEvent],
    markers: &Markers,
) -> BTreeMap<ExerciseID, ProgressSummary> {
    let planned = planned_counts(plan);
    let events = events
        .iter()
        .filter(|e| !e.is_marker(markers))
        .cloned()
        .collect::<Vec<_>>();
    let performed = performed(&events);
    planned
        .keys()
        .chain(performed.counts.keys())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(|id| {
            (
                id.clone(),
                ProgressSummary {
                    planned: planned.get(id).copied().unwrap_or(0),
                    performed: performed.counts.get(id).copied().unwrap_or(0),
                    remaining: remaining_count(id, &planned, &performed.counts),
                    total_volume: performed.volumes.get(id).copied().unwrap_or(0.0),
                },
            )
        })
        .collect()
}

/// An exercise of the plan with sets left to perform.
#[derive(Debug, Clone, PartialEq)]
pub struct RemainingEntry {
    pub exercise_id: ExerciseID,
    pub name: String,
    pub muscle_group: String,
    pub equipment: String,
    pub timed: bool,
    pub target: Target,
    pub weight: Option<Weight>,
    pub remaining_sets: u32,
    pub volume: f32,
}

impl RemainingEntry {
    fn new(id: &ExerciseID, exercise: &ExerciseInfo, remaining_sets: u32, volume: f32) -> Self {
        Self {
            exercise_id: id.clone(),
            name: exercise.name.clone(),
            muscle_group: exercise.muscle_group.clone(),
            equipment: exercise.equipment.clone(),
            timed: exercise.timed,
            target: exercise.target(),
            weight: exercise.weight,
            remaining_sets,
            volume,
        }
    }

    fn unknown(id: &ExerciseID, remaining_sets: u32, volume: f32) -> Self {
        Self {
            exercise_id: id.clone(),
            name: id.to_string(),
            muscle_group: String::new(),
            equipment: String::new(),
            timed: false,
            target: Target::Reps(None),
            weight: None,
            remaining_sets,
            volume,
        }
    }
}

/// Case-insensitive order by display name.
pub(crate) fn compare_names(a: &str, b: &str) -> std::cmp::Ordering {
    a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b))
}

/// Exercises of the plan which still have remaining sets, ordered by name.
///
/// An empty list is returned once the workout has been ended, regardless of
/// the remaining counts. Use [`has_ended`] to tell an ended workout apart from
/// a completed one.
pub fn remaining_exercises(
    workout_id: &WorkoutID,
    plan: &[PlannedSet],
    events: &[PerformedEvent],
    exercises: &[ExerciseInfo],
    markers: &Markers,
) -> Result<Vec<RemainingEntry>, PreconditionError> {
    if exercises.is_empty() {
        return Err(PreconditionError::NoReferenceData);
    }

    if has_ended(workout_id, events, markers) {
        return Ok(vec![]);
    }

    let events = events
        .iter()
        .filter(|e| e.workout_id == *workout_id)
        .cloned()
        .collect::<Vec<_>>();
    let planned = planned_counts(plan);
    let performed = performed(&events);
    let lookup = lookup_exercises(exercises);

    let mut result = planned
        .keys()
        .filter_map(|id| {
            let remaining_sets = remaining_count(id, &planned, &performed.counts);
            if remaining_sets == 0 {
                return None;
            }
            let volume = performed.volumes.get(id).copied().unwrap_or(0.0);
            Some(match lookup.get(id) {
                Some(exercise) => RemainingEntry::new(id, exercise, remaining_sets, volume),
                None => {
                    debug!("no reference data for exercise {id}");
                    RemainingEntry::unknown(id, remaining_sets, volume)
                }
            })
        })
        .collect::<Vec<_>>();

    result.sort_by(|a, b| {
        compare_names(&a.name, &b.name).then_with(|| a.exercise_id.cmp(&b.exercise_id))
    });

    Ok(result)
}
