use std::{collections::BTreeMap, path::Path};

use anyhow::Context;
use chrono::NaiveDate;
use log::debug;

use liftnote_domain as domain;

use crate::frontmatter::{self, Frontmatter};

const EXERCISE_TEMPLATES: &str = "Templates/exercises/";

/// Snapshot of the notes of a vault together with their metadata.
#[derive(serde::Serialize, serde::Deserialize, Debug, Default, Clone)]
pub struct Vault {
    pub notes: Vec<Note>,
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
pub struct Note {
    pub path: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub frontmatter: Frontmatter,
}

impl Note {
    #[must_use]
    pub fn basename(&self) -> &str {
        let name = self.path.rsplit('/').next().unwrap_or(&self.path);
        name.strip_suffix(".md").unwrap_or(name)
    }

    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.trim_start_matches('#') == tag)
    }

    fn id(&self) -> Option<String> {
        frontmatter::string(&self.frontmatter, "id")
    }

    fn workout_id(&self) -> Option<String> {
        frontmatter::string(&self.frontmatter, "workout_id")
    }

    fn name(&self) -> String {
        frontmatter::string(&self.frontmatter, "exercise")
            .unwrap_or_else(|| self.basename().to_string())
    }
}

impl Vault {
    pub fn from_json(json: &str) -> Result<Self, domain::StorageError> {
        serde_json::from_str(json)
            .context("failed to parse vault snapshot")
            .map_err(|err| domain::StorageError::Other(err.into()))
    }

    pub fn load(path: &Path) -> Result<Self, domain::StorageError> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read vault snapshot {}", path.display()))
            .map_err(|err| domain::StorageError::Other(err.into()))?;
        Self::from_json(&json)
    }

    fn exercise_templates(&self) -> impl Iterator<Item = &Note> {
        self.notes.iter().filter(|n| {
            n.path.starts_with(EXERCISE_TEMPLATES)
                && n.has_tag("exercise")
                && n.workout_id().is_none()
        })
    }

    fn logged_sets(&self) -> impl Iterator<Item = &Note> {
        self.notes
            .iter()
            .filter(|n| n.has_tag("exercise") || n.has_tag("start"))
    }
}

/// Templates without an `id` are identified by their basename. Otherwise the
/// basename is an alias of the id.
impl From<&Note> for domain::ExerciseInfo {
    fn from(note: &Note) -> Self {
        let fm = &note.frontmatter;
        let basename = note.basename().to_string();
        let (id, alias) = match note.id() {
            Some(id) if id == basename => (id, None),
            Some(id) => (id, Some(domain::ExerciseID::from(basename))),
            None => (basename, None),
        };
        Self {
            id: id.into(),
            alias,
            name: note.name(),
            muscle_group: frontmatter::string(fm, "muscle_group").unwrap_or_default(),
            equipment: frontmatter::string(fm, "equipment").unwrap_or_default(),
            timed: frontmatter::flag(fm, "timed"),
            reps: frontmatter::reps(fm, "reps"),
            duration: frontmatter::time(fm, "duration"),
            weight: frontmatter::weight(fm, "weight"),
        }
    }
}

impl TryFrom<&Note> for domain::Workout {
    type Error = NoteError;

    fn try_from(note: &Note) -> Result<Self, Self::Error> {
        let fm = &note.frontmatter;
        Ok(Self {
            id: domain::WorkoutID::new(&note.id().ok_or(NoteError::MissingId)?)?,
            title: frontmatter::string(fm, "workout_title").unwrap_or_default(),
            workout_type: frontmatter::string(fm, "workout_type"),
            place: frontmatter::string(fm, "workout_place"),
            date: frontmatter::date(fm, "date"),
            exercises: frontmatter::string_list(fm, "exercises")
                .into_iter()
                .map(|id| domain::PlannedSet {
                    exercise_id: id.into(),
                })
                .collect(),
        })
    }
}

fn performed_event(
    note: &Note,
    workout_id: &domain::WorkoutID,
    workout_date: Option<NaiveDate>,
) -> domain::PerformedEvent {
    let fm = &note.frontmatter;
    domain::PerformedEvent {
        workout_id: workout_id.clone(),
        exercise_id: note.id().map(domain::ExerciseID::from),
        exercise: note.name(),
        timestamp: frontmatter::timestamp(fm, workout_date),
        weight: frontmatter::weight(fm, "weight"),
        reps: frontmatter::reps(fm, "reps"),
        duration: frontmatter::time(fm, "duration"),
        effort: frontmatter::effort(fm, "effort"),
        timed: frontmatter::flag(fm, "timed"),
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum NoteError {
    #[error("note has no id")]
    MissingId,
    #[error(transparent)]
    WorkoutID(#[from] domain::WorkoutIDError),
}

impl domain::ExerciseRepository for Vault {
    fn read_exercises(&self) -> Result<Vec<domain::ExerciseInfo>, domain::ReadError> {
        Ok(self
            .exercise_templates()
            .map(domain::ExerciseInfo::from)
            .collect())
    }

    fn read_custom_template(&self) -> Result<Option<String>, domain::ReadError> {
        Ok(self
            .notes
            .iter()
            .find(|n| n.has_tag("custom") && n.workout_id().is_none())
            .map(|n| n.basename().to_string()))
    }
}

impl domain::WorkoutRepository for Vault {
    fn read_workout(&self, id: &domain::WorkoutID) -> Result<domain::Workout, domain::ReadError> {
        let note = self
            .notes
            .iter()
            .find(|n| n.workout_id().is_none() && n.id().as_deref() == Some(id.as_str()))
            .ok_or(domain::ReadError::NotFound)?;
        domain::Workout::try_from(note).map_err(|err| domain::ReadError::Other(Box::new(err)))
    }
}

impl domain::PerformedEventRepository for Vault {
    fn read_performed_events(
        &self,
        id: &domain::WorkoutID,
    ) -> Result<Vec<domain::PerformedEvent>, domain::ReadError> {
        let workout = domain::WorkoutRepository::read_workout(self, id)?;
        Ok(self
            .logged_sets()
            .filter(|n| n.workout_id().as_deref() == Some(id.as_str()))
            .map(|n| performed_event(n, &workout.id, workout.date))
            .collect())
    }

    fn read_exercise_events(
        &self,
        id: &domain::ExerciseID,
    ) -> Result<Vec<domain::PerformedEvent>, domain::ReadError> {
        let mut dates = BTreeMap::new();
        let mut result = vec![];
        for note in self
            .logged_sets()
            .filter(|n| n.id().as_deref() == Some(id.as_str()))
        {
            let Some(workout_id) = note
                .workout_id()
                .and_then(|w| domain::WorkoutID::new(&w).ok())
            else {
                continue;
            };
            let date = *dates.entry(workout_id.clone()).or_insert_with(|| {
                match domain::WorkoutRepository::read_workout(self, &workout_id) {
                    Ok(workout) => workout.date,
                    Err(err) => {
                        debug!("no date of workout {workout_id}: {err}");
                        None
                    }
                }
            });
            result.push(performed_event(note, &workout_id, date));
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use liftnote_domain::{ExerciseRepository, PerformedEventRepository, WorkoutRepository};

    use super::*;

    static VAULT: std::sync::LazyLock<Vault> = std::sync::LazyLock::new(|| {
        serde_json::from_value(json!({
            "notes": [
                {
                    "path": "Templates/exercises/Squat.md",
                    "tags": ["#exercise"],
                    "frontmatter": {
                        "id": "squat",
                        "exercise": "Back Squat",
                        "muscle_group": "Legs",
                        "equipment": "Barbell",
                        "reps": "5",
                        "weight": 100
                    }
                },
                {
                    "path": "Templates/exercises/Plank.md",
                    "tags": ["exercise"],
                    "frontmatter": {"id": "plank", "timed": "true", "duration": 60}
                },
                {
                    "path": "Templates/exercises/Broken.md",
                    "tags": ["exercise"],
                    "frontmatter": {}
                },
                {
                    "path": "Notes/Squat.md",
                    "tags": ["exercise"],
                    "frontmatter": {"id": "not-a-template"}
                },
                {
                    "path": "Workouts/2024-05-06/Leg day.md",
                    "tags": ["workout"],
                    "frontmatter": {
                        "id": "W1",
                        "workout_title": "Leg day",
                        "workout_type": "Strength",
                        "date": "2024-05-06",
                        "exercises": ["squat", "squat", "plank"]
                    }
                },
                {
                    "path": "Workouts/2024-05-06/Log/1.md",
                    "tags": ["start"],
                    "frontmatter": {"id": "workout-start", "workout_id": "W1", "time": "10:00"}
                },
                {
                    "path": "Workouts/2024-05-06/Log/2.md",
                    "tags": ["exercise"],
                    "frontmatter": {
                        "id": "squat",
                        "exercise": "Back Squat",
                        "workout_id": "W1",
                        "time": "10:05",
                        "weight": "100",
                        "reps": 5,
                        "effort": 4
                    }
                },
                {
                    "path": "Workouts/2024-05-06/Log/3.md",
                    "tags": ["exercise"],
                    "frontmatter": {"workout_id": "W1", "exercise": "Free text"}
                },
                {
                    "path": "Workouts/2024-05-07/Log/1.md",
                    "tags": ["exercise"],
                    "frontmatter": {"id": "squat", "workout_id": "W2"}
                },
                {
                    "path": "Workouts/2024-05-01/Push day.md",
                    "tags": ["workout"],
                    "frontmatter": {"id": "W0", "date": "2024-05-01", "exercises": ["squat"]}
                },
                {
                    "path": "Workouts/2024-05-01/Log/1.md",
                    "tags": ["exercise"],
                    "frontmatter": {
                        "id": "squat",
                        "workout_id": "W0",
                        "time": "18:00",
                        "weight": 90,
                        "reps": 5
                    }
                },
                {
                    "path": "Templates/Custom.md",
                    "tags": ["#custom"],
                    "frontmatter": {}
                },
                {
                    "path": "Workouts/2024-05-06/Log/4.md",
                    "tags": ["custom"],
                    "frontmatter": {"workout_id": "W1"}
                }
            ]
        }))
        .unwrap()
    });

    #[test]
    fn test_note_basename() {
        let note = Note {
            path: String::from("Templates/exercises/Bench Press.md"),
            tags: vec![],
            frontmatter: Frontmatter::new(),
        };
        assert_eq!(note.basename(), "Bench Press");
    }

    #[test]
    fn test_read_exercises() {
        let exercises = VAULT.read_exercises().unwrap();
        assert_eq!(
            exercises,
            vec![
                domain::ExerciseInfo {
                    id: "squat".into(),
                    alias: Some("Squat".into()),
                    name: String::from("Back Squat"),
                    muscle_group: String::from("Legs"),
                    equipment: String::from("Barbell"),
                    timed: false,
                    reps: Some(domain::Reps::new(5).unwrap()),
                    duration: None,
                    weight: Some(domain::Weight::new(100.0).unwrap()),
                },
                domain::ExerciseInfo {
                    id: "plank".into(),
                    alias: Some("Plank".into()),
                    name: String::from("Plank"),
                    muscle_group: String::new(),
                    equipment: String::new(),
                    timed: true,
                    reps: None,
                    duration: Some(domain::Time::new(60).unwrap()),
                    weight: None,
                },
                domain::ExerciseInfo {
                    id: "Broken".into(),
                    alias: None,
                    name: String::from("Broken"),
                    muscle_group: String::new(),
                    equipment: String::new(),
                    timed: false,
                    reps: None,
                    duration: None,
                    weight: None,
                },
            ]
        );
    }

    #[test]
    fn test_read_custom_template() {
        assert_eq!(
            VAULT.read_custom_template().unwrap(),
            Some(String::from("Custom"))
        );
        assert_eq!(Vault::default().read_custom_template().unwrap(), None);
    }

    #[test]
    fn test_remaining_exercises_planned_by_basename() {
        let id = domain::WorkoutID::new("W1").unwrap();
        let remaining = domain::remaining_exercises(
            &id,
            &[domain::PlannedSet::from("Squat")],
            &[],
            &VAULT.read_exercises().unwrap(),
            &domain::Markers::default(),
        )
        .unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].name, "Back Squat");
        assert_eq!(remaining[0].muscle_group, "Legs");
    }

    #[test]
    fn test_read_exercise_events() {
        let events = VAULT.read_exercise_events(&"squat".into()).unwrap();
        assert_eq!(
            events
                .iter()
                .map(|e| (e.workout_id.as_str(), e.timestamp))
                .collect::<Vec<_>>(),
            vec![
                (
                    "W1",
                    NaiveDate::from_ymd_opt(2024, 5, 6)
                        .unwrap()
                        .and_hms_opt(10, 5, 0)
                ),
                ("W2", None),
                (
                    "W0",
                    NaiveDate::from_ymd_opt(2024, 5, 1)
                        .unwrap()
                        .and_hms_opt(18, 0, 0)
                ),
            ]
        );
    }

    #[test]
    fn test_exercise_history_from_vault() {
        let service = domain::Service::new(VAULT.clone(), domain::Settings::default());
        let history =
            domain::WorkoutService::get_exercise_history(&service, &"squat".into()).unwrap();
        assert_eq!(
            history
                .iter()
                .map(|p| (p.workout_id.as_str(), f32::from(p.weight)))
                .collect::<Vec<_>>(),
            vec![("W0", 90.0), ("W1", 100.0)]
        );
    }

    #[test]
    fn test_read_workout() {
        let workout = VAULT
            .read_workout(&domain::WorkoutID::new("W1").unwrap())
            .unwrap();
        assert_eq!(workout.title, "Leg day");
        assert_eq!(workout.workout_type.as_deref(), Some("Strength"));
        assert_eq!(workout.place, None);
        assert_eq!(workout.date, NaiveDate::from_ymd_opt(2024, 5, 6));
        assert_eq!(workout.exercises.len(), 3);
    }

    #[test]
    fn test_read_unknown_workout() {
        assert!(matches!(
            VAULT.read_workout(&domain::WorkoutID::new("W9").unwrap()),
            Err(domain::ReadError::NotFound)
        ));
    }

    #[test]
    fn test_read_performed_events() {
        let events = VAULT
            .read_performed_events(&domain::WorkoutID::new("W1").unwrap())
            .unwrap();
        assert_eq!(events.len(), 3);
        assert_eq!(events[0].exercise_id, Some("workout-start".into()));
        assert_eq!(
            events[0].timestamp,
            NaiveDate::from_ymd_opt(2024, 5, 6)
                .unwrap()
                .and_hms_opt(10, 0, 0)
        );
        assert_eq!(events[1].exercise, "Back Squat");
        assert_eq!(events[1].effort, Some(domain::Effort::FOUR));
        assert_approx_eq!(events[1].volume(), 500.0);
        assert_eq!(events[2].exercise_id, None);
        assert_eq!(events[2].exercise, "Free text");
    }

    #[test]
    fn test_remaining_exercises_from_vault() {
        let id = domain::WorkoutID::new("W1").unwrap();
        let service = domain::Service::new(VAULT.clone(), domain::Settings::default());
        let remaining = domain::WorkoutService::get_remaining_exercises(&service, &id).unwrap();
        assert_eq!(
            remaining
                .iter()
                .map(|e| (e.name.as_str(), e.remaining_sets, e.target_label()))
                .collect::<Vec<_>>(),
            vec![
                ("Back Squat", 1, String::from("5")),
                ("Plank", 1, String::from("60 sec")),
            ]
        );
    }

    #[test]
    fn test_from_json_invalid() {
        assert!(matches!(
            Vault::from_json("{\"notes\": 5}"),
            Err(domain::StorageError::Other(_))
        ));
    }
}
