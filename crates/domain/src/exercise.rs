use std::collections::BTreeMap;

use derive_more::{Deref, Display};

use crate::{ReadError, Reps, Time, Weight};

pub trait ExerciseRepository {
    fn read_exercises(&self) -> Result<Vec<ExerciseInfo>, ReadError>;
    /// Name of the template for logging a set without reference data.
    fn read_custom_template(&self) -> Result<Option<String>, ReadError>;
}

/// Static reference data of an exercise template.
///
/// The optional values are the suggested targets of the template and are
/// shown next to remaining sets.
#[derive(Debug, Clone, PartialEq)]
pub struct ExerciseInfo {
    pub id: ExerciseID,
    /// Second key under which a plan may refer to the exercise.
    pub alias: Option<ExerciseID>,
    pub name: String,
    pub muscle_group: String,
    pub equipment: String,
    pub timed: bool,
    pub reps: Option<Reps>,
    pub duration: Option<Time>,
    pub weight: Option<Weight>,
}

impl ExerciseInfo {
    #[must_use]
    pub fn target(&self) -> Target {
        if self.timed {
            Target::Duration(self.duration)
        } else {
            Target::Reps(self.reps)
        }
    }
}

/// Quantity suggested for a set, depending on whether the exercise is timed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Target {
    Reps(Option<Reps>),
    Duration(Option<Time>),
}

#[derive(
    Deref,
    Display,
    Debug,
    Default,
    Clone,
    Hash,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(transparent)]
pub struct ExerciseID(String);

impl ExerciseID {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ExerciseID {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ExerciseID {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Index reference data by id. The first record wins if an id occurs twice.
#[must_use]
pub fn index_exercises(exercises: &[ExerciseInfo]) -> BTreeMap<&ExerciseID, &ExerciseInfo> {
    let mut result = BTreeMap::new();
    for exercise in exercises {
        result.entry(&exercise.id).or_insert(exercise);
    }
    result
}

/// Index reference data by id and by alias.
///
/// Ids take precedence over aliases. Otherwise the first record wins.
#[must_use]
pub fn lookup_exercises(exercises: &[ExerciseInfo]) -> BTreeMap<&ExerciseID, &ExerciseInfo> {
    let mut result = index_exercises(exercises);
    for exercise in exercises {
        if let Some(alias) = &exercise.alias {
            result.entry(alias).or_insert(exercise);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn exercise(id: &str, name: &str, timed: bool) -> ExerciseInfo {
        ExerciseInfo {
            id: id.into(),
            alias: None,
            name: name.to_string(),
            muscle_group: String::new(),
            equipment: String::new(),
            timed,
            reps: Some(Reps::new(10).unwrap()),
            duration: Some(Time::new(30).unwrap()),
            weight: None,
        }
    }

    #[test]
    fn test_exercise_info_target() {
        assert_eq!(
            exercise("a", "A", false).target(),
            Target::Reps(Some(Reps::new(10).unwrap()))
        );
        assert_eq!(
            exercise("a", "A", true).target(),
            Target::Duration(Some(Time::new(30).unwrap()))
        );
    }

    #[test]
    fn test_index_exercises_keeps_first() {
        let exercises = vec![exercise("a", "First", false), exercise("a", "Second", false)];
        let index = index_exercises(&exercises);
        assert_eq!(index.len(), 1);
        assert_eq!(index[&ExerciseID::from("a")].name, "First");
    }

    #[test]
    fn test_lookup_exercises_by_alias() {
        let mut squat = exercise("squat", "Squat", false);
        squat.alias = Some("Back Squat".into());
        let mut bench = exercise("bench", "Bench Press", false);
        bench.alias = Some("squat".into());
        let exercises = vec![squat, bench];
        let lookup = lookup_exercises(&exercises);
        assert_eq!(lookup.len(), 3);
        assert_eq!(lookup[&ExerciseID::from("Back Squat")].name, "Squat");
        assert_eq!(lookup[&ExerciseID::from("squat")].name, "Squat");
        assert_eq!(index_exercises(&exercises).len(), 2);
    }

    #[test]
    fn test_exercise_id_display() {
        assert_eq!(ExerciseID::from("squat").to_string(), "squat");
        assert_eq!(ExerciseID::from("squat").as_str(), "squat");
    }
}
