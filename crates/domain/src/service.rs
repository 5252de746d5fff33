use std::collections::BTreeMap;

use log::{debug, error};

use crate::{
    ExerciseID, ExerciseInfo, ExerciseRepository, HistoryPoint, MenuItem, PerformedEvent,
    PerformedEventRepository, PerformedRow, PreconditionError, ProgressDatasets,
    ProgressSummary, ReadError, RemainingEntry, ServiceError, Settings, StorageError, Workout,
    WorkoutID, WorkoutRepository, WorkoutState, all_exercises_menu, build_progress_datasets,
    exercise_history, performed_rows, remaining_exercises, selection_menu, summarize,
    workout_state,
};

pub trait WorkoutService {
    fn get_exercises(&self) -> Result<Vec<ExerciseInfo>, ReadError>;
    fn get_workout(&self, id: &WorkoutID) -> Result<Workout, ReadError>;
    fn get_performed_events(&self, id: &WorkoutID) -> Result<Vec<PerformedEvent>, ReadError>;
    fn get_workout_state(&self, id: &WorkoutID) -> Result<WorkoutState, ReadError>;
    fn get_summary(
        &self,
        id: &WorkoutID,
    ) -> Result<BTreeMap<ExerciseID, ProgressSummary>, ReadError>;
    fn get_remaining_exercises(
        &self,
        id: &WorkoutID,
    ) -> Result<Vec<RemainingEntry>, ServiceError>;
    fn get_progress_datasets(&self, id: &WorkoutID) -> Result<ProgressDatasets, ReadError>;
    fn get_exercise_history(&self, id: &ExerciseID) -> Result<Vec<HistoryPoint>, ReadError>;
    fn get_performed_rows(&self, id: &WorkoutID) -> Result<Vec<PerformedRow>, ReadError>;
    fn get_selection_menu(&self, id: &WorkoutID) -> Result<Vec<MenuItem>, ReadError>;
    fn get_all_exercises_menu(&self, id: &WorkoutID) -> Result<Vec<MenuItem>, ReadError>;
}

pub struct Service<R> {
    repository: R,
    settings: Settings,
}

impl<R> Service<R> {
    pub fn new(repository: R, settings: Settings) -> Self {
        Self {
            repository,
            settings,
        }
    }

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }
}

macro_rules! log_on_error {
    ($result: expr, $action: literal, $entity: literal) => {{
        let result = $result;
        match result {
            Ok(_) => {}
            Err(ref err) => match err {
                ReadError::Storage(StorageError::NoVault) | ReadError::NotFound => {
                    debug!("failed to {} {}: {err}", $action, $entity);
                }
                _ => {
                    error!("failed to {} {}: {err}", $action, $entity);
                }
            },
        }
        result
    }};
}

impl<R> WorkoutService for Service<R>
where
    R: ExerciseRepository + WorkoutRepository + PerformedEventRepository,
{
    fn get_exercises(&self) -> Result<Vec<ExerciseInfo>, ReadError> {
        log_on_error!(self.repository.read_exercises(), "get", "exercises")
    }

    fn get_workout(&self, id: &WorkoutID) -> Result<Workout, ReadError> {
        log_on_error!(self.repository.read_workout(id), "get", "workout")
    }

    fn get_performed_events(&self, id: &WorkoutID) -> Result<Vec<PerformedEvent>, ReadError> {
        log_on_error!(
            self.repository.read_performed_events(id),
            "get",
            "performed events"
        )
    }

    fn get_workout_state(&self, id: &WorkoutID) -> Result<WorkoutState, ReadError> {
        Ok(workout_state(
            id,
            &self.get_performed_events(id)?,
            &self.settings.markers,
        ))
    }

    fn get_summary(
        &self,
        id: &WorkoutID,
    ) -> Result<BTreeMap<ExerciseID, ProgressSummary>, ReadError> {
        let workout = self.get_workout(id)?;
        Ok(summarize(
            &workout.exercises,
            &self.get_performed_events(id)?,
            &self.settings.markers,
        ))
    }

    fn get_remaining_exercises(
        &self,
        id: &WorkoutID,
    ) -> Result<Vec<RemainingEntry>, ServiceError> {
        let workout = self.get_workout(id)?;
        let events = self.get_performed_events(id)?;
        let exercises = self.get_exercises()?;
        remaining_exercises(
            id,
            &workout.exercises,
            &events,
            &exercises,
            &self.settings.markers,
        )
        .map_err(|err: PreconditionError| {
            error!("failed to get remaining exercises of workout {id}: {err}");
            err.into()
        })
    }

    fn get_progress_datasets(&self, id: &WorkoutID) -> Result<ProgressDatasets, ReadError> {
        Ok(build_progress_datasets(
            &self.get_performed_events(id)?,
            &self.settings.markers,
        ))
    }

    fn get_exercise_history(&self, id: &ExerciseID) -> Result<Vec<HistoryPoint>, ReadError> {
        let events = log_on_error!(
            self.repository.read_exercise_events(id),
            "get",
            "exercise events"
        )?;
        Ok(exercise_history(id, &events))
    }

    fn get_performed_rows(&self, id: &WorkoutID) -> Result<Vec<PerformedRow>, ReadError> {
        Ok(performed_rows(
            id,
            &self.get_performed_events(id)?,
            &self.settings.markers,
        ))
    }

    fn get_selection_menu(&self, id: &WorkoutID) -> Result<Vec<MenuItem>, ReadError> {
        let workout = self.get_workout(id)?;
        let custom = log_on_error!(
            self.repository.read_custom_template(),
            "get",
            "custom template"
        )?;
        Ok(selection_menu(
            id,
            &workout.exercises,
            &self.get_performed_events(id)?,
            &self.get_exercises()?,
            custom.as_deref(),
            &self.settings.markers,
        ))
    }

    fn get_all_exercises_menu(&self, id: &WorkoutID) -> Result<Vec<MenuItem>, ReadError> {
        let workout = self.get_workout(id)?;
        Ok(all_exercises_menu(
            id,
            &workout.exercises,
            &self.get_performed_events(id)?,
            &self.get_exercises()?,
        ))
    }
}
