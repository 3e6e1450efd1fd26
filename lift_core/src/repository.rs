//! Repository contract for exercises, workouts and templates.
//!
//! Use cases depend only on [`WorkoutRepository`]. [`MemoryRepository`]
//! keeps everything in process; the SQLite-backed store lives in
//! [`crate::store`].

use crate::{catalog, Error, Exercise, Result, Workout, WorkoutTemplate};
use std::collections::HashMap;
use uuid::Uuid;

/// Storage operations the workout use cases rely on
///
/// Implementations guarantee that `get_active_workout` never has more than
/// one candidate; the use cases enforce this before saving.
pub trait WorkoutRepository {
    fn get_all_exercises(&self) -> Result<Vec<Exercise>>;
    fn get_exercise_by_id(&self, id: &str) -> Result<Option<Exercise>>;

    /// Case-insensitive substring match on exercise names
    fn search_exercises(&self, query: &str) -> Result<Vec<Exercise>> {
        let needle = query.trim().to_lowercase();
        Ok(self
            .get_all_exercises()?
            .into_iter()
            .filter(|e| e.name.to_lowercase().contains(&needle))
            .collect())
    }

    fn get_exercises_by_muscle_group(&self, muscle_group: &str) -> Result<Vec<Exercise>> {
        Ok(self
            .get_all_exercises()?
            .into_iter()
            .filter(|e| e.targets(muscle_group))
            .collect())
    }

    fn save_custom_exercise(&mut self, exercise: &Exercise) -> Result<()>;

    /// Only custom exercises may be deleted
    fn delete_custom_exercise(&mut self, id: &str) -> Result<()>;

    fn save_workout(&mut self, workout: &Workout) -> Result<()>;
    fn get_workout(&self, id: Uuid) -> Result<Option<Workout>>;
    fn get_active_workout(&self) -> Result<Option<Workout>>;

    /// All workouts, newest first
    fn get_all_workouts(&self) -> Result<Vec<Workout>>;

    /// Replace a stored workout wholesale
    fn update_workout(&mut self, workout: &Workout) -> Result<()>;
    fn delete_workout(&mut self, id: Uuid) -> Result<()>;

    fn save_template(&mut self, template: &WorkoutTemplate) -> Result<()>;
    fn get_template(&self, id: Uuid) -> Result<Option<WorkoutTemplate>>;
    fn get_all_templates(&self) -> Result<Vec<WorkoutTemplate>>;
    fn delete_template(&mut self, id: Uuid) -> Result<()>;
}

/// In-process repository seeded with the default catalog
#[derive(Clone, Debug, Default)]
pub struct MemoryRepository {
    exercises: Vec<Exercise>,
    workouts: HashMap<Uuid, Workout>,
    templates: HashMap<Uuid, WorkoutTemplate>,
}

impl MemoryRepository {
    /// Empty repository with no exercises at all
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default_catalog() -> Self {
        Self {
            exercises: catalog::default_exercises().to_vec(),
            ..Self::default()
        }
    }
}

impl WorkoutRepository for MemoryRepository {
    fn get_all_exercises(&self) -> Result<Vec<Exercise>> {
        let mut exercises = self.exercises.clone();
        exercises.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(exercises)
    }

    fn get_exercise_by_id(&self, id: &str) -> Result<Option<Exercise>> {
        Ok(self.exercises.iter().find(|e| e.id == id).cloned())
    }

    fn save_custom_exercise(&mut self, exercise: &Exercise) -> Result<()> {
        match self.exercises.iter_mut().find(|e| e.id == exercise.id) {
            Some(existing) if !existing.is_custom => {
                return Err(Error::InvalidArgument(format!(
                    "'{}' is a built-in exercise",
                    exercise.id
                )));
            }
            Some(existing) => *existing = exercise.clone(),
            None => self.exercises.push(exercise.clone()),
        }
        Ok(())
    }

    fn delete_custom_exercise(&mut self, id: &str) -> Result<()> {
        let idx = self
            .exercises
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| Error::NotFound(format!("exercise '{}'", id)))?;
        if !self.exercises[idx].is_custom {
            return Err(Error::InvalidArgument(format!(
                "'{}' is a built-in exercise",
                id
            )));
        }
        self.exercises.remove(idx);
        Ok(())
    }

    fn save_workout(&mut self, workout: &Workout) -> Result<()> {
        self.workouts.insert(workout.id, workout.clone());
        Ok(())
    }

    fn get_workout(&self, id: Uuid) -> Result<Option<Workout>> {
        Ok(self.workouts.get(&id).cloned())
    }

    fn get_active_workout(&self) -> Result<Option<Workout>> {
        Ok(self
            .workouts
            .values()
            .filter(|w| w.is_active())
            .max_by_key(|w| w.started_at)
            .cloned())
    }

    fn get_all_workouts(&self) -> Result<Vec<Workout>> {
        let mut workouts: Vec<_> = self.workouts.values().cloned().collect();
        workouts.sort_by(|a, b| b.started_at.cmp(&a.started_at));
        Ok(workouts)
    }

    fn update_workout(&mut self, workout: &Workout) -> Result<()> {
        match self.workouts.get_mut(&workout.id) {
            Some(existing) => {
                *existing = workout.clone();
                Ok(())
            }
            None => Err(Error::NotFound(format!("workout {}", workout.id))),
        }
    }

    fn delete_workout(&mut self, id: Uuid) -> Result<()> {
        self.workouts.remove(&id);
        Ok(())
    }

    fn save_template(&mut self, template: &WorkoutTemplate) -> Result<()> {
        self.templates.insert(template.id, template.clone());
        Ok(())
    }

    fn get_template(&self, id: Uuid) -> Result<Option<WorkoutTemplate>> {
        Ok(self.templates.get(&id).cloned())
    }

    fn get_all_templates(&self) -> Result<Vec<WorkoutTemplate>> {
        let mut templates: Vec<_> = self.templates.values().cloned().collect();
        templates.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(templates)
    }

    fn delete_template(&mut self, id: Uuid) -> Result<()> {
        self.templates.remove(&id);
        Ok(())
    }
}
