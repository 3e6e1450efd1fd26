//! Explicit application context.
//!
//! `AppContext` owns the repository and the user settings for the lifetime
//! of a session. Whoever builds it hands it to the code that needs it and
//! calls [`AppContext::close`] when done.

use crate::settings::AppSettings;
use crate::store::SqliteRepository;
use crate::usecases::{self, SetUpdate};
use crate::weight::{self, WeightDisplay};
use crate::{Config, Error, Exercise, Result, Workout, WorkoutRepository, WorkoutSet};
use chrono::Utc;
use std::path::{Path, PathBuf};
use uuid::Uuid;

pub const DATABASE_FILE: &str = "workouts.db";
pub const SETTINGS_FILE: &str = "settings.json";

pub struct AppContext<R: WorkoutRepository> {
    repo: R,
    settings: AppSettings,
    settings_path: PathBuf,
    /// Settings changed since they were loaded
    dirty: bool,
}

impl AppContext<SqliteRepository> {
    /// Open the database and settings under `data_dir`
    ///
    /// The configured display mode applies until the user picks one, which
    /// writes the settings file.
    pub fn open(config: &Config, data_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(data_dir)?;
        let repo = SqliteRepository::open(&data_dir.join(DATABASE_FILE))?;

        let settings_path = data_dir.join(SETTINGS_FILE);
        let settings = if settings_path.exists() {
            AppSettings::load(&settings_path)?
        } else {
            AppSettings {
                weight_display: config.display.weight_display,
                ..AppSettings::default()
            }
        };

        tracing::debug!("Opened app context in {:?}", data_dir);
        Ok(Self::new(repo, settings, settings_path))
    }
}

impl<R: WorkoutRepository> AppContext<R> {
    pub fn new(repo: R, settings: AppSettings, settings_path: PathBuf) -> Self {
        Self {
            repo,
            settings,
            settings_path,
            dirty: false,
        }
    }

    pub fn repo(&self) -> &R {
        &self.repo
    }

    pub fn repo_mut(&mut self) -> &mut R {
        &mut self.repo
    }

    pub fn settings(&self) -> &AppSettings {
        &self.settings
    }

    pub fn bodyweight(&self) -> f64 {
        self.settings.bodyweight_kg
    }

    /// Store a new bodyweight (clamped); saved on [`AppContext::close`]
    pub fn set_bodyweight(&mut self, kg: f64) -> f64 {
        let stored = self.settings.set_bodyweight(kg);
        self.dirty = true;
        tracing::info!("Bodyweight set to {} kg", stored);
        stored
    }

    pub fn set_weight_display(&mut self, mode: WeightDisplay) {
        self.settings.weight_display = mode;
        self.dirty = true;
        tracing::info!("Weight display set to {:?}", mode);
    }

    /// Render a set's weight with the current bodyweight and display mode
    pub fn display_weight(&self, exercise: &Exercise, set: &WorkoutSet) -> String {
        weight::display_weight(
            set.weight_kg,
            exercise.is_bodyweight,
            self.settings.bodyweight_kg,
            self.settings.weight_display,
        )
    }

    pub fn active_workout(&self) -> Result<Option<Workout>> {
        self.repo.get_active_workout()
    }

    /// The active workout, or an InvalidState error if none is running
    pub fn require_active_workout(&self) -> Result<Workout> {
        self.repo
            .get_active_workout()?
            .ok_or_else(|| Error::InvalidState("no workout in progress".into()))
    }

    /// Resolve exercise ids and start a workout
    pub fn start_workout(&mut self, name: &str, exercise_ids: &[String]) -> Result<Workout> {
        let exercises = exercise_ids
            .iter()
            .map(|id| {
                self.repo
                    .get_exercise_by_id(id)?
                    .ok_or_else(|| Error::NotFound(format!("exercise '{}'", id)))
            })
            .collect::<Result<Vec<_>>>()?;
        usecases::create_workout(&mut self.repo, name, &exercises, Utc::now())
    }

    pub fn start_from_template(&mut self, template_id: Uuid) -> Result<Workout> {
        usecases::create_workout_from_template(&mut self.repo, template_id, Utc::now())
    }

    pub fn update_set(
        &mut self,
        workout_id: Uuid,
        exercise_id: &str,
        set_id: Uuid,
        update: &SetUpdate,
    ) -> Result<Workout> {
        usecases::update_workout_set(
            &mut self.repo,
            workout_id,
            exercise_id,
            set_id,
            update,
            Utc::now(),
        )
    }

    pub fn finish(&mut self, workout_id: Uuid) -> Result<Workout> {
        usecases::finish_workout(&mut self.repo, workout_id, Utc::now())
    }

    /// Persist changed settings and release the store
    pub fn close(self) -> Result<()> {
        if self.dirty {
            self.settings.save(&self.settings_path)?;
        }
        tracing::debug!("Closed app context");
        Ok(())
    }
}
