//! CSV export of finished workouts.
//!
//! One row per set. Appends to an existing file, writing headers only when
//! the file is new or empty, and fsyncs before returning.

use crate::{Result, Workout};
use std::fs::OpenOptions;
use std::path::Path;

/// A row in the CSV output
#[derive(Debug, serde::Serialize)]
struct CsvRow<'a> {
    workout_id: String,
    workout_name: &'a str,
    started_at: String,
    finished_at: Option<String>,
    exercise_id: &'a str,
    exercise_name: &'a str,
    set_number: usize,
    reps: u32,
    weight_kg: f64,
    bodyweight_exercise: bool,
    completed: bool,
    completed_at: Option<String>,
    notes: Option<&'a str>,
}

fn rows(workout: &Workout) -> impl Iterator<Item = CsvRow<'_>> {
    workout.exercises.iter().flat_map(move |entry| {
        entry.sets.iter().enumerate().map(move |(idx, set)| CsvRow {
            workout_id: workout.id.to_string(),
            workout_name: &workout.name,
            started_at: workout.started_at.to_rfc3339(),
            finished_at: workout.finished_at.map(|t| t.to_rfc3339()),
            exercise_id: &entry.exercise.id,
            exercise_name: &entry.exercise.name,
            set_number: idx + 1,
            reps: set.reps,
            weight_kg: set.weight_kg,
            bodyweight_exercise: entry.exercise.is_bodyweight,
            completed: set.completed,
            completed_at: set.completed_at.map(|t| t.to_rfc3339()),
            notes: set.notes.as_deref(),
        })
    })
}

/// Append every set of the finished workouts to `path`
///
/// Active workouts are skipped. Returns the number of rows written.
pub fn export_sets_csv(workouts: &[Workout], path: &Path) -> Result<usize> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let needs_headers = file.metadata()?.len() == 0;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(needs_headers)
        .from_writer(file);

    let mut count = 0;
    for workout in workouts.iter().filter(|w| !w.is_active()) {
        for row in rows(workout) {
            writer.serialize(row)?;
            count += 1;
        }
    }

    writer.flush()?;
    let file = writer
        .into_inner()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
    file.sync_all()?;

    tracing::info!("Exported {} sets to {:?}", count, path);
    Ok(count)
}
