//! Workout history and per-exercise statistics.
//!
//! Everything here is computed from finished workouts only. Weights are
//! resolved with the bodyweight passed in, so bodyweight exercises are
//! compared on the total load moved.

use crate::weight::{effective_volume, effective_weight};
use crate::Workout;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;

/// Finished workouts started within the last `days`, newest first
///
/// A window reaching past the representable time range has no cutoff.
pub fn recent_workouts(workouts: &[Workout], now: DateTime<Utc>, days: i64) -> Vec<Workout> {
    let cutoff = Duration::try_days(days).and_then(|window| now.checked_sub_signed(window));
    let mut recent: Vec<Workout> = workouts
        .iter()
        .filter(|w| !w.is_active() && cutoff.map_or(true, |c| w.started_at >= c))
        .cloned()
        .collect();
    recent.sort_by(|a, b| b.started_at.cmp(&a.started_at));

    tracing::debug!(
        "{} of {} workouts in the last {} days",
        recent.len(),
        workouts.len(),
        days
    );
    recent
}

/// One line of workout history
#[derive(Clone, Debug, PartialEq)]
pub struct WorkoutSummary {
    pub name: String,
    pub started_at: DateTime<Utc>,
    pub duration: Option<Duration>,
    pub exercises: usize,
    pub performed_sets: usize,
    pub total_sets: usize,
    /// reps × added weight
    pub volume_kg: f64,
    /// reps × (bodyweight + added weight) for bodyweight exercises
    pub effective_volume_kg: f64,
}

impl WorkoutSummary {
    pub fn from_workout(workout: &Workout, bodyweight_kg: f64) -> Self {
        Self {
            name: workout.name.clone(),
            started_at: workout.started_at,
            duration: workout.duration(),
            exercises: workout.exercises.len(),
            performed_sets: workout.performed_sets(),
            total_sets: workout.total_sets(),
            volume_kg: workout.total_volume(),
            effective_volume_kg: effective_volume(workout, bodyweight_kg),
        }
    }
}

/// Aggregated performance for one exercise
#[derive(Clone, Debug, PartialEq)]
pub struct ExerciseStats {
    pub exercise_id: String,
    pub name: String,
    /// Workouts with at least one completed set
    pub sessions: usize,
    pub completed_sets: usize,
    pub total_volume_kg: f64,
    pub best_weight_kg: f64,
    pub best_reps: u32,
    pub last_performed: Option<DateTime<Utc>>,
}

/// Heaviest completed set of an exercise
#[derive(Clone, Debug, PartialEq)]
pub struct PersonalBest {
    pub weight_kg: f64,
    pub reps: u32,
    pub achieved_at: DateTime<Utc>,
}

/// Statistics for every exercise with completed sets, sorted by name
pub fn exercise_stats(workouts: &[Workout], bodyweight_kg: f64) -> Vec<ExerciseStats> {
    let mut by_id: HashMap<String, ExerciseStats> = HashMap::new();

    for workout in workouts.iter().filter(|w| !w.is_active()) {
        for entry in &workout.exercises {
            let done: Vec<_> = entry.sets.iter().filter(|s| s.completed).collect();
            if done.is_empty() {
                continue;
            }

            let stats = by_id
                .entry(entry.exercise.id.clone())
                .or_insert_with(|| ExerciseStats {
                    exercise_id: entry.exercise.id.clone(),
                    name: entry.exercise.name.clone(),
                    sessions: 0,
                    completed_sets: 0,
                    total_volume_kg: 0.0,
                    best_weight_kg: 0.0,
                    best_reps: 0,
                    last_performed: None,
                });

            stats.sessions += 1;
            stats.completed_sets += done.len();
            for set in done {
                let load = effective_weight(set.weight_kg, entry.exercise.is_bodyweight, bodyweight_kg);
                stats.total_volume_kg += set.reps as f64 * load;
                stats.best_weight_kg = stats.best_weight_kg.max(load);
                stats.best_reps = stats.best_reps.max(set.reps);
            }
            stats.last_performed = stats.last_performed.max(Some(workout.started_at));
        }
    }

    let mut stats: Vec<_> = by_id.into_values().collect();
    stats.sort_by(|a, b| a.name.cmp(&b.name));
    stats
}

/// Heaviest completed set; ties go to more reps, then the earliest date
pub fn personal_best(
    workouts: &[Workout],
    exercise_id: &str,
    bodyweight_kg: f64,
) -> Option<PersonalBest> {
    let mut best: Option<PersonalBest> = None;

    for workout in workouts.iter().filter(|w| !w.is_active()) {
        let Some(entry) = workout.find_exercise(exercise_id) else {
            continue;
        };
        for set in entry.sets.iter().filter(|s| s.completed) {
            let candidate = PersonalBest {
                weight_kg: effective_weight(set.weight_kg, entry.exercise.is_bodyweight, bodyweight_kg),
                reps: set.reps,
                achieved_at: set.completed_at.unwrap_or(workout.started_at),
            };
            let better = match &best {
                None => true,
                Some(current) => {
                    candidate.weight_kg > current.weight_kg
                        || (candidate.weight_kg == current.weight_kg
                            && (candidate.reps > current.reps
                                || (candidate.reps == current.reps
                                    && candidate.achieved_at < current.achieved_at)))
                }
            };
            if better {
                best = Some(candidate);
            }
        }
    }

    best
}
