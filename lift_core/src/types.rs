//! Core domain types for the Lift workout tracker.
//!
//! This module defines the value records used throughout the system:
//! - Exercises from the catalog or created by the user
//! - Workouts, the exercises performed in them, and their sets
//! - Templates (saved exercise selections)
//!
//! Records are never mutated in place by the use cases. Changes produce a
//! new value through the `with_*` helpers, which is then persisted whole.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Exercise Types
// ============================================================================

/// An exercise definition (e.g., "Barbell Bench Press")
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Exercise {
    pub id: String,
    pub name: String,
    /// Ordered, primary group first
    pub muscle_groups: Vec<String>,
    pub instructions: String,
    pub equipment: String,
    pub is_custom: bool,
    /// Resistance is the user's body mass plus any added weight
    pub is_bodyweight: bool,
    pub default_rest_seconds: u32,
}

impl Exercise {
    /// Case-insensitive check against the muscle group list
    pub fn targets(&self, muscle_group: &str) -> bool {
        self.muscle_groups
            .iter()
            .any(|g| g.eq_ignore_ascii_case(muscle_group))
    }
}

// ============================================================================
// Workout Types
// ============================================================================

/// A single logged set
///
/// `weight_kg` is the added weight for bodyweight exercises.
/// `completed_at` is `Some` exactly when `completed` is true.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WorkoutSet {
    pub id: Uuid,
    pub reps: u32,
    pub weight_kg: f64,
    pub rest_seconds: u32,
    pub completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

impl WorkoutSet {
    /// A fresh, not yet performed set
    pub fn empty(rest_seconds: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            reps: 0,
            weight_kg: 0.0,
            rest_seconds,
            completed: false,
            completed_at: None,
            notes: None,
        }
    }

    /// reps × weight, counted only once the set is completed
    pub fn volume(&self) -> f64 {
        if self.completed {
            self.reps as f64 * self.weight_kg
        } else {
            0.0
        }
    }
}

/// One exercise as performed within a workout
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ExerciseInWorkout {
    pub exercise: Exercise,
    pub sets: Vec<WorkoutSet>,
    /// Zero-based position in the workout
    pub order: u32,
}

impl ExerciseInWorkout {
    pub fn completed_sets(&self) -> usize {
        self.sets.iter().filter(|s| s.completed).count()
    }

    pub fn total_volume(&self) -> f64 {
        self.sets.iter().map(WorkoutSet::volume).sum()
    }

    pub fn find_set(&self, set_id: Uuid) -> Option<&WorkoutSet> {
        self.sets.iter().find(|s| s.id == set_id)
    }

    /// Return a copy with the matching set replaced by `f(set)`
    ///
    /// Returns `None` if no set has the given id.
    pub fn with_set<F>(&self, set_id: Uuid, f: F) -> Option<Self>
    where
        F: FnOnce(&WorkoutSet) -> WorkoutSet,
    {
        let idx = self.sets.iter().position(|s| s.id == set_id)?;
        let mut sets = self.sets.clone();
        sets[idx] = f(&self.sets[idx]);
        Some(Self {
            sets,
            ..self.clone()
        })
    }
}

/// A workout session
///
/// At most one workout may be active (`finished_at == None`) at a time.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Workout {
    pub id: Uuid,
    pub name: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub exercises: Vec<ExerciseInWorkout>,
    pub notes: Option<String>,
}

impl Workout {
    pub fn is_active(&self) -> bool {
        self.finished_at.is_none()
    }

    pub fn total_sets(&self) -> usize {
        self.exercises.iter().map(|e| e.sets.len()).sum()
    }

    /// Number of completed sets
    pub fn performed_sets(&self) -> usize {
        self.exercises.iter().map(ExerciseInWorkout::completed_sets).sum()
    }

    pub fn total_volume(&self) -> f64 {
        self.exercises.iter().map(ExerciseInWorkout::total_volume).sum()
    }

    /// Elapsed time between start and finish; `None` while active
    pub fn duration(&self) -> Option<Duration> {
        self.finished_at.map(|finished| finished - self.started_at)
    }

    pub fn find_exercise(&self, exercise_id: &str) -> Option<&ExerciseInWorkout> {
        self.exercises.iter().find(|e| e.exercise.id == exercise_id)
    }

    /// Return a copy with the matching exercise replaced by `f(exercise)`
    ///
    /// Returns `None` if the exercise is not part of this workout, or if `f`
    /// itself returns `None`.
    pub fn with_exercise<F>(&self, exercise_id: &str, f: F) -> Option<Self>
    where
        F: FnOnce(&ExerciseInWorkout) -> Option<ExerciseInWorkout>,
    {
        let idx = self
            .exercises
            .iter()
            .position(|e| e.exercise.id == exercise_id)?;
        let replacement = f(&self.exercises[idx])?;
        let mut exercises = self.exercises.clone();
        exercises[idx] = replacement;
        Some(Self {
            exercises,
            ..self.clone()
        })
    }

    /// Order index for an exercise appended to this workout
    pub fn next_order(&self) -> u32 {
        self.exercises
            .iter()
            .map(|e| e.order + 1)
            .max()
            .unwrap_or(0)
    }
}

// ============================================================================
// Template Type
// ============================================================================

/// A saved exercise selection used to seed new workouts
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WorkoutTemplate {
    pub id: Uuid,
    pub name: String,
    pub exercise_ids: Vec<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn test_volume_counts_only_completed_sets() {
        let entry = ExerciseInWorkout {
            exercise: exercise("bench_press", false),
            sets: vec![done_set(10, 20.0), WorkoutSet::empty(90), done_set(5, 40.0)],
            order: 0,
        };

        assert_eq!(entry.completed_sets(), 2);
        assert_eq!(entry.total_volume(), 400.0);
    }

    #[test]
    fn test_with_set_leaves_original_untouched() {
        let entry = ExerciseInWorkout {
            exercise: exercise("squat", false),
            sets: vec![WorkoutSet::empty(90), WorkoutSet::empty(90)],
            order: 0,
        };
        let target = entry.sets[1].id;

        let updated = entry
            .with_set(target, |s| WorkoutSet {
                reps: 8,
                ..s.clone()
            })
            .unwrap();

        assert_eq!(updated.sets[1].reps, 8);
        assert_eq!(updated.sets[0], entry.sets[0]);
        assert_eq!(entry.sets[1].reps, 0);
    }

    #[test]
    fn test_with_set_unknown_id() {
        let entry = ExerciseInWorkout {
            exercise: exercise("squat", false),
            sets: vec![WorkoutSet::empty(90)],
            order: 0,
        };
        assert!(entry.with_set(Uuid::new_v4(), |s| s.clone()).is_none());
    }

    #[test]
    fn test_with_exercise_replaces_by_id() {
        let w = workout(vec![
            ExerciseInWorkout {
                exercise: exercise("a", false),
                sets: vec![WorkoutSet::empty(90)],
                order: 0,
            },
            ExerciseInWorkout {
                exercise: exercise("b", false),
                sets: vec![WorkoutSet::empty(90)],
                order: 1,
            },
        ]);

        let updated = w
            .with_exercise("b", |e| {
                Some(ExerciseInWorkout {
                    sets: vec![],
                    ..e.clone()
                })
            })
            .unwrap();

        assert_eq!(updated.exercises[1].sets.len(), 0);
        assert_eq!(updated.exercises[0], w.exercises[0]);
        assert!(w.with_exercise("missing", |e| Some(e.clone())).is_none());
    }

    #[test]
    fn test_workout_aggregates() {
        let mut w = workout(vec![
            ExerciseInWorkout {
                exercise: exercise("a", false),
                sets: vec![done_set(10, 20.0), done_set(10, 20.0), WorkoutSet::empty(90)],
                order: 0,
            },
            ExerciseInWorkout {
                exercise: exercise("b", false),
                sets: vec![done_set(10, 20.0), done_set(10, 20.0), WorkoutSet::empty(90)],
                order: 1,
            },
        ]);

        assert_eq!(w.total_sets(), 6);
        assert_eq!(w.performed_sets(), 4);
        assert_eq!(w.total_volume(), 800.0);
        assert!(w.is_active());
        assert!(w.duration().is_none());
        assert_eq!(w.next_order(), 2);

        w.finished_at = Some(w.started_at + Duration::minutes(45));
        assert!(!w.is_active());
        assert_eq!(w.duration(), Some(Duration::minutes(45)));
    }

    #[test]
    fn test_exercise_targets_is_case_insensitive() {
        let e = exercise("bench_press", false);
        assert!(e.targets("Chest"));
        assert!(!e.targets("legs"));
    }
}
