//! Workout lifecycle use cases.
//!
//! A workout moves through NoActiveWorkout -> Active -> Finished. These
//! functions enforce the pre- and post-conditions around each repository
//! call and report every failure as an [`Error`] value:
//! - [`Error::InvalidArgument`] for rejected input
//! - [`Error::NotFound`] for unknown ids
//! - [`Error::InvalidState`] for lifecycle conflicts
//!
//! Each call is a single read-modify-write against the repository. Nothing
//! is written unless the whole operation is valid.

use crate::{
    Error, Exercise, ExerciseInWorkout, Result, Workout, WorkoutRepository, WorkoutSet,
    WorkoutTemplate,
};
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use uuid::Uuid;

/// Sets created for each exercise when it enters a workout
pub const DEFAULT_SETS_PER_EXERCISE: usize = 3;

/// Fields to change on a set; `None` leaves the field as it is
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SetUpdate {
    pub reps: Option<u32>,
    pub weight_kg: Option<f64>,
    pub completed: Option<bool>,
}

/// User input for a new custom exercise
#[derive(Clone, Debug, Default)]
pub struct CustomExerciseDraft {
    pub name: String,
    pub muscle_groups: Vec<String>,
    pub instructions: String,
    pub equipment: String,
    pub is_bodyweight: bool,
    pub default_rest_seconds: u32,
}

fn default_sets(exercise: &Exercise) -> Vec<WorkoutSet> {
    (0..DEFAULT_SETS_PER_EXERCISE)
        .map(|_| WorkoutSet::empty(exercise.default_rest_seconds))
        .collect()
}

/// Exercises are addressed by id inside a workout, so each may appear once
fn reject_duplicates<'a>(ids: impl IntoIterator<Item = &'a str>) -> Result<()> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(Error::InvalidArgument(format!(
                "'{}' is selected more than once",
                id
            )));
        }
    }
    Ok(())
}

fn load_workout<R: WorkoutRepository + ?Sized>(repo: &R, workout_id: Uuid) -> Result<Workout> {
    repo.get_workout(workout_id)?
        .ok_or_else(|| Error::NotFound(format!("workout {}", workout_id)))
}

fn require_exercise<'a>(workout: &'a Workout, exercise_id: &str) -> Result<&'a ExerciseInWorkout> {
    workout.find_exercise(exercise_id).ok_or_else(|| {
        Error::NotFound(format!(
            "exercise '{}' in workout {}",
            exercise_id, workout.id
        ))
    })
}

// ============================================================================
// Lifecycle
// ============================================================================

/// Start a new workout with empty sets for each exercise
pub fn create_workout<R: WorkoutRepository + ?Sized>(
    repo: &mut R,
    name: &str,
    exercises: &[Exercise],
    now: DateTime<Utc>,
) -> Result<Workout> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::InvalidArgument("workout name is blank".into()));
    }
    if exercises.is_empty() {
        return Err(Error::InvalidArgument(
            "select at least one exercise".into(),
        ));
    }
    reject_duplicates(exercises.iter().map(|e| e.id.as_str()))?;
    if let Some(active) = repo.get_active_workout()? {
        return Err(Error::InvalidState(format!(
            "workout '{}' is still active; finish it first",
            active.name
        )));
    }

    let workout = Workout {
        id: Uuid::new_v4(),
        name: name.to_string(),
        started_at: now,
        finished_at: None,
        exercises: exercises
            .iter()
            .enumerate()
            .map(|(order, exercise)| ExerciseInWorkout {
                exercise: exercise.clone(),
                sets: default_sets(exercise),
                order: order as u32,
            })
            .collect(),
        notes: None,
    };

    repo.save_workout(&workout)?;
    tracing::info!(
        "Started workout '{}' with {} exercises",
        workout.name,
        workout.exercises.len()
    );
    Ok(workout)
}

/// Start a new workout from a saved template
pub fn create_workout_from_template<R: WorkoutRepository + ?Sized>(
    repo: &mut R,
    template_id: Uuid,
    now: DateTime<Utc>,
) -> Result<Workout> {
    let template = repo
        .get_template(template_id)?
        .ok_or_else(|| Error::NotFound(format!("template {}", template_id)))?;

    let exercises = template
        .exercise_ids
        .iter()
        .map(|id| {
            repo.get_exercise_by_id(id)?
                .ok_or_else(|| Error::NotFound(format!("exercise '{}'", id)))
        })
        .collect::<Result<Vec<_>>>()?;

    create_workout(repo, &template.name, &exercises, now)
}

/// Change reps, weight and/or completion of one set
///
/// Completing a set stamps `completed_at`; un-completing clears it so that
/// `completed_at` is present exactly when the set is completed. Re-completing
/// an already completed set keeps the original timestamp.
pub fn update_workout_set<R: WorkoutRepository + ?Sized>(
    repo: &mut R,
    workout_id: Uuid,
    exercise_id: &str,
    set_id: Uuid,
    update: &SetUpdate,
    now: DateTime<Utc>,
) -> Result<Workout> {
    if let Some(weight) = update.weight_kg {
        if !weight.is_finite() || weight < 0.0 {
            return Err(Error::InvalidArgument(format!(
                "weight must be a non-negative number, got {}",
                weight
            )));
        }
    }

    let workout = load_workout(repo, workout_id)?;
    let entry = require_exercise(&workout, exercise_id)?;
    if entry.find_set(set_id).is_none() {
        return Err(Error::NotFound(format!(
            "set {} of exercise '{}'",
            set_id, exercise_id
        )));
    }

    let updated = workout
        .with_exercise(exercise_id, |e| {
            e.with_set(set_id, |set| apply_update(set, update, now))
        })
        .ok_or_else(|| Error::NotFound(format!("set {}", set_id)))?;

    repo.update_workout(&updated)?;
    tracing::debug!("Updated set {} in workout {}", set_id, workout_id);
    Ok(updated)
}

fn apply_update(set: &WorkoutSet, update: &SetUpdate, now: DateTime<Utc>) -> WorkoutSet {
    let completed = update.completed.unwrap_or(set.completed);
    let completed_at = match (set.completed, completed) {
        (false, true) => Some(now),
        (true, true) => set.completed_at.or(Some(now)),
        (_, false) => None,
    };

    WorkoutSet {
        reps: update.reps.unwrap_or(set.reps),
        weight_kg: update.weight_kg.unwrap_or(set.weight_kg),
        completed,
        completed_at,
        ..set.clone()
    }
}

/// Stamp the workout as finished
pub fn finish_workout<R: WorkoutRepository + ?Sized>(
    repo: &mut R,
    workout_id: Uuid,
    now: DateTime<Utc>,
) -> Result<Workout> {
    let workout = load_workout(repo, workout_id)?;
    if !workout.is_active() {
        return Err(Error::InvalidState(format!(
            "workout '{}' is already finished",
            workout.name
        )));
    }

    let finished = Workout {
        finished_at: Some(now.max(workout.started_at)),
        ..workout
    };
    repo.update_workout(&finished)?;
    tracing::info!(
        "Finished workout '{}': {}/{} sets, {} kg volume",
        finished.name,
        finished.performed_sets(),
        finished.total_sets(),
        finished.total_volume()
    );
    Ok(finished)
}

/// Throw away the active workout without recording it
pub fn discard_workout<R: WorkoutRepository + ?Sized>(repo: &mut R, workout_id: Uuid) -> Result<()> {
    let workout = load_workout(repo, workout_id)?;
    if !workout.is_active() {
        return Err(Error::InvalidState(format!(
            "workout '{}' is finished and part of the history",
            workout.name
        )));
    }
    repo.delete_workout(workout_id)?;
    tracing::info!("Discarded workout '{}'", workout.name);
    Ok(())
}

// ============================================================================
// Editing an active workout
// ============================================================================

/// Append a set, pre-filled with the last set's reps and weight
pub fn add_set<R: WorkoutRepository + ?Sized>(
    repo: &mut R,
    workout_id: Uuid,
    exercise_id: &str,
) -> Result<Workout> {
    let workout = load_workout(repo, workout_id)?;
    require_exercise(&workout, exercise_id)?;

    let updated = workout
        .with_exercise(exercise_id, |e| {
            let mut next = WorkoutSet::empty(e.exercise.default_rest_seconds);
            if let Some(last) = e.sets.last() {
                next.reps = last.reps;
                next.weight_kg = last.weight_kg;
                next.rest_seconds = last.rest_seconds;
            }
            let mut sets = e.sets.clone();
            sets.push(next);
            Some(ExerciseInWorkout { sets, ..e.clone() })
        })
        .ok_or_else(|| Error::NotFound(format!("exercise '{}'", exercise_id)))?;

    repo.update_workout(&updated)?;
    Ok(updated)
}

/// Remove a set; an exercise always keeps at least one
pub fn remove_set<R: WorkoutRepository + ?Sized>(
    repo: &mut R,
    workout_id: Uuid,
    exercise_id: &str,
    set_id: Uuid,
) -> Result<Workout> {
    let workout = load_workout(repo, workout_id)?;
    let entry = require_exercise(&workout, exercise_id)?;
    if entry.find_set(set_id).is_none() {
        return Err(Error::NotFound(format!(
            "set {} of exercise '{}'",
            set_id, exercise_id
        )));
    }
    if entry.sets.len() == 1 {
        return Err(Error::InvalidState(format!(
            "'{}' needs at least one set",
            entry.exercise.name
        )));
    }

    let updated = workout
        .with_exercise(exercise_id, |e| {
            Some(ExerciseInWorkout {
                sets: e.sets.iter().filter(|s| s.id != set_id).cloned().collect(),
                ..e.clone()
            })
        })
        .ok_or_else(|| Error::NotFound(format!("exercise '{}'", exercise_id)))?;

    repo.update_workout(&updated)?;
    Ok(updated)
}

/// Append an exercise with default empty sets
pub fn add_exercise_to_workout<R: WorkoutRepository + ?Sized>(
    repo: &mut R,
    workout_id: Uuid,
    exercise_id: &str,
) -> Result<Workout> {
    let workout = load_workout(repo, workout_id)?;
    if !workout.is_active() {
        return Err(Error::InvalidState(format!(
            "workout '{}' is already finished",
            workout.name
        )));
    }
    if workout.find_exercise(exercise_id).is_some() {
        return Err(Error::InvalidArgument(format!(
            "'{}' is already part of this workout",
            exercise_id
        )));
    }
    let exercise = repo
        .get_exercise_by_id(exercise_id)?
        .ok_or_else(|| Error::NotFound(format!("exercise '{}'", exercise_id)))?;

    let mut updated = workout.clone();
    updated.exercises.push(ExerciseInWorkout {
        sets: default_sets(&exercise),
        order: workout.next_order(),
        exercise,
    });

    repo.update_workout(&updated)?;
    Ok(updated)
}

// ============================================================================
// Library and templates
// ============================================================================

/// Validate and store a user-defined exercise
pub fn add_custom_exercise<R: WorkoutRepository + ?Sized>(
    repo: &mut R,
    draft: &CustomExerciseDraft,
) -> Result<Exercise> {
    let name = draft.name.trim();
    if name.is_empty() {
        return Err(Error::InvalidArgument("exercise name is blank".into()));
    }
    let muscle_groups: Vec<String> = draft
        .muscle_groups
        .iter()
        .map(|g| g.trim().to_lowercase())
        .filter(|g| !g.is_empty())
        .collect();
    if muscle_groups.is_empty() {
        return Err(Error::InvalidArgument(
            "exercise needs at least one muscle group".into(),
        ));
    }
    let duplicate = repo
        .get_all_exercises()?
        .into_iter()
        .any(|e| e.name.eq_ignore_ascii_case(name));
    if duplicate {
        return Err(Error::InvalidArgument(format!(
            "an exercise named '{}' already exists",
            name
        )));
    }

    let exercise = Exercise {
        id: format!("custom_{}", Uuid::new_v4().simple()),
        name: name.to_string(),
        muscle_groups,
        instructions: draft.instructions.trim().to_string(),
        equipment: draft.equipment.trim().to_string(),
        is_custom: true,
        is_bodyweight: draft.is_bodyweight,
        default_rest_seconds: draft.default_rest_seconds,
    };
    repo.save_custom_exercise(&exercise)?;
    tracing::info!("Added custom exercise '{}' ({})", exercise.name, exercise.id);
    Ok(exercise)
}

/// Save an exercise selection for reuse
pub fn save_template<R: WorkoutRepository + ?Sized>(
    repo: &mut R,
    name: &str,
    exercise_ids: &[String],
    description: Option<&str>,
    now: DateTime<Utc>,
) -> Result<WorkoutTemplate> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::InvalidArgument("template name is blank".into()));
    }
    if exercise_ids.is_empty() {
        return Err(Error::InvalidArgument(
            "select at least one exercise".into(),
        ));
    }
    reject_duplicates(exercise_ids.iter().map(String::as_str))?;
    for id in exercise_ids {
        if repo.get_exercise_by_id(id)?.is_none() {
            return Err(Error::NotFound(format!("exercise '{}'", id)));
        }
    }

    let template = WorkoutTemplate {
        id: Uuid::new_v4(),
        name: name.to_string(),
        exercise_ids: exercise_ids.to_vec(),
        description: description
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(String::from),
        created_at: now,
    };
    repo.save_template(&template)?;
    tracing::info!("Saved template '{}'", template.name);
    Ok(template)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryRepository;
    use chrono::Duration;

    fn repo() -> MemoryRepository {
        crate::logging::init_test();
        MemoryRepository::with_default_catalog()
    }

    fn exercises(repo: &MemoryRepository, ids: &[&str]) -> Vec<Exercise> {
        ids.iter()
            .map(|id| repo.get_exercise_by_id(id).unwrap().unwrap())
            .collect()
    }

    fn first_set(workout: &Workout, exercise_id: &str) -> Uuid {
        workout.find_exercise(exercise_id).unwrap().sets[0].id
    }

    #[test]
    fn test_create_rejects_empty_selection() {
        let mut repo = repo();
        let result = create_workout(&mut repo, "Legs", &[], Utc::now());
        assert!(matches!(result, Err(Error::InvalidArgument(_))));
        assert!(repo.get_all_workouts().unwrap().is_empty());
    }

    #[test]
    fn test_create_rejects_blank_name() {
        let mut repo = repo();
        let selection = exercises(&repo, &["back_squat"]);
        let result = create_workout(&mut repo, "   ", &selection, Utc::now());
        assert!(matches!(result, Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn test_create_builds_default_sets() {
        let mut repo = repo();
        let selection = exercises(&repo, &["bench_press", "pull_up"]);
        let workout = create_workout(&mut repo, " Push ", &selection, Utc::now()).unwrap();

        assert_eq!(workout.name, "Push");
        assert!(workout.is_active());
        assert_eq!(workout.exercises.len(), 2);
        for (idx, entry) in workout.exercises.iter().enumerate() {
            assert_eq!(entry.order, idx as u32);
            assert_eq!(entry.sets.len(), DEFAULT_SETS_PER_EXERCISE);
            assert!(entry.sets.iter().all(|s| !s.completed && s.completed_at.is_none()));
            assert!(entry.sets.iter().all(|s| s.reps == 0 && s.weight_kg == 0.0));
        }
        assert_eq!(repo.get_active_workout().unwrap(), Some(workout));
    }

    #[test]
    fn test_create_while_active_conflicts() {
        let mut repo = repo();
        let selection = exercises(&repo, &["deadlift"]);
        create_workout(&mut repo, "First", &selection, Utc::now()).unwrap();

        let result = create_workout(&mut repo, "Second", &selection, Utc::now());
        assert!(matches!(result, Err(Error::InvalidState(_))));
        assert_eq!(repo.get_all_workouts().unwrap().len(), 1);
    }

    #[test]
    fn test_create_rejects_duplicate_exercises() {
        let mut repo = repo();
        let selection = exercises(&repo, &["bench_press", "pull_up", "bench_press"]);
        let result = create_workout(&mut repo, "Push", &selection, Utc::now());
        assert!(matches!(result, Err(Error::InvalidArgument(_))));
        assert!(repo.get_all_workouts().unwrap().is_empty());
    }

    #[test]
    fn test_new_workout_allowed_after_finish() {
        let mut repo = repo();
        let selection = exercises(&repo, &["deadlift"]);
        let first = create_workout(&mut repo, "First", &selection, Utc::now()).unwrap();
        finish_workout(&mut repo, first.id, Utc::now()).unwrap();

        let second = create_workout(&mut repo, "Second", &selection, Utc::now()).unwrap();
        assert_eq!(repo.get_active_workout().unwrap().unwrap().id, second.id);
    }

    #[test]
    fn test_update_applies_only_given_fields() {
        let mut repo = repo();
        let selection = exercises(&repo, &["bench_press"]);
        let workout = create_workout(&mut repo, "Push", &selection, Utc::now()).unwrap();
        let set_id = first_set(&workout, "bench_press");

        let update = SetUpdate {
            reps: Some(8),
            weight_kg: Some(60.0),
            completed: None,
        };
        update_workout_set(&mut repo, workout.id, "bench_press", set_id, &update, Utc::now())
            .unwrap();

        let update = SetUpdate {
            reps: Some(6),
            ..SetUpdate::default()
        };
        let updated =
            update_workout_set(&mut repo, workout.id, "bench_press", set_id, &update, Utc::now())
                .unwrap();

        let set = updated.find_exercise("bench_press").unwrap().find_set(set_id).unwrap();
        assert_eq!(set.reps, 6);
        assert_eq!(set.weight_kg, 60.0);
        assert!(!set.completed);
        assert_eq!(repo.get_workout(workout.id).unwrap(), Some(updated));
    }

    #[test]
    fn test_completion_stamps_and_clears_timestamp() {
        let mut repo = repo();
        let selection = exercises(&repo, &["pull_up"]);
        let started = Utc::now();
        let workout = create_workout(&mut repo, "Pull", &selection, started).unwrap();
        let set_id = first_set(&workout, "pull_up");

        let done = SetUpdate {
            completed: Some(true),
            ..SetUpdate::default()
        };
        let t1 = started + Duration::minutes(5);
        let w = update_workout_set(&mut repo, workout.id, "pull_up", set_id, &done, t1).unwrap();
        let set = w.exercises[0].find_set(set_id).unwrap();
        assert!(set.completed);
        assert_eq!(set.completed_at, Some(t1));

        // Completing again is idempotent
        let t2 = t1 + Duration::minutes(1);
        let w = update_workout_set(&mut repo, workout.id, "pull_up", set_id, &done, t2).unwrap();
        assert_eq!(w.exercises[0].find_set(set_id).unwrap().completed_at, Some(t1));

        let undo = SetUpdate {
            completed: Some(false),
            ..SetUpdate::default()
        };
        let w = update_workout_set(&mut repo, workout.id, "pull_up", set_id, &undo, t2).unwrap();
        let set = w.exercises[0].find_set(set_id).unwrap();
        assert!(!set.completed);
        assert!(set.completed_at.is_none());
    }

    #[test]
    fn test_update_not_found_cases() {
        let mut repo = repo();
        let selection = exercises(&repo, &["bench_press"]);
        let workout = create_workout(&mut repo, "Push", &selection, Utc::now()).unwrap();
        let set_id = first_set(&workout, "bench_press");
        let update = SetUpdate {
            reps: Some(5),
            ..SetUpdate::default()
        };
        let now = Utc::now();

        for result in [
            update_workout_set(&mut repo, Uuid::new_v4(), "bench_press", set_id, &update, now),
            update_workout_set(&mut repo, workout.id, "deadlift", set_id, &update, now),
            update_workout_set(&mut repo, workout.id, "bench_press", Uuid::new_v4(), &update, now),
        ] {
            assert!(matches!(result, Err(Error::NotFound(_))), "{:?}", result);
        }
        assert_eq!(repo.get_workout(workout.id).unwrap(), Some(workout));
    }

    #[test]
    fn test_update_rejects_negative_weight() {
        let mut repo = repo();
        let selection = exercises(&repo, &["bench_press"]);
        let workout = create_workout(&mut repo, "Push", &selection, Utc::now()).unwrap();
        let set_id = first_set(&workout, "bench_press");

        for bad in [-1.0, f64::NAN] {
            let update = SetUpdate {
                weight_kg: Some(bad),
                ..SetUpdate::default()
            };
            let result =
                update_workout_set(&mut repo, workout.id, "bench_press", set_id, &update, Utc::now());
            assert!(matches!(result, Err(Error::InvalidArgument(_))));
        }
    }

    #[test]
    fn test_finish_workout() {
        let mut repo = repo();
        let selection = exercises(&repo, &["bench_press"]);
        let started = Utc::now();
        let workout = create_workout(&mut repo, "Push", &selection, started).unwrap();

        let end = started + Duration::minutes(50);
        let finished = finish_workout(&mut repo, workout.id, end).unwrap();
        assert_eq!(finished.finished_at, Some(end));
        assert!(!finished.is_active());
        assert_eq!(finished.duration(), Some(Duration::minutes(50)));
        assert!(repo.get_active_workout().unwrap().is_none());

        let again = finish_workout(&mut repo, workout.id, end);
        assert!(matches!(again, Err(Error::InvalidState(_))));

        let missing = finish_workout(&mut repo, Uuid::new_v4(), end);
        assert!(matches!(missing, Err(Error::NotFound(_))));
    }

    #[test]
    fn test_volume_scenario() {
        let mut repo = repo();
        let selection = exercises(&repo, &["bench_press", "barbell_row"]);
        let workout = create_workout(&mut repo, "Upper", &selection, Utc::now()).unwrap();

        let update = SetUpdate {
            reps: Some(10),
            weight_kg: Some(20.0),
            completed: Some(true),
        };
        let targets: Vec<(String, Uuid)> = workout
            .exercises
            .iter()
            .flat_map(|e| e.sets.iter().take(2).map(move |s| (e.exercise.id.clone(), s.id)))
            .collect();
        assert_eq!(targets.len(), 4);

        let mut latest = workout.clone();
        for (exercise_id, set_id) in &targets {
            latest = update_workout_set(
                &mut repo,
                workout.id,
                exercise_id,
                *set_id,
                &update,
                Utc::now(),
            )
            .unwrap();
        }

        assert_eq!(latest.total_sets(), 6);
        assert_eq!(latest.performed_sets(), 4);
        assert_eq!(latest.total_volume(), 800.0);
    }

    #[test]
    fn test_add_and_remove_sets() {
        let mut repo = repo();
        let selection = exercises(&repo, &["dip"]);
        let workout = create_workout(&mut repo, "Dips", &selection, Utc::now()).unwrap();
        let last = workout.exercises[0].sets[2].id;
        let update = SetUpdate {
            reps: Some(12),
            weight_kg: Some(5.0),
            completed: None,
        };
        update_workout_set(&mut repo, workout.id, "dip", last, &update, Utc::now()).unwrap();

        let grown = add_set(&mut repo, workout.id, "dip").unwrap();
        let sets = &grown.exercises[0].sets;
        assert_eq!(sets.len(), 4);
        assert_eq!(sets[3].reps, 12);
        assert_eq!(sets[3].weight_kg, 5.0);
        assert!(!sets[3].completed);

        let mut current = grown.clone();
        for set in &grown.exercises[0].sets[1..] {
            current = remove_set(&mut repo, workout.id, "dip", set.id).unwrap();
        }
        assert_eq!(current.exercises[0].sets.len(), 1);

        let only = current.exercises[0].sets[0].id;
        let result = remove_set(&mut repo, workout.id, "dip", only);
        assert!(matches!(result, Err(Error::InvalidState(_))));
    }

    #[test]
    fn test_add_exercise_to_workout() {
        let mut repo = repo();
        let selection = exercises(&repo, &["back_squat"]);
        let workout = create_workout(&mut repo, "Legs", &selection, Utc::now()).unwrap();

        let updated = add_exercise_to_workout(&mut repo, workout.id, "leg_press").unwrap();
        let added = updated.find_exercise("leg_press").unwrap();
        assert_eq!(added.order, 1);
        assert_eq!(added.sets.len(), DEFAULT_SETS_PER_EXERCISE);

        assert!(matches!(
            add_exercise_to_workout(&mut repo, workout.id, "leg_press"),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            add_exercise_to_workout(&mut repo, workout.id, "unknown"),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_discard_only_active() {
        let mut repo = repo();
        let selection = exercises(&repo, &["plank"]);
        let workout = create_workout(&mut repo, "Core", &selection, Utc::now()).unwrap();
        discard_workout(&mut repo, workout.id).unwrap();
        assert!(repo.get_workout(workout.id).unwrap().is_none());

        let workout = create_workout(&mut repo, "Core", &selection, Utc::now()).unwrap();
        finish_workout(&mut repo, workout.id, Utc::now()).unwrap();
        assert!(matches!(
            discard_workout(&mut repo, workout.id),
            Err(Error::InvalidState(_))
        ));
    }

    #[test]
    fn test_custom_exercise_validation() {
        let mut repo = repo();
        let blank = CustomExerciseDraft {
            name: " ".into(),
            muscle_groups: vec!["glutes".into()],
            ..CustomExerciseDraft::default()
        };
        assert!(matches!(
            add_custom_exercise(&mut repo, &blank),
            Err(Error::InvalidArgument(_))
        ));

        let duplicate = CustomExerciseDraft {
            name: "pull-up".into(),
            muscle_groups: vec!["back".into()],
            ..CustomExerciseDraft::default()
        };
        assert!(matches!(
            add_custom_exercise(&mut repo, &duplicate),
            Err(Error::InvalidArgument(_))
        ));

        let draft = CustomExerciseDraft {
            name: "Ring Row".into(),
            muscle_groups: vec![" Back ".into(), "".into()],
            equipment: "rings".into(),
            is_bodyweight: true,
            default_rest_seconds: 75,
            ..CustomExerciseDraft::default()
        };
        let exercise = add_custom_exercise(&mut repo, &draft).unwrap();
        assert!(exercise.is_custom);
        assert!(exercise.id.starts_with("custom_"));
        assert_eq!(exercise.muscle_groups, vec!["back"]);
        assert_eq!(repo.get_exercise_by_id(&exercise.id).unwrap(), Some(exercise));
    }

    #[test]
    fn test_template_to_workout() {
        let mut repo = repo();
        let ids = vec!["pull_up".to_string(), "barbell_row".to_string()];
        let template = save_template(&mut repo, "Pull Day", &ids, Some("  "), Utc::now()).unwrap();
        assert!(template.description.is_none());

        let workout = create_workout_from_template(&mut repo, template.id, Utc::now()).unwrap();
        assert_eq!(workout.name, "Pull Day");
        let ordered: Vec<_> = workout.exercises.iter().map(|e| e.exercise.id.clone()).collect();
        assert_eq!(ordered, ids);

        assert!(matches!(
            create_workout_from_template(&mut repo, Uuid::new_v4(), Utc::now()),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_template_validation() {
        let mut repo = repo();
        assert!(matches!(
            save_template(&mut repo, "Empty", &[], None, Utc::now()),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            save_template(&mut repo, "Bad", &["nope".to_string()], None, Utc::now()),
            Err(Error::NotFound(_))
        ));
        let twice = vec!["dip".to_string(), "dip".to_string()];
        assert!(matches!(
            save_template(&mut repo, "Dips", &twice, None, Utc::now()),
            Err(Error::InvalidArgument(_))
        ));
        assert!(repo.get_all_templates().unwrap().is_empty());
    }
}
