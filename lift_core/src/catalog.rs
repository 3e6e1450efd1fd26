//! Default exercise library.
//!
//! This module provides the built-in exercises offered before the user has
//! created any custom ones.

use crate::types::Exercise;
use once_cell::sync::Lazy;
use std::collections::HashSet;

/// Cached default catalog - built once and reused across all operations
static DEFAULT_EXERCISES: Lazy<Vec<Exercise>> = Lazy::new(build_default_exercises);

/// Get a reference to the cached default catalog
pub fn default_exercises() -> &'static [Exercise] {
    &DEFAULT_EXERCISES
}

fn entry(
    id: &str,
    name: &str,
    muscle_groups: &[&str],
    equipment: &str,
    is_bodyweight: bool,
    default_rest_seconds: u32,
    instructions: &str,
) -> Exercise {
    Exercise {
        id: id.into(),
        name: name.into(),
        muscle_groups: muscle_groups.iter().map(|g| g.to_string()).collect(),
        instructions: instructions.into(),
        equipment: equipment.into(),
        is_custom: false,
        is_bodyweight,
        default_rest_seconds,
    }
}

fn build_default_exercises() -> Vec<Exercise> {
    vec![
        // ====================================================================
        // Barbell
        // ====================================================================
        entry(
            "bench_press",
            "Barbell Bench Press",
            &["chest", "triceps", "shoulders"],
            "barbell",
            false,
            120,
            "Lower the bar to mid-chest, press back up to lockout.",
        ),
        entry(
            "back_squat",
            "Barbell Back Squat",
            &["quads", "glutes", "hamstrings"],
            "barbell",
            false,
            180,
            "Bar on upper back, squat to at least parallel, drive up.",
        ),
        entry(
            "deadlift",
            "Deadlift",
            &["hamstrings", "glutes", "back"],
            "barbell",
            false,
            180,
            "Hinge at the hips, keep the bar close, stand tall.",
        ),
        entry(
            "overhead_press",
            "Overhead Press",
            &["shoulders", "triceps"],
            "barbell",
            false,
            120,
            "Press the bar from the front rack to overhead lockout.",
        ),
        entry(
            "barbell_row",
            "Barbell Row",
            &["back", "biceps"],
            "barbell",
            false,
            120,
            "Hinge forward, row the bar to the lower ribs.",
        ),
        // ====================================================================
        // Dumbbell / cable / machine
        // ====================================================================
        entry(
            "dumbbell_curl",
            "Dumbbell Curl",
            &["biceps"],
            "dumbbells",
            false,
            60,
            "Curl with elbows pinned to the sides.",
        ),
        entry(
            "lateral_raise",
            "Dumbbell Lateral Raise",
            &["shoulders"],
            "dumbbells",
            false,
            60,
            "Raise the dumbbells out to shoulder height.",
        ),
        entry(
            "lat_pulldown",
            "Lat Pulldown",
            &["back", "biceps"],
            "cable machine",
            false,
            90,
            "Pull the bar to the upper chest, control the return.",
        ),
        entry(
            "leg_press",
            "Leg Press",
            &["quads", "glutes"],
            "leg press machine",
            false,
            120,
            "Lower the sled until knees reach 90 degrees, press back.",
        ),
        entry(
            "triceps_pushdown",
            "Triceps Pushdown",
            &["triceps"],
            "cable machine",
            false,
            60,
            "Extend the elbows fully, keep upper arms still.",
        ),
        // ====================================================================
        // Bodyweight
        // ====================================================================
        entry(
            "pull_up",
            "Pull-up",
            &["back", "biceps"],
            "pull-up bar",
            true,
            120,
            "Hang with straight arms, pull until the chin clears the bar.",
        ),
        entry(
            "chin_up",
            "Chin-up",
            &["biceps", "back"],
            "pull-up bar",
            true,
            120,
            "Underhand grip, pull until the chin clears the bar.",
        ),
        entry(
            "dip",
            "Parallel Bar Dip",
            &["chest", "triceps", "shoulders"],
            "dip bars",
            true,
            120,
            "Lower until shoulders are below elbows, press back up.",
        ),
        entry(
            "push_up",
            "Push-up",
            &["chest", "triceps"],
            "none",
            true,
            60,
            "Body in a straight line, chest to the floor and back.",
        ),
        entry(
            "plank",
            "Plank",
            &["core"],
            "none",
            true,
            60,
            "Hold a straight line from head to heels on the forearms.",
        ),
    ]
}

/// Validate an exercise list for consistency
///
/// Returns a list of validation errors, or empty Vec if valid.
pub fn validate_exercises(exercises: &[Exercise]) -> Vec<String> {
    let mut errors = Vec::new();
    let mut seen_ids = HashSet::new();
    let mut seen_names = HashSet::new();

    for exercise in exercises {
        if exercise.id.trim().is_empty() {
            errors.push(format!("Exercise '{}' has empty ID", exercise.name));
        } else if !seen_ids.insert(exercise.id.as_str()) {
            errors.push(format!("Duplicate exercise ID '{}'", exercise.id));
        }

        if exercise.name.trim().is_empty() {
            errors.push(format!("Exercise '{}' has empty name", exercise.id));
        } else if !seen_names.insert(exercise.name.to_lowercase()) {
            errors.push(format!("Duplicate exercise name '{}'", exercise.name));
        }

        if exercise.muscle_groups.is_empty() {
            errors.push(format!("Exercise '{}' has no muscle groups", exercise.id));
        }
    }

    errors
}
