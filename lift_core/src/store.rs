//! SQLite storage for exercises, workouts and templates.
//!
//! List-typed columns (muscle groups, template exercise ids) are stored as
//! JSON text. Timestamps are whole epoch seconds. Sets are stored one row
//! each and regrouped into exercises by `order_in_workout` on load.

use crate::{
    catalog, Error, Exercise, ExerciseInWorkout, Result, Workout, WorkoutRepository, WorkoutSet,
    WorkoutTemplate,
};
use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row, ToSql};
use std::path::Path;
use std::time::Duration;
use uuid::Uuid;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS exercise (
    id TEXT PRIMARY KEY NOT NULL,
    name TEXT NOT NULL,
    muscle_groups TEXT NOT NULL,
    instructions TEXT NOT NULL,
    equipment_needed TEXT NOT NULL,
    is_custom INTEGER NOT NULL,
    default_rest_time_seconds INTEGER NOT NULL
);
CREATE TABLE IF NOT EXISTS workout (
    id TEXT PRIMARY KEY NOT NULL,
    name TEXT NOT NULL,
    started_at INTEGER NOT NULL,
    finished_at INTEGER,
    notes TEXT
);
CREATE TABLE IF NOT EXISTS workout_set (
    id TEXT PRIMARY KEY NOT NULL,
    workout_id TEXT NOT NULL,
    exercise_id TEXT NOT NULL,
    order_in_workout INTEGER NOT NULL,
    set_number INTEGER NOT NULL,
    reps INTEGER NOT NULL,
    weight_kg REAL NOT NULL,
    rest_time_seconds INTEGER NOT NULL,
    completed INTEGER NOT NULL,
    completed_at INTEGER,
    notes TEXT
);
CREATE INDEX IF NOT EXISTS idx_workout_set_workout ON workout_set (workout_id);
CREATE TABLE IF NOT EXISTS template (
    id TEXT PRIMARY KEY NOT NULL,
    name TEXT NOT NULL,
    exercise_ids TEXT NOT NULL,
    created_at INTEGER NOT NULL,
    description TEXT
);
";

const EXERCISE_COLUMNS: &str = "id, name, muscle_groups, instructions, equipment_needed, \
     is_custom, is_bodyweight, default_rest_time_seconds";

const WORKOUT_COLUMNS: &str = "id, name, started_at, finished_at, notes";

const TEMPLATE_COLUMNS: &str = "id, name, exercise_ids, created_at, description";

/// How long a write waits on another process's lock before failing
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Repository backed by a local SQLite database
pub struct SqliteRepository {
    conn: Connection,
}

impl SqliteRepository {
    /// Open or create the database at `path`
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        tracing::debug!("Opened workout database at {:?}", path);
        Self::init(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA)?;
        let repo = Self { conn };
        repo.migrate()?;
        repo.seed_catalog()?;
        Ok(repo)
    }

    /// Add columns introduced after the first schema
    fn migrate(&self) -> Result<()> {
        let has_bodyweight = self
            .conn
            .prepare("SELECT is_bodyweight FROM exercise LIMIT 1")
            .is_ok();
        if !has_bodyweight {
            self.conn.execute(
                "ALTER TABLE exercise ADD COLUMN is_bodyweight INTEGER NOT NULL DEFAULT 0",
                [],
            )?;

            // Built-in rows predating the column take the catalog's flag
            let mut stmt = self.conn.prepare(
                "UPDATE exercise SET is_bodyweight = 1 WHERE id = ?1 AND is_custom = 0",
            )?;
            let mut flagged = 0;
            for exercise in catalog::default_exercises().iter().filter(|e| e.is_bodyweight) {
                flagged += stmt.execute(params![exercise.id])?;
            }
            tracing::info!(
                "Migrated exercise table: added is_bodyweight ({} built-in rows flagged)",
                flagged
            );
        }
        Ok(())
    }

    fn seed_catalog(&self) -> Result<()> {
        let mut inserted = 0;
        for exercise in catalog::default_exercises() {
            inserted += self.conn.execute(
                &format!(
                    "INSERT OR IGNORE INTO exercise ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                    EXERCISE_COLUMNS
                ),
                params_from_iter(exercise_params(exercise)?),
            )?;
        }
        if inserted > 0 {
            tracing::debug!("Seeded {} catalog exercises", inserted);
        }
        Ok(())
    }

    /// Look up an exercise referenced by a stored set
    ///
    /// Sets may outlive a deleted custom exercise; those load against a
    /// placeholder so the workout history stays readable.
    fn resolve_exercise(&self, id: &str) -> Result<Exercise> {
        if let Some(exercise) = self.get_exercise_by_id(id)? {
            return Ok(exercise);
        }
        tracing::warn!("Workout references missing exercise '{}'", id);
        Ok(Exercise {
            id: id.to_string(),
            name: format!("Deleted exercise ({})", id),
            muscle_groups: Vec::new(),
            instructions: String::new(),
            equipment: String::new(),
            is_custom: true,
            is_bodyweight: false,
            default_rest_seconds: 0,
        })
    }

    fn load_workout(&self, head: WorkoutHead) -> Result<Workout> {
        let mut stmt = self.conn.prepare(
            "SELECT id, exercise_id, order_in_workout, reps, weight_kg, rest_time_seconds, \
             completed, completed_at, notes \
             FROM workout_set WHERE workout_id = ?1 \
             ORDER BY order_in_workout, set_number",
        )?;
        let rows = stmt
            .query_map(params![head.id.to_string()], |row| {
                let set = WorkoutSet {
                    id: uuid_at(row, 0)?,
                    reps: row.get(3)?,
                    weight_kg: row.get(4)?,
                    rest_seconds: row.get(5)?,
                    completed: row.get(6)?,
                    completed_at: opt_time_at(row, 7)?,
                    notes: row.get(8)?,
                };
                Ok((row.get::<_, String>(1)?, row.get::<_, u32>(2)?, set))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut exercises: Vec<ExerciseInWorkout> = Vec::new();
        for (exercise_id, order, set) in rows {
            match exercises.last_mut() {
                Some(current) if current.order == order => current.sets.push(set),
                _ => exercises.push(ExerciseInWorkout {
                    exercise: self.resolve_exercise(&exercise_id)?,
                    sets: vec![set],
                    order,
                }),
            }
        }

        Ok(Workout {
            id: head.id,
            name: head.name,
            started_at: head.started_at,
            finished_at: head.finished_at,
            exercises,
            notes: head.notes,
        })
    }

    fn query_heads(&self, sql: &str) -> Result<Vec<WorkoutHead>> {
        let mut stmt = self.conn.prepare(sql)?;
        let heads = stmt
            .query_map([], WorkoutHead::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(heads)
    }
}

/// Insert every set row of `workout`
fn insert_sets(conn: &Connection, workout: &Workout) -> Result<()> {
    let mut stmt = conn.prepare(
        "INSERT INTO workout_set (id, workout_id, exercise_id, order_in_workout, set_number, \
         reps, weight_kg, rest_time_seconds, completed, completed_at, notes) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
    )?;
    for entry in &workout.exercises {
        for (number, set) in entry.sets.iter().enumerate() {
            stmt.execute(params![
                set.id.to_string(),
                workout.id.to_string(),
                entry.exercise.id,
                entry.order,
                number as u32 + 1,
                set.reps,
                set.weight_kg,
                set.rest_seconds,
                set.completed,
                set.completed_at.map(|t| t.timestamp()),
                set.notes,
            ])?;
        }
    }
    Ok(())
}

fn exercise_params(exercise: &Exercise) -> Result<Vec<Box<dyn ToSql>>> {
    Ok(vec![
        Box::new(exercise.id.clone()),
        Box::new(exercise.name.clone()),
        Box::new(serde_json::to_string(&exercise.muscle_groups)?),
        Box::new(exercise.instructions.clone()),
        Box::new(exercise.equipment.clone()),
        Box::new(exercise.is_custom),
        Box::new(exercise.is_bodyweight),
        Box::new(exercise.default_rest_seconds),
    ])
}

// ============================================================================
// Row mapping
// ============================================================================

fn uuid_at(row: &Row, idx: usize) -> rusqlite::Result<Uuid> {
    let text: String = row.get(idx)?;
    Uuid::parse_str(&text)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn time_at(row: &Row, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let secs: i64 = row.get(idx)?;
    DateTime::<Utc>::from_timestamp(secs, 0).ok_or(rusqlite::Error::IntegralValueOutOfRange(idx, secs))
}

fn opt_time_at(row: &Row, idx: usize) -> rusqlite::Result<Option<DateTime<Utc>>> {
    match row.get::<_, Option<i64>>(idx)? {
        Some(secs) => DateTime::<Utc>::from_timestamp(secs, 0)
            .map(Some)
            .ok_or(rusqlite::Error::IntegralValueOutOfRange(idx, secs)),
        None => Ok(None),
    }
}

/// Exercise row as stored, before JSON columns are decoded
struct ExerciseRow {
    id: String,
    name: String,
    muscle_groups: String,
    instructions: String,
    equipment_needed: String,
    is_custom: bool,
    is_bodyweight: bool,
    default_rest_time_seconds: u32,
}

impl ExerciseRow {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            muscle_groups: row.get(2)?,
            instructions: row.get(3)?,
            equipment_needed: row.get(4)?,
            is_custom: row.get(5)?,
            is_bodyweight: row.get(6)?,
            default_rest_time_seconds: row.get(7)?,
        })
    }
}

impl TryFrom<ExerciseRow> for Exercise {
    type Error = Error;

    fn try_from(row: ExerciseRow) -> Result<Self> {
        Ok(Exercise {
            muscle_groups: serde_json::from_str(&row.muscle_groups)?,
            id: row.id,
            name: row.name,
            instructions: row.instructions,
            equipment: row.equipment_needed,
            is_custom: row.is_custom,
            is_bodyweight: row.is_bodyweight,
            default_rest_seconds: row.default_rest_time_seconds,
        })
    }
}

/// Workout row without its sets
struct WorkoutHead {
    id: Uuid,
    name: String,
    started_at: DateTime<Utc>,
    finished_at: Option<DateTime<Utc>>,
    notes: Option<String>,
}

impl WorkoutHead {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: uuid_at(row, 0)?,
            name: row.get(1)?,
            started_at: time_at(row, 2)?,
            finished_at: opt_time_at(row, 3)?,
            notes: row.get(4)?,
        })
    }
}

/// Template row as stored, before JSON columns are decoded
struct TemplateRow {
    id: Uuid,
    name: String,
    exercise_ids: String,
    created_at: DateTime<Utc>,
    description: Option<String>,
}

impl TemplateRow {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: uuid_at(row, 0)?,
            name: row.get(1)?,
            exercise_ids: row.get(2)?,
            created_at: time_at(row, 3)?,
            description: row.get(4)?,
        })
    }
}

impl TryFrom<TemplateRow> for WorkoutTemplate {
    type Error = Error;

    fn try_from(row: TemplateRow) -> Result<Self> {
        Ok(WorkoutTemplate {
            exercise_ids: serde_json::from_str(&row.exercise_ids)?,
            id: row.id,
            name: row.name,
            created_at: row.created_at,
            description: row.description,
        })
    }
}

// ============================================================================
// Repository implementation
// ============================================================================

impl WorkoutRepository for SqliteRepository {
    fn get_all_exercises(&self) -> Result<Vec<Exercise>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM exercise ORDER BY name",
            EXERCISE_COLUMNS
        ))?;
        let rows = stmt
            .query_map([], ExerciseRow::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        rows.into_iter().map(Exercise::try_from).collect()
    }

    fn get_exercise_by_id(&self, id: &str) -> Result<Option<Exercise>> {
        let row = self
            .conn
            .query_row(
                &format!("SELECT {} FROM exercise WHERE id = ?1", EXERCISE_COLUMNS),
                params![id],
                ExerciseRow::from_row,
            )
            .optional()?;
        row.map(Exercise::try_from).transpose()
    }

    fn save_custom_exercise(&mut self, exercise: &Exercise) -> Result<()> {
        let existing: Option<bool> = self
            .conn
            .query_row(
                "SELECT is_custom FROM exercise WHERE id = ?1",
                params![exercise.id],
                |row| row.get(0),
            )
            .optional()?;
        if existing == Some(false) {
            return Err(Error::InvalidArgument(format!(
                "'{}' is a built-in exercise",
                exercise.id
            )));
        }

        self.conn.execute(
            &format!(
                "INSERT OR REPLACE INTO exercise ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                EXERCISE_COLUMNS
            ),
            params_from_iter(exercise_params(exercise)?),
        )?;
        tracing::debug!("Saved custom exercise {}", exercise.id);
        Ok(())
    }

    fn delete_custom_exercise(&mut self, id: &str) -> Result<()> {
        let is_custom: Option<bool> = self
            .conn
            .query_row(
                "SELECT is_custom FROM exercise WHERE id = ?1",
                params![id],
                |row| row.get(0),
            )
            .optional()?;
        match is_custom {
            None => Err(Error::NotFound(format!("exercise '{}'", id))),
            Some(false) => Err(Error::InvalidArgument(format!(
                "'{}' is a built-in exercise",
                id
            ))),
            Some(true) => {
                self.conn
                    .execute("DELETE FROM exercise WHERE id = ?1", params![id])?;
                tracing::debug!("Deleted custom exercise {}", id);
                Ok(())
            }
        }
    }

    fn save_workout(&mut self, workout: &Workout) -> Result<()> {
        let tx = self.conn.transaction()?;
        tx.execute(
            &format!(
                "INSERT INTO workout ({}) VALUES (?1, ?2, ?3, ?4, ?5)",
                WORKOUT_COLUMNS
            ),
            params![
                workout.id.to_string(),
                workout.name,
                workout.started_at.timestamp(),
                workout.finished_at.map(|t| t.timestamp()),
                workout.notes,
            ],
        )?;
        insert_sets(&tx, workout)?;
        tx.commit()?;
        tracing::debug!("Saved workout {}", workout.id);
        Ok(())
    }

    fn get_workout(&self, id: Uuid) -> Result<Option<Workout>> {
        let head = self
            .conn
            .query_row(
                &format!("SELECT {} FROM workout WHERE id = ?1", WORKOUT_COLUMNS),
                params![id.to_string()],
                WorkoutHead::from_row,
            )
            .optional()?;
        head.map(|h| self.load_workout(h)).transpose()
    }

    fn get_active_workout(&self) -> Result<Option<Workout>> {
        let head = self
            .conn
            .query_row(
                &format!(
                    "SELECT {} FROM workout WHERE finished_at IS NULL \
                     ORDER BY started_at DESC LIMIT 1",
                    WORKOUT_COLUMNS
                ),
                [],
                WorkoutHead::from_row,
            )
            .optional()?;
        head.map(|h| self.load_workout(h)).transpose()
    }

    fn get_all_workouts(&self) -> Result<Vec<Workout>> {
        let heads = self.query_heads(&format!(
            "SELECT {} FROM workout ORDER BY started_at DESC",
            WORKOUT_COLUMNS
        ))?;
        heads.into_iter().map(|h| self.load_workout(h)).collect()
    }

    fn update_workout(&mut self, workout: &Workout) -> Result<()> {
        let tx = self.conn.transaction()?;
        let changed = tx.execute(
            "UPDATE workout SET name = ?2, started_at = ?3, finished_at = ?4, notes = ?5 \
             WHERE id = ?1",
            params![
                workout.id.to_string(),
                workout.name,
                workout.started_at.timestamp(),
                workout.finished_at.map(|t| t.timestamp()),
                workout.notes,
            ],
        )?;
        if changed == 0 {
            return Err(Error::NotFound(format!("workout {}", workout.id)));
        }
        tx.execute(
            "DELETE FROM workout_set WHERE workout_id = ?1",
            params![workout.id.to_string()],
        )?;
        insert_sets(&tx, workout)?;
        tx.commit()?;
        tracing::debug!("Replaced workout {}", workout.id);
        Ok(())
    }

    fn delete_workout(&mut self, id: Uuid) -> Result<()> {
        let tx = self.conn.transaction()?;
        tx.execute(
            "DELETE FROM workout_set WHERE workout_id = ?1",
            params![id.to_string()],
        )?;
        tx.execute("DELETE FROM workout WHERE id = ?1", params![id.to_string()])?;
        tx.commit()?;
        tracing::debug!("Deleted workout {}", id);
        Ok(())
    }

    fn save_template(&mut self, template: &WorkoutTemplate) -> Result<()> {
        self.conn.execute(
            &format!(
                "INSERT OR REPLACE INTO template ({}) VALUES (?1, ?2, ?3, ?4, ?5)",
                TEMPLATE_COLUMNS
            ),
            params![
                template.id.to_string(),
                template.name,
                serde_json::to_string(&template.exercise_ids)?,
                template.created_at.timestamp(),
                template.description,
            ],
        )?;
        Ok(())
    }

    fn get_template(&self, id: Uuid) -> Result<Option<WorkoutTemplate>> {
        let row = self
            .conn
            .query_row(
                &format!("SELECT {} FROM template WHERE id = ?1", TEMPLATE_COLUMNS),
                params![id.to_string()],
                TemplateRow::from_row,
            )
            .optional()?;
        row.map(WorkoutTemplate::try_from).transpose()
    }

    fn get_all_templates(&self) -> Result<Vec<WorkoutTemplate>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM template ORDER BY created_at DESC",
            TEMPLATE_COLUMNS
        ))?;
        let rows = stmt
            .query_map([], TemplateRow::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        rows.into_iter().map(WorkoutTemplate::try_from).collect()
    }

    fn delete_template(&mut self, id: Uuid) -> Result<()> {
        self.conn
            .execute("DELETE FROM template WHERE id = ?1", params![id.to_string()])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    fn sample_workout(repo: &SqliteRepository, started: i64) -> Workout {
        let bench = repo.get_exercise_by_id("bench_press").unwrap().unwrap();
        let pull_up = repo.get_exercise_by_id("pull_up").unwrap().unwrap();
        let done = WorkoutSet {
            reps: 10,
            weight_kg: 62.5,
            completed: true,
            completed_at: Some(at(started + 300)),
            notes: Some("felt easy".into()),
            ..WorkoutSet::empty(120)
        };

        Workout {
            id: Uuid::new_v4(),
            name: "Upper".into(),
            started_at: at(started),
            finished_at: None,
            exercises: vec![
                ExerciseInWorkout {
                    exercise: bench,
                    sets: vec![done, WorkoutSet::empty(120)],
                    order: 0,
                },
                ExerciseInWorkout {
                    exercise: pull_up,
                    sets: vec![WorkoutSet::empty(120)],
                    order: 1,
                },
            ],
            notes: None,
        }
    }

    #[test]
    fn test_catalog_seeded_once() {
        let temp_dir = tempfile::tempdir().unwrap();
        let db_path = temp_dir.path().join("lift.db");

        let first = SqliteRepository::open(&db_path).unwrap();
        let count = first.get_all_exercises().unwrap().len();
        assert_eq!(count, catalog::default_exercises().len());
        drop(first);

        let second = SqliteRepository::open(&db_path).unwrap();
        assert_eq!(second.get_all_exercises().unwrap().len(), count);

        let pull_up = second.get_exercise_by_id("pull_up").unwrap().unwrap();
        assert!(pull_up.is_bodyweight);
        assert_eq!(pull_up.muscle_groups, vec!["back", "biceps"]);
    }

    #[test]
    fn test_workout_roundtrip() {
        let mut repo = SqliteRepository::open_in_memory().unwrap();
        let workout = sample_workout(&repo, 1_700_000_000);

        repo.save_workout(&workout).unwrap();
        let loaded = repo.get_workout(workout.id).unwrap().unwrap();

        assert_eq!(loaded, workout);
        assert!(repo.get_workout(Uuid::new_v4()).unwrap().is_none());
    }

    #[test]
    fn test_active_workout_query() {
        let mut repo = SqliteRepository::open_in_memory().unwrap();
        assert!(repo.get_active_workout().unwrap().is_none());

        let mut finished = sample_workout(&repo, 1_700_000_000);
        finished.finished_at = Some(at(1_700_003_600));
        repo.save_workout(&finished).unwrap();
        assert!(repo.get_active_workout().unwrap().is_none());

        let active = sample_workout(&repo, 1_700_100_000);
        repo.save_workout(&active).unwrap();
        assert_eq!(repo.get_active_workout().unwrap().unwrap().id, active.id);

        let all = repo.get_all_workouts().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, active.id);
    }

    #[test]
    fn test_update_replaces_all_sets() {
        let mut repo = SqliteRepository::open_in_memory().unwrap();
        let workout = sample_workout(&repo, 1_700_000_000);
        repo.save_workout(&workout).unwrap();

        let mut changed = workout.clone();
        changed.exercises[0].sets.truncate(1);
        changed.finished_at = Some(at(1_700_001_000));
        repo.update_workout(&changed).unwrap();

        let loaded = repo.get_workout(workout.id).unwrap().unwrap();
        assert_eq!(loaded.exercises[0].sets.len(), 1);
        assert_eq!(loaded.total_sets(), 2);
        assert_eq!(loaded.finished_at, Some(at(1_700_001_000)));
    }

    #[test]
    fn test_update_missing_workout() {
        let mut repo = SqliteRepository::open_in_memory().unwrap();
        let workout = sample_workout(&repo, 1_700_000_000);
        assert!(matches!(
            repo.update_workout(&workout),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_delete_workout_removes_sets() {
        let mut repo = SqliteRepository::open_in_memory().unwrap();
        let workout = sample_workout(&repo, 1_700_000_000);
        repo.save_workout(&workout).unwrap();

        repo.delete_workout(workout.id).unwrap();
        assert!(repo.get_workout(workout.id).unwrap().is_none());

        let orphans: i64 = repo
            .conn
            .query_row("SELECT COUNT(*) FROM workout_set", [], |row| row.get(0))
            .unwrap();
        assert_eq!(orphans, 0);
    }

    #[test]
    fn test_deleted_custom_exercise_loads_as_placeholder() {
        let mut repo = SqliteRepository::open_in_memory().unwrap();
        let custom = Exercise {
            id: "custom_hip_thrust".into(),
            name: "Hip Thrust".into(),
            muscle_groups: vec!["glutes".into()],
            instructions: String::new(),
            equipment: "barbell".into(),
            is_custom: true,
            is_bodyweight: false,
            default_rest_seconds: 90,
        };
        repo.save_custom_exercise(&custom).unwrap();

        let mut workout = sample_workout(&repo, 1_700_000_000);
        workout.exercises[1].exercise = custom;
        repo.save_workout(&workout).unwrap();
        repo.delete_custom_exercise("custom_hip_thrust").unwrap();

        let loaded = repo.get_workout(workout.id).unwrap().unwrap();
        assert_eq!(loaded.exercises[1].exercise.id, "custom_hip_thrust");
        assert!(loaded.exercises[1].exercise.name.contains("Deleted"));
    }

    #[test]
    fn test_template_roundtrip() {
        let mut repo = SqliteRepository::open_in_memory().unwrap();
        let template = WorkoutTemplate {
            id: Uuid::new_v4(),
            name: "Pull Day".into(),
            exercise_ids: vec!["pull_up".into(), "barbell_row".into()],
            description: Some("Back and biceps".into()),
            created_at: at(1_700_000_000),
        };

        repo.save_template(&template).unwrap();
        assert_eq!(repo.get_template(template.id).unwrap(), Some(template.clone()));
        assert_eq!(repo.get_all_templates().unwrap().len(), 1);

        repo.delete_template(template.id).unwrap();
        assert!(repo.get_template(template.id).unwrap().is_none());
    }

    #[test]
    fn test_write_waits_for_other_connection() {
        let temp_dir = tempfile::tempdir().unwrap();
        let db_path = temp_dir.path().join("workouts.db");
        let mut repo = SqliteRepository::open(&db_path).unwrap();

        let other = Connection::open(&db_path).unwrap();
        other.execute_batch("BEGIN IMMEDIATE").unwrap();
        let holder = std::thread::spawn(move || {
            std::thread::sleep(std::time::Duration::from_millis(200));
            other.execute_batch("COMMIT").unwrap();
        });

        let template = WorkoutTemplate {
            id: Uuid::new_v4(),
            name: "Legs".into(),
            exercise_ids: vec!["back_squat".into()],
            description: None,
            created_at: at(1_700_000_000),
        };
        repo.save_template(&template).unwrap();
        holder.join().unwrap();

        assert_eq!(repo.get_all_templates().unwrap(), vec![template]);
    }

    #[test]
    fn test_migrates_exercise_table_without_bodyweight_column() {
        let temp_dir = tempfile::tempdir().unwrap();
        let db_path = temp_dir.path().join("old.db");

        {
            let conn = Connection::open(&db_path).unwrap();
            conn.execute_batch(
                "CREATE TABLE exercise (
                    id TEXT PRIMARY KEY NOT NULL,
                    name TEXT NOT NULL,
                    muscle_groups TEXT NOT NULL,
                    instructions TEXT NOT NULL,
                    equipment_needed TEXT NOT NULL,
                    is_custom INTEGER NOT NULL,
                    default_rest_time_seconds INTEGER NOT NULL
                );
                INSERT INTO exercise VALUES
                    ('custom_1', 'Sled Push', '[\"quads\"]', '', 'sled', 1, 90),
                    ('pull_up', 'Pull-up', '[\"back\"]', '', 'pull-up bar', 0, 120),
                    ('bench_press', 'Bench Press', '[\"chest\"]', '', 'barbell', 0, 120);",
            )
            .unwrap();
        }

        let repo = SqliteRepository::open(&db_path).unwrap();
        let old = repo.get_exercise_by_id("custom_1").unwrap().unwrap();
        assert!(!old.is_bodyweight);
        assert_eq!(old.muscle_groups, vec!["quads"]);

        let pull_up = repo.get_exercise_by_id("pull_up").unwrap().unwrap();
        assert!(pull_up.is_bodyweight);
        assert_eq!(pull_up.name, "Pull-up");
        assert!(!repo.get_exercise_by_id("bench_press").unwrap().unwrap().is_bodyweight);
        assert!(repo.get_exercise_by_id("dip").unwrap().unwrap().is_bodyweight);

        // Reopening does not migrate again
        drop(repo);
        let repo = SqliteRepository::open(&db_path).unwrap();
        assert!(repo.get_exercise_by_id("pull_up").unwrap().unwrap().is_bodyweight);
    }
}
