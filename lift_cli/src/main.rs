use clap::{Parser, Subcommand};
use lift_core::analytics::{self, WorkoutSummary};
use lift_core::usecases;
use lift_core::*;
use std::path::PathBuf;
use std::process::ExitCode;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "lift")]
#[command(about = "Strength workout tracker", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the exercise library
    Exercises {
        /// Only exercises targeting this muscle group
        #[arg(long)]
        muscle: Option<String>,

        /// Only exercises whose name contains this text
        #[arg(long)]
        search: Option<String>,
    },

    /// Manage custom exercises
    Exercise {
        #[command(subcommand)]
        action: ExerciseAction,
    },

    /// Start a workout from exercise ids or a template
    Start {
        /// Workout name (defaults to today's date)
        #[arg(long)]
        name: Option<String>,

        /// Seed the workout from a saved template
        #[arg(long, conflicts_with = "exercises")]
        template: Option<String>,

        /// Exercise ids in workout order
        exercises: Vec<String>,
    },

    /// Show the workout in progress (default)
    Status,

    /// Update a set of the active workout
    Set {
        /// Exercise id
        exercise: String,

        /// Set number, starting at 1
        number: usize,

        #[arg(long)]
        reps: Option<u32>,

        /// Weight in kg (added weight for bodyweight exercises)
        #[arg(long)]
        weight: Option<String>,

        /// Mark the set as completed
        #[arg(long, conflicts_with = "undo")]
        done: bool,

        /// Mark the set as not completed
        #[arg(long)]
        undo: bool,
    },

    /// Append a set to an exercise of the active workout
    AddSet { exercise: String },

    /// Remove a set from an exercise of the active workout
    RemoveSet { exercise: String, number: usize },

    /// Add an exercise to the active workout
    AddExercise { exercise: String },

    /// Finish the active workout
    Finish,

    /// Delete the active workout without saving it to history
    Discard,

    /// List finished workouts
    History {
        /// Only workouts from the last N days
        #[arg(long, default_value_t = 30)]
        days: i64,
    },

    /// Per-exercise statistics over all finished workouts
    Stats,

    /// Manage workout templates
    Template {
        #[command(subcommand)]
        action: TemplateAction,
    },

    /// Show or set your bodyweight in kg
    Bodyweight { kg: Option<f64> },

    /// Show or set how bodyweight sets are rendered
    Display {
        /// compact (BW+10kg), detailed (BW+10kg (85kg)) or total-only (85kg)
        mode: Option<String>,
    },

    /// Append every set of finished workouts to a CSV file
    Export { path: PathBuf },
}

#[derive(Subcommand)]
enum ExerciseAction {
    /// Create a custom exercise
    Add {
        #[arg(long)]
        name: String,

        /// Muscle group (repeatable, primary first)
        #[arg(long = "muscle", required = true)]
        muscles: Vec<String>,

        #[arg(long, default_value = "")]
        equipment: String,

        #[arg(long, default_value = "")]
        instructions: String,

        /// Resistance is your bodyweight plus any added weight
        #[arg(long)]
        bodyweight: bool,

        /// Rest between sets in seconds
        #[arg(long)]
        rest: Option<u32>,
    },

    /// Delete a custom exercise
    Remove { id: String },
}

#[derive(Subcommand)]
enum TemplateAction {
    /// Save an exercise selection
    Save {
        #[arg(long)]
        name: String,

        #[arg(long)]
        description: Option<String>,

        #[arg(required = true)]
        exercises: Vec<String>,
    },

    /// List saved templates
    List,

    /// Delete a template
    Delete { id: String },

    /// Start a workout from a template
    Start { id: String },
}

fn main() -> ExitCode {
    lift_core::logging::init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load()?;
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());
    tracing::debug!("Using data directory {:?}", data_dir);
    let mut ctx = AppContext::open(&config, &data_dir)?;

    match cli.command.unwrap_or(Commands::Status) {
        Commands::Exercises { muscle, search } => cmd_exercises(&ctx, muscle, search)?,
        Commands::Exercise { action } => cmd_exercise(&mut ctx, action, &config)?,
        Commands::Start {
            name,
            template,
            exercises,
        } => cmd_start(&mut ctx, name, template, exercises)?,
        Commands::Status => cmd_status(&ctx)?,
        Commands::Set {
            exercise,
            number,
            reps,
            weight,
            done,
            undo,
        } => {
            let completed = match (done, undo) {
                (true, _) => Some(true),
                (_, true) => Some(false),
                _ => None,
            };
            let update = SetUpdate {
                reps,
                weight_kg: weight.as_deref().map(parse_weight_input),
                completed,
            };
            cmd_set(&mut ctx, &exercise, number, &update)?
        }
        Commands::AddSet { exercise } => {
            let workout = ctx.require_active_workout()?;
            let updated = usecases::add_set(ctx.repo_mut(), workout.id, &exercise)?;
            print_workout(&ctx, &updated);
        }
        Commands::RemoveSet { exercise, number } => {
            let workout = ctx.require_active_workout()?;
            let set_id = set_id_at(&workout, &exercise, number)?;
            let updated = usecases::remove_set(ctx.repo_mut(), workout.id, &exercise, set_id)?;
            print_workout(&ctx, &updated);
        }
        Commands::AddExercise { exercise } => {
            let workout = ctx.require_active_workout()?;
            let updated = usecases::add_exercise_to_workout(ctx.repo_mut(), workout.id, &exercise)?;
            print_workout(&ctx, &updated);
        }
        Commands::Finish => cmd_finish(&mut ctx)?,
        Commands::Discard => {
            let workout = ctx.require_active_workout()?;
            usecases::discard_workout(ctx.repo_mut(), workout.id)?;
            println!("✓ Discarded '{}'", workout.name);
        }
        Commands::History { days } => cmd_history(&ctx, days)?,
        Commands::Stats => cmd_stats(&ctx)?,
        Commands::Template { action } => cmd_template(&mut ctx, action)?,
        Commands::Bodyweight { kg } => {
            let current = match kg {
                Some(kg) => ctx.set_bodyweight(kg),
                None => ctx.bodyweight(),
            };
            println!("Bodyweight: {}kg", format_weight(current));
        }
        Commands::Display { mode } => {
            if let Some(mode) = mode {
                ctx.set_weight_display(mode.parse()?);
            }
            println!("Weight display: {}", ctx.settings().weight_display.as_str());
        }
        Commands::Export { path } => {
            let workouts = ctx.repo().get_all_workouts()?;
            let count = lift_core::export::export_sets_csv(&workouts, &path)?;
            println!("✓ Exported {} sets", count);
            println!("  CSV: {}", path.display());
        }
    }

    ctx.close()
}

fn cmd_exercises<R: WorkoutRepository>(
    ctx: &AppContext<R>,
    muscle: Option<String>,
    search: Option<String>,
) -> Result<()> {
    let mut exercises = match &muscle {
        Some(group) => ctx.repo().get_exercises_by_muscle_group(group)?,
        None => ctx.repo().get_all_exercises()?,
    };
    if let Some(query) = &search {
        let needle = query.to_lowercase();
        exercises.retain(|e| e.name.to_lowercase().contains(&needle));
    }

    if exercises.is_empty() {
        println!("No matching exercises.");
        return Ok(());
    }

    for exercise in &exercises {
        let mut tags = Vec::new();
        if exercise.is_bodyweight {
            tags.push("bodyweight");
        }
        if exercise.is_custom {
            tags.push("custom");
        }
        let tags = if tags.is_empty() {
            String::new()
        } else {
            format!(" ({})", tags.join(", "))
        };
        println!(
            "{:<20} {}{}  [{}]",
            exercise.id,
            exercise.name,
            tags,
            exercise.muscle_groups.join(", ")
        );
    }
    Ok(())
}

fn cmd_exercise<R: WorkoutRepository>(
    ctx: &mut AppContext<R>,
    action: ExerciseAction,
    config: &Config,
) -> Result<()> {
    match action {
        ExerciseAction::Add {
            name,
            muscles,
            equipment,
            instructions,
            bodyweight,
            rest,
        } => {
            let draft = CustomExerciseDraft {
                name,
                muscle_groups: muscles,
                instructions,
                equipment,
                is_bodyweight: bodyweight,
                default_rest_seconds: rest.unwrap_or(config.workout.default_rest_seconds),
            };
            let exercise = usecases::add_custom_exercise(ctx.repo_mut(), &draft)?;
            println!("✓ Added '{}'", exercise.name);
            println!("  ID: {}", exercise.id);
        }
        ExerciseAction::Remove { id } => {
            ctx.repo_mut().delete_custom_exercise(&id)?;
            println!("✓ Removed {}", id);
        }
    }
    Ok(())
}

fn cmd_start<R: WorkoutRepository>(
    ctx: &mut AppContext<R>,
    name: Option<String>,
    template: Option<String>,
    exercises: Vec<String>,
) -> Result<()> {
    let workout = match template {
        Some(id) => ctx.start_from_template(parse_id(&id)?)?,
        None => {
            let name =
                name.unwrap_or_else(|| format!("Workout {}", chrono::Local::now().format("%Y-%m-%d")));
            ctx.start_workout(&name, &exercises)?
        }
    };

    println!("✓ Started '{}'", workout.name);
    print_workout(ctx, &workout);
    Ok(())
}

fn cmd_status<R: WorkoutRepository>(ctx: &AppContext<R>) -> Result<()> {
    match ctx.active_workout()? {
        Some(workout) => print_workout(ctx, &workout),
        None => println!("No workout in progress."),
    }
    Ok(())
}

fn cmd_set<R: WorkoutRepository>(
    ctx: &mut AppContext<R>,
    exercise_id: &str,
    number: usize,
    update: &SetUpdate,
) -> Result<()> {
    if *update == SetUpdate::default() {
        return Err(Error::InvalidArgument(
            "nothing to change; pass --reps, --weight, --done or --undo".into(),
        ));
    }

    let workout = ctx.require_active_workout()?;
    let set_id = set_id_at(&workout, exercise_id, number)?;
    let updated = ctx.update_set(workout.id, exercise_id, set_id, update)?;

    if let Some(entry) = updated.find_exercise(exercise_id) {
        if let Some(set) = entry.find_set(set_id) {
            println!(
                "✓ {} set {}: {}",
                entry.exercise.name,
                number,
                describe_set(ctx, &entry.exercise, set)
            );
        }
    }
    Ok(())
}

fn cmd_finish<R: WorkoutRepository>(ctx: &mut AppContext<R>) -> Result<()> {
    let workout = ctx.require_active_workout()?;
    let finished = ctx.finish(workout.id)?;
    let summary = WorkoutSummary::from_workout(&finished, ctx.bodyweight());

    println!("✓ Finished '{}'", finished.name);
    print_summary_details(&summary);
    Ok(())
}

fn cmd_history<R: WorkoutRepository>(ctx: &AppContext<R>, days: i64) -> Result<()> {
    let workouts = ctx.repo().get_all_workouts()?;
    let recent = analytics::recent_workouts(&workouts, chrono::Utc::now(), days);
    if recent.is_empty() {
        println!("No finished workouts in the last {} days.", days);
        return Ok(());
    }

    for workout in &recent {
        let summary = WorkoutSummary::from_workout(workout, ctx.bodyweight());
        println!(
            "{}  {:<24} {:>4} min  {}/{} sets  {}kg",
            summary.started_at.format("%Y-%m-%d"),
            summary.name,
            summary.duration.map(|d| d.num_minutes()).unwrap_or(0),
            summary.performed_sets,
            summary.total_sets,
            format_weight(summary.effective_volume_kg)
        );
    }
    Ok(())
}

fn cmd_stats<R: WorkoutRepository>(ctx: &AppContext<R>) -> Result<()> {
    let workouts = ctx.repo().get_all_workouts()?;
    let stats = analytics::exercise_stats(&workouts, ctx.bodyweight());
    if stats.is_empty() {
        println!("No completed sets yet.");
        return Ok(());
    }

    for s in &stats {
        println!(
            "{:<28} {:>3} sessions  {:>4} sets  best {}kg x {}  volume {}kg",
            s.name,
            s.sessions,
            s.completed_sets,
            format_weight(s.best_weight_kg),
            s.best_reps,
            format_weight(s.total_volume_kg)
        );
    }
    Ok(())
}

fn cmd_template<R: WorkoutRepository>(ctx: &mut AppContext<R>, action: TemplateAction) -> Result<()> {
    match action {
        TemplateAction::Save {
            name,
            description,
            exercises,
        } => {
            let template = usecases::save_template(
                ctx.repo_mut(),
                &name,
                &exercises,
                description.as_deref(),
                chrono::Utc::now(),
            )?;
            println!("✓ Saved template '{}'", template.name);
            println!("  ID: {}", template.id);
        }
        TemplateAction::List => {
            let templates = ctx.repo().get_all_templates()?;
            if templates.is_empty() {
                println!("No templates saved.");
            }
            for template in &templates {
                println!("{}  {}", template.id, template.name);
                println!("    {}", template.exercise_ids.join(", "));
                if let Some(description) = &template.description {
                    println!("    {}", description);
                }
            }
        }
        TemplateAction::Delete { id } => {
            let id = parse_id(&id)?;
            if ctx.repo().get_template(id)?.is_none() {
                return Err(Error::NotFound(format!("template {}", id)));
            }
            ctx.repo_mut().delete_template(id)?;
            println!("✓ Deleted template {}", id);
        }
        TemplateAction::Start { id } => {
            let workout = ctx.start_from_template(parse_id(&id)?)?;
            println!("✓ Started '{}'", workout.name);
            print_workout(ctx, &workout);
        }
    }
    Ok(())
}

// ============================================================================
// Helpers
// ============================================================================

fn parse_id(text: &str) -> Result<Uuid> {
    Uuid::parse_str(text.trim())
        .map_err(|e| Error::InvalidArgument(format!("'{}' is not a valid id: {}", text, e)))
}

/// Resolve a 1-based set number to the set's id
fn set_id_at(workout: &Workout, exercise_id: &str, number: usize) -> Result<Uuid> {
    let entry = workout
        .find_exercise(exercise_id)
        .ok_or_else(|| Error::NotFound(format!("exercise '{}' in '{}'", exercise_id, workout.name)))?;
    number
        .checked_sub(1)
        .and_then(|idx| entry.sets.get(idx))
        .map(|set| set.id)
        .ok_or_else(|| {
            Error::NotFound(format!(
                "set {} of '{}' ({} sets)",
                number,
                entry.exercise.name,
                entry.sets.len()
            ))
        })
}

fn describe_set<R: WorkoutRepository>(ctx: &AppContext<R>, exercise: &Exercise, set: &WorkoutSet) -> String {
    format!(
        "{} x {}{}",
        set.reps,
        ctx.display_weight(exercise, set),
        if set.completed { " ✓" } else { "" }
    )
}

fn print_workout<R: WorkoutRepository>(ctx: &AppContext<R>, workout: &Workout) {
    println!();
    println!("  {}", workout.name);
    println!(
        "  Started {}",
        workout
            .started_at
            .with_timezone(&chrono::Local)
            .format("%Y-%m-%d %H:%M")
    );
    println!();

    for entry in &workout.exercises {
        println!("  {}. {} [{}]", entry.order + 1, entry.exercise.name, entry.exercise.id);
        for (idx, set) in entry.sets.iter().enumerate() {
            println!(
                "     Set {}: {}",
                idx + 1,
                describe_set(ctx, &entry.exercise, set)
            );
        }
    }

    let summary = WorkoutSummary::from_workout(workout, ctx.bodyweight());
    println!();
    print_summary_details(&summary);
}

fn print_summary_details(summary: &WorkoutSummary) {
    println!(
        "  Sets: {}/{}  Volume: {}kg",
        summary.performed_sets,
        summary.total_sets,
        format_weight(summary.volume_kg)
    );
    if summary.effective_volume_kg != summary.volume_kg {
        println!(
            "  Volume incl. bodyweight: {}kg",
            format_weight(summary.effective_volume_kg)
        );
    }
    if let Some(duration) = summary.duration {
        println!("  Duration: {} min", duration.num_minutes());
    }
}
