//! Edugen CLI - generate lesson plans, question papers and attendance insights

mod config;
mod credentials;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use config::CliConfig;
use credentials::TerminalCredentials;
use edugen_ai::Generator;
use edugen_schema::{SchemaDescriptor, SchemaName};
use edugen_tools::{
    generate_insights, generate_lesson_plan, generate_question_paper, AttendanceRoster,
    Difficulty, LessonPlanRequest, QuestionPaperRequest, StudentAttendance, TeachingStyle,
    ToolError,
};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(name = "edugen")]
#[command(about = "Generate lesson plans, question papers and attendance insights with AI")]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a structured lesson plan
    LessonPlan {
        #[arg(long)]
        subject: String,

        #[arg(long)]
        grade: String,

        #[arg(long)]
        topic: String,

        /// Lesson length, e.g. "30 mins"
        #[arg(long, default_value = "45 mins")]
        duration: String,

        /// Interactive, Lecture-based, Collaborative or Practical
        #[arg(long, default_value = "Interactive")]
        style: TeachingStyle,

        /// Print the plan as JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Generate a question paper
    QuestionPaper {
        #[arg(long)]
        subject: String,

        #[arg(long)]
        grade: String,

        /// Topics or focus area
        #[arg(long)]
        topic: String,

        #[arg(long, default_value_t = 50)]
        total_marks: u32,

        /// Easy, Medium or Hard
        #[arg(long, default_value = "Medium")]
        difficulty: Difficulty,

        #[arg(long, default_value = "Mixed")]
        question_type: String,

        /// Print the paper as JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Summarize a day's attendance and draft parent notifications
    Attendance {
        /// JSON array of {"id", "name", "status"} entries
        #[arg(short, long)]
        roster: PathBuf,

        /// Attendance date (defaults to today)
        #[arg(short, long)]
        date: Option<NaiveDate>,

        /// Print the insights as JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Send a free-form prompt and print the model's reply
    Generate {
        #[arg(short, long)]
        prompt: String,

        /// Registry schema to constrain the reply to
        #[arg(long, conflicts_with = "schema_file")]
        schema: Option<SchemaName>,

        /// Schema descriptor JSON file to constrain the reply to
        #[arg(long)]
        schema_file: Option<PathBuf>,
    },

    /// Print a registry schema in wire form
    Schema {
        /// attendance-insights, lesson-plan or question-paper
        name: SchemaName,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays parseable
    let default_level = if cli.verbose { "debug" } else { "info" };
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Schema { name } => {
            println!("{}", serde_json::to_string_pretty(name.descriptor())?);
        }
        Commands::LessonPlan {
            subject,
            grade,
            topic,
            duration,
            style,
            json,
        } => {
            let generator = build_generator()?;
            let request = LessonPlanRequest {
                duration,
                style,
                ..LessonPlanRequest::new(subject, grade, topic)
            };
            let plan = match generate_lesson_plan(&generator, &request).await {
                Ok(plan) => plan,
                Err(e) => return Ok(report(e, "Failed to generate content. Please try again.")),
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&plan)?);
            } else {
                println!("{}", plan.render_text(&request));
            }
        }
        Commands::QuestionPaper {
            subject,
            grade,
            topic,
            total_marks,
            difficulty,
            question_type,
            json,
        } => {
            let generator = build_generator()?;
            let request = QuestionPaperRequest {
                total_marks,
                difficulty,
                question_type,
                ..QuestionPaperRequest::new(subject, grade, topic)
            };
            let paper = match generate_question_paper(&generator, &request).await {
                Ok(paper) => paper,
                Err(e) => {
                    return Ok(report(
                        e,
                        "Error creating paper. Ensure your API key is valid and selected.",
                    ))
                }
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&paper)?);
            } else {
                println!("{}", paper.render_text(&request));
            }
        }
        Commands::Attendance { roster, date, json } => {
            let date = date.unwrap_or_else(|| chrono::Local::now().date_naive());
            let generator = build_generator()?;
            let roster = AttendanceRoster::new(date, load_roster(&roster)?);
            let stats = roster.stats();
            info!(
                "Roster for {}: {} students, {} present, {} absent, {} late",
                date, stats.total, stats.present, stats.absent, stats.late
            );

            let insights = match generate_insights(&generator, &roster).await {
                Ok(insights) => insights,
                Err(e) => return Ok(report(e, "Could not generate insights.")),
            };
            match (insights, json) {
                (Some(insights), true) => {
                    println!("{}", serde_json::to_string_pretty(&insights)?)
                }
                (Some(insights), false) => println!("{}", insights.render_text()),
                (None, true) => println!("null"),
                (None, false) => println!("No insights were generated."),
            }
        }
        Commands::Generate {
            prompt,
            schema,
            schema_file,
        } => {
            let generator = build_generator()?;
            let schema = match (schema, schema_file) {
                (Some(name), _) => Some(name.descriptor().clone()),
                (None, Some(path)) => Some(load_schema(&path)?),
                (None, None) => None,
            };
            match generator.generate(&prompt, schema.as_ref()).await {
                Ok(text) => println!("{}", text),
                Err(e) => return Ok(report(e, "Generation failed.")),
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Gemini-backed generator from the environment. Only commands that talk to
/// the model need one, so `schema` works without any configuration.
fn build_generator() -> Result<Generator> {
    let config = CliConfig::from_env()?;
    let interactive = config.interactive && std::io::stdin().is_terminal();
    let credentials = Arc::new(TerminalCredentials::new(
        config.gemini.api_key.clone(),
        interactive,
    ));
    Ok(Generator::gemini(config.gemini, credentials))
}

/// Log the failure and print a single user-facing notice.
fn report(err: impl Into<ToolError>, notice: &str) -> ExitCode {
    match err.into() {
        ToolError::Generation(e) => {
            error!("{}", e);
            eprintln!("{}", notice);
        }
        invalid => eprintln!("Invalid request: {}", invalid),
    }
    ExitCode::FAILURE
}

fn load_roster(path: &Path) -> Result<Vec<StudentAttendance>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Could not read roster {:?}", path))?;
    serde_json::from_str(&content).with_context(|| format!("Invalid roster {:?}", path))
}

fn load_schema(path: &Path) -> Result<SchemaDescriptor> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Could not read schema {:?}", path))?;
    serde_json::from_str(&content).with_context(|| format!("Invalid schema {:?}", path))
}
