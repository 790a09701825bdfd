use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use lesson_core::model::{Lesson, StudentId};
use services::{Clock, ResultsService, SessionLoopService};
use storage::repository::{LessonRepository, Storage, StorageError};
use storage::{json, sample};
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod terminal;

use terminal::Terminal;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidStudentId { raw: String },
    MissingLesson,
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidStudentId { raw } => write!(f, "invalid --student value: {raw:?}"),
            ArgsError::MissingLesson => write!(f, "validate needs --lesson <path>"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- play     [--lesson <path>] [--student <id>]");
    eprintln!("  cargo run -p app -- validate --lesson <path>");
    eprintln!("  cargo run -p app -- sample   # print the built-in lesson as JSON");
    eprintln!();
    eprintln!("Defaults for play:");
    eprintln!("  built-in \"Present Simple vs Present Continuous\" lesson, no student");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  LESSON_FILE, LESSON_STUDENT_ID, RUST_LOG");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Play,
    Validate,
    Sample,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "play" => Some(Self::Play),
            "validate" => Some(Self::Validate),
            "sample" => Some(Self::Sample),
            _ => None,
        }
    }
}

#[derive(Debug)]
struct Args {
    lesson_path: Option<PathBuf>,
    student_id: Option<StudentId>,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut lesson_path = std::env::var("LESSON_FILE")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);
        let mut student_id = std::env::var("LESSON_STUDENT_ID")
            .ok()
            .and_then(|v| v.parse::<StudentId>().ok());

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--lesson" => {
                    let value = require_value(args, "--lesson")?;
                    lesson_path = Some(PathBuf::from(value));
                }
                "--student" => {
                    let value = require_value(args, "--student")?;
                    let parsed = value
                        .parse::<StudentId>()
                        .map_err(|_| ArgsError::InvalidStudentId { raw: value.clone() })?;
                    student_id = Some(parsed);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            lesson_path,
            student_id,
        })
    }

    fn load_lesson(&self) -> Result<Lesson, Box<dyn std::error::Error>> {
        match &self.lesson_path {
            Some(path) => Ok(json::load_lesson(path)?),
            None => Ok(sample::sample_lesson()),
        }
    }
}

fn init_tracing() {
    // Logs go to stderr so they never interleave with the lesson on stdout.
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("app=info,services=info")),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_target(false),
        )
        .init();
}

async fn play(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let lesson = args.load_lesson()?;
    let storage = Storage::in_memory();
    storage.lessons.upsert_lesson(&lesson).await?;

    let clock = Clock::system();
    let session_loop = SessionLoopService::new(
        clock,
        Arc::clone(&storage.lessons),
        Arc::clone(&storage.results),
    );
    let mut session = session_loop
        .start_session(lesson.id(), args.student_id.clone())
        .await?;

    let stdin = io::stdin();
    let mut terminal = Terminal::new(stdin.lock(), io::stdout());
    terminal.play(&session_loop, &mut session).await?;

    if let Some(student_id) = &args.student_id {
        let progress = ResultsService::new(Arc::clone(&storage.results))
            .progress_for_student(student_id)
            .await?;
        info!(
            student_id = %student_id,
            completed_lessons = progress.completed_lessons,
            average_percentage = progress.average_percentage,
            "student progress"
        );
    }
    Ok(())
}

fn validate_summary(path: &Path) -> Result<String, StorageError> {
    let lesson = json::load_lesson(path)?;
    Ok(format!(
        "{}: ok ({} tasks, \"{}\")",
        path.display(),
        lesson.len(),
        lesson.title()
    ))
}

fn validate(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let path = args.lesson_path.as_ref().ok_or(ArgsError::MissingLesson)?;
    println!("{}", validate_summary(path)?);
    Ok(())
}

fn sample_json() -> Result<String, StorageError> {
    json::to_json(&sample::sample_lesson())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    // Default behavior: play when no subcommand is provided.
    let cmd = match argv.first().map(String::as_str) {
        None => Command::Play,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Play,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            io::Error::new(io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    if !argv.is_empty() && !argv[0].starts_with("--") {
        argv.remove(0);
    }

    let mut iter = argv.into_iter();
    let parsed = Args::parse(&mut iter).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    match cmd {
        Command::Play => play(parsed).await,
        Command::Validate => validate(&parsed),
        Command::Sample => {
            println!("{}", sample_json()?);
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() {
    init_tracing();
    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
