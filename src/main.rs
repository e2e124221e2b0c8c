mod app;
mod domain;
mod engine;
mod error;
mod input;
mod notifications;
mod persistence;
mod ticker;
mod ui;

use anyhow::{Context, Result};
use app::AppState;
use chrono::{Local, Utc};
use clap::{Parser, Subcommand};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use domain::{
    all_category_stats, check_glyph, format_countdown, visible_tasks, Category, NewTask,
    ResetTime, SortOption, Task, TaskStatus,
};
use engine::{Engine, ToggleOutcome};
use persistence::{default_export_file, ensure_data_dir, init_local_data_dir, log_file, JsonFileStorage};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use ticker::Ticker;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "dailies")]
#[command(about = "Daily task tracker with categories, a daily reset and import/export", long_about = None)]
struct Cli {
    /// Data directory (defaults to the nearest .dailies directory, then ~/.dailies)
    #[arg(long, global = true, env = "DAILIES_DIR")]
    dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a local .dailies directory in the current directory
    Init,
    /// Add a task
    Add {
        text: String,
        #[arg(short, long)]
        description: String,
        /// daily, note, waitlist, testnet or social_links
        #[arg(short, long, default_value = "daily")]
        category: Category,
        /// early, ongoing or ended
        #[arg(short, long, default_value = "early")]
        status: TaskStatus,
        #[arg(short, long)]
        link: Option<String>,
    },
    /// List tasks, optionally for one category
    List {
        #[arg(short, long)]
        category: Option<Category>,
        #[arg(long)]
        search: Option<String>,
        /// none, title-asc, title-desc, completed or uncompleted
        #[arg(long, default_value = "none")]
        sort: SortOption,
    },
    /// Toggle completion of a task (ID or unique ID prefix)
    Done {
        id: String,
        /// Confirm completing a daily task (locked until the next reset)
        #[arg(short, long)]
        yes: bool,
    },
    /// Delete a task (ID or unique ID prefix)
    Remove { id: String },
    /// Show completion stats per category
    Stats,
    /// Show or set the daily reset time (HH:MM)
    ResetTime { time: Option<ResetTime> },
    /// Export all tasks and the reset time
    Export {
        /// Output file, `-` for stdout. Defaults to the data directory.
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Replace all tasks with the contents of an export file
    Import { path: PathBuf },
    /// Live countdown to the next reset, applying it when the boundary passes
    Countdown {
        /// Stop after this many ticks
        #[arg(long)]
        ticks: Option<u64>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(Commands::Init) = cli.command {
        init_logging(None);
        let current_dir = std::env::current_dir().context("Could not determine current directory")?;
        let data_dir = init_local_data_dir(&current_dir)?;
        println!("Initialized dailies directory: {}", data_dir.display());
        println!();
        println!("Dailies will now use this local directory for task storage.");
        println!("Run 'dailies' to open the task board.");
        return Ok(());
    }

    let data_dir = ensure_data_dir(cli.dir.as_deref())?;

    match cli.command {
        None => {
            // Logs go to a file so they never corrupt the terminal UI
            init_logging(Some(&log_file(&data_dir)));
            run_tui(data_dir)
        }
        Some(command) => {
            init_logging(None);
            let mut engine = load_engine(&data_dir);
            report_load_error(&mut engine);
            run_command(command, &mut engine, &data_dir)
        }
    }
}

/// Tracing is opt-in via RUST_LOG; invalid filters turn it off
fn init_logging(log_path: Option<&Path>) {
    let filter = std::env::var("RUST_LOG")
        .ok()
        .and_then(|raw| {
            let raw = raw.trim();
            if raw.is_empty() {
                return None;
            }
            EnvFilter::try_new(raw).ok()
        });

    let Some(filter) = filter else {
        return;
    };

    match log_path {
        Some(path) => {
            let file = match OpenOptions::new().create(true).append(true).open(path) {
                Ok(file) => file,
                Err(_) => return,
            };
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(Mutex::new(file)).with_ansi(false))
                .with(filter)
                .init();
        }
        None => {
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(io::stderr))
                .with(filter)
                .init();
        }
    }
}

fn load_engine(data_dir: &Path) -> Engine {
    let storage = JsonFileStorage::new(data_dir);
    Engine::load(Box::new(storage), &Local::now())
}

/// A load failure is a warning: the command still runs against what could be read
fn report_load_error(engine: &mut Engine) -> Option<String> {
    let err = engine.take_persistence_error()?;
    let message = format!("Warning: {}", err);
    eprintln!("{}", message);
    Some(message)
}

/// One-shot commands fail loudly when a write did not reach disk
fn check_persistence(engine: &mut Engine) -> Result<()> {
    match engine.take_persistence_error() {
        Some(err) => Err(err.into()),
        None => Ok(()),
    }
}

/// Resolve a full ID or a unique prefix of one
fn resolve_id(engine: &Engine, query: &str) -> Result<String> {
    if engine.get(query).is_some() {
        return Ok(query.to_string());
    }
    let matches: Vec<&Task> = engine
        .tasks()
        .iter()
        .filter(|t| t.id.starts_with(query))
        .collect();
    match matches.as_slice() {
        [task] => Ok(task.id.clone()),
        [] => Err(error::EngineError::NotFound(query.to_string()).into()),
        _ => anyhow::bail!("ID prefix '{}' matches {} tasks", query, matches.len()),
    }
}

fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

fn print_task(task: &Task) {
    println!(
        "  {}  {} {}  [{}]",
        short_id(&task.id),
        check_glyph(task, false),
        task.text,
        task.status.label()
    );
}

fn run_command(command: Commands, engine: &mut Engine, data_dir: &Path) -> Result<()> {
    match command {
        // Handled in main before the data directory is resolved
        Commands::Init => {}
        Commands::Add {
            text,
            description,
            category,
            status,
            link,
        } => {
            let mut input = NewTask::new(text, category)
                .with_status(status)
                .with_description(description);
            if let Some(link) = link {
                input = input.with_link(link);
            }
            let task = engine.create(input)?;
            check_persistence(engine)?;
            println!("Added {} ({})", task.text, short_id(&task.id));
        }
        Commands::List {
            category,
            search,
            sort,
        } => {
            let categories = match category {
                Some(category) => vec![category],
                None => Category::all().to_vec(),
            };
            let query = search.unwrap_or_default();
            for category in categories {
                let rows = visible_tasks(engine.tasks(), category, &query, sort);
                println!("{} ({})", category.label(), rows.len());
                for task in rows {
                    print_task(task);
                }
            }
        }
        Commands::Done { id, yes } => {
            let id = resolve_id(engine, &id)?;
            match engine.request_toggle(&id)? {
                ToggleOutcome::Toggled(task) => {
                    let state = if task.completed { "Completed" } else { "Reopened" };
                    println!("{} {}", state, task.text);
                }
                ToggleOutcome::Staged(task) if yes => {
                    engine.confirm_completion()?;
                    println!("Completed {} until the next reset ({})", task.text, engine.reset_time());
                }
                ToggleOutcome::Staged(task) => {
                    engine.cancel_completion()?;
                    anyhow::bail!(
                        "'{}' is a daily task and stays completed until the next reset; re-run with --yes to confirm",
                        task.text
                    );
                }
            }
            check_persistence(engine)?;
        }
        Commands::Remove { id } => {
            let id = resolve_id(engine, &id)?;
            engine.request_delete(&id)?;
            let task = engine.confirm_delete()?;
            check_persistence(engine)?;
            println!("Deleted {}", task.text);
        }
        Commands::Stats => {
            for stats in all_category_stats(engine.tasks()) {
                println!(
                    "{:<14} {:>3}/{:<3} {:>3}%  streak {}",
                    stats.category.label(),
                    stats.completed,
                    stats.total,
                    stats.completion_rate,
                    stats.streak
                );
            }
            println!(
                "Next reset in {} ({})",
                format_countdown(engine.time_remaining(&Local::now())),
                engine.reset_time()
            );
        }
        Commands::ResetTime { time } => match time {
            Some(reset_time) => {
                let report = engine.save_reset_time(reset_time, &Local::now())?;
                check_persistence(engine)?;
                println!("Daily reset at {}", engine.reset_time());
                if let Some(report) = report {
                    println!("Reset applied: {} daily task(s) cleared", report.cleared);
                }
            }
            None => println!("Daily reset at {}", engine.reset_time()),
        },
        Commands::Export { output } => match output.as_deref() {
            Some("-") => println!("{}", engine.export_json(Utc::now())?),
            Some(path) => {
                engine.export_to_file(Path::new(path), Utc::now())?;
                println!("Exported {} tasks to {}", engine.tasks().len(), path);
            }
            None => {
                let path = default_export_file(data_dir, Local::now().date_naive());
                engine.export_to_file(&path, Utc::now())?;
                println!("Exported {} tasks to {}", engine.tasks().len(), path.display());
            }
        },
        Commands::Import { path } => {
            let summary = engine.import_file(&path, &Local::now())?;
            check_persistence(engine)?;
            println!("Imported {} tasks", summary.imported);
            if let Some(reset_time) = summary.reset_time {
                println!("Daily reset at {}", reset_time);
            }
        }
        Commands::Countdown { ticks } => run_countdown(engine, ticks)?,
    }
    Ok(())
}

/// Print the remaining time every tick until stopped
fn run_countdown(engine: &mut Engine, ticks: Option<u64>) -> Result<()> {
    let ticker = Ticker::start(ticker::tick_duration());
    let mut stdout = io::stdout();
    let mut seen = 0u64;

    loop {
        let now = Local::now();
        if let Some(report) = engine.apply_reset_if_due(&now) {
            notifications::notify_daily_reset(report.cleared);
            writeln!(stdout, "\rNew day: {} daily task(s) ready again", report.cleared)?;
        }
        check_persistence(engine)?;

        write!(
            stdout,
            "\rNext reset in {} ({})",
            format_countdown(engine.time_remaining(&now)),
            engine.reset_time()
        )?;
        stdout.flush()?;

        if ticks.is_some_and(|limit| seen >= limit) {
            break;
        }
        if ticker.recv().is_none() {
            break;
        }
        seen += 1;
    }

    writeln!(stdout)?;
    Ok(())
}

fn run_tui(data_dir: PathBuf) -> Result<()> {
    eprintln!("Using dailies directory: {}", data_dir.display());

    let engine = load_engine(&data_dir);
    let mut app = AppState::new(engine, data_dir);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run app
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // Every mutation was already written; only report a failure that was never shown
    if let Some(err) = app.engine.take_persistence_error() {
        eprintln!("Error saving state: {}", err);
    }

    // Print any errors
    if let Err(err) = result {
        eprintln!("Error: {}", err);
    }

    Ok(())
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut AppState) -> Result<()> {
    let tick_rate = ticker::tick_duration();

    loop {
        // Reset check before drawing so a crossed boundary shows immediately
        app.tick();

        terminal.draw(|f| ui::render(f, app))?;

        // Handle events with timeout for ticking
        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                // Only process key press events (ignore key release)
                if key.kind == KeyEventKind::Press {
                    let should_quit = input::handle_key(app, key)?;
                    if should_quit {
                        return Ok(());
                    }
                }
            }
        }
    }
}
