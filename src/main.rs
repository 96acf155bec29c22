//! calops — maintenance CLI for the calendar application's SQLite database.
//!
//! Each subcommand is one operation against the `calendarapp_event` table,
//! except `serve`, which bootstraps and runs the web application itself.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgGroup, Args, Parser, Subcommand};

use calops_bootstrap::BootstrapConfig;
use calops_store::events::{DeletePolicy, EventRepo, EventUpdate, NewEvent};
use calops_store::Database;

#[derive(Parser, Debug)]
#[command(
    name = "calops",
    about = "Maintenance commands for the event calendar database"
)]
struct Cli {
    /// Path to the application's SQLite database file.
    #[arg(long, global = true, default_value = "db.sqlite3")]
    db: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Insert one event row.
    Add(AddArgs),
    /// Update the title and/or description of one event by id.
    Update(UpdateArgs),
    /// Remove one event by id. Hard delete unless --soft is given.
    Delete(DeleteArgs),
    /// Print every event row in storage order.
    List,
    /// Install dependencies, run migrations, and start the web application's
    /// development server (blocks until the server exits).
    Serve(ServeArgs),
}

#[derive(Args, Debug)]
struct AddArgs {
    #[arg(long)]
    title: String,

    #[arg(long)]
    description: Option<String>,

    /// Event start, e.g. "2025-05-20 09:00:00".
    #[arg(long)]
    start: String,

    /// Event end, e.g. "2025-05-20 10:00:00".
    #[arg(long)]
    end: String,

    /// Owning user id. Not validated against the application's user table.
    #[arg(long)]
    user_id: i64,

    /// Insert the event with is_active = 0.
    #[arg(long)]
    inactive: bool,
}

#[derive(Args, Debug)]
#[command(group = ArgGroup::new("changes").required(true).multiple(true))]
struct UpdateArgs {
    #[arg(long)]
    id: i64,

    #[arg(long, group = "changes")]
    title: Option<String>,

    #[arg(long, group = "changes")]
    description: Option<String>,
}

#[derive(Args, Debug)]
struct DeleteArgs {
    #[arg(long)]
    id: i64,

    /// Set is_deleted = 1 instead of removing the row.
    #[arg(long)]
    soft: bool,
}

#[derive(Args, Debug)]
struct ServeArgs {
    /// Root of the web application project (contains manage.py).
    #[arg(long, default_value = "event-calendar-main")]
    project_dir: PathBuf,

    #[arg(long, default_value = "python")]
    python: String,

    #[arg(long, default_value = "pip")]
    pip: String,

    #[arg(long, default_value = "requirements.txt")]
    requirements: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    calops_telemetry::init_logging(tracing::Level::INFO);

    let cli = Cli::parse();

    match cli.command {
        Command::Add(args) => {
            let repo = open_repo(&cli.db)?;
            let row = repo
                .insert(&NewEvent {
                    title: &args.title,
                    description: args.description.as_deref(),
                    start_time: &args.start,
                    end_time: &args.end,
                    is_active: !args.inactive,
                    user_id: args.user_id,
                })
                .context("insert event")?;
            println!("event added (id={})", row.id);
        }
        Command::Update(args) => {
            let repo = open_repo(&cli.db)?;
            let changed = repo
                .update(
                    args.id,
                    &EventUpdate {
                        title: args.title.as_deref(),
                        description: args.description.as_deref(),
                    },
                )
                .context("update event")?;
            if changed {
                println!("event {} updated", args.id);
            } else {
                println!("no event with id={}", args.id);
            }
        }
        Command::Delete(args) => {
            let policy = if args.soft {
                DeletePolicy::Soft
            } else {
                DeletePolicy::Hard
            };
            let repo = open_repo(&cli.db)?;
            let deleted = repo.delete(args.id, policy).context("delete event")?;
            match (deleted, policy) {
                (true, DeletePolicy::Hard) => println!("event {} deleted", args.id),
                (true, DeletePolicy::Soft) => println!("event {} marked deleted", args.id),
                (false, _) => println!("no event with id={}", args.id),
            }
        }
        Command::List => {
            let repo = open_repo(&cli.db)?;
            for row in repo.list().context("list events")? {
                println!("{row}");
            }
        }
        Command::Serve(args) => {
            let config = BootstrapConfig {
                project_dir: args.project_dir,
                python: args.python,
                pip: args.pip,
                requirements: args.requirements,
            };
            calops_bootstrap::run(&config)
                .await
                .context("bootstrap web application")?;
        }
    }

    Ok(())
}

fn open_repo(db_path: &std::path::Path) -> Result<EventRepo> {
    let db = Database::open(db_path)
        .with_context(|| format!("open database {}", db_path.display()))?;
    Ok(EventRepo::new(db))
}
