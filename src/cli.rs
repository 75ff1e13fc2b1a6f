use clap::Parser;
use std::path::PathBuf;

const LONG_ABOUT: &str = r#"
Kanban Board - REST API for projects, columns, tasks and tags

Every project is created with three columns (To Do, In Progress, Done).
Columns and tasks keep an explicit order that can be rewritten at any time.

Configuration (flag > environment > default):
  --port       PORT              3000
  --host       KANBAN_HOST       127.0.0.1
  --db         KANBAN_DB_PATH    ./kanban.db

Logging:
  RUST_LOG overrides the level chosen by -v / -q.
"#;

#[derive(Parser, Clone, Debug)]
#[command(name = "kanban")]
#[command(about = "Serve a SQLite-backed kanban board over HTTP")]
#[command(long_about = LONG_ABOUT)]
#[command(version)]
pub struct Cli {
    /// Enable verbose output (-v)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output (-q)
    #[arg(short, long)]
    pub quiet: bool,

    /// Output logs in JSON format
    #[arg(long)]
    pub json: bool,

    /// Append logs to this exact file instead of stdout
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Port to listen on
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Address to bind
    #[arg(long)]
    pub host: Option<String>,

    /// Path of the SQLite database file
    #[arg(long, value_name = "PATH")]
    pub db: Option<PathBuf>,
}
