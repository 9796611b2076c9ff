use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "tick", about = concat!("[✔] tickoff v", env!("CARGO_PKG_VERSION"), " - a to-do list in a text file"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Run in a different working directory
    #[arg(short = 'C', long = "dir", global = true)]
    pub dir: Option<String>,

    /// Task file to use (default: tasks.txt, or [store] file in tickoff.toml)
    #[arg(short = 'f', long = "file", global = true)]
    pub file: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List tasks
    List(ListArgs),
    /// Add a task and re-sort by deadline
    Add(AddArgs),
    /// Remove a task
    Rm(PositionArg),
    /// Change a task's text and/or deadline, then re-sort
    Edit(EditArgs),
    /// Advance a task's status (empty → tick → cross → empty)
    Toggle(PositionArg),
    /// Move a task to another position (no re-sort)
    Mv(MvArgs),
    /// Sort tasks by deadline
    Sort,
    /// Report lines that would be dropped and deadlines that do not parse
    Check,
    /// View or manage the recovery log
    Recovery(RecoveryCmd),
}

#[derive(Args)]
pub struct ListArgs {
    /// Only show tasks with this status (empty, tick, cross)
    #[arg(long)]
    pub status: Option<String>,
}

#[derive(Args)]
pub struct AddArgs {
    /// Task text
    pub text: String,
    /// Deadline: YYYY-MM-DD, "YYYY-MM-DD HH:MM", or = for none
    #[arg(short, long, default_value = "=")]
    pub deadline: String,
}

#[derive(Args)]
pub struct PositionArg {
    /// Task position as shown by `tick list` (1-based)
    pub position: usize,
}

#[derive(Args)]
pub struct EditArgs {
    /// Task position (1-based)
    pub position: usize,
    /// New text (empty leaves it unchanged)
    #[arg(short, long)]
    pub text: Option<String>,
    /// New deadline: YYYY-MM-DD, "YYYY-MM-DD HH:MM", or = to clear
    #[arg(short, long)]
    pub deadline: Option<String>,
}

#[derive(Args)]
pub struct MvArgs {
    /// Current position (1-based)
    pub from: usize,
    /// New position (1-based)
    pub to: usize,
}

#[derive(Args)]
pub struct RecoveryCmd {
    #[command(subcommand)]
    pub action: Option<RecoveryAction>,
    /// Maximum number of entries to show (default: 10)
    #[arg(long)]
    pub limit: Option<usize>,
    /// Show entries after this timestamp (RFC 3339)
    #[arg(long)]
    pub since: Option<String>,
}

#[derive(Subcommand)]
pub enum RecoveryAction {
    /// Remove old entries
    Prune(RecoveryPruneArgs),
    /// Print the path to the recovery log
    Path,
}

#[derive(Args)]
pub struct RecoveryPruneArgs {
    /// Remove entries older than this timestamp (default: 30 days ago)
    #[arg(long)]
    pub before: Option<String>,
    /// Remove all entries
    #[arg(long)]
    pub all: bool,
}
