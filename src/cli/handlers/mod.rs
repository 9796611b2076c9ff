use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::lock::FileLock;
use crate::io::recovery;
use crate::io::store_io::{self, StoreError};
use crate::model::task::TaskStatus;
use crate::model::workspace::Workspace;
use crate::ops::{check, task_ops};
use crate::parse::{parse_deadline, task_serializer};

type CmdResult = Result<(), Box<dyn std::error::Error>>;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

/// Where a command runs: the working directory and an optional task file override.
pub struct Context {
    pub root: PathBuf,
    pub file: Option<PathBuf>,
}

impl Context {
    pub fn from_cli(dir: Option<&str>, file: Option<&str>) -> Result<Self, Box<dyn std::error::Error>> {
        let root = match dir {
            Some(dir) => std::fs::canonicalize(dir)
                .map_err(|e| format!("cannot resolve -C path '{}': {}", dir, e))?,
            None => std::env::current_dir()?,
        };
        Ok(Context {
            root,
            file: file.map(PathBuf::from),
        })
    }

    /// Load the workspace for a read-only command.
    fn open(&self) -> Result<Workspace, StoreError> {
        let ws = store_io::open_workspace(&self.root, self.file.as_deref())?;
        if !ws.dropped.is_empty() {
            eprintln!(
                "warning: {} malformed line(s) in {} are ignored (run `tick check`)",
                ws.dropped.len(),
                ws.task_file.display()
            );
        }
        Ok(ws)
    }

    /// Load the workspace under the write lock, re-reading after the lock
    /// is held so the mutation applies to the latest file.
    fn open_locked(&self) -> Result<(Workspace, FileLock), Box<dyn std::error::Error>> {
        let mut ws = store_io::open_workspace(&self.root, self.file.as_deref())?;
        let lock = FileLock::acquire_default(&ws.data_dir())?;
        store_io::reload_workspace(&mut ws)?;
        Ok((ws, lock))
    }
}

pub fn dispatch(cli: Cli) -> CmdResult {
    let json = cli.json;
    let ctx = Context::from_cli(cli.dir.as_deref(), cli.file.as_deref())?;

    match cli.command {
        None => Err("no subcommand given (run `tick` alone for the interactive list)".into()),
        Some(cmd) => match cmd {
            Commands::List(args) => cmd_list(&ctx, args, json),
            Commands::Check => cmd_check(&ctx, json),
            Commands::Recovery(args) => cmd_recovery(&ctx, args, json),

            Commands::Add(args) => cmd_add(&ctx, args),
            Commands::Rm(args) => cmd_rm(&ctx, args),
            Commands::Edit(args) => cmd_edit(&ctx, args),
            Commands::Toggle(args) => cmd_toggle(&ctx, args),
            Commands::Mv(args) => cmd_mv(&ctx, args),
            Commands::Sort => cmd_sort(&ctx),
        },
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Convert a 1-based CLI position to a 0-based index.
fn to_index(position: usize) -> Result<usize, String> {
    position
        .checked_sub(1)
        .ok_or_else(|| "positions start at 1".to_string())
}

fn parse_status_filter(s: &str) -> Result<TaskStatus, String> {
    TaskStatus::parse_status(s)
        .ok_or_else(|| format!("unknown status '{}' (expected: empty, tick, cross)", s))
}

/// Save and report any lines that were dropped from the file as a result.
fn save(ws: &mut Workspace) -> Result<(), StoreError> {
    let dropped = ws.dropped.len();
    store_io::save_workspace(ws)?;
    if dropped > 0 {
        eprintln!(
            "warning: dropped {} malformed line(s) from {}; copied to {}",
            dropped,
            ws.task_file.display(),
            recovery::recovery_log_path(&ws.data_dir()).display()
        );
    }
    Ok(())
}

fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| format!("invalid timestamp '{}': {}", s, e))
}

// ---------------------------------------------------------------------------
// Read command handlers
// ---------------------------------------------------------------------------

fn cmd_list(ctx: &Context, args: ListArgs, json: bool) -> CmdResult {
    let ws = ctx.open()?;
    let status_filter = args.status.as_deref().map(parse_status_filter).transpose()?;

    let shown: Vec<(usize, &crate::model::task::Task)> = ws
        .list
        .iter()
        .enumerate()
        .filter(|(_, t)| status_filter.is_none_or(|s| t.status == s))
        .collect();

    if json {
        let out: Vec<TaskJson> = shown.iter().map(|(i, t)| task_to_json(*i, t)).collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    if shown.is_empty() {
        println!("no tasks");
        return Ok(());
    }
    for line in format_task_list(shown) {
        println!("{}", line);
    }
    Ok(())
}

fn cmd_check(ctx: &Context, json: bool) -> CmdResult {
    let config = crate::io::config_io::read_config(&ctx.root)?;
    let path = store_io::resolve_task_file(&ctx.root, &config, ctx.file.as_deref());
    let source = match std::fs::read_to_string(&path) {
        Ok(s) => s,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
        Err(e) => return Err(StoreError::ReadError { path, source: e }.into()),
    };
    let result = check::check_source(&source);

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        if !result.errors.is_empty() {
            println!("Errors (dropped on next save):");
            for err in &result.errors {
                match err {
                    check::CheckError::MalformedLine {
                        line,
                        fields,
                        content,
                    } => {
                        println!("  line {}: {} field(s), expected 3: {}", line, fields, content);
                    }
                }
            }
        }
        if !result.warnings.is_empty() {
            if !result.errors.is_empty() {
                println!();
            }
            println!("Warnings:");
            for warn in &result.warnings {
                match warn {
                    check::CheckWarning::UnparsedDeadline {
                        line,
                        text,
                        deadline,
                    } => {
                        println!(
                            "  line {}: \"{}\" has invalid deadline '{}' (sorts last)",
                            line, text, deadline
                        );
                    }
                    check::CheckWarning::UnknownStatus { line, text, status } => {
                        println!(
                            "  line {}: \"{}\" has unknown status '{}' (reads as empty)",
                            line, text, status
                        );
                    }
                }
            }
        }
        if result.valid {
            println!("✓ {} is valid", path.display());
        }
    }

    if !result.valid {
        return Err(format!("{} has malformed lines", path.display()).into());
    }
    Ok(())
}

fn cmd_recovery(ctx: &Context, args: RecoveryCmd, json: bool) -> CmdResult {
    let config = crate::io::config_io::read_config(&ctx.root)?;
    let task_file = store_io::resolve_task_file(&ctx.root, &config, ctx.file.as_deref());
    let data_dir = task_file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| ctx.root.clone());

    match args.action {
        Some(RecoveryAction::Path) => {
            println!("{}", recovery::recovery_log_path(&data_dir).display());
            Ok(())
        }
        Some(RecoveryAction::Prune(prune)) => {
            let before = prune.before.as_deref().map(parse_timestamp).transpose()?;
            let removed = recovery::prune_recovery(&data_dir, before, prune.all)?;
            println!("pruned {} entr{}", removed, if removed == 1 { "y" } else { "ies" });
            Ok(())
        }
        None => {
            let since = args.since.as_deref().map(parse_timestamp).transpose()?;
            let entries =
                recovery::read_recovery_entries(&data_dir, Some(args.limit.unwrap_or(10)), since);
            if json {
                let out: Vec<serde_json::Value> = entries.iter().map(|e| e.to_json()).collect();
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else if entries.is_empty() {
                println!("recovery log is empty");
            } else {
                for entry in &entries {
                    print!("{}", entry.to_display_markdown());
                }
            }
            Ok(())
        }
    }
}

// ---------------------------------------------------------------------------
// Write command handlers
// ---------------------------------------------------------------------------

fn cmd_add(ctx: &Context, args: AddArgs) -> CmdResult {
    let deadline = parse_deadline(&args.deadline)?;
    let (mut ws, _lock) = ctx.open_locked()?;

    let index = task_ops::add_task(&mut ws.list, args.text, deadline)?;
    save(&mut ws)?;
    println!("added at position {}", index + 1);
    Ok(())
}

fn cmd_rm(ctx: &Context, args: PositionArg) -> CmdResult {
    let index = to_index(args.position)?;
    let (mut ws, _lock) = ctx.open_locked()?;

    let removed = task_ops::remove_task(&mut ws.list, Some(index))
        .ok_or(task_ops::TaskError::PositionOutOfRange(index))?;
    save(&mut ws)?;
    recovery::log_task_removal(
        &ws.data_dir(),
        index,
        &task_serializer::serialize_task(&removed),
    );
    println!("removed: {}", removed.text);
    Ok(())
}

fn cmd_edit(ctx: &Context, args: EditArgs) -> CmdResult {
    if args.text.is_none() && args.deadline.is_none() {
        return Err("nothing to change: pass --text and/or --deadline".into());
    }
    let index = to_index(args.position)?;
    let deadline = args.deadline.as_deref().map(parse_deadline).transpose()?;
    let (mut ws, _lock) = ctx.open_locked()?;

    let new_index = task_ops::edit_task(&mut ws.list, index, args.text, deadline)?;
    save(&mut ws)?;
    println!("updated, now at position {}", new_index + 1);
    Ok(())
}

fn cmd_toggle(ctx: &Context, args: PositionArg) -> CmdResult {
    let index = to_index(args.position)?;
    let (mut ws, _lock) = ctx.open_locked()?;

    let status = task_ops::toggle_status(&mut ws.list, index)?;
    save(&mut ws)?;
    println!("{} {} → {}", args.position, ws.list.tasks[index].text, status);
    Ok(())
}

fn cmd_mv(ctx: &Context, args: MvArgs) -> CmdResult {
    let from = to_index(args.from)?;
    let to = to_index(args.to)?;
    let (mut ws, _lock) = ctx.open_locked()?;

    task_ops::move_task(&mut ws.list, from, to)?;
    save(&mut ws)?;
    println!("moved {} → {}", args.from, args.to);
    Ok(())
}

fn cmd_sort(ctx: &Context) -> CmdResult {
    let (mut ws, _lock) = ctx.open_locked()?;

    task_ops::sort_by_deadline(&mut ws.list);
    save(&mut ws)?;
    println!("sorted {} task(s) by deadline", ws.list.len());
    Ok(())
}
