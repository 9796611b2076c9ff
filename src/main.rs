use clap::Parser;
use tickoff::cli::commands::Cli;
use tickoff::cli::handlers;

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        // No subcommand → launch TUI
        None => tickoff::tui::run(cli.dir.as_deref(), cli.file.as_deref()),
        Some(_) => handlers::dispatch(cli),
    };

    if let Err(e) = result {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
