mod commands;
mod config;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{block, init, page, theme, BlockArgs, InitArgs, PageArgs, ThemeArgs};
use tracing_subscriber::EnvFilter;

/// Sitecraft CLI - Edit block-based sites from the terminal
#[derive(Parser, Debug)]
#[command(name = "sitecraft")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log editor activity (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Initialize a new site
    Init(InitArgs),

    /// Inspect pages, URLs and slugs
    Page(PageArgs),

    /// Browse the block library and edit page blocks
    Block(BlockArgs),

    /// Inspect the site theme
    Theme(ThemeArgs),
}

fn main() {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cwd = std::env::current_dir()
        .expect("Cannot get current directory")
        .display()
        .to_string();

    let result = match cli.command {
        Command::Init(args) => init(args, &cwd),
        Command::Page(args) => page(args, &cwd),
        Command::Block(args) => block(args, &cwd),
        Command::Theme(args) => theme(args, &cwd),
    };

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
