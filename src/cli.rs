use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::commands::delete::{self, DeleteOptions};
use crate::commands::history::{self, HistoryOptions};
use crate::commands::login::{self, LoginOptions};
use crate::commands::summarize::{self, SummarizeOptions};
use crate::commands::{CommandReport, logout, status, whoami};

#[derive(Debug, Parser)]
#[command(
    name = "summarizer",
    version,
    about = "Summarize text with an AI model and browse your summary history"
)]
struct Cli {
    /// Print the command report as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Summarize text from --text, --file, or stdin
    Summarize {
        #[arg(long, conflicts_with = "file")]
        text: Option<String>,
        #[arg(long)]
        file: Option<PathBuf>,
        /// Completion model id
        #[arg(long)]
        model: Option<String>,
        /// Persist a placeholder summary without calling the AI service
        #[arg(long)]
        dry_run: bool,
    },
    /// List past summaries
    History {
        /// Case-insensitive filter over input and summary text
        #[arg(long, short)]
        search: Option<String>,
        #[arg(long)]
        max_chars: Option<usize>,
        /// Show untruncated text
        #[arg(long)]
        full: bool,
    },
    /// Request deletion of a summary (not supported by the backend yet)
    Delete { id: String },
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    Logout,
    Whoami,
    /// Show resolved paths, configuration, and session state
    Status,
}

fn render_text(report: &CommandReport) {
    for block in &report.body {
        println!("{block}");
    }
    for detail in &report.details {
        println!("  {detail}");
    }
    for issue in &report.issues {
        eprintln!("{}: {issue}", report.command);
    }
}

fn render(report: &CommandReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        render_text(report);
    }
    Ok(())
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let report = match cli.command {
        Command::Summarize {
            text,
            file,
            model,
            dry_run,
        } => summarize::run(&SummarizeOptions {
            text,
            file,
            model,
            dry_run,
        })?,
        Command::History {
            search,
            max_chars,
            full,
        } => history::run(&HistoryOptions {
            search,
            max_chars,
            full,
        })?,
        Command::Delete { id } => delete::run(&DeleteOptions { id })?,
        Command::Login { email, password } => login::run(&LoginOptions { email, password })?,
        Command::Logout => logout::run()?,
        Command::Whoami => whoami::run()?,
        Command::Status => status::run()?,
    };

    render(&report, cli.json)?;
    if !report.ok {
        anyhow::bail!("{} failed", report.command);
    }
    Ok(())
}
