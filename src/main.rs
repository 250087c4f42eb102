use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use colored::Colorize;
use planedit::{
    add_item, add_note, add_phase, compute_progress, find_similar_items, parse, phase_excerpt,
    remove_item, rename_item, serialize, toggle_item, Config, Document, PhaseTarget, PlanError,
};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "planedit")]
#[command(author, version, about = "Edit checklist plan files: check off items, add, remove and rename them, add phases and notes")]
struct Cli {
    /// Plan file to edit (default: [plan] file from .planedit/config.toml, else PLAN.md)
    #[arg(short, long, global = true)]
    file: Option<PathBuf>,

    /// Show debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the plan with progress
    Show {
        /// Print progress as JSON instead of the plan text
        #[arg(long)]
        json: bool,
    },
    /// Check the first item containing ITEM (case-insensitive)
    Check {
        /// Text of the checkbox item to check
        item: String,
    },
    /// Uncheck the first item containing ITEM (case-insensitive)
    Uncheck {
        /// Text of the checkbox item to uncheck
        item: String,
    },
    /// Add a new unchecked item
    Add {
        /// Item text
        text: String,
        /// Target phase (partial, case-insensitive; default: last phase)
        #[arg(long)]
        phase: Option<String>,
    },
    /// Remove the first item containing ITEM
    Remove {
        /// Text of the item to remove
        item: String,
    },
    /// Rename the first item containing ITEM, keeping its checked state
    Rename {
        /// Current item text (partial match)
        item: String,
        /// New item text
        #[arg(long)]
        to: String,
    },
    /// Add a new phase after the existing ones
    AddPhase {
        /// Phase heading, e.g. "Phase 3: Deployment"
        name: String,
        /// Initial checklist item (repeatable)
        #[arg(long = "item")]
        items: Vec<String>,
    },
    /// Append a line to a trailing section such as Notes or Risks
    Note {
        /// Line to append
        text: String,
        /// Section name, exact (default: [notes] section from config, else Notes)
        #[arg(long)]
        section: Option<String>,
    },
    /// List items similar to QUERY ("did you mean")
    Similar {
        /// Text to look for
        query: String,
        /// Minimum similarity from 0.0 to 1.0 (default: [suggest] threshold from config)
        #[arg(long)]
        threshold: Option<f64>,
    },
    /// Generate shell completions
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_env("PLANEDIT_LOG")
                .unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    if let Command::Completion { shell } = cli.command {
        clap_complete::generate(shell, &mut Cli::command(), "planedit", &mut io::stdout());
        return Ok(ExitCode::SUCCESS);
    }

    let config = Config::load();
    let path = cli.file.clone().unwrap_or_else(|| config.plan.file.clone());
    let content = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read plan file {}", path.display()))?;
    let doc = parse(&content);

    match cli.command {
        Command::Show { json } => {
            show(&path, &content, &doc, json)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Check { item } => set_checked(&config, &path, &content, &doc, &item, true),
        Command::Uncheck { item } => set_checked(&config, &path, &content, &doc, &item, false),
        Command::Add { text, phase } => {
            let edit = match add_item(&doc, phase.as_deref().unwrap_or(""), &text) {
                Ok(edit) => edit,
                Err(e) => return plan_failure(&e),
            };
            let target = &edit.document.phases[edit.outcome.index()].name;
            if let (Some(query), PhaseTarget::LastPhase(_)) = (&phase, edit.outcome) {
                warn_phase_fallback(&doc, query, target);
            }
            let action = format!("Added item: {} to {}", text.trim(), target);
            finish(&path, &content, &edit.document, &action)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Remove { item } => {
            let edit = remove_item(&doc, &item);
            match edit.outcome {
                Some(removed) => {
                    finish(&path, &content, &edit.document, &format!("Removed item: {}", removed.text))?
                }
                None => println!(
                    "{} No item matching '{}'; plan unchanged",
                    "Skipping".yellow(),
                    item
                ),
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Rename { item, to } => {
            let edit = match rename_item(&doc, &item, &to) {
                Ok(edit) => edit,
                Err(e) => return plan_failure(&e),
            };
            match edit.outcome {
                Some(old) => finish(
                    &path,
                    &content,
                    &edit.document,
                    &format!("Renamed item: {} -> {}", old, to.trim()),
                )?,
                None => println!(
                    "{} No item matching '{}'; plan unchanged",
                    "Skipping".yellow(),
                    item
                ),
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::AddPhase { name, items } => {
            let next = match add_phase(&doc, &name, &items) {
                Ok(next) => next,
                Err(e) => return plan_failure(&e),
            };
            finish(&path, &content, &next, &format!("Added phase: {}", name.trim()))?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Note { text, section } => {
            let section = section.unwrap_or_else(|| config.notes.section.clone());
            let next = match add_note(&doc, &text, &section) {
                Ok(next) => next,
                Err(e) => return plan_failure(&e),
            };
            finish(&path, &content, &next, &format!("Added note to {}", section.trim()))?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Similar { query, threshold } => {
            let threshold = threshold.unwrap_or(config.suggest.threshold);
            let similar = find_similar_items(&doc, &query, threshold);
            if similar.is_empty() {
                println!("No items similar to '{}'", query);
            }
            for (text, score) in similar {
                println!("  • {} (similarity: {:.0}%)", text, score * 100.0);
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Completion { .. } => Ok(ExitCode::SUCCESS),
    }
}

fn show(path: &Path, content: &str, doc: &Document, json: bool) -> Result<()> {
    let progress = compute_progress(doc);
    if json {
        let report = serde_json::json!({
            "file": path.display().to_string(),
            "percent": progress.percent(),
            "progress": progress,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("\n{} {}\n", "Plan:".cyan().bold(), path.display());
    println!("{}", content.trim_end());
    println!(
        "\nProgress: {}/{} items complete ({}%)\n",
        progress.checked,
        progress.total,
        progress.percent()
    );
    Ok(())
}

fn set_checked(
    config: &Config,
    path: &Path,
    content: &str,
    doc: &Document,
    item: &str,
    checked: bool,
) -> Result<ExitCode> {
    let edit = match toggle_item(doc, item, checked) {
        Ok(edit) => edit,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            print_suggestions(config, doc, item);
            eprintln!("\nUse 'planedit show' to see all items");
            return Ok(ExitCode::FAILURE);
        }
    };

    let action = format!(
        "{} plan item: {}",
        if checked { "Checked" } else { "Unchecked" },
        edit.outcome.text
    );
    finish(path, content, &edit.document, &action)?;

    if let Some(excerpt) = phase_excerpt(&edit.document, edit.outcome.phase) {
        println!("\n{}", excerpt);
    }
    Ok(ExitCode::SUCCESS)
}

fn print_suggestions(config: &Config, doc: &Document, item: &str) {
    let suggestions = find_similar_items(doc, item, config.suggest.threshold);
    if suggestions.is_empty() {
        return;
    }
    eprintln!("\nDid you mean:");
    for (text, score) in suggestions.into_iter().take(config.suggest.limit) {
        eprintln!("  • {} (similarity: {:.0}%)", text, score * 100.0);
    }
}

fn warn_phase_fallback(doc: &Document, query: &str, target: &str) {
    if query.trim().is_empty() {
        return;
    }
    eprintln!(
        "{} Phase '{}' not found; added to last phase '{}'",
        "Warning:".yellow().bold(),
        query,
        target
    );
    eprintln!("Available phases:");
    for name in doc.phase_names() {
        eprintln!("  • {}", name);
    }
}

fn plan_failure(e: &PlanError) -> Result<ExitCode> {
    eprintln!("{} {}", "Error:".red().bold(), e);
    Ok(ExitCode::FAILURE)
}

/// Write the edited plan if it changed, then report the action and progress
fn finish(path: &Path, original: &str, doc: &Document, action: &str) -> Result<()> {
    let updated = serialize(doc);
    if updated != original {
        fs::write(path, &updated)
            .with_context(|| format!("Failed to write plan file {}", path.display()))?;
    }
    tracing::info!(file = %path.display(), "{}", action);

    let progress = compute_progress(doc);
    println!("{} {}", "Updated".green(), path.display());
    println!("{}", action);
    println!(
        "Progress: {}/{} items complete ({}%)",
        progress.checked,
        progress.total,
        progress.percent()
    );
    Ok(())
}
