// Plant Doctor - houseplant diagnosis from the command line
// Entry point and command dispatch

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use plantdoctor::config::DEFAULT_QUOTA_BYTES;
use plantdoctor::diagnosis::catalog;
use plantdoctor::models::{CaseDraft, CaseRecord, DiagnosisCandidate};
use plantdoctor::services::{export_case, export_history, HistoryService};
use plantdoctor::storage::FileStorage;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "plantdoctor", version, about = "Explainable houseplant diagnosis")]
struct Cli {
    /// Directory holding the case history
    #[arg(long, env = "PLANTDOCTOR_DATA_DIR", default_value = "plantdoctor-data", global = true)]
    data_dir: PathBuf,

    /// Byte quota for the history store
    #[arg(long, env = "PLANTDOCTOR_QUOTA_BYTES", default_value_t = DEFAULT_QUOTA_BYTES, global = true)]
    quota_bytes: usize,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List known symptom and condition ids
    Catalog,
    #[command(flatten)]
    Store(StoreCommand),
}

/// Commands that read or write the case history
#[derive(Subcommand)]
enum StoreCommand {
    /// Diagnose a plant and record the case
    Diagnose {
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long = "type", default_value = "")]
        plant_type: String,
        #[arg(long, default_value = "")]
        environment: String,
        #[arg(long, default_value = "")]
        notes: String,
        /// Observed symptom id (repeatable)
        #[arg(long = "symptom", short = 's')]
        symptoms: Vec<String>,
        /// Condition toggle id that is true (repeatable)
        #[arg(long = "toggle", short = 't')]
        toggles: Vec<String>,
        #[arg(long, default_value_t = 50, value_parser = clap::value_parser!(u8).range(0..=100))]
        moisture: u8,
        #[arg(long, default_value_t = 50, value_parser = clap::value_parser!(u8).range(0..=100))]
        light: u8,
        /// Small thumbnail as a data URL
        #[arg(long)]
        thumb_url: Option<String>,
    },
    /// List stored cases, newest first
    History,
    /// Export the history, or one case, as pretty JSON
    Export {
        /// Export only this case
        #[arg(long)]
        case: Option<String>,
        /// Directory to write into
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
    /// Delete one case
    Delete { id: String },
    /// Delete every case
    Clear,
    /// Keep the newest cases and strip all thumbnails
    Compact,
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "plantdoctor=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Catalog => print_catalog(),
        Command::Store(command) => {
            let mut service = open_history(cli.data_dir, cli.quota_bytes)?;
            run(command, &mut service)?;

            if let Some(notice) = service.notice() {
                eprintln!("{}", notice);
            }
        }
    }

    Ok(())
}

fn open_history(data_dir: PathBuf, quota_bytes: usize) -> anyhow::Result<HistoryService<FileStorage>> {
    let storage = FileStorage::new(data_dir, quota_bytes);
    storage
        .initialize()
        .with_context(|| format!("Failed to open data dir {:?}", storage.root()))?;

    let mut service = HistoryService::new(storage);
    service.load().context("Failed to load case history")?;
    Ok(service)
}

fn run(command: StoreCommand, service: &mut HistoryService<FileStorage>) -> anyhow::Result<()> {
    match command {
        StoreCommand::Diagnose {
            name,
            plant_type,
            environment,
            notes,
            symptoms,
            toggles,
            moisture,
            light,
            thumb_url,
        } => {
            for id in &symptoms {
                if catalog::symptom(id).is_none() {
                    bail!("Unknown symptom: {} (see `plantdoctor catalog`)", id);
                }
            }
            for id in &toggles {
                if catalog::toggle(id).is_none() {
                    bail!("Unknown condition: {} (see `plantdoctor catalog`)", id);
                }
            }

            let draft = CaseDraft {
                plant_name: name,
                plant_type,
                environment,
                notes,
                symptoms: symptoms.into_iter().collect(),
                toggles: toggles.into_iter().map(|t| (t, true)).collect(),
                moisture_level: moisture,
                light_level: light,
                thumb_url,
                image_url: None,
            };

            let record = service.diagnose(draft)?;
            print_results(&record.results);
            println!("\nSaved as case {}", record.id);
        }
        StoreCommand::History => {
            for record in service.history() {
                print_summary(record);
            }
            println!(
                "\n{} cases, stored history size ≈ {} KB",
                service.history().len(),
                service.storage_size_kb()?
            );
        }
        StoreCommand::Export { case, out } => {
            let file = match case {
                Some(id) => export_case(service.get_case(&id)?)?,
                None => export_history(service.history())?,
            };
            let path = file.write_to(&out)?;
            println!("Exported {}", path.display());
        }
        StoreCommand::Delete { id } => {
            service.delete_case(&id)?;
            println!("Deleted case {}", id);
        }
        StoreCommand::Clear => {
            service.clear()?;
            println!("History cleared");
        }
        StoreCommand::Compact => {
            service.compact()?;
        }
    }

    Ok(())
}

fn print_catalog() {
    println!("Symptoms:");
    for entry in catalog::SYMPTOMS {
        println!("  {:<14} {}", entry.id, entry.label);
    }
    println!("Conditions:");
    for entry in catalog::TOGGLES {
        println!("  {:<14} {}", entry.id, entry.label);
    }
}

fn print_results(results: &[DiagnosisCandidate]) {
    for candidate in results {
        println!(
            "{:>3.0}%  [{}] {}",
            candidate.confidence * 100.0,
            candidate.urgency,
            candidate.issue
        );
        for reason in &candidate.reasons {
            println!("        - {}", reason);
        }
        for action in &candidate.actions {
            println!("        > {}", action);
        }
    }
}

fn print_summary(record: &CaseRecord) {
    let top = record
        .results
        .first()
        .map(|c| c.issue.as_str())
        .unwrap_or("-");
    let name = if record.plant_name.is_empty() {
        "(unnamed)"
    } else {
        record.plant_name.as_str()
    };

    println!(
        "{}  {}  {:<20} {}",
        record.created_at.format("%Y-%m-%d %H:%M"),
        record.id,
        name,
        top
    );
}
