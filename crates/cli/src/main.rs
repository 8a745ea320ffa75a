use clap::{Parser, Subcommand};
use medication_core::repositories::file::FileMedicationRepository;
use medication_core::repositories::memory::InMemoryMedicationRepository;
use medication_core::{CoreConfig, Medication, MedicationService};
use std::io::{self, Write};
use std::sync::Arc;

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(name = "medication")]
#[command(about = "Medication records CLI")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Map free text to ICD-10 candidates
    Map {
        /// Clinical text to annotate
        text: String,
    },
    /// List all medications
    List,
    /// Show one medication as JSON
    Get {
        /// Medication id
        id: String,
    },
    /// Search medications by name, description or indication
    Search {
        /// Case-insensitive search text
        query: String,
    },
    /// Delete a medication
    Delete {
        /// Medication id
        id: String,
    },
}

/// Service over the file store under `MEDICATION_DATA_DIR`, regardless of `MEDICATION_STORAGE`.
fn file_service() -> CliResult<MedicationService> {
    let cfg = CoreConfig::from_env()?;
    let repository = FileMedicationRepository::open(cfg.medications_dir())?;
    Ok(MedicationService::new(Arc::new(repository)))
}

fn write_summary(out: &mut impl Write, medication: &Medication) -> io::Result<()> {
    writeln!(
        out,
        "ID: {}, Name: {}, Dosage: {}, Frequency: {}, Created: {}",
        medication.id,
        medication.name,
        medication.dosage,
        medication.frequency,
        medication.created_at
    )
}

async fn run(
    command: Commands,
    service: &MedicationService,
    out: &mut impl Write,
) -> CliResult<()> {
    match command {
        Commands::Map { text } => {
            for candidate in service.extract_and_map_indications(&text) {
                writeln!(
                    out,
                    "{:<7} {:.2}  {}",
                    candidate.code, candidate.confidence, candidate.code_description
                )?;
            }
        }
        Commands::List => {
            let medications = service.get_all().await?;
            if medications.is_empty() {
                writeln!(out, "No medications found.")?;
            }
            for medication in &medications {
                write_summary(out, medication)?;
            }
        }
        Commands::Get { id } => match service.get_by_id(&id).await? {
            Some(medication) => writeln!(out, "{}", serde_json::to_string_pretty(&medication)?)?,
            None => writeln!(out, "Medication not found: {}", id)?,
        },
        Commands::Search { query } => {
            let medications = service.search(&query).await?;
            if medications.is_empty() {
                writeln!(out, "No medications match '{}'.", query)?;
            }
            for medication in &medications {
                write_summary(out, medication)?;
            }
        }
        Commands::Delete { id } => {
            if service.delete(&id).await? {
                writeln!(out, "Deleted medication: {}", id)?;
            } else {
                writeln!(out, "Medication not found: {}", id)?;
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> CliResult<()> {
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        println!("Use 'medication --help' for commands");
        return Ok(());
    };

    // `map` runs without touching the data directory
    let service = match command {
        Commands::Map { .. } => {
            MedicationService::new(Arc::new(InMemoryMedicationRepository::new()))
        }
        _ => file_service()?,
    };

    run(command, &service, &mut io::stdout().lock()).await
}
