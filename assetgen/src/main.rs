//! assetgen CLI - Generate asset metadata and pointset files from a workbook
//!
//! # Commands
//!
//! ```bash
//! assetgen generate site/assets.xlsx            # Write site/<asset>/metadata.json + pointset.json
//! assetgen generate assets.xlsx -o out/         # Write under out/ instead
//! assetgen inspect assets.xlsx                  # List sheets and columns
//! assetgen inspect assets.xlsx --sheet Assets   # Dump one sheet as JSON
//! assetgen validate site/                       # Check generated files against the schemas
//! ```

use assetgen::logs::{log_error, log_info, LOG_SINK};
use assetgen::{generate_metadata, load_workbook, validate_output_dir, GenerateOptions};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "assetgen")]
#[command(
    about = "Generate per-asset metadata and pointset files from an asset workbook",
    long_about = None
)]
struct Cli {
    /// Print progress details
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only print errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate metadata.json and pointset.json for every asset in a workbook
    Generate {
        /// Input workbook (xlsx, xlsm, xlsb, xls, ods)
        input: PathBuf,

        /// Output root (default: the workbook's directory)
        #[arg(short, long, env = "ASSETGEN_OUTPUT_DIR")]
        output_dir: Option<PathBuf>,

        /// Skip schema validation of records before writing
        #[arg(long)]
        no_validate: bool,
    },

    /// List the sheets of a workbook, or dump one sheet as JSON
    Inspect {
        /// Input workbook
        input: PathBuf,

        /// Sheet to dump as a JSON array of row objects
        #[arg(short, long)]
        sheet: Option<String>,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate generated asset folders against the embedded schemas
    Validate {
        /// Directory containing <asset>/metadata.json folders
        dir: PathBuf,
    },
}

fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    LOG_SINK.set_verbose(cli.verbose);
    LOG_SINK.set_quiet(cli.quiet);

    let result = match cli.command {
        Commands::Generate {
            input,
            output_dir,
            no_validate,
        } => cmd_generate(&input, output_dir, no_validate),

        Commands::Inspect {
            input,
            sheet,
            output,
        } => cmd_inspect(&input, sheet.as_deref(), output.as_deref()),

        Commands::Validate { dir } => cmd_validate(&dir),
    };

    if let Err(e) = result {
        log_error(e.to_string());
        std::process::exit(1);
    }
}

fn cmd_generate(
    input: &Path,
    output_dir: Option<PathBuf>,
    no_validate: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let options = GenerateOptions {
        output_dir,
        skip_validation: no_validate,
    };

    let report = generate_metadata(input, &options)?;
    log_info(format!(
        "Done: {} of {} asset rows written under {}",
        report.emitted.len(),
        report.asset_rows,
        report.output_root.display()
    ));

    Ok(())
}

fn cmd_inspect(
    input: &Path,
    sheet: Option<&str>,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let workbook = load_workbook(input)?;

    match sheet {
        Some(name) => {
            let records = workbook.require_sheet(name)?.to_records();
            let json = serde_json::to_string_pretty(&records)?;
            write_output(&json, output)?;
        }
        None => {
            let mut listing = String::new();
            for (name, sheet) in workbook.sheets() {
                listing.push_str(&format!(
                    "{} ({} rows, {} columns)\n",
                    name,
                    sheet.len(),
                    sheet.headers().len()
                ));
                for (i, header) in sheet.headers().iter().enumerate() {
                    listing.push_str(&format!("  [{:2}] {}\n", i + 1, header));
                }
            }
            write_output(listing.trim_end(), output)?;
        }
    }

    Ok(())
}

fn cmd_validate(dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let checks = validate_output_dir(dir)?;

    let invalid: Vec<_> = checks.iter().filter(|c| !c.is_valid()).collect();
    for check in &invalid {
        eprintln!("{}:", check.path.display());
        for err in check.errors.iter().take(5) {
            eprintln!("   - {}", err);
        }
    }

    println!(
        "{} files checked: {} valid, {} invalid",
        checks.len(),
        checks.len() - invalid.len(),
        invalid.len()
    );

    if !invalid.is_empty() {
        return Err(format!("{} files failed validation", invalid.len()).into());
    }

    Ok(())
}

fn write_output(content: &str, path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
            log_info(format!("Output written to: {}", p.display()));
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
