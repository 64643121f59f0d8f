//! caseflat CLI - normalize and flatten case-record report exports
//!
//! # Main Commands
//!
//! ```bash
//! caseflat serve                     # Start HTTP server (port 3000)
//! caseflat process report.xlsx      # Process a report to processed_data.xlsx
//! caseflat inspect report.xlsx      # Show layout, headers, date ratios
//! ```

use clap::{Parser, Subcommand, ValueEnum};

use caseflat::{
    classify_layout, column_date_ratio, load_and_trim, process_file, read_workbook,
    DateColumnPolicy, DateStyle, IdentifierColumn, ProcessOptions, DEFAULT_IDENTIFIER_COLUMN,
    LEADING_BOILERPLATE_ROWS, TRAILING_BOILERPLATE_ROWS,
};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "caseflat")]
#[command(about = "Normalize and flatten case-record spreadsheet exports", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full pipeline and write the processed workbook
    Process {
        /// Input XLSX report
        input: PathBuf,

        /// Output file
        #[arg(short, long, default_value = "processed_data.xlsx")]
        output: PathBuf,

        /// How date columns are selected
        #[arg(long, value_enum, default_value = "heuristic")]
        date_policy: PolicyArg,

        /// Detection threshold for the heuristic policy
        #[arg(long, default_value_t = 0.5)]
        threshold: f64,

        /// Column positions for the fixed-positions policy (0-based)
        #[arg(long, value_delimiter = ',')]
        date_positions: Vec<usize>,

        /// Display style for reformatted dates
        #[arg(long, value_enum, default_value = "dashed")]
        date_style: StyleArg,

        /// Identifier column name
        #[arg(long, default_value = DEFAULT_IDENTIFIER_COLUMN)]
        identifier: String,

        /// Identifier column position (overrides --identifier)
        #[arg(long)]
        identifier_position: Option<usize>,
    },

    /// Show what the trimmer and date detection would do, without writing
    Inspect {
        /// Input XLSX report
        input: PathBuf,
    },

    /// Start HTTP server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum PolicyArg {
    /// Detect date columns by parse ratio
    Heuristic,
    /// Use the known template's column names
    FixedNames,
    /// Use --date-positions
    FixedPositions,
}

#[derive(Clone, Copy, ValueEnum)]
enum StyleArg {
    /// DD-MM-YYYY
    Dashed,
    /// DD/MM/YY
    Slashed,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Process {
            input,
            output,
            date_policy,
            threshold,
            date_positions,
            date_style,
            identifier,
            identifier_position,
        } => cmd_process(
            &input,
            &output,
            date_policy,
            threshold,
            date_positions,
            date_style,
            identifier,
            identifier_position,
        ),

        Commands::Inspect { input } => cmd_inspect(&input),

        Commands::Serve { port } => cmd_serve(port).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[allow(clippy::too_many_arguments)]
fn cmd_process(
    input: &Path,
    output: &Path,
    date_policy: PolicyArg,
    threshold: f64,
    date_positions: Vec<usize>,
    date_style: StyleArg,
    identifier: String,
    identifier_position: Option<usize>,
) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("Processing: {}", input.display());

    let options = ProcessOptions {
        date_policy: match date_policy {
            PolicyArg::Heuristic => DateColumnPolicy::Heuristic { threshold },
            PolicyArg::FixedNames => DateColumnPolicy::fixed_default(),
            PolicyArg::FixedPositions => DateColumnPolicy::FixedPositions {
                positions: date_positions,
            },
        },
        date_style: match date_style {
            StyleArg::Dashed => DateStyle::DayMonthYearDashed,
            StyleArg::Slashed => DateStyle::DayMonthYearSlashed,
        },
        identifier: match identifier_position {
            Some(position) => IdentifierColumn::ByPosition { position },
            None => IdentifierColumn::ByName { name: identifier },
        },
    };

    let result = process_file(input, &options)?;

    eprintln!("   Layout: {}", result.info.layout);
    eprintln!("   Rows: {} raw, {} data, {} expanded",
        result.info.raw_rows, result.info.body_rows, result.info.expanded_rows);
    if !result.info.date_columns.is_empty() {
        eprintln!("   Date columns: {}", result.info.date_columns.join(", "));
    }

    std::fs::write(output, &result.xlsx)?;
    eprintln!("Output written to: {}", output.display());

    Ok(())
}

fn cmd_inspect(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("Inspecting: {}", input.display());

    let bytes = std::fs::read(input)?;
    let raw = read_workbook(&bytes)?;
    eprintln!("   Raw rows: {}", raw.len());

    if raw.len() <= LEADING_BOILERPLATE_ROWS + TRAILING_BOILERPLATE_ROWS {
        eprintln!("   Sheet shorter than the trim offsets; nothing would survive.");
        return Ok(());
    }

    let trimmed = &raw[LEADING_BOILERPLATE_ROWS..raw.len() - TRAILING_BOILERPLATE_ROWS];
    eprintln!("   Layout: {}", classify_layout(trimmed));

    let table = load_and_trim(&bytes)?;
    eprintln!("   Data rows: {}", table.row_count());
    eprintln!("   Columns:");
    for (i, header) in table.headers.iter().enumerate() {
        let ratio = column_date_ratio(table.column(i));
        eprintln!("   [{:2}] {} (date ratio: {:.0}%)", i, header, ratio * 100.0);
    }

    Ok(())
}

async fn cmd_serve(port: u16) -> Result<(), Box<dyn std::error::Error>> {
    caseflat::server::start_server(port).await
}
