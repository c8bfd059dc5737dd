use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use matvar::{
    parse_index_list, parse_range, ColumnMatrix, DenseMatrix, IoConfig, MatVar, MatVarShape,
    MatrixIo, MatrixKind, SparseMatrix,
};

#[derive(Parser)]
#[command(author, version, long_about = None)]
#[command(about = "MatVar CLI - Inspect and reshape variable-length matrix collection files")]
struct Cli {
    /// Files hold a sparse (CSC) backend instead of a dense one
    #[arg(long, global = true)]
    sparse: bool,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the shape and per-data-point widths
    Info {
        /// Collection file
        file: PathBuf,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Write a new collection holding selected data points
    Select {
        /// Collection file
        file: PathBuf,

        /// Output file
        #[arg(short, long)]
        output: PathBuf,

        /// Data point indices in output order (format: 2,0,0)
        #[arg(long, conflicts_with = "range", required_unless_present = "range")]
        indices: Option<String>,

        /// Data point range (format: start:end)
        #[arg(long)]
        range: Option<String>,
    },
    /// Append the data points of one collection to another
    Cbind {
        /// Leading collection
        first: PathBuf,

        /// Trailing collection
        second: PathBuf,

        /// Output file
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Re-tile a collection so every column is one data point
    Separate {
        /// Collection file
        file: PathBuf,

        /// Output file
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Write only the backing matrix of a collection
    ExportMatrix {
        /// Collection file
        file: PathBuf,

        /// Output file
        #[arg(short, long)]
        output: PathBuf,
    },
}

#[derive(Serialize)]
struct InfoReport {
    kind: MatrixKind,
    shape: MatVarShape,
    nonzero_num: usize,
    widths: Vec<usize>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = IoConfig::default();
    let start_time = std::time::Instant::now();

    if cli.sparse {
        run::<SparseMatrix<f32>>(&cli.command, &config)?;
    } else {
        run::<DenseMatrix<f32>>(&cli.command, &config)?;
    }

    tracing::debug!(elapsed = ?start_time.elapsed(), "command completed");
    Ok(())
}

fn run<M>(command: &Commands, config: &IoConfig) -> Result<(), Box<dyn std::error::Error>>
where
    M: ColumnMatrix + MatrixIo,
{
    match command {
        Commands::Info { file, json } => {
            let mv = MatVar::<M>::read_file(file, config)?;
            handle_info(&mv, *json)?;
        }
        Commands::Select {
            file,
            output,
            indices,
            range,
        } => {
            let mv = MatVar::<M>::read_file(file, config)?;
            let selected = match (indices, range) {
                (Some(list), _) => mv.select(&parse_index_list(list)?)?,
                (None, Some(range)) => mv.select_range(parse_range(range)?)?,
                (None, None) => return Err("either --indices or --range is required".into()),
            };
            write_and_report(&selected, output)?;
        }
        Commands::Cbind {
            first,
            second,
            output,
        } => {
            let mut mv = MatVar::<M>::read_file(first, config)?;
            let other = MatVar::<M>::read_file(second, config)?;
            mv.cbind(&other)?;
            write_and_report(&mv, output)?;
        }
        Commands::Separate { file, output } => {
            let mut mv = MatVar::<M>::read_file(file, config)?;
            mv.separate_columns()?;
            write_and_report(&mv, output)?;
        }
        Commands::ExportMatrix { file, output } => {
            let mv = MatVar::<M>::read_file(file, config)?;
            mv.write_matrix_file(output)?;
            let (rows, cols) = mv.matrix().dimensions();
            println!("Wrote {rows} x {cols} {} matrix to {}", M::KIND, output.display());
        }
    }
    Ok(())
}

fn handle_info<M>(mv: &MatVar<M>, json: bool) -> Result<(), Box<dyn std::error::Error>>
where
    M: ColumnMatrix + MatrixIo,
{
    let report = InfoReport {
        kind: M::KIND,
        shape: mv.shape(),
        nonzero_num: mv.matrix().nonzero_num(),
        widths: mv.ranges().map(|r| r.len()).collect(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Collection info:");
    println!("  Backend: {}", report.kind);
    println!("  Shape: {}", report.shape);
    println!("  Non-zeros: {}", report.nonzero_num);
    for (idx, range) in mv.ranges().enumerate() {
        println!("  [{idx}] columns {}..{} (width {})", range.start, range.end, range.len());
    }
    Ok(())
}

fn write_and_report<M>(mv: &MatVar<M>, output: &Path) -> Result<(), Box<dyn std::error::Error>>
where
    M: ColumnMatrix + MatrixIo,
{
    mv.write_file(output)?;
    println!("Wrote {} to {}", mv.shape(), output.display());
    Ok(())
}
