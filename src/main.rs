use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Instant;

use site_rank::charts::{self, ChartSink, SvgCharts, TerminalCharts};
use site_rank::output::{self, OutputFormat};

const EXIT_SUCCESS: i32 = 0;
const EXIT_CHART: i32 = 2;
const EXIT_INPUT: i32 = 4;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Score and rank the candidate cities (default if no subcommand)
    Analyze,
    /// Print the dataset as YAML (a starting point for --config)
    Dataset,
}

#[derive(Parser, Debug)]
#[command(name = "site-rank")]
#[command(about = "Distribution center site selection by weighted scoring", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging and per-city score breakdowns
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to a YAML dataset (defaults to the built-in Recife vs. Salvador data)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Console output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table, global = true)]
    format: OutputFormat,

    /// Skip chart rendering
    #[arg(long, global = true)]
    no_charts: bool,

    /// Write the charts as SVG files into this directory instead of showing them
    #[arg(long, global = true)]
    svg_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

fn main() {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Analyze);
    let start_time = Instant::now();

    site_rank::logging::init_tracing(cli.verbose);

    // Load dataset
    let dataset_path = cli.config.map(PathBuf::from);
    let dataset = match site_rank::config::load_dataset(dataset_path) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Dataset error: {:#}", e);
            std::process::exit(EXIT_INPUT);
        }
    };

    if let Commands::Dataset = command {
        match site_rank::config::dataset_to_yaml(&dataset) {
            Ok(yaml) => {
                print!("{}", yaml);
                std::process::exit(EXIT_SUCCESS);
            }
            Err(e) => {
                eprintln!("Dataset error: {:#}", e);
                std::process::exit(EXIT_INPUT);
            }
        }
    }

    // Validate before scoring so every problem is listed at once
    if let Err(errors) = site_rank::scoring::validate_dataset(&dataset) {
        eprintln!("Dataset errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_INPUT);
    }

    let ranking = match site_rank::scoring::score_dataset(&dataset) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Scoring error: {:#}", e);
            std::process::exit(EXIT_INPUT);
        }
    };

    let Some(winner) = ranking.winner() else {
        eprintln!("No cities to rank.");
        std::process::exit(EXIT_INPUT);
    };

    // Console output
    let use_colors = output::should_use_colors();
    match cli.format {
        OutputFormat::Table => {
            println!("--- Distribution center site analysis ---");
            println!();
            println!("{}", output::format_score_table(&ranking, use_colors));
            println!();
            println!("--- Conclusion ---");
            println!("{}", output::format_conclusion(winner, use_colors));
        }
        OutputFormat::Tsv => println!("{}", output::format_tsv(&ranking)),
        OutputFormat::Json => match output::format_json(&ranking) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Output error: {:#}", e);
                std::process::exit(EXIT_INPUT);
            }
        },
    }

    if cli.verbose {
        eprintln!();
        for record in ranking.ranked() {
            eprintln!("{}", output::format_breakdown(record));
        }
    }

    // Charts come last: a rendering failure leaves the printed results intact
    if !cli.no_charts {
        let mut sink: Option<Box<dyn ChartSink>> = match cli.svg_dir {
            Some(dir) => Some(Box::new(SvgCharts::new(dir))),
            None if use_colors => Some(Box::new(TerminalCharts::new())),
            None => {
                tracing::info!(
                    "stdout is not a terminal; skipping charts (use --svg-dir to write them)"
                );
                None
            }
        };

        if let Some(sink) = sink.as_deref_mut() {
            if let Err(e) = charts::render_all(sink, &ranking, &dataset) {
                eprintln!("Chart rendering failed: {:#}", e);
                std::process::exit(EXIT_CHART);
            }
        }
    }

    tracing::debug!(
        cities = ranking.len(),
        elapsed = ?start_time.elapsed(),
        "analysis complete"
    );

    std::process::exit(EXIT_SUCCESS);
}
