use bmi_core::*;
use clap::{Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "bmi")]
#[command(about = "Body mass index calculator and tracker", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute BMI from height and weight and log it
    Calc {
        /// Height (meters, or inches with --imperial)
        #[arg(allow_hyphen_values = true)]
        height: String,

        /// Weight (kilograms, or pounds with --imperial)
        #[arg(allow_hyphen_values = true)]
        weight: String,

        /// Interpret input as inches and pounds
        #[arg(long, conflicts_with = "metric")]
        imperial: bool,

        /// Interpret input as meters and kilograms
        #[arg(long, conflicts_with = "imperial")]
        metric: bool,
    },

    /// Show recent entries, newest first
    History {
        /// Number of rows to show
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Delete entries by their row number in `history`
    Delete {
        /// Row numbers as shown by `history`
        #[arg(required = true)]
        rows: Vec<usize>,
    },

    /// Write the history with a header row
    Export {
        /// Destination file (defaults to the history file itself)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Append entries from a CSV file whose first row is a header
    Import {
        path: PathBuf,

        /// Skip rows that fail the checks applied to manual entry
        #[arg(long)]
        validate: bool,
    },

    /// Show the BMI trend of recent entries
    Trend {
        /// Number of entries to plot
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Interactive session (default)
    Shell,
}

fn main() -> ExitCode {
    // Initialize logging
    bmi_core::logging::init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", describe_error(&e));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load()?;
    let data_dir = cli
        .data_dir
        .unwrap_or_else(|| config.data.data_dir.clone());
    let store = HistoryStore::new(config.history_path(&data_dir));

    match cli.command {
        Some(Commands::Calc {
            height,
            weight,
            imperial,
            metric,
        }) => {
            let units = if imperial {
                UnitSystem::Imperial
            } else if metric {
                UnitSystem::Metric
            } else {
                config.display.default_units
            };
            let mut session = Session::open(store, units, config.display.recent_limit)?;
            cmd_calc(&mut session, &height, &weight, &config)
        }
        Some(Commands::History { limit }) => {
            let limit = limit.unwrap_or(config.display.recent_limit);
            let session = Session::open(store, config.display.default_units, limit)?;
            display_history(&session);
            Ok(())
        }
        Some(Commands::Delete { rows }) => {
            let mut session = open_session(store, &config)?;
            cmd_delete(&mut session, &rows)
        }
        Some(Commands::Export { output }) => {
            let session = open_session(store, &config)?;
            cmd_export(&session, output.as_deref())
        }
        Some(Commands::Import { path, validate }) => {
            let mut session = open_session(store, &config)?;
            cmd_import(&mut session, &path, validate)
        }
        Some(Commands::Trend { limit }) => {
            let session = open_session(store, &config)?;
            let limit = limit.unwrap_or(config.display.trend_limit);
            cmd_trend(&session, limit)
        }
        Some(Commands::Shell) | None => {
            let mut session = open_session(store, &config)?;
            run_shell(&mut session, &config)
        }
    }
}

fn open_session(store: HistoryStore, config: &Config) -> Result<Session> {
    Session::open(
        store,
        config.display.default_units,
        config.display.recent_limit,
    )
}

/// User-facing text chosen per error kind
fn describe_error(error: &Error) -> String {
    if error.is_input_error() {
        return format!("Input Error: {}", error);
    }
    match error.kind() {
        ErrorKind::MalformedRecord => format!("History Error: {}", error),
        ErrorKind::Io => format!("File Error: {}", error),
        _ => format!("Error: {}", error),
    }
}

fn cmd_calc(session: &mut Session, height: &str, weight: &str, config: &Config) -> Result<()> {
    let calc = session.calculate(height, weight)?;

    println!(
        "BMI: {:.1} {} | {}",
        calc.reading.bmi,
        calc.units.suffix(),
        calc.reading.classification
    );
    println!("{}", calc.advice());

    // Chart refresh never fails the calculation
    match session.trend(config.display.trend_limit) {
        Ok(Trend::Series(points)) => {
            println!();
            print!("{}", render_trend(&points));
        }
        Ok(Trend::NotEnoughData) => {}
        Err(e) => tracing::warn!("Skipping trend chart: {}", e),
    }

    Ok(())
}

fn cmd_delete(session: &mut Session, rows: &[usize]) -> Result<()> {
    let removed = session.delete_displayed(rows)?;
    if removed == 0 {
        println!("Please select rows to delete.");
    } else {
        println!("✓ Deleted {} entries", removed);
    }
    Ok(())
}

fn cmd_export(session: &Session, output: Option<&Path>) -> Result<()> {
    let path = session.export(output)?;
    println!("✓ Exported {} entries", session.len());
    println!("  CSV: {}", path.display());
    Ok(())
}

fn cmd_import(session: &mut Session, path: &Path, validate: bool) -> Result<()> {
    let mode = if validate {
        ImportMode::Validated
    } else {
        ImportMode::Verbatim
    };
    let summary = session.import(path, mode)?;

    println!("✓ Imported {} entries", summary.appended);
    if summary.skipped > 0 {
        println!("  Skipped {} invalid entries", summary.skipped);
    }
    Ok(())
}

fn cmd_trend(session: &Session, limit: usize) -> Result<()> {
    match session.trend(limit)? {
        Trend::Series(points) => print!("{}", render_trend(&points)),
        Trend::NotEnoughData => println!("Not enough entries for a trend yet (need at least 2)."),
    }
    Ok(())
}

fn display_history(session: &Session) {
    let rows = session.displayed();
    if rows.is_empty() {
        println!("No entries yet.");
        return;
    }

    println!(
        "{:>4}  {:<16}  {:>6}  {:>6}  {:>5}  {}",
        "#", "Date", "Height", "Weight", "BMI", "Status"
    );
    println!("─────────────────────────────────────────────────────────────");
    for (i, row) in rows.iter().enumerate() {
        let field = |index: usize| row.field(index).unwrap_or("");
        println!(
            "{:>4}  {:<16}  {:>6}  {:>6}  {:>5}  {}",
            i + 1,
            field(0),
            field(1),
            field(2),
            field(3),
            field(4)
        );
    }

    if let Some(status) = rows[0].status() {
        println!();
        println!("Latest: {}", engine::advice_for_label(status));
    }
}

const CHART_WIDTH: usize = 40;

/// Horizontal bar chart of BMI values, oldest at the top
fn render_trend(points: &[TrendPoint]) -> String {
    let mut out = String::from("Your BMI Progress (oldest → newest)\n");
    if points.is_empty() {
        return out;
    }

    let min = points.iter().map(|p| p.bmi).fold(f64::INFINITY, f64::min);
    let max = points.iter().map(|p| p.bmi).fold(f64::NEG_INFINITY, f64::max);
    let floor = (min - 1.0).floor();
    let span = (max + 1.0).ceil() - floor;

    for point in points {
        let filled = (((point.bmi - floor) / span) * CHART_WIDTH as f64).round() as usize;
        out.push_str(&format!(
            "  {:<16} {:>5.1} │{}\n",
            point.date,
            point.bmi,
            "█".repeat(filled.clamp(1, CHART_WIDTH))
        ));
    }
    out
}

const SHELL_HELP: &str = "\
Commands:
  <height> <weight>          compute and log BMI (same as `calc`)
  calc <height> <weight>     compute and log BMI
  units [metric|imperial]    switch input units (toggles without argument)
  history                    show recent entries
  delete <row>...            delete entries by row number
  export [path]              write history with header row
  import <path> [--validate] append entries from a CSV file
  trend                      show the BMI trend
  help                       show this help
  quit                       leave";

fn run_shell(session: &mut Session, config: &Config) -> Result<()> {
    println!("BMI Tracker");
    println!("Units: {}", session.units().label());
    println!("Type 'help' for commands.");

    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut input = String::new();
        if stdin.lock().read_line(&mut input)? == 0 {
            println!();
            break;
        }

        let words: Vec<&str> = input.split_whitespace().collect();
        let Some((command, args)) = words.split_first() else {
            continue;
        };

        let result = match (command.to_lowercase().as_str(), args) {
            ("quit" | "exit" | "q", _) => break,
            ("help" | "?", _) => {
                println!("{}", SHELL_HELP);
                Ok(())
            }
            ("units", []) => {
                let units = session.toggle_units();
                println!("Units: {}", units.label());
                Ok(())
            }
            ("units", [name]) => name.parse::<UnitSystem>().map(|units| {
                session.set_units(units);
                println!("Units: {}", units.label());
            }),
            ("units", _) => {
                println!("Usage: units [metric|imperial]");
                Ok(())
            }
            ("calc", [height, weight]) => cmd_calc(session, height, weight, config),
            ("calc", _) => {
                println!("Usage: calc <height> <weight>");
                Ok(())
            }
            ("history", _) => {
                display_history(session);
                Ok(())
            }
            ("delete", rows) => parse_rows(rows).and_then(|rows| cmd_delete(session, &rows)),
            ("export", []) => cmd_export(session, None),
            ("export", [path]) => cmd_export(session, Some(Path::new(path))),
            ("import", [path]) => cmd_import(session, Path::new(path), false),
            ("import", [path, "--validate"]) => cmd_import(session, Path::new(path), true),
            ("trend", _) => cmd_trend(session, config.display.trend_limit),
            (_, [weight]) => cmd_calc(session, command, weight, config),
            _ => {
                println!("Unknown command: {}. Type 'help' for commands.", command);
                Ok(())
            }
        };

        // Errors are reported and the session continues
        if let Err(e) = result {
            println!("{}", describe_error(&e));
        }
    }

    Ok(())
}

fn parse_rows(args: &[&str]) -> Result<Vec<usize>> {
    args.iter()
        .map(|arg| {
            arg.parse::<usize>()
                .map_err(|_| Error::Other(format!("Not a row number: {}", arg)))
        })
        .collect()
}
