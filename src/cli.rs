//! CLI definition and dispatch.
//!
//! Each subcommand has a `*_command` function that does the work and
//! returns data; `run` prints the result and maps errors to exit codes.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_export_adapter::CsvExportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::json_ledger_adapter::JsonLedgerAdapter;
use crate::domain::config_validation::{LedgerBackend, LedgerSettings, Settings};
use crate::domain::error::MiloError;
use crate::domain::metrics::{SetupSummary, compute_per_setup};
use crate::domain::pipeline::{SignalAnalysis, evaluate_guarded};
use crate::domain::registry::TradeRegistry;
use crate::domain::signal_request::SignalInput;
use crate::domain::toxicity::{ToxicityReport, ToxicityWarning, audit};
use crate::domain::trade_record::{TradeRecord, TradeStatus};
use crate::ports::export_port::ExportPort;
use crate::ports::ledger_port::LedgerPort;

#[derive(Parser, Debug)]
#[command(name = "milo", about = "Protocol D signal calculator and trade ledger")]
pub struct Cli {
    /// INI settings file; defaults apply when omitted
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Evaluate a setup and register the resulting trade
    Signal {
        #[arg(long)]
        id: String,
        #[arg(long)]
        instrument: String,
        #[arg(long)]
        price: String,
        /// Yesterday's candle as "open,high,low,close"
        #[arg(long)]
        ohlc: String,
        /// Weekly range as "high,low"
        #[arg(long)]
        weekly: String,
        #[arg(long)]
        atr: String,
        /// Print the analysis without touching the ledger
        #[arg(long)]
        no_record: bool,
    },
    /// Close the first open trade with an identifier
    Close {
        #[arg(long)]
        id: String,
        #[arg(long, value_enum)]
        outcome: CloseOutcome,
        /// Close price; required for manual closes
        #[arg(long)]
        price: Option<f64>,
    },
    /// List ledger entries
    List {
        /// Only trades still open
        #[arg(long)]
        open: bool,
    },
    /// Report toxic setups and contexts
    Audit,
    /// Per-setup performance table
    Summary,
    /// Export the ledger as CSV
    Export {
        #[arg(short, long)]
        output: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CloseOutcome {
    Tp,
    Sl,
    Manual,
}

pub fn run(cli: Cli) -> ExitCode {
    let result = load_settings(cli.config.as_deref()).and_then(|settings| {
        dispatch(&settings, cli.command)
    });
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn dispatch(settings: &Settings, command: Command) -> Result<(), MiloError> {
    match command {
        Command::Signal {
            id,
            instrument,
            price,
            ohlc,
            weekly,
            atr,
            no_record,
        } => {
            let input = SignalInput {
                id_signal: id,
                instrument,
                current_price: price,
                ohlc_yesterday: ohlc,
                weekly_range: weekly,
                atr_5d: atr,
            };
            let outcome = signal_command(settings, &input, !no_record)?;
            println!("{}", outcome.analysis.report);
            println!();
            println!("Verdict: {}", outcome.analysis.verdict);
            for warning in &outcome.warnings {
                eprintln!("{}", format_warning(warning));
            }
            if outcome.registered {
                eprintln!("Trade registered in {}", settings.ledger.path.display());
            }
        }
        Command::Close { id, outcome, price } => {
            let record = close_command(settings, &id, outcome, price)?;
            println!(
                "Closed {} as {} at {} ({:+.2} pts)",
                record.id_signal,
                record.status,
                record.close_price.map_or_else(String::new, |p| format!("{p:.2}")),
                record.p_g_points.unwrap_or(0.0)
            );
        }
        Command::List { open } => {
            let records = list_command(settings, open)?;
            if records.is_empty() {
                eprintln!("No trades found");
            } else {
                print!("{}", format_trade_table(&records));
                eprintln!("{} trades", records.len());
            }
        }
        Command::Audit => {
            let report = audit_command(settings)?;
            print!("{}", format_toxicity_report(&report));
        }
        Command::Summary => {
            let rows = summary_command(settings)?;
            if rows.is_empty() {
                eprintln!("No trades found");
            } else {
                print!("{}", format_summary_table(&rows));
            }
        }
        Command::Export { output } => {
            let rows = export_command(settings, &output)?;
            eprintln!("Exported {} trades to {}", rows, output.display());
        }
    }
    Ok(())
}

pub fn load_settings(path: Option<&Path>) -> Result<Settings, MiloError> {
    let adapter = match path {
        Some(p) => FileConfigAdapter::from_file(p)?,
        None => FileConfigAdapter::empty(),
    };
    Settings::from_config(&adapter)
}

pub fn open_ledger(settings: &LedgerSettings) -> Result<Box<dyn LedgerPort>, MiloError> {
    match settings.backend {
        LedgerBackend::Json => Ok(Box::new(JsonLedgerAdapter::new(&settings.path))),
        #[cfg(feature = "sqlite")]
        LedgerBackend::Sqlite => {
            use crate::adapters::sqlite_ledger_adapter::SqliteLedgerAdapter;
            Ok(Box::new(SqliteLedgerAdapter::from_path(&settings.path)?))
        }
        #[cfg(not(feature = "sqlite"))]
        LedgerBackend::Sqlite => Err(MiloError::ConfigInvalid {
            section: "ledger".to_string(),
            key: "backend".to_string(),
            reason: "sqlite support is not compiled in (enable the 'sqlite' feature)".to_string(),
        }),
    }
}

pub fn open_registry(settings: &Settings) -> Result<TradeRegistry, MiloError> {
    let registry = TradeRegistry::load(open_ledger(&settings.ledger)?);
    if let Some(reason) = registry.recovered_from() {
        eprintln!("warning: ledger could not be read ({reason}); starting from an empty ledger");
    }
    Ok(registry)
}

#[derive(Debug)]
pub struct SignalOutcome {
    pub analysis: SignalAnalysis,
    pub warnings: Vec<ToxicityWarning>,
    pub registered: bool,
}

/// Validate, evaluate and, when a signal is generated and `record` is set,
/// append it to the ledger. Toxicity warnings are computed from the ledger
/// as it stood before the append and never block registration.
pub fn signal_command(
    settings: &Settings,
    input: &SignalInput,
    record: bool,
) -> Result<SignalOutcome, MiloError> {
    let request = input.parse()?;
    let analysis = evaluate_guarded(&request, &settings.protocol)?;

    let Some(trade) = analysis.record.clone() else {
        return Ok(SignalOutcome {
            analysis,
            warnings: Vec::new(),
            registered: false,
        });
    };

    let mut registry = open_registry(settings)?;
    let report = audit(registry.records(), &settings.toxicity);
    let warnings = report.warnings_for(&trade, &settings.toxicity);
    for w in &warnings {
        tracing::warn!(label = %w.label, loss_rate = w.stats.loss_rate, "toxic setup");
    }

    if record {
        registry.append(trade)?;
    }

    Ok(SignalOutcome {
        analysis,
        warnings,
        registered: record,
    })
}

pub fn close_command(
    settings: &Settings,
    id_signal: &str,
    outcome: CloseOutcome,
    price: Option<f64>,
) -> Result<TradeRecord, MiloError> {
    let mut registry = open_registry(settings)?;
    let status = match outcome {
        CloseOutcome::Tp => TradeStatus::Tp,
        CloseOutcome::Sl => {
            let open = registry
                .find_open(id_signal)
                .ok_or_else(|| MiloError::TradeNotFound {
                    id_signal: id_signal.to_string(),
                })?;
            TradeStatus::stop_loss_for(open.direction)
        }
        CloseOutcome::Manual => {
            if !price.is_some_and(|p| p.is_finite() && p > 0.0) {
                return Err(MiloError::validation(
                    "price",
                    "a positive --price is required for manual closes",
                ));
            }
            TradeStatus::Manual
        }
    };
    registry.close(id_signal, status, price).cloned()
}

pub fn list_command(settings: &Settings, open_only: bool) -> Result<Vec<TradeRecord>, MiloError> {
    let registry = open_registry(settings)?;
    Ok(if open_only {
        registry.open_records().cloned().collect()
    } else {
        registry.records().to_vec()
    })
}

pub fn audit_command(settings: &Settings) -> Result<ToxicityReport, MiloError> {
    let registry = open_registry(settings)?;
    Ok(audit(registry.records(), &settings.toxicity))
}

pub fn summary_command(settings: &Settings) -> Result<Vec<SetupSummary>, MiloError> {
    let registry = open_registry(settings)?;
    Ok(compute_per_setup(registry.records()))
}

pub fn export_command(settings: &Settings, output: &Path) -> Result<usize, MiloError> {
    let registry = open_registry(settings)?;
    CsvExportAdapter.export(registry.records(), &output.to_string_lossy())?;
    Ok(registry.records().len())
}

pub fn format_warning(warning: &ToxicityWarning) -> String {
    format!(
        "warning: {} is toxic ({} closed trades, {:.1}% losses)",
        warning.label,
        warning.stats.total,
        warning.stats.loss_rate * 100.0
    )
}

pub fn format_trade_table(records: &[TradeRecord]) -> String {
    let mut out = format!(
        "{:<10} {:<12} {:<5} {:>12} {:>12} {:>12} {:<26} {:<8} {:>12} {:>10}\n",
        "ID", "INSTRUMENT", "DIR", "ENTRY", "SL", "TP", "SETUP", "STATUS", "CLOSE", "P/G"
    );
    for r in records {
        out.push_str(&format!(
            "{:<10} {:<12} {:<5} {:>12.2} {:>12.2} {:>12.2} {:<26} {:<8} {:>12} {:>10}\n",
            r.id_signal,
            r.instrument,
            r.direction,
            r.entry_price,
            r.sl_price,
            r.tp_price,
            r.setup_tag,
            r.status,
            r.close_price.map_or_else(|| "-".to_string(), |p| format!("{p:.2}")),
            r.p_g_points.map_or_else(|| "-".to_string(), |p| format!("{p:+.2}")),
        ));
    }
    out
}

pub fn format_summary_table(rows: &[SetupSummary]) -> String {
    let mut out = format!(
        "{:<26} {:>6} {:>6} {:>6} {:>12} {:>8}\n",
        "SETUP", "OPS", "WON", "LOST", "NET PTS", "RATIO"
    );
    for row in rows {
        out.push_str(&format!(
            "{:<26} {:>6} {:>6} {:>6} {:>12.2} {:>8.2}\n",
            row.setup_tag, row.total_ops, row.won, row.lost, row.net_points, row.ratio
        ));
    }
    out
}

pub fn format_toxicity_report(report: &ToxicityReport) -> String {
    if report.is_clean() {
        return "No toxic setups or contexts\n".to_string();
    }
    let mut out = String::new();
    for (title, entries) in [("Toxic setups", &report.setups), ("Toxic contexts", &report.contexts)] {
        if entries.is_empty() {
            continue;
        }
        out.push_str(&format!("{title}:\n"));
        for (label, stats) in entries {
            out.push_str(&format!(
                "  {:<26} {:>4} trades  {:>6.1}% losses\n",
                label,
                stats.total,
                stats.loss_rate * 100.0
            ));
        }
    }
    out
}
