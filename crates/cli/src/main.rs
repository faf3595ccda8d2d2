//! Pipeline timing estimator CLI.
//!
//! This binary provides a single entry point for timing runs. It performs:
//! 1. **Run:** Load a program and an optional JSON configuration, run the functional
//!    and timing passes, and print the cycle count and statistics.
//! 2. **Trace:** Optionally print or dump (as JSON) the stage cycles of every dynamic instruction.
//! 3. **Config:** Print the default configuration as JSON, as a starting point for edits.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process;

use clap::builder::PossibleValuesParser;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use pipetime_core::sim::SimReport;
use pipetime_core::stats::STATS_SECTIONS;
use pipetime_core::{Config, Program, SimError, Simulator};

#[derive(Parser, Debug)]
#[command(
    name = "pipetime",
    author,
    version,
    about = "Cycle-level pipeline timing estimator",
    long_about = "Estimate the cycle count of a small RISC-like program on a configurable superscalar core.\n\nExamples:\n  pipetime run prog.txt\n  pipetime run prog.txt --config core.json --trace\n  pipetime run prog.txt --stats summary branch --trace-json trace.json\n  pipetime config > core.json"
)]
struct Cli {
    /// Log per-instruction timing events (overrides RUST_LOG).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Time a program.
    Run {
        /// Program source file.
        program: PathBuf,

        /// JSON configuration file; built-in defaults when omitted.
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Print the stage cycles of every dynamic instruction.
        #[arg(long)]
        trace: bool,

        /// Write the per-instruction stage cycles to this file as JSON.
        #[arg(long)]
        trace_json: Option<PathBuf>,

        /// Statistics sections to print (all when omitted).
        #[arg(long, num_args = 1.., value_parser = PossibleValuesParser::new(STATS_SECTIONS.iter().copied()))]
        stats: Vec<String>,

        /// Stop with an error after this many dynamic instructions.
        #[arg(long)]
        max_instructions: Option<u64>,

        /// Print the final architectural registers.
        #[arg(long)]
        registers: bool,
    },

    /// Print the default configuration as JSON.
    Config,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Run {
            program,
            config,
            trace,
            trace_json,
            stats,
            max_instructions,
            registers,
        } => cmd_run(&RunArgs {
            program,
            config,
            trace,
            trace_json,
            stats,
            max_instructions,
            registers,
        }),
        Commands::Config => cmd_config(),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}

/// Installs the stderr log subscriber: `debug` with `--verbose`, otherwise
/// `RUST_LOG` or `warn`.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

#[derive(Debug)]
struct RunArgs {
    program: PathBuf,
    config: Option<PathBuf>,
    trace: bool,
    trace_json: Option<PathBuf>,
    stats: Vec<String>,
    max_instructions: Option<u64>,
    registers: bool,
}

/// Loads the inputs, runs both passes and prints the results.
fn cmd_run(args: &RunArgs) -> Result<(), SimError> {
    let mut config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    if args.max_instructions.is_some() {
        config.max_instructions = args.max_instructions;
    }

    let program = Program::from_file(&args.program)?;
    tracing::info!(
        program = %args.program.display(),
        instructions = program.len(),
        "program loaded"
    );
    let sim = Simulator::new(config, program)?.with_trace(args.trace || args.trace_json.is_some());
    let report = sim.run()?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if args.trace {
        print_trace(&mut out, &report)?;
    }
    if let Some(path) = &args.trace_json {
        let mut file = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut file, &report.timings)?;
        file.flush()?;
    }

    writeln!(out, "Total cycles: {}", report.cycles)?;
    if args.registers {
        for (name, value) in &report.registers {
            writeln!(out, "  {name:<6} {value}")?;
        }
    }
    write!(
        out,
        "{}",
        report.stats.render_sections(&args.stats, &report.stations)
    )?;
    out.flush()?;
    Ok(())
}

fn print_trace(out: &mut impl Write, report: &SimReport) -> io::Result<()> {
    writeln!(
        out,
        "{:>5} {:>5}  {:<24} {:>6} {:>6} {:>7} {:>6}",
        "seq", "pc", "instruction", "fetch", "decode", "execute", "retire"
    )?;
    let stamp = |c: Option<u64>| c.map_or_else(|| "-".to_owned(), |c| c.to_string());
    for t in &report.timings {
        write!(
            out,
            "{:>5} {:>5}  {:<24} {:>6} {:>6} {:>7} {:>6}",
            t.seq,
            t.pc,
            t.text,
            stamp(t.stages.fetch),
            stamp(t.stages.decode),
            stamp(t.stages.execute),
            stamp(t.stages.retire),
        )?;
        if let Some(b) = &t.branch {
            let dir = if b.outcome.taken { "taken" } else { "not-taken" };
            let verdict = if b.mispredicted { "MISPREDICT" } else { "ok" };
            write!(out, "  [{dir} -> {}, {verdict}]", b.outcome.target)?;
        }
        writeln!(out)?;
    }
    Ok(())
}

fn cmd_config() -> Result<(), SimError> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    serde_json::to_writer_pretty(&mut out, &Config::default())?;
    writeln!(out)?;
    Ok(())
}
