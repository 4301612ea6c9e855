//! openpcb: synthesize KiCad board files from netlists and circuit
//! descriptions.
//!
//! The binary wraps the library pipeline in a handful of subcommands:
//! a two-footprint starter board, the LED-flashlight netlist generator,
//! and the netlist importer that places parts and writes a board.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use thiserror::Error;
use tracing::{debug, error, info, warn, Level};
use tracing_subscriber::EnvFilter;

use openpcb::circuit::{self, CircuitError};
use openpcb::config::{self, Config};
use openpcb::engine::{Board, Direction, EngineError, Part};
use openpcb::error::ConfigError;
use openpcb::library::Library;
use openpcb::netlist::{self, NetlistError, NetlistFormat};

/// Synthesize KiCad board files from netlists and circuit descriptions.
#[derive(Parser, Debug)]
#[command(name = "openpcb")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, global = true, value_name = "CONFIG_FILE")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Decrease logging verbosity (only show errors)
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a starter board with two footprints placed side by side
    Hello {
        /// Output board file
        #[arg(short, long, value_name = "OUT", default_value = "hello.kicad_pcb")]
        out: PathBuf,
    },

    /// Build the LED flashlight circuit and write its netlist
    Flashlight {
        /// Output netlist file
        #[arg(short, long, value_name = "OUT", default_value = "led_flashlight.net")]
        out: PathBuf,

        /// Netlist format to write
        #[arg(long, value_enum, default_value_t = FormatArg::Sexpr)]
        format: FormatArg,
    },

    /// Read a netlist, place its parts, and write a board
    Import {
        /// Input netlist file (S-expression or JSON)
        #[arg(value_name = "NETLIST")]
        netlist: PathBuf,

        /// Output board file
        #[arg(
            short,
            long,
            value_name = "OUT",
            default_value = "led_flashlight.kicad_pcb"
        )]
        out: PathBuf,
    },

    /// List every resolvable footprint name
    Footprints,
}

/// On-disk netlist format, as selected on the command line.
#[derive(ValueEnum, Debug, Clone, Copy)]
enum FormatArg {
    /// KiCad S-expression export format
    Sexpr,
    /// Minimal JSON shape
    Json,
}

impl From<FormatArg> for NetlistFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Sexpr => Self::Sexpr,
            FormatArg::Json => Self::Json,
        }
    }
}

/// Errors surfaced by the command implementations.
#[derive(Debug, Error)]
enum CliError {
    /// The configured footprint directory does not exist.
    #[error("Footprint directory not found: {path}")]
    FootprintDirMissing {
        /// The configured directory.
        path: PathBuf,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Netlist(#[from] NetlistError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Circuit(#[from] CircuitError),
}

/// Determines the log level from CLI arguments.
#[allow(clippy::match_same_arms)] // Explicit "warn" arm for clarity
fn get_log_level(verbose: u8, quiet: bool, config_level: &str) -> Level {
    if quiet {
        return Level::ERROR;
    }

    match verbose {
        0 => match config_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::WARN, // Default to warn for unknown levels
        },
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Initialises the tracing subscriber for logging.
fn init_tracing(level: Level) {
    let filter = EnvFilter::from_default_env().add_directive(level.into());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Entry point for the openpcb tool.
fn main() -> ExitCode {
    let args = Args::parse();

    // Load configuration
    let config_path = args.config.as_deref();
    let cfg = match config::load_config(config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            if config_path.is_none() {
                if let Some(default_path) = config::default_config_path() {
                    eprintln!("\nFix or remove the config at: {}", default_path.display());
                    eprintln!("See config/example-config.json for the expected shape");
                }
            }
            return ExitCode::FAILURE;
        }
    };

    // Initialise logging
    let log_level = get_log_level(args.verbose, args.quiet, &cfg.logging.level);
    init_tracing(log_level);

    info!(version = env!("CARGO_PKG_VERSION"), "Starting openpcb");

    match run(args.command, &cfg) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Command failed");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command, cfg: &Config) -> Result<(), CliError> {
    match command {
        Command::Hello { out } => cmd_hello(&out, cfg),
        Command::Flashlight { out, format } => cmd_flashlight(&out, format.into(), cfg),
        Command::Import { netlist, out } => cmd_import(&netlist, &out, cfg),
        Command::Footprints => cmd_footprints(cfg),
    }
}

/// Places `R_0402` and `LED_SMD` side by side on a fresh board.
///
/// The footprint directory must exist for this command; the individual
/// files may still be missing, in which case the builtin generators
/// stand in.
fn cmd_hello(out: &Path, cfg: &Config) -> Result<(), CliError> {
    let library = Library::open(&cfg.footprint_dir);
    if !library.dir_exists() {
        return Err(CliError::FootprintDirMissing {
            path: cfg.footprint_dir.clone(),
        });
    }

    let mut board = Board::with_setup(cfg.board.setup());
    board.add_part_at(Part::new(library.resolve("R_0402"), "R1"), 0.0, 0.0)?;
    board.add_part_at(Part::new(library.resolve("LED_SMD"), "D1"), 10.0, 0.0)?;
    board.save(out, cfg.output.backup)?;

    println!("Wrote {}", out.display());
    Ok(())
}

/// Builds the flashlight demo circuit and writes its netlist.
fn cmd_flashlight(out: &Path, format: NetlistFormat, cfg: &Config) -> Result<(), CliError> {
    let netlist = circuit::led_flashlight()?.to_netlist();
    netlist::write_netlist(out, &netlist, format, cfg.output.backup)?;

    println!("Wrote {}", out.display());
    Ok(())
}

/// Reads a netlist, places its parts in a chain, attaches nets, and
/// writes the board.
fn cmd_import(netlist_path: &Path, out: &Path, cfg: &Config) -> Result<(), CliError> {
    let netlist = netlist::read_netlist(netlist_path)?;
    let library = Library::open(&cfg.footprint_dir);
    let direction: Direction = cfg.placement.direction.parse()?;
    let [origin_x, origin_y] = cfg.placement.origin_mm;

    let mut board = Board::with_setup(cfg.board.setup());
    let mut anchor: Option<String> = None;

    for part in &netlist.parts {
        let mut placed = Part::new(library.footprint_for_part(part), &part.reference);
        placed.set_value(&part.value);

        match anchor.as_deref() {
            None => board.add_part_at(placed, origin_x, origin_y)?,
            Some(prev) => {
                board.add_part(placed)?;
                let position =
                    board.place_near(&part.reference, prev, cfg.placement.gap_mm, direction)?;
                debug!(reference = %part.reference, ?position, "Placed part");
            }
        }
        anchor = Some(part.reference.clone());
    }

    for net in &netlist.nets {
        if net.name.is_empty() {
            warn!("Skipping net with no name");
            continue;
        }
        board.define_net(&net.name);

        for node in &net.nodes {
            if let Err(err) = board.connect(&net.name, &node.reference, &node.pad) {
                warn!(
                    net = %net.name,
                    reference = %node.reference,
                    pad = %node.pad,
                    error = %err,
                    "Skipping unresolvable net node"
                );
            }
        }
    }

    board.save(out, cfg.output.backup)?;

    println!("Generated {}", out.display());
    Ok(())
}

/// Prints every footprint name the library can resolve.
fn cmd_footprints(cfg: &Config) -> Result<(), CliError> {
    let library = Library::open(&cfg.footprint_dir);
    for name in library.available() {
        println!("{name}");
    }
    Ok(())
}
