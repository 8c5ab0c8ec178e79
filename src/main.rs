use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use fsmc_graph::{validate, Fsm, FsmSnapshot};
use fsmc_netlist::write_verilog;
use fsmc_synth::{
    build_table, encode_inputs, encode_states, SynthConfig, Synthesis, Synthesizer, CONFIG_FILE,
};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// FSMC - Moore state machine to gate-level logic synthesizer
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a machine for synthesis errors and warnings
    Validate {
        /// FSM snapshot (JSON)
        fsm: PathBuf,
    },

    /// Print the state and input code tables
    Encode {
        /// FSM snapshot (JSON)
        fsm: PathBuf,
    },

    /// Print the next-state/output truth table
    Table {
        /// FSM snapshot (JSON)
        fsm: PathBuf,
    },

    /// Synthesize a machine into a netlist
    Synth {
        /// FSM snapshot (JSON)
        fsm: PathBuf,

        /// Configuration file (defaults to ./fsmc.toml when present)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output directory
        #[arg(short, long, default_value = "build")]
        output: PathBuf,

        /// Artifacts to write
        #[arg(short, long, value_enum, default_value_t = OutputFormat::All)]
        format: OutputFormat,

        /// Treat validation warnings as errors
        #[arg(long)]
        deny_warnings: bool,

        /// Registers and pins only, with placeholder logic
        #[arg(long)]
        skeleton: bool,
    },

    /// Write a default fsmc.toml
    Init {
        /// Directory to write into
        #[arg(default_value = ".")]
        dir: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Human-readable synthesis report
    Report,
    /// Netlist and report as JSON
    Json,
    /// Structural Verilog
    Verilog,
    /// Everything
    All,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt().with_env_filter(log_level).init();

    match cli.command {
        Commands::Validate { fsm } => {
            validate_machine(&fsm)?;
        }

        Commands::Encode { fsm } => {
            print_encoding(&fsm)?;
        }

        Commands::Table { fsm } => {
            print_table(&fsm)?;
        }

        Commands::Synth {
            fsm,
            config,
            output,
            format,
            deny_warnings,
            skeleton,
        } => {
            synthesize_machine(
                &fsm,
                config.as_deref(),
                &output,
                format,
                deny_warnings,
                skeleton,
            )?;
        }

        Commands::Init { dir, force } => {
            write_default_config(&dir, force)?;
        }
    }

    Ok(())
}

fn load_fsm(path: &Path) -> Result<Fsm> {
    let snapshot = FsmSnapshot::from_path(path)
        .with_context(|| format!("Failed to read FSM snapshot {:?}", path))?;
    let fsm = Fsm::from_snapshot(&snapshot)
        .with_context(|| format!("Invalid FSM snapshot {:?}", path))?;
    info!(
        "Loaded {:?}: {} states, {} transitions",
        path,
        fsm.state_count(),
        fsm.transition_count()
    );
    Ok(fsm)
}

/// Load a machine and fail unless it passes validation
fn load_valid_fsm(path: &Path) -> Result<Fsm> {
    let fsm = load_fsm(path)?;
    let report = validate(&fsm);
    for warning in &report.warnings {
        warn!("{}", warning);
    }
    if !report.valid {
        eprint!("{}", report);
        anyhow::bail!(
            "{:?} has {} validation error(s)",
            path,
            report.errors.len()
        );
    }
    Ok(fsm)
}

fn validate_machine(path: &Path) -> Result<()> {
    let fsm = load_fsm(path)?;
    let report = validate(&fsm);
    print!("{}", report);

    if !report.valid {
        anyhow::bail!("{:?} has {} validation error(s)", path, report.errors.len());
    }
    println!(
        "✅ Valid: {} states, {} transitions, {} warning(s)",
        fsm.state_count(),
        fsm.transition_count(),
        report.warnings.len()
    );
    Ok(())
}

fn print_encoding(path: &Path) -> Result<()> {
    let fsm = load_valid_fsm(path)?;
    let states = encode_states(fsm.states());
    let inputs = encode_inputs(fsm.transitions());

    println!("States ({} bits):", states.width());
    for (id, code) in states.iter() {
        let name = fsm.state(id).map(|s| s.name.as_str()).unwrap_or("?");
        println!("  {}  {}", code, name);
    }
    println!("Inputs ({} bits):", inputs.width());
    for (symbol, code) in inputs.iter() {
        println!("  {}  {}", code, symbol);
    }
    Ok(())
}

fn print_table(path: &Path) -> Result<()> {
    let fsm = load_valid_fsm(path)?;
    let states = encode_states(fsm.states());
    let inputs = encode_inputs(fsm.transitions());
    let table = build_table(&fsm, &states, &inputs).context("Failed to build truth table")?;
    print!("{}", table.render(&fsm));
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<SynthConfig> {
    match path {
        Some(path) => SynthConfig::from_path(path)
            .with_context(|| format!("Failed to load configuration {:?}", path)),
        None if Path::new(CONFIG_FILE).exists() => {
            info!("Using ./{}", CONFIG_FILE);
            SynthConfig::from_path(CONFIG_FILE).context("Failed to load ./fsmc.toml")
        }
        None => Ok(SynthConfig::default()),
    }
}

fn synthesize_machine(
    path: &Path,
    config: Option<&Path>,
    output_dir: &Path,
    format: OutputFormat,
    deny_warnings: bool,
    skeleton: bool,
) -> Result<()> {
    let config = load_config(config)?;
    let fsm = load_fsm(path)?;

    if deny_warnings {
        let report = validate(&fsm);
        if report.has_warnings() {
            eprint!("{}", report);
            anyhow::bail!(
                "{:?} has {} validation warning(s) and --deny-warnings is set",
                path,
                report.warnings.len()
            );
        }
    }

    let synthesizer = Synthesizer::new(config);
    let result = if skeleton {
        synthesizer.skeleton(&fsm)
    } else {
        synthesizer.synthesize(&fsm)
    };
    let synthesis = result.with_context(|| format!("Synthesis of {:?} failed", path))?;

    fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create output directory {:?}", output_dir))?;
    let written = write_artifacts(&synthesis, output_dir, format)?;

    println!("✅ Synthesis complete!");
    for path in written {
        println!("📄 Output: {:?}", path);
    }
    Ok(())
}

fn write_artifacts(
    synthesis: &Synthesis,
    output_dir: &Path,
    format: OutputFormat,
) -> Result<Vec<PathBuf>> {
    let module = &synthesis.report.module_name;
    let mut files: Vec<(PathBuf, String)> = Vec::new();

    if matches!(format, OutputFormat::Report | OutputFormat::All) {
        files.push((
            output_dir.join(format!("{}.report.txt", module)),
            synthesis.report.to_string(),
        ));
    }
    if matches!(format, OutputFormat::Json | OutputFormat::All) {
        files.push((
            output_dir.join(format!("{}.netlist.json", module)),
            serde_json::to_string_pretty(&synthesis.netlist)?,
        ));
        files.push((
            output_dir.join(format!("{}.report.json", module)),
            serde_json::to_string_pretty(&synthesis.report)?,
        ));
    }
    if matches!(format, OutputFormat::Verilog | OutputFormat::All) {
        files.push((
            output_dir.join(format!("{}.v", module)),
            write_verilog(&synthesis.netlist)?,
        ));
    }

    let mut written = Vec::with_capacity(files.len());
    for (path, contents) in files {
        fs::write(&path, contents).with_context(|| format!("Failed to write {:?}", path))?;
        written.push(path);
    }
    Ok(written)
}

fn write_default_config(dir: &Path, force: bool) -> Result<()> {
    let path = dir.join(CONFIG_FILE);
    if path.exists() && !force {
        anyhow::bail!("{:?} already exists (use --force to overwrite)", path);
    }
    fs::create_dir_all(dir).with_context(|| format!("Failed to create {:?}", dir))?;
    let toml = SynthConfig::default().to_toml_string()?;
    fs::write(&path, toml).with_context(|| format!("Failed to write {:?}", path))?;
    println!("📄 Wrote {:?}", path);
    Ok(())
}
