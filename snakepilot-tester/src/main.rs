mod reports;
mod runner;
mod util;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::PathBuf;
use std::time::Instant;

use runner::{BatchReport, BatchRunner};
use snakepilot_game::PilotConfig;
use util::parse_seeds;

#[derive(Debug, Parser)]
#[command(name = "snakepilot-tester", version = "0.1.0")]
#[command(about = "Batch runner for the snake autopilot - plays seeded games and reports outcomes")]
struct Args {
    /// Board edge length (overrides the config file)
    #[arg(long)]
    size: Option<i32>,

    /// Cells gained per food (overrides the config file)
    #[arg(long)]
    growth: Option<u32>,

    /// Seeds to run (comma-separated); defaults to the configured seed
    #[arg(long)]
    seeds: Option<String>,

    /// Games per seed; game `i` uses seed + i
    #[arg(long, default_value_t = 1)]
    games: usize,

    /// Stop each game after this many moves
    #[arg(long)]
    max_moves: Option<u64>,

    /// Replay every adopted plan before trusting it
    #[arg(long)]
    safety_check: bool,

    /// JSON file with `agent` and `game` sections
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output report format
    #[arg(long, default_value = "console")]
    #[arg(value_parser = ["json", "markdown", "console"])]
    report: String,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = resolve_config(&args)?;
    let seeds = match args.seeds.as_deref() {
        Some(raw) => parse_seeds(raw)?,
        None => vec![config.game.seed],
    };

    announce_banner(&config, &seeds, args.games);

    let start_time = Instant::now();
    let runner = BatchRunner::new(config.agent.clone(), config.game.clone(), args.verbose);
    let report = runner.run(&seeds, args.games)?;

    write_reports(&args, &report, start_time)?;

    if report.any_deaths() {
        std::process::exit(1);
    }

    Ok(())
}

fn resolve_config(args: &Args) -> Result<PilotConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            PilotConfig::from_json(&raw)
                .with_context(|| format!("invalid config {}", path.display()))?
        }
        None => PilotConfig::default(),
    };

    if let Some(size) = args.size {
        config.game.size = size;
    }
    if let Some(growth) = args.growth {
        config.game.growth = growth;
    }
    if args.max_moves.is_some() {
        config.game.max_moves = args.max_moves;
    }
    if args.safety_check {
        config.agent.safety_check = true;
    }
    config.game.validate()?;
    Ok(config)
}

fn announce_banner(config: &PilotConfig, seeds: &[u64], games: usize) {
    println!("{}", "🐍 SnakePilot Autopilot Tester".bright_cyan().bold());
    println!("{}", "==============================".cyan());
    println!(
        "board {}x{}, growth {}, {} seed(s) x {games} game(s), safety check {}",
        config.game.size,
        config.game.size,
        config.game.growth,
        seeds.len(),
        if config.agent.safety_check { "on" } else { "off" }
    );
}

fn write_reports(args: &Args, report: &BatchReport, start_time: Instant) -> Result<()> {
    let mut output_target = OutputTarget::new(args.output.clone())?;

    match args.report.as_str() {
        "json" => reports::generate_json_report(&mut output_target, report)?,
        "markdown" => reports::generate_markdown_report(&mut output_target, report)?,
        _ => {
            let duration = start_time.elapsed();
            if report.results.is_empty() {
                writeln!(&mut output_target, "No games played.")?;
            } else {
                reports::generate_console_report(&mut output_target, report, duration)?;
            }
            writeln!(&mut output_target)?;
            writeln!(&mut output_target, "🏁 Total time: {duration:?}")?;
        }
    }

    output_target.flush_inner()?;
    Ok(())
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_inner()
    }
}
