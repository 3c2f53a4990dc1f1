//! Step-by-step cache simulator CLI.
//!
//! This binary drives a [`Session`] from the terminal. It performs:
//! 1. **Run:** Configure a cache, load a test case, then step, auto-advance, or run to the end.
//! 2. **Replay:** Apply JSON-lines session commands from a file or stdin and print the final state.
//!
//! Log output goes to stderr and is controlled by `RUST_LOG` (e.g. `RUST_LOG=cachestep_core=debug`).

use std::io::{self, BufRead, BufReader, Write};
use std::{fs, process, thread};

use clap::{Parser, Subcommand, ValueEnum};
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;

use cachestep_core::cache::CacheEngine;
use cachestep_core::config::{CacheConfig, MappingMode, ReplacementPolicy, SimConfig};
use cachestep_core::session::{Command, Session};
use cachestep_core::sim::{CustomInput, TestCase};

#[derive(Parser, Debug)]
#[command(
    name = "cachestep",
    author,
    version,
    about = "Step-by-step set-associative cache simulator",
    long_about = "Simulate a single cache at block granularity, one access at a time.\n\nExamples:\n  cachestep run --blocks 8 --ways 4 --test sequential --num-blocks 8\n  cachestep run --mapping direct --blocks 4 --test custom --custom \"0 1 0 2 0 3 0 4\"\n  cachestep run --policy mru --test random --count 32 --seed 7 --json\n  cachestep replay commands.jsonl"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Configure a cache, load a test case, and run it.
    Run(RunArgs),

    /// Apply JSON-lines session commands and print the final state as JSON.
    Replay {
        /// Command file; reads stdin when omitted or `-`.
        path: Option<String>,

        /// Seed for random test cases.
        #[arg(long)]
        seed: Option<u64>,
    },
}

#[derive(clap::Args, Debug)]
struct RunArgs {
    /// Cache capacity in blocks (power of 2, at least 4).
    #[arg(short, long, default_value_t = 8)]
    blocks: usize,

    /// Blocks per set (set-associative mapping only).
    #[arg(short, long, default_value_t = 4)]
    ways: usize,

    /// Words per cache line.
    #[arg(short, long, default_value_t = 1)]
    line_size: usize,

    /// Block-to-set mapping.
    #[arg(short, long, value_enum, default_value_t = MappingArg::SetAssociative)]
    mapping: MappingArg,

    /// Replacement policy.
    #[arg(short, long, value_enum, default_value_t = PolicyArg::Lru)]
    policy: PolicyArg,

    /// Addressable memory in blocks (exclusive upper bound on block ids).
    #[arg(long, default_value_t = 1024)]
    memory_blocks: u64,

    /// Test case to load.
    #[arg(short, long, value_enum, default_value_t = TestArg::Sequential)]
    test: TestArg,

    /// N for the sequential and mid-repeat test cases.
    #[arg(short = 'n', long, default_value_t = 8)]
    num_blocks: usize,

    /// Length of a random sequence.
    #[arg(long)]
    count: Option<usize>,

    /// Ids for the custom test case, separated by commas or spaces.
    #[arg(long, default_value = "")]
    custom: String,

    /// Seed for the random test case.
    #[arg(long)]
    seed: Option<u64>,

    /// Run only this many steps instead of the whole sequence.
    #[arg(long)]
    steps: Option<usize>,

    /// Auto-advance with this delay (ms) between steps.
    #[arg(long)]
    auto_delay: Option<u64>,

    /// Print the final state as JSON instead of the text report.
    #[arg(long)]
    json: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum MappingArg {
    Direct,
    SetAssociative,
    FullyAssociative,
}

impl From<MappingArg> for MappingMode {
    fn from(arg: MappingArg) -> Self {
        match arg {
            MappingArg::Direct => Self::Direct,
            MappingArg::SetAssociative => Self::SetAssociative,
            MappingArg::FullyAssociative => Self::FullyAssociative,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PolicyArg {
    Lru,
    Mru,
    Fifo,
}

impl From<PolicyArg> for ReplacementPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Lru => Self::Lru,
            PolicyArg::Mru => Self::Mru,
            PolicyArg::Fifo => Self::Fifo,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum TestArg {
    Sequential,
    MidRepeat,
    Random,
    Custom,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run(args) => cmd_run(&args),
        Commands::Replay { path, seed } => cmd_replay(path.as_deref(), seed),
    }
}

fn new_session(seed: Option<u64>) -> Session {
    seed.map_or_else(Session::new, Session::with_seed)
}

/// Configures the session from `args`, loads the test case, and runs it.
///
/// Exits with code 1 on an invalid configuration or when the test case yields
/// an empty sequence.
fn cmd_run(args: &RunArgs) {
    let cache = CacheConfig {
        total_blocks: args.blocks,
        ways: args.ways,
        line_size: args.line_size,
        mapping: args.mapping.into(),
        policy: args.policy.into(),
    };
    let config = SimConfig {
        cache,
        memory_blocks: args.memory_blocks,
        ..SimConfig::default()
    };

    let mut session = new_session(args.seed);
    if let Err(e) = session.init(config) {
        eprintln!("Error: {e}");
        process::exit(1);
    }

    let case = match args.test {
        TestArg::Sequential => TestCase::Sequential {
            num_blocks: args.num_blocks,
        },
        TestArg::MidRepeat => TestCase::MidRepeat {
            num_blocks: args.num_blocks,
        },
        TestArg::Random => TestCase::Random { count: args.count },
        TestArg::Custom => TestCase::Custom {
            input: CustomInput::Text(args.custom.clone()),
        },
    };
    let len = match session.load(&case) {
        Ok(sequence) => sequence.len(),
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };
    if len == 0 {
        eprintln!("Error: test case produced an empty sequence");
        eprintln!("  cachestep run --test custom --custom \"0 1 2 3\"");
        process::exit(1);
    }

    let result = if let Some(limit) = args.steps {
        (0..limit).try_for_each(|_| session.next().map(drop))
    } else if let Some(ms) = args.auto_delay {
        session.set_auto_delay(ms);
        session.toggle_auto().map(|_| {
            let _ = session.run_auto(thread::sleep);
        })
    } else {
        session.run_all().map(drop)
    };
    if let Err(e) = result {
        eprintln!("Error: {e}");
        process::exit(1);
    }

    if args.json {
        print_json(&session);
    } else if let Err(e) = print_report(&session, &mut io::stdout().lock()) {
        eprintln!("Error: cannot write report: {e}");
        process::exit(1);
    }
}

/// Applies one command per input line; blank lines and `#` comments are skipped.
///
/// A line that fails to parse or apply is reported and skipped; the exit code
/// is 1 if any line failed.
fn cmd_replay(path: Option<&str>, seed: Option<u64>) {
    let reader: Box<dyn BufRead> = match path {
        None | Some("-") => Box::new(BufReader::new(io::stdin())),
        Some(p) => match fs::File::open(p) {
            Ok(file) => Box::new(BufReader::new(file)),
            Err(e) => {
                eprintln!("Error: cannot open {p}: {e}");
                process::exit(1);
            }
        },
    };

    let mut session = new_session(seed);
    let mut failed = false;
    for (lineno, line) in reader.lines().enumerate() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                error!(line = lineno + 1, "read failed: {e}");
                failed = true;
                break;
            }
        };
        let text = line.trim();
        if text.is_empty() || text.starts_with('#') {
            continue;
        }
        let outcome = serde_json::from_str::<Command>(text)
            .map_err(|e| e.to_string())
            .and_then(|command| session.apply(command).map_err(|e| e.to_string()));
        match outcome {
            Ok(outcome) => {
                if let Ok(json) = serde_json::to_string(&outcome) {
                    eprintln!("{json}");
                }
            }
            Err(e) => {
                warn!(line = lineno + 1, "command rejected: {e}");
                eprintln!("line {}: {e}", lineno + 1);
                failed = true;
            }
        }
    }

    print_json(&session);
    if failed {
        process::exit(1);
    }
}

fn print_json(session: &Session) {
    match serde_json::to_string_pretty(&session.state()) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("Error: cannot serialize state: {e}");
            process::exit(1);
        }
    }
}

/// Prints the transcript, the final cache contents, and the statistics.
fn print_report(session: &Session, out: &mut impl Write) -> io::Result<()> {
    let Some(sim) = session.simulator() else {
        return Ok(());
    };
    let engine = sim.engine();

    writeln!(out, "{}", describe(engine))?;
    let sequence = sim
        .sequence()
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ");
    writeln!(out, "Sequence: {sequence}")?;
    writeln!(out)?;

    for entry in sim.log() {
        writeln!(out, "[{:>3}] {}", entry.step, entry.explanation)?;
    }
    writeln!(out)?;

    writeln!(out, "CACHE CONTENTS")?;
    writeln!(out, "----------------------------------------")?;
    for (set, slots) in engine.store().snapshot().iter().enumerate() {
        let cells = slots
            .iter()
            .map(|slot| slot.map_or_else(|| "--".to_string(), |b| format!("{b:>2}")))
            .collect::<Vec<_>>()
            .join(" | ");
        let order = engine
            .order(set)
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        writeln!(out, "  Set {set:>2}: [ {cells} ]  order: [{order}]")?;
    }
    let usage = engine.store().usage();
    writeln!(
        out,
        "  Occupancy: {} blocks ({:.1}%)",
        usage.resident_blocks, usage.utilization
    )?;
    writeln!(out)?;
    writeln!(out, "{}", sim.stats())
}

fn describe(engine: &CacheEngine) -> String {
    let config = engine.config();
    format!(
        "Cache: {} blocks, {} sets x {} ways, line size {}, {}, {}",
        config.total_blocks,
        engine.store().num_sets(),
        engine.store().ways(),
        config.line_size,
        config.mapping,
        config.policy
    )
}
