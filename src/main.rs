use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use rand::Rng;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use bacon_path::graph::{ActorId, DenseId};
use bacon_path::report::{describe_actor, Report};
use bacon_path::{corpus, Config, PathFinder};

const PROMPT: &str = "Interactive mode.  Enter an actor's name to search.  CTRL-D to end.";

#[derive(Parser, Debug)]
#[command(name = "bacon-path", version)]
#[command(about = "Degrees of separation between actors in a movie corpus")]
#[command(after_help = "Each line of the input file is a movie name followed by its cast, \
fields separated by '/' by default:\n  \
Avengers: Age of Ultron (2015)/Downey Jr., Robert/Johansson, Scarlett/Ruffalo, Mark")]
struct Args {
    /// Corpus file, one movie per line
    input: PathBuf,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Actor every query is measured against
    #[arg(short, long)]
    reference: Option<String>,

    /// Field delimiter of the corpus
    #[arg(short, long)]
    delimiter: Option<char>,

    /// Number of random actors to query before interactive mode
    #[arg(short = 'n', long)]
    samples: Option<usize>,

    /// Query an actor (repeatable)
    #[arg(short, long = "query")]
    queries: Vec<String>,

    /// Print an actor's adjacency list (repeatable)
    #[arg(long)]
    neighbors: Vec<String>,

    /// Print one JSON object per query
    #[arg(long)]
    json: bool,

    /// Skip the stdin read loop
    #[arg(long)]
    no_interactive: bool,

    /// Debug logging unless RUST_LOG says otherwise
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose)?;

    let config = load_config(&args)?;
    let delimiter = config.delimiter_byte()?;
    let graph = corpus::load_graph(&args.input, delimiter)
        .with_context(|| format!("failed to build graph from {}", args.input.display()))?;

    // searches only make sense with vertices
    if graph.is_empty() {
        warn!("corpus contains no actors, nothing to search");
        return Ok(());
    }

    let finder = PathFinder::new(&graph, &config.reference_actor)?.with_max_depth(config.max_depth);
    info!(reference = finder.reference_name(), "reference actor resolved");

    let stdout = io::stdout();
    let mut out = stdout.lock();

    for name in &args.neighbors {
        match graph.actor_id(name) {
            Some(id) => writeln!(out, "{}\n", describe_actor(&graph, id))?,
            None => writeln!(out, "{name} was not in my database\n")?,
        }
    }

    self_test(&finder, config.self_test_samples, args.json, &mut out)?;

    for name in &args.queries {
        emit(&finder, name, args.json, &mut out)?;
    }

    if !args.no_interactive {
        interactive(&finder, args.json, &mut out)?;
    }
    Ok(())
}

fn init_tracing(verbose: bool) -> Result<()> {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
    Ok(())
}

fn load_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    if let Some(reference) = &args.reference {
        config.reference_actor = reference.clone();
    }
    if let Some(delimiter) = args.delimiter {
        config.delimiter = delimiter;
    }
    if let Some(samples) = args.samples {
        config.self_test_samples = samples;
    }
    config.validate()?;
    Ok(config)
}

/// Queries `count` actors picked uniformly at random.
fn self_test(finder: &PathFinder<'_>, count: usize, json: bool, out: &mut impl Write) -> Result<()> {
    let graph = finder.graph();
    let mut rng = rand::thread_rng();
    for _ in 0..count {
        let id = ActorId::from_index(rng.gen_range(0..graph.num_actors()))
            .context("actor index out of range")?;
        emit(finder, graph.actor_name(id), json, out)?;
    }
    Ok(())
}

/// Reads names from stdin until EOF. With `--json` the prompt goes to stderr
/// so stdout stays one JSON object per line.
fn interactive(finder: &PathFinder<'_>, json: bool, out: &mut impl Write) -> Result<()> {
    let stdin = io::stdin();
    let mut stderr = io::stderr();
    prompt(json, out, &mut stderr)?;
    for line in stdin.lock().lines() {
        let line = line.context("failed to read from stdin")?;
        let name = line.trim_end_matches('\r');
        if !name.is_empty() {
            emit(finder, name, json, out)?;
        }
        prompt(json, out, &mut stderr)?;
    }
    if json {
        writeln!(stderr)?;
    } else {
        writeln!(out)?;
    }
    Ok(())
}

fn prompt(json: bool, out: &mut impl Write, stderr: &mut impl Write) -> Result<()> {
    if json {
        write!(stderr, "{PROMPT}\n> ")?;
        stderr.flush()?;
    } else {
        write!(out, "{PROMPT}\n> ")?;
        out.flush()?;
    }
    Ok(())
}

fn emit(finder: &PathFinder<'_>, actor: &str, json: bool, out: &mut impl Write) -> Result<()> {
    let mut written = Ok(());
    finder.query(actor, |report| written = write_report(report, json, out));
    written
}

fn write_report(report: &Report, json: bool, out: &mut impl Write) -> Result<()> {
    if json {
        writeln!(out, "{}", report.to_json()?)?;
    } else {
        writeln!(out, "{report}\n")?;
    }
    Ok(())
}
