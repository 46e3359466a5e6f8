//! Mente CLI
//!
//! Loads a program of facts and rules, converts it to Horn clauses and
//! answers a query by backward chaining.
//!
//! ```text
//! mente family.pl --query "ancestor(tom, X)" --all
//! ```

use anyhow::Context;
use clap::Parser;
use mente::json::{AnswerJson, KbJson, QueryResultJson};
use mente::{parse_program_file, parse_query, Answer, HornKB, Solver, SolverConfig};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mente")]
#[command(about = "Backward-chaining prover for Horn clause programs")]
#[command(version)]
struct Cli {
    /// Program file with facts and rules
    file: PathBuf,
    /// Query to prove; read from standard input when omitted
    #[arg(short, long)]
    query: Option<String>,
    /// Report every answer instead of the first
    #[arg(short, long)]
    all: bool,
    /// Stop after this many answers
    #[arg(short, long)]
    limit: Option<usize>,
    /// JSON file with solver limits
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Print the result as JSON
    #[arg(long)]
    json: bool,
    /// Print the Horn clauses before solving
    #[arg(long)]
    show_kb: bool,
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "mente=debug",
        _ => "mente=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn read_query() -> anyhow::Result<String> {
    print!("input query: ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn build_kb(cli: &Cli) -> anyhow::Result<Option<HornKB>> {
    let program = parse_program_file(&cli.file)
        .with_context(|| format!("failed to parse {}", cli.file.display()))?;
    if program.is_empty() {
        return Ok(None);
    }
    info!(statements = program.len(), "program loaded");

    let kb = program
        .into_predicate()
        .horn_kb()
        .context("program does not normalize to Horn clauses")?;
    info!(clauses = kb.len(), "horn knowledge base built");
    Ok(Some(kb))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match &cli.config {
        Some(path) => SolverConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => SolverConfig::default(),
    };

    let Some(kb) = build_kb(&cli)? else {
        println!("Empty input file. Exiting...");
        return Ok(());
    };
    if cli.show_kb && !cli.json {
        for clause in kb.iter() {
            println!("{}", clause);
        }
    }

    let query_text = match &cli.query {
        Some(query) => query.clone(),
        None => read_query()?,
    };
    let query = parse_query(&query_text).context("invalid query")?;

    let solver = Solver::with_config(&kb, config);
    let limit = match (cli.limit, cli.all) {
        (Some(n), _) => Some(n),
        (None, true) => None,
        (None, false) => Some(1),
    };
    let answers: Vec<Answer> = solver.prove_all(&query, limit)?;

    if cli.json {
        let result = QueryResultJson {
            query: query.to_string(),
            provable: !answers.is_empty(),
            answers: answers.iter().map(AnswerJson::from).collect(),
            kb: cli.show_kb.then(|| KbJson::from(&kb)),
        };
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!("backward_chain{{ {} }}: {}", query, !answers.is_empty());
    for answer in &answers {
        println!("result: {}", answer);
    }
    Ok(())
}
