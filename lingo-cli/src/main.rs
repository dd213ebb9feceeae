mod cli;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use cli::Cli;
use lingo::{FilterChain, Search, demo};
use serde::Serialize;
use std::io::{BufRead, Write};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Serialize)]
struct Output<'a> {
    search: &'a str,
    query: &'a str,
    #[serde(flatten)]
    chain: &'a FilterChain,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let search = demo::by_name(&cli.search, cli.today)
        .ok_or_else(|| anyhow!("unknown search {:?}, expected one of {:?}", cli.search, demo::NAMES))?;
    info!(search = search.name(), reference = ?cli.today, "search definition ready");

    if !cli.query.is_empty() {
        let query = cli.query.join(" ");
        return run(&search, &query, cli.json);
    }

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    let mut lines = stdin.lock().lines();
    loop {
        print!("> ");
        stdout.flush().context("stdout is closed")?;
        let Some(line) = lines.next() else {
            break;
        };
        let line = line.context("failed to read stdin")?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        } else if line == "/bye" {
            break;
        }

        if let Err(e) = run(&search, line, cli.json) {
            eprintln!("Failed to compile: {e:?}");
        }
    }
    Ok(())
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env("LINGO_LOG").unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(search: &Search<FilterChain>, query: &str, json: bool) -> Result<()> {
    let chain = search
        .compile(query, FilterChain::new())
        .with_context(|| format!("{} could not compile {query:?}", search.name()))?;
    if json {
        let output = Output {
            search: search.name(),
            query,
            chain: &chain,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if chain.is_empty() {
        println!("(no conditions)");
    } else {
        println!("{chain}");
    }
    Ok(())
}
