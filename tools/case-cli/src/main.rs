//! Command-line runner for declared cases
//!
//! ```bash
//! case-cli run [--tag TAG] [--timeout-ms N] [--threads N] [--json] [--source PATH]
//! case-cli list [--tag TAG] [--json]
//! case-cli tags
//! ```
//!
//! `run` exits with 0 when every case passed, 1 on a mismatched outcome and
//! 2 on an infrastructure failure. Setup errors (config, malformed cases)
//! exit with 3.

use std::{
    path::PathBuf,
    process::ExitCode,
    time::Duration,
};

use anyhow::{
    Context,
    Result,
};
use case_oracle::{
    CaseRegistry,
    Declaration,
    Oracle,
    OracleConfig,
    Runner,
    Tag,
    logging::init_cli_tracing,
};
use clap::{
    Parser,
    Subcommand,
};
use tracing::{
    debug,
    info,
};

mod source;

const SETUP_FAILURE: u8 = 3;

#[derive(Parser, Debug)]
#[command(name = "case-cli")]
#[command(about = "Evaluate declared cases against the string fixture routines")]
struct Cli {
    /// Config file to use instead of the search path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `case_oracle=trace`
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Read declarations from annotated source files under this path
    #[arg(long, global = true)]
    source: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Evaluate every selected case and print the report
    Run {
        /// Only run routines carrying this tag
        #[arg(long)]
        tag: Option<Tag>,

        /// Per-call deadline in milliseconds
        #[arg(long)]
        timeout_ms: Option<u64>,

        /// Worker threads
        #[arg(long)]
        threads: Option<usize>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// List routines with their parameters, tags and cases
    List {
        #[arg(long)]
        tag: Option<Tag>,

        #[arg(long)]
        json: bool,
    },
    /// List the tag vocabulary with routine counts
    Tags,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {:#}", err);
            ExitCode::from(SETUP_FAILURE)
        },
    }
}

fn load_config(cli: &Cli) -> Result<OracleConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let mut config = OracleConfig::from_file(path)?;
            config.apply_env_overrides()?;
            config
        },
        None => OracleConfig::load()?,
    };
    if let Some(level) = &cli.log_level {
        config.logging.level = level.clone();
    }
    if let Command::Run {
        timeout_ms,
        threads,
        ..
    } = &cli.command
    {
        if let Some(timeout_ms) = timeout_ms {
            config.oracle.timeout_ms = Some(*timeout_ms);
        }
        if let Some(threads) = threads {
            config.oracle.threads = *threads;
        }
    }
    Ok(config)
}

fn declarations(cli: &Cli) -> Result<Vec<Declaration>> {
    match &cli.source {
        Some(path) => source::scan_path(path),
        None => Ok(string_cases::declarations()),
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let config = load_config(&cli)?;
    init_cli_tracing(&config.logging)?;
    debug!(?config, "configuration");

    let registry = CaseRegistry::from_declarations(&declarations(&cli)?)
        .context("invalid case declarations")?;

    match cli.command {
        Command::Run { tag, json, .. } => {
            let oracle = Oracle::new(string_cases::routine_table())
                .with_settings(config.eval_settings());
            info!(
                routines = registry.len(),
                cases = registry.case_count(),
                timeout = ?config.oracle.timeout_ms.map(Duration::from_millis),
                "running cases"
            );
            let report = Runner::new(&registry, oracle)
                .threads(config.oracle.threads)
                .with_tag(tag)
                .run();
            if json {
                println!("{}", report.to_json()?);
            } else {
                println!("{}", report);
            }
            Ok(ExitCode::from(report.exit_code() as u8))
        },
        Command::List { tag, json } => {
            let listed: Vec<Declaration> = registry
                .all_routines()
                .filter(|entry| tag.as_ref().is_none_or(|tag| entry.has_tag(tag)))
                .map(|entry| Declaration {
                    name: entry.id.name.clone(),
                    params: entry.params.clone(),
                    tags: entry.tags.iter().cloned().collect(),
                    cases: entry.cases.iter().map(ToString::to_string).collect(),
                })
                .collect();
            if json {
                println!("{}", serde_json::to_string_pretty(&listed)?);
            } else {
                for declaration in &listed {
                    print_declaration(declaration);
                }
            }
            Ok(ExitCode::SUCCESS)
        },
        Command::Tags => {
            for (tag, count) in registry.tag_counts() {
                println!("{:<12} {}", tag, count);
            }
            Ok(ExitCode::SUCCESS)
        },
    }
}

fn print_declaration(declaration: &Declaration) {
    let params = declaration
        .params
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    let tags = declaration
        .tags
        .iter()
        .map(Tag::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    println!("{}({}) [{}]", declaration.name, params, tags);
    for case in &declaration.cases {
        println!("    {}", case);
    }
}
