//! findquery: translate selectors into find queries from the shell.
//!
//! # Usage
//!
//! ```bash
//! # Translate a JSON selector, with an optional JSON config
//! findquery translate '{"status": ["pending"], "deleted_at": null}' --config '{"take": 10}'
//!
//! # Read the selector from a file
//! findquery translate @selector.json
//!
//! # Resolve a list request against a resource's rules
//! findquery list 'offset=0&limit=20&expand=product&created_at[gt]=2024-01-01' --resource variants
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use findquery::prelude::*;
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "findquery")]
#[command(version)]
#[command(about = "Translate selectors into backend-agnostic find queries", long_about = None)]
#[command(after_help = "EXAMPLES:
    findquery translate '{\"email\": \"a@b.c\", \"price\": {\"lt\": 5}}'
    findquery translate @selector.json --config '{\"skip\": 0, \"take\": 20}'
    findquery list 'limit=10&fields=id,title&order=-created_at' --resource variants
    findquery explain '{\"status\": [\"pending\", \"completed\"]}'")]
struct Cli {
    /// Settings file (default: <config dir>/findquery/config.toml)
    #[arg(long, env = "FINDQUERY_SETTINGS", global = true)]
    settings: Option<PathBuf>,

    /// Print compact JSON
    #[arg(long, global = true)]
    compact: bool,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Translate a JSON selector into a query descriptor
    Translate {
        /// Selector JSON, or @path to read it from a file
        selector: String,

        /// Query config JSON, or @path
        #[arg(short, long)]
        config: Option<String>,
    },
    /// Resolve a list/retrieve query string and translate it
    List {
        /// Query string, e.g. 'offset=0&limit=20&expand=product'
        query: String,

        /// Resource whose list rules apply (from the settings file)
        #[arg(short, long)]
        resource: Option<String>,

        /// Resolve as a single-record request (no pagination or ordering)
        #[arg(long)]
        retrieve: bool,
    },
    /// Show a readable breakdown of the translated query
    Explain {
        /// Selector JSON, or @path
        selector: String,

        /// Query config JSON, or @path
        #[arg(short, long)]
        config: Option<String>,
    },
    /// Show the modifier and operator reference
    Operators,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(&cli) {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "findquery=debug" } else { "findquery=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    let settings = Settings::load_or_default(cli.settings.as_deref())?;
    let translator = Translator::new(settings.translate_options());
    let pretty = settings.pretty && !cli.compact;

    match &cli.command {
        Commands::Translate { selector, config } => {
            let query = translate_args(&translator, selector, config.as_deref())?;
            print_json(&query, pretty)?;
        }
        Commands::List {
            query,
            resource,
            retrieve,
        } => {
            let params = parse_list_params(query)?;
            let permissive = ListRules::default();
            let rules = match resource {
                Some(name) => settings.resource(name)?,
                None => &permissive,
            };
            let config = if *retrieve {
                rules.resolve_retrieve(&params)?
            } else {
                rules.resolve_list(&params)?
            };
            let descriptor = translator.translate(params.selector(), &config);
            print_json(&descriptor, pretty)?;
        }
        Commands::Explain { selector, config } => {
            let query = translate_args(&translator, selector, config.as_deref())?;
            explain_query(&query);
        }
        Commands::Operators => show_operators(),
    }

    Ok(())
}

fn translate_args(
    translator: &Translator,
    selector: &str,
    config: Option<&str>,
) -> Result<QueryDescriptor> {
    let selector = selector_from_json(&read_json(selector)?)?;
    let config = match config {
        Some(text) => config_from_json(&read_json(text)?)?,
        None => QueryConfig::default(),
    };
    Ok(translator.translate(&selector, &config))
}

/// Inline JSON, or `@path` to read a file.
fn read_json(arg: &str) -> Result<serde_json::Value> {
    let text = match arg.strip_prefix('@') {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path))?
        }
        None => arg.to_string(),
    };
    serde_json::from_str(&text).context("Invalid JSON")
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", text);
    Ok(())
}

fn explain_query(query: &QueryDescriptor) {
    println!("{}", "🔎 Query Descriptor".cyan().bold());
    println!();

    println!("{}", "Where:".green().bold());
    if query.filter.is_empty() {
        println!("  {}", "(no filters)".dimmed());
    } else {
        explain_where(&query.filter, 1);
    }

    if query.with_deleted == Some(true) {
        println!("{} {}", "With deleted:".dimmed(), "yes".yellow());
    }
    if let Some(skip) = query.skip {
        println!("{} {}", "Skip:".dimmed(), skip.to_string().cyan());
    }
    if let Some(take) = query.take {
        println!("{} {}", "Take:".dimmed(), take.to_string().cyan());
    }
    if let Some(relations) = &query.relations {
        let paths: Vec<&str> = relations.iter().collect();
        println!("{} {}", "Relations:".dimmed(), paths.join(", ").white());
    }
    if let Some(select) = &query.select {
        let paths: Vec<&str> = select.iter().collect();
        println!("{} {}", "Select:".dimmed(), paths.join(", ").white());
    }
    if let Some(order) = &query.order {
        let entries: Vec<String> = order
            .iter()
            .map(|(field, dir)| format!("{} {}", field, dir))
            .collect();
        println!("{} {}", "Order:".dimmed(), entries.join(", ").white());
    }
}

fn explain_where(tree: &WhereTree, depth: usize) {
    let indent = "  ".repeat(depth);
    for (key, node) in tree.iter() {
        match node {
            WhereNode::Equals(value) => {
                println!("{}{} = {}", indent, key.white(), value.to_string().yellow());
            }
            WhereNode::Operator(op) => {
                println!("{}{} {}", indent, key.white(), op.to_string().yellow());
            }
            WhereNode::Nested(inner) => {
                println!("{}{}:", indent, key.cyan());
                explain_where(inner, depth + 1);
            }
        }
    }
}

fn show_operators() {
    println!("{}", "🔎 findquery Operator Reference".cyan().bold());
    println!();

    println!("{}", "Range modifiers (selector keys, any case):".green().bold());
    for op in RangeOp::all() {
        let marker = op.apply(Scalar::Int(0));
        println!(
            "  {:6} {:4} {}",
            op.key().cyan().bold(),
            op.symbol().white(),
            marker.name().dimmed()
        );
    }
    println!();

    let markers = [
        (FindOperator::IsNull, "null"),
        (FindOperator::In(vec![]), "[a, b, c]"),
        (FindOperator::Equal(Scalar::Int(0)), r#"{"$op": "equal", "value": v}"#),
        (
            FindOperator::Not(Box::new(FindOperator::IsNull)),
            r#"{"$op": "not", "value": {...}}"#,
        ),
        (FindOperator::Like(String::new()), r#"{"$op": "like", "value": "%v%"}"#),
        (FindOperator::ILike(String::new()), r#"{"$op": "iLike", "value": "%v%"}"#),
        (
            FindOperator::Between(Scalar::Int(0), Scalar::Int(0)),
            r#"{"$op": "between", "value": [lo, hi]}"#,
        ),
        (FindOperator::And(vec![]), r#"{"$op": "and", "value": [...]}"#),
    ];

    println!(
        "{:18} {:10} {}",
        "Marker".white().bold(),
        "SQL".white().bold(),
        "Written as".white().bold()
    );
    println!("{}", "─".repeat(72).dimmed());
    for (op, written) in markers {
        println!(
            "{:18} {:10} {}",
            op.name().cyan().bold(),
            op.symbol().yellow(),
            written.dimmed()
        );
    }
}
