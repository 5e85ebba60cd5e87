//! Node Labels CLI
//!
//! Entry point for the `node-labels` command-line tool.

use clap::{Parser, Subcommand};
use node_labels::{
    jobs_for_node, labels_tied_to, logging, select_node, Inventory, LabelExpression, LabelSet,
    SelectionError, SelectionOptions, Token,
};
use std::path::PathBuf;
use std::process;

/// Exit code for bad input (unparsable expression, unreadable inventory)
const EXIT_ERROR: i32 = 2;

#[derive(Parser)]
#[command(name = "node-labels")]
#[command(about = "Match CI node labels against job label expressions", version)]
struct Cli {
    /// Log filter (e.g. "debug", "label_expr=trace"); overrides NODE_LABELS_LOG
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate an expression against a set of labels
    Match {
        /// Label expression, e.g. "linux&&!arm64"
        expr: String,

        /// Labels the node carries
        labels: Vec<String>,
    },

    /// Show the token tree of an expression
    Tokens {
        /// Label expression
        expr: String,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// List nodes eligible for an expression
    Nodes {
        /// Label expression
        expr: String,

        /// Path to inventory file (default: ~/.config/node-labels/inventory.toml)
        #[arg(long, short = 'i')]
        inventory: Option<PathBuf>,

        /// Consider offline nodes too
        #[arg(long)]
        include_offline: bool,

        /// Output the selection report in JSON format
        #[arg(long)]
        json: bool,
    },

    /// List jobs that may run on a node
    Jobs {
        /// Node name from inventory
        node: String,

        /// Path to inventory file (default: ~/.config/node-labels/inventory.toml)
        #[arg(long, short = 'i')]
        inventory: Option<PathBuf>,

        /// Do not count the node name as one of its labels
        #[arg(long)]
        no_host_label: bool,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Show nodes and jobs tied to a label
    Label {
        /// The label
        label: String,

        /// Path to inventory file (default: ~/.config/node-labels/inventory.toml)
        #[arg(long, short = 'i')]
        inventory: Option<PathBuf>,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    logging::init_logging(cli.log_level);

    match cli.command {
        Commands::Match { expr, labels } => {
            run_match(&expr, &labels);
        }
        Commands::Tokens { expr, json } => {
            run_tokens(&expr, json);
        }
        Commands::Nodes {
            expr,
            inventory,
            include_offline,
            json,
        } => {
            run_nodes(&expr, inventory, include_offline, json);
        }
        Commands::Jobs {
            node,
            inventory,
            no_host_label,
            json,
        } => {
            run_jobs(&node, inventory, no_host_label, json);
        }
        Commands::Label {
            label,
            inventory,
            json,
        } => {
            run_label(&label, inventory, json);
        }
    }
}

fn parse_expression(expr: &str) -> LabelExpression {
    match LabelExpression::parse(expr) {
        Ok(expression) => expression,
        Err(e) => {
            eprintln!("Error: invalid label expression '{}': {}", expr, e);
            process::exit(EXIT_ERROR);
        }
    }
}

fn load_inventory(path: Option<PathBuf>) -> Inventory {
    let inventory = match path {
        Some(ref path) => Inventory::load(path),
        None => Inventory::load_default(),
    };

    match inventory {
        Ok(inv) => inv,
        Err(e) => {
            eprintln!("Error loading inventory: {}", e);
            process::exit(EXIT_ERROR);
        }
    }
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error serializing output: {}", e);
            process::exit(EXIT_ERROR);
        }
    }
}

fn run_match(expr: &str, labels: &[String]) {
    let expression = parse_expression(expr);
    let labels: LabelSet = labels.iter().flat_map(|l| l.split_whitespace()).collect();

    match expression.try_matches(&labels) {
        Ok(matched) => {
            println!("{}", matched);
            process::exit(if matched { 0 } else { 1 });
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(EXIT_ERROR);
        }
    }
}

fn run_tokens(expr: &str, json_output: bool) {
    let expression = parse_expression(expr);

    if json_output {
        print_json(expression.tokens());
    } else {
        for token in expression.tokens() {
            print_token(token, 0);
        }
    }
}

fn print_token(token: &Token, depth: usize) {
    let indent = "  ".repeat(depth);
    match token {
        Token::Group(inner) => {
            println!("{}{}", indent, token.kind().name());
            for child in inner {
                print_token(child, depth + 1);
            }
        }
        Token::Id(name) => println!("{}{} {}", indent, token.kind().name(), name),
        _ => println!("{}{} {}", indent, token.kind().name(), token.kind()),
    }
}

fn run_nodes(expr: &str, inventory_path: Option<PathBuf>, include_offline: bool, json_output: bool) {
    let expression = parse_expression(expr);
    let inventory = load_inventory(inventory_path);
    let options = SelectionOptions::default().with_offline(include_offline);

    let report = match select_node(&inventory, &expression, &options) {
        Ok(report) => report,
        Err(e @ SelectionError::NoLabelMatch { .. }) => {
            eprintln!("{}", e);
            process::exit(1);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(EXIT_ERROR);
        }
    };

    if json_output {
        match report.to_json() {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing output: {}", e);
                process::exit(EXIT_ERROR);
            }
        }
        return;
    }

    println!("Nodes matching '{}' ({} total):\n", report.expression, report.candidates.len());
    for name in &report.candidates {
        let marker = if report.selected.as_deref() == Some(name.as_str()) {
            " (selected)"
        } else {
            ""
        };
        match inventory.node(name) {
            Some(node) => println!("  {}{}  priority {}  [{}]", name, marker, node.priority, node.labels),
            None => println!("  {}{}", name, marker),
        }
    }
    if !report.skipped_offline.is_empty() {
        println!("\nSkipped offline: {}", report.skipped_offline.join(", "));
    }
}

fn run_jobs(node_name: &str, inventory_path: Option<PathBuf>, no_host_label: bool, json_output: bool) {
    let inventory = load_inventory(inventory_path);
    let options = SelectionOptions::default().with_host_label(!no_host_label);

    let jobs = match jobs_for_node(&inventory, node_name, &options) {
        Ok(jobs) => jobs,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!(
                "Available nodes: {}",
                inventory.nodes.iter().map(|n| n.name.as_str()).collect::<Vec<_>>().join(", ")
            );
            process::exit(EXIT_ERROR);
        }
    };

    if json_output {
        let output: Vec<serde_json::Value> = jobs
            .iter()
            .map(|job| {
                serde_json::json!({
                    "name": job.name,
                    "assigned_node": job.assigned_node,
                })
            })
            .collect();
        print_json(&output);
        return;
    }

    if jobs.is_empty() {
        println!("No jobs may run on '{}'.", node_name);
        return;
    }

    println!("Jobs that may run on '{}' ({} total):\n", node_name, jobs.len());
    for job in jobs {
        match job.label_expression() {
            Some(expression) => println!("  {}  [{}]", job.name, expression),
            None => println!("  {}  (unrestricted)", job.name),
        }
    }
}

fn run_label(label: &str, inventory_path: Option<PathBuf>, json_output: bool) {
    let inventory = load_inventory(inventory_path);
    let usage = labels_tied_to(&inventory, label);

    if json_output {
        print_json(&usage);
        return;
    }

    println!("Label '{}'", usage.label);
    if usage.nodes.is_empty() {
        println!("  Nodes: (none)");
    } else {
        println!("  Nodes: {}", usage.nodes.join(", "));
    }
    if usage.jobs.is_empty() {
        println!("  Jobs: (none)");
    } else {
        println!("  Jobs: {}", usage.jobs.join(", "));
    }
}
