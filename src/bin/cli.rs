//! Binary entry point for the grafito miner.
#![forbid(unsafe_code)]

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use grafito::render::{self, RunSummary};
use grafito::{load_path, materialize, mine, Instance, MineConfig, Pattern};

#[derive(Parser, Debug)]
#[command(
    name = "grafito",
    version,
    about = "Frequent subgraph pattern miner for large labeled directed graphs",
    disable_help_subcommand = true
)]
struct Cli {
    /// Input graph file (`v`/`e` text format with a header line).
    graph: PathBuf,

    #[arg(long, default_value_t = 2, help = "Minimum support threshold (>= 2)")]
    min_support: usize,

    #[arg(
        long,
        default_value_t = 3,
        help = "Minimum vertex count for a retained pattern"
    )]
    min_size: usize,

    #[arg(
        long,
        help = "Sweep thresholds downward from the maximum observed single-edge \
                support to --min-support, one full cycle per threshold"
    )]
    sweep: bool,

    #[arg(long, help = "Skip instance materialization")]
    no_instances: bool,

    #[arg(
        long,
        value_enum,
        default_value_t = OutputFormat::Text,
        help = "Output format for results"
    )]
    format: OutputFormat,

    #[arg(long, value_name = "FILE", help = "Write results to a file instead of stdout")]
    output: Option<PathBuf>,
}

#[derive(ValueEnum, Copy, Clone, Debug)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> grafito::Result<ExitCode> {
    let base = MineConfig {
        min_support: cli.min_support,
        min_pattern_vertices: cli.min_size,
    };
    base.validate()?;

    let mut loaded = load_path(&cli.graph)?;
    let max_support = loaded.index.max_edge_support();
    if cli.min_support > max_support {
        eprintln!(
            "no frequent patterns possible: min support {} exceeds the maximum \
             observed single-edge support {max_support}",
            cli.min_support
        );
        return Ok(ExitCode::SUCCESS);
    }

    // A sweep only stops at supports some edge type actually has (thresholds
    // between two observed values see the same seeds), finishing with the
    // requested minimum.
    let thresholds: Vec<usize> = if cli.sweep {
        let mut thresholds: Vec<usize> = loaded
            .index
            .observed_supports()
            .into_iter()
            .filter(|&support| support > cli.min_support)
            .collect();
        thresholds.push(cli.min_support);
        thresholds
    } else {
        vec![cli.min_support]
    };

    // Canonical codes already reported at a higher threshold are not
    // repeated in lower-threshold output.
    let mut already_reported: std::collections::BTreeSet<String> = Default::default();
    let mut out = String::new();
    for threshold in thresholds {
        let config = MineConfig {
            min_support: threshold,
            ..base
        };
        let (patterns, _) = mine(&mut loaded.index, &config);
        let fresh: Vec<&Pattern> = patterns
            .iter()
            .filter(|p| already_reported.insert(p.code().to_string()))
            .collect();

        let instances: Option<Vec<Vec<Instance>>> = (!cli.no_instances).then(|| {
            fresh
                .iter()
                .map(|&p| materialize(p, &loaded.index))
                .collect()
        });

        match cli.format {
            OutputFormat::Text => {
                out.push_str(&format!(
                    "== threshold {threshold}: {} new pattern(s)\n",
                    fresh.len()
                ));
                for (i, &pattern) in fresh.iter().enumerate() {
                    out.push_str(&format!(
                        "{i}:\nSize: {} (support {})\n",
                        pattern.vertex_count(),
                        pattern.support()
                    ));
                    out.push_str(&render::render_pattern(
                        pattern,
                        &loaded.vertex_labels,
                        &loaded.edge_labels,
                    ));
                    if let Some(instances) = &instances {
                        out.push_str(&format!("Number of instances: {}\n", instances[i].len()));
                        for instance in &instances[i] {
                            out.push_str(&render::render_instance(instance));
                        }
                    }
                    out.push('\n');
                }
            }
            OutputFormat::Json => {
                let owned: Vec<Pattern> = fresh.iter().map(|&p| p.clone()).collect();
                let counts: Option<Vec<usize>> =
                    instances.as_ref().map(|all| all.iter().map(Vec::len).collect());
                let summary: RunSummary = render::summarize(
                    threshold,
                    cli.min_size,
                    &owned,
                    counts.as_deref(),
                );
                out.push_str(&serde_json::to_string_pretty(&summary).expect("summary serializes"));
                out.push('\n');
            }
        }
    }

    match &cli.output {
        Some(path) => fs::write(path, out)?,
        None => print!("{out}"),
    }
    Ok(ExitCode::SUCCESS)
}
