mod config;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use jeepnet_core::prelude::*;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use config::{FileConfig, NetworkOverrides};

#[derive(Parser, Debug)]
#[command(name = "jeepnet", version)]
#[command(about = "Builds a routable jeepney network from route polylines", long_about = None)]
struct Cli {
    /// TOML file with a `[network]` table and default `[paths]`
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    /// Log per-edge detail
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build the network graph and write it as JSON
    Build {
        #[command(flatten)]
        inputs: Inputs,
        /// Graph JSON output
        #[arg(long, short)]
        output: Option<PathBuf>,
        /// Optional GeoJSON rendering of the graph
        #[arg(long)]
        geojson: Option<PathBuf>,
        /// Indent the JSON output
        #[arg(long)]
        pretty: bool,
        #[command(flatten)]
        overrides: NetworkOverrides,
    },
    /// Expand a blueprint into the flat segment list
    Segments {
        /// Segment blueprint JSON
        #[arg(long)]
        blueprint: Option<PathBuf>,
        /// Route id to polyline lookup JSON
        #[arg(long)]
        lookup: Option<PathBuf>,
        /// Segment list output
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Build the network and print its statistics without writing it
    Stats {
        #[command(flatten)]
        inputs: Inputs,
        #[command(flatten)]
        overrides: NetworkOverrides,
    },
}

#[derive(clap::Args, Debug, Clone)]
struct Inputs {
    /// Segment list JSON
    #[arg(long, conflicts_with = "blueprint")]
    segments: Option<PathBuf>,
    /// Segment blueprint JSON, expanded before building
    #[arg(long)]
    blueprint: Option<PathBuf>,
    /// Route id to polyline lookup JSON
    #[arg(long)]
    lookup: Option<PathBuf>,
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let file_config = FileConfig::load_optional(cli.config.as_deref())?;

    match cli.command {
        Commands::Build {
            inputs,
            output,
            geojson,
            pretty,
            overrides,
        } => {
            let output = output
                .or(file_config.paths.output.clone())
                .context("no output path given (use --output or [paths].output)")?;
            let geojson = geojson.or(file_config.paths.geojson.clone());
            let network = overrides.apply(file_config.network.clone());

            let build = run_build(&inputs, &file_config, &network)?;
            write_json(&build.graph, &output, pretty)
                .with_context(|| format!("failed to write {}", output.display()))?;

            if let Some(path) = geojson {
                let lookup = load_polyline_lookup(&resolve_lookup(&inputs, &file_config)?)?;
                write_geojson(&build.graph, &lookup.value, &path)?;
            }
        }
        Commands::Segments {
            blueprint,
            lookup,
            output,
        } => {
            let blueprint = blueprint
                .or(file_config.paths.blueprint.clone())
                .context("no blueprint given (use --blueprint or [paths].blueprint)")?;
            let lookup = lookup
                .or(file_config.paths.lookup.clone())
                .context("no lookup given (use --lookup or [paths].lookup)")?;
            let output = output
                .or(file_config.paths.segments.clone())
                .context("no output path given (use --output or [paths].segments)")?;
            expand_segments(&blueprint, &lookup, &output)?;
        }
        Commands::Stats { inputs, overrides } => {
            let network = overrides.apply(file_config.network.clone());
            let build = run_build(&inputs, &file_config, &network)?;
            println!("{}", serde_json::to_string_pretty(&build.stats)?);
        }
    }

    Ok(())
}

fn resolve_lookup(inputs: &Inputs, file_config: &FileConfig) -> Result<PathBuf> {
    inputs
        .lookup
        .clone()
        .or(file_config.paths.lookup.clone())
        .context("no lookup given (use --lookup or [paths].lookup)")
}

/// Loads inputs and builds the network; nothing is written on failure
fn run_build(
    inputs: &Inputs,
    file_config: &FileConfig,
    network: &NetworkConfig,
) -> Result<NetworkBuild> {
    let lookup = resolve_lookup(inputs, file_config)?;

    let build = match (&inputs.segments, &inputs.blueprint) {
        (Some(segments), _) => build_network_from_files(segments, &lookup, network)?,
        (None, Some(blueprint)) => build_network_from_blueprint(blueprint, &lookup, network)?,
        (None, None) => match (&file_config.paths.segments, &file_config.paths.blueprint) {
            (Some(segments), _) => build_network_from_files(segments, &lookup, network)?,
            (None, Some(blueprint)) => build_network_from_blueprint(blueprint, &lookup, network)?,
            (None, None) => bail!("no input given (use --segments or --blueprint)"),
        },
    };

    if !build.report.is_clean() {
        warn!(
            "{} segments skipped, {} records dropped in total",
            build.report.skipped_segments(),
            build.report.issues.len()
        );
    }
    info!(
        "{} nodes, {} transit edges, {} walk edges, {} connected components",
        build.stats.node_count,
        build.stats.transit_edge_count,
        build.stats.walk_edge_count,
        build.stats.connected_components
    );
    Ok(build)
}

fn write_geojson(graph: &NetworkGraph, lookup: &RouteLookup, path: &Path) -> Result<()> {
    let collection = graph.to_geojson(Some(lookup))?;
    let file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, &collection)
        .with_context(|| format!("failed to write {}", path.display()))?;
    writer
        .flush()
        .with_context(|| format!("failed to write {}", path.display()))?;
    info!("Wrote GeoJSON to {}", path.display());
    Ok(())
}

fn expand_segments(blueprint: &Path, lookup: &Path, output: &Path) -> Result<()> {
    let routes = load_blueprint(blueprint)?;
    let lookup = load_polyline_lookup(lookup)?;
    let expanded = expand_blueprint(&routes.value, &lookup.value);

    for issue in routes
        .issues
        .iter()
        .chain(&lookup.issues)
        .chain(&expanded.issues)
    {
        warn!("Skipping: {issue}");
    }

    let file =
        File::create(output).with_context(|| format!("failed to create {}", output.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &expanded.value)
        .with_context(|| format!("failed to write {}", output.display()))?;
    writer
        .flush()
        .with_context(|| format!("failed to write {}", output.display()))?;
    info!(
        "Wrote {} segments to {}",
        expanded.value.len(),
        output.display()
    );
    Ok(())
}
