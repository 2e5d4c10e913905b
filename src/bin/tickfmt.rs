//! CLI: render a JSON pipeline definition as TICKscript or as its structured
//! JSON form.
//!
//! Usage: `tickfmt [OPTIONS] <path-to-definition>`
//! Example: tickfmt --format json --root all pipelines/user_actions.json
//!
//! Set RUST_LOG=streamweave_tick=trace for span enter/exit and events on stderr.

use clap::Parser;
use std::env;
use std::fs;
use std::path::PathBuf;
use std::process;
use streamweave_tick::{OutputFormat, PipelineDefinition, RenderOptions, render_definition};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

const ID_SEED_ENV: &str = "STREAMWEAVE_TICK_ID_SEED";

/// Render a pipeline definition as TICKscript or JSON.
#[derive(Parser, Debug)]
#[command(name = "tickfmt")]
#[command(
  after_help = r#"Environment variables (override the matching flag when set):
  STREAMWEAVE_TICK_ID_SEED   First node id handed out while building the pipeline.

Examples:
  tickfmt pipelines/user_actions.json
  tickfmt --format pipeline --pretty pipelines/user_actions.json"#
)]
struct Args {
  /// Output format: tick, json or pipeline.
  #[arg(long, value_name = "FORMAT", default_value_t = OutputFormat::Tick)]
  format: OutputFormat,

  /// Indent JSON output.
  #[arg(long)]
  pretty: bool,

  /// Render only the subgraph below this declared node.
  #[arg(long, value_name = "NAME")]
  root: Option<String>,

  /// First node id. Overridden by STREAMWEAVE_TICK_ID_SEED if set.
  #[arg(long, value_name = "N", default_value_t = 0)]
  id_seed: u64,

  /// Render even when parent and child edge types disagree.
  #[arg(long)]
  no_validate: bool,

  /// Path to the JSON pipeline definition
  #[arg(value_name = "path-to-definition")]
  definition: PathBuf,
}

fn main() {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
    .with_span_events(FmtSpan::ENTER | FmtSpan::EXIT)
    .with_writer(std::io::stderr)
    .init();

  let args = Args::parse();

  // Env var overrides the flag.
  let id_seed = match env::var(ID_SEED_ENV) {
    Ok(v) => match v.trim().parse::<u64>() {
      Ok(seed) => seed,
      Err(e) => {
        eprintln!("Error: invalid {} '{}': {}", ID_SEED_ENV, v, e);
        process::exit(1);
      }
    },
    Err(_) => args.id_seed,
  };

  let options = RenderOptions {
    format: args.format,
    pretty: args.pretty,
    root: args.root.clone(),
    id_seed,
    validate: !args.no_validate,
  };
  info!(?options, path = %args.definition.display(), "options (env or flags)");

  let path = &args.definition;
  let text = match fs::read_to_string(path) {
    Ok(s) => s,
    Err(e) => {
      eprintln!("Error reading {}: {}", path.display(), e);
      process::exit(1);
    }
  };

  let definition = match PipelineDefinition::from_json(&text) {
    Ok(d) => d,
    Err(e) => {
      eprintln!("Error parsing definition: {}", e);
      process::exit(1);
    }
  };

  match render_definition(&definition, &options) {
    Ok(out) => println!("{}", out),
    Err(e) => {
      eprintln!("Error rendering pipeline: {}", e);
      process::exit(1);
    }
  }
}
