use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{debug, info};

use indigo_config::{ParseErrorPolicy, ProfileConfig, load_from_path};
use runner::{inputs, version};
use schema_profile::ProfilePass;

#[derive(Parser, Debug)]
#[command(
    name = "indigo",
    version = version::VERSION,
    about = "Profile the schema of newline-delimited JSON streams"
)]
struct Args {
    /// Files to read; stdin is used when none are given.
    #[arg(value_name = "FILE")]
    files: Vec<PathBuf>,

    /// YAML profile config.
    #[arg(short, long)]
    config: Option<String>,

    /// Reservoir size per key path.
    #[arg(long)]
    size: Option<usize>,

    /// Truncate sampled strings longer than this many characters.
    #[arg(long)]
    max_length: Option<usize>,

    /// Input text encoding label (utf-8, windows-1252, ...).
    #[arg(long)]
    encoding: Option<String>,

    /// Skip lines that fail to decode or parse instead of aborting.
    /// Changes document totals and counters; the digest still covers
    /// every line read.
    #[arg(long)]
    skip_invalid: bool,

    /// Pretty-print the report.
    #[arg(long)]
    pretty: bool,

    /// Emit logs as JSON lines.
    #[arg(long)]
    log_json: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let _ = o11y::init_all(&o11y::O11yConfig {
        logging: o11y::logging::Config {
            level: None,
            json: args.log_json,
            with_targets: false,
        },
        install_panic_hook: true,
    });

    let cfg = resolve_config(&args).context("resolve profile config")?;
    debug!(
        size = cfg.sampler.size,
        max_length = cfg.sampler.max_length,
        encoding = %cfg.encoding,
        "profile config resolved"
    );

    let inputs = inputs::open_inputs(&args.files)?;

    let mut pass = ProfilePass::new(cfg)?;
    for input in inputs {
        debug!(input = %input.name, "profiling input");
        pass.consume(input.reader)
            .with_context(|| format!("profiling {}", input.name))?;
    }

    let report = pass.finish();
    info!(
        total = report.meta.total,
        paths = report.c.len(),
        sha1 = %report.meta.sha1,
        "profile complete"
    );

    let out = if args.pretty {
        report.to_json_pretty()?
    } else {
        report.to_json()?
    };
    println!("{out}");

    Ok(())
}

fn resolve_config(args: &Args) -> Result<ProfileConfig> {
    let mut cfg = match &args.config {
        Some(path) => load_from_path(path)
            .with_context(|| format!("loading config {path}"))?,
        None => ProfileConfig::default(),
    };

    if let Some(size) = args.size {
        cfg.sampler.size = size;
    }
    if let Some(max_length) = args.max_length {
        cfg.sampler.max_length = max_length;
    }
    if let Some(encoding) = &args.encoding {
        cfg.encoding = encoding.clone();
    }
    if args.skip_invalid {
        cfg.on_parse_error = ParseErrorPolicy::Skip;
    }

    cfg.validate()?;
    Ok(cfg)
}
