//! Command line entry point for the distribution assembler.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use log::{info, warn};

use mrdist::{DistAssembler, ProjectConfig, RunReport, Variant};

#[derive(Debug, Parser)]
#[command(name = "mrdist", version, about = "Assemble mrLiquid distribution trees")]
struct Cli {
    /// Source tree root containing shaders, scripts, icons and docs.
    #[arg(long, default_value = ".")]
    source_root: PathBuf,

    /// Build output root. Defaults to `BUILD` under the source root.
    #[arg(long)]
    build_root: Option<PathBuf>,

    /// Prefix the full distribution is written under.
    #[arg(long, default_value = "install")]
    install_root: PathBuf,

    /// Prefix the demo distribution is written under.
    #[arg(long, default_value = "demo")]
    demo_root: PathBuf,

    /// Explicit configuration file instead of discovery next to the source
    /// root.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Assemble only one of the two distributions.
    #[arg(long, value_enum)]
    only: Option<RunSelection>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum RunSelection {
    Full,
    Demo,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => match ProjectConfig::from_path(path) {
            Some(config) => config,
            None => bail!("failed to read configuration from {}", path.display()),
        },
        None => ProjectConfig::discover(&cli.source_root),
    };
    let layout = config.into_layout();

    let build_root = cli
        .build_root
        .clone()
        .unwrap_or_else(|| cli.source_root.join("BUILD"));
    let assembler = DistAssembler::new(&layout, &build_root, &cli.source_root);

    // Demo first, then the full install, matching the historical run order.
    if cli.only != Some(RunSelection::Full) {
        let out = layout.demo_output_root(&cli.demo_root);
        let report = assembler
            .assemble(&out, &Variant::demo())
            .with_context(|| format!("demo assembly into {} failed", out.display()))?;
        summarise("demo", &report);
    }
    if cli.only != Some(RunSelection::Demo) {
        let out = layout.install_output_root(&cli.install_root);
        let report = assembler
            .assemble(&out, &Variant::Full)
            .with_context(|| format!("full assembly into {} failed", out.display()))?;
        summarise("full", &report);
    }

    Ok(())
}

fn summarise(label: &str, report: &RunReport) {
    if report.is_clean() {
        info!("{label}: {report}");
    } else {
        warn!("{label}: {report}");
        for skipped in &report.skipped {
            warn!("{label}: skipped {}: {}", skipped.source.display(), skipped.error);
        }
    }
}
