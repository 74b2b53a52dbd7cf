use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use studycurate::{curate, Config};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();
    info!("startup");

    // ─── 2) load configuration ───────────────────────────────────────
    let config_path = Path::new("curate.yaml");
    let cfg = if config_path.exists() {
        Config::from_yaml(config_path)
            .with_context(|| format!("loading {}", config_path.display()))?
    } else {
        Config::default()
    };
    cfg.ensure_output_dirs()
        .context("creating output directories")?;
    info!(
        base = %cfg.base_path.display(),
        processed = %cfg.processed_data_path.display(),
        "configured"
    );

    // ─── 3) run every table pipeline, cohort table first ─────────────
    let start = Instant::now();
    curate::run_all(&cfg).context("curation run failed")?;
    info!(elapsed = ?start.elapsed(), "all tables curated");

    Ok(())
}
