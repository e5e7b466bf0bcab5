use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use app_core::{AppController, Services};
use clap::Parser;
use client_core::{load_settings, ApiMode, ClientSettings};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod picker;
mod shell;

use picker::ShellPicker;

#[derive(Parser, Debug)]
#[command(name = "receptai", version, about = "Recipes from a photo of your fridge")]
struct Args {
    /// Settings file; defaults to <config dir>/receptai/client.toml when present.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long, conflicts_with = "live")]
    mock: bool,
    #[arg(long)]
    live: bool,
    #[arg(long)]
    api_url: Option<String>,
    /// Answer every camera/gallery permission request with a refusal.
    #[arg(long)]
    deny_media_access: bool,
}

fn resolve_settings(args: &Args) -> Result<ClientSettings> {
    let mut settings =
        load_settings(args.config.as_deref()).context("failed to load client settings")?;
    if args.mock {
        settings.api_mode = ApiMode::Mock;
    }
    if args.live {
        settings.api_mode = ApiMode::Live;
    }
    if let Some(url) = &args.api_url {
        settings.api_base_url = url.clone();
    }
    settings.validate().context("invalid --api-url")?;
    Ok(settings)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let settings = resolve_settings(&args)?;
    info!(
        mode = ?settings.api_mode,
        base_url = %settings.api_base_url,
        "starting receptai"
    );

    let picker = Arc::new(ShellPicker::new(!args.deny_media_access));
    let services = Services::from_settings(&settings, picker.clone())
        .context("failed to build recipe service")?;
    let mut app = AppController::new(services);

    shell::run(&mut app, &picker).await
}
