use clap::{ArgGroup, Parser};
use std::path::PathBuf;
use std::sync::Arc;
use steam_platform_audit::{
    config::DEFAULT_NICENESS,
    dump::DEFAULT_DUMP_PATH,
    progress::BarProgress,
    providers::{Session, StorefrontClient},
    rate_limit::TokioSleeper,
    AuditEngine, CompatibilityProber, Credentials, Platform, ProbeSettings, RateLimiter, SteamEndpoints,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "platform-audit")]
#[command(about = "Check which games in a Steam library run on a given OS", long_about = None)]
#[command(group(ArgGroup::new("user").required(true).args(["username", "steam_id"])))]
struct Cli {
    /// Custom profile name (steamcommunity.com/id/<username>)
    #[arg(short, long)]
    username: Option<String>,

    /// 64-bit Steam ID (steamcommunity.com/profiles/<id>)
    #[arg(short, long)]
    steam_id: Option<u64>,

    /// Operating system to check against
    #[arg(short, long, value_enum, default_value_t = Platform::Linux)]
    platform: Platform,

    /// Request spacing multiplier (>1.0 slower and safer, <1.0 faster and riskier)
    #[arg(short, long, default_value_t = DEFAULT_NICENESS)]
    niceness: f64,

    /// Where to save the raw store data
    #[arg(short, long, default_value = DEFAULT_DUMP_PATH)]
    output: PathBuf,

    /// Do not write the store data dump
    #[arg(long)]
    no_dump: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so the report can be piped
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // All configuration is checked before the first request
    let creds = Credentials::from_env(cli.username, cli.steam_id)?;
    let settings = ProbeSettings {
        platform: cli.platform,
        niceness: cli.niceness,
    };
    settings.validate()?;

    let endpoints = SteamEndpoints::default();
    let session = Session::authenticate(&endpoints, creds.api_key.clone()).await?;

    let limiter = RateLimiter::for_settings(&settings, Arc::new(TokioSleeper))?;
    tracing::info!("Probing the store every {:.2}s", limiter.interval().as_secs_f64());
    let prober = CompatibilityProber::new(
        Arc::new(StorefrontClient::new(&endpoints)?),
        limiter,
        settings.platform,
    );

    let mut engine = AuditEngine::new(Arc::new(session), prober).with_progress(Arc::new(BarProgress::new()));
    if !cli.no_dump {
        engine = engine.with_dump_path(cli.output);
    }

    let outcome = engine.run(&creds.user).await?;
    print!("{}", outcome.render());
    if let Some(e) = &outcome.dump_error {
        eprintln!("Warning: store data was not saved: {}", e);
    }

    Ok(())
}
