use std::env;
use std::sync::Arc;
use std::time::Duration;

use alert_engine::{
    AlertEngine, DispatchPolicy, EngineConfig, PollResult, Poller, Scope, TracingNotifier,
};
use clap::Parser;
use tracing::{info, warn};
use ward_api::{ApiConfig, ApiError, HttpAlertSource, WardClient};

#[derive(Debug, Parser)]
#[command(name = "ward-monitor")]
#[command(about = "Poll the ward backend and raise one notification per new alert")]
struct Args {
    /// Backend base URL. Falls back to WARD_API_URL env.
    #[arg(long)]
    base_url: Option<String>,

    /// Seconds between polls. Falls back to WARD_POLL_INTERVAL_SECS env.
    #[arg(long)]
    interval_secs: Option<u64>,

    /// Only show alerts for this room. Falls back to WARD_LOCATION env.
    #[arg(long)]
    location: Option<String>,

    /// Dispatch policy: replace or union. Falls back to WARD_DISPATCH_POLICY env.
    #[arg(long)]
    policy: Option<DispatchPolicy>,

    /// Notification title. Falls back to WARD_NOTIFICATION_TITLE env.
    #[arg(long)]
    title: Option<String>,

    /// Acknowledge this alert id and exit
    #[arg(long)]
    confirm: Option<i64>,

    /// Run a single poll, print the view and exit
    #[arg(long)]
    once: bool,
}

fn api_config(args: &Args) -> Result<ApiConfig, Box<dyn std::error::Error>> {
    let mut config = ApiConfig::from_env()?;
    if let Some(url) = &args.base_url {
        config = ApiConfig::new(url.as_str())
            .with_timeout(config.timeout)
            .with_fall_incident_limit(config.fall_incident_limit);
    }
    Ok(config)
}

fn engine_config(args: &Args) -> Result<EngineConfig, Box<dyn std::error::Error>> {
    let mut config = EngineConfig::from_env()?;
    if let Some(secs) = args.interval_secs {
        config = config.with_poll_interval(Duration::from_secs(secs.max(1)));
    }
    if let Some(policy) = args.policy {
        config = config.with_policy(policy);
    }
    if let Some(title) = &args.title {
        config = config.with_title(title.as_str());
    }
    if let Some(location) = &args.location {
        config.scope = Scope::Location(location.clone());
    }
    Ok(config)
}

/// Build the client and probe the backend once.
///
/// An unreachable backend is only logged: the engine degrades to empty views
/// and picks up again once the backend answers.
async fn open_client(api: ApiConfig) -> Result<WardClient, ApiError> {
    let client = WardClient::new(api)?;
    match client.health_check().await {
        Ok(true) => info!("Ward backend reachable"),
        Ok(false) => warn!("Ward backend answered the health check with an error status"),
        Err(e) => warn!("Ward backend unreachable, will keep polling: {}", e),
    }
    Ok(client)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let api = api_config(&args)?;
    let config = engine_config(&args)?;
    info!("Ward backend: {}", api.base_url);
    info!(
        "Poll interval: {:?}, policy: {}, scope: {:?}",
        config.poll_interval, config.policy, config.scope
    );

    let client = open_client(api).await?;
    if let (Ok(username), Ok(password)) = (env::var("WARD_USERNAME"), env::var("WARD_PASSWORD")) {
        if let Err(e) = client.login(&username, &password).await {
            warn!("Login failed, continuing without a token: {}", e);
        }
    }

    let engine = Arc::new(AlertEngine::new(
        HttpAlertSource::new(client.clone()),
        TracingNotifier,
        config,
    ));

    if let Some(alert_id) = args.confirm {
        let ack = engine.confirm(alert_id).await?;
        println!("Alert {}: {:?}", alert_id, ack);
        return Ok(());
    }

    if args.once {
        match engine.poll().await {
            PollResult::Refreshed(view) => {
                for alert in &view.items {
                    println!("[{}] #{} {}", alert.category, alert.id, alert.message);
                }
                if view.is_empty() {
                    println!("No active alerts");
                }
            }
            other => println!("Poll did not complete: {:?}", other),
        }
        return Ok(());
    }

    info!("Monitoring alerts (Ctrl+C to stop)");
    Poller::new(engine)
        .run_with_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await;

    if client.is_authenticated().await {
        client.logout().await;
    }

    Ok(())
}
