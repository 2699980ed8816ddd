use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use plextv_auth::{authenticate, build_client, Settings};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false),
        )
        .init();

    let settings = Settings::new().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        eprintln!("\nConfiguration is read from config.toml (or $PLEXTV_CONFIG) and PLEXTV__* variables, e.g.:");
        eprintln!("\napp_name = \"my-app\"");
        eprintln!("\n[forward]");
        eprintln!("host = \"localhost:8080\"");
        e
    })?;
    settings.validate().map_err(anyhow::Error::msg)?;
    tracing::info!("Configuration loaded successfully");

    let client = build_client(&settings)?;
    let token = authenticate(&client, &settings).await?;

    let users = client.users(&token).await?;
    tracing::info!(users = users.len(), "Fetched sharing feed");
    println!("{}", serde_json::to_string_pretty(&users)?);

    Ok(())
}
