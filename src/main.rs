use std::sync::Arc;

use crypto_news::config::Config;
use crypto_news::fetch::select_cache_directive;
use crypto_news::server::Server;
use crypto_news::{Request, api};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A missing .env file is normal outside local development.
    let dotenv = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    if let Err(e) = dotenv {
        if !e.not_found() {
            warn!(error = %e, "ignoring unreadable .env file");
        }
    }

    let config = Config::from_env()?;
    let directive = select_cache_directive(&config.environment, config.revalidate_secs);
    info!(
        environment = %config.environment,
        upstream = %config.upstream_url,
        cache_control = %directive.header_value(),
        "starting crypto-news"
    );

    let source = api::news_source(&config)?;
    let app = Arc::new(api::app(Arc::new(source)));

    let server = Server::bind(config.bind_addr.to_string()).await?;
    server
        .run_until(
            move |req: Request| {
                let app = Arc::clone(&app);
                async move { app.handle(req).await }
            },
            async {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    warn!(error = %e, "could not listen for ctrl-c");
                    std::future::pending::<()>().await;
                }
            },
        )
        .await?;

    info!("crypto-news stopped");
    Ok(())
}
