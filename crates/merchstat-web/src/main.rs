mod error;
mod routes;

use std::net::SocketAddr;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use merchstat_core::{OrderSource, ReqwestHttpClient, ShopifyOrderSource};

use crate::error::ServeError;
use crate::routes::AppState;

/// Merchant sales analytics API over a Shopify order source.
#[derive(Debug, Parser)]
#[command(name = "merchstat-web", version, about = "Merchant sales analytics API")]
struct Args {
    /// Address to bind the HTTP listener on.
    #[arg(long, default_value = "127.0.0.1:3000")]
    bind: SocketAddr,

    /// Serve deterministic demo data instead of calling the live order source.
    #[arg(long)]
    demo: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt::init();

    match run(Args::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::from(error.exit_code())
        }
    }
}

async fn run(args: Args) -> Result<(), ServeError> {
    let source: Arc<dyn OrderSource> = if args.demo {
        tracing::info!("demo mode: serving deterministic mock orders");
        Arc::new(ShopifyOrderSource::default())
    } else {
        let shop_domain = require_env("MERCHSTAT_SHOP_DOMAIN")?;
        let access_token = require_env("MERCHSTAT_ACCESS_TOKEN")?;
        Arc::new(ShopifyOrderSource::with_http_client(
            Arc::new(ReqwestHttpClient::new()),
            shop_domain,
            access_token,
        ))
    };

    let app = routes::router(AppState { source });

    let listener = tokio::net::TcpListener::bind(args.bind).await?;
    tracing::info!(addr = %args.bind, "merchstat-web listening");
    axum::serve(listener, app).await?;

    Ok(())
}

fn require_env(name: &'static str) -> Result<String, ServeError> {
    std::env::var(name).map_err(|_| ServeError::MissingEnv { name })
}
