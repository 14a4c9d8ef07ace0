//! Photo Share - a small photo-sharing web app.
//!
//! This binary starts the HTTP server and configures all components.

use clap::Parser;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use photo_share::{
    auth::HttpAuthProvider,
    config::Config,
    server::{create_router, RouterConfig},
    storage::{create_s3_client, S3PhotoStore},
};

#[tokio::main]
async fn main() -> ExitCode {
    let config = Config::parse();

    // Initialize logging
    init_logging(config.verbose);

    // Validate configuration
    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    info!("Configuration:");
    info!("  S3 bucket: {}", config.s3_bucket);
    if let Some(ref endpoint) = config.s3_endpoint {
        info!("  S3 endpoint: {}", endpoint);
    }
    info!("  S3 region: {}", config.s3_region);
    info!("  Auth provider: {}", config.auth_url);
    if config.auth_api_key.is_none() {
        warn!("  Auth API key: not set (provider requests go out unkeyed)");
    }
    match config.public_url_base {
        Some(ref base) => info!("  Public URL base: {}", base),
        None => info!("  Public URL base: default S3 URLs"),
    }

    // Create S3 client
    let s3_client = create_s3_client(config.s3_endpoint.as_deref(), &config.s3_region).await;

    // Test S3 connectivity
    info!("Connecting to S3...");
    match test_s3_connection(&s3_client, &config.s3_bucket).await {
        Ok(()) => info!("  Connected successfully"),
        Err(e) => {
            error!("  Failed to connect to S3: {}", e);
            error!("");
            error!("  Please check:");
            error!("    - Your AWS credentials are configured correctly");
            error!(
                "    - The bucket '{}' exists and is accessible",
                config.s3_bucket
            );
            error!("    - The S3 endpoint is correct (if using MinIO/custom S3)");
            return ExitCode::FAILURE;
        }
    }

    // Create the photo store and auth provider client
    let store = Arc::new(S3PhotoStore::new(
        s3_client,
        config.s3_bucket.clone(),
        config.s3_region.clone(),
        config.public_url_base.clone(),
    ));

    let provider = Arc::new(HttpAuthProvider::new(
        &config.auth_url,
        config.auth_api_key.clone(),
    ));

    // Create router
    let router = create_router(provider, store, build_router_config(&config));

    // Bind and serve
    let addr = config.bind_address();
    info!("Server listening on: http://{}", addr);

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind to {}: {}", addr, e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = axum::serve(listener, router).await {
        error!("Server error: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

/// Test S3 connectivity with a minimal listing request.
async fn test_s3_connection(client: &aws_sdk_s3::Client, bucket: &str) -> Result<(), String> {
    client
        .list_objects_v2()
        .bucket(bucket)
        .max_keys(1)
        .send()
        .await
        .map_err(|e| format!("{}", e))?;

    Ok(())
}

/// Initialize the tracing/logging subsystem.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "photo_share=debug,tower_http=debug"
    } else {
        "photo_share=info,tower_http=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Build RouterConfig from the application Config.
fn build_router_config(config: &Config) -> RouterConfig {
    let mut router_config = RouterConfig::new(config.cookie_secret.clone());

    if let Some(ref origins) = config.cors_origins {
        router_config = router_config.with_cors_origins(origins.clone());
    }

    router_config.with_tracing(!config.no_tracing)
}
