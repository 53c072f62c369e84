use anyhow::Context;
use deadpool_redis::{Config, Runtime};
use futures::future::join_all;
use std::env;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use upyun_uploads::uploads::{
    adapter::{
        incoming::plugin::{FileUploadRequest, HostUpload, ImageUploadRequest, UploadsPlugin},
        outgoing::{
            image_source_http::HttpImageSource, object_store_upyun::UpyunConnector,
            settings_store_redis::RedisSettingsStore,
        },
    },
    application::{
        domain::{entities::UploadResult, errors::UploadError, policies::upload_policy::UploadPolicy},
        storage_env::StorageEnvDefaults,
    },
};

/// Turn one command-line argument into the host payload the plugin expects.
/// http(s) URLs are image uploads; anything else is a local file.
async fn upload_arg(plugin: &UploadsPlugin, arg: String) -> Result<UploadResult, UploadError> {
    if arg.starts_with("http://") || arg.starts_with("https://") {
        return plugin
            .upload_image(ImageUploadRequest {
                image: Some(HostUpload {
                    url: Some(arg),
                    ..Default::default()
                }),
            })
            .await;
    }

    let size = tokio::fs::metadata(&arg).await.map(|m| m.len()).ok();
    plugin
        .upload_file(FileUploadRequest {
            file: Some(HostUpload {
                path: Some(arg),
                size,
                ..Default::default()
            }),
        })
        .await
}

/// Install ring as the process-wide rustls provider. Returns false when one
/// was already installed.
fn install_crypto_provider() -> bool {
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        tracing::debug!("rustls crypto provider already installed");
        return false;
    }
    true
}

#[tokio::main]
#[cfg(not(tarpaulin_include))]
async fn start() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Try .env.{environment} first, then fall back to .env
    let rust_env = env::var("RUST_ENV").unwrap_or_else(|_| "development".to_string());
    let env_file = format!(".env.{}", rust_env);
    if dotenvy::from_filename(&env_file).is_err() {
        dotenvy::dotenv().ok();
    }

    install_crypto_provider();

    let redis_url = env::var("REDIS_URL").context("REDIS_URL is not set in .env file")?;
    let redis_pool = Config::from_url(&redis_url)
        .create_pool(Some(Runtime::Tokio1))
        .context("Failed to create Redis pool")?;

    let plugin = UploadsPlugin::wire(
        RedisSettingsStore::new(Arc::new(redis_pool)),
        Arc::new(UpyunConnector::new()),
        HttpImageSource::new(),
        StorageEnvDefaults::from_env(),
        UploadPolicy::from_env(),
    );

    let settings = plugin.activate().await?;
    info!(
        bucket = %settings.bucket,
        remote_path_prefix = %settings.remote_path_prefix,
        maximum_file_size_kb = plugin.policy().maximum_file_size_kb,
        "Upload plugin activated"
    );

    let args: Vec<String> = env::args().skip(1).collect();
    if args.is_empty() {
        eprintln!("usage: upyun-upload <file-path | image-url>...");
        return Ok(());
    }

    let results = join_all(args.into_iter().map(|arg| upload_arg(&plugin, arg))).await;

    let mut failures = 0;
    for result in results {
        match result {
            Ok(uploaded) => println!("{}", serde_json::to_string(&uploaded)?),
            Err(e) => {
                failures += 1;
                eprintln!("{}", e);
            }
        }
    }

    plugin.deactivate().await;

    if failures > 0 {
        anyhow::bail!("{} upload(s) failed", failures);
    }
    Ok(())
}

fn main() {
    if let Err(e) = start() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
