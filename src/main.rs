use anyhow::Context;
use clientbook::{
    auth::{jwt::TokenService, password::Argon2Hasher, service::AuthService},
    cli::{
        init::{self, InitConfig, InitResult},
        output::Output,
        Cli, Commands,
    },
    AppConfig, AppState,
};
use std::{path::Path, sync::Arc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse_args();
    let output = if cli.no_color {
        Output::no_color()
    } else {
        Output::new()
    };

    match cli.command {
        Some(Commands::Init {
            path,
            force,
            host,
            port,
        }) => {
            let result = init::run(
                InitConfig {
                    path,
                    force,
                    host,
                    port,
                },
                &output,
            );
            match result {
                InitResult::Success | InitResult::AlreadyExists => Ok(()),
                InitResult::Error(e) => anyhow::bail!("init failed: {}", e),
            }
        }
        Some(Commands::Config { validate }) => show_config(&cli.config, validate, &output),
        None => serve(&cli.config, cli.verbose).await,
    }
}

fn show_config(path: &Path, validate: bool, output: &Output) -> anyhow::Result<()> {
    output.header(&format!("Configuration: {}", path.display()));

    let config = if validate {
        match AppConfig::load(path) {
            Ok(config) => {
                output.success("Configuration is valid");
                config
            }
            Err(e) => {
                output.error(&e.to_string());
                anyhow::bail!("invalid configuration");
            }
        }
    } else {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        AppConfig::from_toml(&content)?
    };

    output.kv("bind", &config.bind_address());
    output.kv("log", &format!("{} ({})", config.server.log_level, config.server.log_format));
    output.kv("secret env", &config.auth.jwt_secret_env);
    output.kv("token expiry", &format!("{}h", config.auth.jwt_expiry_hours));
    output.kv("database", &config.database.url);
    output.kv(
        "page size",
        &format!(
            "{} (max {})",
            config.pagination.default_limit, config.pagination.max_limit
        ),
    );

    Ok(())
}

fn init_tracing(config: &AppConfig, verbose: bool) {
    let default_filter = if verbose {
        "debug".to_string()
    } else {
        format!("{},tower_http=info", config.server.log_level)
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let registry = tracing_subscriber::registry().with(filter);
    if config.server.log_format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn serve(config_path: &Path, verbose: bool) -> anyhow::Result<()> {
    let config = AppConfig::load(config_path)
        .with_context(|| format!("failed to load {}", config_path.display()))?;

    init_tracing(&config, verbose);

    let secret = config.jwt_secret()?;
    let tokens = TokenService::new(&secret, config.token_ttl()?)?;

    let db = config
        .database_provider()?
        .create_client()
        .await
        .context("failed to open database")?;
    tracing::info!(database = %config.database.url, "database ready");

    let auth_service = Arc::new(AuthService::new(
        db.clone(),
        Arc::new(Argon2Hasher::new()),
        tokens,
    )?);

    let addr = config.bind_address();
    let state = AppState {
        config: Arc::new(config),
        db,
        auth_service,
    };
    let app = clientbook::api::app(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    tracing::info!("clientbook listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("shutting down");
}
