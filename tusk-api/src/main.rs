use anyhow::Context;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tusk_api::{app, headers::AlertHeaders, middleware::Metrics, pagination::PaginationSettings, AppState, AuthConfig};
use tusk_core::CrudService;
use tusk_shared::{Deal, Passenger};
use tusk_store::{app_config::Config, DbClient, MemoryCrudService, PgCrudService};

type Services = (Arc<dyn CrudService<Deal>>, Arc<dyn CrudService<Passenger>>);

async fn services(config: &Config) -> anyhow::Result<Services> {
    match &config.database.url {
        Some(url) => {
            let db = DbClient::new(url, config.database.max_connections)
                .await
                .context("Failed to connect to Postgres")?;
            db.migrate().await.context("Failed to run migrations")?;
            tracing::info!("Using Postgres store");
            let deals: Arc<dyn CrudService<Deal>> = Arc::new(PgCrudService::<Deal>::new(db.pool.clone()));
            let passengers: Arc<dyn CrudService<Passenger>> = Arc::new(PgCrudService::<Passenger>::new(db.pool));
            Ok((deals, passengers))
        }
        None => {
            tracing::warn!("No database.url configured, using the in-memory store");
            let deals: Arc<dyn CrudService<Deal>> = Arc::new(MemoryCrudService::<Deal>::new());
            let passengers: Arc<dyn CrudService<Passenger>> = Arc::new(MemoryCrudService::<Passenger>::new());
            Ok((deals, passengers))
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tusk_api=debug,tusk_store=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().context("Failed to load config")?;
    tracing::info!("Starting Tusk API on port {}", config.server.port);

    let (deals, passengers) = services(&config).await?;

    let app_state = AppState {
        deals,
        passengers,
        alerts: AlertHeaders::new(&config.alerts.application_name, config.alerts.translate)
            .context("alerts.application_name is not a valid header token")?,
        pagination: PaginationSettings {
            default_size: config.pagination.default_size,
            max_size: config.pagination.max_size,
        },
        auth: AuthConfig {
            enabled: config.auth.enabled,
            secret: config.auth.jwt_secret.clone(),
        },
        metrics: Arc::new(Metrics::new()?),
    };

    if !app_state.auth.enabled {
        tracing::warn!("Authentication is disabled, /api is open to anonymous clients");
    }

    let app = app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
