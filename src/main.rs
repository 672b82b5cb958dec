use std::{net::SocketAddr, sync::Arc};

use axum::http::{
    header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
    HeaderValue, Method,
};
use dotenv::dotenv;
use sqlx::postgres::PgPoolOptions;
use tokio::sync::watch;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing_subscriber::filter::LevelFilter;

use iayos::{
    client::ApiClient,
    config::Config,
    db::DBClient,
    dtos::transactiondtos::{EscrowListResponse, EscrowQuery},
    mail::sendmail::SmtpMailer,
    middleware::rate_limit::registration_rate_limiter,
    models::transactionmodel::TransactionStatus,
    routes::create_router,
    service::{escrow_service::EscrowMonitor, registration_service::AgencyRegistrationService},
    utils::currency::{format_centavos_as_peso, peso_to_centavos},
    AppState,
};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_max_level(LevelFilter::DEBUG)
        .init();

    dotenv().ok();

    let config = match Config::init() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    let pool = match PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await
    {
        Ok(pool) => {
            tracing::info!("Connection to the database is successful");
            pool
        }
        Err(err) => {
            tracing::error!("Failed to connect to the database: {:?}", err);
            std::process::exit(1);
        }
    };

    let db_client = DBClient::new(pool);
    let mailer = SmtpMailer::from_config(&config);
    let registration_service = AgencyRegistrationService::new(
        Arc::new(db_client),
        Arc::new(mailer),
        config.app_url.clone(),
    );

    let mut allowed_origins = vec!["http://localhost:3000".parse::<HeaderValue>()];
    allowed_origins.push(config.app_url.parse::<HeaderValue>());
    let allowed_origins: Vec<HeaderValue> = allowed_origins.into_iter().flatten().collect();

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed_origins))
        .allow_headers([AUTHORIZATION, ACCEPT, CONTENT_TYPE])
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST]);

    let app_state = Arc::new(AppState::new(config.clone(), registration_service));
    let app = create_router(app_state, Arc::new(registration_rate_limiter())).layer(cors);

    // Escrow monitor needs an admin token for the backend.
    let _escrow_monitor = start_escrow_monitor(&config);

    let listener = match tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to bind port {}: {}", config.port, e);
            std::process::exit(1);
        }
    };

    tracing::info!("Server is running on http://localhost:{}", config.port);

    let service = app.into_make_service_with_connect_info::<SocketAddr>();
    if let Err(e) = axum::serve(listener, service).await {
        tracing::error!("Server error: {}", e);
    }
}

fn start_escrow_monitor(config: &Config) -> Option<EscrowMonitor> {
    config.backend_api_token.as_ref()?;

    let client = match ApiClient::from_config(config) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            tracing::warn!("Escrow monitor disabled: {}", e);
            return None;
        }
    };

    let query = EscrowQuery {
        status: Some(TransactionStatus::Held),
        ..Default::default()
    };
    let monitor = EscrowMonitor::spawn(client, query, config.escrow_poll_interval);
    tokio::spawn(log_escrow_snapshots(monitor.subscribe()));

    Some(monitor)
}

async fn log_escrow_snapshots(mut snapshots: watch::Receiver<Option<EscrowListResponse>>) {
    while snapshots.changed().await.is_ok() {
        let stats = match snapshots.borrow_and_update().as_ref() {
            Some(listing) => listing.stats.clone(),
            None => continue,
        };

        tracing::info!(
            "Escrow held: {} across {} pending, {} released and {} refunded today",
            format_centavos_as_peso(peso_to_centavos(stats.total_held)),
            stats.pending_count,
            stats.released_today,
            stats.refunded_today
        );
    }
}
