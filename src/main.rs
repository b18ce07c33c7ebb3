// region:    --- Imports
use crate::config::Config;
use crate::database::DatabaseManager;
use crate::lot::store::PostgresLotStore;
use crate::payment::PaymentGate;
use crate::registry::RegistryClient;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};
// endregion: --- Imports

// region:    --- Modules
mod bidding;
mod config;
mod database;
mod error;
mod handlers;
mod lot;
mod payment;
mod registry;

// endregion: --- Modules

// region:    --- Main
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // logging 초기화
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .without_time()
        .with_target(false)
        .init();

    // 설정 로드(필수 환경 변수가 없으면 기동 실패)
    let config = Config::from_env()?;
    info!(
        "{:<12} --> 설정 로드 완료, 포트: {}",
        "Main", config.service_port
    );

    // DatabaseManager 생성
    let db_manager = Arc::new(DatabaseManager::new(&config).await?);

    // 데이터베이스 초기화
    if let Err(e) = db_manager.initialize_database().await {
        error!("{:<12} --> 데이터베이스 초기화 실패: {:?}", "Main", e);
        return Err(e.into());
    }
    db_manager.check_connection().await?;
    info!("{:<12} --> 데이터베이스 초기화 성공", "Main");

    // 레지스트리 등록(실패해도 서비스는 계속 기동)
    let registry = RegistryClient::new(config.registry_service_url.clone())?;
    let service_address = config.service_address();
    tokio::spawn(async move {
        match registry.register(&service_address).await {
            Ok(service_id) => info!(
                "{:<12} --> 레지스트리 등록 성공: service_id={}",
                "Registry", service_id
            ),
            Err(e) => error!("{:<12} --> 레지스트리 등록 실패: {}", "Registry", e),
        }
    });

    // 저장소와 결제 게이트 생성
    let store = Arc::new(PostgresLotStore::new(Arc::clone(&db_manager)));
    let gate = Arc::new(PaymentGate::new(config.payment_service_url.clone())?);

    // 테스트 페이지를 위한 cors 설정
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // 라우터 설정
    let routes_all = Router::new()
        .route("/health", get(handlers::handle_health))
        .route(
            "/lots",
            get(handlers::handle_get_lots).post(handlers::handle_create_lot),
        )
        .route(
            "/lots/:id",
            get(handlers::handle_get_lot)
                .put(handlers::handle_update_lot)
                .delete(handlers::handle_delete_lot),
        )
        .route("/lots/:id/bid", post(handlers::handle_bid))
        .layer(cors)
        .with_state((store, gate));

    // 리스너 생성
    let listener = TcpListener::bind(("0.0.0.0", config.service_port)).await?;
    info!(
        "{:<12} --> Web Server: Listening on {}",
        "Main",
        listener.local_addr()?
    );

    // 서버 실행
    if let Err(err) = axum::serve(listener, routes_all.into_make_service()).await {
        error!("{:<12} --> Server error: {}", "Main", err);
    }
    Ok(())
}
// endregion: --- Main
