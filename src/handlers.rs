// region:    --- Imports
use crate::bidding::commands::{self, PlaceBidCommand};
use crate::error::ServiceError;
use crate::lot::model::{CreateLotCommand, Lot, UpdateLotCommand};
use crate::lot::store::{LotStore, PostgresLotStore};
use crate::payment::PaymentGate;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;
use std::sync::Arc;
use tracing::info;

// endregion: --- Imports

/// 라우터 공유 상태: 로트 저장소와 결제 게이트
pub type AppState = (Arc<PostgresLotStore>, Arc<PaymentGate>);

// region:    --- Query Handlers

/// 헬스 체크
pub async fn handle_health() -> impl IntoResponse {
    Json(json!({"status": "ok"}))
}

/// 전체 로트 조회
pub async fn handle_get_lots(
    State((store, _)): State<AppState>,
) -> Result<Json<Vec<Lot>>, ServiceError> {
    info!("{:<12} --> 전체 로트 조회", "HandlerQuery");
    Ok(Json(store.list().await?))
}

/// 로트 조회
pub async fn handle_get_lot(
    State((store, _)): State<AppState>,
    Path(lot_id): Path<i32>,
) -> Result<Json<Lot>, ServiceError> {
    info!("{:<12} --> 로트 조회 id: {}", "HandlerQuery", lot_id);
    store
        .get(lot_id)
        .await?
        .map(Json)
        .ok_or(ServiceError::LotNotFound)
}

// endregion: --- Query Handlers

// region:    --- Command Handlers

/// 로트 생성 요청 처리
pub async fn handle_create_lot(
    State((store, gate)): State<AppState>,
    headers: HeaderMap,
    Json(cmd): Json<CreateLotCommand>,
) -> Result<(StatusCode, Json<Lot>), ServiceError> {
    info!("{:<12} --> 로트 생성 요청 처리: {:?}", "Command", cmd);
    gate.authorize(&headers, "CreateLot").await?;

    let new_lot = cmd.validate()?;
    let lot = store.create(new_lot).await?;
    Ok((StatusCode::CREATED, Json(lot)))
}

/// 로트 수정 요청 처리(전달된 필드만 변경)
pub async fn handle_update_lot(
    State((store, gate)): State<AppState>,
    Path(lot_id): Path<i32>,
    headers: HeaderMap,
    Json(cmd): Json<UpdateLotCommand>,
) -> Result<Json<Lot>, ServiceError> {
    info!("{:<12} --> 로트 수정 요청 처리 id: {}", "Command", lot_id);
    gate.authorize(&headers, "UpdateLot").await?;

    let changes = cmd.validate()?;
    store
        .update(lot_id, changes)
        .await?
        .map(Json)
        .ok_or(ServiceError::LotNotFound)
}

/// 로트 삭제 요청 처리
pub async fn handle_delete_lot(
    State((store, gate)): State<AppState>,
    Path(lot_id): Path<i32>,
    headers: HeaderMap,
) -> Result<StatusCode, ServiceError> {
    info!("{:<12} --> 로트 삭제 요청 처리 id: {}", "Command", lot_id);
    gate.authorize(&headers, "DeleteLot").await?;

    if store.delete(lot_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ServiceError::LotNotFound)
    }
}

/// 입찰 요청 처리
pub async fn handle_bid(
    State((store, gate)): State<AppState>,
    Path(lot_id): Path<i32>,
    headers: HeaderMap,
    Json(cmd): Json<PlaceBidCommand>,
) -> Result<Json<Lot>, ServiceError> {
    info!("{:<12} --> 입찰 요청 처리: lot_id={}", "Command", lot_id);
    gate.authorize(&headers, "PlaceBid").await?;

    let lot = commands::handle_place_bid(lot_id, cmd, store.as_ref()).await?;
    Ok(Json(lot))
}

// endregion: --- Command Handlers
