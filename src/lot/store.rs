// region:    --- Imports
use crate::bidding::commands;
use crate::database::DatabaseManager;
use crate::error::ServiceError;
use crate::lot::model::{Lot, LotChanges, NewLot};
use crate::lot::queries;
use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::Row;
use std::sync::Arc;
use tracing::info;
// endregion: --- Imports

// region:    --- Lot Store Trait

/// 로트 저장소 트레이트
/// 모든 연산은 단일 트랜잭션으로 실행되며 두 로트에 걸치지 않는다.
#[async_trait]
pub trait LotStore: Send + Sync {
    /// 전체 로트 조회(id 오름차순)
    async fn list(&self) -> Result<Vec<Lot>, ServiceError>;

    /// 로트 조회
    async fn get(&self, lot_id: i32) -> Result<Option<Lot>, ServiceError>;

    /// 로트 생성(current_price는 NULL로 시작)
    async fn create(&self, new_lot: NewLot) -> Result<Lot, ServiceError>;

    /// 로트 부분 수정(전달된 필드만 변경, 빈 변경은 조회로 동작)
    async fn update(&self, lot_id: i32, changes: LotChanges) -> Result<Option<Lot>, ServiceError>;

    /// 로트 삭제(행이 있었으면 true)
    async fn delete(&self, lot_id: i32) -> Result<bool, ServiceError>;

    /// 입찰 수락 판정 및 가격 반영
    /// 행 잠금 아래에서 읽기-검증-쓰기를 하나의 직렬화 단위로 수행한다.
    async fn place_bid(&self, lot_id: i32, amount: Decimal) -> Result<Lot, ServiceError>;
}

// endregion: --- Lot Store Trait

// region:    --- Postgres Lot Store

/// 로트 저장소 구현체
pub struct PostgresLotStore {
    db: Arc<DatabaseManager>,
}

impl PostgresLotStore {
    pub fn new(db: Arc<DatabaseManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl LotStore for PostgresLotStore {
    async fn list(&self) -> Result<Vec<Lot>, ServiceError> {
        info!("{:<12} --> 전체 로트 조회", "Store");
        self.db
            .transaction(|tx| {
                Box::pin(async move {
                    let lots = sqlx::query_as::<_, Lot>(queries::LIST_LOTS)
                        .fetch_all(&mut **tx)
                        .await?;
                    Ok(lots)
                })
            })
            .await
    }

    async fn get(&self, lot_id: i32) -> Result<Option<Lot>, ServiceError> {
        info!("{:<12} --> 로트 조회 id: {}", "Store", lot_id);
        self.db
            .transaction(|tx| {
                Box::pin(async move {
                    let lot = sqlx::query_as::<_, Lot>(queries::GET_LOT)
                        .bind(lot_id)
                        .fetch_optional(&mut **tx)
                        .await?;
                    Ok(lot)
                })
            })
            .await
    }

    async fn create(&self, new_lot: NewLot) -> Result<Lot, ServiceError> {
        info!("{:<12} --> 로트 생성: {}", "Store", new_lot.name);
        self.db
            .transaction(|tx| {
                Box::pin(async move {
                    let lot = sqlx::query_as::<_, Lot>(queries::INSERT_LOT)
                        .bind(new_lot.name)
                        .bind(new_lot.description)
                        .bind(new_lot.start_price)
                        .bind(new_lot.owner_id)
                        .bind(new_lot.auction_end_date)
                        .fetch_one(&mut **tx)
                        .await?;
                    Ok(lot)
                })
            })
            .await
    }

    async fn update(&self, lot_id: i32, changes: LotChanges) -> Result<Option<Lot>, ServiceError> {
        info!("{:<12} --> 로트 수정 id: {}", "Store", lot_id);

        // 변경할 필드가 없으면 현재 로트를 그대로 돌려준다
        if changes.is_empty() {
            return self.get(lot_id).await;
        }

        self.db
            .transaction(|tx| {
                Box::pin(async move {
                    // 전달된 필드만 SET 절에 포함한다.
                    // 가격 필드와 id는 여기서 절대 등장하지 않는다.
                    let mut builder: sqlx::QueryBuilder<sqlx::Postgres> =
                        sqlx::QueryBuilder::new("UPDATE lots SET ");
                    {
                        let mut fields = builder.separated(", ");
                        if let Some(name) = changes.name {
                            fields.push("name = ");
                            fields.push_bind_unseparated(name);
                        }
                        if let Some(description) = changes.description {
                            fields.push("description = ");
                            fields.push_bind_unseparated(description);
                        }
                        if let Some(owner_id) = changes.owner_id {
                            fields.push("owner_id = ");
                            fields.push_bind_unseparated(owner_id);
                        }
                    }
                    builder.push(" WHERE id = ");
                    builder.push_bind(lot_id);
                    builder.push(
                        " RETURNING id, name, description, start_price, current_price, owner_id, created_at, auction_end_date",
                    );

                    let lot = builder
                        .build_query_as::<Lot>()
                        .fetch_optional(&mut **tx)
                        .await?;
                    Ok(lot)
                })
            })
            .await
    }

    async fn delete(&self, lot_id: i32) -> Result<bool, ServiceError> {
        info!("{:<12} --> 로트 삭제 id: {}", "Store", lot_id);
        self.db
            .transaction(|tx| {
                Box::pin(async move {
                    let result = sqlx::query(queries::DELETE_LOT)
                        .bind(lot_id)
                        .execute(&mut **tx)
                        .await?;
                    Ok(result.rows_affected() > 0)
                })
            })
            .await
    }

    async fn place_bid(&self, lot_id: i32, amount: Decimal) -> Result<Lot, ServiceError> {
        self.db
            .transaction(|tx| {
                Box::pin(async move {
                    // 행 잠금: 동시 입찰이 같은 기준가를 읽지 못하게 한다
                    let locked = sqlx::query(queries::LOCK_LOT_FOR_BID)
                        .bind(lot_id)
                        .fetch_optional(&mut **tx)
                        .await?;
                    let Some(row) = locked else {
                        return Err(ServiceError::LotNotFound);
                    };

                    let start_price: Decimal = row.try_get("start_price")?;
                    let current_price: Option<Decimal> = row.try_get("current_price")?;
                    let auction_open: bool = row.try_get("auction_open")?;

                    // 기준가: 현재 최고가, 첫 입찰 전에는 시작가
                    let baseline = current_price.unwrap_or(start_price);
                    commands::decide(baseline, amount, auction_open)?;

                    let lot = sqlx::query_as::<_, Lot>(queries::APPLY_BID)
                        .bind(lot_id)
                        .bind(amount)
                        .fetch_one(&mut **tx)
                        .await?;
                    Ok(lot)
                })
            })
            .await
    }
}

// endregion: --- Postgres Lot Store
