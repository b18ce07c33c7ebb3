/// 메모리 로트 저장소
/// 인프라 없이 저장소 계약과 입찰 프로토콜을 검증하기 위한 구현체.
/// 저장소 뮤텍스를 읽기-검증-쓰기 전체에 걸쳐 잡아 로트별 직렬화를 보장한다.
// region:    --- Imports
use crate::bidding::commands;
use crate::error::ServiceError;
use crate::lot::model::{Lot, LotChanges, NewLot};
use crate::lot::store::LotStore;
use async_trait::async_trait;
use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use tokio::sync::Mutex;
// endregion: --- Imports

// region:    --- In-Memory Lot Store

#[derive(Debug, Default)]
struct InMemoryState {
    next_id: i32,
    lots: BTreeMap<i32, Lot>,
}

#[derive(Debug, Default)]
pub struct InMemoryLotStore {
    state: Mutex<InMemoryState>,
}

impl InMemoryLotStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LotStore for InMemoryLotStore {
    async fn list(&self) -> Result<Vec<Lot>, ServiceError> {
        let state = self.state.lock().await;
        // BTreeMap 순회는 id 오름차순
        Ok(state.lots.values().cloned().collect())
    }

    async fn get(&self, lot_id: i32) -> Result<Option<Lot>, ServiceError> {
        let state = self.state.lock().await;
        Ok(state.lots.get(&lot_id).cloned())
    }

    async fn create(&self, new_lot: NewLot) -> Result<Lot, ServiceError> {
        let mut state = self.state.lock().await;
        state.next_id += 1;
        let now = Utc::now();
        let lot = Lot {
            id: state.next_id,
            name: new_lot.name,
            description: new_lot.description,
            start_price: new_lot.start_price,
            current_price: None,
            owner_id: new_lot.owner_id,
            created_at: now,
            auction_end_date: new_lot.auction_end_date.unwrap_or(now + Duration::days(7)),
        };
        state.lots.insert(lot.id, lot.clone());
        Ok(lot)
    }

    async fn update(&self, lot_id: i32, changes: LotChanges) -> Result<Option<Lot>, ServiceError> {
        let mut state = self.state.lock().await;
        let Some(lot) = state.lots.get_mut(&lot_id) else {
            return Ok(None);
        };
        if let Some(name) = changes.name {
            lot.name = name;
        }
        if let Some(description) = changes.description {
            lot.description = description;
        }
        if let Some(owner_id) = changes.owner_id {
            lot.owner_id = owner_id;
        }
        Ok(Some(lot.clone()))
    }

    async fn delete(&self, lot_id: i32) -> Result<bool, ServiceError> {
        let mut state = self.state.lock().await;
        Ok(state.lots.remove(&lot_id).is_some())
    }

    async fn place_bid(&self, lot_id: i32, amount: Decimal) -> Result<Lot, ServiceError> {
        // 잠금 아래에서 읽기-검증-쓰기 수행(행 잠금과 동일한 효과)
        let mut state = self.state.lock().await;
        let Some(lot) = state.lots.get_mut(&lot_id) else {
            return Err(ServiceError::LotNotFound);
        };

        let baseline = lot.current_price.unwrap_or(lot.start_price);
        let auction_open = Utc::now() < lot.auction_end_date;
        commands::decide(baseline, amount, auction_open)?;

        lot.current_price = Some(amount);
        Ok(lot.clone())
    }
}

// endregion: --- In-Memory Lot Store
