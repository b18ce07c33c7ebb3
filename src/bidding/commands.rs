/// 입찰 커맨드 처리
/// 수락 규칙: 기준가보다 엄격히 높고(동액 거절), 마감 전이어야 한다.
// region:    --- Imports
use crate::error::ServiceError;
use crate::lot::model::Lot;
use crate::lot::store::LotStore;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;
// endregion: --- Imports

// region:    --- Commands

/// 입찰 명령
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PlaceBidCommand {
    pub bid_amount: Option<Decimal>,
}

/// 입찰 수락 판정
/// 검사 순서는 금액, 마감 순이다. 거절은 확정된 업무 결과이며 재시도하지 않는다.
pub fn decide(baseline: Decimal, amount: Decimal, auction_open: bool) -> Result<(), ServiceError> {
    if amount <= baseline {
        return Err(ServiceError::BidTooLow);
    }
    if !auction_open {
        return Err(ServiceError::AuctionEnded);
    }
    Ok(())
}

/// 입찰 요청 처리
pub async fn handle_place_bid(
    lot_id: i32,
    cmd: PlaceBidCommand,
    store: &impl LotStore,
) -> Result<Lot, ServiceError> {
    info!("{:<12} --> 입찰 요청 처리 시작: lot_id={}", "Command", lot_id);

    let amount = cmd.bid_amount.ok_or_else(|| {
        ServiceError::Validation("필수 필드가 누락되었습니다: bid_amount".to_string())
    })?;

    match store.place_bid(lot_id, amount).await {
        Ok(lot) => {
            info!(
                "{:<12} --> 입찰 수락: lot_id={}, 현재 가격: {:?}",
                "Command", lot_id, lot.current_price
            );
            Ok(lot)
        }
        Err(
            rejection @ (ServiceError::LotNotFound
            | ServiceError::BidTooLow
            | ServiceError::AuctionEnded),
        ) => {
            info!(
                "{:<12} --> 입찰 거절: lot_id={}, 사유: {}",
                "Command",
                lot_id,
                rejection.code()
            );
            Err(rejection)
        }
        Err(other) => Err(other),
    }
}

// endregion: --- Commands

// region:    --- Tests


// endregion: --- Tests
