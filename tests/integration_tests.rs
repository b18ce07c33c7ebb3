use auction_lot_service::bidding::commands::{handle_place_bid, PlaceBidCommand};
use auction_lot_service::error::ServiceError;
use auction_lot_service::lot::in_memory::InMemoryLotStore;
use auction_lot_service::lot::model::{LotChanges, NewLot};
use auction_lot_service::lot::store::LotStore;
use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::info;

/// 트레이싱 초기화
fn init_tracing() {
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .without_time()
        .with_target(false)
        .with_test_writer()
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

fn dec(value: i64) -> Decimal {
    Decimal::from(value)
}

/// 테스트용 로트 생성 파라미터
fn test_lot(name: &str, start_price: i64, ends_in: Duration) -> NewLot {
    NewLot {
        name: name.to_string(),
        description: Some("테스트를 위한 로트입니다.".to_string()),
        start_price: dec(start_price),
        owner_id: Some("seller-1".to_string()),
        auction_end_date: Some(Utc::now() + ends_in),
    }
}

/// 명령 입찰 생성
fn bid(amount: i64) -> PlaceBidCommand {
    PlaceBidCommand {
        bid_amount: Some(dec(amount)),
    }
}

/// 입찰 시나리오 테스트
/// 생성 직후 current_price는 없고, 수락된 입찰만 가격을 올린다.
#[tokio::test]
async fn test_bid_scenario() {
    let store = InMemoryLotStore::new();

    let lot = store
        .create(test_lot("화병", 100, Duration::hours(1)))
        .await
        .unwrap();
    assert_eq!(lot.current_price, None);

    // 시작가보다 높은 첫 입찰은 수락된다
    let updated = handle_place_bid(lot.id, bid(150), &store).await.unwrap();
    assert_eq!(updated.current_price, Some(dec(150)));

    // 동액 재입찰은 거절된다
    let err = handle_place_bid(lot.id, bid(150), &store).await.unwrap_err();
    assert!(matches!(err, ServiceError::BidTooLow));

    // 현재 가격 미만 입찰은 거절된다
    let err = handle_place_bid(lot.id, bid(140), &store).await.unwrap_err();
    assert!(matches!(err, ServiceError::BidTooLow));

    // 가격은 그대로다
    let lot = store.get(lot.id).await.unwrap().unwrap();
    assert_eq!(lot.current_price, Some(dec(150)));
}

/// 시작가 동액 입찰 거절 테스트
#[tokio::test]
async fn test_bid_equal_to_start_price_rejected() {
    let store = InMemoryLotStore::new();
    let lot = store
        .create(test_lot("백자", 100, Duration::hours(1)))
        .await
        .unwrap();

    let err = handle_place_bid(lot.id, bid(100), &store).await.unwrap_err();
    assert!(matches!(err, ServiceError::BidTooLow));
}

/// 경매 마감 테스트
/// 마감 후에는 유효한 금액이라도 거절되고, 금액 검사가 먼저 적용된다.
#[tokio::test]
async fn test_bid_after_auction_end() {
    let store = InMemoryLotStore::new();
    let lot = store
        .create(test_lot("마감된 로트", 100, Duration::seconds(-1)))
        .await
        .unwrap();

    // 금액이 충분해도 마감된 경매는 거절
    let err = handle_place_bid(lot.id, bid(200), &store).await.unwrap_err();
    assert!(matches!(err, ServiceError::AuctionEnded));

    // 금액 검사가 마감 검사보다 먼저다
    let err = handle_place_bid(lot.id, bid(50), &store).await.unwrap_err();
    assert!(matches!(err, ServiceError::BidTooLow));
}

/// 없는 로트 입찰 테스트
#[tokio::test]
async fn test_bid_on_missing_lot() {
    let store = InMemoryLotStore::new();
    let err = handle_place_bid(999, bid(100), &store).await.unwrap_err();
    assert!(matches!(err, ServiceError::LotNotFound));
}

/// bid_amount 누락 테스트
#[tokio::test]
async fn test_bid_without_amount() {
    let store = InMemoryLotStore::new();
    let lot = store
        .create(test_lot("화병", 100, Duration::hours(1)))
        .await
        .unwrap();

    let cmd = PlaceBidCommand { bid_amount: None };
    let err = handle_place_bid(lot.id, cmd, &store).await.unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));
}

/// 동시성 입찰 테스트
/// 서로 다른 금액의 동시 입찰 50건에 대해 수락 금액 수열이 항상 단조 증가해야 한다.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_bidding() {
    init_tracing();

    let store = Arc::new(InMemoryLotStore::new());
    let lot = store
        .create(test_lot("동시성 입찰 테스트 로트", 100, Duration::hours(1)))
        .await
        .unwrap();

    // 50개의 동시 입찰 생성
    let mut handles = vec![];
    for i in 1..=50i64 {
        let store = Arc::clone(&store);
        let amount = dec(100 + i * 10);
        let lot_id = lot.id;

        let handle = tokio::spawn(async move {
            let cmd = PlaceBidCommand {
                bid_amount: Some(amount),
            };
            (amount, handle_place_bid(lot_id, cmd, store.as_ref()).await)
        });
        handles.push(handle);
    }

    // 모든 입찰 처리 대기 및 결과 확인
    let mut accepted = vec![];
    let mut rejected = 0;
    for handle in handles {
        let (amount, result) = handle.await.unwrap();
        match result {
            Ok(updated) => {
                // 수락 응답의 현재 가격은 해당 입찰 금액이다
                assert_eq!(updated.current_price, Some(amount));
                accepted.push(amount);
            }
            Err(err) => {
                // 거절 사유는 항상 BidTooLow여야 한다
                assert!(matches!(err, ServiceError::BidTooLow));
                rejected += 1;
            }
        }
    }

    info!(
        "성공한 입찰 수: {}, 실패한 입찰 수: {}",
        accepted.len(),
        rejected
    );

    assert_eq!(accepted.len() + rejected, 50);
    assert!(!accepted.is_empty());
    // 전체 최고 금액은 어떤 직렬화 순서에서도 수락된다
    assert!(accepted.contains(&dec(600)));

    // 최종 가격은 수락된 금액의 최대값이다
    let final_lot = store.get(lot.id).await.unwrap().unwrap();
    assert_eq!(final_lot.current_price, Some(dec(600)));
}

/// 부분 수정 테스트
/// 빈 요청은 조회로 동작하고, 명시적 null은 해당 필드만 비운다.
#[tokio::test]
async fn test_partial_update() {
    let store = InMemoryLotStore::new();
    let lot = store
        .create(test_lot("고려청자", 100, Duration::hours(1)))
        .await
        .unwrap();

    // 빈 변경은 아무것도 바꾸지 않는다
    let unchanged = store
        .update(lot.id, LotChanges::default())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(unchanged.name, lot.name);
    assert_eq!(unchanged.description, lot.description);
    assert_eq!(unchanged.owner_id, lot.owner_id);

    // description만 비우고 나머지는 그대로 둔다
    let changes = LotChanges {
        description: Some(None),
        ..Default::default()
    };
    let updated = store.update(lot.id, changes).await.unwrap().unwrap();
    assert_eq!(updated.description, None);
    assert_eq!(updated.name, lot.name);
    assert_eq!(updated.owner_id, lot.owner_id);

    // name만 변경
    let changes = LotChanges {
        name: Some("조선백자".to_string()),
        ..Default::default()
    };
    let updated = store.update(lot.id, changes).await.unwrap().unwrap();
    assert_eq!(updated.name, "조선백자");
    assert_eq!(updated.owner_id, lot.owner_id);
}

/// 수정 경로가 가격을 건드리지 않는지 테스트
#[tokio::test]
async fn test_update_never_touches_price() {
    let store = InMemoryLotStore::new();
    let lot = store
        .create(test_lot("화병", 100, Duration::hours(1)))
        .await
        .unwrap();

    handle_place_bid(lot.id, bid(150), &store).await.unwrap();

    let changes = LotChanges {
        name: Some("이름 변경".to_string()),
        owner_id: Some(Some("seller-2".to_string())),
        ..Default::default()
    };
    let updated = store.update(lot.id, changes).await.unwrap().unwrap();
    assert_eq!(updated.current_price, Some(dec(150)));
    assert_eq!(updated.start_price, dec(100));
}

/// 없는 로트 수정 테스트
#[tokio::test]
async fn test_update_missing_lot() {
    let store = InMemoryLotStore::new();
    let changes = LotChanges {
        name: Some("아무거나".to_string()),
        ..Default::default()
    };
    assert!(store.update(999, changes).await.unwrap().is_none());
}

/// 삭제 테스트
/// 삭제는 무조건적이며, 없는 로트 삭제는 false를 돌려준다.
#[tokio::test]
async fn test_delete() {
    let store = InMemoryLotStore::new();
    let lot = store
        .create(test_lot("삭제 대상", 100, Duration::hours(1)))
        .await
        .unwrap();

    assert!(store.delete(lot.id).await.unwrap());
    assert!(store.get(lot.id).await.unwrap().is_none());

    // 이미 삭제된 로트
    assert!(!store.delete(lot.id).await.unwrap());
    // 존재한 적 없는 로트
    assert!(!store.delete(999).await.unwrap());
}

/// 마감일 기본값 테스트
/// auction_end_date가 없으면 7일 후로 채워진다.
#[tokio::test]
async fn test_default_auction_end_date() {
    let store = InMemoryLotStore::new();
    let mut new_lot = test_lot("기본 마감일", 100, Duration::hours(1));
    new_lot.auction_end_date = None;

    let lot = store.create(new_lot).await.unwrap();
    assert!(lot.auction_end_date > Utc::now() + Duration::days(6));
    assert!(lot.auction_end_date <= Utc::now() + Duration::days(7));
}

/// 전체 조회 정렬 테스트
/// 목록은 id 오름차순이며 빈 저장소는 빈 목록을 돌려준다.
#[tokio::test]
async fn test_list_ordered_by_id() {
    let store = InMemoryLotStore::new();
    assert!(store.list().await.unwrap().is_empty());

    for name in ["첫째", "둘째", "셋째"] {
        store
            .create(test_lot(name, 100, Duration::hours(1)))
            .await
            .unwrap();
    }

    let lots = store.list().await.unwrap();
    let ids: Vec<i32> = lots.iter().map(|lot| lot.id).collect();
    let mut sorted = ids.clone();
    sorted.sort_unstable();
    assert_eq!(ids, sorted);
    assert_eq!(lots.len(), 3);
}
