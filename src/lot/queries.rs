/// 전체 로트 조회(id 오름차순)
pub const LIST_LOTS: &str = "SELECT id, name, description, start_price, current_price, owner_id, created_at, auction_end_date FROM lots ORDER BY id";

/// 로트 조회
pub const GET_LOT: &str = "SELECT id, name, description, start_price, current_price, owner_id, created_at, auction_end_date FROM lots WHERE id = $1";

/// 로트 생성
/// current_price는 첫 입찰이 수락될 때까지 NULL,
/// auction_end_date가 없으면 7일 후로 기본값을 채운다.
pub const INSERT_LOT: &str = r#"
    INSERT INTO lots (name, description, start_price, owner_id, auction_end_date)
    VALUES ($1, $2, $3, $4, COALESCE($5, CURRENT_TIMESTAMP + INTERVAL '7 days'))
    RETURNING id, name, description, start_price, current_price, owner_id, created_at, auction_end_date
"#;

/// 로트 삭제
pub const DELETE_LOT: &str = "DELETE FROM lots WHERE id = $1";

/// 입찰 대상 로트 행 잠금(배타적 행 잠금, 트랜잭션 종료까지 유지)
/// 경매 마감 판정은 데이터베이스 시계를 기준으로 한다.
pub const LOCK_LOT_FOR_BID: &str = r#"
    SELECT start_price, current_price, auction_end_date > CURRENT_TIMESTAMP AS auction_open
    FROM lots
    WHERE id = $1
    FOR UPDATE
"#;

/// 수락된 입찰 금액 반영
pub const APPLY_BID: &str = r#"
    UPDATE lots
    SET current_price = $2
    WHERE id = $1
    RETURNING id, name, description, start_price, current_price, owner_id, created_at, auction_end_date
"#;
