/// 입찰 기록 추가
pub const INSERT_BID: &str = r#"
    INSERT INTO bids (listing_id, bidder_id, amount)
    VALUES ($1, $2, $3)
    RETURNING id, listing_id, bidder_id, amount, created_at
"#;

/// 현재 가격 갱신 (더 높은 입찰만 반영)
pub const RAISE_CURRENT_PRICE: &str = r#"
    UPDATE listings SET current_price = $1
    WHERE id = $2 AND current_price < $1
"#;

/// 즉시 구매 가격 도달 시 낙찰 처리
pub const SETTLE_AT_BUY_NOW: &str = r#"
    UPDATE listings
    SET current_price = $1, status = 'SOLD', quantity_sold = quantity
    WHERE id = $2 AND status = 'ACTIVE'
"#;

/// 입찰 조회
pub const GET_BID: &str =
    "SELECT id, listing_id, bidder_id, amount, created_at FROM bids WHERE id = $1";

/// 입찰 삭제 (철회)
pub const DELETE_BID: &str = "DELETE FROM bids WHERE id = $1";

/// 철회 후 현재 가격 재계산 (남은 최고 입찰가, 없으면 시작 가격)
pub const RECOMPUTE_CURRENT_PRICE: &str = r#"
    UPDATE listings
    SET current_price = GREATEST(price, COALESCE((SELECT MAX(amount) FROM bids WHERE listing_id = $1), 0))
    WHERE id = $1
"#;

/// 판매글 입찰 이력 조회
pub const GET_LISTING_BIDS: &str = r#"
    SELECT id, listing_id, bidder_id, amount, created_at
    FROM bids
    WHERE listing_id = $1
    ORDER BY created_at DESC
"#;

/// 내 입찰 이력 조회
pub const GET_USER_BIDS: &str = r#"
    SELECT id, listing_id, bidder_id, amount, created_at
    FROM bids
    WHERE bidder_id = $1
    ORDER BY created_at DESC
"#;

/// 최고 입찰가 조회
pub const GET_HIGHEST_BID: &str =
    "SELECT MAX(amount) as highest_bid FROM bids WHERE listing_id = $1";
