/// 가격 제안 생성
pub const INSERT_OFFER: &str = r#"
    INSERT INTO offers (listing_id, buyer_id, seller_id, proposer_id, amount, message,
                        parent_offer_id, expires_at)
    VALUES ($1, $2, $3, $4, $5, $6, $7, COALESCE($8, now() + interval '48 hours'))
    RETURNING *
"#;

/// 가격 제안 조회 (행 잠금)
pub const GET_OFFER_FOR_UPDATE: &str = "SELECT * FROM offers WHERE id = $1 FOR UPDATE";

/// 동일 (구매자, 판매글)의 대기 중 제안 존재 여부
pub const PENDING_OFFER_EXISTS: &str = r#"
    SELECT EXISTS(
        SELECT 1 FROM offers
        WHERE listing_id = $1 AND buyer_id = $2 AND status = 'PENDING'
    )
"#;

/// 제안 상태 변경
pub const SET_OFFER_STATUS: &str = "UPDATE offers SET status = $2 WHERE id = $1 RETURNING *";

/// 내 제안 목록 조회 (구매자 또는 판매자로 참여한 제안, 최신순)
pub const GET_USER_OFFERS: &str = r#"
    SELECT * FROM offers
    WHERE buyer_id = $1 OR seller_id = $1
    ORDER BY created_at DESC
"#;

/// 판매글의 제안 목록 조회 (최신순)
pub const GET_LISTING_OFFERS: &str = r#"
    SELECT * FROM offers
    WHERE listing_id = $1
    ORDER BY created_at DESC
"#;
