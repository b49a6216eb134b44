/// 판매글 등록
pub const INSERT_LISTING: &str = r#"
    INSERT INTO listings (seller_id, title, description, category, condition, images,
                          listing_type, status, price, current_price, buy_now_price,
                          quantity, shipping_policy, return_policy, end_date)
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9, $10, $11, $12, $13, $14)
    RETURNING *
"#;

/// 판매글 조회
pub const GET_LISTING: &str = "SELECT * FROM listings WHERE id = $1";

/// 판매글 조회 (행 잠금)
pub const GET_LISTING_FOR_UPDATE: &str = "SELECT * FROM listings WHERE id = $1 FOR UPDATE";

/// 판매글 목록 조회 (최신순, 선택적 필터)
pub const GET_LISTINGS: &str = r#"
    SELECT * FROM listings
    WHERE status = $1
      AND ($2::text IS NULL OR category = $2)
      AND ($3::bigint IS NULL OR seller_id = $3)
    ORDER BY created_at DESC
"#;

/// 판매글 수정 (소유자 및 수정 가능 상태에서만)
pub const UPDATE_LISTING: &str = r#"
    UPDATE listings
    SET title = COALESCE($3, title),
        description = COALESCE($4, description),
        category = COALESCE($5, category),
        condition = COALESCE($6, condition),
        images = COALESCE($7, images),
        shipping_policy = COALESCE($8, shipping_policy),
        return_policy = COALESCE($9, return_policy),
        status = COALESCE($10, status)
    WHERE id = $1 AND seller_id = $2 AND status IN ('DRAFT', 'ACTIVE')
    RETURNING *
"#;

/// 판매글 취소 (소유자만, 판매 전 상태에서만)
pub const CANCEL_LISTING: &str = r#"
    UPDATE listings SET status = 'CANCELLED'
    WHERE id = $1 AND seller_id = $2 AND status IN ('DRAFT', 'ACTIVE')
    RETURNING *
"#;

/// 즉시 구매 반영 (수량 소진 시 SOLD 전환)
pub const EXECUTE_BUY_NOW: &str = r#"
    UPDATE listings
    SET quantity_sold = quantity_sold + 1,
        status = CASE WHEN quantity_sold + 1 >= quantity THEN 'SOLD' ELSE status END
    WHERE id = $1
    RETURNING *
"#;
