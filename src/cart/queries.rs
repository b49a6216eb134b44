/// 판매글의 판매자 조회 (본인 판매글 담기 차단용)
pub const GET_LISTING_SELLER: &str = "SELECT seller_id FROM listings WHERE id = $1";

/// 장바구니 추가 (중복은 UNIQUE 제약으로 차단)
pub const INSERT_CART_ITEM: &str = r#"
    INSERT INTO cart_items (user_id, listing_id)
    VALUES ($1, $2)
    RETURNING id, user_id, listing_id, created_at
"#;

/// 장바구니 제거
pub const DELETE_CART_ITEM: &str =
    "DELETE FROM cart_items WHERE user_id = $1 AND listing_id = $2";

/// 장바구니의 판매글 목록 조회
pub const GET_CART_LISTINGS: &str = r#"
    SELECT l.* FROM listings l
    JOIN cart_items c ON c.listing_id = l.id
    WHERE c.user_id = $1
    ORDER BY c.created_at DESC
"#;

/// 찜 추가 (중복은 UNIQUE 제약으로 차단)
pub const INSERT_WATCHLIST_ITEM: &str = r#"
    INSERT INTO watchlist_items (user_id, listing_id)
    VALUES ($1, $2)
    RETURNING id, user_id, listing_id, created_at
"#;

/// 찜 제거
pub const DELETE_WATCHLIST_ITEM: &str =
    "DELETE FROM watchlist_items WHERE user_id = $1 AND listing_id = $2";

/// 찜한 판매글 목록 조회
pub const GET_WATCHLIST_LISTINGS: &str = r#"
    SELECT l.* FROM listings l
    JOIN watchlist_items w ON w.listing_id = l.id
    WHERE w.user_id = $1
    ORDER BY w.created_at DESC
"#;
