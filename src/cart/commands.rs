//! 장바구니 / 찜 목록 커맨드 처리
//! (user, listing) 쌍의 유일성은 저장 계층의 UNIQUE 제약이 보장한다.
//! 추가 전에 중복을 검사하지 않고, 제약 위반을 그대로 409 로 노출한다.

// region:    --- Imports
use crate::cart::model::SavedItem;
use crate::cart::queries;
use crate::database::{db_error, is_foreign_key_violation, is_unique_violation, DatabaseManager};
use crate::listing::model::Listing;
use tracing::info;

// endregion: --- Imports

// region:    --- Commands

/// 저장 대상 (장바구니 / 찜)
#[derive(Debug, Clone, Copy)]
pub enum SavedItemKind {
    Cart,
    Watchlist,
}

impl SavedItemKind {
    fn insert_query(self) -> &'static str {
        match self {
            SavedItemKind::Cart => queries::INSERT_CART_ITEM,
            SavedItemKind::Watchlist => queries::INSERT_WATCHLIST_ITEM,
        }
    }

    fn delete_query(self) -> &'static str {
        match self {
            SavedItemKind::Cart => queries::DELETE_CART_ITEM,
            SavedItemKind::Watchlist => queries::DELETE_WATCHLIST_ITEM,
        }
    }

    fn list_query(self) -> &'static str {
        match self {
            SavedItemKind::Cart => queries::GET_CART_LISTINGS,
            SavedItemKind::Watchlist => queries::GET_WATCHLIST_LISTINGS,
        }
    }

    fn duplicate_code(self) -> &'static str {
        match self {
            SavedItemKind::Cart => "ALREADY_IN_CART",
            SavedItemKind::Watchlist => "ALREADY_IN_WATCHLIST",
        }
    }
}

/// 장바구니/찜 추가
pub async fn add_item(
    db_manager: &DatabaseManager,
    kind: SavedItemKind,
    user_id: i64,
    listing_id: i64,
) -> Result<SavedItem, serde_json::Value> {
    info!(
        "{:<12} --> 항목 추가 요청 {:?} user: {}, listing: {}",
        "Command", kind, user_id, listing_id
    );

    // 자신의 판매글은 장바구니에 담을 수 없다
    if matches!(kind, SavedItemKind::Cart) {
        let seller_id = sqlx::query_scalar::<_, i64>(queries::GET_LISTING_SELLER)
            .bind(listing_id)
            .fetch_optional(db_manager.pool())
            .await
            .map_err(|e| db_error(&e))?;
        if seller_id == Some(user_id) {
            return Err(serde_json::json!({
                "error": "자신의 판매글은 장바구니에 담을 수 없습니다.",
                "code": "OWN_LISTING"
            }));
        }
    }

    sqlx::query_as::<_, SavedItem>(kind.insert_query())
        .bind(user_id)
        .bind(listing_id)
        .fetch_one(db_manager.pool())
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                serde_json::json!({
                    "error": "이미 추가된 판매글입니다.",
                    "code": kind.duplicate_code()
                })
            } else if is_foreign_key_violation(&e) {
                serde_json::json!({
                    "error": "판매글을 찾을 수 없습니다.",
                    "code": "NOT_FOUND"
                })
            } else {
                db_error(&e)
            }
        })
}

/// 장바구니/찜 제거
pub async fn remove_item(
    db_manager: &DatabaseManager,
    kind: SavedItemKind,
    user_id: i64,
    listing_id: i64,
) -> Result<(), serde_json::Value> {
    info!(
        "{:<12} --> 항목 제거 요청 {:?} user: {}, listing: {}",
        "Command", kind, user_id, listing_id
    );

    let result = sqlx::query(kind.delete_query())
        .bind(user_id)
        .bind(listing_id)
        .execute(db_manager.pool())
        .await
        .map_err(|e| db_error(&e))?;

    if result.rows_affected() == 0 {
        return Err(serde_json::json!({
            "error": "추가되어 있지 않은 판매글입니다.",
            "code": "NOT_FOUND"
        }));
    }
    Ok(())
}

// endregion: --- Commands

// region:    --- Query Handlers

/// 장바구니/찜 판매글 목록 조회
pub async fn get_items(
    db_manager: &DatabaseManager,
    kind: SavedItemKind,
    user_id: i64,
) -> Result<Vec<Listing>, sqlx::Error> {
    info!(
        "{:<12} --> 항목 목록 조회 {:?} user: {}",
        "Query", kind, user_id
    );
    sqlx::query_as::<_, Listing>(kind.list_query())
        .bind(user_id)
        .fetch_all(db_manager.pool())
        .await
}

// endregion: --- Query Handlers
