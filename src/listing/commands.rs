//! 판매글 관련 커맨드 처리
//! 1. 등록 / 수정 / 취소
//! 2. 즉시 구매

// region:    --- Imports
use crate::database::{db_error, DatabaseManager};
use crate::listing::model::{CreateListingCommand, Listing, ListingFilter, UpdateListingCommand};
use crate::listing::queries;
use crate::notification::{notify, NewNotification, PostgresNotificationStore};
use chrono::Utc;
use tracing::info;

// endregion: --- Imports

// region:    --- Validation

/// 판매글 유형 (경매 / 즉시 구매 / 혼합)
pub const LISTING_TYPES: [&str; 3] = ["AUCTION", "BUY_NOW", "BOTH"];

/// 등록 명령 검증
pub fn validate_create(cmd: &CreateListingCommand) -> Result<(), serde_json::Value> {
    if cmd.title.trim().is_empty() {
        return Err(serde_json::json!({
            "error": "제목은 비어 있을 수 없습니다.",
            "code": "INVALID_TITLE"
        }));
    }
    if !LISTING_TYPES.contains(&cmd.listing_type.as_str()) {
        return Err(serde_json::json!({
            "error": "판매 유형은 AUCTION, BUY_NOW, BOTH 중 하나여야 합니다.",
            "code": "INVALID_TYPE"
        }));
    }
    if cmd.price <= 0 {
        return Err(serde_json::json!({
            "error": "가격은 0보다 커야 합니다.",
            "code": "INVALID_PRICE"
        }));
    }
    if cmd.quantity < 1 {
        return Err(serde_json::json!({
            "error": "수량은 1 이상이어야 합니다.",
            "code": "INVALID_QUANTITY"
        }));
    }
    let is_auction = cmd.listing_type != "BUY_NOW";
    if is_auction {
        match cmd.end_date {
            Some(end_date) if end_date > Utc::now() => {}
            _ => {
                return Err(serde_json::json!({
                    "error": "경매에는 미래의 종료 일시가 필요합니다.",
                    "code": "INVALID_END_DATE"
                }))
            }
        }
        if cmd.quantity != 1 {
            return Err(serde_json::json!({
                "error": "경매 판매글의 수량은 1이어야 합니다.",
                "code": "INVALID_QUANTITY"
            }));
        }
    }
    if let Some(buy_now_price) = cmd.buy_now_price {
        if buy_now_price <= cmd.price {
            return Err(serde_json::json!({
                "error": "즉시 구매 가격은 시작 가격보다 높아야 합니다.",
                "code": "INVALID_BUY_NOW_PRICE"
            }));
        }
    }
    if cmd.listing_type == "BUY_NOW" && cmd.buy_now_price.is_some() {
        return Err(serde_json::json!({
            "error": "즉시 구매 전용 판매글은 별도의 즉시 구매 가격을 가질 수 없습니다.",
            "code": "INVALID_BUY_NOW_PRICE"
        }));
    }
    if cmd.listing_type == "BOTH" && cmd.buy_now_price.is_none() {
        return Err(serde_json::json!({
            "error": "혼합 판매글에는 즉시 구매 가격이 필요합니다.",
            "code": "INVALID_BUY_NOW_PRICE"
        }));
    }
    Ok(())
}

/// 즉시 구매 가능 여부 검증
pub fn validate_purchase(listing: &Listing, buyer_id: i64) -> Result<(), serde_json::Value> {
    if listing.seller_id == buyer_id {
        return Err(serde_json::json!({
            "error": "자신의 판매글은 구매할 수 없습니다.",
            "code": "OWN_LISTING"
        }));
    }
    if listing.status != "ACTIVE" {
        return Err(serde_json::json!({
            "error": "구매 가능한 상태가 아닙니다.",
            "code": "NOT_ACTIVE"
        }));
    }
    // 즉시 구매 가격이 없는 경매형 판매글은 입찰로만 판매된다
    if listing.listing_type != "BUY_NOW" && listing.buy_now_price.is_none() {
        return Err(serde_json::json!({
            "error": "즉시 구매 가격이 없는 경매 판매글은 즉시 구매할 수 없습니다.",
            "code": "AUCTION_ONLY"
        }));
    }
    if listing.quantity_sold >= listing.quantity {
        return Err(serde_json::json!({
            "error": "남은 수량이 없습니다.",
            "code": "SOLD_OUT"
        }));
    }
    Ok(())
}

/// 수정 명령 검증 (상태 변경은 DRAFT -> ACTIVE 전환만 허용)
pub fn validate_update(cmd: &UpdateListingCommand) -> Result<(), serde_json::Value> {
    if let Some(status) = &cmd.status {
        if status != "ACTIVE" {
            return Err(serde_json::json!({
                "error": "상태 변경은 게시(ACTIVE) 전환만 가능합니다.",
                "code": "INVALID_STATUS"
            }));
        }
    }
    Ok(())
}

// endregion: --- Validation

// region:    --- Commands

/// 1. 판매글 등록
pub async fn create_listing(
    db_manager: &DatabaseManager,
    seller_id: i64,
    cmd: CreateListingCommand,
) -> Result<Listing, serde_json::Value> {
    info!(
        "{:<12} --> 판매글 등록 요청 seller: {}, title: {}",
        "Command", seller_id, cmd.title
    );
    validate_create(&cmd)?;

    let status = if cmd.draft { "DRAFT" } else { "ACTIVE" };

    sqlx::query_as::<_, Listing>(queries::INSERT_LISTING)
        .bind(seller_id)
        .bind(&cmd.title)
        .bind(&cmd.description)
        .bind(&cmd.category)
        .bind(&cmd.condition)
        .bind(&cmd.images)
        .bind(&cmd.listing_type)
        .bind(status)
        .bind(cmd.price)
        .bind(cmd.buy_now_price)
        .bind(cmd.quantity)
        .bind(&cmd.shipping_policy)
        .bind(&cmd.return_policy)
        .bind(cmd.end_date)
        .fetch_one(db_manager.pool())
        .await
        .map_err(|e| db_error(&e))
}

/// 판매글 수정
pub async fn update_listing(
    db_manager: &DatabaseManager,
    seller_id: i64,
    listing_id: i64,
    cmd: UpdateListingCommand,
) -> Result<Listing, serde_json::Value> {
    info!(
        "{:<12} --> 판매글 수정 요청 id: {}, seller: {}",
        "Command", listing_id, seller_id
    );
    validate_update(&cmd)?;

    sqlx::query_as::<_, Listing>(queries::UPDATE_LISTING)
        .bind(listing_id)
        .bind(seller_id)
        .bind(&cmd.title)
        .bind(&cmd.description)
        .bind(&cmd.category)
        .bind(&cmd.condition)
        .bind(&cmd.images)
        .bind(&cmd.shipping_policy)
        .bind(&cmd.return_policy)
        .bind(&cmd.status)
        .fetch_optional(db_manager.pool())
        .await
        .map_err(|e| db_error(&e))?
        .ok_or_else(|| {
            serde_json::json!({
                "error": "수정할 수 없는 판매글입니다.",
                "code": "NOT_EDITABLE"
            })
        })
}

/// 판매글 취소
pub async fn cancel_listing(
    db_manager: &DatabaseManager,
    seller_id: i64,
    listing_id: i64,
) -> Result<Listing, serde_json::Value> {
    info!(
        "{:<12} --> 판매글 취소 요청 id: {}, seller: {}",
        "Command", listing_id, seller_id
    );
    sqlx::query_as::<_, Listing>(queries::CANCEL_LISTING)
        .bind(listing_id)
        .bind(seller_id)
        .fetch_optional(db_manager.pool())
        .await
        .map_err(|e| db_error(&e))?
        .ok_or_else(|| {
            serde_json::json!({
                "error": "취소할 수 없는 판매글입니다.",
                "code": "NOT_CANCELLABLE"
            })
        })
}

/// 2. 즉시 구매
pub async fn buy_now(
    db_manager: &DatabaseManager,
    notification_store: &PostgresNotificationStore,
    buyer_id: i64,
    listing_id: i64,
) -> Result<Listing, serde_json::Value> {
    info!(
        "{:<12} --> 즉시 구매 요청 listing: {}, buyer: {}",
        "Command", listing_id, buyer_id
    );

    let result = db_manager
        .transaction(|tx| {
            Box::pin(async move {
                // 행 잠금 후 검증
                let listing = sqlx::query_as::<_, Listing>(queries::GET_LISTING_FOR_UPDATE)
                    .bind(listing_id)
                    .fetch_optional(&mut **tx)
                    .await?;

                let listing = match listing {
                    Some(listing) => listing,
                    None => {
                        return Ok(Err(serde_json::json!({
                            "error": "판매글을 찾을 수 없습니다.",
                            "code": "NOT_FOUND"
                        })))
                    }
                };

                if let Err(e) = validate_purchase(&listing, buyer_id) {
                    return Ok(Err(e));
                }

                let updated = sqlx::query_as::<_, Listing>(queries::EXECUTE_BUY_NOW)
                    .bind(listing_id)
                    .fetch_one(&mut **tx)
                    .await?;

                Ok::<_, sqlx::Error>(Ok(updated))
            })
        })
        .await;

    let listing = match result {
        Ok(inner) => inner?,
        Err(e) => return Err(db_error(&e)),
    };

    // 판매자에게 알림
    let price = listing.buy_now_price.unwrap_or(listing.price);
    notify(
        notification_store,
        NewNotification {
            user_id: listing.seller_id,
            notification_type: "LISTING_SOLD".to_string(),
            title: "상품이 판매되었습니다.".to_string(),
            body: format!("'{}' 상품이 {}원에 판매되었습니다.", listing.title, price),
            link: Some(format!("/listings/{}", listing.id)),
        },
    )
    .await;

    Ok(listing)
}

// endregion: --- Commands

// region:    --- Query Handlers

/// 판매글 조회
pub async fn get_listing(
    db_manager: &DatabaseManager,
    listing_id: i64,
) -> Result<Listing, sqlx::Error> {
    info!("{:<12} --> 판매글 조회 id: {}", "Query", listing_id);
    sqlx::query_as::<_, Listing>(queries::GET_LISTING)
        .bind(listing_id)
        .fetch_one(db_manager.pool())
        .await
}

/// 판매글 목록 조회
pub async fn get_listings(
    db_manager: &DatabaseManager,
    filter: ListingFilter,
) -> Result<Vec<Listing>, sqlx::Error> {
    info!("{:<12} --> 판매글 목록 조회 {:?}", "Query", filter);
    let status = filter.status.unwrap_or_else(|| "ACTIVE".to_string());
    sqlx::query_as::<_, Listing>(queries::GET_LISTINGS)
        .bind(status)
        .bind(filter.category)
        .bind(filter.seller_id)
        .fetch_all(db_manager.pool())
        .await
}

// endregion: --- Query Handlers

// region:    --- Tests

#[cfg(test)]
mod tests {
    use super::{validate_create, validate_purchase};
    use crate::listing::model::{CreateListingCommand, Listing};
    use chrono::{Duration, Utc};

    fn auction_cmd() -> CreateListingCommand {
        CreateListingCommand {
            title: "빈티지 카메라".to_string(),
            description: String::new(),
            category: String::new(),
            condition: String::new(),
            images: vec![],
            listing_type: "AUCTION".to_string(),
            price: 10_000,
            buy_now_price: None,
            quantity: 1,
            shipping_policy: String::new(),
            return_policy: String::new(),
            end_date: Some(Utc::now() + Duration::hours(2)),
            draft: false,
        }
    }

    fn active_listing() -> Listing {
        Listing {
            id: 1,
            seller_id: 7,
            title: "빈티지 카메라".to_string(),
            description: String::new(),
            category: String::new(),
            condition: String::new(),
            images: vec![],
            listing_type: "BUY_NOW".to_string(),
            status: "ACTIVE".to_string(),
            price: 10_000,
            current_price: 10_000,
            buy_now_price: None,
            quantity: 1,
            quantity_sold: 0,
            shipping_policy: String::new(),
            return_policy: String::new(),
            end_date: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn auction_requires_future_end_date() {
        let mut cmd = auction_cmd();
        cmd.end_date = None;
        assert_eq!(validate_create(&cmd).unwrap_err()["code"], "INVALID_END_DATE");

        cmd.end_date = Some(Utc::now() - Duration::hours(1));
        assert_eq!(validate_create(&cmd).unwrap_err()["code"], "INVALID_END_DATE");
    }

    #[test]
    fn auction_quantity_is_one() {
        let mut cmd = auction_cmd();
        cmd.quantity = 3;
        assert_eq!(validate_create(&cmd).unwrap_err()["code"], "INVALID_QUANTITY");
    }

    #[test]
    fn buy_now_price_must_exceed_price() {
        let mut cmd = auction_cmd();
        cmd.listing_type = "BOTH".to_string();
        cmd.buy_now_price = Some(5_000);
        assert_eq!(
            validate_create(&cmd).unwrap_err()["code"],
            "INVALID_BUY_NOW_PRICE"
        );
    }

    #[test]
    fn both_listing_requires_buy_now_price() {
        let mut cmd = auction_cmd();
        cmd.listing_type = "BOTH".to_string();
        cmd.buy_now_price = None;
        assert_eq!(
            validate_create(&cmd).unwrap_err()["code"],
            "INVALID_BUY_NOW_PRICE"
        );
    }

    #[test]
    fn valid_auction_passes() {
        assert!(validate_create(&auction_cmd()).is_ok());
    }

    #[test]
    fn cannot_buy_own_listing() {
        let listing = active_listing();
        assert_eq!(
            validate_purchase(&listing, listing.seller_id).unwrap_err()["code"],
            "OWN_LISTING"
        );
    }

    #[test]
    fn cannot_buy_sold_out_listing() {
        let mut listing = active_listing();
        listing.quantity_sold = listing.quantity;
        assert_eq!(
            validate_purchase(&listing, 2).unwrap_err()["code"],
            "SOLD_OUT"
        );
    }

    #[test]
    fn auction_without_buy_now_price_cannot_be_purchased() {
        // 진행 중인 경매를 시작 가격으로 가로채는 경로 차단
        let mut listing = active_listing();
        listing.listing_type = "BOTH".to_string();
        listing.buy_now_price = None;
        listing.current_price = 25_000;
        assert_eq!(
            validate_purchase(&listing, 2).unwrap_err()["code"],
            "AUCTION_ONLY"
        );
    }

    #[test]
    fn purchase_of_active_listing_passes() {
        assert!(validate_purchase(&active_listing(), 2).is_ok());
    }
}

// endregion: --- Tests
