//! 입찰 관련 커맨드 처리
//! 1. 입찰 (즉시 구매 가격 도달 시 낙찰 처리 포함)
//! 2. 입찰 철회

// region:    --- Imports
use crate::bidding::model::{Bid, BidOutcome, PlaceBidCommand};
use crate::bidding::queries;
use crate::database::{db_error, DatabaseManager};
use crate::listing::model::Listing;
use crate::listing::queries::GET_LISTING_FOR_UPDATE;
use crate::notification::{notify, NewNotification, PostgresNotificationStore};
use chrono::{DateTime, Utc};
use sqlx::Row;
use tracing::info;

// endregion: --- Imports

// region:    --- Validation

/// 입찰 가능 여부 검증
pub fn validate_bid(
    listing: &Listing,
    bidder_id: i64,
    amount: i64,
    now: DateTime<Utc>,
) -> Result<(), serde_json::Value> {
    if listing.listing_type == "BUY_NOW" {
        return Err(serde_json::json!({
            "error": "경매 판매글이 아닙니다.",
            "code": "NOT_AUCTION"
        }));
    }
    if listing.seller_id == bidder_id {
        return Err(serde_json::json!({
            "error": "자신의 판매글에는 입찰할 수 없습니다.",
            "code": "OWN_LISTING"
        }));
    }
    match listing.status.as_str() {
        "DRAFT" => {
            return Err(serde_json::json!({
                "error": "경매가 아직 시작되지 않았습니다.",
                "code": "NOT_STARTED"
            }))
        }
        "SOLD" | "EXPIRED" | "CANCELLED" => {
            return Err(serde_json::json!({
                "error": "경매가 이미 종료되었습니다.",
                "code": "ALREADY_ENDED"
            }))
        }
        _ if matches!(listing.end_date, Some(end_date) if now > end_date) => {
            return Err(serde_json::json!({
                "error": "경매가 이미 종료되었습니다.",
                "code": "ALREADY_ENDED"
            }))
        }
        "ACTIVE" => {
            if amount <= listing.current_price {
                return Err(serde_json::json!({
                    "error": "입찰 금액이 현재 가격보다 낮습니다.",
                    "code": "LOW_BID",
                    "current_price": listing.current_price,
                    "bid_amount": amount,
                }));
            }
        }
        _ => {
            return Err(serde_json::json!({
                "error": "잘못된 경매 상태입니다.",
                "code": "INVALID_STATUS"
            }))
        }
    }
    Ok(())
}

// endregion: --- Validation

// region:    --- Commands

/// 1. 입찰
pub async fn place_bid(
    db_manager: &DatabaseManager,
    notification_store: &PostgresNotificationStore,
    bidder_id: i64,
    cmd: PlaceBidCommand,
) -> Result<BidOutcome, serde_json::Value> {
    info!(
        "{:<12} --> 입찰 요청 처리 시작 bidder: {}, {:?}",
        "Command", bidder_id, cmd
    );

    let listing_id = cmd.listing_id;
    let amount = cmd.amount;

    let result = db_manager
        .transaction(|tx| {
            Box::pin(async move {
                // 행 잠금 후 검증 (동시 입찰 직렬화)
                let listing = sqlx::query_as::<_, Listing>(GET_LISTING_FOR_UPDATE)
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

                let now = Utc::now();
                if let Err(e) = validate_bid(&listing, bidder_id, amount, now) {
                    return Ok(Err(e));
                }

                // 입찰 금액이 즉시 구매 가격 이상인 경우 낙찰 처리
                // (입찰가 대신 즉시 구매 가격으로 처리)
                if let Some(buy_now_price) = listing.buy_now_price {
                    if amount >= buy_now_price {
                        sqlx::query(queries::SETTLE_AT_BUY_NOW)
                            .bind(buy_now_price)
                            .bind(listing_id)
                            .execute(&mut **tx)
                            .await?;

                        let bid = sqlx::query_as::<_, Bid>(queries::INSERT_BID)
                            .bind(listing_id)
                            .bind(bidder_id)
                            .bind(buy_now_price)
                            .fetch_one(&mut **tx)
                            .await?;

                        return Ok(Ok((listing, bid, true, buy_now_price)));
                    }
                }

                // 현재 가격보다 높은 입찰만 반영
                let raised = sqlx::query(queries::RAISE_CURRENT_PRICE)
                    .bind(amount)
                    .bind(listing_id)
                    .execute(&mut **tx)
                    .await?;

                if raised.rows_affected() == 0 {
                    return Ok(Err(serde_json::json!({
                        "error": "입찰 금액이 현재 가격보다 낮습니다.",
                        "code": "LOW_BID",
                        "bid_amount": amount,
                    })));
                }

                let bid = sqlx::query_as::<_, Bid>(queries::INSERT_BID)
                    .bind(listing_id)
                    .bind(bidder_id)
                    .bind(amount)
                    .fetch_one(&mut **tx)
                    .await?;

                Ok::<_, sqlx::Error>(Ok((listing, bid, false, amount)))
            })
        })
        .await;

    let (listing, bid, settled, current_price) = match result {
        Ok(inner) => inner?,
        Err(e) => return Err(db_error(&e)),
    };

    // 판매자에게 알림
    notify(
        notification_store,
        NewNotification {
            user_id: listing.seller_id,
            notification_type: if settled { "LISTING_SOLD" } else { "BID_PLACED" }.to_string(),
            title: if settled {
                "즉시 구매 가격으로 낙찰되었습니다.".to_string()
            } else {
                "새로운 입찰이 등록되었습니다.".to_string()
            },
            body: format!("'{}' 상품에 {}원 입찰", listing.title, current_price),
            link: Some(format!("/listings/{}", listing.id)),
        },
    )
    .await;

    // 낙찰 시 입찰자에게도 알림
    if settled {
        notify(
            notification_store,
            NewNotification {
                user_id: bidder_id,
                notification_type: "AUCTION_WON".to_string(),
                title: "낙찰되었습니다.".to_string(),
                body: format!("'{}' 상품을 {}원에 낙찰받았습니다.", listing.title, current_price),
                link: Some(format!("/listings/{}", listing.id)),
            },
        )
        .await;
    }

    Ok(BidOutcome {
        bid,
        settled,
        current_price,
    })
}

/// 2. 입찰 철회
pub async fn retract_bid(
    db_manager: &DatabaseManager,
    bidder_id: i64,
    bid_id: i64,
) -> Result<(), serde_json::Value> {
    info!(
        "{:<12} --> 입찰 철회 요청 bid: {}, bidder: {}",
        "Command", bid_id, bidder_id
    );

    let result = db_manager
        .transaction(|tx| {
            Box::pin(async move {
                let bid = sqlx::query_as::<_, Bid>(queries::GET_BID)
                    .bind(bid_id)
                    .fetch_optional(&mut **tx)
                    .await?;

                let bid = match bid {
                    Some(bid) => bid,
                    None => {
                        return Ok(Err(serde_json::json!({
                            "error": "입찰을 찾을 수 없습니다.",
                            "code": "NOT_FOUND"
                        })))
                    }
                };

                if bid.bidder_id != bidder_id {
                    return Ok(Err(serde_json::json!({
                        "error": "본인의 입찰만 철회할 수 있습니다.",
                        "code": "FORBIDDEN"
                    })));
                }

                // 행 잠금 후 상태 확인 (종료된 경매의 입찰은 철회 불가)
                let listing = sqlx::query_as::<_, Listing>(GET_LISTING_FOR_UPDATE)
                    .bind(bid.listing_id)
                    .fetch_one(&mut **tx)
                    .await?;

                if listing.status != "ACTIVE" {
                    return Ok(Err(serde_json::json!({
                        "error": "종료된 경매의 입찰은 철회할 수 없습니다.",
                        "code": "ALREADY_ENDED"
                    })));
                }

                sqlx::query(queries::DELETE_BID)
                    .bind(bid_id)
                    .execute(&mut **tx)
                    .await?;

                // 남은 입찰 기준으로 현재 가격 재계산
                sqlx::query(queries::RECOMPUTE_CURRENT_PRICE)
                    .bind(bid.listing_id)
                    .execute(&mut **tx)
                    .await?;

                Ok::<_, sqlx::Error>(Ok(()))
            })
        })
        .await;

    match result {
        Ok(inner) => inner,
        Err(e) => Err(db_error(&e)),
    }
}

// endregion: --- Commands

// region:    --- Query Handlers

/// 판매글 입찰 이력 조회
pub async fn get_listing_bids(
    db_manager: &DatabaseManager,
    listing_id: i64,
) -> Result<Vec<Bid>, sqlx::Error> {
    info!("{:<12} --> 입찰 이력 조회 listing: {}", "Query", listing_id);
    sqlx::query_as::<_, Bid>(queries::GET_LISTING_BIDS)
        .bind(listing_id)
        .fetch_all(db_manager.pool())
        .await
}

/// 내 입찰 이력 조회
pub async fn get_user_bids(
    db_manager: &DatabaseManager,
    bidder_id: i64,
) -> Result<Vec<Bid>, sqlx::Error> {
    info!("{:<12} --> 내 입찰 이력 조회 user: {}", "Query", bidder_id);
    sqlx::query_as::<_, Bid>(queries::GET_USER_BIDS)
        .bind(bidder_id)
        .fetch_all(db_manager.pool())
        .await
}

/// 최고 입찰가 조회
pub async fn get_highest_bid(
    db_manager: &DatabaseManager,
    listing_id: i64,
) -> Result<Option<i64>, sqlx::Error> {
    info!("{:<12} --> 최고 입찰가 조회 listing: {}", "Query", listing_id);
    let result = sqlx::query(queries::GET_HIGHEST_BID)
        .bind(listing_id)
        .fetch_one(db_manager.pool())
        .await?;
    Ok(result.get("highest_bid"))
}

// endregion: --- Query Handlers

// region:    --- Tests

#[cfg(test)]
mod tests {
    use super::validate_bid;
    use crate::listing::model::Listing;
    use chrono::{Duration, Utc};

    fn auction_listing() -> Listing {
        Listing {
            id: 1,
            seller_id: 7,
            title: "빈티지 카메라".to_string(),
            description: String::new(),
            category: String::new(),
            condition: String::new(),
            images: vec![],
            listing_type: "AUCTION".to_string(),
            status: "ACTIVE".to_string(),
            price: 10_000,
            current_price: 12_000,
            buy_now_price: Some(50_000),
            quantity: 1,
            quantity_sold: 0,
            shipping_policy: String::new(),
            return_policy: String::new(),
            end_date: Some(Utc::now() + Duration::hours(2)),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn bid_on_fixed_price_listing_is_rejected() {
        let mut listing = auction_listing();
        listing.listing_type = "BUY_NOW".to_string();
        let err = validate_bid(&listing, 2, 20_000, Utc::now()).unwrap_err();
        assert_eq!(err["code"], "NOT_AUCTION");
    }

    #[test]
    fn seller_cannot_bid_on_own_listing() {
        let listing = auction_listing();
        let err = validate_bid(&listing, listing.seller_id, 20_000, Utc::now()).unwrap_err();
        assert_eq!(err["code"], "OWN_LISTING");
    }

    #[test]
    fn low_bid_is_rejected() {
        let listing = auction_listing();
        let err = validate_bid(&listing, 2, listing.current_price, Utc::now()).unwrap_err();
        assert_eq!(err["code"], "LOW_BID");
    }

    #[test]
    fn bid_after_end_date_is_rejected() {
        let mut listing = auction_listing();
        listing.end_date = Some(Utc::now() - Duration::minutes(1));
        let err = validate_bid(&listing, 2, 20_000, Utc::now()).unwrap_err();
        assert_eq!(err["code"], "ALREADY_ENDED");
    }

    #[test]
    fn bid_on_closed_listing_is_rejected() {
        for status in ["SOLD", "EXPIRED", "CANCELLED"] {
            let mut listing = auction_listing();
            listing.status = status.to_string();
            let err = validate_bid(&listing, 2, 20_000, Utc::now()).unwrap_err();
            assert_eq!(err["code"], "ALREADY_ENDED");
        }
    }

    #[test]
    fn valid_bid_passes() {
        let listing = auction_listing();
        assert!(validate_bid(&listing, 2, 13_000, Utc::now()).is_ok());
    }
}

// endregion: --- Tests
