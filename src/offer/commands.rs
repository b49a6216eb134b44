//! 가격 제안 관련 커맨드 처리
//! 1. 제안 생성
//! 2. 수락 / 거절 / 카운터 제안
//! 3. 철회

// region:    --- Imports
use crate::database::{db_error, DatabaseManager};
use crate::listing::model::Listing;
use crate::listing::queries::{EXECUTE_BUY_NOW, GET_LISTING_FOR_UPDATE};
use crate::notification::{notify, NewNotification, PostgresNotificationStore};
use crate::offer::model::{CounterOfferCommand, CreateOfferCommand, Offer};
use crate::offer::queries;
use chrono::{DateTime, Utc};
use tracing::info;

// endregion: --- Imports

// region:    --- Validation

/// 제안 생성 가능 여부 검증
pub fn validate_create(
    listing: &Listing,
    buyer_id: i64,
    amount: i64,
) -> Result<(), serde_json::Value> {
    if listing.seller_id == buyer_id {
        return Err(serde_json::json!({
            "error": "자신의 판매글에는 제안할 수 없습니다.",
            "code": "OWN_LISTING"
        }));
    }
    if listing.status != "ACTIVE" {
        return Err(serde_json::json!({
            "error": "제안 가능한 상태가 아닙니다.",
            "code": "NOT_ACTIVE"
        }));
    }
    if amount <= 0 {
        return Err(serde_json::json!({
            "error": "제안 금액은 0보다 커야 합니다.",
            "code": "INVALID_AMOUNT"
        }));
    }
    Ok(())
}

/// 만료 일시 검증 (지정하는 경우 미래여야 한다, 생략 시 기본 만료가 적용된다)
pub fn validate_expiry(
    expires_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Result<(), serde_json::Value> {
    if matches!(expires_at, Some(expires_at) if expires_at <= now) {
        return Err(serde_json::json!({
            "error": "만료 일시는 미래여야 합니다.",
            "code": "INVALID_EXPIRY"
        }));
    }
    Ok(())
}

/// 응답(수락/거절/카운터) 가능 여부 검증
/// 대기 중(PENDING)이고 만료되지 않은 제안에 대해, 제안자의 상대방만 응답할 수 있다.
pub fn validate_respond(
    offer: &Offer,
    responder_id: i64,
    now: DateTime<Utc>,
) -> Result<(), serde_json::Value> {
    if offer.status != "PENDING" {
        return Err(serde_json::json!({
            "error": "대기 중인 제안이 아닙니다.",
            "code": "NOT_PENDING",
            "status": offer.status,
        }));
    }
    if now > offer.expires_at {
        return Err(serde_json::json!({
            "error": "만료된 제안입니다.",
            "code": "OFFER_EXPIRED"
        }));
    }
    if offer.counterpart_of_proposer() != responder_id {
        return Err(serde_json::json!({
            "error": "제안의 상대방만 응답할 수 있습니다.",
            "code": "FORBIDDEN"
        }));
    }
    Ok(())
}

// endregion: --- Validation

// region:    --- Commands

/// 1. 제안 생성
pub async fn create_offer(
    db_manager: &DatabaseManager,
    notification_store: &PostgresNotificationStore,
    buyer_id: i64,
    cmd: CreateOfferCommand,
) -> Result<Offer, serde_json::Value> {
    info!(
        "{:<12} --> 제안 생성 요청 listing: {}, buyer: {}, amount: {}",
        "Command", cmd.listing_id, buyer_id, cmd.amount
    );
    validate_expiry(cmd.expires_at, Utc::now())?;

    let listing_id = cmd.listing_id;
    let amount = cmd.amount;
    let message = cmd.message;
    let expires_at = cmd.expires_at;

    let result = db_manager
        .transaction(|tx| {
            Box::pin(async move {
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

                if let Err(e) = validate_create(&listing, buyer_id, amount) {
                    return Ok(Err(e));
                }

                // 구매자당 대기 중 제안은 하나만 허용
                let pending_exists = sqlx::query_scalar::<_, bool>(queries::PENDING_OFFER_EXISTS)
                    .bind(listing_id)
                    .bind(buyer_id)
                    .fetch_one(&mut **tx)
                    .await?;
                if pending_exists {
                    return Ok(Err(serde_json::json!({
                        "error": "이미 대기 중인 제안이 있습니다.",
                        "code": "PENDING_OFFER_EXISTS"
                    })));
                }

                let offer = sqlx::query_as::<_, Offer>(queries::INSERT_OFFER)
                    .bind(listing_id)
                    .bind(buyer_id)
                    .bind(listing.seller_id)
                    .bind(buyer_id)
                    .bind(amount)
                    .bind(&message)
                    .bind(None::<i64>)
                    .bind(expires_at)
                    .fetch_one(&mut **tx)
                    .await?;

                Ok::<_, sqlx::Error>(Ok(offer))
            })
        })
        .await;

    let offer = match result {
        Ok(inner) => inner?,
        Err(e) => return Err(db_error(&e)),
    };

    notify(
        notification_store,
        NewNotification {
            user_id: offer.seller_id,
            notification_type: "OFFER_RECEIVED".to_string(),
            title: "새로운 가격 제안이 도착했습니다.".to_string(),
            body: format!("{}원 제안", offer.amount),
            link: Some(format!("/listings/{}", offer.listing_id)),
        },
    )
    .await;

    Ok(offer)
}

/// 2-1. 제안 수락 (제안 수락과 판매 처리를 한 트랜잭션으로 묶는다)
pub async fn accept_offer(
    db_manager: &DatabaseManager,
    notification_store: &PostgresNotificationStore,
    responder_id: i64,
    offer_id: i64,
) -> Result<Offer, serde_json::Value> {
    info!(
        "{:<12} --> 제안 수락 요청 offer: {}, responder: {}",
        "Command", offer_id, responder_id
    );

    let result = db_manager
        .transaction(|tx| {
            Box::pin(async move {
                let offer = match load_respondable_offer(tx, offer_id, responder_id).await? {
                    Ok(offer) => offer,
                    Err(e) => return Ok(Err(e)),
                };

                // 판매글이 아직 판매 가능한지 확인
                let listing = sqlx::query_as::<_, Listing>(GET_LISTING_FOR_UPDATE)
                    .bind(offer.listing_id)
                    .fetch_one(&mut **tx)
                    .await?;
                if listing.status != "ACTIVE" {
                    return Ok(Err(serde_json::json!({
                        "error": "판매글이 더 이상 판매 가능한 상태가 아닙니다.",
                        "code": "NOT_ACTIVE"
                    })));
                }

                let accepted = sqlx::query_as::<_, Offer>(queries::SET_OFFER_STATUS)
                    .bind(offer_id)
                    .bind("ACCEPTED")
                    .fetch_one(&mut **tx)
                    .await?;

                sqlx::query_as::<_, Listing>(EXECUTE_BUY_NOW)
                    .bind(offer.listing_id)
                    .fetch_one(&mut **tx)
                    .await?;

                Ok::<_, sqlx::Error>(Ok(accepted))
            })
        })
        .await;

    let offer = match result {
        Ok(inner) => inner?,
        Err(e) => return Err(db_error(&e)),
    };

    notify(
        notification_store,
        NewNotification {
            user_id: offer.proposer_id,
            notification_type: "OFFER_ACCEPTED".to_string(),
            title: "제안이 수락되었습니다.".to_string(),
            body: format!("{}원 제안이 수락되었습니다.", offer.amount),
            link: Some(format!("/listings/{}", offer.listing_id)),
        },
    )
    .await;

    Ok(offer)
}

/// 2-2. 제안 거절
pub async fn decline_offer(
    db_manager: &DatabaseManager,
    notification_store: &PostgresNotificationStore,
    responder_id: i64,
    offer_id: i64,
) -> Result<Offer, serde_json::Value> {
    info!(
        "{:<12} --> 제안 거절 요청 offer: {}, responder: {}",
        "Command", offer_id, responder_id
    );

    let result = db_manager
        .transaction(|tx| {
            Box::pin(async move {
                let offer = match load_respondable_offer(tx, offer_id, responder_id).await? {
                    Ok(offer) => offer,
                    Err(e) => return Ok(Err(e)),
                };

                let declined = sqlx::query_as::<_, Offer>(queries::SET_OFFER_STATUS)
                    .bind(offer.id)
                    .bind("DECLINED")
                    .fetch_one(&mut **tx)
                    .await?;

                Ok::<_, sqlx::Error>(Ok(declined))
            })
        })
        .await;

    let offer = match result {
        Ok(inner) => inner?,
        Err(e) => return Err(db_error(&e)),
    };

    notify(
        notification_store,
        NewNotification {
            user_id: offer.proposer_id,
            notification_type: "OFFER_DECLINED".to_string(),
            title: "제안이 거절되었습니다.".to_string(),
            body: format!("{}원 제안이 거절되었습니다.", offer.amount),
            link: Some(format!("/listings/{}", offer.listing_id)),
        },
    )
    .await;

    Ok(offer)
}

/// 2-3. 카운터 제안
/// 원 제안은 COUNTERED 상태로 종결되고, parent_offer_id 로 연결된 새 제안이 생성된다.
pub async fn counter_offer(
    db_manager: &DatabaseManager,
    notification_store: &PostgresNotificationStore,
    responder_id: i64,
    offer_id: i64,
    cmd: CounterOfferCommand,
) -> Result<Offer, serde_json::Value> {
    info!(
        "{:<12} --> 카운터 제안 요청 offer: {}, responder: {}, amount: {}",
        "Command", offer_id, responder_id, cmd.amount
    );

    if cmd.amount <= 0 {
        return Err(serde_json::json!({
            "error": "제안 금액은 0보다 커야 합니다.",
            "code": "INVALID_AMOUNT"
        }));
    }
    validate_expiry(cmd.expires_at, Utc::now())?;

    let amount = cmd.amount;
    let message = cmd.message;
    let expires_at = cmd.expires_at;

    let result = db_manager
        .transaction(|tx| {
            Box::pin(async move {
                let parent = match load_respondable_offer(tx, offer_id, responder_id).await? {
                    Ok(offer) => offer,
                    Err(e) => return Ok(Err(e)),
                };

                // 원 제안 종결
                sqlx::query_as::<_, Offer>(queries::SET_OFFER_STATUS)
                    .bind(parent.id)
                    .bind("COUNTERED")
                    .fetch_one(&mut **tx)
                    .await?;

                // parent_offer_id 는 생성 시에만 설정되므로 체인은 항상 트리를 이룬다
                let counter = sqlx::query_as::<_, Offer>(queries::INSERT_OFFER)
                    .bind(parent.listing_id)
                    .bind(parent.buyer_id)
                    .bind(parent.seller_id)
                    .bind(responder_id)
                    .bind(amount)
                    .bind(&message)
                    .bind(Some(parent.id))
                    .bind(expires_at)
                    .fetch_one(&mut **tx)
                    .await?;

                Ok::<_, sqlx::Error>(Ok(counter))
            })
        })
        .await;

    let counter = match result {
        Ok(inner) => inner?,
        Err(e) => return Err(db_error(&e)),
    };

    notify(
        notification_store,
        NewNotification {
            user_id: counter.counterpart_of_proposer(),
            notification_type: "OFFER_COUNTERED".to_string(),
            title: "카운터 제안이 도착했습니다.".to_string(),
            body: format!("{}원 카운터 제안", counter.amount),
            link: Some(format!("/listings/{}", counter.listing_id)),
        },
    )
    .await;

    Ok(counter)
}

/// 3. 제안 철회 (제안자 본인만, 대기 중 상태에서만)
pub async fn withdraw_offer(
    db_manager: &DatabaseManager,
    proposer_id: i64,
    offer_id: i64,
) -> Result<Offer, serde_json::Value> {
    info!(
        "{:<12} --> 제안 철회 요청 offer: {}, proposer: {}",
        "Command", offer_id, proposer_id
    );

    let result = db_manager
        .transaction(|tx| {
            Box::pin(async move {
                let offer = sqlx::query_as::<_, Offer>(queries::GET_OFFER_FOR_UPDATE)
                    .bind(offer_id)
                    .fetch_optional(&mut **tx)
                    .await?;

                let offer = match offer {
                    Some(offer) => offer,
                    None => {
                        return Ok(Err(serde_json::json!({
                            "error": "제안을 찾을 수 없습니다.",
                            "code": "NOT_FOUND"
                        })))
                    }
                };

                if offer.proposer_id != proposer_id {
                    return Ok(Err(serde_json::json!({
                        "error": "본인의 제안만 철회할 수 있습니다.",
                        "code": "FORBIDDEN"
                    })));
                }
                if offer.status != "PENDING" {
                    return Ok(Err(serde_json::json!({
                        "error": "대기 중인 제안이 아닙니다.",
                        "code": "NOT_PENDING"
                    })));
                }

                let withdrawn = sqlx::query_as::<_, Offer>(queries::SET_OFFER_STATUS)
                    .bind(offer.id)
                    .bind("WITHDRAWN")
                    .fetch_one(&mut **tx)
                    .await?;

                Ok::<_, sqlx::Error>(Ok(withdrawn))
            })
        })
        .await;

    match result {
        Ok(inner) => inner,
        Err(e) => Err(db_error(&e)),
    }
}

/// 응답 가능한 제안 로드 (행 잠금 + 검증, 만료 시 상태 반영)
async fn load_respondable_offer(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    offer_id: i64,
    responder_id: i64,
) -> Result<Result<Offer, serde_json::Value>, sqlx::Error> {
    let offer = sqlx::query_as::<_, Offer>(queries::GET_OFFER_FOR_UPDATE)
        .bind(offer_id)
        .fetch_optional(&mut **tx)
        .await?;

    let offer = match offer {
        Some(offer) => offer,
        None => {
            return Ok(Err(serde_json::json!({
                "error": "제안을 찾을 수 없습니다.",
                "code": "NOT_FOUND"
            })))
        }
    };

    let now = Utc::now();
    if let Err(e) = validate_respond(&offer, responder_id, now) {
        // 만료된 대기 제안은 조회 시점에 EXPIRED 로 반영
        if e["code"] == "OFFER_EXPIRED" {
            sqlx::query_as::<_, Offer>(queries::SET_OFFER_STATUS)
                .bind(offer.id)
                .bind("EXPIRED")
                .fetch_one(&mut **tx)
                .await?;
        }
        return Ok(Err(e));
    }

    Ok(Ok(offer))
}

// endregion: --- Commands

// region:    --- Query Handlers

/// 내 제안 목록 조회
pub async fn get_user_offers(
    db_manager: &DatabaseManager,
    user_id: i64,
) -> Result<Vec<Offer>, sqlx::Error> {
    info!("{:<12} --> 내 제안 목록 조회 user: {}", "Query", user_id);
    sqlx::query_as::<_, Offer>(queries::GET_USER_OFFERS)
        .bind(user_id)
        .fetch_all(db_manager.pool())
        .await
}

/// 판매글의 제안 목록 조회 (판매자만)
pub async fn get_listing_offers(
    db_manager: &DatabaseManager,
    requester_id: i64,
    listing_id: i64,
) -> Result<Vec<Offer>, serde_json::Value> {
    info!(
        "{:<12} --> 판매글 제안 목록 조회 listing: {}",
        "Query", listing_id
    );
    let listing = crate::listing::commands::get_listing(db_manager, listing_id)
        .await
        .map_err(|e| db_error(&e))?;
    if listing.seller_id != requester_id {
        return Err(serde_json::json!({
            "error": "판매자만 제안 목록을 볼 수 있습니다.",
            "code": "FORBIDDEN"
        }));
    }
    sqlx::query_as::<_, Offer>(queries::GET_LISTING_OFFERS)
        .bind(listing_id)
        .fetch_all(db_manager.pool())
        .await
        .map_err(|e| db_error(&e))
}

// endregion: --- Query Handlers

// region:    --- Tests


// endregion: --- Tests
