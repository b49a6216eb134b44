//! 리뷰 관련 커맨드 처리
//! 리뷰 작성과 평점 집계 갱신은 한 트랜잭션으로 묶어 집계 드리프트를 차단한다.

// region:    --- Imports
use crate::database::{db_error, is_foreign_key_violation, DatabaseManager};
use crate::notification::{notify, NewNotification, PostgresNotificationStore};
use crate::review::model::{CreateReviewCommand, Review};
use crate::review::queries;
use tracing::info;

// endregion: --- Imports

// region:    --- Validation

/// 작성 명령 검증
pub fn validate_create(cmd: &CreateReviewCommand, reviewer_id: i64) -> Result<(), serde_json::Value> {
    if cmd.reviewed_id == reviewer_id {
        return Err(serde_json::json!({
            "error": "자기 자신은 리뷰할 수 없습니다.",
            "code": "SELF_REVIEW"
        }));
    }
    if !(1..=5).contains(&cmd.rating) {
        return Err(serde_json::json!({
            "error": "평점은 1 이상 5 이하여야 합니다.",
            "code": "INVALID_RATING"
        }));
    }
    Ok(())
}

/// 증분 집계 계산 (avg' = (avg * n + r) / (n + 1))
pub fn next_aggregate(average: f64, count: i64, rating: i64) -> (f64, i64) {
    let next_count = count + 1;
    let next_average = (average * count as f64 + rating as f64) / next_count as f64;
    (next_average, next_count)
}

// endregion: --- Validation

// region:    --- Commands

/// 리뷰 작성
pub async fn create_review(
    db_manager: &DatabaseManager,
    notification_store: &PostgresNotificationStore,
    reviewer_id: i64,
    cmd: CreateReviewCommand,
) -> Result<Review, serde_json::Value> {
    info!(
        "{:<12} --> 리뷰 작성 요청 reviewer: {}, reviewed: {}, rating: {}",
        "Command", reviewer_id, cmd.reviewed_id, cmd.rating
    );
    validate_create(&cmd, reviewer_id)?;

    let reviewed_id = cmd.reviewed_id;
    let listing_id = cmd.listing_id;
    let rating = cmd.rating;
    let comment = cmd.comment;

    let result = db_manager
        .transaction(|tx| {
            Box::pin(async move {
                let exists = sqlx::query_scalar::<_, bool>(queries::REVIEW_EXISTS)
                    .bind(reviewer_id)
                    .bind(reviewed_id)
                    .bind(listing_id)
                    .fetch_one(&mut **tx)
                    .await?;
                if exists {
                    return Ok(Err(serde_json::json!({
                        "error": "이미 작성한 리뷰가 있습니다.",
                        "code": "DUPLICATE_REVIEW"
                    })));
                }

                let review = sqlx::query_as::<_, Review>(queries::INSERT_REVIEW)
                    .bind(reviewer_id)
                    .bind(reviewed_id)
                    .bind(listing_id)
                    .bind(rating)
                    .bind(&comment)
                    .fetch_one(&mut **tx)
                    .await?;

                // 같은 트랜잭션에서 집계 반영
                sqlx::query(queries::UPDATE_RATING_AGGREGATE)
                    .bind(reviewed_id)
                    .bind(rating as f64)
                    .execute(&mut **tx)
                    .await?;

                Ok::<_, sqlx::Error>(Ok(review))
            })
        })
        .await;

    let review = match result {
        Ok(inner) => inner?,
        Err(e) => {
            if is_foreign_key_violation(&e) {
                return Err(serde_json::json!({
                    "error": "리뷰 대상을 찾을 수 없습니다.",
                    "code": "NOT_FOUND"
                }));
            }
            return Err(db_error(&e));
        }
    };

    notify(
        notification_store,
        NewNotification {
            user_id: review.reviewed_id,
            notification_type: "REVIEW_RECEIVED".to_string(),
            title: "새로운 리뷰가 등록되었습니다.".to_string(),
            body: format!("평점 {}점", review.rating),
            link: Some(format!("/users/{}", review.reviewed_id)),
        },
    )
    .await;

    Ok(review)
}

// endregion: --- Commands

// region:    --- Query Handlers

/// 사용자의 리뷰 목록 조회
pub async fn get_user_reviews(
    db_manager: &DatabaseManager,
    user_id: i64,
) -> Result<Vec<Review>, sqlx::Error> {
    info!("{:<12} --> 리뷰 목록 조회 user: {}", "Query", user_id);
    sqlx::query_as::<_, Review>(queries::GET_USER_REVIEWS)
        .bind(user_id)
        .fetch_all(db_manager.pool())
        .await
}

// endregion: --- Query Handlers

// region:    --- Tests


// endregion: --- Tests
