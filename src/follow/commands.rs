//! 팔로우 관련 커맨드 처리
//! 자기 자신 팔로우는 애플리케이션 계층에서 차단한다.

// region:    --- Imports
use crate::account::model::UserProfile;
use crate::database::{db_error, is_foreign_key_violation, is_unique_violation, DatabaseManager};
use crate::follow::model::Follow;
use crate::follow::queries;
use crate::notification::{notify, NewNotification, PostgresNotificationStore};
use tracing::info;

// endregion: --- Imports

// region:    --- Commands

/// 팔로우
pub async fn follow(
    db_manager: &DatabaseManager,
    notification_store: &PostgresNotificationStore,
    follower_id: i64,
    following_id: i64,
) -> Result<Follow, serde_json::Value> {
    info!(
        "{:<12} --> 팔로우 요청 follower: {}, following: {}",
        "Command", follower_id, following_id
    );

    if follower_id == following_id {
        return Err(serde_json::json!({
            "error": "자기 자신은 팔로우할 수 없습니다.",
            "code": "SELF_FOLLOW"
        }));
    }

    let follow = sqlx::query_as::<_, Follow>(queries::INSERT_FOLLOW)
        .bind(follower_id)
        .bind(following_id)
        .fetch_one(db_manager.pool())
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                serde_json::json!({
                    "error": "이미 팔로우 중입니다.",
                    "code": "ALREADY_FOLLOWING"
                })
            } else if is_foreign_key_violation(&e) {
                serde_json::json!({
                    "error": "사용자를 찾을 수 없습니다.",
                    "code": "NOT_FOUND"
                })
            } else {
                db_error(&e)
            }
        })?;

    notify(
        notification_store,
        NewNotification {
            user_id: follow.following_id,
            notification_type: "FOLLOWED".to_string(),
            title: "새로운 팔로워가 생겼습니다.".to_string(),
            body: String::new(),
            link: Some(format!("/users/{}", follow.follower_id)),
        },
    )
    .await;

    Ok(follow)
}

/// 팔로우 해제
pub async fn unfollow(
    db_manager: &DatabaseManager,
    follower_id: i64,
    following_id: i64,
) -> Result<(), serde_json::Value> {
    info!(
        "{:<12} --> 팔로우 해제 요청 follower: {}, following: {}",
        "Command", follower_id, following_id
    );

    let result = sqlx::query(queries::DELETE_FOLLOW)
        .bind(follower_id)
        .bind(following_id)
        .execute(db_manager.pool())
        .await
        .map_err(|e| db_error(&e))?;

    if result.rows_affected() == 0 {
        return Err(serde_json::json!({
            "error": "팔로우 중이 아닙니다.",
            "code": "NOT_FOUND"
        }));
    }
    Ok(())
}

// endregion: --- Commands

// region:    --- Query Handlers

/// 팔로워 목록 조회
pub async fn get_followers(
    db_manager: &DatabaseManager,
    user_id: i64,
) -> Result<Vec<UserProfile>, sqlx::Error> {
    info!("{:<12} --> 팔로워 목록 조회 user: {}", "Query", user_id);
    sqlx::query_as::<_, UserProfile>(queries::GET_FOLLOWERS)
        .bind(user_id)
        .fetch_all(db_manager.pool())
        .await
}

/// 팔로잉 목록 조회
pub async fn get_following(
    db_manager: &DatabaseManager,
    user_id: i64,
) -> Result<Vec<UserProfile>, sqlx::Error> {
    info!("{:<12} --> 팔로잉 목록 조회 user: {}", "Query", user_id);
    sqlx::query_as::<_, UserProfile>(queries::GET_FOLLOWING)
        .bind(user_id)
        .fetch_all(db_manager.pool())
        .await
}

// endregion: --- Query Handlers
