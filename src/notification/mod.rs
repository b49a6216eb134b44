//! 알림 피드
//! 다른 모듈(입찰/제안/메시지/리뷰/팔로우)이 커밋 이후에 알림을 적재하고,
//! 사용자는 자신의 피드를 조회/읽음 처리한다.

// region:    --- Imports
use crate::database::DatabaseManager;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use std::sync::Arc;
use tracing::warn;

// endregion: --- Imports

// region:    --- Notification Model

/// 알림 모델
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Notification {
    pub id: i64,
    pub user_id: i64,
    pub notification_type: String,
    pub title: String,
    pub body: String,
    pub link: Option<String>,
    pub read_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// 적재할 알림
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct NewNotification {
    pub user_id: i64,
    pub notification_type: String,
    pub title: String,
    pub body: String,
    pub link: Option<String>,
}

// endregion: --- Notification Model

// region:    --- Notification Store Trait

/// 알림 저장소 트레이트
#[async_trait]
pub trait NotificationStore {
    async fn push(&self, notification: NewNotification) -> Result<(), String>;
}

/// 알림 저장소 구현체
pub struct PostgresNotificationStore {
    pool: Arc<PgPool>,
}

/// 알림 저장소 구현체 메서드 구현
#[async_trait]
impl NotificationStore for PostgresNotificationStore {
    async fn push(&self, notification: NewNotification) -> Result<(), String> {
        sqlx::query(
            "INSERT INTO notifications (user_id, notification_type, title, body, link)
            VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(notification.user_id)
        .bind(&notification.notification_type)
        .bind(&notification.title)
        .bind(&notification.body)
        .bind(&notification.link)
        .execute(&*self.pool)
        .await
        .map_err(|e| e.to_string())?;

        Ok(())
    }
}

/// 알림 저장소 생성
impl PostgresNotificationStore {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

/// 알림 적재 (실패 시 경고만 남기고 원 작업은 실패시키지 않음)
pub async fn notify(store: &PostgresNotificationStore, notification: NewNotification) {
    if let Err(e) = store.push(notification).await {
        warn!("{:<12} --> 알림 적재 실패: {}", "Notify", e);
    }
}

// endregion: --- Notification Store Trait

// region:    --- Queries

/// 알림 목록 조회 (최신순)
pub const GET_NOTIFICATIONS: &str = r#"
    SELECT id, user_id, notification_type, title, body, link, read_at, created_at
    FROM notifications
    WHERE user_id = $1
    ORDER BY created_at DESC
"#;

/// 알림 읽음 처리 (본인 소유만)
pub const MARK_NOTIFICATION_READ: &str = r#"
    UPDATE notifications SET read_at = now()
    WHERE id = $1 AND user_id = $2 AND read_at IS NULL
"#;

/// 모든 알림 읽음 처리
pub const MARK_ALL_NOTIFICATIONS_READ: &str = r#"
    UPDATE notifications SET read_at = now()
    WHERE user_id = $1 AND read_at IS NULL
"#;

// endregion: --- Queries

// region:    --- Handlers

/// 알림 목록 조회
pub async fn get_notifications(
    db_manager: &DatabaseManager,
    user_id: i64,
) -> Result<Vec<Notification>, sqlx::Error> {
    sqlx::query_as::<_, Notification>(GET_NOTIFICATIONS)
        .bind(user_id)
        .fetch_all(db_manager.pool())
        .await
}

/// 알림 읽음 처리 (읽은 알림 수 반환)
pub async fn mark_read(
    db_manager: &DatabaseManager,
    notification_id: i64,
    user_id: i64,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(MARK_NOTIFICATION_READ)
        .bind(notification_id)
        .bind(user_id)
        .execute(db_manager.pool())
        .await?;
    Ok(result.rows_affected())
}

/// 모든 알림 읽음 처리
pub async fn mark_all_read(db_manager: &DatabaseManager, user_id: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(MARK_ALL_NOTIFICATIONS_READ)
        .bind(user_id)
        .execute(db_manager.pool())
        .await?;
    Ok(result.rows_affected())
}

// endregion: --- Handlers
