use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// 리뷰 모델
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct Review {
    pub id: i64,
    pub reviewer_id: i64,
    pub reviewed_id: i64,
    pub listing_id: Option<i64>,
    pub rating: i64,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

/// 리뷰 작성 명령
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateReviewCommand {
    pub reviewed_id: i64,
    pub rating: i64,
    #[serde(default)]
    pub comment: String,
    pub listing_id: Option<i64>,
}
