use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// 팔로우 모델 ((follower, following) 쌍은 UNIQUE 제약으로 유일)
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct Follow {
    pub id: i64,
    pub follower_id: i64,
    pub following_id: i64,
    pub created_at: DateTime<Utc>,
}
