use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// 장바구니 항목 모델 (찜 목록도 같은 형태를 공유)
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct SavedItem {
    pub id: i64,
    pub user_id: i64,
    pub listing_id: i64,
    pub created_at: DateTime<Utc>,
}

/// 장바구니/찜 추가 명령
#[derive(Debug, Serialize, Deserialize)]
pub struct SaveItemCommand {
    pub listing_id: i64,
}
