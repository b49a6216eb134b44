use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// 판매글 모델
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct Listing {
    pub id: i64,
    pub seller_id: i64,
    pub title: String,
    pub description: String,
    pub category: String,
    pub condition: String,
    pub images: Vec<String>,
    pub listing_type: String,
    pub status: String,
    pub price: i64,
    pub current_price: i64,
    pub buy_now_price: Option<i64>,
    pub quantity: i64,
    pub quantity_sold: i64,
    pub shipping_policy: String,
    pub return_policy: String,
    pub end_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// 판매글 등록 명령
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateListingCommand {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub condition: String,
    #[serde(default)]
    pub images: Vec<String>,
    pub listing_type: String,
    pub price: i64,
    pub buy_now_price: Option<i64>,
    #[serde(default = "default_quantity")]
    pub quantity: i64,
    #[serde(default)]
    pub shipping_policy: String,
    #[serde(default)]
    pub return_policy: String,
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub draft: bool,
}

fn default_quantity() -> i64 {
    1
}

/// 판매글 수정 명령
#[derive(Debug, Serialize, Deserialize, Default)]
pub struct UpdateListingCommand {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub condition: Option<String>,
    pub images: Option<Vec<String>>,
    pub shipping_policy: Option<String>,
    pub return_policy: Option<String>,
    /// DRAFT -> ACTIVE 전환만 허용
    pub status: Option<String>,
}

/// 판매글 목록 필터
#[derive(Debug, Serialize, Deserialize, Default)]
pub struct ListingFilter {
    pub category: Option<String>,
    pub seller_id: Option<i64>,
    pub status: Option<String>,
}
