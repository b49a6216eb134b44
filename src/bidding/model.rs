use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// 입찰 모델
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct Bid {
    pub id: i64,
    pub listing_id: i64,
    pub bidder_id: i64,
    pub amount: i64,
    pub created_at: DateTime<Utc>,
}

/// 입찰 명령
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PlaceBidCommand {
    pub listing_id: i64,
    pub amount: i64,
}

/// 입찰 결과 (즉시 구매 가격 도달 시 낙찰 처리 여부 포함)
#[derive(Debug, Serialize, Deserialize)]
pub struct BidOutcome {
    pub bid: Bid,
    pub settled: bool,
    pub current_price: i64,
}
