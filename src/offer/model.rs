use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// 가격 제안 모델 (카운터 제안은 parent_offer_id 로 트리를 이룬다)
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct Offer {
    pub id: i64,
    pub listing_id: i64,
    pub buyer_id: i64,
    pub seller_id: i64,
    pub proposer_id: i64,
    pub amount: i64,
    pub message: Option<String>,
    pub status: String,
    pub parent_offer_id: Option<i64>,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Offer {
    /// 제안의 상대방 (응답 권한자)
    pub fn counterpart_of_proposer(&self) -> i64 {
        if self.proposer_id == self.buyer_id {
            self.seller_id
        } else {
            self.buyer_id
        }
    }
}

/// 가격 제안 명령
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateOfferCommand {
    pub listing_id: i64,
    pub amount: i64,
    pub message: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

/// 카운터 제안 명령
#[derive(Debug, Serialize, Deserialize)]
pub struct CounterOfferCommand {
    pub amount: i64,
    pub message: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}
