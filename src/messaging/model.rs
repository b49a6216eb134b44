use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// 메시지 모델 (평면 행, 대화는 조회 시점에 상대방 기준으로 묶는다)
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct Message {
    pub id: i64,
    pub sender_id: i64,
    pub receiver_id: i64,
    pub listing_id: Option<i64>,
    pub content: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

/// 메시지 전송 명령
#[derive(Debug, Serialize, Deserialize)]
pub struct SendMessageCommand {
    pub receiver_id: i64,
    pub content: String,
    pub listing_id: Option<i64>,
}

// 대화 요약 (상대방별 마지막 메시지와 안 읽은 개수)
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct ConversationSummary {
    pub counterpart_id: i64,
    pub counterpart_username: String,
    pub last_message: String,
    pub last_message_at: DateTime<Utc>,
    pub unread_count: i64,
}
