//! 메시지 관련 커맨드 처리
//! 1. 전송
//! 2. 읽음 처리 / 삭제

// region:    --- Imports
use crate::database::{db_error, is_foreign_key_violation, DatabaseManager};
use crate::messaging::model::{ConversationSummary, Message, SendMessageCommand};
use crate::messaging::queries;
use crate::notification::{notify, NewNotification, PostgresNotificationStore};
use tracing::info;

// endregion: --- Imports

// region:    --- Validation

/// 전송 명령 검증
pub fn validate_send(cmd: &SendMessageCommand, sender_id: i64) -> Result<(), serde_json::Value> {
    if cmd.receiver_id == sender_id {
        return Err(serde_json::json!({
            "error": "자기 자신에게는 메시지를 보낼 수 없습니다.",
            "code": "SELF_MESSAGE"
        }));
    }
    if cmd.content.trim().is_empty() {
        return Err(serde_json::json!({
            "error": "메시지 내용은 비어 있을 수 없습니다.",
            "code": "EMPTY_CONTENT"
        }));
    }
    Ok(())
}

// endregion: --- Validation

// region:    --- Commands

/// 1. 메시지 전송
pub async fn send_message(
    db_manager: &DatabaseManager,
    notification_store: &PostgresNotificationStore,
    sender_id: i64,
    cmd: SendMessageCommand,
) -> Result<Message, serde_json::Value> {
    info!(
        "{:<12} --> 메시지 전송 요청 sender: {}, receiver: {}",
        "Command", sender_id, cmd.receiver_id
    );
    validate_send(&cmd, sender_id)?;

    let message = sqlx::query_as::<_, Message>(queries::INSERT_MESSAGE)
        .bind(sender_id)
        .bind(cmd.receiver_id)
        .bind(cmd.listing_id)
        .bind(&cmd.content)
        .fetch_one(db_manager.pool())
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                serde_json::json!({
                    "error": "수신자 또는 판매글을 찾을 수 없습니다.",
                    "code": "NOT_FOUND"
                })
            } else {
                db_error(&e)
            }
        })?;

    notify(
        notification_store,
        NewNotification {
            user_id: message.receiver_id,
            notification_type: "MESSAGE_RECEIVED".to_string(),
            title: "새로운 메시지가 도착했습니다.".to_string(),
            body: message.content.chars().take(80).collect(),
            link: Some(format!("/messages/conversations/{}", message.sender_id)),
        },
    )
    .await;

    Ok(message)
}

/// 2-1. 메시지 읽음 처리 (수신자만)
pub async fn mark_read(
    db_manager: &DatabaseManager,
    user_id: i64,
    message_id: i64,
) -> Result<(), serde_json::Value> {
    info!(
        "{:<12} --> 메시지 읽음 처리 id: {}, user: {}",
        "Command", message_id, user_id
    );
    let result = sqlx::query(queries::MARK_MESSAGE_READ)
        .bind(message_id)
        .bind(user_id)
        .execute(db_manager.pool())
        .await
        .map_err(|e| db_error(&e))?;

    if result.rows_affected() == 0 {
        return Err(serde_json::json!({
            "error": "메시지를 찾을 수 없습니다.",
            "code": "NOT_FOUND"
        }));
    }
    Ok(())
}

/// 2-2. 메시지 삭제 (대화 참여자만, 하드 삭제)
pub async fn delete_message(
    db_manager: &DatabaseManager,
    user_id: i64,
    message_id: i64,
) -> Result<(), serde_json::Value> {
    info!(
        "{:<12} --> 메시지 삭제 요청 id: {}, user: {}",
        "Command", message_id, user_id
    );
    let result = sqlx::query(queries::DELETE_MESSAGE)
        .bind(message_id)
        .bind(user_id)
        .execute(db_manager.pool())
        .await
        .map_err(|e| db_error(&e))?;

    if result.rows_affected() == 0 {
        return Err(serde_json::json!({
            "error": "메시지를 찾을 수 없습니다.",
            "code": "NOT_FOUND"
        }));
    }
    Ok(())
}

// endregion: --- Commands

// region:    --- Query Handlers

/// 대화 목록 조회
pub async fn get_conversations(
    db_manager: &DatabaseManager,
    user_id: i64,
) -> Result<Vec<ConversationSummary>, sqlx::Error> {
    info!("{:<12} --> 대화 목록 조회 user: {}", "Query", user_id);
    sqlx::query_as::<_, ConversationSummary>(queries::GET_CONVERSATIONS)
        .bind(user_id)
        .fetch_all(db_manager.pool())
        .await
}

/// 특정 상대와의 대화 조회
pub async fn get_conversation_with(
    db_manager: &DatabaseManager,
    user_id: i64,
    counterpart_id: i64,
) -> Result<Vec<Message>, sqlx::Error> {
    info!(
        "{:<12} --> 대화 조회 user: {}, counterpart: {}",
        "Query", user_id, counterpart_id
    );
    sqlx::query_as::<_, Message>(queries::GET_CONVERSATION_WITH)
        .bind(user_id)
        .bind(counterpart_id)
        .fetch_all(db_manager.pool())
        .await
}

// endregion: --- Query Handlers

// region:    --- Tests

#[cfg(test)]
mod tests {
    use super::validate_send;
    use crate::messaging::model::SendMessageCommand;

    #[test]
    fn self_message_is_rejected() {
        let cmd = SendMessageCommand {
            receiver_id: 1,
            content: "안녕하세요".to_string(),
            listing_id: None,
        };
        assert_eq!(validate_send(&cmd, 1).unwrap_err()["code"], "SELF_MESSAGE");
    }

    #[test]
    fn empty_content_is_rejected() {
        let cmd = SendMessageCommand {
            receiver_id: 2,
            content: "   ".to_string(),
            listing_id: None,
        };
        assert_eq!(validate_send(&cmd, 1).unwrap_err()["code"], "EMPTY_CONTENT");
    }

    #[test]
    fn valid_message_passes() {
        let cmd = SendMessageCommand {
            receiver_id: 2,
            content: "배송 문의드립니다.".to_string(),
            listing_id: Some(10),
        };
        assert!(validate_send(&cmd, 1).is_ok());
    }
}

// endregion: --- Tests
