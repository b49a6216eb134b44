/// 메시지 전송
pub const INSERT_MESSAGE: &str = r#"
    INSERT INTO messages (sender_id, receiver_id, listing_id, content)
    VALUES ($1, $2, $3, $4)
    RETURNING id, sender_id, receiver_id, listing_id, content, is_read, created_at
"#;

/// 대화 목록 조회 (상대방별 마지막 메시지, 안 읽은 개수 포함)
pub const GET_CONVERSATIONS: &str = r#"
    SELECT DISTINCT ON (m.counterpart_id)
           m.counterpart_id,
           u.username AS counterpart_username,
           m.content AS last_message,
           m.created_at AS last_message_at,
           (SELECT COUNT(*) FROM messages
            WHERE receiver_id = $1 AND sender_id = m.counterpart_id AND is_read = FALSE
           ) AS unread_count
    FROM (
        SELECT CASE WHEN sender_id = $1 THEN receiver_id ELSE sender_id END AS counterpart_id,
               content, created_at
        FROM messages
        WHERE sender_id = $1 OR receiver_id = $1
    ) m
    JOIN users u ON u.id = m.counterpart_id
    ORDER BY m.counterpart_id, m.created_at DESC
"#;

/// 특정 상대와의 대화 조회 (오래된 순)
pub const GET_CONVERSATION_WITH: &str = r#"
    SELECT id, sender_id, receiver_id, listing_id, content, is_read, created_at
    FROM messages
    WHERE (sender_id = $1 AND receiver_id = $2) OR (sender_id = $2 AND receiver_id = $1)
    ORDER BY created_at ASC
"#;

/// 메시지 읽음 처리 (수신자만)
pub const MARK_MESSAGE_READ: &str = r#"
    UPDATE messages SET is_read = TRUE
    WHERE id = $1 AND receiver_id = $2
"#;

/// 메시지 삭제 (대화 참여자만)
pub const DELETE_MESSAGE: &str = r#"
    DELETE FROM messages
    WHERE id = $1 AND (sender_id = $2 OR receiver_id = $2)
"#;
