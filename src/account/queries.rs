/// 사용자 생성
pub const INSERT_USER: &str = r#"
    INSERT INTO users (email, username, password_hash, display_name)
    VALUES ($1, $2, $3, $4)
    RETURNING id, email, username, display_name, bio, avatar_url,
              average_rating, total_ratings, created_at
"#;

/// 이메일로 사용자 조회 (탈퇴 사용자 제외)
pub const GET_USER_BY_EMAIL: &str = r#"
    SELECT id, email, username, password_hash, display_name, bio, avatar_url,
           average_rating, total_ratings, is_admin, version, deleted_at, created_at
    FROM users
    WHERE email = $1 AND deleted_at IS NULL
"#;

/// 프로필 조회 (탈퇴 사용자 제외)
pub const GET_USER_PROFILE: &str = r#"
    SELECT id, email, username, display_name, bio, avatar_url,
           average_rating, total_ratings, created_at
    FROM users
    WHERE id = $1 AND deleted_at IS NULL
"#;

/// 프로필 버전 조회
pub const GET_USER_VERSION: &str =
    "SELECT version FROM users WHERE id = $1 AND deleted_at IS NULL";

/// 프로필 수정 (낙관적 동시성 제어: 버전 일치 시에만 반영)
pub const UPDATE_PROFILE: &str = r#"
    UPDATE users
    SET display_name = COALESCE($3, display_name),
        bio = COALESCE($4, bio),
        avatar_url = COALESCE($5, avatar_url),
        version = version + 1
    WHERE id = $1 AND version = $2 AND deleted_at IS NULL
    RETURNING id, email, username, display_name, bio, avatar_url,
              average_rating, total_ratings, created_at
"#;

/// 탈퇴 처리 (소프트 삭제)
pub const SOFT_DELETE_USER: &str =
    "UPDATE users SET deleted_at = now() WHERE id = $1 AND deleted_at IS NULL";

/// 사용자 세션 전체 삭제
pub const DELETE_USER_SESSIONS: &str = "DELETE FROM sessions WHERE user_id = $1";
