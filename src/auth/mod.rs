//! 인증 처리
//! 1. 비밀번호 해싱/검증 (argon2)
//! 2. 세션 토큰 파싱 및 검증 (Authorization: Bearer)

// region:    --- Imports
use crate::database::DatabaseManager;
use crate::AppState;
use argon2::password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts, StatusCode};
use axum::Json;
use tracing::warn;

// endregion: --- Imports

// region:    --- Session Queries

/// 세션 생성
pub const INSERT_SESSION: &str = r#"
    INSERT INTO sessions (token, user_id, expires_at)
    VALUES ($1, $2, now() + interval '30 days')
"#;

/// 세션 삭제 (로그아웃)
pub const DELETE_SESSION: &str = "DELETE FROM sessions WHERE token = $1";

/// 유효한 세션의 사용자 조회 (만료 및 탈퇴 사용자 제외)
pub const GET_SESSION_USER: &str = r#"
    SELECT s.user_id
    FROM sessions s
    JOIN users u ON u.id = s.user_id
    WHERE s.token = $1 AND s.expires_at > now() AND u.deleted_at IS NULL
"#;

// endregion: --- Session Queries

// region:    --- Password

/// 비밀번호 해싱
pub fn hash_password(password: &str) -> Result<String, String> {
    if password.is_empty() {
        return Err("비밀번호는 비어 있을 수 없습니다.".to_string());
    }
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| e.to_string())
}

/// 비밀번호 검증
pub fn verify_password(password_hash: &str, password: &str) -> Result<bool, String> {
    let parsed_hash = PasswordHash::new(password_hash).map_err(|e| e.to_string())?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(e.to_string()),
    }
}

// endregion: --- Password

// region:    --- Bearer Token

/// Authorization 헤더에서 Bearer 토큰 추출
pub fn parse_bearer(header: Option<&str>) -> Option<&str> {
    let token = header?.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

/// 새 세션 토큰 발급
pub fn generate_token() -> String {
    uuid::Uuid::new_v4().to_string()
}

// endregion: --- Bearer Token

// region:    --- AuthUser Extractor

/// 인증된 사용자
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub user_id: i64,
}

/// 인증 실패 응답
fn not_authenticated() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::UNAUTHORIZED,
        Json(serde_json::json!({
            "error": "인증되지 않은 요청입니다.",
            "code": "NOT_AUTHENTICATED"
        })),
    )
}

/// 세션 토큰으로 사용자 조회
pub async fn resolve_session(
    db_manager: &DatabaseManager,
    token: &str,
) -> Result<Option<i64>, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(GET_SESSION_USER)
        .bind(token)
        .fetch_optional(db_manager.pool())
        .await
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = (StatusCode, Json<serde_json::Value>);

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let (db_manager, _) = state;
        let header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok());

        // 토큰이 없으면 핸들러 진입 전에 거부
        let token = parse_bearer(header).ok_or_else(not_authenticated)?;

        let user_id = resolve_session(db_manager, token).await.map_err(|e| {
            warn!("{:<12} --> 세션 조회 오류: {:?}", "Auth", e);
            not_authenticated()
        })?;

        match user_id {
            Some(user_id) => Ok(AuthUser { user_id }),
            None => Err(not_authenticated()),
        }
    }
}

// endregion: --- AuthUser Extractor

// region:    --- Tests

#[cfg(test)]
mod tests {
    use super::{hash_password, parse_bearer, verify_password};

    #[test]
    fn parse_bearer_rejects_missing_header() {
        assert_eq!(parse_bearer(None), None);
    }

    #[test]
    fn parse_bearer_rejects_wrong_scheme() {
        assert_eq!(parse_bearer(Some("Basic abc123")), None);
        assert_eq!(parse_bearer(Some("Bearer ")), None);
    }

    #[test]
    fn parse_bearer_extracts_token() {
        assert_eq!(parse_bearer(Some("Bearer abc123")), Some("abc123"));
    }

    #[test]
    fn password_roundtrip() {
        let hash = hash_password("s3cret!").unwrap();
        assert!(verify_password(&hash, "s3cret!").unwrap());
        assert!(!verify_password(&hash, "wrong").unwrap());
    }

    #[test]
    fn empty_password_is_rejected() {
        assert!(hash_password("").is_err());
    }
}

// endregion: --- Tests
