//! 계정 관련 커맨드 처리
//! 1. 회원 가입
//! 2. 로그인 / 로그아웃
//! 3. 프로필 조회 / 수정 / 탈퇴

// region:    --- Imports
use crate::account::model::{
    LoginCommand, LoginResponse, RegisterCommand, UpdateProfileCommand, User, UserProfile,
};
use crate::account::queries;
use crate::auth;
use crate::database::{db_error, is_unique_violation, DatabaseManager};
use tracing::{info, warn};

// endregion: --- Imports

// 최대 재시도 횟수 (낙관적 동시성 제어)
const MAX_RETRIES: i32 = 100;

// region:    --- Validation

/// 가입 명령 검증
pub fn validate_register(cmd: &RegisterCommand) -> Result<(), serde_json::Value> {
    if !cmd.email.contains('@') {
        return Err(serde_json::json!({
            "error": "올바른 이메일 형식이 아닙니다.",
            "code": "INVALID_EMAIL"
        }));
    }
    if cmd.username.trim().is_empty() || cmd.username.len() > 64 {
        return Err(serde_json::json!({
            "error": "사용자 이름은 1자 이상 64자 이하여야 합니다.",
            "code": "INVALID_USERNAME"
        }));
    }
    if cmd.password.len() < 8 {
        return Err(serde_json::json!({
            "error": "비밀번호는 8자 이상이어야 합니다.",
            "code": "WEAK_PASSWORD"
        }));
    }
    Ok(())
}

// endregion: --- Validation

// region:    --- Commands

/// 1. 회원 가입
pub async fn register(
    db_manager: &DatabaseManager,
    cmd: RegisterCommand,
) -> Result<UserProfile, serde_json::Value> {
    info!("{:<12} --> 회원 가입 요청: {}", "Command", cmd.email);
    validate_register(&cmd)?;

    let password_hash = auth::hash_password(&cmd.password)
        .map_err(|e| serde_json::json!({"error": e, "code": "HASH_ERROR"}))?;
    let display_name = cmd.display_name.unwrap_or_else(|| cmd.username.clone());

    sqlx::query_as::<_, UserProfile>(queries::INSERT_USER)
        .bind(&cmd.email)
        .bind(&cmd.username)
        .bind(&password_hash)
        .bind(&display_name)
        .fetch_one(db_manager.pool())
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                serde_json::json!({
                    "error": "이미 사용 중인 이메일 또는 사용자 이름입니다.",
                    "code": "DUPLICATE_USER"
                })
            } else {
                db_error(&e)
            }
        })
}

/// 2. 로그인
pub async fn login(
    db_manager: &DatabaseManager,
    cmd: LoginCommand,
) -> Result<LoginResponse, serde_json::Value> {
    info!("{:<12} --> 로그인 요청: {}", "Command", cmd.email);

    let invalid_credentials = || {
        serde_json::json!({
            "error": "이메일 또는 비밀번호가 올바르지 않습니다.",
            "code": "INVALID_CREDENTIALS"
        })
    };

    let user = sqlx::query_as::<_, User>(queries::GET_USER_BY_EMAIL)
        .bind(&cmd.email)
        .fetch_optional(db_manager.pool())
        .await
        .map_err(|e| db_error(&e))?
        .ok_or_else(invalid_credentials)?;

    let verified = auth::verify_password(&user.password_hash, &cmd.password)
        .map_err(|e| serde_json::json!({"error": e, "code": "HASH_ERROR"}))?;
    if !verified {
        return Err(invalid_credentials());
    }

    // 세션 발급
    let token = auth::generate_token();
    sqlx::query(auth::INSERT_SESSION)
        .bind(&token)
        .bind(user.id)
        .execute(db_manager.pool())
        .await
        .map_err(|e| db_error(&e))?;

    Ok(LoginResponse {
        token,
        user: UserProfile {
            id: user.id,
            email: user.email,
            username: user.username,
            display_name: user.display_name,
            bio: user.bio,
            avatar_url: user.avatar_url,
            average_rating: user.average_rating,
            total_ratings: user.total_ratings,
            created_at: user.created_at,
        },
    })
}

/// 로그아웃
pub async fn logout(db_manager: &DatabaseManager, token: &str) -> Result<(), sqlx::Error> {
    sqlx::query(auth::DELETE_SESSION)
        .bind(token)
        .execute(db_manager.pool())
        .await?;
    Ok(())
}

/// 프로필 조회
pub async fn get_profile(
    db_manager: &DatabaseManager,
    user_id: i64,
) -> Result<UserProfile, sqlx::Error> {
    info!("{:<12} --> 프로필 조회 id: {}", "Query", user_id);
    sqlx::query_as::<_, UserProfile>(queries::GET_USER_PROFILE)
        .bind(user_id)
        .fetch_one(db_manager.pool())
        .await
}

/// 3. 프로필 수정 (버전 충돌 시 재시도)
pub async fn update_profile(
    db_manager: &DatabaseManager,
    user_id: i64,
    cmd: UpdateProfileCommand,
) -> Result<UserProfile, serde_json::Value> {
    info!("{:<12} --> 프로필 수정 요청 id: {}", "Command", user_id);
    let mut retries = 0;

    while retries < MAX_RETRIES {
        // 현재 버전 조회
        let current_version = sqlx::query_scalar::<_, i64>(queries::GET_USER_VERSION)
            .bind(user_id)
            .fetch_optional(db_manager.pool())
            .await
            .map_err(|e| db_error(&e))?
            .ok_or_else(|| {
                serde_json::json!({
                    "error": "사용자를 찾을 수 없습니다.",
                    "code": "NOT_FOUND"
                })
            })?;

        // 버전 일치 시에만 반영
        let updated = sqlx::query_as::<_, UserProfile>(queries::UPDATE_PROFILE)
            .bind(user_id)
            .bind(current_version)
            .bind(&cmd.display_name)
            .bind(&cmd.bio)
            .bind(&cmd.avatar_url)
            .fetch_optional(db_manager.pool())
            .await
            .map_err(|e| db_error(&e))?;

        match updated {
            Some(profile) => return Ok(profile),
            None => {
                warn!(
                    "{:<12} --> 낙관적 업데이트로 인한 버전 충돌: 재시도",
                    "Command"
                );
                retries += 1;
                continue;
            }
        }
    }

    Err(serde_json::json!({
        "error": "최대 재시도 횟수 초과",
        "code": "MAX_RETRIES_EXCEEDED"
    }))
}

/// 탈퇴 처리 (소프트 삭제 후 세션 전체 무효화)
pub async fn delete_account(
    db_manager: &DatabaseManager,
    user_id: i64,
) -> Result<(), serde_json::Value> {
    info!("{:<12} --> 탈퇴 요청 id: {}", "Command", user_id);
    db_manager
        .transaction(|tx| {
            Box::pin(async move {
                sqlx::query(queries::SOFT_DELETE_USER)
                    .bind(user_id)
                    .execute(&mut **tx)
                    .await?;
                sqlx::query(queries::DELETE_USER_SESSIONS)
                    .bind(user_id)
                    .execute(&mut **tx)
                    .await?;
                Ok::<_, sqlx::Error>(())
            })
        })
        .await
        .map_err(|e| db_error(&e))
}

// endregion: --- Commands

// region:    --- Tests

#[cfg(test)]
mod tests {
    use super::validate_register;
    use crate::account::model::RegisterCommand;

    fn cmd(email: &str, username: &str, password: &str) -> RegisterCommand {
        RegisterCommand {
            email: email.to_string(),
            username: username.to_string(),
            password: password.to_string(),
            display_name: None,
        }
    }

    #[test]
    fn register_requires_email_format() {
        let err = validate_register(&cmd("not-an-email", "user", "longenough")).unwrap_err();
        assert_eq!(err["code"], "INVALID_EMAIL");
    }

    #[test]
    fn register_requires_username() {
        let err = validate_register(&cmd("a@b.com", "  ", "longenough")).unwrap_err();
        assert_eq!(err["code"], "INVALID_USERNAME");
    }

    #[test]
    fn register_requires_strong_password() {
        let err = validate_register(&cmd("a@b.com", "user", "short")).unwrap_err();
        assert_eq!(err["code"], "WEAK_PASSWORD");
    }

    #[test]
    fn register_accepts_valid_command() {
        assert!(validate_register(&cmd("a@b.com", "user", "longenough")).is_ok());
    }
}

// endregion: --- Tests
