use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// 사용자 모델 (내부 전용, 비밀번호 해시 포함)
#[derive(Debug, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub password_hash: String,
    pub display_name: String,
    pub bio: String,
    pub avatar_url: Option<String>,
    pub average_rating: f64,
    pub total_ratings: i64,
    pub is_admin: bool,
    pub version: i64,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

// 프로필 DTO (외부 응답용, 비밀번호 해시 제외)
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserProfile {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub display_name: String,
    pub bio: String,
    pub avatar_url: Option<String>,
    pub average_rating: f64,
    pub total_ratings: i64,
    pub created_at: DateTime<Utc>,
}

/// 회원 가입 명령
#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterCommand {
    pub email: String,
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

/// 로그인 명령
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginCommand {
    pub email: String,
    pub password: String,
}

/// 프로필 수정 명령
#[derive(Debug, Serialize, Deserialize, Default)]
pub struct UpdateProfileCommand {
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
}

/// 로그인 응답
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserProfile,
}
