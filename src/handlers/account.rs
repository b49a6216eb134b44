// region:    --- Imports
use crate::account::commands;
use crate::account::model::{LoginCommand, RegisterCommand, UpdateProfileCommand};
use crate::auth::{parse_bearer, AuthUser};
use crate::handlers::{error_response, query_error_response};
use crate::AppState;
use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;

// endregion: --- Imports

/// 회원 가입 처리
pub async fn handle_register(
    State((db_manager, _)): State<AppState>,
    Json(cmd): Json<RegisterCommand>,
) -> impl IntoResponse {
    match commands::register(&db_manager, cmd).await {
        Ok(profile) => (StatusCode::CREATED, Json(profile)).into_response(),
        Err(e) => error_response(e),
    }
}

/// 로그인 처리
pub async fn handle_login(
    State((db_manager, _)): State<AppState>,
    Json(cmd): Json<LoginCommand>,
) -> impl IntoResponse {
    match commands::login(&db_manager, cmd).await {
        Ok(response) => Json(response).into_response(),
        Err(e) => error_response(e),
    }
}

/// 로그아웃 처리 (현재 세션 무효화)
pub async fn handle_logout(
    State((db_manager, _)): State<AppState>,
    _auth: AuthUser,
    headers: HeaderMap,
) -> impl IntoResponse {
    let header = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());
    let Some(token) = parse_bearer(header) else {
        return StatusCode::UNAUTHORIZED.into_response();
    };
    match commands::logout(&db_manager, token).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => query_error_response(&e),
    }
}

/// 내 프로필 조회
pub async fn handle_me(
    State((db_manager, _)): State<AppState>,
    auth: AuthUser,
) -> impl IntoResponse {
    match commands::get_profile(&db_manager, auth.user_id).await {
        Ok(profile) => Json(profile).into_response(),
        Err(e) => query_error_response(&e),
    }
}

/// 프로필 조회
pub async fn handle_get_user(
    State((db_manager, _)): State<AppState>,
    Path(user_id): Path<i64>,
) -> impl IntoResponse {
    match commands::get_profile(&db_manager, user_id).await {
        Ok(profile) => Json(profile).into_response(),
        Err(e) => query_error_response(&e),
    }
}

/// 프로필 수정 처리
pub async fn handle_update_profile(
    State((db_manager, _)): State<AppState>,
    auth: AuthUser,
    Json(cmd): Json<UpdateProfileCommand>,
) -> impl IntoResponse {
    match commands::update_profile(&db_manager, auth.user_id, cmd).await {
        Ok(profile) => Json(profile).into_response(),
        Err(e) => error_response(e),
    }
}

/// 탈퇴 처리
pub async fn handle_delete_account(
    State((db_manager, _)): State<AppState>,
    auth: AuthUser,
) -> impl IntoResponse {
    match commands::delete_account(&db_manager, auth.user_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e),
    }
}
