//! HTTP 핸들러 (도메인별 분리)

// region:    --- Modules
pub mod account;
pub mod bidding;
pub mod cart;
pub mod follow;
pub mod listing;
pub mod messaging;
pub mod notification;
pub mod offer;
pub mod review;

// endregion: --- Modules

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

/// 오류 코드 -> HTTP 상태 코드 매핑
pub fn error_status(err: &serde_json::Value) -> StatusCode {
    match err["code"].as_str() {
        Some("NOT_FOUND") => StatusCode::NOT_FOUND,
        Some("FORBIDDEN") => StatusCode::FORBIDDEN,
        Some("NOT_AUTHENTICATED") | Some("INVALID_CREDENTIALS") => StatusCode::UNAUTHORIZED,
        Some("DUPLICATE_USER")
        | Some("DUPLICATE_REVIEW")
        | Some("ALREADY_IN_CART")
        | Some("ALREADY_IN_WATCHLIST")
        | Some("ALREADY_FOLLOWING")
        | Some("PENDING_OFFER_EXISTS") => StatusCode::CONFLICT,
        Some("DB_ERROR") | Some("HASH_ERROR") => StatusCode::INTERNAL_SERVER_ERROR,
        _ => StatusCode::BAD_REQUEST,
    }
}

/// 오류 응답 생성
pub fn error_response(err: serde_json::Value) -> Response {
    (error_status(&err), Json(err)).into_response()
}

/// 조회 오류 응답 생성 (RowNotFound 는 404 로)
pub fn query_error_response(e: &sqlx::Error) -> Response {
    error_response(crate::database::db_error(e))
}

// region:    --- Tests

#[cfg(test)]
mod tests {
    use super::error_status;
    use axum::http::StatusCode;

    #[test]
    fn not_found_maps_to_404() {
        let err = serde_json::json!({"error": "없음", "code": "NOT_FOUND"});
        assert_eq!(error_status(&err), StatusCode::NOT_FOUND);
    }

    #[test]
    fn unique_violations_map_to_409() {
        for code in ["ALREADY_IN_CART", "ALREADY_FOLLOWING", "DUPLICATE_USER"] {
            let err = serde_json::json!({"error": "중복", "code": code});
            assert_eq!(error_status(&err), StatusCode::CONFLICT);
        }
    }

    #[test]
    fn domain_rejections_map_to_400() {
        for code in ["LOW_BID", "OWN_LISTING", "OFFER_EXPIRED"] {
            let err = serde_json::json!({"error": "거부", "code": code});
            assert_eq!(error_status(&err), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn auth_failures_map_to_401() {
        let err = serde_json::json!({"error": "인증 실패", "code": "NOT_AUTHENTICATED"});
        assert_eq!(error_status(&err), StatusCode::UNAUTHORIZED);
    }
}

// endregion: --- Tests
