// region:    --- Modules
pub mod account;
pub mod auth;
pub mod bidding;
pub mod cart;
pub mod database;
pub mod follow;
pub mod handlers;
pub mod listing;
pub mod messaging;
pub mod notification;
pub mod offer;
pub mod review;
pub mod scheduler;

// endregion: --- Modules

use crate::database::DatabaseManager;
use crate::notification::PostgresNotificationStore;
use std::sync::Arc;

/// 핸들러가 공유하는 애플리케이션 상태
pub type AppState = (Arc<DatabaseManager>, Arc<PostgresNotificationStore>);
