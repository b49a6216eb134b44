// region:    --- Imports
use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post, put},
    Router,
};
use marketplace_service::database::DatabaseManager;
use marketplace_service::handlers::{
    account, bidding, cart, follow, listing, messaging, notification, offer, review,
};
use marketplace_service::notification::PostgresNotificationStore;
use marketplace_service::scheduler::MarketplaceScheduler;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};
// endregion: --- Imports

// region:    --- Main
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // logging 초기화
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .without_time()
        .with_target(false)
        .init();

    // DatabaseManager 생성
    let db_manager = Arc::new(DatabaseManager::new().await);

    // 데이터베이스 초기화
    if let Err(e) = db_manager.initialize_database().await {
        error!("{:<12} --> 데이터베이스 초기화 실패: {:?}", "Main", e);
        return Err(e.into());
    }
    info!("{:<12} --> 데이터베이스 초기화 성공", "Main");

    // 알림 저장소 생성
    let notification_store = Arc::new(PostgresNotificationStore::new(db_manager.get_pool()));

    // 경매 마감과 제안 만료를 처리하는 백그라운드 스케줄러
    let scheduler =
        MarketplaceScheduler::new(db_manager.get_pool(), Arc::clone(&notification_store));
    scheduler.start().await;

    // 테스트 페이지를 위한 cors 설정
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // 라우터 설정
    let routes_all = Router::new()
        // 계정
        .route("/users/register", post(account::handle_register))
        .route("/users/login", post(account::handle_login))
        .route("/users/logout", post(account::handle_logout))
        .route(
            "/users/me",
            get(account::handle_me)
                .put(account::handle_update_profile)
                .delete(account::handle_delete_account),
        )
        .route("/users/:id", get(account::handle_get_user))
        // 판매글
        .route(
            "/listings",
            get(listing::handle_get_listings).post(listing::handle_create_listing),
        )
        .route(
            "/listings/:id",
            get(listing::handle_get_listing)
                .put(listing::handle_update_listing)
                .delete(listing::handle_cancel_listing),
        )
        .route("/listings/:id/buy-now", post(listing::handle_buy_now))
        .route(
            "/listings/:id/highest-bid",
            get(bidding::handle_get_highest_bid),
        )
        .route("/listings/:id/offers", get(offer::handle_get_listing_offers))
        // 입찰
        .route("/bids", post(bidding::handle_place_bid))
        .route("/bids/:id", delete(bidding::handle_retract_bid))
        .route("/bids/listing/:id", get(bidding::handle_get_listing_bids))
        .route("/bids/user/my-bids", get(bidding::handle_get_my_bids))
        // 제안
        .route("/offers", post(offer::handle_create_offer))
        .route("/offers/user/my-offers", get(offer::handle_get_my_offers))
        .route("/offers/:id/accept", post(offer::handle_accept_offer))
        .route("/offers/:id/decline", post(offer::handle_decline_offer))
        .route("/offers/:id/counter", post(offer::handle_counter_offer))
        .route("/offers/:id/withdraw", post(offer::handle_withdraw_offer))
        // 장바구니 / 찜
        .route(
            "/cart",
            get(cart::handle_get_cart).post(cart::handle_add_to_cart),
        )
        .route("/cart/:listing_id", delete(cart::handle_remove_from_cart))
        .route(
            "/watchlist",
            get(cart::handle_get_watchlist).post(cart::handle_add_to_watchlist),
        )
        .route(
            "/watchlist/:listing_id",
            delete(cart::handle_remove_from_watchlist),
        )
        // 쪽지
        .route("/messages", post(messaging::handle_send_message))
        .route(
            "/messages/conversations",
            get(messaging::handle_get_conversations),
        )
        .route(
            "/messages/conversations/:user_id",
            get(messaging::handle_get_conversation_with),
        )
        .route(
            "/messages/:id/mark-read",
            put(messaging::handle_mark_message_read),
        )
        .route("/messages/:id", delete(messaging::handle_delete_message))
        // 알림
        .route(
            "/notifications",
            get(notification::handle_get_notifications),
        )
        .route(
            "/notifications/mark-all-read",
            put(notification::handle_mark_all_notifications_read),
        )
        .route(
            "/notifications/:id/mark-read",
            put(notification::handle_mark_notification_read),
        )
        // 후기
        .route("/reviews", post(review::handle_create_review))
        .route("/reviews/user/:id", get(review::handle_get_user_reviews))
        // 팔로우
        .route("/follows/followers", get(follow::handle_get_followers))
        .route("/follows/following", get(follow::handle_get_following))
        .route(
            "/follows/:user_id",
            post(follow::handle_follow).delete(follow::handle_unfollow),
        )
        .layer(cors)
        .layer(DefaultBodyLimit::max(1024 * 1024 * 20))
        .with_state((db_manager, notification_store));

    // 리스너 생성(로컬 호스트의 3000번 포트를 사용)
    let listener = TcpListener::bind("0.0.0.0:3000").await?;
    info!(
        "{:<12} --> Web Server: Listening on {}",
        "Main",
        listener.local_addr()?
    );

    // 서버 실행
    if let Err(err) = axum::serve(listener, routes_all.into_make_service()).await {
        error!("{:<12} --> Server error: {}", "Main", err);
    }
    Ok(())
}
// endregion: --- Main
