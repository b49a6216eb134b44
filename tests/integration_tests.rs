use chrono::{Duration, Utc};
use marketplace_service::database::DatabaseManager;
use marketplace_service::listing::commands as listing_commands;
use reqwest::Client;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::info;

const BASE_URL: &str = "http://localhost:3000";

/// 트레이싱 초기화
fn init_tracing() {
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .without_time()
        .with_target(false)
        .with_test_writer()
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

/// 데이터베이스 매니저 설정
async fn setup() -> Arc<DatabaseManager> {
    Arc::new(DatabaseManager::new().await)
}

/// 테스트용 회원 가입 및 로그인 (토큰과 회원 ID 반환)
async fn register_and_login(client: &Client, tag: &str) -> (String, i64) {
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    let email = format!("{}-{}@test.com", tag, suffix);
    let username = format!("{}_{}", tag, &suffix[..8]);

    let response = client
        .post(format!("{}/users/register", BASE_URL))
        .json(&json!({
            "email": email,
            "username": username,
            "password": "test-password-1"
        }))
        .send()
        .await
        .expect("회원 가입 요청 실패");
    assert_eq!(response.status(), reqwest::StatusCode::CREATED);

    let response = client
        .post(format!("{}/users/login", BASE_URL))
        .json(&json!({ "email": email, "password": "test-password-1" }))
        .send()
        .await
        .expect("로그인 요청 실패");
    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("로그인 응답 파싱 실패");
    let token = body["token"].as_str().expect("토큰 없음").to_string();
    let user_id = body["user"]["id"].as_i64().expect("회원 ID 없음");
    (token, user_id)
}

/// 테스트용 판매글 생성 (경매)
async fn create_auction_listing(client: &Client, token: &str, title: &str) -> Value {
    let response = client
        .post(format!("{}/listings", BASE_URL))
        .bearer_auth(token)
        .json(&json!({
            "title": title,
            "description": "통합 테스트를 위한 판매글입니다.",
            "category": "electronics",
            "condition": "USED",
            "listing_type": "AUCTION",
            "price": 10000,
            "end_date": Utc::now() + Duration::hours(2)
        }))
        .send()
        .await
        .expect("판매글 생성 요청 실패");
    assert_eq!(response.status(), reqwest::StatusCode::CREATED);
    response.json().await.expect("판매글 응답 파싱 실패")
}

/// 테스트용 판매글 생성 (즉시 구매)
async fn create_buy_now_listing(client: &Client, token: &str, title: &str) -> Value {
    let response = client
        .post(format!("{}/listings", BASE_URL))
        .bearer_auth(token)
        .json(&json!({
            "title": title,
            "description": "즉시 구매 테스트를 위한 판매글입니다.",
            "category": "electronics",
            "condition": "NEW",
            "listing_type": "BUY_NOW",
            "price": 50000
        }))
        .send()
        .await
        .expect("판매글 생성 요청 실패");
    assert_eq!(response.status(), reqwest::StatusCode::CREATED);
    response.json().await.expect("판매글 응답 파싱 실패")
}

/// 테스트용 판매글 생성 (곧 종료되는 경매)
async fn create_auction_ending_soon(
    client: &Client,
    token: &str,
    title: &str,
    seconds: i64,
) -> Value {
    let response = client
        .post(format!("{}/listings", BASE_URL))
        .bearer_auth(token)
        .json(&json!({
            "title": title,
            "description": "경매 정산 테스트를 위한 판매글입니다.",
            "category": "electronics",
            "condition": "USED",
            "listing_type": "AUCTION",
            "price": 10000,
            "end_date": Utc::now() + Duration::seconds(seconds)
        }))
        .send()
        .await
        .expect("판매글 생성 요청 실패");
    assert_eq!(response.status(), reqwest::StatusCode::CREATED);
    response.json().await.expect("판매글 응답 파싱 실패")
}

/// 가입, 로그인, 입찰 흐름 테스트
#[tokio::test]
#[ignore = "실행 중인 서버와 데이터베이스 필요"]
async fn test_register_login_bid_flow() {
    let db_manager = setup().await;
    let client = Client::new();

    let (seller_token, _) = register_and_login(&client, "seller").await;
    let (bidder_token, _) = register_and_login(&client, "bidder").await;

    let listing = create_auction_listing(&client, &seller_token, "입찰 테스트 판매글").await;
    let listing_id = listing["id"].as_i64().unwrap();
    let current_price = listing["current_price"].as_i64().unwrap();

    // 입찰 처리
    let response = client
        .post(format!("{}/bids", BASE_URL))
        .bearer_auth(&bidder_token)
        .json(&json!({
            "listing_id": listing_id,
            "amount": current_price + 1000
        }))
        .send()
        .await
        .expect("입찰 요청 실패");
    assert_eq!(response.status(), reqwest::StatusCode::CREATED);

    // 데이터베이스에서 업데이트된 판매글 조회
    let updated = listing_commands::get_listing(&db_manager, listing_id)
        .await
        .unwrap();
    assert_eq!(updated.current_price, current_price + 1000);
}

/// 판매자 본인 입찰 거부 테스트
#[tokio::test]
#[ignore = "실행 중인 서버와 데이터베이스 필요"]
async fn test_seller_cannot_bid_own_listing() {
    let client = Client::new();

    let (seller_token, _) = register_and_login(&client, "selfbid").await;
    let listing = create_auction_listing(&client, &seller_token, "본인 입찰 테스트 판매글").await;

    let response = client
        .post(format!("{}/bids", BASE_URL))
        .bearer_auth(&seller_token)
        .json(&json!({
            "listing_id": listing["id"],
            "amount": 20000
        }))
        .send()
        .await
        .expect("입찰 요청 실패");
    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["code"], "OWN_LISTING");
}

/// 즉시 구매 테스트
#[tokio::test]
#[ignore = "실행 중인 서버와 데이터베이스 필요"]
async fn test_buy_now_marks_sold() {
    let client = Client::new();

    let (seller_token, _) = register_and_login(&client, "bnseller").await;
    let (buyer_token, _) = register_and_login(&client, "bnbuyer").await;

    let listing = create_buy_now_listing(&client, &seller_token, "즉시 구매 테스트 판매글").await;
    let listing_id = listing["id"].as_i64().unwrap();

    let response = client
        .post(format!("{}/listings/{}/buy-now", BASE_URL, listing_id))
        .bearer_auth(&buyer_token)
        .send()
        .await
        .expect("즉시 구매 요청 실패");
    assert!(response.status().is_success());

    let sold: Value = response.json().await.unwrap();
    assert_eq!(sold["status"], "SOLD");

    // 판매 완료 후 재구매는 거부
    let response = client
        .post(format!("{}/listings/{}/buy-now", BASE_URL, listing_id))
        .bearer_auth(&buyer_token)
        .send()
        .await
        .expect("즉시 구매 요청 실패");
    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
}

/// 장바구니 중복 추가 테스트
#[tokio::test]
#[ignore = "실행 중인 서버와 데이터베이스 필요"]
async fn test_cart_duplicate_conflict() {
    let client = Client::new();

    let (seller_token, _) = register_and_login(&client, "cartseller").await;
    let (buyer_token, _) = register_and_login(&client, "cartbuyer").await;

    let listing = create_buy_now_listing(&client, &seller_token, "장바구니 테스트 판매글").await;
    let body = json!({ "listing_id": listing["id"] });

    let response = client
        .post(format!("{}/cart", BASE_URL))
        .bearer_auth(&buyer_token)
        .json(&body)
        .send()
        .await
        .expect("장바구니 추가 요청 실패");
    assert_eq!(response.status(), reqwest::StatusCode::CREATED);

    // 같은 판매글을 다시 추가하면 409
    let response = client
        .post(format!("{}/cart", BASE_URL))
        .bearer_auth(&buyer_token)
        .json(&body)
        .send()
        .await
        .expect("장바구니 추가 요청 실패");
    assert_eq!(response.status(), reqwest::StatusCode::CONFLICT);

    let error_info: Value = response.json().await.unwrap();
    assert_eq!(error_info["code"], "ALREADY_IN_CART");
}

/// 제안과 카운터 제안 흐름 테스트
#[tokio::test]
#[ignore = "실행 중인 서버와 데이터베이스 필요"]
async fn test_offer_counter_chain() {
    init_tracing();
    let client = Client::new();

    let (seller_token, seller_id) = register_and_login(&client, "offseller").await;
    let (buyer_token, _) = register_and_login(&client, "offbuyer").await;

    let listing = create_buy_now_listing(&client, &seller_token, "제안 테스트 판매글").await;
    let listing_id = listing["id"].as_i64().unwrap();

    // 구매자 제안 생성
    let response = client
        .post(format!("{}/offers", BASE_URL))
        .bearer_auth(&buyer_token)
        .json(&json!({ "listing_id": listing_id, "amount": 40000 }))
        .send()
        .await
        .expect("제안 생성 요청 실패");
    assert_eq!(response.status(), reqwest::StatusCode::CREATED);
    let offer: Value = response.json().await.unwrap();
    let offer_id = offer["id"].as_i64().unwrap();
    assert_eq!(offer["status"], "PENDING");

    // 같은 판매글에 두 번째 대기 제안은 거부
    let response = client
        .post(format!("{}/offers", BASE_URL))
        .bearer_auth(&buyer_token)
        .json(&json!({ "listing_id": listing_id, "amount": 41000 }))
        .send()
        .await
        .expect("제안 생성 요청 실패");
    assert_eq!(response.status(), reqwest::StatusCode::CONFLICT);

    // 판매자 카운터 제안
    let response = client
        .post(format!("{}/offers/{}/counter", BASE_URL, offer_id))
        .bearer_auth(&seller_token)
        .json(&json!({ "amount": 45000 }))
        .send()
        .await
        .expect("카운터 제안 요청 실패");
    assert_eq!(response.status(), reqwest::StatusCode::CREATED);
    let counter: Value = response.json().await.unwrap();
    assert_eq!(counter["parent_offer_id"].as_i64(), Some(offer_id));
    assert_eq!(counter["proposer_id"].as_i64(), Some(seller_id));
    assert_eq!(counter["status"], "PENDING");

    // 구매자 카운터 제안 수락
    let counter_id = counter["id"].as_i64().unwrap();
    let response = client
        .post(format!("{}/offers/{}/accept", BASE_URL, counter_id))
        .bearer_auth(&buyer_token)
        .send()
        .await
        .expect("제안 수락 요청 실패");
    assert!(response.status().is_success());

    let accepted: Value = response.json().await.unwrap();
    assert_eq!(accepted["status"], "ACCEPTED");
    info!("제안 수락 완료: {:?}", accepted["id"]);

    // 수락 후 판매글 상태 확인
    let response = client
        .get(format!("{}/listings/{}", BASE_URL, listing_id))
        .send()
        .await
        .expect("판매글 조회 요청 실패");
    let sold: Value = response.json().await.unwrap();
    assert_eq!(sold["status"], "SOLD");
}

/// 후기 작성과 평점 집계 테스트
#[tokio::test]
#[ignore = "실행 중인 서버와 데이터베이스 필요"]
async fn test_review_updates_rating() {
    let client = Client::new();

    let (_, seller_id) = register_and_login(&client, "rvseller").await;
    let (reviewer_token, _) = register_and_login(&client, "reviewer").await;

    let response = client
        .post(format!("{}/reviews", BASE_URL))
        .bearer_auth(&reviewer_token)
        .json(&json!({
            "reviewed_id": seller_id,
            "rating": 4,
            "comment": "친절한 거래였습니다."
        }))
        .send()
        .await
        .expect("후기 작성 요청 실패");
    assert_eq!(response.status(), reqwest::StatusCode::CREATED);

    // 같은 대상에 대한 중복 후기는 거부
    let response = client
        .post(format!("{}/reviews", BASE_URL))
        .bearer_auth(&reviewer_token)
        .json(&json!({ "reviewed_id": seller_id, "rating": 5 }))
        .send()
        .await
        .expect("후기 작성 요청 실패");
    assert_eq!(response.status(), reqwest::StatusCode::CONFLICT);

    // 평점 집계 확인
    let response = client
        .get(format!("{}/users/{}", BASE_URL, seller_id))
        .send()
        .await
        .expect("프로필 조회 요청 실패");
    let profile: Value = response.json().await.unwrap();
    assert_eq!(profile["total_ratings"].as_i64(), Some(1));
    assert_eq!(profile["average_rating"].as_f64(), Some(4.0));
}

/// 쪽지와 알림 흐름 테스트
#[tokio::test]
#[ignore = "실행 중인 서버와 데이터베이스 필요"]
async fn test_message_and_notification_flow() {
    let client = Client::new();

    let (sender_token, sender_id) = register_and_login(&client, "msgsender").await;
    let (receiver_token, receiver_id) = register_and_login(&client, "msgrecv").await;

    let response = client
        .post(format!("{}/messages", BASE_URL))
        .bearer_auth(&sender_token)
        .json(&json!({
            "receiver_id": receiver_id,
            "content": "판매글 관련 문의드립니다."
        }))
        .send()
        .await
        .expect("쪽지 발송 요청 실패");
    assert_eq!(response.status(), reqwest::StatusCode::CREATED);

    // 수신자 대화 목록 확인
    let response = client
        .get(format!("{}/messages/conversations", BASE_URL))
        .bearer_auth(&receiver_token)
        .send()
        .await
        .expect("대화 목록 요청 실패");
    let conversations: Value = response.json().await.unwrap();
    let found = conversations
        .as_array()
        .unwrap()
        .iter()
        .any(|c| c["counterpart_id"].as_i64() == Some(sender_id));
    assert!(found);

    // 수신자 알림 확인
    let response = client
        .get(format!("{}/notifications", BASE_URL))
        .bearer_auth(&receiver_token)
        .send()
        .await
        .expect("알림 목록 요청 실패");
    let notifications: Value = response.json().await.unwrap();
    let found = notifications
        .as_array()
        .unwrap()
        .iter()
        .any(|n| n["notification_type"] == "MESSAGE_RECEIVED");
    assert!(found);
}

/// 존재하지 않는 입찰 철회 테스트
#[tokio::test]
#[ignore = "실행 중인 서버와 데이터베이스 필요"]
async fn test_retract_missing_bid_returns_not_found() {
    let client = Client::new();
    let (token, _) = register_and_login(&client, "retract").await;

    let response = client
        .delete(format!("{}/bids/{}", BASE_URL, 999_999_999))
        .bearer_auth(&token)
        .send()
        .await
        .expect("입찰 철회 요청 실패");
    assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);
}

/// 즉시 구매 가격 도달 입찰 테스트 (입찰가 대신 즉시 구매 가격으로 낙찰)
#[tokio::test]
#[ignore = "실행 중인 서버와 데이터베이스 필요"]
async fn test_bid_meeting_buy_now_price_settles() {
    let client = Client::new();

    let (seller_token, _) = register_and_login(&client, "foldseller").await;
    let (bidder_token, _) = register_and_login(&client, "foldbidder").await;

    // 즉시 구매 가격이 있는 혼합 판매글 생성
    let response = client
        .post(format!("{}/listings", BASE_URL))
        .bearer_auth(&seller_token)
        .json(&json!({
            "title": "즉시 낙찰 테스트 판매글",
            "description": "즉시 구매 가격 도달 입찰 테스트를 위한 판매글입니다.",
            "category": "electronics",
            "condition": "USED",
            "listing_type": "BOTH",
            "price": 10000,
            "buy_now_price": 30000,
            "end_date": Utc::now() + Duration::hours(2)
        }))
        .send()
        .await
        .expect("판매글 생성 요청 실패");
    assert_eq!(response.status(), reqwest::StatusCode::CREATED);
    let listing: Value = response.json().await.unwrap();
    let listing_id = listing["id"].as_i64().unwrap();

    // 즉시 구매 가격 이상의 입찰
    let response = client
        .post(format!("{}/bids", BASE_URL))
        .bearer_auth(&bidder_token)
        .json(&json!({ "listing_id": listing_id, "amount": 35000 }))
        .send()
        .await
        .expect("입찰 요청 실패");
    assert_eq!(response.status(), reqwest::StatusCode::CREATED);

    let outcome: Value = response.json().await.unwrap();
    assert_eq!(outcome["settled"], true);
    assert_eq!(outcome["current_price"].as_i64(), Some(30000));
    assert_eq!(outcome["bid"]["amount"].as_i64(), Some(30000));

    // 판매글 상태 확인
    let response = client
        .get(format!("{}/listings/{}", BASE_URL, listing_id))
        .send()
        .await
        .expect("판매글 조회 요청 실패");
    let sold: Value = response.json().await.unwrap();
    assert_eq!(sold["status"], "SOLD");
    assert_eq!(sold["current_price"].as_i64(), Some(30000));
}

/// 스케줄러 경매 정산 테스트 (입찰 있으면 낙찰, 없으면 유찰)
#[tokio::test]
#[ignore = "실행 중인 서버와 데이터베이스 필요"]
async fn test_scheduler_settles_due_auctions() {
    let client = Client::new();

    let (seller_token, _) = register_and_login(&client, "schedseller").await;
    let (bidder_token, _) = register_and_login(&client, "schedbidder").await;

    // 곧 종료되는 경매 두 건 (입찰이 들어오는 건과 입찰 없는 건)
    let with_bid =
        create_auction_ending_soon(&client, &seller_token, "낙찰 예정 판매글", 3).await;
    let without_bid =
        create_auction_ending_soon(&client, &seller_token, "유찰 예정 판매글", 3).await;
    let with_bid_id = with_bid["id"].as_i64().unwrap();
    let without_bid_id = without_bid["id"].as_i64().unwrap();

    let response = client
        .post(format!("{}/bids", BASE_URL))
        .bearer_auth(&bidder_token)
        .json(&json!({ "listing_id": with_bid_id, "amount": 15000 }))
        .send()
        .await
        .expect("입찰 요청 실패");
    assert_eq!(response.status(), reqwest::StatusCode::CREATED);

    // 경매 종료 및 정산 대기
    tokio::time::sleep(tokio::time::Duration::from_secs(5)).await;

    let response = client
        .get(format!("{}/listings/{}", BASE_URL, with_bid_id))
        .send()
        .await
        .expect("판매글 조회 요청 실패");
    let settled: Value = response.json().await.unwrap();
    assert_eq!(settled["status"], "SOLD");
    assert_eq!(settled["current_price"].as_i64(), Some(15000));

    let response = client
        .get(format!("{}/listings/{}", BASE_URL, without_bid_id))
        .send()
        .await
        .expect("판매글 조회 요청 실패");
    let expired: Value = response.json().await.unwrap();
    assert_eq!(expired["status"], "EXPIRED");
}

/// 스케줄러 제안 만료 테스트
#[tokio::test]
#[ignore = "실행 중인 서버와 데이터베이스 필요"]
async fn test_scheduler_expires_pending_offers() {
    let client = Client::new();

    let (seller_token, _) = register_and_login(&client, "expseller").await;
    let (buyer_token, _) = register_and_login(&client, "expbuyer").await;

    let listing = create_buy_now_listing(&client, &seller_token, "제안 만료 테스트 판매글").await;

    // 곧 만료되는 제안 생성
    let response = client
        .post(format!("{}/offers", BASE_URL))
        .bearer_auth(&buyer_token)
        .json(&json!({
            "listing_id": listing["id"],
            "amount": 40000,
            "expires_at": Utc::now() + Duration::seconds(2)
        }))
        .send()
        .await
        .expect("제안 생성 요청 실패");
    assert_eq!(response.status(), reqwest::StatusCode::CREATED);
    let offer: Value = response.json().await.unwrap();
    let offer_id = offer["id"].as_i64().unwrap();

    // 만료 처리 대기
    tokio::time::sleep(tokio::time::Duration::from_secs(4)).await;

    let response = client
        .get(format!("{}/offers/user/my-offers", BASE_URL))
        .bearer_auth(&buyer_token)
        .send()
        .await
        .expect("제안 목록 요청 실패");
    let offers: Value = response.json().await.unwrap();
    let expired = offers
        .as_array()
        .unwrap()
        .iter()
        .find(|o| o["id"].as_i64() == Some(offer_id))
        .expect("생성한 제안을 찾을 수 없음");
    assert_eq!(expired["status"], "EXPIRED");
}

/// 동시성 입찰 테스트
#[tokio::test]
#[ignore = "실행 중인 서버와 데이터베이스 필요"]
async fn test_concurrent_bidding() {
    init_tracing();
    let db_manager = setup().await;
    let client = Client::new();

    let (seller_token, _) = register_and_login(&client, "ccseller").await;
    let listing = create_auction_listing(&client, &seller_token, "동시성 입찰 테스트 판매글").await;
    let listing_id = listing["id"].as_i64().unwrap();
    let start_price = listing["current_price"].as_i64().unwrap();

    // 20명의 입찰자 생성
    let mut bidders = Vec::with_capacity(20);
    for _ in 0..20 {
        let (token, _) = register_and_login(&client, "ccbidder").await;
        bidders.push(token);
    }

    // 동시 입찰 생성 및 처리
    let mut handles = vec![];
    for (i, token) in bidders.into_iter().enumerate() {
        let amount = start_price + (i as i64 + 1) * 1000;
        let handle = tokio::spawn(async move {
            let client = Client::new();
            let response = client
                .post(format!("{}/bids", BASE_URL))
                .bearer_auth(&token)
                .json(&json!({ "listing_id": listing_id, "amount": amount }))
                .send()
                .await
                .unwrap();
            response.status()
        });
        handles.push(handle);
    }

    let mut successful_bids = 0;
    for handle in handles {
        if handle.await.unwrap() == reqwest::StatusCode::CREATED {
            successful_bids += 1;
        }
    }
    info!("성공한 입찰 수: {}", successful_bids);
    assert!(successful_bids >= 1);

    // 최종 가격은 최고 입찰가와 일치
    let updated = listing_commands::get_listing(&db_manager, listing_id)
        .await
        .unwrap();
    assert_eq!(updated.current_price, start_price + 20 * 1000);
}
