//! 마켓플레이스 상태 스케줄러
//! 1. 종료 일시가 지난 경매를 정산한다 (최고 입찰자 낙찰, 입찰 없으면 만료).
//! 2. 만료 일시가 지난 대기 중 제안을 만료 처리한다.

// region:    --- Imports
use crate::notification::{notify, NewNotification, PostgresNotificationStore};
use chrono::Utc;
use sqlx::{PgPool, Row};
use std::sync::Arc;
use tokio::time::{interval, Duration};
use tracing::{debug, error, info};

// endregion: --- Imports

// region:    --- Marketplace Scheduler

/// 정산 대상 경매 조회
const GET_DUE_AUCTIONS: &str = r#"
    SELECT id FROM listings
    WHERE listing_type IN ('AUCTION', 'BOTH')
      AND status = 'ACTIVE'
      AND end_date IS NOT NULL AND end_date <= $1
"#;

/// 경매 행 잠금 (정산 중 재검증)
const LOCK_DUE_AUCTION: &str = r#"
    SELECT id, seller_id, title FROM listings
    WHERE id = $1 AND status = 'ACTIVE' FOR UPDATE
"#;

/// 최고 입찰 조회 (동률 시 먼저 들어온 입찰 우선)
const GET_WINNING_BID: &str = r#"
    SELECT bidder_id, amount FROM bids
    WHERE listing_id = $1
    ORDER BY amount DESC, created_at ASC
    LIMIT 1
"#;

/// 낙찰 처리
const SETTLE_LISTING: &str = r#"
    UPDATE listings
    SET status = 'SOLD', current_price = $2, quantity_sold = quantity
    WHERE id = $1
"#;

/// 유찰 처리
const EXPIRE_LISTING: &str = "UPDATE listings SET status = 'EXPIRED' WHERE id = $1";

/// 대기 중 제안 만료 처리
const EXPIRE_PENDING_OFFERS: &str = r#"
    UPDATE offers SET status = 'EXPIRED'
    WHERE status = 'PENDING' AND expires_at <= $1
"#;

/// 마켓플레이스 상태 스케줄러
pub struct MarketplaceScheduler {
    pool: Arc<PgPool>,
    notification_store: Arc<PostgresNotificationStore>,
}

impl MarketplaceScheduler {
    pub fn new(pool: Arc<PgPool>, notification_store: Arc<PostgresNotificationStore>) -> Self {
        Self {
            pool,
            notification_store,
        }
    }

    /// 스케줄러 시작
    pub async fn start(&self) {
        let pool = Arc::clone(&self.pool);
        let notification_store = Arc::clone(&self.notification_store);
        tokio::spawn(async move {
            let mut interval = interval(Duration::from_secs(1)); // 1초마다 실행
            loop {
                interval.tick().await;
                if let Err(e) = Self::settle_due_auctions(&pool, &notification_store).await {
                    error!("{:<12} --> 경매 정산 중 오류 발생: {:?}", "Scheduler", e);
                }
                if let Err(e) = Self::expire_pending_offers(&pool).await {
                    error!("{:<12} --> 제안 만료 처리 중 오류 발생: {:?}", "Scheduler", e);
                }
            }
        });
    }

    /// 종료 일시가 지난 경매 정산
    async fn settle_due_auctions(
        pool: &PgPool,
        notification_store: &PostgresNotificationStore,
    ) -> Result<(), sqlx::Error> {
        let now = Utc::now();
        let due = sqlx::query(GET_DUE_AUCTIONS)
            .bind(now)
            .fetch_all(pool)
            .await?;

        for row in due {
            let listing_id: i64 = row.get("id");
            Self::settle_auction(pool, notification_store, listing_id).await?;
        }
        Ok(())
    }

    /// 단일 경매 정산 (트랜잭션 내에서 낙찰/유찰 확정)
    async fn settle_auction(
        pool: &PgPool,
        notification_store: &PostgresNotificationStore,
        listing_id: i64,
    ) -> Result<(), sqlx::Error> {
        let mut tx = pool.begin().await?;

        // 잠금 후 재검증 (다른 경로로 이미 판매/취소된 경우 건너뜀)
        let listing = sqlx::query(LOCK_DUE_AUCTION)
            .bind(listing_id)
            .fetch_optional(&mut *tx)
            .await?;
        let listing = match listing {
            Some(listing) => listing,
            None => {
                tx.rollback().await?;
                return Ok(());
            }
        };
        let seller_id: i64 = listing.get("seller_id");
        let title: String = listing.get("title");

        let winning_bid = sqlx::query(GET_WINNING_BID)
            .bind(listing_id)
            .fetch_optional(&mut *tx)
            .await?;

        match winning_bid {
            Some(bid) => {
                let bidder_id: i64 = bid.get("bidder_id");
                let amount: i64 = bid.get("amount");

                sqlx::query(SETTLE_LISTING)
                    .bind(listing_id)
                    .bind(amount)
                    .execute(&mut *tx)
                    .await?;
                tx.commit().await?;

                info!(
                    "{:<12} --> 경매 낙찰 listing: {}, winner: {}, amount: {}",
                    "Scheduler", listing_id, bidder_id, amount
                );

                notify(
                    notification_store,
                    NewNotification {
                        user_id: bidder_id,
                        notification_type: "AUCTION_WON".to_string(),
                        title: "낙찰되었습니다.".to_string(),
                        body: format!("'{}' 상품을 {}원에 낙찰받았습니다.", title, amount),
                        link: Some(format!("/listings/{}", listing_id)),
                    },
                )
                .await;
                notify(
                    notification_store,
                    NewNotification {
                        user_id: seller_id,
                        notification_type: "LISTING_SOLD".to_string(),
                        title: "경매가 낙찰로 종료되었습니다.".to_string(),
                        body: format!("'{}' 상품이 {}원에 낙찰되었습니다.", title, amount),
                        link: Some(format!("/listings/{}", listing_id)),
                    },
                )
                .await;
            }
            None => {
                sqlx::query(EXPIRE_LISTING)
                    .bind(listing_id)
                    .execute(&mut *tx)
                    .await?;
                tx.commit().await?;

                info!("{:<12} --> 경매 유찰 listing: {}", "Scheduler", listing_id);

                notify(
                    notification_store,
                    NewNotification {
                        user_id: seller_id,
                        notification_type: "AUCTION_ENDED".to_string(),
                        title: "경매가 입찰 없이 종료되었습니다.".to_string(),
                        body: format!("'{}' 상품이 유찰되었습니다.", title),
                        link: Some(format!("/listings/{}", listing_id)),
                    },
                )
                .await;
            }
        }

        Ok(())
    }

    /// 만료 일시가 지난 대기 중 제안 만료 처리
    async fn expire_pending_offers(pool: &PgPool) -> Result<(), sqlx::Error> {
        let now = Utc::now();
        let result = sqlx::query(EXPIRE_PENDING_OFFERS)
            .bind(now)
            .execute(pool)
            .await?;

        if result.rows_affected() > 0 {
            debug!(
                "{:<12} --> 만료 처리된 제안 수: {}",
                "Scheduler",
                result.rows_affected()
            );
        }
        Ok(())
    }
}
// endregion: --- Marketplace Scheduler
