/// 리뷰 작성
pub const INSERT_REVIEW: &str = r#"
    INSERT INTO reviews (reviewer_id, reviewed_id, listing_id, rating, comment)
    VALUES ($1, $2, $3, $4, $5)
    RETURNING id, reviewer_id, reviewed_id, listing_id, rating, comment, created_at
"#;

/// 동일 대상 리뷰 존재 여부 (listing_id 가 NULL 인 경우까지 포함해 비교)
pub const REVIEW_EXISTS: &str = r#"
    SELECT EXISTS(
        SELECT 1 FROM reviews
        WHERE reviewer_id = $1 AND reviewed_id = $2 AND listing_id IS NOT DISTINCT FROM $3
    )
"#;

/// 평점 집계 갱신 (리뷰 작성과 같은 트랜잭션에서 증분 반영)
pub const UPDATE_RATING_AGGREGATE: &str = r#"
    UPDATE users
    SET average_rating = (average_rating * total_ratings + $2) / (total_ratings + 1),
        total_ratings = total_ratings + 1
    WHERE id = $1
"#;

/// 사용자의 리뷰 목록 조회 (최신순)
pub const GET_USER_REVIEWS: &str = r#"
    SELECT id, reviewer_id, reviewed_id, listing_id, rating, comment, created_at
    FROM reviews
    WHERE reviewed_id = $1
    ORDER BY created_at DESC
"#;
