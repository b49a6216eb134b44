/// 팔로우 추가
pub const INSERT_FOLLOW: &str = r#"
    INSERT INTO follows (follower_id, following_id)
    VALUES ($1, $2)
    RETURNING id, follower_id, following_id, created_at
"#;

/// 팔로우 해제
pub const DELETE_FOLLOW: &str =
    "DELETE FROM follows WHERE follower_id = $1 AND following_id = $2";

/// 나를 팔로우하는 사용자 목록
pub const GET_FOLLOWERS: &str = r#"
    SELECT u.id, u.email, u.username, u.display_name, u.bio, u.avatar_url,
           u.average_rating, u.total_ratings, u.created_at
    FROM users u
    JOIN follows f ON f.follower_id = u.id
    WHERE f.following_id = $1 AND u.deleted_at IS NULL
    ORDER BY f.created_at DESC
"#;

/// 내가 팔로우하는 사용자 목록
pub const GET_FOLLOWING: &str = r#"
    SELECT u.id, u.email, u.username, u.display_name, u.bio, u.avatar_url,
           u.average_rating, u.total_ratings, u.created_at
    FROM users u
    JOIN follows f ON f.following_id = u.id
    WHERE f.follower_id = $1 AND u.deleted_at IS NULL
    ORDER BY f.created_at DESC
"#;
