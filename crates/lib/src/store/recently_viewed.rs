//! Per-user "recently viewed" listings.

use super::{Acknowledgement, PostgrestQuery, Prefer, SupabaseClient};
use crate::errors::StoreError;
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde_json::{json, Value};
use tracing::info;

pub const RECENTLY_VIEWED_TABLE: &str = "recently_viewed";
pub const DEFAULT_RECENT_LIMIT: usize = 10;
pub const MAX_RECENT_LIMIT: usize = 50;
/// Views older than this are not listed.
pub const RECENT_WINDOW_DAYS: i64 = 30;

/// Records that `user_id` viewed `pg_id`, refreshing `viewed_at` when the pair
/// already exists.
pub async fn record_view(
    store: &SupabaseClient,
    user_id: &str,
    pg_id: &str,
    now: DateTime<Utc>,
) -> Result<Acknowledgement, StoreError> {
    let row = json!({
        "user_id": user_id,
        "pg_id": pg_id,
        "viewed_at": now.to_rfc3339_opts(SecondsFormat::Secs, true),
    });
    store
        .insert(RECENTLY_VIEWED_TABLE, &row, Prefer::MergeDuplicates)
        .await?;
    info!(user_id, pg_id, "Recorded listing view");
    Ok(Acknowledgement::new("Added to recently viewed"))
}

/// Lists the user's most recent views, newest first.
pub async fn list_recent(
    store: &SupabaseClient,
    user_id: &str,
    limit: Option<usize>,
    now: DateTime<Utc>,
) -> Result<Vec<Value>, StoreError> {
    store
        .select(RECENTLY_VIEWED_TABLE, &recent_query(user_id, limit, now))
        .await
}

fn recent_query(user_id: &str, limit: Option<usize>, now: DateTime<Utc>) -> PostgrestQuery {
    let limit = limit
        .unwrap_or(DEFAULT_RECENT_LIMIT)
        .clamp(1, MAX_RECENT_LIMIT);
    let since = now - Duration::days(RECENT_WINDOW_DAYS);
    PostgrestQuery::new()
        .select("*")
        .eq("user_id", user_id)
        .gte("viewed_at", since.to_rfc3339_opts(SecondsFormat::Secs, true))
        .order("viewed_at", true)
        .limit(limit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn param<'a>(query: &'a PostgrestQuery, key: &str) -> Option<&'a str> {
        query
            .params()
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn recent_query_applies_window_and_limit() {
        let now = Utc.with_ymd_and_hms(2024, 3, 31, 12, 0, 0).unwrap();
        let query = recent_query("u1", None, now);
        assert_eq!(param(&query, "user_id"), Some("eq.u1"));
        assert_eq!(param(&query, "viewed_at"), Some("gte.2024-03-01T12:00:00Z"));
        assert_eq!(param(&query, "order"), Some("viewed_at.desc"));
        assert_eq!(param(&query, "limit"), Some("10"));

        assert_eq!(param(&recent_query("u1", Some(500), now), "limit"), Some("50"));
        assert_eq!(param(&recent_query("u1", Some(0), now), "limit"), Some("1"));
    }
}
