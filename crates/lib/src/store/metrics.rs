//! Per-listing daily engagement metrics and the owner dashboard.

use super::{Acknowledgement, PostgrestQuery, Prefer, SupabaseClient};
use crate::{coerce, errors::StoreError};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::{collections::BTreeMap, fmt, str::FromStr};
use tracing::{debug, info};

pub const METRICS_TABLE: &str = "pg_metrics";
pub const LISTINGS_TABLE: &str = "pg_listings";
pub const DEFAULT_DASHBOARD_DAYS: i64 = 30;
pub const TOP_LISTINGS: usize = 5;
pub const MAX_DASHBOARD_DAYS: i64 = 3650;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricKind {
    Views,
    Inquiries,
    Saves,
    Clicks,
}

impl MetricKind {
    pub fn column(self) -> &'static str {
        match self {
            Self::Views => "views",
            Self::Inquiries => "inquiries",
            Self::Saves => "saves",
            Self::Clicks => "clicks",
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

impl FromStr for MetricKind {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "views" => Ok(Self::Views),
            "inquiries" => Ok(Self::Inquiries),
            "saves" => Ok(Self::Saves),
            "clicks" => Ok(Self::Clicks),
            _ => Err(StoreError::Invalid("Invalid metric type".to_string())),
        }
    }
}

fn count(row: &Value, column: &str) -> i64 {
    row.get(column).and_then(Value::as_i64).unwrap_or(0)
}

/// Adds one to `metric` for the listing on `date`.
///
/// This reads the current row and then writes the new value. Two concurrent
/// increments of the same listing and day can lose one update.
pub async fn increment(
    store: &SupabaseClient,
    pg_id: &str,
    metric: MetricKind,
    date: NaiveDate,
) -> Result<Acknowledgement, StoreError> {
    let date = date.format("%Y-%m-%d").to_string();
    let key = PostgrestQuery::new().eq("pg_id", pg_id).eq("date", &date);
    let existing = store.select(METRICS_TABLE, &key).await?.into_iter().next();

    match existing {
        Some(row) => {
            let value = count(&row, metric.column()) + 1;
            debug!(pg_id, %metric, value, "Updating metric row");
            let mut patch = Map::new();
            patch.insert(metric.column().to_string(), json!(value));
            store.update(METRICS_TABLE, &key, &Value::Object(patch)).await?;
        }
        None => {
            debug!(pg_id, %metric, "Creating metric row");
            let mut row = Map::new();
            row.insert("pg_id".to_string(), json!(pg_id));
            row.insert("date".to_string(), json!(date));
            row.insert(metric.column().to_string(), json!(1));
            store
                .insert(METRICS_TABLE, &Value::Object(row), Prefer::MergeDuplicates)
                .await?;
        }
    }
    Ok(Acknowledgement::new(format!("{metric} incremented")))
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyMetric {
    pub date: String,
    pub views: i64,
    pub inquiries: i64,
    pub saves: i64,
    pub clicks: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopListing {
    pub pg_id: String,
    pub pg_name: String,
    pub views: i64,
    pub inquiries: i64,
    pub saves: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    pub total_views: i64,
    pub total_inquiries: i64,
    pub total_saves: i64,
    pub total_clicks: i64,
    pub daily_metrics: Vec<DailyMetric>,
    pub top_performing: Vec<TopListing>,
}

/// Builds the dashboard from an owner's listings and their metric rows.
///
/// Daily sums are ordered by date ascending. The top listings are ranked by
/// views; ties keep the order in which the listing first appears.
pub fn aggregate(listings: &[Value], metrics: &[Value]) -> Dashboard {
    let names: BTreeMap<String, String> = listings
        .iter()
        .filter_map(|pg| {
            let id = pg.get("id").and_then(coerce::text)?;
            let name = pg.get("name").and_then(coerce::text)?;
            Some((id, name))
        })
        .collect();

    let mut dashboard = Dashboard::default();
    let mut daily: BTreeMap<String, DailyMetric> = BTreeMap::new();
    let mut per_listing: Vec<TopListing> = Vec::new();

    for row in metrics {
        let (views, inquiries, saves, clicks) = (
            count(row, "views"),
            count(row, "inquiries"),
            count(row, "saves"),
            count(row, "clicks"),
        );
        dashboard.total_views += views;
        dashboard.total_inquiries += inquiries;
        dashboard.total_saves += saves;
        dashboard.total_clicks += clicks;

        let date = row.get("date").and_then(coerce::text).unwrap_or_default();
        let day = daily.entry(date.clone()).or_insert_with(|| DailyMetric {
            date,
            ..Default::default()
        });
        day.views += views;
        day.inquiries += inquiries;
        day.saves += saves;
        day.clicks += clicks;

        let pg_id = row.get("pg_id").and_then(coerce::text).unwrap_or_default();
        match per_listing.iter_mut().find(|t| t.pg_id == pg_id) {
            Some(top) => {
                top.views += views;
                top.inquiries += inquiries;
                top.saves += saves;
            }
            None => per_listing.push(TopListing {
                pg_name: names
                    .get(&pg_id)
                    .cloned()
                    .unwrap_or_else(|| "Unknown".to_string()),
                pg_id,
                views,
                inquiries,
                saves,
            }),
        }
    }

    per_listing.sort_by(|a, b| b.views.cmp(&a.views));
    per_listing.truncate(TOP_LISTINGS);
    dashboard.daily_metrics = daily.into_values().collect();
    dashboard.top_performing = per_listing;
    dashboard
}

/// The first day of a `days`-long window ending `today`.
///
/// Windows outside `0..=MAX_DASHBOARD_DAYS` are rejected.
pub fn window_start(today: NaiveDate, days: i64) -> Result<NaiveDate, StoreError> {
    if !(0..=MAX_DASHBOARD_DAYS).contains(&days) {
        return Err(StoreError::Invalid(format!(
            "days must be between 0 and {MAX_DASHBOARD_DAYS}"
        )));
    }
    Duration::try_days(days)
        .and_then(|window| today.checked_sub_signed(window))
        .ok_or_else(|| StoreError::Invalid("days is out of range".to_string()))
}

/// Loads the owner's dashboard for the `days` days before `today`.
pub async fn dashboard(
    store: &SupabaseClient,
    owner_id: &str,
    days: i64,
    today: NaiveDate,
) -> Result<Dashboard, StoreError> {
    let since = window_start(today, days)?;
    let listings = store
        .select(
            LISTINGS_TABLE,
            &PostgrestQuery::new().eq("owner_id", owner_id).select("id,name"),
        )
        .await?;
    let ids: Vec<String> = listings
        .iter()
        .filter_map(|pg| pg.get("id").and_then(coerce::text))
        .collect();
    if ids.is_empty() {
        return Ok(Dashboard::default());
    }

    let metrics = store
        .select(
            METRICS_TABLE,
            &PostgrestQuery::new()
                .in_list("pg_id", &ids)
                .gte("date", since.format("%Y-%m-%d"))
                .order("date", true),
        )
        .await?;
    info!(owner_id, listings = ids.len(), rows = metrics.len(), "Aggregating dashboard");
    Ok(aggregate(&listings, &metrics))
}
