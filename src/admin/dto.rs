use serde::Serialize;
use std::collections::BTreeMap;

/// Per-day creation counts for the dashboard activity panel.
#[derive(Debug, Serialize, Default, PartialEq)]
pub struct ActivityBucket {
    pub date: String,
    pub users: i64,
    pub trips: i64,
    pub posts: i64,
}

#[derive(Debug, Serialize)]
pub struct AdminStats {
    pub total_users: i64,
    pub total_trips: i64,
    pub total_cities: i64,
    pub total_posts: i64,
    pub trips_by_status: BTreeMap<String, i64>,
    pub recent_activity: Vec<ActivityBucket>,
}
