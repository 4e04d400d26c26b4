use serde::Deserialize;
use time::Date;

#[derive(Debug, Deserialize)]
pub struct CreateSectionRequest {
    pub section_number: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub start_date: Date,
    pub end_date: Date,
    #[serde(default)]
    pub budget: f64,
}

#[derive(Debug, Deserialize)]
pub struct UpdateSectionRequest {
    pub section_number: Option<i64>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    pub budget: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct CreateActivityRequest {
    pub day_number: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub expense: f64,
    #[serde(default)]
    pub activity_type: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateActivityRequest {
    pub day_number: Option<i64>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub expense: Option<f64>,
    pub activity_type: Option<String>,
}
