use serde::{Deserialize, Serialize};
use time::Date;

use crate::itinerary::repo::SectionWithActivities;
use crate::trips::repo::{Trip, TripStatus};

#[derive(Debug, Deserialize)]
pub struct CreateTripRequest {
    pub title: String,
    pub destination: String,
    pub start_date: Date,
    pub end_date: Date,
    #[serde(default)]
    pub status: Option<TripStatus>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTripRequest {
    pub title: Option<String>,
    pub destination: Option<String>,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    pub status: Option<TripStatus>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TripQuery {
    pub status: Option<TripStatus>,
    pub search: Option<String>,
}

/// Trip with its itinerary, sections ordered by section number.
#[derive(Debug, Serialize)]
pub struct TripDetails {
    #[serde(flatten)]
    pub trip: Trip,
    pub sections: Vec<SectionWithActivities>,
}
