use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tracing::{info, instrument};

use crate::{
    auth::AuthUser,
    error::ApiError,
    itinerary::repo::list_sections_with_activities,
    state::AppState,
    trips::{
        dto::{CreateTripRequest, TripDetails, TripQuery, UpdateTripRequest},
        repo::{NewTrip, Trip, TripStatus},
    },
};

pub fn trip_routes() -> Router<AppState> {
    Router::new()
        .route("/trips", get(list_trips).post(create_trip))
        .route(
            "/trips/:id",
            get(get_trip).put(update_trip).delete(delete_trip),
        )
}

#[instrument(skip(state, payload))]
pub async fn create_trip(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<CreateTripRequest>,
) -> Result<(StatusCode, Json<Trip>), ApiError> {
    if payload.title.trim().is_empty() || payload.destination.trim().is_empty() {
        return Err(ApiError::validation("title and destination are required"));
    }
    if payload.end_date < payload.start_date {
        return Err(ApiError::validation("end date must not precede start date"));
    }

    let trip = Trip::create(
        &state.db,
        user_id,
        NewTrip {
            title: payload.title.trim(),
            destination: payload.destination.trim(),
            start_date: payload.start_date,
            end_date: payload.end_date,
            status: payload.status.unwrap_or(TripStatus::Upcoming),
            description: payload.description.as_deref(),
        },
    )
    .await?;

    info!(trip_id = %trip.id, %user_id, "trip created");
    Ok((StatusCode::CREATED, Json(trip)))
}

#[instrument(skip(state))]
pub async fn list_trips(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(q): Query<TripQuery>,
) -> Result<Json<Vec<Trip>>, ApiError> {
    let trips = Trip::list(&state.db, user_id, q.status, q.search.as_deref()).await?;
    Ok(Json(trips))
}

#[instrument(skip(state))]
pub async fn get_trip(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<TripDetails>, ApiError> {
    let trip = Trip::find_for_user(&state.db, id, user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("trip not found"))?;
    let sections = list_sections_with_activities(&state.db, trip.id).await?;
    Ok(Json(TripDetails { trip, sections }))
}

#[instrument(skip(state, payload))]
pub async fn update_trip(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateTripRequest>,
) -> Result<Json<Trip>, ApiError> {
    if let (Some(start), Some(end)) = (payload.start_date, payload.end_date) {
        if end < start {
            return Err(ApiError::validation("end date must not precede start date"));
        }
    }

    let trip = Trip::update(
        &state.db,
        id,
        user_id,
        payload.title.as_deref(),
        payload.destination.as_deref(),
        payload.start_date,
        payload.end_date,
        payload.status,
        payload.description.as_deref(),
    )
    .await?
    .ok_or_else(|| ApiError::not_found("trip not found"))?;
    Ok(Json(trip))
}

#[instrument(skip(state))]
pub async fn delete_trip(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    if !Trip::delete(&state.db, id, user_id).await? {
        return Err(ApiError::not_found("trip not found"));
    }
    info!(trip_id = %id, %user_id, "trip deleted");
    Ok(Json(json!({ "message": "trip deleted" })))
}
