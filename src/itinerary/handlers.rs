use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use tracing::{info, instrument};

use crate::{
    auth::AuthUser,
    error::ApiError,
    itinerary::{
        dto::{
            CreateActivityRequest, CreateSectionRequest, UpdateActivityRequest,
            UpdateSectionRequest,
        },
        repo::{
            list_sections_with_activities, Activity, NewActivity, NewSection, Section,
            SectionWithActivities,
        },
    },
    state::AppState,
    trips::repo::Trip,
};

pub fn itinerary_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/itinerary/:trip_id/sections",
            get(list_itinerary).post(add_section),
        )
        .route(
            "/itinerary/sections/:id",
            put(update_section).delete(delete_section),
        )
        .route("/itinerary/sections/:id/activities", post(add_activity))
        .route(
            "/itinerary/activities/:id",
            put(update_activity).delete(delete_activity),
        )
}

/// Resolves the owning user of a section, 404 when the chain is broken.
async fn require_section_owner(
    state: &AppState,
    section_id: i64,
    user_id: i64,
) -> Result<(), ApiError> {
    match Section::owner(&state.db, section_id).await? {
        Some(owner) if owner == user_id => Ok(()),
        _ => Err(ApiError::not_found("section not found")),
    }
}

async fn require_activity_owner(
    state: &AppState,
    activity_id: i64,
    user_id: i64,
) -> Result<(), ApiError> {
    match Activity::owner(&state.db, activity_id).await? {
        Some(owner) if owner == user_id => Ok(()),
        _ => Err(ApiError::not_found("activity not found")),
    }
}

#[instrument(skip(state))]
pub async fn list_itinerary(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(trip_id): Path<i64>,
) -> Result<Json<Vec<SectionWithActivities>>, ApiError> {
    Trip::find_for_user(&state.db, trip_id, user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("trip not found"))?;
    let sections = list_sections_with_activities(&state.db, trip_id).await?;
    Ok(Json(sections))
}

#[instrument(skip(state, payload))]
pub async fn add_section(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(trip_id): Path<i64>,
    Json(payload): Json<CreateSectionRequest>,
) -> Result<(StatusCode, Json<Section>), ApiError> {
    // Parent row must exist (and belong to the caller) before children.
    Trip::find_for_user(&state.db, trip_id, user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("trip not found"))?;

    if payload.title.trim().is_empty() {
        return Err(ApiError::validation("section title is required"));
    }
    if payload.end_date < payload.start_date {
        return Err(ApiError::validation("end date must not precede start date"));
    }

    let section = Section::insert(
        &state.db,
        trip_id,
        NewSection {
            section_number: payload.section_number,
            title: payload.title.trim(),
            description: payload.description.as_deref(),
            start_date: payload.start_date,
            end_date: payload.end_date,
            budget: payload.budget,
        },
    )
    .await?;

    info!(section_id = %section.id, %trip_id, "itinerary section added");
    Ok((StatusCode::CREATED, Json(section)))
}

#[instrument(skip(state, payload))]
pub async fn update_section(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateSectionRequest>,
) -> Result<Json<Section>, ApiError> {
    require_section_owner(&state, id, user_id).await?;
    let section = Section::update(
        &state.db,
        id,
        payload.section_number,
        payload.title.as_deref(),
        payload.description.as_deref(),
        payload.start_date,
        payload.end_date,
        payload.budget,
    )
    .await?
    .ok_or_else(|| ApiError::not_found("section not found"))?;
    Ok(Json(section))
}

#[instrument(skip(state))]
pub async fn delete_section(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    require_section_owner(&state, id, user_id).await?;
    Section::delete(&state.db, id).await?;
    Ok(Json(json!({ "message": "section deleted" })))
}

#[instrument(skip(state, payload))]
pub async fn add_activity(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(section_id): Path<i64>,
    Json(payload): Json<CreateActivityRequest>,
) -> Result<(StatusCode, Json<Activity>), ApiError> {
    require_section_owner(&state, section_id, user_id).await?;

    if payload.name.trim().is_empty() {
        return Err(ApiError::validation("activity name is required"));
    }
    if payload.day_number < 1 {
        return Err(ApiError::validation("day number must be positive"));
    }

    let activity = Activity::insert(
        &state.db,
        section_id,
        NewActivity {
            day_number: payload.day_number,
            name: payload.name.trim(),
            description: payload.description.as_deref(),
            expense: payload.expense,
            activity_type: &payload.activity_type,
        },
    )
    .await?;

    info!(activity_id = %activity.id, %section_id, "activity added");
    Ok((StatusCode::CREATED, Json(activity)))
}

#[instrument(skip(state, payload))]
pub async fn update_activity(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateActivityRequest>,
) -> Result<Json<Activity>, ApiError> {
    require_activity_owner(&state, id, user_id).await?;
    let activity = Activity::update(
        &state.db,
        id,
        payload.day_number,
        payload.name.as_deref(),
        payload.description.as_deref(),
        payload.expense,
        payload.activity_type.as_deref(),
    )
    .await?
    .ok_or_else(|| ApiError::not_found("activity not found"))?;
    Ok(Json(activity))
}

#[instrument(skip(state))]
pub async fn delete_activity(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    require_activity_owner(&state, id, user_id).await?;
    Activity::delete(&state.db, id).await?;
    Ok(Json(json!({ "message": "activity deleted" })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::seed_user;
    use crate::trips::repo::{NewTrip, TripStatus};
    use time::macros::date;

    async fn seed_trip(state: &AppState, user_id: i64) -> i64 {
        Trip::create(
            &state.db,
            user_id,
            NewTrip {
                title: "Iberia loop",
                destination: "Lisbon",
                start_date: date!(2026 - 09 - 01),
                end_date: date!(2026 - 09 - 14),
                status: TripStatus::Upcoming,
                description: None,
            },
        )
        .await
        .expect("seed trip")
        .id
    }

    fn section_payload(number: i64) -> CreateSectionRequest {
        CreateSectionRequest {
            section_number: number,
            title: format!("Leg {number}"),
            description: None,
            start_date: date!(2026 - 09 - 01),
            end_date: date!(2026 - 09 - 07),
            budget: 450.0,
        }
    }

    #[tokio::test]
    async fn sections_and_activities_nest_under_the_trip() {
        let state = AppState::for_tests().await;
        let user = seed_user(&state.db, "ada@example.com", "ada").await;
        let trip_id = seed_trip(&state, user).await;

        let (_, Json(second)) = add_section(
            State(state.clone()),
            AuthUser(user),
            Path(trip_id),
            Json(section_payload(2)),
        )
        .await
        .expect("section 2");
        let (_, Json(first)) = add_section(
            State(state.clone()),
            AuthUser(user),
            Path(trip_id),
            Json(section_payload(1)),
        )
        .await
        .expect("section 1");

        add_activity(
            State(state.clone()),
            AuthUser(user),
            Path(first.id),
            Json(CreateActivityRequest {
                day_number: 1,
                name: "Tram 28".into(),
                description: None,
                expense: 3.0,
                activity_type: "sightseeing".into(),
            }),
        )
        .await
        .expect("activity");

        let Json(sections) = list_itinerary(State(state), AuthUser(user), Path(trip_id))
            .await
            .expect("list");
        assert_eq!(sections.len(), 2);
        // Ordered by section number, not insertion order.
        assert_eq!(sections[0].section.id, first.id);
        assert_eq!(sections[1].section.id, second.id);
        assert_eq!(sections[0].activities.len(), 1);
        assert!(sections[1].activities.is_empty());
    }

    #[tokio::test]
    async fn child_rows_require_an_existing_owned_parent() {
        let state = AppState::for_tests().await;
        let ada = seed_user(&state.db, "ada@example.com", "ada").await;
        let bob = seed_user(&state.db, "bob@example.com", "bob").await;
        let trip_id = seed_trip(&state, ada).await;

        let err = add_section(
            State(state.clone()),
            AuthUser(bob),
            Path(trip_id),
            Json(section_payload(1)),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));

        let err = add_section(
            State(state.clone()),
            AuthUser(ada),
            Path(9999),
            Json(section_payload(1)),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));

        let (_, Json(section)) = add_section(
            State(state.clone()),
            AuthUser(ada),
            Path(trip_id),
            Json(section_payload(1)),
        )
        .await
        .expect("section");

        let err = add_activity(
            State(state),
            AuthUser(bob),
            Path(section.id),
            Json(CreateActivityRequest {
                day_number: 1,
                name: "Sneaky".into(),
                description: None,
                expense: 0.0,
                activity_type: String::new(),
            }),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn deleting_a_trip_cascades_to_sections_and_activities() {
        let state = AppState::for_tests().await;
        let user = seed_user(&state.db, "ada@example.com", "ada").await;
        let trip_id = seed_trip(&state, user).await;

        let (_, Json(section)) = add_section(
            State(state.clone()),
            AuthUser(user),
            Path(trip_id),
            Json(section_payload(1)),
        )
        .await
        .expect("section");
        add_activity(
            State(state.clone()),
            AuthUser(user),
            Path(section.id),
            Json(CreateActivityRequest {
                day_number: 1,
                name: "Doomed".into(),
                description: None,
                expense: 0.0,
                activity_type: String::new(),
            }),
        )
        .await
        .expect("activity");

        assert!(Trip::delete(&state.db, trip_id, user).await.unwrap());

        let sections: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM itinerary_sections WHERE trip_id = ?")
                .bind(trip_id)
                .fetch_one(&state.db)
                .await
                .unwrap();
        let activities: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM activities")
            .fetch_one(&state.db)
            .await
            .unwrap();
        assert_eq!(sections, 0);
        assert_eq!(activities, 0);
    }

    #[tokio::test]
    async fn update_and_delete_respect_ownership() {
        let state = AppState::for_tests().await;
        let ada = seed_user(&state.db, "ada@example.com", "ada").await;
        let bob = seed_user(&state.db, "bob@example.com", "bob").await;
        let trip_id = seed_trip(&state, ada).await;
        let (_, Json(section)) = add_section(
            State(state.clone()),
            AuthUser(ada),
            Path(trip_id),
            Json(section_payload(1)),
        )
        .await
        .expect("section");

        let err = update_section(
            State(state.clone()),
            AuthUser(bob),
            Path(section.id),
            Json(UpdateSectionRequest {
                section_number: None,
                title: Some("hijack".into()),
                description: None,
                start_date: None,
                end_date: None,
                budget: None,
            }),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));

        let Json(updated) = update_section(
            State(state.clone()),
            AuthUser(ada),
            Path(section.id),
            Json(UpdateSectionRequest {
                section_number: None,
                title: None,
                description: None,
                start_date: None,
                end_date: None,
                budget: Some(900.0),
            }),
        )
        .await
        .expect("owner update");
        assert_eq!(updated.budget, 900.0);

        delete_section(State(state), AuthUser(ada), Path(section.id))
            .await
            .expect("owner delete");
    }
}
