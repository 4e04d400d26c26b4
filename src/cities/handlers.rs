use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use tracing::instrument;

use crate::{
    cities::{
        dto::CityQuery,
        repo::{City, CityActivity},
    },
    error::ApiError,
    state::AppState,
};

pub fn city_routes() -> Router<AppState> {
    Router::new()
        .route("/cities", get(list_cities))
        .route("/cities/:id/activities", get(list_city_activities))
}

#[instrument(skip(state))]
pub async fn list_cities(
    State(state): State<AppState>,
    Query(q): Query<CityQuery>,
) -> Result<Json<Vec<City>>, ApiError> {
    let cities = City::list(&state.db, q.featured_only(), q.search.as_deref()).await?;
    Ok(Json(cities))
}

#[instrument(skip(state))]
pub async fn list_city_activities(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<CityActivity>>, ApiError> {
    if !City::exists(&state.db, id).await? {
        return Err(ApiError::not_found("city not found"));
    }
    let activities = CityActivity::list_for_city(&state.db, id).await?;
    Ok(Json(activities))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn seeded_cities_filter_by_featured_and_search() {
        let state = AppState::for_tests().await;

        let Json(all) = list_cities(
            State(state.clone()),
            Query(CityQuery {
                featured: None,
                search: None,
            }),
        )
        .await
        .expect("all cities");
        assert!(all.len() >= 8);

        let Json(featured) = list_cities(
            State(state.clone()),
            Query(CityQuery {
                featured: Some("1".into()),
                search: None,
            }),
        )
        .await
        .expect("featured");
        assert!(featured.iter().all(|c| c.featured));
        assert!(featured.len() < all.len());

        let Json(matched) = list_cities(
            State(state),
            Query(CityQuery {
                featured: None,
                search: Some("kyo".into()),
            }),
        )
        .await
        .expect("search");
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].name, "Kyoto");
    }

    #[tokio::test]
    async fn city_activities_require_an_existing_city() {
        let state = AppState::for_tests().await;

        let Json(acts) = list_city_activities(State(state.clone()), Path(1))
            .await
            .expect("seeded activities");
        assert!(!acts.is_empty());

        let err = list_city_activities(State(state), Path(9999))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }
}
