use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};

/// Destination reference data, seeded by migration.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct City {
    pub id: i64,
    pub name: String,
    pub country: String,
    pub description: String,
    pub featured: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CityActivity {
    pub id: i64,
    pub city_id: i64,
    pub name: String,
    pub description: String,
    pub category: String,
    pub typical_cost: f64,
}

impl City {
    pub async fn list(
        db: &SqlitePool,
        featured_only: bool,
        search: Option<&str>,
    ) -> anyhow::Result<Vec<City>> {
        let pattern = search.map(|q| format!("%{}%", q));
        let cities = sqlx::query_as::<_, City>(
            r#"
            SELECT * FROM cities
            WHERE (?1 = 0 OR featured = 1)
              AND (?2 IS NULL OR name LIKE ?2 OR country LIKE ?2)
            ORDER BY name
            "#,
        )
        .bind(featured_only)
        .bind(pattern)
        .fetch_all(db)
        .await?;
        Ok(cities)
    }

    pub async fn exists(db: &SqlitePool, id: i64) -> anyhow::Result<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM cities WHERE id = ?")
            .bind(id)
            .fetch_one(db)
            .await?;
        Ok(count > 0)
    }
}

impl CityActivity {
    pub async fn list_for_city(db: &SqlitePool, city_id: i64) -> anyhow::Result<Vec<Self>> {
        let activities = sqlx::query_as::<_, CityActivity>(
            "SELECT * FROM city_activities WHERE city_id = ? ORDER BY name",
        )
        .bind(city_id)
        .fetch_all(db)
        .await?;
        Ok(activities)
    }
}
