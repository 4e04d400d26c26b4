use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use time::Date;

/// A leg of a trip, ordered by section number, with its own dates and
/// budget.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Section {
    pub id: i64,
    pub trip_id: i64,
    pub section_number: i64,
    pub title: String,
    pub description: Option<String>,
    pub start_date: Date,
    pub end_date: Date,
    pub budget: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Activity {
    pub id: i64,
    pub section_id: i64,
    pub day_number: i64,
    pub name: String,
    pub description: Option<String>,
    pub expense: f64,
    pub activity_type: String,
}

#[derive(Debug, Serialize)]
pub struct SectionWithActivities {
    #[serde(flatten)]
    pub section: Section,
    pub activities: Vec<Activity>,
}

pub struct NewSection<'a> {
    pub section_number: i64,
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub start_date: Date,
    pub end_date: Date,
    pub budget: f64,
}

pub struct NewActivity<'a> {
    pub day_number: i64,
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub expense: f64,
    pub activity_type: &'a str,
}

impl Section {
    pub async fn insert(
        db: &SqlitePool,
        trip_id: i64,
        new: NewSection<'_>,
    ) -> anyhow::Result<Section> {
        let section = sqlx::query_as::<_, Section>(
            r#"
            INSERT INTO itinerary_sections
                (trip_id, section_number, title, description, start_date, end_date, budget)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(trip_id)
        .bind(new.section_number)
        .bind(new.title)
        .bind(new.description)
        .bind(new.start_date)
        .bind(new.end_date)
        .bind(new.budget)
        .fetch_one(db)
        .await?;
        Ok(section)
    }

    pub async fn update(
        db: &SqlitePool,
        id: i64,
        section_number: Option<i64>,
        title: Option<&str>,
        description: Option<&str>,
        start_date: Option<Date>,
        end_date: Option<Date>,
        budget: Option<f64>,
    ) -> anyhow::Result<Option<Section>> {
        let section = sqlx::query_as::<_, Section>(
            r#"
            UPDATE itinerary_sections SET
                section_number = COALESCE(?, section_number),
                title          = COALESCE(?, title),
                description    = COALESCE(?, description),
                start_date     = COALESCE(?, start_date),
                end_date       = COALESCE(?, end_date),
                budget         = COALESCE(?, budget)
            WHERE id = ?
            RETURNING *
            "#,
        )
        .bind(section_number)
        .bind(title)
        .bind(description)
        .bind(start_date)
        .bind(end_date)
        .bind(budget)
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(section)
    }

    pub async fn delete(db: &SqlitePool, id: i64) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM itinerary_sections WHERE id = ?")
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// The trip owner for a section, if the section exists.
    pub async fn owner(db: &SqlitePool, id: i64) -> anyhow::Result<Option<i64>> {
        let owner = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT t.user_id FROM itinerary_sections s
            JOIN trips t ON t.id = s.trip_id
            WHERE s.id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(owner)
    }
}

impl Activity {
    pub async fn insert(
        db: &SqlitePool,
        section_id: i64,
        new: NewActivity<'_>,
    ) -> anyhow::Result<Activity> {
        let activity = sqlx::query_as::<_, Activity>(
            r#"
            INSERT INTO activities
                (section_id, day_number, name, description, expense, activity_type)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(section_id)
        .bind(new.day_number)
        .bind(new.name)
        .bind(new.description)
        .bind(new.expense)
        .bind(new.activity_type)
        .fetch_one(db)
        .await?;
        Ok(activity)
    }

    pub async fn update(
        db: &SqlitePool,
        id: i64,
        day_number: Option<i64>,
        name: Option<&str>,
        description: Option<&str>,
        expense: Option<f64>,
        activity_type: Option<&str>,
    ) -> anyhow::Result<Option<Activity>> {
        let activity = sqlx::query_as::<_, Activity>(
            r#"
            UPDATE activities SET
                day_number    = COALESCE(?, day_number),
                name          = COALESCE(?, name),
                description   = COALESCE(?, description),
                expense       = COALESCE(?, expense),
                activity_type = COALESCE(?, activity_type)
            WHERE id = ?
            RETURNING *
            "#,
        )
        .bind(day_number)
        .bind(name)
        .bind(description)
        .bind(expense)
        .bind(activity_type)
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(activity)
    }

    pub async fn delete(db: &SqlitePool, id: i64) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM activities WHERE id = ?")
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// The trip owner for an activity, through its section.
    pub async fn owner(db: &SqlitePool, id: i64) -> anyhow::Result<Option<i64>> {
        let owner = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT t.user_id FROM activities a
            JOIN itinerary_sections s ON s.id = a.section_id
            JOIN trips t ON t.id = s.trip_id
            WHERE a.id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(owner)
    }
}

/// All sections of a trip with their activities, one query each, grouped
/// in memory.
pub async fn list_sections_with_activities(
    db: &SqlitePool,
    trip_id: i64,
) -> anyhow::Result<Vec<SectionWithActivities>> {
    let sections = sqlx::query_as::<_, Section>(
        "SELECT * FROM itinerary_sections WHERE trip_id = ? ORDER BY section_number",
    )
    .bind(trip_id)
    .fetch_all(db)
    .await?;

    let activities = sqlx::query_as::<_, Activity>(
        r#"
        SELECT a.* FROM activities a
        JOIN itinerary_sections s ON s.id = a.section_id
        WHERE s.trip_id = ?
        ORDER BY a.day_number, a.id
        "#,
    )
    .bind(trip_id)
    .fetch_all(db)
    .await?;

    let mut grouped: Vec<SectionWithActivities> = sections
        .into_iter()
        .map(|section| SectionWithActivities {
            section,
            activities: Vec::new(),
        })
        .collect();
    for activity in activities {
        if let Some(entry) = grouped
            .iter_mut()
            .find(|s| s.section.id == activity.section_id)
        {
            entry.activities.push(activity);
        }
    }
    Ok(grouped)
}
