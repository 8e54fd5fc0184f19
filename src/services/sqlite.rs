use async_trait::async_trait;
use sqlx::{QueryBuilder, Sqlite};

use super::storage::{new_id, TripRepository};
use crate::{
    db::DbPool,
    error::AppError,
    models::{Activity, ActivityPatch, NewActivity, NewTrip, Trip, TripPatch},
};

const TRIP_COLUMNS: &str = "id, name, destination, start_date, end_date, description";
const ACTIVITY_COLUMNS: &str = "id, trip_id, date, time, title, location, description";

/// Durable backend over the `trips` and `activities` tables.
#[derive(Clone)]
pub struct SqliteStore {
    pool: DbPool,
}

impl SqliteStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn get_activity(&self, id: &str) -> Result<Option<Activity>, AppError> {
        let query = format!("SELECT {ACTIVITY_COLUMNS} FROM activities WHERE id = ?");
        let activity = sqlx::query_as::<_, Activity>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(activity)
    }
}

#[async_trait]
impl TripRepository for SqliteStore {
    async fn create_trip(&self, input: NewTrip) -> Result<Trip, AppError> {
        let trip = input.into_trip(new_id());
        sqlx::query(
            "INSERT INTO trips (id, name, destination, start_date, end_date, description) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&trip.id)
        .bind(&trip.name)
        .bind(&trip.destination)
        .bind(&trip.start_date)
        .bind(&trip.end_date)
        .bind(trip.description.as_deref())
        .execute(&self.pool)
        .await?;
        Ok(trip)
    }

    async fn get_trip(&self, id: &str) -> Result<Option<Trip>, AppError> {
        let query = format!("SELECT {TRIP_COLUMNS} FROM trips WHERE id = ?");
        let trip = sqlx::query_as::<_, Trip>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(trip)
    }

    async fn update_trip(&self, id: &str, patch: TripPatch) -> Result<Option<Trip>, AppError> {
        if patch.is_empty() {
            return self.get_trip(id).await;
        }

        let mut builder = QueryBuilder::<Sqlite>::new("UPDATE trips SET ");
        {
            let mut set = builder.separated(", ");
            if let Some(name) = patch.name {
                set.push("name = ").push_bind_unseparated(name);
            }
            if let Some(destination) = patch.destination {
                set.push("destination = ").push_bind_unseparated(destination);
            }
            if let Some(start_date) = patch.start_date {
                set.push("start_date = ").push_bind_unseparated(start_date);
            }
            if let Some(end_date) = patch.end_date {
                set.push("end_date = ").push_bind_unseparated(end_date);
            }
            if let Some(description) = patch.description {
                set.push("description = ").push_bind_unseparated(description);
            }
        }
        builder
            .push(" WHERE id = ")
            .push_bind(id.to_owned())
            .push(format!(" RETURNING {TRIP_COLUMNS}"));

        let trip = builder
            .build_query_as::<Trip>()
            .fetch_optional(&self.pool)
            .await?;
        Ok(trip)
    }

    async fn create_activity(&self, input: NewActivity) -> Result<Activity, AppError> {
        let activity = input.into_activity(new_id());
        sqlx::query(
            "INSERT INTO activities (id, trip_id, date, time, title, location, description) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&activity.id)
        .bind(&activity.trip_id)
        .bind(&activity.date)
        .bind(&activity.time)
        .bind(&activity.title)
        .bind(activity.location.as_deref())
        .bind(activity.description.as_deref())
        .execute(&self.pool)
        .await?;
        Ok(activity)
    }

    async fn get_activities_by_trip(&self, trip_id: &str) -> Result<Vec<Activity>, AppError> {
        let query = format!("SELECT {ACTIVITY_COLUMNS} FROM activities WHERE trip_id = ?");
        let activities = sqlx::query_as::<_, Activity>(&query)
            .bind(trip_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(activities)
    }

    async fn update_activity(
        &self,
        id: &str,
        patch: ActivityPatch,
    ) -> Result<Option<Activity>, AppError> {
        if patch.is_empty() {
            return self.get_activity(id).await;
        }

        let mut builder = QueryBuilder::<Sqlite>::new("UPDATE activities SET ");
        {
            let mut set = builder.separated(", ");
            if let Some(date) = patch.date {
                set.push("date = ").push_bind_unseparated(date);
            }
            if let Some(time) = patch.time {
                set.push("time = ").push_bind_unseparated(time);
            }
            if let Some(title) = patch.title {
                set.push("title = ").push_bind_unseparated(title);
            }
            if let Some(location) = patch.location {
                set.push("location = ").push_bind_unseparated(location);
            }
            if let Some(description) = patch.description {
                set.push("description = ").push_bind_unseparated(description);
            }
        }
        builder
            .push(" WHERE id = ")
            .push_bind(id.to_owned())
            .push(format!(" RETURNING {ACTIVITY_COLUMNS}"));

        let activity = builder
            .build_query_as::<Activity>()
            .fetch_optional(&self.pool)
            .await?;
        Ok(activity)
    }

    async fn delete_activity(&self, id: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM activities WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
