use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::storage::{new_id, TripRepository};
use crate::{
    error::AppError,
    models::{Activity, ActivityPatch, NewActivity, NewTrip, Trip, TripPatch},
};

/// Process-local backend. Everything is gone on restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    trips: RwLock<HashMap<String, Trip>>,
    activities: RwLock<HashMap<String, Activity>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn trip_count(&self) -> usize {
        self.trips.read().await.len()
    }

    pub async fn activity_count(&self) -> usize {
        self.activities.read().await.len()
    }
}

#[async_trait]
impl TripRepository for MemoryStore {
    async fn create_trip(&self, input: NewTrip) -> Result<Trip, AppError> {
        let trip = input.into_trip(new_id());
        self.trips
            .write()
            .await
            .insert(trip.id.clone(), trip.clone());
        Ok(trip)
    }

    async fn get_trip(&self, id: &str) -> Result<Option<Trip>, AppError> {
        Ok(self.trips.read().await.get(id).cloned())
    }

    async fn update_trip(&self, id: &str, patch: TripPatch) -> Result<Option<Trip>, AppError> {
        let mut trips = self.trips.write().await;
        Ok(trips.get_mut(id).map(|trip| {
            patch.apply(trip);
            trip.clone()
        }))
    }

    async fn create_activity(&self, input: NewActivity) -> Result<Activity, AppError> {
        let activity = input.into_activity(new_id());
        self.activities
            .write()
            .await
            .insert(activity.id.clone(), activity.clone());
        Ok(activity)
    }

    async fn get_activities_by_trip(&self, trip_id: &str) -> Result<Vec<Activity>, AppError> {
        Ok(self
            .activities
            .read()
            .await
            .values()
            .filter(|activity| activity.trip_id == trip_id)
            .cloned()
            .collect())
    }

    async fn update_activity(
        &self,
        id: &str,
        patch: ActivityPatch,
    ) -> Result<Option<Activity>, AppError> {
        let mut activities = self.activities.write().await;
        Ok(activities.get_mut(id).map(|activity| {
            patch.apply(activity);
            activity.clone()
        }))
    }

    async fn delete_activity(&self, id: &str) -> Result<bool, AppError> {
        Ok(self.activities.write().await.remove(id).is_some())
    }
}
