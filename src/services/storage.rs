use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    error::AppError,
    models::{Activity, ActivityPatch, NewActivity, NewTrip, Trip, TripPatch},
};

/// Persistence contract shared by the in-memory and sqlite backends.
///
/// Ids are always assigned here. Activities come back in no particular order.
#[async_trait]
pub trait TripRepository: Send + Sync {
    async fn create_trip(&self, input: NewTrip) -> Result<Trip, AppError>;

    async fn get_trip(&self, id: &str) -> Result<Option<Trip>, AppError>;

    async fn update_trip(&self, id: &str, patch: TripPatch) -> Result<Option<Trip>, AppError>;

    async fn create_activity(&self, input: NewActivity) -> Result<Activity, AppError>;

    async fn get_activities_by_trip(&self, trip_id: &str) -> Result<Vec<Activity>, AppError>;

    async fn update_activity(
        &self,
        id: &str,
        patch: ActivityPatch,
    ) -> Result<Option<Activity>, AppError>;

    /// Returns `false` when there was nothing to delete.
    async fn delete_activity(&self, id: &str) -> Result<bool, AppError>;
}

pub type SharedRepository = Arc<dyn TripRepository>;

pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}
