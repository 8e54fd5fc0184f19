use std::sync::Arc;

use crate::{
    config::AppConfig,
    models::{Activity, Trip, TripWithActivities},
    services::storage::{SharedRepository, TripRepository},
};

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub repository: SharedRepository,
}

impl AppState {
    pub fn new(config: AppConfig, repository: impl TripRepository + 'static) -> Self {
        Self::with_shared(config, Arc::new(repository))
    }

    pub fn with_shared(config: AppConfig, repository: SharedRepository) -> Self {
        Self { config, repository }
    }

    pub fn trip_with_activities(&self, trip: Trip, activities: Vec<Activity>) -> TripWithActivities {
        let share_url = self.config.share_url(&trip.id).to_string();
        TripWithActivities {
            trip,
            activities,
            share_url,
        }
    }
}
