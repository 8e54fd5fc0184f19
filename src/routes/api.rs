use axum::{
    extract::{Path, State},
    routing::{get, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::{
    error::AppError,
    models::{Activity, Trip, TripWithActivities},
    schema::{ActivityDraft, ActivityPatchDraft, CreateTripRequest, Payload, TripPatchDraft},
    services::itinerary,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/trips", post(create_trip))
        .route("/trips/:id", get(get_trip).put(update_trip))
        .route("/trips/:id/activities", post(create_activity))
        .route(
            "/activities/:id",
            put(update_activity).delete(delete_activity),
        )
}

/// Persists the trip, then each activity in turn. A storage failure after the trip
/// insert leaves the trip and earlier activities in place.
async fn create_trip(
    State(state): State<AppState>,
    Payload(request): Payload<CreateTripRequest>,
) -> Result<Json<TripWithActivities>, AppError> {
    let (new_trip, bundled) = request.validate()?;

    let trip = state.repository.create_trip(new_trip).await?;
    let mut activities = Vec::with_capacity(bundled.len());
    for fields in bundled {
        let activity = state
            .repository
            .create_activity(fields.for_trip(&trip.id))
            .await?;
        activities.push(activity);
    }

    info!(trip_id = %trip.id, activities = activities.len(), "trip created");
    Ok(Json(state.trip_with_activities(trip, activities)))
}

async fn get_trip(
    State(state): State<AppState>,
    Path(trip_id): Path<String>,
) -> Result<Json<TripWithActivities>, AppError> {
    let trip = state
        .repository
        .get_trip(&trip_id)
        .await?
        .ok_or(AppError::NotFound("trip"))?;
    let mut activities = state.repository.get_activities_by_trip(&trip_id).await?;
    itinerary::sort_chronologically(&mut activities);

    debug!(trip_id = %trip_id, activities = activities.len(), "trip loaded");
    Ok(Json(state.trip_with_activities(trip, activities)))
}

async fn update_trip(
    State(state): State<AppState>,
    Path(trip_id): Path<String>,
    Payload(draft): Payload<TripPatchDraft>,
) -> Result<Json<Trip>, AppError> {
    let patch = draft.validate()?;
    let trip = state
        .repository
        .update_trip(&trip_id, patch)
        .await?
        .ok_or(AppError::NotFound("trip"))?;

    info!(trip_id = %trip.id, "trip updated");
    Ok(Json(trip))
}

async fn create_activity(
    State(state): State<AppState>,
    Path(trip_id): Path<String>,
    Payload(draft): Payload<ActivityDraft>,
) -> Result<Json<Activity>, AppError> {
    if state.repository.get_trip(&trip_id).await?.is_none() {
        return Err(AppError::NotFound("trip"));
    }
    let fields = draft.validate()?;
    let activity = state
        .repository
        .create_activity(fields.for_trip(trip_id))
        .await?;

    info!(trip_id = %activity.trip_id, activity_id = %activity.id, "activity created");
    Ok(Json(activity))
}

async fn update_activity(
    State(state): State<AppState>,
    Path(activity_id): Path<String>,
    Payload(draft): Payload<ActivityPatchDraft>,
) -> Result<Json<Activity>, AppError> {
    let patch = draft.validate()?;
    let activity = state
        .repository
        .update_activity(&activity_id, patch)
        .await?
        .ok_or(AppError::NotFound("activity"))?;

    info!(activity_id = %activity.id, "activity updated");
    Ok(Json(activity))
}

async fn delete_activity(
    State(state): State<AppState>,
    Path(activity_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    if !state.repository.delete_activity(&activity_id).await? {
        return Err(AppError::NotFound("activity"));
    }

    info!(activity_id = %activity_id, "activity deleted");
    Ok(Json(json!({ "success": true })))
}
