use askama::Template;
use askama_axum::IntoResponse as AskamaTemplateResponse;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};

use crate::{
    error::AppError,
    models::{Activity, Trip},
    services::itinerary::{self, ItineraryDay},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(landing))
        .route("/trips/new", get(trip_new_form))
        .route("/trip/:id", get(shared_trip))
}

#[derive(Template)]
#[template(path = "landing.html")]
struct LandingTemplate;

async fn landing() -> impl IntoResponse {
    AskamaTemplateResponse::into_response(LandingTemplate)
}

#[derive(Template)]
#[template(path = "trip_new.html")]
struct TripNewTemplate;

async fn trip_new_form() -> impl IntoResponse {
    AskamaTemplateResponse::into_response(TripNewTemplate)
}

#[derive(Template)]
#[template(path = "trip_not_found.html")]
struct TripNotFoundTemplate {
    trip_id: String,
}

fn render_trip_not_found(trip_id: String) -> Response {
    (
        StatusCode::NOT_FOUND,
        AskamaTemplateResponse::into_response(TripNotFoundTemplate { trip_id }),
    )
        .into_response()
}

/// Read view plus edit forms. The forms talk to `/api` and the page is reloaded
/// only after the server has accepted a change.
#[derive(Template)]
#[template(path = "trip.html")]
struct TripTemplate {
    trip_id: String,
    name: String,
    destination: String,
    start_date: String,
    end_date: String,
    dates: String,
    description: String,
    description_html: String,
    has_description: bool,
    share_url: String,
    days: Vec<DayView>,
}

struct DayView {
    header: String,
    activities: Vec<ActivityView>,
}

struct ActivityView {
    id: String,
    date: String,
    time: String,
    title: String,
    location: String,
    has_location: bool,
    description: String,
    description_html: String,
    has_description: bool,
}

impl From<Activity> for ActivityView {
    fn from(activity: Activity) -> Self {
        let description = activity.description.unwrap_or_default();
        Self {
            id: activity.id,
            date: activity.date,
            time: activity.time,
            title: activity.title,
            has_location: activity.location.is_some(),
            location: activity.location.unwrap_or_default(),
            has_description: !description.is_empty(),
            description_html: itinerary::linkify(&description),
            description,
        }
    }
}

impl From<ItineraryDay> for DayView {
    fn from(day: ItineraryDay) -> Self {
        Self {
            header: day.header,
            activities: day.activities.into_iter().map(ActivityView::from).collect(),
        }
    }
}

impl TripTemplate {
    fn new(trip: Trip, activities: Vec<Activity>, share_url: String) -> Self {
        let description = trip.description.unwrap_or_default();
        Self {
            dates: itinerary::format_date_range(&trip.start_date, &trip.end_date),
            trip_id: trip.id,
            name: trip.name,
            destination: trip.destination,
            start_date: trip.start_date,
            end_date: trip.end_date,
            has_description: !description.is_empty(),
            description_html: itinerary::linkify(&description),
            description,
            share_url,
            days: itinerary::group_by_day(activities)
                .into_iter()
                .map(DayView::from)
                .collect(),
        }
    }
}

async fn shared_trip(
    State(state): State<AppState>,
    Path(trip_id): Path<String>,
) -> Result<Response, AppError> {
    let Some(trip) = state.repository.get_trip(&trip_id).await? else {
        return Ok(render_trip_not_found(trip_id));
    };
    let activities = state.repository.get_activities_by_trip(&trip_id).await?;
    let share_url = state.config.share_url(&trip.id).to_string();

    Ok(AskamaTemplateResponse::into_response(TripTemplate::new(
        trip, activities, share_url,
    )))
}
