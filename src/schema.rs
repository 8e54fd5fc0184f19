//! Request bodies and the checks that turn them into typed records.
//!
//! Bodies are deserialized into loose drafts first (every field optional, unknown keys
//! dropped, `id` and `tripId` never read from the client). `validate` then either yields
//! the typed record or every problem found, keyed by field path.

use std::fmt;

use async_trait::async_trait;
use axum::{
    extract::{FromRequest, Request},
    response::{IntoResponse, Response},
    Json,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

use crate::{
    error::AppError,
    models::{ActivityPatch, NewActivity, NewTrip, TripPatch},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldIssue {
    pub field: String,
    pub message: String,
}

impl FieldIssue {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<FieldIssue>);

impl ValidationErrors {
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self(vec![FieldIssue::new(field, message)])
    }

    pub fn issues(&self) -> &[FieldIssue] {
        &self.0
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.0.iter().any(|issue| issue.field == field)
    }
}

impl From<Vec<FieldIssue>> for ValidationErrors {
    fn from(issues: Vec<FieldIssue>) -> Self {
        Self(issues)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "invalid request");
        }
        for (idx, issue) in self.0.iter().enumerate() {
            if idx > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}: {}", issue.field, issue.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// JSON body extractor that reports every body problem (missing JSON content type,
/// malformed JSON, wrong shape) as a 400 validation failure with a JSON body.
pub struct Payload<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for Payload<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|rejection| {
                AppError::from(ValidationErrors::single("body", rejection.body_text()))
                    .into_response()
            })?;
        parse(value)
            .map(Payload)
            .map_err(|err| AppError::from(err).into_response())
    }
}

pub fn parse<T: DeserializeOwned>(value: Value) -> Result<T, ValidationErrors> {
    serde_json::from_value(value).map_err(|err| ValidationErrors::single("body", err.to_string()))
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripDraft {
    pub name: Option<String>,
    pub destination: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityDraft {
    pub date: Option<String>,
    pub time: Option<String>,
    pub title: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateTripRequest {
    pub trip: TripDraft,
    #[serde(default)]
    pub activities: Option<Vec<ActivityDraft>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripPatchDraft {
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub name: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub destination: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub start_date: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub end_date: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub description: Option<Option<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityPatchDraft {
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub date: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub time: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub title: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub location: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub description: Option<Option<String>>,
}

/// A validated activity that still needs its owning trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityFields {
    pub date: String,
    pub time: String,
    pub title: String,
    pub location: Option<String>,
    pub description: Option<String>,
}

impl ActivityFields {
    pub fn for_trip(self, trip_id: impl Into<String>) -> NewActivity {
        NewActivity {
            trip_id: trip_id.into(),
            date: self.date,
            time: self.time,
            title: self.title,
            location: self.location,
            description: self.description,
        }
    }
}

#[derive(Debug, Default)]
struct Checker {
    prefix: String,
    issues: Vec<FieldIssue>,
}

impl Checker {
    fn under(&mut self, prefix: impl Into<String>) -> &mut Self {
        self.prefix = prefix.into();
        self
    }

    fn push(&mut self, field: &str, message: &str) {
        let path = if self.prefix.is_empty() {
            field.to_string()
        } else {
            format!("{}.{field}", self.prefix)
        };
        self.issues.push(FieldIssue::new(path, message));
    }

    fn required(&mut self, field: &str, value: Option<String>) -> String {
        match value {
            Some(value) if !value.trim().is_empty() => value,
            Some(_) => {
                self.push(field, "must not be blank");
                String::new()
            }
            None => {
                self.push(field, "is required");
                String::new()
            }
        }
    }

    fn required_change(&mut self, field: &str, value: Option<Option<String>>) -> Option<String> {
        match value {
            None => None,
            Some(None) => {
                self.push(field, "cannot be null");
                None
            }
            Some(Some(value)) if value.trim().is_empty() => {
                self.push(field, "must not be blank");
                None
            }
            Some(Some(value)) => Some(value),
        }
    }

    fn finish<T>(self, value: T) -> Result<T, ValidationErrors> {
        if self.issues.is_empty() {
            Ok(value)
        } else {
            Err(ValidationErrors(self.issues))
        }
    }
}

/// Blank optional text is stored as null, never as "".
fn optional(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

fn optional_change(value: Option<Option<String>>) -> Option<Option<String>> {
    value.map(optional)
}

impl TripDraft {
    fn check(self, checker: &mut Checker) -> NewTrip {
        NewTrip {
            name: checker.required("name", self.name),
            destination: checker.required("destination", self.destination),
            start_date: checker.required("startDate", self.start_date),
            end_date: checker.required("endDate", self.end_date),
            description: optional(self.description),
        }
    }

    pub fn validate(self) -> Result<NewTrip, ValidationErrors> {
        let mut checker = Checker::default();
        let trip = self.check(&mut checker);
        checker.finish(trip)
    }
}

impl ActivityDraft {
    fn check(self, checker: &mut Checker) -> ActivityFields {
        ActivityFields {
            date: checker.required("date", self.date),
            time: checker.required("time", self.time),
            title: checker.required("title", self.title),
            location: optional(self.location),
            description: optional(self.description),
        }
    }

    pub fn validate(self) -> Result<ActivityFields, ValidationErrors> {
        let mut checker = Checker::default();
        let fields = self.check(&mut checker);
        checker.finish(fields)
    }
}

impl CreateTripRequest {
    /// Checks the trip and every bundled activity, so nothing is persisted for a
    /// request that would fail halfway through.
    pub fn validate(self) -> Result<(NewTrip, Vec<ActivityFields>), ValidationErrors> {
        let mut checker = Checker::default();
        let trip = self.trip.check(checker.under("trip"));
        let activities = self
            .activities
            .unwrap_or_default()
            .into_iter()
            .enumerate()
            .map(|(idx, draft)| draft.check(checker.under(format!("activities[{idx}]"))))
            .collect::<Vec<_>>();
        checker.finish((trip, activities))
    }
}

impl TripPatchDraft {
    pub fn validate(self) -> Result<TripPatch, ValidationErrors> {
        let mut checker = Checker::default();
        let patch = TripPatch {
            name: checker.required_change("name", self.name),
            destination: checker.required_change("destination", self.destination),
            start_date: checker.required_change("startDate", self.start_date),
            end_date: checker.required_change("endDate", self.end_date),
            description: optional_change(self.description),
        };
        checker.finish(patch)
    }
}

impl ActivityPatchDraft {
    pub fn validate(self) -> Result<ActivityPatch, ValidationErrors> {
        let mut checker = Checker::default();
        let patch = ActivityPatch {
            date: checker.required_change("date", self.date),
            time: checker.required_change("time", self.time),
            title: checker.required_change("title", self.title),
            location: optional_change(self.location),
            description: optional_change(self.description),
        };
        checker.finish(patch)
    }
}
