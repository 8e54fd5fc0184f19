use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::activity::Activity;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    pub id: String,
    pub name: String,
    pub destination: String,
    pub start_date: String,
    pub end_date: String,
    pub description: Option<String>,
}

/// Validated creation input. The id is assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTrip {
    pub name: String,
    pub destination: String,
    pub start_date: String,
    pub end_date: String,
    pub description: Option<String>,
}

impl NewTrip {
    pub fn into_trip(self, id: String) -> Trip {
        Trip {
            id,
            name: self.name,
            destination: self.destination,
            start_date: self.start_date,
            end_date: self.end_date,
            description: self.description,
        }
    }
}

/// Validated partial update.
///
/// `None` leaves the stored value alone. For `description`, `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TripPatch {
    pub name: Option<String>,
    pub destination: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub description: Option<Option<String>>,
}

impl TripPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.destination.is_none()
            && self.start_date.is_none()
            && self.end_date.is_none()
            && self.description.is_none()
    }

    pub fn apply(self, trip: &mut Trip) {
        if let Some(name) = self.name {
            trip.name = name;
        }
        if let Some(destination) = self.destination {
            trip.destination = destination;
        }
        if let Some(start_date) = self.start_date {
            trip.start_date = start_date;
        }
        if let Some(end_date) = self.end_date {
            trip.end_date = end_date;
        }
        if let Some(description) = self.description {
            trip.description = description;
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TripWithActivities {
    pub trip: Trip,
    pub activities: Vec<Activity>,
    pub share_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Trip {
        Trip {
            id: "t1".into(),
            name: "Lisbon".into(),
            destination: "Portugal".into(),
            start_date: "2024-05-01".into(),
            end_date: "2024-05-07".into(),
            description: Some("hi".into()),
        }
    }

    #[test]
    fn empty_patch_changes_nothing() {
        let mut trip = sample();
        TripPatch::default().apply(&mut trip);
        assert_eq!(trip, sample());
    }

    #[test]
    fn explicit_null_clears_description_only() {
        let mut trip = sample();
        TripPatch {
            description: Some(None),
            ..TripPatch::default()
        }
        .apply(&mut trip);
        assert_eq!(trip.description, None);
        assert_eq!(trip.name, "Lisbon");
        assert_eq!(trip.end_date, "2024-05-07");
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let value = serde_json::to_value(sample()).expect("serialize");
        assert_eq!(value["startDate"], "2024-05-01");
        assert_eq!(value["endDate"], "2024-05-07");
        assert!(value.get("start_date").is_none());
    }
}
