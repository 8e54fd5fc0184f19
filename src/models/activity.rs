use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: String,
    pub trip_id: String,
    pub date: String,
    /// "HH:MM", ordered as plain text.
    pub time: String,
    pub title: String,
    pub location: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewActivity {
    pub trip_id: String,
    pub date: String,
    pub time: String,
    pub title: String,
    pub location: Option<String>,
    pub description: Option<String>,
}

impl NewActivity {
    pub fn into_activity(self, id: String) -> Activity {
        Activity {
            id,
            trip_id: self.trip_id,
            date: self.date,
            time: self.time,
            title: self.title,
            location: self.location,
            description: self.description,
        }
    }
}

/// Validated partial update. The owning trip cannot be changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivityPatch {
    pub date: Option<String>,
    pub time: Option<String>,
    pub title: Option<String>,
    pub location: Option<Option<String>>,
    pub description: Option<Option<String>>,
}

impl ActivityPatch {
    pub fn is_empty(&self) -> bool {
        self.date.is_none()
            && self.time.is_none()
            && self.title.is_none()
            && self.location.is_none()
            && self.description.is_none()
    }

    pub fn apply(self, activity: &mut Activity) {
        if let Some(date) = self.date {
            activity.date = date;
        }
        if let Some(time) = self.time {
            activity.time = time;
        }
        if let Some(title) = self.title {
            activity.title = title;
        }
        if let Some(location) = self.location {
            activity.location = location;
        }
        if let Some(description) = self.description {
            activity.description = description;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patch_touches_only_supplied_fields() {
        let mut activity = Activity {
            id: "a1".into(),
            trip_id: "t1".into(),
            date: "2024-05-01".into(),
            time: "09:00".into(),
            title: "Tram 28".into(),
            location: Some("Martim Moniz".into()),
            description: None,
        };
        ActivityPatch {
            time: Some("10:30".into()),
            location: Some(None),
            ..ActivityPatch::default()
        }
        .apply(&mut activity);

        assert_eq!(activity.time, "10:30");
        assert_eq!(activity.location, None);
        assert_eq!(activity.title, "Tram 28");
        assert_eq!(activity.trip_id, "t1");
    }
}
