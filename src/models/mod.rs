pub mod activity;
pub mod trip;

pub use activity::{Activity, ActivityPatch, NewActivity};
pub use trip::{NewTrip, Trip, TripPatch, TripWithActivities};
