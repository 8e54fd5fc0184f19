pub mod itinerary;
pub mod memory;
pub mod sqlite;
pub mod storage;
