use std::{env, net::SocketAddr};

use url::Url;

use crate::error::AppError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    Memory,
    Sqlite { database_url: String },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub listen_addr: SocketAddr,
    pub storage: StorageBackend,
    pub public_base_url: Url,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let listen_addr: SocketAddr = env::var("APP_LISTEN_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:3000".to_string())
            .parse()
            .map_err(|err| AppError::Config(format!("invalid APP_LISTEN_ADDR: {err}")))?;

        let storage = match env::var("TRIP_STORAGE")
            .unwrap_or_else(|_| "sqlite".to_string())
            .trim()
            .to_ascii_lowercase()
            .as_str()
        {
            "memory" => StorageBackend::Memory,
            "sqlite" => StorageBackend::Sqlite {
                database_url: env::var("DATABASE_URL")
                    .unwrap_or_else(|_| "sqlite://itinerary.db".to_string()),
            },
            other => {
                return Err(AppError::Config(format!(
                    "invalid TRIP_STORAGE {other:?}, expected \"memory\" or \"sqlite\""
                )))
            }
        };

        let public_base_url = parse_base_url(
            &env::var("PUBLIC_BASE_URL").unwrap_or_else(|_| "http://127.0.0.1:3000/".to_string()),
        )?;

        Ok(Self {
            listen_addr,
            storage,
            public_base_url,
        })
    }

    /// Link that opens the read-only itinerary page for a trip.
    pub fn share_url(&self, trip_id: &str) -> Url {
        let mut url = self.public_base_url.clone();
        // path_segments_mut only fails for cannot-be-a-base urls, which parse_base_url rejects
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("trip").push(trip_id);
        }
        url
    }
}

pub fn parse_base_url(raw: &str) -> Result<Url, AppError> {
    let url = Url::parse(raw)
        .map_err(|err| AppError::Config(format!("invalid PUBLIC_BASE_URL: {err}")))?;
    if url.cannot_be_a_base() {
        return Err(AppError::Config(format!(
            "invalid PUBLIC_BASE_URL: {raw} cannot be used as a base"
        )));
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_base(base: &str) -> AppConfig {
        AppConfig {
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            storage: StorageBackend::Memory,
            public_base_url: parse_base_url(base).expect("base url"),
        }
    }

    #[test]
    fn share_url_appends_trip_path() {
        let config = config_with_base("https://trips.example.com/");
        assert_eq!(
            config.share_url("abc-123").as_str(),
            "https://trips.example.com/trip/abc-123"
        );
    }

    #[test]
    fn share_url_keeps_mount_prefix() {
        let config = config_with_base("https://example.com/planner");
        assert_eq!(
            config.share_url("x").as_str(),
            "https://example.com/planner/trip/x"
        );
    }

    #[test]
    fn share_url_escapes_identifier() {
        let config = config_with_base("http://localhost:3000/");
        assert_eq!(
            config.share_url("a b").as_str(),
            "http://localhost:3000/trip/a%20b"
        );
    }

    #[test]
    fn rejects_non_base_urls() {
        assert!(matches!(
            parse_base_url("mailto:someone@example.com"),
            Err(AppError::Config(_))
        ));
    }
}
