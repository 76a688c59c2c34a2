//! Best-effort Nominatim client for address resolution.
//!
//! Address resolution is a convenience, not a correctness requirement: every
//! failure — network, HTTP status, malformed body — degrades to
//! [`FALLBACK_ADDRESS`] (reverse) or an empty candidate list (search) and is
//! logged at `warn`. There is no retry policy.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Returned when reverse geocoding cannot produce an address.
pub const FALLBACK_ADDRESS: &str = "Address unavailable";

const DEFAULT_BASE_URL: &str = "https://nominatim.openstreetmap.org";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// A forward-search candidate: a named place with coordinates.
#[derive(Debug, Clone, Serialize)]
pub struct Place {
  pub lat:          f64,
  pub lng:          f64,
  pub display_name: String,
}

// Nominatim serialises coordinates as strings.
#[derive(Debug, Deserialize)]
struct SearchRow {
  lat:          String,
  lon:          String,
  display_name: String,
}

#[derive(Debug, Deserialize)]
struct ReverseBody {
  display_name: Option<String>,
}

/// Async client for a Nominatim-style geocoding endpoint.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct Geocoder {
  client:   reqwest::Client,
  base_url: String,
  language: String,
}

impl Geocoder {
  /// Client against the public Nominatim endpoint.
  pub fn new(language: impl Into<String>) -> Self {
    Self::with_base_url(DEFAULT_BASE_URL, language)
  }

  /// Client against a custom endpoint — used by tests and self-hosted
  /// instances.
  pub fn with_base_url(
    base_url: impl Into<String>,
    language: impl Into<String>,
  ) -> Self {
    let client = reqwest::Client::builder()
      .timeout(REQUEST_TIMEOUT)
      .build()
      .unwrap_or_default();
    Self {
      client,
      base_url: base_url.into().trim_end_matches('/').to_owned(),
      language: language.into(),
    }
  }

  /// Resolve coordinates to an address string. Never fails; falls back to
  /// [`FALLBACK_ADDRESS`].
  pub async fn reverse(&self, lat: f64, lng: f64) -> String {
    let url = format!("{}/reverse", self.base_url);
    let result = self
      .client
      .get(&url)
      .query(&[
        ("lat", lat.to_string()),
        ("lon", lng.to_string()),
        ("format", "json".to_owned()),
        ("accept-language", self.language.clone()),
      ])
      .send()
      .await;

    match result {
      Ok(resp) if resp.status().is_success() => {
        match resp.json::<ReverseBody>().await {
          Ok(body) => body.display_name.unwrap_or_else(|| {
            tracing::warn!(lat, lng, "reverse geocode returned no display name");
            FALLBACK_ADDRESS.to_owned()
          }),
          Err(err) => {
            tracing::warn!(lat, lng, %err, "reverse geocode body unreadable");
            FALLBACK_ADDRESS.to_owned()
          }
        }
      }
      Ok(resp) => {
        tracing::warn!(lat, lng, status = %resp.status(), "reverse geocode rejected");
        FALLBACK_ADDRESS.to_owned()
      }
      Err(err) => {
        tracing::warn!(lat, lng, %err, "reverse geocode unreachable");
        FALLBACK_ADDRESS.to_owned()
      }
    }
  }

  /// Free-text search for places. Never fails; returns an empty list when
  /// the service is unreachable or the body is malformed. Candidates with
  /// unparseable coordinates are skipped.
  pub async fn search(&self, query: &str) -> Vec<Place> {
    let url = format!("{}/search", self.base_url);
    let result = self
      .client
      .get(&url)
      .query(&[
        ("q", query.to_owned()),
        ("format", "json".to_owned()),
        ("accept-language", self.language.clone()),
      ])
      .send()
      .await;

    let rows: Vec<SearchRow> = match result {
      Ok(resp) if resp.status().is_success() => match resp.json().await {
        Ok(rows) => rows,
        Err(err) => {
          tracing::warn!(query, %err, "location search body unreadable");
          return Vec::new();
        }
      },
      Ok(resp) => {
        tracing::warn!(query, status = %resp.status(), "location search rejected");
        return Vec::new();
      }
      Err(err) => {
        tracing::warn!(query, %err, "location search unreachable");
        return Vec::new();
      }
    };

    rows
      .into_iter()
      .filter_map(|row| {
        let lat = row.lat.parse().ok()?;
        let lng = row.lon.parse().ok()?;
        Some(Place { lat, lng, display_name: row.display_name })
      })
      .collect()
  }
}
