//! Geolocation lookup client
//!
//! Resolves the current caller's approximate coordinates and a human-readable
//! region label from an IP geolocation service.

use super::{classify, GeoService, RemoteError};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

/// Configuration for the geolocation client
#[derive(Debug, Clone)]
pub struct GeoConfig {
    /// Lookup endpoint returning a JSON location for the caller's IP
    pub url: String,
    /// Request timeout in milliseconds
    pub timeout_ms: u64,
}

impl Default for GeoConfig {
    fn default() -> Self {
        Self {
            url: "https://ipapi.co/json/".to_string(),
            timeout_ms: 5000,
        }
    }
}

/// Location payload from the geolocation service
#[derive(Debug, Clone, Deserialize)]
pub struct GeoLocation {
    #[serde(default)]
    pub latitude: f64,
    #[serde(default)]
    pub longitude: f64,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub country_name: Option<String>,
}

impl GeoLocation {
    /// Build the "City, Region, Country" label.
    ///
    /// An unknown city reads as "Unknown"; a single trailing ", " left by an
    /// empty country is stripped.
    pub fn region_label(&self) -> String {
        let city = self.city.as_deref().unwrap_or("Unknown");
        let region = self.region.as_deref().unwrap_or("");
        let country = self.country_name.as_deref().unwrap_or("");

        let label = format!("{city}, {region}, {country}");
        label
            .strip_suffix(", ")
            .map(str::to_string)
            .unwrap_or(label)
    }
}

/// Geolocation service over HTTP
pub struct HttpGeoClient {
    client: Client,
    config: GeoConfig,
}

impl HttpGeoClient {
    /// Create a new client with the given configuration
    pub fn new(config: GeoConfig) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_millis(config.timeout_ms))
            .build()
            .expect("Failed to create HTTP client");

        Self { client, config }
    }

    /// Get the current configuration
    pub fn config(&self) -> &GeoConfig {
        &self.config
    }
}

#[async_trait]
impl GeoService for HttpGeoClient {
    async fn lookup(&self) -> Result<GeoLocation, RemoteError> {
        let response = self
            .client
            .get(&self.config.url)
            .send()
            .await
            .map_err(classify)?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(RemoteError::Api { status, message });
        }

        response
            .json()
            .await
            .map_err(|e| RemoteError::Parse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn location(city: Option<&str>, region: Option<&str>, country: Option<&str>) -> GeoLocation {
        GeoLocation {
            latitude: 0.0,
            longitude: 0.0,
            city: city.map(str::to_string),
            region: region.map(str::to_string),
            country_name: country.map(str::to_string),
        }
    }

    #[test]
    fn test_full_region_label() {
        let loc = location(Some("Tianjin"), Some("Tianjin"), Some("China"));
        assert_eq!(loc.region_label(), "Tianjin, Tianjin, China");
    }

    #[test]
    fn test_unknown_city() {
        let loc = location(None, Some("Bavaria"), Some("Germany"));
        assert_eq!(loc.region_label(), "Unknown, Bavaria, Germany");
    }

    #[test]
    fn test_missing_country_strips_trailing_separator() {
        let loc = location(Some("Tianjin"), Some("Tianjin"), None);
        assert_eq!(loc.region_label(), "Tianjin, Tianjin");
    }

    #[test]
    fn test_geo_payload_tolerates_missing_fields() {
        let loc: GeoLocation = serde_json::from_str(r#"{"city": "Paris"}"#).unwrap();
        assert_eq!(loc.latitude, 0.0);
        assert_eq!(loc.city.as_deref(), Some("Paris"));
        assert!(loc.country_name.is_none());
    }

    #[test]
    fn test_default_config() {
        let config = GeoConfig::default();
        assert_eq!(config.url, "https://ipapi.co/json/");
        assert_eq!(config.timeout_ms, 5000);
    }
}
