use std::collections::BTreeMap;
use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

use crate::domain::geo::{miles_to_meters, Coordinates};
use crate::domain::pizzeria::DiscoveredPlace;
use crate::usecase::contracts::PlaceSearch;

const USER_AGENT: &str = "PizzaFinder/1.0";

#[derive(Debug, Error)]
pub enum PlaceSearchError {
    #[error("place search request failed: {0}")]
    Transport(String),
    #[error("place search returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("place search response could not be decoded: {0}")]
    Decode(String),
}

#[derive(Deserialize)]
struct OverpassResponse {
    #[serde(default)]
    elements: Vec<OverpassElement>,
}

#[derive(Deserialize)]
struct OverpassElement {
    #[serde(rename = "type")]
    element_type: String,
    id: i64,
    lat: Option<f64>,
    lon: Option<f64>,
    center: Option<OverpassCenter>,
    #[serde(default)]
    tags: BTreeMap<String, String>,
}

#[derive(Deserialize)]
struct OverpassCenter {
    lat: f64,
    lon: f64,
}

impl OverpassElement {
    fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => self.center.as_ref().map(|c| (c.lat, c.lon)),
        }
    }

    fn tag(&self, key: &str) -> Option<String> {
        self.tags
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }

    fn into_place(self) -> Option<DiscoveredPlace> {
        let name = self.tag("name")?;
        let (latitude, longitude) = self.coordinates()?;
        if !Coordinates::new(latitude, longitude).is_valid() {
            return None;
        }

        let address = match (self.tag("addr:housenumber"), self.tag("addr:street")) {
            (Some(number), Some(street)) => Some(format!("{number} {street}")),
            (None, Some(street)) => Some(street),
            _ => None,
        };

        Some(DiscoveredPlace {
            external_id: format!("{}/{}", self.element_type, self.id),
            address,
            city: self.tag("addr:city"),
            state: self.tag("addr:state"),
            postal_code: self.tag("addr:postcode"),
            phone: self.tag("phone").or_else(|| self.tag("contact:phone")),
            website: self.tag("website").or_else(|| self.tag("contact:website")),
            opening_hours: self.tag("opening_hours"),
            latitude,
            longitude,
            name,
        })
    }
}

#[derive(Clone)]
pub struct OverpassClient {
    client: Client,
    endpoint: String,
    query_timeout_secs: u64,
}

impl OverpassClient {
    pub fn new(endpoint: String, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            endpoint,
            query_timeout_secs: timeout.as_secs().max(1),
        })
    }

    fn build_query(&self, center: Coordinates, radius_miles: f64) -> String {
        let around = format!(
            "(around:{:.0},{},{})",
            miles_to_meters(radius_miles),
            center.latitude,
            center.longitude
        );
        let selectors = [
            r#"["cuisine"~"pizza",i]"#,
            r#"["amenity"~"^(restaurant|fast_food)$"]["name"~"pizz",i]"#,
        ];

        let mut lines = Vec::with_capacity(selectors.len() * 2);
        for selector in selectors {
            for element_type in ["node", "way"] {
                lines.push(format!("  {element_type}{selector}{around};"));
            }
        }

        format!(
            "[out:json][timeout:{}];\n(\n{}\n);\nout center tags;",
            self.query_timeout_secs,
            lines.join("\n")
        )
    }
}

impl PlaceSearch for OverpassClient {
    #[tracing::instrument(skip(self), fields(lat = center.latitude, lng = center.longitude, radius_miles))]
    async fn search_nearby(
        &self,
        center: Coordinates,
        radius_miles: f64,
    ) -> Result<Vec<DiscoveredPlace>, PlaceSearchError> {
        tracing::debug!("querying overpass for pizzerias");

        let query = self.build_query(center, radius_miles);
        let resp = self
            .client
            .post(&self.endpoint)
            .header(reqwest::header::ACCEPT, "application/json")
            .form(&[("data", query)])
            .send()
            .await
            .map_err(|e| PlaceSearchError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(PlaceSearchError::Status {
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            });
        }

        let data: OverpassResponse = resp
            .json()
            .await
            .map_err(|e| PlaceSearchError::Decode(e.to_string()))?;

        let total = data.elements.len();
        let places: Vec<DiscoveredPlace> = data
            .elements
            .into_iter()
            .filter_map(OverpassElement::into_place)
            .collect();

        tracing::debug!(total, usable = places.len(), "overpass response decoded");
        Ok(places)
    }
}
