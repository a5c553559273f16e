use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::geo::Coordinates;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "pizzeria_source", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PizzeriaSource {
    User,
    Openstreetmap,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Pizzeria {
    pub id: Uuid,
    pub name: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub verified: bool,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub opening_hours: Option<String>,
    pub cuisine_styles: Vec<String>,
    pub photos: Vec<String>,
    pub source: PizzeriaSource,
    pub external_id: Option<String>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A place returned by the external place search, not yet cached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscoveredPlace {
    pub external_id: String,
    pub name: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub opening_hours: Option<String>,
}

impl DiscoveredPlace {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }
}

#[derive(Debug, Clone)]
pub struct PizzeriaSubmission {
    pub name: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub location: Coordinates,
    pub phone: Option<String>,
    pub website: Option<String>,
}

impl Pizzeria {
    pub fn new_submission(submission: PizzeriaSubmission, created_by: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: submission.name,
            address: submission.address,
            city: submission.city,
            state: submission.state,
            postal_code: submission.postal_code,
            latitude: submission.location.latitude,
            longitude: submission.location.longitude,
            verified: false,
            phone: submission.phone,
            website: submission.website,
            opening_hours: None,
            cuisine_styles: vec![],
            photos: vec![],
            source: PizzeriaSource::User,
            external_id: None,
            created_by: Some(created_by),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn from_discovered(place: DiscoveredPlace) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: place.name,
            address: place.address,
            city: place.city,
            state: place.state,
            postal_code: place.postal_code,
            latitude: place.latitude,
            longitude: place.longitude,
            verified: false,
            phone: place.phone,
            website: place.website,
            opening_hours: place.opening_hours,
            cuisine_styles: vec![],
            photos: vec![],
            source: PizzeriaSource::Openstreetmap,
            external_id: Some(place.external_id),
            created_by: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NearbyPizzeria {
    #[serde(flatten)]
    pub pizzeria: Pizzeria,
    pub distance_miles: f64,
}

#[cfg(test)]
pub(crate) fn sample_pizzeria(latitude: f64, longitude: f64) -> Pizzeria {
    Pizzeria::new_submission(
        PizzeriaSubmission {
            name: "Sample Slice".to_string(),
            address: Some("1 Main St".to_string()),
            city: Some("Newark".to_string()),
            state: Some("NJ".to_string()),
            postal_code: None,
            location: Coordinates::new(latitude, longitude),
            phone: None,
            website: None,
        },
        Uuid::new_v4(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_submission_is_unverified_user_source() {
        let user_id = Uuid::new_v4();
        let submission = PizzeriaSubmission {
            name: "Joe's".to_string(),
            address: None,
            city: None,
            state: None,
            postal_code: None,
            location: Coordinates::new(40.73, -73.99),
            phone: Some("555-0100".to_string()),
            website: None,
        };

        let pizzeria = Pizzeria::new_submission(submission, user_id);

        assert_eq!(pizzeria.name, "Joe's");
        assert_eq!(pizzeria.source, PizzeriaSource::User);
        assert!(!pizzeria.verified);
        assert_eq!(pizzeria.created_by, Some(user_id));
        assert_eq!(pizzeria.coordinates(), Coordinates::new(40.73, -73.99));
    }

    #[test]
    fn test_from_discovered_keeps_provenance() {
        let place = DiscoveredPlace {
            external_id: "node/42".to_string(),
            name: "Lucali".to_string(),
            address: Some("575 Henry St".to_string()),
            city: Some("Brooklyn".to_string()),
            state: Some("NY".to_string()),
            postal_code: Some("11231".to_string()),
            latitude: 40.6818,
            longitude: -73.9997,
            phone: None,
            website: None,
            opening_hours: Some("Tu-Su 17:00-22:00".to_string()),
        };

        let pizzeria = Pizzeria::from_discovered(place);

        assert_eq!(pizzeria.source, PizzeriaSource::Openstreetmap);
        assert_eq!(pizzeria.external_id.as_deref(), Some("node/42"));
        assert_eq!(pizzeria.opening_hours.as_deref(), Some("Tu-Su 17:00-22:00"));
        assert!(pizzeria.created_by.is_none());
    }

    #[test]
    fn test_nearby_pizzeria_serializes_flat() {
        let nearby = NearbyPizzeria {
            pizzeria: sample_pizzeria(40.0, -74.0),
            distance_miles: 1.5,
        };

        let json = serde_json::to_value(&nearby).unwrap();
        assert_eq!(json["name"], "Sample Slice");
        assert_eq!(json["distance_miles"], 1.5);
        assert_eq!(json["source"], "user");
    }
}
