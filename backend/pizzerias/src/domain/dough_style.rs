use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "dough_style", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum DoughStyle {
    Neapolitan,
    NewYork,
    Detroit,
    ChicagoDeepDish,
    Sicilian,
    Roman,
    Grandma,
    Tavern,
    California,
    NewHaven,
}

impl DoughStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            DoughStyle::Neapolitan => "neapolitan",
            DoughStyle::NewYork => "new_york",
            DoughStyle::Detroit => "detroit",
            DoughStyle::ChicagoDeepDish => "chicago_deep_dish",
            DoughStyle::Sicilian => "sicilian",
            DoughStyle::Roman => "roman",
            DoughStyle::Grandma => "grandma",
            DoughStyle::Tavern => "tavern",
            DoughStyle::California => "california",
            DoughStyle::NewHaven => "new_haven",
        }
    }
}

impl fmt::Display for DoughStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}


#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "tag_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TagStatus {
    Approved,
    Pending,
    Rejected,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct DoughStyleTag {
    pub id: Uuid,
    pub pizzeria_id: Uuid,
    pub style: DoughStyle,
    pub status: TagStatus,
    pub upvotes: i32,
    pub downvotes: i32,
    pub suggested_by: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Edit to a pizzeria's `cuisine_styles` that follows a moderation decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CuisineStyleChange {
    Add(DoughStyle),
    Remove(DoughStyle),
}

impl DoughStyleTag {
    pub fn suggest(pizzeria_id: Uuid, style: DoughStyle, suggested_by: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            pizzeria_id,
            style,
            status: TagStatus::Pending,
            upvotes: 0,
            downvotes: 0,
            suggested_by,
            created_at: Utc::now(),
        }
    }

    /// Only approved tags contribute to the pizzeria's style list.
    pub fn cuisine_change(&self, status: TagStatus) -> Option<CuisineStyleChange> {
        match (self.status, status) {
            (_, TagStatus::Approved) => Some(CuisineStyleChange::Add(self.style)),
            (TagStatus::Approved, _) => Some(CuisineStyleChange::Remove(self.style)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suggested_tag_is_pending() {
        let tag = DoughStyleTag::suggest(Uuid::new_v4(), DoughStyle::Detroit, Uuid::new_v4());
        assert_eq!(tag.status, TagStatus::Pending);
        assert_eq!(tag.upvotes, 0);
    }

    #[test]
    fn test_cuisine_change_follows_approval() {
        let mut tag = DoughStyleTag::suggest(Uuid::new_v4(), DoughStyle::Tavern, Uuid::new_v4());

        assert_eq!(
            tag.cuisine_change(TagStatus::Approved),
            Some(CuisineStyleChange::Add(DoughStyle::Tavern))
        );
        assert_eq!(tag.cuisine_change(TagStatus::Rejected), None);
        assert_eq!(tag.cuisine_change(TagStatus::Pending), None);

        tag.status = TagStatus::Approved;
        assert_eq!(
            tag.cuisine_change(TagStatus::Rejected),
            Some(CuisineStyleChange::Remove(DoughStyle::Tavern))
        );
        assert_eq!(
            tag.cuisine_change(TagStatus::Pending),
            Some(CuisineStyleChange::Remove(DoughStyle::Tavern))
        );
    }

    #[test]
    fn test_style_names_match_serde() {
        let styles = [
            DoughStyle::Neapolitan,
            DoughStyle::NewYork,
            DoughStyle::Detroit,
            DoughStyle::ChicagoDeepDish,
            DoughStyle::Sicilian,
            DoughStyle::Roman,
            DoughStyle::Grandma,
            DoughStyle::Tavern,
            DoughStyle::California,
            DoughStyle::NewHaven,
        ];
        for style in styles {
            assert_eq!(serde_json::to_value(style).unwrap(), style.as_str());
        }
        assert!(serde_json::from_str::<DoughStyle>("\"deep_fried\"").is_err());
    }

    #[test]
    fn test_style_serde_matches_as_str() {
        let json = serde_json::to_string(&DoughStyle::ChicagoDeepDish).unwrap();
        assert_eq!(json, "\"chicago_deep_dish\"");
    }
}
