use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct SavedPizzeria {
    pub user_id: Uuid,
    pub pizzeria_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl SavedPizzeria {
    pub fn new(user_id: Uuid, pizzeria_id: Uuid) -> Self {
        Self {
            user_id,
            pizzeria_id,
            created_at: Utc::now(),
        }
    }
}
