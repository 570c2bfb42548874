use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use super::timestamp;
use crate::database::repository::Entity;

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Customer {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub is_active: bool,
    #[serde(serialize_with = "timestamp::serialize")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "timestamp::serialize")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CustomerDraft {
    pub name: String,
    pub address: String,
    pub is_active: bool,
}

impl Entity for Customer {
    type Draft = CustomerDraft;
    const TABLE: &'static str = "customers";

    fn id(&self) -> i64 {
        self.id
    }

    fn from_draft(id: i64, draft: CustomerDraft, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: draft.name,
            address: draft.address,
            is_active: draft.is_active,
            created_at: now,
            updated_at: now,
        }
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }
}
