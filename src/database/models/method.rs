use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use crate::database::repository::Entity;

/// Payment method. Names are unique across the table.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Method {
    pub id: i64,
    pub name: String,
    pub is_active: bool,
}

#[derive(Debug, Clone)]
pub struct MethodDraft {
    pub name: String,
    pub is_active: bool,
}

impl Entity for Method {
    type Draft = MethodDraft;
    const TABLE: &'static str = "methods";

    fn id(&self) -> i64 {
        self.id
    }

    fn from_draft(id: i64, draft: MethodDraft, _now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: draft.name,
            is_active: draft.is_active,
        }
    }

    fn unique_key(&self) -> Option<&str> {
        Some(&self.name)
    }
}
