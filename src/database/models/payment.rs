use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use crate::database::repository::Entity;

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Payment {
    pub id: i64,
    pub sum: f64,
}

#[derive(Debug, Clone)]
pub struct PaymentDraft {
    pub sum: f64,
}

impl Entity for Payment {
    type Draft = PaymentDraft;
    const TABLE: &'static str = "payments";

    fn id(&self) -> i64 {
        self.id
    }

    fn from_draft(id: i64, draft: PaymentDraft, _now: DateTime<Utc>) -> Self {
        Self { id, sum: draft.sum }
    }
}
