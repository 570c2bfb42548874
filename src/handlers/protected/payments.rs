// handlers/protected/payments.rs - /v1/payments

use std::sync::Arc;

use serde_json::{Map, Value};

use super::resource::{Field, Resource};
use crate::database::models::{Payment, PaymentDraft};
use crate::database::{Repository, Store};
use crate::validation::{number, Rule};

impl Resource for Payment {
    const LABEL: &'static str = "Payment";
    const NOUN: &'static str = "payment";
    const FIELDS: &'static [Field] = &[("sum", Rule::Numeric, true)];

    fn repository(store: &Store) -> &Arc<dyn Repository<Self>> {
        &store.payments
    }

    fn draft(body: &Map<String, Value>) -> PaymentDraft {
        PaymentDraft {
            sum: number(body, "sum").unwrap_or_default(),
        }
    }

    fn apply(&mut self, body: &Map<String, Value>) {
        if let Some(sum) = number(body, "sum") {
            self.sum = sum;
        }
    }
}
