// handlers/protected/methods.rs - /v1/methods

use std::sync::Arc;

use serde_json::{Map, Value};

use super::resource::{Activatable, Field, Resource};
use crate::database::models::{Method, MethodDraft};
use crate::database::{Repository, Store};
use crate::validation::{string, Rule};

impl Resource for Method {
    const LABEL: &'static str = "Method";
    const NOUN: &'static str = "method";
    const FIELDS: &'static [Field] = &[("name", Rule::String, true), ("is_active", Rule::Boolean, false)];

    fn repository(store: &Store) -> &Arc<dyn Repository<Self>> {
        &store.methods
    }

    fn draft(body: &Map<String, Value>) -> MethodDraft {
        MethodDraft {
            name: string(body, "name").unwrap_or_default(),
            is_active: body.get("is_active").and_then(Value::as_bool).unwrap_or(true),
        }
    }

    fn apply(&mut self, body: &Map<String, Value>) {
        if let Some(name) = string(body, "name") {
            self.name = name;
        }
        if let Some(active) = body.get("is_active").and_then(Value::as_bool) {
            self.is_active = active;
        }
    }

    fn is_active(&self) -> Option<bool> {
        Some(self.is_active)
    }
}

impl Activatable for Method {
    fn set_active(&mut self, active: bool) {
        self.is_active = active;
    }
}
