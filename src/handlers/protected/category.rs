// handlers/protected/category.rs - /v1/category

use std::sync::Arc;

use serde_json::{Map, Value};

use super::resource::{Field, Resource};
use crate::database::models::{Category, CategoryDraft};
use crate::database::{Repository, Store};
use crate::validation::{string, Rule};

impl Resource for Category {
    const LABEL: &'static str = "Category";
    const NOUN: &'static str = "category";
    const FIELDS: &'static [Field] = &[("name", Rule::String, true), ("description", Rule::String, true)];

    fn repository(store: &Store) -> &Arc<dyn Repository<Self>> {
        &store.categories
    }

    fn draft(body: &Map<String, Value>) -> CategoryDraft {
        CategoryDraft {
            name: string(body, "name").unwrap_or_default(),
            description: string(body, "description").unwrap_or_default(),
        }
    }

    fn apply(&mut self, body: &Map<String, Value>) {
        if let Some(name) = string(body, "name") {
            self.name = name;
        }
        if let Some(description) = string(body, "description") {
            self.description = description;
        }
    }
}
