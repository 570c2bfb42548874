use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use super::timestamp;
use crate::database::repository::Entity;

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub description: String,
    #[serde(serialize_with = "timestamp::serialize")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "timestamp::serialize")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CategoryDraft {
    pub name: String,
    pub description: String,
}

impl Entity for Category {
    type Draft = CategoryDraft;
    const TABLE: &'static str = "categories";

    fn id(&self) -> i64 {
        self.id
    }

    fn from_draft(id: i64, draft: CategoryDraft, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: draft.name,
            description: draft.description,
            created_at: now,
            updated_at: now,
        }
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn renders_timestamps_without_timezone() {
        let at = Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
        let category = Category::from_draft(
            7,
            CategoryDraft {
                name: "Food".to_string(),
                description: "Groceries".to_string(),
            },
            at,
        );

        assert_eq!(
            serde_json::to_value(&category).unwrap(),
            json!({
                "id": 7,
                "name": "Food",
                "description": "Groceries",
                "created_at": "2024-03-09 14:05:07",
                "updated_at": "2024-03-09 14:05:07"
            })
        );
    }
}
