//! In-process store used by tests and database-less development runs.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::database::manager::DatabaseError;
use crate::database::models::user::{NewUser, User};
use crate::database::repository::{Entity, Repository, UserRepository};

/// One table: rows keyed by id, ids handed out by a monotonic counter
pub struct MemoryTable<T> {
    rows: RwLock<BTreeMap<i64, T>>,
    next_id: AtomicI64,
}

impl<T> Default for MemoryTable<T> {
    fn default() -> Self {
        Self {
            rows: RwLock::new(BTreeMap::new()),
            next_id: AtomicI64::new(0),
        }
    }
}

impl<T: Entity> MemoryTable<T> {
    fn conflicts(rows: &BTreeMap<i64, T>, candidate: &T) -> bool {
        let Some(key) = candidate.unique_key() else {
            return false;
        };
        rows.values()
            .any(|row| row.id() != candidate.id() && row.unique_key() == Some(key))
    }
}

#[async_trait]
impl<T: Entity> Repository<T> for MemoryTable<T> {
    async fn find_all(&self) -> Result<Vec<T>, DatabaseError> {
        Ok(self.rows.read().await.values().cloned().collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<T>, DatabaseError> {
        Ok(self.rows.read().await.get(&id).cloned())
    }

    async fn create(&self, draft: T::Draft) -> Result<T, DatabaseError> {
        let mut rows = self.rows.write().await;

        // Creates are serialized by the write lock; rejected rows do not consume an id
        let id = self.next_id.load(Ordering::SeqCst) + 1;
        let record = T::from_draft(id, draft, Utc::now());
        if Self::conflicts(&rows, &record) {
            return Err(DatabaseError::Duplicate(T::TABLE));
        }

        self.next_id.store(id, Ordering::SeqCst);
        rows.insert(id, record.clone());
        Ok(record)
    }

    async fn update(&self, record: &T) -> Result<T, DatabaseError> {
        let mut rows = self.rows.write().await;
        if !rows.contains_key(&record.id()) {
            return Err(DatabaseError::NotFound(format!("{} {}", T::TABLE, record.id())));
        }
        if Self::conflicts(&rows, record) {
            return Err(DatabaseError::Duplicate(T::TABLE));
        }

        let mut stored = record.clone();
        stored.touch(Utc::now());
        rows.insert(stored.id(), stored.clone());
        Ok(stored)
    }

    async fn delete(&self, id: i64) -> Result<(), DatabaseError> {
        match self.rows.write().await.remove(&id) {
            Some(_) => Ok(()),
            None => Err(DatabaseError::NotFound(format!("{} {}", T::TABLE, id))),
        }
    }
}

#[derive(Default)]
pub struct MemoryUsers {
    rows: RwLock<BTreeMap<i64, User>>,
    next_id: AtomicI64,
}

#[async_trait]
impl UserRepository for MemoryUsers {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        Ok(self
            .rows
            .read()
            .await
            .values()
            .find(|user| user.email == email)
            .cloned())
    }

    async fn email_exists(&self, email: &str) -> Result<bool, DatabaseError> {
        Ok(self.find_by_email(email).await?.is_some())
    }

    async fn create(&self, user: NewUser) -> Result<User, DatabaseError> {
        let mut rows = self.rows.write().await;
        if rows.values().any(|existing| existing.email == user.email) {
            return Err(DatabaseError::Duplicate("users"));
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let created = User {
            id,
            email: user.email,
            password_hash: user.password_hash,
            created_at: Utc::now(),
        };
        rows.insert(id, created.clone());
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::{Category, CategoryDraft, Method, MethodDraft};

    fn category(name: &str) -> CategoryDraft {
        CategoryDraft {
            name: name.to_string(),
            description: format!("{} things", name),
        }
    }

    #[tokio::test]
    async fn assigns_increasing_ids_and_lists_in_order() {
        let table = MemoryTable::<Category>::default();
        let first = table.create(category("Food")).await.unwrap();
        let second = table.create(category("Rent")).await.unwrap();
        assert_eq!((first.id, second.id), (1, 2));

        let names: Vec<_> = table.find_all().await.unwrap().into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["Food", "Rent"]);
    }

    #[tokio::test]
    async fn update_keeps_created_at() {
        let table = MemoryTable::<Category>::default();
        let mut record = table.create(category("Food")).await.unwrap();
        let created_at = record.created_at;

        record.description = "Groceries".to_string();
        let stored = table.update(&record).await.unwrap();
        assert_eq!(stored.created_at, created_at);
        assert!(stored.updated_at >= created_at);
        assert_eq!(table.find_by_id(record.id).await.unwrap().unwrap().description, "Groceries");
    }

    #[tokio::test]
    async fn missing_rows_are_not_found() {
        let table = MemoryTable::<Category>::default();
        assert!(table.find_by_id(9).await.unwrap().is_none());
        assert!(matches!(table.delete(9).await, Err(DatabaseError::NotFound(_))));
    }

    #[tokio::test]
    async fn unique_method_names() {
        let table = MemoryTable::<Method>::default();
        let card = table
            .create(MethodDraft { name: "Card".to_string(), is_active: true })
            .await
            .unwrap();
        let duplicate = table
            .create(MethodDraft { name: "Card".to_string(), is_active: true })
            .await;
        assert!(matches!(duplicate, Err(DatabaseError::Duplicate("methods"))));

        let cash = table
            .create(MethodDraft { name: "Cash".to_string(), is_active: true })
            .await
            .unwrap();
        assert_eq!(cash.id, card.id + 1);

        let mut renamed = cash.clone();
        renamed.name = "Card".to_string();
        assert!(matches!(table.update(&renamed).await, Err(DatabaseError::Duplicate(_))));
    }

    #[tokio::test]
    async fn users_are_unique_by_email() {
        let users = MemoryUsers::default();
        let jane = users
            .create(NewUser { email: "jane@example.com".to_string(), password_hash: "x".to_string() })
            .await
            .unwrap();
        assert!(users.email_exists("jane@example.com").await.unwrap());
        assert_eq!(users.find_by_email("jane@example.com").await.unwrap().unwrap().id, jane.id);

        let again = users
            .create(NewUser { email: "jane@example.com".to_string(), password_hash: "y".to_string() })
            .await;
        assert!(matches!(again, Err(DatabaseError::Duplicate("users"))));
    }
}
