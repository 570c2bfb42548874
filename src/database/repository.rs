use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::database::manager::DatabaseError;
use crate::database::models::user::{NewUser, User};

/// A record type kept in its own table with a store-assigned integer id
pub trait Entity: Clone + Send + Sync + 'static {
    /// Field values supplied by the client on creation
    type Draft: Send + Sync + 'static;

    const TABLE: &'static str;

    fn id(&self) -> i64;

    fn from_draft(id: i64, draft: Self::Draft, now: DateTime<Utc>) -> Self;

    /// Refresh the update timestamp, for records that carry one
    fn touch(&mut self, _now: DateTime<Utc>) {}

    /// Value that must be unique across the table, if any
    fn unique_key(&self) -> Option<&str> {
        None
    }
}

#[async_trait]
pub trait Repository<T: Entity>: Send + Sync {
    /// All records ordered by id
    async fn find_all(&self) -> Result<Vec<T>, DatabaseError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<T>, DatabaseError>;

    async fn create(&self, draft: T::Draft) -> Result<T, DatabaseError>;

    /// Persist every field of `record` except `created_at`; returns the stored row
    async fn update(&self, record: &T) -> Result<T, DatabaseError>;

    async fn delete(&self, id: i64) -> Result<(), DatabaseError>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError>;

    async fn email_exists(&self, email: &str) -> Result<bool, DatabaseError>;

    async fn create(&self, user: NewUser) -> Result<User, DatabaseError>;
}
