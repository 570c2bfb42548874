use std::sync::Arc;

use sqlx::PgPool;

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::memory::{MemoryTable, MemoryUsers};
use crate::database::models::{Category, Customer, Method, Payment};
use crate::database::postgres::PgStore;
use crate::database::repository::{Repository, UserRepository};

/// One repository per entity, all on the same backend
#[derive(Clone)]
pub struct Store {
    pub categories: Arc<dyn Repository<Category>>,
    pub customers: Arc<dyn Repository<Customer>>,
    pub methods: Arc<dyn Repository<Method>>,
    pub payments: Arc<dyn Repository<Payment>>,
    pub users: Arc<dyn UserRepository>,
    pool: Option<PgPool>,
}

impl Store {
    pub fn memory() -> Self {
        Self {
            categories: Arc::new(MemoryTable::<Category>::default()),
            customers: Arc::new(MemoryTable::<Customer>::default()),
            methods: Arc::new(MemoryTable::<Method>::default()),
            payments: Arc::new(MemoryTable::<Payment>::default()),
            users: Arc::new(MemoryUsers::default()),
            pool: None,
        }
    }

    pub fn postgres(pool: PgPool) -> Self {
        let pg = Arc::new(PgStore::new(pool.clone()));
        Self {
            categories: pg.clone(),
            customers: pg.clone(),
            methods: pg.clone(),
            payments: pg.clone(),
            users: pg,
            pool: Some(pool),
        }
    }

    pub fn backend(&self) -> &'static str {
        if self.pool.is_some() {
            "postgres"
        } else {
            "memory"
        }
    }

    pub async fn health_check(&self) -> Result<(), DatabaseError> {
        match &self.pool {
            Some(pool) => DatabaseManager::health_check(pool).await,
            None => Ok(()),
        }
    }
}
