use async_trait::async_trait;
use sqlx::PgPool;

use crate::database::manager::DatabaseError;
use crate::database::models::{
    Category, CategoryDraft, Customer, CustomerDraft, Method, MethodDraft, NewUser, Payment, PaymentDraft, User,
};
use crate::database::repository::{Entity, Repository, UserRepository};

/// Postgres-backed repositories sharing one pool
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn delete_from(&self, table: &'static str, id: i64) -> Result<(), DatabaseError> {
        // Table names come from Entity::TABLE constants, never from input
        let query = format!("DELETE FROM {} WHERE id = $1", table);
        let result = sqlx::query(&query).bind(id).execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("{} {}", table, id)));
        }
        Ok(())
    }
}

fn not_found<T: Entity>(id: i64) -> DatabaseError {
    DatabaseError::NotFound(format!("{} {}", T::TABLE, id))
}

#[async_trait]
impl Repository<Category> for PgStore {
    async fn find_all(&self) -> Result<Vec<Category>, DatabaseError> {
        Ok(sqlx::query_as::<_, Category>("SELECT * FROM categories ORDER BY id")
            .fetch_all(&self.pool)
            .await?)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Category>, DatabaseError> {
        Ok(sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn create(&self, draft: CategoryDraft) -> Result<Category, DatabaseError> {
        sqlx::query_as::<_, Category>(
            "INSERT INTO categories (name, description) VALUES ($1, $2) RETURNING *",
        )
        .bind(draft.name)
        .bind(draft.description)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DatabaseError::from_sqlx(Category::TABLE, e))
    }

    async fn update(&self, record: &Category) -> Result<Category, DatabaseError> {
        sqlx::query_as::<_, Category>(
            "UPDATE categories SET name = $2, description = $3, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(record.id)
        .bind(&record.name)
        .bind(&record.description)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DatabaseError::from_sqlx(Category::TABLE, e))?
        .ok_or_else(|| not_found::<Category>(record.id))
    }

    async fn delete(&self, id: i64) -> Result<(), DatabaseError> {
        self.delete_from(Category::TABLE, id).await
    }
}

#[async_trait]
impl Repository<Customer> for PgStore {
    async fn find_all(&self) -> Result<Vec<Customer>, DatabaseError> {
        Ok(sqlx::query_as::<_, Customer>("SELECT * FROM customers ORDER BY id")
            .fetch_all(&self.pool)
            .await?)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Customer>, DatabaseError> {
        Ok(sqlx::query_as::<_, Customer>("SELECT * FROM customers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn create(&self, draft: CustomerDraft) -> Result<Customer, DatabaseError> {
        sqlx::query_as::<_, Customer>(
            "INSERT INTO customers (name, address, is_active) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(draft.name)
        .bind(draft.address)
        .bind(draft.is_active)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DatabaseError::from_sqlx(Customer::TABLE, e))
    }

    async fn update(&self, record: &Customer) -> Result<Customer, DatabaseError> {
        sqlx::query_as::<_, Customer>(
            "UPDATE customers SET name = $2, address = $3, is_active = $4, updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(record.id)
        .bind(&record.name)
        .bind(&record.address)
        .bind(record.is_active)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DatabaseError::from_sqlx(Customer::TABLE, e))?
        .ok_or_else(|| not_found::<Customer>(record.id))
    }

    async fn delete(&self, id: i64) -> Result<(), DatabaseError> {
        self.delete_from(Customer::TABLE, id).await
    }
}

#[async_trait]
impl Repository<Method> for PgStore {
    async fn find_all(&self) -> Result<Vec<Method>, DatabaseError> {
        Ok(sqlx::query_as::<_, Method>("SELECT * FROM methods ORDER BY id")
            .fetch_all(&self.pool)
            .await?)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Method>, DatabaseError> {
        Ok(sqlx::query_as::<_, Method>("SELECT * FROM methods WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn create(&self, draft: MethodDraft) -> Result<Method, DatabaseError> {
        sqlx::query_as::<_, Method>("INSERT INTO methods (name, is_active) VALUES ($1, $2) RETURNING *")
            .bind(draft.name)
            .bind(draft.is_active)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DatabaseError::from_sqlx(Method::TABLE, e))
    }

    async fn update(&self, record: &Method) -> Result<Method, DatabaseError> {
        sqlx::query_as::<_, Method>("UPDATE methods SET name = $2, is_active = $3 WHERE id = $1 RETURNING *")
            .bind(record.id)
            .bind(&record.name)
            .bind(record.is_active)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DatabaseError::from_sqlx(Method::TABLE, e))?
            .ok_or_else(|| not_found::<Method>(record.id))
    }

    async fn delete(&self, id: i64) -> Result<(), DatabaseError> {
        self.delete_from(Method::TABLE, id).await
    }
}

#[async_trait]
impl Repository<Payment> for PgStore {
    async fn find_all(&self) -> Result<Vec<Payment>, DatabaseError> {
        Ok(sqlx::query_as::<_, Payment>("SELECT * FROM payments ORDER BY id")
            .fetch_all(&self.pool)
            .await?)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Payment>, DatabaseError> {
        Ok(sqlx::query_as::<_, Payment>("SELECT * FROM payments WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn create(&self, draft: PaymentDraft) -> Result<Payment, DatabaseError> {
        sqlx::query_as::<_, Payment>("INSERT INTO payments (sum) VALUES ($1) RETURNING *")
            .bind(draft.sum)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DatabaseError::from_sqlx(Payment::TABLE, e))
    }

    async fn update(&self, record: &Payment) -> Result<Payment, DatabaseError> {
        sqlx::query_as::<_, Payment>("UPDATE payments SET sum = $2 WHERE id = $1 RETURNING *")
            .bind(record.id)
            .bind(record.sum)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DatabaseError::from_sqlx(Payment::TABLE, e))?
            .ok_or_else(|| not_found::<Payment>(record.id))
    }

    async fn delete(&self, id: i64) -> Result<(), DatabaseError> {
        self.delete_from(Payment::TABLE, id).await
    }
}

#[async_trait]
impl UserRepository for PgStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        Ok(sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn email_exists(&self, email: &str) -> Result<bool, DatabaseError> {
        let (exists,): (bool,) = sqlx::query_as("SELECT EXISTS (SELECT 1 FROM users WHERE email = $1)")
            .bind(email)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    async fn create(&self, user: NewUser) -> Result<User, DatabaseError> {
        sqlx::query_as::<_, User>("INSERT INTO users (email, password_hash) VALUES ($1, $2) RETURNING *")
            .bind(user.email)
            .bind(user.password_hash)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DatabaseError::from_sqlx("users", e))
    }
}
