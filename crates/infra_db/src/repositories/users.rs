//! User account repository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use core_kernel::{DomainPort, PortError, UserId};
use domain_loan::{NewUserAccount, Role, UserAccount, UserDirectory};

use crate::error::DatabaseError;

const USER_COLUMNS: &str = "id, name, email, password_hash, role, created_at";

/// Repository for user account data
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Creates a new UserRepository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Registers a new user account
    ///
    /// Duplicate emails surface as `DuplicateEntry` via the unique index.
    pub async fn create_account(&self, new: NewUserAccount) -> Result<UserAccount, DatabaseError> {
        let sql = format!(
            "INSERT INTO users (id, name, email, password_hash, role, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {USER_COLUMNS}"
        );

        let row: UserRow = sqlx::query_as(&sql)
            .bind(Uuid::now_v7())
            .bind(&new.name)
            .bind(&new.email)
            .bind(&new.password_hash)
            .bind(new.role.as_str())
            .bind(Utc::now())
            .fetch_one(&self.pool)
            .await
            .map_err(DatabaseError::classify)?;

        row.into_domain()
    }

    /// Looks up an account by email
    pub async fn get_by_email(&self, email: &str) -> Result<Option<UserAccount>, DatabaseError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");

        let row: Option<UserRow> = sqlx::query_as(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(DatabaseError::classify)?;

        row.map(UserRow::into_domain).transpose()
    }

    /// Returns the registered email for a user id
    pub async fn get_email(&self, id: UserId) -> Result<String, DatabaseError> {
        let email: Option<String> = sqlx::query_scalar("SELECT email FROM users WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(DatabaseError::classify)?;

        email.ok_or_else(|| DatabaseError::not_found("UserAccount", id))
    }
}

impl DomainPort for UserRepository {}

#[async_trait]
impl UserDirectory for UserRepository {
    async fn create(&self, new: NewUserAccount) -> Result<UserAccount, PortError> {
        Ok(self.create_account(new).await?)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserAccount>, PortError> {
        Ok(self.get_by_email(email).await?)
    }

    async fn email_of(&self, id: UserId) -> Result<String, PortError> {
        Ok(self.get_email(id).await?)
    }
}

/// Database row for a user account
#[derive(Debug, Clone, sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    name: String,
    email: String,
    password_hash: String,
    role: String,
    created_at: DateTime<Utc>,
}

impl UserRow {
    fn into_domain(self) -> Result<UserAccount, DatabaseError> {
        let role: Role = self
            .role
            .parse()
            .map_err(|_| DatabaseError::CorruptRow(format!("role '{}'", self.role)))?;

        Ok(UserAccount {
            id: UserId::from_uuid(self.id),
            name: self.name,
            email: self.email,
            password_hash: self.password_hash,
            role,
            created_at: self.created_at,
        })
    }
}
