use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::account::errors::StoreError;
use crate::account::models::Account;
use crate::account::models::AccountId;
use crate::account::models::Address;
use crate::account::models::DisplayName;
use crate::account::models::EmailAddress;
use crate::account::models::Username;
use crate::account::ports::AccountStore;

pub struct PostgresAccountStore {
    pool: PgPool,
}

impl PostgresAccountStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const SELECT_COLUMNS: &str =
    "SELECT id, username, email, name, city, zip, password_hash, created_at FROM accounts";

#[derive(sqlx::FromRow)]
struct AccountRow {
    id: Uuid,
    username: String,
    email: String,
    name: String,
    city: String,
    zip: String,
    password_hash: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<AccountRow> for Account {
    type Error = StoreError;

    fn try_from(row: AccountRow) -> Result<Self, Self::Error> {
        Ok(Account {
            id: AccountId(row.id),
            username: Username::new(row.username)
                .map_err(|e| StoreError::InvalidRecord(e.to_string()))?,
            email: EmailAddress::new(row.email)
                .map_err(|e| StoreError::InvalidRecord(e.to_string()))?,
            name: DisplayName::new(row.name)
                .map_err(|e| StoreError::InvalidRecord(e.to_string()))?,
            address: Address::new(row.city, row.zip)
                .map_err(|e| StoreError::InvalidRecord(e.to_string()))?,
            password_hash: row.password_hash,
            created_at: row.created_at,
        })
    }
}

#[async_trait]
impl AccountStore for PostgresAccountStore {
    async fn find_by_username_or_email(
        &self,
        identifier: &str,
    ) -> Result<Option<Account>, StoreError> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            "{SELECT_COLUMNS} WHERE username = $1 OR email = $1"
        ))
        .bind(identifier)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::Database(e.to_string()))?;

        row.map(Account::try_from).transpose()
    }

    async fn find_for_signup(
        &self,
        email: &EmailAddress,
        username: &Username,
    ) -> Result<(Option<Account>, Option<Account>), StoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let by_email = sqlx::query_as::<_, AccountRow>(&format!(
            "{SELECT_COLUMNS} WHERE email = $1"
        ))
        .bind(email.as_str())
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| StoreError::Database(e.to_string()))?;

        let by_username = sqlx::query_as::<_, AccountRow>(&format!(
            "{SELECT_COLUMNS} WHERE username = $1"
        ))
        .bind(username.as_str())
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| StoreError::Database(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok((
            by_email.map(Account::try_from).transpose()?,
            by_username.map(Account::try_from).transpose()?,
        ))
    }

    async fn insert(&self, account: Account) -> Result<Account, StoreError> {
        sqlx::query(
            r#"
            INSERT INTO accounts (id, username, email, name, city, zip, password_hash, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(account.id.0)
        .bind(account.username.as_str())
        .bind(account.email.as_str())
        .bind(account.name.as_str())
        .bind(account.address.city())
        .bind(account.address.zip())
        .bind(&account.password_hash)
        .bind(account.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    if db_err.constraint() == Some("accounts_username_key") {
                        return StoreError::UsernameTaken(account.username.as_str().to_string());
                    }
                    if db_err.constraint() == Some("accounts_email_key") {
                        return StoreError::EmailTaken(account.email.as_str().to_string());
                    }
                }
            }
            StoreError::Database(e.to_string())
        })?;

        Ok(account)
    }
}
