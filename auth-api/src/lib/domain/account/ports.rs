use async_trait::async_trait;

use crate::account::errors::StoreError;
use crate::account::models::Account;
use crate::account::models::EmailAddress;
use crate::account::models::Username;

/// Persistence port for accounts.
///
/// Username and email uniqueness is enforced by the implementation's
/// storage constraints; the signup pre-check is an optimization on top,
/// never the guard.
#[async_trait]
pub trait AccountStore: Send + Sync + 'static {
    /// Look up the account whose username or email equals `identifier`.
    ///
    /// # Returns
    /// Optional account entity (None if not found)
    ///
    /// # Errors
    /// * `Database` - Store operation failed
    async fn find_by_username_or_email(
        &self,
        identifier: &str,
    ) -> Result<Option<Account>, StoreError>;

    /// Run the signup duplicate pre-check: one read by email and one by
    /// username, both inside a single transaction so they observe the same
    /// point in time.
    ///
    /// # Returns
    /// `(by_email, by_username)` matches, either of which may be absent
    ///
    /// # Errors
    /// * `Database` - Store operation failed
    async fn find_for_signup(
        &self,
        email: &EmailAddress,
        username: &Username,
    ) -> Result<(Option<Account>, Option<Account>), StoreError>;

    /// Persist a new account.
    ///
    /// # Errors
    /// * `UsernameTaken` / `EmailTaken` - A unique constraint rejected the
    ///   row; the authoritative duplicate signal
    /// * `Database` - Store operation failed
    async fn insert(&self, account: Account) -> Result<Account, StoreError>;
}
