use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use auth_api::domain::account::errors::StoreError;
use auth_api::domain::account::models::Account;
use auth_api::domain::account::models::EmailAddress;
use auth_api::domain::account::models::Username;
use auth_api::domain::account::ports::AccountStore;
use auth_api::domain::account::service::AccountService;
use auth_api::inbound::http::router::create_router;
use credentials::PasswordHasher;
use credentials::TokenSigner;

pub const JWT_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";

/// Account store backed by a mutex-guarded vector.
///
/// Lets the integration suite exercise the full HTTP stack without a
/// database, while enforcing the same uniqueness rules as the Postgres
/// schema.
pub struct InMemoryAccountStore {
    accounts: Mutex<Vec<Account>>,
}

impl InMemoryAccountStore {
    pub fn new() -> Self {
        Self {
            accounts: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl AccountStore for InMemoryAccountStore {
    async fn find_by_username_or_email(
        &self,
        identifier: &str,
    ) -> Result<Option<Account>, StoreError> {
        let accounts = self.accounts.lock().expect("account store lock poisoned");
        Ok(accounts
            .iter()
            .find(|a| a.username.as_str() == identifier || a.email.as_str() == identifier)
            .cloned())
    }

    async fn find_for_signup(
        &self,
        email: &EmailAddress,
        username: &Username,
    ) -> Result<(Option<Account>, Option<Account>), StoreError> {
        // One lock for both reads, the in-memory equivalent of the
        // transactional dual lookup.
        let accounts = self.accounts.lock().expect("account store lock poisoned");
        let by_email = accounts.iter().find(|a| a.email == *email).cloned();
        let by_username = accounts.iter().find(|a| a.username == *username).cloned();
        Ok((by_email, by_username))
    }

    async fn insert(&self, account: Account) -> Result<Account, StoreError> {
        let mut accounts = self.accounts.lock().expect("account store lock poisoned");
        if accounts.iter().any(|a| a.username == account.username) {
            return Err(StoreError::UsernameTaken(
                account.username.as_str().to_string(),
            ));
        }
        if accounts.iter().any(|a| a.email == account.email) {
            return Err(StoreError::EmailTaken(account.email.as_str().to_string()));
        }
        accounts.push(account.clone());
        Ok(account)
    }
}

/// Test application that spawns a real server on a random port
pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let store = Arc::new(InMemoryAccountStore::new());
        let account_service = Arc::new(AccountService::new(
            store,
            PasswordHasher::new(),
            TokenSigner::new(JWT_SECRET),
        ));
        let application = create_router(account_service);

        tokio::spawn(async move {
            axum::serve(listener, application)
                .await
                .expect("Server crashed");
        });

        Self {
            address,
            api_client: reqwest::Client::new(),
        }
    }

    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }
}
