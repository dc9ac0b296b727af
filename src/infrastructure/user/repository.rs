//! In-memory user repository implementation

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::user::{User, UserData, UserRepository};
use crate::domain::DomainError;

use super::password::{Argon2Hasher, PasswordHasher};

pub(crate) const CREDENTIAL_MISMATCH: &str = "phone and password do not match";

#[derive(Debug, Clone)]
struct StoredUser {
    user: User,
    password_hash: String,
}

#[derive(Debug, Default)]
struct Store {
    users: HashMap<String, StoredUser>,
    /// phone number -> user id
    phone_index: HashMap<String, String>,
}

/// In-memory implementation of UserRepository
///
/// Passwords are kept as argon2 hashes. Hashing and verification run
/// outside the lock.
#[derive(Debug)]
pub struct InMemoryUserRepository {
    store: RwLock<Store>,
    hasher: Arc<dyn PasswordHasher>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::with_hasher(Arc::new(Argon2Hasher::new()))
    }

    pub fn with_hasher(hasher: Arc<dyn PasswordHasher>) -> Self {
        Self {
            store: RwLock::new(Store::default()),
            hasher,
        }
    }

    pub async fn len(&self) -> usize {
        self.store.read().await.users.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn phone_taken(phone_number: &str) -> DomainError {
    DomainError::conflict(format!("phone number '{}' already registered", phone_number))
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create_user(&self, data: &UserData) -> Result<User, DomainError> {
        let password_hash = self.hasher.hash(&data.password)?;
        let user = User::new(Uuid::new_v4().to_string(), &data.full_name, &data.phone_number);

        let mut store = self.store.write().await;

        if store.phone_index.contains_key(user.phone_number()) {
            return Err(phone_taken(user.phone_number()));
        }

        store
            .phone_index
            .insert(user.phone_number().to_string(), user.id().to_string());
        store.users.insert(
            user.id().to_string(),
            StoredUser {
                user: user.clone(),
                password_hash,
            },
        );

        Ok(user)
    }

    async fn login(&self, phone_number: &str, password: &str) -> Result<User, DomainError> {
        let (id, password_hash) = {
            let store = self.store.read().await;
            store
                .phone_index
                .get(phone_number)
                .and_then(|id| store.users.get(id))
                .map(|stored| (stored.user.id().to_string(), stored.password_hash.clone()))
                .ok_or_else(|| DomainError::credential(CREDENTIAL_MISMATCH))?
        };

        if !self.hasher.matches(password, &password_hash) {
            return Err(DomainError::credential(CREDENTIAL_MISMATCH));
        }

        let mut store = self.store.write().await;
        let stored = store
            .users
            .get_mut(&id)
            .ok_or_else(|| DomainError::credential(CREDENTIAL_MISMATCH))?;

        stored.user.record_login();
        Ok(stored.user.clone())
    }

    async fn get_user_by_id(&self, id: &str) -> Result<User, DomainError> {
        let store = self.store.read().await;

        store
            .users
            .get(id)
            .map(|stored| stored.user.clone())
            .ok_or_else(|| DomainError::not_found(format!("User '{}' not found", id)))
    }

    async fn patch_user_by_id(&self, id: &str, data: &UserData) -> Result<User, DomainError> {
        let password_hash = if data.has_password() {
            Some(self.hasher.hash(&data.password)?)
        } else {
            None
        };

        let mut store = self.store.write().await;

        let old_phone = store
            .users
            .get(id)
            .map(|stored| stored.user.phone_number().to_string())
            .ok_or_else(|| DomainError::not_found(format!("User '{}' not found", id)))?;

        let phone_changes = data.has_phone_number() && data.phone_number != old_phone;

        if phone_changes && store.phone_index.contains_key(&data.phone_number) {
            return Err(phone_taken(&data.phone_number));
        }

        if phone_changes {
            store.phone_index.remove(&old_phone);
            store
                .phone_index
                .insert(data.phone_number.clone(), id.to_string());
        }

        let stored = store
            .users
            .get_mut(id)
            .ok_or_else(|| DomainError::not_found(format!("User '{}' not found", id)))?;

        stored.user.apply(data);
        if let Some(hash) = password_hash {
            stored.password_hash = hash;
        }

        Ok(stored.user.clone())
    }
}
