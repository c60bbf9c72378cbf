use crate::config::Config;
use crate::database::user::{UserRepository, hash_password};
use crate::error::app_error::AppError;
use crate::models::user::{NewUser, User, UserUpdate};
use chrono::{TimeZone, Utc};
use std::collections::HashMap;
use tokio::sync::Mutex;

pub fn sample_user(id: i64, email: &str) -> User {
    let timestamp = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    User {
        id,
        email: email.to_string(),
        password_hash: String::new(),
        first_name: "Jane".to_string(),
        last_name: "Doe".to_string(),
        created_at: timestamp,
        updated_at: timestamp,
        deleted_at: None,
    }
}

/// Configuration that ignites without a reachable database.
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.database.auto_migrate = false;
    config.database.min_connections = 0;
    config
}

/// In-memory stand-in for the Postgres repository, with the same
/// uniqueness and soft-delete rules.
#[derive(Default)]
pub struct MockRepository {
    users: Mutex<HashMap<i64, User>>,
    fail: bool,
}

impl MockRepository {
    /// Every call fails the way an unreachable database would.
    pub fn failing() -> Self {
        Self {
            users: Mutex::new(HashMap::new()),
            fail: true,
        }
    }

    /// Raw stored row, including soft-deleted ones.
    pub async fn stored(&self, id: i64) -> Option<User> {
        self.users.lock().await.get(&id).cloned()
    }

    fn check(&self) -> Result<(), AppError> {
        if self.fail {
            return Err(AppError::db("Database error", sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl UserRepository for MockRepository {
    async fn create_user(&self, user: &NewUser) -> Result<User, AppError> {
        self.check()?;
        let mut users = self.users.lock().await;
        if users.values().any(|existing| existing.email == user.email) {
            return Err(AppError::UserAlreadyExists(user.email.clone()));
        }

        let now = Utc::now();
        let created = User {
            id: users.len() as i64 + 1,
            email: user.email.clone(),
            password_hash: hash_password(&user.password)?,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        users.insert(created.id, created.clone());
        Ok(created)
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        self.check()?;
        let users = self.users.lock().await;
        Ok(users.get(&id).filter(|user| user.deleted_at.is_none()).cloned())
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        self.check()?;
        let users = self.users.lock().await;
        Ok(users.values().find(|user| user.email == email && user.deleted_at.is_none()).cloned())
    }

    async fn update_user(&self, id: i64, changes: &UserUpdate) -> Result<User, AppError> {
        self.check()?;
        let mut users = self.users.lock().await;
        // Soft-deleted rows keep their email reserved, as under the UNIQUE constraint.
        if let Some(email) = &changes.email {
            if users.values().any(|other| other.id != id && &other.email == email) {
                return Err(AppError::UserAlreadyExists(email.clone()));
            }
        }

        let user = users
            .get_mut(&id)
            .filter(|user| user.deleted_at.is_none())
            .ok_or(AppError::UserNotFound)?;

        if let Some(email) = &changes.email {
            user.email = email.clone();
        }
        if let Some(password) = &changes.password {
            user.password_hash = hash_password(password)?;
        }
        if let Some(first_name) = &changes.first_name {
            user.first_name = first_name.clone();
        }
        if let Some(last_name) = &changes.last_name {
            user.last_name = last_name.clone();
        }
        user.updated_at = Utc::now();

        Ok(user.clone())
    }

    async fn delete_user(&self, id: i64) -> Result<(), AppError> {
        self.check()?;
        let mut users = self.users.lock().await;
        let user = users
            .get_mut(&id)
            .filter(|user| user.deleted_at.is_none())
            .ok_or(AppError::UserNotFound)?;
        user.deleted_at = Some(Utc::now());
        Ok(())
    }
}
