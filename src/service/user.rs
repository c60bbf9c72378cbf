use crate::database::user::UserRepository;
use crate::error::app_error::AppError;
use crate::models::user::{NewUser, User, UserUpdate};

/// Passthrough over a [`UserRepository`]. Holds no state of its own and
/// returns repository errors unchanged.
pub struct UserService<'a, R: UserRepository + ?Sized> {
    repository: &'a R,
}

impl<'a, R: UserRepository + ?Sized + Sync> UserService<'a, R> {
    pub fn new(repository: &'a R) -> Self {
        UserService { repository }
    }

    pub async fn create_user(&self, user: &NewUser) -> Result<User, AppError> {
        self.repository.create_user(user).await
    }

    pub async fn get_user_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        self.repository.get_user_by_id(id).await
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        self.repository.get_user_by_email(email).await
    }

    pub async fn update_user(&self, id: i64, changes: &UserUpdate) -> Result<User, AppError> {
        self.repository.update_user(id, changes).await
    }

    pub async fn delete_user(&self, id: i64) -> Result<(), AppError> {
        self.repository.delete_user(id).await
    }
}
