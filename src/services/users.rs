//! Authentication and user management service

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::{
        enums::Role,
        user::{CreateUser, UpdateUser, User, UserClaims},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct UsersService {
    repository: Repository,
    config: AuthConfig,
}

impl UsersService {
    pub fn new(repository: Repository, config: AuthConfig) -> Self {
        Self { repository, config }
    }

    /// Authenticate by username and password, returning a JWT token
    pub async fn authenticate(&self, username: &str, password: &str) -> AppResult<(String, User)> {
        let user = self
            .repository
            .users
            .get_by_username(username)
            .await?
            .ok_or_else(|| AppError::Authentication("Invalid username or password".to_string()))?;

        if !user.is_active || !self.verify_password(&user, password)? {
            return Err(AppError::Authentication("Invalid username or password".to_string()));
        }

        let token = UserClaims::for_user(&user, self.config.jwt_expiration_hours)
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))?;

        tracing::info!("User {} logged in", user.username);
        Ok((token, user))
    }

    fn verify_password(&self, user: &User, password: &str) -> AppResult<bool> {
        if let Some(ref hash) = user.password_hash {
            let parsed_hash = PasswordHash::new(hash)
                .map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
            return Ok(Argon2::default()
                .verify_password(password.as_bytes(), &parsed_hash)
                .is_ok());
        }

        Ok(false)
    }

    /// Hash a password using Argon2
    pub fn hash_password(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
        Ok(hash.to_string())
    }

    pub async fn list(&self) -> AppResult<Vec<User>> {
        self.repository.users.list().await
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<User> {
        self.repository.users.get_by_id(id).await
    }

    pub async fn create(&self, data: &CreateUser) -> AppResult<User> {
        if self.repository.users.get_by_username(&data.username).await?.is_some() {
            return Err(AppError::Conflict(format!(
                "Username {} already exists",
                data.username
            )));
        }

        let password_hash = data
            .password
            .as_deref()
            .map(|p| self.hash_password(p))
            .transpose()?;

        self.repository
            .users
            .create(
                &data.username,
                password_hash.as_deref(),
                data.full_name.as_deref(),
                data.role.unwrap_or_default(),
            )
            .await
    }

    pub async fn update(&self, id: i32, data: &UpdateUser) -> AppResult<User> {
        let password_hash = data
            .password
            .as_deref()
            .map(|p| self.hash_password(p))
            .transpose()?;

        self.repository
            .users
            .update(
                id,
                data.username.as_deref(),
                password_hash.as_deref(),
                data.full_name.as_deref(),
                data.role,
                data.is_active,
            )
            .await
    }

    /// Disable login and issue eligibility without deleting history
    pub async fn deactivate(&self, id: i32) -> AppResult<User> {
        let user = self
            .repository
            .users
            .update(id, None, None, None, None, Some(false))
            .await?;
        tracing::info!("User {} deactivated", user.username);
        Ok(user)
    }

    /// Delete a user. Blocked while the user authored operations or sessions.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.repository.users.delete(id).await.map_err(|e| match e {
            AppError::Conflict(_) => AppError::Conflict(format!(
                "User {} performed operations or created inventory sessions; deactivate instead",
                id
            )),
            other => other,
        })
    }

    /// Create the configured admin account when no user exists yet
    pub async fn ensure_bootstrap_admin(&self) -> AppResult<()> {
        let (Some(username), Some(password)) = (
            self.config.bootstrap_admin_username.as_deref(),
            self.config.bootstrap_admin_password.as_deref(),
        ) else {
            return Ok(());
        };

        if self.repository.users.count().await? > 0 {
            return Ok(());
        }

        let hash = self.hash_password(password)?;
        self.repository
            .users
            .create(username, Some(&hash), None, Role::Admin)
            .await?;
        tracing::info!("Created bootstrap admin account {}", username);
        Ok(())
    }
}
