//! User model, role policy and JWT claims

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::enums::Role;
use crate::error::AppError;

/// Something a caller may be allowed to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    ReadCatalog,
    WriteCatalog,
    IssueReturn,
    ReadLedger,
    Inventory,
    ViewOverdue,
    ManageUsers,
}

impl Capability {
    fn describe(&self) -> &'static str {
        match self {
            Capability::ReadCatalog => "read the catalog",
            Capability::WriteCatalog => "modify the catalog",
            Capability::IssueReturn => "issue or return equipment",
            Capability::ReadLedger => "read operations and reports",
            Capability::Inventory => "run inventory sessions",
            Capability::ViewOverdue => "view overdue equipment",
            Capability::ManageUsers => "manage users",
        }
    }
}

impl Role {
    /// Role policy table
    pub fn allows(&self, capability: Capability) -> bool {
        use Capability::*;
        match self {
            Role::Admin => true,
            Role::Storekeeper => !matches!(capability, ManageUsers),
            Role::Observer => matches!(capability, ReadCatalog | ReadLedger),
            Role::Worker => matches!(capability, ReadCatalog),
        }
    }

    /// Roles that receive equipment problem alerts
    pub fn is_staff(&self) -> bool {
        matches!(self, Role::Admin | Role::Storekeeper)
    }
}

/// Full user model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub full_name: Option<String>,
    pub role: Role,
    /// Hashed password (argon2)
    #[serde(skip_serializing, default)]
    pub password_hash: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Create user request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUser {
    #[validate(length(min = 3, max = 150, message = "Username must be 3-150 characters"))]
    pub username: String,
    #[validate(length(min = 4, message = "Password must be at least 4 characters"))]
    pub password: Option<String>,
    #[validate(length(max = 200))]
    pub full_name: Option<String>,
    pub role: Option<Role>,
}

/// Update user request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateUser {
    #[validate(length(min = 3, max = 150, message = "Username must be 3-150 characters"))]
    pub username: Option<String>,
    #[validate(length(min = 4, message = "Password must be at least 4 characters"))]
    pub password: Option<String>,
    #[validate(length(max = 200))]
    pub full_name: Option<String>,
    pub role: Option<Role>,
    pub is_active: Option<bool>,
}

/// JWT Claims for authenticated users
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserClaims {
    pub sub: String,
    pub user_id: i32,
    pub role: Role,
    pub exp: i64,
    pub iat: i64,
}

impl UserClaims {
    pub fn for_user(user: &User, expiration_hours: u64) -> Self {
        let now = Utc::now();
        Self {
            sub: user.username.clone(),
            user_id: user.id,
            role: user.role,
            exp: (now + Duration::hours(expiration_hours as i64)).timestamp(),
            iat: now.timestamp(),
        }
    }

    /// Create a new JWT token
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Parse JWT token
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }

    pub fn require(&self, capability: Capability) -> Result<(), AppError> {
        if self.role.allows(capability) {
            Ok(())
        } else {
            Err(AppError::Authorization(format!(
                "Role {} is not allowed to {}",
                self.role,
                capability.describe()
            )))
        }
    }
}
