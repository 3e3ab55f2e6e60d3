//! User and user-interest models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    /// Argon2 hash; never leaves the server
    #[serde(skip_serializing, default)]
    pub password: Option<String>,
    pub building_id: i64,
}

/// Body of `POST /users`. Every field is optional at the type level so a
/// missing property can be reported by name instead of as a parse failure.
#[derive(Debug, Default, Deserialize)]
pub struct CreateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub building_id: Option<i64>,
}

impl CreateUserRequest {
    /// Split into the validated parts of a new user, or name the first
    /// required property (name, email, building_id) that is absent or empty.
    pub fn into_new_user(self) -> Result<NewUser, &'static str> {
        let name = self.name.filter(|n| !n.is_empty()).ok_or("name")?;
        let email = self.email.filter(|e| !e.is_empty()).ok_or("email")?;
        let building_id = self.building_id.filter(|id| *id != 0).ok_or("building_id")?;

        Ok(NewUser {
            name,
            email,
            password: self.password.filter(|p| !p.is_empty()),
            building_id,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: Option<String>,
    pub building_id: i64,
}

/// Body of `PUT /users/:id`, decoded only after the key whitelist passed
#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub building_id: Option<i64>,
}

impl UpdateUserRequest {
    /// An empty password counts as not provided, as it does on create.
    pub fn without_empty_password(mut self) -> Self {
        self.password = self.password.filter(|p| !p.is_empty());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.password.is_none()
            && self.building_id.is_none()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserInterest {
    pub id: i64,
    pub user_id: i64,
    pub interest_id: i64,
}
