use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type UserId = Uuid;

/// A registered account holder. Users are created by registration and never
/// mutated or deleted afterwards.
///
/// The password is held in clear text and compared exactly at login. This is
/// the demo's toy default, not an authentication design.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub password: String,
    pub registered_at: DateTime<Utc>,
}

impl User {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            email: email.into(),
            password: password.into(),
            registered_at: Utc::now(),
        }
    }

    /// Exact, case-sensitive credential check.
    pub fn credentials_match(&self, email: &str, password: &str) -> bool {
        self.email == email && self.password == password
    }
}
