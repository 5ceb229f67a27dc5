use serde::{Deserialize, Serialize};
use crate::core::domain::Identifiable;

// UserEntity is a login credential, kept and compared as plain text.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct UserEntity {
    pub username: String,
    pub password: String,
}

impl UserEntity {
    pub fn new(username: &str, password: &str) -> Self {
        Self {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    pub fn matches(&self, password: &str) -> bool {
        self.password == password
    }
}

impl Identifiable for UserEntity {
    fn id(&self) -> String {
        self.username.to_string()
    }
}
