use std::fmt;
use std::fmt::{Display, Formatter};
use serde::{Deserialize, Serialize};

#[derive(Debug, PartialEq)]
pub enum LibraryError {
    // referenced book or member id does not exist
    NotFound {
        message: String,
    },
    // no copies left to issue
    Unavailable {
        message: String,
    },
    // an update targets an id that was never added
    InvalidReference {
        message: String,
    },
    AuthFailure {
        message: String,
    },
    Validation {
        message: String,
        reason_code: Option<String>,
    },
    Serialization {
        message: String,
    },
    Runtime {
        message: String,
        reason_code: Option<String>,
    },
}

impl LibraryError {
    pub fn not_found(message: &str) -> LibraryError {
        LibraryError::NotFound { message: message.to_string() }
    }

    pub fn unavailable(message: &str) -> LibraryError {
        LibraryError::Unavailable { message: message.to_string() }
    }

    pub fn invalid_reference(message: &str) -> LibraryError {
        LibraryError::InvalidReference { message: message.to_string() }
    }

    pub fn auth_failure(message: &str) -> LibraryError {
        LibraryError::AuthFailure { message: message.to_string() }
    }

    pub fn validation(message: &str, reason_code: Option<String>) -> LibraryError {
        LibraryError::Validation { message: message.to_string(), reason_code }
    }

    pub fn serialization(message: &str) -> LibraryError {
        LibraryError::Serialization { message: message.to_string() }
    }

    pub fn runtime(message: &str, reason_code: Option<String>) -> LibraryError {
        LibraryError::Runtime { message: message.to_string(), reason_code }
    }

    pub fn message(&self) -> &str {
        match self {
            LibraryError::NotFound { message } => message,
            LibraryError::Unavailable { message } => message,
            LibraryError::InvalidReference { message } => message,
            LibraryError::AuthFailure { message } => message,
            LibraryError::Validation { message, .. } => message,
            LibraryError::Serialization { message } => message,
            LibraryError::Runtime { message, .. } => message,
        }
    }
}

impl From<std::io::Error> for LibraryError {
    fn from(err: std::io::Error) -> Self {
        LibraryError::runtime(
            format!("io {:?}", err).as_str(), Some(format!("{:?}", err.kind())))
    }
}

impl From<csv::Error> for LibraryError {
    fn from(err: csv::Error) -> Self {
        LibraryError::serialization(
            format!("csv parsing {}", err).as_str())
    }
}

impl From<serde_json::Error> for LibraryError {
    fn from(err: serde_json::Error) -> Self {
        LibraryError::serialization(
            format!("serde json parsing {:?}", err).as_str())
    }
}

impl Display for LibraryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            LibraryError::Validation { message, reason_code: Some(reason) } => {
                write!(f, "{} ({})", message, reason)
            }
            LibraryError::Runtime { message, reason_code: Some(reason) } => {
                write!(f, "{} ({})", message, reason)
            }
            _ => {
                write!(f, "{}", self.message())
            }
        }
    }
}

/// A specialized Result type for library operations.
pub type LibraryResult<T> = Result<T, LibraryError>;

// Privilege tier of an authenticated session
#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub enum Role {
    Admin,
    Patron,
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Role::Admin => write!(f, "Admin"),
            Role::Patron => write!(f, "Patron"),
        }
    }
}

// FinePolicy decides when overdue days turn into a charge on the patron's balance.
#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub enum FinePolicy {
    // every fine calculation adds the full overdue amount again, including the
    // overdue report and the return path
    Cumulative,
    // a loan is charged once, at the moment it is returned
    OnReturn,
}

impl From<String> for FinePolicy {
    fn from(s: String) -> Self {
        match s.to_lowercase().as_str() {
            "on_return" | "onreturn" => FinePolicy::OnReturn,
            _ => FinePolicy::Cumulative,
        }
    }
}

impl Display for FinePolicy {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            FinePolicy::Cumulative => write!(f, "cumulative"),
            FinePolicy::OnReturn => write!(f, "on_return"),
        }
    }
}
