use std::env;
use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};
use crate::core::library::FinePolicy;

// Identifiable defines common traits that can be shared by persistent objects
pub trait Identifiable {
    fn id(&self) -> String;
}

// Configuration abstracts config options for library system
#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct Configuration {
    pub data_dir: PathBuf,
    pub books_file: String,
    pub members_file: String,
    pub users_file: String,
    pub admin_username: String,
    pub loan_days: i64,
    pub fine_per_day: f64,
    pub fine_policy: FinePolicy,
}

impl Configuration {
    pub fn new(data_dir: &Path) -> Self {
        Configuration {
            data_dir: data_dir.to_path_buf(),
            books_file: "books.csv".to_string(),
            members_file: "members.csv".to_string(),
            users_file: "users.csv".to_string(),
            admin_username: "admin".to_string(),
            loan_days: 14,
            fine_per_day: 1.0,
            fine_policy: FinePolicy::Cumulative,
        }
    }

    // Defaults rooted at the working directory, overridden by LMS_* variables.
    pub fn from_env() -> Self {
        let data_dir = env::var("LMS_DATA_DIR").map(PathBuf::from).unwrap_or_else(|_| PathBuf::from("."));
        let mut config = Configuration::new(&data_dir);
        if let Ok(admin) = env::var("LMS_ADMIN_USER") {
            config.admin_username = admin;
        }
        if let Some(days) = env::var("LMS_LOAN_DAYS").ok().and_then(|v| v.parse().ok()) {
            config.loan_days = days;
        }
        if let Some(rate) = env::var("LMS_FINE_PER_DAY").ok().and_then(|v| v.parse().ok()) {
            config.fine_per_day = rate;
        }
        if let Ok(policy) = env::var("LMS_FINE_POLICY") {
            config.fine_policy = FinePolicy::from(policy);
        }
        config
    }

    pub fn books_path(&self) -> PathBuf {
        self.data_dir.join(&self.books_file)
    }

    pub fn members_path(&self) -> PathBuf {
        self.data_dir.join(&self.members_file)
    }

    pub fn users_path(&self) -> PathBuf {
        self.data_dir.join(&self.users_file)
    }
}
