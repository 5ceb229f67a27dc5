use std::path::{Path, PathBuf};
use crate::core::library::LibraryResult;
use crate::core::repository::Repository;
use crate::users::domain::model::UserEntity;
use crate::users::repository::UserRepository;
use crate::utils::tabular::{read_records, write_records};

pub const USER_COLUMNS: [&str; 2] = ["username", "password"];

#[derive(Debug)]
pub struct CsvUserRepository {
    path: PathBuf,
}

impl CsvUserRepository {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }
}

impl Repository<UserEntity> for CsvUserRepository {
    fn load_all(&self) -> LibraryResult<Vec<UserEntity>> {
        read_records(&self.path)
    }

    fn save_all(&self, entities: &[&UserEntity]) -> LibraryResult<usize> {
        write_records(&self.path, &USER_COLUMNS, entities)
    }
}

impl UserRepository for CsvUserRepository {}
