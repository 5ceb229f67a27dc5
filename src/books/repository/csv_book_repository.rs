use std::path::{Path, PathBuf};
use crate::books::domain::model::BookEntity;
use crate::books::repository::BookRepository;
use crate::core::library::LibraryResult;
use crate::core::repository::Repository;
use crate::utils::tabular::{read_records, write_records};

pub const BOOK_COLUMNS: [&str; 5] = ["book_id", "title", "author", "genre", "copies"];

#[derive(Debug)]
pub struct CsvBookRepository {
    path: PathBuf,
}

impl CsvBookRepository {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }
}

impl Repository<BookEntity> for CsvBookRepository {
    fn load_all(&self) -> LibraryResult<Vec<BookEntity>> {
        read_records(&self.path)
    }

    fn save_all(&self, entities: &[&BookEntity]) -> LibraryResult<usize> {
        write_records(&self.path, &BOOK_COLUMNS, entities)
    }
}

impl BookRepository for CsvBookRepository {}
