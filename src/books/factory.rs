use crate::books::domain::model::BookEntity;
use crate::books::repository::BookRepository;
use crate::books::repository::csv_book_repository::CsvBookRepository;
use crate::core::domain::Configuration;
use crate::core::repository::{MemoryRepository, RepositoryStore};

pub fn create_book_repository(config: &Configuration, store: RepositoryStore) -> Box<dyn BookRepository> {
    match store {
        RepositoryStore::Csv => {
            Box::new(CsvBookRepository::new(&config.books_path()))
        }
        RepositoryStore::InMemory => {
            Box::new(MemoryRepository::<BookEntity>::new(vec![]))
        }
    }
}
