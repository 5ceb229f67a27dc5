pub mod csv_book_repository;

use crate::books::domain::model::BookEntity;
use crate::core::repository::{MemoryRepository, Repository};

pub trait BookRepository: Repository<BookEntity> {}

impl BookRepository for MemoryRepository<BookEntity> {}
