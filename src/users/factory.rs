use crate::core::domain::Configuration;
use crate::core::repository::{MemoryRepository, RepositoryStore};
use crate::users::domain::model::UserEntity;
use crate::users::repository::UserRepository;
use crate::users::repository::csv_user_repository::CsvUserRepository;

pub fn create_user_repository(config: &Configuration, store: RepositoryStore) -> Box<dyn UserRepository> {
    match store {
        RepositoryStore::Csv => {
            Box::new(CsvUserRepository::new(&config.users_path()))
        }
        RepositoryStore::InMemory => {
            Box::new(MemoryRepository::<UserEntity>::new(vec![]))
        }
    }
}
