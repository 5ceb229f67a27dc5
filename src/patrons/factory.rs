use crate::core::domain::Configuration;
use crate::core::repository::{MemoryRepository, RepositoryStore};
use crate::patrons::domain::model::MemberEntity;
use crate::patrons::repository::MemberRepository;
use crate::patrons::repository::csv_member_repository::CsvMemberRepository;

pub fn create_member_repository(config: &Configuration, store: RepositoryStore) -> Box<dyn MemberRepository> {
    match store {
        RepositoryStore::Csv => {
            Box::new(CsvMemberRepository::new(&config.members_path()))
        }
        RepositoryStore::InMemory => {
            Box::new(MemoryRepository::<MemberEntity>::new(vec![]))
        }
    }
}
