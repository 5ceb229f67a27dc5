use crate::books::factory::create_book_repository;
use crate::core::domain::Configuration;
use crate::core::library::LibraryResult;
use crate::core::repository::RepositoryStore;
use crate::gateway::factory::create_publisher;
use crate::library::domain::LibraryService;
use crate::library::domain::service::LibraryServiceImpl;
use crate::patrons::factory::create_member_repository;
use crate::users::factory::create_user_repository;
use crate::utils::date::SystemClock;

// Builds the service for the given store and loads every dataset into memory.
pub fn create_library_service(config: &Configuration, store: RepositoryStore) -> LibraryResult<Box<dyn LibraryService>> {
    let mut svc = LibraryServiceImpl::new(
        config,
        create_book_repository(config, store),
        create_member_repository(config, store),
        create_user_repository(config, store),
        create_publisher(store.gateway_publisher()),
        Box::new(SystemClock),
    );
    svc.load()?;
    Ok(Box::new(svc))
}
