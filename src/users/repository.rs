pub mod csv_user_repository;

use crate::core::repository::{MemoryRepository, Repository};
use crate::users::domain::model::UserEntity;

pub trait UserRepository: Repository<UserEntity> {}

impl UserRepository for MemoryRepository<UserEntity> {}
