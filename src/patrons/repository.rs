pub mod csv_member_repository;

use crate::core::repository::{MemoryRepository, Repository};
use crate::patrons::domain::model::MemberEntity;

pub trait MemberRepository: Repository<MemberEntity> {}

impl MemberRepository for MemoryRepository<MemberEntity> {}
