use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};
use crate::core::library::LibraryResult;
use crate::core::repository::Repository;
use crate::patrons::domain::model::MemberEntity;
use crate::patrons::repository::MemberRepository;
use crate::utils::tabular::{read_records, write_records};

pub const MEMBER_COLUMNS: [&str; 3] = ["member_id", "name", "membership_type"];

// stored columns of a member; loans and fines are not part of the dataset
#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct MemberRecord {
    pub member_id: i64,
    pub name: String,
    pub membership_type: String,
}

impl From<&MemberEntity> for MemberRecord {
    fn from(other: &MemberEntity) -> Self {
        Self {
            member_id: other.member_id,
            name: other.name.to_string(),
            membership_type: other.membership_type.to_string(),
        }
    }
}

impl From<MemberRecord> for MemberEntity {
    fn from(other: MemberRecord) -> Self {
        MemberEntity::new(other.member_id, other.name.as_str(), other.membership_type.as_str())
    }
}

#[derive(Debug)]
pub struct CsvMemberRepository {
    path: PathBuf,
}

impl CsvMemberRepository {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }
}

impl Repository<MemberEntity> for CsvMemberRepository {
    fn load_all(&self) -> LibraryResult<Vec<MemberEntity>> {
        let records: Vec<MemberRecord> = read_records(&self.path)?;
        Ok(records.into_iter().map(MemberEntity::from).collect())
    }

    fn save_all(&self, entities: &[&MemberEntity]) -> LibraryResult<usize> {
        let records: Vec<MemberRecord> = entities.iter().map(|m| MemberRecord::from(*m)).collect();
        write_records(&self.path, &MEMBER_COLUMNS, &records)
    }
}

impl MemberRepository for CsvMemberRepository {}

#[cfg(test)]
mod tests {
    use std::fs;
    use chrono::Utc;
    use crate::core::library::LibraryError;
    use crate::core::repository::Repository;
    use crate::patrons::domain::model::{LoanEntity, MemberEntity};
    use crate::patrons::repository::csv_member_repository::CsvMemberRepository;

    #[test]
    fn test_should_persist_identity_columns_only() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("members.csv");
        let repo = CsvMemberRepository::new(&path);
        let mut member = MemberEntity::new(7, "Ada Lovelace", "Gold");
        member.fines = 12.0;
        member.loans.push(LoanEntity::new("B1", Utc::now().naive_utc()));
        repo.save_all(&[&member]).expect("should save");
        assert_eq!("member_id,name,membership_type\n7,Ada Lovelace,Gold\n",
                   fs::read_to_string(&path).expect("should read"));

        let loaded = repo.load_all().expect("should load");
        assert_eq!(vec![MemberEntity::new(7, "Ada Lovelace", "Gold")], loaded);
    }

    #[test]
    fn test_should_reject_non_integer_member_id() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("members.csv");
        fs::write(&path, "member_id,name,membership_type\nM1,Ada,Gold\n").expect("should write");
        let repo = CsvMemberRepository::new(&path);
        assert!(matches!(repo.load_all(), Err(LibraryError::Serialization{ message: _ })));
    }
}
