use serde::{Deserialize, Serialize};
use crate::patrons::domain::model::MemberEntity;
use crate::patrons::Patron;

// MemberDto is the member listing row: identity, class and current balance.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct MemberDto {
    pub member_id: i64,
    pub name: String,
    pub membership_type: String,
    pub fines: f64,
    pub loans: usize,
}

impl From<&MemberEntity> for MemberDto {
    fn from(other: &MemberEntity) -> Self {
        Self {
            member_id: other.member_id,
            name: other.name.to_string(),
            membership_type: other.membership_type.to_string(),
            fines: other.fine_balance(),
            loans: other.loan_count(),
        }
    }
}
