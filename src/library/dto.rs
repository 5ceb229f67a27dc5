use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use crate::books::domain::model::BookEntity;
use crate::patrons::domain::model::MemberEntity;
use crate::utils::date::serializer;

// IssuedBookDto is one active loan: which title, held by whom, since when.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct IssuedBookDto {
    pub book_id: String,
    pub title: String,
    pub member_id: i64,
    pub member_name: String,
    #[serde(with = "serializer")]
    pub issued_at: NaiveDateTime,
}

impl IssuedBookDto {
    pub fn new(book: &BookEntity, member: &MemberEntity, issued_at: NaiveDateTime) -> Self {
        Self {
            book_id: book.book_id.to_string(),
            title: book.title.to_string(),
            member_id: member.member_id,
            member_name: member.name.to_string(),
            issued_at,
        }
    }
}

// OverdueBookDto is one active loan past its grace period with the fine figure reported for it.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct OverdueBookDto {
    pub book_id: String,
    pub title: String,
    pub member_id: i64,
    pub member_name: String,
    pub fine: f64,
}
