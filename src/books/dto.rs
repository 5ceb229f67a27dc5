use serde::{Deserialize, Serialize};
use crate::books::domain::model::BookEntity;

// BookDto is a data transfer object for catalog listings and events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookDto {
    pub book_id: String,
    pub title: String,
    pub author: String,
    pub genre: String,
    pub copies: u32,
}

impl From<&BookEntity> for BookDto {
    fn from(other: &BookEntity) -> Self {
        Self {
            book_id: other.book_id.to_string(),
            title: other.title.to_string(),
            author: other.author.to_string(),
            genre: other.genre.to_string(),
            copies: other.copies,
        }
    }
}
