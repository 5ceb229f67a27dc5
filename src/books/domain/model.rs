use serde::{Deserialize, Serialize};
use crate::books::domain::Book;
use crate::core::domain::Identifiable;
use crate::core::library::{LibraryError, LibraryResult};

// BookEntity is one catalog title together with the number of copies still on the shelf.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct BookEntity {
    pub book_id: String,
    pub title: String,
    pub author: String,
    pub genre: String,
    pub copies: u32,
}

impl BookEntity {
    pub fn new(book_id: &str, title: &str, author: &str, genre: &str, copies: u32) -> Self {
        Self {
            book_id: book_id.to_string(),
            title: title.to_string(),
            author: author.to_string(),
            genre: genre.to_string(),
            copies,
        }
    }

    // takes one copy off the shelf; an empty shelf is left untouched
    pub(crate) fn take_copy(&mut self) -> LibraryResult<()> {
        if self.copies == 0 {
            return Err(LibraryError::unavailable("No copies available."));
        }
        self.copies -= 1;
        Ok(())
    }

    // puts one copy back on the shelf; a shelf already at the u32 ceiling is left untouched
    pub(crate) fn put_back_copy(&mut self) -> LibraryResult<()> {
        self.copies = self.copies.checked_add(1).ok_or_else(|| LibraryError::validation(
            "Too many copies on the shelf.", Some(format!("copies={}", self.copies))))?;
        Ok(())
    }
}

impl Identifiable for BookEntity {
    fn id(&self) -> String {
        self.book_id.to_string()
    }
}

impl Book for BookEntity {
    fn available_copies(&self) -> u32 {
        self.copies
    }
}
