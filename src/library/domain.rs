use crate::books::dto::BookDto;
use crate::core::library::{LibraryResult, Role};
use crate::library::dto::{IssuedBookDto, OverdueBookDto};
use crate::patrons::dto::MemberDto;

pub mod service;

// LibraryService mediates every operation on the catalog, the members and the credentials.
// Each mutation is written through to its dataset before the call returns.
pub trait LibraryService {
    fn add_book(&mut self, book_id: &str, title: &str, author: &str, genre: &str, copies: u32) -> LibraryResult<BookDto>;

    // blank or absent fields keep their current value
    fn update_book(&mut self, book_id: &str, title: Option<&str>, author: Option<&str>,
                   genre: Option<&str>, copies: Option<u32>) -> LibraryResult<BookDto>;

    fn add_member(&mut self, member_id: i64, name: &str, membership_type: &str) -> LibraryResult<MemberDto>;

    // blank or absent fields keep their current value
    fn update_member(&mut self, member_id: i64, name: Option<&str>,
                     membership_type: Option<&str>) -> LibraryResult<MemberDto>;

    fn add_user(&mut self, username: &str, password: &str) -> LibraryResult<()>;

    fn issue_book(&mut self, member_id: i64, book_id: &str) -> LibraryResult<IssuedBookDto>;

    // returns the member's fine balance after the return
    fn return_book(&mut self, member_id: i64, book_id: &str) -> LibraryResult<f64>;

    // returns the remaining balance
    fn pay_fine(&mut self, member_id: i64, amount: f64) -> LibraryResult<f64>;

    fn find_book_by_id(&self, book_id: &str) -> LibraryResult<BookDto>;

    fn find_member_by_id(&self, member_id: i64) -> LibraryResult<MemberDto>;

    fn list_available_books(&self) -> Vec<BookDto>;

    fn list_members(&self) -> Vec<MemberDto>;

    fn list_issued_books(&self) -> Vec<IssuedBookDto>;

    // takes `&mut self` because the cumulative fine policy charges while reporting
    fn list_overdue_books(&mut self) -> Vec<OverdueBookDto>;

    fn authenticate(&self, username: &str, password: &str) -> LibraryResult<String>;

    fn role_of(&self, username: &str) -> Role;
}
