use std::io::{BufRead, Write};
use std::str::FromStr;
use tracing::info;
use crate::core::library::{LibraryResult, Role};
use crate::library::domain::LibraryService;
use crate::utils::date::DISPLAY_FMT;

// What a menu wants the caller to do next.
#[derive(Debug, PartialEq, Clone, Copy)]
enum Session {
    Logout,
    Exit,
}

// Shell drives the text menus over any line-oriented input and output.
pub struct Shell<R: BufRead, W: Write> {
    svc: Box<dyn LibraryService>,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    pub fn new(svc: Box<dyn LibraryService>, input: R, output: W) -> Self {
        Self { svc, input, output }
    }

    // Runs the top-level menu until the user exits or input ends.
    pub fn run(&mut self) -> LibraryResult<()> {
        loop {
            self.say("\nWelcome to the Library Management System")?;
            self.say("1. Admin Login")?;
            self.say("2. User Login")?;
            self.say("3. Exit")?;
            let Some(choice) = self.prompt("Enter your choice: ")? else {
                break;
            };
            let next = match choice.trim() {
                "1" => self.admin_login()?,
                "2" => self.user_login()?,
                "3" => Session::Exit,
                _ => {
                    self.say("Invalid choice. Try again.")?;
                    Session::Logout
                }
            };
            if next == Session::Exit {
                break;
            }
        }
        self.say("Exiting the system. Goodbye!")?;
        info!("shell stopped");
        Ok(())
    }

    fn admin_login(&mut self) -> LibraryResult<Session> {
        let Some(username) = self.prompt("Enter admin username: ")? else {
            return Ok(Session::Exit);
        };
        let Some(password) = self.prompt("Enter admin password: ")? else {
            return Ok(Session::Exit);
        };
        let auth = self.svc.authenticate(username.as_str(), password.as_str());
        match auth {
            Ok(user) if self.svc.role_of(user.as_str()) == Role::Admin => {
                self.say(format!("Welcome, {} (Admin)", user).as_str())?;
                self.admin_menu()
            }
            _ => {
                self.say("Invalid admin credentials.")?;
                Ok(Session::Logout)
            }
        }
    }

    fn user_login(&mut self) -> LibraryResult<Session> {
        let Some(username) = self.prompt("Enter username: ")? else {
            return Ok(Session::Exit);
        };
        let Some(password) = self.prompt("Enter password: ")? else {
            return Ok(Session::Exit);
        };
        let auth = self.svc.authenticate(username.as_str(), password.as_str());
        match auth {
            Ok(user) => {
                self.say(format!("Welcome, {} (User)", user).as_str())?;
                self.user_menu()
            }
            Err(_) => {
                self.say("Invalid user credentials.")?;
                Ok(Session::Logout)
            }
        }
    }

    fn admin_menu(&mut self) -> LibraryResult<Session> {
        loop {
            self.say("\nAdmin Menu:")?;
            self.say("1. Add Book")?;
            self.say("2. Add Member")?;
            self.say("3. Update Book")?;
            self.say("4. Update Member")?;
            self.say("5. View Available Books")?;
            self.say("6. View Members")?;
            self.say("7. View Issued Books")?;
            self.say("8. View Overdue Books")?;
            self.say("9. Add User")?;
            self.say("10. Logout")?;
            let Some(choice) = self.prompt("Enter your choice: ")? else {
                return Ok(Session::Exit);
            };
            let handled = match choice.trim() {
                "1" => self.add_book()?,
                "2" => self.add_member()?,
                "3" => self.update_book()?,
                "4" => self.update_member()?,
                "5" => Some(self.show_available_books()?),
                "6" => Some(self.show_members()?),
                "7" => Some(self.show_issued_books()?),
                "8" => Some(self.show_overdue_books()?),
                "9" => self.add_user()?,
                "10" => return Ok(Session::Logout),
                _ => Some(self.say("Invalid choice. Try again.")?),
            };
            if handled.is_none() {
                return Ok(Session::Exit);
            }
        }
    }

    fn user_menu(&mut self) -> LibraryResult<Session> {
        loop {
            self.say("\nUser Menu:")?;
            self.say("1. View Available Books")?;
            self.say("2. Issue Book")?;
            self.say("3. Return Book")?;
            self.say("4. Pay Fine")?;
            self.say("5. Logout")?;
            let Some(choice) = self.prompt("Enter your choice: ")? else {
                return Ok(Session::Exit);
            };
            let handled = match choice.trim() {
                "1" => Some(self.show_available_books()?),
                "2" => self.issue_book()?,
                "3" => self.return_book()?,
                "4" => self.pay_fine()?,
                "5" => return Ok(Session::Logout),
                _ => Some(self.say("Invalid choice. Try again.")?),
            };
            if handled.is_none() {
                return Ok(Session::Exit);
            }
        }
    }

    // Each action below returns None when input ended midway.

    fn add_book(&mut self) -> LibraryResult<Option<()>> {
        let Some(book_id) = self.prompt("Enter book ID: ")? else { return Ok(None) };
        let Some(title) = self.prompt("Enter book title: ")? else { return Ok(None) };
        let Some(author) = self.prompt("Enter book author: ")? else { return Ok(None) };
        let Some(genre) = self.prompt("Enter book genre: ")? else { return Ok(None) };
        let Some(copies) = self.prompt_number::<u32>("Enter number of copies: ")? else { return Ok(None) };
        let Some(copies) = copies else { return Ok(Some(())) };
        let line = match self.svc.add_book(&book_id, &title, &author, &genre, copies) {
            Ok(_) => "Book added successfully.".to_string(),
            Err(err) => err.to_string(),
        };
        self.say(&line).map(Some)
    }

    fn add_member(&mut self) -> LibraryResult<Option<()>> {
        let Some(member_id) = self.prompt_number::<i64>("Enter member ID: ")? else { return Ok(None) };
        let Some(name) = self.prompt("Enter member name: ")? else { return Ok(None) };
        let Some(membership_type) = self.prompt("Enter membership type: ")? else { return Ok(None) };
        let Some(member_id) = member_id else { return Ok(Some(())) };
        let line = match self.svc.add_member(member_id, &name, &membership_type) {
            Ok(_) => "Member added successfully.".to_string(),
            Err(err) => err.to_string(),
        };
        self.say(&line).map(Some)
    }

    fn update_book(&mut self) -> LibraryResult<Option<()>> {
        let Some(book_id) = self.prompt("Enter book ID to update: ")? else { return Ok(None) };
        let Some(title) = self.prompt("Enter new title (leave blank to skip): ")? else { return Ok(None) };
        let Some(author) = self.prompt("Enter new author (leave blank to skip): ")? else { return Ok(None) };
        let Some(genre) = self.prompt("Enter new genre (leave blank to skip): ")? else { return Ok(None) };
        let Some(copies) = self.prompt("Enter new number of copies (leave blank to skip): ")? else { return Ok(None) };
        let copies = if copies.trim().is_empty() {
            None
        } else {
            match copies.trim().parse::<u32>() {
                Ok(copies) => Some(copies),
                Err(_) => return self.say("Invalid number.").map(Some),
            }
        };
        let line = match self.svc.update_book(&book_id, Some(title.as_str()), Some(author.as_str()), Some(genre.as_str()), copies) {
            Ok(_) => format!("Book ID {} has been updated.", book_id),
            Err(err) => err.to_string(),
        };
        self.say(&line).map(Some)
    }

    fn update_member(&mut self) -> LibraryResult<Option<()>> {
        let Some(member_id) = self.prompt_number::<i64>("Enter member ID: ")? else { return Ok(None) };
        let Some(name) = self.prompt("Enter new name (leave blank to skip): ")? else { return Ok(None) };
        let Some(membership_type) = self.prompt("Enter new membership type (leave blank to skip): ")? else { return Ok(None) };
        let Some(member_id) = member_id else { return Ok(Some(())) };
        let line = match self.svc.update_member(member_id, Some(name.as_str()), Some(membership_type.as_str())) {
            Ok(_) => format!("Member ID {} has been updated.", member_id),
            Err(err) => err.to_string(),
        };
        self.say(&line).map(Some)
    }

    fn add_user(&mut self) -> LibraryResult<Option<()>> {
        let Some(username) = self.prompt("Enter new username: ")? else { return Ok(None) };
        let Some(password) = self.prompt("Enter new password: ")? else { return Ok(None) };
        let line = match self.svc.add_user(&username, &password) {
            Ok(_) => "User added successfully.".to_string(),
            Err(err) => err.to_string(),
        };
        self.say(&line).map(Some)
    }

    fn issue_book(&mut self) -> LibraryResult<Option<()>> {
        let Some(member_id) = self.prompt_number::<i64>("Enter your member ID: ")? else { return Ok(None) };
        let Some(book_id) = self.prompt("Enter the book ID to issue: ")? else { return Ok(None) };
        let Some(member_id) = member_id else { return Ok(Some(())) };
        let line = match self.svc.issue_book(member_id, &book_id) {
            Ok(_) => "Book issued successfully.".to_string(),
            Err(err) => err.to_string(),
        };
        self.say(&line).map(Some)
    }

    fn return_book(&mut self) -> LibraryResult<Option<()>> {
        let Some(member_id) = self.prompt_number::<i64>("Enter your member ID: ")? else { return Ok(None) };
        let Some(book_id) = self.prompt("Enter the book ID to return: ")? else { return Ok(None) };
        let Some(member_id) = member_id else { return Ok(Some(())) };
        let line = match self.svc.return_book(member_id, &book_id) {
            Ok(balance) => format!("Book returned. Current fine: {:.2}", balance),
            Err(err) => err.to_string(),
        };
        self.say(&line).map(Some)
    }

    fn pay_fine(&mut self) -> LibraryResult<Option<()>> {
        let Some(member_id) = self.prompt_number::<i64>("Enter your member ID: ")? else { return Ok(None) };
        let Some(amount) = self.prompt_number::<f64>("Enter amount to pay: ")? else { return Ok(None) };
        let (Some(member_id), Some(amount)) = (member_id, amount) else { return Ok(Some(())) };
        let line = match self.svc.pay_fine(member_id, amount) {
            Ok(balance) => format!("Fine paid. Remaining fine: {:.2}", balance),
            Err(err) => err.to_string(),
        };
        self.say(&line).map(Some)
    }

    fn show_available_books(&mut self) -> LibraryResult<()> {
        let books = self.svc.list_available_books();
        if books.is_empty() {
            return self.say("No books available.");
        }
        self.say("\nAvailable Books:")?;
        for book in books {
            self.say(format!("{}: {} by {} - {} copies", book.book_id, book.title, book.author, book.copies).as_str())?;
        }
        Ok(())
    }

    fn show_members(&mut self) -> LibraryResult<()> {
        let members = self.svc.list_members();
        if members.is_empty() {
            return self.say("No members available.");
        }
        for member in members {
            self.say(format!("Member ID: {}, Name: {}, Membership Type: {}, Fine: {:.2}",
                             member.member_id, member.name, member.membership_type, member.fines).as_str())?;
        }
        Ok(())
    }

    fn show_issued_books(&mut self) -> LibraryResult<()> {
        let issued = self.svc.list_issued_books();
        if issued.is_empty() {
            return self.say("No issued books.");
        }
        self.say("Issued Books:")?;
        for loan in issued {
            self.say(format!("{} - {} - issued {}", loan.title, loan.member_name,
                             loan.issued_at.format(DISPLAY_FMT)).as_str())?;
        }
        Ok(())
    }

    fn show_overdue_books(&mut self) -> LibraryResult<()> {
        let overdue = self.svc.list_overdue_books();
        if overdue.is_empty() {
            return self.say("No overdue books.");
        }
        self.say("Overdue Books:")?;
        for loan in overdue {
            self.say(format!("{} - {} - fine {:.2}", loan.title, loan.member_name, loan.fine).as_str())?;
        }
        Ok(())
    }

    fn say(&mut self, line: &str) -> LibraryResult<()> {
        writeln!(self.output, "{}", line)?;
        Ok(())
    }

    // None at end of input; the trailing line break is dropped, other whitespace is kept
    fn prompt(&mut self, label: &str) -> LibraryResult<Option<String>> {
        write!(self.output, "{}", label)?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\n', '\r']).to_string()))
    }

    // Some(None) when the text is not a number; the user is told and the action is skipped
    fn prompt_number<T: FromStr>(&mut self, label: &str) -> LibraryResult<Option<Option<T>>> {
        let Some(text) = self.prompt(label)? else {
            return Ok(None);
        };
        match text.trim().parse::<T>() {
            Ok(value) => Ok(Some(Some(value))),
            Err(_) => {
                self.say("Invalid number.")?;
                Ok(Some(None))
            }
        }
    }
}
