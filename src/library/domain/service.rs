use std::collections::BTreeMap;
use tracing::{debug, info, warn};
use crate::books::domain::Book;
use crate::books::domain::model::BookEntity;
use crate::books::dto::BookDto;
use crate::books::repository::BookRepository;
use crate::core::domain::{Configuration, Identifiable};
use crate::core::events::DomainEvent;
use crate::core::library::{FinePolicy, LibraryError, LibraryResult, Role};
use crate::gateway::events::EventPublisher;
use crate::library::domain::LibraryService;
use crate::library::dto::{IssuedBookDto, OverdueBookDto};
use crate::patrons::domain::model::{FineRules, MemberEntity};
use crate::patrons::dto::MemberDto;
use crate::patrons::repository::MemberRepository;
use crate::users::domain::model::UserEntity;
use crate::users::repository::UserRepository;
use crate::utils::date::Clock;

pub struct LibraryServiceImpl {
    rules: FineRules,
    admin_username: String,
    books: BTreeMap<String, BookEntity>,
    members: BTreeMap<i64, MemberEntity>,
    users: BTreeMap<String, UserEntity>,
    book_repository: Box<dyn BookRepository>,
    member_repository: Box<dyn MemberRepository>,
    user_repository: Box<dyn UserRepository>,
    events_publisher: Box<dyn EventPublisher>,
    clock: Box<dyn Clock>,
}

impl LibraryServiceImpl {
    pub fn new(config: &Configuration, book_repository: Box<dyn BookRepository>,
               member_repository: Box<dyn MemberRepository>, user_repository: Box<dyn UserRepository>,
               events_publisher: Box<dyn EventPublisher>, clock: Box<dyn Clock>) -> Self {
        Self {
            rules: FineRules::from(config),
            admin_username: config.admin_username.to_string(),
            books: BTreeMap::new(),
            members: BTreeMap::new(),
            users: BTreeMap::new(),
            book_repository,
            member_repository,
            user_repository,
            events_publisher,
            clock,
        }
    }

    // Replaces in-memory state with the three stored datasets, each loaded on its own.
    pub fn load(&mut self) -> LibraryResult<()> {
        self.books = self.book_repository.load_all()?
            .into_iter().map(|b| (b.id(), b)).collect();
        self.members = self.member_repository.load_all()?
            .into_iter().map(|m| (m.member_id, m)).collect();
        self.users = self.user_repository.load_all()?
            .into_iter().map(|u| (u.id(), u)).collect();
        info!(books = self.books.len(), members = self.members.len(), users = self.users.len(),
            policy = %self.rules.policy, "library loaded");
        Ok(())
    }

    fn save_books(&self) -> LibraryResult<usize> {
        let records: Vec<&BookEntity> = self.books.values().collect();
        self.book_repository.save_all(&records)
    }

    fn save_members(&self) -> LibraryResult<usize> {
        let records: Vec<&MemberEntity> = self.members.values().collect();
        self.member_repository.save_all(&records)
    }

    fn save_users(&self) -> LibraryResult<usize> {
        let records: Vec<&UserEntity> = self.users.values().collect();
        self.user_repository.save_all(&records)
    }

    fn title_of(&self, book_id: &str) -> String {
        self.books.get(book_id).map(|b| b.title.to_string()).unwrap_or_else(|| book_id.to_string())
    }
}

// blank input means "leave unchanged"
fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

impl LibraryService for LibraryServiceImpl {
    fn add_book(&mut self, book_id: &str, title: &str, author: &str, genre: &str, copies: u32) -> LibraryResult<BookDto> {
        let book = BookEntity::new(book_id, title, author, genre, copies);
        let dto = BookDto::from(&book);
        self.books.insert(book.id(), book);
        self.save_books()?;
        info!(book_id, copies, "book added");
        self.events_publisher.publish(&DomainEvent::added("book_added", "books", book_id, &dto)?)?;
        Ok(dto)
    }

    fn update_book(&mut self, book_id: &str, title: Option<&str>, author: Option<&str>,
                   genre: Option<&str>, copies: Option<u32>) -> LibraryResult<BookDto> {
        let Some(book) = self.books.get_mut(book_id) else {
            return Err(LibraryError::invalid_reference("Invalid book ID."));
        };
        if let Some(title) = non_blank(title) {
            book.title = title.to_string();
        }
        if let Some(author) = non_blank(author) {
            book.author = author.to_string();
        }
        if let Some(genre) = non_blank(genre) {
            book.genre = genre.to_string();
        }
        if let Some(copies) = copies {
            book.copies = copies;
        }
        let dto = BookDto::from(&*book);
        self.save_books()?;
        info!(book_id, "book updated");
        self.events_publisher.publish(&DomainEvent::updated("book_updated", "books", book_id, &dto)?)?;
        Ok(dto)
    }

    fn add_member(&mut self, member_id: i64, name: &str, membership_type: &str) -> LibraryResult<MemberDto> {
        let member = MemberEntity::new(member_id, name, membership_type);
        let dto = MemberDto::from(&member);
        let key = member.id();
        self.members.insert(member_id, member);
        self.save_members()?;
        info!(member_id, "member added");
        self.events_publisher.publish(&DomainEvent::added("member_added", "members", key.as_str(), &dto)?)?;
        Ok(dto)
    }

    fn update_member(&mut self, member_id: i64, name: Option<&str>,
                     membership_type: Option<&str>) -> LibraryResult<MemberDto> {
        let Some(member) = self.members.get_mut(&member_id) else {
            return Err(LibraryError::invalid_reference("Invalid member ID."));
        };
        if let Some(name) = non_blank(name) {
            member.name = name.to_string();
        }
        if let Some(membership_type) = non_blank(membership_type) {
            member.membership_type = membership_type.to_string();
        }
        let dto = MemberDto::from(&*member);
        let key = member.id();
        self.save_members()?;
        info!(member_id, "member updated");
        self.events_publisher.publish(&DomainEvent::updated("member_updated", "members", key.as_str(), &dto)?)?;
        Ok(dto)
    }

    fn add_user(&mut self, username: &str, password: &str) -> LibraryResult<()> {
        let user = UserEntity::new(username, password);
        self.users.insert(user.id(), user);
        self.save_users()?;
        info!(username, "user added");
        self.events_publisher.publish(&DomainEvent::added("user_added", "users", username, &username)?)?;
        Ok(())
    }

    fn issue_book(&mut self, member_id: i64, book_id: &str) -> LibraryResult<IssuedBookDto> {
        let now = self.clock.now();
        let (Some(member), Some(book)) = (self.members.get_mut(&member_id), self.books.get_mut(book_id)) else {
            return Err(LibraryError::not_found("Book or member not found."));
        };
        let res = member.issue_book(book, now).map(|_| IssuedBookDto::new(book, member, now));
        // both datasets are written whether or not a copy was available
        self.save_books()?;
        self.save_members()?;
        let issued = res?;
        info!(member_id, book_id, "book issued");
        self.events_publisher.publish(&DomainEvent::added("book_issued", "loans", book_id, &issued)?)?;
        Ok(issued)
    }

    fn return_book(&mut self, member_id: i64, book_id: &str) -> LibraryResult<f64> {
        let now = self.clock.now();
        let rules = self.rules;
        let Some(member) = self.members.get_mut(&member_id) else {
            return Err(LibraryError::not_found("Member not found."));
        };
        let res = match self.books.get_mut(book_id) {
            Some(book) => member.return_book(book, now, &rules),
            None => Err(LibraryError::not_found("Book not found.")),
        };
        self.save_books()?;
        self.save_members()?;
        let balance = res?;
        info!(member_id, book_id, balance, "book returned");
        self.events_publisher.publish(&DomainEvent::deleted("book_returned", "loans", book_id, &balance)?)?;
        Ok(balance)
    }

    fn pay_fine(&mut self, member_id: i64, amount: f64) -> LibraryResult<f64> {
        let Some(member) = self.members.get_mut(&member_id) else {
            return Err(LibraryError::not_found("Member not found."));
        };
        let balance = member.pay_fine(amount);
        if balance < 0.0 {
            warn!(member_id, balance, "fine overpaid");
        }
        self.save_members()?;
        info!(member_id, amount, balance, "fine paid");
        self.events_publisher.publish(&DomainEvent::updated(
            "fine_paid", "members", member_id.to_string().as_str(), &balance)?)?;
        Ok(balance)
    }

    fn find_book_by_id(&self, book_id: &str) -> LibraryResult<BookDto> {
        self.books.get(book_id)
            .map(BookDto::from)
            .ok_or_else(|| LibraryError::not_found(format!("book not found for {}", book_id).as_str()))
    }

    fn find_member_by_id(&self, member_id: i64) -> LibraryResult<MemberDto> {
        self.members.get(&member_id)
            .map(MemberDto::from)
            .ok_or_else(|| LibraryError::not_found(format!("member not found for {}", member_id).as_str()))
    }

    fn list_available_books(&self) -> Vec<BookDto> {
        self.books.values()
            .filter(|b| b.is_available())
            .map(BookDto::from)
            .collect()
    }

    fn list_members(&self) -> Vec<MemberDto> {
        self.members.values().map(MemberDto::from).collect()
    }

    fn list_issued_books(&self) -> Vec<IssuedBookDto> {
        self.members.values()
            .flat_map(|member| member.loans.iter().map(move |loan| (member, loan)))
            .map(|(member, loan)| IssuedBookDto {
                book_id: loan.book_id.to_string(),
                title: self.title_of(loan.book_id.as_str()),
                member_id: member.member_id,
                member_name: member.name.to_string(),
                issued_at: loan.issued_at,
            })
            .collect()
    }

    // Under the cumulative policy the reported figure is the member's running balance after
    // charging the loan again, so listing twice charges twice.
    fn list_overdue_books(&mut self) -> Vec<OverdueBookDto> {
        let now = self.clock.now();
        let rules = self.rules;
        let mut overdue = vec![];
        for member in self.members.values_mut() {
            let book_ids: Vec<String> = member.loans.iter().map(|l| l.book_id.to_string()).collect();
            for book_id in book_ids {
                let fine = match rules.policy {
                    FinePolicy::Cumulative => member.calculate_fine(book_id.as_str(), now, &rules),
                    FinePolicy::OnReturn => member.assess_fine(book_id.as_str(), now, &rules),
                };
                if fine > 0.0 {
                    let title = self.books.get(&book_id)
                        .map(|b| b.title.to_string())
                        .unwrap_or_else(|| book_id.to_string());
                    overdue.push(OverdueBookDto {
                        book_id,
                        title,
                        member_id: member.member_id,
                        member_name: member.name.to_string(),
                        fine,
                    });
                }
            }
        }
        debug!(overdue = overdue.len(), "overdue books listed");
        overdue
    }

    fn authenticate(&self, username: &str, password: &str) -> LibraryResult<String> {
        match self.users.get(username) {
            Some(user) if user.matches(password) => {
                info!(username, "login succeeded");
                Ok(user.username.to_string())
            }
            _ => {
                warn!(username, "login failed");
                Err(LibraryError::auth_failure("Invalid credentials."))
            }
        }
    }

    fn role_of(&self, username: &str) -> Role {
        if username == self.admin_username {
            Role::Admin
        } else {
            Role::Patron
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;
    use chrono::{Duration, NaiveDate};
    use crate::books::domain::model::BookEntity;
    use crate::core::domain::Configuration;
    use crate::core::events::DomainEventType;
    use crate::core::library::{FinePolicy, LibraryError, Role};
    use crate::core::repository::{MemoryRepository, Repository};
    use crate::gateway::events::MemoryPublisher;
    use crate::library::domain::LibraryService;
    use crate::library::domain::service::LibraryServiceImpl;
    use crate::patrons::domain::model::MemberEntity;
    use crate::users::domain::model::UserEntity;
    use crate::utils::date::FixedClock;

    struct Fixture {
        svc: LibraryServiceImpl,
        books: MemoryRepository<BookEntity>,
        members: MemoryRepository<MemberEntity>,
        users: MemoryRepository<UserEntity>,
        publisher: MemoryPublisher,
        clock: FixedClock,
    }

    fn fixture_with(policy: FinePolicy) -> Fixture {
        let mut config = Configuration::new(Path::new("."));
        config.fine_policy = policy;
        let books = MemoryRepository::new(vec![]);
        let members = MemoryRepository::new(vec![]);
        let users = MemoryRepository::new(vec![UserEntity::new("admin", "admin123"),
                                               UserEntity::new("ada", "pw")]);
        let publisher = MemoryPublisher::new();
        let clock = FixedClock::new(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap().and_hms_opt(10, 0, 0).unwrap());
        let mut svc = LibraryServiceImpl::new(&config, Box::new(books.clone()), Box::new(members.clone()),
                                              Box::new(users.clone()), Box::new(publisher.clone()),
                                              Box::new(clock.clone()));
        svc.load().expect("should load");
        Fixture { svc, books, members, users, publisher, clock }
    }

    fn fixture() -> Fixture {
        fixture_with(FinePolicy::Cumulative)
    }

    #[test]
    fn test_should_add_book_and_persist() {
        let mut f = fixture();
        let book = f.svc.add_book("B1", "Dune", "Herbert", "SF", 2).expect("should add book");
        assert_eq!("Dune", book.title.as_str());
        assert_eq!(vec![BookEntity::new("B1", "Dune", "Herbert", "SF", 2)], f.books.load_all().expect("should load"));
        let events = f.publisher.events();
        assert_eq!(1, events.len());
        assert_eq!(DomainEventType::Added, events[0].kind);
    }

    #[test]
    fn test_should_overwrite_existing_book_on_add() {
        let mut f = fixture();
        f.svc.add_book("B1", "Dune", "Herbert", "SF", 2).expect("should add book");
        f.svc.add_book("B1", "Dune Messiah", "Herbert", "SF", 5).expect("should add book");
        let book = f.svc.find_book_by_id("B1").expect("should find book");
        assert_eq!("Dune Messiah", book.title.as_str());
        assert_eq!(5, book.copies);
        assert_eq!(1, f.books.load_all().expect("should load").len());
    }

    #[test]
    fn test_should_skip_blank_fields_on_update() {
        let mut f = fixture();
        f.svc.add_book("B1", "Dune", "Herbert", "SF", 2).expect("should add book");
        let book = f.svc.update_book("B1", Some(""), Some("Frank Herbert"), None, None).expect("should update");
        assert_eq!("Dune", book.title.as_str());
        assert_eq!("Frank Herbert", book.author.as_str());
        assert_eq!("SF", book.genre.as_str());
        assert_eq!(2, book.copies);
        let book = f.svc.update_book("B1", None, None, None, Some(0)).expect("should update");
        assert_eq!(0, book.copies);
        assert_eq!(0, f.books.load_all().expect("should load")[0].copies);
    }

    #[test]
    fn test_should_reject_update_of_unknown_book() {
        let mut f = fixture();
        let res = f.svc.update_book("B9", Some("x"), None, None, None);
        assert!(matches!(res, Err(LibraryError::InvalidReference{ message: _ })));
    }

    #[test]
    fn test_should_add_and_update_member() {
        let mut f = fixture();
        f.svc.add_member(1, "Ada", "Gold").expect("should add member");
        let member = f.svc.update_member(1, Some(""), Some("Silver")).expect("should update member");
        assert_eq!("Ada", member.name.as_str());
        assert_eq!("Silver", member.membership_type.as_str());
        assert_eq!("Silver", f.members.load_all().expect("should load")[0].membership_type.as_str());
        assert!(matches!(f.svc.update_member(2, Some("Bob"), None), Err(LibraryError::InvalidReference{ message: _ })));
    }

    #[test]
    fn test_should_issue_until_no_copies_left() {
        let mut f = fixture();
        f.svc.add_book("B1", "Dune", "Herbert", "SF", 2).expect("should add book");
        f.svc.add_member(1, "Ada", "Gold").expect("should add member");

        f.svc.issue_book(1, "B1").expect("should issue");
        assert_eq!(1, f.svc.find_book_by_id("B1").expect("should find").copies);
        f.svc.issue_book(1, "B1").expect("should issue again");
        assert_eq!(0, f.svc.find_book_by_id("B1").expect("should find").copies);

        let res = f.svc.issue_book(1, "B1");
        assert!(matches!(res, Err(LibraryError::Unavailable{ message: _ })));
        assert_eq!(0, f.svc.find_book_by_id("B1").expect("should find").copies);
        assert_eq!(2, f.svc.find_member_by_id(1).expect("should find").loans);
        assert_eq!(0, f.books.load_all().expect("should load")[0].copies);
        assert!(f.svc.list_available_books().is_empty());
    }

    #[test]
    fn test_should_not_issue_to_unknown_member_or_book() {
        let mut f = fixture();
        f.svc.add_book("B1", "Dune", "Herbert", "SF", 2).expect("should add book");
        f.svc.add_member(1, "Ada", "Gold").expect("should add member");
        assert!(matches!(f.svc.issue_book(2, "B1"), Err(LibraryError::NotFound{ message: _ })));
        assert!(matches!(f.svc.issue_book(1, "B2"), Err(LibraryError::NotFound{ message: _ })));
        assert_eq!(2, f.svc.find_book_by_id("B1").expect("should find").copies);
    }

    #[test]
    fn test_should_keep_copy_counts_balanced() {
        let mut f = fixture();
        f.svc.add_book("B1", "Dune", "Herbert", "SF", 3).expect("should add book");
        f.svc.add_member(1, "Ada", "Gold").expect("should add member");
        f.svc.add_member(2, "Bob", "Basic").expect("should add member");
        f.svc.issue_book(1, "B1").expect("should issue");
        f.svc.issue_book(2, "B1").expect("should issue");
        f.svc.return_book(1, "B1").expect("should return");
        f.svc.issue_book(2, "B1").expect("should issue");
        // 3 issues, 1 return
        assert_eq!(1, f.svc.find_book_by_id("B1").expect("should find").copies);

        let res = f.svc.return_book(1, "B1");
        assert!(matches!(res, Err(LibraryError::NotFound{ message: _ })));
        assert_eq!(1, f.svc.find_book_by_id("B1").expect("should find").copies);
        assert!(matches!(f.svc.return_book(9, "B1"), Err(LibraryError::NotFound{ message: _ })));
    }

    #[test]
    fn test_should_refuse_return_when_copy_count_is_at_ceiling() {
        let mut f = fixture();
        f.svc.add_book("B1", "Dune", "Herbert", "SF", 1).expect("should add book");
        f.svc.add_member(1, "Ada", "Gold").expect("should add member");
        f.svc.issue_book(1, "B1").expect("should issue");
        f.svc.update_book("B1", None, None, None, Some(u32::MAX)).expect("should update");

        let res = f.svc.return_book(1, "B1");
        assert!(matches!(res, Err(LibraryError::Validation{ message: _, reason_code: _ })));
        assert_eq!(u32::MAX, f.svc.find_book_by_id("B1").expect("should find").copies);
        assert_eq!(1, f.svc.find_member_by_id(1).expect("should find").loans);
        assert_eq!(1, f.svc.list_issued_books().len());
    }

    #[test]
    fn test_should_list_issued_books() {
        let mut f = fixture();
        f.svc.add_book("B1", "Dune", "Herbert", "SF", 3).expect("should add book");
        f.svc.add_member(1, "Ada", "Gold").expect("should add member");
        let issued = f.svc.issue_book(1, "B1").expect("should issue");
        let listed = f.svc.list_issued_books();
        assert_eq!(vec![issued.clone()], listed);
        assert_eq!("Dune", listed[0].title.as_str());
        assert_eq!("Ada", listed[0].member_name.as_str());
        assert_eq!(f.clock_now(), listed[0].issued_at);
    }

    #[test]
    fn test_should_accumulate_fines_when_listing_overdue() {
        let mut f = fixture();
        f.svc.add_book("B1", "Dune", "Herbert", "SF", 1).expect("should add book");
        f.svc.add_member(1, "Ada", "Gold").expect("should add member");
        f.svc.issue_book(1, "B1").expect("should issue");

        f.clock.advance(Duration::days(14));
        assert!(f.svc.list_overdue_books().is_empty());

        f.clock.advance(Duration::days(3));
        let overdue = f.svc.list_overdue_books();
        assert_eq!(1, overdue.len());
        assert_eq!(3.0, overdue[0].fine);
        assert_eq!("Dune", overdue[0].title.as_str());
        // listing again charges the same three days again
        assert_eq!(6.0, f.svc.list_overdue_books()[0].fine);
        assert_eq!(6.0, f.svc.find_member_by_id(1).expect("should find").fines);
    }

    #[test]
    fn test_should_report_overdue_without_charging_under_on_return_policy() {
        let mut f = fixture_with(FinePolicy::OnReturn);
        f.svc.add_book("B1", "Dune", "Herbert", "SF", 1).expect("should add book");
        f.svc.add_member(1, "Ada", "Gold").expect("should add member");
        f.svc.issue_book(1, "B1").expect("should issue");
        f.clock.advance(Duration::days(17));
        assert_eq!(3.0, f.svc.list_overdue_books()[0].fine);
        assert_eq!(3.0, f.svc.list_overdue_books()[0].fine);
        assert_eq!(0.0, f.svc.find_member_by_id(1).expect("should find").fines);
        assert_eq!(3.0, f.svc.return_book(1, "B1").expect("should return"));
        assert!(f.svc.list_overdue_books().is_empty());
    }

    #[test]
    fn test_should_allow_negative_balance_on_pay_fine() {
        let mut f = fixture();
        f.svc.add_book("B1", "Dune", "Herbert", "SF", 1).expect("should add book");
        f.svc.add_member(1, "Ada", "Gold").expect("should add member");
        f.svc.issue_book(1, "B1").expect("should issue");
        f.clock.advance(Duration::days(17));
        f.svc.list_overdue_books();
        assert_eq!(-2.0, f.svc.pay_fine(1, 5.0).expect("should pay"));
        assert!(matches!(f.svc.pay_fine(2, 1.0), Err(LibraryError::NotFound{ message: _ })));
    }

    #[test]
    fn test_should_authenticate_plaintext_credentials() {
        let mut f = fixture();
        f.svc.add_member(1, "Ada", "Gold").expect("should add member");
        assert!(matches!(f.svc.authenticate("ada", "wrong"), Err(LibraryError::AuthFailure{ message: _ })));
        assert!(matches!(f.svc.authenticate("nobody", "pw"), Err(LibraryError::AuthFailure{ message: _ })));
        assert_eq!("ada", f.svc.authenticate("ada", "pw").expect("should authenticate").as_str());
        assert_eq!(Role::Admin, f.svc.role_of("admin"));
        assert_eq!(Role::Patron, f.svc.role_of("ada"));
    }

    #[test]
    fn test_should_add_user_and_persist() {
        let mut f = fixture();
        f.svc.add_user("bob", "hunter2").expect("should add user");
        assert_eq!("bob", f.svc.authenticate("bob", "hunter2").expect("should authenticate").as_str());
        assert_eq!(3, f.users.load_all().expect("should load").len());
    }

    #[test]
    fn test_should_list_members_with_balance() {
        let mut f = fixture();
        f.svc.add_member(2, "Bob", "Basic").expect("should add member");
        f.svc.add_member(1, "Ada", "Gold").expect("should add member");
        f.svc.pay_fine(1, 1.5).expect("should pay");
        let members = f.svc.list_members();
        assert_eq!(2, members.len());
        assert_eq!(1, members[0].member_id);
        assert_eq!(-1.5, members[0].fines);
    }

    impl Fixture {
        fn clock_now(&self) -> chrono::NaiveDateTime {
            use crate::utils::date::Clock;
            self.clock.now()
        }
    }
}
