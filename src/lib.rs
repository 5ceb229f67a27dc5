pub mod core {
    pub mod domain;
    pub mod events;
    pub mod library;
    pub mod repository;
}

pub mod utils {
    pub mod date;
    pub mod logging;
    pub(crate) mod tabular;
}

pub mod books;
pub mod gateway;
pub mod library;
pub mod patrons;
pub mod shell;
pub mod users;
