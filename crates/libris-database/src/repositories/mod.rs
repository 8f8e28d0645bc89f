//! Repository implementations for all Libris entities.

pub mod book;
pub mod copy;
pub mod loan;
pub mod user;

pub use book::BookRepository;
pub use copy::CopyRepository;
pub use loan::LoanRepository;
pub use user::UserRepository;
