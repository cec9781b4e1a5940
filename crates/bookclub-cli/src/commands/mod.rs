pub mod admin;
pub mod books;
pub mod common;
pub mod completions;
pub mod genres;
pub mod guides;
pub mod pending;
pub mod user;
pub mod votes;
