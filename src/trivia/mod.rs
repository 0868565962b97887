//! Trivia JSON API: categories, questions and quizzes under `/api`.

pub mod error;
pub mod routes;
pub mod store;

pub use routes::router;
