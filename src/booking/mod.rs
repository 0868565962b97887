//! Fyyur booking app: venues, artists and shows behind server-rendered pages.

pub mod flash;
pub mod forms;
pub mod pages;
pub mod routes;
pub mod store;

pub use routes::router;
