//! User aggregate: model and repository interface

mod model;
mod repository;

pub use model::User;
pub use repository::UserRepository;
