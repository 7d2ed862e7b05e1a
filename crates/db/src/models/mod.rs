//! Row structs and insert DTOs.
//!
//! Each submodule contains a `FromRow` entity matching the database row and,
//! where rows are inserted through a repository, a create DTO.

pub mod profile;
pub mod session;
pub mod user;
