//! Password + JWT authentication.
//!
//! - [`jwt`] -- access-token generation/validation and refresh-token helpers.
//! - [`gateway`] -- [`PgIdentityGateway`](gateway::PgIdentityGateway), the
//!   PostgreSQL-backed identity gateway built on [`jwt`] and
//!   [`homecarpent_core::password`].

pub mod gateway;
pub mod jwt;
