//! Infrastructure adapters for the auth core's collaborator traits.

pub mod postgres;

pub use postgres::{
    PostgresCredentialStore, PostgresRevocationLedger, connect, ensure_schema, seed_roles,
};
