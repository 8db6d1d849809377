//! `guardpost-core`: identifiers and the error taxonomy shared by every
//! guardpost crate.
//!
//! This crate contains no IO and no policy; it only names things.

pub mod error;
pub mod id;

pub use error::{AuthError, AuthResult, ErrorKind};
pub use id::{PrincipalId, RoleId};
