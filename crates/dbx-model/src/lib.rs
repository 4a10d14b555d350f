//! # dbx-model
//!
//! Data model for workspace applications and their access-control lists.
//!
//! This crate holds the wire types exchanged with the management API and
//! the two pure transforms applied to every list before it is written
//! back:
//! - [`strip_group`] removes every grant to a given group
//! - [`normalize`] reduces each surviving grant to
//!   `{user_name, group_name, permission_level}`

#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(missing_docs)]

pub mod app;
mod de;
pub mod permission;

pub use app::{AppList, AppResource};
pub use permission::{
    normalize, strip_group, AccessControlList, AccessControlUpdate, NormalizedEntry,
    PermissionEntry, ACCOUNT_USERS_GROUP,
};
