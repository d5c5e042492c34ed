//! The commands that can be run on an organization.

pub mod backup;
pub mod restore;
