//! Request handlers, one module per resource.

pub mod accounts;
pub mod applications;
pub mod follows;
pub mod jobs;
pub mod posts;
pub mod profiles;
