//! The polymorphic content contract and its eligibility policy.

pub mod gate;
pub mod policy;
pub mod schema;
pub mod service;

pub use schema::{ContentNode, ContentSchema};
pub use service::ContentService;
