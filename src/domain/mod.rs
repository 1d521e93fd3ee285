//! Domain types shared by the API client, services and templates.

pub mod client_survey;
pub mod pricing;
pub mod survey;
pub mod types;
pub mod user;
