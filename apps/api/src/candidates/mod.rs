// Candidate records: persistence, listing filters, lifecycle and HTTP handlers.

pub mod filter;
pub mod form;
pub mod handlers;
pub mod repository;
pub mod stats;
pub mod status;
