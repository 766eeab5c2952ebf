pub mod engine;
pub mod filters;
pub mod query_string;
pub mod session;
pub mod sort;
