pub mod config;
pub mod errors;
pub mod llm;
pub mod recipe;
pub mod routes;
