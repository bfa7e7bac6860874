pub mod client;
pub mod walkthrough;

pub use client::RecipeClient;
pub use walkthrough::{Command, Walkthrough};
