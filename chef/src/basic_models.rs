use serde::{Deserialize, Serialize};

/// Body of `POST /api/get-recipe`.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct RecipeRequest {
    pub dish: String,
}

/// Reply to `POST /api/get-recipe`.
///
/// On the wire this is either `{"steps": [...]}` or `{"error": "..."}`, never both.
/// Both are sent with a 200 status, so callers have to look at the body to tell them apart.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum RecipeResponse {
    Steps { steps: Vec<String> },
    Error { error: String },
}

impl RecipeResponse {
    /// Collapse the outcome of a recipe lookup into the wire shape.
    /// The error keeps only its display text.
    pub fn from_result<E: std::fmt::Display>(result: Result<Vec<String>, E>) -> Self {
        match result {
            Ok(steps) => RecipeResponse::Steps { steps },
            Err(e) => RecipeResponse::Error {
                error: e.to_string(),
            },
        }
    }

    pub fn steps(&self) -> Option<&[String]> {
        match self {
            RecipeResponse::Steps { steps } => Some(steps),
            RecipeResponse::Error { .. } => None,
        }
    }
}
