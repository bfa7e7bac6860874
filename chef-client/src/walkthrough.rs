//! Reading a recipe one step at a time.

use chef::basic_models::RecipeResponse;

pub const RECIPE_NOT_FOUND: &str = "Recipe not found. Please try another dish.";
pub const FETCH_FAILED: &str = "Error fetching recipe. Please try again.";
pub const NOT_UNDERSTOOD: &str = "Sorry, I didn't understand the command.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Next,
    Repeat,
    StartOver,
    Unknown,
}

impl Command {
    /// Commands are matched loosely, so "ok, next please" still means `Next`.
    pub fn parse(input: &str) -> Self {
        let input = input.to_lowercase();
        if input.contains("next") {
            Command::Next
        } else if input.contains("repeat") {
            Command::Repeat
        } else if input.contains("start over") {
            Command::StartOver
        } else {
            Command::Unknown
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Walkthrough {
    steps: Vec<String>,
    current: usize,
}

impl Walkthrough {
    pub fn new(steps: Vec<String>) -> Self {
        Self { steps, current: 0 }
    }

    /// Start a walkthrough from whatever the server said.
    /// An error reply is shown as a single placeholder step.
    pub fn from_response(response: RecipeResponse) -> Self {
        match response {
            RecipeResponse::Steps { steps } => Self::new(steps),
            RecipeResponse::Error { error } => {
                tracing::warn!("Server could not produce a recipe: {}", error);
                Self::new(vec![RECIPE_NOT_FOUND.into()])
            }
        }
    }

    /// For when the server could not be reached at all.
    pub fn fetch_failed() -> Self {
        Self::new(vec![FETCH_FAILED.into()])
    }

    pub fn steps(&self) -> &[String] {
        &self.steps
    }

    /// 1-based number of the current step
    pub fn position(&self) -> usize {
        self.current + 1
    }

    pub fn current(&self) -> Option<&str> {
        self.steps.get(self.current).map(String::as_str)
    }

    /// Apply a command and return what should be read out, if anything.
    ///
    /// `Next` on the last step stays put and says nothing.
    pub fn apply(&mut self, command: Command) -> Option<&str> {
        match command {
            Command::Next => {
                if self.current + 1 < self.steps.len() {
                    self.current += 1;
                    self.current()
                } else {
                    None
                }
            }
            Command::Repeat => self.current(),
            Command::StartOver => {
                self.current = 0;
                self.current()
            }
            Command::Unknown => Some(NOT_UNDERSTOOD),
        }
    }
}
