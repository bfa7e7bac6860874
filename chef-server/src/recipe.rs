use crate::llm::{ChatProvider, LlmError, RecipePrompt};

/// Break a completion into steps: one per non-blank line, in order.
///
/// Lines are kept exactly as written; only the blank check trims.
pub fn extract_steps(text: &str) -> Vec<String> {
    text.split('\n')
        .filter(|line| !line.trim().is_empty())
        .map(str::to_owned)
        .collect()
}

/// Ask the provider for a recipe and split its answer into steps.
pub async fn get_recipe_steps(
    provider: &dyn ChatProvider,
    dish: &str,
) -> Result<Vec<String>, LlmError> {
    tracing::info!("Requesting recipe for {:?} from {}", dish, provider.model_name());
    let prompt = RecipePrompt::for_dish(dish);
    let text = provider.complete(&prompt).await?;
    let steps = extract_steps(&text);
    tracing::debug!("Recipe for {:?} has {} steps", dish, steps.len());
    Ok(steps)
}
