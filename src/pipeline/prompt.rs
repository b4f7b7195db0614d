//! Prompt templates for DRM classification

/// Build the base classification prompt for a game
pub fn base_prompt(game_name: &str) -> String {
    format!(
        r#"
What is the DRM for the STEAM PC game '{game_name}'?
- If the game has Denuvo, respond with ONLY the word "Denuvo".
- If it has another known DRM (like Steam DRM), respond with ONLY the name of the DRM.
- If the game is DRM-Free, respond with ONLY the phrase "DRM-Free".
- If you cannot determine the DRM, respond with "Could not be determined".
- Focus only on the STEAM version of the game.
- Be extremely concise. Your entire response should be just the DRM status.
"#
    )
}

/// Append web search context to a prompt.
///
/// The block is appended even when `search_context` is empty.
pub fn with_search_context(prompt: &str, search_context: &str) -> String {
    format!(
        r#"{prompt}

Base your answer ONLY on the following real-time web search context:
<context>
{search_context}
</context>
"#
    )
}

/// Web search query used to gather context for a game
pub fn search_query(game_name: &str) -> String {
    format!("{} PC DRM Steam", game_name)
}
