//! Ask command: send a raw prompt to one answer backend

use serde::Serialize;

use crate::cli::{CommandContext, OutputFormat};
use crate::client::{AnswerApi, Backend};
use crate::error::{Error, Result};
use crate::output::json::format_json;

/// Answer to a raw prompt
#[derive(Debug, Serialize)]
pub struct AskResponse {
    pub backend: Backend,
    pub response: String,
}

/// Run the ask command
pub async fn run(ctx: &CommandContext, prompt: &str, backend: Backend) -> Result<()> {
    let client = ctx.answer_client(backend)?;
    let response = ask(client.as_ref(), prompt).await?;

    match ctx.format {
        OutputFormat::Json => println!("{}", format_json(&response)?),
        _ => println!("Response is: {}", response.response),
    }
    Ok(())
}

/// Send the prompt as-is; a backend failure yields its error status
pub async fn ask(client: &dyn AnswerApi, prompt: &str) -> Result<AskResponse> {
    if prompt.trim().is_empty() {
        return Err(Error::Input("prompt must not be empty".to_string()));
    }

    let outcome = client.answer(prompt).await;
    Ok(AskResponse {
        backend: client.backend(),
        response: outcome.into_status(),
    })
}
