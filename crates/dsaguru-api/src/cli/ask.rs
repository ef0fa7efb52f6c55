//! `dsaguru ask` command.

use anyhow::Result;
use console::style;

use dsaguru_core::pipeline::RequestContext;
use dsaguru_types::chat::{ChatExchange, PipelineResult};

use crate::state::AppState;

/// Run one question through the pipeline and print the outcome.
pub async fn ask(state: &AppState, user: &str, question: &str, json: bool) -> Result<()> {
    let ctx = RequestContext::new(user);
    let result = state.pipeline.handle_question(&ctx, question).await?;

    if json {
        let exchanges = [
            ChatExchange::user(question.trim()),
            ChatExchange::assistant(result.message()),
        ];
        let out = serde_json::json!({
            "request_id": ctx.request_id.to_string(),
            "result": result,
            "exchanges": exchanges,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!();
    match &result {
        PipelineResult::Denied { .. } => {
            println!("  {} {}", style("⛔").bold(), style(result.message()).red());
        }
        PipelineResult::Refused { message, .. } => {
            println!("  {}", style(message).yellow());
        }
        PipelineResult::Answered { text, .. } => {
            println!("{text}");
        }
    }
    println!();
    println!(
        "  {}",
        style(format!("{} question(s) left today", result.remaining())).dim()
    );

    Ok(())
}
