//! `dsaguru quota` command.

use anyhow::Result;
use console::style;

use dsaguru_types::chat::LIMIT_REACHED_MESSAGE;

use crate::state::AppState;

/// Show remaining questions for `user` today.
///
/// Never charges quota, but initializes a zero-count record for a user the
/// store has not seen before.
pub async fn show_quota(state: &AppState, user: &str, json: bool) -> Result<()> {
    let snapshot = state.pipeline.check_admission(user).await;
    let max_daily = state.max_daily();

    if json {
        let quota = serde_json::json!({
            "user_id": user,
            "can_query": snapshot.can_query,
            "remaining": snapshot.remaining,
            "max_daily": max_daily,
        });
        println!("{}", serde_json::to_string_pretty(&quota)?);
        return Ok(());
    }

    println!();
    println!("  {} Quota for '{}'", style("📊").bold(), style(user).cyan());
    println!();
    let remaining = if snapshot.can_query {
        style(snapshot.remaining).green()
    } else {
        style(snapshot.remaining).red()
    };
    println!("  Remaining today: {remaining} / {max_daily}");
    if !snapshot.can_query {
        println!("  {}", style(LIMIT_REACHED_MESSAGE).yellow());
    }
    println!();

    Ok(())
}
