//! `dsaguru welcome` command.

use anyhow::Result;
use console::style;

use dsaguru_types::chat::WELCOME_MESSAGE;

pub fn welcome(json: bool) -> Result<()> {
    if json {
        let out = serde_json::json!({ "message": WELCOME_MESSAGE });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!();
        println!("{}", style(WELCOME_MESSAGE).cyan());
        println!();
    }
    Ok(())
}
