//! Select command - flag items for submission

use crate::cli::context::CommandContext;
use crate::cli::style::{Stylize, check};
use anstream::println;
use payq::error::Result;

/// Run the select command
pub fn run_select(ctx: &mut CommandContext, ids: &[String], selected: bool) -> Result<()> {
    ctx.require_items()?;
    for id in ids {
        ctx.coordinator.set_selected(id, selected)?;
    }
    ctx.save()?;

    let verb = if selected { "Selected" } else { "Deselected" };
    println!(
        "{} {verb} {}",
        check(),
        format!("{} item(s)", ids.len()).accent()
    );
    Ok(())
}
