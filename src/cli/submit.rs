//! Submit command - send selected items to the request store

use crate::cli::CliNotifier;
use crate::cli::context::CommandContext;
use crate::cli::style::{Stylize, spinner_style};
use anstream::println;
use indicatif::ProgressBar;
use payq::error::{Error, Result};
use std::time::Duration;

/// Run the submit command
pub async fn run_submit(ctx: &mut CommandContext) -> Result<()> {
    ctx.require_items()?;

    let selected = ctx.coordinator.items().iter().filter(|i| i.selected).count();
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(spinner_style());
    spinner.set_message(format!("Submitting {} item(s)...", selected.to_string().accent()));
    spinner.enable_steady_tick(Duration::from_millis(80));

    let result = ctx.coordinator.submit(&ctx.store, &CliNotifier).await;
    spinner.finish_and_clear();

    match result {
        Ok(_) => ctx.save(),
        Err(e @ Error::PartialSubmission { .. }) => {
            // Some requests landed; pick them up before reporting the failure
            if ctx.coordinator.refresh_or_warn(&ctx.store, &CliNotifier).await {
                ctx.save()?;
            }
            println!("{}", "Re-run submit to retry the failed items.".muted());
            Err(e)
        }
        Err(e) => Err(e),
    }
}
