//! Merge and unmerge commands - link items paid into one account

use crate::cli::CliNotifier;
use crate::cli::context::CommandContext;
use crate::cli::style::{Stylize, check, color_tag, spinner_style};
use anstream::println;
use dialoguer::Confirm;
use indicatif::ProgressBar;
use payq::error::{Error, Result};
use std::time::Duration;

/// Options for the merge command
#[derive(Debug, Clone, Default)]
pub struct MergeOptions {
    /// Skip the confirmation prompt
    pub yes: bool,
}

/// Run the merge command
///
/// Candidates are added in the given order, so the first id becomes the
/// group leader.
pub fn run_merge(ctx: &mut CommandContext, ids: &[String], options: &MergeOptions) -> Result<()> {
    ctx.require_items()?;

    ctx.coordinator.toggle_merge_mode();
    for id in ids {
        let item = ctx
            .coordinator
            .item(id)
            .ok_or_else(|| Error::ItemNotFound(id.clone()))?;
        if !ctx.coordinator.can_merge_with(item) {
            return Err(Error::Validation(format!(
                "item '{id}' is not paid to the same account as '{}'",
                ctx.coordinator.selected_for_merge()[0]
            )));
        }
        ctx.coordinator.toggle_candidate(id, true);
    }

    if !options.yes && ids.len() >= 2 {
        println!(
            "Merging {} into one payment request led by {}",
            format!("{} item(s)", ids.len()).accent(),
            ids[0].emphasis()
        );
        if !Confirm::new()
            .with_prompt("Proceed with merge?")
            .default(true)
            .interact()
            .map_err(|e| Error::Internal(format!("Failed to read confirmation: {e}")))?
        {
            println!("{}", "Aborted".muted());
            return Ok(());
        }
    }

    let group_id = ctx.coordinator.merge()?;
    ctx.save()?;

    let color = ctx
        .coordinator
        .item(&ids[0])
        .and_then(|i| i.merge.as_ref())
        .map(|m| color_tag(&m.color))
        .unwrap_or_default();
    println!("{} Merged into {} {color}", check(), group_id.accent());
    Ok(())
}

/// Run the unmerge command
pub async fn run_unmerge(ctx: &mut CommandContext, group_id: &str) -> Result<()> {
    ctx.require_items()?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(spinner_style());
    spinner.set_message(format!("Unmerging {}...", group_id.emphasis()));
    spinner.enable_steady_tick(Duration::from_millis(80));

    let result = ctx
        .coordinator
        .unmerge(group_id, &ctx.store, &CliNotifier)
        .await;
    spinner.finish_and_clear();
    result?;

    ctx.save()
}
