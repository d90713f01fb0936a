//! Groups command - show items grouped by project

use crate::cli::context::CommandContext;
use crate::cli::style::{Stylize, check, color_tag};
use anstream::println;
use payq::error::Result;
use payq::grouping::is_ready;

/// Run the groups command
pub fn run_groups(ctx: &CommandContext) -> Result<()> {
    let groups = ctx.coordinator.groups();
    if groups.is_empty() {
        println!("{}", "No payment items in session.".muted());
        return Ok(());
    }

    for group in &groups {
        let client = group
            .client_name
            .as_deref()
            .map(|c| format!(" ({c})"))
            .unwrap_or_default();
        let rejected = if group.has_rejected {
            format!(" {}", "rejected".error())
        } else {
            String::new()
        };

        println!(
            "{}{}{}  {}/{} ready ({}%)  total {:.2}",
            group.project_name.emphasis(),
            client.muted(),
            rejected,
            group.ready_items,
            group.total_items,
            group.completion_percentage(),
            group.total_cost
        );

        for item in &group.items {
            let marker = if is_ready(item) { check() } else { " ".to_string() };
            let selected = if item.selected { "*" } else { " " };
            let merge = item
                .merge
                .as_ref()
                .map(|m| {
                    let role = if m.is_leader { " leader" } else { "" };
                    format!(" {}{}", color_tag(&m.color), role.muted())
                })
                .unwrap_or_default();
            let cost = item
                .cost
                .map_or_else(|| "-".to_string(), |c| format!("{c:.2}"));

            println!(
                "  {marker} {selected} {} {}{merge}",
                item.id.accent(),
                cost
            );
            if let Some(reason) = &item.rejection_reason {
                println!("      {}", format!("rejected: {reason}").warn());
            }
        }
    }

    Ok(())
}
