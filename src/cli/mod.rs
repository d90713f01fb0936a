//! CLI commands

pub mod context;
mod groups;
mod merge;
mod select;
pub mod style;
mod submit;

pub use groups::run_groups;
pub use merge::{MergeOptions, run_merge, run_unmerge};
pub use select::run_select;
pub use submit::run_submit;

use anstream::{eprintln, println};
use payq::notify::{Notice, NoticeLevel, Notifier};
use style::{Stylize, check};

/// Notifier printing notices to the terminal
pub struct CliNotifier;

impl Notifier for CliNotifier {
    fn notify(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Success => println!("{} {}", check(), notice.message),
            NoticeLevel::Warning => println!("{}", format!("⚠️  {}", notice.message).warn()),
            NoticeLevel::Error => eprintln!("{}", format!("✗ {}", notice.message).error()),
        }
    }
}
