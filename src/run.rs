//! The run loop.
//!
//! Feeds are handled one at a time, in configured order:
//!
//! ```text
//! fetch ──► reconcile ──► new URLs? ──yes──► action ─┐
//!                              │                    ├──► more feeds? ──yes──► pause ──► next feed
//!                              └──no──► notice ─────┘
//! ```
//!
//! The first error from any step ends the whole run; the remaining feeds
//! are not checked.

use std::io::Write;
use std::time::Duration;

use crate::action::Action;
use crate::error::RunError;
use crate::pause::{self, LineReader};
use crate::source::FeedSource;
use crate::store::StateStore;

/// Everything one run needs, borrowed for the duration of [`Runner::run`].
pub struct Runner<'a> {
    pub source: &'a dyn FeedSource,
    pub store: &'a StateStore,
    pub action: &'a mut dyn Action,
    pub reader: &'a mut dyn LineReader,
    pub out: &'a mut dyn Write,
    /// Sleep used when the pause cannot read input.
    pub fallback_wait: Duration,
}

impl Runner<'_> {
    /// Check every feed in `feeds`, stopping at the first error.
    pub fn run(&mut self, feeds: &[String]) -> Result<(), RunError> {
        for (index, feed) in feeds.iter().enumerate() {
            let span = tracing::info_span!("feed", name = %feed);
            let _enter = span.enter();

            self.check(feed)?;

            if index + 1 < feeds.len() {
                pause::wait_for_user(&mut *self.reader, &mut *self.out, self.fallback_wait)?;
            }
        }
        tracing::debug!(feeds = feeds.len(), "run complete");
        Ok(())
    }

    fn check(&mut self, feed: &str) -> Result<(), RunError> {
        writeln!(self.out, "Checking r/{feed} for new posts...")?;
        self.out.flush()?;

        let urls = self.source.fetch(feed)?;
        let fresh = self.store.reconcile(feed, &urls)?;

        if fresh.is_empty() {
            writeln!(self.out, "No new posts found!")?;
            return Ok(());
        }

        tracing::info!(new = fresh.len(), "new posts");
        self.action.invoke(&fresh, &mut *self.out)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
