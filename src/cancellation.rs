// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Abandoning a render part way through.
//!
//! `render_with_cancel` sweeps the plane one column at a time, and
//! before starting each column it asks its checker whether to carry
//! on.  A cancelled render hands back `RenderError::Cancelled` and
//! nothing else; the columns already computed are dropped with it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Consulted by the sweep before each column.
pub trait CancellationChecker {
    /// True once the sweep should stop.
    fn is_cancelled(&self) -> bool;
}

/// The checker plain `render` uses: the sweep always runs to the end.
#[derive(Clone, Copy, Debug, Default)]
pub struct NeverCancel;

impl CancellationChecker for NeverCancel {
    fn is_cancelled(&self) -> bool {
        false
    }
}

/// Watches a flag that another thread (a UI that has just changed
/// the viewport, say) raises to abort a render in progress.
#[derive(Clone, Debug)]
pub struct AtomicBoolChecker(Arc<AtomicBool>);

impl AtomicBoolChecker {
    /// Watches `flag`.
    pub fn new(flag: Arc<AtomicBool>) -> Self {
        AtomicBoolChecker(flag)
    }

    /// A checker with a fresh, lowered flag, and that flag.
    pub fn pair() -> (Self, Arc<AtomicBool>) {
        let flag = Arc::new(AtomicBool::new(false));
        (AtomicBoolChecker(Arc::clone(&flag)), flag)
    }
}

impl CancellationChecker for AtomicBoolChecker {
    fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}
