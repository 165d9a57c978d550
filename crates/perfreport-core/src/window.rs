//! Phase windows: half-open sample-index ranges over a run.
//!
//! One sample is taken per second, so sample indices double as elapsed
//! seconds. Windows are configuration, never hardwired.

use std::fmt;
use std::ops::Range;

use serde::Serialize;

use crate::error::{ReportError, Result};

/// Half-open range `[start_index, end_index)` over sample indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PhaseWindow {
    start_index: usize,
    end_index: usize,
}

impl PhaseWindow {
    /// Create a window, rejecting `end_index <= start_index`.
    pub fn new(start_index: usize, end_index: usize) -> Result<Self> {
        if end_index <= start_index {
            return Err(ReportError::InvalidWindow {
                start: start_index,
                end: end_index,
            });
        }
        Ok(Self {
            start_index,
            end_index,
        })
    }

    pub fn start_index(&self) -> usize {
        self.start_index
    }

    pub fn end_index(&self) -> usize {
        self.end_index
    }

    /// Index range clamped to `[0, sample_count]`. May be empty.
    pub fn clamp(&self, sample_count: usize) -> Range<usize> {
        let end = self.end_index.min(sample_count);
        let start = self.start_index.min(end);
        start..end
    }
}

impl fmt::Display for PhaseWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.start_index, self.end_index)
    }
}

/// The three named windows that drive report generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PhaseWindows {
    /// `[0, sec_end_gameplay)`: menu and gameplay together.
    pub full: PhaseWindow,
    /// `[0, sec_menu)`.
    pub menu: PhaseWindow,
    /// `[sec_start_gameplay, sec_end_gameplay)`.
    pub gameplay: PhaseWindow,
}

impl PhaseWindows {
    pub fn from_bounds(
        sec_menu: usize,
        sec_start_gameplay: usize,
        sec_end_gameplay: usize,
    ) -> Result<Self> {
        Ok(Self {
            full: PhaseWindow::new(0, sec_end_gameplay)?,
            menu: PhaseWindow::new(0, sec_menu)?,
            gameplay: PhaseWindow::new(sec_start_gameplay, sec_end_gameplay)?,
        })
    }
}
