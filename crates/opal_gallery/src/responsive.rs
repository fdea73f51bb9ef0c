//! Responsive page-size resolution
//!
//! Hosts report viewport widths; the table answers with the page size to use
//! at that width. Tables are plain serde data so they can ship in host
//! configuration files.

use serde::{Deserialize, Serialize};

/// Page size override for viewports up to a width
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breakpoint {
    /// Widest viewport (inclusive, host units) the override applies to
    pub max_width: u32,
    /// Page size used at or below `max_width`
    pub page_size: usize,
}

/// Breakpoint table with a default page size
///
/// # Example
///
/// ```
/// use opal_gallery::ResponsiveTable;
///
/// let table = ResponsiveTable::new(5).breakpoint(600, 1).breakpoint(1024, 3);
/// assert_eq!(table.resolve(480), 1);
/// assert_eq!(table.resolve(800), 3);
/// assert_eq!(table.resolve(1920), 5);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponsiveTable {
    default_page_size: usize,
    breakpoints: Vec<Breakpoint>,
}

impl ResponsiveTable {
    /// Table that always resolves to `default_page_size`
    pub fn new(default_page_size: usize) -> Self {
        Self {
            default_page_size: default_page_size.max(1),
            breakpoints: Vec::new(),
        }
    }

    /// Add a breakpoint; the table stays sorted widest-first
    pub fn breakpoint(mut self, max_width: u32, page_size: usize) -> Self {
        self.breakpoints.push(Breakpoint {
            max_width,
            page_size: page_size.max(1),
        });
        self.breakpoints.sort_by(|a, b| b.max_width.cmp(&a.max_width));
        self
    }

    /// Page size for a viewport width
    ///
    /// The narrowest breakpoint whose `max_width` still covers the width
    /// wins; a width wider than every breakpoint falls back to the default.
    pub fn resolve(&self, viewport_width: u32) -> usize {
        self.breakpoints
            .iter()
            .filter(|b| b.max_width >= viewport_width)
            .min_by_key(|b| b.max_width)
            .map(|b| b.page_size)
            .unwrap_or(self.default_page_size)
    }

    /// The fallback page size
    pub fn default_page_size(&self) -> usize {
        self.default_page_size
    }

    /// The breakpoints, widest first
    pub fn breakpoints(&self) -> &[Breakpoint] {
        &self.breakpoints
    }
}
