//! Bulk text import.
//!
//! Both parsers are pure: they turn a block of text into the entities that
//! would be created plus a count of lines that were left out. Submitting the
//! accepted entities is the caller's business.

pub mod members;
pub mod tasks;

pub use members::parse_members;
pub use tasks::{parse_task_line, parse_tasks, TaskLine};

/// Result of parsing an import block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedImport<T> {
    pub accepted: Vec<T>,
    pub skipped: usize,
}

impl<T> ParsedImport<T> {
    pub fn total_added(&self) -> usize {
        self.accepted.len()
    }
}

impl<T> Default for ParsedImport<T> {
    fn default() -> Self {
        ParsedImport {
            accepted: Vec::new(),
            skipped: 0,
        }
    }
}

/// Whitespace-only input is rejected before any request is made.
pub fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}

// Trimmed, non-empty lines; handles both \n and \r\n
fn candidate_lines(text: &str) -> impl Iterator<Item = &str> {
    text.lines().map(str::trim).filter(|line| !line.is_empty())
}
