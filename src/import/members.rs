use std::collections::HashSet;

use super::{candidate_lines, ParsedImport};

/// Parse one member name per line.
///
/// Lines are trimmed and empty lines dropped. A name already in `existing`, or
/// repeated earlier in the same block, counts as skipped. Matching is exact and
/// case-sensitive.
pub fn parse_members<'a, I>(text: &str, existing: I) -> ParsedImport<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen: HashSet<String> = existing.into_iter().map(str::to_string).collect();
    let mut parsed = ParsedImport::default();

    for name in candidate_lines(text) {
        if seen.insert(name.to_string()) {
            parsed.accepted.push(name.to_string());
        } else {
            parsed.skipped += 1;
        }
    }

    parsed
}
