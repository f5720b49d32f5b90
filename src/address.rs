// 🏠 Address Reformatting - free-text address → fixed number of print lines
//
// Master addresses are single comma-delimited strings. Letters and invoices
// print them as a fixed block, so every policy returns exactly
// `line_count()` lines, padding with empty lines when the source is short.

use serde::{Deserialize, Serialize};

// ============================================================================
// POLICY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum AddressPolicy {
    /// Comma segments split into three roughly equal lines
    Thirds,

    /// Last segment (city / pin) on line 4, the rest split into thirds
    ThirdsPinnedLast,

    /// Greedy word wrap at `width` characters into `lines` lines
    Wrap { width: usize, lines: usize },
}

impl AddressPolicy {
    pub fn line_count(&self) -> usize {
        match self {
            AddressPolicy::Thirds => 3,
            AddressPolicy::ThirdsPinnedLast => 4,
            AddressPolicy::Wrap { lines, .. } => (*lines).max(1),
        }
    }
}

impl Default for AddressPolicy {
    fn default() -> Self {
        AddressPolicy::ThirdsPinnedLast
    }
}

// ============================================================================
// FORMATTING
// ============================================================================

/// Format `address` according to `policy`.
///
/// Always returns exactly `policy.line_count()` lines.
pub fn format_address(address: &str, policy: &AddressPolicy) -> Vec<String> {
    let lines = match policy {
        AddressPolicy::Thirds => split_thirds(&segments(address)),
        AddressPolicy::ThirdsPinnedLast => {
            let mut parts = segments(address);
            // a single segment (e.g. the not-found placeholder) starts the block
            if parts.len() < 2 {
                return padded(parts, policy.line_count());
            }
            let last = parts.pop().unwrap_or_default();
            let mut lines = split_thirds(&parts);
            lines.push(last);
            lines
        }
        AddressPolicy::Wrap { width, lines } => wrap(address, *width, (*lines).max(1)),
    };

    padded(lines, policy.line_count())
}

fn padded(mut lines: Vec<String>, count: usize) -> Vec<String> {
    lines.resize(count, String::new());
    lines
}

/// Comma-separated segments, trimmed, empties dropped
fn segments(address: &str) -> Vec<String> {
    address
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}

/// Three lines: `[0,k)`, `[k,2k)`, `[2k,n)` with `k = max(1, n/3)`
fn split_thirds(parts: &[String]) -> Vec<String> {
    let n = parts.len();
    let k = (n / 3).max(1);

    let slice = |from: usize, to: usize| -> String {
        let from = from.min(n);
        let to = to.min(n);
        parts[from..to].join(", ")
    };

    vec![slice(0, k), slice(k, 2 * k), slice(2 * k, n)]
}

/// Greedy word wrap. Overflow past `max_lines` is joined onto the last line.
fn wrap(text: &str, width: usize, max_lines: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        for piece in hard_split(word, width) {
            let needed = if current.is_empty() {
                piece.chars().count()
            } else {
                current.chars().count() + 1 + piece.chars().count()
            };

            if needed > width && !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(&piece);
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }

    if lines.len() > max_lines {
        let overflow = lines.split_off(max_lines).join(" ");
        if let Some(last) = lines.last_mut() {
            last.push(' ');
            last.push_str(&overflow);
        }
    }

    lines
}

/// Split a single over-long word into `width`-sized chunks
fn hard_split(word: &str, width: usize) -> Vec<String> {
    let chars: Vec<char> = word.chars().collect();
    chars
        .chunks(width)
        .map(|chunk| chunk.iter().collect())
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================
