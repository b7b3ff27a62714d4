//! Ordered pattern cascades.
//!
//! A cascade is an ordered list of candidate patterns for one field plus a
//! resolution policy. Patterns are tried in sequence; the first pattern
//! that matches anywhere resolves the field. Different issuers label the
//! same field differently ("Invoice #", "Bill No.", "Document Number"), and
//! cascades encode that variability without a grammar.

use regex::Regex;

/// How a matching pattern resolves to a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchPolicy {
    /// The first occurrence of the first matching pattern wins.
    First,
    /// The last occurrence of the first matching pattern wins. Used for
    /// invoice totals, where a grand total prints after line totals.
    Last,
}

/// An ordered list of candidate patterns for one field.
pub struct Cascade {
    patterns: Vec<&'static Regex>,
    policy: MatchPolicy,
}

impl Cascade {
    /// A first-match-wins cascade.
    pub fn first(patterns: Vec<&'static Regex>) -> Self {
        Self {
            patterns,
            policy: MatchPolicy::First,
        }
    }

    /// A last-match-wins cascade.
    pub fn last(patterns: Vec<&'static Regex>) -> Self {
        Self {
            patterns,
            policy: MatchPolicy::Last,
        }
    }

    /// Capture group 1 of the resolving match, trimmed. `None` when no
    /// pattern matches.
    pub fn capture(&self, text: &str) -> Option<String> {
        for pattern in &self.patterns {
            let captured = match self.policy {
                MatchPolicy::First => pattern.captures(text),
                MatchPolicy::Last => pattern.captures_iter(text).last(),
            };
            if let Some(caps) = captured {
                if let Some(group) = caps.get(1) {
                    return Some(group.as_str().trim().to_string());
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lazy_static::lazy_static;
    use pretty_assertions::assert_eq;

    lazy_static! {
        static ref LABELED: Regex = Regex::new(r"(?i)number\s*:\s*(\w+)").unwrap();
        static ref BARE: Regex = Regex::new(r"#(\w+)").unwrap();
        static ref TOTAL: Regex = Regex::new(r"(?i)total[^0-9]*?([\d,]+\.?\d*)").unwrap();
    }

    #[test]
    fn first_matching_pattern_wins() {
        let cascade = Cascade::first(vec![&*LABELED, &*BARE]);
        assert_eq!(
            cascade.capture("number: A17 and also #B99"),
            Some("A17".to_string())
        );
    }

    #[test]
    fn later_patterns_back_up_earlier_ones() {
        let cascade = Cascade::first(vec![&*LABELED, &*BARE]);
        assert_eq!(cascade.capture("ref #B99"), Some("B99".to_string()));
        assert_eq!(cascade.capture("nothing here"), None);
    }

    #[test]
    fn last_policy_takes_the_final_occurrence() {
        let cascade = Cascade::last(vec![&*TOTAL]);
        assert_eq!(
            cascade.capture("Total: 100.00 ... Total: 250.00"),
            Some("250.00".to_string())
        );
    }

    #[test]
    fn last_policy_with_a_single_occurrence() {
        let cascade = Cascade::last(vec![&*TOTAL]);
        assert_eq!(cascade.capture("Total: 99.50"), Some("99.50".to_string()));
    }
}
