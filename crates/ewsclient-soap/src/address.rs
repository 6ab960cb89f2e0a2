//! Recipient address extraction.

use std::sync::LazyLock;

use regex::Regex;

use crate::log::Diagnostics;

#[allow(clippy::expect_used)]
static ADDRESS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([\w.]+)@([\w.]+)").expect("address pattern compiles"));

/// Returns the first address-shaped substring of `entry`.
///
/// `"Alice <alice@example.com>"` yields `alice@example.com`.
#[must_use]
pub fn extract_address(entry: &str) -> Option<&str> {
    ADDRESS.find(entry).map(|m| m.as_str())
}

/// Keeps the extracted address of every entry that has one. Entries without
/// an address are dropped with a WARN naming `field`.
pub fn filter_addresses<I, S>(entries: I, field: &str, log: &mut Diagnostics) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut kept = Vec::new();
    for entry in entries {
        let entry = entry.as_ref();
        match extract_address(entry) {
            Some(address) => kept.push(address.to_string()),
            None => log.warn(format!("{field}: '{entry}' is not a valid email address, dropped")),
        }
    }
    kept
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_plain_address() {
        assert_eq!(extract_address("user@example.com"), Some("user@example.com"));
    }

    #[test]
    fn test_extract_from_display_form() {
        assert_eq!(
            extract_address("John Doe <john.doe@mail.example.org>"),
            Some("john.doe@mail.example.org")
        );
    }

    #[test]
    fn test_first_match_wins() {
        assert_eq!(extract_address("a@b.c, d@e.f"), Some("a@b.c"));
    }

    #[test]
    fn test_no_address() {
        assert_eq!(extract_address("not an address"), None);
        assert_eq!(extract_address("@example.com"), None);
    }

    #[test]
    fn test_filter_drops_invalid_entries() {
        let mut log = Diagnostics::new("email");
        let kept = filter_addresses(["ok@example.com", "broken", "<x@y.z>"], "to", &mut log);
        assert_eq!(kept, ["ok@example.com", "x@y.z"]);
        assert_eq!(log.len(), 1);
        assert!(log.iter().next().unwrap().message.contains("'broken'"));
    }
}
