//! Identifier and tag-string helpers

use bech32::Bech32m;
use uuid7::uuid7;

pub const TAG_SEPARATOR: char = ':';

// construct a unique id then encode using bech32
pub fn new_uuid_to_bech32(hrp: &str) -> anyhow::Result<String> {
    let hrp = bech32::Hrp::parse(hrp)?;
    let encode = bech32::encode::<Bech32m>(hrp, uuid7().as_bytes())?;
    Ok(encode)
}

/// Split a multi-level tag string into its per-list values. A backslash
/// escapes a literal separator or backslash inside a tag name.
pub fn split_tags(tags: &str) -> Vec<String> {
    if tags.is_empty() {
        return vec![];
    }

    let mut out = vec![];
    let mut current = String::new();
    let mut chars = tags.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' if matches!(chars.peek(), Some(&TAG_SEPARATOR) | Some(&'\\')) => {
                if let Some(escaped) = chars.next() {
                    current.push(escaped);
                }
            }
            TAG_SEPARATOR => out.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    out.push(current);
    out
}

pub fn join_tags<S: AsRef<str>>(tags: &[S]) -> String {
    tags.iter()
        .map(|t| t.as_ref().trim().replace('\\', "\\\\").replace(TAG_SEPARATOR, "\\:"))
        .collect::<Vec<_>>()
        .join(":")
}

/// Tag value at `index`, empty when the slot is unset.
pub fn tag_at(tags: &str, index: usize) -> String {
    split_tags(tags).into_iter().nth(index).unwrap_or_default()
}

/// Write `tag` into slot `index`, padding earlier slots and dropping
/// trailing empty slots.
pub fn insert_tag(tags: &str, tag: &str, index: usize) -> String {
    let mut parts = split_tags(tags);
    if parts.len() <= index {
        parts.resize(index + 1, String::new());
    }
    parts[index] = tag.to_string();

    while parts.last().is_some_and(|t| t.trim().is_empty()) {
        parts.pop();
    }
    join_tags(&parts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escaped_separator_stays_in_tag() {
        assert_eq!(split_tags(r"Dept\:Sales:Project"), vec!["Dept:Sales", "Project"]);
        assert_eq!(join_tags(&["Dept:Sales", "Project"]), r"Dept\:Sales:Project");
    }

    #[test]
    fn trailing_backslash_keeps_its_slot() {
        let tags = ["a\\", "b"];
        let joined = join_tags(&tags);
        assert_eq!(joined, r"a\\:b");
        assert_eq!(split_tags(&joined), vec!["a\\", "b"]);
        // a lone backslash before other text is kept as is
        assert_eq!(split_tags(r"C\d"), vec![r"C\d"]);
    }

    #[test]
    fn insert_pads_and_trims() {
        assert_eq!(insert_tag("", "Berlin", 1), ":Berlin");
        assert_eq!(insert_tag(":Berlin", "Sales", 0), "Sales:Berlin");
        assert_eq!(insert_tag("Sales:Berlin", "", 1), "Sales");
    }

    #[test]
    fn missing_slot_is_empty() {
        assert_eq!(tag_at("Sales", 3), "");
        assert_eq!(tag_at("Sales:Berlin", 1), "Berlin");
    }

    #[test]
    fn ids_carry_prefix() {
        let id = new_uuid_to_bech32("txn_").unwrap();
        assert!(id.starts_with("txn_1"));
    }
}
