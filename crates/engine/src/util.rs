//! Internal helpers for model validation.
//!
//! These utilities are **not** part of the public API. They centralize
//! validation so members and expenses enforce the same invariants whether they
//! are built by the server, the CLI or a test.

use crate::{EngineError, MemberId, ResultEngine};

/// Trim a required display name, rejecting empty values.
pub(crate) fn normalize_required_name(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidId(format!(
            "{label} name must not be empty"
        )));
    }
    Ok(trimmed.to_string())
}

/// Trim optional free text, mapping blank input to an empty string.
pub(crate) fn normalize_optional_text(value: Option<&str>) -> String {
    value.map(str::trim).unwrap_or_default().to_string()
}

/// Collapse duplicated member ids, keeping the first occurrence.
pub(crate) fn dedup_members<'a, I>(ids: I) -> Vec<&'a MemberId>
where
    I: IntoIterator<Item = &'a MemberId>,
{
    let mut unique: Vec<&MemberId> = Vec::new();
    for id in ids {
        if !unique.contains(&id) {
            unique.push(id);
        }
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_name_is_trimmed_and_not_empty() {
        assert_eq!(normalize_required_name("  Ada ", "member").unwrap(), "Ada");
        assert!(normalize_required_name("   ", "member").is_err());
    }

    #[test]
    fn dedup_keeps_first_occurrence_order() {
        let ids: Vec<MemberId> = ["b", "a", "b", "c", "a"].into_iter().map(MemberId::from).collect();
        let unique: Vec<&str> = dedup_members(&ids).into_iter().map(MemberId::as_str).collect();
        assert_eq!(unique, vec!["b", "a", "c"]);
    }
}
