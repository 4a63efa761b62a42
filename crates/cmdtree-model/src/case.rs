//! Case folding for labels, argument names and registry kinds
//!
//! Every case-insensitive comparison in cmdtree goes through these helpers so
//! that table keys, lookups and suggestion filters agree on non-ASCII input.

/// Folded form used as the key for labels, argument names and kinds
pub fn fold_case(value: &str) -> String {
    value.chars().flat_map(char::to_lowercase).collect()
}

pub fn eq_ignore_case(left: &str, right: &str) -> bool {
    left.chars()
        .flat_map(char::to_lowercase)
        .eq(right.chars().flat_map(char::to_lowercase))
}

/// Case-insensitive prefix test used for every suggestion filter
pub fn starts_with_ignore_case(candidate: &str, partial: &str) -> bool {
    let mut folded = candidate.chars().flat_map(char::to_lowercase);
    partial
        .chars()
        .flat_map(char::to_lowercase)
        .all(|expected| folded.next() == Some(expected))
}

/// Sort in place by folded value
pub fn sort_ignore_case(values: &mut [String]) {
    values.sort_by_cached_key(|value| fold_case(value));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fold_agrees_with_comparisons() {
        assert_eq!(fold_case("ÉTAT"), "état");
        assert!(eq_ignore_case("Été", "éTÉ"));
        assert!(!eq_ignore_case("ete", "été"));
    }

    #[test]
    fn test_prefix() {
        assert!(starts_with_ignore_case("Delete", "de"));
        assert!(starts_with_ignore_case("Élan", "él"));
        assert!(starts_with_ignore_case("x", ""));
        assert!(!starts_with_ignore_case("de", "delete"));
    }

    #[test]
    fn test_sort() {
        let mut values = vec!["élan".to_string(), "Zed".to_string(), "abc".to_string()];
        sort_ignore_case(&mut values);
        assert_eq!(values, vec!["abc", "Zed", "élan"]);
    }
}
