use std::collections::{HashMap, HashSet};

/// Count values present in both lists using multiset intersection
///
/// Each distinct value contributes `min(count in a, count in b)`, so a value
/// listed twice on one side and once on the other counts once. Comparison is
/// exact (case-sensitive) on taxonomy keys.
pub fn overlap_count<S: AsRef<str>>(a: &[S], b: &[S]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    let mut remaining: HashMap<&str, usize> = HashMap::with_capacity(b.len());
    for value in b {
        *remaining.entry(value.as_ref()).or_insert(0) += 1;
    }

    a.iter()
        .filter(|value| match remaining.get_mut(value.as_ref()) {
            Some(count) if *count > 0 => {
                *count -= 1;
                true
            }
            _ => false,
        })
        .count()
}

/// Case-insensitive check for at least one shared value
#[inline]
pub fn shares_any_ignore_case<S: AsRef<str>>(a: &[S], b: &[S]) -> bool {
    if a.is_empty() || b.is_empty() {
        return false;
    }

    let folded: HashSet<String> = b.iter().map(|value| fold(value.as_ref())).collect();
    a.iter().any(|value| folded.contains(&fold(value.as_ref())))
}

#[inline]
fn fold(value: &str) -> String {
    value.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap_counts_distinct_shared_values() {
        assert_eq!(overlap_count(&["ai", "startups"], &["ai", "music"]), 1);
        assert_eq!(overlap_count(&["ai", "music"], &["music", "ai"]), 2);
        assert_eq!(overlap_count::<&str>(&[], &["ai"]), 0);
    }

    #[test]
    fn test_overlap_uses_smaller_multiplicity() {
        assert_eq!(overlap_count(&["ai", "ai"], &["ai"]), 1);
        assert_eq!(overlap_count(&["ai"], &["ai", "ai"]), 1);
        assert_eq!(overlap_count(&["ai", "ai"], &["ai", "ai", "web"]), 2);
    }

    #[test]
    fn test_overlap_is_case_sensitive() {
        assert_eq!(overlap_count(&["Technology"], &["technology"]), 0);
    }

    #[test]
    fn test_shares_any_ignore_case() {
        assert!(shares_any_ignore_case(&["Technology"], &["technology "]));
        assert!(!shares_any_ignore_case(&["law"], &["technology"]));
        assert!(!shares_any_ignore_case::<&str>(&[], &[]));
    }
}
