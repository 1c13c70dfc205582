/// Oldest server release whose API this client speaks.
pub const MIN_SERVER_VERSION: &str = "4.0.0";

/// Number of dotted components compared.
const VERSION_COMPONENTS: usize = 3;

/// Returns true when version `a` is at least version `b`.
///
/// Only the first three dotted components are compared, left to right. A
/// blank component counts as 0. A numeric component beats a missing or
/// non-numeric one, and two non-numeric components tie. When nothing decides, the versions are
/// treated as equal and the result is true.
pub fn version_compare(a: &str, b: &str) -> bool {
    let pa: Vec<&str> = a.split('.').collect();
    let pb: Vec<&str> = b.split('.').collect();

    for i in 0..VERSION_COMPONENTS {
        let na = component(&pa, i);
        let nb = component(&pb, i);
        match (na, nb) {
            (Some(x), Some(y)) if x > y => return true,
            (Some(x), Some(y)) if x < y => return false,
            (Some(_), None) => return true,
            (None, Some(_)) => return false,
            _ => {}
        }
    }

    true
}

/// Numeric value of one dotted part. A present but blank part counts as 0;
/// a missing or non-numeric part has no value.
fn component(parts: &[&str], index: usize) -> Option<u64> {
    let part = parts.get(index)?.trim();
    if part.is_empty() {
        return Some(0);
    }
    part.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newer_and_older() {
        assert!(version_compare("4.1.0", "4.0.0"));
        assert!(!version_compare("3.9.9", "4.0.0"));
        assert!(version_compare("10.0.0", "9.9.9")); // numeric, not lexical
        assert!(!version_compare("4.0.1", "4.0.10"));
    }

    #[test]
    fn test_ties_satisfy() {
        assert!(version_compare("4.0.0", "4.0.0"));
        assert!(version_compare("beta", "alpha")); // nothing numeric, tie
        assert!(version_compare("4.0.0.9", "4.0.0.1")); // fourth part ignored
    }

    #[test]
    fn test_missing_components_sort_lower() {
        assert!(!version_compare("4", "4.0.0"));
        assert!(version_compare("4.0.0", "4.0"));
        assert!(!version_compare("4.0.rc1", "4.0.0"));
        assert!(version_compare("4.0.0", "4.0.rc1"));
        // blank, unlike missing, counts as 0
        assert!(version_compare("4.0.", "4.0.0"));
        assert!(version_compare("4..0", "4.0.0"));
        assert!(!version_compare("4.0.", "4.0.1"));
    }
}
