//! Applied update identifiers.

/// Version string of an applied update (`2_7_1` → `2.7.1`).
pub fn display_version(id: &str) -> String {
    id.replace('_', ".")
}

/// Display versions of applied updates, in the given order.
pub fn display_versions<S: AsRef<str>>(ids: &[S]) -> Vec<String> {
    ids.iter().map(|id| display_version(id.as_ref())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_version() {
        assert_eq!(display_version("2_7_1"), "2.7.1");
        assert_eq!(display_version("1_0"), "1.0");
        assert_eq!(display_version("3"), "3");
        assert_eq!(display_versions(&["1_5", "2_0_1"]), ["1.5", "2.0.1"]);
    }
}
