//! Naming helpers for repositories and tags

/// Hash algorithm names that mark a tag as a content-addressed reference
pub const DIGEST_ALGORITHMS: &[&str] = &["sha256", "sha384", "sha512"];

pub struct NameUtils;

impl NameUtils {
    /// Remove any leading path separators from a repository name
    pub fn strip_leading_separators(name: &str) -> &str {
        name.trim_start_matches('/')
    }

    /// Whether a tag name itself encodes a content hash (`sha256:...`, `sha256-...`)
    pub fn is_digest_tag(tag: &str) -> bool {
        DIGEST_ALGORITHMS
            .iter()
            .any(|algorithm| tag.starts_with(algorithm))
    }
}
