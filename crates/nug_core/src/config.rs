//! Service configuration.
//!
//! # Invariants
//! - `link_root` never ends with `/`; link templates add their own slashes.

/// Default prefix of every derived subresource link.
pub const DEFAULT_LINK_ROOT: &str = "/nug";

/// Settings for `ResourceService`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    link_root: String,
}

impl ServiceConfig {
    /// Uses `root` as link prefix, dropping trailing slashes.
    pub fn with_link_root(root: impl Into<String>) -> Self {
        let root = root.into();
        Self {
            link_root: root.trim_end_matches('/').to_string(),
        }
    }

    pub fn link_root(&self) -> &str {
        &self.link_root
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self::with_link_root(DEFAULT_LINK_ROOT)
    }
}

#[cfg(test)]
mod tests {
    use super::ServiceConfig;

    #[test]
    fn link_root_drops_trailing_slashes() {
        assert_eq!(ServiceConfig::with_link_root("/api/nug//").link_root(), "/api/nug");
        assert_eq!(ServiceConfig::default().link_root(), "/nug");
    }
}
