//! Type hierarchy service
//!
//! Fetches the CED type tree once and answers ancestry questions against
//! the cached copy.

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{DomainError, TypeNode};
use crate::infrastructure::traits::Fetcher;

/// Path of the type-tree endpoint on the CED web server.
pub const TYPE_TREE_PATH: &str = "/api/catalog/type-tree";

static EMPTY_TREE: TypeNode = TypeNode::Leaf;

/// Full URL of the type-tree endpoint below `base_url`.
pub fn type_tree_url(base_url: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), TYPE_TREE_PATH)
}

/// Lifecycle of the cached hierarchy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TreeState {
    /// Nothing fetched yet, or the last fetch failed
    #[default]
    Unpopulated,
    /// Hierarchy available; never fetched again unless refreshed
    Populated(TypeNode),
}

/// Lazily populated CED type hierarchy.
///
/// Every query populates the tree first if needed. A failed population
/// leaves the tree unpopulated, so the next query fetches again.
pub struct TypeTree {
    fetcher: Arc<dyn Fetcher>,
    url: String,
    verify: bool,
    state: TreeState,
}

impl TypeTree {
    /// Create an unpopulated tree reading from `url`.
    pub fn new(fetcher: Arc<dyn Fetcher>, url: impl Into<String>, verify: bool) -> Self {
        Self {
            fetcher,
            url: url.into(),
            verify,
            state: TreeState::Unpopulated,
        }
    }

    /// Create a tree already populated with `root`; nothing is fetched
    /// until `refresh` is called.
    pub fn with_tree(
        fetcher: Arc<dyn Fetcher>,
        url: impl Into<String>,
        verify: bool,
        root: TypeNode,
    ) -> Self {
        let mut tree = Self::new(fetcher, url, verify);
        tree.replace(root);
        tree
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn state(&self) -> &TreeState {
        &self.state
    }

    pub fn is_populated(&self) -> bool {
        matches!(self.state, TreeState::Populated(_))
    }

    /// Cached hierarchy, if populated. Never fetches.
    pub fn tree(&self) -> Option<&TypeNode> {
        match &self.state {
            TreeState::Populated(root) => Some(root),
            TreeState::Unpopulated => None,
        }
    }

    /// Install `root` as the hierarchy without fetching.
    pub fn replace(&mut self, root: TypeNode) {
        debug!("replace: {} types", root.len());
        self.state = TreeState::Populated(root);
    }

    /// Fetch the hierarchy unless it is already cached.
    ///
    /// An empty document is not cached; the next call fetches again.
    pub fn populate(&mut self) -> ApplicationResult<&TypeNode> {
        if !self.is_populated() {
            let root = self.fetch()?;
            if root.is_empty() {
                warn!("type tree from {} is empty, not caching", self.url);
            } else {
                self.state = TreeState::Populated(root);
            }
        }
        Ok(self.tree().unwrap_or(&EMPTY_TREE))
    }

    /// Drop the cached hierarchy and fetch it again.
    ///
    /// On failure, or when the server sends an empty document, the previous
    /// state is kept.
    pub fn refresh(&mut self) -> ApplicationResult<&TypeNode> {
        let root = self.fetch()?;
        if root.is_empty() {
            warn!("type tree from {} is empty, keeping previous state", self.url);
        } else {
            self.state = TreeState::Populated(root);
        }
        Ok(self.tree().unwrap_or(&EMPTY_TREE))
    }

    #[instrument(level = "debug", skip(self), fields(url = %self.url))]
    fn fetch(&self) -> ApplicationResult<TypeNode> {
        info!("Fetching CED type tree");
        let document = self.fetcher.get_json(&self.url, &[], self.verify)?;
        let root = TypeNode::from_json(&document)?;
        debug!("type tree: {} types", root.len());
        Ok(root)
    }

    /// Path from the top of the hierarchy to `type_name`, inclusive.
    ///
    /// `Ok(None)` when the hierarchy has no such type.
    pub fn lineage(&mut self, type_name: &str) -> ApplicationResult<Option<Vec<String>>> {
        Ok(self.populate()?.lineage(type_name))
    }

    /// True if `descendant` is `ancestor` or one of its subtypes.
    ///
    /// Names compare case-insensitively. An unknown `descendant` is an
    /// error, not `false`.
    pub fn is_a(&mut self, ancestor: &str, descendant: &str) -> ApplicationResult<bool> {
        let answer = self.populate()?.is_a(ancestor, descendant)?;
        debug!("is_a({}, {}) = {}", ancestor, descendant, answer);
        Ok(answer)
    }

    /// Node stored under `type_name`.
    pub fn subtree(&mut self, type_name: &str) -> ApplicationResult<&TypeNode> {
        self.populate()?
            .find(type_name)
            .ok_or_else(|| ApplicationError::Domain(DomainError::TypeNotFound(type_name.into())))
    }

    /// All subtypes below `type_name`, depth-first.
    pub fn descendants(&mut self, type_name: &str) -> ApplicationResult<Vec<String>> {
        Ok(self.subtree(type_name)?.type_names())
    }
}

impl std::fmt::Debug for TypeTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeTree")
            .field("url", &self.url)
            .field("verify", &self.verify)
            .field("state", &self.state)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_base_url_when_building_url_then_appends_type_tree_path() {
        assert_eq!(
            type_tree_url("https://ced.acc.jlab.org"),
            "https://ced.acc.jlab.org/api/catalog/type-tree"
        );
        assert_eq!(
            type_tree_url("https://ced.acc.jlab.org/"),
            "https://ced.acc.jlab.org/api/catalog/type-tree"
        );
    }
}
