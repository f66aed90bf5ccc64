use std::collections::HashSet;

use crate::CanonicalUrl;

/// Deduplicated URLs collected during one run.
///
/// Only ever grows. Iteration follows discovery order; [`ResultSet::finalize`]
/// produces the sorted output.
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    order: Vec<CanonicalUrl>,
    members: HashSet<CanonicalUrl>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` when `url` was not yet present.
    pub fn insert(&mut self, url: CanonicalUrl) -> bool {
        if !self.members.insert(url.clone()) {
            return false;
        }
        self.order.push(url);
        true
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CanonicalUrl> {
        self.order.iter()
    }

    pub fn finalize(self) -> Vec<CanonicalUrl> {
        let mut urls = self.order;
        urls.sort();
        urls
    }
}
