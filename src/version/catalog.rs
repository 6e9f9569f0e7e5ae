//! Ordered list of installable compiler versions

use crate::version::semver::SemanticVersion;

/// Installable compiler versions ordered newest first.
///
/// Providers are responsible for the ordering. Resolution uses catalog positions
/// for "next older" and "next newer" and never re-sorts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionCatalog {
    versions: Vec<SemanticVersion>,
}

impl VersionCatalog {
    /// Wraps versions that are already sorted descending and deduplicated
    pub fn new(versions: Vec<SemanticVersion>) -> Self {
        Self { versions }
    }

    /// Sorts descending and removes duplicates
    pub fn from_unsorted(mut versions: Vec<SemanticVersion>) -> Self {
        versions.sort_unstable_by(|a, b| b.cmp(a));
        versions.dedup();
        Self { versions }
    }

    pub fn versions(&self) -> &[SemanticVersion] {
        &self.versions
    }

    pub fn iter(&self) -> impl Iterator<Item = &SemanticVersion> {
        self.versions.iter()
    }

    pub fn len(&self) -> usize {
        self.versions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&SemanticVersion> {
        self.versions.get(index)
    }

    pub fn newest(&self) -> Option<&SemanticVersion> {
        self.versions.first()
    }

    /// Position of an exact match (`0.8` does not match `0.8.0`)
    pub fn position(&self, version: &SemanticVersion) -> Option<usize> {
        self.versions.iter().position(|v| v == version)
    }
}

impl FromIterator<SemanticVersion> for VersionCatalog {
    fn from_iter<T: IntoIterator<Item = SemanticVersion>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a VersionCatalog {
    type Item = &'a SemanticVersion;
    type IntoIter = std::slice::Iter<'a, SemanticVersion>;

    fn into_iter(self) -> Self::IntoIter {
        self.versions.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> SemanticVersion {
        s.parse().unwrap()
    }

    #[test]
    fn from_unsorted_sorts_newest_first_and_dedups() {
        let catalog =
            VersionCatalog::from_unsorted(vec![v("0.7.6"), v("0.8.10"), v("0.8.9"), v("0.8.10")]);

        assert_eq!(
            catalog.versions(),
            &[v("0.8.10"), v("0.8.9"), v("0.7.6")]
        );
    }

    #[test]
    fn new_keeps_given_order() {
        let catalog = VersionCatalog::new(vec![v("0.4.0"), v("0.5.0")]);
        assert_eq!(catalog.newest(), Some(&v("0.4.0")));
    }

    #[test]
    fn position_requires_exact_match() {
        let catalog = VersionCatalog::new(vec![v("0.8.1"), v("0.8.0")]);

        assert_eq!(catalog.position(&v("0.8.0")), Some(1));
        assert_eq!(catalog.position(&v("0.8")), None);
    }
}
