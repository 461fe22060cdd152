use super::error::TreeError;
use indexmap::IndexMap;
use std::str::FromStr;

/// TaxonId is an index into a TaxonNamespace.
pub type TaxonId = usize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Taxon {
    pub id: TaxonId,
    pub label: String,
}

/// What to do when a new taxon reuses a label already in the namespace.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum DuplicatePolicy {
    /// Fail with `TreeError::DuplicateTaxon`
    #[default]
    Reject,
    /// Hand back the existing taxon
    Dedupe,
    /// Register another taxon under the same label
    Allow,
}

impl FromStr for DuplicatePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "reject" => Ok(DuplicatePolicy::Reject),
            "dedupe" => Ok(DuplicatePolicy::Dedupe),
            "allow" => Ok(DuplicatePolicy::Allow),
            _ => Err(format!("Unknown duplicate policy: {}", s)),
        }
    }
}

/// The set of taxa a tree knows about.
///
/// Taxa are stored in creation order. Lookup by label returns the first taxon
/// registered under that label, which is the only one unless
/// `DuplicatePolicy::Allow` was used.
#[derive(Debug, Default, Clone)]
pub struct TaxonNamespace {
    taxa: Vec<Taxon>,
    id_of: IndexMap<String, TaxonId>,
}

impl TaxonNamespace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of taxa, duplicates included
    pub fn len(&self) -> usize {
        self.taxa.len()
    }

    pub fn is_empty(&self) -> bool {
        self.taxa.is_empty()
    }

    pub fn get(&self, id: TaxonId) -> Option<&Taxon> {
        self.taxa.get(id)
    }

    pub fn label(&self, id: TaxonId) -> Option<&str> {
        self.taxa.get(id).map(|t| t.label.as_str())
    }

    pub fn contains(&self, label: &str) -> bool {
        self.id_of.contains_key(label)
    }

    pub fn get_by_label(&self, label: &str) -> Option<TaxonId> {
        self.id_of.get(label).copied()
    }

    /// Distinct labels, in first-registered order
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.id_of.keys().map(|s| s.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Taxon> {
        self.taxa.iter()
    }

    /// Register a taxon labelled `label`.
    ///
    /// ```
    /// use nwkgraft::libs::phylo::taxon::{DuplicatePolicy, TaxonNamespace};
    /// let mut tns = TaxonNamespace::new();
    /// let a = tns.new_taxon("A", DuplicatePolicy::Reject).unwrap();
    /// assert!(tns.new_taxon("A", DuplicatePolicy::Reject).is_err());
    /// assert_eq!(tns.new_taxon("A", DuplicatePolicy::Dedupe).unwrap(), a);
    /// assert_ne!(tns.new_taxon("A", DuplicatePolicy::Allow).unwrap(), a);
    /// assert_eq!(tns.len(), 2);
    /// ```
    pub fn new_taxon(
        &mut self,
        label: impl Into<String>,
        policy: DuplicatePolicy,
    ) -> Result<TaxonId, TreeError> {
        let label = label.into();

        if let Some(&existing) = self.id_of.get(&label) {
            match policy {
                DuplicatePolicy::Reject => return Err(TreeError::DuplicateTaxon(label)),
                DuplicatePolicy::Dedupe => return Ok(existing),
                DuplicatePolicy::Allow => {}
            }
        }

        let id = self.taxa.len();
        self.id_of.entry(label.clone()).or_insert(id);
        self.taxa.push(Taxon { id, label });
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_from_str() {
        assert_eq!("reject".parse(), Ok(DuplicatePolicy::Reject));
        assert_eq!("dedupe".parse(), Ok(DuplicatePolicy::Dedupe));
        assert_eq!("allow".parse(), Ok(DuplicatePolicy::Allow));
        assert!("skip".parse::<DuplicatePolicy>().is_err());
        assert_eq!(DuplicatePolicy::default(), DuplicatePolicy::Reject);
    }

    #[test]
    fn test_namespace_allow_keeps_first_for_lookup() {
        let mut tns = TaxonNamespace::new();
        let first = tns.new_taxon("x", DuplicatePolicy::Allow).unwrap();
        let second = tns.new_taxon("x", DuplicatePolicy::Allow).unwrap();
        tns.new_taxon("y", DuplicatePolicy::Allow).unwrap();

        assert_ne!(first, second);
        assert_eq!(tns.get_by_label("x"), Some(first));
        assert_eq!(tns.label(second), Some("x"));
        assert_eq!(tns.len(), 3);
        assert_eq!(tns.labels().collect::<Vec<_>>(), vec!["x", "y"]);
    }

    #[test]
    fn test_namespace_reject() {
        let mut tns = TaxonNamespace::new();
        tns.new_taxon("x", DuplicatePolicy::Reject).unwrap();
        assert_eq!(
            tns.new_taxon("x", DuplicatePolicy::Reject),
            Err(TreeError::DuplicateTaxon("x".to_string()))
        );
        assert_eq!(tns.len(), 1);
    }
}
