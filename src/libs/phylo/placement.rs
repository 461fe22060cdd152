use super::error::TreeError;
use anyhow::Context;
use indexmap::IndexMap;
use itertools::Itertools;

/// Taxa to attach to each anchor, as reported by a placement tool.
///
/// Anchors keep the order in which they were first seen, and so do the taxa
/// listed under each anchor. Nothing is deduplicated.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PlacementMap {
    taxa_of: IndexMap<String, Vec<String>>,
}

impl PlacementMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the map from `<taxon> <anchor> [ignored...]` lines.
    ///
    /// Lines are trimmed and split on whitespace. Any line with fewer than two
    /// tokens, blank lines included, fails the whole read.
    ///
    /// ```
    /// use nwkgraft::libs::phylo::PlacementMap;
    /// let map = PlacementMap::from_lines(["p1 L1", "p2 L1 0.98", "p3 R"]).unwrap();
    /// assert_eq!(map.get("L1").unwrap(), &["p1", "p2"]);
    /// assert_eq!(map.get("R").unwrap(), &["p3"]);
    ///
    /// assert!(PlacementMap::from_lines(["p1 L1", "onlyonetoken"]).is_err());
    /// ```
    pub fn from_lines<I, S>(lines: I) -> Result<Self, TreeError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut map = Self::new();

        for (i, line) in lines.into_iter().enumerate() {
            let line = line.as_ref();
            let mut tokens = line.split_whitespace();
            match (tokens.next(), tokens.next()) {
                (Some(taxon), Some(anchor)) => map.push(taxon, anchor),
                _ => {
                    return Err(TreeError::MalformedPlacement {
                        line: i + 1,
                        content: line.to_string(),
                    })
                }
            }
        }

        Ok(map)
    }

    /// Read a placement file (or "stdin"). Gzipped files are supported.
    pub fn from_file(infile: &str) -> anyhow::Result<Self> {
        let lines = crate::libs::io::read_lines(infile)?;
        let map = Self::from_lines(&lines)
            .with_context(|| format!("could not read placements from {}", infile))?;
        Ok(map)
    }

    fn push(&mut self, taxon: &str, anchor: &str) {
        self.taxa_of
            .entry(anchor.to_string())
            .or_default()
            .push(taxon.to_string());
    }

    /// Taxa placed at `anchor`, in input order
    pub fn get(&self, anchor: &str) -> Option<&[String]> {
        self.taxa_of.get(anchor).map(|v| v.as_slice())
    }

    pub fn contains(&self, anchor: &str) -> bool {
        self.taxa_of.contains_key(anchor)
    }

    /// Number of distinct anchors
    pub fn len(&self) -> usize {
        self.taxa_of.len()
    }

    pub fn is_empty(&self) -> bool {
        self.taxa_of.is_empty()
    }

    /// Number of placements over all anchors
    pub fn num_placements(&self) -> usize {
        self.taxa_of.values().map(|v| v.len()).sum()
    }

    pub fn anchors(&self) -> impl Iterator<Item = &str> {
        self.taxa_of.keys().map(|s| s.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.taxa_of.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// `(anchor, count)` pairs, largest count first; ties keep first-seen order.
    pub fn counts_desc(&self) -> Vec<(&str, usize)> {
        self.iter()
            .map(|(anchor, taxa)| (anchor, taxa.len()))
            .sorted_by(|a, b| b.1.cmp(&a.1))
            .collect()
    }
}
