// file: src/models/term_set.rs
// description: ordered search terms with optional parallel group labels
// reference: https://docs.rs/serde_json

use crate::error::{PipelineError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Terms of one run, in search order. When `groups` is present it is
/// parallel to `terms` and holds each term's group label.
///
/// This is also the interchange document written between term resolution
/// and search, e.g. `{"terms": ["a", "b"], "groups": ["X", ""]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermSet {
    terms: Vec<String>,
    #[serde(default)]
    groups: Option<Vec<String>>,
}

impl TermSet {
    /// Repeated terms keep their first position.
    pub fn from_terms<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        let mut ordered = Vec::new();
        for term in terms {
            let term = term.into();
            if seen.insert(term.clone()) {
                ordered.push(term);
            }
        }

        Self {
            terms: ordered,
            groups: None,
        }
    }

    /// Repeated terms keep their first position while the group of the
    /// last occurrence wins.
    pub fn from_grouped<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut terms = Vec::new();
        let mut groups = Vec::new();

        for (term, group) in pairs {
            match index.get(&term) {
                Some(&position) => groups[position] = group,
                None => {
                    index.insert(term.clone(), terms.len());
                    terms.push(term);
                    groups.push(group);
                }
            }
        }

        Self {
            terms,
            groups: Some(groups),
        }
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn is_grouped(&self) -> bool {
        self.groups.is_some()
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn group_of(&self, term: &str) -> Option<&str> {
        let groups = self.groups.as_ref()?;
        let position = self.terms.iter().position(|t| t == term)?;
        groups.get(position).map(String::as_str)
    }

    /// Term → group label, or `None` when the terms are ungrouped.
    pub fn group_map(&self) -> Option<HashMap<String, String>> {
        self.groups.as_ref().map(|groups| {
            self.terms
                .iter()
                .cloned()
                .zip(groups.iter().cloned())
                .collect()
        })
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let set: TermSet = serde_json::from_str(json)?;
        set.check()?;
        Ok(set)
    }

    fn check(&self) -> Result<()> {
        if let Some(groups) = &self.groups
            && groups.len() != self.terms.len()
        {
            return Err(PipelineError::Serialization(format!(
                "term set has {} terms but {} groups",
                self.terms.len(),
                groups.len()
            )));
        }

        let unique: HashSet<&String> = self.terms.iter().collect();
        if unique.len() != self.terms.len() {
            return Err(PipelineError::Serialization(
                "term set contains repeated terms".to_string(),
            ));
        }

        Ok(())
    }
}
