//! Ontologies: named classes plus the classes each one relates to.
//!
//! Two roles are kept apart at the type level:
//! - [`NextOntology`] drives state transitions of a generating model
//! - [`LinkOntology`] decides which node pairs of a linkograph are linked

use crate::models::{LinkoscopeError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Mapping from class name to related class names.
///
/// Keys iterate in sorted order, so a class index is its position in
/// [`Ontology::classes`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ontology(BTreeMap<String, Vec<String>>);

impl Ontology {
    /// Build an ontology from `(class, related classes)` pairs.
    pub fn from_pairs<I, K, V, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into_iter().map(Into::into).collect()))
                .collect(),
        )
    }

    /// Parse an ontology from JSON text.
    pub fn from_json(text: &str) -> Result<Self> {
        let ontology: Self = serde_json::from_str(text)
            .map_err(|e| LinkoscopeError::Parse(format!("ontology: {e}")))?;
        ontology.validate()?;
        Ok(ontology)
    }

    /// Load an ontology from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| LinkoscopeError::io(format!("reading ontology {}", path.display()), e))?;
        Self::from_json(&text).map_err(|e| match e {
            LinkoscopeError::Parse(msg) => {
                LinkoscopeError::Parse(format!("{}: {msg}", path.display()))
            }
            other => other,
        })
    }

    /// Reject ontologies with no classes.
    pub fn validate(&self) -> Result<()> {
        if self.0.is_empty() {
            return Err(LinkoscopeError::Configuration(
                "ontology has no classes".to_string(),
            ));
        }
        Ok(())
    }

    /// Class names in sorted order.
    pub fn classes(&self) -> Vec<String> {
        self.0.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Position of `class` in the sorted class list.
    pub fn index_of(&self, class: &str) -> Option<usize> {
        self.0.keys().position(|k| k == class)
    }

    /// Classes related to `class` (empty if `class` is unknown).
    pub fn related(&self, class: &str) -> &[String] {
        self.0.get(class).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether `to` is listed under `from`.
    pub fn relates(&self, from: &str, to: &str) -> bool {
        self.related(from).iter().any(|c| c == to)
    }
}

/// Ontology used to build a generating model's state space.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NextOntology(Ontology);

impl NextOntology {
    pub fn new(ontology: Ontology) -> Result<Self> {
        ontology.validate()?;
        Ok(Self(ontology))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        Self::new(Ontology::from_file(path)?)
    }

    pub fn inner(&self) -> &Ontology {
        &self.0
    }

    /// Read this ontology's relations as linking rules.
    ///
    /// Used when a model builds a linkograph from its own ontology.
    pub fn as_link_ontology(&self) -> LinkOntology {
        LinkOntology(self.0.clone())
    }
}

/// Ontology used to decide links between linkograph nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LinkOntology(Ontology);

impl LinkOntology {
    pub fn new(ontology: Ontology) -> Result<Self> {
        ontology.validate()?;
        Ok(Self(ontology))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        Self::new(Ontology::from_file(path)?)
    }

    pub fn inner(&self) -> &Ontology {
        &self.0
    }

    /// Whether a node labelled `later` links back to an earlier node labelled `earlier`.
    pub fn links(&self, earlier: &str, later: &str) -> bool {
        self.0.relates(earlier, later)
    }
}
