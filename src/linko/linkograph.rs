//! Linkographs: labelled node sequences with backward and forward links.

use crate::models::LinkOntology;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A single step of a linkograph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkNode {
    /// Class label of this step
    pub class: String,
    /// Earlier nodes this node links back to
    pub backlinks: BTreeSet<usize>,
    /// Later nodes linking back to this node
    pub forelinks: BTreeSet<usize>,
}

/// An ordered sequence of nodes with links from later nodes to earlier ones.
///
/// Built once and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Linkograph {
    nodes: Vec<LinkNode>,
}

impl Linkograph {
    /// Build a linkograph from a label sequence.
    ///
    /// For `i < j`, nodes `i` and `j` are linked when `labels[j]` is listed
    /// under `labels[i]` in `ontology`.
    pub fn from_labels<S: AsRef<str>>(labels: &[S], ontology: &LinkOntology) -> Self {
        let mut nodes: Vec<LinkNode> = labels
            .iter()
            .map(|l| LinkNode {
                class: l.as_ref().to_string(),
                backlinks: BTreeSet::new(),
                forelinks: BTreeSet::new(),
            })
            .collect();

        for j in 0..labels.len() {
            for i in 0..j {
                if ontology.links(labels[i].as_ref(), labels[j].as_ref()) {
                    nodes[i].forelinks.insert(j);
                    nodes[j].backlinks.insert(i);
                }
            }
        }

        Self { nodes }
    }

    /// Build a linkograph from explicit `(earlier, later)` links.
    ///
    /// Pairs that are out of range or not strictly ordered are skipped.
    pub fn from_links<S: AsRef<str>>(labels: &[S], links: &[(usize, usize)]) -> Self {
        let mut nodes: Vec<LinkNode> = labels
            .iter()
            .map(|l| LinkNode {
                class: l.as_ref().to_string(),
                backlinks: BTreeSet::new(),
                forelinks: BTreeSet::new(),
            })
            .collect();

        for &(i, j) in links {
            if i < j && j < nodes.len() {
                nodes[i].forelinks.insert(j);
                nodes[j].backlinks.insert(i);
            }
        }

        Self { nodes }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[LinkNode] {
        &self.nodes
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(|n| n.class.as_str())
    }

    /// Total number of links.
    pub fn link_count(&self) -> usize {
        self.nodes.iter().map(|n| n.forelinks.len()).sum()
    }

    /// Number of node pairs that could be linked.
    pub fn max_links(&self) -> usize {
        let n = self.nodes.len();
        n * n.saturating_sub(1) / 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Ontology;

    fn ontology() -> LinkOntology {
        LinkOntology::new(Ontology::from_pairs([
            ("a", vec!["b"]),
            ("b", vec!["a", "b"]),
        ]))
        .unwrap()
    }

    #[test]
    fn test_links_follow_ontology() {
        let linko = Linkograph::from_labels(&["a", "b", "a", "b"], &ontology());

        // a→b at (0,1), (0,3), (2,3); b→a at (1,2); b→b at (1,3)
        assert_eq!(linko.link_count(), 5);
        assert_eq!(linko.nodes()[0].forelinks, BTreeSet::from([1, 3]));
        assert_eq!(linko.nodes()[3].backlinks, BTreeSet::from([0, 1, 2]));
        assert!(linko.nodes()[0].backlinks.is_empty());
        assert_eq!(linko.labels().collect::<Vec<_>>(), vec!["a", "b", "a", "b"]);
    }

    #[test]
    fn test_backlinks_mirror_forelinks() {
        let linko = Linkograph::from_labels(&["b", "b", "a", "b", "a"], &ontology());
        for (i, node) in linko.nodes().iter().enumerate() {
            for &j in &node.forelinks {
                assert!(j > i);
                assert!(linko.nodes()[j].backlinks.contains(&i));
            }
        }
    }

    #[test]
    fn test_max_links() {
        assert_eq!(Linkograph::from_labels::<&str>(&[], &ontology()).max_links(), 0);
        assert_eq!(Linkograph::from_labels(&["a"], &ontology()).max_links(), 0);
        assert_eq!(Linkograph::from_labels(&["a", "b", "a", "b"], &ontology()).max_links(), 6);
    }

    #[test]
    fn test_from_links_skips_invalid_pairs() {
        let linko = Linkograph::from_links(&["x", "y", "z"], &[(0, 2), (2, 1), (1, 5), (1, 1)]);
        assert_eq!(linko.link_count(), 1);
        assert_eq!(linko.nodes()[2].backlinks, BTreeSet::from([0]));
    }
}
