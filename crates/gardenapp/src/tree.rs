//! # Note Trees
//!
//! Notes can declare a `parent` by id. [`nest`] turns a flat list of entries into a
//! forest of [`Node`]s, each owning its children.
//!
//! ## Algorithm
//!
//! The builder works on an arena of indexes into the input slice and never mutates
//! the caller's entries:
//!
//! 1. Map each lowercased id to its index. Duplicate ids are logged and the first
//!    occurrence wins the lookup.
//! 2. Walk the input in order. Entries without a parent are roots. Entries whose
//!    parent exists are appended to that parent's child list, so siblings keep
//!    their input order. Entries whose parent does not exist are logged and
//!    promoted to roots.
//! 3. Every index must be reachable from a root. Anything left over sits on a
//!    parent cycle (`a -> b -> a`, or a note that is its own parent), which is
//!    rejected with [`GardenError::ParentCycle`].
//! 4. Materialize owned [`Node`]s from the roots down.
//!
//! Each input entry appears exactly once in the output forest.
//!
//! ## Redaction
//!
//! [`redact_tree`] filters a forest with a predicate and returns a new forest. A
//! node that fails the predicate is removed together with its whole subtree.

use log::warn;
use serde::Serialize;
use std::collections::HashMap;

use crate::error::{GardenError, Result};
use crate::model::Entry;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    pub entry: Entry,
    pub children: Vec<Node>,
}

impl Node {
    pub fn leaf(entry: Entry) -> Self {
        Self {
            entry,
            children: Vec::new(),
        }
    }

    /// Number of nodes in this subtree, including self.
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(Node::size).sum::<usize>()
    }

    /// Pre-order walk over this subtree.
    pub fn walk(&self) -> Vec<&Entry> {
        let mut out = Vec::new();
        self.collect_into(&mut out);
        out
    }

    fn collect_into<'a>(&'a self, out: &mut Vec<&'a Entry>) {
        out.push(&self.entry);
        for child in &self.children {
            child.collect_into(out);
        }
    }
}

/// Pre-order walk over a whole forest.
pub fn flatten(forest: &[Node]) -> Vec<&Entry> {
    forest.iter().flat_map(Node::walk).collect()
}

/// Nests entries under their declared parents.
pub fn nest(entries: &[Entry]) -> Result<Vec<Node>> {
    let mut by_id: HashMap<String, usize> = HashMap::with_capacity(entries.len());
    for (idx, entry) in entries.iter().enumerate() {
        let key = entry.id().to_lowercase();
        if by_id.contains_key(&key) {
            warn!("Duplicate entry id \"{}\"; parent lookups use the first one", entry.id());
            continue;
        }
        by_id.insert(key, idx);
    }

    let mut children: Vec<Vec<usize>> = vec![Vec::new(); entries.len()];
    let mut parent_of: Vec<Option<usize>> = vec![None; entries.len()];
    let mut roots = Vec::new();

    for (idx, entry) in entries.iter().enumerate() {
        let Some(parent) = entry.parent() else {
            roots.push(idx);
            continue;
        };

        match by_id.get(&parent.to_lowercase()) {
            Some(&parent_idx) => {
                children[parent_idx].push(idx);
                parent_of[idx] = Some(parent_idx);
            }
            None => {
                warn!(
                    "Parent \"{}\" of \"{}\" not found; treating it as a root",
                    parent,
                    entry.id()
                );
                roots.push(idx);
            }
        }
    }

    let mut reached = vec![false; entries.len()];
    let mut stack: Vec<usize> = roots.clone();
    while let Some(idx) = stack.pop() {
        if reached[idx] {
            continue;
        }
        reached[idx] = true;
        stack.extend(children[idx].iter().copied());
    }

    if let Some(start) = reached.iter().position(|r| !r) {
        return Err(GardenError::ParentCycle(cycle_from(start, entries, &parent_of)));
    }

    Ok(roots
        .into_iter()
        .map(|idx| materialize(idx, entries, &children))
        .collect())
}

/// Follows parent links from `start` until an index repeats and returns the ids on
/// the loop, closed with its first id.
fn cycle_from(start: usize, entries: &[Entry], parent_of: &[Option<usize>]) -> Vec<String> {
    let mut path: Vec<usize> = Vec::new();
    let mut current = Some(start);

    while let Some(idx) = current {
        if let Some(pos) = path.iter().position(|&p| p == idx) {
            let mut ids: Vec<String> = path[pos..]
                .iter()
                .map(|&i| entries[i].id().to_string())
                .collect();
            ids.push(entries[idx].id().to_string());
            return ids;
        }
        path.push(idx);
        current = parent_of[idx];
    }

    // Unreachable for well-formed input: unreached nodes always have a parent link.
    path.iter().map(|&i| entries[i].id().to_string()).collect()
}

fn materialize(idx: usize, entries: &[Entry], children: &[Vec<usize>]) -> Node {
    let mut node = Node::leaf(entries[idx].clone());
    node.children = children[idx]
        .iter()
        .map(|&child| materialize(child, entries, children))
        .collect();
    node
}

/// Returns a new forest containing only nodes that satisfy `keep`. A removed node
/// takes its subtree with it.
pub fn redact_tree<F>(forest: &[Node], keep: &F) -> Vec<Node>
where
    F: Fn(&Entry) -> bool,
{
    forest
        .iter()
        .filter(|node| keep(&node.entry))
        .map(|node| Node {
            entry: node.entry.clone(),
            children: redact_tree(&node.children, keep),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EntryBase, EntryKind, NoteData};

    fn note(id: &str, parent: Option<&str>) -> Entry {
        Entry {
            base: EntryBase {
                id: id.to_string(),
                title: None,
                date: None,
                last_modified: None,
                tags: vec![],
                private: false,
                body: String::new(),
                source_path: None,
            },
            kind: EntryKind::Note(NoteData {
                parent: parent.map(str::to_string),
            }),
        }
    }

    fn ids(nodes: &[Node]) -> Vec<&str> {
        nodes.iter().map(|n| n.entry.id()).collect()
    }

    #[test]
    fn test_nest_with_missing_parent() {
        let entries = vec![note("a", None), note("b", Some("a")), note("c", Some("missing"))];
        let roots = nest(&entries).unwrap();

        assert_eq!(ids(&roots), vec!["a", "c"]);
        assert_eq!(ids(&roots[0].children), vec!["b"]);
        assert!(roots[1].children.is_empty());
    }

    #[test]
    fn test_every_entry_appears_once() {
        let entries = vec![
            note("child-2", Some("root")),
            note("root", None),
            note("grandchild", Some("child-1")),
            note("child-1", Some("root")),
            note("orphan", Some("nowhere")),
        ];
        let roots = nest(&entries).unwrap();
        let flat = flatten(&roots);
        let mut seen: Vec<&str> = flat.iter().map(|e| e.id()).collect();
        seen.sort();

        let mut expected: Vec<&str> = entries.iter().map(|e| e.id()).collect();
        expected.sort();
        assert_eq!(seen, expected);
    }

    #[test]
    fn test_children_keep_input_order() {
        let entries = vec![
            note("p", None),
            note("z", Some("p")),
            note("a", Some("p")),
            note("m", Some("p")),
        ];
        let roots = nest(&entries).unwrap();
        assert_eq!(ids(&roots[0].children), vec!["z", "a", "m"]);
    }

    #[test]
    fn test_parent_lookup_is_case_insensitive() {
        let entries = vec![note("Parent-Note", None), note("kid", Some("parent-note"))];
        let roots = nest(&entries).unwrap();
        assert_eq!(roots.len(), 1);
        assert_eq!(ids(&roots[0].children), vec!["kid"]);
    }

    #[test]
    fn test_input_is_not_mutated() {
        let entries = vec![note("a", None), note("b", Some("a"))];
        let before = entries.clone();
        let _ = nest(&entries).unwrap();
        assert_eq!(entries, before);
    }

    #[test]
    fn test_cycle_is_rejected() {
        let entries = vec![note("root", None), note("a", Some("b")), note("b", Some("a"))];
        match nest(&entries) {
            Err(GardenError::ParentCycle(path)) => {
                assert_eq!(path.first(), path.last());
                assert!(path.contains(&"a".to_string()));
                assert!(path.contains(&"b".to_string()));
            }
            other => panic!("Expected ParentCycle, got {:?}", other),
        }
    }

    #[test]
    fn test_self_parent_is_a_cycle() {
        let entries = vec![note("loop", Some("loop"))];
        match nest(&entries) {
            Err(GardenError::ParentCycle(path)) => assert_eq!(path, vec!["loop", "loop"]),
            other => panic!("Expected ParentCycle, got {:?}", other),
        }
    }

    #[test]
    fn test_descendant_of_cycle_reports_the_cycle() {
        let entries = vec![note("a", Some("b")), note("b", Some("a")), note("c", Some("a"))];
        match nest(&entries) {
            Err(GardenError::ParentCycle(path)) => assert!(!path.contains(&"c".to_string())),
            other => panic!("Expected ParentCycle, got {:?}", other),
        }
    }

    #[test]
    fn test_redact_removes_subtrees() {
        let entries = vec![
            note("a", None),
            note("secret", Some("a")),
            note("under-secret", Some("secret")),
            note("b", Some("a")),
        ];
        let roots = nest(&entries).unwrap();
        let keep = |e: &Entry| e.id() != "secret";
        let redacted = redact_tree(&roots, &keep);

        assert_eq!(ids(&redacted[0].children), vec!["b"]);
        assert_eq!(redacted[0].size(), 2);
    }

    #[test]
    fn test_redact_is_idempotent() {
        let entries = vec![note("a", None), note("x", Some("a")), note("y", None)];
        let roots = nest(&entries).unwrap();
        let keep = |e: &Entry| e.id() != "x";

        let once = redact_tree(&roots, &keep);
        let twice = redact_tree(&once, &keep);
        assert_eq!(once, twice);
    }
}
