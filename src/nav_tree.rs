use std::collections::HashMap;

use serde::Serialize;

use crate::ordering::sort_siblings;
use crate::records::CategoryRecord;
use crate::taxonomy::{Taxonomy, TopicNode};

/// A node of a navigation tree as consumed by menus and breadcrumbs.  Slugs
/// are unique across the whole tree a builder returns.
///
/// Backend data decides how deep a tree gets, so everything that walks one
/// (including dropping it) does so with an explicit stack.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NavNode {
    pub slug: String,
    pub name: String,
    pub children: Vec<NavNode>,
}

impl From<&TopicNode> for NavNode {
    fn from(topic: &TopicNode) -> NavNode {
        NavNode {
            slug: topic.slug.clone(),
            name: topic.name.clone(),
            children: topic.children.iter().map(NavNode::from).collect(),
        }
    }
}

impl Drop for NavNode {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.children);
        }
    }
}

impl NavNode {
    /// Pre-order visit of this node and its descendants along with their depth
    /// relative to this node.
    pub fn walk<F: FnMut(&NavNode, usize)>(&self, f: &mut F) {
        let mut pending = vec![(self, 0)];
        while let Some((node, depth)) = pending.pop() {
            f(node, depth);
            pending.extend(node.children.iter().rev().map(|child| (child, depth + 1)));
        }
    }

    /// Number of nodes in this subtree, including this one.
    pub fn count(&self) -> usize {
        let mut count = 0;
        self.walk(&mut |_, _| count += 1);
        count
    }
}

/// A record reduced to what tree building needs, with the parent reference
/// already inherited from any enclosing record.
struct FlatRecord<'a> {
    slug: &'a str,
    name: Option<&'a str>,
    parent: Option<&'a str>,
}

/// Pre-order flattening of possibly nested records.  Children of a dropped
/// record still get walked; they inherit whatever parent the dropped record
/// would have had.
fn flatten(records: &[CategoryRecord]) -> Vec<FlatRecord<'_>> {
    let mut out = Vec::new();
    let mut pending = vec![(records.iter(), None)];
    while let Some((iter, inherited)) = pending.last_mut() {
        let inherited: Option<&str> = *inherited;
        let record = match iter.next() {
            Some(record) => record,
            None => {
                pending.pop();
                continue;
            }
        };
        let parent = record.parent_slug().or(inherited);
        match record.slug() {
            Some(slug) => out.push(FlatRecord {
                slug,
                name: record.name(),
                parent,
            }),
            None => trace!(name = ?record.name(), "dropping category record without a slug"),
        }
        pending.push((record.children().iter(), record.slug().or(parent)));
    }
    out
}

#[derive(Clone, Copy, PartialEq)]
enum Mark {
    Unseen,
    OnPath(usize),
    Settled,
}

/// Drop the parent links that close a cycle, visiting nodes in first-seen
/// order.  The earliest member of each cycle becomes a root and the rest keep
/// their declared parents.  Every node is walked once.
fn break_cycles(entries: &[FlatRecord<'_>], parents: &mut [Option<usize>]) {
    let mut marks = vec![Mark::Unseen; parents.len()];
    let mut path: Vec<usize> = Vec::new();
    for start in 0..parents.len() {
        let mut cur = Some(start);
        while let Some(ix) = cur {
            match marks[ix] {
                Mark::Settled => break,
                Mark::OnPath(pos) => {
                    if let Some(&first) = path[pos..].iter().min() {
                        trace!(slug = entries[first].slug, "parent links form a cycle; promoting to root");
                        parents[first] = None;
                    }
                    break;
                }
                Mark::Unseen => {
                    marks[ix] = Mark::OnPath(path.len());
                    path.push(ix);
                    cur = parents[ix];
                }
            }
        }
        for ix in path.drain(..) {
            marks[ix] = Mark::Settled;
        }
    }
}

/// Reconcile a backend category list into an ordered navigation forest.
///
/// An absent or empty list (or one where no record has a usable slug) yields
/// the canonical tree.  Otherwise the records, which may themselves be
/// nested, are flattened and every slug becomes exactly one node, the first
/// record for a slug winning.  Missing names fall back to the canonical name,
/// then to the slug.  Nodes hang off their declared parent when that parent is
/// one of the records; when it isn't (or the links form a cycle) the node is
/// promoted to a root rather than dropped.  Each sibling list is put into
/// canonical order before it is attached, so the forest comes out the way
/// `sort_nav_nodes` would leave it.
pub fn build_nav_tree(taxonomy: &Taxonomy, records: Option<&[CategoryRecord]>) -> Vec<NavNode> {
    let records = match records {
        Some(records) if !records.is_empty() => records,
        _ => {
            debug!("no category records; using the canonical tree");
            return taxonomy.canonical_nav_tree();
        }
    };

    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut entries: Vec<FlatRecord> = Vec::new();
    for record in flatten(records) {
        if index.contains_key(record.slug) {
            trace!(slug = record.slug, "ignoring duplicate category record");
            continue;
        }
        index.insert(record.slug, entries.len());
        entries.push(record);
    }

    if entries.is_empty() {
        debug!("no usable category records; using the canonical tree");
        return taxonomy.canonical_nav_tree();
    }

    let mut parents: Vec<Option<usize>> = entries
        .iter()
        .enumerate()
        .map(|(ix, entry)| {
            let parent = entry.parent?;
            match index.get(parent) {
                Some(&parent_ix) if parent_ix != ix => Some(parent_ix),
                _ => {
                    trace!(slug = entry.slug, parent, "parent not resolvable; promoting to root");
                    None
                }
            }
        })
        .collect();
    break_cycles(&entries, &mut parents);

    let mut children: Vec<Vec<usize>> = vec![Vec::new(); entries.len()];
    let mut roots = Vec::new();
    for (ix, parent) in parents.iter().enumerate() {
        match parent {
            Some(p) => children[*p].push(ix),
            None => roots.push(ix),
        }
    }

    // Pre-order from the roots; walking it backwards reaches every node after
    // all of its descendants, so each one can take its finished children.
    let mut order = Vec::with_capacity(entries.len());
    let mut pending: Vec<usize> = roots.iter().rev().copied().collect();
    while let Some(ix) = pending.pop() {
        order.push(ix);
        pending.extend(children[ix].iter().rev());
    }

    let mut built: Vec<Option<NavNode>> = Vec::new();
    built.resize_with(entries.len(), || None);
    for &ix in order.iter().rev() {
        let entry = &entries[ix];
        let name = match entry.name {
            Some(name) => name.to_string(),
            None => taxonomy
                .descriptor(entry.slug)
                .map_or_else(|| entry.slug.to_string(), |d| d.name.clone()),
        };
        let mut kids: Vec<NavNode> = children[ix].iter().filter_map(|&c| built[c].take()).collect();
        sort_siblings(taxonomy, &mut kids, Some(entry.slug));
        built[ix] = Some(NavNode {
            slug: entry.slug.to_string(),
            name,
            children: kids,
        });
    }

    let mut forest: Vec<NavNode> = roots.iter().filter_map(|&ix| built[ix].take()).collect();
    sort_siblings(taxonomy, &mut forest, None);
    forest
}
