use std::cmp::Ordering;

use lexical_sort::natural_lexical_cmp;

use crate::nav_tree::NavNode;
use crate::taxonomy::Taxonomy;

/// Position of `slug` in the canonical sibling list under `parent_key`, where
/// `None` is the list of roots.  A canonical slug appearing under some other
/// parent doesn't count as recognized there.
fn canonical_position(taxonomy: &Taxonomy, parent_key: Option<&str>, slug: &str) -> Option<usize> {
    taxonomy
        .descriptor(slug)
        .filter(|d| d.parent_slug.as_deref() == parent_key)
        .map(|d| d.position)
}

/// Total order over siblings: recognized before unrecognized, canonical index
/// among the recognized, then case-insensitive name among the rest.  The
/// exact name and finally the slug break ties so that the result never
/// depends on input order.
fn compare_siblings(taxonomy: &Taxonomy, parent_key: Option<&str>, a: &NavNode, b: &NavNode) -> Ordering {
    let pos_a = canonical_position(taxonomy, parent_key, &a.slug);
    let pos_b = canonical_position(taxonomy, parent_key, &b.slug);
    match (pos_a, pos_b) {
        (Some(pa), Some(pb)) => pa.cmp(&pb),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => natural_lexical_cmp(&a.name, &b.name)
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| a.slug.cmp(&b.slug)),
    }
}

/// Sort one sibling list in place, leaving the children alone.
pub fn sort_siblings(taxonomy: &Taxonomy, nodes: &mut [NavNode], parent_key: Option<&str>) {
    nodes.sort_by(|a, b| compare_siblings(taxonomy, parent_key, a, b));
}

/// Sort `nodes` in place into canonical order, descending into children with
/// each node's slug as the next parent key.  Pass `None` for a list of roots.
pub fn sort_nav_nodes<'a>(taxonomy: &Taxonomy, nodes: &'a mut [NavNode], parent_key: Option<&'a str>) {
    let mut pending = vec![(nodes, parent_key)];
    while let Some((nodes, parent_key)) = pending.pop() {
        sort_siblings(taxonomy, nodes, parent_key);
        for node in nodes {
            pending.push((&mut node.children[..], Some(node.slug.as_str())));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(slug: &str, name: &str, children: Vec<NavNode>) -> NavNode {
        NavNode {
            slug: slug.to_string(),
            name: name.to_string(),
            children,
        }
    }

    fn slugs(nodes: &[NavNode]) -> Vec<&str> {
        nodes.iter().map(|n| n.slug.as_str()).collect()
    }

    #[test]
    fn test_recognized_first_in_canonical_order() {
        let taxonomy = Taxonomy::builtin();
        let mut nodes = vec![
            node("zoo", "zoo", vec![]),
            node("opinion", "Opinion", vec![]),
            node("Apple", "apple", vec![]),
            node("trending", "Trending", vec![]),
            node("global", "Global", vec![]),
        ];
        sort_nav_nodes(taxonomy, &mut nodes, None);
        assert_eq!(slugs(&nodes), vec!["trending", "global", "opinion", "Apple", "zoo"]);
    }

    #[test]
    fn test_unrecognized_sort_ignores_case() {
        let taxonomy = Taxonomy::builtin();
        let mut nodes = vec![
            node("z", "Zeta", vec![]),
            node("a", "alpha", vec![]),
            node("b", "Beta", vec![]),
        ];
        sort_nav_nodes(taxonomy, &mut nodes, None);
        assert_eq!(slugs(&nodes), vec!["a", "b", "z"]);
    }

    #[test]
    fn test_child_recognized_only_under_its_canonical_parent() {
        let taxonomy = Taxonomy::builtin();
        // "cricket" is canonical under "sports", not under "opinion".
        let mut nodes = vec![node(
            "opinion",
            "Opinion",
            vec![
                node("cricket", "Cricket", vec![]),
                node("letters", "Letters", vec![]),
                node("editorial", "Editorial", vec![]),
            ],
        )];
        sort_nav_nodes(taxonomy, &mut nodes, None);
        assert_eq!(slugs(&nodes[0].children), vec!["editorial", "letters", "cricket"]);
    }

    #[test]
    fn test_recurses_into_grandchildren() {
        let taxonomy = Taxonomy::builtin();
        let mut nodes = vec![node(
            "business",
            "Business",
            vec![
                node(
                    "markets",
                    "Markets",
                    vec![node("crypto", "Crypto", vec![]), node("stocks", "Stocks", vec![])],
                ),
                node("economy", "Economy", vec![]),
            ],
        )];
        sort_nav_nodes(taxonomy, &mut nodes, None);
        assert_eq!(slugs(&nodes[0].children), vec!["economy", "markets"]);
        assert_eq!(slugs(&nodes[0].children[1].children), vec!["stocks", "crypto"]);
    }

    #[test]
    fn test_sorts_very_deep_trees() {
        let taxonomy = Taxonomy::builtin();
        let mut leaf = vec![node("zeta", "Zeta", vec![]), node("alpha", "Alpha", vec![])];
        for i in 0..100_000 {
            leaf = vec![node(&format!("n{}", i), "", leaf)];
        }
        sort_nav_nodes(taxonomy, &mut leaf, None);
        let mut bottom = &leaf;
        while bottom[0].children.len() == 1 {
            bottom = &bottom[0].children;
        }
        assert_eq!(slugs(&bottom[0].children), vec!["alpha", "zeta"]);
    }
}
