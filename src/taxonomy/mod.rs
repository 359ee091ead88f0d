use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::nav_tree::NavNode;

pub mod canonical;
pub mod config;

pub use self::config::TaxonomyConfig;

/// A node of the canonical topic tree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicNode {
    pub slug: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TopicNode>,
}

/// Flattened view of a `TopicNode` with everything needed to answer "where
/// does this slug live" without walking the tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TopicDescriptor {
    pub slug: String,
    pub name: String,
    /// `None` only for roots.
    pub parent_slug: Option<String>,
    /// Slugs from the root down to and including this node, so `path[0]` is
    /// always a root and `path.len()` is the depth plus one.
    pub path: Vec<String>,
    /// Index among the node's canonical siblings.
    pub position: usize,
    // Child indices from `Taxonomy::roots` down to the originating node.
    node_path: Vec<usize>,
}

impl TopicDescriptor {
    pub fn depth(&self) -> usize {
        self.path.len() - 1
    }

    pub fn top_level_slug(&self) -> &str {
        &self.path[0]
    }

    pub fn is_root(&self) -> bool {
        self.parent_slug.is_none()
    }
}

/// Deprecated slugs and the canonical slug each now lives at.  Keys are stored
/// lower-cased.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LegacyMap {
    entries: BTreeMap<String, String>,
}

impl LegacyMap {
    pub fn get(&self, legacy: &str) -> Option<&str> {
        self.entries.get(legacy).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One step of a breadcrumb trail.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Crumb {
    pub slug: String,
    pub name: String,
}

/// The canonical taxonomy plus its derived lookup tables.
///
/// Instances are immutable once built and are meant to be shared by reference
/// between any number of callers; every resolver takes a `&Taxonomy` so tests
/// can substitute their own tree.  `Taxonomy::builtin()` is the publication's
/// own tree.
#[derive(Clone, Debug)]
pub struct Taxonomy {
    roots: Vec<TopicNode>,
    descriptors: Vec<TopicDescriptor>,
    by_slug: HashMap<String, usize>,
    // Lower-cased display name => descriptor index, first definition wins.
    by_name: HashMap<String, usize>,
    legacy: LegacyMap,
    default_slug: String,
    home_limit: usize,
}

lazy_static! {
    static ref BUILTIN: Taxonomy = Taxonomy::index(canonical::builtin_config());
}

struct IndexBuilder {
    descriptors: Vec<TopicDescriptor>,
    by_slug: HashMap<String, usize>,
    by_name: HashMap<String, usize>,
    path: Vec<String>,
    node_path: Vec<usize>,
}

impl IndexBuilder {
    fn visit(&mut self, node: &TopicNode, position: usize) {
        if self.by_slug.contains_key(&node.slug) {
            warn!(slug = %node.slug, "duplicate topic slug skipped while indexing");
            return;
        }

        let parent_slug = self.path.last().cloned();
        self.path.push(node.slug.clone());
        self.node_path.push(position);

        let ix = self.descriptors.len();
        self.by_slug.insert(node.slug.clone(), ix);
        self.by_name.entry(node.name.to_lowercase()).or_insert(ix);
        self.descriptors.push(TopicDescriptor {
            slug: node.slug.clone(),
            name: node.name.clone(),
            parent_slug,
            path: self.path.clone(),
            position,
            node_path: self.node_path.clone(),
        });

        for (child_position, child) in node.children.iter().enumerate() {
            self.visit(child, child_position);
        }

        self.path.pop();
        self.node_path.pop();
    }
}

impl Taxonomy {
    /// The publication's built-in taxonomy, constructed on first use.
    pub fn builtin() -> &'static Taxonomy {
        &BUILTIN
    }

    /// Validate and index a taxonomy definition.
    pub fn from_config(config: TaxonomyConfig) -> Result<Taxonomy> {
        config.validate()?;
        Ok(Taxonomy::index(config))
    }

    pub fn from_toml_str(config_str: &str) -> Result<Taxonomy> {
        Taxonomy::from_config(TaxonomyConfig::from_toml_str(config_str)?)
    }

    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Taxonomy> {
        let config_str = fs::read_to_string(path)?;
        Taxonomy::from_toml_str(&config_str)
    }

    // Depth-first walk producing the descriptor list.  Callers are expected to
    // have validated the config; duplicates are still skipped so the slug
    // index can't end up pointing at two nodes.
    fn index(config: TaxonomyConfig) -> Taxonomy {
        let mut builder = IndexBuilder {
            descriptors: Vec::new(),
            by_slug: HashMap::new(),
            by_name: HashMap::new(),
            path: Vec::new(),
            node_path: Vec::new(),
        };
        for (position, root) in config.topics.iter().enumerate() {
            builder.visit(root, position);
        }

        let mut legacy = BTreeMap::new();
        for (from, to) in config.legacy {
            let from = from.to_lowercase();
            if builder.by_slug.contains_key(&from) || !builder.by_slug.contains_key(&to) {
                warn!(legacy = %from, target = %to, "ignoring unusable legacy mapping");
                continue;
            }
            legacy.insert(from, to);
        }

        Taxonomy {
            roots: config.topics,
            descriptors: builder.descriptors,
            by_slug: builder.by_slug,
            by_name: builder.by_name,
            legacy: LegacyMap { entries: legacy },
            default_slug: config.default_slug,
            home_limit: config.home_limit,
        }
    }

    /// Reconstruct a config that would produce this taxonomy.
    pub fn to_config(&self) -> TaxonomyConfig {
        TaxonomyConfig {
            default_slug: self.default_slug.clone(),
            home_limit: self.home_limit,
            topics: self.roots.clone(),
            legacy: self.legacy.entries.clone(),
        }
    }

    pub fn roots(&self) -> &[TopicNode] {
        &self.roots
    }

    pub fn root_slugs(&self) -> impl Iterator<Item = &str> {
        self.roots.iter().map(|root| root.slug.as_str())
    }

    /// Every node in depth-first pre-order.
    pub fn descriptors(&self) -> &[TopicDescriptor] {
        &self.descriptors
    }

    pub fn descriptor(&self, slug: &str) -> Option<&TopicDescriptor> {
        self.by_slug.get(slug).map(|&ix| &self.descriptors[ix])
    }

    /// Exact, case-insensitive match against canonical display names.
    pub fn find_by_name(&self, name: &str) -> Option<&TopicDescriptor> {
        self.by_name
            .get(&name.trim().to_lowercase())
            .map(|&ix| &self.descriptors[ix])
    }

    pub fn topic(&self, slug: &str) -> Option<&TopicNode> {
        let descriptor = self.descriptor(slug)?;
        let (first, rest) = descriptor.node_path.split_first()?;
        let mut node = self.roots.get(*first)?;
        for &ix in rest {
            node = node.children.get(ix)?;
        }
        Some(node)
    }

    pub fn contains(&self, slug: &str) -> bool {
        self.by_slug.contains_key(slug)
    }

    pub fn is_root(&self, slug: &str) -> bool {
        self.descriptor(slug).map_or(false, TopicDescriptor::is_root)
    }

    pub fn legacy(&self) -> &LegacyMap {
        &self.legacy
    }

    pub fn default_slug(&self) -> &str {
        &self.default_slug
    }

    /// Display name of the default root.
    pub fn default_name(&self) -> &str {
        self.descriptor(&self.default_slug)
            .map_or(self.default_slug.as_str(), |d| d.name.as_str())
    }

    pub fn home_limit(&self) -> usize {
        self.home_limit
    }

    /// Root-to-node trail for a canonical slug; empty if the slug is unknown.
    pub fn breadcrumb(&self, slug: &str) -> Vec<Crumb> {
        let descriptor = match self.descriptor(slug) {
            Some(d) => d,
            None => return vec![],
        };
        descriptor
            .path
            .iter()
            .filter_map(|step| self.descriptor(step))
            .map(|d| Crumb {
                slug: d.slug.clone(),
                name: d.name.clone(),
            })
            .collect()
    }

    /// The canonical tree converted 1:1 into navigation nodes.
    pub fn canonical_nav_tree(&self) -> Vec<NavNode> {
        self.roots.iter().map(NavNode::from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TaxonomyError;

    #[test]
    fn test_builtin_is_valid() {
        canonical::builtin_config().validate().unwrap();
        let taxonomy = Taxonomy::builtin();
        assert_eq!(taxonomy.roots().len(), 9);
        assert_eq!(taxonomy.default_slug(), "trending");
        assert_eq!(taxonomy.default_name(), "Trending");
        assert_eq!(taxonomy.home_limit(), 8);
    }

    #[test]
    fn test_descriptor_paths() {
        let taxonomy = Taxonomy::builtin();
        for descriptor in taxonomy.descriptors() {
            assert_eq!(descriptor.path.last(), Some(&descriptor.slug));
            assert!(taxonomy.is_root(&descriptor.path[0]), "{:?}", descriptor);
            match &descriptor.parent_slug {
                None => assert_eq!(descriptor.depth(), 0),
                Some(parent) => {
                    assert_eq!(&descriptor.path[descriptor.path.len() - 2], parent);
                    let parent_depth = taxonomy.descriptor(parent).unwrap().depth();
                    assert_eq!(descriptor.depth(), parent_depth + 1);
                }
            }
        }

        let bangladesh = taxonomy.descriptor("bangladesh").unwrap();
        assert_eq!(bangladesh.path, vec!["global", "south-asia", "bangladesh"]);
        assert_eq!(bangladesh.position, 0);
        assert_eq!(taxonomy.descriptor("india").unwrap().position, 1);
    }

    #[test]
    fn test_topic_follows_back_to_the_node() {
        let taxonomy = Taxonomy::builtin();
        for descriptor in taxonomy.descriptors() {
            let node = taxonomy.topic(&descriptor.slug).unwrap();
            assert_eq!(node.slug, descriptor.slug);
            assert_eq!(node.name, descriptor.name);
        }
        assert!(taxonomy.topic("nope").is_none());
    }

    #[test]
    fn test_find_by_name_ignores_case() {
        let taxonomy = Taxonomy::builtin();
        assert_eq!(taxonomy.find_by_name("middle east").unwrap().slug, "middle-east");
        assert_eq!(taxonomy.find_by_name("  USA ").unwrap().slug, "usa");
        assert!(taxonomy.find_by_name("Middle-East").is_none());
    }

    #[test]
    fn test_legacy_targets_are_canonical() {
        let taxonomy = Taxonomy::builtin();
        assert!(!taxonomy.legacy().is_empty());
        for (legacy, target) in taxonomy.legacy().iter() {
            assert!(!taxonomy.contains(legacy), "{}", legacy);
            assert!(taxonomy.contains(target), "{} -> {}", legacy, target);
        }
    }

    #[test]
    fn test_breadcrumb() {
        let taxonomy = Taxonomy::builtin();
        let crumbs = taxonomy.breadcrumb("stocks");
        let names: Vec<&str> = crumbs.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Business", "Markets", "Stocks"]);
        assert!(taxonomy.breadcrumb("unknown").is_empty());
    }

    #[test]
    fn test_substitute_taxonomy() {
        let taxonomy = Taxonomy::from_toml_str(
            r#"
            default_slug = "news"
            home_limit = 2

            [[topic]]
            slug = "news"
            name = "News"

              [[topic.children]]
              slug = "local"
              name = "Local"

            [legacy]
            Headlines = "news"
            "#,
        )
        .unwrap();

        assert_eq!(taxonomy.default_name(), "News");
        assert_eq!(taxonomy.home_limit(), 2);
        assert_eq!(taxonomy.legacy().get("headlines"), Some("news"));
        assert_eq!(taxonomy.descriptor("local").unwrap().top_level_slug(), "news");
        assert_eq!(Taxonomy::from_config(taxonomy.to_config()).unwrap().descriptors().len(), 2);
    }

    #[test]
    fn test_invalid_taxonomies_are_rejected() {
        let check = |toml_str: &str, expected: TaxonomyError| {
            assert_eq!(Taxonomy::from_toml_str(toml_str).unwrap_err(), expected);
        };

        check("", TaxonomyError::EmptyTaxonomy);
        check(
            r#"
            default_slug = "a"
            [[topic]]
            slug = "a"
            name = "A"
              [[topic.children]]
              slug = "a"
              name = "Again"
            "#,
            TaxonomyError::DuplicateSlug("a".to_string()),
        );
        check(
            r#"
            default_slug = "a"
            [[topic]]
            slug = "A b"
            name = "A"
            "#,
            TaxonomyError::InvalidSlug("A b".to_string()),
        );
        check(
            r#"
            default_slug = "a"
            [[topic]]
            slug = ""
            name = "Nameless"
            "#,
            TaxonomyError::EmptySlug("Nameless".to_string()),
        );
        check(
            r#"
            default_slug = "a"
            [[topic]]
            slug = "a"
            name = "A"
            [legacy]
            old = "gone"
            "#,
            TaxonomyError::LegacyTargetUnknown {
                legacy: "old".to_string(),
                target: "gone".to_string(),
            },
        );
        check(
            r#"
            default_slug = "a"
            [[topic]]
            slug = "a"
            name = "A"
            [[topic]]
            slug = "b"
            name = "B"
            [legacy]
            b = "a"
            "#,
            TaxonomyError::LegacyShadowsCanonical("b".to_string()),
        );
        check(
            r#"
            default_slug = "kid"
            [[topic]]
            slug = "a"
            name = "A"
              [[topic.children]]
              slug = "kid"
              name = "Kid"
            "#,
            TaxonomyError::DefaultSlugNotRoot("kid".to_string()),
        );
    }
}
