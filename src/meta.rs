use serde::{Deserialize, Serialize};

use crate::records::non_empty;
use crate::resolve::{resolve_slug, slugify, ResolvedSlug};
use crate::taxonomy::{Crumb, Taxonomy};

/// Whatever a content item knows about its own category.  Any combination of
/// fields may be missing.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CategoryRef {
    pub slug: Option<String>,
    pub name: Option<String>,
    pub parent_slug: Option<String>,
}

impl CategoryRef {
    pub fn from_slug(slug: &str) -> CategoryRef {
        CategoryRef {
            slug: Some(slug.to_string()),
            ..Default::default()
        }
    }

    pub fn from_name(name: &str) -> CategoryRef {
        CategoryRef {
            name: Some(name.to_string()),
            ..Default::default()
        }
    }
}

/// Fully resolved category information for badges and breadcrumbs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryMeta {
    pub slug: String,
    pub name: String,
    pub top_level_slug: String,
    pub top_level_name: String,
    /// Whether any step of resolution went through the legacy slug table.
    pub is_legacy: bool,
}

impl CategoryMeta {
    /// Breadcrumb trail for the resolved slug.  Categories the taxonomy
    /// doesn't know about get a single crumb of their own.
    pub fn breadcrumb(&self, taxonomy: &Taxonomy) -> Vec<Crumb> {
        let crumbs = taxonomy.breadcrumb(&self.slug);
        if !crumbs.is_empty() {
            return crumbs;
        }
        vec![Crumb {
            slug: self.slug.clone(),
            name: self.name.clone(),
        }]
    }
}

/// A single way of turning a reference into a working slug; `None` means
/// "not applicable, try the next one".
type Strategy = fn(&Taxonomy, &CategoryRef) -> Option<ResolvedSlug>;

/// Tried in order, first hit wins.  Falling off the end lands on the
/// taxonomy's default slug.
const STRATEGIES: &[(&str, Strategy)] = &[
    ("slug", by_slug),
    ("name", by_name),
    ("parent", by_parent_slug),
];

fn by_slug(taxonomy: &Taxonomy, reference: &CategoryRef) -> Option<ResolvedSlug> {
    non_empty(&reference.slug).map(|slug| resolve_slug(taxonomy, slug))
}

fn by_name(taxonomy: &Taxonomy, reference: &CategoryRef) -> Option<ResolvedSlug> {
    let name = non_empty(&reference.name)?;
    if let Some(descriptor) = taxonomy.find_by_name(name) {
        return Some(ResolvedSlug {
            slug: descriptor.slug.clone(),
            is_legacy: false,
        });
    }
    let approximated = slugify(name);
    if approximated.is_empty() {
        return None;
    }
    Some(resolve_slug(taxonomy, &approximated))
}

// Knowing only the parent degrades the item to the parent's identity.
fn by_parent_slug(taxonomy: &Taxonomy, reference: &CategoryRef) -> Option<ResolvedSlug> {
    non_empty(&reference.parent_slug).map(|parent| resolve_slug(taxonomy, parent))
}

fn working_slug(taxonomy: &Taxonomy, reference: Option<&CategoryRef>) -> ResolvedSlug {
    if let Some(reference) = reference {
        for (label, strategy) in STRATEGIES {
            if let Some(resolved) = strategy(taxonomy, reference) {
                trace!(strategy = *label, slug = %resolved.slug, is_legacy = resolved.is_legacy, "category resolved");
                return resolved;
            }
        }
    }
    trace!("category reference carried nothing usable; using the default slug");
    ResolvedSlug {
        slug: taxonomy.default_slug().to_string(),
        is_legacy: false,
    }
}

/// Resolve a content item's (possibly partial, possibly absent) category
/// reference into a complete `CategoryMeta`.
///
/// The working slug comes from the first of slug, name, and parent slug that
/// is present, else the default slug.  If the taxonomy knows that slug, its
/// canonical name and root win over any name hint.  Otherwise the slug is its
/// own top level and the name hint (or the slug) is the name.  This never
/// fails and only does table lookups.
pub fn resolve_meta(taxonomy: &Taxonomy, reference: Option<&CategoryRef>) -> CategoryMeta {
    let ResolvedSlug { slug, is_legacy } = working_slug(taxonomy, reference);

    let (name, top_level_slug) = match taxonomy.descriptor(&slug) {
        Some(descriptor) => (descriptor.name.clone(), descriptor.top_level_slug().to_string()),
        None => {
            let hint = reference.and_then(|r| non_empty(&r.name));
            (hint.unwrap_or(&slug).to_string(), slug.clone())
        }
    };

    let top_level_name = match taxonomy.descriptor(&top_level_slug) {
        Some(descriptor) => descriptor.name.clone(),
        None => taxonomy.default_name().to_string(),
    };

    CategoryMeta {
        slug,
        name,
        top_level_slug,
        top_level_name,
        is_legacy,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(reference: CategoryRef) -> CategoryMeta {
        resolve_meta(Taxonomy::builtin(), Some(&reference))
    }

    #[test]
    fn test_legacy_slug() {
        assert_eq!(
            meta(CategoryRef::from_slug("ai")),
            CategoryMeta {
                slug: "tech".to_string(),
                name: "Tech".to_string(),
                top_level_slug: "tech".to_string(),
                top_level_name: "Tech".to_string(),
                is_legacy: true,
            }
        );
    }

    #[test]
    fn test_name_only() {
        let resolved = meta(CategoryRef::from_name("Bangladesh"));
        assert_eq!(resolved.slug, "bangladesh");
        assert_eq!(resolved.top_level_slug, "global");
        assert_eq!(resolved.top_level_name, "Global");
        assert!(!resolved.is_legacy);

        let legacy_named = meta(CategoryRef::from_name("Artificial Intelligence"));
        assert_eq!(legacy_named.slug, "tech");
        assert!(legacy_named.is_legacy);
    }

    #[test]
    fn test_canonical_name_wins_over_hint() {
        let resolved = meta(CategoryRef {
            slug: Some("economy".to_string()),
            name: Some("The Economy Desk".to_string()),
            parent_slug: Some("sports".to_string()),
        });
        assert_eq!(resolved.name, "Economy");
        assert_eq!(resolved.top_level_slug, "business");
    }

    #[test]
    fn test_parent_only_adopts_parent() {
        let resolved = meta(CategoryRef {
            parent_slug: Some("World".to_string()),
            ..Default::default()
        });
        assert_eq!(resolved.slug, "global");
        assert_eq!(resolved.name, "Global");
        assert!(resolved.is_legacy);
    }

    #[test]
    fn test_unknown_slug_keeps_hint() {
        let resolved = meta(CategoryRef {
            slug: Some("Gardening".to_string()),
            name: Some("Gardening & Outdoors".to_string()),
            parent_slug: None,
        });
        assert_eq!(resolved.slug, "gardening");
        assert_eq!(resolved.name, "Gardening & Outdoors");
        assert_eq!(resolved.top_level_slug, "gardening");
        assert_eq!(resolved.top_level_name, "Trending");
        assert!(!resolved.is_legacy);

        let bare = meta(CategoryRef::from_slug("puzzles"));
        assert_eq!(bare.name, "puzzles");
    }

    #[test]
    fn test_nothing_means_default() {
        let taxonomy = Taxonomy::builtin();
        let expected = CategoryMeta {
            slug: "trending".to_string(),
            name: "Trending".to_string(),
            top_level_slug: "trending".to_string(),
            top_level_name: "Trending".to_string(),
            is_legacy: false,
        };
        assert_eq!(resolve_meta(taxonomy, None), expected);
        assert_eq!(meta(CategoryRef::default()), expected);
        assert_eq!(
            meta(CategoryRef {
                slug: Some("  ".to_string()),
                name: Some("?!".to_string()),
                parent_slug: Some(String::new()),
            }),
            expected
        );
    }

    #[test]
    fn test_breadcrumb() {
        let taxonomy = Taxonomy::builtin();
        let known = meta(CategoryRef::from_slug("usa"));
        let names: Vec<String> = known.breadcrumb(taxonomy).into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["Global", "Americas", "USA"]);

        let unknown = meta(CategoryRef::from_slug("puzzles"));
        assert_eq!(
            unknown.breadcrumb(taxonomy),
            vec![Crumb {
                slug: "puzzles".to_string(),
                name: "puzzles".to_string(),
            }]
        );
    }
}
