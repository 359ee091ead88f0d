use crate::taxonomy::Taxonomy;

/// Outcome of resolving a slug against the taxonomy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedSlug {
    pub slug: String,
    /// True when the input was a deprecated slug that got mapped.
    pub is_legacy: bool,
}

/// Map an arbitrary slug-ish string onto the taxonomy.
///
/// Comparison is case-insensitive.  Canonical slugs come back as-is, legacy
/// slugs come back as their replacement with `is_legacy` set, and anything
/// else is passed through lower-cased; deciding whether an unknown slug is
/// acceptable is up to the caller.
pub fn resolve_slug(taxonomy: &Taxonomy, input: &str) -> ResolvedSlug {
    let lowered = input.to_lowercase();

    if let Some(descriptor) = taxonomy.descriptor(&lowered) {
        return ResolvedSlug {
            slug: descriptor.slug.clone(),
            is_legacy: false,
        };
    }

    if let Some(target) = taxonomy.legacy().get(&lowered) {
        trace!(input, target, "mapped legacy slug");
        return ResolvedSlug {
            slug: target.to_string(),
            is_legacy: true,
        };
    }

    ResolvedSlug {
        slug: lowered,
        is_legacy: false,
    }
}

/// Approximate the slug for a display name: lower-cased, with every run of
/// non-alphanumeric characters collapsed into a single hyphen and no leading
/// or trailing hyphens.  "Artificial Intelligence" becomes
/// "artificial-intelligence".
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_hyphen = false;
    for c in name.chars().flat_map(char::to_lowercase) {
        if c.is_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c);
        } else {
            pending_hyphen = true;
        }
    }
    slug
}
