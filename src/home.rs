use std::collections::HashMap;

use itertools::Itertools;
use lexical_sort::natural_lexical_cmp;
use serde::Serialize;

use crate::records::CategoryRecord;
use crate::taxonomy::Taxonomy;

/// An entry of the homepage category strip.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeCategory {
    /// Backend identifier; negative when there was none to use (the entry was
    /// synthesized from the canonical taxonomy or the record lacked an id).
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub parent_slug: Option<String>,
}

fn sentinel_id(position: usize) -> i64 {
    -(position as i64) - 1
}

fn canonical_home(taxonomy: &Taxonomy, limit: usize) -> Vec<HomeCategory> {
    taxonomy
        .roots()
        .iter()
        .take(limit)
        .enumerate()
        .map(|(position, root)| HomeCategory {
            id: sentinel_id(position),
            name: root.name.clone(),
            slug: root.slug.clone(),
            parent_slug: None,
        })
        .collect()
}

/// Pick the top-level categories for the homepage strip.
///
/// Live entries are limited to top-level ones that aren't explicitly
/// inactive, deduplicated by slug (first wins), then ordered with canonical
/// roots first in canonical order followed by anything else alphabetically.
/// When the backend gave us nothing usable the strip is built straight from
/// the canonical roots.  `limit` defaults to the taxonomy's home limit and is
/// never less than one.
pub fn select_home(
    taxonomy: &Taxonomy,
    categories: Option<&[CategoryRecord]>,
    limit: Option<usize>,
) -> Vec<HomeCategory> {
    let limit = limit.unwrap_or_else(|| taxonomy.home_limit()).max(1);

    let live: Vec<(&str, &CategoryRecord)> = categories
        .unwrap_or(&[])
        .iter()
        .filter(|record| record.is_top_level() && !record.is_inactive())
        .filter_map(|record| record.slug().map(|slug| (slug, record)))
        .unique_by(|(slug, _)| *slug)
        .collect();

    if live.is_empty() {
        debug!("no live top-level categories; using canonical roots for the home strip");
        return canonical_home(taxonomy, limit);
    }

    let by_slug: HashMap<&str, &CategoryRecord> = live.iter().copied().collect();

    // (slug, name, backend id)
    let mut picked: Vec<(&str, &str, Option<i64>)> = Vec::with_capacity(live.len());
    for root in taxonomy.roots() {
        if let Some(record) = by_slug.get(root.slug.as_str()) {
            let name = record.name().unwrap_or(root.name.as_str());
            picked.push((root.slug.as_str(), name, record.id));
        }
    }

    let extras = live
        .iter()
        .filter(|(slug, _)| !taxonomy.is_root(slug))
        .map(|&(slug, record)| {
            let name = record
                .name()
                .or_else(|| taxonomy.descriptor(slug).map(|d| d.name.as_str()))
                .unwrap_or(slug);
            (slug, name, record.id)
        })
        .sorted_by(|a, b| natural_lexical_cmp(a.1, b.1).then_with(|| a.0.cmp(b.0)));
    picked.extend(extras);

    picked
        .into_iter()
        .take(limit)
        .enumerate()
        .map(|(position, (slug, name, id))| HomeCategory {
            id: id.unwrap_or_else(|| sentinel_id(position)),
            name: name.to_string(),
            slug: slug.to_string(),
            parent_slug: None,
        })
        .collect()
}
