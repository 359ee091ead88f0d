use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use super::canonical::{DEFAULT_HOME_LIMIT, DEFAULT_SLUG};
use super::TopicNode;
use crate::error::{Result, TaxonomyError};

/// Schema for a taxonomy definition file, e.g.:
///
/// ```toml
/// default_slug = "trending"
/// home_limit = 8
///
/// [[topic]]
/// slug = "tech"
/// name = "Tech"
///
///   [[topic.children]]
///   slug = "gadgets"
///   name = "Gadgets"
///
/// [legacy]
/// ai = "tech"
/// ```
///
/// Topics are listed in display order; that order becomes the canonical
/// sibling order used when sorting navigation trees.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TaxonomyConfig {
    /// Slug used when a content item carries no usable category at all.  Must
    /// be a root topic.
    #[serde(default = "default_slug")]
    pub default_slug: String,
    /// How many entries the homepage strip shows when the caller doesn't say.
    #[serde(default = "default_home_limit")]
    pub home_limit: usize,
    #[serde(default, rename = "topic")]
    pub topics: Vec<TopicNode>,
    /// Deprecated slug => current canonical slug.
    #[serde(default)]
    pub legacy: BTreeMap<String, String>,
}

fn default_slug() -> String {
    DEFAULT_SLUG.to_string()
}

fn default_home_limit() -> usize {
    DEFAULT_HOME_LIMIT
}

impl TaxonomyConfig {
    pub fn from_toml_str(config_str: &str) -> Result<TaxonomyConfig> {
        Ok(toml::from_str(config_str)?)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check the structural invariants the resolvers rely on: globally unique
    /// lowercase-hyphenated slugs, legacy targets that are canonical (so there
    /// are no legacy chains), and a default slug that names a root.
    pub fn validate(&self) -> Result<()> {
        if self.topics.is_empty() {
            return Err(TaxonomyError::EmptyTaxonomy);
        }

        let mut seen = HashSet::new();
        let mut pending: Vec<&TopicNode> = self.topics.iter().rev().collect();
        while let Some(node) = pending.pop() {
            if node.slug.is_empty() {
                return Err(TaxonomyError::EmptySlug(node.name.clone()));
            }
            if !is_slug_shaped(&node.slug) {
                return Err(TaxonomyError::InvalidSlug(node.slug.clone()));
            }
            if !seen.insert(node.slug.as_str()) {
                return Err(TaxonomyError::DuplicateSlug(node.slug.clone()));
            }
            pending.extend(node.children.iter().rev());
        }

        for (legacy, target) in &self.legacy {
            if seen.contains(legacy.to_lowercase().as_str()) {
                return Err(TaxonomyError::LegacyShadowsCanonical(legacy.clone()));
            }
            if !seen.contains(target.as_str()) {
                return Err(TaxonomyError::LegacyTargetUnknown {
                    legacy: legacy.clone(),
                    target: target.clone(),
                });
            }
        }

        if !self.topics.iter().any(|root| root.slug == self.default_slug) {
            return Err(TaxonomyError::DefaultSlugNotRoot(self.default_slug.clone()));
        }

        Ok(())
    }
}

fn is_slug_shaped(slug: &str) -> bool {
    !slug.starts_with('-')
        && !slug.ends_with('-')
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}
