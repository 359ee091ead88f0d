//! The publication's built-in topic tree and legacy slug table.

use super::config::TaxonomyConfig;
use super::TopicNode;

/// Root used for content that carries no usable category.
pub const DEFAULT_SLUG: &str = "trending";

/// Number of categories shown on the homepage strip by default.
pub const DEFAULT_HOME_LIMIT: usize = 8;

/// Compile-time shape of a topic; turned into owned `TopicNode`s once.
pub struct TopicSeed {
    pub slug: &'static str,
    pub name: &'static str,
    pub children: &'static [TopicSeed],
}

macro_rules! topic {
    ($slug:expr, $name:expr) => {
        TopicSeed {
            slug: $slug,
            name: $name,
            children: &[],
        }
    };
    ($slug:expr, $name:expr, [$($child:expr),* $(,)?]) => {
        TopicSeed {
            slug: $slug,
            name: $name,
            children: &[$($child),*],
        }
    };
}

/// Display order here is the canonical sibling order.
pub static CANONICAL_TOPICS: &[TopicSeed] = &[
    topic!("trending", "Trending", [
        topic!("breaking-news", "Breaking News"),
        topic!("most-read", "Most Read"),
    ]),
    topic!("global", "Global", [
        topic!("south-asia", "South Asia", [
            topic!("bangladesh", "Bangladesh"),
            topic!("india", "India"),
            topic!("pakistan", "Pakistan"),
        ]),
        topic!("middle-east", "Middle East"),
        topic!("europe", "Europe"),
        topic!("americas", "Americas", [topic!("usa", "USA")]),
        topic!("africa", "Africa"),
    ]),
    topic!("politics", "Politics", [
        topic!("elections", "Elections"),
        topic!("governance", "Governance"),
        topic!("diplomacy", "Diplomacy"),
    ]),
    topic!("business", "Business", [
        topic!("economy", "Economy"),
        topic!("markets", "Markets", [
            topic!("stocks", "Stocks"),
            topic!("crypto", "Crypto"),
        ]),
        topic!("startups", "Startups"),
        topic!("banking", "Banking"),
    ]),
    topic!("tech", "Tech", [
        topic!("gadgets", "Gadgets"),
        topic!("software", "Software"),
        topic!("cybersecurity", "Cybersecurity"),
        topic!("science", "Science"),
    ]),
    topic!("sports", "Sports", [
        topic!("cricket", "Cricket"),
        topic!("football", "Football"),
        topic!("tennis", "Tennis"),
        topic!("other-sports", "Other Sports"),
    ]),
    topic!("entertainment", "Entertainment", [
        topic!("movies", "Movies"),
        topic!("music", "Music"),
        topic!("television", "Television"),
        topic!("celebrity", "Celebrity"),
    ]),
    topic!("lifestyle", "Lifestyle", [
        topic!("health", "Health"),
        topic!("food", "Food"),
        topic!("travel", "Travel"),
        topic!("fashion", "Fashion"),
    ]),
    topic!("opinion", "Opinion", [
        topic!("editorial", "Editorial"),
        topic!("columns", "Columns"),
        topic!("letters", "Letters"),
    ]),
];

/// Slugs that were renamed or folded into another section.  Targets are
/// always canonical; there are no chains.
pub static LEGACY_SLUGS: &[(&str, &str)] = &[
    ("ai", "tech"),
    ("artificial-intelligence", "tech"),
    ("technology", "tech"),
    ("sci-tech", "tech"),
    ("world", "global"),
    ("international", "global"),
    ("asia", "south-asia"),
    ("united-states", "usa"),
    ("national", "bangladesh"),
    ("election", "elections"),
    ("economics", "economy"),
    ("finance", "business"),
    ("stock-market", "stocks"),
    ("cryptocurrency", "crypto"),
    ("soccer", "football"),
    ("film", "movies"),
    ("cinema", "movies"),
    ("tv", "television"),
    ("showbiz", "entertainment"),
    ("wellness", "health"),
    ("recipes", "food"),
    ("op-ed", "opinion"),
    ("views", "opinion"),
    ("latest", "trending"),
    ("viral", "trending"),
    ("top-stories", "trending"),
];

impl TopicSeed {
    fn to_node(&self) -> TopicNode {
        TopicNode {
            slug: self.slug.to_string(),
            name: self.name.to_string(),
            children: self.children.iter().map(TopicSeed::to_node).collect(),
        }
    }
}

pub fn builtin_config() -> TaxonomyConfig {
    TaxonomyConfig {
        default_slug: DEFAULT_SLUG.to_string(),
        home_limit: DEFAULT_HOME_LIMIT,
        topics: CANONICAL_TOPICS.iter().map(TopicSeed::to_node).collect(),
        legacy: LEGACY_SLUGS
            .iter()
            .map(|(legacy, target)| (legacy.to_string(), target.to_string()))
            .collect(),
    }
}
