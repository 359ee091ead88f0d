use std::fmt;

pub type Result<T> = std::result::Result<T, TaxonomyError>;

/// Problems loading or validating a taxonomy definition.
///
/// The resolution functions themselves never produce these; bad category data
/// degrades into a less precise result instead.  Only the configuration
/// boundary (parsing a substitute taxonomy, reading tool input) can fail.
#[derive(Debug, PartialEq)]
pub enum TaxonomyError {
    /// The TOML (or JSON) document couldn't be parsed into the expected shape.
    Parse(String),
    /// Serializing a taxonomy back out failed.
    Serialize(String),
    /// Reading a file failed.
    Io(String),
    /// No root topics were defined.
    EmptyTaxonomy,
    /// A topic has an empty slug.  The payload is the topic's display name.
    EmptySlug(String),
    /// A slug that isn't lowercase-hyphenated.
    InvalidSlug(String),
    /// The same slug appears more than once anywhere in the tree.
    DuplicateSlug(String),
    /// A legacy mapping points at something that isn't a canonical slug.
    LegacyTargetUnknown { legacy: String, target: String },
    /// A legacy key is itself a canonical slug and would never be consulted.
    LegacyShadowsCanonical(String),
    /// The default slug must name a root topic.
    DefaultSlugNotRoot(String),
}

impl fmt::Display for TaxonomyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaxonomyError::Parse(msg) => write!(f, "unable to parse taxonomy: {}", msg),
            TaxonomyError::Serialize(msg) => write!(f, "unable to serialize taxonomy: {}", msg),
            TaxonomyError::Io(msg) => write!(f, "I/O error: {}", msg),
            TaxonomyError::EmptyTaxonomy => write!(f, "taxonomy has no root topics"),
            TaxonomyError::EmptySlug(name) => write!(f, "topic '{}' has an empty slug", name),
            TaxonomyError::InvalidSlug(slug) => {
                write!(f, "slug '{}' is not lowercase-hyphenated", slug)
            }
            TaxonomyError::DuplicateSlug(slug) => write!(f, "slug '{}' appears more than once", slug),
            TaxonomyError::LegacyTargetUnknown { legacy, target } => write!(
                f,
                "legacy slug '{}' maps to '{}' which is not a canonical slug",
                legacy, target
            ),
            TaxonomyError::LegacyShadowsCanonical(slug) => {
                write!(f, "legacy slug '{}' is also a canonical slug", slug)
            }
            TaxonomyError::DefaultSlugNotRoot(slug) => {
                write!(f, "default slug '{}' is not a root topic", slug)
            }
        }
    }
}

impl std::error::Error for TaxonomyError {}

impl From<toml::de::Error> for TaxonomyError {
    fn from(err: toml::de::Error) -> TaxonomyError {
        TaxonomyError::Parse(err.to_string())
    }
}

impl From<toml::ser::Error> for TaxonomyError {
    fn from(err: toml::ser::Error) -> TaxonomyError {
        TaxonomyError::Serialize(err.to_string())
    }
}

impl From<serde_json::Error> for TaxonomyError {
    fn from(err: serde_json::Error) -> TaxonomyError {
        TaxonomyError::Parse(err.to_string())
    }
}

impl From<std::io::Error> for TaxonomyError {
    fn from(err: std::io::Error) -> TaxonomyError {
        TaxonomyError::Io(err.to_string())
    }
}
