extern crate itertools;
#[macro_use]
extern crate lazy_static;
extern crate lexical_sort;
extern crate serde;
extern crate serde_json;
extern crate toml;
#[macro_use]
extern crate tracing;
extern crate tracing_subscriber;

pub mod error;
pub mod home;
pub mod logging;
pub mod meta;
pub mod nav_tree;
pub mod ordering;
pub mod records;
pub mod resolve;
pub mod taxonomy;

pub use error::{Result, TaxonomyError};
pub use home::{select_home, HomeCategory};
pub use meta::{resolve_meta, CategoryMeta, CategoryRef};
pub use nav_tree::{build_nav_tree, NavNode};
pub use ordering::sort_nav_nodes;
pub use records::CategoryRecord;
pub use resolve::{resolve_slug, slugify, ResolvedSlug};
pub use taxonomy::{Crumb, LegacyMap, Taxonomy, TaxonomyConfig, TopicDescriptor, TopicNode};
