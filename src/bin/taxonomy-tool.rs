use std::path::PathBuf;
use std::process::exit;

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use serde_json::{to_string, to_string_pretty};
use tracing::error;

use category_taxonomy::{
    build_nav_tree, logging::init_logging, records::load_records, resolve_meta,
    resolve_slug, select_home, CategoryRecord, CategoryRef, Result, Taxonomy,
};

#[derive(Clone, Debug, PartialEq, ValueEnum)]
enum OutputFormat {
    /// Pretty-printed JSON.
    Pretty,
    /// Un-pretty-printed JSON.
    Concise,
}

/// Inspect how the category taxonomy resolves slugs, references, and backend
/// category lists.
#[derive(Debug, Parser)]
#[clap(name = "taxonomy-tool", version)]
struct ToolOpts {
    /// TOML taxonomy definition to use instead of the built-in one.
    #[clap(long, value_parser, env = "TAXONOMY_CONFIG")]
    taxonomy: Option<PathBuf>,

    #[clap(long, short, value_enum, default_value = "pretty")]
    output_format: OutputFormat,

    #[clap(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Resolve a single slug, following legacy mappings.
    Resolve(ResolveArgs),
    /// Resolve the category metadata of a content item.
    Meta(MetaArgs),
    /// Build the navigation tree from a backend category list.
    Nav(InputArgs),
    /// Pick the homepage category strip from a backend category list.
    Home(HomeArgs),
    /// Print the taxonomy as TOML.
    DumpTaxonomy,
}

#[derive(Debug, Args)]
struct ResolveArgs {
    #[clap(value_parser)]
    slug: String,
}

#[derive(Debug, Args)]
struct MetaArgs {
    #[clap(long, value_parser)]
    slug: Option<String>,
    #[clap(long, value_parser)]
    name: Option<String>,
    #[clap(long, value_parser)]
    parent_slug: Option<String>,
}

#[derive(Debug, Args)]
struct InputArgs {
    /// JSON file holding the category list, either a bare array or wrapped
    /// in `{"data": [...]}`.  Use `-` for stdin.  Omit to exercise the
    /// no-data fallback.
    #[clap(long, short, value_parser)]
    input: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct HomeArgs {
    #[clap(flatten)]
    input: InputArgs,

    /// Maximum number of entries; defaults to the taxonomy's home limit.
    #[clap(long, short, value_parser)]
    limit: Option<usize>,
}

fn read_input(input: &InputArgs) -> Option<Vec<CategoryRecord>> {
    load_records(input.input.as_ref()?)
}

fn print_json<T: Serialize>(value: &T, format: &OutputFormat) -> Result<()> {
    let rendered = match format {
        OutputFormat::Pretty => to_string_pretty(value)?,
        OutputFormat::Concise => to_string(value)?,
    };
    println!("{}", rendered);
    Ok(())
}

fn run(opts: ToolOpts) -> Result<()> {
    let loaded;
    let taxonomy = match &opts.taxonomy {
        Some(path) => {
            loaded = Taxonomy::from_toml_file(path)?;
            &loaded
        }
        None => Taxonomy::builtin(),
    };

    match opts.cmd {
        Command::Resolve(args) => {
            let resolved = resolve_slug(taxonomy, &args.slug);
            print_json(
                &serde_json::json!({ "slug": resolved.slug, "isLegacy": resolved.is_legacy }),
                &opts.output_format,
            )
        }
        Command::Meta(args) => {
            let reference = CategoryRef {
                slug: args.slug,
                name: args.name,
                parent_slug: args.parent_slug,
            };
            let meta = resolve_meta(taxonomy, Some(&reference));
            let breadcrumb = meta.breadcrumb(taxonomy);
            print_json(
                &serde_json::json!({ "meta": meta, "breadcrumb": breadcrumb }),
                &opts.output_format,
            )
        }
        Command::Nav(args) => {
            let records = read_input(&args);
            let tree = build_nav_tree(taxonomy, records.as_deref());
            print_json(&tree, &opts.output_format)
        }
        Command::Home(args) => {
            let records = read_input(&args.input);
            let home = select_home(taxonomy, records.as_deref(), args.limit);
            print_json(&home, &opts.output_format)
        }
        Command::DumpTaxonomy => {
            print!("{}", taxonomy.to_config().to_toml_string()?);
            Ok(())
        }
    }
}

fn main() {
    init_logging();

    let opts = ToolOpts::parse();
    if let Err(err) = run(opts) {
        error!("{}", err);
        eprintln!("taxonomy-tool: {}", err);
        exit(1);
    }
}
