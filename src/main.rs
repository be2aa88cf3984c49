//! Command-line inspector for resolving Vite entries the way a page render would.

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use vite_assets::{AssetResolver, Attributes, BuildMode, SiteLayout, StrictnessPolicy};

#[derive(Debug, Parser)]
#[command(name = "vite-assets", version, about = "Resolve Vite manifest entries into tags")]
struct Cli {
  /// Public web root.
  #[arg(long, global = true, default_value = ".")]
  index: PathBuf,

  /// Project root for public folder setups.
  #[arg(long, global = true)]
  base: Option<PathBuf>,

  /// Directory holding `vite.config.json`.
  #[arg(long, global = true)]
  config_dir: Option<PathBuf>,

  /// Fail on missing manifests and entries, like a site in debug mode.
  #[arg(long, global = true)]
  strict: bool,

  #[command(subcommand)]
  command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
  /// Print script tags, one call per entry in order.
  Script {
    #[command(flatten)]
    lookup: Lookup,
    /// Extra attribute as `name=value`, or `name` for a boolean attribute.
    #[arg(long = "attr", value_name = "NAME[=VALUE]")]
    attrs: Vec<String>,
  },
  /// Print stylesheet tags, one call per entry in order.
  Style {
    #[command(flatten)]
    lookup: Lookup,
  },
  /// Print the URL of a single entry.
  File {
    entry: String,
    #[arg(long)]
    allow_missing: bool,
  },
  /// Print whether the dev server or the manifest is in use.
  Mode,
  /// List manifest entries in manifest order.
  Entries,
}

#[derive(Debug, Args)]
struct Lookup {
  #[arg(required = true)]
  entries: Vec<String>,
  /// Return nothing instead of failing for unknown entries.
  #[arg(long)]
  allow_missing: bool,
}

fn main() -> Result<()> {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .with_target(false)
    .init();

  let cli = Cli::parse();
  let mut layout = match &cli.base {
    Some(base) => SiteLayout::split(&cli.index, base),
    None => SiteLayout::new(&cli.index),
  };
  if let Some(config_dir) = &cli.config_dir {
    layout = layout.with_config_root(config_dir);
  }

  let mut resolver =
    AssetResolver::new(layout).with_policy(StrictnessPolicy::from_debug(cli.strict));

  match cli.command {
    Command::Script { lookup, attrs } => {
      let attributes = parse_attributes(&attrs)?;
      for entry in &lookup.entries {
        let markup = resolver
          .script(entry, &attributes, lookup.allow_missing)
          .with_context(|| format!("failed to resolve script `{entry}`"))?;
        print_markup(markup);
      }
    }
    Command::Style { lookup } => {
      for entry in &lookup.entries {
        let markup = resolver
          .style(entry, &Attributes::new(), lookup.allow_missing)
          .with_context(|| format!("failed to resolve style `{entry}`"))?;
        print_markup(markup);
      }
    }
    Command::File {
      entry,
      allow_missing,
    } => {
      let url = resolver
        .file(&entry, allow_missing)
        .with_context(|| format!("failed to resolve `{entry}`"))?;
      print_markup(url);
    }
    Command::Mode => match resolver.mode()? {
      BuildMode::Dev { origin } => println!("dev {origin}"),
      BuildMode::Production => {
        let out_dir = resolver.relative_out_dir()?;
        println!("production /{out_dir}");
      }
    },
    Command::Entries => {
      for entry in resolver.entries().context("failed to load manifest")? {
        println!("{entry}");
      }
    }
  }

  Ok(())
}

fn print_markup(markup: Option<String>) {
  if let Some(markup) = markup {
    println!("{markup}");
  }
}

fn parse_attributes(raw: &[String]) -> Result<Attributes> {
  let mut attributes = Attributes::new();
  for value in raw {
    match value.split_once('=') {
      Some(("", _)) => return Err(anyhow!("attribute name missing in `{value}`")),
      Some((name, text)) => attributes.insert(name, text),
      None if value.is_empty() => return Err(anyhow!("empty attribute")),
      None => attributes.insert(value.as_str(), vite_assets::AttrValue::Flag),
    }
  }
  Ok(attributes)
}
