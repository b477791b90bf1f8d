mod render;
mod substitute;

use anyhow::{Context, Result};
use cfgmodel::{CompositeModel, CompositeSummary, Descriptor, Model};
use cfgmodel_property::{
    CompoundPropertyResolver, EnvPropertyResolver, MapPropertyResolver, PropertyResolver,
};
use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Inspect the services and references a composite exposes
#[derive(Parser, Debug)]
#[command(name = "cfgmodel-inspect")]
#[command(version)]
#[command(about = "Print the services and references a composite exposes", long_about = None)]
struct Args {
    /// Path to the composite XML document
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// TOML descriptor to use instead of the built-in SCA vocabulary
    #[arg(long, value_name = "FILE")]
    descriptor: Option<PathBuf>,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,

    /// Substitute ${key} tokens in attributes and text before summarizing
    #[arg(long)]
    resolve: bool,

    /// Property used by --resolve; takes precedence over composite properties
    /// and the environment
    #[arg(long = "property", value_name = "KEY=VALUE", value_parser = parse_property)]
    properties: Vec<(String, String)>,
}

fn parse_property(arg: &str) -> std::result::Result<(String, String), String> {
    match arg.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got '{}'", arg)),
    }
}

fn main() {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cfgmodel=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = Args::parse();

    let descriptor = match &args.descriptor {
        Some(path) => load_descriptor(path)?,
        None => Descriptor::sca(),
    };

    let content = fs::read_to_string(&args.input)
        .with_context(|| format!("Failed to read input file: {}", args.input.display()))?;
    let composite = CompositeModel::parse(&content, Arc::new(descriptor))
        .with_context(|| format!("Failed to load composite from {}", args.input.display()))?;

    if args.resolve {
        let resolver = build_resolver(&composite, &args.properties)?;
        let replaced = substitute::substitute_tree(composite.base().node(), resolver.as_ref());
        tracing::info!(replaced, "Substituted property tokens");
    }

    let summary =
        CompositeSummary::from_model(&composite).context("Failed to summarize composite")?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print!("{}", render::render_text(&summary));
    }
    Ok(())
}

fn load_descriptor(path: &Path) -> Result<Descriptor> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read descriptor file: {}", path.display()))?;
    let descriptor = Descriptor::from_toml_str(&content)
        .with_context(|| format!("Failed to load descriptor from {}", path.display()))?;
    tracing::debug!(path = %path.display(), "Loaded descriptor");
    Ok(descriptor)
}

/// Command-line properties, then the composite's own properties, then the environment.
fn build_resolver(
    composite: &CompositeModel,
    properties: &[(String, String)],
) -> Result<Arc<dyn PropertyResolver>> {
    let overrides: MapPropertyResolver = properties.iter().cloned().collect();
    let defaults = composite
        .property_resolver()
        .context("Failed to read composite properties")?;

    let sources: [Arc<dyn PropertyResolver>; 3] = [
        Arc::new(overrides),
        Arc::new(defaults),
        Arc::new(EnvPropertyResolver::new()),
    ];
    Ok(CompoundPropertyResolver::compact(sources))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_property() {
        assert_eq!(
            parse_property("port=9090").unwrap(),
            ("port".to_string(), "9090".to_string())
        );
        assert_eq!(
            parse_property("url=a=b").unwrap(),
            ("url".to_string(), "a=b".to_string())
        );
        assert!(parse_property("=x").is_err());
        assert!(parse_property("novalue").is_err());
    }

    #[test]
    fn test_cli_properties_take_precedence() {
        let composite = CompositeModel::parse(
            r#"<composite><property name="port" value="8080"/><property name="host" value="h"/></composite>"#,
            Arc::new(Descriptor::sca()),
        )
        .unwrap();
        let resolver =
            build_resolver(&composite, &[("port".to_string(), "9090".to_string())]).unwrap();
        assert_eq!(resolver.resolve_property("port").as_deref(), Some("9090"));
        assert_eq!(resolver.resolve_property("host").as_deref(), Some("h"));
    }

    #[test]
    fn test_args_parse() {
        let args = Args::try_parse_from([
            "cfgmodel-inspect",
            "app.xml",
            "--json",
            "--resolve",
            "--property",
            "a=1",
            "--property",
            "b=2",
        ])
        .unwrap();
        assert!(args.json && args.resolve);
        assert_eq!(args.properties.len(), 2);
        assert!(args.descriptor.is_none());
    }
}
