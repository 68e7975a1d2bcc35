use std::fs;
use std::io;
use std::path::Path;
use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use fakeql::GenerateOptions;
use fakeql::Resolvers;
use fakeql::SchemaSource;
use fakeql::ValidationRules;
use fakeql::ValueExt;
use fakeql::json_ext::Value;
use tracing_subscriber::EnvFilter;

/// Prints a mock response for a GraphQL operation.
///
/// CLI arguments. See <https://docs.rs/clap/latest/clap/_derive/index.html>
#[derive(Parser)]
#[command(name = "fakeql", version)]
struct Args {
    /// The path to the operation file, or `-` for stdin
    query: PathBuf,

    /// The path to the schema: SDL, or an introspection result with a `.json` extension.
    /// Looked up from the graphql-config file of the current directory when missing.
    #[arg(long, short, env = "FAKEQL_SCHEMA")]
    schema: Option<PathBuf>,

    /// Name of the operation to mock, the first one of the document by default
    #[arg(long, short)]
    operation: Option<String>,

    /// A JSON object of constant values keyed by type name
    #[arg(long, short)]
    resolvers: Option<PathBuf>,

    /// Skip schema and document validation
    #[arg(long)]
    no_validate: bool,

    /// Overwrite part of the mock, as `path/to/0/field=<json>`
    #[arg(long = "set", value_name = "PATH=JSON", value_parser = parse_assignment)]
    assignments: Vec<(fakeql::Path, Value)>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let mut mock = run(&args)?;
    for (path, value) in args.assignments {
        mock.assign(&path, value);
    }
    println!("{}", serde_json::to_string_pretty(&mock)?);
    Ok(())
}

fn run(args: &Args) -> anyhow::Result<Value> {
    let query = read_input(&args.query)?;
    let schema = args
        .schema
        .as_deref()
        .map(|path| {
            fakeql::configuration::schema_from_file(path)
                .map(SchemaSource::Schema)
                .with_context(|| format!("could not load schema {}", path.display()))
        })
        .transpose()?;

    let resolvers = args
        .resolvers
        .as_deref()
        .map(read_resolvers)
        .transpose()?;
    let validation_rules = args.no_validate.then(ValidationRules::none);

    let options = GenerateOptions::builder()
        .and_resolvers(resolvers)
        .and_validation_rules(validation_rules)
        .and_operation_name(args.operation.clone())
        .build();
    tracing::debug!(query = %args.query.display(), "generating mock");
    Ok(fakeql::generate_from_str(&query, schema, options)?)
}

fn read_input(path: &Path) -> anyhow::Result<String> {
    if path == Path::new("-") {
        io::read_to_string(io::stdin()).context("could not read the operation from stdin")
    } else {
        fs::read_to_string(path).with_context(|| format!("could not read {}", path.display()))
    }
}

fn read_resolvers(path: &Path) -> anyhow::Result<Resolvers> {
    let source =
        fs::read_to_string(path).with_context(|| format!("could not read {}", path.display()))?;
    let constants: Value = serde_json::from_str(&source)
        .with_context(|| format!("{} is not valid JSON", path.display()))?;
    match constants {
        Value::Object(constants) => Ok(Resolvers::from_constants(constants)),
        _ => anyhow::bail!("{} must contain a JSON object", path.display()),
    }
}

fn parse_assignment(assignment: &str) -> Result<(fakeql::Path, Value), String> {
    let (path, value) = assignment
        .split_once('=')
        .ok_or_else(|| format!("expected PATH=JSON, got '{assignment}'"))?;
    let path = path.parse::<fakeql::Path>().map_err(|error| error.to_string())?;
    let value = serde_json::from_str(value).map_err(|error| error.to_string())?;
    Ok((path, value))
}

#[cfg(test)]
mod tests {
    use serde_json_bytes::json;

    use super::*;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }

    #[test]
    fn parses_assignments() {
        let (path, value) = parse_assignment("me/friends/0/name=\"Ada\"").unwrap();
        assert_eq!(path.to_string(), "/me/friends/0/name");
        assert_eq!(value, json!("Ada"));
        assert!(parse_assignment("me/name").is_err());
        assert!(parse_assignment("me/name=Ada").is_err());
    }
}
