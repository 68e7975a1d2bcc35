//! Logic for finding the schema of a project from its graphql-config file.
//!
//! See <https://the-guild.dev/graphql/config/docs> for the file format. Only the `schema`
//! key is read, at the top level or in the `default` project.

use std::fs;
use std::path::Path;
use std::path::PathBuf;

use displaydoc::Display;
use indexmap::IndexMap;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::introspection;
use crate::introspection::IntrospectionResponse;

/// File names looked up in each directory, first match wins.
pub const CONFIG_FILE_NAMES: [&str; 7] = [
    ".graphqlrc",
    ".graphqlrc.yml",
    ".graphqlrc.yaml",
    ".graphqlrc.json",
    "graphql.config.yml",
    "graphql.config.yaml",
    "graphql.config.json",
];

const DEFAULT_PROJECT: &str = "default";

/// Schema discovery error.
#[derive(Debug, Error, Display)]
#[non_exhaustive]
pub enum ConfigurationError {
    /// no graphql-config file found in {0} or any of its parents
    NotFound(String),
    /// could not read {path}: {error}
    Read { path: String, error: std::io::Error },
    /// could not parse {path}: {error}
    Parse {
        path: String,
        error: serde_yaml::Error,
    },
    /// {0} does not define a schema
    MissingSchema(String),
    /// schema pointer '{0}' is not supported, only local files are
    UnsupportedPointer(String),
    /// {path} is not an introspection result: {error}
    Introspection {
        path: String,
        error: serde_json::Error,
    },
    /// introspection result {0} has no __schema
    EmptyIntrospection(String),
    /// could not build the schema: {0}
    InvalidSdl(String),
}

/// A graphql-config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphQLConfig {
    #[serde(default)]
    pub schema: Option<SchemaPointer>,
    #[serde(default)]
    pub projects: IndexMap<String, ProjectConfig>,
}

/// One project of a multi project graphql-config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub schema: Option<SchemaPointer>,
}

/// Where the schema files are, relative to the configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SchemaPointer {
    One(String),
    Many(Vec<String>),
}

impl SchemaPointer {
    pub fn paths(&self) -> &[String] {
        match self {
            SchemaPointer::One(path) => std::slice::from_ref(path),
            SchemaPointer::Many(paths) => paths,
        }
    }
}

impl GraphQLConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigurationError> {
        let source = fs::read_to_string(path).map_err(|error| ConfigurationError::Read {
            path: path.display().to_string(),
            error,
        })?;
        Self::parse(&source).map_err(|error| ConfigurationError::Parse {
            path: path.display().to_string(),
            error,
        })
    }

    /// Parses YAML, or JSON which is read as YAML.
    pub fn parse(source: &str) -> Result<Self, serde_yaml::Error> {
        if source.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(source)
    }

    /// The top level schema, or the schema of the `default` project.
    pub fn schema_pointer(&self) -> Option<&SchemaPointer> {
        self.schema.as_ref().or_else(|| {
            self.projects
                .get(DEFAULT_PROJECT)
                .and_then(|project| project.schema.as_ref())
        })
    }
}

/// Finds the closest configuration file, looking in `start` then in each of its parents.
pub fn find_config(start: &Path) -> Result<PathBuf, ConfigurationError> {
    start
        .ancestors()
        .flat_map(|dir| CONFIG_FILE_NAMES.iter().map(move |name| dir.join(name)))
        .find(|candidate| candidate.is_file())
        .ok_or_else(|| ConfigurationError::NotFound(start.display().to_string()))
}

/// Loads the schema of the project `start` belongs to.
pub fn discover(start: &Path) -> Result<apollo_compiler::Schema, ConfigurationError> {
    let config_path = find_config(start)?;
    tracing::debug!(config = %config_path.display(), "found graphql-config file");
    let config = GraphQLConfig::from_file(&config_path)?;
    let pointer = config
        .schema_pointer()
        .ok_or_else(|| ConfigurationError::MissingSchema(config_path.display().to_string()))?;
    let base = config_path.parent().unwrap_or_else(|| Path::new("."));
    load_schema(base, pointer.paths())
}

/// Loads a single schema file: an introspection result when its extension is `.json`,
/// schema definition language otherwise.
pub fn schema_from_file(path: &Path) -> Result<apollo_compiler::Schema, ConfigurationError> {
    let base = path.parent().unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    load_schema(base, &[file_name])
}

/// Builds one schema out of every file in `pointers`, resolved against `base`.
fn load_schema(
    base: &Path,
    pointers: &[String],
) -> Result<apollo_compiler::Schema, ConfigurationError> {
    if pointers.is_empty() {
        return Err(ConfigurationError::MissingSchema(base.display().to_string()));
    }
    let mut builder = apollo_compiler::Schema::builder();
    for pointer in pointers {
        if pointer.starts_with("http://") || pointer.starts_with("https://") {
            return Err(ConfigurationError::UnsupportedPointer(pointer.clone()));
        }
        let path = base.join(pointer);
        let source = fs::read_to_string(&path).map_err(|error| ConfigurationError::Read {
            path: path.display().to_string(),
            error,
        })?;
        let sdl = if path.extension().is_some_and(|extension| extension == "json") {
            let response = serde_json::from_str::<IntrospectionResponse>(&source).map_err(
                |error| ConfigurationError::Introspection {
                    path: path.display().to_string(),
                    error,
                },
            )?;
            introspection::to_sdl(&response)
                .ok_or_else(|| ConfigurationError::EmptyIntrospection(path.display().to_string()))?
        } else {
            source
        };
        tracing::trace!(schema = %path.display(), "loading schema file");
        builder = builder.parse(sdl, &path);
    }
    builder
        .build()
        .map_err(|with_errors| ConfigurationError::InvalidSdl(with_errors.errors.to_string()))
}
