use anyhow::{anyhow, Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use metagraph_graph::SchemaModel;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_ENV: &str = "METAGRAPH_CONFIG";
pub const SCHEMA_ENV: &str = "METAGRAPH_SCHEMA";
pub const DEFAULT_CONFIG_FILE: &str = "metagraph.toml";
pub const DEFAULT_DATABASE_LABEL: &str = "Northwind";

/// `metagraph.toml` as written on disk
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    schema: Option<PathBuf>,
    database_label: Option<String>,
    #[serde(default)]
    exclude_tables: Vec<String>,
}

/// Values given on the command line, highest precedence
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub config: Option<PathBuf>,
    pub schema: Option<PathBuf>,
    pub database_label: Option<String>,
}

/// Effective settings after merging flags, environment and config file
#[derive(Debug, Clone)]
pub struct Settings {
    pub schema: Option<PathBuf>,
    pub database_label: String,
    exclude: GlobSet,
    exclude_patterns: Vec<String>,
}

impl Settings {
    pub fn resolve<E>(overrides: Overrides, env: E) -> Result<Self>
    where
        E: Fn(&str) -> Option<String>,
    {
        let config_path = match overrides.config.or_else(|| env(CONFIG_ENV).map(PathBuf::from)) {
            Some(path) => Some(path),
            None => {
                let fallback = PathBuf::from(DEFAULT_CONFIG_FILE);
                fallback.is_file().then_some(fallback)
            }
        };

        let (file, base_dir) = match &config_path {
            Some(path) => {
                let file = read_config(path)?;
                log::debug!("Loaded config from {}", path.display());
                (file, path.parent().map(Path::to_path_buf))
            }
            None => (FileConfig::default(), None),
        };

        let schema = overrides
            .schema
            .or_else(|| env(SCHEMA_ENV).map(PathBuf::from))
            .or_else(|| {
                file.schema.map(|p| match &base_dir {
                    Some(dir) if p.is_relative() => dir.join(p),
                    _ => p,
                })
            });

        let database_label = overrides
            .database_label
            .or(file.database_label)
            .unwrap_or_else(|| DEFAULT_DATABASE_LABEL.to_string());

        let exclude = build_globset(&file.exclude_tables)?;

        Ok(Self {
            schema,
            database_label,
            exclude,
            exclude_patterns: file.exclude_tables,
        })
    }

    /// Read the schema file and drop excluded tables
    pub fn load_schema(&self) -> Result<SchemaModel> {
        let path = self.schema.as_deref().ok_or_else(|| {
            anyhow!("No schema given: pass --schema, set {SCHEMA_ENV}, or set `schema` in {DEFAULT_CONFIG_FILE}")
        })?;

        let mut schema = SchemaModel::from_path(path)
            .with_context(|| format!("Failed to load schema from {}", path.display()))?;

        if !self.exclude.is_empty() {
            let removed = schema.retain_tables(|name| !self.exclude.is_match(name));
            if removed > 0 {
                log::info!(
                    "Excluded {} tables matching {:?}",
                    removed,
                    self.exclude_patterns
                );
            }
        }

        log::info!(
            "Loaded schema: {} tables, {} columns, {} relationships",
            schema.tables.len(),
            schema.column_count(),
            schema.relationships.len()
        );
        Ok(schema)
    }
}

fn read_config(path: &Path) -> Result<FileConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    toml::from_str(&raw).with_context(|| format!("Invalid config {}", path.display()))
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern)
            .with_context(|| format!("Invalid exclude_tables pattern `{pattern}`"))?;
        builder.add(glob);
    }
    builder.build().context("Failed to compile exclude_tables patterns")
}
