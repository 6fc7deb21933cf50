use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use super::diagnostics::{
    Diagnostic, Error, LoadError, MergeConflictLocation, MergeError, SourceInfo, Warning,
};
use super::LogLevel;

#[derive(Debug, Default, Deserialize)]
pub struct PartialConfig {
    #[serde(default)]
    pub imports: Vec<String>,

    pub logging: Option<PartialLoggingConfig>,
    pub server: Option<PartialServerConfig>,
    pub scoring: Option<PartialScoringConfig>,
    pub ingest: Option<PartialIngestConfig>,

    /// Source information for error reporting (not serialized)
    #[serde(skip)]
    pub source: Option<SourceInfo>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PartialLoggingConfig {
    pub level: Option<toml::Spanned<LogLevel>>,
    pub overrides: Option<HashMap<String, toml::Spanned<LogLevel>>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PartialServerConfig {
    pub listen: Option<toml::Spanned<String>>,
    pub port: Option<toml::Spanned<u16>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PartialScoringConfig {
    pub mandatory_weight: Option<toml::Spanned<f64>>,
    pub optional_weight: Option<toml::Spanned<f64>>,
    pub client_bonus_per_cluster: Option<toml::Spanned<f64>>,
    pub client_bonus_max: Option<toml::Spanned<f64>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PartialIngestConfig {
    pub mqtt: Option<PartialMqttConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PartialMqttConfig {
    pub broker: Option<String>,
    pub port: Option<u16>,
    pub client_id: Option<String>,
    pub topic_prefix: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

/// First-wins bookkeeping for every mergeable field.
#[derive(Default)]
struct FieldLocations {
    logging_level: Option<MergeConflictLocation>,
    logging_overrides: HashMap<String, MergeConflictLocation>,
    server_listen: Option<MergeConflictLocation>,
    server_port: Option<MergeConflictLocation>,
    scoring_mandatory_weight: Option<MergeConflictLocation>,
    scoring_optional_weight: Option<MergeConflictLocation>,
    scoring_client_bonus_per_cluster: Option<MergeConflictLocation>,
    scoring_client_bonus_max: Option<MergeConflictLocation>,
    ingest_mqtt: Option<MergeConflictLocation>,
}

impl PartialConfig {
    /// Load a single config file without processing imports
    pub fn from_file(path: &Path) -> Result<Self, LoadError> {
        let content = std::fs::read_to_string(path).map_err(|e| LoadError::Io {
            path: path.to_path_buf(),
            error: e,
        })?;

        let mut config: PartialConfig = toml::from_str(&content).map_err(|e| LoadError::Parse {
            path: path.to_path_buf(),
            error: e,
        })?;

        config.source = Some(SourceInfo {
            file_path: path.to_path_buf(),
            content,
        });

        Ok(config)
    }

    /// Load config files with import resolution
    ///
    /// Each config file is loaded, then its imports are recursively
    /// processed, depth-first, with cycle detection. Returns all loaded
    /// configs in order (imports first, then parent).
    pub fn load_with_imports(paths: &[PathBuf]) -> Result<Vec<Self>, LoadError> {
        let mut visited = HashSet::new();
        let mut all_configs = Vec::new();

        for path in paths {
            Self::load_recursive(path, &mut visited, &mut all_configs)?;
        }

        Ok(all_configs)
    }

    fn load_recursive(
        path: &Path,
        visited: &mut HashSet<PathBuf>,
        configs: &mut Vec<Self>,
    ) -> Result<(), LoadError> {
        // Canonicalize the path to detect cycles reliably
        let canonical_path = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());

        if visited.contains(&canonical_path) {
            return Err(LoadError::ImportCycle {
                path: canonical_path.clone(),
                cycle: visited.iter().cloned().collect(),
            });
        }

        visited.insert(canonical_path.clone());

        let config = Self::from_file(path)?;

        for import_path in &config.imports {
            let import_path_buf = PathBuf::from(import_path);

            // Resolve relative imports from the parent file's directory
            let resolved_path = if import_path_buf.is_absolute() {
                import_path_buf
            } else {
                let parent_dir = path.parent().unwrap_or_else(|| Path::new("."));
                parent_dir.join(import_path_buf)
            };

            Self::load_recursive(&resolved_path, visited, configs)?;
        }

        configs.push(config);

        // Remove from visited set to allow imports from sibling branches
        visited.remove(&canonical_path);

        Ok(())
    }

    /// Merge multiple partial configs together
    ///
    /// Uses first-wins semantics: the first occurrence of a field is kept.
    /// Conflicts are collected as errors but merging continues so every
    /// conflict is reported at once, compiler-style.
    ///
    /// Returns (merged, diagnostics) where diagnostics may contain warnings
    /// and errors.
    pub fn merge<I>(configs: I) -> (Self, Vec<Diagnostic>)
    where
        I: IntoIterator<Item = Self>,
    {
        let mut result = PartialConfig::default();
        let mut diagnostics = Vec::new();
        let mut imports = Vec::new();
        let mut locations = FieldLocations::default();

        for config in configs {
            imports.extend(config.imports.clone());

            let source = config.source.as_ref().cloned().unwrap_or_else(|| SourceInfo {
                file_path: PathBuf::from("<unknown>"),
                content: String::new(),
            });

            let is_empty = config.logging.is_none()
                && config.server.is_none()
                && config.scoring.is_none()
                && config.ingest.is_none()
                && config.imports.is_empty();

            if is_empty {
                diagnostics.push(Diagnostic::Warning(Warning::EmptyConfig {
                    file_path: source.file_path.clone(),
                }));
            }

            if let Some(logging) = config.logging {
                let slot = result.logging.get_or_insert_with(Default::default);
                merge_scalar(
                    &mut slot.level,
                    logging.level,
                    &mut locations.logging_level,
                    "logging.level",
                    &source,
                    &mut diagnostics,
                );

                if let Some(overrides) = logging.overrides {
                    let merged = slot.overrides.get_or_insert_with(HashMap::new);
                    for (key, value) in overrides {
                        let conflict = conflict_location(&source, value.span());
                        if let Some(prev) = locations.logging_overrides.get(&key) {
                            diagnostics.push(merge_conflict(
                                &format!("logging.overrides.{}", key),
                                prev.clone(),
                                conflict,
                            ));
                        } else {
                            merged.insert(key.clone(), value);
                            locations.logging_overrides.insert(key, conflict);
                        }
                    }
                }
            }

            if let Some(server) = config.server {
                let slot = result.server.get_or_insert_with(Default::default);
                merge_scalar(
                    &mut slot.listen,
                    server.listen,
                    &mut locations.server_listen,
                    "server.listen",
                    &source,
                    &mut diagnostics,
                );
                merge_scalar(
                    &mut slot.port,
                    server.port,
                    &mut locations.server_port,
                    "server.port",
                    &source,
                    &mut diagnostics,
                );
            }

            if let Some(scoring) = config.scoring {
                let slot = result.scoring.get_or_insert_with(Default::default);
                merge_scalar(
                    &mut slot.mandatory_weight,
                    scoring.mandatory_weight,
                    &mut locations.scoring_mandatory_weight,
                    "scoring.mandatory_weight",
                    &source,
                    &mut diagnostics,
                );
                merge_scalar(
                    &mut slot.optional_weight,
                    scoring.optional_weight,
                    &mut locations.scoring_optional_weight,
                    "scoring.optional_weight",
                    &source,
                    &mut diagnostics,
                );
                merge_scalar(
                    &mut slot.client_bonus_per_cluster,
                    scoring.client_bonus_per_cluster,
                    &mut locations.scoring_client_bonus_per_cluster,
                    "scoring.client_bonus_per_cluster",
                    &source,
                    &mut diagnostics,
                );
                merge_scalar(
                    &mut slot.client_bonus_max,
                    scoring.client_bonus_max,
                    &mut locations.scoring_client_bonus_max,
                    "scoring.client_bonus_max",
                    &source,
                    &mut diagnostics,
                );
            }

            // The mqtt section merges as one unit: either file may define
            // it, both defining it is a conflict.
            if let Some(ingest) = config.ingest {
                if let Some(mqtt) = ingest.mqtt {
                    let header = "[ingest.mqtt]";
                    let span = source
                        .content
                        .find(header)
                        .map(|start| start..(start + header.len()))
                        .unwrap_or(0..0);
                    let conflict = conflict_location(&source, span);

                    if let Some(prev) = locations.ingest_mqtt.as_ref() {
                        diagnostics.push(merge_conflict(
                            "ingest.mqtt",
                            prev.clone(),
                            conflict,
                        ));
                    } else {
                        result.ingest = Some(PartialIngestConfig { mqtt: Some(mqtt) });
                        locations.ingest_mqtt = Some(conflict);
                    }
                } else if result.ingest.is_none() {
                    result.ingest = Some(PartialIngestConfig { mqtt: None });
                }
            }
        }

        result.imports = imports;

        (result, diagnostics)
    }
}

fn conflict_location(source: &SourceInfo, span: std::ops::Range<usize>) -> MergeConflictLocation {
    MergeConflictLocation {
        file_path: source.file_path.clone(),
        span,
        content: source.content.clone(),
    }
}

fn merge_conflict(
    field_path: &str,
    first: MergeConflictLocation,
    second: MergeConflictLocation,
) -> Diagnostic {
    Diagnostic::Error(Error::Merge(MergeError {
        field_path: field_path.to_string(),
        message: format!("'{}' defined in multiple config files", field_path),
        conflicts: vec![first, second],
    }))
}

/// First-wins merge of one spanned scalar field, recording a conflict when a
/// later file redefines it.
fn merge_scalar<T>(
    slot: &mut Option<toml::Spanned<T>>,
    incoming: Option<toml::Spanned<T>>,
    first_location: &mut Option<MergeConflictLocation>,
    field_path: &str,
    source: &SourceInfo,
    diagnostics: &mut Vec<Diagnostic>,
) {
    let Some(value) = incoming else {
        return;
    };
    let conflict = conflict_location(source, value.span());

    if let Some(prev) = first_location.as_ref() {
        diagnostics.push(merge_conflict(field_path, prev.clone(), conflict));
    } else {
        *slot = Some(value);
        *first_location = Some(conflict);
    }
}
