//! Resolution pipeline: reads data files, resolves seed keys, builds the
//! catalog and farm config.
//!
//! A data directory holds `seeds.*`, `upgrades.*`, and optionally `farm.*`,
//! each in exactly one of RON, TOML, or JSON.

use serde::de::DeserializeOwned;
use sprout_core::catalog::{Catalog, CatalogBuilder, CatalogError};
use sprout_core::config::{Bounds, ConfigError, FarmConfig};
use sprout_core::farm::Farm;
use sprout_core::id::SeedId;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::schema::{FarmSettingsData, RangeData, SeedData, UpgradeData};

// ===========================================================================
// Errors
// ===========================================================================

/// Errors that can occur during data loading.
#[derive(Debug, thiserror::Error)]
pub enum DataLoadError {
    /// A required data file was not found in the given directory.
    #[error("required file '{base_name}.{{ron,toml,json}}' not found in {dir}")]
    MissingRequired { base_name: String, dir: PathBuf },

    /// The file has an extension we don't support.
    #[error("unsupported format for file: {file}")]
    UnsupportedFormat { file: PathBuf },

    /// Two files with the same base name but different formats exist.
    #[error("conflicting formats: {a} and {b}")]
    ConflictingFormats { a: PathBuf, b: PathBuf },

    /// A deserialization error occurred.
    #[error("parse error in {file}: {detail}")]
    Parse { file: PathBuf, detail: String },

    /// A key reference could not be resolved.
    #[error("unresolved {expected_kind} reference '{name}' in {file}")]
    UnresolvedRef {
        file: PathBuf,
        name: String,
        expected_kind: &'static str,
    },

    /// A duplicate key was found.
    #[error("duplicate key '{name}' in {file}")]
    DuplicateName { file: PathBuf, name: String },

    /// The definitions parsed but do not form a valid catalog.
    #[error("invalid catalog: {0}")]
    Catalog(#[from] CatalogError),

    /// The farm settings parsed but are not playable.
    #[error("invalid farm settings: {0}")]
    Config(#[from] ConfigError),

    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

// ===========================================================================
// Format detection
// ===========================================================================

/// Supported data file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Ron,
    Toml,
    Json,
}

const EXTENSIONS: [(&str, Format); 3] = [
    ("ron", Format::Ron),
    ("toml", Format::Toml),
    ("json", Format::Json),
];

/// Detect the format of a file based on its extension.
pub fn detect_format(path: &Path) -> Result<Format, DataLoadError> {
    let ext = path.extension().and_then(|e| e.to_str());
    EXTENSIONS
        .iter()
        .find(|(e, _)| Some(*e) == ext)
        .map(|&(_, format)| format)
        .ok_or_else(|| DataLoadError::UnsupportedFormat {
            file: path.to_path_buf(),
        })
}

// ===========================================================================
// File discovery
// ===========================================================================

/// Scan `dir` for `{base_name}.ron`, `.toml`, or `.json`.
///
/// Returns `Ok(None)` if none exists, or `Err(ConflictingFormats)` if more
/// than one does.
pub fn find_data_file(dir: &Path, base_name: &str) -> Result<Option<PathBuf>, DataLoadError> {
    let mut found: Option<PathBuf> = None;
    for (ext, _) in EXTENSIONS {
        let candidate = dir.join(format!("{base_name}.{ext}"));
        if !candidate.exists() {
            continue;
        }
        if let Some(existing) = found {
            return Err(DataLoadError::ConflictingFormats {
                a: existing,
                b: candidate,
            });
        }
        found = Some(candidate);
    }
    Ok(found)
}

/// Like [`find_data_file`], but a missing file is an error.
pub fn require_data_file(dir: &Path, base_name: &str) -> Result<PathBuf, DataLoadError> {
    find_data_file(dir, base_name)?.ok_or_else(|| DataLoadError::MissingRequired {
        base_name: base_name.to_string(),
        dir: dir.to_path_buf(),
    })
}

// ===========================================================================
// Deserialization
// ===========================================================================

fn parse_error(path: &Path, e: impl std::fmt::Display) -> DataLoadError {
    DataLoadError::Parse {
        file: path.to_path_buf(),
        detail: e.to_string(),
    }
}

fn parse<T: DeserializeOwned>(format: Format, content: &str, path: &Path) -> Result<T, DataLoadError> {
    match format {
        Format::Ron => ron::from_str(content).map_err(|e| parse_error(path, e)),
        Format::Json => serde_json::from_str(content).map_err(|e| parse_error(path, e)),
        Format::Toml => toml::from_str(content).map_err(|e| parse_error(path, e)),
    }
}

/// Read a file and deserialize it according to its extension.
pub fn deserialize_file<T: DeserializeOwned>(path: &Path) -> Result<T, DataLoadError> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;
    parse(format, &content, path)
}

/// Deserialize a list from a file. TOML has no top-level arrays, so there the
/// list lives under `toml_key` (`seeds = [...]` or `[[seeds]]` tables); RON
/// and JSON files are the list itself.
pub fn deserialize_list<T: DeserializeOwned>(
    path: &Path,
    toml_key: &str,
) -> Result<Vec<T>, DataLoadError> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;
    if format != Format::Toml {
        return parse(format, &content, path);
    }

    let mut table: toml::Table = parse(Format::Toml, &content, path)?;
    let array = table
        .remove(toml_key)
        .ok_or_else(|| parse_error(path, format!("missing key '{toml_key}' in TOML file")))?;
    array
        .try_into()
        .map_err(|e: toml::de::Error| parse_error(path, e))
}

// ===========================================================================
// Key resolution helpers
// ===========================================================================

/// Look up a key in a map, returning an `UnresolvedRef` error if not found.
pub fn resolve_name<'a, V>(
    map: &'a HashMap<String, V>,
    name: &str,
    file: &Path,
    expected_kind: &'static str,
) -> Result<&'a V, DataLoadError> {
    map.get(name).ok_or_else(|| DataLoadError::UnresolvedRef {
        file: file.to_path_buf(),
        name: name.to_string(),
        expected_kind,
    })
}

/// Fail with `DuplicateName` on the first key that repeats.
pub fn check_unique_keys<'a>(
    keys: impl IntoIterator<Item = &'a str>,
    file: &Path,
) -> Result<(), DataLoadError> {
    let mut seen = HashSet::new();
    for key in keys {
        if !seen.insert(key) {
            return Err(DataLoadError::DuplicateName {
                file: file.to_path_buf(),
                name: key.to_string(),
            });
        }
    }
    Ok(())
}

// ===========================================================================
// Pipeline
// ===========================================================================

/// A resolved catalog plus validated farm config, ready to start farms.
#[derive(Debug, Clone)]
pub struct FarmData {
    pub catalog: Arc<Catalog>,
    pub config: FarmConfig,
}

impl FarmData {
    /// Start a fresh farm from this data.
    pub fn new_farm(&self, seed: u64, now: u64) -> Result<Farm, ConfigError> {
        Farm::new(Arc::clone(&self.catalog), self.config.clone(), seed, now)
    }
}

/// Load `seeds`, `upgrades`, and optional `farm` settings from `dir`.
pub fn load_farm_data(dir: &Path) -> Result<FarmData, DataLoadError> {
    let seeds_path = require_data_file(dir, "seeds")?;
    let seeds: Vec<SeedData> = deserialize_list(&seeds_path, "seeds")?;
    check_unique_keys(seeds.iter().map(|s| s.key.as_str()), &seeds_path)?;

    let upgrades_path = require_data_file(dir, "upgrades")?;
    let upgrades: Vec<UpgradeData> = deserialize_list(&upgrades_path, "upgrades")?;
    check_unique_keys(upgrades.iter().map(|u| u.key.as_str()), &upgrades_path)?;

    let mut builder = CatalogBuilder::new();
    for seed in seeds {
        builder.register_seed(seed.into());
    }
    for upgrade in upgrades {
        builder.register_upgrade(upgrade.into());
    }
    let catalog = builder.build()?;

    let config = match find_data_file(dir, "farm")? {
        Some(path) => {
            let settings: FarmSettingsData = deserialize_file(&path)?;
            resolve_settings(settings, &catalog, &path)?
        }
        None => default_config(&catalog),
    };
    config.validate(&catalog)?;

    tracing::debug!(
        dir = %dir.display(),
        seeds = catalog.seed_count(),
        upgrades = catalog.upgrade_count(),
        grid_size = config.grid_size,
        "farm data loaded"
    );

    Ok(FarmData {
        catalog: Arc::new(catalog),
        config,
    })
}

/// Standard tuning with the first two lowest-tier seeds as priority seeds and
/// the first of them as starter.
fn default_config(catalog: &Catalog) -> FarmConfig {
    let priority: Vec<SeedId> = catalog.lowest_tier_seeds().into_iter().take(2).collect();
    let starter = priority.first().copied().unwrap_or(SeedId(0));
    FarmConfig::with_seeds(priority, starter)
}

fn resolve_settings(
    settings: FarmSettingsData,
    catalog: &Catalog,
    file: &Path,
) -> Result<FarmConfig, DataLoadError> {
    let keys: HashMap<String, SeedId> = catalog
        .seeds()
        .map(|(id, def)| (def.key.clone(), id))
        .collect();
    let resolve = |key: &str| resolve_name(&keys, key, file, "seed").copied();

    let mut config = default_config(catalog);
    if let Some(priority) = &settings.priority_seeds {
        config.restock.priority_seeds = priority
            .iter()
            .map(|k| resolve(k))
            .collect::<Result<_, _>>()?;
        if let Some(&first) = config.restock.priority_seeds.first() {
            config.starter_seed = first;
        }
    }
    if let Some(starter) = &settings.starter_seed {
        config.starter_seed = resolve(starter)?;
    }

    let bounds = |r: RangeData| Bounds::new(r.min, r.max);
    if let Some(r) = settings.extra_types {
        config.restock.extra_types = bounds(r);
    }
    if let Some(r) = settings.quantity {
        config.restock.quantity = bounds(r);
    }
    if let Some(v) = settings.grid_size {
        config.grid_size = v;
    }
    if let Some(v) = settings.restock_interval_ms {
        config.restock_interval_ms = v;
    }
    if let Some(v) = settings.rebirth_base_cost {
        config.rebirth_base_cost = v;
    }
    if let Some(v) = settings.starting_coins {
        config.starting_coins = v;
    }
    if let Some(v) = settings.growth_tick_ms {
        config.growth_tick_ms = v;
    }
    if let Some(v) = settings.restock_check_ms {
        config.restock_check_ms = v;
    }
    if let Some(v) = settings.event_capacity {
        config.event_capacity = v;
    }
    Ok(config)
}

// ===========================================================================
// Tests
// ===========================================================================
