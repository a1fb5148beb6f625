//! Cached Census API fetches.
//!
//! The Census data API answers with a JSON array of arrays whose first row holds the column
//! names. [`fetch`] downloads such a payload once and keeps it in a cache file; later calls
//! read the cache and never touch the network. [`stage_source`] writes the payload as a CSV
//! into `raw/<category>/` so it goes through the normal pipeline.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::USER_AGENT;
use serde::Deserialize;
use serde_json::Value as Json;
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::error::FetchError;
use crate::ingestion::csv::text_value;
use crate::output::{Layout, write_csv_atomic};
use crate::types::{DataSet, Schema, Value};

/// HTTP request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// A remote table to stage before a run, as declared under `[[sources]]` in `ingest.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FetchSource {
    /// File stem for the cache file and the staged CSV.
    pub name: String,
    pub url: String,
    /// Raw-data category the table is staged under.
    pub category: String,
    #[serde(default)]
    pub params: BTreeMap<String, String>,
    /// Environment variable holding the API key, sent as the `key` query parameter.
    #[serde(default)]
    pub key_env: Option<String>,
}

impl FetchSource {
    /// Query parameters including the API key, if `key_env` is set and present.
    pub fn query(&self) -> BTreeMap<String, String> {
        let mut params = self.params.clone();
        if let Some(var) = &self.key_env {
            match std::env::var(var) {
                Ok(key) if !key.is_empty() => {
                    params.insert("key".to_string(), key);
                }
                _ => debug!(var = %var, source = %self.name, "api key variable not set"),
            }
        }
        params
    }
}

/// Build the HTTP client used for fetches.
pub fn client() -> Result<Client, FetchError> {
    Ok(Client::builder().timeout(REQUEST_TIMEOUT).build()?)
}

/// Return the payload for `url` + `params`, from `cache_path` when it exists.
///
/// On a cache miss the response must have a 2xx status; the payload is persisted to
/// `cache_path` before it is returned.
pub fn fetch(
    client: &Client,
    url: &str,
    params: &BTreeMap<String, String>,
    cache_path: &Path,
) -> Result<Json, FetchError> {
    let cache_err = |source| FetchError::Cache {
        path: cache_path.to_path_buf(),
        source,
    };

    if cache_path.is_file() {
        info!(cache = %cache_path.display(), "loading cached payload");
        let bytes = fs::read(cache_path).map_err(cache_err)?;
        return Ok(serde_json::from_slice(&bytes)?);
    }

    info!(url, "fetching payload");
    let response = client
        .get(url)
        .query(params)
        .header(USER_AGENT, concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .send()?;

    if !response.status().is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status: response.status().as_u16(),
        });
    }

    let payload: Json = response.json()?;

    let dir = match cache_path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(cache_err)?;
    let mut tmp = NamedTempFile::new_in(dir).map_err(cache_err)?;
    serde_json::to_writer(tmp.as_file_mut(), &payload)?;
    tmp.as_file_mut().flush().map_err(cache_err)?;
    tmp.persist(cache_path).map_err(|e| cache_err(e.error))?;
    debug!(cache = %cache_path.display(), "cached payload");

    Ok(payload)
}

/// Convert a `[[header, ...], [cell, ...], ...]` payload into a raw, all-text table.
///
/// Strings are trimmed (empty → null), JSON nulls stay null and numbers keep their JSON
/// spelling. Short rows are padded with nulls; rows longer than the header are rejected.
pub fn payload_to_table(payload: &Json) -> Result<DataSet, FetchError> {
    let rows = payload
        .as_array()
        .ok_or_else(|| FetchError::Payload("expected a top-level array".to_string()))?;
    let (header, body) = rows
        .split_first()
        .ok_or_else(|| FetchError::Payload("empty payload".to_string()))?;
    let header = header
        .as_array()
        .ok_or_else(|| FetchError::Payload("header row is not an array".to_string()))?;

    let names = header
        .iter()
        .map(|h| match h {
            Json::String(s) => Ok(s.clone()),
            other => Err(FetchError::Payload(format!("non-string header cell {other}"))),
        })
        .collect::<Result<Vec<_>, _>>()?;
    let width = names.len();

    let mut out = Vec::with_capacity(body.len());
    for (i, row) in body.iter().enumerate() {
        let cells = row
            .as_array()
            .ok_or_else(|| FetchError::Payload(format!("row {} is not an array", i + 1)))?;
        if cells.len() > width {
            return Err(FetchError::Payload(format!(
                "row {} has {} cells, header has {width}",
                i + 1,
                cells.len()
            )));
        }
        let mut values: Vec<Value> = cells.iter().map(json_cell).collect();
        values.resize(width, Value::Null);
        out.push(values);
    }

    Ok(DataSet::new(Schema::utf8_from_headers(names), out))
}

fn json_cell(cell: &Json) -> Value {
    match cell {
        Json::Null => Value::Null,
        Json::String(s) => text_value(s),
        other => text_value(&other.to_string()),
    }
}

/// Write `table` to `raw/<category>/<name>.csv` under `layout`.
pub fn stage_source(
    layout: &Layout,
    category: &str,
    name: &str,
    table: &DataSet,
) -> Result<PathBuf, FetchError> {
    let dir = layout.raw_dir().join(category);
    let dest = dir.join(format!("{name}.csv"));
    fs::create_dir_all(&dir).map_err(|source| {
        FetchError::Stage(crate::IngestionError::WriteFailure {
            path: dest.clone(),
            source,
        })
    })?;
    write_csv_atomic(table, &dest).map_err(FetchError::Stage)?;
    Ok(dest)
}

/// Fetch (or read from `cache/<name>.json`) and stage one source. Returns the staged path.
pub fn fetch_source(client: &Client, layout: &Layout, source: &FetchSource) -> Result<PathBuf, FetchError> {
    let cache_path = layout.cache_dir().join(format!("{}.json", source.name));
    let payload = fetch(client, &source.url, &source.query(), &cache_path)?;
    let table = payload_to_table(&payload)?;
    let staged = stage_source(layout, &source.category, &source.name, &table)?;
    info!(source = %source.name, rows = table.row_count(), path = %staged.display(), "staged");
    Ok(staged)
}
