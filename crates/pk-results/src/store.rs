//! On-disk run cache.
//!
//! A run occupies `<root>/<run_id>/` with `timeseries.jsonl` (one record per grid
//! point the driver reached) and `manifest.json`. The manifest is written after the
//! timeseries, so a directory holding only a timeseries is an interrupted save and
//! is treated as absent.

use crate::types::{RunManifest, TimeseriesRecord};
use crate::{ResultsError, ResultsResult};
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

const MANIFEST_FILE: &str = "manifest.json";
const TIMESERIES_FILE: &str = "timeseries.jsonl";

/// A cached run read back in full.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredRun {
    pub manifest: RunManifest,
    pub records: Vec<TimeseriesRecord>,
}

#[derive(Clone, Debug)]
pub struct RunStore {
    root_dir: PathBuf,
}

impl RunStore {
    pub fn new(root_dir: PathBuf) -> ResultsResult<Self> {
        fs::create_dir_all(&root_dir)?;
        Ok(Self { root_dir })
    }

    /// Store rooted at `<scenario dir>/.pointkin/runs`.
    pub fn for_scenario(scenario_path: &Path) -> ResultsResult<Self> {
        let Some(scenario_dir) = scenario_path.parent() else {
            return Err(ResultsError::InvalidPath {
                message: format!("{} has no parent directory", scenario_path.display()),
            });
        };
        Self::new(scenario_dir.join(".pointkin").join("runs"))
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    fn file(&self, run_id: &str, name: &str) -> PathBuf {
        self.root_dir.join(run_id).join(name)
    }

    pub fn has_run(&self, run_id: &str) -> bool {
        self.file(run_id, MANIFEST_FILE).is_file()
    }

    /// Persist a run. Records must be the contiguous prefix `0..manifest.records`
    /// of the time grid; a completed run must cover every grid point.
    pub fn save_run(
        &self,
        manifest: &RunManifest,
        records: &[TimeseriesRecord],
    ) -> ResultsResult<()> {
        check_records(manifest, records)?;

        fs::create_dir_all(self.root_dir.join(&manifest.run_id))?;
        // a stale manifest from an earlier save must not vouch for the new rows
        let manifest_path = self.file(&manifest.run_id, MANIFEST_FILE);
        if manifest_path.exists() {
            fs::remove_file(&manifest_path)?;
        }

        let mut out = BufWriter::new(File::create(self.file(&manifest.run_id, TIMESERIES_FILE))?);
        for record in records {
            serde_json::to_writer(&mut out, record)?;
            out.write_all(b"\n")?;
        }
        out.flush()?;

        fs::write(manifest_path, serde_json::to_string_pretty(manifest)?)?;
        Ok(())
    }

    pub fn load_manifest(&self, run_id: &str) -> ResultsResult<RunManifest> {
        if !self.has_run(run_id) {
            return Err(not_found(run_id));
        }
        let content = fs::read_to_string(self.file(run_id, MANIFEST_FILE))?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Raw timeseries rows, without checking them against the manifest.
    pub fn load_timeseries(&self, run_id: &str) -> ResultsResult<Vec<TimeseriesRecord>> {
        let path = self.file(run_id, TIMESERIES_FILE);
        if !path.is_file() {
            return Err(not_found(run_id));
        }

        let mut records = Vec::new();
        for (lineno, line) in BufReader::new(File::open(path)?).lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let record = serde_json::from_str(&line).map_err(|e| ResultsError::Corrupt {
                run_id: run_id.to_string(),
                message: format!("timeseries line {}: {}", lineno + 1, e),
            })?;
            records.push(record);
        }
        Ok(records)
    }

    /// Manifest plus timeseries, rejecting a timeseries that disagrees with the
    /// manifest (truncated file, extra rows, gaps in the step sequence).
    pub fn load_run(&self, run_id: &str) -> ResultsResult<StoredRun> {
        let manifest = self.load_manifest(run_id)?;
        let records = self.load_timeseries(run_id)?;
        check_records(&manifest, &records).map_err(|err| match err {
            ResultsError::Inconsistent { run_id, message } => {
                ResultsError::Corrupt { run_id, message }
            }
            other => other,
        })?;
        Ok(StoredRun { manifest, records })
    }

    /// Manifests of every stored run of `scenario_name`, newest first.
    pub fn list_runs(&self, scenario_name: &str) -> ResultsResult<Vec<RunManifest>> {
        let mut runs = Vec::new();
        for entry in fs::read_dir(&self.root_dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            let run_id = entry.file_name().to_string_lossy().into_owned();
            if !self.has_run(&run_id) {
                continue;
            }
            let manifest = self.load_manifest(&run_id)?;
            if manifest.scenario_name == scenario_name {
                runs.push(manifest);
            }
        }
        // RFC 3339 UTC timestamps order lexically; run id breaks ties
        runs.sort_by(|a, b| {
            b.timestamp
                .cmp(&a.timestamp)
                .then_with(|| a.run_id.cmp(&b.run_id))
        });
        Ok(runs)
    }

    pub fn delete_run(&self, run_id: &str) -> ResultsResult<()> {
        let run_dir = self.root_dir.join(run_id);
        if run_dir.exists() {
            fs::remove_dir_all(run_dir)?;
        }
        Ok(())
    }
}

fn not_found(run_id: &str) -> ResultsError {
    ResultsError::RunNotFound {
        run_id: run_id.to_string(),
    }
}

fn check_records(manifest: &RunManifest, records: &[TimeseriesRecord]) -> ResultsResult<()> {
    let fail = |message: String| {
        Err(ResultsError::Inconsistent {
            run_id: manifest.run_id.clone(),
            message,
        })
    };

    if records.len() != manifest.records {
        return fail(format!(
            "manifest lists {} records, timeseries has {}",
            manifest.records,
            records.len()
        ));
    }
    if records.len() > manifest.steps {
        return fail(format!(
            "{} records exceed the {}-point time grid",
            records.len(),
            manifest.steps
        ));
    }
    if manifest.status.is_completed() && records.len() != manifest.steps {
        return fail(format!(
            "completed run covers {} of {} grid points",
            records.len(),
            manifest.steps
        ));
    }
    for (i, record) in records.iter().enumerate() {
        if record.step != i {
            return fail(format!("record {} carries step {}", i, record.step));
        }
        if record.components.len() != manifest.component_names.len() {
            return fail(format!(
                "step {} has {} component temperatures, expected {}",
                i,
                record.components.len(),
                manifest.component_names.len()
            ));
        }
    }
    Ok(())
}
