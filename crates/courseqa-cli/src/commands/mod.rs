pub mod export;
pub mod summary;
pub mod wip;

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use chrono::Local;
use courseqa_core::demo::DemoConfig;
use courseqa_core::filter::IssueFilter;
use courseqa_core::pipeline::IssuePipeline;
use courseqa_core::types::{Severity, Status};
use polars::prelude::DataFrame;

/// Where the issue table comes from: a CSV file, or the seeded demo set
/// when no file is given.
#[derive(clap::Args, Debug)]
pub struct SourceArgs {
    /// CSV file of issues; omit to use the built-in demo table.
    #[arg(long)]
    pub file: Option<PathBuf>,
    /// Demo generator seed.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
    /// Demo row count.
    #[arg(long, default_value_t = 250)]
    pub rows: usize,
    /// Demo course count.
    #[arg(long, default_value_t = 3)]
    pub courses: usize,
}

impl SourceArgs {
    pub fn load(&self, pipeline: &mut IssuePipeline) -> Result<DataFrame> {
        match &self.file {
            Some(path) => {
                let contents = std::fs::read(path)
                    .with_context(|| format!("failed to read {}", path.display()))?;
                pipeline
                    .load_upload(&contents)
                    .with_context(|| format!("failed to load {}", path.display()))
            }
            None => {
                let config = DemoConfig {
                    seed: self.seed,
                    n_rows: self.rows,
                    n_courses: self.courses,
                };
                pipeline
                    .load_demo(&config, Local::now().date_naive())
                    .context("failed to generate demo data")
            }
        }
    }
}

/// Repeatable multi-select flags, one per filterable field.
#[derive(clap::Args, Debug, Default)]
pub struct FilterArgs {
    /// Restrict to these courses (repeatable).
    #[arg(long = "course")]
    pub courses: Vec<String>,
    /// Restrict to these units (repeatable).
    #[arg(long = "unit")]
    pub units: Vec<String>,
    /// Restrict to these statuses (repeatable), e.g. "Open", "In Progress".
    #[arg(long = "status")]
    pub statuses: Vec<String>,
    /// Restrict to these severities (repeatable).
    #[arg(long = "severity")]
    pub severities: Vec<String>,
    /// Restrict to these assignees (repeatable).
    #[arg(long = "assignee")]
    pub assignees: Vec<String>,
    /// Case-insensitive substring over issue ids, notes, and item ids.
    #[arg(long)]
    pub search: Option<String>,
}

impl FilterArgs {
    pub fn to_filter(&self) -> Result<IssueFilter> {
        let statuses = self
            .statuses
            .iter()
            .map(|s| Status::try_from(s.as_str()).map_err(|err| anyhow!(err)))
            .collect::<Result<Vec<_>>>()?;
        let severities = self
            .severities
            .iter()
            .map(|s| Severity::try_from(s.as_str()).map_err(|err| anyhow!(err)))
            .collect::<Result<Vec<_>>>()?;

        Ok(IssueFilter {
            courses: self.courses.clone(),
            units: self.units.clone(),
            statuses,
            severities,
            assignees: self.assignees.clone(),
            search: self.search.clone(),
        })
    }
}
