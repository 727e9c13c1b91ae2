// crates/courseqa-core/src/demo.rs

use chrono::{Duration, NaiveDate, NaiveTime};
use polars::prelude::*;
use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::error::{PipelineError, Result};
use crate::types::{Severity, Status};

/// Shape of the synthetic demo table. Equal configs (and equal `today`)
/// produce identical frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DemoConfig {
    pub seed: u64,
    pub n_rows: usize,
    pub n_courses: usize,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            n_rows: 250,
            n_courses: 3,
        }
    }
}

const N_UNITS: usize = 8;
const ITEM_TYPES: [&str; 5] = ["Video", "Quiz", "Reading", "Assignment", "Slide"];
const REPORTERS: [&str; 4] = ["QA", "Author", "Reviewer", "Student"];
const ASSIGNEES: [&str; 5] = ["Alex", "Sam", "Riley", "Jordan", "Kim"];
const NOTES: [&str; 7] = [
    "typo",
    "broken link",
    "layout",
    "audio",
    "timing",
    "grading",
    "accessibility",
];
const BROWSERS: [&str; 4] = ["Chrome", "Safari", "Firefox", "Edge"];
const ENVIRONMENTS: [&str; 2] = ["Staging", "Production"];

const STATUS_WEIGHTS: [f64; 5] = [0.25, 0.25, 0.2, 0.2, 0.1];
const SEVERITY_WEIGHTS: [f64; 4] = [0.45, 0.35, 0.15, 0.05];

/// Generates a seeded synthetic issue table with the same raw columns an
/// upload carries (optional free-form columns included, derived fields not:
/// those come from the deriver like any other table).
pub fn demo_issues(config: &DemoConfig, today: NaiveDate) -> Result<DataFrame> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let status_dist = weighted(&STATUS_WEIGHTS)?;
    let severity_dist = weighted(&SEVERITY_WEIGHTS)?;

    let midnight = today.and_time(NaiveTime::MIN);
    let n = config.n_rows;

    let mut issue_ids = Vec::with_capacity(n);
    let mut courses = Vec::with_capacity(n);
    let mut units = Vec::with_capacity(n);
    let mut item_ids = Vec::with_capacity(n);
    let mut item_types = Vec::with_capacity(n);
    let mut statuses = Vec::with_capacity(n);
    let mut severities = Vec::with_capacity(n);
    let mut reporters = Vec::with_capacity(n);
    let mut assignees = Vec::with_capacity(n);
    let mut created_at = Vec::with_capacity(n);
    let mut updated_at = Vec::with_capacity(n);
    let mut notes = Vec::with_capacity(n);
    let mut browsers = Vec::with_capacity(n);
    let mut environments = Vec::with_capacity(n);

    for i in 0..n {
        let created = midnight - Duration::days(rng.gen_range(0..40));
        let updated = created + Duration::days(rng.gen_range(0..15));

        issue_ids.push(format!("ISSUE-{}", 1000 + i));
        courses.push(format!("Course {}", rng.gen_range(0..config.n_courses.max(1)) + 1));
        units.push(format!("Unit {}", rng.gen_range(0..N_UNITS) + 1));
        item_ids.push(format!("ITEM-{}", rng.gen_range(1..9999)));
        item_types.push(ITEM_TYPES[rng.gen_range(0..ITEM_TYPES.len())]);
        statuses.push(Status::ALL[status_dist.sample(&mut rng)].as_str());
        severities.push(Severity::ALL[severity_dist.sample(&mut rng)].as_str());
        reporters.push(REPORTERS[rng.gen_range(0..REPORTERS.len())]);
        assignees.push(ASSIGNEES[rng.gen_range(0..ASSIGNEES.len())]);
        created_at.push(created.and_utc().timestamp_micros());
        updated_at.push(updated.and_utc().timestamp_micros());
        notes.push(NOTES[rng.gen_range(0..NOTES.len())]);
        browsers.push(BROWSERS[rng.gen_range(0..BROWSERS.len())]);
        environments.push(ENVIRONMENTS[rng.gen_range(0..ENVIRONMENTS.len())]);
    }

    let created_series = Series::new("created_at".into(), created_at)
        .cast(&DataType::Datetime(TimeUnit::Microseconds, None))?;
    let updated_series = Series::new("updated_at".into(), updated_at)
        .cast(&DataType::Datetime(TimeUnit::Microseconds, None))?;

    let df = DataFrame::new(vec![
        Series::new("issue_id".into(), issue_ids).into(),
        Series::new("course_name".into(), courses).into(),
        Series::new("unit".into(), units).into(),
        Series::new("item_id".into(), item_ids).into(),
        Series::new("item_type".into(), item_types).into(),
        Series::new("status".into(), statuses).into(),
        Series::new("severity".into(), severities).into(),
        Series::new("reporter".into(), reporters).into(),
        Series::new("assignee".into(), assignees).into(),
        created_series.into(),
        updated_series.into(),
        Series::new("notes".into(), notes).into(),
        Series::new("browser".into(), browsers).into(),
        Series::new("environment".into(), environments).into(),
    ])?;

    debug!(rows = df.height(), seed = config.seed, "generated demo issue table");
    Ok(df)
}

fn weighted(weights: &[f64]) -> Result<WeightedIndex<f64>> {
    WeightedIndex::new(weights)
        .map_err(|err| PipelineError::Processing(format!("invalid demo weights: {err}")))
}
