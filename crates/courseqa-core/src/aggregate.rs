// crates/courseqa-core/src/aggregate.rs

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use polars::prelude::*;
use serde::Serialize;

use crate::error::Result;
use crate::types::{AgeBucket, Severity, Status};

/// Headline counts for the KPI cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct KpiCounts {
    /// Open including In Progress.
    pub open: usize,
    pub verified: usize,
    pub closed: usize,
    /// Critical severity among the open mask.
    pub critical_open: usize,
    /// SLA breaches among the open mask.
    pub open_sla_breaches: usize,
}

pub fn kpi_counts(df: &DataFrame) -> Result<KpiCounts> {
    let status = df.column("status")?.str()?;
    let severity = df.column("severity")?.str()?;
    let breached = df.column("sla_breached")?.bool()?;

    let mut counts = KpiCounts {
        open: 0,
        verified: 0,
        closed: 0,
        critical_open: 0,
        open_sla_breaches: 0,
    };

    for idx in 0..df.height() {
        let Some(status) = status.get(idx).and_then(|s| Status::try_from(s).ok()) else {
            continue;
        };
        if status.is_open() {
            counts.open += 1;
            if severity.get(idx) == Some(Severity::Critical.as_str()) {
                counts.critical_open += 1;
            }
            if breached.get(idx) == Some(true) {
                counts.open_sla_breaches += 1;
            }
        }
        match status {
            Status::Verified => counts.verified += 1,
            Status::Closed => counts.closed += 1,
            _ => {}
        }
    }

    Ok(counts)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeverityBreachRate {
    pub severity: Severity,
    /// Percentage of open-mask rows past their SLA, rounded to 1 decimal.
    pub breach_rate_pct: f64,
}

/// Breach rate over open-mask rows per severity, Low to Critical. Severities
/// with no open rows are omitted (there is nothing to average).
pub fn sla_breach_rate_by_severity(df: &DataFrame) -> Result<Vec<SeverityBreachRate>> {
    let status = df.column("status")?.str()?;
    let severity = df.column("severity")?.str()?;
    let breached = df.column("sla_breached")?.bool()?;

    let mut totals = [0usize; 4];
    let mut breaches = [0usize; 4];

    for idx in 0..df.height() {
        let open = status
            .get(idx)
            .and_then(|s| Status::try_from(s).ok())
            .is_some_and(|s| s.is_open());
        if !open {
            continue;
        }
        let Some(sev) = severity.get(idx).and_then(|s| Severity::try_from(s).ok()) else {
            continue;
        };
        let slot = sev as usize;
        totals[slot] += 1;
        if breached.get(idx) == Some(true) {
            breaches[slot] += 1;
        }
    }

    Ok(Severity::ALL
        .iter()
        .filter(|sev| totals[**sev as usize] > 0)
        .map(|sev| {
            let slot = *sev as usize;
            let rate = breaches[slot] as f64 / totals[slot] as f64 * 100.0;
            SeverityBreachRate {
                severity: *sev,
                breach_rate_pct: round1(rate),
            }
        })
        .collect())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DailyCreatedCount {
    pub date: NaiveDate,
    pub created: usize,
}

/// Issues created per calendar day, sorted by date. Days with no issues are
/// absent, not zero-filled.
pub fn daily_created_counts(df: &DataFrame) -> Result<Vec<DailyCreatedCount>> {
    let created = df.column("created_at")?.datetime()?;

    let mut by_date: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for idx in 0..df.height() {
        let Some(date) = created
            .get(idx)
            .and_then(DateTime::<Utc>::from_timestamp_micros)
            .map(|dt| dt.date_naive())
        else {
            continue;
        };
        *by_date.entry(date).or_insert(0) += 1;
    }

    Ok(by_date
        .into_iter()
        .map(|(date, created)| DailyCreatedCount { date, created })
        .collect())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusCount {
    pub status: Status,
    pub count: usize,
}

/// Count per status in the fixed display order; all five categories are
/// present even at zero.
pub fn status_distribution(df: &DataFrame) -> Result<Vec<StatusCount>> {
    let status = df.column("status")?.str()?;

    let mut counts = [0usize; 5];
    for idx in 0..df.height() {
        if let Some(s) = status.get(idx).and_then(|s| Status::try_from(s).ok()) {
            counts[s as usize] += 1;
        }
    }

    Ok(Status::ALL
        .iter()
        .map(|status| StatusCount {
            status: *status,
            count: counts[*status as usize],
        })
        .collect())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseSeverityShare {
    pub course_name: String,
    pub severity: Severity,
    pub count: usize,
    /// Proportion of the course's rows, normalized to sum to 1 per course.
    pub share: f64,
}

/// Severity mix per course for the 100%-stacked view: all four severities
/// per course, courses sorted by name.
pub fn severity_mix_by_course(df: &DataFrame) -> Result<Vec<CourseSeverityShare>> {
    let course = df.column("course_name")?.str()?;
    let severity = df.column("severity")?.str()?;

    let mut by_course: BTreeMap<String, [usize; 4]> = BTreeMap::new();
    for idx in 0..df.height() {
        let (Some(course), Some(sev)) = (
            course.get(idx),
            severity.get(idx).and_then(|s| Severity::try_from(s).ok()),
        ) else {
            continue;
        };
        by_course.entry(course.to_string()).or_insert([0; 4])[sev as usize] += 1;
    }

    let mut rows = Vec::with_capacity(by_course.len() * Severity::ALL.len());
    for (course_name, counts) in by_course {
        let total: usize = counts.iter().sum();
        for sev in Severity::ALL {
            let count = counts[sev as usize];
            rows.push(CourseSeverityShare {
                course_name: course_name.clone(),
                severity: sev,
                count,
                share: count as f64 / total as f64,
            });
        }
    }
    Ok(rows)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AgeBucketCount {
    pub bucket: AgeBucket,
    pub count: usize,
}

/// Histogram over the fixed age bins; every bucket appears, default 0.
pub fn age_histogram(df: &DataFrame) -> Result<Vec<AgeBucketCount>> {
    let age = df.column("age_days")?.i64()?;

    let mut counts = BTreeMap::new();
    for bucket in AgeBucket::ALL {
        counts.insert(bucket.label(), 0usize);
    }
    for idx in 0..df.height() {
        if let Some(age) = age.get(idx) {
            *counts
                .entry(AgeBucket::from_age_days(age).label())
                .or_insert(0) += 1;
        }
    }

    Ok(AgeBucket::ALL
        .iter()
        .map(|bucket| AgeBucketCount {
            bucket: *bucket,
            count: counts[bucket.label()],
        })
        .collect())
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
