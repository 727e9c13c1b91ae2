// crates/courseqa-core/src/views.rs

use std::cmp::Reverse;

use polars::prelude::*;

use crate::error::Result;
use crate::types::{Severity, Status};

/// Columns of the work-in-progress table, in display order.
pub const WIP_COLUMNS: [&str; 11] = [
    "issue_id",
    "course_name",
    "unit",
    "item_type",
    "severity",
    "status",
    "assignee",
    "age_days",
    "sla_breached",
    "updated_at",
    "notes",
];

/// Open-mask rows ordered most severe first, oldest first within a severity,
/// restricted to the WIP display columns present in the frame.
pub fn wip_view(df: &DataFrame) -> Result<DataFrame> {
    let status = df.column("status")?.str()?;
    let severity = df.column("severity")?.str()?;
    let age = df.column("age_days")?.i64()?;

    let mut keys: Vec<(usize, Severity, i64)> = Vec::new();
    for idx in 0..df.height() {
        let open = status
            .get(idx)
            .and_then(|s| Status::try_from(s).ok())
            .is_some_and(|s| s.is_open());
        if !open {
            continue;
        }
        let sev = severity
            .get(idx)
            .and_then(|s| Severity::try_from(s).ok())
            .unwrap_or(Severity::Low);
        keys.push((idx, sev, age.get(idx).unwrap_or(0)));
    }
    keys.sort_by_key(|(_, sev, age)| (Reverse(*sev), Reverse(*age)));

    let order: Vec<IdxSize> = keys.iter().map(|(idx, _, _)| *idx as IdxSize).collect();
    let taken = df.take(&IdxCa::from_vec("idx".into(), order))?;

    let present: Vec<&str> = WIP_COLUMNS
        .iter()
        .copied()
        .filter(|name| taken.column(name).is_ok())
        .collect();
    Ok(taken.select(present)?)
}

/// All rows ordered by `updated_at` descending, most recently touched first.
pub fn detail_view(df: &DataFrame) -> Result<DataFrame> {
    let updated = df.column("updated_at")?.datetime()?;

    let mut keys: Vec<(usize, i64)> = (0..df.height())
        .map(|idx| (idx, updated.get(idx).unwrap_or(i64::MIN)))
        .collect();
    keys.sort_by_key(|(_, updated)| Reverse(*updated));

    let order: Vec<IdxSize> = keys.iter().map(|(idx, _)| *idx as IdxSize).collect();
    Ok(df.take(&IdxCa::from_vec("idx".into(), order))?)
}
