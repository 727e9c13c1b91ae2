// crates/courseqa-core/src/derive.rs

use chrono::{DateTime, Utc};
use polars::prelude::*;

use crate::error::Result;
use crate::types::Severity;

const MICROS_PER_DAY: i64 = 24 * 60 * 60 * 1_000_000;

/// Appends `sla_days` (unless the input already carries it), `age_days`, and
/// `sla_breached` to a normalized issue table, returning a new frame. The
/// input is untouched.
///
/// `age_days` is a pure function of `now` and `created_at`; results are only
/// valid for the instant computed, so callers re-derive per interaction
/// instead of caching derived frames.
pub fn derive_fields(df: &DataFrame, now: DateTime<Utc>) -> Result<DataFrame> {
    let len = df.height();
    let severity = df.column("severity")?.str()?;
    let created = df.column("created_at")?.datetime()?;
    let explicit_sla = match df.column("sla_days") {
        Ok(column) => Some(column.i64()?),
        Err(_) => None,
    };

    let now_micros = now.timestamp_micros();

    let mut sla_days = Vec::with_capacity(len);
    let mut age_days = Vec::with_capacity(len);
    let mut breached = Vec::with_capacity(len);

    for idx in 0..len {
        let sla = match explicit_sla {
            Some(column) => column.get(idx),
            None => severity
                .get(idx)
                .and_then(|s| Severity::try_from(s).ok())
                .map(|s| s.sla_days()),
        };
        let age = created
            .get(idx)
            .map(|micros| (now_micros - micros) / MICROS_PER_DAY);

        breached.push(match (age, sla) {
            (Some(age), Some(sla)) => age > sla,
            _ => false,
        });
        sla_days.push(sla);
        age_days.push(age);
    }

    let mut output = df.clone();
    if explicit_sla.is_none() {
        output.hstack_mut(&mut [Series::new("sla_days".into(), sla_days).into()])?;
    }
    output.hstack_mut(&mut [
        Series::new("age_days".into(), age_days).into(),
        Series::new("sla_breached".into(), breached).into(),
    ])?;

    Ok(output)
}
