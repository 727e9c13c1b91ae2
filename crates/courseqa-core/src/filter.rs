// crates/courseqa-core/src/filter.rs

use polars::prelude::*;

use crate::error::Result;
use crate::types::{Severity, Status};

/// Multi-select filter state for one dashboard interaction. An empty
/// selection list means "no restriction", never "match nothing"; non-empty
/// selections restrict their column to membership and AND across fields.
/// The free-text query is a case-insensitive substring match ORed across
/// `issue_id`, `notes`, and `item_id`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IssueFilter {
    pub courses: Vec<String>,
    pub units: Vec<String>,
    pub statuses: Vec<Status>,
    pub severities: Vec<Severity>,
    pub assignees: Vec<String>,
    pub search: Option<String>,
}

impl IssueFilter {
    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
            && self.units.is_empty()
            && self.statuses.is_empty()
            && self.severities.is_empty()
            && self.assignees.is_empty()
            && self.normalized_search().is_none()
    }

    fn normalized_search(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_lowercase)
    }

    /// Returns the subset of rows passing every restriction. Filtering a
    /// validated table cannot fail; an empty result is a valid result.
    pub fn apply(&self, df: &DataFrame) -> Result<DataFrame> {
        if self.is_empty() {
            return Ok(df.clone());
        }

        let len = df.height();
        let course = df.column("course_name")?.str()?;
        let unit = df.column("unit")?.str()?;
        let status = df.column("status")?.str()?;
        let severity = df.column("severity")?.str()?;
        let assignee = df.column("assignee")?.str()?;
        let issue_id = df.column("issue_id")?.str()?;
        let item_id = df.column("item_id")?.str()?;
        let notes = match df.column("notes") {
            Ok(column) => Some(column.str()?),
            Err(_) => None,
        };

        let status_labels: Vec<&'static str> =
            self.statuses.iter().map(Status::as_str).collect();
        let severity_labels: Vec<&'static str> =
            self.severities.iter().map(Severity::as_str).collect();
        let needle = self.normalized_search();

        let mut mask = Vec::with_capacity(len);
        for idx in 0..len {
            let mut keep = selected(course.get(idx), &self.courses)
                && selected(unit.get(idx), &self.units)
                && selected_label(status.get(idx), &status_labels)
                && selected_label(severity.get(idx), &severity_labels)
                && selected(assignee.get(idx), &self.assignees);

            if keep {
                if let Some(needle) = needle.as_deref() {
                    keep = contains(issue_id.get(idx), needle)
                        || contains(item_id.get(idx), needle)
                        || notes.map_or(false, |col| contains(col.get(idx), needle));
                }
            }
            mask.push(keep);
        }

        let mask = Series::new("mask".into(), mask);
        Ok(df.filter(mask.bool()?)?)
    }
}

fn selected(value: Option<&str>, selection: &[String]) -> bool {
    selection.is_empty() || value.is_some_and(|v| selection.iter().any(|s| s == v))
}

fn selected_label(value: Option<&str>, selection: &[&'static str]) -> bool {
    selection.is_empty() || value.is_some_and(|v| selection.iter().any(|s| *s == v))
}

fn contains(value: Option<&str>, needle: &str) -> bool {
    value.is_some_and(|v| v.to_lowercase().contains(needle))
}
