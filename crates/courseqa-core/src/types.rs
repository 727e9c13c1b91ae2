// crates/courseqa-core/src/types.rs

use std::fmt;

use serde::{Deserialize, Serialize};

/// Issue workflow state. The declaration order is the fixed display order
/// used for chart axes and the status distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Status {
    Open,
    #[serde(rename = "In Progress")]
    InProgress,
    Fixed,
    Verified,
    Closed,
}

impl Status {
    pub const ALL: [Status; 5] = [
        Status::Open,
        Status::InProgress,
        Status::Fixed,
        Status::Verified,
        Status::Closed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Open => "Open",
            Status::InProgress => "In Progress",
            Status::Fixed => "Fixed",
            Status::Verified => "Verified",
            Status::Closed => "Closed",
        }
    }

    /// Open mask: still unresolved.
    pub fn is_open(&self) -> bool {
        matches!(self, Status::Open | Status::InProgress)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Status {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "open" => Ok(Status::Open),
            "in progress" | "in_progress" | "in-progress" => Ok(Status::InProgress),
            "fixed" => Ok(Status::Fixed),
            "verified" => Ok(Status::Verified),
            "closed" => Ok(Status::Closed),
            other => Err(format!("unknown status '{other}'")),
        }
    }
}

/// Issue severity, ordered least to most severe. Determines the SLA target
/// when the input carries no explicit `sla_days` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub const ALL: [Severity; 4] = [
        Severity::Low,
        Severity::Medium,
        Severity::High,
        Severity::Critical,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "Low",
            Severity::Medium => "Medium",
            Severity::High => "High",
            Severity::Critical => "Critical",
        }
    }

    /// Maximum allowed resolution time in days.
    pub fn sla_days(&self) -> i64 {
        match self {
            Severity::Critical => 2,
            Severity::High => 5,
            Severity::Medium => 10,
            Severity::Low => 15,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Severity {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Severity::Low),
            "medium" => Ok(Severity::Medium),
            "high" => Ok(Severity::High),
            "critical" => Ok(Severity::Critical),
            other => Err(format!("unknown severity '{other}'")),
        }
    }
}

/// Fixed bins for the issue-age histogram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgeBucket {
    #[serde(rename = "≤2d")]
    UpToTwoDays,
    #[serde(rename = "3–5d")]
    ThreeToFiveDays,
    #[serde(rename = "6–10d")]
    SixToTenDays,
    #[serde(rename = "11–20d")]
    ElevenToTwentyDays,
    #[serde(rename = ">20d")]
    OverTwentyDays,
}

impl AgeBucket {
    pub const ALL: [AgeBucket; 5] = [
        AgeBucket::UpToTwoDays,
        AgeBucket::ThreeToFiveDays,
        AgeBucket::SixToTenDays,
        AgeBucket::ElevenToTwentyDays,
        AgeBucket::OverTwentyDays,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            AgeBucket::UpToTwoDays => "≤2d",
            AgeBucket::ThreeToFiveDays => "3–5d",
            AgeBucket::SixToTenDays => "6–10d",
            AgeBucket::ElevenToTwentyDays => "11–20d",
            AgeBucket::OverTwentyDays => ">20d",
        }
    }

    /// Ages at or below the lowest edge land in the first bucket.
    pub fn from_age_days(age_days: i64) -> Self {
        match age_days {
            d if d <= 2 => AgeBucket::UpToTwoDays,
            3..=5 => AgeBucket::ThreeToFiveDays,
            6..=10 => AgeBucket::SixToTenDays,
            11..=20 => AgeBucket::ElevenToTwentyDays,
            _ => AgeBucket::OverTwentyDays,
        }
    }
}

impl fmt::Display for AgeBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
