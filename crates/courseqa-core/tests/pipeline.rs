use chrono::{NaiveDate, TimeZone, Utc};
use courseqa_core::demo::DemoConfig;
use courseqa_core::filter::IssueFilter;
use courseqa_core::pipeline::{snapshot, IssuePipeline, SourceKey};
use courseqa_core::types::Status;

const FIXTURE: &str = "\
issue_id,course_name,unit,item_id,item_type,status,severity,reporter,assignee,created_at,updated_at,notes
ISSUE-1001,Course 1,Unit 1,ITEM-11,Video,Open,Critical,QA,Alex,2025-06-12 09:00:00,2025-06-13 10:00:00,broken link
ISSUE-1002,Course 1,Unit 2,ITEM-12,Quiz,In Progress,High,Author,Sam,2025-06-08 08:30:00,2025-06-10 11:00:00,timing
ISSUE-1003,Course 2,Unit 1,ITEM-13,Reading,Fixed,Medium,Reviewer,Riley,2025-06-01 15:00:00,2025-06-05 09:00:00,typo
";

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
}

#[test]
fn upload_is_cached_by_content_hash() {
    let mut pipeline = IssuePipeline::new();

    let first = pipeline.load_upload(FIXTURE.as_bytes()).expect("load failed");
    let key = pipeline.cached_key().expect("expected cached key").clone();
    assert!(matches!(key, SourceKey::Upload(_)));

    let second = pipeline.load_upload(FIXTURE.as_bytes()).expect("load failed");
    assert!(first.equals(&second));
    assert_eq!(pipeline.cached_key(), Some(&key));
}

#[test]
fn changing_the_input_replaces_the_cache_entry() {
    let mut pipeline = IssuePipeline::new();
    pipeline.load_upload(FIXTURE.as_bytes()).expect("load failed");
    let first_key = pipeline.cached_key().expect("expected cached key").clone();

    let other = FIXTURE.replace("broken link", "missing alt text");
    pipeline.load_upload(other.as_bytes()).expect("load failed");
    assert_ne!(pipeline.cached_key(), Some(&first_key));
}

#[test]
fn failed_load_keeps_the_previous_table() {
    let mut pipeline = IssuePipeline::new();
    pipeline.load_upload(FIXTURE.as_bytes()).expect("load failed");
    let key = pipeline.cached_key().expect("expected cached key").clone();

    let broken = "issue_id,status\nISSUE-1,Open\n";
    assert!(pipeline.load_upload(broken.as_bytes()).is_err());
    assert_eq!(pipeline.cached_key(), Some(&key));

    let again = pipeline.load_upload(FIXTURE.as_bytes()).expect("load failed");
    assert_eq!(again.height(), 3);
}

#[test]
fn demo_source_is_keyed_by_its_config() {
    let mut pipeline = IssuePipeline::new();
    let config = DemoConfig {
        seed: 42,
        n_rows: 50,
        n_courses: 2,
    };

    let first = pipeline.load_demo(&config, today()).expect("load failed");
    assert_eq!(
        pipeline.cached_key(),
        Some(&SourceKey::Demo {
            seed: 42,
            n_rows: 50,
            n_courses: 2
        })
    );

    let second = pipeline.load_demo(&config, today()).expect("load failed");
    assert!(first.equals(&second));
}

#[test]
fn invalidate_clears_the_cache() {
    let mut pipeline = IssuePipeline::new();
    pipeline.load_upload(FIXTURE.as_bytes()).expect("load failed");
    assert!(pipeline.cached_key().is_some());

    pipeline.invalidate();
    assert!(pipeline.cached_key().is_none());
}

#[test]
fn snapshot_bundles_consistent_aggregates() {
    let mut pipeline = IssuePipeline::new();
    let table = pipeline.load_upload(FIXTURE.as_bytes()).expect("load failed");
    let now = Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap();

    let snap = snapshot(&table, &IssueFilter::default(), now).expect("snapshot failed");

    assert_eq!(snap.table.height(), 3);
    assert_eq!(snap.filtered.height(), 3);
    let status_total: usize = snap.status_distribution.iter().map(|s| s.count).sum();
    assert_eq!(status_total, snap.filtered.height());
    assert_eq!(snap.kpis.open, 2);
    assert_eq!(snap.age_histogram.len(), 5);
    assert!(snap.table.column("age_days").is_ok());
}

#[test]
fn snapshot_applies_the_filter_before_aggregating() {
    let mut pipeline = IssuePipeline::new();
    let table = pipeline.load_upload(FIXTURE.as_bytes()).expect("load failed");
    let now = Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap();

    let filter = IssueFilter {
        statuses: vec![Status::Open],
        ..IssueFilter::default()
    };
    let snap = snapshot(&table, &filter, now).expect("snapshot failed");

    assert_eq!(snap.table.height(), 3);
    assert_eq!(snap.filtered.height(), 1);
    assert_eq!(snap.kpis.open, 1);
    assert_eq!(snap.kpis.closed, 0);
}
