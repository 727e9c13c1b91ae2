use courseqa_core::filter::IssueFilter;
use courseqa_core::loader::load_issues;
use courseqa_core::types::{Severity, Status};
use polars::prelude::DataFrame;

const FIXTURE: &str = "\
issue_id,course_name,unit,item_id,item_type,status,severity,reporter,assignee,created_at,updated_at,notes
ISSUE-1001,Course 1,Unit 1,ITEM-11,Video,Open,Critical,QA,Alex,2025-06-12 09:00:00,2025-06-13 10:00:00,broken link
ISSUE-1002,Course 1,Unit 2,ITEM-12,Quiz,In Progress,High,Author,Sam,2025-06-08 08:30:00,2025-06-10 11:00:00,timing
ISSUE-1003,Course 2,Unit 1,ITEM-13,Reading,Fixed,Medium,Reviewer,Riley,2025-06-01 15:00:00,2025-06-05 09:00:00,typo
ISSUE-1004,Course 2,Unit 3,ITEM-14,Assignment,Verified,Low,Student,Jordan,2025-05-20 12:00:00,2025-06-02 16:00:00,layout
ISSUE-1005,Course 3,Unit 4,ITEM-15,Slide,Closed,High,QA,Kim,2025-05-10 10:00:00,2025-05-18 14:00:00,audio
ISSUE-1006,Course 1,Unit 1,ITEM-16,Video,Open,Low,QA,Alex,2025-06-14 09:00:00,2025-06-14 09:00:00,grading
";

fn fixture() -> DataFrame {
    load_issues(FIXTURE.as_bytes()).expect("load failed")
}

#[test]
fn empty_filter_returns_the_table_unchanged() {
    let df = fixture();
    let filtered = IssueFilter::default().apply(&df).expect("filter failed");
    assert!(df.equals(&filtered));
}

#[test]
fn course_selection_restricts_to_members() {
    let df = fixture();
    let filter = IssueFilter {
        courses: vec!["Course 1".to_string()],
        ..IssueFilter::default()
    };
    let filtered = filter.apply(&df).expect("filter failed");

    assert!(filtered.height() <= df.height());
    assert_eq!(filtered.height(), 3);
    let course = filtered.column("course_name").unwrap();
    let course = course.str().unwrap();
    for idx in 0..filtered.height() {
        assert_eq!(course.get(idx), Some("Course 1"));
    }
}

#[test]
fn selections_and_across_fields() {
    let df = fixture();
    let filter = IssueFilter {
        courses: vec!["Course 1".to_string()],
        severities: vec![Severity::Low],
        ..IssueFilter::default()
    };
    let filtered = filter.apply(&df).expect("filter failed");

    assert_eq!(filtered.height(), 1);
    let ids = filtered.column("issue_id").unwrap();
    assert_eq!(ids.str().unwrap().get(0), Some("ISSUE-1006"));
}

#[test]
fn status_selection_uses_canonical_spellings() {
    let df = fixture();
    let filter = IssueFilter {
        statuses: vec![Status::InProgress],
        ..IssueFilter::default()
    };
    let filtered = filter.apply(&df).expect("filter failed");

    assert_eq!(filtered.height(), 1);
    let ids = filtered.column("issue_id").unwrap();
    assert_eq!(ids.str().unwrap().get(0), Some("ISSUE-1002"));
}

#[test]
fn multiple_selections_within_a_field_union() {
    let df = fixture();
    let filter = IssueFilter {
        statuses: vec![Status::Verified, Status::Closed],
        ..IssueFilter::default()
    };
    let filtered = filter.apply(&df).expect("filter failed");
    assert_eq!(filtered.height(), 2);
}

#[test]
fn search_is_case_insensitive_over_notes() {
    let df = fixture();
    let filter = IssueFilter {
        search: Some("BROKEN".to_string()),
        ..IssueFilter::default()
    };
    let filtered = filter.apply(&df).expect("filter failed");

    assert_eq!(filtered.height(), 1);
    let ids = filtered.column("issue_id").unwrap();
    assert_eq!(ids.str().unwrap().get(0), Some("ISSUE-1001"));
}

#[test]
fn search_ors_across_id_and_item_columns() {
    let df = fixture();
    // matches issue_id ISSUE-1003 even though no note contains it
    let filter = IssueFilter {
        search: Some("1003".to_string()),
        ..IssueFilter::default()
    };
    let filtered = filter.apply(&df).expect("filter failed");
    assert_eq!(filtered.height(), 1);

    // matches item ids
    let filter = IssueFilter {
        search: Some("item-1".to_string()),
        ..IssueFilter::default()
    };
    let filtered = filter.apply(&df).expect("filter failed");
    assert_eq!(filtered.height(), df.height());
}

#[test]
fn blank_search_is_no_restriction() {
    let df = fixture();
    let filter = IssueFilter {
        search: Some("   ".to_string()),
        ..IssueFilter::default()
    };
    let filtered = filter.apply(&df).expect("filter failed");
    assert!(df.equals(&filtered));
}

#[test]
fn filtering_twice_is_idempotent() {
    let df = fixture();
    let filter = IssueFilter {
        courses: vec!["Course 1".to_string(), "Course 2".to_string()],
        statuses: vec![Status::Open, Status::Fixed],
        ..IssueFilter::default()
    };
    let once = filter.apply(&df).expect("filter failed");
    let twice = filter.apply(&once).expect("filter failed");
    assert!(once.equals(&twice));
}

#[test]
fn empty_result_is_valid() {
    let df = fixture();
    let filter = IssueFilter {
        courses: vec!["Course 9".to_string()],
        ..IssueFilter::default()
    };
    let filtered = filter.apply(&df).expect("filter failed");
    assert_eq!(filtered.height(), 0);
}

#[test]
fn search_works_without_a_notes_column() {
    let csv = "\
issue_id,course_name,unit,item_id,item_type,status,severity,reporter,assignee,created_at,updated_at
ISSUE-1,Course 1,Unit 1,ITEM-1,Video,Open,Low,QA,Alex,2025-06-12 09:00:00,2025-06-12 09:00:00
";
    let df = load_issues(csv.as_bytes()).expect("load failed");
    let filter = IssueFilter {
        search: Some("issue-1".to_string()),
        ..IssueFilter::default()
    };
    let filtered = filter.apply(&df).expect("filter failed");
    assert_eq!(filtered.height(), 1);
}
