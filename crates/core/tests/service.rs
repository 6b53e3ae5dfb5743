mod support;

use std::sync::Arc;

use chrono::{Duration, NaiveDate, TimeZone, Utc};
use rostersync_core::{RosterReading, RosterSyncService, RunOutcome, StageOutcome};
use rostersync_domain::{AppConfig, EventTiming, RosterError};
use support::calendar::MockCalendarGateway;
use support::ocr::MockOcr;
use support::{july_2025_tokens, roster_rows, tokens_for_rows};

const USER: &str = "U1234";

fn service(ocr: MockOcr, gateway: &MockCalendarGateway) -> RosterSyncService {
    RosterSyncService::new(Arc::new(ocr), Arc::new(gateway.clone()), &AppConfig::default()).unwrap()
}

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 7, d).unwrap()
}

fn full_july() -> Vec<&'static str> {
    let week = ["BC", "BC", "DB", "DB", "JB", "OFF", "OFF"];
    week.iter().cycle().take(31).copied().collect()
}

#[tokio::test]
async fn blank_image_is_no_text() {
    let gateway = MockCalendarGateway::new();
    let service = service(MockOcr::blank(), &gateway);

    let outcome = service.process_image(USER, b"png").await.unwrap();

    assert_eq!(outcome, RunOutcome::NoText);
    assert!(gateway.calls().is_empty());
}

#[tokio::test]
async fn reads_full_month_from_word_boxes() {
    let days = full_july();
    let service = service(MockOcr::new(july_2025_tokens(&days)), &MockCalendarGateway::new());

    let RosterReading::Parsed(roster) = service.read_roster(b"png").await.unwrap() else {
        panic!("expected a parsed roster");
    };

    assert_eq!(roster.month().to_string(), "2025-07");
    assert_eq!(roster.extraction.first_weekday, 1);
    assert_eq!(roster.drafts.len(), 31);
    assert_eq!(roster.drafts[&day(1)].summary.as_str(), "BC");
    assert_eq!(roster.drafts[&day(6)].summary.as_str(), "OFF");
    assert!(roster.drafts[&day(6)].timing.is_all_day());
}

#[tokio::test]
async fn split_code_tokens_are_rejoined() {
    // OCR split "11FBC" into two words
    let mut cells = vec!["OFF", "11F BC"];
    cells.extend(["BC"; 4]);
    let service = service(
        MockOcr::new(tokens_for_rows(&roster_rows(7, 2025, &cells))),
        &MockCalendarGateway::new(),
    );

    let RosterReading::Parsed(roster) = service.read_roster(b"png").await.unwrap() else {
        panic!("expected a parsed roster");
    };

    assert_eq!(roster.drafts[&day(1)].summary.as_str(), "11FBC");
}

#[tokio::test]
async fn process_image_syncs_and_is_idempotent() {
    let gateway = MockCalendarGateway::new();
    let service = service(MockOcr::new(july_2025_tokens(&full_july())), &gateway);

    let RunOutcome::Synced { report, .. } = service.process_image(USER, b"png").await.unwrap() else {
        panic!("expected a sync");
    };
    assert_eq!(report.created, 31);

    let RunOutcome::Synced { report, .. } = service.process_image(USER, b"png").await.unwrap() else {
        panic!("expected a sync");
    };
    assert_eq!(report.unchanged, 31);
    assert_eq!(report.writes(), 0);
    assert_eq!(gateway.managed_on(day(15)).len(), 1);
}

#[tokio::test]
async fn missing_header_is_an_error() {
    let rows = vec!["剩餘年假".to_string(), "BC DB".to_string()];
    let service = service(MockOcr::new(tokens_for_rows(&rows)), &MockCalendarGateway::new());

    let err = service.process_image(USER, b"png").await.unwrap_err();

    assert!(matches!(err, RosterError::HeaderNotFound(_)));
    assert!(err.is_roster_content());
}

#[tokio::test]
async fn ocr_failure_propagates() {
    let gateway = MockCalendarGateway::new();
    let service = service(MockOcr::failing(RosterError::Ocr("quota".into())), &gateway);

    let err = service.read_roster(b"png").await.unwrap_err();

    assert_eq!(err, RosterError::Ocr("quota".into()));
}

#[tokio::test]
async fn staged_roster_is_synced_on_confirm() {
    let gateway = MockCalendarGateway::new();
    let service = service(MockOcr::new(july_2025_tokens(&["BC", "DB", "JB"])), &gateway);
    let now = Utc.with_ymd_and_hms(2025, 6, 28, 12, 0, 0).unwrap();

    let StageOutcome::Staged { expires_at, .. } =
        service.stage_image(USER, b"png", now).await.unwrap()
    else {
        panic!("expected a staged roster");
    };
    assert_eq!(expires_at, now + Duration::minutes(10));
    assert!(gateway.calls().is_empty());

    let (roster, report) = service.confirm(USER, now + Duration::minutes(3)).await.unwrap();

    assert_eq!(roster.drafts.len(), 3);
    assert_eq!(report.created, 3);
    match &gateway.managed_on(day(3))[0].timing {
        EventTiming::Timed { start, .. } => {
            assert_eq!(start.to_rfc3339(), "2025-07-03T16:00:00+08:00");
        }
        other => panic!("expected timed event, got {other:?}"),
    }
}

#[tokio::test]
async fn confirm_without_pending_is_not_found() {
    let service = service(MockOcr::blank(), &MockCalendarGateway::new());

    let err = service.confirm(USER, Utc::now()).await.unwrap_err();

    assert!(matches!(err, RosterError::NotFound(_)));
}

#[tokio::test]
async fn expired_stage_cannot_be_confirmed() {
    let gateway = MockCalendarGateway::new();
    let service = service(MockOcr::new(july_2025_tokens(&["BC"])), &gateway);
    let now = Utc.with_ymd_and_hms(2025, 6, 28, 12, 0, 0).unwrap();

    service.stage_image(USER, b"png", now).await.unwrap();
    let err = service.confirm(USER, now + Duration::minutes(11)).await.unwrap_err();

    assert!(matches!(err, RosterError::NotFound(_)));
    assert_eq!(gateway.write_count(), 0);
}

#[tokio::test]
async fn cancel_discards_staged_roster() {
    let service = service(MockOcr::new(july_2025_tokens(&["BC"])), &MockCalendarGateway::new());
    let now = Utc::now();

    service.stage_image(USER, b"png", now).await.unwrap();

    assert!(service.cancel(USER));
    assert!(!service.cancel(USER));
    assert!(service.confirm(USER, now).await.is_err());
}

#[tokio::test]
async fn concurrent_runs_for_same_month_do_not_duplicate() {
    let gateway = MockCalendarGateway::new();
    let service = Arc::new(service(MockOcr::new(july_2025_tokens(&full_july())), &gateway));

    let a = {
        let service = Arc::clone(&service);
        tokio::spawn(async move { service.process_image(USER, b"png").await })
    };
    let b = {
        let service = Arc::clone(&service);
        tokio::spawn(async move { service.process_image(USER, b"png").await })
    };
    a.await.unwrap().unwrap();
    b.await.unwrap().unwrap();

    for d in 1..=31 {
        assert_eq!(gateway.managed_on(day(d)).len(), 1, "day {d}");
    }
}
