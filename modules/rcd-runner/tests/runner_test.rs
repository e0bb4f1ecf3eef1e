//! End-to-end runner behaviour against a recording in-memory admin service.

use std::collections::{HashMap, HashSet};
use std::io::Write;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rcd_runner::error::RemoteResult;
use rcd_runner::{
    run, InputError, InputRequest, OutcomeStatus, RemoteCallError, RemoteOperation, RunError,
    RunRequest, RunSummary, SiteAdmin, SiteState,
};

const ADMIN_URL: &str = "https://contoso-admin.sharepoint.com";
const TEST_SITE: &str = "https://contoso.sharepoint.com/sites/Test";

// ---------------------------------------------------------------------------
// Mock admin service
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
enum Call {
    Connect(String),
    Disconnect,
    GetSite(String),
    SetSiteFlag(String, bool),
    TriggerReport(bool),
    GetReport,
}

#[derive(Default)]
struct MockAdmin {
    calls: Mutex<Vec<Call>>,
    flags: Mutex<HashMap<String, bool>>,
    fail_set_for: HashSet<String>,
    fail_get_for: HashSet<String>,
    fail_connect: bool,
    fail_trigger: bool,
    report_text: String,
}

impl MockAdmin {
    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn set_calls(&self) -> Vec<(String, bool)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::SetSiteFlag(url, v) => Some((url, v)),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl SiteAdmin for MockAdmin {
    async fn connect(&mut self, admin_url: &str) -> RemoteResult<()> {
        self.record(Call::Connect(admin_url.to_string()));
        if self.fail_connect {
            return Err(RemoteCallError::new(RemoteOperation::Connect, "AADSTS7000215: invalid client secret"));
        }
        Ok(())
    }

    async fn disconnect(&mut self) -> RemoteResult<()> {
        self.record(Call::Disconnect);
        Ok(())
    }

    async fn get_site(&self, identity: &str) -> RemoteResult<SiteState> {
        self.record(Call::GetSite(identity.to_string()));
        if self.fail_get_for.contains(identity) {
            return Err(RemoteCallError::new(
                RemoteOperation::GetSite,
                "API error (status 503): server busy",
            ));
        }
        let restricted = self.flags.lock().unwrap().get(identity).copied().unwrap_or(false);
        let title = identity.rsplit('/').next().unwrap_or(identity).to_string();
        Ok(SiteState {
            title,
            url: identity.to_string(),
            restricted,
        })
    }

    async fn set_site_flag(&self, identity: &str, restricted: bool) -> RemoteResult<()> {
        self.record(Call::SetSiteFlag(identity.to_string(), restricted));
        if self.fail_set_for.contains(identity) {
            return Err(RemoteCallError::new(
                RemoteOperation::SetSiteFlag,
                "API error (status 404): site not found",
            ));
        }
        self.flags.lock().unwrap().insert(identity.to_string(), restricted);
        Ok(())
    }

    async fn trigger_discoverability_report(&self, force: bool) -> RemoteResult<()> {
        self.record(Call::TriggerReport(force));
        if self.fail_trigger {
            return Err(RemoteCallError::new(RemoteOperation::TriggerReport, "service unavailable"));
        }
        Ok(())
    }

    async fn get_discoverability_report(&self) -> RemoteResult<String> {
        self.record(Call::GetReport);
        Ok(self.report_text.clone())
    }
}

// ---------------------------------------------------------------------------
// Log capture
// ---------------------------------------------------------------------------

#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

fn capture_logs() -> (LogBuffer, tracing::subscriber::DefaultGuard) {
    let buffer = LogBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .finish();
    let guard = tracing::subscriber::set_default(subscriber);
    (buffer, guard)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn request(input: InputRequest) -> RunRequest {
    RunRequest {
        input,
        admin_url: ADMIN_URL.to_string(),
        disconnect: false,
    }
}

fn single_site(url: &str, set: bool) -> InputRequest {
    InputRequest {
        site_url: Some(url.to_string()),
        set_flag: set,
        clear_flag: !set,
        ..Default::default()
    }
}

fn sites_file(lines: &[&str]) -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sites.txt");
    let mut f = std::fs::File::create(&path).unwrap();
    for line in lines {
        writeln!(f, "{line}").unwrap();
    }
    (dir, path)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn no_sites_and_no_report_is_no_action_without_remote_calls() {
    let mut admin = MockAdmin::default();

    let report = run(&mut admin, &request(InputRequest::default())).await;

    assert!(matches!(
        report.error,
        Some(RunError::Input(InputError::NoActionSpecified))
    ));
    assert!(admin.calls().is_empty());
    assert_eq!(report.summary, RunSummary::default());
}

#[tokio::test]
async fn single_site_set_logs_status_line() {
    let (logs, _guard) = capture_logs();
    let mut admin = MockAdmin::default();

    let report = run(&mut admin, &request(single_site(TEST_SITE, true))).await;

    assert!(report.is_success());
    assert_eq!(admin.set_calls(), vec![(TEST_SITE.to_string(), true)]);
    assert_eq!(report.summary.processed, 1);
    assert_eq!(report.summary.removed, 0);
    assert_eq!(
        report.outcomes[0].status,
        OutcomeStatus::Applied {
            title: "Test".into(),
            restricted: true
        }
    );

    let out = logs.contents();
    assert!(out.contains(&format!(
        "Site: Test | URL: {TEST_SITE} | RestrictContentOrgWideSearch: True"
    )));
}

#[tokio::test]
async fn every_valid_site_is_set_once() {
    let urls: Vec<String> = (1..=5)
        .map(|i| format!("https://contoso.sharepoint.com/sites/S{i}"))
        .collect();
    let lines: Vec<&str> = urls.iter().map(String::as_str).collect();
    let (_dir, path) = sites_file(&lines);
    let mut admin = MockAdmin::default();

    let report = run(
        &mut admin,
        &request(InputRequest {
            input_file: Some(path),
            set_flag: true,
            ..Default::default()
        }),
    )
    .await;

    assert!(report.is_success());
    assert_eq!(report.summary.processed, 5);
    assert_eq!(report.summary.removed, 0);
    let sets = admin.set_calls();
    assert_eq!(sets.len(), 5);
    assert!(sets.iter().all(|(_, v)| *v));
    let order: Vec<&str> = sets.iter().map(|(u, _)| u.as_str()).collect();
    assert_eq!(order, lines);
}

#[tokio::test]
async fn blank_entries_are_skipped_without_remote_calls() {
    let (_dir, path) = sites_file(&[
        "https://contoso.sharepoint.com/sites/A",
        "",
        "   ",
        "https://contoso.sharepoint.com/sites/B",
    ]);
    let mut admin = MockAdmin::default();

    let report = run(
        &mut admin,
        &request(InputRequest {
            input_file: Some(path),
            clear_flag: true,
            ..Default::default()
        }),
    )
    .await;

    assert_eq!(report.summary.skipped, 2);
    assert_eq!(report.summary.removed, 2);
    assert_eq!(report.summary.processed, 0);
    assert_eq!(admin.set_calls().len(), 2);
    let skipped = report
        .outcomes
        .iter()
        .filter(|o| o.status == OutcomeStatus::Skipped)
        .count();
    assert_eq!(skipped, 2);
}

#[tokio::test]
async fn duplicate_entries_are_processed_independently() {
    let (_dir, path) = sites_file(&[TEST_SITE, TEST_SITE]);
    let mut admin = MockAdmin::default();

    let report = run(
        &mut admin,
        &request(InputRequest {
            input_file: Some(path),
            set_flag: true,
            ..Default::default()
        }),
    )
    .await;

    assert_eq!(report.summary.processed, 2);
    assert_eq!(admin.set_calls().len(), 2);
}

#[tokio::test]
async fn clearing_twice_is_idempotent() {
    let mut admin = MockAdmin::default();
    let req = request(single_site(TEST_SITE, false));

    for _ in 0..2 {
        let report = run(&mut admin, &req).await;
        assert!(report.is_success());
        assert_eq!(report.summary.removed, 1);
        assert_eq!(
            report.outcomes[0].status,
            OutcomeStatus::Applied {
                title: "Test".into(),
                restricted: false
            }
        );
    }
    assert_eq!(admin.set_calls().len(), 2);
}

#[tokio::test]
async fn failing_site_does_not_stop_the_batch() {
    let bad = "https://contoso.sharepoint.com/sites/Gone";
    let (_dir, path) = sites_file(&[
        "https://contoso.sharepoint.com/sites/A",
        bad,
        "https://contoso.sharepoint.com/sites/C",
    ]);
    let mut admin = MockAdmin {
        fail_set_for: HashSet::from([bad.to_string()]),
        ..Default::default()
    };
    let (logs, _guard) = capture_logs();

    let report = run(
        &mut admin,
        &request(InputRequest {
            input_file: Some(path),
            set_flag: true,
            ..Default::default()
        }),
    )
    .await;

    assert!(report.is_success());
    assert_eq!(report.summary.processed, 2);
    assert_eq!(report.summary.failed, 1);
    assert_eq!(admin.set_calls().len(), 3);
    assert!(!admin.calls().contains(&Call::GetSite(bad.to_string())));
    assert!(matches!(report.outcomes[1].status, OutcomeStatus::Failed { .. }));
    assert!(logs.contents().contains("site not found"));
}

#[tokio::test]
async fn failed_read_back_counts_as_failed_and_batch_continues() {
    let flaky = "https://contoso.sharepoint.com/sites/Flaky";
    let (_dir, path) = sites_file(&[
        "https://contoso.sharepoint.com/sites/A",
        flaky,
        "https://contoso.sharepoint.com/sites/C",
    ]);
    let mut admin = MockAdmin {
        fail_get_for: HashSet::from([flaky.to_string()]),
        ..Default::default()
    };
    let (logs, _guard) = capture_logs();

    let report = run(
        &mut admin,
        &request(InputRequest {
            input_file: Some(path),
            set_flag: true,
            ..Default::default()
        }),
    )
    .await;

    assert!(report.is_success());
    assert_eq!(report.summary.processed, 2);
    assert_eq!(report.summary.removed, 0);
    assert_eq!(report.summary.failed, 1);
    assert!(admin.calls().contains(&Call::SetSiteFlag(flaky.to_string(), true)));
    assert!(matches!(report.outcomes[1].status, OutcomeStatus::Failed { .. }));
    assert!(admin
        .calls()
        .contains(&Call::SetSiteFlag("https://contoso.sharepoint.com/sites/C".into(), true)));
    assert!(matches!(report.outcomes[2].status, OutcomeStatus::Applied { .. }));
    assert!(logs.contents().contains("server busy"));
}

#[tokio::test]
async fn missing_input_file_still_emits_summary() {
    let (logs, _guard) = capture_logs();
    let dir = tempfile::tempdir().unwrap();
    let mut admin = MockAdmin::default();

    let report = run(
        &mut admin,
        &request(InputRequest {
            input_file: Some(dir.path().join("missing.txt")),
            set_flag: true,
            ..Default::default()
        }),
    )
    .await;

    assert!(matches!(
        report.error,
        Some(RunError::Input(InputError::FileNotFound { .. }))
    ));
    assert_eq!(report.summary, RunSummary::default());
    assert!(admin.calls().is_empty());

    let out = logs.contents();
    assert!(out.contains("input file not found"));
    assert!(out.contains("Total sites processed: 0"));
    assert!(out.contains("Total sites removed: 0"));
}

#[tokio::test]
async fn report_only_triggers_then_reads_once() {
    let (logs, _guard) = capture_logs();
    let text = "Report Id: 7f3c\nStatus: Completed\nSites with RCD enabled: 12";
    let mut admin = MockAdmin {
        report_text: text.to_string(),
        ..Default::default()
    };

    let report = run(
        &mut admin,
        &request(InputRequest {
            generate_report: true,
            ..Default::default()
        }),
    )
    .await;

    assert!(report.is_success());
    assert_eq!(report.report.as_deref(), Some(text));
    assert_eq!(
        admin.calls(),
        vec![
            Call::Connect(ADMIN_URL.to_string()),
            Call::TriggerReport(true),
            Call::GetReport,
        ]
    );
    assert!(logs.contents().contains(text));
}

#[tokio::test]
async fn failed_trigger_skips_read_but_still_disconnects() {
    let mut admin = MockAdmin {
        fail_trigger: true,
        ..Default::default()
    };
    let mut req = request(InputRequest {
        generate_report: true,
        ..Default::default()
    });
    req.disconnect = true;

    let report = run(&mut admin, &req).await;

    match report.error {
        Some(RunError::Remote(e)) => assert_eq!(e.operation, RemoteOperation::TriggerReport),
        other => panic!("expected remote error, got {other:?}"),
    }
    assert!(!admin.calls().contains(&Call::GetReport));
    assert_eq!(admin.calls().last(), Some(&Call::Disconnect));
}

#[tokio::test]
async fn disconnect_only_when_requested() {
    let mut admin = MockAdmin::default();
    run(&mut admin, &request(single_site(TEST_SITE, true))).await;
    assert!(!admin.calls().contains(&Call::Disconnect));

    let mut admin = MockAdmin::default();
    let mut req = request(single_site(TEST_SITE, true));
    req.disconnect = true;
    run(&mut admin, &req).await;
    assert_eq!(admin.calls().last(), Some(&Call::Disconnect));
}

#[tokio::test]
async fn connect_failure_aborts_before_any_site() {
    let (logs, _guard) = capture_logs();
    let mut admin = MockAdmin {
        fail_connect: true,
        ..Default::default()
    };
    let mut req = request(single_site(TEST_SITE, true));
    req.disconnect = true;

    let report = run(&mut admin, &req).await;

    match report.error {
        Some(RunError::Remote(e)) => assert_eq!(e.operation, RemoteOperation::Connect),
        other => panic!("expected connect error, got {other:?}"),
    }
    assert_eq!(admin.calls(), vec![Call::Connect(ADMIN_URL.to_string())]);
    let out = logs.contents();
    assert!(out.contains("invalid client secret"));
    assert!(out.contains("Total sites processed: 0"));
}
