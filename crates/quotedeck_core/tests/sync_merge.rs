use quotedeck_core::db::open_db_in_memory;
use quotedeck_core::{
    spawn_sync_scheduler, sync_once, KvRepository, LogNotifier, Notice, Notifier, Quote,
    QuoteService, RemoteQuoteSource, SqliteKvRepository, SyncError,
};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

struct MockSource {
    quotes: Vec<Quote>,
    fail: bool,
}

impl MockSource {
    fn serving(quotes: Vec<Quote>) -> Self {
        Self {
            quotes,
            fail: false,
        }
    }

    fn failing() -> Self {
        Self {
            quotes: vec![],
            fail: true,
        }
    }
}

impl RemoteQuoteSource for MockSource {
    fn fetch_quotes(&self) -> Result<Vec<Quote>, SyncError> {
        if self.fail {
            return Err(SyncError::Decode("mock outage".to_string()));
        }
        Ok(self.quotes.clone())
    }
}

#[derive(Default)]
struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        self.messages.lock().unwrap().push(notice.message);
    }
}

fn server_quote(text: &str) -> Quote {
    Quote {
        text: text.to_string(),
        category: "Server".to_string(),
    }
}

fn service_with(raw: &str) -> QuoteService<SqliteKvRepository> {
    let conn = open_db_in_memory().expect("in-memory db should open");
    let repo = SqliteKvRepository::try_new(conn).expect("repo should accept bootstrapped conn");
    repo.set("quotes", raw).unwrap();
    QuoteService::load(repo).expect("service should load")
}

#[test]
fn merge_appends_only_texts_absent_before_the_merge() {
    let mut service = service_with(r#"[{"text":"A","category":"Life"}]"#);

    let report = service
        .merge_remote(vec![server_quote("A"), server_quote("B")])
        .unwrap();

    assert_eq!(report.candidates, 2);
    assert_eq!(report.merged, 1);
    assert_eq!(service.len(), 2);
    assert_eq!(service.quotes()[1], server_quote("B"));
}

#[test]
fn merge_with_only_known_texts_changes_nothing() {
    let mut service = service_with(r#"[{"text":"A","category":"Life"}]"#);

    let report = service.merge_remote(vec![server_quote("A")]).unwrap();

    assert_eq!(report.merged, 0);
    assert!(!report.has_changes());
    assert_eq!(service.len(), 1);
}

#[test]
fn duplicate_candidates_in_one_round_both_merge() {
    // The dedup check runs against the pre-merge snapshot only, so two
    // identical candidates in the same round both land.
    let mut service = service_with("[]");

    let report = service
        .merge_remote(vec![server_quote("A"), server_quote("A")])
        .unwrap();

    assert_eq!(report.merged, 2);
    assert_eq!(service.len(), 2);
}

#[test]
fn sync_once_merges_and_reports_through_notices() {
    let mut service = service_with(r#"[{"text":"A","category":"Life"}]"#);
    let source = MockSource::serving(vec![server_quote("A"), server_quote("B")]);
    let notifier = RecordingNotifier::default();

    let report = sync_once(&mut service, &source, &notifier).unwrap();

    assert_eq!(report.merged, 1);
    assert_eq!(
        notifier.messages(),
        vec![
            "Syncing quotes with server...".to_string(),
            "Synced 1 new quote(s) from server.".to_string(),
        ]
    );
}

#[test]
fn sync_once_with_no_new_quotes_reports_no_updates() {
    let mut service = service_with(r#"[{"text":"A","category":"Life"}]"#);
    let source = MockSource::serving(vec![server_quote("A")]);
    let notifier = RecordingNotifier::default();

    sync_once(&mut service, &source, &notifier).unwrap();

    assert_eq!(
        notifier.messages(),
        vec![
            "Syncing quotes with server...".to_string(),
            "No new updates from server.".to_string(),
        ]
    );
}

#[test]
fn sync_failure_leaves_collection_untouched() {
    let mut service = service_with(r#"[{"text":"A","category":"Life"}]"#);
    let source = MockSource::failing();
    let notifier = RecordingNotifier::default();

    let err = sync_once(&mut service, &source, &notifier).unwrap_err();

    assert!(matches!(err, SyncError::Decode(_)));
    assert_eq!(service.len(), 1);
    assert_eq!(
        notifier.messages(),
        vec![
            "Syncing quotes with server...".to_string(),
            "Failed to sync with server.".to_string(),
        ]
    );
}

#[test]
fn scheduler_merges_an_immediate_round_through_the_shared_handle() {
    let service = Arc::new(Mutex::new(service_with(
        r#"[{"text":"A","category":"Life"}]"#,
    )));
    let source = MockSource::serving(vec![server_quote("B")]);

    // Interval far beyond the test's lifetime: only the immediate first
    // round can be responsible for the merge.
    spawn_sync_scheduler(
        Arc::clone(&service),
        source,
        LogNotifier,
        Duration::from_secs(3600),
    );

    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        {
            let service = service.lock().unwrap();
            if service.quotes().contains(&server_quote("B")) {
                assert_eq!(service.len(), 2);
                return;
            }
        }
        assert!(
            Instant::now() < deadline,
            "immediate sync round did not merge in time"
        );
        std::thread::sleep(Duration::from_millis(20));
    }
}

#[test]
fn merged_quotes_survive_a_reload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("quotedeck.db");

    {
        let repo =
            SqliteKvRepository::try_new(quotedeck_core::db::open_db(&path).unwrap()).unwrap();
        let mut service = QuoteService::load(repo).unwrap();
        let report = service.merge_remote(vec![server_quote("fresh")]).unwrap();
        assert_eq!(report.merged, 1);
    }

    let repo = SqliteKvRepository::try_new(quotedeck_core::db::open_db(&path).unwrap()).unwrap();
    let service = QuoteService::load(repo).unwrap();
    assert!(service.quotes().contains(&server_quote("fresh")));
}
