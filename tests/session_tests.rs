use polypad::engine::engine::engine::{RunEvent, RunOutcome};
use polypad::engine::live::live::EvalLimits;
use polypad::language::registry::registry::LanguageId;
use polypad::session::session::session::Session;
use polypad::transfer::upload::upload::{read_text, spawn_upload};
use polypad::util::error::error::{EngineError, TransferError};
use std::fs;
use std::time::Duration;
use tempfile::TempDir;
use tokio::sync::mpsc;

#[test]
fn language_switch_then_run_python_is_simulated() {
    let mut session = Session::default();
    session.set_language(LanguageId::Python);
    assert_eq!(session.document().text(), LanguageId::Python.starter_text());

    session.run().unwrap();
    let first = session.transcript().text().to_string();
    assert!(first.contains("simulated"));
    assert!(first.ends_with("Sample output:\nHello, World!\nSum: 8\n"));

    session.set_text("print('something else')");
    session.run().unwrap();
    assert_eq!(session.transcript().text(), first);
}

#[test]
fn javascript_console_and_faults() {
    let mut session = Session::default();
    session.set_text("console.log(1+1)");
    session.run().unwrap();
    assert_eq!(session.transcript().text(), "2\n");

    session.set_text("console.log('before'); throw new Error('x')");
    session.run().unwrap();
    assert_eq!(session.transcript().text(), "before\nError: x\n");
}

#[test]
fn javascript_starter_runs_for_real() {
    let mut session = Session::default();
    session.run().unwrap();
    assert_eq!(session.transcript().text(), "Hello, World!\nSum: 8\n");
}

#[tokio::test]
async fn upload_then_download_round_trip_on_disk() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("input.ts");
    fs::write(&source, "test-content").unwrap();

    let mut session = Session::new(LanguageId::Java, Default::default());
    session.apply_upload(read_text(&source).await).unwrap();
    assert_eq!(session.document().text(), "test-content");
    assert_eq!(session.language(), LanguageId::Java);

    let saved = session.download_to(dir.path()).unwrap();
    assert_eq!(saved.file_name().unwrap(), "code.java");
    assert_eq!(fs::read(&saved).unwrap(), b"test-content");
}

#[tokio::test]
async fn undecodable_upload_keeps_document() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("bad.js");
    fs::write(&source, [0xffu8, 0xfe, 0x00, 0x41]).unwrap();

    let mut session = Session::default();
    session.set_text("original");
    let err = session.apply_upload(read_text(&source).await).unwrap_err();
    assert!(matches!(err, TransferError::Decode { .. }));
    assert_eq!(session.document().text(), "original");
}

#[tokio::test]
async fn upload_without_selection_sends_nothing() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let started = spawn_upload(&tokio::runtime::Handle::current(), None, tx);
    assert!(!started);
    assert!(rx.recv().await.is_none());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn second_run_is_rejected_while_first_is_in_flight() {
    // Spins until the timeout, so the first run is still busy for every check.
    let limits = EvalLimits {
        timeout: Some(Duration::from_secs(3)),
        memory_limit: None,
    };
    let mut session = Session::new(LanguageId::JavaScript, limits);
    session.set_text("console.log('start'); while (true) {}");

    let (tx, mut rx) = mpsc::unbounded_channel();
    let handle = tokio::runtime::Handle::current();
    let run = session.start_run(&handle, tx.clone()).unwrap();
    assert!(session.is_running());
    assert!(matches!(
        session.start_run(&handle, tx.clone()),
        Err(EngineError::AlreadyRunning)
    ));
    assert!(matches!(session.run(), Err(EngineError::AlreadyRunning)));

    while let Some(event) = rx.recv().await {
        let finished = matches!(event, RunEvent::Finished { .. });
        if let RunEvent::Finished { outcome, .. } = &event {
            assert!(matches!(outcome, RunOutcome::Faulted(_)));
        }
        assert_eq!(event.run(), run);
        session.apply_run_event(event);
        if finished {
            break;
        }
    }
    assert!(!session.is_running());
    let transcript = session.transcript().text();
    assert!(transcript.starts_with("start\nError: "), "{transcript}");

    session.set_text("console.log('again')");
    session.run().unwrap();
    assert_eq!(session.transcript().text(), "again\n");
}
