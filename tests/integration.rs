// SPDX-License-Identifier: MPL-2.0
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tempfile::tempdir;
use tokio::time::Instant;
use toastline::config::{self, Config, DurationSetting, NotificationSettings};
use toastline::diagnostics::{DiagnosticReport, DiagnosticsCollector, ToastEvent};
use toastline::notifications::{
    NotificationStore, Payload, PayloadPatch, Severity, Snapshot, ToastAction, ToastDuration,
};

fn titles(snapshot: &Snapshot) -> Vec<String> {
    snapshot
        .items
        .iter()
        .map(|toast| toast.payload().title().unwrap_or_default().to_string())
        .collect()
}

#[test]
fn test_store_built_from_saved_config() {
    let dir = tempdir().expect("Failed to create temporary directory");
    let path = dir.path().join("settings.toml");

    let saved = Config {
        notifications: NotificationSettings {
            capacity: Some(2),
            removal_delay_ms: Some(250),
            default_duration: Some(DurationSetting::Millis(400)),
        },
        ..Config::default()
    };
    config::save_to_path(&saved, &path).expect("Failed to write config file");
    let loaded = config::load_from_path(&path).expect("Failed to load config");
    assert_eq!(loaded, saved);

    let store = NotificationStore::new(loaded.store_config());
    let start = Instant::now();
    for title in ["one", "two", "three"] {
        store.enqueue_at(Payload::info(title), None, start);
    }
    assert_eq!(titles(&store.snapshot()), vec!["three", "two"]);

    store.tick_at(start + Duration::from_millis(400));
    assert_eq!(store.snapshot().open().count(), 0);

    store.tick_at(start + Duration::from_millis(650));
    assert!(store.is_empty());

    dir.close().expect("Failed to close temporary directory");
}

#[test]
fn test_infinite_default_duration_from_toml() {
    let dir = tempdir().expect("Failed to create temporary directory");
    let path = dir.path().join("settings.toml");
    std::fs::write(
        &path,
        "[notifications]\ncapacity = 3\ndefault_duration = \"infinite\"\n",
    )
    .expect("Failed to write config file");

    let store_config = config::load_from_path(&path)
        .expect("Failed to load config")
        .store_config();

    assert_eq!(store_config.capacity.value(), 3);
    assert_eq!(store_config.default_duration, ToastDuration::Infinite);

    let store = NotificationStore::new(store_config);
    let start = Instant::now();
    store.enqueue_at(Payload::error("Connection lost"), None, start);
    assert_eq!(store.tick_at(start + Duration::from_secs(3_600)), 0);
    assert_eq!(store.snapshot().open().count(), 1);
}

#[test]
fn test_subscriber_sees_every_step_of_a_progress_toast() {
    let store = NotificationStore::default();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let subscription = store.subscribe(move |snapshot| {
        let Some(toast) = snapshot.items.first() else {
            return;
        };
        sink.lock().unwrap().push((
            toast.payload().description().map(str::to_string),
            toast.payload().severity(),
            toast.is_open(),
        ));
    });

    let handle = store.toast(
        Payload::info("Exporting")
            .with_description("0%")
            .with_action(ToastAction::new("Cancel", "export.cancel")),
    );
    handle.update(PayloadPatch::new().description("50%"));
    handle.update(
        PayloadPatch::new()
            .description("done")
            .severity(Severity::Success),
    );
    handle.dismiss();
    store.clear();
    subscription.unsubscribe();

    assert_eq!(
        *seen.lock().unwrap(),
        vec![
            (Some("0%".to_string()), Severity::Info, true),
            (Some("50%".to_string()), Severity::Info, true),
            (Some("done".to_string()), Severity::Success, true),
            (Some("done".to_string()), Severity::Success, false),
        ]
    );
}

#[test]
fn test_diagnostics_export_after_session() {
    let dir = tempdir().expect("Failed to create temporary directory");
    let mut collector = DiagnosticsCollector::new(Config::default().buffer_capacity());
    let store = NotificationStore::with_diagnostics(
        Config::default().store_config(),
        collector.handle(),
    );

    let start = Instant::now();
    let id = store.enqueue_at(Payload::warning("Low disk space"), None, start);
    store.tick_at(start + Duration::from_millis(config::DEFAULT_DURATION_MS));
    store.tick_at(
        start
            + Duration::from_millis(config::DEFAULT_DURATION_MS + config::DEFAULT_REMOVAL_DELAY_MS),
    );
    collector.process_pending();

    let events: Vec<ToastEvent> = collector.toast_events().cloned().collect();
    assert_eq!(
        events,
        vec![
            ToastEvent::Enqueued {
                id,
                severity: Severity::Warning
            },
            ToastEvent::Expired { id },
            ToastEvent::Removed { id },
        ]
    );

    let path = collector
        .export_to_file(dir.path().join("diagnostics.json"))
        .expect("Failed to export diagnostics");
    let content = std::fs::read_to_string(path).expect("Failed to read export");
    let report: DiagnosticReport = serde_json::from_str(&content).expect("Invalid report JSON");
    assert_eq!(report.metadata.event_count, 3);
    assert_eq!(report.events.len(), 3);
}
