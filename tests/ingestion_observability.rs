use std::path::Path;
use std::sync::{Arc, Mutex};

use trade_ingest::IngestionError;
use trade_ingest::output::Layout;
use trade_ingest::pipeline::{
    CompositeObserver, IngestionContext, IngestionObserver, IngestionSeverity, IngestionStats,
    Pipeline, PipelineOptions, Stage,
};

#[derive(Default)]
struct RecordingObserver {
    successes: Mutex<Vec<IngestionStats>>,
    failures: Mutex<Vec<(Stage, IngestionSeverity)>>,
    alerts: Mutex<Vec<(Stage, IngestionSeverity)>>,
}

impl IngestionObserver for RecordingObserver {
    fn on_success(&self, _ctx: &IngestionContext, _destination: &Path, stats: IngestionStats) {
        self.successes.lock().unwrap().push(stats);
    }

    fn on_failure(
        &self,
        _ctx: &IngestionContext,
        stage: Stage,
        severity: IngestionSeverity,
        _error: &IngestionError,
    ) {
        self.failures.lock().unwrap().push((stage, severity));
    }

    fn on_alert(
        &self,
        _ctx: &IngestionContext,
        stage: Stage,
        severity: IngestionSeverity,
        _error: &IngestionError,
    ) {
        self.alerts.lock().unwrap().push((stage, severity));
    }
}

fn copy_fixture(layout: &Layout, category: &str, name: &str) -> std::path::PathBuf {
    let dir = layout.raw_dir().join(category);
    std::fs::create_dir_all(&dir).unwrap();
    let dest = dir.join(name);
    std::fs::copy(Path::new("tests/fixtures").join(name), &dest).unwrap();
    dest
}

#[test]
fn success_reports_row_accounting() {
    let tmp = tempfile::tempdir().unwrap();
    let layout = Layout::new(tmp.path());
    let src = copy_fixture(&layout, "finance", "gov_finance_2021.csv");
    let obs = Arc::new(RecordingObserver::default());

    Pipeline::new(layout).with_observer(obs.clone()).ingest(&src);

    let successes = obs.successes.lock().unwrap().clone();
    assert_eq!(
        successes,
        vec![IngestionStats {
            rows_in: 5,
            rows_out: 3,
            coercion_failures: 1,
        }]
    );
}

#[test]
fn missing_source_is_a_load_failure_without_alert() {
    let tmp = tempfile::tempdir().unwrap();
    let layout = Layout::new(tmp.path());
    let obs = Arc::new(RecordingObserver::default());

    let missing = layout.raw_dir().join("world").join("exports.csv");
    Pipeline::new(layout).with_observer(obs.clone()).ingest(&missing);

    assert_eq!(
        *obs.failures.lock().unwrap(),
        vec![(Stage::Load, IngestionSeverity::Error)]
    );
    assert!(obs.alerts.lock().unwrap().is_empty());
}

#[test]
fn unwritable_destination_raises_a_critical_alert() {
    let tmp = tempfile::tempdir().unwrap();
    let layout = Layout::new(tmp.path());
    let src = copy_fixture(&layout, "finance", "gov_finance_2021.csv");
    // A plain file where the cleaned/ directory should be.
    std::fs::write(layout.cleaned_dir(), "not a directory").unwrap();
    let obs = Arc::new(RecordingObserver::default());

    let result = Pipeline::new(layout)
        .with_observer(obs.clone())
        .with_options(PipelineOptions::default())
        .ingest(&src);

    assert!(result.is_failed());
    assert_eq!(
        *obs.alerts.lock().unwrap(),
        vec![(Stage::Persist, IngestionSeverity::Critical)]
    );
    assert!(obs.failures.lock().unwrap().is_empty());
}

#[test]
fn composite_fans_out_to_every_observer() {
    let tmp = tempfile::tempdir().unwrap();
    let layout = Layout::new(tmp.path());
    let src = copy_fixture(&layout, "world", "exports_missing_year.csv");
    let a = Arc::new(RecordingObserver::default());
    let b = Arc::new(RecordingObserver::default());
    let composite = CompositeObserver::new(vec![
        a.clone() as Arc<dyn IngestionObserver>,
        b.clone() as Arc<dyn IngestionObserver>,
    ]);

    Pipeline::new(layout)
        .with_observer(Arc::new(composite))
        .ingest(&src);

    for obs in [&a, &b] {
        assert_eq!(
            *obs.failures.lock().unwrap(),
            vec![(Stage::Transform, IngestionSeverity::Warning)]
        );
    }
}
