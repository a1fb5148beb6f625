use std::fs;
use std::path::Path;
use std::thread;
use std::time::Duration;

use trade_ingest::app::App;
use trade_ingest::config::Config;
use trade_ingest::pipeline::{Outcome, RunManifest};

fn stage(root: &Path, category: &str, fixture: &str) {
    let dir = root.join("raw").join(category);
    fs::create_dir_all(&dir).unwrap();
    fs::copy(Path::new("tests/fixtures").join(fixture), dir.join(fixture)).unwrap();
}

#[test]
fn batch_run_writes_outputs_and_a_manifest() {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path();
    stage(root, "world", "raw_data_Total Goods Exports to World 2024.csv");
    stage(root, "new_york", "retail_sales_2024.csv");
    stage(root, "misc", "notes.csv");

    let config = Config::load(root).unwrap();
    let app = App::new(root, config);
    let manifest = app.run_batch();

    assert_eq!(manifest.count(Outcome::Success), 2);
    assert_eq!(manifest.count(Outcome::Skipped), 1);
    assert!(
        root.join("cleaned/world_trade/Total Goods Exports to World 2024_cleaned.csv")
            .is_file()
    );
    assert!(root.join("cleaned/sales/retail_sales_2024_cleaned.csv").is_file());

    let manifests: Vec<_> = fs::read_dir(root.join("manifests"))
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect();
    assert_eq!(manifests.len(), 1);
    assert_eq!(RunManifest::read_from(&manifests[0]).unwrap(), manifest);
}

#[test]
fn archive_setting_from_config_file_moves_sources() {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path();
    stage(root, "finance", "gov_finance_2021.csv");
    fs::write(root.join("ingest.toml"), "archive = true\n").unwrap();

    let app = App::new(root, Config::load(root).unwrap());
    let manifest = app.run_batch();

    assert_eq!(manifest.count(Outcome::Success), 1);
    assert!(!root.join("raw/finance/gov_finance_2021.csv").exists());
    assert!(root.join("archive/finance/gov_finance_2021.csv").is_file());
}

#[test]
fn empty_root_is_a_clean_no_op() {
    let tmp = tempfile::tempdir().unwrap();
    let app = App::new(tmp.path(), Config::default());

    let manifest = app.run_batch();

    assert!(manifest.entries.is_empty());
    assert!(tmp.path().join("raw").is_dir());
    assert!(!tmp.path().join("manifests").exists());
}

#[test]
fn watch_ingests_existing_files_then_new_arrivals_once() {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path().to_path_buf();
    stage(&root, "world", "raw_data_Total Goods Exports to World 2024.csv");
    fs::write(
        root.join("ingest.toml"),
        "mode = \"watch\"\n[watch]\npoll_interval_ms = 10\nsettle_delay_ms = 50\n",
    )
    .unwrap();

    let app = App::new(&root, Config::load(&root).unwrap());
    let arrival_root = root.clone();
    // Drop the new file only once the initial batch has written its manifest.
    let writer = thread::spawn(move || {
        for _ in 0..500 {
            if arrival_root.join("manifests").is_dir() {
                break;
            }
            thread::sleep(Duration::from_millis(20));
        }
        stage(&arrival_root, "finance", "gov_finance_2021.csv");
    });

    let mut events = app.watch();
    let manifest = events.next().unwrap();
    writer.join().unwrap();

    assert_eq!(manifest.entries.len(), 1);
    assert!(manifest.entries[0].source.ends_with("gov_finance_2021.csv"));
    assert_eq!(manifest.entries[0].outcome, Outcome::Success);
    assert!(root.join("cleaned/world_trade").is_dir());
    assert!(root.join("cleaned/revenue/gov_finance_2021_cleaned.csv").is_file());
}
