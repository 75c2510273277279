//! Full comparisons over DQM-shaped files written to a temp directory.

use std::path::{Path, PathBuf};

use dqm_compare::pipeline::{self, CompareContext, Outcome};
use dqm_compare::{DqmConfig, select};
use dqm_root::fixture::{FixtureFile, HistSpec};

fn run_dir(run: &str) -> String {
    format!("DQMData/Run {run}/RPC/Run summary")
}

fn write_pair(dir: &Path) -> (PathBuf, PathBuf) {
    let mut cur = FixtureFile::new();
    let base = run_dir("339500");
    cur.add_th1f(
        &format!("{base}/AllHits/Barrel/RPCEvents/Occupancy_W+0_RB1_S01"),
        HistSpec::uniform("Occupancy_W+0_RB1_S01", vec![10.0, 40.0, 80.0, 40.0, 10.0], 0.5, 5.5),
    );
    cur.add_th1f(
        &format!("{base}/AllHits/Barrel/Occupancy_W-1_RB2_S05"),
        HistSpec::uniform("Occupancy_W-1_RB2_S05", vec![1.0, 2.0], 0.0, 2.0),
    );
    cur.add_th1f(
        &format!("{base}/AllHits/Endcap/BXDistribution_Disk-1_RE1_R2_CH05"),
        HistSpec::uniform("BXDistribution_Disk-1_RE1_R2_CH05", vec![3.0, 4.0, 3.0], -1.5, 1.5),
    );
    cur.add_th1f(
        &format!("{base}/AllHits/Barrel/BadName"),
        HistSpec::uniform("BadName", vec![1.0], 0.0, 1.0),
    );
    cur.add_th1f(
        &format!("{base}/AllHits/SummaryHistogram/Occupancy_W1_RB1_S01"),
        HistSpec::uniform("Occupancy_W1_RB1_S01", vec![1.0], 0.0, 1.0),
    );
    cur.add_th1f(
        &format!("{base}/Noise/Occupancy_W0_RB1_S02"),
        HistSpec::uniform("Occupancy_W0_RB1_S02", vec![1.0], 0.0, 1.0),
    );

    let mut reference = FixtureFile::new();
    let base = run_dir("339400");
    reference.add_th1f(
        &format!("{base}/AllHits/Barrel/RPCEvents/Occupancy_W+0_RB1_S01"),
        HistSpec::uniform("Occupancy_W+0_RB1_S01", vec![12.0, 38.0, 85.0, 35.0, 11.0], 0.5, 5.5),
    );
    reference.add_th1f(
        &format!("{base}/AllHits/Endcap/BXDistribution_Disk-1_RE1_R2_CH05"),
        HistSpec::uniform("BXDistribution_Disk-1_RE1_R2_CH05", vec![3.0, 4.0, 3.0, 1.0], -1.5, 2.5),
    );

    let cur_path = dir.join("DQM_V0001_R000339500.root");
    let ref_path = dir.join("DQM_V0001_R000339400.root");
    cur.write_to(&cur_path).unwrap();
    reference.write_to(&ref_path).unwrap();
    (cur_path, ref_path)
}

#[test]
fn compares_selected_histograms() {
    let tmp = tempfile::tempdir().unwrap();
    let (cur, reference) = write_pair(tmp.path());
    let images = tmp.path().join("images");

    let config = DqmConfig::default();
    let ctx = CompareContext::open(&cur, &reference, None, None, &config)
        .unwrap()
        .with_images_dir(&images);
    assert_eq!(ctx.run.as_str(), "339500");
    assert_eq!(ctx.ref_run.as_str(), "339400");

    let paths = select::select(&ctx.current, &config.selection);
    assert_eq!(paths.len(), 4, "{paths:#?}");
    assert!(paths.iter().all(|p| p.contains("AllHits/") && !p.contains("SummaryHistogram")));

    let table = pipeline::run(&ctx, &paths);
    assert_eq!(table.len(), 4);

    let p = table
        .get("W0_RB1_S01_Occupancy")
        .and_then(Outcome::score)
        .expect("score for W0_RB1_S01_Occupancy");
    assert!((0.0..=1.0).contains(&p), "p = {p}");
    assert!(images.join("W0_RB1_S01/W0_RB1_S01_Occupancy.png").is_file());
    assert!(images.join("W0_RB1_S01/W0_RB1_S01_Occupancy.pdf").is_file());

    // Missing in the reference file.
    let Some(Outcome::Failed { error }) = table.get("W-1_RB2_S05_Occupancy") else {
        panic!("expected a failure entry");
    };
    assert!(error.contains("not found"), "{error}");

    let Some(Outcome::Failed { error }) = table.get("Disk-1_RE1_SR2_BXDistribution") else {
        panic!("expected a binning failure");
    };
    assert!(error.contains("incompatible binning"), "{error}");

    // Unclassifiable names are keyed by their path.
    let bad = paths.iter().find(|p| p.ends_with("/BadName")).unwrap();
    assert!(matches!(table.get(bad), Some(Outcome::Failed { .. })));
    assert_eq!(table.n_failed(), 3);
}

#[test]
fn scores_file_round_trips_through_json() {
    let tmp = tempfile::tempdir().unwrap();
    let (cur, reference) = write_pair(tmp.path());
    let config = DqmConfig::default();
    let ctx = CompareContext::open(&cur, &reference, None, None, &config).unwrap().without_plots();

    let table = pipeline::run(&ctx, &select::select(&ctx.current, &config.selection));
    let out = tmp.path().join("ks_probs.json");
    table.write_json(&out).unwrap();

    let v: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert!(v["W0_RB1_S01_Occupancy"].is_f64());
    assert!(v["W-1_RB2_S05_Occupancy"]["error"].is_string());
    assert!(!tmp.path().join("images").exists());
}

#[test]
fn same_table_for_any_thread_count() {
    let tmp = tempfile::tempdir().unwrap();
    let (cur, reference) = write_pair(tmp.path());
    let config = DqmConfig::default();
    let ctx = CompareContext::open(&cur, &reference, None, None, &config).unwrap().without_plots();
    let paths = select::select(&ctx.current, &config.selection);

    let pool = |n| rayon::ThreadPoolBuilder::new().num_threads(n).build().unwrap();
    let serial = pool(1).install(|| pipeline::run(&ctx, &paths));
    let parallel = pool(4).install(|| pipeline::run(&ctx, &paths));
    assert_eq!(serial, parallel);
}

#[test]
fn explicit_run_ids_override_file_names() {
    let tmp = tempfile::tempdir().unwrap();
    let (cur, reference) = write_pair(tmp.path());
    let renamed = tmp.path().join("current.root");
    std::fs::rename(&cur, &renamed).unwrap();

    let config = DqmConfig::default();
    assert!(CompareContext::open(&renamed, &reference, None, None, &config).is_err());

    let run = dqm_compare::RunId::parse("339500").unwrap();
    let ctx = CompareContext::open(&renamed, &reference, Some(run), None, &config).unwrap();
    assert_eq!(ctx.run.as_str(), "339500");
}

#[test]
fn empty_chamber_scores_zero() {
    let tmp = tempfile::tempdir().unwrap();
    let mut paths = Vec::new();
    for (run, file) in [("339500", "DQM_V0001_R000339500.root"), ("339400", "DQM_V0001_R000339400.root")] {
        let mut fx = FixtureFile::new();
        fx.add_th1f(
            &format!("{}/AllHits/Barrel/Occupancy_W1_RB1_S01", run_dir(run)),
            HistSpec::uniform("Occupancy_W1_RB1_S01", vec![0.0; 4], 0.5, 4.5),
        );
        let path = tmp.path().join(file);
        fx.write_to(&path).unwrap();
        paths.push(path);
    }

    let config = DqmConfig::default();
    let ctx = CompareContext::open(&paths[0], &paths[1], None, None, &config)
        .unwrap()
        .with_images_dir(tmp.path().join("images"));
    let table = pipeline::run(&ctx, &select::select(&ctx.current, &config.selection));

    assert_eq!(table.get("W1_RB1_S01_Occupancy"), Some(&Outcome::Score(0.0)));
    assert_eq!(table.n_failed(), 0);
    assert!(tmp.path().join("images/W1_RB1_S01/W1_RB1_S01_Occupancy.png").is_file());
}
