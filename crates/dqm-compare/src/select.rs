//! Leaf enumeration and histogram selection.

use dqm_root::{RootFile, WalkEntry};

use crate::config::SelectionConfig;

/// Every leaf of `file` whose bare name does not start with one of
/// `skip_prefixes`.
///
/// Lazy and depth-first. Directories are always descended whatever their
/// name; only leaves are filtered.
pub fn leaves<'a>(
    file: &'a RootFile,
    skip_prefixes: &'a [String],
) -> impl Iterator<Item = WalkEntry> + 'a {
    file.walk().filter(move |e| !is_skipped_leaf(&e.key.name, skip_prefixes))
}

pub fn is_skipped_leaf(name: &str, skip_prefixes: &[String]) -> bool {
    skip_prefixes.iter().any(|p| name.starts_with(p.as_str()))
}

/// Whether a walked leaf is one we compare.
pub fn is_selected(entry: &WalkEntry, selection: &SelectionConfig) -> bool {
    selection.classes.iter().any(|c| *c == entry.key.class_name)
        && entry.path.contains(selection.require.as_str())
        && !selection.exclude.iter().any(|x| entry.path.contains(x.as_str()))
}

/// Full paths of the histograms to compare, in walk order.
pub fn select(file: &RootFile, selection: &SelectionConfig) -> Vec<String> {
    let mut seen = 0usize;
    let paths: Vec<String> = leaves(file, &selection.skip_prefixes)
        .inspect(|_| seen += 1)
        .filter(|e| is_selected(e, selection))
        .map(|e| e.path)
        .collect();
    tracing::info!(leaves = seen, selected = paths.len(), "histograms selected");
    paths
}

#[cfg(test)]
mod tests {
    use super::*;
    use dqm_root::fixture::{FixtureFile, HistSpec};

    fn h(name: &str) -> HistSpec {
        HistSpec::uniform(name, vec![1.0, 2.0], 0.0, 2.0)
    }

    fn file() -> RootFile {
        let base = "DQMData/Run 339500/RPC/Run summary";
        let mut fx = FixtureFile::new();
        fx.add_th1f(&format!("{base}/AllHits/Barrel/Occupancy_W0_RB1_S01"), h("Occupancy_W0_RB1_S01"));
        fx.add_th1d(&format!("{base}/AllHits/Barrel/BXDistribution_W0_RB1_S01"), h("BXDistribution_W0_RB1_S01"));
        fx.add_th1f(&format!("{base}/AllHits/SummaryHistogram/Occupancy_W1_RB1_S01"), h("Occupancy_W1_RB1_S01"));
        fx.add_th1f(&format!("{base}/Noise/Occupancy_W0_RB1_S02"), h("Occupancy_W0_RB1_S02"));
        fx.add_th1f(&format!("{base}/AllHits/RPCEvents"), h("RPCEvents"));
        fx.add_th1f(&format!("{base}/AllHits/Barrel/RPCEvents/Occupancy_W2_RB2_S03"), h("Occupancy_W2_RB2_S03"));
        fx.add_object(&format!("{base}/AllHits/<nevents>i=3"), "TObjString", Vec::new());
        fx.add_object(&format!("{base}/AllHits/readoutErrors_W0"), "TH1F", Vec::new());
        RootFile::from_bytes(fx.to_bytes(), "sel.root").unwrap()
    }

    #[test]
    fn skipped_prefixes_apply_to_leaves_only() {
        let f = file();
        let prefixes = SelectionConfig::default().skip_prefixes;
        let names: Vec<String> = leaves(&f, &prefixes).map(|e| e.key.name).collect();
        assert!(!names.iter().any(|n| n == "RPCEvents"));
        assert!(!names.iter().any(|n| n.starts_with('<')));
        assert!(!names.iter().any(|n| n.starts_with("readoutErrors")));
        // Reached through a directory named like a skipped prefix.
        assert!(names.iter().any(|n| n == "Occupancy_W2_RB2_S03"));
    }

    #[test]
    fn selection_rules() {
        let f = file();
        let paths = select(&f, &SelectionConfig::default());
        assert_eq!(
            paths,
            vec![
                "/DQMData/Run 339500/RPC/Run summary/AllHits/Barrel/Occupancy_W0_RB1_S01",
                "/DQMData/Run 339500/RPC/Run summary/AllHits/Barrel/RPCEvents/Occupancy_W2_RB2_S03",
            ]
        );
    }

    #[test]
    fn classes_are_configurable() {
        let f = file();
        let sel = SelectionConfig { classes: vec!["TH1F".into(), "TH1D".into()], ..Default::default() };
        let paths = select(&f, &sel);
        assert_eq!(paths.len(), 3);
        assert!(paths.iter().any(|p| p.ends_with("BXDistribution_W0_RB1_S01")));
    }

    #[test]
    fn prefix_match_is_on_bare_name() {
        let prefixes = SelectionConfig::default().skip_prefixes;
        assert!(is_skipped_leaf("recordTime", &prefixes));
        assert!(is_skipped_leaf("<nevents>i=3", &prefixes));
        assert!(!is_skipped_leaf("Occupancy_record", &prefixes));
    }
}
