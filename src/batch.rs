use anyhow::Context;
use indicatif::ProgressBar;
use std::fs;
use std::path::{Path, PathBuf};

use crate::dataset::DatasetSpec;
use crate::geofile::shapefile::{find_shp_files, merge_shapefiles};
use crate::geofile::split::split_by_attribute;
use crate::kml::document::{assemble_groups, assemble_whole_table};

/// Result of one prefecture run. Skips are expected (not every prefecture
/// publishes every dataset); failures are isolated so the batch continues.
#[derive(Debug)]
pub enum PrefectureOutcome {
    Written { files: usize },
    SkippedNoInput,
    SkippedEmptyDataset,
    SkippedEmptyPartition,
    Failed { message: String },
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub written_prefectures: usize,
    pub written_files: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl BatchSummary {
    fn record(&mut self, outcome: &PrefectureOutcome) {
        match outcome {
            PrefectureOutcome::Written { files } => {
                self.written_prefectures += 1;
                self.written_files += files;
            }
            PrefectureOutcome::SkippedNoInput
            | PrefectureOutcome::SkippedEmptyDataset
            | PrefectureOutcome::SkippedEmptyPartition => self.skipped += 1,
            PrefectureOutcome::Failed { .. } => self.failed += 1,
        }
    }
}

/// Prefecture subdirectories of the shapefile root, sorted by name.
///
/// This is the only enumeration whose failure aborts the batch; everything
/// downstream is isolated per prefecture.
pub fn prefecture_directories(shape_root: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let mut directories = Vec::new();
    for entry in fs::read_dir(shape_root)
        .with_context(|| format!("Listing prefecture root {:?}", shape_root))?
    {
        let path = entry?.path();
        if path.is_dir() {
            directories.push(path);
        }
    }
    directories.sort();
    Ok(directories)
}

/// Run one dataset pipeline over every prefecture, strictly sequentially.
pub fn run_dataset(
    spec: &DatasetSpec,
    shape_root: &Path,
    output_root: &Path,
) -> anyhow::Result<BatchSummary> {
    let prefectures = prefecture_directories(shape_root)?;
    log::info!(
        "Processing {} prefectures for dataset '{}'",
        prefectures.len(),
        spec.title
    );

    let bar = ProgressBar::new(prefectures.len() as u64);
    let mut summary = BatchSummary::default();
    for prefecture_dir in &prefectures {
        let prefecture = prefecture_dir
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default()
            .to_string();
        log::info!("Processing prefecture {}", prefecture);

        let outcome = match process_prefecture(spec, prefecture_dir, output_root, &prefecture) {
            Ok(outcome) => outcome,
            Err(err) => PrefectureOutcome::Failed {
                message: format!("{:?}", err),
            },
        };
        match &outcome {
            PrefectureOutcome::Written { files } => {
                log::info!("Prefecture {}: wrote {} file(s)", prefecture, files)
            }
            PrefectureOutcome::SkippedNoInput => log::warn!(
                "Prefecture {}: no shapefiles match '{}', skipping",
                prefecture,
                spec.keyword
            ),
            PrefectureOutcome::SkippedEmptyDataset => {
                log::warn!("Prefecture {}: merged table is empty, skipping", prefecture)
            }
            PrefectureOutcome::SkippedEmptyPartition => {
                log::warn!("Prefecture {}: split yielded no groups, skipping", prefecture)
            }
            PrefectureOutcome::Failed { message } => log::error!(
                "Prefecture {} failed: {}. Continuing with the next prefecture.",
                prefecture,
                message
            ),
        }
        summary.record(&outcome);
        bar.inc(1);
    }
    bar.finish();

    log::info!(
        "Dataset '{}' done: {} prefecture(s) written ({} files), {} skipped, {} failed",
        spec.title,
        summary.written_prefectures,
        summary.written_files,
        summary.skipped,
        summary.failed
    );
    Ok(summary)
}

fn process_prefecture(
    spec: &DatasetSpec,
    prefecture_dir: &Path,
    output_root: &Path,
    prefecture: &str,
) -> anyhow::Result<PrefectureOutcome> {
    let file_list = find_shp_files(prefecture_dir, spec.keyword)?;
    log::info!("Found {} shapefile(s)", file_list.len());
    if file_list.is_empty() {
        return Ok(PrefectureOutcome::SkippedNoInput);
    }

    let table = merge_shapefiles(&file_list)?;
    log::info!("Merged table has {} record(s)", table.len());
    if table.is_empty() {
        return Ok(PrefectureOutcome::SkippedEmptyDataset);
    }

    let output_dir = output_root.join(prefecture).join(spec.output_dirname);
    let files = match spec.split_attribute {
        Some(attribute) => {
            let groups = split_by_attribute(table, attribute)?;
            log::info!("Split into {} categories", groups.len());
            if groups.is_empty() {
                return Ok(PrefectureOutcome::SkippedEmptyPartition);
            }
            assemble_groups(groups, spec, &output_dir)?.len()
        }
        None => {
            assemble_whole_table(table, spec, &output_dir)?;
            1
        }
    };
    Ok(PrefectureOutcome::Written { files })
}

#[cfg(test)]
mod tests {
    use std::fs;

    use rstest::rstest;
    use testdir::testdir;

    use crate::dataset::DatasetKind;

    use super::{run_dataset, BatchSummary};

    #[rstest]
    fn test_prefectures_without_matching_input_are_skipped() {
        let root = testdir!();
        let shape_root = root.join("shape_org");
        let output_root = root.join("kml_google_map");
        fs::create_dir_all(shape_root.join("東京都")).unwrap();
        fs::create_dir_all(shape_root.join("大阪府")).unwrap();
        fs::write(shape_root.join("東京都/A31_youto_01.shp"), b"").unwrap();

        let spec = DatasetKind::AreaDivision.spec();
        let summary = run_dataset(&spec, &shape_root, &output_root).unwrap();

        assert_eq!(
            summary,
            BatchSummary {
                written_prefectures: 0,
                written_files: 0,
                skipped: 2,
                failed: 0
            }
        );
        assert!(!output_root.exists());
    }

    #[rstest]
    fn test_unreadable_shapefile_fails_one_prefecture_and_batch_continues() {
        let root = testdir!();
        let shape_root = root.join("shape_org");
        let output_root = root.join("kml_google_map");
        fs::create_dir_all(shape_root.join("01_broken")).unwrap();
        fs::create_dir_all(shape_root.join("02_empty")).unwrap();
        // Not a real shapefile, so the merge step fails for this prefecture.
        fs::write(shape_root.join("01_broken/A31_senbiki_01.shp"), b"garbage").unwrap();

        let spec = DatasetKind::AreaDivision.spec();
        let summary = run_dataset(&spec, &shape_root, &output_root).unwrap();

        assert_eq!(summary.failed, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.written_prefectures, 0);
    }

    #[rstest]
    fn test_missing_shape_root_aborts_the_run() {
        let root = testdir!();
        let spec = DatasetKind::LandUseZone.spec();
        assert!(run_dataset(&spec, &root.join("does_not_exist"), &root.join("out")).is_err());
    }
}
