/**
 * SeqPrep
 * Copyright (C) 2018 Sebastian Schelter
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program. If not, see <http://www.gnu.org/licenses/>.
 */

use std::path::PathBuf;
use std::time::Instant;

use tracing::info;

use crate::config::PreprocessConfig;
use crate::datasets;
use crate::error::Result;
use crate::filter;
use crate::io;
use crate::package;
use crate::progress::Progress;
use crate::stats::DatasetSummary;
use crate::types::{InteractionTable, TimeWindow};

/// Result of a `preprocess` run.
#[derive(Debug, PartialEq)]
pub enum Outcome {
    /// The artifact already existed and was left untouched.
    Skipped(PathBuf),
    Written { path: PathBuf, summary: DatasetSummary },
}

/// Loads the raw interactions of the configured dataset, filters them down to their k-core and
/// writes the leave-two-out split to the preprocessed folder. Running it again on an existing
/// artifact does nothing.
pub fn preprocess(config: &PreprocessConfig, progress: &dyn Progress) -> Result<Outcome> {

    let dataset_path = config.dataset_path();

    if dataset_path.is_file() {
        info!(path = %dataset_path.display(), "already preprocessed, skipping");
        return Ok(Outcome::Skipped(dataset_path));
    }

    let source = datasets::dataset_factory(&config.dataset_code)?;
    let raw_folder = config.raw_folder();
    source.check_raw_files(&raw_folder)?;

    let start = Instant::now();

    let mut table = source.load(&raw_folder, config.max_malformed_fraction, progress)?;
    log_table("loaded", &table);

    if config.min_rating > 0.0 {
        let min_rating = config.min_rating;
        table.retain(|interaction| interaction.rating >= min_rating);
        log_table("applied rating floor", &table);
    }

    let window = match config.year {
        Some(year) => Some(TimeWindow::calendar_year(year)?),
        None => source.time_window()?,
    };

    if let Some(window) = window {
        table.retain(|interaction| window.contains(interaction.timestamp));
        log_table("restricted to time window", &table);
    }

    table.sort_chronologically();

    if source.collapses_repeats() {
        table = filter::remove_immediate_repeats(table);
        log_table("removed immediate repeats", &table);
    }

    let (table, report) = filter::filter_triplets(table, config.thresholds);
    info!(
        rounds = report.rounds,
        removed = report.removed,
        min_uc = config.thresholds.min_uc,
        min_sc = config.thresholds.min_sc,
        "k-core filtering converged"
    );
    log_table("filtered", &table);

    let dataset = package::package(&table);
    let summary = dataset.summary();

    io::write_dataset(&dataset_path, &dataset)?;

    info!(
        path = %dataset_path.display(),
        users = summary.num_users,
        items = summary.num_items,
        interactions = summary.total_interactions(),
        density = %format!("{:.4}%", summary.density()),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "wrote packaged dataset"
    );

    Ok(Outcome::Written { path: dataset_path, summary })
}

fn log_table(stage: &str, table: &InteractionTable) {
    info!(
        interactions = table.len(),
        users = table.num_users(),
        items = table.num_items(),
        "{}",
        stage
    );
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::error::Error;
    use crate::progress::Silent;
    use std::fs;
    use tempfile::TempDir;

    /// Writes a MovieLens 1M style file: six users rate the same five movies and finally give
    /// movie 999 a low rating. User 7 does not make the 5-core.
    fn write_ratings(root: &std::path::Path) {
        let folder = root.join("ml-1m");
        fs::create_dir_all(&folder).unwrap();

        let mut lines = Vec::new();
        for user in 1..=6 {
            for movie in 1..=5 {
                lines.push(format!("{}::{}::4::{}", user, 100 + movie, 1000 * movie + user));
            }
            lines.push(format!("{}::999::2::{}", user, 9000 + user));
        }
        // A repeat, collapsed before filtering.
        lines.push("1::105::4::5002".to_string());
        lines.push("7::101::5::7000".to_string());

        fs::write(folder.join("ratings.dat"), lines.join("\n")).unwrap();
    }

    #[test]
    fn prepares_and_then_skips() {
        let root = TempDir::new().unwrap();
        write_ratings(root.path());

        let config = PreprocessConfig::new("ml-1m").data_root(root.path());

        let (path, summary) = match preprocess(&config, &Silent).unwrap() {
            Outcome::Written { path, summary } => (path, summary),
            other => panic!("expected a written dataset, got {:?}", other),
        };

        assert_eq!(path, config.dataset_path());
        assert_eq!(summary.num_users, 6);
        assert_eq!(summary.num_items, 6);

        let dataset = io::read_dataset(&path).unwrap();
        assert_eq!(dataset.train.len(), 6);
        assert_eq!(dataset.val.len(), 6);
        assert_eq!(dataset.test.len(), 6);
        assert_eq!(dataset.smap.len(), 6);
        assert!(!dataset.umap.contains_key("7"));

        for (user, train) in dataset.train.iter() {
            // Six movies per user, the last two held out.
            assert_eq!(train.len(), 4);
            assert_eq!(dataset.test[user], vec![dataset.smap["999"]]);
        }

        assert_eq!(preprocess(&config, &Silent).unwrap(), Outcome::Skipped(path));
    }

    #[test]
    fn rating_floor_is_applied_before_filtering() {
        let root = TempDir::new().unwrap();
        write_ratings(root.path());

        let config = PreprocessConfig::new("ml-1m")
            .data_root(root.path())
            .min_rating(3.0);

        match preprocess(&config, &Silent).unwrap() {
            Outcome::Written { summary, .. } => assert_eq!(summary.num_items, 5),
            other => panic!("expected a written dataset, got {:?}", other),
        }
    }

    #[test]
    fn year_outside_the_data_leaves_an_empty_dataset() {
        let root = TempDir::new().unwrap();
        write_ratings(root.path());

        let config = PreprocessConfig::new("ml-1m")
            .data_root(root.path())
            .year(Some(2019));

        match preprocess(&config, &Silent).unwrap() {
            Outcome::Written { path, summary } => {
                assert_eq!(summary.num_users, 0);
                assert_eq!(summary.density(), 0.0);
                assert!(io::read_dataset(&path).unwrap().train.is_empty());
            }
            other => panic!("expected a written dataset, got {:?}", other),
        }
    }

    #[test]
    fn yelp_keeps_repeated_reviews() {
        let root = TempDir::new().unwrap();
        let folder = root.path().join("yelp2020");
        fs::create_dir_all(&folder).unwrap();

        let mut lines = Vec::new();
        for user in 0..5 {
            for business in 0..5 {
                lines.push(format!(
                    r#"{{"user_id": "u{}", "business_id": "b{}", "stars": 4.0, "date": "2019-02-0{} 10:00:00"}}"#,
                    user, business, business + 1,
                ));
            }
        }
        // u0 reviews b4 again a month later with the same stars.
        lines.push(r#"{"user_id": "u0", "business_id": "b4", "stars": 4.0, "date": "2019-03-05 10:00:00"}"#.to_string());
        // Outside of the default 2019 window.
        lines.push(r#"{"user_id": "u1", "business_id": "b0", "stars": 2.0, "date": "2018-12-31 23:59:59"}"#.to_string());
        fs::write(folder.join("yelp_academic_dataset_review.json"), lines.join("\n")).unwrap();

        let config = PreprocessConfig::new("yelp2020").data_root(root.path());

        match preprocess(&config, &Silent).unwrap() {
            Outcome::Written { path, summary } => {
                assert_eq!(summary.total_interactions(), 26);

                let dataset = io::read_dataset(&path).unwrap();
                let u0 = dataset.umap["u0"];
                assert_eq!(dataset.val[&u0], vec![dataset.smap["b4"]]);
                assert_eq!(dataset.test[&u0], vec![dataset.smap["b4"]]);
            }
            other => panic!("expected a written dataset, got {:?}", other),
        }
    }

    #[test]
    fn missing_raw_file_is_fatal() {
        let root = TempDir::new().unwrap();
        let config = PreprocessConfig::new("yelp2020").data_root(root.path());

        match preprocess(&config, &Silent) {
            Err(Error::RawFileMissing { path, .. }) => {
                assert_eq!(path, root.path().join("yelp2020").join("yelp_academic_dataset_review.json"));
            }
            other => panic!("expected a missing raw file error, got {:?}", other),
        }

        assert!(!config.dataset_path().exists());
    }
}
