/*
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

//! Raw loaders for the supported benchmark datasets. Each one knows where its raw file comes
//! from and how to extract `(user, item, rating, timestamp)` from it. Fetching the raw files is
//! left to the user.

use std::io::BufRead;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use tracing::info;

use crate::error::{Error, Result};
use crate::io::{self, Tally};
use crate::progress::Progress;
use crate::types::{Interaction, InteractionTable, TimeWindow};

pub mod beauty;
pub mod movielens;
pub mod yelp;

pub use self::beauty::Beauty;
pub use self::movielens::{MovieLens100K, MovieLens1M};
pub use self::yelp::Yelp2020;

/// Progress is reported in chunks of this many lines.
const PROGRESS_CHUNK: u64 = 10_000;

/// Everything the pipeline needs to know about one dataset.
pub trait Source {

    /// Short identifier used on the command line and in folder names.
    fn code(&self) -> &'static str;

    /// Where the raw file can be downloaded from.
    fn url(&self) -> &'static str;

    /// Files expected in the raw folder, the first one holds the interactions.
    fn raw_file_names(&self) -> &'static [&'static str];

    /// Restricts the dataset to a time range, unless overridden by the configuration.
    fn time_window(&self) -> Result<Option<TimeWindow>> {
        Ok(None)
    }

    /// Whether a user rating the same item with the same value twice in a row counts once.
    fn collapses_repeats(&self) -> bool {
        true
    }

    fn load(
        &self,
        raw_folder: &Path,
        max_malformed_fraction: f64,
        progress: &dyn Progress,
    ) -> Result<InteractionTable>;

    /// Fails with `RawFileMissing` for the first raw file not present in `raw_folder`.
    fn check_raw_files(&self, raw_folder: &Path) -> Result<()> {
        for name in self.raw_file_names() {
            let path = raw_folder.join(name);
            if !path.is_file() {
                return Err(Error::RawFileMissing { path, url: self.url().to_string() });
            }
        }

        Ok(())
    }

    fn interactions_path(&self, raw_folder: &Path) -> PathBuf {
        raw_folder.join(self.raw_file_names()[0])
    }
}

/// Codes of all supported datasets.
pub const DATASET_CODES: &[&str] = &[
    beauty::CODE,
    yelp::CODE,
    movielens::CODE_100K,
    movielens::CODE_1M,
];

/// Looks up the loader for a dataset code.
pub fn dataset_factory(code: &str) -> Result<Box<dyn Source>> {
    match code {
        beauty::CODE => Ok(Box::new(Beauty)),
        yelp::CODE => Ok(Box::new(Yelp2020)),
        movielens::CODE_100K => Ok(Box::new(MovieLens100K)),
        movielens::CODE_1M => Ok(Box::new(MovieLens1M)),
        _ => Err(Error::UnknownDataset {
            code: code.to_string(),
            known: DATASET_CODES.join(", "),
        }),
    }
}

/// Reads a file of JSON records, one per line, converting each record into an interaction.
/// Records which cannot be parsed or converted are counted and skipped.
pub(crate) fn read_json_lines<T, F>(
    path: &Path,
    max_malformed_fraction: f64,
    progress: &dyn Progress,
    convert: F,
) -> Result<InteractionTable>
    where T: DeserializeOwned, F: Fn(T) -> Option<Interaction> {

    info!(path = %path.display(), "reading raw records");

    let reader = io::open_lines(path)?;
    let mut tally = Tally::new(path);
    let mut table = InteractionTable::new();

    progress.start("reading records", None);

    for (line_number, line) in reader.lines().enumerate() {
        let line = line?;

        if line.trim().is_empty() {
            continue;
        }

        match io::parse_record::<T>(&line).and_then(&convert) {
            Some(interaction) => {
                table.push(interaction);
                tally.parsed();
            }
            None => tally.skipped(),
        }

        if (line_number as u64 + 1) % PROGRESS_CHUNK == 0 {
            progress.inc(PROGRESS_CHUNK);
        }
    }

    progress.finish();
    tally.check(max_malformed_fraction)?;

    info!(records = tally.num_parsed(), "read raw records");

    Ok(table)
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn factory_knows_every_code() {
        for code in DATASET_CODES {
            let source = dataset_factory(code).unwrap();
            assert_eq!(source.code(), *code);
            assert!(!source.raw_file_names().is_empty());
        }
    }

    #[test]
    fn only_yelp_keeps_repeated_ratings() {
        for code in DATASET_CODES {
            let source = dataset_factory(code).unwrap();
            assert_eq!(source.collapses_repeats(), *code != yelp::CODE);
        }
    }

    #[test]
    fn factory_rejects_unknown_codes() {
        match dataset_factory("netflix") {
            Err(Error::UnknownDataset { code, known }) => {
                assert_eq!(code, "netflix");
                assert!(known.contains("beauty"));
                assert!(known.contains("yelp2020"));
            }
            _ => panic!("expected an unknown dataset error"),
        }
    }

    #[test]
    fn missing_raw_file_names_path_and_url() {
        let folder = tempfile::TempDir::new().unwrap();
        let source = dataset_factory("beauty").unwrap();

        match source.check_raw_files(folder.path()) {
            Err(Error::RawFileMissing { path, url }) => {
                assert_eq!(path, folder.path().join("beauty_reviews.json.gz"));
                assert_eq!(url, source.url());
            }
            _ => panic!("expected a missing raw file error"),
        }
    }
}
