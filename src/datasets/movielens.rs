//! MovieLens ratings. The 100K variant ships `u.data` with tab separated fields, the 1M variant
//! ships `ratings.dat` with `::` separated fields. Both hold `user, item, rating, timestamp`.

use std::io::BufRead;
use std::path::Path;

use tracing::info;

use super::{Source, PROGRESS_CHUNK};
use crate::error::Result;
use crate::io::{self, Tally};
use crate::progress::Progress;
use crate::types::{Interaction, InteractionTable, Timestamp};

pub const CODE_100K: &str = "ml-100k";
pub const CODE_1M: &str = "ml-1m";

pub struct MovieLens100K;

impl Source for MovieLens100K {

    fn code(&self) -> &'static str {
        CODE_100K
    }

    fn url(&self) -> &'static str {
        "http://files.grouplens.org/datasets/movielens/ml-100k.zip"
    }

    fn raw_file_names(&self) -> &'static [&'static str] {
        &["u.data"]
    }

    fn load(
        &self,
        raw_folder: &Path,
        max_malformed_fraction: f64,
        progress: &dyn Progress,
    ) -> Result<InteractionTable> {

        let path = self.interactions_path(raw_folder);
        info!(path = %path.display(), "reading raw ratings");

        let mut reader = io::csv_reader(&path, b'\t')?;
        let mut tally = Tally::new(&path);
        let mut table = InteractionTable::with_capacity(100_000);

        progress.start("reading ratings", None);

        for record in reader.deserialize::<(String, String, f32, Timestamp)>() {
            match record {
                Ok((user, item, rating, timestamp)) => {
                    table.push(Interaction::new(user, item, rating, timestamp));
                    tally.parsed();
                }
                Err(failure) if failure.is_io_error() => return Err(failure.into()),
                Err(_) => tally.skipped(),
            }

            if (tally.num_parsed() + tally.num_skipped()) as u64 % PROGRESS_CHUNK == 0 {
                progress.inc(PROGRESS_CHUNK);
            }
        }

        progress.finish();
        tally.check(max_malformed_fraction)?;

        Ok(table)
    }
}

pub struct MovieLens1M;

impl Source for MovieLens1M {

    fn code(&self) -> &'static str {
        CODE_1M
    }

    fn url(&self) -> &'static str {
        "http://files.grouplens.org/datasets/movielens/ml-1m.zip"
    }

    fn raw_file_names(&self) -> &'static [&'static str] {
        &["ratings.dat"]
    }

    fn load(
        &self,
        raw_folder: &Path,
        max_malformed_fraction: f64,
        progress: &dyn Progress,
    ) -> Result<InteractionTable> {

        let path = self.interactions_path(raw_folder);
        info!(path = %path.display(), "reading raw ratings");

        let reader = io::open_lines(&path)?;
        let mut tally = Tally::new(&path);
        let mut table = InteractionTable::with_capacity(1_000_000);

        progress.start("reading ratings", None);

        for (line_number, line) in reader.lines().enumerate() {
            let line = line?;

            if line.trim().is_empty() {
                continue;
            }

            match parse_double_colon_line(&line) {
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

        Ok(table)
    }
}

fn parse_double_colon_line(line: &str) -> Option<Interaction> {
    let mut fields = line.trim().split("::");

    let user = fields.next()?;
    let item = fields.next()?;
    let rating: f32 = fields.next()?.parse().ok()?;
    let timestamp: Timestamp = fields.next()?.parse().ok()?;

    if fields.next().is_some() {
        return None;
    }

    Some(Interaction::new(user, item, rating, timestamp))
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::error::Error;
    use crate::progress::Silent;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn loads_tab_separated_ratings() {
        let folder = TempDir::new().unwrap();
        fs::write(
            folder.path().join("u.data"),
            "196\t242\t3\t881250949\n186\t302\t3\t891717742\n",
        ).unwrap();

        let table = MovieLens100K.load(folder.path(), 0.0, &Silent).unwrap();

        assert_eq!(table.data(), &[
            Interaction::new("196", "242", 3.0, 881_250_949),
            Interaction::new("186", "302", 3.0, 891_717_742),
        ]);
    }

    #[test]
    fn read_failures_are_not_counted_as_malformed_rows() {
        let folder = TempDir::new().unwrap();
        // Opening a directory succeeds, reading from it fails.
        fs::create_dir(folder.path().join("u.data")).unwrap();

        match MovieLens100K.load(folder.path(), 0.0, &Silent) {
            Err(Error::Csv(failure)) => assert!(failure.is_io_error()),
            other => panic!("expected an I/O error, got {:?}", other),
        }
    }

    #[test]
    fn loads_double_colon_separated_ratings() {
        let folder = TempDir::new().unwrap();
        fs::write(
            folder.path().join("ratings.dat"),
            "1::1193::5::978300760\n1::661::3::978302109\n",
        ).unwrap();

        let table = MovieLens1M.load(folder.path(), 0.0, &Silent).unwrap();

        assert_eq!(table.data(), &[
            Interaction::new("1", "1193", 5.0, 978_300_760),
            Interaction::new("1", "661", 3.0, 978_302_109),
        ]);
    }

    #[test]
    fn malformed_double_colon_lines() {
        assert!(parse_double_colon_line("1::1193::5").is_none());
        assert!(parse_double_colon_line("1::1193::five::978300760").is_none());
        assert!(parse_double_colon_line("1::1193::5::978300760::extra").is_none());
    }
}
