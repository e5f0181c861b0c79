//! Amazon Beauty reviews (5-core), gzip compressed JSON lines. Some dumps contain Python
//! dictionary literals instead of JSON, which the record parser falls back to.

use std::path::Path;

use serde_derive::Deserialize;

use super::{read_json_lines, Source};
use crate::error::Result;
use crate::progress::Progress;
use crate::types::{Interaction, InteractionTable};

pub const CODE: &str = "beauty";

#[derive(Deserialize)]
struct Review {
    #[serde(rename = "reviewerID")]
    reviewer_id: String,
    asin: String,
    overall: f32,
    #[serde(rename = "unixReviewTime")]
    unix_review_time: i64,
}

pub struct Beauty;

impl Source for Beauty {

    fn code(&self) -> &'static str {
        CODE
    }

    fn url(&self) -> &'static str {
        "http://snap.stanford.edu/data/amazon/productGraph/categoryFiles/reviews_Beauty_5.json.gz"
    }

    fn raw_file_names(&self) -> &'static [&'static str] {
        &["beauty_reviews.json.gz"]
    }

    fn load(
        &self,
        raw_folder: &Path,
        max_malformed_fraction: f64,
        progress: &dyn Progress,
    ) -> Result<InteractionTable> {

        read_json_lines(
            &self.interactions_path(raw_folder),
            max_malformed_fraction,
            progress,
            |review: Review| {
                Some(Interaction::new(
                    review.reviewer_id,
                    review.asin,
                    review.overall,
                    review.unix_review_time,
                ))
            },
        )
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::error::Error;
    use crate::progress::Silent;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_raw(folder: &Path, lines: &[&str]) {
        let file = File::create(folder.join("beauty_reviews.json.gz")).unwrap();
        let mut encoder = GzEncoder::new(file, Compression::default());
        for line in lines {
            writeln!(encoder, "{}", line).unwrap();
        }
        encoder.finish().unwrap();
    }

    #[test]
    fn loads_json_and_literal_reviews() {
        let folder = TempDir::new().unwrap();
        write_raw(folder.path(), &[
            r#"{"reviewerID": "A1", "asin": "B01", "overall": 5.0, "unixReviewTime": 1360000000, "reviewText": "great"}"#,
            r#"{'reviewerID': 'A2', 'asin': 'B02', 'overall': 3.0, 'unixReviewTime': 1360000100, 'helpful': [0, 0]}"#,
        ]);

        let table = Beauty.load(folder.path(), 0.0, &Silent).unwrap();

        assert_eq!(table.data(), &[
            Interaction::new("A1", "B01", 5.0, 1_360_000_000),
            Interaction::new("A2", "B02", 3.0, 1_360_000_100),
        ]);
    }

    #[test]
    fn rejects_mostly_broken_files() {
        let folder = TempDir::new().unwrap();
        write_raw(folder.path(), &[
            r#"{"reviewerID": "A1", "asin": "B01", "overall": 5.0, "unixReviewTime": 1}"#,
            "garbage",
            r#"{"reviewerID": "A2"}"#,
        ]);

        match Beauty.load(folder.path(), 0.01, &Silent) {
            Err(Error::TooManyMalformed { skipped, total, .. }) => {
                assert_eq!(skipped, 2);
                assert_eq!(total, 3);
            }
            other => panic!("unexpected result {:?}", other),
        }
    }
}
