//! Yelp academic dataset reviews, plain JSON lines. Review dates are given in UTC without a
//! zone suffix. By default only the reviews of 2019 are kept, and repeated reviews are kept
//! as they are.

use std::path::Path;

use chrono::NaiveDateTime;
use serde_derive::Deserialize;

use super::{read_json_lines, Source};
use crate::error::Result;
use crate::progress::Progress;
use crate::types::{Interaction, InteractionTable, Timestamp, TimeWindow};

pub const CODE: &str = "yelp2020";

pub const DEFAULT_YEAR: i32 = 2019;

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Deserialize)]
struct Review {
    user_id: String,
    business_id: String,
    stars: f32,
    date: String,
}

pub struct Yelp2020;

impl Source for Yelp2020 {

    fn code(&self) -> &'static str {
        CODE
    }

    fn url(&self) -> &'static str {
        "https://drive.google.com/uc?id=1ugbgehShD2xTqdFWcNoba6xN5IQnT93R"
    }

    fn raw_file_names(&self) -> &'static [&'static str] {
        &["yelp_academic_dataset_review.json"]
    }

    fn time_window(&self) -> Result<Option<TimeWindow>> {
        TimeWindow::calendar_year(DEFAULT_YEAR).map(Some)
    }

    fn collapses_repeats(&self) -> bool {
        false
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
                let timestamp = parse_date(&review.date)?;
                Some(Interaction::new(review.user_id, review.business_id, review.stars, timestamp))
            },
        )
    }
}

fn parse_date(date: &str) -> Option<Timestamp> {
    NaiveDateTime::parse_from_str(date, DATE_FORMAT)
        .ok()
        .map(|datetime| datetime.and_utc().timestamp())
}
