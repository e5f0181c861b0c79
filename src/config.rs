use std::path::{Path, PathBuf};

use crate::filter::Thresholds;

/// Name of the artifact inside its preprocessed folder.
pub const DATASET_FILE_NAME: &str = "dataset.json";

/// Name of the split protocol, part of the preprocessed folder name.
pub const SPLIT_NAME: &str = "leave_two_out";

/// Settings for preparing a single dataset.
#[derive(Clone, Debug, PartialEq)]
pub struct PreprocessConfig {
    pub dataset_code: String,
    /// Holds the raw folders (`<root>/<code>`) and the `preprocessed` folder.
    pub data_root: PathBuf,
    /// Ratings below this value are dropped before filtering. Zero disables the floor.
    pub min_rating: f32,
    pub thresholds: Thresholds,
    /// Keeps only interactions of this calendar year, replacing the default window of the dataset.
    pub year: Option<i32>,
    pub max_malformed_fraction: f64,
}

impl PreprocessConfig {

    pub fn new<S: Into<String>>(dataset_code: S) -> Self {
        PreprocessConfig {
            dataset_code: dataset_code.into(),
            data_root: PathBuf::from("data"),
            min_rating: 0.0,
            thresholds: Thresholds::default(),
            year: None,
            max_malformed_fraction: 0.01,
        }
    }

    pub fn data_root<P: AsRef<Path>>(mut self, data_root: P) -> Self {
        self.data_root = data_root.as_ref().to_path_buf();
        self
    }

    pub fn min_rating(mut self, min_rating: f32) -> Self {
        self.min_rating = min_rating;
        self
    }

    pub fn min_uc(mut self, min_uc: usize) -> Self {
        self.thresholds.min_uc = min_uc;
        self
    }

    pub fn min_sc(mut self, min_sc: usize) -> Self {
        self.thresholds.min_sc = min_sc;
        self
    }

    pub fn year(mut self, year: Option<i32>) -> Self {
        self.year = year;
        self
    }

    pub fn max_malformed_fraction(mut self, max_malformed_fraction: f64) -> Self {
        self.max_malformed_fraction = max_malformed_fraction;
        self
    }

    pub fn raw_folder(&self) -> PathBuf {
        self.data_root.join(&self.dataset_code)
    }

    /// Every setting which changes the output is part of the folder name, so differently
    /// configured runs never overwrite each other.
    pub fn preprocessed_folder(&self) -> PathBuf {
        let mut name = format!(
            "{}_min_rating{}-min_uc{}-min_sc{}-split{}",
            self.dataset_code,
            self.min_rating,
            self.thresholds.min_uc,
            self.thresholds.min_sc,
            SPLIT_NAME,
        );

        if let Some(year) = self.year {
            name.push_str(&format!("-year{}", year));
        }

        self.data_root.join("preprocessed").join(name)
    }

    pub fn dataset_path(&self) -> PathBuf {
        self.preprocessed_folder().join(DATASET_FILE_NAME)
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn defaults() {
        let config = PreprocessConfig::new("beauty");

        assert_eq!(config.thresholds, Thresholds { min_uc: 5, min_sc: 5 });
        assert_eq!(config.raw_folder(), PathBuf::from("data/beauty"));
        assert_eq!(
            config.dataset_path(),
            PathBuf::from("data/preprocessed/beauty_min_rating0-min_uc5-min_sc5-splitleave_two_out/dataset.json")
        );
    }

    #[test]
    fn settings_show_up_in_the_folder_name() {
        let config = PreprocessConfig::new("yelp2020")
            .data_root("/tmp/seqprep")
            .min_rating(3.5)
            .min_uc(10)
            .min_sc(20)
            .year(Some(2018));

        assert_eq!(
            config.preprocessed_folder(),
            PathBuf::from("/tmp/seqprep/preprocessed/yelp2020_min_rating3.5-min_uc10-min_sc20-splitleave_two_out-year2018")
        );
    }
}
