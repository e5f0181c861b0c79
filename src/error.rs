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

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong while turning a raw dataset into a packaged one.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The raw file is not on disk. We never download, so the caller has to fetch it from `url`.
    #[error("raw file {} is missing, download it from {url}", .path.display())]
    RawFileMissing { path: PathBuf, url: String },

    #[error("{skipped} of {total} records in {} could not be parsed", .path.display())]
    TooManyMalformed {
        path: PathBuf,
        skipped: usize,
        total: usize,
    },

    #[error("unknown dataset '{code}', expected one of: {known}")]
    UnknownDataset { code: String, known: String },

    #[error("cannot build a time window for year {0}")]
    InvalidYear(i32),
}

pub type Result<T> = std::result::Result<T, Error>;
