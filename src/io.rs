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

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::error::{Error, Result};
use crate::package::PackagedDataset;

/// Reads a CSV input file without headers and with the given single byte delimiter.
pub fn csv_reader(path: &Path, delimiter: u8) -> Result<csv::Reader<File>> {
    let reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .delimiter(delimiter)
        .from_path(path)?;

    Ok(reader)
}

/// Buffered line reader over a raw file, transparently decompressing files ending in `.gz`.
pub fn open_lines(path: &Path) -> Result<Box<dyn BufRead>> {
    let file = File::open(path)?;

    let is_gzipped = path.extension().map_or(false, |extension| extension == "gz");

    if is_gzipped {
        Ok(Box::new(BufReader::new(GzDecoder::new(BufReader::new(file)))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Parses a single line as JSON, falling back to reading it as a Python dictionary literal.
/// Returns `None` if neither works.
pub fn parse_record<T: DeserializeOwned>(line: &str) -> Option<T> {
    match serde_json::from_str(line) {
        Ok(record) => Some(record),
        Err(_) => serde_json::from_str(&literal_to_json(line)).ok(),
    }
}

/// Rewrites a Python literal into JSON: single quoted strings become double quoted ones and
/// `True`, `False` and `None` become `true`, `false` and `null`. Anything else passes through.
pub fn literal_to_json(literal: &str) -> String {

    let mut json = String::with_capacity(literal.len() + 16);
    let mut chars = literal.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\'' | '"' => {
                let quote = c;
                json.push('"');

                while let Some(c) = chars.next() {
                    match c {
                        '\\' => match chars.next() {
                            // JSON has no \' escape
                            Some('\'') => json.push('\''),
                            Some(escaped) => {
                                json.push('\\');
                                json.push(escaped);
                            }
                            None => json.push('\\'),
                        },
                        c if c == quote => break,
                        '"' => json.push_str("\\\""),
                        other => json.push(other),
                    }
                }

                json.push('"');
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let mut word = String::new();
                word.push(c);

                while let Some(&next) = chars.peek() {
                    if next.is_ascii_alphanumeric() || next == '_' {
                        word.push(next);
                        chars.next();
                    } else {
                        break;
                    }
                }

                match word.as_str() {
                    "True" => json.push_str("true"),
                    "False" => json.push_str("false"),
                    "None" => json.push_str("null"),
                    _ => json.push_str(&word),
                }
            }
            other => json.push(other),
        }
    }

    json
}

/// Counts parsed and skipped records of a raw file.
#[derive(Debug)]
pub struct Tally {
    path: PathBuf,
    parsed: usize,
    skipped: usize,
}

impl Tally {

    pub fn new(path: &Path) -> Self {
        Tally { path: path.to_path_buf(), parsed: 0, skipped: 0 }
    }

    pub fn parsed(&mut self) {
        self.parsed += 1;
    }

    pub fn skipped(&mut self) {
        self.skipped += 1;
    }

    pub fn num_parsed(&self) -> usize {
        self.parsed
    }

    pub fn num_skipped(&self) -> usize {
        self.skipped
    }

    /// Fails if more than `max_fraction` of all records had to be skipped. Skipped records are
    /// always reported.
    pub fn check(&self, max_fraction: f64) -> Result<()> {

        if self.skipped == 0 {
            return Ok(());
        }

        let total = self.parsed + self.skipped;

        warn!(
            path = %self.path.display(),
            skipped = self.skipped,
            total,
            "skipped malformed records"
        );

        if self.skipped as f64 > max_fraction * total as f64 {
            return Err(Error::TooManyMalformed {
                path: self.path.clone(),
                skipped: self.skipped,
                total,
            });
        }

        Ok(())
    }
}

/// Serializes the packaged dataset as JSON to `path`. We write to a temporary file next to the
/// destination and rename it afterwards, so an interrupted run never leaves a partial artifact.
pub fn write_dataset(path: &Path, dataset: &PackagedDataset) -> Result<()> {

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let temp_path = temporary_path(path);

    let result = File::create(&temp_path)
        .map_err(Error::from)
        .and_then(|file| {
            let mut writer = BufWriter::new(file);
            serde_json::to_writer(&mut writer, dataset)?;
            writer.flush()?;
            writer.get_ref().sync_all()?;
            Ok(())
        })
        .and_then(|_| fs::rename(&temp_path, path).map_err(Error::from));

    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }

    result
}

/// Loads a packaged dataset written by `write_dataset`.
pub fn read_dataset(path: &Path) -> Result<PackagedDataset> {
    let reader = BufReader::new(File::open(path)?);
    let dataset = serde_json::from_reader(reader)?;

    Ok(dataset)
}

fn temporary_path(path: &Path) -> PathBuf {
    let mut name: OsString = path.file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_else(|| OsString::from("dataset"));
    name.push(".tmp");

    path.with_file_name(name)
}
