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

use std::collections::BTreeMap;

use chrono::NaiveDate;
use fnv::FnvHashSet;
use serde_derive::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub type UserIndex = u32;
pub type ItemIndex = u32;
/// Unix epoch seconds, UTC.
pub type Timestamp = i64;

/// Sequences of item indices keyed by user index, one per split.
pub type UserSequences = BTreeMap<UserIndex, Vec<ItemIndex>>;

/// A raw index map from source identifiers to dense indices, as stored in the artifact.
pub type IndexMap = BTreeMap<String, u32>;

/// A single observed rating of an item by a user, still carrying the source identifiers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    pub uid: String,
    pub sid: String,
    pub rating: f32,
    pub timestamp: Timestamp,
}

impl Interaction {
    pub fn new<U, S>(uid: U, sid: S, rating: f32, timestamp: Timestamp) -> Self
        where U: Into<String>, S: Into<String> {

        Interaction { uid: uid.into(), sid: sid.into(), rating, timestamp }
    }
}

/// An ordered collection of interactions for one dataset.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InteractionTable {
    interactions: Vec<Interaction>,
}

impl InteractionTable {

    pub fn new() -> Self {
        InteractionTable { interactions: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        InteractionTable { interactions: Vec::with_capacity(capacity) }
    }

    pub fn push(&mut self, interaction: Interaction) {
        self.interactions.push(interaction);
    }

    pub fn data(&self) -> &[Interaction] {
        &self.interactions
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Interaction> {
        self.interactions.iter()
    }

    pub fn len(&self) -> usize {
        self.interactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interactions.is_empty()
    }

    pub fn num_users(&self) -> usize {
        self.interactions.iter()
            .map(|interaction| interaction.uid.as_str())
            .collect::<FnvHashSet<&str>>()
            .len()
    }

    pub fn num_items(&self) -> usize {
        self.interactions.iter()
            .map(|interaction| interaction.sid.as_str())
            .collect::<FnvHashSet<&str>>()
            .len()
    }

    pub fn retain<F>(&mut self, predicate: F) where F: FnMut(&Interaction) -> bool {
        self.interactions.retain(predicate);
    }

    /// Stable sort by `(timestamp, uid, sid)`. This is the canonical order in which identifiers
    /// are first encountered during re-indexing.
    pub fn sort_chronologically(&mut self) {
        self.interactions.sort_by(|a, b| {
            a.timestamp.cmp(&b.timestamp)
                .then_with(|| a.uid.cmp(&b.uid))
                .then_with(|| a.sid.cmp(&b.sid))
        });
    }

    pub fn into_inner(self) -> Vec<Interaction> {
        self.interactions
    }
}

impl From<Vec<Interaction>> for InteractionTable {
    fn from(interactions: Vec<Interaction>) -> Self {
        InteractionTable { interactions }
    }
}

impl IntoIterator for InteractionTable {
    type Item = Interaction;
    type IntoIter = std::vec::IntoIter<Interaction>;

    fn into_iter(self) -> Self::IntoIter {
        self.interactions.into_iter()
    }
}

impl<'a> IntoIterator for &'a InteractionTable {
    type Item = &'a Interaction;
    type IntoIter = std::slice::Iter<'a, Interaction>;

    fn into_iter(self) -> Self::IntoIter {
        self.interactions.iter()
    }
}

/// Half-open range `[start, end)` of epoch seconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: Timestamp,
    pub end: Timestamp,
}

impl TimeWindow {

    /// January 1st (inclusive) to January 1st of the following year (exclusive), in UTC.
    pub fn calendar_year(year: i32) -> Result<Self> {
        let start = new_year_utc(year).ok_or(Error::InvalidYear(year))?;
        let end = year.checked_add(1)
            .and_then(new_year_utc)
            .ok_or(Error::InvalidYear(year))?;

        Ok(TimeWindow { start, end })
    }

    pub fn contains(&self, timestamp: Timestamp) -> bool {
        timestamp >= self.start && timestamp < self.end
    }
}

fn new_year_utc(year: i32) -> Option<Timestamp> {
    NaiveDate::from_ymd_opt(year, 1, 1)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|datetime| datetime.and_utc().timestamp())
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn chronological_sort_breaks_ties_by_user_then_item() {
        let mut table = InteractionTable::from(vec![
            Interaction::new("bob", "pony", 1.0, 20),
            Interaction::new("bob", "apple", 1.0, 10),
            Interaction::new("alice", "pony", 1.0, 10),
            Interaction::new("alice", "apple", 1.0, 10),
        ]);

        table.sort_chronologically();

        let order: Vec<(&str, &str)> = table.iter()
            .map(|i| (i.uid.as_str(), i.sid.as_str()))
            .collect();

        assert_eq!(order, vec![
            ("alice", "apple"),
            ("alice", "pony"),
            ("bob", "apple"),
            ("bob", "pony"),
        ]);
    }

    #[test]
    fn distinct_counts() {
        let table = InteractionTable::from(vec![
            Interaction::new("alice", "apple", 5.0, 1),
            Interaction::new("alice", "dog", 4.0, 2),
            Interaction::new("bob", "apple", 3.0, 3),
        ]);

        assert_eq!(table.len(), 3);
        assert_eq!(table.num_users(), 2);
        assert_eq!(table.num_items(), 2);
    }

    #[test]
    fn calendar_year_window() {
        let window = TimeWindow::calendar_year(2019).unwrap();

        assert_eq!(window.start, 1_546_300_800);
        assert_eq!(window.end, 1_577_836_800);
        assert!(window.contains(1_546_300_800));
        assert!(!window.contains(1_577_836_800));
        assert!(!window.contains(1_546_300_799));
    }

    #[test]
    fn calendar_year_out_of_range() {
        assert!(TimeWindow::calendar_year(i32::max_value()).is_err());
    }
}
