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

//! Density filtering: collapsing repeated ratings and iterative k-core filtering of the
//! user-item interaction graph.

use fnv::FnvHashMap;
use tracing::debug;

use crate::types::{Interaction, InteractionTable};

/// Minimum number of interactions a user (`min_uc`) and an item (`min_sc`) must keep.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Thresholds {
    pub min_uc: usize,
    pub min_sc: usize,
}

impl Default for Thresholds {
    fn default() -> Self {
        Thresholds { min_uc: 5, min_sc: 5 }
    }
}

impl Thresholds {

    /// Thresholds of one or less can never remove a row.
    pub fn is_noop(&self) -> bool {
        self.min_uc <= 1 && self.min_sc <= 1
    }
}

/// What happened during a run of `filter_triplets`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FilterReport {
    /// Number of rounds executed, including the final one which removed nothing.
    pub rounds: usize,
    pub removed: usize,
}

/// Drops every interaction which repeats the item and the rating of the same user's previous
/// interaction. The table is expected in chronological order.
pub fn remove_immediate_repeats(table: InteractionTable) -> InteractionTable {

    let mut previous: FnvHashMap<String, (String, f32)> =
        FnvHashMap::with_capacity_and_hasher(table.len() / 10 + 1, Default::default());

    let mut kept = InteractionTable::with_capacity(table.len());

    for interaction in table.into_iter() {
        let is_repeat = match previous.get(&interaction.uid) {
            Some((sid, rating)) => *sid == interaction.sid && *rating == interaction.rating,
            None => false,
        };

        if !is_repeat {
            previous.insert(
                interaction.uid.clone(),
                (interaction.sid.clone(), interaction.rating),
            );
            kept.push(interaction);
        }
    }

    kept
}

/// Repeatedly removes rows of items with fewer than `min_sc` interactions and then rows of
/// users with fewer than `min_uc` interactions, until a round removes nothing.
pub fn filter_triplets(
    table: InteractionTable,
    thresholds: Thresholds,
) -> (InteractionTable, FilterReport) {

    let mut report = FilterReport::default();

    if table.is_empty() || thresholds.is_noop() {
        return (table, report);
    }

    let mut table = table;

    loop {
        report.rounds += 1;
        let size_before = table.len();

        if thresholds.min_sc > 1 {
            retain_frequent(&mut table, |interaction| &interaction.sid, thresholds.min_sc);
        }

        if thresholds.min_uc > 1 {
            retain_frequent(&mut table, |interaction| &interaction.uid, thresholds.min_uc);
        }

        let removed = size_before - table.len();
        report.removed += removed;

        debug!(round = report.rounds, removed, remaining = table.len(), "k-core round");

        // Each round either shrinks the table or ends the loop.
        if removed == 0 || table.is_empty() {
            break;
        }
    }

    (table, report)
}

/// Keeps the rows whose key occurs at least `min_count` times in the table.
fn retain_frequent<F>(table: &mut InteractionTable, key: F, min_count: usize)
    where F: for<'a> Fn(&'a Interaction) -> &'a String {

    let keep: Vec<bool> = {
        let mut counts: FnvHashMap<&str, usize> = FnvHashMap::default();

        for interaction in table.iter() {
            *counts.entry(key(interaction).as_str()).or_insert(0) += 1;
        }

        table.iter()
            .map(|interaction| counts[key(interaction).as_str()] >= min_count)
            .collect()
    };

    // `Vec::retain` visits every element exactly once, in order.
    let mut keep = keep.into_iter();
    table.retain(|_| keep.next().unwrap_or(false));
}
