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

//! Turns a filtered interaction table into dense per-user sequences, split leave-two-out.
//!
//! For a user with the chronological sequence `[i1, i2, i3, i4, i5]` the splits hold
//! `train = [i1, i2, i3]`, `val = [i4]` and `test = [i5]`. Validation asks for `i4` given the
//! training history, test asks for `i5` given the training history followed by `i4`. Users with
//! fewer than three interactions only appear in `train`.

use serde_derive::{Deserialize, Serialize};

use crate::stats::{DataDictionary, DatasetSummary};
use crate::types::{IndexMap, InteractionTable, ItemIndex, Timestamp, UserIndex, UserSequences};

/// Sequences shorter than this go to `train` in full.
pub const MIN_SPLITTABLE_LENGTH: usize = 3;

/// The persisted artifact. Downstream consumers depend on exactly these five field names.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PackagedDataset {
    pub train: UserSequences,
    pub val: UserSequences,
    pub test: UserSequences,
    pub umap: IndexMap,
    pub smap: IndexMap,
}

impl PackagedDataset {

    pub fn num_users(&self) -> usize {
        self.umap.len()
    }

    pub fn num_items(&self) -> usize {
        self.smap.len()
    }

    /// The history from which the validation target of `user` is predicted.
    pub fn val_history(&self, user: UserIndex) -> Option<&[ItemIndex]> {
        if self.val.contains_key(&user) {
            self.train.get(&user).map(Vec::as_slice)
        } else {
            None
        }
    }

    /// The history from which the test target of `user` is predicted.
    pub fn test_history(&self, user: UserIndex) -> Option<Vec<ItemIndex>> {
        if !self.test.contains_key(&user) {
            return None;
        }

        let mut history = self.train.get(&user)?.clone();
        history.extend(self.val.get(&user)?.iter().cloned());

        Some(history)
    }

    pub fn summary(&self) -> DatasetSummary {
        DatasetSummary::new(self.num_users(), self.num_items(), &self.train, &self.val, &self.test)
    }
}

/// Re-indexes users and items densely and splits every user's chronological sequence.
pub fn package(table: &InteractionTable) -> PackagedDataset {

    let data_dict = DataDictionary::from(table);

    let mut histories: Vec<Vec<(Timestamp, ItemIndex)>> = vec![Vec::new(); data_dict.num_users()];

    for interaction in table.iter() {
        // Both lookups succeed, the dictionary was built from this very table.
        if let (Some(user), Some(item)) = (
            data_dict.user_index(&interaction.uid),
            data_dict.item_index(&interaction.sid),
        ) {
            histories[user as usize].push((interaction.timestamp, item));
        }
    }

    let mut dataset = PackagedDataset {
        umap: data_dict.umap(),
        smap: data_dict.smap(),
        ..PackagedDataset::default()
    };

    for (user, mut history) in histories.into_iter().enumerate() {
        let user = user as UserIndex;

        // Stable, so ties keep the order of the table.
        history.sort_by_key(|&(timestamp, _)| timestamp);
        let mut sequence: Vec<ItemIndex> = history.into_iter().map(|(_, item)| item).collect();

        if sequence.len() >= MIN_SPLITTABLE_LENGTH {
            let test_target = sequence.split_off(sequence.len() - 1);
            let val_target = sequence.split_off(sequence.len() - 1);
            dataset.val.insert(user, val_target);
            dataset.test.insert(user, test_target);
        }

        dataset.train.insert(user, sequence);
    }

    dataset
}
