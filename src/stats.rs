use fnv::FnvHashMap;

use crate::types::{IndexMap, InteractionTable, ItemIndex, UserIndex, UserSequences};

/// Maps user and item identifiers of the source to consecutive integer ids, starting at 0 and
/// handed out in the order in which the identifiers are first encountered.
pub struct DataDictionary {
    user_dict: FnvHashMap<String, UserIndex>,
    item_dict: FnvHashMap<String, ItemIndex>,
    num_interactions: u64,
}

impl DataDictionary {

    pub fn num_users(&self) -> usize {
        self.user_dict.len()
    }

    pub fn num_items(&self) -> usize {
        self.item_dict.len()
    }

    pub fn num_interactions(&self) -> u64 {
        self.num_interactions
    }

    pub fn user_index(&self, name: &str) -> Option<UserIndex> {
        self.user_dict.get(name).cloned()
    }

    pub fn item_index(&self, name: &str) -> Option<ItemIndex> {
        self.item_dict.get(name).cloned()
    }

    /// The user map in the ordered form stored in the packaged artifact.
    pub fn umap(&self) -> IndexMap {
        self.user_dict.iter().map(|(name, index)| (name.clone(), *index)).collect()
    }

    /// The item map in the ordered form stored in the packaged artifact.
    pub fn smap(&self) -> IndexMap {
        self.item_dict.iter().map(|(name, index)| (name.clone(), *index)).collect()
    }
}

impl<'a> From<&'a InteractionTable> for DataDictionary {

    fn from(table: &'a InteractionTable) -> Self {

        let mut user_index: UserIndex = 0;
        let mut user_dict: FnvHashMap<String, UserIndex> =
            FnvHashMap::with_capacity_and_hasher(100, Default::default());

        let mut item_index: ItemIndex = 0;
        let mut item_dict: FnvHashMap<String, ItemIndex> =
            FnvHashMap::with_capacity_and_hasher(100, Default::default());

        let mut num_interactions: u64 = 0;

        for interaction in table.iter() {

            if !user_dict.contains_key(&interaction.uid) {
                user_dict.insert(interaction.uid.clone(), user_index);
                user_index += 1;
            }

            if !item_dict.contains_key(&interaction.sid) {
                item_dict.insert(interaction.sid.clone(), item_index);
                item_index += 1;
            }

            num_interactions += 1;
        }

        DataDictionary { user_dict, item_dict, num_interactions }
    }
}

/// Headline numbers of a packaged dataset. All ratios fall back to zero for empty inputs.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DatasetSummary {
    pub num_users: usize,
    pub num_items: usize,
    pub train_interactions: usize,
    pub val_interactions: usize,
    pub test_interactions: usize,
}

impl DatasetSummary {

    pub fn new(
        num_users: usize,
        num_items: usize,
        train: &UserSequences,
        val: &UserSequences,
        test: &UserSequences,
    ) -> Self {

        let count = |split: &UserSequences| split.values().map(Vec::len).sum::<usize>();

        DatasetSummary {
            num_users,
            num_items,
            train_interactions: count(train),
            val_interactions: count(val),
            test_interactions: count(test),
        }
    }

    pub fn total_interactions(&self) -> usize {
        self.train_interactions + self.val_interactions + self.test_interactions
    }

    /// Percentage of the user-item matrix which is observed.
    pub fn density(&self) -> f64 {
        let cells = self.num_users as f64 * self.num_items as f64;
        ratio(self.total_interactions() as f64, cells) * 100.0
    }

    pub fn interactions_per_user(&self) -> f64 {
        ratio(self.total_interactions() as f64, self.num_users as f64)
    }

    pub fn interactions_per_item(&self) -> f64 {
        ratio(self.total_interactions() as f64, self.num_items as f64)
    }
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 { numerator / denominator } else { 0.0 }
}
