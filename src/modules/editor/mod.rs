use crate::modules::ranking::model::NewRankingItem;

/// In-memory drag model for building a ranking out of a candidate pool.
/// Every move is local; nothing is persisted until the projection from
/// `save_items` is handed to the ranking service.
#[derive(Debug, Default, Clone)]
pub struct ListEditor {
    pool: Vec<String>,
    ranking: Vec<String>,
}

impl ListEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pool(items: impl IntoIterator<Item = String>) -> Self {
        let mut editor = Self::new();
        for item in items {
            editor.add_to_pool(item);
        }
        editor
    }

    pub fn pool(&self) -> &[String] {
        &self.pool
    }

    pub fn ranking(&self) -> &[String] {
        &self.ranking
    }

    /// Appends a candidate. An id already present on either side is ignored;
    /// membership across the two collections is exclusive.
    pub fn add_to_pool(&mut self, item_id: String) {
        if !self.pool.contains(&item_id) && !self.ranking.contains(&item_id) {
            self.pool.push(item_id);
        }
    }

    /// Moves a pool item into the ranking at `index` (clamped to the end).
    /// Returns false when the id is not in the pool.
    pub fn move_to_ranking(&mut self, item_id: &str, index: usize) -> bool {
        let Some(pos) = self.pool.iter().position(|id| id == item_id) else {
            return false;
        };
        let item = self.pool.remove(pos);
        let index = index.min(self.ranking.len());
        self.ranking.insert(index, item);
        true
    }

    /// Returns a ranked item to the pool. Dropping an item outside the
    /// ranking is the same gesture.
    pub fn move_to_pool(&mut self, item_id: &str) -> bool {
        let Some(pos) = self.ranking.iter().position(|id| id == item_id) else {
            return false;
        };
        let item = self.ranking.remove(pos);
        self.pool.push(item);
        true
    }

    pub fn drop_outside(&mut self, item_id: &str) -> bool {
        self.move_to_pool(item_id)
    }

    /// Moves the ranked item at `from` to `to`, shifting the rest.
    pub fn reorder(&mut self, from: usize, to: usize) -> bool {
        if from >= self.ranking.len() {
            return false;
        }
        let item = self.ranking.remove(from);
        let to = to.min(self.ranking.len());
        self.ranking.insert(to, item);
        true
    }

    /// The ranking as the persistence layer wants it: positions are the
    /// current order, densely numbered from 1.
    pub fn save_items(&self) -> Vec<NewRankingItem> {
        self.ranking
            .iter()
            .enumerate()
            .map(|(index, id)| NewRankingItem {
                item_id: id.clone(),
                position: index as i32 + 1,
                notes: None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn editor() -> ListEditor {
        ListEditor::with_pool(["a", "b", "c", "d"].map(String::from))
    }

    #[test]
    fn pool_membership_is_deduplicated() {
        let mut editor = editor();
        editor.add_to_pool("a".to_string());
        assert_eq!(editor.pool(), ["a", "b", "c", "d"]);

        editor.move_to_ranking("a", 0);
        editor.add_to_pool("a".to_string());
        assert_eq!(editor.pool(), ["b", "c", "d"]);
    }

    #[test]
    fn moves_preserve_total_membership() {
        let mut editor = editor();
        assert!(editor.move_to_ranking("c", 0));
        assert!(editor.move_to_ranking("a", 1));
        assert!(editor.move_to_pool("c"));

        let mut all: Vec<&str> =
            editor.pool().iter().chain(editor.ranking()).map(String::as_str).collect();
        all.sort_unstable();
        assert_eq!(all, ["a", "b", "c", "d"]);
        assert_eq!(editor.ranking(), ["a"]);
    }

    #[test]
    fn move_index_is_clamped_to_the_end() {
        let mut editor = editor();
        editor.move_to_ranking("a", 99);
        editor.move_to_ranking("b", 99);
        assert_eq!(editor.ranking(), ["a", "b"]);
    }

    #[test]
    fn reorder_shifts_the_rest() {
        let mut editor = editor();
        editor.move_to_ranking("a", 0);
        editor.move_to_ranking("b", 1);
        editor.move_to_ranking("c", 2);

        assert!(editor.reorder(2, 0));
        assert_eq!(editor.ranking(), ["c", "a", "b"]);

        assert!(!editor.reorder(7, 0));
    }

    #[test]
    fn drop_outside_returns_the_item_to_the_pool() {
        let mut editor = editor();
        editor.move_to_ranking("a", 0);
        assert!(editor.drop_outside("a"));
        assert!(editor.ranking().is_empty());
        assert!(editor.pool().contains(&"a".to_string()));
    }

    #[test]
    fn save_items_numbers_positions_densely_from_one() {
        let mut editor = editor();
        editor.move_to_ranking("b", 0);
        editor.move_to_ranking("d", 1);
        editor.move_to_ranking("a", 1);
        editor.reorder(0, 2);

        let items = editor.save_items();
        let positions: Vec<i32> = items.iter().map(|i| i.position).collect();
        assert_eq!(positions, [1, 2, 3]);
        let ids: Vec<&str> = items.iter().map(|i| i.item_id.as_str()).collect();
        assert_eq!(ids, ["a", "d", "b"]);
    }
}
