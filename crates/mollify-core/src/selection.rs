//! Select mode and the set of selected items.

use crate::models::FilesystemItem;

/// Ordered, unique-by-id selection. Only meaningful in select mode.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Selection {
    mode: bool,
    items: Vec<FilesystemItem>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.mode
    }

    /// Enter or leave select mode. Both directions start empty.
    pub fn set_mode(&mut self, on: bool) {
        self.mode = on;
        self.items.clear();
    }

    pub fn items(&self) -> &[FilesystemItem] {
        &self.items
    }

    pub fn ids(&self) -> Vec<String> {
        self.items.iter().map(|i| i.id.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.items.iter().any(|i| i.id == id)
    }

    /// Toggle an item. Ignored outside select mode.
    pub fn toggle(&mut self, item: &FilesystemItem) {
        if !self.mode {
            return;
        }
        if let Some(pos) = self.items.iter().position(|i| i.id == item.id) {
            self.items.remove(pos);
        } else {
            self.items.push(item.clone());
        }
    }

    /// Enter select mode with every item selected.
    pub fn select_all(&mut self, items: &[FilesystemItem]) {
        self.mode = true;
        self.items = items.to_vec();
    }

    /// Enter select mode with nothing selected.
    pub fn select_none(&mut self) {
        self.mode = true;
        self.items.clear();
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Keep only items still listed, refreshed to their new snapshot.
    pub fn reconcile(&mut self, listing: &[FilesystemItem]) {
        self.items = self
            .items
            .iter()
            .filter_map(|sel| listing.iter().find(|i| i.id == sel.id).cloned())
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(id: &str) -> FilesystemItem {
        FilesystemItem::file(id, "r1", format!("{}.txt", id), format!("{}.txt", id), 1)
    }

    #[test]
    fn test_toggle_requires_select_mode() {
        let mut sel = Selection::new();
        sel.toggle(&file("a"));
        assert!(sel.is_empty());

        sel.set_mode(true);
        sel.toggle(&file("a"));
        sel.toggle(&file("b"));
        sel.toggle(&file("a"));
        assert_eq!(sel.ids(), ["b"]);
    }

    #[test]
    fn test_mode_toggle_starts_fresh() {
        let mut sel = Selection::new();
        sel.select_all(&[file("a"), file("b")]);
        assert_eq!(sel.len(), 2);
        sel.set_mode(false);
        sel.set_mode(true);
        assert!(sel.is_empty());

        sel.toggle(&file("a"));
        sel.select_none();
        assert!(sel.is_active());
        assert!(sel.is_empty());
    }

    #[test]
    fn test_reconcile_drops_missing_items() {
        let mut sel = Selection::new();
        sel.select_all(&[file("a"), file("b"), file("c")]);
        let mut renamed = file("c");
        renamed.name = "renamed.txt".into();
        sel.reconcile(&[renamed.clone(), file("d")]);
        assert_eq!(sel.items(), &[renamed]);
    }
}
