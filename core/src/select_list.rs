//! Value/label pairs for dropdown-style pickers.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectItem {
    pub value: String,
    pub text: String,
}

/// Build one `SelectItem` per item, in order, from the `Display` forms of
/// the two accessors.
pub fn to_select_list<T, K, L>(items: &[T], value: impl Fn(&T) -> K, text: impl Fn(&T) -> L) -> Vec<SelectItem>
where
    K: fmt::Display,
    L: fmt::Display,
{
    items
        .iter()
        .map(|item| SelectItem {
            value: value(item).to_string(),
            text: text(item).to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Item {
        id: u32,
        name: &'static str,
    }

    #[test]
    fn converts_items_in_order() {
        let items = [
            Item { id: 1, name: "Item 1" },
            Item { id: 2, name: "Item 2" },
            Item { id: 3, name: "Item 3" },
        ];

        let list = to_select_list(&items, |i| i.id, |i| i.name);

        assert_eq!(list.len(), items.len());
        for (item, entry) in items.iter().zip(&list) {
            assert_eq!(entry.value, item.id.to_string());
            assert_eq!(entry.text, item.name);
        }
    }

    #[test]
    fn empty_input_gives_empty_list() {
        let items: [Item; 0] = [];
        assert!(to_select_list(&items, |i| i.id, |i| i.name).is_empty());
    }
}
