//! View-level enums shared by the widgets and the file view.

use std::cmp::Ordering;

use serde::Deserialize;

/// Presentation of the folder contents.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
pub enum ViewStyle {
    /// Grid of small icons
    #[serde(rename = "small-icon")]
    SmallIcons,
    /// Grid of large icons
    #[serde(rename = "large-icon")]
    LargeIcons,
    /// Sortable table (default); unknown names also land here
    #[default]
    #[serde(rename = "list", other)]
    List,
}

impl ViewStyle {
    pub fn is_list(self) -> bool {
        matches!(self, Self::List)
    }

    /// Name passed to the item context (`list` or `icon`).
    pub fn kind(self) -> &'static str {
        if self.is_list() { "list" } else { "icon" }
    }
}

/// Direction of the active sort column.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    /// Apply the direction to an ascending ordering.
    #[inline]
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Ascending => ordering,
            Self::Descending => ordering.reverse(),
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    /// Header indicator class.
    pub fn css_class(self) -> &'static str {
        match self {
            Self::Ascending => "sort-asc",
            Self::Descending => "sort-desc",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_style_from_settings() {
        let style: ViewStyle = serde_json::from_str("\"large-icon\"").unwrap();
        assert_eq!(style, ViewStyle::LargeIcons);
        let style: ViewStyle = serde_json::from_str("\"whatever\"").unwrap();
        assert_eq!(style, ViewStyle::List);
        let style: ViewStyle = serde_json::from_str("\"list\"").unwrap();
        assert_eq!(style, ViewStyle::List);
        assert_eq!(ViewStyle::default(), ViewStyle::List);
    }

    #[test]
    fn test_direction_apply() {
        assert_eq!(SortDirection::Descending.apply(Ordering::Less), Ordering::Greater);
        assert_eq!(SortDirection::Ascending.toggled(), SortDirection::Descending);
    }
}
