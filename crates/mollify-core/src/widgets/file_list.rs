//! Table widget with sortable, resizable columns.
//!
//! Column index 0 is the selection toggle, index 1 the item icon and the
//! configured columns follow from index 2.

use std::collections::HashMap;

use super::{ClickTarget, ItemWidget, WidgetEvent};
use crate::columns::{CellContent, ColumnContext, ColumnSpec, data_request};
use crate::format::Formatters;
use crate::models::{AuxData, DataRequest, FilesystemItem, Root, SortDirection};
use crate::texts::Texts;

/// Columns that precede the configured ones.
const FIXED_COLUMNS: usize = 2;

/// Header cell render model.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeaderCell {
    pub id: String,
    pub title: String,
    pub width: Option<u32>,
    pub min_width: u32,
    /// Set on the active sort column.
    pub sort: Option<SortDirection>,
}

/// Row render model.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Row {
    pub item: FilesystemItem,
    pub type_class: String,
    pub cells: Vec<CellContent>,
}

#[derive(Clone, Debug)]
pub struct FileList {
    columns: Vec<ColumnSpec>,
    sort_column: usize,
    direction: SortDirection,
    widths: HashMap<String, u32>,
    items: Vec<FilesystemItem>,
    data: AuxData,
    roots: Vec<Root>,
    formatters: Formatters,
    select_mode: bool,
}

impl FileList {
    /// Create a list sorted ascending by its first column.
    ///
    /// `widths` carries user-resized widths from a previous instance.
    pub fn new(
        columns: Vec<ColumnSpec>,
        roots: Vec<Root>,
        formatters: Formatters,
        widths: HashMap<String, u32>,
    ) -> Self {
        let list = Self {
            columns,
            sort_column: 0,
            direction: SortDirection::Ascending,
            widths,
            items: Vec::new(),
            data: AuxData::new(),
            roots,
            formatters,
            select_mode: false,
        };
        for column in &list.columns {
            if let Some(hook) = column.on_init {
                hook(column);
            }
        }
        list
    }

    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    pub fn sort_column(&self) -> Option<&str> {
        self.columns.get(self.sort_column).map(|c| c.id.as_str())
    }

    pub fn direction(&self) -> SortDirection {
        self.direction
    }

    /// Toggle direction on the active column, else sort ascending by `id`.
    pub fn header_click(&mut self, id: &str) {
        let Some(index) = self.columns.iter().position(|c| c.id == id) else {
            return;
        };
        if index == self.sort_column {
            self.direction = self.direction.toggled();
        } else {
            self.sort_column = index;
            self.direction = SortDirection::Ascending;
        }
        self.sort();
    }

    /// Resize a column; returns the applied (clamped) width.
    pub fn resize(&mut self, id: &str, width: u32) -> Option<u32> {
        let column = self.columns.iter().find(|c| c.id == id)?;
        let width = column.clamp_width(width);
        self.widths.insert(id.to_string(), width);
        Some(width)
    }

    pub fn width(&self, id: &str) -> Option<u32> {
        self.widths
            .get(id)
            .copied()
            .or_else(|| self.columns.iter().find(|c| c.id == id)?.width)
    }

    /// User-resized widths, kept when the widget is recreated.
    pub fn widths(&self) -> &HashMap<String, u32> {
        &self.widths
    }

    pub fn header_cells(&self, texts: &Texts) -> Vec<HeaderCell> {
        self.columns
            .iter()
            .enumerate()
            .map(|(i, column)| HeaderCell {
                id: column.id.clone(),
                title: column.display_title(texts),
                width: self.width(&column.id),
                min_width: column.effective_min_width(),
                sort: (i == self.sort_column).then_some(self.direction),
            })
            .collect()
    }

    fn context(&self) -> ColumnContext<'_> {
        ColumnContext {
            data: &self.data,
            roots: &self.roots,
            formatters: &self.formatters,
        }
    }

    pub fn rows(&self) -> Vec<Row> {
        let ctx = self.context();
        self.items
            .iter()
            .map(|item| Row {
                item: item.clone(),
                type_class: item.type_class(),
                cells: self.columns.iter().map(|c| c.render(item, &ctx)).collect(),
            })
            .collect()
    }

    fn sort(&mut self) {
        let Some(column) = self.columns.get(self.sort_column) else {
            return;
        };
        let ctx = ColumnContext {
            data: &self.data,
            roots: &self.roots,
            formatters: &self.formatters,
        };
        let direction = self.direction;
        self.items
            .sort_by(|a, b| column.compare(a, b, direction, &ctx));
    }

    fn target(&self, column_index: usize) -> Option<ClickTarget> {
        match column_index {
            0 => None,
            1 => Some(ClickTarget::Icon),
            i => self
                .columns
                .get(i - FIXED_COLUMNS)
                .map(|c| ClickTarget::Column(c.id.clone())),
        }
    }

    /// Click on the cell at `column_index` of the row for `item_id`.
    pub fn click(&self, item_id: &str, column_index: usize) -> Option<WidgetEvent> {
        let item = self.find(item_id)?.clone();
        if column_index == 0 {
            return self
                .select_mode
                .then_some(WidgetEvent::SelectUnselect(item));
        }
        let target = self.target(column_index)?;
        Some(WidgetEvent::Click { item, target })
    }

    pub fn right_click(&self, item_id: &str, column_index: usize) -> Option<WidgetEvent> {
        let item = self.find(item_id)?.clone();
        let target = self.target(column_index)?;
        Some(WidgetEvent::RightClick { item, target })
    }

    pub fn dbl_click(&self, item_id: &str) -> Option<WidgetEvent> {
        self.find(item_id).cloned().map(WidgetEvent::DblClick)
    }
}

impl ItemWidget for FileList {
    fn data_request(&self) -> DataRequest {
        data_request(&self.columns)
    }

    fn set_content(&mut self, items: Vec<FilesystemItem>, data: AuxData) {
        self.items = items;
        self.data = data;
        self.sort();
    }

    fn items(&self) -> &[FilesystemItem] {
        &self.items
    }

    fn data(&self) -> &AuxData {
        &self.data
    }

    fn set_select_mode(&mut self, on: bool) {
        self.select_mode = on;
    }

    fn select_mode(&self) -> bool {
        self.select_mode
    }
}
