//! Table shape content.

use serde::{Deserialize, Serialize};

use super::rich_text::{Paragraph, RichText};
use super::style::{Border, Fill};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CellBorders {
    pub left: Border,
    pub right: Border,
    pub top: Border,
    pub bottom: Border,
}

impl CellBorders {
    pub fn all(border: Border) -> Self {
        Self {
            left: border.clone(),
            right: border.clone(),
            top: border.clone(),
            bottom: border,
        }
    }
}

/// A table cell. Cells covered by a neighbour's span are kept in the grid
/// with `col_span`/`row_span` of zero so every row has one cell per column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub text: RichText,
    pub fill: Fill,
    pub borders: CellBorders,
    pub col_span: u32,
    pub row_span: u32,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            text: RichText::default(),
            fill: Fill::default(),
            borders: CellBorders::default(),
            col_span: 1,
            row_span: 1,
        }
    }
}

impl Cell {
    pub fn active_paragraph(&mut self) -> &mut Paragraph {
        self.text.active_paragraph()
    }

    pub fn is_merged_away(&self) -> bool {
        self.col_span == 0 || self.row_span == 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    /// Height in EMU.
    pub height: i64,
    pub cells: Vec<Cell>,
    pub fill: Option<Fill>,
}

impl Row {
    pub fn cell_mut(&mut self, index: usize) -> Option<&mut Cell> {
        self.cells.get_mut(index)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    /// Column widths in EMU.
    pub columns: Vec<i64>,
    pub rows: Vec<Row>,
    pub first_row: bool,
    pub band_row: bool,
}

impl Table {
    /// Empty table with `columns` columns of equal width over `width` EMU.
    pub fn new(columns: usize, width: i64) -> Self {
        let columns = columns.max(1);
        Self {
            columns: vec![width / columns as i64; columns],
            rows: Vec::new(),
            first_row: true,
            band_row: true,
        }
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn create_row(&mut self, height: i64) -> &mut Row {
        self.rows.push(Row {
            height,
            cells: vec![Cell::default(); self.columns.len()],
            fill: None,
        });
        let last = self.rows.len() - 1;
        &mut self.rows[last]
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&Cell> {
        self.rows.get(row).and_then(|r| r.cells.get(column))
    }

    pub fn cell_mut(&mut self, row: usize, column: usize) -> Option<&mut Cell> {
        self.rows.get_mut(row).and_then(|r| r.cells.get_mut(column))
    }

    /// Merge `cols` x `rows` cells starting at (`row`, `column`). Returns
    /// `false` when the range leaves the grid.
    pub fn merge(&mut self, row: usize, column: usize, rows: u32, cols: u32) -> bool {
        let row_end = row + rows.max(1) as usize;
        let col_end = column + cols.max(1) as usize;
        if row_end > self.rows.len() || col_end > self.columns.len() {
            return false;
        }
        for r in row..row_end {
            for c in column..col_end {
                let cell = &mut self.rows[r].cells[c];
                if r == row && c == column {
                    cell.row_span = rows.max(1);
                    cell.col_span = cols.max(1);
                } else {
                    cell.row_span = if r == row { 1 } else { 0 };
                    cell.col_span = if c == column { 1 } else { 0 };
                }
            }
        }
        true
    }

    pub fn height(&self) -> i64 {
        self.rows.iter().map(|r| r.height).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_have_one_cell_per_column() {
        let mut table = Table::new(3, 3_000_000);
        table.create_row(370_840);
        table.create_row(370_840);
        assert_eq!(table.columns, vec![1_000_000; 3]);
        assert!(table.rows.iter().all(|r| r.cells.len() == 3));
        assert_eq!(table.height(), 741_680);
    }

    #[test]
    fn test_merge_marks_covered_cells() {
        let mut table = Table::new(3, 3_000_000);
        table.create_row(100);
        table.create_row(100);
        assert!(table.merge(0, 0, 2, 2));
        let origin = table.cell(0, 0).unwrap();
        assert_eq!((origin.row_span, origin.col_span), (2, 2));
        assert!(table.cell(0, 1).unwrap().is_merged_away());
        assert!(table.cell(1, 1).unwrap().is_merged_away());
        assert!(!table.cell(0, 2).unwrap().is_merged_away());
        assert!(!table.merge(1, 2, 2, 1));
    }
}
