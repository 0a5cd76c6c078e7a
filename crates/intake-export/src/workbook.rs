//! Workbook model: ordered sheets of string cells

use serde::{Deserialize, Serialize};

/// One named table of string cells
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sheet {
    /// Sheet name
    pub name: String,
    /// Rows, each a list of cells
    pub rows: Vec<Vec<String>>,
}

impl Sheet {
    /// Create empty sheet
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rows: Vec::new(),
        }
    }

    /// Append a row
    pub fn push_row<I, S>(&mut self, cells: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows.push(cells.into_iter().map(Into::into).collect());
    }

    /// Cell at (row, column)
    #[must_use]
    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows.get(row)?.get(column).map(String::as_str)
    }

    /// Number of rows
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check for zero rows
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Derived workbook; sheet order is significant
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkbookModel {
    /// Sheets in output order
    pub sheets: Vec<Sheet>,
}

impl WorkbookModel {
    /// Sheet by name
    #[must_use]
    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    /// Serialize the model to JSON for hand-off to a writer
    ///
    /// # Errors
    /// Propagates serializer failures
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Workbook plus its download name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportFile {
    /// `{projectId}_{sanitizedTitle}.xlsx`
    pub filename: String,
    /// Workbook content
    pub workbook: WorkbookModel,
}
