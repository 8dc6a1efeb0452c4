use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ColumnError {
    #[error("unknown column '{name}', expected one of: {expected}")]
    UnknownColumn { name: String, expected: String },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ColumnDef {
    pub title: &'static str,
    pub field: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
}

/// Every column the grid can show, in display order.
pub const CATALOG: [ColumnDef; 6] = [
    ColumnDef {
        title: "Id",
        field: "id",
        width: Some(150),
    },
    ColumnDef {
        title: "Authority Id",
        field: "authority_id",
        width: None,
    },
    ColumnDef {
        title: "Time Created",
        field: "tcreated",
        width: Some(300),
    },
    ColumnDef {
        title: "status",
        field: "resolved_status",
        width: None,
    },
    ColumnDef {
        title: "url",
        field: "resolved_url",
        width: Some(600),
    },
    ColumnDef {
        title: "elapsed",
        field: "resolve_elapsed",
        width: None,
    },
];

fn catalog_index(name: &str) -> Result<usize, ColumnError> {
    let wanted = name.trim();
    CATALOG
        .iter()
        .position(|c| c.field.eq_ignore_ascii_case(wanted) || c.title.eq_ignore_ascii_case(wanted))
        .ok_or_else(|| ColumnError::UnknownColumn {
            name: wanted.to_string(),
            expected: CATALOG
                .iter()
                .map(|c| c.field)
                .collect::<Vec<_>>()
                .join(", "),
        })
}

/// Checked state of the six column toggles.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColumnToggles {
    checked: [bool; 6],
}

impl Default for ColumnToggles {
    fn default() -> Self {
        Self { checked: [true; 6] }
    }
}

impl ColumnToggles {
    pub fn none() -> Self {
        Self {
            checked: [false; 6],
        }
    }

    /// Toggles with exactly the named columns checked. Accepts field names
    /// or titles, case-insensitively.
    pub fn from_names<I, S>(names: I) -> Result<Self, ColumnError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut toggles = Self::none();
        for name in names {
            if name.as_ref().trim().is_empty() {
                continue;
            }
            toggles.set(name.as_ref(), true)?;
        }
        Ok(toggles)
    }

    pub fn parse_csv(raw: &str) -> Result<Self, ColumnError> {
        Self::from_names(raw.split(','))
    }

    pub fn set(&mut self, name: &str, checked: bool) -> Result<(), ColumnError> {
        let idx = catalog_index(name)?;
        self.checked[idx] = checked;
        Ok(())
    }

    pub fn is_checked(&self, name: &str) -> Result<bool, ColumnError> {
        Ok(self.checked[catalog_index(name)?])
    }

    pub fn checked_count(&self) -> usize {
        self.checked.iter().filter(|c| **c).count()
    }
}

/// Column set for the grid: the checked columns in catalog order. An empty
/// result is valid and renders a table with no columns.
pub fn project(toggles: &ColumnToggles) -> Vec<ColumnDef> {
    CATALOG
        .iter()
        .zip(toggles.checked.iter())
        .filter(|(_, checked)| **checked)
        .map(|(col, _)| *col)
        .collect()
}
