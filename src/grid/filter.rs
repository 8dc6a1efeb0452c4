use regex::Regex;

use crate::model::Record;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FilterOp {
    Eq,
    Ne,
    Like,
    Starts,
    Ends,
    Regex,
}

impl FilterOp {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "=" | "==" | "eq" => Some(Self::Eq),
            "!=" | "ne" => Some(Self::Ne),
            "like" | "~" => Some(Self::Like),
            "starts" => Some(Self::Starts),
            "ends" => Some(Self::Ends),
            "regex" => Some(Self::Regex),
            _ => None,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Ne => "!=",
            Self::Like => "like",
            Self::Starts => "starts",
            Self::Ends => "ends",
            Self::Regex => "regex",
        }
    }
}

#[derive(Clone, Debug)]
pub struct RowFilter {
    pub field: String,
    pub op: FilterOp,
    pub value: String,
    pattern: Option<Regex>,
}

impl RowFilter {
    pub fn new(field: &str, op: FilterOp, value: &str) -> Result<Self, String> {
        let pattern = match op {
            FilterOp::Regex => Some(
                Regex::new(value).map_err(|e| format!("invalid filter regex '{value}': {e}"))?,
            ),
            _ => None,
        };
        Ok(Self {
            field: field.trim().to_string(),
            op,
            value: value.to_string(),
            pattern,
        })
    }

    pub fn matches(&self, record: &Record) -> bool {
        let cell = record.cell(&self.field);
        match self.op {
            FilterOp::Eq => cell == self.value,
            FilterOp::Ne => cell != self.value,
            FilterOp::Like => {
                // An empty needle lets every row through.
                self.value.is_empty() || cell.to_lowercase().contains(&self.value.to_lowercase())
            }
            FilterOp::Starts => cell.to_lowercase().starts_with(&self.value.to_lowercase()),
            FilterOp::Ends => cell.to_lowercase().ends_with(&self.value.to_lowercase()),
            FilterOp::Regex => self
                .pattern
                .as_ref()
                .map(|re| re.is_match(&cell))
                .unwrap_or(false),
        }
    }
}
