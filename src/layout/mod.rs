use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LayoutError {
    #[error("split needs at least two panels, got {count}")]
    TooFewPanels { count: usize },

    #[error("split sizes {sizes:?} do not match {count} panels")]
    SizeMismatch { sizes: Vec<u16>, count: usize },

    #[error("invalid orientation '{value}', expected h or v")]
    InvalidOrientation { value: String },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Orientation {
    /// Panels side by side.
    #[default]
    Horizontal,
    /// Panels stacked.
    Vertical,
}

impl Orientation {
    pub fn parse(value: &str) -> Result<Self, LayoutError> {
        match value.trim().to_lowercase().as_str() {
            "h" | "horizontal" | "row" => Ok(Self::Horizontal),
            "v" | "vertical" | "column" => Ok(Self::Vertical),
            _ => Err(LayoutError::InvalidOrientation {
                value: value.to_string(),
            }),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Horizontal => "h",
            Self::Vertical => "v",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SplitConfig {
    pub panels: Vec<&'static str>,
    pub direction: Orientation,
    /// Percentages, one per panel. Empty means an even split.
    pub sizes: Vec<u16>,
    pub min_size: Vec<u16>,
    pub gutter_size: u16,
}

/// A live split between panels. Tear it down with [`SplitPane::destroy`]
/// before initializing a replacement over the same panels.
#[derive(Debug, PartialEq, Eq)]
pub struct SplitPane {
    config: SplitConfig,
    live: bool,
}

impl SplitPane {
    pub fn init(config: SplitConfig) -> Result<Self, LayoutError> {
        let count = config.panels.len();
        if count < 2 {
            return Err(LayoutError::TooFewPanels { count });
        }
        if !config.sizes.is_empty() && config.sizes.len() != count {
            return Err(LayoutError::SizeMismatch {
                sizes: config.sizes.clone(),
                count,
            });
        }
        debug!(panels = ?config.panels, direction = config.direction.label(), "split initialized");
        Ok(Self { config, live: true })
    }

    pub fn destroy(&mut self) {
        debug!(panels = ?self.config.panels, "split destroyed");
        self.live = false;
    }

    pub fn is_live(&self) -> bool {
        self.live
    }

    pub fn config(&self) -> &SplitConfig {
        &self.config
    }

    /// Splits `extent` cells across the panels by percentage, keeping the
    /// gutter between them and honoring each panel's minimum.
    pub fn partition(&self, extent: u16, cell_px: u16) -> Vec<u16> {
        let count = self.config.panels.len() as u16;
        let gutters = self.config.gutter_size.div_ceil(cell_px.max(1)) * (count - 1);
        let usable = extent.saturating_sub(gutters);
        let sizes: Vec<u16> = if self.config.sizes.is_empty() {
            vec![100 / count; count as usize]
        } else {
            self.config.sizes.clone()
        };
        let mut out: Vec<u16> = sizes
            .iter()
            .map(|pct| (u32::from(usable) * u32::from(*pct) / 100) as u16)
            .collect();
        for (idx, cells) in out.iter_mut().enumerate() {
            let min_px = self.config.min_size.get(idx).copied().unwrap_or(0);
            let min_cells = min_px / cell_px.max(1);
            if *cells < min_cells {
                *cells = min_cells.min(usable);
            }
        }
        out
    }
}

/// The dashboard's two splits: record table over info area, and the raw
/// record pane beside (or over) the selection summary pane.
#[derive(Debug)]
pub struct DashboardLayout {
    main: SplitPane,
    info: SplitPane,
}

pub fn main_split_config() -> SplitConfig {
    SplitConfig {
        panels: vec!["records_table", "info"],
        direction: Orientation::Vertical,
        sizes: vec![30, 70],
        min_size: Vec::new(),
        gutter_size: 30,
    }
}

pub fn info_split_config(direction: Orientation) -> SplitConfig {
    let min = match direction {
        Orientation::Horizontal => 200,
        Orientation::Vertical => 100,
    };
    SplitConfig {
        panels: vec!["info_left", "info_right"],
        direction,
        sizes: Vec::new(),
        min_size: vec![min, min],
        gutter_size: 10,
    }
}

impl DashboardLayout {
    pub fn new(orientation: Orientation) -> Result<Self, LayoutError> {
        Ok(Self {
            main: SplitPane::init(main_split_config())?,
            info: SplitPane::init(info_split_config(orientation))?,
        })
    }

    pub fn main(&self) -> &SplitPane {
        &self.main
    }

    pub fn info(&self) -> &SplitPane {
        &self.info
    }

    pub fn orientation(&self) -> Orientation {
        self.info.config().direction
    }

    /// Tears down the info split and rebuilds it in the new direction.
    pub fn change_panes(&mut self, direction: Orientation) -> Result<(), LayoutError> {
        self.info.destroy();
        self.info = SplitPane::init(info_split_config(direction))?;
        Ok(())
    }
}
