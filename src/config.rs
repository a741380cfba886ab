//! Settings of a [`PointPlotter`](crate::PointPlotter) run.
//!
//! The command line tool takes no option: it always runs with
//! [`PlotConfig::default()`].

use std::path::PathBuf;
use crate::points::Columns;

#[derive(Debug, Clone, PartialEq)]
pub struct PlotConfig {
    /// Figure (width, height) in inches.  Portrait letter page.
    pub figsize: (f64, f64),
    /// CSV fields holding the vertical and horizontal coordinates.
    pub columns: Columns,
    /// Matplotlib format string of the points.
    pub fmt: String,
    /// Output file, overwritten.  Its extension selects the format.
    pub output: PathBuf,
    /// Display the figure after saving it.
    pub show: bool,
    /// Matplotlib backend to select first; Matplotlib's own choice
    /// when `None`.
    pub backend: Option<String>,
    pub title: Option<String>,
    pub xlabel: Option<String>,
    pub ylabel: Option<String>,
}

impl Default for PlotConfig {
    fn default() -> Self {
        PlotConfig {
            figsize: (8.5, 11.),
            columns: Columns::default(),
            fmt: ".".to_string(),
            output: PathBuf::from("x.ps"),
            show: true,
            backend: None,
            title: None,
            xlabel: None,
            ylabel: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = PlotConfig::default();
        assert_eq!(c.figsize, (8.5, 11.));
        assert_eq!(c.columns, Columns { first: 1, second: 2 });
        assert_eq!(c.fmt, ".");
        assert_eq!(c.output, PathBuf::from("x.ps"));
        assert!(c.show);
        assert!(c.backend.is_none());
        assert!(c.title.is_none() && c.xlabel.is_none() && c.ylabel.is_none());
    }
}
