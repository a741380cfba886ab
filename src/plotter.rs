//! Read points, plot them, save and show the figure.

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};
use crate::{
    config::PlotConfig,
    points::{read_points, Points, ReadError},
    Axes, Figure,
};

#[derive(Debug, Error)]
pub enum PlotError {
    #[error(transparent)]
    Read(#[from] ReadError),
    #[error(transparent)]
    Render(#[from] crate::Error),
}

/// Outcome of a successful [`PointPlotter::run`].
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    /// Number of points plotted.
    pub points: usize,
    /// File the figure was saved to.
    pub output: PathBuf,
}

#[derive(Debug, Clone, Default)]
pub struct PointPlotter {
    config: PlotConfig,
}

impl PointPlotter {
    pub fn new(config: PlotConfig) -> Self {
        PointPlotter { config }
    }

    pub fn config(&self) -> &PlotConfig {
        &self.config
    }

    /// Plot the points of the CSV file `input`.
    ///
    /// All rows are read before any figure is created, so a malformed
    /// input leaves the output file untouched.  The figure is shown
    /// only once it has been saved.
    pub fn run(&self, input: impl AsRef<Path>) -> Result<Summary, PlotError> {
        let input = input.as_ref();
        let points = read_points(input, self.config.columns)?;
        info!(points = points.len(), input = %input.display(), "read points");
        if points.is_empty() {
            warn!(input = %input.display(), "no points, the plot is empty");
        }
        if let Some(backend) = &self.config.backend {
            crate::use_backend(backend)?;
        }
        self.render(&points)?;
        if self.config.show {
            crate::show()?;
        }
        Ok(Summary { points: points.len(),
                     output: self.config.output.clone() })
    }

    /// Plot `yy` horizontally against `xx` vertically on a new figure
    /// and save it to the configured output.
    pub fn render(&self, points: &Points) -> Result<(), crate::Error> {
        let (fig, _) = self.plot(points)?;
        let output = &self.config.output;
        fig.save().to_file(output)?;
        info!(output = %output.display(), "figure saved");
        Ok(())
    }

    /// The figure [`render`](Self::render) saves, with its plot area.
    pub fn plot(&self, points: &Points) -> Result<(Figure, Axes), crate::Error> {
        let c = &self.config;
        // Only pyplot figures can be shown.
        let fig = if c.show { crate::figure(c.figsize)? }
                  else { Figure::new(c.figsize)? };
        let mut ax = fig.add_subplot()?;
        if let Some(title) = &c.title {
            ax.set_title(title)?;
        }
        if let Some(label) = &c.xlabel {
            ax.set_xlabel(label)?;
        }
        if let Some(label) = &c.ylabel {
            ax.set_ylabel(label)?;
        }
        ax.xy(points.yy(), points.xx()).fmt(&c.fmt).plot()?;
        Ok((fig, ax))
    }
}
