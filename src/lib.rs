//! Scatter plot the points of a CSV file with [Matplotlib][].
//!
//! Usage
//! -----
//!
//! [`PointPlotter`] reads two columns of a header-less CSV file into a
//! [`Points`] sequence, plots them as dots on a single figure and saves
//! it (PostScript `x.ps` by default) before showing it on screen.
//!
//! The small Matplotlib interface used for that ([`figure`],
//! [`Figure`], [`Axes`], [`show`]) is close to Matplotlib's explicit
//! one while keeping a Rust flavor.
//!
//! [Matplotlib]: https://matplotlib.org/

use std::path::Path;
use lazy_static::lazy_static;
use pyo3::{
    prelude::*,
    intern,
    exceptions::{PyFileNotFoundError, PyPermissionError},
    types::PyDict,
};
use numpy::PyArray1;

pub mod config;
pub mod points;
pub mod plotter;

pub use config::PlotConfig;
pub use points::{read_points, read_points_from, Columns, Points, ReadError};
pub use plotter::{PlotError, PointPlotter, Summary};

/// Call the method `$m` of the Python object `$obj` with the
/// positional arguments `$args`, discarding the returned value.
macro_rules! meth {
    ($obj: expr, $m: ident, $py: ident -> $args: expr) => {
        Python::with_gil(|$py| {
            $obj.bind($py).call_method1(intern!($py, stringify!($m)), $args)
                .map(|_| ())
                .map_err(Error::Python)
        })
    };
    ($obj: expr, $m: ident, $args: expr) => {
        meth!($obj, $m, py -> $args)
    };
}

/// Possible errors of matplotlib functions.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The Python library "matplotlib" (or "numpy") was not found.
    #[error("The matplotlib library has not been found.\n\
             Please install it (with numpy).  See https://matplotlib.org/\n\
             If you use Anaconda, see https://github.com/PyO3/pyo3/issues/1554")]
    NoMatplotlib,
    /// The path contains an element that is not a directory or does
    /// not exist.
    #[error("A path contains an element that is not a directory or \
             does not exist")]
    FileNotFoundError,
    /// Permission denied to access or create the filesystem path.
    #[error("Permission denied to access or create the filesystem path")]
    PermissionError,
    /// The horizontal and vertical data do not have the same length.
    #[error("Cannot plot {x} horizontal values against {y} vertical ones")]
    LengthMismatch { x: usize, y: usize },
    /// Other Python errors.
    #[error("Python error: {0}")]
    Python(#[from] PyErr),
}

/// Import and return a handle to the module `$m`.
macro_rules! pyimport { ($m: literal) => {
    Python::with_gil(|py|
        PyModule::import_bound(py, $m).map(|m| m.unbind()))
}}

lazy_static! {
    // Import matplotlib modules.
    static ref MATPLOTLIB: Result<Py<PyModule>, PyErr> = {
        pyimport!("matplotlib")
    };
    static ref FIGURE: Result<Py<PyModule>, PyErr> = {
        pyimport!("matplotlib.figure")
    };
    static ref PYPLOT: Result<Py<PyModule>, PyErr> = {
        pyimport!("matplotlib.pyplot")
    };
    static ref NUMPY: Result<Py<PyModule>, PyErr> = {
        pyimport!("numpy")
    };
}

/// Return a handle to the module `$m`.
/// ⚠ This may try to lock Python's GIL.  Make sure it is executed
/// outside a call to `Python::with_gil`.
macro_rules! pymod { ($m: ident) => {
    $m.as_ref().map_err(|_| Error::NoMatplotlib)
}}

/// Trait expressing that `Self` can be converted to a numpy.ndarray.
pub trait Data {
    /// Number of values.
    fn size(&self) -> usize;

    /// Copy the values into a new one dimensional `numpy.ndarray`.
    /// numpy must be importable (see [`Error::NoMatplotlib`]).
    fn to_numpy(&self, py: Python<'_>) -> PyObject;
}

impl<T> Data for T where T: AsRef<[f64]> + ?Sized {
    fn size(&self) -> usize {
        self.as_ref().len()
    }

    fn to_numpy(&self, py: Python<'_>) -> PyObject {
        PyArray1::from_slice_bound(py, self.as_ref()).into_any().unbind()
    }
}

#[derive(Debug)]
pub struct Axes {
    ax: PyObject, // instance of matplotlib.axes.Axes
}

/// The top level container for all the plot elements.
#[derive(Debug)]
pub struct Figure {
    fig: PyObject, // instance of matplotlib.figure.Figure
}

/// Keyword arguments `figsize=(width, height)`, in inches.
fn figsize(py: Python<'_>, (width, height): (f64, f64))
           -> Result<Bound<'_, PyDict>, Error> {
    let kwargs = PyDict::new_bound(py);
    kwargs.set_item("figsize", (width, height))?;
    Ok(kwargs)
}

impl Figure {
    /// Return a new `Figure` of `size` = (width, height) inches.
    ///
    /// The figure is not managed by pyplot: [`show`] will not display
    /// it but it can be rendered without any GUI backend.
    pub fn new(size: (f64, f64)) -> Result<Figure, Error> {
        let figure = pymod!(FIGURE)?;
        Python::with_gil(|py| {
            let kwargs = figsize(py, size)?;
            let fig = figure.bind(py)
                .call_method(intern!(py, "Figure"), (), Some(&kwargs))?;
            Ok(Self { fig: fig.unbind() })
        })
    }

    /// Add a single plot area spanning the whole figure.
    pub fn add_subplot(&self) -> Result<Axes, Error> {
        Python::with_gil(|py| {
            let ax = self.fig.bind(py)
                .call_method1(intern!(py, "add_subplot"), (111,))?;
            Ok(Axes { ax: ax.unbind() })
        })
    }

    pub fn save(&self) -> Savefig<'_> {
        Savefig { fig: self, dpi: None }
    }
}

pub struct Savefig<'a> {
    fig: &'a Figure,
    dpi: Option<f64>,
}

impl Savefig<'_> {
    pub fn dpi(&mut self, dpi: f64) -> &mut Self {
        if dpi > 0. {
            self.dpi = Some(dpi);
        } else {
            self.dpi = None;
        }
        self
    }

    /// Write the figure to `path`, replacing any existing file.  The
    /// format is deduced from the extension of `path`.
    pub fn to_file(&self, path: impl AsRef<Path>) -> Result<(), Error> {
        Python::with_gil(|py| {
            let kwargs = PyDict::new_bound(py);
            if let Some(dpi) = self.dpi {
                kwargs.set_item("dpi", dpi)?;
            }
            self.fig.fig.bind(py).call_method(
                intern!(py, "savefig"),
                (path.as_ref(),), Some(&kwargs)
            ).map(|_| ()).map_err(|e| {
                if e.is_instance_of::<PyFileNotFoundError>(py) {
                    Error::FileNotFoundError
                } else if e.is_instance_of::<PyPermissionError>(py) {
                    Error::PermissionError
                } else {
                    Error::Python(e)
                }
            })
        })
    }
}


/// Return a new figure of `size` = (width, height) inches, managed by
/// pyplot so that [`show`] displays it.
pub fn figure(size: (f64, f64)) -> Result<Figure, Error> {
    let pyplot = pymod!(PYPLOT)?;
    Python::with_gil(|py| {
        let kwargs = figsize(py, size)?;
        let fig = pyplot.bind(py)
            .call_method(intern!(py, "figure"), (), Some(&kwargs))?;
        Ok(Figure { fig: fig.unbind() })
    })
}

/// Select the backend rendering pyplot figures, e.g. "Agg" (no
/// display) or "TkAgg".
pub fn use_backend(name: &str) -> Result<(), Error> {
    let matplotlib = pymod!(MATPLOTLIB)?;
    Python::with_gil(|py| {
        matplotlib.bind(py).call_method1(intern!(py, "use"), (name,))?;
        Ok(())
    })
}

/// Display all open figures.
///
/// With an interactive backend, this blocks until all windows are
/// closed.  With a non-interactive one (no display), it returns
/// immediately.
pub fn show() -> Result<(), Error> {
    let pyplot = pymod!(PYPLOT)?;
    Python::with_gil(|py| {
        pyplot.bind(py).call_method0(intern!(py, "show"))?;
        Ok(())
    })
}


impl Axes {
    /// Plot `y` versus `x` as lines and/or markers.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use plot_points as plt;
    /// let fig = plt::Figure::new((8.5, 11.))?;
    /// let mut ax = fig.add_subplot()?;
    /// ax.xy(&[1., 2., 3., 4.], &[1., 4., 2., 3.]).fmt(".").plot()?;
    /// fig.save().to_file("target/XY_plot.ps")?;
    /// # Ok::<(), plot_points::Error>(())
    /// ```
    #[must_use]
    pub fn xy<'a, D>(&'a mut self, x: &'a D, y: &'a D) -> XY<'a, D>
    where D: Data + ?Sized {
        // Mutably borrow `self` to reflect that the final `.plot()`
        // will mutate the underlying Python object.
        XY { axes: self,
             options: PlotOptions::new(),
             x, y }
    }

    /// Data and style of the lines plotted so far, in order.
    pub fn lines(&self) -> Result<Vec<Line>, Error> {
        Python::with_gil(|py| {
            let mut lines = Vec::new();
            let tolist = intern!(py, "tolist");
            for line in self.ax.bind(py).getattr(intern!(py, "lines"))?.iter()? {
                let line = line?;
                let get = |m: &str| line.call_method0(m);
                lines.push(Line {
                    x: get("get_xdata")?.call_method0(tolist)?.extract()?,
                    y: get("get_ydata")?.call_method0(tolist)?.extract()?,
                    marker: get("get_marker")?.extract()?,
                    linestyle: get("get_linestyle")?.extract()?,
                });
            }
            Ok(lines)
        })
    }

    pub fn set_title(&mut self, v: &str) -> Result<&mut Self, Error> {
        meth!(self.ax, set_title, (v,))?;
        Ok(self)
    }

    pub fn set_xlabel(&mut self, label: &str) -> Result<&mut Self, Error> {
        meth!(self.ax, set_xlabel, (label,))?;
        Ok(self)
    }

    pub fn set_ylabel(&mut self, label: &str) -> Result<&mut Self, Error> {
        meth!(self.ax, set_ylabel, (label,))?;
        Ok(self)
    }
}

/// A line read back from [`Axes::lines`].
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    /// Horizontal data.
    pub x: Vec<f64>,
    /// Vertical data.
    pub y: Vec<f64>,
    /// Matplotlib marker, "None" if there is none.
    pub marker: String,
    /// Matplotlib line style, "None" for markers only.
    pub linestyle: String,
}

#[derive(Clone)]
struct PlotOptions<'a> {
    fmt: &'a str,
    label: &'a str,
    markersize: Option<f64>,
}

impl<'a> PlotOptions<'a> {
    fn new() -> PlotOptions<'static> {
        PlotOptions { fmt: "", label: "", markersize: None }
    }

    fn kwargs<'py>(&self, py: Python<'py>)
                   -> Result<Bound<'py, PyDict>, Error> {
        let kwargs = PyDict::new_bound(py);
        if !self.label.is_empty() {
            kwargs.set_item("label", self.label)?;
        }
        if let Some(s) = self.markersize {
            kwargs.set_item("markersize", s)?;
        }
        Ok(kwargs)
    }

    fn plot_xy<D>(&self, py: Python<'_>, axes: &Axes, x: &D, y: &D)
                  -> Result<(), Error>
    where D: Data + ?Sized {
        let xn = x.to_numpy(py);
        let yn = y.to_numpy(py);
        axes.ax.bind(py).call_method(
            intern!(py, "plot"), (xn, yn, self.fmt),
            Some(&self.kwargs(py)?))?;
        Ok(())
    }
}

/// Declare methods to set the options assuming `self.options` exists.
macro_rules! set_plotoptions { () => {
    /// Matplotlib format string, e.g. "." for dots with no line.
    #[must_use]
    pub fn fmt(mut self, fmt: &'a str) -> Self {
        self.options.fmt = fmt;
        self
    }

    #[must_use]
    pub fn label(mut self, label: &'a str) -> Self {
        self.options.label = label;
        self
    }

    #[must_use]
    pub fn markersize(mut self, s: f64) -> Self {
        self.options.markersize = Some(s);
        self
    }
}}

pub struct XY<'a, D>
where D: ?Sized {
    axes: &'a Axes,
    options: PlotOptions<'a>,
    x: &'a D,
    y: &'a D,
}

impl<'a, D> XY<'a, D>
where D: Data + ?Sized {
    set_plotoptions!();

    /// Plot the data with the options specified in [`XY`].
    pub fn plot(self) -> Result<(), Error> {
        let (nx, ny) = (self.x.size(), self.y.size());
        if nx != ny {
            return Err(Error::LengthMismatch { x: nx, y: ny })
        }
        pymod!(NUMPY)?;
        Python::with_gil(|py| {
            self.options.plot_xy(py, self.axes, self.x, self.y) })
    }
}
