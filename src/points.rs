//! Point sequences read from header-less CSV files.

use std::{
    fs::File,
    io::{self, Read},
    num::ParseFloatError,
    path::{Path, PathBuf},
};
use csv::{ReaderBuilder, StringRecord, Trim};
use thiserror::Error;
use tracing::debug;

/// Errors while reading points.  Lines are numbered from 1.
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("cannot read {}: {source}", .path.display())]
    Access { path: PathBuf, #[source] source: io::Error },
    #[error("cannot read input: {0}")]
    Io(#[from] io::Error),
    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("line {line}: no field {column} (the row has {found} fields)")]
    MissingField { line: u64, column: usize, found: usize },
    #[error("line {line}, field {column}: {value:?} is not a number")]
    NotANumber {
        line: u64,
        column: usize,
        value: String,
        #[source] source: ParseFloatError,
    },
}

/// Indices (from 0) of the CSV fields holding the two coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Columns {
    /// Field appended to `xx`, plotted vertically.
    pub first: usize,
    /// Field appended to `yy`, plotted horizontally.
    pub second: usize,
}

impl Default for Columns {
    fn default() -> Self {
        Columns { first: 1, second: 2 }
    }
}

/// Two index-aligned sequences: `xx[i]` and `yy[i]` come from the
/// same input row, in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Points {
    xx: Vec<f64>,
    yy: Vec<f64>,
}

impl Points {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, x: f64, y: f64) {
        self.xx.push(x);
        self.yy.push(y);
    }

    pub fn xx(&self) -> &[f64] {
        &self.xx
    }

    pub fn yy(&self) -> &[f64] {
        &self.yy
    }

    pub fn len(&self) -> usize {
        self.xx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.xx.is_empty()
    }

    /// Iterate over the `(xx[i], yy[i])` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.xx.iter().copied().zip(self.yy.iter().copied())
    }
}

impl FromIterator<(f64, f64)> for Points {
    fn from_iter<I: IntoIterator<Item = (f64, f64)>>(iter: I) -> Self {
        let mut points = Points::new();
        for (x, y) in iter {
            points.push(x, y);
        }
        points
    }
}

/// Read the points of the CSV file at `path`.
/// See [`read_points_from`].
pub fn read_points(path: impl AsRef<Path>, columns: Columns)
                   -> Result<Points, ReadError> {
    let path = path.as_ref();
    let access = |source| ReadError::Access {
        path: path.to_path_buf(), source };
    let file = File::open(path).map_err(access)?;
    read_points_from(file, columns).map_err(|e| match e {
        ReadError::Io(source) => access(source),
        e => e,
    })
}

/// Read one point per CSV row of `rdr`: `columns.first` goes to `xx`
/// and `columns.second` to `yy`.  There is no header and extra fields
/// are ignored.  Any row lacking a field (a blank line has none) or
/// holding a non-numeric one fails the whole read.
pub fn read_points_from<R: Read>(mut rdr: R, columns: Columns)
                                 -> Result<Points, ReadError> {
    // The csv reader silently skips blank lines, so they are spotted
    // in the raw input between records.
    let mut input = Vec::new();
    rdr.read_to_end(&mut input)?;
    let mut csv = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(input.as_slice());
    let mut points = Points::new();
    let mut record = StringRecord::new();
    let mut end = 0; // end of the previous record in `input`
    let mut line = 1;
    loop {
        let more = csv.read_record(&mut record)?;
        let start = skip_crlf(&input, end);
        line += newlines(&input[end..start]);
        if let Some(b'\r' | b'\n') = input.get(start) {
            return Err(ReadError::MissingField {
                line, column: columns.first, found: 0 })
        }
        if !more {
            break
        }
        end = csv.position().byte() as usize;
        let x = field(&record, line, columns.first)?;
        let y = field(&record, line, columns.second)?;
        debug!(line, x, y, "point");
        points.push(x, y);
        line += newlines(&input[start..end]);
    }
    Ok(points)
}

/// Step over the `\n` of a `\r\n` terminator whose `\r` ended the
/// record before `at`.
fn skip_crlf(input: &[u8], at: usize) -> usize {
    if at > 0 && input[at - 1] == b'\r' && input.get(at) == Some(&b'\n') {
        at + 1
    } else {
        at
    }
}

fn newlines(bytes: &[u8]) -> u64 {
    bytes.iter().filter(|&&b| b == b'\n').count() as u64
}

fn field(record: &StringRecord, line: u64, column: usize)
         -> Result<f64, ReadError> {
    let value = record.get(column).ok_or(ReadError::MissingField {
        line, column, found: record.len() })?;
    value.parse().map_err(|source| ReadError::NotANumber {
        line, column, value: value.to_string(), source })
}


#[cfg(test)]
mod tests {
    use super::*;

    fn read(s: &str) -> Result<Points, ReadError> {
        read_points_from(s.as_bytes(), Columns::default())
    }

    #[test]
    fn two_rows() -> Result<(), ReadError> {
        let p = read("1,10.0,20.0\n2,15.0,25.0\n")?;
        assert_eq!(p.xx(), &[10.0, 15.0]);
        assert_eq!(p.yy(), &[20.0, 25.0]);
        assert_eq!(p.iter().collect::<Vec<_>>(),
                   vec![(10.0, 20.0), (15.0, 25.0)]);
        Ok(())
    }

    #[test]
    fn empty_input() -> Result<(), ReadError> {
        let p = read("")?;
        assert!(p.is_empty());
        assert_eq!(p.len(), 0);
        Ok(())
    }

    #[test]
    fn first_row_is_data() -> Result<(), ReadError> {
        let p = read("0,1,2\n")?;
        assert_eq!(p, [(1., 2.)].into_iter().collect::<Points>());
        Ok(())
    }

    #[test]
    fn extra_fields_and_ragged_rows() -> Result<(), ReadError> {
        let p = read("a,1,2,3,4\nb,5,6\nc,-7e2,8.5,x\n")?;
        assert_eq!(p.xx(), &[1., 5., -700.]);
        assert_eq!(p.yy(), &[2., 6., 8.5]);
        Ok(())
    }

    #[test]
    fn surrounding_spaces() -> Result<(), ReadError> {
        let p = read("id, 3.5 ,\t4\r\n")?;
        assert_eq!(p.iter().next(), Some((3.5, 4.)));
        Ok(())
    }

    #[test]
    fn not_a_number() {
        match read("0,1,2\na,not_a_number,3.0\n") {
            Err(ReadError::NotANumber { line: 2, column: 1, value, .. }) =>
                assert_eq!(value, "not_a_number"),
            r => panic!("expected NotANumber, got {:?}", r),
        }
    }

    #[test]
    fn missing_field() {
        match read("0,1,2\n0,1\n") {
            Err(ReadError::MissingField { line: 2, column: 2, found: 2 }) => (),
            r => panic!("expected MissingField, got {:?}", r),
        }
    }

    #[test]
    fn other_columns() -> Result<(), ReadError> {
        let p = read_points_from("1,2,3\n4,5,6\n".as_bytes(),
                                 Columns { first: 2, second: 0 })?;
        assert_eq!(p.xx(), &[3., 6.]);
        assert_eq!(p.yy(), &[1., 4.]);
        Ok(())
    }

    #[test]
    fn missing_file() {
        let path = std::env::temp_dir().join("plot_points_no_such.csv");
        match read_points(&path, Columns::default()) {
            Err(ReadError::Access { path: p, source }) => {
                assert_eq!(p, path);
                assert_eq!(source.kind(), io::ErrorKind::NotFound);
            }
            r => panic!("expected Access error, got {:?}", r),
        }
    }

    fn blank_line_at(s: &str) -> u64 {
        match read(s) {
            Err(ReadError::MissingField { line, column: 1, found: 0 }) => line,
            r => panic!("expected a blank line error, got {:?}", r),
        }
    }

    #[test]
    fn blank_lines() {
        assert_eq!(blank_line_at("0,1,2\n\n0,3,4\n"), 2);
        assert_eq!(blank_line_at("\n0,1,2\n"), 1);
        assert_eq!(blank_line_at("\n"), 1);
        assert_eq!(blank_line_at("0,1,2\n0,3,4\n\n"), 3);
        assert_eq!(blank_line_at("0,1,2\r\n\r\n0,3,4\r\n"), 2);
    }

    #[test]
    fn crlf_terminators() -> Result<(), ReadError> {
        let p = read("0,1,2\r\n0,3,4\r\n")?;
        assert_eq!(p.xx(), &[1., 3.]);
        match read("0,1,2\r\n0,3,4\r\nx,y,5\r\n") {
            Err(ReadError::NotANumber { line: 3, .. }) => (),
            r => panic!("expected NotANumber on line 3, got {:?}", r),
        }
        Ok(())
    }

    #[test]
    fn no_final_terminator() -> Result<(), ReadError> {
        assert_eq!(read("0,1,2\n0,3,4")?.yy(), &[2., 4.]);
        Ok(())
    }

    #[test]
    fn quoted_newline_counts_lines() {
        match read("0,\"1\",2\n\"a\nb\",3,4\n0,5,x\n") {
            Err(ReadError::NotANumber { line: 4, column: 2, .. }) => (),
            r => panic!("expected NotANumber on line 4, got {:?}", r),
        }
    }

    struct Failing;

    impl Read for Failing {
        fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "unreadable"))
        }
    }

    #[test]
    fn read_failure_is_io() {
        match read_points_from(Failing, Columns::default()) {
            Err(ReadError::Io(e)) => assert_eq!(e.to_string(), "unreadable"),
            r => panic!("expected Io error, got {:?}", r),
        }
    }

    #[test]
    fn directory_is_access_error() {
        let dir = std::env::temp_dir();
        match read_points(&dir, Columns::default()) {
            Err(ReadError::Access { path, .. }) => assert_eq!(path, dir),
            r => panic!("expected Access error, got {:?}", r),
        }
    }
}
