//! Output of fringes, trajectories and shift summaries.
//!
//! Every table is written under a name (e.g. `rf12`) together with a header
//! recording the fixed parameters it was produced with.

use std::{
    fs,
    io::{ BufWriter, Write },
    path::{ Path, PathBuf },
};
use ndarray as nd;
use ndarray_npy::NpzWriter;
use neutron_sim::{ FieldType, Trajectory };
use crate::{
    error::{ Error, Result },
    scan::{ Fringe, ShiftSummary },
};

/// A single header value.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum HeaderValue {
    Num(f64),
    Field(FieldType),
}

impl HeaderValue {
    /// Numeric form; field types use their legacy selector.
    pub fn as_f64(self) -> f64 {
        match self {
            Self::Num(x) => x,
            Self::Field(field) => field.id() as f64,
        }
    }
}

impl From<f64> for HeaderValue {
    fn from(x: f64) -> Self { Self::Num(x) }
}

impl From<FieldType> for HeaderValue {
    fn from(field: FieldType) -> Self { Self::Field(field) }
}

/// Ordered key-value pairs describing how a table was produced.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Header(Vec<(String, HeaderValue)>);

impl Header {
    pub fn new() -> Self { Self::default() }

    /// Append an entry.
    pub fn push<V>(&mut self, key: &str, value: V)
    where V: Into<HeaderValue>
    {
        self.0.push((key.to_string(), value.into()));
    }

    /// Builder-style [`Self::push`].
    pub fn with<V>(mut self, key: &str, value: V) -> Self
    where V: Into<HeaderValue>
    {
        self.push(key, value);
        self
    }

    /// Look up the first entry under `key`.
    pub fn get(&self, key: &str) -> Option<HeaderValue> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| *v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, HeaderValue)> + '_ {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize { self.0.len() }

    pub fn is_empty(&self) -> bool { self.0.is_empty() }
}

/// A destination for tables of equal-length numeric columns.
pub trait Sink {
    /// Write one table.
    fn write_table(
        &mut self,
        name: &str,
        header: &Header,
        columns: &[(&str, &[f64])],
    ) -> Result<()>;

    /// Write a fringe as `(<swept variable>, zProb)`.
    fn write_fringe(&mut self, name: &str, header: &Header, fringe: &Fringe)
        -> Result<()>
    {
        self.write_table(
            name,
            header,
            &[
                (fringe.var.column(), fringe.x.as_slice()),
                ("zProb", fringe.z_prob.as_slice()),
            ],
        )
    }

    /// Write a sampled trajectory as `(t, xProb, yProb, zProb)`.
    fn write_trajectory(&mut self, name: &str, header: &Header, traj: &Trajectory)
        -> Result<()>
    {
        self.write_table(
            name,
            header,
            &[
                ("t", traj.time.as_slice()),
                ("xProb", traj.x.as_slice()),
                ("yProb", traj.y.as_slice()),
                ("zProb", traj.z.as_slice()),
            ],
        )
    }

    /// Write a shift scan summary as `(<outer variable>, gridMin, polyMin)`.
    fn write_summary(&mut self, name: &str, header: &Header, summary: &ShiftSummary)
        -> Result<()>
    {
        self.write_table(
            name,
            header,
            &[
                (summary.var.column(), summary.value.as_slice()),
                ("gridMin", summary.grid_min.as_slice()),
                ("polyMin", summary.poly_min.as_slice()),
            ],
        )
    }
}

/// Number of rows shared by all columns.
fn row_count(name: &str, columns: &[(&str, &[f64])]) -> Result<usize> {
    let n = columns.first().map(|(_, c)| c.len()).unwrap_or(0);
    if let Some((col, c)) = columns.iter().find(|(_, c)| c.len() != n) {
        return Err(Error::scan(
            format!(
                "table {}: column {} has {} rows, expected {}",
                name, col, c.len(), n,
            )
        ));
    }
    Ok(n)
}

/// Writes `<dir>/<name>.txt`: `#key=value` header lines, a `#col,col,...`
/// line, then comma-separated rows with 12 significant digits.
#[derive(Clone, Debug)]
pub struct TextSink {
    dir: PathBuf,
}

impl TextSink {
    /// Create a sink writing into `dir`, creating it if necessary.
    pub fn new<P: AsRef<Path>>(dir: P) -> Result<Self> {
        fs::create_dir_all(dir.as_ref())?;
        Ok(Self { dir: dir.as_ref().to_path_buf() })
    }

    /// Path a table of the given name is written to.
    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.txt", name))
    }
}

impl Sink for TextSink {
    fn write_table(
        &mut self,
        name: &str,
        header: &Header,
        columns: &[(&str, &[f64])],
    ) -> Result<()>
    {
        let nrows = row_count(name, columns)?;
        let mut out = BufWriter::new(fs::File::create(self.path(name))?);
        for (key, value) in header.iter() {
            match value {
                HeaderValue::Num(x) => writeln!(out, "#{}={}", key, x)?,
                HeaderValue::Field(f) => writeln!(out, "#{}={}", key, f)?,
            }
        }
        let names: Vec<&str> = columns.iter().map(|(col, _)| *col).collect();
        writeln!(out, "#{}", names.join(","))?;
        for i in 0..nrows {
            let row: Vec<String>
                = columns.iter()
                .map(|(_, c)| format!("{:.11e}", c[i]))
                .collect();
            writeln!(out, "{}", row.join(","))?;
        }
        out.flush()?;
        Ok(())
    }
}

/// Writes `<dir>/<name>.npz` with one array per column, plus each header
/// entry as a scalar array under its key.
#[derive(Clone, Debug)]
pub struct NpzSink {
    dir: PathBuf,
}

impl NpzSink {
    /// Create a sink writing into `dir`, creating it if necessary.
    pub fn new<P: AsRef<Path>>(dir: P) -> Result<Self> {
        fs::create_dir_all(dir.as_ref())?;
        Ok(Self { dir: dir.as_ref().to_path_buf() })
    }

    /// Path a table of the given name is written to.
    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.npz", name))
    }
}

impl Sink for NpzSink {
    fn write_table(
        &mut self,
        name: &str,
        header: &Header,
        columns: &[(&str, &[f64])],
    ) -> Result<()>
    {
        row_count(name, columns)?;
        let mut npz = NpzWriter::new(fs::File::create(self.path(name))?);
        for (key, value) in header.iter() {
            npz.add_array(key, &nd::arr0(value.as_f64()))?;
        }
        for (col, data) in columns.iter() {
            npz.add_array(*col, &nd::ArrayView1::from(*data))?;
        }
        npz.finish()?;
        Ok(())
    }
}
