//! Kinship matrix stacking
//!
//! Each kinship file is a square `n x n` CSV: a header row of sample
//! identifiers after an empty corner cell, then one row per sample led by
//! its identifier. All files of a folder must cover the same samples in the
//! same order.

use std::fs::{self, File};
use std::io::Read;
use std::path::Path;

use tracing::{debug, info};

use crate::{Error, Result};

/// Kinship layers stacked into one `(layers, n, n)` array, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct KinshipStack {
    names: Vec<String>,
    samples: Vec<String>,
    data: Vec<f64>,
}

impl KinshipStack {
    /// Stack every `*.csv` file of `dir`, in file-name order.
    ///
    /// # Errors
    ///
    /// Returns error if the folder cannot be read or holds no kinship file,
    /// or a file is not square, holds a non-numeric cell, or lists other
    /// samples than the first file
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let mut paths: Vec<_> = fs::read_dir(dir)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<std::io::Result<_>>()?;
        paths.retain(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "csv"));
        paths.sort();

        let mut layers = paths.iter().map(|path| {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            info!("reading {name}");
            let (samples, values) = read_matrix(File::open(path)?, &name)?;
            Ok::<_, Error>((name, samples, values))
        });

        let (name, samples, data) = layers.next().ok_or_else(|| Error::InvalidData {
            file: dir.display().to_string(),
            message: "no kinship files in folder".to_string(),
        })??;
        let mut stack = Self {
            names: vec![name],
            samples,
            data,
        };
        for layer in layers {
            let (name, samples, values) = layer?;
            stack.push(name, &samples, values)?;
        }

        let (layers, n, _) = stack.shape();
        info!("The shape of the resulting 3-D array is: ({layers}, {n}, {n})");
        Ok(stack)
    }

    /// Build a single-layer stack from any reader.
    ///
    /// # Errors
    ///
    /// Returns error if the matrix is not square or holds a non-numeric cell
    pub fn from_reader<R: Read>(name: impl Into<String>, reader: R) -> Result<Self> {
        let name = name.into();
        let (samples, data) = read_matrix(reader, &name)?;
        Ok(Self {
            names: vec![name],
            samples,
            data,
        })
    }

    /// Add a layer read from `reader` on top of the stack.
    ///
    /// # Errors
    ///
    /// Returns error if the matrix is malformed or lists other samples
    pub fn push_reader<R: Read>(&mut self, name: impl Into<String>, reader: R) -> Result<()> {
        let name = name.into();
        let (samples, values) = read_matrix(reader, &name)?;
        self.push(name, &samples, values)
    }

    fn push(&mut self, name: String, samples: &[String], values: Vec<f64>) -> Result<()> {
        if samples != self.samples.as_slice() {
            return Err(Error::InvalidData {
                file: name,
                message: format!(
                    "samples differ from '{}' ({} vs {} samples)",
                    self.names[0],
                    samples.len(),
                    self.samples.len()
                ),
            });
        }
        self.names.push(name);
        self.data.extend(values);
        Ok(())
    }

    /// `(layers, n, n)`.
    #[must_use]
    pub fn shape(&self) -> (usize, usize, usize) {
        let n = self.samples.len();
        (self.names.len(), n, n)
    }

    /// Layer names, one per source file.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Sample identifiers shared by every layer.
    #[must_use]
    pub fn samples(&self) -> &[String] {
        &self.samples
    }

    /// One `n x n` layer, row-major.
    #[must_use]
    pub fn layer(&self, index: usize) -> Option<&[f64]> {
        let size = self.samples.len() * self.samples.len();
        let start = index.checked_mul(size)?;
        self.data.get(start..start.checked_add(size)?)
    }

    /// Kinship of samples `i` and `j` in `layer`.
    #[must_use]
    pub fn get(&self, layer: usize, i: usize, j: usize) -> Option<f64> {
        let n = self.samples.len();
        if i >= n || j >= n {
            return None;
        }
        self.layer(layer).map(|values| values[i * n + j])
    }

    /// The whole array, layer by layer.
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }
}

fn read_matrix<R: Read>(reader: R, name: &str) -> Result<(Vec<String>, Vec<f64>)> {
    let invalid = |message: String| Error::InvalidData {
        file: name.to_string(),
        message,
    };

    let mut reader = csv::ReaderBuilder::new().has_headers(true).from_reader(reader);
    let samples: Vec<String> = reader.headers()?.iter().skip(1).map(str::to_string).collect();
    let n = samples.len();

    let mut values = Vec::with_capacity(n * n);
    let mut rows = 0;
    for record in reader.records() {
        let record = record?;
        let row_sample = record.get(0).unwrap_or_default();
        if samples.get(rows).map(String::as_str) != Some(row_sample) {
            return Err(invalid(format!(
                "row {rows} is sample '{row_sample}', expected the header's order"
            )));
        }
        for cell in record.iter().skip(1) {
            let value = cell
                .trim()
                .parse::<f64>()
                .map_err(|_| invalid(format!("row {rows}: '{cell}' is not a number")))?;
            values.push(value);
        }
        rows += 1;
    }

    if rows != n || n == 0 {
        return Err(invalid(format!("expected a square matrix, got {rows} rows and {n} columns")));
    }
    debug!(file = name, n, "read kinship matrix");
    Ok((samples, values))
}
