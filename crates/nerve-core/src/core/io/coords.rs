//! CSV exchange of interpolation points and the potentials evaluated at them.
//!
//! Points are read from `x,y,z` rows under a header line. Potentials are
//! written back as `x,y,z,v` rows in point order.

use nalgebra::Point3;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoordsError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Expected {expected} potential value(s) but got {found}")]
    LengthMismatch { expected: usize, found: usize },
}

#[derive(Debug, Deserialize)]
struct CoordRow {
    x: f64,
    y: f64,
    z: f64,
}

#[derive(Debug, Serialize)]
struct PotentialRow {
    x: f64,
    y: f64,
    z: f64,
    v: f64,
}

/// Reads `x,y,z` rows (with a header line) into points.
pub fn read_points(reader: impl Read) -> Result<Vec<Point3<f64>>, CoordsError> {
    let rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    read_points_from(rdr)
}

pub fn read_points_from_path(path: impl AsRef<Path>) -> Result<Vec<Point3<f64>>, CoordsError> {
    let rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)?;
    read_points_from(rdr)
}

fn read_points_from<R: Read>(
    mut rdr: csv::Reader<R>,
) -> Result<Vec<Point3<f64>>, CoordsError> {
    let mut points = Vec::new();
    for row in rdr.deserialize::<CoordRow>() {
        let row = row?;
        points.push(Point3::new(row.x, row.y, row.z));
    }
    Ok(points)
}

/// Writes one `x,y,z,v` row per point, pairing each point with its potential.
pub fn write_potentials(
    writer: impl Write,
    points: &[Point3<f64>],
    potentials: &[f64],
) -> Result<(), CoordsError> {
    if points.len() != potentials.len() {
        return Err(CoordsError::LengthMismatch {
            expected: points.len(),
            found: potentials.len(),
        });
    }
    let mut wtr = csv::Writer::from_writer(writer);
    for (p, &v) in points.iter().zip(potentials) {
        wtr.serialize(PotentialRow {
            x: p.x,
            y: p.y,
            z: p.z,
            v,
        })?;
    }
    wtr.flush().map_err(csv::Error::from)?;
    Ok(())
}
