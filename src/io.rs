use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use log::{debug, info};

use crate::error::{KdError, Result};
use crate::index::Neighbor;
use crate::point::Point;

/// Reads one point per line of comma-separated numbers.
pub fn read_points(path: impl AsRef<Path>) -> Result<Vec<Point>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let points = parse_points(BufReader::new(file))?;
    info!("read {} points from {}", points.len(), path.display());
    Ok(points)
}

/// Parses comma-separated rows into points numbered by row order.
///
/// Blank lines are skipped and do not consume an index. Every cell is a
/// coordinate and all rows must have the width of the first one.
pub fn parse_points(reader: impl BufRead) -> Result<Vec<Point>> {
    let mut points: Vec<Point> = Vec::new();
    for (line_number, line) in reader.lines().enumerate() {
        let line = line?;
        let line_number = line_number + 1;
        if line.trim().is_empty() {
            continue;
        }

        let coords = line
            .split(',')
            .map(|cell| parse_cell(cell, line_number))
            .collect::<Result<Vec<f64>>>()?;
        if let Some(first) = points.first() {
            if coords.len() != first.dimension() {
                return Err(KdError::MalformedRecord {
                    line: line_number,
                    reason: format!(
                        "expected {} columns, found {}",
                        first.dimension(),
                        coords.len()
                    ),
                });
            }
        }
        points.push(Point::new(coords, points.len()));
    }
    debug!("parsed {} rows", points.len());
    Ok(points)
}

fn parse_cell(cell: &str, line: usize) -> Result<f64> {
    let cell = cell.trim();
    match cell.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        Ok(_) => Err(KdError::MalformedRecord {
            line,
            reason: format!("non-finite value {cell:?}"),
        }),
        Err(err) => Err(KdError::MalformedRecord {
            line,
            reason: format!("cannot parse {cell:?}: {err}"),
        }),
    }
}

/// Writes one `index,distance` line per result; unknown indices are written as -1.
pub fn write_results(path: impl AsRef<Path>, results: &[Neighbor]) -> Result<()> {
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);
    format_results(&mut writer, results)?;
    writer.flush()?;
    info!("wrote {} results to {}", results.len(), path.display());
    Ok(())
}

pub fn format_results(mut writer: impl Write, results: &[Neighbor]) -> Result<()> {
    for result in results {
        match result.index {
            Some(index) => writeln!(writer, "{index},{}", result.distance)?,
            None => writeln!(writer, "-1,{}", result.distance)?,
        }
    }
    Ok(())
}
