//! Functions for reading/writing the lookup table in CSV format.
use crate::{LookupEntry, Points2d};
pub use csv::Error;
use csv::{ReaderBuilder, Writer};
use serde::{Deserialize, Serialize};
use std::io::Cursor;

/// A flat CSV row of a lookup entry.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct TableRow {
    pub input_offset: f64,
    pub bonnet_angle: f64,
    pub input_x: f64,
    pub input_y: f64,
    pub input_coupler_x: f64,
    pub input_coupler_y: f64,
    pub coupler_output_x: f64,
    pub coupler_output_y: f64,
    pub output_x: f64,
    pub output_y: f64,
}

impl From<&LookupEntry> for TableRow {
    fn from(e: &LookupEntry) -> Self {
        let Points2d { input, input_coupler, coupler_output, output } = e.points2d;
        Self {
            input_offset: e.input_offset,
            bonnet_angle: e.bonnet_angle,
            input_x: input[0],
            input_y: input[1],
            input_coupler_x: input_coupler[0],
            input_coupler_y: input_coupler[1],
            coupler_output_x: coupler_output[0],
            coupler_output_y: coupler_output[1],
            output_x: output[0],
            output_y: output[1],
        }
    }
}

impl From<TableRow> for LookupEntry {
    fn from(r: TableRow) -> Self {
        Self {
            input_offset: r.input_offset,
            bonnet_angle: r.bonnet_angle,
            points2d: Points2d {
                input: [r.input_x, r.input_y],
                input_coupler: [r.input_coupler_x, r.input_coupler_y],
                coupler_output: [r.coupler_output_x, r.coupler_output_y],
                output: [r.output_x, r.output_y],
            },
        }
    }
}

/// Parse table entries from CSV string with a header row.
pub fn parse_table(s: &str) -> Result<Vec<LookupEntry>, Error> {
    ReaderBuilder::new()
        .comment(Some(b'#'))
        .from_reader(Cursor::new(s))
        .deserialize::<TableRow>()
        .map(|r| r.map(LookupEntry::from))
        .collect()
}

/// Dump table entries to CSV string with a header row.
pub fn dump_table(entries: &[LookupEntry]) -> Result<String, Box<dyn std::error::Error>> {
    let mut w = Writer::from_writer(Vec::new());
    entries
        .iter()
        .try_for_each(|e| w.serialize(TableRow::from(e)))?;
    Ok(String::from_utf8(w.into_inner()?)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_and_rows() {
        let e = LookupEntry {
            input_offset: -0.5,
            bonnet_angle: 0.25,
            points2d: Points2d {
                input: [1., -2.],
                input_coupler: [3., -4.],
                coupler_output: [5., -6.],
                output: [7., -8.],
            },
        };
        let s = dump_table(&[LookupEntry::default(), e]).unwrap();
        let mut lines = s.lines();
        assert_eq!(
            lines.next(),
            Some(
                "input_offset,bonnet_angle,input_x,input_y,input_coupler_x,input_coupler_y,\
                 coupler_output_x,coupler_output_y,output_x,output_y"
            )
        );
        assert_eq!(lines.nth(1), Some("-0.5,0.25,1.0,-2.0,3.0,-4.0,5.0,-6.0,7.0,-8.0"));
        assert_eq!(parse_table(&s).unwrap(), vec![LookupEntry::default(), e]);
    }
}
