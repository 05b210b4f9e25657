//! Delimited tables with a header row.
//!
//! Batch input is read whole into a [`Table`] of string fields; batch output is
//! streamed row by row through a [`RowWriter`] so that completed rows reach
//! disk in completion order. Descriptor records can also be written and read
//! back as typed rows.

use std::io::{Read, Write};

use super::error::Error;
use crate::model::descriptor::DescriptorRecord;

/// A header plus string rows, each padded to the header width.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Index of the column named `name`.
    pub fn column_index(&self, name: &str) -> Result<usize, Error> {
        self.headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| Error::missing_column(name, &self.headers))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Reads a comma-delimited table with a header row.
///
/// Short rows are padded with empty fields and long rows are truncated to the
/// header width, so every row lines up with the header.
pub fn read_table<R: Read>(reader: R) -> Result<Table, Error> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
    let width = headers.len();

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let mut row: Vec<String> = record.iter().take(width).map(str::to_string).collect();
        row.resize(width, String::new());
        rows.push(row);
    }

    Ok(Table { headers, rows })
}

/// Streams string rows under a fixed header.
pub struct RowWriter<W: Write> {
    inner: csv::Writer<W>,
    width: usize,
}

impl<W: Write> RowWriter<W> {
    /// Creates the writer and emits the header row immediately.
    pub fn new(writer: W, headers: &[String]) -> Result<Self, Error> {
        let mut inner = csv::Writer::from_writer(writer);
        inner.write_record(headers)?;
        inner.flush()?;
        Ok(Self {
            inner,
            width: headers.len(),
        })
    }

    /// Writes one row and flushes it, so a killed run keeps finished rows.
    pub fn write_row(&mut self, row: &[String]) -> Result<(), Error> {
        if row.len() == self.width {
            self.inner.write_record(row)?;
        } else {
            let mut padded = row.to_vec();
            padded.resize(self.width, String::new());
            self.inner.write_record(&padded)?;
        }
        self.inner.flush()?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), Error> {
        self.inner.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> Result<W, Error> {
        self.inner
            .into_inner()
            .map_err(|e| Error::from(e.into_error()))
    }
}

/// Writes descriptor records under the `smiles,formula,molwt,rb,glob,pbf,primary_amine` header.
pub fn write_records<W: Write>(writer: W, records: &[DescriptorRecord]) -> Result<(), Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    for record in records {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn read_records<R: Read>(reader: R) -> Result<Vec<DescriptorRecord>, Error> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut records = Vec::new();
    for result in rdr.deserialize() {
        records.push(result?);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn record(source: &str, glob: f64, amine: u8) -> DescriptorRecord {
        DescriptorRecord {
            source: source.to_string(),
            formula: "C4H10".to_string(),
            molecular_weight: 58.123,
            rotatable_bonds: 1,
            globularity: glob,
            pbf: 0.318_273_4,
            primary_amine: amine,
        }
    }

    #[test]
    fn reads_header_and_pads_ragged_rows() {
        let text = "id,canonical_smiles,note\n1,CCO,alcohol\n2,CCN\n3,C,x,extra\n";
        let table = read_table(Cursor::new(text)).unwrap();
        assert_eq!(table.headers, vec!["id", "canonical_smiles", "note"]);
        assert_eq!(table.len(), 3);
        assert_eq!(table.rows[1], vec!["2", "CCN", ""]);
        assert_eq!(table.rows[2], vec!["3", "C", "x"]);
        assert_eq!(table.column_index("canonical_smiles").unwrap(), 1);
    }

    #[test]
    fn missing_column_lists_available_headers() {
        let table = read_table(Cursor::new("a,b\n1,2\n")).unwrap();
        let err = table.column_index("smiles").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("'smiles'"));
        assert!(msg.contains("a, b"));
    }

    #[test]
    fn row_writer_quotes_fields_and_pads() {
        let headers = vec!["name".to_string(), "smiles".to_string()];
        let mut writer = RowWriter::new(Vec::new(), &headers).unwrap();
        writer
            .write_row(&["a, b".to_string(), "CC".to_string()])
            .unwrap();
        writer.write_row(&["only".to_string()]).unwrap();
        let text = String::from_utf8(writer.into_inner().unwrap()).unwrap();
        assert_eq!(text, "name,smiles\n\"a, b\",CC\nonly,\n");
    }

    #[test]
    fn descriptor_records_survive_the_table() {
        let records = vec![record("CCCC", 0.123_456_789, 0), record("CCN", -1.0, 1)];

        let mut buf = Vec::new();
        write_records(&mut buf, &records).unwrap();
        let text = String::from_utf8(buf.clone()).unwrap();
        assert!(text.starts_with("smiles,formula,molwt,rb,glob,pbf,primary_amine\n"));

        let parsed = read_records(Cursor::new(buf)).unwrap();
        assert_eq!(parsed.len(), records.len());
        for (a, b) in records.iter().zip(&parsed) {
            assert_eq!(a.source, b.source);
            assert_eq!(a.formula, b.formula);
            assert_eq!(a.rotatable_bonds, b.rotatable_bonds);
            assert_eq!(a.primary_amine, b.primary_amine);
            assert!((a.molecular_weight - b.molecular_weight).abs() < 1e-6);
            assert!((a.globularity - b.globularity).abs() < 1e-6);
            assert!((a.pbf - b.pbf).abs() < 1e-6);
        }
    }
}
