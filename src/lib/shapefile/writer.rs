use super::dbf::{self, DbfField, DbfRecord, MAX_FIELD_NAME_LEN};
use super::shp::{self, ShpPolygonRecord};
use super::storage::Storage;
use crate::error::Error;
use crate::feature::Position;
use crate::ring::close_ring;
use chrono::{Local, NaiveDate};
use tracing::debug;

/// The operations the exporter needs from a Shapefile backend.
///
/// Opening is construction. Attribute records and shapes are appended
/// independently and matched up by position; `close` pads whichever side is
/// shorter so that both stay aligned.
pub trait ShapeWriter {
    /// Declares a character field that is `size` bytes wide.
    fn add_field(&mut self, name: &str, size: u8) -> Result<(), Error>;
    /// Appends an attribute record, one value per declared field.
    fn add_record(&mut self, values: &[&str]) -> Result<(), Error>;
    /// Appends a polygon shape with one part per ring.
    fn add_parts(&mut self, parts: &[&[Position]]) -> Result<(), Error>;
    /// Appends a shape without geometry.
    fn add_null(&mut self) -> Result<(), Error>;
    fn close(self) -> Result<(), Error>;
}

/// Writes polygon shapefiles (`.shp`, `.shx`, `.dbf`) into a [`Storage`].
///
/// Everything is buffered until [`ShapeWriter::close`], which encodes the
/// three files and hands them to the storage as `{stem}.shp` and so on.
pub struct ShpWriter<'s, S: Storage> {
    storage: &'s mut S,
    stem: String,
    fields: Vec<DbfField>,
    records: Vec<DbfRecord>,
    shapes: Vec<Option<ShpPolygonRecord>>,
    updated: NaiveDate,
}

impl<'s, S: Storage> ShpWriter<'s, S> {
    pub fn open(storage: &'s mut S, stem: &str) -> Self {
        ShpWriter {
            storage,
            stem: stem.to_string(),
            fields: vec![],
            records: vec![],
            shapes: vec![],
            updated: Local::now().date_naive(),
        }
    }

    fn balance(&mut self) {
        while self.shapes.len() < self.records.len() {
            self.shapes.push(None);
        }
        let blank = vec![String::new(); self.fields.len()];
        while self.records.len() < self.shapes.len() {
            self.records.push(blank.clone());
        }
    }
}

impl<'s, S: Storage> ShapeWriter for ShpWriter<'s, S> {
    fn add_field(&mut self, name: &str, size: u8) -> Result<(), Error> {
        if !self.records.is_empty() {
            return Err(Error::FieldAfterRecord(name.to_string()));
        }
        if name.is_empty() || name.len() > MAX_FIELD_NAME_LEN || !name.is_ascii() {
            return Err(Error::FieldName(name.to_string()));
        }
        self.fields.push(DbfField {
            name: name.to_string(),
            length: size,
        });
        Ok(())
    }

    fn add_record(&mut self, values: &[&str]) -> Result<(), Error> {
        if values.len() != self.fields.len() {
            return Err(Error::RecordArity {
                expected: self.fields.len(),
                actual: values.len(),
            });
        }
        self.records
            .push(values.iter().map(|value| (*value).to_string()).collect());
        Ok(())
    }

    fn add_parts(&mut self, parts: &[&[Position]]) -> Result<(), Error> {
        let rings = parts
            .iter()
            .map(|ring| close_ring(ring).into_owned())
            .collect();
        self.shapes.push(Some(ShpPolygonRecord { rings }));
        Ok(())
    }

    fn add_null(&mut self) -> Result<(), Error> {
        self.shapes.push(None);
        Ok(())
    }

    fn close(mut self) -> Result<(), Error> {
        self.balance();
        let (shp, shx) = shp::encode(&self.shapes)?;
        let dbf = dbf::encode(&self.fields, &self.records, self.updated)?;
        debug!(
            stem = %self.stem,
            records = self.records.len(),
            shp_bytes = shp.len(),
            "closing shapefile"
        );
        self.storage.write(&format!("{}.shp", self.stem), &shp)?;
        self.storage.write(&format!("{}.shx", self.stem), &shx)?;
        self.storage.write(&format!("{}.dbf", self.stem), &dbf)?;
        Ok(())
    }
}
