//! The dBase III attribute table.

use crate::error::Error;
use byteorder::{LittleEndian as LE, WriteBytesExt};
use chrono::{Datelike, NaiveDate};
use std::convert::TryFrom;
use std::io::{self, Write};

const VERSION: u8 = 0x03;
const HEADER_END: u8 = 0x0d;
const EOF: u8 = 0x1a;
const NOT_DELETED: u8 = b' ';
pub const MAX_FIELD_NAME_LEN: usize = 10;

/// A character field, `length` bytes wide.
#[derive(Debug, Clone, PartialEq)]
pub struct DbfField {
    pub name: String,
    pub length: u8,
}

/// One value per field, in field order.
pub type DbfRecord = Vec<String>;

impl DbfField {
    fn write_descriptor<W: Write>(&self, w: &mut W) -> io::Result<()> {
        let mut name = [0u8; 11];
        name[..self.name.len()].copy_from_slice(self.name.as_bytes());
        w.write_all(&name)?;
        w.write_u8(b'C')?;
        w.write_all(&[0; 4])?;
        w.write_u8(self.length)?;
        // decimal count, then reserved bytes
        w.write_u8(0)?;
        w.write_all(&[0; 14])
    }

    fn write_value<W: Write>(&self, w: &mut W, value: &str) -> io::Result<()> {
        w.write_all(&fixed_width(value, self.length))
    }
}

pub fn encode(
    fields: &[DbfField],
    records: &[DbfRecord],
    updated: NaiveDate,
) -> Result<Vec<u8>, Error> {
    let too_large = || Error::TooLarge("attribute table");
    let record_len = 1 + fields.iter().map(|f| usize::from(f.length)).sum::<usize>();
    let header_len = 32 + 32 * fields.len() + 1;

    let mut buf = Vec::with_capacity(header_len + record_len * records.len() + 1);
    buf.write_u8(VERSION)?;
    buf.write_u8((updated.year() - 1900).clamp(0, 255) as u8)?;
    buf.write_u8(updated.month() as u8)?;
    buf.write_u8(updated.day() as u8)?;
    buf.write_u32::<LE>(u32::try_from(records.len()).map_err(|_| too_large())?)?;
    buf.write_u16::<LE>(u16::try_from(header_len).map_err(|_| too_large())?)?;
    buf.write_u16::<LE>(u16::try_from(record_len).map_err(|_| too_large())?)?;
    buf.write_all(&[0; 20])?;

    for field in fields {
        field.write_descriptor(&mut buf)?;
    }
    buf.write_u8(HEADER_END)?;

    for record in records {
        buf.write_u8(NOT_DELETED)?;
        for (field, value) in fields.iter().zip(record) {
            field.write_value(&mut buf, value)?;
        }
    }
    buf.write_u8(EOF)?;
    Ok(buf)
}

/// Left aligned and space padded, cut on a character boundary when too long.
fn fixed_width(value: &str, size: u8) -> Vec<u8> {
    let size = usize::from(size);
    let mut end = value.len().min(size);
    while !value.is_char_boundary(end) {
        end -= 1;
    }
    let mut bytes = value.as_bytes()[..end].to_vec();
    bytes.resize(size, b' ');
    bytes
}

#[cfg(test)]
mod encode {
    use super::*;
    use byteorder::ReadBytesExt;
    use std::io::Cursor;

    fn field(name: &str, length: u8) -> DbfField {
        DbfField {
            name: name.to_string(),
            length,
        }
    }

    fn record(values: &[&str]) -> DbfRecord {
        values.iter().map(|v| (*v).to_string()).collect()
    }

    #[test]
    fn table_layout() {
        let updated = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        let dbf = encode(
            &[field("LOT", 3), field("PLAN", 5)],
            &[record(&["7", "DP123456"])],
            updated,
        )
        .unwrap();

        let mut header = Cursor::new(&dbf[..]);
        assert_eq!(header.read_u8().unwrap(), 0x03);
        assert_eq!(header.read_u8().unwrap(), 124);
        assert_eq!(header.read_u8().unwrap(), 3);
        assert_eq!(header.read_u8().unwrap(), 9);
        assert_eq!(header.read_u32::<LE>().unwrap(), 1);
        let header_len = header.read_u16::<LE>().unwrap() as usize;
        assert_eq!(header_len, 32 + 2 * 32 + 1);
        assert_eq!(header.read_u16::<LE>().unwrap(), 1 + 3 + 5);

        assert_eq!(&dbf[32..36], b"LOT\0");
        assert_eq!(dbf[32 + 11], b'C');
        assert_eq!(dbf[32 + 16], 3);
        assert_eq!(&dbf[64..68], b"PLAN");
        assert_eq!(dbf[header_len - 1], 0x0d);
        assert_eq!(&dbf[header_len..header_len + 9], b" 7  DP123");
        assert_eq!(dbf.last(), Some(&0x1a));
        assert_eq!(dbf.len(), header_len + 9 + 1);
    }

    #[test]
    fn no_fields_no_records() {
        let updated = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let dbf = encode(&[], &[], updated).unwrap();
        assert_eq!(dbf.len(), 32 + 1 + 1);
        assert_eq!(dbf[32], 0x0d);
    }
}
