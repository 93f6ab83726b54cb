//! The main `.shp` file and its `.shx` index.
//!
//! Both start with the same 100 byte header. Record headers, the file code and
//! the file length are big endian; everything else is little endian. Offsets
//! and lengths count 16-bit words.

use crate::error::Error;
use crate::feature::Position;
use byteorder::{BigEndian as BE, LittleEndian as LE, WriteBytesExt};
use geo::algorithm::bounding_rect::BoundingRect;
use geo_types::{Coordinate, MultiPoint, Rect};
use std::convert::TryFrom;
use std::io::{self, Write};

const FILE_CODE: i32 = 9994;
const VERSION: i32 = 1000;
pub const HEADER_LEN: usize = 100;
const RECORD_HEADER_LEN: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ShpShapeType {
    Null = 0,
    Polygon = 5,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShpBoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl ShpBoundingBox {
    pub const EMPTY: ShpBoundingBox = ShpBoundingBox {
        min_x: 0.,
        min_y: 0.,
        max_x: 0.,
        max_y: 0.,
    };

    fn union(self, other: ShpBoundingBox) -> ShpBoundingBox {
        ShpBoundingBox {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_f64::<LE>(self.min_x)?;
        w.write_f64::<LE>(self.min_y)?;
        w.write_f64::<LE>(self.max_x)?;
        w.write_f64::<LE>(self.max_y)
    }
}

impl From<Rect<f64>> for ShpBoundingBox {
    fn from(rect: Rect<f64>) -> Self {
        let (min, max): (Coordinate<f64>, Coordinate<f64>) = (rect.min(), rect.max());
        ShpBoundingBox {
            min_x: min.x,
            min_y: min.y,
            max_x: max.x,
            max_y: max.y,
        }
    }
}

/// One part of a polygon record; closed by the caller.
pub type ShpPolygonRing = Vec<Position>;

#[derive(Debug, Clone, PartialEq)]
pub struct ShpPolygonRecord {
    pub rings: Vec<ShpPolygonRing>,
}

impl ShpPolygonRecord {
    pub fn bounding_box(&self) -> Option<ShpBoundingBox> {
        let points: MultiPoint<f64> = self
            .rings
            .iter()
            .flatten()
            .copied()
            .collect::<Vec<_>>()
            .into();
        points.bounding_rect().map(ShpBoundingBox::from)
    }

    fn num_points(&self) -> usize {
        self.rings.iter().map(Vec::len).sum()
    }

    fn write_content<W: Write>(&self, w: &mut W) -> Result<(), Error> {
        w.write_i32::<LE>(ShpShapeType::Polygon as i32)?;
        self.bounding_box()
            .unwrap_or(ShpBoundingBox::EMPTY)
            .write_to(w)?;
        w.write_i32::<LE>(count(self.rings.len())?)?;
        w.write_i32::<LE>(count(self.num_points())?)?;
        let mut start = 0;
        for ring in &self.rings {
            w.write_i32::<LE>(count(start)?)?;
            start += ring.len();
        }
        for (x, y) in self.rings.iter().flatten() {
            w.write_f64::<LE>(*x)?;
            w.write_f64::<LE>(*y)?;
        }
        Ok(())
    }
}

/// Encodes the main file and its index. `None` records are null shapes.
pub fn encode(records: &[Option<ShpPolygonRecord>]) -> Result<(Vec<u8>, Vec<u8>), Error> {
    let mut body = vec![];
    let mut index = vec![];
    let mut offset = HEADER_LEN;
    for (i, record) in records.iter().enumerate() {
        let mut content = vec![];
        match record {
            Some(polygon) => polygon.write_content(&mut content)?,
            None => content.write_i32::<LE>(ShpShapeType::Null as i32)?,
        }
        let content_words = words(content.len())?;
        body.write_i32::<BE>(count(i + 1)?)?;
        body.write_i32::<BE>(content_words)?;
        body.extend_from_slice(&content);
        index.push((words(offset)?, content_words));
        offset += RECORD_HEADER_LEN + content.len();
    }

    let bbox = records
        .iter()
        .flatten()
        .filter_map(ShpPolygonRecord::bounding_box)
        .reduce(ShpBoundingBox::union)
        .unwrap_or(ShpBoundingBox::EMPTY);

    let mut shp = Vec::with_capacity(offset);
    write_header(&mut shp, words(offset)?, &bbox)?;
    shp.extend_from_slice(&body);

    let shx_len = HEADER_LEN + RECORD_HEADER_LEN * index.len();
    let mut shx = Vec::with_capacity(shx_len);
    write_header(&mut shx, words(shx_len)?, &bbox)?;
    for (offset, length) in index {
        shx.write_i32::<BE>(offset)?;
        shx.write_i32::<BE>(length)?;
    }
    Ok((shp, shx))
}

fn write_header<W: Write>(w: &mut W, file_words: i32, bbox: &ShpBoundingBox) -> io::Result<()> {
    w.write_i32::<BE>(FILE_CODE)?;
    w.write_all(&[0; 20])?;
    w.write_i32::<BE>(file_words)?;
    w.write_i32::<LE>(VERSION)?;
    w.write_i32::<LE>(ShpShapeType::Polygon as i32)?;
    bbox.write_to(w)?;
    // z and m ranges
    w.write_all(&[0; 32])
}

fn words(bytes: usize) -> Result<i32, Error> {
    i32::try_from(bytes / 2).map_err(|_| Error::TooLarge("shapefile"))
}

fn count(n: usize) -> Result<i32, Error> {
    i32::try_from(n).map_err(|_| Error::TooLarge("shape"))
}
