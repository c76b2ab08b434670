//! reading back `.vtu` pieces and `.pvtu` summaries
//!
//! Only the subset of VTK XML this crate writes is understood: inline `DataArray`
//! elements in `ascii` or `binary` format with a `UInt32` header.

mod error;
mod event_summary;

pub use error::{InvalidValue, MissingAttribute, ParseError, UnexpectedAttributeValue};
pub use error::UnexpectedElement;
use event_summary::EventSummary;

use crate::encode;
use crate::traits::Numeric;
use crate::write_vtk::{Encoding, Precision};
use crate::Error;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use std::path::Path;
use std::str::FromStr;

/// Values of a `DataArray`, in the precision declared by its `type` attribute
#[derive(Debug, Clone, PartialEq)]
pub enum ArrayValues {
    Float64(Vec<f64>),
    Int32(Vec<i32>),
    Int64(Vec<i64>),
    UInt8(Vec<u8>),
}

impl ArrayValues {
    pub fn len(&self) -> usize {
        match self {
            Self::Float64(v) => v.len(),
            Self::Int32(v) => v.len(),
            Self::Int64(v) => v.len(),
            Self::UInt8(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn precision(&self) -> Precision {
        match self {
            Self::Float64(_) => Precision::Float64,
            Self::Int32(_) => Precision::Int32,
            Self::Int64(_) => Precision::Int64,
            Self::UInt8(_) => Precision::UInt8,
        }
    }

    pub fn as_f64(&self) -> Option<&[f64]> {
        match self {
            Self::Float64(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_i32(&self) -> Option<&[i32]> {
        match self {
            Self::Int32(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<&[i64]> {
        match self {
            Self::Int64(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_u8(&self) -> Option<&[u8]> {
        match self {
            Self::UInt8(v) => Some(v),
            _ => None,
        }
    }
}

/// The attributes of a `DataArray` or `PDataArray` element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayDeclaration {
    pub name: String,
    pub precision: Precision,
    pub components: usize,
    pub format: Encoding,
}

/// A decoded inline `DataArray`
#[derive(Debug, Clone, PartialEq)]
pub struct DataArrayRecord {
    pub name: String,
    pub precision: Precision,
    pub components: usize,
    pub format: Encoding,
    pub values: ArrayValues,
}

impl DataArrayRecord {
    /// number of tuples, `values.len() / components`
    pub fn rows(&self) -> usize {
        match self.components {
            0 => 0,
            n => self.values.len() / n,
        }
    }
}

/// Contents of a `.vtu` piece
#[derive(Debug, Clone, PartialEq)]
pub struct VtuPiece {
    /// byte order of the binary payloads, `None` if the file did not declare one
    pub big_endian: Option<bool>,
    pub number_of_points: usize,
    pub number_of_cells: usize,
    pub points: DataArrayRecord,
    /// `connectivity`, `offsets` and `types`, in file order
    pub cells: Vec<DataArrayRecord>,
    pub point_data: Vec<DataArrayRecord>,
    pub cell_data: Vec<DataArrayRecord>,
}

impl VtuPiece {
    pub fn cell_array(&self, name: &str) -> Option<&DataArrayRecord> {
        find(&self.cells, name)
    }

    pub fn point_array(&self, name: &str) -> Option<&DataArrayRecord> {
        find(&self.point_data, name)
    }

    pub fn cell_data_array(&self, name: &str) -> Option<&DataArrayRecord> {
        find(&self.cell_data, name)
    }
}

fn find<'a>(arrays: &'a [DataArrayRecord], name: &str) -> Option<&'a DataArrayRecord> {
    arrays.iter().find(|array| array.name == name)
}

/// Contents of a `.pvtu` summary
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PvtuSummary {
    pub points: Vec<ArrayDeclaration>,
    pub point_data: Vec<ArrayDeclaration>,
    pub cell_data: Vec<ArrayDeclaration>,
    /// `Source` attribute of every `Piece`, in file order
    pub sources: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Points,
    Cells,
    PointData,
    CellData,
}

/// read in and parse an entire `.vtu` file
pub fn read_vtu(path: &Path) -> Result<VtuPiece, Error> {
    let text = std::fs::read_to_string(path)?;
    Ok(parse_vtu(&text)?)
}

/// read in and parse an entire `.pvtu` file
pub fn read_pvtu(path: &Path) -> Result<PvtuSummary, Error> {
    let text = std::fs::read_to_string(path)?;
    Ok(parse_pvtu(&text)?)
}

pub fn parse_vtu(text: &str) -> Result<VtuPiece, ParseError> {
    let mut reader = Reader::from_str(text);
    reader.trim_text(true);

    let mut big_endian = None;
    let mut counts = None;
    let mut points = None;
    let mut cells = Vec::new();
    let mut point_data = Vec::new();
    let mut cell_data = Vec::new();

    let mut section = None;
    let mut open: Option<(ArrayDeclaration, String)> = None;

    loop {
        let event = reader.read_event()?;
        match &event {
            Event::Start(e) => match e.name().as_ref() {
                b"VTKFile" => {
                    check_value(e, "VTKFile", "type", "UnstructuredGrid")?;
                    big_endian = byte_order(e)?;
                }
                b"UnstructuredGrid" => {}
                b"Piece" => {
                    let points = parse_number(&attribute(e, "Piece", "NumberOfPoints")?)?;
                    let cells = parse_number(&attribute(e, "Piece", "NumberOfCells")?)?;
                    counts = Some((points, cells));
                }
                b"Points" => section = Some(Section::Points),
                b"Cells" => section = Some(Section::Cells),
                b"PointData" => section = Some(Section::PointData),
                b"CellData" => section = Some(Section::CellData),
                b"DataArray" if section.is_some() && open.is_none() => {
                    open = Some((declaration(e, "DataArray")?, String::new()));
                }
                _ => return Err(unexpected("an UnstructuredGrid piece", &event)),
            },
            Event::Text(t) => match &mut open {
                Some((_, payload)) => payload.push_str(&t.unescape()?),
                None => return Err(unexpected("an UnstructuredGrid piece", &event)),
            },
            Event::End(e) => match e.name().as_ref() {
                b"DataArray" => {
                    let (declaration, payload) = match open.take() {
                        Some(open) => open,
                        None => return Err(unexpected("an UnstructuredGrid piece", &event)),
                    };
                    let record = decode_array(declaration, &payload, big_endian)?;
                    match section {
                        Some(Section::Points) => points = Some(record),
                        Some(Section::Cells) => cells.push(record),
                        Some(Section::PointData) => point_data.push(record),
                        Some(Section::CellData) => cell_data.push(record),
                        None => return Err(unexpected("an UnstructuredGrid piece", &event)),
                    }
                }
                b"Points" | b"Cells" | b"PointData" | b"CellData" => section = None,
                _ => {}
            },
            Event::Eof => break,
            Event::Decl(_) | Event::Comment(_) => {}
            _ => return Err(unexpected("an UnstructuredGrid piece", &event)),
        }
    }

    let (number_of_points, number_of_cells) = counts.ok_or(ParseError::MissingElement("Piece"))?;
    let points = points.ok_or(ParseError::MissingElement("Points"))?;

    Ok(VtuPiece {
        big_endian,
        number_of_points,
        number_of_cells,
        points,
        cells,
        point_data,
        cell_data,
    })
}

pub fn parse_pvtu(text: &str) -> Result<PvtuSummary, ParseError> {
    let mut reader = Reader::from_str(text);
    reader.trim_text(true);

    let mut summary = PvtuSummary::default();
    let mut section = None;
    let mut found_grid = false;

    loop {
        let event = reader.read_event()?;
        match &event {
            Event::Start(e) => match e.name().as_ref() {
                b"VTKFile" => check_value(e, "VTKFile", "type", "PUnstructuredGrid")?,
                b"PUnstructuredGrid" => found_grid = true,
                b"PPoints" => section = Some(Section::Points),
                b"PPointData" => section = Some(Section::PointData),
                b"PCellData" => section = Some(Section::CellData),
                _ => return Err(unexpected("a PUnstructuredGrid summary", &event)),
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"PDataArray" => {
                    let declaration = declaration(e, "PDataArray")?;
                    match section {
                        Some(Section::Points) => summary.points.push(declaration),
                        Some(Section::PointData) => summary.point_data.push(declaration),
                        Some(Section::CellData) => summary.cell_data.push(declaration),
                        _ => return Err(unexpected("a PUnstructuredGrid summary", &event)),
                    }
                }
                b"Piece" => summary.sources.push(attribute(e, "Piece", "Source")?),
                b"PPointData" | b"PCellData" => {}
                _ => return Err(unexpected("a PUnstructuredGrid summary", &event)),
            },
            Event::End(e) => match e.name().as_ref() {
                b"PPoints" | b"PPointData" | b"PCellData" => section = None,
                _ => {}
            },
            Event::Eof => break,
            Event::Decl(_) | Event::Comment(_) => {}
            _ => return Err(unexpected("a PUnstructuredGrid summary", &event)),
        }
    }

    if !found_grid {
        return Err(ParseError::MissingElement("PUnstructuredGrid"));
    }

    Ok(summary)
}

fn unexpected(context: &'static str, event: &Event) -> ParseError {
    ParseError::UnexpectedElement(UnexpectedElement::new(context, EventSummary::new(event)))
}

fn optional_attribute(
    element: &BytesStart<'_>,
    attribute_name: &'static str,
) -> Result<Option<String>, ParseError> {
    match element.try_get_attribute(attribute_name)? {
        Some(attribute) => Ok(Some(attribute.unescape_value()?.into_owned())),
        None => Ok(None),
    }
}

fn attribute(
    element: &BytesStart<'_>,
    element_name: &'static str,
    attribute_name: &'static str,
) -> Result<String, ParseError> {
    optional_attribute(element, attribute_name)?.ok_or_else(|| {
        ParseError::MissingAttribute(MissingAttribute::new(element_name, attribute_name))
    })
}

fn check_value(
    element: &BytesStart<'_>,
    element_name: &'static str,
    attribute_name: &'static str,
    expected: &'static str,
) -> Result<(), ParseError> {
    let actual = attribute(element, element_name, attribute_name)?;
    if actual != expected {
        return Err(ParseError::UnexpectedAttributeValue(
            UnexpectedAttributeValue::new(element_name, attribute_name, expected, actual),
        ));
    }
    Ok(())
}

/// the declared byte order, `Some(true)` for big endian
fn byte_order(element: &BytesStart<'_>) -> Result<Option<bool>, ParseError> {
    if optional_attribute(element, "header_type")?.is_some() {
        check_value(element, "VTKFile", "header_type", "UInt32")?;
    }

    match optional_attribute(element, "byte_order")?.as_deref() {
        None => Ok(None),
        Some("BigEndian") => Ok(Some(true)),
        Some("LittleEndian") => Ok(Some(false)),
        Some(other) => Err(ParseError::UnexpectedAttributeValue(
            UnexpectedAttributeValue::new(
                "VTKFile",
                "byte_order",
                "BigEndian or LittleEndian",
                other.to_string(),
            ),
        )),
    }
}

fn declaration(
    element: &BytesStart<'_>,
    element_name: &'static str,
) -> Result<ArrayDeclaration, ParseError> {
    let type_name = attribute(element, element_name, "type")?;
    let precision =
        Precision::from_type_name(&type_name).ok_or(ParseError::UnknownPrecision(type_name))?;

    let components = match optional_attribute(element, "NumberOfComponents")? {
        Some(text) => parse_number(&text)?,
        None => 1,
    };

    let format = match attribute(element, element_name, "format")?.as_str() {
        "ascii" => Encoding::Ascii,
        "binary" => Encoding::Base64,
        other => {
            return Err(ParseError::UnexpectedAttributeValue(
                UnexpectedAttributeValue::new(
                    element_name,
                    "format",
                    "ascii or binary",
                    other.to_string(),
                ),
            ))
        }
    };

    Ok(ArrayDeclaration {
        name: attribute(element, element_name, "Name")?,
        precision,
        components,
        format,
    })
}

fn parse_number(text: &str) -> Result<usize, ParseError> {
    text.trim()
        .parse()
        .map_err(|_| ParseError::InvalidValue(InvalidValue::new("a count".into(), text.into())))
}

fn decode_array(
    declaration: ArrayDeclaration,
    payload: &str,
    big_endian: Option<bool>,
) -> Result<DataArrayRecord, ParseError> {
    let big_endian = big_endian.unwrap_or_else(encode::is_big_endian);
    let format = declaration.format;
    let name = &declaration.name;

    let values = match declaration.precision {
        Precision::Float64 => ArrayValues::Float64(values(name, payload, format, big_endian)?),
        Precision::Int32 => ArrayValues::Int32(values(name, payload, format, big_endian)?),
        Precision::Int64 => ArrayValues::Int64(values(name, payload, format, big_endian)?),
        Precision::UInt8 => ArrayValues::UInt8(values(name, payload, format, big_endian)?),
    };

    Ok(DataArrayRecord {
        name: declaration.name,
        precision: declaration.precision,
        components: declaration.components,
        format,
        values,
    })
}

fn values<T: Numeric + FromStr>(
    name: &str,
    payload: &str,
    format: Encoding,
    big_endian: bool,
) -> Result<Vec<T>, ParseError> {
    match format {
        Encoding::Ascii => payload
            .split_whitespace()
            .map(|word| {
                word.parse().map_err(|_| {
                    ParseError::InvalidValue(InvalidValue::new(
                        format!("{} in array `{name}`", T::as_precision()),
                        word.into(),
                    ))
                })
            })
            .collect(),
        Encoding::Base64 => {
            let bytes = encode::decode_with_header(payload, big_endian)?;
            Ok(encode::values_from_bytes(&bytes, big_endian))
        }
    }
}
