use crate::encode;
use crate::traits::Numeric;
use crate::Error;

use derive_more::Display;
use std::io::Write;

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::writer::Writer;

/// the encoding to use when writing an inline dataarray
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Encoding {
    /// whitespace separated text, one mesh row per line
    #[default]
    Ascii,
    /// length prefixed base64 of the raw native-endian bytes
    Base64,
}

impl Encoding {
    fn to_str(&self) -> &'static str {
        match &self {
            Self::Ascii => "ascii",
            Self::Base64 => "binary",
        }
    }

    pub fn is_binary(&self) -> bool {
        matches!(self, Self::Base64)
    }
}

/// VTK scalar type of the values in a `DataArray`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Precision {
    #[display(fmt = "Float64")]
    Float64,
    #[display(fmt = "Int32")]
    Int32,
    #[display(fmt = "Int64")]
    Int64,
    #[display(fmt = "UInt8")]
    UInt8,
}

impl Precision {
    /// the type name used in the `type` attribute
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Float64 => "Float64",
            Self::Int32 => "Int32",
            Self::Int64 => "Int64",
            Self::UInt8 => "UInt8",
        }
    }

    pub fn from_type_name(name: &str) -> Option<Self> {
        match name {
            "Float64" => Some(Self::Float64),
            "Int32" => Some(Self::Int32),
            "Int64" => Some(Self::Int64),
            "UInt8" => Some(Self::UInt8),
            _ => None,
        }
    }
}

/// the attributes describing an array: type, name, component count and format
fn describe_array<'a>(
    name: &'static str,
    array_name: &'a str,
    precision: Precision,
    components: &'a str,
    encoding: Encoding,
) -> BytesStart<'a> {
    BytesStart::new(name).with_attributes([
        ("type", precision.type_name()),
        ("Name", array_name),
        ("NumberOfComponents", components),
        ("format", encoding.to_str()),
    ])
}

/// end the current line of the document
pub(crate) fn newline<W: Write>(writer: &mut Writer<W>) -> Result<(), Error> {
    writer.inner().write_all(b"\n")?;
    Ok(())
}

/// `<name attributes..>` on its own line
pub(crate) fn start_element<W: Write>(
    writer: &mut Writer<W>,
    element: BytesStart<'_>,
) -> Result<(), Error> {
    writer.write_event(Event::Start(element))?;
    newline(writer)
}

/// `</name>` on its own line
pub(crate) fn end_element<W: Write>(writer: &mut Writer<W>, name: &str) -> Result<(), Error> {
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    newline(writer)
}

/// `<name attributes../>` on its own line
pub(crate) fn empty_element<W: Write>(
    writer: &mut Writer<W>,
    element: BytesStart<'_>,
) -> Result<(), Error> {
    writer.write_event(Event::Empty(element))?;
    newline(writer)
}

/// declare an array in a parallel summary file. The declaration never carries data.
pub fn write_pdataarray<W: Write>(
    writer: &mut Writer<W>,
    name: &str,
    precision: Precision,
    components: usize,
    encoding: Encoding,
) -> Result<(), Error> {
    let components = components.to_string();
    let element = describe_array("PDataArray", name, precision, &components, encoding);
    empty_element(writer, element)
}

/// open a `DataArray` element whose payload follows on the next line
pub fn write_dataarray_header<W: Write>(
    writer: &mut Writer<W>,
    name: &str,
    precision: Precision,
    components: usize,
    encoding: Encoding,
) -> Result<(), Error> {
    let components = components.to_string();
    let element = describe_array("DataArray", name, precision, &components, encoding);
    start_element(writer, element)
}

pub fn close_dataarray<W: Write>(writer: &mut Writer<W>) -> Result<(), Error> {
    end_element(writer, "DataArray")
}

/// Write a complete inline `DataArray`: header, payload and closing tag.
///
/// `values` holds all rows back to back and `row_lengths` the number of values of every
/// row. Ascii payloads put one row per line, binary payloads ignore the row layout.
pub fn write_dataarray<W, T, R>(
    writer: &mut Writer<W>,
    name: &str,
    components: usize,
    values: &[T],
    row_lengths: R,
    encoding: Encoding,
) -> Result<(), Error>
where
    W: Write,
    T: Numeric,
    R: IntoIterator<Item = usize>,
{
    write_dataarray_header(writer, name, T::as_precision(), components, encoding)?;

    match encoding {
        Encoding::Ascii => {
            let data = ascii_rows(values, row_lengths);
            writer.inner().write_all(data.as_bytes())?;
        }
        Encoding::Base64 => {
            let data = encode::encode_with_header(values)?;
            writer.write_event(Event::Text(BytesText::new(&data)))?;
            newline(writer)?;
        }
    }

    close_dataarray(writer)
}

/// every value followed by a space, every row followed by a newline
fn ascii_rows<T: Numeric, R: IntoIterator<Item = usize>>(values: &[T], row_lengths: R) -> String {
    let mut data = String::new();
    let mut rest = values;

    for length in row_lengths {
        let (row, tail) = rest.split_at(length.min(rest.len()));
        for value in row {
            value.push_ascii(&mut data);
            data.push(' ');
        }
        data.push('\n');
        rest = tail;
    }

    data
}
