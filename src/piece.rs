//! Serialization of one partition into a `.vtu` document.
//!
//! The document is assembled in memory so the file itself can be written in a single
//! burst once every partition is ready.

use crate::classify;
use crate::encode;
use crate::field::{FieldData, FieldRef};
use crate::mesh::vtk_cell_type;
use crate::numbering::NodeNumbering;
use crate::traits::{Mesh, Numeric};
use crate::write_vtk::{end_element, start_element, write_dataarray, Encoding};
use crate::Error;

use ndarray::Array2;
use quick_xml::events::BytesStart;
use quick_xml::writer::Writer;
use std::io::Write;
use std::iter;

/// name of the synthetic cell array holding the partition id
pub const PART_ARRAY: &str = "apf_part";

/// Serialize the partition `part` of a mesh.
///
/// `numbering` fixes the row order of every point array and must number every node of
/// the mesh coordinate shape.
pub fn serialize_piece<M: Mesh + ?Sized>(
    mesh: &M,
    numbering: &NodeNumbering,
    part: usize,
    encoding: Encoding,
) -> Result<Vec<u8>, Error> {
    // nothing is emitted unless every element has a cell type
    let types = cell_types(mesh)?;
    let part = i32::try_from(part).map_err(|_| Error::IndexOverflow(part))?;

    let point_fields = classify::point_data_fields(mesh);
    let cell_fields = classify::cell_data_fields(mesh);
    if !cell_fields.is_empty() {
        classify::check_uniform_topology(mesh)?;
    }

    let mut writer = Writer::new(Vec::new());

    let mut root = BytesStart::new("VTKFile").with_attributes([("type", "UnstructuredGrid")]);
    if encoding.is_binary() {
        root.push_attribute(("byte_order", encode::byte_order()));
        root.push_attribute(("header_type", "UInt32"));
    }
    start_element(&mut writer, root)?;
    start_element(&mut writer, BytesStart::new("UnstructuredGrid"))?;

    let points = numbering.len().to_string();
    let cells = types.len().to_string();
    start_element(
        &mut writer,
        BytesStart::new("Piece").with_attributes([
            ("NumberOfPoints", points.as_str()),
            ("NumberOfCells", cells.as_str()),
        ]),
    )?;

    write_points(&mut writer, mesh, numbering, encoding)?;
    write_cells(&mut writer, mesh, numbering, types, encoding)?;
    write_point_data(&mut writer, &point_fields, numbering, encoding)?;
    write_cell_data(&mut writer, mesh, &cell_fields, part, encoding)?;

    end_element(&mut writer, "Piece")?;
    end_element(&mut writer, "UnstructuredGrid")?;
    end_element(&mut writer, "VTKFile")?;

    Ok(writer.into_inner())
}

/// VTK cell type of every element, in mesh order
fn cell_types<M: Mesh + ?Sized>(mesh: &M) -> Result<Vec<u8>, Error> {
    let order = mesh.shape().order();

    mesh.entities(mesh.dimension())
        .map(|element| {
            let entity_type = mesh.entity_type(element);
            vtk_cell_type(entity_type, order)
                .ok_or(Error::UnsupportedCellType { entity_type, order })
        })
        .collect()
}

fn write_points<W: Write, M: Mesh + ?Sized>(
    writer: &mut Writer<W>,
    mesh: &M,
    numbering: &NodeNumbering,
    encoding: Encoding,
) -> Result<(), Error> {
    start_element(writer, BytesStart::new("Points"))?;
    let coordinates = gather_nodes(mesh.coordinates(), numbering)?;
    write_rows(writer, mesh.coordinates().name(), coordinates, encoding)?;
    end_element(writer, "Points")
}

fn write_cells<W: Write, M: Mesh + ?Sized>(
    writer: &mut Writer<W>,
    mesh: &M,
    numbering: &NodeNumbering,
    types: Vec<u8>,
    encoding: Encoding,
) -> Result<(), Error> {
    let mut connectivity = Vec::with_capacity(numbering.len());
    let mut lengths = Vec::with_capacity(types.len());

    for element in mesh.entities(mesh.dimension()) {
        let numbers = numbering.element_numbers(mesh, element)?;
        lengths.push(numbers.len());
        for number in numbers {
            connectivity.push(as_int32(number)?);
        }
    }

    let mut offsets = Vec::with_capacity(lengths.len());
    let mut offset = 0;
    for length in &lengths {
        offset += length;
        offsets.push(as_int32(offset)?);
    }

    start_element(writer, BytesStart::new("Cells"))?;
    write_dataarray(writer, "connectivity", 1, &connectivity, lengths, encoding)?;
    write_dataarray(writer, "offsets", 1, &offsets, one_per_row(offsets.len()), encoding)?;
    write_dataarray(writer, "types", 1, &types, one_per_row(types.len()), encoding)?;
    end_element(writer, "Cells")
}

fn write_point_data<W: Write>(
    writer: &mut Writer<W>,
    fields: &[FieldRef<'_>],
    numbering: &NodeNumbering,
    encoding: Encoding,
) -> Result<(), Error> {
    start_element(writer, BytesStart::new("PointData"))?;

    for field in fields {
        match *field {
            FieldRef::Value(f) => write_rows(writer, f.name(), gather_nodes(f, numbering)?, encoding)?,
            FieldRef::Numbering(n) => {
                write_rows(writer, n.name(), gather_nodes(n, numbering)?, encoding)?
            }
            FieldRef::GlobalNumbering(n) => {
                write_rows(writer, n.name(), gather_nodes(n, numbering)?, encoding)?
            }
        }
    }

    end_element(writer, "PointData")
}

fn write_cell_data<W: Write, M: Mesh + ?Sized>(
    writer: &mut Writer<W>,
    mesh: &M,
    fields: &[FieldRef<'_>],
    part: i32,
    encoding: Encoding,
) -> Result<(), Error> {
    start_element(writer, BytesStart::new("CellData"))?;

    for field in fields {
        for point in 0..classify::count_integration_points(mesh, *field) {
            let name = classify::integration_point_name(*field, point);
            match *field {
                FieldRef::Value(f) => {
                    write_rows(writer, &name, gather_point(mesh, f, point)?, encoding)?
                }
                FieldRef::Numbering(n) => {
                    write_rows(writer, &name, gather_point(mesh, n, point)?, encoding)?
                }
                FieldRef::GlobalNumbering(n) => {
                    write_rows(writer, &name, gather_point(mesh, n, point)?, encoding)?
                }
            }
        }
    }

    let elements = mesh.count(mesh.dimension());
    let parts = vec![part; elements];
    write_dataarray(writer, PART_ARRAY, 1, &parts, one_per_row(elements), encoding)?;

    end_element(writer, "CellData")
}

/// values of a field at every numbered node, one row per node
fn gather_nodes<T: Numeric>(
    field: &FieldData<T>,
    numbering: &NodeNumbering,
) -> Result<Array2<T>, Error> {
    let components = field.components();
    let mut values = Vec::with_capacity(numbering.len() * components);

    for node in numbering.nodes() {
        let row = field
            .node_components(node.entity, node.node)
            .ok_or_else(|| Error::MissingNodeData {
                field: field.name().to_string(),
                entity: node.entity,
                node: node.node,
            })?;
        values.extend_from_slice(row);
    }

    Ok(Array2::from_shape_vec((numbering.len(), components), values)?)
}

/// values of a field at integration point `point` of every element, one row per element
fn gather_point<M: Mesh + ?Sized, T: Numeric>(
    mesh: &M,
    field: &FieldData<T>,
    point: usize,
) -> Result<Array2<T>, Error> {
    let components = field.components();
    let elements = mesh.count(mesh.dimension());
    let mut values = Vec::with_capacity(elements * components);

    for element in mesh.entities(mesh.dimension()) {
        let row = field
            .node_components(element, point)
            .ok_or_else(|| Error::MissingNodeData {
                field: field.name().to_string(),
                entity: element,
                node: point,
            })?;
        values.extend_from_slice(row);
    }

    Ok(Array2::from_shape_vec((elements, components), values)?)
}

fn write_rows<W: Write, T: Numeric>(
    writer: &mut Writer<W>,
    name: &str,
    rows: Array2<T>,
    encoding: Encoding,
) -> Result<(), Error> {
    let (count, components) = rows.dim();
    let values = rows.into_raw_vec();
    write_dataarray(
        writer,
        name,
        components,
        &values,
        iter::repeat(components).take(count),
        encoding,
    )
}

fn one_per_row(count: usize) -> iter::Take<iter::Repeat<usize>> {
    iter::repeat(1).take(count)
}

fn as_int32(value: usize) -> Result<i32, Error> {
    i32::try_from(value).map_err(|_| Error::IndexOverflow(value))
}
