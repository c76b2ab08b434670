//! The `.pvtu` summary tying the pieces of all partitions together.

use crate::classify;
use crate::field::FieldRef;
use crate::piece::PART_ARRAY;
use crate::traits::Mesh;
use crate::write_vtk::{empty_element, end_element, start_element, write_pdataarray};
use crate::write_vtk::{Encoding, Precision};
use crate::Error;

use quick_xml::events::BytesStart;
use quick_xml::writer::Writer;
use std::io::Write;
use std::path::{Path, PathBuf};

/// `<prefix><rank>.vtu`
pub fn piece_file_name(prefix: &str, rank: usize) -> PathBuf {
    PathBuf::from(format!("{prefix}{rank}.vtu"))
}

/// `<prefix>.pvtu`
pub fn summary_file_name(prefix: &str) -> PathBuf {
    PathBuf::from(format!("{prefix}.pvtu"))
}

/// the final component of a path, or the path itself when it has none
pub fn strip_path(path: &Path) -> String {
    path.file_name()
        .unwrap_or(path.as_os_str())
        .to_string_lossy()
        .into_owned()
}

/// Serialize the summary of `parts` partitions written with `prefix`.
///
/// The declarations follow the same classification as the pieces, so they are only
/// accurate when every partition registers the same fields.
pub fn serialize_summary<M: Mesh + ?Sized>(
    prefix: &str,
    mesh: &M,
    parts: usize,
    encoding: Encoding,
) -> Result<Vec<u8>, Error> {
    let mut writer = Writer::new(Vec::new());

    start_element(
        &mut writer,
        BytesStart::new("VTKFile").with_attributes([("type", "PUnstructuredGrid")]),
    )?;
    start_element(
        &mut writer,
        BytesStart::new("PUnstructuredGrid").with_attributes([("GhostLevel", "0")]),
    )?;

    start_element(&mut writer, BytesStart::new("PPoints"))?;
    declare(&mut writer, FieldRef::Value(mesh.coordinates()), encoding)?;
    end_element(&mut writer, "PPoints")?;

    start_element(&mut writer, BytesStart::new("PPointData"))?;
    for field in classify::point_data_fields(mesh) {
        declare(&mut writer, field, encoding)?;
    }
    end_element(&mut writer, "PPointData")?;

    start_element(&mut writer, BytesStart::new("PCellData"))?;
    for field in classify::cell_data_fields(mesh) {
        for point in 0..classify::count_integration_points(mesh, field) {
            let name = classify::integration_point_name(field, point);
            write_pdataarray(
                &mut writer,
                &name,
                field.precision(),
                field.components(),
                encoding,
            )?;
        }
    }
    write_pdataarray(&mut writer, PART_ARRAY, Precision::Int32, 1, encoding)?;
    end_element(&mut writer, "PCellData")?;

    for rank in 0..parts {
        let source = strip_path(&piece_file_name(prefix, rank));
        empty_element(
            &mut writer,
            BytesStart::new("Piece").with_attributes([("Source", source.as_str())]),
        )?;
    }

    end_element(&mut writer, "PUnstructuredGrid")?;
    end_element(&mut writer, "VTKFile")?;

    Ok(writer.into_inner())
}

fn declare<W: Write>(
    writer: &mut Writer<W>,
    field: FieldRef<'_>,
    encoding: Encoding,
) -> Result<(), Error> {
    write_pdataarray(
        writer,
        field.name(),
        field.precision(),
        field.components(),
        encoding,
    )
}
