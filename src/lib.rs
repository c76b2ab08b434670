//! # mesh-vtk
//!
//! Write a partitioned unstructured finite element mesh, together with the fields,
//! numberings and global numberings registered on it, to VTK XML files: one
//! `<prefix><rank>.vtu` piece per partition and a single `<prefix>.pvtu` summary
//! written by the leader.
//!
//! ```ignore
//! let comm = mesh_vtk::SerialComm::new();
//! mesh_vtk::write_vtk_files("out/solution", &mesh, &comm)?;
//! ```
//!
//! Fields are classified by the shape of their node distribution:
//!
//! * fields sharing the mesh coordinate shape are written as `<PointData>`
//! * fields with nodes only on the top dimension entities are written as
//!   `<CellData>`, one array per integration point
//! * everything else is skipped
//!
//! A field is only ever written if every node it puts on the mesh has data assigned.

pub mod classify;
pub mod comm;
pub mod encode;
pub mod field;
pub mod mesh;
pub mod numbering;
pub mod parallel;
pub mod parse;
pub mod piece;
pub mod prelude;
pub mod summary;
mod traits;
mod write_vtk;

pub use traits::{FieldShape, Mesh, Numeric};

pub use comm::{Comm, SerialComm, ThreadComm};
#[cfg(feature = "mpi")]
pub use comm::MpiComm;

pub use field::{Field, FieldData, FieldRef, GlobalNumbering, Numbering};
pub use mesh::{Entity, EntityIter, EntityType, IntegrationPoints, Lagrange};
pub use mesh::{MeshBuilder, UnstructuredMesh};
pub use numbering::{Node, NodeNumbering};

pub use parallel::{write_binary_vtk_files, write_one_vtk_file, write_vtk_files};
pub use parallel::{write_with_options, WriteMode, WriteOptions};

pub use parse::{read_pvtu, read_vtu, ParseError};
pub use write_vtk::{close_dataarray, write_dataarray, write_dataarray_header};
pub use write_vtk::{write_pdataarray, Encoding, Precision};

pub use quick_xml::writer::Writer;

/// general purpose error enumeration for possible causes of failure.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("An io error occured: `{0}`")]
    Io(#[from] std::io::Error),
    #[error("Could not create `{path}`: {source}")]
    Create {
        path: std::path::PathBuf,
        source: std::io::Error,
    },
    #[error("Could not write XML data: `{0}`")]
    XmlWrite(#[from] quick_xml::Error),
    #[error("Error while parsing VTK xml: {0}")]
    Parse(#[from] ParseError),
    #[error("array shape does not match its data: `{0}`")]
    Shape(#[from] ndarray::ShapeError),
    #[error("no VTK cell type for {entity_type:?} elements of order {order}")]
    UnsupportedCellType {
        entity_type: EntityType,
        order: usize,
    },
    #[error("Lagrange shapes of order {0} are not supported")]
    UnsupportedOrder(usize),
    #[error("integration point data requires a single element type, found {first:?} and {other:?}")]
    MixedTopology {
        first: EntityType,
        other: EntityType,
    },
    #[error("field `{field}` has no data for node {node} of {entity:?}")]
    MissingNodeData {
        field: String,
        entity: Entity,
        node: usize,
    },
    #[error("field `{field}` has {expected} components, got {actual} values")]
    ComponentMismatch {
        field: String,
        expected: usize,
        actual: usize,
    },
    #[error("invalid element: {0}")]
    InvalidElement(String),
    #[error("another partition failed to write its files")]
    PartitionFailed,
    #[error("index {0} does not fit an Int32 array")]
    IndexOverflow(usize),
    #[error("binary payload of {0} bytes does not fit a UInt32 header")]
    PayloadTooLarge(usize),
}
