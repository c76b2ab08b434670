//! Common traits and types that are useful for writing meshes with `mesh_vtk`

pub use crate::traits::{FieldShape, Mesh, Numeric};

pub use crate::comm::{Comm, SerialComm, ThreadComm};
pub use crate::field::{Field, FieldRef, GlobalNumbering, Numbering};
pub use crate::mesh::{Entity, EntityType, IntegrationPoints, Lagrange, MeshBuilder};
pub use crate::parallel::{write_binary_vtk_files, write_one_vtk_file, write_vtk_files};
pub use crate::parallel::{write_with_options, WriteMode, WriteOptions};
pub use crate::write_vtk::{Encoding, Precision};

pub use crate::Error;
