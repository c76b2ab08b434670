//! # Traits
//!
//! The writer does not own a mesh. Everything it needs to know about topology, node
//! distributions and stored values is read through the traits in this module, so any
//! mesh data structure can be written once it implements [`Mesh`].
//!

use crate::field::{Field, FieldRef, GlobalNumbering, Numbering};
use crate::mesh::{Entity, EntityIter, EntityType};
use crate::write_vtk::Precision;

use std::fmt::{Debug, Display};
use std::sync::Arc;

/// Scalar element types that can be stored in a field and written to a `DataArray`
pub trait Numeric: num_traits::Num + Copy + Debug + Display {
    /// number of bytes of one value
    const SIZE: usize;

    /// the VTK type tag of this element type
    fn as_precision() -> Precision;

    /// append the native byte order representation of the value
    fn extend_ne_bytes(&self, bytes: &mut Vec<u8>);

    /// read a value back from `SIZE` bytes of a given byte order
    fn from_bytes(bytes: &[u8], big_endian: bool) -> Self;

    /// append the ascii representation of the value (without separator)
    fn push_ascii(&self, data: &mut String) {
        use std::fmt::Write;
        // writing into a String cannot fail
        let _ = write!(data, "{}", self);
    }
}

macro_rules! impl_numeric {
    ($($t:ty => $precision:ident),*) => {
        $(
            impl Numeric for $t {
                const SIZE: usize = std::mem::size_of::<$t>();

                fn as_precision() -> Precision {
                    Precision::$precision
                }

                fn extend_ne_bytes(&self, bytes: &mut Vec<u8>) {
                    bytes.extend_from_slice(&self.to_ne_bytes());
                }

                fn from_bytes(bytes: &[u8], big_endian: bool) -> Self {
                    let mut arr = [0; std::mem::size_of::<$t>()];
                    arr.copy_from_slice(&bytes[..Self::SIZE]);
                    if big_endian {
                        <$t>::from_be_bytes(arr)
                    } else {
                        <$t>::from_le_bytes(arr)
                    }
                }
            }
        )*
    };
}

impl_numeric!(i32 => Int32, i64 => Int64, u8 => UInt8);

impl Numeric for f64 {
    const SIZE: usize = 8;

    fn as_precision() -> Precision {
        Precision::Float64
    }

    fn extend_ne_bytes(&self, bytes: &mut Vec<u8>) {
        bytes.extend_from_slice(&self.to_ne_bytes());
    }

    fn from_bytes(bytes: &[u8], big_endian: bool) -> Self {
        let mut arr = [0; 8];
        arr.copy_from_slice(&bytes[..8]);
        if big_endian {
            f64::from_be_bytes(arr)
        } else {
            f64::from_le_bytes(arr)
        }
    }

    // shortest representation that parses back to the same value
    fn push_ascii(&self, data: &mut String) {
        let mut buffer = ryu::Buffer::new();
        data.push_str(buffer.format(*self));
    }
}

/// Describes how the nodes of a field are distributed over the entities of a mesh.
///
/// Shapes are shared between the mesh and its fields as `Arc<dyn FieldShape>`. Two
/// fields have the same shape only if they hold the same `Arc`, structurally equal
/// shapes are still different shapes.
pub trait FieldShape: Debug + Send + Sync {
    /// human readable name of the shape
    fn name(&self) -> &str;

    /// polynomial order of the interpolation, 1 is linear and 2 is quadratic
    fn order(&self) -> usize;

    /// whether any entity of dimension `dim` carries nodes
    fn has_nodes_in(&self, dim: usize) -> bool;

    /// number of nodes placed on one entity of the given type
    fn count_nodes_on(&self, entity_type: EntityType) -> usize;

    /// number of nodes in the closure of one entity of the given type, in the order
    /// they appear in the element connectivity
    fn count_element_nodes(&self, entity_type: EntityType) -> usize {
        let dim = entity_type.dimension();
        let mut count = self.count_nodes_on(entity_type);

        if dim > 0 {
            count += entity_type.vertex_count() * self.count_nodes_on(EntityType::Vertex);
        }
        if dim > 1 {
            count += entity_type.edges().len() * self.count_nodes_on(EntityType::Edge);
        }
        if dim > 2 {
            count += entity_type
                .faces()
                .iter()
                .map(|(face_type, _)| self.count_nodes_on(*face_type))
                .sum::<usize>();
        }

        count
    }
}

/// Read-only view of a mesh partition and the data registered on it.
///
/// Entities of every dimension are indexed `0..count(dim)`; that order is the order in
/// which every array of a piece file is written.
pub trait Mesh {
    /// topological dimension of the top level entities (elements)
    fn dimension(&self) -> usize;

    /// number of entities of dimension `dim` in this partition
    fn count(&self, dim: usize) -> usize;

    /// iterate all entities of dimension `dim` in mesh order
    fn entities(&self, dim: usize) -> EntityIter {
        EntityIter::new(dim, self.count(dim))
    }

    /// topological type of an entity
    fn entity_type(&self, entity: Entity) -> EntityType;

    /// the entities of dimension `dim` bounding `entity`, in the canonical local order of
    /// its type
    fn downward(&self, entity: Entity, dim: usize) -> &[Entity];

    /// the node distribution of the coordinate field
    fn shape(&self) -> &Arc<dyn FieldShape>;

    /// the coordinate field, three components per node
    fn coordinates(&self) -> &Field;

    /// registered value fields in registration order
    fn fields(&self) -> &[Field];

    /// registered integer numberings in registration order
    fn numberings(&self) -> &[Numbering];

    /// registered global numberings in registration order
    fn global_numberings(&self) -> &[GlobalNumbering];

    /// every registered field-like object: value fields, then numberings, then global
    /// numberings
    fn field_refs(&self) -> Vec<FieldRef<'_>> {
        self.fields()
            .iter()
            .map(FieldRef::Value)
            .chain(self.numberings().iter().map(FieldRef::Numbering))
            .chain(self.global_numberings().iter().map(FieldRef::GlobalNumbering))
            .collect()
    }
}
