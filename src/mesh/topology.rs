use derive_more::Display;

/// Topological type of a mesh entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display)]
pub enum EntityType {
    Vertex,
    Edge,
    Triangle,
    Quad,
    Tet,
    Hex,
    Prism,
    Pyramid,
}

const TRIANGLE_EDGES: [[usize; 2]; 3] = [[0, 1], [1, 2], [2, 0]];
const QUAD_EDGES: [[usize; 2]; 4] = [[0, 1], [1, 2], [2, 3], [3, 0]];
const TET_EDGES: [[usize; 2]; 6] = [[0, 1], [1, 2], [2, 0], [0, 3], [1, 3], [2, 3]];
const HEX_EDGES: [[usize; 2]; 12] = [
    [0, 1],
    [1, 2],
    [2, 3],
    [3, 0],
    [4, 5],
    [5, 6],
    [6, 7],
    [7, 4],
    [0, 4],
    [1, 5],
    [2, 6],
    [3, 7],
];
const PRISM_EDGES: [[usize; 2]; 9] = [
    [0, 1],
    [1, 2],
    [2, 0],
    [3, 4],
    [4, 5],
    [5, 3],
    [0, 3],
    [1, 4],
    [2, 5],
];
const PYRAMID_EDGES: [[usize; 2]; 8] = [
    [0, 1],
    [1, 2],
    [2, 3],
    [3, 0],
    [0, 4],
    [1, 4],
    [2, 4],
    [3, 4],
];

type Face = (EntityType, &'static [usize]);

const TET_FACES: [Face; 4] = [
    (EntityType::Triangle, &[0, 1, 3]),
    (EntityType::Triangle, &[1, 2, 3]),
    (EntityType::Triangle, &[2, 0, 3]),
    (EntityType::Triangle, &[0, 2, 1]),
];
const HEX_FACES: [Face; 6] = [
    (EntityType::Quad, &[0, 4, 7, 3]),
    (EntityType::Quad, &[1, 2, 6, 5]),
    (EntityType::Quad, &[0, 1, 5, 4]),
    (EntityType::Quad, &[3, 7, 6, 2]),
    (EntityType::Quad, &[0, 3, 2, 1]),
    (EntityType::Quad, &[4, 5, 6, 7]),
];
const PRISM_FACES: [Face; 5] = [
    (EntityType::Triangle, &[0, 1, 2]),
    (EntityType::Triangle, &[3, 5, 4]),
    (EntityType::Quad, &[0, 3, 4, 1]),
    (EntityType::Quad, &[1, 4, 5, 2]),
    (EntityType::Quad, &[2, 5, 3, 0]),
];
const PYRAMID_FACES: [Face; 5] = [
    (EntityType::Quad, &[0, 3, 2, 1]),
    (EntityType::Triangle, &[0, 1, 4]),
    (EntityType::Triangle, &[1, 2, 4]),
    (EntityType::Triangle, &[2, 3, 4]),
    (EntityType::Triangle, &[3, 0, 4]),
];

impl EntityType {
    /// topological dimension of the entity
    pub fn dimension(self) -> usize {
        match self {
            Self::Vertex => 0,
            Self::Edge => 1,
            Self::Triangle | Self::Quad => 2,
            Self::Tet | Self::Hex | Self::Prism | Self::Pyramid => 3,
        }
    }

    /// number of vertices in the closure of the entity
    pub fn vertex_count(self) -> usize {
        match self {
            Self::Vertex => 1,
            Self::Edge => 2,
            Self::Triangle => 3,
            Self::Quad | Self::Tet => 4,
            Self::Pyramid => 5,
            Self::Prism => 6,
            Self::Hex => 8,
        }
    }

    /// local vertex pairs of the edges, in VTK order
    pub fn edges(self) -> &'static [[usize; 2]] {
        match self {
            Self::Vertex => &[],
            // an edge is its own single edge
            Self::Edge => &[[0, 1]],
            Self::Triangle => &TRIANGLE_EDGES,
            Self::Quad => &QUAD_EDGES,
            Self::Tet => &TET_EDGES,
            Self::Hex => &HEX_EDGES,
            Self::Prism => &PRISM_EDGES,
            Self::Pyramid => &PYRAMID_EDGES,
        }
    }

    /// type and local vertices of the faces of a 3D entity, in VTK order
    pub fn faces(self) -> &'static [(EntityType, &'static [usize])] {
        match self {
            Self::Tet => &TET_FACES,
            Self::Hex => &HEX_FACES,
            Self::Prism => &PRISM_FACES,
            Self::Pyramid => &PYRAMID_FACES,
            _ => &[],
        }
    }
}

/// VTK cell type codes indexed by entity type, then by `order - 1`. `-1` marks
/// combinations VTK has no cell for.
const VTK_TYPES: [[i8; 2]; 8] = [
    // linear, quadratic
    [1, -1],  // vertex
    [3, 21],  // edge
    [5, 22],  // triangle
    [9, 23],  // quad
    [10, 24], // tet
    [12, 25], // hex
    [13, -1], // prism
    [14, -1], // pyramid
];

/// the VTK cell type code of an element of a given type and interpolation order
pub fn vtk_cell_type(entity_type: EntityType, order: usize) -> Option<u8> {
    if !(1..=2).contains(&order) {
        return None;
    }

    let code = VTK_TYPES[entity_type as usize][order - 1];
    u8::try_from(code).ok()
}
