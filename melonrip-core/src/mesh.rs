// Flat mesh buffers produced by a parse.
//
// Vertices are never shared: every face owns a contiguous run of vertices,
// in draw order. Triangles and quads coexist in one mesh.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Vertex indices of one face: 3 for triangles, 4 for quads.
pub type FaceIndices = SmallVec<[u32; 4]>;

/// Mesh buffers, indexed in parallel: one entry per vertex in `positions`,
/// `colors` and `uvs`; one entry per face in `faces` and `face_materials`.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    /// Z-up positions.
    pub positions: Vec<[f32; 3]>,
    /// Resolved RGBA vertex colors.
    pub colors: Vec<[f32; 4]>,
    /// Bottom-left-origin texture coordinates.
    pub uvs: Vec<[f32; 2]>,
    pub faces: Vec<FaceIndices>,
    /// Index into the material list, per face.
    pub face_materials: Vec<u32>,
}

impl Mesh {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Colors as one flat `[r, g, b, a, r, g, b, a, ...]` slice.
    pub fn flat_colors(&self) -> impl Iterator<Item = f32> + '_ {
        self.colors.iter().flatten().copied()
    }

    /// UVs as one flat `[u, v, u, v, ...]` slice.
    pub fn flat_uvs(&self) -> impl Iterator<Item = f32> + '_ {
        self.uvs.iter().flatten().copied()
    }

    /// Faces split into triangles (quad ABCD becomes ABC + ACD).
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.faces.iter().flat_map(|f| {
            let first = [f[0], f[1], f[2]];
            let second = (f.len() == 4).then(|| [f[0], f[2], f[3]]);
            std::iter::once(first).chain(second)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    #[test]
    fn quads_split_into_two_triangles() {
        let mesh = Mesh {
            faces: vec![smallvec![0, 1, 2], smallvec![3, 4, 5, 6]],
            ..Default::default()
        };
        let tris: Vec<_> = mesh.triangles().collect();
        assert_eq!(tris, vec![[0, 1, 2], [3, 4, 5], [3, 5, 6]]);
    }

    #[test]
    fn flat_views() {
        let mesh = Mesh {
            colors: vec![[0.0, 0.25, 0.5, 1.0]],
            uvs: vec![[0.5, 0.75]],
            ..Default::default()
        };
        assert_eq!(mesh.flat_colors().collect::<Vec<_>>(), vec![0.0, 0.25, 0.5, 1.0]);
        assert_eq!(mesh.flat_uvs().collect::<Vec<_>>(), vec![0.5, 0.75]);
    }
}
