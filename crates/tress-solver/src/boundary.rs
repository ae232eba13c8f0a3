//! Boundary conditions: which vertices are held in place.

use serde::{Deserialize, Serialize};
use tress_types::{TressError, TressResult};

/// Vertex pinning applied after every integration substep.
///
/// Pinned vertices are reset to their construction position with zero
/// velocity. An edge whose two vertices are both pinned also keeps its
/// twist angle fixed.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pinning {
    /// Every vertex is free.
    None,
    /// Vertex 0 (the hair root) is fixed.
    #[default]
    Root,
    /// Vertices 0 and 1 are fixed, clamping the root edge and its twist.
    RootEdge,
    /// Explicit vertex indices.
    Indices(Vec<usize>),
}

impl Pinning {
    /// Per-vertex pinned flags for a strand of `vertex_count` (≥ 2) vertices.
    pub fn mask(&self, vertex_count: usize) -> TressResult<Vec<bool>> {
        let mut pinned = vec![false; vertex_count];
        match self {
            Self::None => {}
            Self::Root => pinned[0] = true,
            Self::RootEdge => {
                pinned[0] = true;
                pinned[1] = true;
            }
            Self::Indices(indices) => {
                for &i in indices {
                    let slot = pinned.get_mut(i).ok_or_else(|| {
                        TressError::InvalidConfig(format!(
                            "Pinned vertex {i} out of range for {vertex_count} vertices"
                        ))
                    })?;
                    *slot = true;
                }
            }
        }
        Ok(pinned)
    }
}
