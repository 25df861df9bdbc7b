//! Render-ready projection of a [`Topology`]: bond pairs and atom colors.

use serde::{Deserialize, Serialize};

use crate::colors::element_color;
use crate::error::TrajviewError;
use crate::options::ColorOptions;
use crate::trajectory::Topology;

/// Bonds and per-atom colors as pushed to the renderer.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TopologySnapshot {
    /// `(a, b)` topology atom indices, in the topology's bond order.
    pub bonds: Vec<(usize, usize)>,
    /// `0xRRGGBB` color per atom, in atom order.
    pub atom_colors: Vec<u32>,
}

impl TopologySnapshot {
    /// Number of atoms described.
    #[must_use]
    pub fn n_atoms(&self) -> usize {
        self.atom_colors.len()
    }
}

/// Project a topology using the built-in element color table.
///
/// Fails on the first atom whose element has no table entry.
pub fn project_topology(
    topology: &Topology,
) -> Result<TopologySnapshot, TrajviewError> {
    project(topology, element_color)
}

/// Project a topology, resolving colors through `colors` (overrides, then
/// the built-in table, then the optional fallback).
pub fn project_topology_with(
    topology: &Topology,
    colors: &ColorOptions,
) -> Result<TopologySnapshot, TrajviewError> {
    project(topology, |symbol| colors.resolve(symbol))
}

fn project(
    topology: &Topology,
    color_of: impl Fn(&str) -> Result<u32, TrajviewError>,
) -> Result<TopologySnapshot, TrajviewError> {
    let bonds = topology
        .bonded_atoms()
        .map(|(a, b)| (a.index, b.index))
        .collect();
    let atom_colors = topology
        .atoms()
        .iter()
        .map(|atom| color_of(&atom.element))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(TopologySnapshot { bonds, atom_colors })
}
