//! Inbound trajectory model: per-frame coordinates plus a shared topology.
//!
//! The viewer only reads through [`TrajectorySource`], so callers backed by
//! their own frame storage can implement it directly. [`Trajectory`] is the
//! in-memory implementation.

use std::sync::Arc;

use glam::Vec3;

use crate::error::TrajviewError;

/// One atom of a topology.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Atom {
    /// Topology-assigned atom index, unique within `0..n_atoms`. This is
    /// what bonds are reported with, not the atom's position in
    /// [`Topology::atoms`].
    pub index: usize,
    /// Atom name, e.g. `"CA"`.
    pub name: String,
    /// Element symbol, any case, e.g. `"Fe"`.
    pub element: String,
}

impl Atom {
    /// Atom with the given index, name and element symbol.
    pub fn new(
        index: usize,
        name: impl Into<String>,
        element: impl Into<String>,
    ) -> Self {
        Self {
            index,
            name: name.into(),
            element: element.into(),
        }
    }
}

/// Static description of atoms and their bonds.
///
/// Immutable once built; trajectories share it through an [`Arc`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Topology {
    atoms: Vec<Atom>,
    /// Pairs of positions into `atoms`, in source order.
    bonds: Vec<(usize, usize)>,
}

impl Topology {
    /// Build a topology. Each bond is a pair of positions into `atoms`.
    ///
    /// Atom indices must be a permutation of `0..atoms.len()`, and bonds
    /// must refer to existing positions.
    pub fn new(
        atoms: Vec<Atom>,
        bonds: Vec<(usize, usize)>,
    ) -> Result<Self, TrajviewError> {
        let mut seen = vec![false; atoms.len()];
        for atom in &atoms {
            match seen.get_mut(atom.index) {
                Some(slot) if !*slot => *slot = true,
                Some(_) => {
                    return Err(TrajviewError::InvalidTopology(format!(
                        "atom index {} appears more than once",
                        atom.index
                    )));
                }
                None => {
                    return Err(TrajviewError::InvalidTopology(format!(
                        "atom index {} out of range ({} atoms)",
                        atom.index,
                        atoms.len()
                    )));
                }
            }
        }
        if let Some(&(a, b)) =
            bonds.iter().find(|&&(a, b)| a >= atoms.len() || b >= atoms.len())
        {
            return Err(TrajviewError::InvalidTopology(format!(
                "bond ({a}, {b}) references a missing atom ({} atoms)",
                atoms.len()
            )));
        }
        Ok(Self { atoms, bonds })
    }

    /// Atoms in topology order.
    #[must_use]
    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    /// Number of atoms.
    #[must_use]
    pub fn n_atoms(&self) -> usize {
        self.atoms.len()
    }

    /// Bonds as position pairs into [`atoms`](Self::atoms), source order.
    #[must_use]
    pub fn bonds(&self) -> &[(usize, usize)] {
        &self.bonds
    }

    /// Bonds resolved to their atoms, in source order.
    pub fn bonded_atoms(&self) -> impl Iterator<Item = (&Atom, &Atom)> + '_ {
        self.bonds
            .iter()
            .map(|&(a, b)| (&self.atoms[a], &self.atoms[b]))
    }
}

/// Read-only access to a sequence of coordinate frames.
pub trait TrajectorySource {
    /// Number of frames.
    fn n_frames(&self) -> usize;

    /// Coordinates of frame `index`, one position per atom, or `None` when
    /// out of range.
    fn frame(&self, index: usize) -> Option<&[Vec3]>;

    /// Topology shared by every frame.
    fn topology(&self) -> &Arc<Topology>;
}

/// In-memory trajectory.
#[derive(Debug, Clone)]
pub struct Trajectory {
    frames: Vec<Vec<Vec3>>,
    topology: Arc<Topology>,
}

impl Trajectory {
    /// Trajectory over pre-loaded frames. Every frame must hold exactly one
    /// position per topology atom.
    pub fn new(
        frames: Vec<Vec<Vec3>>,
        topology: Arc<Topology>,
    ) -> Result<Self, TrajviewError> {
        let n_atoms = topology.n_atoms();
        if let Some((i, frame)) =
            frames.iter().enumerate().find(|(_, f)| f.len() != n_atoms)
        {
            return Err(TrajviewError::InvalidTopology(format!(
                "frame {i} has {} positions, topology has {n_atoms} atoms",
                frame.len()
            )));
        }
        Ok(Self { frames, topology })
    }

    /// Trajectory from a flat `[frame][atom][xyz]` buffer.
    pub fn from_flat_xyz(
        xyz: &[f32],
        topology: Arc<Topology>,
    ) -> Result<Self, TrajviewError> {
        let stride = topology.n_atoms() * 3;
        if stride == 0 {
            if !xyz.is_empty() {
                return Err(TrajviewError::ShapeMismatch {
                    expected: 0,
                    actual: xyz.len(),
                });
            }
            return Self::new(Vec::new(), topology);
        }
        if xyz.len() % stride != 0 {
            return Err(TrajviewError::ShapeMismatch {
                expected: (xyz.len() / stride + 1) * stride,
                actual: xyz.len(),
            });
        }
        let frames = xyz
            .chunks_exact(stride)
            .map(|frame| {
                frame
                    .chunks_exact(3)
                    .map(|p| Vec3::new(p[0], p[1], p[2]))
                    .collect()
            })
            .collect();
        Self::new(frames, topology)
    }

    /// Whether the trajectory holds no frames.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl TrajectorySource for Trajectory {
    fn n_frames(&self) -> usize {
        self.frames.len()
    }

    fn frame(&self, index: usize) -> Option<&[Vec3]> {
        self.frames.get(index).map(Vec::as_slice)
    }

    fn topology(&self) -> &Arc<Topology> {
        &self.topology
    }
}

impl<T: TrajectorySource + ?Sized> TrajectorySource for Arc<T> {
    fn n_frames(&self) -> usize {
        (**self).n_frames()
    }

    fn frame(&self, index: usize) -> Option<&[Vec3]> {
        (**self).frame(index)
    }

    fn topology(&self) -> &Arc<Topology> {
        (**self).topology()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn water() -> Arc<Topology> {
        Arc::new(
            Topology::new(
                vec![
                    Atom::new(0, "H1", "H"),
                    Atom::new(1, "O", "O"),
                    Atom::new(2, "H2", "H"),
                ],
                vec![(0, 1), (1, 2)],
            )
            .unwrap(),
        )
    }

    #[test]
    fn topology_rejects_dangling_bond() {
        let err = Topology::new(vec![Atom::new(0, "C", "C")], vec![(0, 1)])
            .unwrap_err();
        assert!(matches!(err, TrajviewError::InvalidTopology(_)));
    }

    #[test]
    fn topology_rejects_out_of_range_atom_index() {
        let err = Topology::new(
            vec![Atom::new(10, "C", "C"), Atom::new(11, "O", "O")],
            vec![(0, 1)],
        )
        .unwrap_err();
        assert!(matches!(err, TrajviewError::InvalidTopology(_)));
    }

    #[test]
    fn topology_rejects_repeated_atom_index() {
        let err = Topology::new(
            vec![Atom::new(0, "C", "C"), Atom::new(0, "O", "O")],
            Vec::new(),
        )
        .unwrap_err();
        assert!(matches!(err, TrajviewError::InvalidTopology(_)));
    }

    #[test]
    fn bonded_atoms_follow_source_order() {
        let top = water();
        let names: Vec<(&str, &str)> = top
            .bonded_atoms()
            .map(|(a, b)| (a.name.as_str(), b.name.as_str()))
            .collect();
        assert_eq!(names, vec![("H1", "O"), ("O", "H2")]);
    }

    #[test]
    fn frames_must_match_atom_count() {
        let err = Trajectory::new(vec![vec![Vec3::ZERO; 2]], water())
            .unwrap_err();
        assert!(matches!(err, TrajviewError::InvalidTopology(_)));
    }

    #[test]
    fn from_flat_xyz_splits_frames() {
        let xyz: Vec<f32> = (0..18).map(|v| v as f32).collect();
        let traj = Trajectory::from_flat_xyz(&xyz, water()).unwrap();
        assert_eq!(traj.n_frames(), 2);
        assert_eq!(traj.frame(1).unwrap()[0], Vec3::new(9.0, 10.0, 11.0));
        assert!(traj.frame(2).is_none());
    }

    #[test]
    fn from_flat_xyz_rejects_data_for_atomless_topology() {
        let empty = Arc::new(Topology::default());
        let err = Trajectory::from_flat_xyz(&[1.0, 2.0, 3.0], Arc::clone(&empty))
            .unwrap_err();
        assert!(matches!(
            err,
            TrajviewError::ShapeMismatch {
                expected: 0,
                actual: 3
            }
        ));
        assert!(Trajectory::from_flat_xyz(&[], empty).unwrap().is_empty());
    }

    #[test]
    fn from_flat_xyz_rejects_partial_frame() {
        let xyz = [0.0_f32; 10];
        assert!(matches!(
            Trajectory::from_flat_xyz(&xyz, water()),
            Err(TrajviewError::ShapeMismatch { .. })
        ));
    }
}
