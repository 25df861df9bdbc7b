//! Host-side state mirror for a remote trajectory view.
//!
//! [`MolecularViewer`] owns a trajectory and a frame index and keeps two
//! derived values current: the encoded coordinates of the selected frame
//! and the topology snapshot. Every mutation recomputes what it invalidates
//! and only then notifies listeners, so a listener never sees coordinates
//! from one trajectory next to a topology from another.
//!
//! Listeners are called synchronously, in subscription order, on the
//! mutating thread.

use std::sync::Arc;

use serde::Serialize;

use crate::array::{encode_slice, EncodedArray};
use crate::error::TrajviewError;
use crate::options::{ColorOptions, Options, ViewerOptions};
use crate::topology::{project_topology_with, TopologySnapshot};
use crate::trajectory::{Topology, Trajectory, TrajectorySource};

/// Callback receiving every published update.
pub type Listener = Box<dyn FnMut(&ViewerUpdate<'_>)>;

/// Handle returned by [`MolecularViewer::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// One published state change.
///
/// Carries whole replacement values. `topology` is present when the
/// trajectory changed and when a new listener receives its initial replay.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ViewerUpdate<'a> {
    /// Current frame index.
    pub frame: usize,
    /// Encoded coordinates of `frame`, shape `[n_atoms, 3]`, `float32`.
    pub coordinates: &'a EncodedArray,
    /// Bonds and atom colors, when they changed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topology: Option<&'a TopologySnapshot>,
}

/// Trajectory + frame state mirrored to subscribed observers.
pub struct MolecularViewer<S: TrajectorySource = Trajectory> {
    trajectory: S,
    frame: usize,
    coordinates: EncodedArray,
    topology: Arc<TopologySnapshot>,
    /// Topology object `topology` was projected from; identity is the
    /// memoization key.
    topology_source: Arc<Topology>,
    viewer_options: ViewerOptions,
    color_options: ColorOptions,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_id: u64,
}

// ── Construction ─────────────────────────────────────────────────────────

impl<S: TrajectorySource> MolecularViewer<S> {
    /// Viewer over `trajectory` with default options, showing frame 0.
    pub fn new(trajectory: S) -> Result<Self, TrajviewError> {
        Self::with_options(trajectory, &Options::default())
    }

    /// Viewer over `trajectory` showing `options.viewer.initial_frame`.
    ///
    /// Empty trajectories are rejected.
    pub fn with_options(
        trajectory: S,
        options: &Options,
    ) -> Result<Self, TrajviewError> {
        if trajectory.n_frames() == 0 {
            return Err(TrajviewError::EmptyTrajectory);
        }
        let frame = options.viewer.initial_frame;
        let topology_source = Arc::clone(trajectory.topology());
        let topology = Arc::new(project_topology_with(
            &topology_source,
            &options.colors,
        )?);
        let coordinates = encode_frame(&trajectory, frame)?;

        log::debug!(
            "viewer created: {} frames, {} atoms, frame {frame}",
            trajectory.n_frames(),
            topology.n_atoms()
        );

        Ok(Self {
            trajectory,
            frame,
            coordinates,
            topology,
            topology_source,
            viewer_options: options.viewer.clone(),
            color_options: options.colors.clone(),
            listeners: Vec::new(),
            next_id: 0,
        })
    }
}

// ── Mutation ─────────────────────────────────────────────────────────────

impl<S: TrajectorySource> MolecularViewer<S> {
    /// Select frame `index` and publish its coordinates.
    ///
    /// Out-of-range indices fail without touching state. Selecting the
    /// current frame again is a no-op.
    pub fn set_frame(&mut self, index: usize) -> Result<(), TrajviewError> {
        if index == self.frame {
            return Ok(());
        }
        let coordinates = encode_frame(&self.trajectory, index)?;
        self.frame = index;
        self.coordinates = coordinates;
        log::debug!("frame -> {index}");
        self.publish(false);
        Ok(())
    }

    /// Replace the trajectory, reset to frame 0 and publish topology and
    /// coordinates together. Returns the previous trajectory.
    ///
    /// Empty trajectories and unknown elements fail without touching state.
    pub fn set_trajectory(
        &mut self,
        trajectory: S,
    ) -> Result<S, TrajviewError> {
        if trajectory.n_frames() == 0 {
            return Err(TrajviewError::EmptyTrajectory);
        }

        let source = trajectory.topology();
        let topology = if self.viewer_options.memoize_topology
            && Arc::ptr_eq(source, &self.topology_source)
        {
            Arc::clone(&self.topology)
        } else {
            Arc::new(project_topology_with(source, &self.color_options)?)
        };
        let topology_source = Arc::clone(source);
        let coordinates = encode_frame(&trajectory, 0)?;

        log::info!(
            "trajectory replaced: {} frames, {} atoms",
            trajectory.n_frames(),
            topology.n_atoms()
        );

        let previous = std::mem::replace(&mut self.trajectory, trajectory);
        self.frame = 0;
        self.coordinates = coordinates;
        self.topology = topology;
        self.topology_source = topology_source;
        self.publish(true);
        Ok(previous)
    }
}

// ── Observers ────────────────────────────────────────────────────────────

impl<S: TrajectorySource> MolecularViewer<S> {
    /// Register a listener. It immediately receives the full current state
    /// (frame, coordinates and topology), then every later update.
    pub fn subscribe(
        &mut self,
        listener: impl FnMut(&ViewerUpdate<'_>) + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;

        let mut listener: Listener = Box::new(listener);
        listener(&self.state());
        self.listeners.push((id, listener));
        id
    }

    /// Remove a listener. Returns `false` if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }

    /// Number of registered listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    fn publish(&mut self, include_topology: bool) {
        let update = ViewerUpdate {
            frame: self.frame,
            coordinates: &self.coordinates,
            topology: include_topology.then_some(&*self.topology),
        };
        for (_, listener) in &mut self.listeners {
            listener(&update);
        }
    }
}

// ── Accessors ────────────────────────────────────────────────────────────

impl<S: TrajectorySource> MolecularViewer<S> {
    /// Current frame index.
    #[must_use]
    pub fn frame(&self) -> usize {
        self.frame
    }

    /// Number of frames in the current trajectory.
    #[must_use]
    pub fn n_frames(&self) -> usize {
        self.trajectory.n_frames()
    }

    /// Encoded coordinates of the current frame.
    #[must_use]
    pub fn coordinates(&self) -> &EncodedArray {
        &self.coordinates
    }

    /// Topology snapshot of the current trajectory.
    #[must_use]
    pub fn topology(&self) -> &TopologySnapshot {
        &self.topology
    }

    /// The current trajectory.
    #[must_use]
    pub fn trajectory(&self) -> &S {
        &self.trajectory
    }

    /// Full state as a single update, topology included.
    #[must_use]
    pub fn state(&self) -> ViewerUpdate<'_> {
        ViewerUpdate {
            frame: self.frame,
            coordinates: &self.coordinates,
            topology: Some(&self.topology),
        }
    }
}

// ── Internals ────────────────────────────────────────────────────────────

/// Encode frame `index` of `source` as a `[n_atoms, 3]` float32 array.
fn encode_frame<S: TrajectorySource>(
    source: &S,
    index: usize,
) -> Result<EncodedArray, TrajviewError> {
    let frame =
        source
            .frame(index)
            .ok_or_else(|| TrajviewError::FrameOutOfRange {
                index,
                n_frames: source.n_frames(),
            })?;
    let n_atoms = source.topology().n_atoms();
    if frame.len() != n_atoms {
        return Err(TrajviewError::InvalidTopology(format!(
            "frame {index} has {} positions, topology has {n_atoms} atoms",
            frame.len()
        )));
    }
    let flat: &[f32] = bytemuck::cast_slice(frame);
    encode_slice(flat, &[frame.len(), 3])
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec3;

    use super::*;
    use crate::array::decode;
    use crate::trajectory::Atom;

    type Log = Rc<RefCell<Vec<(usize, EncodedArray, Option<TopologySnapshot>)>>>;

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

    /// Frame `f` places atom `a` at `(offset + f, a, -a)`.
    fn trajectory(n_frames: usize, offset: f32, top: Arc<Topology>) -> Trajectory {
        let n_atoms = top.n_atoms();
        let frames = (0..n_frames)
            .map(|f| {
                (0..n_atoms)
                    .map(|a| Vec3::new(offset + f as f32, a as f32, -(a as f32)))
                    .collect()
            })
            .collect();
        Trajectory::new(frames, top).unwrap()
    }

    fn record(viewer: &mut MolecularViewer) -> Log {
        let log: Log = Rc::default();
        let sink = Rc::clone(&log);
        let _ = viewer.subscribe(move |u| {
            sink.borrow_mut().push((
                u.frame,
                u.coordinates.clone(),
                u.topology.cloned(),
            ));
        });
        log
    }

    fn frame_bits(traj: &Trajectory, index: usize) -> Vec<u32> {
        traj.frame(index)
            .unwrap()
            .iter()
            .flat_map(|p| p.to_array())
            .map(f32::to_bits)
            .collect()
    }

    fn decoded_bits(encoded: &EncodedArray) -> Vec<u32> {
        decode::<f32>(encoded)
            .unwrap()
            .data()
            .iter()
            .map(|v| v.to_bits())
            .collect()
    }

    #[test]
    fn construction_encodes_initial_frame() {
        let viewer = MolecularViewer::new(trajectory(4, 0.0, water())).unwrap();
        assert_eq!(viewer.frame(), 0);
        assert_eq!(viewer.coordinates().shape, vec![3, 3]);
        assert_eq!(viewer.coordinates().dtype, "float32");
        assert_eq!(viewer.topology().bonds, vec![(0, 1), (1, 2)]);
        assert_eq!(
            viewer.topology().atom_colors,
            vec![0xFF_FFFF, 0xFF_0D0D, 0xFF_FFFF]
        );
    }

    #[test]
    fn every_frame_round_trips() {
        let traj = trajectory(6, 0.25, water());
        let mut viewer = MolecularViewer::new(traj.clone()).unwrap();
        for i in (0..traj.n_frames()).rev() {
            viewer.set_frame(i).unwrap();
            assert_eq!(decoded_bits(viewer.coordinates()), frame_bits(&traj, i));
        }
    }

    #[test]
    fn subscribe_replays_full_state() {
        let mut viewer = MolecularViewer::new(trajectory(2, 0.0, water())).unwrap();
        let log = record(&mut viewer);
        let log = log.borrow();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].0, 0);
        assert_eq!(log[0].2.as_ref().unwrap().atom_colors.len(), 3);
    }

    #[test]
    fn set_frame_publishes_coordinates_only() {
        let traj = trajectory(3, 0.0, water());
        let mut viewer = MolecularViewer::new(traj.clone()).unwrap();
        let log = record(&mut viewer);

        viewer.set_frame(2).unwrap();
        let log = log.borrow();
        assert_eq!(log.len(), 2);
        let (frame, coords, topology) = &log[1];
        assert_eq!(*frame, 2);
        assert_eq!(decoded_bits(coords), frame_bits(&traj, 2));
        assert!(topology.is_none());
    }

    #[test]
    fn set_frame_out_of_range_leaves_state() {
        let mut viewer = MolecularViewer::new(trajectory(3, 0.0, water())).unwrap();
        viewer.set_frame(1).unwrap();
        let before = viewer.coordinates().clone();
        let log = record(&mut viewer);

        let err = viewer.set_frame(3).unwrap_err();
        assert!(matches!(
            err,
            TrajviewError::FrameOutOfRange {
                index: 3,
                n_frames: 3
            }
        ));
        assert_eq!(viewer.frame(), 1);
        assert_eq!(viewer.coordinates(), &before);
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn same_frame_is_not_republished() {
        let mut viewer = MolecularViewer::new(trajectory(3, 0.0, water())).unwrap();
        let log = record(&mut viewer);
        viewer.set_frame(0).unwrap();
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn set_trajectory_resets_to_frame_zero() {
        let mut viewer = MolecularViewer::new(trajectory(8, 0.0, water())).unwrap();
        viewer.set_frame(5).unwrap();
        let log = record(&mut viewer);

        let new_traj = trajectory(8, 100.0, water());
        let old = viewer.set_trajectory(new_traj.clone()).unwrap();
        assert_eq!(old.n_frames(), 8);
        assert_eq!(viewer.frame(), 0);
        assert_eq!(decoded_bits(viewer.coordinates()), frame_bits(&new_traj, 0));
        assert_ne!(decoded_bits(viewer.coordinates()), frame_bits(&new_traj, 5));

        // One update carrying both values.
        let log = log.borrow();
        assert_eq!(log.len(), 2);
        let (frame, coords, topology) = &log[1];
        assert_eq!(*frame, 0);
        assert_eq!(decoded_bits(coords), frame_bits(&new_traj, 0));
        assert_eq!(topology.as_ref().unwrap().bonds, vec![(0, 1), (1, 2)]);
    }

    #[test]
    fn set_trajectory_reprojects_new_topology() {
        let mut viewer = MolecularViewer::new(trajectory(2, 0.0, water())).unwrap();
        let methane = Arc::new(
            Topology::new(
                vec![
                    Atom::new(0, "C", "C"),
                    Atom::new(1, "H1", "H"),
                    Atom::new(2, "H2", "H"),
                    Atom::new(3, "H3", "H"),
                    Atom::new(4, "H4", "H"),
                ],
                vec![(0, 1), (0, 2), (0, 3), (0, 4)],
            )
            .unwrap(),
        );
        let _ = viewer.set_trajectory(trajectory(1, 0.0, methane)).unwrap();
        assert_eq!(viewer.topology().atom_colors.len(), 5);
        assert_eq!(viewer.topology().atom_colors[0], 0x90_9090);
        assert_eq!(viewer.coordinates().shape, vec![5, 3]);
    }

    #[test]
    fn shared_topology_is_memoized() {
        let top = water();
        let mut viewer =
            MolecularViewer::new(trajectory(2, 0.0, Arc::clone(&top))).unwrap();
        let before: *const TopologySnapshot = viewer.topology();
        let _ = viewer.set_trajectory(trajectory(3, 1.0, top)).unwrap();
        assert!(std::ptr::eq(before, viewer.topology()));
    }

    #[test]
    fn empty_trajectory_rejected() {
        assert!(matches!(
            MolecularViewer::new(trajectory(0, 0.0, water())),
            Err(TrajviewError::EmptyTrajectory)
        ));

        let traj = trajectory(2, 0.0, water());
        let mut viewer = MolecularViewer::new(traj.clone()).unwrap();
        viewer.set_frame(1).unwrap();
        let err = viewer.set_trajectory(trajectory(0, 0.0, water())).unwrap_err();
        assert!(matches!(err, TrajviewError::EmptyTrajectory));
        assert_eq!(viewer.frame(), 1);
        assert_eq!(decoded_bits(viewer.coordinates()), frame_bits(&traj, 1));
    }

    #[test]
    fn unknown_element_in_new_trajectory_leaves_state() {
        let mut viewer = MolecularViewer::new(trajectory(2, 0.0, water())).unwrap();
        let bad = Arc::new(
            Topology::new(vec![Atom::new(0, "X", "Xx")], Vec::new()).unwrap(),
        );
        let err = viewer.set_trajectory(trajectory(1, 0.0, bad)).unwrap_err();
        assert!(matches!(err, TrajviewError::UnknownElement(_)));
        assert_eq!(viewer.topology().atom_colors.len(), 3);
    }

    #[test]
    fn initial_frame_option_is_validated() {
        let mut options = Options::default();
        options.viewer.initial_frame = 2;
        let viewer =
            MolecularViewer::with_options(trajectory(3, 0.0, water()), &options)
                .unwrap();
        assert_eq!(viewer.frame(), 2);

        options.viewer.initial_frame = 3;
        assert!(matches!(
            MolecularViewer::with_options(trajectory(3, 0.0, water()), &options),
            Err(TrajviewError::FrameOutOfRange { .. })
        ));
    }

    #[test]
    fn unsubscribe_stops_delivery_and_order_is_kept() {
        let mut viewer = MolecularViewer::new(trajectory(3, 0.0, water())).unwrap();
        let order: Rc<RefCell<Vec<&str>>> = Rc::default();
        let a = Rc::clone(&order);
        let b = Rc::clone(&order);
        let first = viewer.subscribe(move |_| a.borrow_mut().push("first"));
        let _ = viewer.subscribe(move |_| b.borrow_mut().push("second"));
        order.borrow_mut().clear();

        viewer.set_frame(1).unwrap();
        assert_eq!(*order.borrow(), vec!["first", "second"]);

        assert!(viewer.unsubscribe(first));
        assert!(!viewer.unsubscribe(first));
        assert_eq!(viewer.listener_count(), 1);
        order.borrow_mut().clear();
        viewer.set_frame(2).unwrap();
        assert_eq!(*order.borrow(), vec!["second"]);
    }

    #[test]
    fn shared_trajectory_handle_works() {
        let traj = Arc::new(trajectory(2, 0.0, water()));
        let mut viewer = MolecularViewer::new(Arc::clone(&traj)).unwrap();
        viewer.set_frame(1).unwrap();
        assert_eq!(viewer.n_frames(), 2);
        assert!(Arc::ptr_eq(viewer.trajectory(), &traj));
    }
}
