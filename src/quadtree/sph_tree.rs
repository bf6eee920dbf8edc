use super::LeafDataType;
use super::Node;
use super::NodeDataType;
use super::QuadTree;
use super::QuadTreeConfig;
use crate::gravity::MassMoments;
use crate::prelude::Extent;
use crate::prelude::Float;
use crate::prelude::Kernel;
use crate::prelude::MVec;
use crate::prelude::Particle;
use crate::prelude::SimulationBox;

/// The per-particle payload of the tree. `smoothing_length` is the
/// interaction support radius, so overlap tests against a query
/// sphere stay conservative in the anisotropic kernel mode.
#[derive(Clone, Debug)]
pub struct LeafData {
    pub index: usize,
    pub id: usize,
    pub pos: MVec,
    pub smoothing_length: Float,
    pub mass: Float,
}

#[derive(Debug, Default)]
pub struct NodeData {
    pub moments: MassMoments,
    pub largest_smoothing_length: Float,
}

impl LeafDataType for LeafData {
    fn pos(&self) -> &MVec {
        &self.pos
    }
}

impl NodeDataType<LeafData> for NodeData {
    fn update_with(&mut self, leaf: &LeafData) {
        self.moments.add_mass_at(&leaf.pos, leaf.mass);
        self.largest_smoothing_length = self.largest_smoothing_length.max(leaf.smoothing_length);
    }
}

/// The tree serving both the ball neighbour search and the gravity
/// walk. Rebuilt every step from the current positions; point masses
/// are not inserted.
pub type SphTree = QuadTree<NodeData, LeafData>;

fn relative_bounding_box_overlap(dist: MVec, total_size: MVec) -> bool {
    let dist = dist.abs();
    let half_total = total_size * 0.5;
    (0..crate::prelude::NUM_DIMENSIONS).all(|axis| dist[axis] <= half_total[axis])
}

/// Returns whether the two bounding boxes given by the center
/// coordinates pos1 and pos2 and the side lengths size1 and size2
/// overlap, honouring the periodic axes of the box.
pub(crate) fn bounding_boxes_overlap_periodic(
    box_: &SimulationBox,
    pos1: &MVec,
    size1: &MVec,
    pos2: &MVec,
    size2: &MVec,
) -> bool {
    let dist = box_.periodic_distance_vec(pos1, pos2);
    let total_size = *size1 + *size2;
    relative_bounding_box_overlap(dist, total_size)
}

pub(crate) fn particles_should_interact(
    box_: &SimulationBox,
    pos1: &MVec,
    pos2: &MVec,
    radius1: Float,
    radius2: Float,
) -> bool {
    box_.periodic_distance(pos1, pos2) < radius1.max(radius2)
}

fn add_particles_in_box<'a>(
    particles: &mut Vec<&'a LeafData>,
    tree: &'a SphTree,
    box_: &SimulationBox,
    pos: &MVec,
    radius: Float,
) {
    // Each node is extended by the largest smoothing length below it,
    // so particles whose own support reaches the query sphere are
    // never pruned.
    let node_size =
        tree.extent.side_lengths() + MVec::ONE * (2.0 * tree.data.largest_smoothing_length);
    if bounding_boxes_overlap_periodic(
        box_,
        &tree.extent.center(),
        &node_size,
        pos,
        &(MVec::ONE * (2.0 * radius)),
    ) {
        match &tree.node {
            Node::Tree(children) => {
                for child in children.iter() {
                    add_particles_in_box(particles, child, box_, pos, radius);
                }
            }
            Node::Leaf(leaf) => {
                particles.extend(leaf.iter());
            }
        }
    }
}

impl SphTree {
    pub fn construct(
        config: &QuadTreeConfig,
        particles: &[Particle],
        kernel: &Kernel,
        box_: &SimulationBox,
    ) -> Self {
        let leaves: Vec<_> = particles
            .iter()
            .enumerate()
            .filter(|(_, particle)| !particle.is_point_mass)
            .map(|(index, particle)| LeafData {
                index,
                id: particle.id,
                pos: particle.pos,
                smoothing_length: kernel.support_radius(particle.sml),
                mass: particle.mass,
            })
            .collect();
        let extent = Extent::from_positions(leaves.iter().map(|leaf| &leaf.pos))
            .unwrap_or_else(|| box_.extent())
            .pad();
        Self::new(config, leaves, &extent)
    }

    /// All particles j with |r_ij| < max(radius, h_j), honouring
    /// periodic wrap. An upper bound: callers re-filter per pair.
    pub fn get_particles_in_radius<'a>(
        &'a self,
        box_: &SimulationBox,
        pos: &MVec,
        radius: Float,
    ) -> Vec<&'a LeafData> {
        let mut particles = vec![];
        add_particles_in_box(&mut particles, self, box_, pos, radius);
        particles
            .into_iter()
            .filter(|particle| {
                particles_should_interact(box_, pos, &particle.pos, radius, particle.smoothing_length)
            })
            .collect()
    }
}
