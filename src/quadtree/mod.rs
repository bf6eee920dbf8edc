mod config;
mod sph_tree;

pub use config::QuadTreeConfig;
pub use sph_tree::LeafData;
pub use sph_tree::NodeData;
pub use sph_tree::SphTree;

use crate::prelude::Extent;
use crate::prelude::MVec;
use crate::prelude::TWO_TO_NUM_DIMENSIONS;

pub trait LeafDataType: Clone {
    fn pos(&self) -> &MVec;
}

pub trait NodeDataType<L>: Default {
    fn update_with(&mut self, _leaf: &L) {}
}

impl<L> NodeDataType<L> for () {}

type Tree<N, L> = Box<[QuadTree<N, L>; TWO_TO_NUM_DIMENSIONS]>;
type Leaf<L> = Vec<L>;

#[derive(Debug)]
pub enum Node<N, L> {
    Tree(Tree<N, L>),
    Leaf(Leaf<L>),
}

impl<N, L> Node<N, L> {
    fn make_node(&mut self, children: Tree<N, L>) -> Leaf<L> {
        let value = std::mem::replace(self, Node::Tree(children));
        if let Self::Leaf(leaf) = value {
            leaf
        } else {
            panic!("make_node called on Node value")
        }
    }
}

/// A hierarchical spatial decomposition over `2^D` subdivisions per
/// level. The name stuck even though a 3D build subdivides into
/// octants and a 1D build bisects.
#[derive(Debug)]
pub struct QuadTree<N, L> {
    pub node: Node<N, L>,
    pub data: N,
    pub extent: Extent,
}

impl<N: NodeDataType<L>, L: LeafDataType> QuadTree<N, L> {
    pub fn new(config: &QuadTreeConfig, particles: Vec<L>, extent: &Extent) -> Self {
        let mut tree = Self::make_empty_leaf_from_extent(extent.clone());
        tree.subdivide_to_depth(config, config.min_depth);
        for particle in particles.into_iter() {
            tree.insert_new(config, particle, 0);
        }
        tree
    }

    fn subdivide_to_depth(&mut self, config: &QuadTreeConfig, depth: usize) {
        if depth > 0 {
            self.subdivide(config, depth);
            if let Node::Tree(ref mut children) = self.node {
                for child in children.iter_mut() {
                    child.subdivide_to_depth(config, depth - 1);
                }
            } else {
                unreachable!()
            }
        }
    }

    fn insert_new(&mut self, config: &QuadTreeConfig, leaf_data: L, depth: usize) {
        self.data.update_with(&leaf_data);
        self.insert(config, leaf_data, depth)
    }

    fn insert(&mut self, config: &QuadTreeConfig, leaf_data: L, depth: usize) {
        if let Node::Leaf(ref mut leaf) = self.node {
            if depth < config.max_depth && leaf.len() > config.max_num_particles_per_leaf {
                self.subdivide(config, depth);
            } else {
                leaf.push(leaf_data);
                return;
            }
        }
        if let Node::Tree(ref mut children) = self.node {
            let subdivision = &mut children[self.extent.get_subdivision_index(leaf_data.pos())];
            subdivision.insert_new(config, leaf_data, depth + 1);
        }
    }

    fn subdivide(&mut self, config: &QuadTreeConfig, depth: usize) {
        debug_assert!(matches!(self.node, Node::Leaf(_)));
        let subdivisions = self.extent.get_subdivisions();
        let children = Box::new(subdivisions.map(Self::make_empty_leaf_from_extent));
        let particles = self.node.make_node(children);
        for particle in particles.into_iter() {
            self.insert(config, particle, depth);
        }
    }

    pub fn make_empty_leaf_from_extent(extent: Extent) -> Self {
        Self {
            node: Node::Leaf(vec![]),
            data: N::default(),
            extent,
        }
    }
}

impl<N, L> QuadTree<N, L> {
    pub fn depth_first_map_leaf<'a>(
        &'a self,
        closure: &mut impl FnMut(&'a Extent, &'a [L]),
    ) {
        match self.node {
            Node::Tree(ref node) => {
                for child in node.iter() {
                    child.depth_first_map_leaf(closure);
                }
            }
            Node::Leaf(ref leaf) => {
                closure(&self.extent, leaf);
            }
        }
    }
}
