use crate::node::{FlatText, Node, NodeId};
use crate::visitor::{walk_flat_mut, walk_node_mut, VisitorMut};
use crc32fast::Hasher;

/// Generate a document seed from its name using CRC32
pub fn get_document_id(name: &str) -> String {
    let mut hasher = Hasher::new();
    hasher.update(name.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Sequential identity generator for nodes within a document
#[derive(Debug, Clone)]
pub struct IdGenerator {
    seed: String, // Document seed (CRC32)
    count: u64,   // Sequential counter
}

impl IdGenerator {
    pub fn new(name: &str) -> Self {
        Self {
            seed: get_document_id(name),
            count: 0,
        }
    }

    pub fn from_seed(seed: String) -> Self {
        Self { seed, count: 0 }
    }

    /// Generate next sequential identity
    pub fn new_id(&mut self) -> NodeId {
        self.count += 1;
        NodeId::new(format!("{}-{}", self.seed, self.count))
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }

    /// Number of identities handed out so far
    pub fn issued(&self) -> u64 {
        self.count
    }

    /// Give every node of the subtree a fresh identity, root included.
    pub fn assign_fresh_ids(&mut self, node: &mut Node) {
        FreshIds { ids: self }.visit_node_mut(node);
    }
}

struct FreshIds<'a> {
    ids: &'a mut IdGenerator,
}

impl VisitorMut for FreshIds<'_> {
    fn visit_node_mut(&mut self, node: &mut Node) {
        node.set_id(self.ids.new_id());
        walk_node_mut(self, node);
    }

    fn visit_flat_mut(&mut self, flat: &mut FlatText) {
        for paragraph in &mut flat.paragraphs {
            for link in &mut paragraph.chain {
                link.id = self.ids.new_id();
            }
        }
        walk_flat_mut(self, flat);
    }
}
