use crate::interpreter::Move;
use crate::state::GameState;

pub const NO_PARENT: usize = usize::MAX;

/// One search-tree node. Nodes live in a flat arena and address each
/// other by index; each owns the full game state it represents, cloned
/// from a pooled state at expansion time.
#[derive(Debug)]
pub struct Node {
    pub parent: usize,
    /// the move that led here; None only at the root
    pub lead: Option<Move>,
    /// seat that played `lead`
    pub player: usize,
    pub children: Vec<usize>,
    pub untried: Vec<Move>,
    pub state: GameState,
    pub visits: u64,
    pub wins: f64,
    pub terminal: bool,
}

/// Arena for one search. Never shared across searches; reset between
/// them keeps allocations warm.
pub struct NodePool {
    nodes: Vec<Node>,
}

impl NodePool {
    pub fn with_capacity(n: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(n),
        }
    }

    pub fn alloc(&mut self, node: Node) -> usize {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    pub fn get(&self, index: usize) -> &Node {
        &self.nodes[index]
    }

    pub fn get_mut(&mut self, index: usize) -> &mut Node {
        &mut self.nodes[index]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// tear down, handing every owned state back to the caller
    pub fn drain(&mut self) -> impl Iterator<Item = GameState> + '_ {
        self.nodes.drain(..).map(|node| node.state)
    }
}
