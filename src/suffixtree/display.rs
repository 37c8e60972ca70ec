use std::collections::HashMap;
use std::fmt::{Debug, Display};
use std::hash::Hash;

use petgraph::{dot::Dot, graph::NodeIndex, Graph};

use super::tree::{NodeId, SuffixTree, TreeStats};

impl Display for TreeStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "
            Internal nodes: {}
            Leaves: {}
            Nodes: {}
            Average token depth: {}
            Max token depth: {}
            ",
            self.num_internal,
            self.num_leaves,
            self.num_nodes,
            self.average_token_depth,
            self.max_token_depth,
        )
    }
}

impl<V> SuffixTree<V>
where
    V: Clone + Eq + Hash + Debug,
{
    /// Build a petgraph view of the tree for Graphviz rendering. Node
    /// weights are the payload sets attached at each node, edge weights the
    /// token labels of the transitions.
    pub fn to_graph(&self) -> Graph<String, String> {
        let mut graph = Graph::<String, String>::new();
        let mut indices: HashMap<NodeId, NodeIndex> = HashMap::new();

        // dfs visits parents before children, so the parent index is
        // always known by the time an edge is drawn
        self.dfs(&mut |parent, id, edge, node, _depth| {
            let node_idx = graph.add_node(format!("{:?}", node.values()));
            indices.insert(id, node_idx);

            if let (Some(parent), Some(edge)) = (parent, edge) {
                let label = edge
                    .label
                    .iter()
                    .map(|token| token.to_string())
                    .collect::<Vec<String>>()
                    .join(" ");
                graph.add_edge(indices[&parent], node_idx, label);
            }
        });

        graph
    }
}

impl<V> Display for SuffixTree<V>
where
    V: Clone + Eq + Hash + Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Graphviz:\n{}", Dot::new(&self.to_graph()))?;
        writeln!(f, "Stats: {}", self.stats)
    }
}
