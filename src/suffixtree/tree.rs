use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use log::{debug, trace};
use slab::Slab;

use crate::config::Config;
use crate::dictionary::{DictionaryOperations, TokenId, WordDictionary};

/// Stable handle of a node inside the tree's arena.
pub type NodeId = usize;

/**
 * An owned transition between two nodes in the suffix tree: a non-empty
 * token label and the node it leads to. Only the label is ever rewritten
 * in place (while splitting); the target is fixed at construction.
 */
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub label: Vec<TokenId>,
    pub target: NodeId,
}

/**
 * Represents a node in the suffix tree: at most one outgoing edge per
 * leading token, the set of values attached at this node, and an optional
 * suffix link to the node whose represented string is this node's string
 * with its first token removed.
 */
#[derive(Debug, Clone)]
pub struct TreeNode<V> {
    edges: HashMap<TokenId, Edge>,
    values: HashSet<V>,
    suffix: Option<NodeId>,
}

impl<V> TreeNode<V> {
    fn new() -> TreeNode<V> {
        TreeNode {
            edges: HashMap::new(),
            values: HashSet::new(),
            suffix: None,
        }
    }

    /// Replace or insert the transition for the given leading token.
    fn add_edge(&mut self, token: TokenId, edge: Edge) {
        self.edges.insert(token, edge);
    }

    fn get_edge(&self, token: TokenId) -> Option<&Edge> {
        self.edges.get(&token)
    }

    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.values()
    }

    pub fn values(&self) -> &HashSet<V> {
        &self.values
    }

    pub fn suffix(&self) -> Option<NodeId> {
        self.suffix
    }

    pub fn is_leaf(&self) -> bool {
        self.edges.is_empty()
    }
}

/// Counts and depths gathered by a full walk of the tree. Depth statistics
/// cover internal nodes only and are measured in tokens from the root.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TreeStats {
    pub num_nodes: usize,
    pub num_internal: usize,
    pub num_leaves: usize,
    pub max_token_depth: usize,
    pub average_token_depth: f64,
}

/**
 * A generalized suffix tree over token sequences, built online with
 * Ukkonen's algorithm. Any number of independent sequences share the one
 * structure; each insertion carries a value, and querying a substring
 * returns the union of the values of every sequence containing it.
 *
 * Nodes live in a slab arena and refer to each other by handle, so suffix
 * links are plain non-owning indices and never form ownership cycles.
 *
 * Not safe for concurrent mutation: `insert` rewrites labels, creates nodes
 * and rewires suffix links across multiple steps. Callers mixing readers
 * and a writer must synchronize around whole-sequence insertion.
 */
pub struct SuffixTree<V> {
    nodes: Slab<TreeNode<V>>,
    root: NodeId,
    min_query_len: usize,
    pub stats: TreeStats,
}

impl<V> SuffixTree<V>
where
    V: Clone + Eq + Hash,
{
    /// Create an empty tree. Queries shorter than `min_query_len` tokens
    /// short-circuit to an empty result without touching the structure.
    pub fn new(min_query_len: usize) -> SuffixTree<V> {
        let mut nodes = Slab::new();
        let root = nodes.insert(TreeNode::new());

        SuffixTree {
            nodes,
            root,
            min_query_len,
            stats: TreeStats::default(),
        }
    }

    pub fn from_config(config: &Config) -> SuffixTree<V> {
        SuffixTree::new(config.index.min_query_len)
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    fn node(&self, id: NodeId) -> &TreeNode<V> {
        &self.nodes[id]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut TreeNode<V> {
        &mut self.nodes[id]
    }

    fn new_node(&mut self) -> NodeId {
        self.nodes.insert(TreeNode::new())
    }

    /// Attach a value to a node and offer it to every node reachable over
    /// suffix links, stopping at the first one that already holds it. Those
    /// ancestors represent the proper suffixes of this node's string, so
    /// propagation keeps every suffix position consistent at insert time.
    /// The walk is a loop rather than recursion so long suffix chains
    /// cannot exhaust the call stack.
    fn add_value(&mut self, node: NodeId, value: &V) {
        let mut cursor = Some(node);
        while let Some(id) = cursor {
            if !self.node_mut(id).values.insert(value.clone()) {
                // already present here, so every node further out has it too
                break;
            }
            cursor = self.node(id).suffix;
        }
    }

    /// Deduplicated union of this node's values and the values of every
    /// node below it, collected with an explicit stack.
    fn collect_values(&self, node: NodeId) -> HashSet<V> {
        let mut values: HashSet<V> = HashSet::new();
        let mut pending: Vec<NodeId> = vec![node];

        while let Some(id) = pending.pop() {
            let node = self.node(id);
            values.extend(node.values.iter().cloned());
            pending.extend(node.edges.values().map(|edge| edge.target));
        }

        values
    }

    /// Insert a (sequence, value) pair. Inserting the same pair again is a
    /// structural no-op, and an empty sequence does not alter the tree.
    pub fn insert(&mut self, sequence: &[TokenId], value: V) {
        if sequence.is_empty() {
            trace!("Skipping insertion of an empty sequence");
            return;
        }

        debug!("Inserting sequence of {} tokens", sequence.len());

        // the most recently created leaf whose suffix link is still open;
        // local to this insertion pass
        let mut active_leaf = self.root;

        let mut s = self.root;
        let mut text: Vec<TokenId> = Vec::with_capacity(sequence.len());

        // feed the sequence one token at a time, keeping the active point
        // canonical between extensions
        for i in 0..sequence.len() {
            text.push(sequence[i]);

            let (node, updated) = self.update(s, &text, &sequence[i..], &value, &mut active_leaf);
            let (node, updated) = self.canonize(node, &updated);

            s = node;
            text = updated;
        }

        // close the suffix link of the last leaf, if necessary
        if self.node(active_leaf).suffix.is_none() && active_leaf != self.root && active_leaf != s {
            self.node_mut(active_leaf).suffix = Some(s);
        }
    }

    /// The extension loop of Ukkonen's algorithm: starting from `node`,
    /// extend the implicit suffix ending at the current position by the
    /// accumulator's trailing token, walking suffix links until the
    /// extension is already present. Returns the new active point.
    fn update(
        &mut self,
        node: NodeId,
        text: &[TokenId],
        rest: &[TokenId],
        value: &V,
        active_leaf: &mut NodeId,
    ) -> (NodeId, Vec<TokenId>) {
        let mut s = node;
        let mut text = text.to_vec();
        let new_token = *text.last().expect("update requires a non-empty accumulator");

        // tracks the last internal node produced, so consecutive splits can
        // be chained with suffix links
        let mut oldroot = self.root;

        let (mut endpoint, mut r) = self.test_and_split(s, cut_last(&text), new_token, rest, value);

        while !endpoint {
            // a node for this extension may already exist because other
            // sequences were added by previous insertions
            let leaf = match self.node(r).get_edge(new_token).map(|edge| edge.target) {
                Some(target) => target,
                None => {
                    // must build a new leaf
                    let leaf = self.new_node();
                    self.add_value(leaf, value);
                    self.node_mut(r).add_edge(
                        new_token,
                        Edge {
                            label: rest.to_vec(),
                            target: leaf,
                        },
                    );
                    leaf
                }
            };

            // chain the previous active leaf to this one
            if *active_leaf != self.root {
                self.node_mut(*active_leaf).suffix = Some(leaf);
            }
            *active_leaf = leaf;

            if oldroot != self.root {
                self.node_mut(oldroot).suffix = Some(r);
            }
            oldroot = r;

            match self.node(s).suffix {
                None => {
                    // at the structural root: drop the leading token
                    if !text.is_empty() {
                        text.remove(0);
                    }
                }
                Some(suffix) => {
                    let last = *text.last().expect("active point accumulator must not be empty");
                    let (node, mut canonical) = self.canonize(suffix, cut_last(&text));
                    canonical.push(last);

                    s = node;
                    text = canonical;
                }
            }

            let (next_endpoint, next_r) =
                self.test_and_split(s, cut_last(&text), new_token, rest, value);
            endpoint = next_endpoint;
            r = next_r;
        }

        if oldroot != self.root {
            self.node_mut(oldroot).suffix = Some(r);
        }

        (s, text)
    }

    /// Tests whether the point reached by `string_part` followed by `token`
    /// is already present in the subtree rooted at `node`; splits the edge
    /// spanning that point when it is not. Returns (endpoint, position).
    fn test_and_split(
        &mut self,
        node: NodeId,
        string_part: &[TokenId],
        token: TokenId,
        rest: &[TokenId],
        value: &V,
    ) -> (bool, NodeId) {
        // descend the tree as far as possible
        let (s, part) = self.canonize(node, string_part);

        if !part.is_empty() {
            let edge = self
                .node(s)
                .get_edge(part[0])
                .cloned()
                .expect("canonical active point must have an outgoing transition");

            // the point sits inside this edge's label
            if edge.label.len() > part.len() && edge.label[part.len()] == token {
                return (true, s);
            }

            // split the edge at the active point
            trace!("Splitting edge after {} tokens", part.len());
            let trailing = edge.label[part.len()..].to_vec();
            let middle = self.new_node();
            self.node_mut(middle).add_edge(
                trailing[0],
                Edge {
                    label: trailing,
                    target: edge.target,
                },
            );
            self.node_mut(s).add_edge(
                part[0],
                Edge {
                    label: part,
                    target: middle,
                },
            );

            return (false, middle);
        }

        let edge = match self.node(s).get_edge(token).cloned() {
            // no transition for this token yet
            None => return (false, s),
            Some(edge) => edge,
        };

        if edge.label == rest {
            // the destination already represents this exact continuation
            self.add_value(edge.target, value);
            return (true, s);
        }
        if rest.starts_with(&edge.label) {
            return (true, s);
        }
        if !edge.label.starts_with(rest) {
            // the sequences diverge after a shared prefix; nothing to split
            return (true, s);
        }

        // rest is a strict prefix of the label: split at the boundary and
        // attach the value to the new intermediate node
        let middle = self.new_node();
        self.add_value(middle, value);

        let trailing = edge.label[rest.len()..].to_vec();
        self.node_mut(middle).add_edge(
            trailing[0],
            Edge {
                label: trailing,
                target: edge.target,
            },
        );
        self.node_mut(s).add_edge(
            token,
            Edge {
                label: rest.to_vec(),
                target: middle,
            },
        );

        (false, s)
    }

    /// Descend from `node` along edges whose labels are exact prefixes of
    /// the remaining sequence, consuming them. Returns the deepest node
    /// reached and the leftover sequence; this keeps the active point
    /// representation minimal.
    fn canonize(&self, node: NodeId, sequence: &[TokenId]) -> (NodeId, Vec<TokenId>) {
        let mut current = node;
        let mut rest = sequence;

        while !rest.is_empty() {
            let edge = match self.node(current).get_edge(rest[0]) {
                Some(edge) => edge,
                None => break,
            };
            if !rest.starts_with(&edge.label) {
                break;
            }

            rest = &rest[edge.label.len()..];
            current = edge.target;
        }

        (current, rest.to_vec())
    }

    /// Returns the node whose root path matches the query, if any. Edge
    /// labels may span several query tokens, so each edge is compared
    /// against the corresponding window of the query.
    fn search_node(&self, sequence: &[TokenId]) -> Option<NodeId> {
        let mut current = self.root;
        let mut i = 0;

        while i < sequence.len() {
            let edge = self.node(current).get_edge(sequence[i])?;

            let len_to_match = usize::min(sequence.len() - i, edge.label.len());
            if sequence[i..i + len_to_match] != edge.label[..len_to_match] {
                // the label does not correspond to the query window
                return None;
            }

            if edge.label.len() >= sequence.len() - i {
                return Some(edge.target);
            }

            // advance past the consumed tokens
            current = edge.target;
            i += len_to_match;
        }

        None
    }

    /// Return every value whose inserted sequence contains the query as a
    /// contiguous sub-sequence. Queries shorter than the configured minimum
    /// length return an empty set without touching the structure.
    pub fn retrieve(&self, sequence: &[TokenId]) -> HashSet<V> {
        if sequence.len() < self.min_query_len {
            return HashSet::new();
        }

        match self.search_node(sequence) {
            Some(node) => self.collect_values(node),
            None => HashSet::new(),
        }
    }

    /// Tokenize a sentence against the dictionary (growing it as needed)
    /// and insert the resulting sequence.
    pub fn insert_text(&mut self, dictionary: &mut WordDictionary, text: &str, value: V) {
        let key = dictionary.tokenize(text);
        self.insert(&key, value);
    }

    /// Tokenize a query sentence without growing the dictionary and
    /// retrieve the matching values. A query containing a word the
    /// dictionary has never seen cannot match anything.
    pub fn retrieve_text(&self, dictionary: &WordDictionary, text: &str) -> HashSet<V> {
        match dictionary.tokenize_query(text) {
            Some(key) => self.retrieve(&key),
            None => {
                debug!("Query contains a word not present in the dictionary");
                HashSet::new()
            }
        }
    }

    /// Walk the whole tree, visiting every node exactly once. The visitor
    /// receives the parent handle, the node handle, the incoming edge (None
    /// for the root), the node itself and its token depth. Parents are
    /// always visited before their children. Iterative, so deep tries
    /// cannot exhaust the call stack.
    pub fn dfs<F>(&self, visit: &mut F)
    where
        F: FnMut(Option<NodeId>, NodeId, Option<&Edge>, &TreeNode<V>, usize),
    {
        let mut pending: Vec<(Option<NodeId>, NodeId, Option<&Edge>, usize)> =
            vec![(None, self.root, None, 0)];

        while let Some((parent, id, edge, depth)) = pending.pop() {
            let node = self.node(id);
            visit(parent, id, edge, node, depth);

            for edge in node.edges.values() {
                pending.push((Some(id), edge.target, Some(edge), depth + edge.label.len()));
            }
        }
    }

    /// Recompute the node counts and depth statistics from scratch.
    pub fn compute_stats(&mut self) {
        let mut num_nodes = 0;
        let mut num_internal = 0;
        let mut num_leaves = 0;
        let mut max_token_depth = 0;
        let mut depth_sum = 0;

        self.dfs(&mut |parent, _id, _edge, node, depth| {
            num_nodes += 1;

            // the root is neither a leaf nor an internal node
            if parent.is_none() {
                return;
            }

            if node.is_leaf() {
                num_leaves += 1;
            } else {
                num_internal += 1;
                depth_sum += depth;
                max_token_depth = usize::max(max_token_depth, depth);
            }
        });

        self.stats = TreeStats {
            num_nodes,
            num_internal,
            num_leaves,
            max_token_depth,
            average_token_depth: if num_internal > 0 {
                depth_sum as f64 / num_internal as f64
            } else {
                0.0
            },
        };
    }
}

/// The accumulator with its trailing token removed; empty stays empty.
fn cut_last(sequence: &[TokenId]) -> &[TokenId] {
    if sequence.is_empty() {
        sequence
    } else {
        &sequence[..sequence.len() - 1]
    }
}
