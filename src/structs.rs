use clap::Parser;
use std::collections::BTreeMap;
use std::path::PathBuf;
use thiserror::Error;

// --- Data Structures ---

/// Index of a node inside its owning [`Tree`].
pub type NodeId = usize;

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub tag: String,
    /// Set for leaves only.
    pub word: Option<String>,
    pub children: Vec<NodeId>,
    /// Number of open phrasal ancestors when the node was created.
    pub depth: usize,
}

impl Node {
    pub fn leaf(tag: &str, word: &str, depth: usize) -> Self {
        Node {
            tag: tag.to_string(),
            word: Some(word.to_string()),
            children: Vec::new(),
            depth,
        }
    }

    pub fn phrasal(tag: &str, depth: usize) -> Self {
        Node {
            tag: tag.to_string(),
            word: None,
            children: Vec::new(),
            depth,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.word.is_some()
    }
}

/// Statistics of one relative-clause subtree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RcRecord {
    /// Deepest leaf depth below the head, relative to the head.
    pub rc_depth: usize,
    pub num_leaf_nodes: usize,
    pub num_nt_nodes: usize,
    pub num_char: usize,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct RcAnalysis {
    pub rc_depths: Vec<usize>,
    /// Keyed by 1-based sequence number in node-creation order.
    pub rcs: BTreeMap<usize, RcRecord>,
    pub num_rc: usize,
}

/// A parsed sentence. Nodes live in `nodes`; `root` and every `children`
/// list index into it, so the tree owns the whole node graph.
#[derive(Debug, Clone, PartialEq)]
pub struct Tree {
    pub nodes: Vec<Node>,
    pub root: NodeId,
    pub max_depth: usize,
    pub leaf_nodes: Vec<NodeId>,
    pub non_term_nodes: Vec<NodeId>,
    /// Leaves whose span held more than one colon and was truncated.
    pub ambiguous_leaves: Vec<NodeId>,
    pub rc: RcAnalysis,
}

impl Tree {
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    pub fn root_node(&self) -> &Node {
        &self.nodes[self.root]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn children(&self, id: NodeId) -> impl Iterator<Item = &Node> + '_ {
        self.nodes[id].children.iter().map(move |&c| &self.nodes[c])
    }

    /// Deepest phrasal node, counting the root as 0.
    pub fn phrasal_depth(&self) -> usize {
        self.non_term_nodes
            .iter()
            .map(|&id| self.nodes[id].depth)
            .max()
            .unwrap_or(0)
    }

    /// Words of the sentence in surface order.
    pub fn words(&self) -> Vec<&str> {
        self.leaf_nodes
            .iter()
            .filter_map(|&id| self.nodes[id].word.as_deref())
            .collect()
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("malformed tree: no tag/word colon anywhere in the sentence")]
    MalformedTree,

    #[error("leaf '{span}' has no colon between tag and word")]
    LeafWithoutColon { span: String },

    #[error("leaf '{span}' contains more than one colon")]
    AmbiguousLeaf { span: String },

    #[error("empty tag at byte offset {offset}")]
    EmptyTag { offset: usize },

    #[error("leaf '{span}' has an empty word")]
    EmptyWord { span: String },

    #[error("')' at byte offset {offset} closes no open node")]
    UnbalancedClose { offset: usize },

    #[error("node at byte offset {offset} lies outside the root node")]
    DetachedNode { offset: usize },

    #[error("{open} node(s) still open at end of input")]
    UnclosedNodes { open: usize },
}

// --- Command Line ---

#[derive(Parser, Debug)]
#[command(name = "sinica-rc", about = "Treebank tree building, PCFG harvesting and relative-clause measurement", version)]
pub struct Cli {
    /// Log debug diagnostics
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Process a treebank file, one tree per line
    Process(ProcessArgs),
    /// Run the built-in sample sentence
    Demo,
}

#[derive(Parser, Debug)]
pub struct ProcessArgs {
    pub tree_file: PathBuf,

    /// Write <prefix>.rules/.lexicon/.words/.weights instead of printing rules
    #[arg(short, long)]
    pub output_prefix: Option<String>,

    /// Reject leaves with more than one colon instead of truncating them
    #[arg(long)]
    pub strict_colons: bool,

    /// Input has no semantic-role prefixes; skip stripping
    #[arg(long)]
    pub keep_roles: bool,

    /// Suppress per-sentence tree and RC output
    #[arg(short, long)]
    pub quiet: bool,
}
