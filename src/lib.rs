//! Builds trees from Sinica-style `TAG(child|child)` bracket strings,
//! harvests grammar/lexical rule counts while doing so, and measures the
//! relative-clause subtrees of the result.

pub mod output;
pub mod parser;
pub mod pcfg;
pub mod preprocess;
pub mod rc;
pub mod rules;
pub mod scanner;
pub mod structs;


pub use parser::{build_tree, build_tree_with, build_trees, BuildOptions, LeafColonPolicy};
pub use pcfg::Pcfg;
pub use preprocess::strip_semantic_roles;
pub use rc::RcAnalyzer;
pub use structs::{Node, NodeId, ParseError, RcAnalysis, RcRecord, Tree};
