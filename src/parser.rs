use tracing::{debug, warn};

use crate::pcfg::{Pcfg, RuleObservations};
use crate::scanner::{scan_delimiters, DelimKind, Delimiter};
use crate::structs::{Node, NodeId, ParseError, RcAnalysis, Tree};

// --- Tree Building ---

/// What to do with a leaf span such as `FW:http://x` that holds more than
/// one colon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LeafColonPolicy {
    /// Tag before the first colon, word up to the second, rest dropped.
    #[default]
    Truncate,
    Reject,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BuildOptions {
    pub leaf_colons: LeafColonPolicy,
}

/// Builds the tree for one role-stripped sentence and adds its rules to
/// `pcfg`. Nothing is added when the sentence fails.
pub fn build_tree(input: &str, pcfg: &mut Pcfg) -> Result<Tree, ParseError> {
    build_tree_with(input, &BuildOptions::default(), pcfg)
}

pub fn build_tree_with(
    input: &str,
    options: &BuildOptions,
    pcfg: &mut Pcfg,
) -> Result<Tree, ParseError> {
    let (tree, observations) = build_tree_observed(input, options)?;
    pcfg.commit(observations);
    Ok(tree)
}

/// Builds the tree and returns the rule observations instead of recording them.
pub fn build_tree_observed(
    input: &str,
    options: &BuildOptions,
) -> Result<(Tree, RuleObservations), ParseError> {
    let delimiters = scan_delimiters(input)?;
    let mut builder = TreeBuilder::new(input, options);
    builder.run(&delimiters)?;
    let result = builder.finish()?;
    debug!(
        nodes = result.0.len(),
        leaves = result.0.leaf_nodes.len(),
        max_depth = result.0.max_depth,
        "built tree"
    );
    Ok(result)
}

/// Builds every sentence against one shared accumulator. A failing sentence
/// is reported in its slot and does not affect the others.
pub fn build_trees<'a, I>(
    sentences: I,
    options: &BuildOptions,
    pcfg: &mut Pcfg,
) -> Vec<Result<Tree, ParseError>>
where
    I: IntoIterator<Item = &'a str>,
{
    sentences
        .into_iter()
        .enumerate()
        .map(|(idx, sentence)| {
            build_tree_with(sentence, options, pcfg).map_err(|e| {
                warn!(sentence = idx + 1, error = %e, "skipping sentence");
                e
            })
        })
        .collect()
}

struct TreeBuilder<'a> {
    input: &'a str,
    options: &'a BuildOptions,
    nodes: Vec<Node>,
    /// Open phrasal nodes, innermost last.
    stack: Vec<NodeId>,
    max_depth: usize,
    leaf_nodes: Vec<NodeId>,
    non_term_nodes: Vec<NodeId>,
    ambiguous_leaves: Vec<NodeId>,
    observations: RuleObservations,
}

impl<'a> TreeBuilder<'a> {
    fn new(input: &'a str, options: &'a BuildOptions) -> Self {
        TreeBuilder {
            input,
            options,
            nodes: Vec::new(),
            stack: Vec::new(),
            max_depth: 0,
            leaf_nodes: Vec::new(),
            non_term_nodes: Vec::new(),
            ambiguous_leaves: Vec::new(),
            observations: RuleObservations::default(),
        }
    }

    /// Walks the text segments between delimiters. Segment `k` is preceded by
    /// delimiter `k - 1` (the start of input for `k == 0`) and followed by
    /// delimiter `k` (the end of input for the last segment).
    fn run(&mut self, delimiters: &[Delimiter]) -> Result<(), ParseError> {
        let input = self.input;
        for k in 0..=delimiters.len() {
            self.max_depth = self.max_depth.max(self.stack.len());

            let before = k.checked_sub(1).map(|j| delimiters[j]);
            let after = delimiters.get(k).copied();
            let start = before.map_or(0, |d| d.pos + 1);
            let end = after.map_or(input.len(), |d| d.pos);
            let span = &input[start..end];

            match before.map(|d| d.kind) {
                Some(DelimKind::Close) => {
                    self.close(start - 1)?;
                    if !span.trim().is_empty() {
                        warn!(text = span, offset = start, "ignoring text after ')'");
                    }
                }
                _ => match after.map(|d| d.kind) {
                    Some(DelimKind::Open) => self.open_phrasal(span, start)?,
                    _ => self.add_leaf(span, start)?,
                },
            }
        }
        Ok(())
    }

    /// Links a freshly created node under the current stack top, or makes it
    /// the root when it is the first node.
    fn attach(&mut self, node: Node, offset: usize) -> Result<NodeId, ParseError> {
        let id = self.nodes.len();
        match self.stack.last() {
            Some(&parent) => self.nodes[parent].children.push(id),
            None if self.nodes.is_empty() => {}
            None => return Err(ParseError::DetachedNode { offset }),
        }
        self.nodes.push(node);
        Ok(id)
    }

    fn add_leaf(&mut self, span: &str, offset: usize) -> Result<(), ParseError> {
        let (tag, word, ambiguous) = split_leaf(span, self.options.leaf_colons)?;
        if tag.is_empty() {
            return Err(ParseError::EmptyTag { offset });
        }
        if word.is_empty() {
            return Err(ParseError::EmptyWord { span: span.to_string() });
        }

        let id = self.attach(Node::leaf(tag, word, self.stack.len()), offset)?;
        self.leaf_nodes.push(id);
        if ambiguous {
            warn!(leaf = span, "leaf has more than one colon, keeping '{}:{}'", tag, word);
            self.ambiguous_leaves.push(id);
        }
        self.observations.lexical_rule(tag, word);
        Ok(())
    }

    fn open_phrasal(&mut self, tag: &str, offset: usize) -> Result<(), ParseError> {
        if tag.is_empty() {
            return Err(ParseError::EmptyTag { offset });
        }
        let id = self.attach(Node::phrasal(tag, self.stack.len()), offset)?;
        self.non_term_nodes.push(id);
        self.stack.push(id);
        Ok(())
    }

    fn close(&mut self, offset: usize) -> Result<(), ParseError> {
        let id = self
            .stack
            .pop()
            .ok_or(ParseError::UnbalancedClose { offset })?;
        let node = &self.nodes[id];
        let rhs = node
            .children
            .iter()
            .map(|&c| self.nodes[c].tag.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        self.observations.grammar_rule(&node.tag, &rhs);
        Ok(())
    }

    fn finish(self) -> Result<(Tree, RuleObservations), ParseError> {
        if !self.stack.is_empty() {
            return Err(ParseError::UnclosedNodes { open: self.stack.len() });
        }
        let tree = Tree {
            nodes: self.nodes,
            root: 0,
            max_depth: self.max_depth,
            leaf_nodes: self.leaf_nodes,
            non_term_nodes: self.non_term_nodes,
            ambiguous_leaves: self.ambiguous_leaves,
            rc: RcAnalysis::default(),
        };
        Ok((tree, self.observations))
    }
}

/// Splits `TAG:WORD`. The flag reports a span with a second colon.
fn split_leaf(span: &str, policy: LeafColonPolicy) -> Result<(&str, &str, bool), ParseError> {
    let (tag, rest) = span
        .split_once(':')
        .ok_or_else(|| ParseError::LeafWithoutColon { span: span.to_string() })?;
    match rest.split_once(':') {
        None => Ok((tag, rest, false)),
        Some(_) if policy == LeafColonPolicy::Reject => {
            Err(ParseError::AmbiguousLeaf { span: span.to_string() })
        }
        Some((word, _)) => Ok((tag, word, true)),
    }
}
