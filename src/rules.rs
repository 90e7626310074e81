use crate::pcfg::RuleObservations;
use crate::structs::{NodeId, Tree};

// --- Rule Extraction---

/// Re-derives the grammar and lexical rules of a finished tree by walking it.
/// Yields the same multiset the builder records while parsing, in pre-order.
pub fn extract_rules(tree: &Tree) -> RuleObservations {
    let mut rules = RuleObservations::default();
    extract_node_rules(tree, tree.root, &mut rules);
    rules
}

fn extract_node_rules(tree: &Tree, id: NodeId, rules: &mut RuleObservations) {
    let node = tree.node(id);
    if let Some(word) = &node.word {
        rules.lexical_rule(&node.tag, word);
        return;
    }
    let rhs_parts: Vec<&str> = tree.children(id).map(|c| c.tag.as_str()).collect();
    rules.grammar_rule(&node.tag, &rhs_parts.join(" "));
    for &child in &node.children {
        extract_node_rules(tree, child, rules);
    }
}
