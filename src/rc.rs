use std::collections::HashSet;

use tracing::debug;

use crate::structs::{NodeId, RcAnalysis, RcRecord, Tree};

// --- Relative Clause Analysis ---

/// Tags of the "X‧的" attributive constructions that head a relative clause.
pub const RC_MARKERS: [&str; 10] = [
    "ADV‧的", "A‧的", "DM‧的", "GP‧的", "NP‧的", "N‧的", "PP‧的", "S‧的", "VP‧的", "V‧的",
];

#[derive(Debug, Clone)]
pub struct RcAnalyzer {
    markers: HashSet<String>,
}

impl Default for RcAnalyzer {
    fn default() -> Self {
        Self::with_markers(RC_MARKERS)
    }
}

impl RcAnalyzer {
    pub fn with_markers<I, S>(markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        RcAnalyzer {
            markers: markers.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_rc_head(&self, tag: &str) -> bool {
        self.markers.contains(tag)
    }

    /// Measures every RC head among the tree's phrasal nodes, in creation order.
    pub fn analyze(&self, tree: &Tree) -> RcAnalysis {
        let mut analysis = RcAnalysis::default();
        for &id in &tree.non_term_nodes {
            if !self.is_rc_head(&tree.node(id).tag) {
                continue;
            }
            let record = measure_rc(tree, id);
            let index = analysis.rc_depths.len() + 1;
            debug!(index, tag = %tree.node(id).tag, ?record, "measured relative clause");
            analysis.rc_depths.push(record.rc_depth);
            analysis.rcs.insert(index, record);
        }
        analysis.num_rc = analysis.rc_depths.len();
        analysis
    }
}

/// Bottom-up statistics of the subtree under `head`. The counters start at
/// -1 so the head itself and its 的 particle are not counted.
pub fn measure_rc(tree: &Tree, head: NodeId) -> RcRecord {
    let mut leaf_count: i64 = -1;
    let mut nt_count: i64 = -1;
    let mut char_count: i64 = -1;
    let mut max_depth: i64 = -1;

    let mut pending = vec![head];
    while let Some(id) = pending.pop() {
        let node = tree.node(id);
        match &node.word {
            Some(word) => {
                leaf_count += 1;
                char_count += word.chars().count() as i64;
                max_depth = max_depth.max(node.depth as i64);
            }
            None => {
                nt_count += 1;
                // reversed so children come off the stack left to right
                pending.extend(node.children.iter().rev());
            }
        }
    }

    let head_depth = tree.node(head).depth as i64;
    RcRecord {
        rc_depth: non_negative(max_depth - head_depth),
        num_leaf_nodes: non_negative(leaf_count),
        num_nt_nodes: non_negative(nt_count),
        num_char: non_negative(char_count),
    }
}

fn non_negative(value: i64) -> usize {
    usize::try_from(value).unwrap_or(0)
}

impl Tree {
    /// Runs `analyzer` and stores the result on the tree, replacing any
    /// previous analysis.
    pub fn find_relative_clauses(&mut self, analyzer: &RcAnalyzer) -> &RcAnalysis {
        self.rc = analyzer.analyze(self);
        &self.rc
    }
}
