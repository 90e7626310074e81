use std::collections::HashMap;

// --- Rule Accumulation ---

/// Rule occurrences seen while building one sentence. They are committed to
/// a [`Pcfg`] only once the sentence built without error.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleObservations {
    /// `(lhs, rhs)` with `rhs` the space-joined child tags.
    pub grammar: Vec<(String, String)>,
    /// `(tag, word)`
    pub lexical: Vec<(String, String)>,
}

impl RuleObservations {
    pub fn grammar_rule(&mut self, lhs: &str, rhs: &str) {
        self.grammar.push((lhs.to_string(), rhs.to_string()));
    }

    pub fn lexical_rule(&mut self, tag: &str, word: &str) {
        self.lexical.push((tag.to_string(), word.to_string()));
    }
}

pub fn rule_key(lhs: &str, rhs: &str) -> String {
    format!("{} -> {}", lhs, rhs)
}

/// Cumulative rule frequencies over every sentence fed to it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pcfg {
    /// "LHS -> RHS" -> count
    pub grm_rule: HashMap<String, u64>,
    /// "TAG -> WORD" -> count
    pub lex_rule: HashMap<String, u64>,
    /// LHS -> RHS -> count
    pub grm_lhss: HashMap<String, HashMap<String, u64>>,
    /// TAG -> WORD -> count
    pub lex_tags: HashMap<String, HashMap<String, u64>>,
    pub sum_lhss: HashMap<String, u64>,
    pub weight_lhss: HashMap<String, f64>,
    pub total_rule_counts: u64,
}

impl Pcfg {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_grammar_rule(&mut self, lhs: &str, rhs: &str) {
        *self.grm_rule.entry(rule_key(lhs, rhs)).or_insert(0) += 1;
        *self
            .grm_lhss
            .entry(lhs.to_string())
            .or_default()
            .entry(rhs.to_string())
            .or_insert(0) += 1;
    }

    pub fn record_lexical_rule(&mut self, tag: &str, word: &str) {
        *self.lex_rule.entry(rule_key(tag, word)).or_insert(0) += 1;
        *self
            .lex_tags
            .entry(tag.to_string())
            .or_default()
            .entry(word.to_string())
            .or_insert(0) += 1;
    }

    pub fn commit(&mut self, observations: RuleObservations) {
        for (lhs, rhs) in &observations.grammar {
            self.record_grammar_rule(lhs, rhs);
        }
        for (tag, word) in &observations.lexical {
            self.record_lexical_rule(tag, word);
        }
    }

    /// Recomputes `sum_lhss`, `total_rule_counts` and `weight_lhss` from the
    /// current counts. A weight is the LHS's share of all grammar-rule
    /// occurrences, not a distribution over its own expansions; see
    /// [`Pcfg::rule_probability`] for that.
    pub fn compute_weights(&mut self) {
        self.sum_lhss = self
            .grm_lhss
            .iter()
            .map(|(lhs, rhss)| (lhs.clone(), rhss.values().sum()))
            .collect();
        self.total_rule_counts = self.sum_lhss.values().sum();

        self.weight_lhss.clear();
        if self.total_rule_counts == 0 {
            return;
        }
        let total = self.total_rule_counts as f64;
        for (lhs, sum) in &self.sum_lhss {
            self.weight_lhss.insert(lhs.clone(), *sum as f64 / total);
        }
    }

    /// `count(lhs -> rhs) / count(lhs -> *)`. Computed from the raw counts,
    /// so it does not depend on `compute_weights` having run.
    pub fn rule_probability(&self, lhs: &str, rhs: &str) -> Option<f64> {
        let rhss = self.grm_lhss.get(lhs)?;
        let count = *rhss.get(rhs)?;
        let total: u64 = rhss.values().sum();
        Some(count as f64 / total as f64)
    }

    /// Total lexical-rule count per tag.
    pub fn lexical_totals(&self) -> HashMap<String, u64> {
        self.lex_tags
            .iter()
            .map(|(tag, words)| (tag.clone(), words.values().sum()))
            .collect()
    }

    /// Adds the counts of `other`, e.g. from a separately fed worker.
    /// Derived weights are left stale until `compute_weights` runs again.
    pub fn merge(&mut self, other: &Pcfg) {
        for (lhs, rhss) in &other.grm_lhss {
            for (rhs, count) in rhss {
                *self.grm_rule.entry(rule_key(lhs, rhs)).or_insert(0) += count;
                *self
                    .grm_lhss
                    .entry(lhs.clone())
                    .or_default()
                    .entry(rhs.clone())
                    .or_insert(0) += count;
            }
        }
        for (tag, words) in &other.lex_tags {
            for (word, count) in words {
                *self.lex_rule.entry(rule_key(tag, word)).or_insert(0) += count;
                *self
                    .lex_tags
                    .entry(tag.clone())
                    .or_default()
                    .entry(word.clone())
                    .or_insert(0) += count;
            }
        }
    }
}
