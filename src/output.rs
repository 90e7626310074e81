use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt::Write as _;
use std::fs::File;
use std::io::{self, BufWriter, Write};

use crate::pcfg::Pcfg;
use crate::structs::{NodeId, RcAnalysis, Tree};

// --- Tree and RC Reports ---

/// One node per line, indented by depth: `word depth` for leaves and
/// `tag depth` for phrasal nodes.
pub fn render_tree(tree: &Tree) -> String {
    let mut out = String::new();
    render_node(tree, tree.root, &mut out);
    out
}

fn render_node(tree: &Tree, id: NodeId, out: &mut String) {
    let node = tree.node(id);
    let label = node.word.as_deref().unwrap_or(&node.tag);
    let _ = writeln!(out, "{}{} {}", "   ".repeat(node.depth), label, node.depth);
    for &child in &node.children {
        render_node(tree, child, out);
    }
}

pub fn render_rc_report(analysis: &RcAnalysis) -> String {
    let mut out = String::new();
    for (index, record) in &analysis.rcs {
        let _ = writeln!(out, "\nprocessing RC *{}*", index);
        let _ = writeln!(out, "maxDepth of current RC: {}", record.rc_depth);
        let _ = writeln!(out, "num words             : {}", record.num_leaf_nodes);
        let _ = writeln!(out, "num characters        : {}", record.num_char);
        let _ = writeln!(out, "num phrasal nodes     : {}", record.num_nt_nodes);
    }
    let _ = writeln!(out, "depths all RCs:        {:?}", analysis.rc_depths);
    let _ = writeln!(out, "number of RC in above tree: {}", analysis.num_rc);
    out
}

/// Every LHS with its observed expansions and their counts, sorted.
pub fn render_grammar(pcfg: &Pcfg) -> String {
    let mut out = String::new();
    let sorted: BTreeMap<_, _> = pcfg.grm_lhss.iter().collect();
    for (lhs, rhss) in sorted {
        let _ = writeln!(out, "{} -->", lhs);
        let alternatives: BTreeMap<_, _> = rhss.iter().collect();
        for (rhs, count) in alternatives {
            let _ = writeln!(out, "\t{}\t{}", count, rhs);
        }
    }
    out
}

// --- Output Writing---
pub fn write_pcfg_output(pcfg: &Pcfg, output_prefix: Option<String>) -> io::Result<()> {
    let lexical_totals = pcfg.lexical_totals();

    if let Some(prefix) = output_prefix {
        eprintln!("Writing PCFG to files with prefix: {}", prefix);
        let rules_output_filename = format!("{}.rules", prefix);
        let lexicon_output_filename = format!("{}.lexicon", prefix);
        let words_output_filename = format!("{}.words", prefix);
        let weights_output_filename = format!("{}.weights", prefix);

        let mut rules_writer = BufWriter::new(File::create(&rules_output_filename)?);
        let mut lexicon_writer = BufWriter::new(File::create(&lexicon_output_filename)?);
        let mut words_writer = BufWriter::new(File::create(&words_output_filename)?);
        let mut weights_writer = BufWriter::new(File::create(&weights_output_filename)?);

        // grammar rules "LHS -> RHS PROB" format
        for (lhs, rhs, count) in sorted_rules(&pcfg.grm_lhss) {
            write_rule_line_arrow_format(&mut rules_writer, lhs, rhs, count, &pcfg.sum_lhss)?;
        }

        // lexical rules "TAG WORD PROB" format
        let mut unique_words_for_output: HashSet<&str> = HashSet::new();
        for (tag, word, count) in sorted_rules(&pcfg.lex_tags) {
            let total_count = lexical_totals.get(tag).copied().unwrap_or(0);
            writeln!(lexicon_writer, "{} {} {}", tag, word, relative_frequency(count, total_count))?;
            if unique_words_for_output.insert(word) {
                writeln!(words_writer, "{}", word)?;
            }
        }

        let mut weights: Vec<_> = pcfg.weight_lhss.iter().collect();
        weights.sort_by(|a, b| a.0.cmp(b.0));
        for (lhs, weight) in weights {
            writeln!(weights_writer, "{} {}", lhs, weight)?;
        }

        rules_writer.flush()?;
        lexicon_writer.flush()?;
        words_writer.flush()?;
        weights_writer.flush()?;

        eprintln!(
            "Successfully wrote: {}, {}, {}, {}",
            rules_output_filename, lexicon_output_filename, words_output_filename, weights_output_filename
        );
    } else {
        eprintln!("Writing combined PCFG rules to standard output...");
        let stdout = io::stdout();
        let mut writer = BufWriter::new(stdout.lock());

        for (lhs, rhs, count) in sorted_rules(&pcfg.grm_lhss) {
            write_rule_line_arrow_format(&mut writer, lhs, rhs, count, &pcfg.sum_lhss)?;
        }
        for (tag, word, count) in sorted_rules(&pcfg.lex_tags) {
            write_rule_line_arrow_format(&mut writer, tag, word, count, &lexical_totals)?;
        }

        writer.flush()?;
        eprintln!("Finished writing to standard output.");
    }

    Ok(())
}

fn sorted_rules(table: &HashMap<String, HashMap<String, u64>>) -> Vec<(&str, &str, u64)> {
    let mut rules: Vec<(&str, &str, u64)> = table
        .iter()
        .flat_map(|(lhs, rhss)| {
            rhss.iter()
                .map(move |(rhs, count)| (lhs.as_str(), rhs.as_str(), *count))
        })
        .collect();
    rules.sort();
    rules
}

fn relative_frequency(count: u64, total_count: u64) -> f64 {
    if total_count > 0 {
        count as f64 / total_count as f64
    } else {
        0.0
    }
}

// LHS -> RHS PROB
fn write_rule_line_arrow_format<W: Write>(
    writer: &mut BufWriter<W>,
    lhs: &str,
    rhs: &str,
    count: u64,
    lhs_totals: &HashMap<String, u64>,
) -> io::Result<()> {
    match lhs_totals.get(lhs) {
        Some(total_count) => {
            writeln!(writer, "{} -> {} {}", lhs, rhs, relative_frequency(count, *total_count))
        }
        None => {
            tracing::warn!(lhs, rhs, "LHS missing from totals, run compute_weights first; skipping rule");
            Ok(())
        }
    }
}
