use std::fs::File;
use std::io::{BufRead, BufReader};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use sinica_rc::output::{render_grammar, render_rc_report, render_tree, write_pcfg_output};
use sinica_rc::structs::{Cli, Commands, ProcessArgs};
use sinica_rc::{build_tree_with, strip_semantic_roles, BuildOptions, LeafColonPolicy, Pcfg, RcAnalyzer};

const DEMO_TREE: &str = "VP(Head:VC2:看|aspect:Di:著|goal:NP(predication:VP‧的(head:VP(location:NP(property:Nab:窗|Head:Ncda:外)|standard:PP(Head:P58:隨|DUMMY:NP(Head:Naa:風))|Head:VA11:飄動)|Head:DE:的)|Head:Nab:樹枝))";

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Process(args) => process(&args),
        Commands::Demo => demo(),
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn process(args: &ProcessArgs) -> Result<()> {
    let file = File::open(&args.tree_file)
        .with_context(|| format!("cannot open tree file {}", args.tree_file.display()))?;
    let reader = BufReader::new(file);

    let options = BuildOptions {
        leaf_colons: if args.strict_colons {
            LeafColonPolicy::Reject
        } else {
            LeafColonPolicy::Truncate
        },
    };
    let analyzer = RcAnalyzer::default();
    let mut pcfg = Pcfg::new();
    let mut parsed = 0usize;
    let mut skipped = 0usize;

    for (line_num, line_result) in reader.lines().enumerate() {
        let line = line_result
            .with_context(|| format!("error reading line {} of {}", line_num + 1, args.tree_file.display()))?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let sentence = if args.keep_roles {
            line.to_string()
        } else {
            strip_semantic_roles(line)
        };

        let mut tree = match build_tree_with(&sentence, &options, &mut pcfg) {
            Ok(tree) => tree,
            Err(e) => {
                warn!(line = line_num + 1, error = %e, "bad tree, skipping");
                skipped += 1;
                continue;
            }
        };
        parsed += 1;

        let analysis = tree.find_relative_clauses(&analyzer).clone();
        if !args.quiet {
            println!("{}", sentence);
            print!("{}", render_tree(&tree));
            println!("\nmaxdepth of whole tree: {}", tree.max_depth);
            print!("{}", render_rc_report(&analysis));
        }
    }

    info!(parsed, skipped, "reading trees done");
    eprintln!("reading trees done: {} parsed, {} skipped", parsed, skipped);

    pcfg.compute_weights();
    println!("CFG rules:");
    print!("{}", render_grammar(&pcfg));
    write_pcfg_output(&pcfg, args.output_prefix.clone()).context("cannot write PCFG output")?;
    Ok(())
}

fn demo() -> Result<()> {
    let sentence = strip_semantic_roles(DEMO_TREE);
    let mut pcfg = Pcfg::new();
    let mut tree = build_tree_with(&sentence, &BuildOptions::default(), &mut pcfg)?;

    println!("{}", sentence);
    print!("{}", render_tree(&tree));
    println!("\nmaxdepth of whole tree: {}", tree.max_depth);
    let analysis = tree.find_relative_clauses(&RcAnalyzer::default());
    print!("{}", render_rc_report(analysis));
    Ok(())
}
