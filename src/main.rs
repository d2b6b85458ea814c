use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use bjj_tagger::glossary::Glossary;
use bjj_tagger::record::CLASSIFICATION_FIELD;
use bjj_tagger::tagger::{EvalError, evaluate, load_corpus};
use bjj_tagger::{
    BatchOptions, Category, FieldSelection, GlossaryError, GlossarySource, MatchStrategy,
    NormalizedText, Tagger, TaggerBuilder, classify_batch, read_records, write_records,
};
use clap::{Parser, Subcommand};
use log::info;

/// bjj-tagger - keyword classification of grappling video metadata
#[derive(Parser)]
#[command(name = "bjj-tagger")]
#[command(about = "Tags BJJ video titles, descriptions and tags with glossary terms")]
#[command(version)]
struct Cli {
    /// Glossary JSON file (overrides BJJ_TAGGER_GLOSSARY and the user config)
    #[arg(long, global = true, value_name = "PATH")]
    glossary: Option<PathBuf>,

    /// How keyword occurrences are located: automaton or scan
    #[arg(long, global = true, value_name = "STRATEGY", default_value = "automaton")]
    matcher: MatchStrategy,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Classify a single record and print the classification as JSON
    Classify(ClassifyCommand),
    /// Show which term claimed which part of a text
    Explain(ExplainCommand),
    /// Classify a JSON array of records and write them back with classifications
    Process(ProcessCommand),
    /// List the glossary by category
    Glossary(GlossaryCommand),
    /// Score the tagger against a labelled corpus
    Evaluate(EvaluateCommand),
}

/// Classify a single record
#[derive(Parser)]
struct ClassifyCommand {
    /// Record title
    #[arg(long, value_name = "TITLE")]
    title: String,

    /// Record description
    #[arg(short, long, value_name = "DESCRIPTION", default_value = "")]
    description: String,

    /// Comma-separated record tags
    #[arg(short, long, value_name = "TAGS")]
    tags: Option<String>,
}

/// Explain a classification
#[derive(Parser)]
struct ExplainCommand {
    /// Free-form text to classify
    #[arg(value_name = "TEXT")]
    text: String,
}

/// Classify a file of records
#[derive(Parser)]
struct ProcessCommand {
    /// JSON file holding an array of records
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output file (defaults to <INPUT stem>_processed.json next to the input)
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Classify titles only, ignoring descriptions and tags
    #[arg(long)]
    title_only: bool,

    /// Number of sample classifications to log when done
    #[arg(long, value_name = "N", default_value_t = 5)]
    samples: usize,
}

/// List the glossary
#[derive(Parser)]
struct GlossaryCommand {
    /// Only list this category
    #[arg(short, long, value_name = "CATEGORY")]
    category: Option<Category>,
}

/// Evaluate against a corpus
#[derive(Parser)]
struct EvaluateCommand {
    /// Corpus JSON file (defaults to the corpus shipped with the sources)
    #[arg(value_name = "CORPUS")]
    corpus: Option<PathBuf>,
}

fn main() {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let result = match &cli.command {
        Commands::Classify(cmd) => handle_classify(&cli, cmd),
        Commands::Explain(cmd) => handle_explain(&cli, cmd),
        Commands::Process(cmd) => handle_process(&cli, cmd),
        Commands::Glossary(cmd) => handle_glossary(&cli, cmd),
        Commands::Evaluate(cmd) => handle_evaluate(&cli, cmd),
    };

    if let Err(e) = result {
        // Determine exit code based on error type
        let exit_code = if is_user_error(&e) { 1 } else { 2 };
        eprintln!("Error: {e:#}");
        std::process::exit(exit_code);
    }
}

/// Context attached to failures reading the records file given to `process`.
#[derive(Debug)]
struct InvalidInput;

impl fmt::Display for InvalidInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Invalid input")
    }
}

/// Determines if an error is a user error (vs internal error).
///
/// User errors are bad input: an invalid glossary or corpus, an unreadable
/// or malformed input file, or empty text. Everything else, including a
/// failed write of the output file, is internal.
fn is_user_error(error: &anyhow::Error) -> bool {
    if error.downcast_ref::<InvalidInput>().is_some() {
        return true;
    }
    let bad_definition = error
        .chain()
        .any(|cause| cause.is::<GlossaryError>() || cause.is::<EvalError>());
    bad_definition || error.to_string().contains("cannot be empty")
}

/// Loads the glossary selected by `--glossary`, the environment or the
/// user config.
fn load_glossary(cli: &Cli) -> Result<Glossary> {
    let source = GlossarySource::resolve(cli.glossary.clone());
    let glossary = source
        .load()
        .with_context(|| format!("Failed to load glossary from {source}"))?;
    Ok(glossary)
}

/// Builds the tagger for the selected glossary and strategy.
fn build_tagger(cli: &Cli) -> Result<Tagger> {
    let glossary = load_glossary(cli)?;
    TaggerBuilder::new()
        .glossary(glossary)
        .strategy(cli.matcher)
        .build()
        .context("Failed to build tagger")
}

/// Handles the classify command by printing one record's classification.
fn handle_classify(cli: &Cli, cmd: &ClassifyCommand) -> Result<()> {
    let tagger = build_tagger(cli)?;
    let tags = cmd.tags.as_deref().map(parse_tags).unwrap_or_default();

    let classification = tagger.classify(&cmd.title, &cmd.description, &tags);
    let json = serde_json::to_string_pretty(&classification).context("Failed to serialize classification")?;
    println!("{json}");
    Ok(())
}

/// Handles the explain command by printing each claim in claim order.
fn handle_explain(cli: &Cli, cmd: &ExplainCommand) -> Result<()> {
    let text = NormalizedText::from_raw(&cmd.text);
    if text.is_empty() {
        anyhow::bail!("Text cannot be empty");
    }

    let tagger = build_tagger(cli)?;
    println!("{}", format_claims(&tagger, &text));
    Ok(())
}

/// Renders the claims for `text`, one per line.
fn format_claims(tagger: &Tagger, text: &NormalizedText) -> String {
    let claims = tagger.claims(text);
    if claims.is_empty() {
        return "No terms matched".to_string();
    }

    claims
        .iter()
        .map(|claim| {
            format!(
                "{:<24} {:<11} {:>4}..{:<4} {:?}",
                claim.term.id().as_str(),
                claim.term.category().as_str(),
                claim.span.start,
                claim.span.end,
                claim.keyword
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Handles the process command by classifying every record of a file.
fn handle_process(cli: &Cli, cmd: &ProcessCommand) -> Result<()> {
    let tagger = build_tagger(cli)?;
    let mut records = read_records(&cmd.input).context(InvalidInput)?;
    if records.is_empty() {
        anyhow::bail!("Input file cannot be empty: {}", cmd.input.display());
    }
    info!("Read {} records from {}", records.len(), cmd.input.display());

    let options = BatchOptions {
        fields: if cmd.title_only {
            FieldSelection::TitleOnly
        } else {
            FieldSelection::All
        },
        ..BatchOptions::default()
    };
    let stats = classify_batch(&tagger, &mut records, options);

    let output = cmd
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&cmd.input));
    write_records(&output, &records)?;
    info!("Wrote {} records to {}", records.len(), output.display());

    for (category, count) in &stats.per_category {
        info!("  {category}: {count}");
    }
    for record in records
        .iter()
        .filter(|record| record.get(CLASSIFICATION_FIELD).is_some())
        .take(cmd.samples)
    {
        let title = record.get("title").and_then(|t| t.as_str()).unwrap_or_default();
        info!("Sample: {title:?} -> {}", record[CLASSIFICATION_FIELD]);
    }

    Ok(())
}

/// Derives `<stem>_processed.json` next to the input file.
fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "records".to_string());
    input.with_file_name(format!("{stem}_processed.json"))
}

/// Handles the glossary command by listing terms per category.
fn handle_glossary(cli: &Cli, cmd: &GlossaryCommand) -> Result<()> {
    let glossary = load_glossary(cli)?;
    println!("{}", format_glossary(&glossary, cmd.category));
    Ok(())
}

/// Renders categories with their labels and keyword counts.
fn format_glossary(glossary: &Glossary, only: Option<Category>) -> String {
    let mut lines = Vec::new();
    for category in Category::ALL {
        if only.is_some_and(|wanted| wanted != category) {
            continue;
        }
        let members: Vec<_> = glossary.members(category).collect();
        if members.is_empty() {
            continue;
        }

        lines.push(format!("{category} ({} terms)", members.len()));
        for term in members {
            lines.push(format!("  {} [{} keywords]", term.label(), term.keywords().len()));
        }
    }
    lines.join("\n")
}

/// Handles the evaluate command by printing mean scores over a corpus.
fn handle_evaluate(cli: &Cli, cmd: &EvaluateCommand) -> Result<()> {
    let tagger = build_tagger(cli)?;
    let entries = load_corpus(cmd.corpus.clone())?;
    if entries.is_empty() {
        anyhow::bail!("Corpus cannot be empty");
    }

    let report = evaluate(&tagger, &entries);
    for miss in report.misses() {
        info!("Mismatch: {:?} (jaccard {:.2})", miss.title, miss.jaccard);
    }

    println!("Entries:   {}", report.entries.len());
    println!("Jaccard:   {:.3}", report.mean_jaccard);
    println!("Precision: {:.3}", report.mean_precision);
    println!("Recall:    {:.3}", report.mean_recall);
    Ok(())
}

/// Parses comma-separated tags from a string.
///
/// Splits on commas, trims whitespace from each tag, and filters out empty strings.
fn parse_tags(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
