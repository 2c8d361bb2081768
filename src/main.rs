// Command line front end: reads recognized text from files or stdin and prints
// one JSON analysis per input.

use clap::Parser;
use idextract::{
    models::{ClassifierRules, DocumentAnalysis, DocumentType},
    utils::DocumentError,
    DocumentAnalyzer,
};
use log::{error, info};
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

/// Classify recognized text of Indian identity documents and extract their fields
#[derive(Parser)]
#[command(name = "idextract", version)]
struct Args {
    /// JSON file with per-type keyword lists overriding the built-in ones
    #[arg(long)]
    rules: Option<PathBuf>,

    /// Skip classification and extract as this type (e.g. PAN, AADHAAR, VOTER_ID)
    #[arg(long)]
    doc_type: Option<DocumentType>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,

    /// Text files to analyze; stdin is read when none are given
    files: Vec<PathBuf>,
}

fn print_analysis(analysis: &DocumentAnalysis, pretty: bool) -> Result<(), DocumentError> {
    let json = if pretty {
        serde_json::to_string_pretty(analysis)
    } else {
        serde_json::to_string(analysis)
    }
    .map_err(|e| DocumentError::OutputError(e.to_string()))?;
    println!("{}", json);
    Ok(())
}

fn analyze(
    analyzer: &DocumentAnalyzer,
    text: &str,
    doc_type: Option<DocumentType>,
    source: Option<String>,
) -> DocumentAnalysis {
    let mut analysis = match doc_type {
        Some(document_type) => analyzer.analyze_as(text, document_type),
        None => analyzer.analyze(text),
    };
    analysis.source = source;
    analysis
}

fn run(args: Args) -> Result<(), DocumentError> {
    let analyzer = match &args.rules {
        Some(path) => {
            info!("Loading classifier rules from {}", path.display());
            DocumentAnalyzer::with_rules(ClassifierRules::from_json_file(path)?)
        }
        None => DocumentAnalyzer::new(),
    };

    if args.files.is_empty() {
        let mut text = String::new();
        io::stdin().read_to_string(&mut text)?;
        let analysis = analyze(&analyzer, &text, args.doc_type, None);
        return print_analysis(&analysis, args.pretty);
    }

    info!("Processing {} files...", args.files.len());
    for path in &args.files {
        let text = fs::read_to_string(path).map_err(|e| DocumentError::io(path, e))?;
        let source = Some(path.display().to_string());
        let analysis = analyze(&analyzer, &text, args.doc_type, source);
        print_analysis(&analysis, args.pretty)?;
    }
    Ok(())
}

fn main() -> Result<(), DocumentError> {
    env_logger::init();

    let args = Args::parse();
    run(args).map_err(|err| {
        error!("{}", err);
        err
    })
}
