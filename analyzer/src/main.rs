use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use textstat::huffman::huffman_encode;
use textstat::metrics::{self, MetricsSnapshot};
use textstat::persist::JsonDirStore;
use textstat::tfidf::{corpus_table, CorpusRow};
use textstat::tokenizer::StopwordSet;
use textstat::{
    CorpusEvent, Document, EngineConfig, Library, MemoryStore, RankOrder, Recomputer, StatisticsRecord,
    StatisticsStore, TfIdfEngine,
};
use tracing_subscriber::{fmt, EnvFilter};
use walkdir::WalkDir;

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "analyzer")]
#[command(about = "TF-IDF statistics and Huffman coding for plain-text documents", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute document and collection statistics
    Stats {
        /// A directory (top-level .txt = documents, subdirectories = collections) or a JSON manifest
        #[arg(long)]
        input: String,
        /// Keep this many terms per record
        #[arg(long, default_value_t = textstat::tfidf::DEFAULT_TOP_K)]
        top_k: usize,
        #[arg(long, value_enum, default_value_t = Rank::Tf)]
        rank: Rank,
        /// Extra stop words, one per line, added to the built-in list
        #[arg(long)]
        stopwords: Option<String>,
        /// Decimal places in printed numbers
        #[arg(long, default_value_t = 3)]
        precision: u32,
        /// Also write one JSON file per record under this directory
        #[arg(long)]
        output: Option<String>,
    },
    /// Per-document tf/idf table over a batch of files
    Table {
        files: Vec<String>,
        #[arg(long)]
        stopwords: Option<String>,
        #[arg(long, default_value_t = 3)]
        precision: u32,
    },
    /// Huffman-encode a file
    Huffman {
        #[arg(long)]
        input: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Rank {
    /// Ascending term frequency (rarest first)
    Tf,
    /// Descending tf*idf
    Tfidf,
}

impl From<Rank> for RankOrder {
    fn from(r: Rank) -> Self {
        match r {
            Rank::Tf => RankOrder::TermFrequencyAscending,
            Rank::Tfidf => RankOrder::TfIdfDescending,
        }
    }
}

/// Explicit document/collection layout for many-to-many membership.
#[derive(Debug, Deserialize)]
struct Manifest {
    documents: BTreeMap<String, String>,
    #[serde(default)]
    collections: BTreeMap<String, Vec<String>>,
}

#[derive(Serialize)]
struct StatsOutput {
    records: Vec<StatisticsRecord>,
    metrics: MetricsSnapshot,
}

#[derive(Serialize)]
struct HuffmanOutput {
    input: String,
    symbols: usize,
    encoded_bits: usize,
    compression_ratio: Option<f64>,
    codes: BTreeMap<char, String>,
    encoded: String,
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).with_writer(std::io::stderr).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Stats { input, top_k, rank, stopwords, precision, output } => {
            let config = EngineConfig { stopwords: load_stopwords(stopwords.as_deref())?, top_k, rank: rank.into() };
            run_stats(&input, config, precision, output.as_deref())
        }
        Commands::Table { files, stopwords, precision } => run_table(&files, stopwords.as_deref(), precision),
        Commands::Huffman { input } => run_huffman(&input),
    }
}

fn load_stopwords(path: Option<&str>) -> Result<StopwordSet> {
    let mut set = StopwordSet::default();
    if let Some(p) = path {
        let text = fs::read_to_string(p).with_context(|| format!("reading stop words from {p}"))?;
        set.extend(text.lines());
        tracing::info!(path = p, total = set.len(), "loaded extra stop words");
    }
    Ok(set)
}

fn is_txt(path: &Path) -> bool {
    path.extension().and_then(|s| s.to_str()).map(|e| e.eq_ignore_ascii_case("txt")).unwrap_or(false)
}

/// Document text for the engine. Unreadable or non-UTF-8 files become "".
fn read_text(path: &Path) -> String {
    match fs::read(path) {
        Ok(bytes) => String::from_utf8(bytes).unwrap_or_else(|_| {
            tracing::warn!(path = %path.display(), "not valid UTF-8, using empty text");
            String::new()
        }),
        Err(err) => {
            tracing::warn!(path = %path.display(), %err, "unreadable, using empty text");
            String::new()
        }
    }
}

/// Build the library and the event sequence that populates it: every
/// document is created first, then added to its collections.
fn load_input(input: &Path) -> Result<(Library, Vec<CorpusEvent>)> {
    if input.is_dir() {
        load_dir(input)
    } else if input.is_file() {
        let manifest: Manifest = serde_json::from_str(&fs::read_to_string(input)?)
            .with_context(|| format!("parsing manifest {}", input.display()))?;
        let base = input.parent().unwrap_or_else(|| Path::new("."));
        load_manifest(manifest, base)
    } else {
        bail!("input {} does not exist", input.display())
    }
}

fn load_dir(root: &Path) -> Result<(Library, Vec<CorpusEvent>)> {
    let mut files: Vec<PathBuf> = Vec::new();
    for entry in WalkDir::new(root).min_depth(1).max_depth(2).sort_by_file_name().into_iter().filter_map(|e| e.ok()) {
        let p = entry.path();
        if !p.is_file() { continue; }
        if is_txt(p) {
            files.push(p.to_path_buf());
        } else {
            tracing::warn!(path = %p.display(), "skipping non-.txt file");
        }
    }

    let mut documents = BTreeMap::new();
    let mut collections: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for file in files {
        let rel = file.strip_prefix(root).unwrap_or(&file);
        let id = rel.to_string_lossy().replace('\\', "/");
        if let Some(dir) = rel.parent().filter(|d| !d.as_os_str().is_empty()) {
            collections.entry(dir.to_string_lossy().into_owned()).or_default().push(id.clone());
        }
        documents.insert(id, file.to_string_lossy().into_owned());
    }
    load_manifest(Manifest { documents, collections }, Path::new(""))
}

fn load_manifest(manifest: Manifest, base: &Path) -> Result<(Library, Vec<CorpusEvent>)> {
    let mut library = Library::new();
    let mut events = Vec::new();
    for (id, path) in &manifest.documents {
        let path = base.join(path);
        if !is_txt(&path) {
            tracing::warn!(document = %id, path = %path.display(), "only .txt documents are accepted, skipping");
            continue;
        }
        library.add_document(Document::new(id.clone(), read_text(&path)))?;
        events.push(CorpusEvent::DocumentCreated { document: id.clone() });
    }
    for id in manifest.collections.keys() {
        library.create_collection(id.clone());
    }
    // membership is applied during replay so each event sees the state it follows
    for (collection, members) in &manifest.collections {
        for document in members {
            if library.document(document).is_err() {
                tracing::warn!(%collection, %document, "collection member is not a loaded document, skipping");
                continue;
            }
            events.push(CorpusEvent::DocumentAdded { document: document.clone(), collection: collection.clone() });
        }
    }
    tracing::info!(documents = manifest.documents.len(), collections = manifest.collections.len(), "input loaded");
    Ok((library, events))
}

fn run_stats(input: &str, config: EngineConfig, precision: u32, output: Option<&str>) -> Result<()> {
    let (mut library, events) = load_input(Path::new(input))?;
    let recomputer = Recomputer::new(TfIdfEngine::new(config));
    let mut store = MemoryStore::new();

    for event in &events {
        if let CorpusEvent::DocumentAdded { document, collection } = event {
            library.add_to_collection(collection, document)?;
        }
        recomputer.apply(event, &library, &mut store)?;
    }

    if let Some(dir) = output {
        let mut sink = JsonDirStore::new(dir);
        for record in store.records() {
            sink.put(record.rounded(precision))?;
        }
        tracing::info!(output = dir, records = store.len(), "records written");
    }

    let out = StatsOutput {
        records: store.records().into_iter().map(|r| r.rounded(precision)).collect(),
        metrics: metrics::global().snapshot(),
    };
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

fn run_table(files: &[String], stopwords: Option<&str>, precision: u32) -> Result<()> {
    if files.is_empty() {
        bail!("no input files");
    }
    let stopwords = load_stopwords(stopwords)?;
    let mut texts = Vec::new();
    for f in files {
        let p = Path::new(f);
        if !is_txt(p) {
            bail!("{f}: upload .txt files only");
        }
        texts.push(read_text(p));
    }
    let rows: Vec<CorpusRow> = metrics::global()
        .track(|| corpus_table(&texts, &stopwords))
        .iter()
        .map(|r| r.rounded(precision))
        .collect();
    tracing::info!(documents = texts.len(), rows = rows.len(), "table computed");
    println!("{}", serde_json::to_string_pretty(&rows)?);
    Ok(())
}

fn huffman_report(input: &str) -> Result<HuffmanOutput> {
    let path = Path::new(input);
    if !is_txt(path) {
        bail!("{input}: upload .txt files only");
    }
    let text = read_text(path);
    let result = metrics::global().track(|| huffman_encode(&text));
    let decoded = result.decode()?;
    if decoded != text {
        bail!("round trip mismatch for {input}");
    }
    Ok(HuffmanOutput {
        input: input.to_string(),
        symbols: result.codes.len(),
        encoded_bits: result.encoded_bits(),
        compression_ratio: result.compression_ratio(&text),
        codes: result.codes,
        encoded: result.encoded,
    })
}

fn run_huffman(input: &str) -> Result<()> {
    let out = huffman_report(input)?;
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn directory_layout_maps_to_collections() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("pets")).unwrap();
        fs::write(dir.path().join("lone.txt"), "solitary words").unwrap();
        fs::write(dir.path().join("pets/cat.txt"), "the cat sat").unwrap();
        fs::write(dir.path().join("pets/dog.txt"), "the dog sat").unwrap();
        fs::write(dir.path().join("pets/notes.md"), "ignored").unwrap();

        let (library, events) = load_input(dir.path()).unwrap();
        assert_eq!(library.documents().count(), 3);
        assert_eq!(events.len(), 5);
        let ids: Vec<&String> = library.collection_ids().collect();
        assert_eq!(ids, vec!["pets"]);
        assert!(matches!(&events[3], CorpusEvent::DocumentAdded { document, collection }
            if document == "pets/cat.txt" && collection == "pets"));
    }

    #[test]
    fn manifest_supports_shared_membership() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "alpha").unwrap();
        fs::write(dir.path().join("b.txt"), "beta").unwrap();
        fs::write(
            dir.path().join("manifest.json"),
            r#"{"documents": {"a": "a.txt", "b": "b.txt"}, "collections": {"x": ["a", "b"], "y": ["a", "ghost"]}}"#,
        )
        .unwrap();

        let (mut library, events) = load_input(&dir.path().join("manifest.json")).unwrap();
        assert_eq!(events.len(), 5);
        for event in &events {
            if let CorpusEvent::DocumentAdded { document, collection } = event {
                library.add_to_collection(collection, document).unwrap();
            }
        }
        assert_eq!(library.collections_of("a"), vec!["x", "y"]);
    }

    #[test]
    fn unreadable_file_becomes_empty_text() {
        let dir = tempdir().unwrap();
        let bad = dir.path().join("bad.txt");
        fs::write(&bad, b"\xff\xfe\x00").unwrap();
        assert_eq!(read_text(&bad), "");
        assert_eq!(read_text(&dir.path().join("missing.txt")), "");
    }

    #[test]
    fn huffman_of_non_utf8_file_is_empty_result() {
        let dir = tempdir().unwrap();
        let bad = dir.path().join("bad.txt");
        fs::write(&bad, b"\xff\xfe\x00").unwrap();
        let out = huffman_report(&bad.to_string_lossy()).unwrap();
        assert_eq!(out.symbols, 0);
        assert!(out.encoded.is_empty());
        assert!(out.compression_ratio.is_none());

        let missing = dir.path().join("missing.txt");
        assert_eq!(huffman_report(&missing.to_string_lossy()).unwrap().encoded_bits, 0);
    }

    #[test]
    fn huffman_rejects_non_txt_input() {
        let dir = tempdir().unwrap();
        let md = dir.path().join("notes.md");
        fs::write(&md, "abc").unwrap();
        assert!(huffman_report(&md.to_string_lossy()).is_err());

        let ok = dir.path().join("abra.txt");
        fs::write(&ok, "abracadabra").unwrap();
        let out = huffman_report(&ok.to_string_lossy()).unwrap();
        assert_eq!(out.symbols, 5);
        assert_eq!(out.encoded_bits, 23);
    }
}
