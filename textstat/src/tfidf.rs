use crate::model::{round_to, Collection, Document, TermStat};
use crate::tokenizer::{filter_stopwords, tokenize, StopwordSet};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

pub const DEFAULT_TOP_K: usize = 50;

/// Ordering applied to a statistics list before truncation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankOrder {
    /// Rarest-within-document first; ties by word.
    #[default]
    TermFrequencyAscending,
    /// Highest tf*idf first; ties by word.
    TfIdfDescending,
}

impl RankOrder {
    fn compare(self, a: &TermStat, b: &TermStat) -> Ordering {
        let primary = match self {
            RankOrder::TermFrequencyAscending => a.tf.total_cmp(&b.tf),
            RankOrder::TfIdfDescending => b.tfidf.total_cmp(&a.tfidf),
        };
        primary.then_with(|| a.word.cmp(&b.word))
    }
}

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub stopwords: StopwordSet,
    pub top_k: usize,
    pub rank: RankOrder,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { stopwords: StopwordSet::default(), top_k: DEFAULT_TOP_K, rank: RankOrder::default() }
    }
}

/// `count(word) / total`. Empty input gives an empty map.
pub fn compute_term_frequency(tokens: &[String]) -> HashMap<String, f64> {
    let mut counts: HashMap<&str, u32> = HashMap::new();
    for t in tokens {
        *counts.entry(t.as_str()).or_insert(0) += 1;
    }
    let total = tokens.len() as f64;
    counts.into_iter().map(|(w, c)| (w.to_string(), c as f64 / total)).collect()
}

/// Smoothed idf, `ln((1 + N) / (1 + df))`, for every word of the corpus.
///
/// Each token list is stopword-filtered on its own before counting, so the
/// result never contains a stop word. Finite and non-negative for any N.
pub fn compute_corpus_idf(corpus_token_lists: &[Vec<String>], stopwords: &StopwordSet) -> HashMap<String, f64> {
    let n = corpus_token_lists.len() as f64;
    let mut df: HashMap<&str, u32> = HashMap::new();
    for tokens in corpus_token_lists {
        let seen: HashSet<&str> = tokens
            .iter()
            .map(String::as_str)
            .filter(|t| !stopwords.contains(t))
            .collect();
        for t in seen {
            *df.entry(t).or_insert(0) += 1;
        }
    }
    df.into_iter()
        .map(|(w, d)| (w.to_string(), ((1.0 + n) / (1.0 + d as f64)).ln()))
        .collect()
}

/// Stateless TF-IDF computation with a fixed configuration.
#[derive(Debug, Clone, Default)]
pub struct TfIdfEngine {
    config: EngineConfig,
}

impl TfIdfEngine {
    pub fn new(config: EngineConfig) -> Self { Self { config } }

    pub fn config(&self) -> &EngineConfig { &self.config }

    /// Statistics of `target` against `corpus` (which should contain `target`).
    pub fn statistics_for_document(&self, target: &Document, corpus: &[Document]) -> Vec<TermStat> {
        let tokens = filter_stopwords(tokenize(&target.text), &self.config.stopwords);
        let stats = self.join(&tokens, corpus);
        tracing::debug!(document = %target.id, corpus = corpus.len(), terms = stats.len(), "document statistics");
        stats
    }

    /// Statistics of all members concatenated, against the members as corpus.
    /// `None` when the collection has no documents.
    pub fn statistics_for_collection(&self, collection: &Collection) -> Option<Vec<TermStat>> {
        if collection.is_empty() {
            return None;
        }
        let combined = collection
            .documents
            .iter()
            .map(|d| d.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        let tokens = filter_stopwords(tokenize(&combined), &self.config.stopwords);
        let stats = self.join(&tokens, &collection.documents);
        tracing::debug!(collection = %collection.id, documents = collection.documents.len(), terms = stats.len(), "collection statistics");
        Some(stats)
    }

    fn join(&self, tokens: &[String], corpus: &[Document]) -> Vec<TermStat> {
        let corpus_tokens: Vec<Vec<String>> = corpus.iter().map(|d| tokenize(&d.text)).collect();
        let idf = compute_corpus_idf(&corpus_tokens, &self.config.stopwords);
        let tf = compute_term_frequency(tokens);

        let mut stats: Vec<TermStat> = tf
            .into_iter()
            .filter_map(|(word, tf)| {
                let word_idf = *idf.get(&word)?;
                Some(TermStat::new(word, tf, word_idf))
            })
            .collect();
        self.rank(&mut stats);
        stats
    }

    fn rank(&self, stats: &mut Vec<TermStat>) {
        let order = self.config.rank;
        stats.sort_by(|a, b| order.compare(a, b));
        stats.truncate(self.config.top_k);
    }
}

/// [`TfIdfEngine::statistics_for_document`] with the default configuration.
pub fn statistics_for_document(target: &Document, corpus: &[Document]) -> Vec<TermStat> {
    TfIdfEngine::default().statistics_for_document(target, corpus)
}

/// [`TfIdfEngine::statistics_for_collection`] with the default configuration.
pub fn statistics_for_collection(collection: &Collection) -> Option<Vec<TermStat>> {
    TfIdfEngine::default().statistics_for_collection(collection)
}

/// One row of the per-document table over a batch of texts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorpusRow {
    /// 1-based position of the text in the batch.
    pub doc: usize,
    pub word: String,
    pub tf: f64,
    pub idf: f64,
    pub tfidf: f64,
}

impl CorpusRow {
    pub fn rounded(&self, places: u32) -> Self {
        Self {
            doc: self.doc,
            word: self.word.clone(),
            tf: round_to(self.tf, places),
            idf: round_to(self.idf, places),
            tfidf: round_to(self.tfidf, places),
        }
    }
}

/// Every distinct word of every text with its tf, the batch-wide idf and the
/// product. Sorted by idf descending, then by document, then by word.
pub fn corpus_table(texts: &[String], stopwords: &StopwordSet) -> Vec<CorpusRow> {
    let docs: Vec<Vec<String>> = texts.iter().map(|t| filter_stopwords(tokenize(t), stopwords)).collect();
    let idf = compute_corpus_idf(&docs, stopwords);

    let mut rows = Vec::new();
    for (i, tokens) in docs.iter().enumerate() {
        for (word, tf) in compute_term_frequency(tokens) {
            let word_idf = idf.get(&word).copied().unwrap_or(0.0);
            rows.push(CorpusRow { doc: i + 1, tfidf: tf * word_idf, word, tf, idf: word_idf });
        }
    }
    rows.sort_by(|a, b| {
        b.idf
            .total_cmp(&a.idf)
            .then_with(|| a.doc.cmp(&b.doc))
            .then_with(|| a.word.cmp(&b.word))
    });
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(s: &str) -> Vec<String> { tokenize(s) }

    #[test]
    fn tf_of_empty_is_empty() {
        assert!(compute_term_frequency(&[]).is_empty());
    }

    #[test]
    fn tf_counts_fraction() {
        let tf = compute_term_frequency(&toks("a b a c"));
        assert_eq!(tf["a"], 0.5);
        assert_eq!(tf["b"], 0.25);
    }

    #[test]
    fn idf_excludes_stopwords() {
        let idf = compute_corpus_idf(&[toks("the cat sat"), toks("the dog sat")], &StopwordSet::default());
        assert!(!idf.contains_key("the"));
        assert_eq!(idf["sat"], 0.0);
        assert!((idf["cat"] - 1.5f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn tie_break_is_by_word() {
        let doc = Document::new("d", "zeta alpha mid");
        let stats = statistics_for_document(&doc, &[doc.clone()]);
        let words: Vec<&str> = stats.iter().map(|s| s.word.as_str()).collect();
        assert_eq!(words, vec!["alpha", "mid", "zeta"]);
    }

    #[test]
    fn corpus_table_orders_by_idf() {
        let rows = corpus_table(&["cat sat".to_string(), "dog sat".to_string()], &StopwordSet::default());
        assert_eq!(rows.len(), 4);
        assert_eq!((rows[0].doc, rows[0].word.as_str()), (1, "cat"));
        assert_eq!((rows[1].doc, rows[1].word.as_str()), (2, "dog"));
        assert_eq!(rows[3].idf, 0.0);
    }
}
