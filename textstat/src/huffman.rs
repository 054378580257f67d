use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::{BTreeMap, BinaryHeap, HashMap};

/// Encoded text plus the prefix code used to produce it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HuffmanResult {
    /// Concatenated codes as a string of `'0'`/`'1'`.
    pub encoded: String,
    pub codes: BTreeMap<char, String>,
}

enum Node {
    Leaf(char),
    Internal { zero: usize, one: usize },
}

/// Build a Huffman code over the characters of `text` and encode it.
///
/// Nodes live in an arena; their index doubles as the creation sequence
/// number. Leaves are created in ascending character order and the heap is
/// keyed by `(frequency, index)`, so equal frequencies always pop in the same
/// order and the same text always gets the same codes.
pub fn huffman_encode(text: &str) -> HuffmanResult {
    let mut freq: BTreeMap<char, u64> = BTreeMap::new();
    for c in text.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }
    if freq.is_empty() {
        return HuffmanResult::default();
    }

    let mut nodes: Vec<Node> = Vec::with_capacity(freq.len() * 2);
    let mut heap: BinaryHeap<Reverse<(u64, usize)>> = BinaryHeap::with_capacity(freq.len());
    for (&c, &count) in freq.iter() {
        heap.push(Reverse((count, nodes.len())));
        nodes.push(Node::Leaf(c));
    }

    while heap.len() > 1 {
        let (Some(Reverse((f0, zero))), Some(Reverse((f1, one)))) = (heap.pop(), heap.pop()) else {
            break;
        };
        heap.push(Reverse((f0 + f1, nodes.len())));
        nodes.push(Node::Internal { zero, one });
    }
    let root = match heap.pop() {
        Some(Reverse((_, idx))) => idx,
        None => return HuffmanResult::default(),
    };

    let mut codes: BTreeMap<char, String> = BTreeMap::new();
    let mut stack: Vec<(usize, String)> = vec![(root, String::new())];
    while let Some((idx, path)) = stack.pop() {
        match nodes[idx] {
            // a lone leaf at the root still needs one bit
            Node::Leaf(c) => { codes.insert(c, if path.is_empty() { "0".to_string() } else { path }); }
            Node::Internal { zero, one } => {
                stack.push((one, format!("{path}1")));
                stack.push((zero, format!("{path}0")));
            }
        }
    }

    let mut encoded = String::new();
    for c in text.chars() {
        if let Some(code) = codes.get(&c) { encoded.push_str(code); }
    }
    tracing::debug!(symbols = codes.len(), chars = text.chars().count(), bits = encoded.len(), "huffman encoded");
    HuffmanResult { encoded, codes }
}

impl HuffmanResult {
    /// Reconstruct the source text by reading `encoded` bit by bit and
    /// emitting a character whenever the buffered bits form a code.
    pub fn decode(&self) -> Result<String> {
        let table: HashMap<&str, char> = self.codes.iter().map(|(c, code)| (code.as_str(), *c)).collect();
        let longest = self.codes.values().map(String::len).max().unwrap_or(0);

        let mut out = String::new();
        let mut bits = String::with_capacity(longest);
        for (offset, bit) in self.encoded.chars().enumerate() {
            if bit != '0' && bit != '1' {
                bail!("invalid bit {bit:?} at offset {offset}");
            }
            bits.push(bit);
            if let Some(c) = table.get(bits.as_str()) {
                out.push(*c);
                bits.clear();
            } else if bits.len() >= longest {
                bail!("no code matches bits {bits:?} ending at offset {offset}");
            }
        }
        if !bits.is_empty() {
            bail!("dangling bits {bits:?} at end of input");
        }
        Ok(out)
    }

    pub fn encoded_bits(&self) -> usize { self.encoded.len() }

    /// Encoded size over the source's UTF-8 size, both in bits.
    /// `None` for the empty result.
    pub fn compression_ratio(&self, source: &str) -> Option<f64> {
        if source.is_empty() {
            return None;
        }
        Some(self.encoded_bits() as f64 / (source.len() * 8) as f64)
    }
}
