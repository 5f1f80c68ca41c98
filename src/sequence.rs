//! Matching-block decomposition between two token sequences.
//!
//! Finds the longest common contiguous run, then recurses on the unmatched
//! parts to its left and right. The blocks come out ordered by their
//! position in the first sequence and never overlap.

use std::collections::HashMap;
use std::hash::Hash;

use crate::models::MatchedSequence;
use crate::tokenize::tokenize;

/// Default minimum length (in tokens) for a matched sequence.
pub const DEFAULT_MIN_MATCH_LENGTH: usize = 5;

/// Sequences shorter than this never have popular tokens junked.
const AUTOJUNK_MIN_LEN: usize = 200;

/// `a[a..a + size] == b[b..b + size]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct MatchingBlock {
    pub a: usize,
    pub b: usize,
    pub size: usize,
}

/// Block matcher over two sequences.
///
/// Positions of every element of `b` are indexed up front. With `autojunk`,
/// elements that make up more than 1% of a long `b` are left out of the
/// index: they cannot seed a match but a match can still grow across them.
pub struct BlockMatcher<'s, T> {
    a: &'s [T],
    b: &'s [T],
    b2j: HashMap<&'s T, Vec<usize>>,
}

impl<'s, T: Eq + Hash> BlockMatcher<'s, T> {
    pub fn new(a: &'s [T], b: &'s [T], autojunk: bool) -> Self {
        let mut b2j: HashMap<&T, Vec<usize>> = HashMap::new();
        for (j, elt) in b.iter().enumerate() {
            b2j.entry(elt).or_default().push(j);
        }

        if autojunk && b.len() >= AUTOJUNK_MIN_LEN {
            let ntest = b.len() / 100 + 1;
            b2j.retain(|_, positions| positions.len() <= ntest);
        }

        Self { a, b, b2j }
    }

    /// Longest block inside `a[alo..ahi]` and `b[blo..bhi]`.
    ///
    /// Ties go to the block starting earliest in `a`, then earliest in `b`.
    /// Returns a block of size 0 when nothing matches.
    pub fn find_longest_match(
        &self,
        alo: usize,
        ahi: usize,
        blo: usize,
        bhi: usize,
    ) -> MatchingBlock {
        let (a, b) = (self.a, self.b);
        let mut best_i = alo;
        let mut best_j = blo;
        let mut best_size = 0usize;

        // j2len[j] = length of the longest match ending at a[i - 1], b[j]
        let mut j2len: HashMap<usize, usize> = HashMap::new();

        for i in alo..ahi {
            let mut new_j2len: HashMap<usize, usize> = HashMap::new();
            if let Some(positions) = self.b2j.get(&a[i]) {
                for &j in positions {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let prev = if j > 0 {
                        j2len.get(&(j - 1)).copied().unwrap_or(0)
                    } else {
                        0
                    };
                    let k = prev + 1;
                    new_j2len.insert(j, k);
                    if k > best_size {
                        best_i = i + 1 - k;
                        best_j = j + 1 - k;
                        best_size = k;
                    }
                }
            }
            j2len = new_j2len;
        }

        // Grow across elements the index left out
        while best_i > alo && best_j > blo && a[best_i - 1] == b[best_j - 1] {
            best_i -= 1;
            best_j -= 1;
            best_size += 1;
        }
        while best_i + best_size < ahi
            && best_j + best_size < bhi
            && a[best_i + best_size] == b[best_j + best_size]
        {
            best_size += 1;
        }

        MatchingBlock {
            a: best_i,
            b: best_j,
            size: best_size,
        }
    }

    /// All matching blocks in ascending order, adjacent blocks merged.
    ///
    /// The last entry is always the sentinel `(len(a), len(b), 0)`.
    pub fn matching_blocks(&self) -> Vec<MatchingBlock> {
        let (la, lb) = (self.a.len(), self.b.len());

        let mut queue = vec![(0usize, la, 0usize, lb)];
        let mut blocks = Vec::new();

        while let Some((alo, ahi, blo, bhi)) = queue.pop() {
            let block = self.find_longest_match(alo, ahi, blo, bhi);
            if block.size == 0 {
                continue;
            }
            blocks.push(block);
            if alo < block.a && blo < block.b {
                queue.push((alo, block.a, blo, block.b));
            }
            if block.a + block.size < ahi && block.b + block.size < bhi {
                queue.push((block.a + block.size, ahi, block.b + block.size, bhi));
            }
        }

        blocks.sort();

        let mut merged: Vec<MatchingBlock> = Vec::with_capacity(blocks.len() + 1);
        for block in blocks {
            match merged.last_mut() {
                Some(last) if last.a + last.size == block.a && last.b + last.size == block.b => {
                    last.size += block.size;
                }
                _ => merged.push(block),
            }
        }

        merged.push(MatchingBlock {
            a: la,
            b: lb,
            size: 0,
        });
        merged
    }
}

/// Common word sequences between two texts, at least `min_match_length`
/// tokens long, ordered by position in `text_a`.
pub fn find_common_sequences(
    text_a: &str,
    text_b: &str,
    min_match_length: usize,
) -> Vec<MatchedSequence> {
    let tokens_a = tokenize(text_a);
    let tokens_b = tokenize(text_b);
    common_sequences_from_tokens(&tokens_a, &tokens_b, min_match_length, true)
}

/// Same as [`find_common_sequences`] over already tokenized input.
pub fn common_sequences_from_tokens(
    tokens_a: &[String],
    tokens_b: &[String],
    min_match_length: usize,
    autojunk: bool,
) -> Vec<MatchedSequence> {
    let matcher = BlockMatcher::new(tokens_a, tokens_b, autojunk);

    matcher
        .matching_blocks()
        .into_iter()
        .filter(|block| block.size > 0 && block.size >= min_match_length)
        .map(|block| MatchedSequence {
            text: tokens_a[block.a..block.a + block.size].join(" "),
            length: block.size,
            position: block.a,
        })
        .collect()
}
