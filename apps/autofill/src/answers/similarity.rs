//! Sequence-alignment similarity for question matching.
//!
//! Implements the Ratcliff/Obershelp "gestalt pattern matching" ratio:
//! find the longest common contiguous block, recurse on both sides of it,
//! and score `2 * M / (len(a) + len(b))` where `M` is the total number of
//! matched characters. This is neither edit distance nor token overlap, and
//! it is what makes "Authorized to work in US?" land close to
//! "Are you authorized to work in the US?".

use std::collections::HashMap;

/// Sequences at least this long get their most frequent characters excluded
/// from the block-seeding index.
const AUTOJUNK_MIN_LEN: usize = 200;

/// Returns a similarity score in `[0.0, 1.0]` between two strings.
///
/// Two empty strings are identical (1.0). Comparison is by Unicode scalar
/// value; callers normalize case and punctuation beforehand.
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }

    let matches = BlockMatcher::new(&a, &b).matching_characters();
    2.0 * matches as f64 / total as f64
}

struct BlockMatcher<'a> {
    a: &'a [char],
    b: &'a [char],
    /// Positions of every character of `b`, ascending.
    b2j: HashMap<char, Vec<usize>>,
}

impl<'a> BlockMatcher<'a> {
    fn new(a: &'a [char], b: &'a [char]) -> Self {
        let mut b2j: HashMap<char, Vec<usize>> = HashMap::new();
        for (j, &c) in b.iter().enumerate() {
            b2j.entry(c).or_default().push(j);
        }

        if b.len() >= AUTOJUNK_MIN_LEN {
            let ntest = b.len() / 100 + 1;
            b2j.retain(|_, positions| positions.len() <= ntest);
        }

        Self { a, b, b2j }
    }

    /// Longest matching block in `a[alo..ahi]` x `b[blo..bhi]`.
    ///
    /// Returns `(i, j, size)`. Ties go to the block starting earliest in `a`,
    /// then earliest in `b`.
    fn find_longest_match(
        &self,
        alo: usize,
        ahi: usize,
        blo: usize,
        bhi: usize,
    ) -> (usize, usize, usize) {
        let (mut best_i, mut best_j, mut best_size) = (alo, blo, 0usize);

        // j2len[j] = length of the match ending at a[i - 1], b[j]
        let mut j2len: HashMap<usize, usize> = HashMap::new();
        for i in alo..ahi {
            let mut next_j2len: HashMap<usize, usize> = HashMap::new();
            if let Some(positions) = self.b2j.get(&self.a[i]) {
                for &j in positions {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let k = j
                        .checked_sub(1)
                        .and_then(|prev| j2len.get(&prev))
                        .copied()
                        .unwrap_or(0)
                        + 1;
                    next_j2len.insert(j, k);
                    if k > best_size {
                        best_i = i + 1 - k;
                        best_j = j + 1 - k;
                        best_size = k;
                    }
                }
            }
            j2len = next_j2len;
        }

        // Characters dropped from the index can still extend a seeded block.
        while best_i > alo && best_j > blo && self.a[best_i - 1] == self.b[best_j - 1] {
            best_i -= 1;
            best_j -= 1;
            best_size += 1;
        }
        while best_i + best_size < ahi
            && best_j + best_size < bhi
            && self.a[best_i + best_size] == self.b[best_j + best_size]
        {
            best_size += 1;
        }

        (best_i, best_j, best_size)
    }

    /// Total number of characters covered by all matching blocks.
    fn matching_characters(&self) -> usize {
        let mut total = 0;
        let mut pending = vec![(0, self.a.len(), 0, self.b.len())];

        while let Some((alo, ahi, blo, bhi)) = pending.pop() {
            let (i, j, k) = self.find_longest_match(alo, ahi, blo, bhi);
            if k == 0 {
                continue;
            }
            total += k;
            if alo < i && blo < j {
                pending.push((alo, i, blo, j));
            }
            if i + k < ahi && j + k < bhi {
                pending.push((i + k, ahi, j + k, bhi));
            }
        }

        total
    }
}
