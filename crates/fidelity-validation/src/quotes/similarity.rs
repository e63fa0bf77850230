//! Character-sequence similarity.

use std::collections::HashMap;

/// `2 * M / T`, where `M` is the longest common subsequence of the two
/// character sequences and `T` their combined length. Two empty strings
/// are identical (1.0).
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    ratio_of(&a, &b)
}

pub(crate) fn ratio_of(a: &[char], b: &[char]) -> f64 {
    ratio_from_lcs(lcs_len(a, b), a.len(), b.len())
}

/// `2 * lcs / (a_len + b_len)`, 1.0 when both are empty.
pub(crate) fn ratio_from_lcs(lcs: usize, a_len: usize, b_len: usize) -> f64 {
    let total = a_len + b_len;
    if total == 0 {
        return 1.0;
    }
    2.0 * lcs as f64 / total as f64
}

/// Longest common subsequence length, two rolling rows.
pub(crate) fn lcs_len(a: &[char], b: &[char]) -> usize {
    let (long, short) = if a.len() >= b.len() { (a, b) } else { (b, a) };
    if short.is_empty() {
        return 0;
    }
    let mut prev = vec![0usize; short.len() + 1];
    let mut curr = vec![0usize; short.len() + 1];
    for &x in long {
        for (k, &y) in short.iter().enumerate() {
            curr[k + 1] = if x == y {
                prev[k] + 1
            } else {
                curr[k].max(prev[k + 1])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[short.len()]
}

/// A fixed pattern prepared for bit-parallel LCS (Hyyrö's row update,
/// one bit per pattern char, 64 chars per word).
#[derive(Debug, Clone)]
pub(crate) struct LcsPattern {
    len: usize,
    words: usize,
    /// `words` match bits per distinct pattern char, row-major.
    masks: Vec<u64>,
    rows: HashMap<char, usize>,
}

impl LcsPattern {
    pub(crate) fn new(pattern: &[char]) -> Self {
        let words = pattern.len().div_ceil(64).max(1);
        let mut rows: HashMap<char, usize> = HashMap::new();
        let mut masks = Vec::new();
        for (i, &c) in pattern.iter().enumerate() {
            let row = match rows.get(&c) {
                Some(&row) => row,
                None => {
                    let row = rows.len();
                    rows.insert(c, row);
                    masks.resize((row + 1) * words, 0);
                    row
                }
            };
            masks[row * words + i / 64] |= 1u64 << (i % 64);
        }
        Self {
            len: pattern.len(),
            words,
            masks,
            rows,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// Mask row of `c`; `None` when `c` never occurs in the pattern.
    pub(crate) fn row(&self, c: char) -> Option<usize> {
        self.rows.get(&c).copied()
    }

    pub(crate) fn scanner(&self) -> LcsScanner<'_> {
        LcsScanner {
            pattern: self,
            v: vec![u64::MAX; self.words],
        }
    }
}

/// Running LCS of an [`LcsPattern`] against a text fed one char at a time.
/// After each push, [`LcsScanner::lcs`] is the LCS with the text so far.
#[derive(Debug, Clone)]
pub(crate) struct LcsScanner<'p> {
    pattern: &'p LcsPattern,
    v: Vec<u64>,
}

impl LcsScanner<'_> {
    pub(crate) fn reset(&mut self) {
        self.v.fill(u64::MAX);
    }

    /// Feed one text char, given as its pattern row.
    pub(crate) fn push(&mut self, row: Option<usize>) {
        let Some(row) = row else {
            return;
        };
        let words = self.pattern.words;
        let mask = &self.pattern.masks[row * words..(row + 1) * words];
        let mut carry = false;
        for (v, &m) in self.v.iter_mut().zip(mask) {
            let u = *v & m;
            let (sum, c1) = v.overflowing_add(u);
            let (sum, c2) = sum.overflowing_add(u64::from(carry));
            carry = c1 || c2;
            *v = sum | (*v & !u);
        }
    }

    /// Zero bits of the state within the pattern length.
    pub(crate) fn lcs(&self) -> usize {
        let len = self.pattern.len;
        let ones: u32 = self
            .v
            .iter()
            .enumerate()
            .map(|(k, w)| {
                let live = len.saturating_sub(k * 64).min(64);
                let mask = if live == 64 { u64::MAX } else { (1u64 << live) - 1 };
                (w & mask).count_ones()
            })
            .sum();
        len - ones as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn identical_strings_score_one() {
        assert_eq!(similarity_ratio("abc def", "abc def"), 1.0);
        assert_eq!(similarity_ratio("", ""), 1.0);
    }

    #[test]
    fn disjoint_strings_score_zero() {
        assert_eq!(similarity_ratio("abc", "xyz"), 0.0);
        assert_eq!(similarity_ratio("abc", ""), 0.0);
    }

    #[test]
    fn one_substitution() {
        // LCS 3 of 4+4.
        assert!((similarity_ratio("abcd", "abxd") - 0.75).abs() < 1e-12);
    }

    #[test]
    fn lcs_is_symmetric() {
        let (a, b) = (chars("the quick brown fox"), chars("quick the fox brown"));
        assert_eq!(lcs_len(&a, &b), lcs_len(&b, &a));
    }

    fn scanned_lcs(pattern: &str, text: &str) -> usize {
        let pattern = LcsPattern::new(&chars(pattern));
        let mut scanner = pattern.scanner();
        for c in text.chars() {
            scanner.push(pattern.row(c));
        }
        scanner.lcs()
    }

    #[test]
    fn scanner_agrees_with_the_table() {
        let samples = [
            ("", "abc"),
            ("abc", ""),
            ("abcd", "abxd"),
            ("the quick brown fox", "quick the fox brown"),
            ("aaaa", "aa"),
            ("ab", "babababa"),
        ];
        for (a, b) in samples {
            assert_eq!(scanned_lcs(a, b), lcs_len(&chars(a), &chars(b)), "{a:?} vs {b:?}");
        }
    }

    #[test]
    fn scanner_carries_across_words() {
        let long = "the committee reviewed every submission twice before it published \
                    the final ranking of the candidate projects for the coming year";
        let edited = "the comittee reviewed each submission twice before publishing \
                      a final ranking of candidate projects for next year";
        assert!(long.chars().count() > 128);
        assert_eq!(scanned_lcs(long, edited), lcs_len(&chars(long), &chars(edited)));
        assert_eq!(scanned_lcs(edited, long), lcs_len(&chars(edited), &chars(long)));
        assert_eq!(scanned_lcs(long, long), long.chars().count());
    }

    #[test]
    fn scanner_reports_every_prefix() {
        let pattern = LcsPattern::new(&chars("bravo charlie"));
        let text = chars("alpha bravo charlie delta");
        let mut scanner = pattern.scanner();
        for (k, &c) in text.iter().enumerate() {
            scanner.push(pattern.row(c));
            assert_eq!(scanner.lcs(), lcs_len(&chars("bravo charlie"), &text[..=k]));
        }
        scanner.reset();
        assert_eq!(scanner.lcs(), 0);
    }

    #[test]
    fn ratio_from_lcs_matches_ratio_of() {
        let (a, b) = (chars("kitten"), chars("sitting"));
        assert_eq!(ratio_from_lcs(lcs_len(&a, &b), a.len(), b.len()), ratio_of(&a, &b));
        assert_eq!(ratio_from_lcs(0, 0, 0), 1.0);
    }
}
