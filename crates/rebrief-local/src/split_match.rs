//! Whole-string snippet matcher.
//!
//! The simpler matcher: no tokenized documents and no normalization. Candidate chunks are runs of
//! whitespace-split summary words re-joined with single spaces, and a chunk counts only if it
//! occurs literally in the original. After each pick, every remaining piece of both texts is split
//! on the chunk. Case or punctuation differences, or irregular whitespace in the summary, make it
//! miss spans that [`crate::highlighting`] finds.

/// Longest literal chunks of `text` found in `original_text`, longest first.
pub fn match_most_text(text: &str, original_text: &str) -> Vec<String> {
    let mut snippets = Vec::new();
    let mut texts = vec![text.to_string()];
    let mut originals = vec![original_text.to_string()];
    while let Some(longest) = find_longest_text(&texts, &originals) {
        texts = split_all(&texts, &longest);
        originals = split_all(&originals, &longest);
        snippets.push(longest);
    }
    snippets
}

fn split_all(pieces: &[String], sep: &str) -> Vec<String> {
    pieces
        .iter()
        .flat_map(|p| p.split(sep).map(str::to_string))
        .collect()
}

/// Longest chunk (in characters) over every (text piece, original piece) pair; first wins ties.
fn find_longest_text(texts: &[String], originals: &[String]) -> Option<String> {
    let mut best: Option<(usize, String)> = None;
    for text in texts {
        for original in originals {
            let Some(chunk) = find_longest_text_single(text, original) else {
                continue;
            };
            let len = chunk.chars().count();
            if best.as_ref().map_or(true, |(best_len, _)| len > *best_len) {
                best = Some((len, chunk));
            }
        }
    }
    best.map(|(_, chunk)| chunk)
}

/// Longest run of at least two words of `text` occurring in `original_text`.
fn find_longest_text_single(text: &str, original_text: &str) -> Option<String> {
    // Generated summaries often put a period between sentences with whitespace on both sides.
    let words: Vec<&str> = text.split_whitespace().filter(|w| *w != ".").collect();
    let n = words.len();
    for span in (1..n).rev() {
        for start in 0..n - span {
            let chunk = words[start..=start + span].join(" ");
            if original_text.contains(&chunk) {
                return Some(chunk);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_punctuation_two_disjoint_spans() {
        let got = match_most_text(
            "quick brown lazy dog",
            "the quick brown fox jumped over the lazy dog",
        );
        assert_eq!(got, vec!["quick brown", "lazy dog"]);
    }

    #[test]
    fn standalone_periods_are_ignored() {
        let got = match_most_text("at one time . Knitted fabric", "at one time . Knitted fabric");
        // The period is dropped from the candidate, so the joined chunk is not literal text.
        assert_eq!(got, vec!["at one time", "Knitted fabric"]);
    }

    #[test]
    fn case_differences_are_not_normalized() {
        assert!(match_most_text("Quick Brown", "the quick brown fox").is_empty());
    }

    #[test]
    fn within_one_piece_leftmost_run_of_a_length_wins() {
        let got = match_most_text("ab cd xyz uvw", "ab cd and xyz uvw");
        assert_eq!(got, vec!["ab cd", "xyz uvw"]);
    }

    #[test]
    fn across_pieces_longest_by_characters_wins() {
        // After "m n o" is cut out, "ab cd" and "xyz uvw" sit in different summary pieces.
        let got = match_most_text("ab cd m n o xyz uvw", "m n o | ab cd | xyz uvw");
        assert_eq!(got, vec!["m n o", "xyz uvw", "ab cd"]);
    }

    #[test]
    fn empty_inputs_match_nothing() {
        assert!(match_most_text("", "a b").is_empty());
        assert!(match_most_text("a b", "").is_empty());
        assert!(match_most_text("a", "a").is_empty());
    }
}
