//! End-to-end pipeline tests with a deterministic mock lexer.

use sidediff::{
    render_diff, FoldOptions, LineClass, Lexer, RenderPair, Segment, Side, SyntectLexer, Token,
};

/// Minimal word lexer: alphanumeric runs become `variable` tokens, everything
/// else is emitted byte-for-byte as `text`. Reconstructs its input exactly.
struct WordLexer;

impl Lexer for WordLexer {
    fn tokenize(&self, text: &str) -> Vec<Token> {
        let mut tokens = Vec::new();
        let mut word = String::new();
        for ch in text.chars() {
            if ch.is_alphanumeric() || ch == '_' {
                word.push(ch);
            } else {
                if !word.is_empty() {
                    tokens.push(Token::new("variable", std::mem::take(&mut word)));
                }
                tokens.push(Token::new("text", ch.to_string()));
            }
        }
        if !word.is_empty() {
            tokens.push(Token::new("variable", word));
        }
        tokens
    }
}

fn all_pairs(segments: &[Segment]) -> Vec<&RenderPair> {
    segments.iter().flat_map(|s| s.pairs().iter()).collect()
}

/// Rebuild one side's text from its non-placeholder render lines.
fn reconstruct(segments: &[Segment], side: Side) -> String {
    let mut lines = Vec::new();
    for (left, right) in all_pairs(segments).into_iter().cloned() {
        let line = match side {
            Side::Left => left,
            Side::Right => right,
        };
        if line.lineno.is_some() {
            let text: String = line.spans.iter().map(|s| s.text.as_str()).collect();
            lines.push(text);
        }
    }
    lines.join("\n")
}

#[test]
fn three_line_scenario() {
    let options = FoldOptions::default();
    let segments = render_diff("a\nb\nc\n", "a\nx\nc\n", &WordLexer, &options).unwrap();

    let pairs = all_pairs(&segments);
    assert_eq!(pairs.len(), 3);

    assert_eq!(pairs[0].0.class, LineClass::Unchanged);
    assert_eq!(pairs[1].0.class, LineClass::Change);
    assert_eq!(pairs[1].1.class, LineClass::Change);
    assert_eq!(pairs[2].0.class, LineClass::Unchanged);

    // Too short to fold with the defaults: everything stays visible.
    assert!(segments.iter().all(|s| matches!(s, Segment::Visible(_))));
}

#[test]
fn identical_texts_are_one_unchanged_run() {
    let text = "fn main() {\n    body();\n}\n";
    let options = FoldOptions::default();
    let segments = render_diff(text, text, &WordLexer, &options).unwrap();

    for (left, right) in all_pairs(&segments) {
        assert_eq!(left.class, LineClass::Unchanged);
        assert_eq!(right.class, LineClass::Unchanged);
    }
    assert_eq!(
        segments
            .iter()
            .filter(|s| matches!(s, Segment::Folded(_)))
            .count(),
        0
    );
}

#[test]
fn reconstruction_invariant_per_side() {
    let old = "alpha beta\ngamma\ndelta epsilon\n";
    let new = "alpha zeta\ngamma\ninserted\ndelta epsilon\n";
    let options = FoldOptions::default();
    let segments = render_diff(old, new, &WordLexer, &options).unwrap();

    assert_eq!(reconstruct(&segments, Side::Left), old.trim_end_matches('\n'));
    assert_eq!(reconstruct(&segments, Side::Right), new.trim_end_matches('\n'));
}

#[test]
fn pairing_invariant_with_inserts_and_deletes() {
    let old = "keep\ngone\nkeep2\n";
    let new = "keep\nkeep2\nadded\n";
    let options = FoldOptions::default();
    let segments = render_diff(old, new, &WordLexer, &options).unwrap();

    let pairs = all_pairs(&segments);
    let left_count = pairs.iter().filter(|(l, _)| l.side == Side::Left).count();
    let right_count = pairs.iter().filter(|(_, r)| r.side == Side::Right).count();
    assert_eq!(left_count, right_count);

    // Placeholders carry the insert class and no spans.
    let placeholder = pairs
        .iter()
        .find(|(l, _)| l.lineno.is_none())
        .expect("insertion should produce a left placeholder pair");
    assert_eq!(placeholder.0.class, LineClass::Insert);
    assert!(placeholder.0.spans.is_empty());
}

#[test]
fn word_change_spans_only_inside_changed_region() {
    let options = FoldOptions::default();
    let segments = render_diff("foo bar baz\n", "foo qux baz\n", &WordLexer, &options).unwrap();

    let pairs = all_pairs(&segments);
    let (left, right) = pairs[0];
    assert_eq!(left.class, LineClass::Change);

    let changed_left: String = left
        .spans
        .iter()
        .filter(|s| s.word_change)
        .map(|s| s.text.as_str())
        .collect();
    let changed_right: String = right
        .spans
        .iter()
        .filter(|s| s.word_change)
        .map(|s| s.text.as_str())
        .collect();
    assert_eq!(changed_left, "bar");
    assert_eq!(changed_right, "qux");
}

#[test]
fn long_unchanged_run_folds_around_a_change() {
    let mut old = String::new();
    for i in 0..20 {
        old.push_str(&format!("line {i}\n"));
    }
    let new = old.replace("line 0\n", "line zero\n");

    let options = FoldOptions {
        context_len: 2,
        fold_min: 3,
    };
    let segments = render_diff(&old, &new, &WordLexer, &options).unwrap();

    // One changed pair, then an unchanged run of 19: 2 context pairs stay
    // visible on each side and the middle 15 fold.
    let folded: Vec<_> = segments
        .iter()
        .filter_map(|s| match s {
            Segment::Folded(group) => Some(group),
            _ => None,
        })
        .collect();
    assert_eq!(folded.len(), 1);
    assert!(folded[0].collapsed);
    assert_eq!(folded[0].pairs.len(), 19 - 2 * 2);

    // Fold coverage: nothing dropped, duplicated or reordered.
    let flattened = all_pairs(&segments);
    assert_eq!(flattened.len(), 20);
    let linenos: Vec<Option<u32>> = flattened.iter().map(|(l, _)| l.lineno).collect();
    assert_eq!(linenos, (1..=20).map(Some).collect::<Vec<_>>());
}

#[test]
fn syntect_lexer_drives_the_pipeline() {
    let old = "fn main() {\n    println!(\"old\");\n}\n";
    let new = "fn main() {\n    println!(\"new\");\n}\n";
    let lexer = SyntectLexer::for_file("main.rs");
    let options = FoldOptions::default();
    let segments = render_diff(old, new, &lexer, &options).unwrap();

    assert_eq!(reconstruct(&segments, Side::Left), old.trim_end_matches('\n'));
    assert_eq!(reconstruct(&segments, Side::Right), new.trim_end_matches('\n'));

    let pairs = all_pairs(&segments);
    assert_eq!(pairs[1].0.class, LineClass::Change);
}

#[test]
fn mismatching_lexer_is_rejected() {
    struct BrokenLexer;
    impl Lexer for BrokenLexer {
        fn tokenize(&self, _text: &str) -> Vec<Token> {
            vec![Token::new("text", "unrelated")]
        }
    }

    let options = FoldOptions::default();
    let err = render_diff("a\n", "a\n", &BrokenLexer, &options).unwrap_err();
    assert!(matches!(
        err,
        sidediff::DiffError::LexTextMismatch { side: Side::Left, .. }
    ));
}

#[test]
fn segments_serialize_for_the_presentation_layer() {
    let options = FoldOptions::default();
    let segments = render_diff("a\n", "b\n", &WordLexer, &options).unwrap();
    let json = serde_json::to_string(&segments).unwrap();
    assert!(json.contains("\"class\""));
    assert!(json.contains("\"spans\""));
}
