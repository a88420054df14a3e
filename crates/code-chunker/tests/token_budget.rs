use pretty_assertions::assert_eq;
use semigraph_code_chunker::{split_by_tokens, ChunkerConfig, TokenAwareChunker, Tokenizer, MAX_TOKENS};

/// One token per whitespace-separated word
struct WordTokenizer;

impl Tokenizer for WordTokenizer {
    fn count_tokens(&self, text: &str) -> usize {
        text.split_whitespace().count()
    }
}

fn body_of_single_char_tokens(lines: usize, tokens_per_line: usize) -> String {
    let line = vec!["x"; tokens_per_line].join(" ");
    vec![line; lines].join("\n")
}

#[test]
fn forty_thousand_tokens_make_two_segments() {
    let body = body_of_single_char_tokens(400, 100);
    assert_eq!(WordTokenizer.count_tokens(&body), 40_000);

    let segments = split_by_tokens(&body, MAX_TOKENS, &WordTokenizer);

    assert_eq!(segments.len(), 2);
    assert_eq!(WordTokenizer.count_tokens(&segments[0]), 32_000);
    assert_eq!(WordTokenizer.count_tokens(&segments[1]), 8_000);
    assert!(segments.iter().all(|s| WordTokenizer.count_tokens(s) <= MAX_TOKENS));
    assert_eq!(segments.concat(), body);
}

#[test]
fn segments_round_trip_under_any_budget() {
    let body = "class A {\r\n  void f() {\n\n    call(1, 2);\n  }\r\n}\n// trailing";
    for budget in 1..=12 {
        let segments = split_by_tokens(body, budget, &WordTokenizer);
        assert_eq!(segments.concat(), body, "budget {budget}");
        for segment in &segments {
            assert!(
                WordTokenizer.count_tokens(segment) <= budget,
                "segment {segment:?} over budget {budget}"
            );
        }
    }
}

#[test]
fn chunker_file_fallback_respects_budget() {
    let chunker = TokenAwareChunker::new(ChunkerConfig::with_max_tokens(250), WordTokenizer).unwrap();
    let text = body_of_single_char_tokens(10, 100);
    let chunks = chunker.chunk_file("big.txt", &text);

    assert_eq!(chunks.len(), 5);
    let rebuilt: String = chunks.iter().map(|c| c.content.as_str()).collect();
    assert_eq!(rebuilt, text);
    assert_eq!(chunks[4].chunk_id, "big.txt::::::5/5");
}
