use crate::config::ChunkerConfig;
use crate::tokenizer::Tokenizer;

/// Split `text` into segments of at most `max_tokens` tokens.
///
/// Lines are accumulated greedily and keep their own terminators, so the
/// concatenation of the returned segments equals `text`. A line too large for
/// the budget on its own is cut into character windows. At least one segment
/// is always returned.
pub fn split_by_tokens(text: &str, max_tokens: usize, tokenizer: &dyn Tokenizer) -> Vec<String> {
    let mut segments = Vec::new();
    let mut buffer = String::new();
    // Sum of per-line counts; the joined buffer is counted once, on flush
    let mut buffer_tokens = 0;

    for line in text.split_inclusive('\n') {
        let line_tokens = tokenizer.count_tokens(line);

        if buffer_tokens + line_tokens <= max_tokens {
            buffer.push_str(line);
            buffer_tokens += line_tokens;
            continue;
        }

        flush(&mut buffer, &mut segments, max_tokens, tokenizer);
        buffer_tokens = 0;

        if line_tokens <= max_tokens {
            buffer.push_str(line);
            buffer_tokens = line_tokens;
        } else {
            log::debug!(
                "Line of {} bytes exceeds {max_tokens} tokens, splitting by characters",
                line.len()
            );
            segments.extend(split_long_line(line, max_tokens, tokenizer));
        }
    }

    flush(&mut buffer, &mut segments, max_tokens, tokenizer);

    if segments.is_empty() {
        segments.push(text.to_string());
    }

    segments
}

/// Emit the buffer as one segment when its real count fits. Tokens can merge
/// across a line break, so an over-budget buffer is re-split line by line.
fn flush(buffer: &mut String, segments: &mut Vec<String>, max_tokens: usize, tokenizer: &dyn Tokenizer) {
    if buffer.is_empty() {
        return;
    }

    let segment = std::mem::take(buffer);
    if tokenizer.count_tokens(&segment) <= max_tokens {
        segments.push(segment);
    } else {
        segments.extend(split_recounting(&segment, max_tokens, tokenizer));
    }
}

/// Greedy line accumulation that counts every candidate in full
fn split_recounting(text: &str, max_tokens: usize, tokenizer: &dyn Tokenizer) -> Vec<String> {
    let mut segments = Vec::new();
    let mut buffer = String::new();

    for line in text.split_inclusive('\n') {
        let mut candidate = String::with_capacity(buffer.len() + line.len());
        candidate.push_str(&buffer);
        candidate.push_str(line);

        if tokenizer.count_tokens(&candidate) <= max_tokens {
            buffer = candidate;
            continue;
        }

        if !buffer.is_empty() {
            segments.push(std::mem::take(&mut buffer));
        }

        if tokenizer.count_tokens(line) <= max_tokens {
            buffer.push_str(line);
        } else {
            segments.extend(split_long_line(line, max_tokens, tokenizer));
        }
    }

    if !buffer.is_empty() {
        segments.push(buffer);
    }

    segments
}

/// Cut one line into character windows that fit the budget. The window starts
/// at [`ChunkerConfig::long_line_window`] and is halved while a piece is still
/// too large.
fn split_long_line(line: &str, max_tokens: usize, tokenizer: &dyn Tokenizer) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut window = ChunkerConfig::with_max_tokens(max_tokens).long_line_window();
    let mut rest = line;

    while !rest.is_empty() {
        let mut end = byte_offset_of_char(rest, window);
        while window > 1 && tokenizer.count_tokens(&rest[..end]) > max_tokens {
            window = (window / 2).max(1);
            end = byte_offset_of_char(rest, window);
        }

        pieces.push(rest[..end].to_string());
        rest = &rest[end..];
    }

    pieces
}

/// Byte offset just past the first `chars` characters of `text`
fn byte_offset_of_char(text: &str, chars: usize) -> usize {
    text.char_indices()
        .nth(chars)
        .map_or(text.len(), |(offset, _)| offset)
}
