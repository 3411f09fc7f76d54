//! Splitting a single line into chunks that fit the character budget

/// How over-long lines are broken into fragments
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum WrapMode {
    /// Hard slicing every `max_chars` characters, mid-word if need be
    #[default]
    Naive,
    /// Break at the last whitespace inside the budget. Words longer than the
    /// budget are still sliced.
    WordAware,
}

/// Split `line` into chunks of at most `max_chars` characters.
///
/// Counts Unicode scalar values, never bytes. An empty line yields no chunks.
pub fn wrap_line(line: &str, max_chars: usize, mode: WrapMode) -> Vec<String> {
    debug_assert!(max_chars > 0);
    match mode {
        WrapMode::Naive => slice_chars(line, max_chars),
        WrapMode::WordAware => wrap_words(line, max_chars),
    }
}

fn slice_chars(line: &str, max_chars: usize) -> Vec<String> {
    let chars: Vec<char> = line.chars().collect();
    chars
        .chunks(max_chars)
        .map(|chunk| chunk.iter().collect())
        .collect()
}

fn wrap_words(line: &str, max_chars: usize) -> Vec<String> {
    // no word to break at; the line still has to keep its slots
    if line.chars().all(char::is_whitespace) {
        return slice_chars(line, max_chars);
    }

    let mut chunks = Vec::new();
    let mut rest: Vec<char> = line.chars().collect();

    while !rest.is_empty() {
        if rest.len() <= max_chars {
            chunks.push(rest.iter().collect());
            break;
        }

        // the character right after the budget decides whether the cut lands
        // between two words already
        let cut = if rest[max_chars].is_whitespace() {
            max_chars
        } else {
            match rest[..max_chars].iter().rposition(|c| c.is_whitespace()) {
                Some(pos) if rest[..pos].iter().any(|c| !c.is_whitespace()) => pos,
                _ => max_chars,
            }
        };

        let chunk: String = rest[..cut].iter().collect();
        let trimmed = chunk.trim_end();
        if !trimmed.is_empty() {
            chunks.push(trimmed.to_string());
        }

        let skip = rest[cut..]
            .iter()
            .take_while(|c| c.is_whitespace())
            .count();
        rest.drain(..cut + skip);
    }

    chunks
}
