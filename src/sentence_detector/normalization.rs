// WHY: standalone normalization for rendered sentence text
// Spans keep exact offsets; only the line-oriented CLI output is normalized

/// Collapse every whitespace run (including `\r\n` and tabs) into one space and trim
pub fn normalize_sentence(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    normalize_sentence_into(text, &mut result);
    result
}

/// Normalize into a caller-owned buffer so it can be reused across sentences
pub fn normalize_sentence_into(text: &str, buffer: &mut String) {
    buffer.clear();
    buffer.reserve(text.len());

    for (i, word) in text.split_whitespace().enumerate() {
        if i > 0 {
            buffer.push(' ');
        }
        buffer.push_str(word);
    }
}
