// WHY: Type-safe position wrappers to prevent byte/char confusion
// Token and sentence offsets are chars; string slicing needs bytes

/// 0-based byte position in source text
#[repr(transparent)]
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug)]
pub struct BytePos(pub usize);

/// 0-based character position in source text
#[repr(transparent)]
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug)]
pub struct CharPos(pub usize);

impl From<BytePos> for usize {
    fn from(pos: BytePos) -> Self {
        pos.0
    }
}

impl From<CharPos> for usize {
    fn from(pos: CharPos) -> Self {
        pos.0
    }
}

/// Lookup table from character offsets to byte offsets of one text
///
/// Token and sentence offsets are counted in Unicode scalar values, while
/// `&str` slicing needs byte offsets. The table is built in one pass and
/// answers every lookup in O(1).
#[derive(Debug, Clone)]
pub struct CharIndex<'a> {
    text: &'a str,
    // One entry per char plus a trailing entry equal to `text.len()`
    byte_offsets: Vec<usize>,
}

impl<'a> CharIndex<'a> {
    pub fn new(text: &'a str) -> Self {
        let mut byte_offsets: Vec<usize> = text.char_indices().map(|(byte, _)| byte).collect();
        byte_offsets.push(text.len());
        Self { text, byte_offsets }
    }

    pub fn text(&self) -> &'a str {
        self.text
    }

    /// Number of characters in the text
    pub fn char_len(&self) -> usize {
        self.byte_offsets.len() - 1
    }

    /// Byte position of a character offset; `char_len()` maps to the end of text
    pub fn byte_pos(&self, pos: CharPos) -> Option<BytePos> {
        self.byte_offsets.get(pos.0).copied().map(BytePos)
    }

    /// Character offset of a byte position, if it falls on a char boundary
    pub fn char_pos(&self, pos: BytePos) -> Option<CharPos> {
        self.byte_offsets.binary_search(&pos.0).ok().map(CharPos)
    }

    /// Character at a character offset
    pub fn char_at(&self, pos: usize) -> Option<char> {
        if pos >= self.char_len() {
            return None;
        }
        self.text[self.byte_offsets[pos]..].chars().next()
    }

    /// Slice the half-open character range `start..end`
    pub fn slice(&self, start: usize, end: usize) -> Option<&'a str> {
        if start > end {
            return None;
        }
        let from = self.byte_pos(CharPos(start))?;
        let to = self.byte_pos(CharPos(end))?;
        Some(&self.text[from.0..to.0])
    }
}
