//! Code fence tracking for directive parsing.
//!
//! Directive syntax (`:::`) inside fenced code blocks is code, not a directive.

/// Tracks code fence state during line-by-line processing.
///
/// Code fences in `CommonMark` can use backticks or tildes (three or more).
/// The closing fence must use the same character and be at least as long
/// as the opening fence.
#[derive(Debug, Default)]
pub(crate) struct FenceTracker {
    /// Character used for the current fence (backtick or tilde).
    fence_char: Option<char>,
    /// Length of the opening fence (minimum length for closing).
    fence_len: usize,
}

/// What a line did to the fence state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FenceLine<'a> {
    /// Opening fence with its info string (possibly empty).
    Open(&'a str),
    /// Closing fence.
    Close,
    /// Line inside a fenced block.
    Inside,
    /// Line outside any fenced block.
    Outside,
}

impl FenceTracker {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Update fence state based on a line.
    pub(crate) fn update<'a>(&mut self, line: &'a str) -> FenceLine<'a> {
        let trimmed = line.trim_start();

        if let Some(fence_char) = self.fence_char {
            if is_fence_line(trimmed, fence_char, self.fence_len) {
                self.fence_char = None;
                self.fence_len = 0;
                return FenceLine::Close;
            }
            FenceLine::Inside
        } else if let Some((ch, len)) = detect_fence(trimmed) {
            self.fence_char = Some(ch);
            self.fence_len = len;
            FenceLine::Open(trimmed[len..].trim())
        } else {
            FenceLine::Outside
        }
    }
}

/// Detect if a line starts a code fence.
///
/// Returns the fence character and length if found.
fn detect_fence(trimmed: &str) -> Option<(char, usize)> {
    let first = trimmed.chars().next()?;
    if first != '`' && first != '~' {
        return None;
    }

    let count = trimmed.chars().take_while(|&c| c == first).count();
    // Backtick fences cannot have backticks in the info string
    if count >= 3 && !(first == '`' && trimmed[count..].contains('`')) {
        Some((first, count))
    } else {
        None
    }
}

/// Check if a line is a valid closing fence.
///
/// Same character as the opening, at least as long, and nothing but
/// whitespace after the fence characters.
fn is_fence_line(trimmed: &str, expected_char: char, min_len: usize) -> bool {
    let first = match trimmed.chars().next() {
        Some(c) if c == expected_char => c,
        _ => return false,
    };

    let count = trimmed.chars().take_while(|&c| c == first).count();
    if count < min_len {
        return false;
    }

    trimmed[count..].chars().all(char::is_whitespace)
}
