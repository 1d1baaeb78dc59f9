use std::fmt::{self, Display, Formatter};

/// Line-break convention of the source being edited. Generated line breaks
/// follow it so a CRLF file stays CRLF.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum LineEnding {
    #[default]
    Lf,
    CrLf,
    Cr,
}

impl LineEnding {
    /// A run of `count` line breaks in this convention.
    pub fn piece(self, count: usize) -> TriviaPiece {
        match self {
            Self::Lf => TriviaPiece::Newlines(count),
            Self::CrLf => TriviaPiece::CarriageReturnLineFeeds(count),
            Self::Cr => TriviaPiece::CarriageReturns(count),
        }
    }
}

/// One atomic piece of non-semantic source text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TriviaPiece {
    /// A run of `' '`.
    Spaces(usize),
    /// A run of `'\t'`.
    Tabs(usize),
    /// A run of `'\n'`.
    Newlines(usize),
    /// A run of lone `'\r'`.
    CarriageReturns(usize),
    /// A run of `"\r\n"`.
    CarriageReturnLineFeeds(usize),
    /// `// ...` up to, not including, the line break.
    LineComment(String),
    /// `/* ... */`, possibly nested and spanning lines.
    BlockComment(String),
    /// Any other character sequence the lexer treats as whitespace
    /// (form feeds, vertical tabs, a byte order mark, a shebang line).
    Unexpected(String),
}

impl TriviaPiece {
    /// Number of line breaks this piece contributes.
    pub fn newline_count(&self) -> usize {
        match self {
            Self::Newlines(n) | Self::CarriageReturns(n) | Self::CarriageReturnLineFeeds(n) => *n,
            Self::BlockComment(text) => text.matches('\n').count(),
            _ => 0,
        }
    }

    /// True for line-break runs.
    pub fn is_newline(&self) -> bool {
        matches!(
            self,
            Self::Newlines(_) | Self::CarriageReturns(_) | Self::CarriageReturnLineFeeds(_)
        )
    }

    pub fn line_ending(&self) -> Option<LineEnding> {
        match self {
            Self::Newlines(_) => Some(LineEnding::Lf),
            Self::CarriageReturnLineFeeds(_) => Some(LineEnding::CrLf),
            Self::CarriageReturns(_) => Some(LineEnding::Cr),
            _ => None,
        }
    }

    /// True for spaces and tabs.
    pub fn is_horizontal_whitespace(&self) -> bool {
        matches!(self, Self::Spaces(_) | Self::Tabs(_))
    }

    /// True for line and block comments.
    pub fn is_comment(&self) -> bool {
        matches!(self, Self::LineComment(_) | Self::BlockComment(_))
    }

    fn write_to(&self, out: &mut String) {
        fn repeat(out: &mut String, s: &str, n: usize) {
            for _ in 0..n {
                out.push_str(s);
            }
        }

        match self {
            Self::Spaces(n) => repeat(out, " ", *n),
            Self::Tabs(n) => repeat(out, "\t", *n),
            Self::Newlines(n) => repeat(out, "\n", *n),
            Self::CarriageReturns(n) => repeat(out, "\r", *n),
            Self::CarriageReturnLineFeeds(n) => repeat(out, "\r\n", *n),
            Self::LineComment(text) | Self::BlockComment(text) | Self::Unexpected(text) => {
                out.push_str(text)
            }
        }
    }

    /// Merge `other` into `self` when both are runs of the same character.
    fn merge(&mut self, other: &TriviaPiece) -> bool {
        match (self, other) {
            (Self::Spaces(a), Self::Spaces(b))
            | (Self::Tabs(a), Self::Tabs(b))
            | (Self::Newlines(a), Self::Newlines(b))
            | (Self::CarriageReturns(a), Self::CarriageReturns(b))
            | (Self::CarriageReturnLineFeeds(a), Self::CarriageReturnLineFeeds(b)) => {
                *a += b;
                true
            }
            _ => false,
        }
    }
}

/// An ordered sequence of trivia pieces owned by one side of a token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Trivia(Vec<TriviaPiece>);

impl Trivia {
    /// Build trivia from pieces, merging adjacent runs of the same kind.
    pub fn new(pieces: impl IntoIterator<Item = TriviaPiece>) -> Self {
        let mut trivia = Self::default();
        for piece in pieces {
            trivia.push(piece);
        }
        trivia
    }

    pub fn spaces(count: usize) -> Self {
        Self::new([TriviaPiece::Spaces(count)])
    }

    pub fn space() -> Self {
        Self::spaces(1)
    }

    pub fn newlines(count: usize) -> Self {
        Self::new([TriviaPiece::Newlines(count)])
    }

    pub fn line_breaks(count: usize, ending: LineEnding) -> Self {
        Self::new([ending.piece(count)])
    }

    /// Append a piece. Zero-length runs are dropped.
    pub fn push(&mut self, piece: TriviaPiece) {
        let empty = match &piece {
            TriviaPiece::Spaces(n)
            | TriviaPiece::Tabs(n)
            | TriviaPiece::Newlines(n)
            | TriviaPiece::CarriageReturns(n)
            | TriviaPiece::CarriageReturnLineFeeds(n) => *n == 0,
            TriviaPiece::LineComment(text)
            | TriviaPiece::BlockComment(text)
            | TriviaPiece::Unexpected(text) => text.is_empty(),
        };
        if empty {
            return;
        }
        if let Some(last) = self.0.last_mut() {
            if last.merge(&piece) {
                return;
            }
        }
        self.0.push(piece);
    }

    pub fn pieces(&self) -> &[TriviaPiece] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Total number of line breaks, including those inside block comments.
    pub fn newline_count(&self) -> usize {
        self.0.iter().map(TriviaPiece::newline_count).sum()
    }

    pub fn contains_newline(&self) -> bool {
        self.newline_count() > 0
    }

    pub fn has_comments(&self) -> bool {
        self.0.iter().any(TriviaPiece::is_comment)
    }

    /// Convention of the first line break in this trivia.
    pub fn line_ending(&self) -> Option<LineEnding> {
        self.0.iter().find_map(TriviaPiece::line_ending)
    }

    /// True when the first non-horizontal-whitespace piece is a line break.
    pub fn starts_with_newline(&self) -> bool {
        self.0
            .iter()
            .find(|piece| !piece.is_horizontal_whitespace())
            .is_some_and(TriviaPiece::is_newline)
    }

    /// True when the trivia contains an empty line: two line breaks with
    /// nothing but horizontal whitespace between them.
    pub fn has_blank_line(&self) -> bool {
        let mut breaks_in_a_row = 0;
        for piece in &self.0 {
            match piece {
                p if p.is_newline() => {
                    breaks_in_a_row += p.newline_count();
                    if breaks_in_a_row >= 2 {
                        return true;
                    }
                }
                p if p.is_horizontal_whitespace() => {}
                _ => breaks_in_a_row = 0,
            }
        }
        false
    }

    /// The horizontal whitespace that follows the last line break, i.e. the
    /// indentation of whatever comes right after this trivia.
    pub fn indentation(&self) -> Trivia {
        let start = self
            .0
            .iter()
            .rposition(|piece| piece.is_newline() || piece.is_comment())
            .map_or(0, |index| index + 1);
        Trivia::new(
            self.0[start..]
                .iter()
                .filter(|piece| piece.is_horizontal_whitespace())
                .cloned(),
        )
    }

    /// Replace the whitespace that precedes the first comment (or all of it,
    /// without comments) with exactly `count` line breaks followed by the
    /// original indentation. Comments and everything after them are kept.
    /// The breaks reuse this trivia's own convention, or `fallback` when it
    /// has no line break.
    pub fn with_leading_newlines(&self, count: usize, fallback: LineEnding) -> Trivia {
        let split = self
            .0
            .iter()
            .position(|piece| !(piece.is_newline() || piece.is_horizontal_whitespace()))
            .unwrap_or(self.0.len());
        let (head, rest) = self.0.split_at(split);
        let indent = Trivia::new(head.iter().cloned()).indentation();

        let ending = self.line_ending().unwrap_or(fallback);
        let mut out = Trivia::line_breaks(count, ending);
        out.extend(indent.0);
        out.extend(rest.iter().cloned());
        out
    }

    /// Drop every horizontal-whitespace piece at the end.
    pub fn trim_end_whitespace(&self) -> Trivia {
        let end = self
            .0
            .iter()
            .rposition(|piece| !piece.is_horizontal_whitespace())
            .map_or(0, |index| index + 1);
        Trivia::new(self.0[..end].iter().cloned())
    }

    /// Drop every whitespace and line-break piece at the end, keeping
    /// comments.
    pub fn trim_end(&self) -> Trivia {
        let end = self
            .0
            .iter()
            .rposition(|piece| !(piece.is_horizontal_whitespace() || piece.is_newline()))
            .map_or(0, |index| index + 1);
        Trivia::new(self.0[..end].iter().cloned())
    }

    /// Concatenate two trivia sequences.
    pub fn concat(&self, other: &Trivia) -> Trivia {
        let mut out = self.clone();
        out.extend(other.0.iter().cloned());
        out
    }

    pub fn text(&self) -> String {
        let mut out = String::new();
        self.write_to(&mut out);
        out
    }

    pub(crate) fn write_to(&self, out: &mut String) {
        for piece in &self.0 {
            piece.write_to(out);
        }
    }
}

impl Extend<TriviaPiece> for Trivia {
    fn extend<I: IntoIterator<Item = TriviaPiece>>(&mut self, iter: I) {
        for piece in iter {
            self.push(piece);
        }
    }
}

impl FromIterator<TriviaPiece> for Trivia {
    fn from_iter<I: IntoIterator<Item = TriviaPiece>>(iter: I) -> Self {
        Self::new(iter)
    }
}

impl Display for Trivia {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text())
    }
}
