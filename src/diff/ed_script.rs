use std::fmt;
use std::sync::LazyLock;
use regex::Regex;
use crate::errors::MatchError;

/// Line-number headers of an ed script, such as `12a`, `12d`, `12,15d`,
/// `12c`, `12,15c`.
static ED_HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<start>\d+)(,(?P<end>\d+))?(?P<kind>[acd])$")
        .expect("ed header pattern is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditKind {
    Insert,
    Change,
    Delete,
}

impl EditKind {
    pub fn as_char(&self) -> char {
        match self {
            Self::Insert => 'a',
            Self::Change => 'c',
            Self::Delete => 'd',
        }
    }

    /// Whether this kind removes lines from the left file.
    pub fn removes_left_lines(&self) -> bool {
        matches!(self, Self::Change | Self::Delete)
    }
}

/// One hunk header of an edit script, numbered in the left file's lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditOperation {
    pub kind: EditKind,
    pub start: usize,
    pub end: Option<usize>,
}

impl EditOperation {
    pub fn new(kind: EditKind, start: usize, end: Option<usize>) -> Self {
        Self { kind, start, end }
    }

    /// Number of left-file lines the header spans.
    ///
    /// Inserts report 1 as well; sum only `removes_left_lines()` kinds when
    /// counting deletions.
    pub fn size(&self) -> usize {
        match self.end {
            None => 1,
            Some(end) => end - self.start + 1,
        }
    }
}

impl fmt::Display for EditOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.end {
            Some(end) => write!(f, "{},{}{}", self.start, end, self.kind.as_char()),
            None => write!(f, "{}{}", self.start, self.kind.as_char()),
        }
    }
}

/// Parse one `N[,M]OP` header line.
pub fn parse_header(line: &str) -> Result<EditOperation, MatchError> {
    let invalid = || MatchError::MalformedEditHeader(line.to_string());

    let caps = ED_HEADER_RE.captures(line.trim()).ok_or_else(invalid)?;

    let start: usize = caps["start"].parse().map_err(|_| invalid())?;
    let end: Option<usize> = match caps.name("end") {
        Some(m) => Some(m.as_str().parse().map_err(|_| invalid())?),
        None => None,
    };

    let kind = match &caps["kind"] {
        "a" => EditKind::Insert,
        "c" => EditKind::Change,
        _ => EditKind::Delete,
    };

    // Appends are single-point insertions and never carry a range
    if kind == EditKind::Insert && end.is_some() {
        return Err(invalid());
    }
    if kind != EditKind::Insert && start == 0 {
        return Err(invalid());
    }
    if let Some(end) = end {
        if end < start {
            return Err(invalid());
        }
    }

    Ok(EditOperation::new(kind, start, end))
}

/// Parse a whole line-numbers-only edit script, skipping blank lines.
pub fn parse_script(output: &str) -> Result<Vec<EditOperation>, MatchError> {
    output
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(parse_header)
        .collect()
}

/// Lines removed from the left file's perspective.
pub fn deleted_lines(ops: &[EditOperation]) -> usize {
    ops.iter()
        .filter(|op| op.kind.removes_left_lines())
        .map(EditOperation::size)
        .sum()
}
