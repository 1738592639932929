use crate::core::models::key_type::KeyType;

/// A public key entry in an `authorized_keys` file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKey {
    pub key_type: KeyType,
    /// The line exactly as it appears in the file.
    pub raw: String,
}

impl PublicKey {
    /// Parse a line whose first token is an accepted key type.
    pub fn parse(raw: &str) -> Option<Self> {
        let key_type = KeyType::of_line(raw)?;
        Some(Self {
            key_type,
            raw: raw.to_string(),
        })
    }

    /// The base64 blob (second column), if present.
    pub fn payload(&self) -> Option<&str> {
        self.raw.split_whitespace().nth(1)
    }

    /// Trailing comment, usually `user@host`.
    pub fn comment(&self) -> Option<String> {
        let rest: Vec<&str> = self.raw.split_whitespace().skip(2).collect();
        if rest.is_empty() {
            None
        } else {
            Some(rest.join(" "))
        }
    }
}

/// Represents any line in an `authorized_keys` file.
///
/// Every variant keeps the original text so that untouched lines are
/// written back byte-for-byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    /// A key whose first column is an accepted key type.
    Key(PublicKey),
    /// A comment line (e.g. `# deploy keys`).
    Comment(String),
    /// An empty or whitespace-only line.
    Blank(String),
    /// Anything else: option-prefixed keys, unsupported algorithms.
    Other(String),
}

impl Line {
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Line::Blank(raw.to_string());
        }
        if trimmed.starts_with('#') {
            return Line::Comment(raw.to_string());
        }
        match PublicKey::parse(raw) {
            Some(key) => Line::Key(key),
            None => Line::Other(raw.to_string()),
        }
    }

    pub fn raw(&self) -> &str {
        match self {
            Line::Key(key) => &key.raw,
            Line::Comment(s) | Line::Blank(s) | Line::Other(s) => s,
        }
    }
}

/// The parsed contents of an `authorized_keys` file.
///
/// Lines are only ever appended; existing ones keep their order and text.
/// A CRLF file keeps its `\r` inside each line record, and appended keys
/// follow the same convention.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorizedKeys {
    pub lines: Vec<Line>,
    crlf: bool,
}

impl AuthorizedKeys {
    pub fn parse(content: &str) -> Self {
        let lines = content
            .split_inclusive('\n')
            .map(|l| Line::parse(l.strip_suffix('\n').unwrap_or(l)))
            .collect();
        Self {
            lines,
            crlf: content.contains("\r\n"),
        }
    }

    /// True if any existing line equals `line` once both are trimmed.
    pub fn contains_line(&self, line: &str) -> bool {
        let needle = line.trim();
        self.lines.iter().any(|l| l.raw().trim() == needle)
    }

    /// Append a key line, terminated the way the rest of the file is.
    pub fn push(&mut self, mut key: PublicKey) {
        if self.crlf && !key.raw.ends_with('\r') {
            key.raw.push('\r');
        }
        self.lines.push(Line::Key(key));
    }

    /// Iterates over only the key entries, skipping comments and blanks.
    pub fn keys(&self) -> impl Iterator<Item = &PublicKey> {
        self.lines.iter().filter_map(|line| match line {
            Line::Key(key) => Some(key),
            _ => None,
        })
    }

    /// Serialize back to file content, one line per record, newline-terminated.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            out.push_str(line.raw());
            out.push('\n');
        }
        out
    }
}
