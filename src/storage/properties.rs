use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::config::Settings;
use crate::models::errors::{ScenarioError, ScenarioResult};

pub const DEFAULT_STORE_COMMENT: &str = "Application Properties";

const WHITESPACE: [char; 3] = [' ', '\t', '\x0c'];

/// Key/value pairs read from or written to a `.properties` file, kept in key
/// order so rendered files are stable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Properties {
    entries: BTreeMap<String, String>,
}

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn get_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).unwrap_or(default)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.entries.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.entries.remove(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn parse(input: &str) -> ScenarioResult<Self> {
        let mut properties = Self::new();
        for (line_no, line) in logical_lines(input) {
            let (raw_key, raw_value) = split_entry(&line);
            let key = unescape(raw_key, line_no)?;
            let value = unescape(raw_value, line_no)?;
            properties.entries.insert(key, value);
        }
        Ok(properties)
    }

    pub fn render(&self, comments: Option<&str>) -> String {
        self.render_at(comments, Utc::now())
    }

    pub fn render_at(&self, comments: Option<&str>, timestamp: DateTime<Utc>) -> String {
        let mut out = String::new();
        if let Some(comments) = comments {
            push_comments(&mut out, comments);
        }
        out.push('#');
        out.push_str(&timestamp.format("%a %b %d %H:%M:%S UTC %Y").to_string());
        out.push('\n');

        for (key, value) in &self.entries {
            out.push_str(&escape(key, true));
            out.push('=');
            out.push_str(&escape(value, false));
            out.push('\n');
        }
        out
    }
}

impl FromIterator<(String, String)> for Properties {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Writes `comments` as `#` lines. Every line break (`\r`, `\n` or `\r\n`)
/// starts a new comment line; lines already opening with `#` or `!` are left
/// as they are, except the first.
fn push_comments(out: &mut String, comments: &str) {
    out.push('#');
    let mut chars = comments.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\r' | '\n' => {
                if c == '\r' && chars.peek() == Some(&'\n') {
                    chars.next();
                }
                out.push('\n');
                if !matches!(chars.peek(), Some('#' | '!')) {
                    out.push('#');
                }
            }
            _ => out.push(c),
        }
    }
    out.push('\n');
}

/// Splits on `\n`, `\r\n` and a lone `\r`.
fn physical_lines(input: &str) -> Vec<&str> {
    let bytes = input.as_bytes();
    let mut lines = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'\n' => {
                lines.push(&input[start..i]);
                i += 1;
                start = i;
            }
            b'\r' => {
                lines.push(&input[start..i]);
                i += 1;
                if bytes.get(i) == Some(&b'\n') {
                    i += 1;
                }
                start = i;
            }
            _ => i += 1,
        }
    }
    if start < input.len() {
        lines.push(&input[start..]);
    }
    lines
}

/// Joins continuation lines and drops blanks and comments. Each entry carries
/// the 1-based line number it started on.
fn logical_lines(input: &str) -> Vec<(usize, String)> {
    let mut lines = Vec::new();
    let mut pending: Option<(usize, String)> = None;

    for (idx, raw) in physical_lines(input).into_iter().enumerate() {
        let trimmed = raw.trim_start_matches(WHITESPACE);

        let (start, mut buf) = match pending.take() {
            Some((start, mut buf)) => {
                buf.push_str(trimmed);
                (start, buf)
            }
            None => {
                if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!') {
                    continue;
                }
                (idx + 1, trimmed.to_string())
            }
        };

        if ends_with_continuation(trimmed) {
            buf.pop();
            pending = Some((start, buf));
        } else {
            lines.push((start, buf));
        }
    }

    if let Some(last) = pending {
        lines.push(last);
    }
    lines
}

fn ends_with_continuation(line: &str) -> bool {
    line.chars().rev().take_while(|c| *c == '\\').count() % 2 == 1
}

/// Splits a logical line into its still-escaped key and value.
fn split_entry(line: &str) -> (&str, &str) {
    let mut key_end = line.len();
    let mut value_start = line.len();
    let mut has_separator = false;
    let mut escaped = false;

    for (i, c) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '=' | ':' => {
                key_end = i;
                value_start = i + 1;
                has_separator = true;
                break;
            }
            ' ' | '\t' | '\x0c' => {
                key_end = i;
                value_start = i + 1;
                break;
            }
            _ => {}
        }
    }

    let mut value = line[value_start..].trim_start_matches(WHITESPACE);
    if !has_separator {
        if let Some(rest) = value.strip_prefix(['=', ':']) {
            value = rest.trim_start_matches(WHITESPACE);
        }
    }
    (&line[..key_end], value)
}

fn unescape(raw: &str, line: usize) -> ScenarioResult<String> {
    let mut out = String::with_capacity(raw.len());
    // \uXXXX escapes are UTF-16 units; surrogate pairs span two escapes.
    let mut units: Vec<u16> = Vec::new();
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            flush_units(&mut units, &mut out, line)?;
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                if hex.len() != 4 || !hex.chars().all(|h| h.is_ascii_hexdigit()) {
                    return Err(ScenarioError::InvalidProperties {
                        line,
                        reason: format!("malformed \\uxxxx encoding: \\u{hex}"),
                    });
                }
                // Checked above, four hex digits always fit.
                units.push(u16::from_str_radix(&hex, 16).unwrap_or_default());
                continue;
            }
            Some(escaped) => {
                flush_units(&mut units, &mut out, line)?;
                out.push(match escaped {
                    't' => '\t',
                    'n' => '\n',
                    'r' => '\r',
                    'f' => '\x0c',
                    other => other,
                });
            }
            None => flush_units(&mut units, &mut out, line)?,
        }
    }
    flush_units(&mut units, &mut out, line)?;
    Ok(out)
}

fn flush_units(units: &mut Vec<u16>, out: &mut String, line: usize) -> ScenarioResult<()> {
    if units.is_empty() {
        return Ok(());
    }
    for decoded in char::decode_utf16(units.drain(..)) {
        let c = decoded.map_err(|e| ScenarioError::InvalidProperties {
            line,
            reason: format!("unpaired surrogate \\u{:04X}", e.unpaired_surrogate()),
        })?;
        out.push(c);
    }
    Ok(())
}

fn escape(raw: &str, is_key: bool) -> String {
    let mut out = String::with_capacity(raw.len());
    for (i, c) in raw.chars().enumerate() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\x0c' => out.push_str("\\f"),
            '=' | ':' | '#' | '!' => {
                out.push('\\');
                out.push(c);
            }
            ' ' if is_key || i == 0 => out.push_str("\\ "),
            _ => out.push(c),
        }
    }
    out
}

/// A `.properties` file on disk holding project test data.
#[derive(Debug, Clone)]
pub struct PropertyStore {
    path: PathBuf,
}

impl PropertyStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(&settings.properties_path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the file. A missing file is an empty property set.
    pub fn load(&self) -> ScenarioResult<Properties> {
        debug!("Loading properties from: {}", self.path.display());

        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!("Properties file not found, using empty set: {}", self.path.display());
                return Ok(Properties::new());
            }
            Err(e) => return Err(e.into()),
        };

        let properties = Properties::parse(&contents)?;
        info!(
            "Loaded {} properties from: {}",
            properties.len(),
            self.path.display()
        );
        for (key, value) in properties.iter() {
            debug!("Loaded property: {} = {}", key, value);
        }
        Ok(properties)
    }

    pub fn store(&self, properties: &Properties, comments: &str) -> ScenarioResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        fs::write(&self.path, properties.render(Some(comments)))?;
        info!(
            "Stored {} properties to: {}",
            properties.len(),
            self.path.display()
        );
        Ok(())
    }

    pub fn store_default(&self, properties: &Properties) -> ScenarioResult<()> {
        self.store(properties, DEFAULT_STORE_COMMENT)
    }

    pub fn get(&self, key: &str) -> ScenarioResult<Option<String>> {
        let properties = self.load()?;
        Ok(properties.get(key).map(str::to_string))
    }

    pub fn get_or(&self, key: &str, default: &str) -> ScenarioResult<String> {
        Ok(self.get(key)?.unwrap_or_else(|| default.to_string()))
    }

    pub fn require(&self, key: &str) -> ScenarioResult<String> {
        self.get(key)?
            .ok_or_else(|| ScenarioError::PropertyNotFound(key.to_string()))
    }

    pub fn set(&self, key: &str, value: &str) -> ScenarioResult<()> {
        let mut properties = self.load()?;
        properties.set(key, value);
        self.store(&properties, &format!("Updated property: {key}"))?;
        info!("Property {} set to {}", key, value);
        Ok(())
    }
}
