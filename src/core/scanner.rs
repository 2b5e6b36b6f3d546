use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// One extracted include directive, in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawInclude {
    pub text: String,
    /// `#include <...>` rather than `#include "..."`.
    pub angle: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanResult {
    pub includes: Vec<RawInclude>,
    pub loc: usize,
}

#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Stop scanning at the newline after the last interesting `#`, stepping
    /// over a trailing `#endif` inclusion guard. Assumes no directives follow
    /// the final guard; files violating that lose trailing includes.
    pub final_guard_fast_path: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            final_guard_fast_path: true,
        }
    }
}

/// Extracts include directives and the line count from raw source bytes.
///
/// Single forward pass with an explicit state machine. Comment skipping has
/// priority over directive detection, so a `//` or `/*` occurring before the
/// next `#` suppresses anything inside it. Malformed directives (missing
/// delimiter, newline inside the bracket) are abandoned, never errors.
pub fn scan_bytes(buf: &[u8], options: &ScanOptions) -> ScanResult {
    let mut result = ScanResult {
        includes: Vec::new(),
        loc: count_lines(buf),
    };

    let end = effective_end(buf, options);
    let mut i = 0;
    while i < end {
        match buf[i] {
            b'/' if i + 1 < end && buf[i + 1] == b'/' => {
                // line comment: skip to end of line
                while i < end && buf[i] != b'\n' {
                    i += 1;
                }
            }
            b'/' if i + 1 < end && buf[i + 1] == b'*' => {
                // block comment: skip to the matching */, no nesting
                i += 2;
                loop {
                    if i + 1 >= end {
                        i = end;
                        break;
                    }
                    if buf[i] == b'*' && buf[i + 1] == b'/' {
                        i += 2;
                        break;
                    }
                    i += 1;
                }
            }
            b'#' => {
                i += 1;
                while i < end && (buf[i] == b' ' || buf[i] == b'\t') {
                    i += 1;
                }
                let rest = &buf[i..end];
                let keyword = if rest.starts_with(b"include") {
                    7
                } else if rest.starts_with(b"import") {
                    6
                } else {
                    continue; // some other directive, back to seeking
                };
                i += keyword;
                while i < end && (buf[i] == b' ' || buf[i] == b'\t') {
                    i += 1;
                }
                if i >= end {
                    break;
                }
                let (close, angle) = match buf[i] {
                    b'<' => (b'>', true),
                    b'"' => (b'"', false),
                    _ => continue, // malformed, abandon the directive
                };
                let start = i + 1;
                let mut j = start;
                while j < end && buf[j] != close && buf[j] != b'\n' {
                    j += 1;
                }
                if j < end && buf[j] == close {
                    result.includes.push(RawInclude {
                        text: String::from_utf8_lossy(&buf[start..j]).into_owned(),
                        angle,
                    });
                    i = j + 1;
                } else {
                    // unterminated before newline or EOF: abandoned
                    i = j;
                }
            }
            _ => i += 1,
        }
    }

    result
}

/// Reads the full file content once and scans it.
pub fn scan_file(path: &Path, options: &ScanOptions) -> Result<ScanResult> {
    let buf = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    Ok(scan_bytes(&buf, options))
}

/// Where scanning may stop. With the fast path enabled: locate the last `#`;
/// if it opens `#endif`, step back to the previous `#` (the common trailing
/// inclusion-guard pattern); the region ends at the newline after that `#`.
fn effective_end(buf: &[u8], options: &ScanOptions) -> usize {
    if !options.final_guard_fast_path {
        return buf.len();
    }
    let Some(mut last) = rfind(buf, buf.len(), b'#') else {
        return buf.len();
    };
    if buf[last + 1..].starts_with(b"endif") {
        match rfind(buf, last, b'#') {
            Some(prev) => last = prev,
            None => return buf.len(),
        }
    }
    match buf[last..].iter().position(|&b| b == b'\n') {
        Some(offset) => last + offset + 1,
        None => buf.len(),
    }
}

fn rfind(buf: &[u8], before: usize, byte: u8) -> Option<usize> {
    buf[..before].iter().rposition(|&b| b == byte)
}

/// Newline count, plus one for a non-empty final line without one.
fn count_lines(buf: &[u8]) -> usize {
    if buf.is_empty() {
        return 0;
    }
    let newlines = buf.iter().filter(|&&b| b == b'\n').count();
    if buf[buf.len() - 1] == b'\n' {
        newlines
    } else {
        newlines + 1
    }
}

/// Extensions that get compiled on their own, as opposed to only included.
pub fn is_compileable_ext(ext: &str) -> bool {
    matches!(
        ext.to_ascii_lowercase().as_str(),
        "c" | "cc" | "cpp"
    )
}

pub fn is_code_ext(ext: &str) -> bool {
    matches!(ext.to_ascii_lowercase().as_str(), "h" | "hpp") || is_compileable_ext(ext)
}
