//! Input format auto-detection.
//!
//! Cheap, two-stage: a filename extension wins outright, otherwise the first
//! non-whitespace bytes are sniffed. YAML is the fallback because it is a
//! superset of JSON and tolerates arbitrary indented text.

use crate::format::Format;

/// Pick a parser format for unlabeled input.
///
/// 1. A recognized filename extension decides.
/// 2. `{` or `[` as the first non-whitespace byte means JSON.
/// 3. An `<?xml` prefix or a leading `<` means XML.
/// 4. Two or more lines with a consistent, non-zero tab (then comma) count
///    per line mean TSV (then CSV).
/// 5. Everything else is YAML.
pub fn detect(input: &[u8], filename: Option<&str>) -> Format {
    if let Some(format) = filename.and_then(Format::from_path) {
        return format;
    }

    let trimmed = skip_ascii_whitespace(input);
    match trimmed.first() {
        Some(b'{') | Some(b'[') => return Format::Json,
        Some(b'<') => return Format::Xml,
        _ => {}
    }

    if delimited_lines(trimmed, b'\t') {
        return Format::Tsv;
    }
    if delimited_lines(trimmed, b',') {
        return Format::Csv;
    }
    Format::Yaml
}

fn skip_ascii_whitespace(input: &[u8]) -> &[u8] {
    let start = input
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(input.len());
    &input[start..]
}

/// True when the first line contains the delimiter and every subsequent
/// non-empty line repeats the same delimiter count. Requires at least two
/// lines. Quoted embedded delimiters can defeat this; callers wanting
/// certainty pin the input format.
fn delimited_lines(input: &[u8], delimiter: u8) -> bool {
    let mut lines = input
        .split(|&b| b == b'\n')
        .map(|line| line.strip_suffix(b"\r").unwrap_or(line))
        .filter(|line| !line.is_empty());

    let first = match lines.next() {
        Some(line) => line,
        None => return false,
    };
    let expected = count_byte(first, delimiter);
    if expected == 0 {
        return false;
    }

    let mut rest = 0usize;
    for line in lines {
        if count_byte(line, delimiter) != expected {
            return false;
        }
        rest += 1;
    }
    rest > 0
}

fn count_byte(line: &[u8], byte: u8) -> usize {
    line.iter().filter(|&&b| b == byte).count()
}
