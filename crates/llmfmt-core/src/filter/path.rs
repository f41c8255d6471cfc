//! Path expressions: member lookup, indexing, projection, and predicates.
//!
//! Grammar (dot-and-bracket form):
//!
//! - `name` / `a.b.c` — member lookup on objects
//! - `[n]` — array index, 0-based; negative counts from the end
//! - `[*]` — projection over every element
//! - `[?key op literal]` — keep elements whose `key` compares true against a
//!   JSON scalar literal, `op ∈ {==, !=, <, <=, >, >=}`
//!
//! Expressions are parsed once; evaluation walks the tree and returns an
//! owned value. A path that selects nothing returns null.

use crate::error::FilterError;
use crate::filter::Filter;
use crate::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

/// One step of a parsed path expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    Key(String),
    Index(i64),
    Wildcard,
    Predicate {
        key: String,
        op: CmpOp,
        literal: Value,
    },
}

/// A compiled path expression.
#[derive(Debug, Clone, PartialEq)]
pub struct PathExpr {
    source: String,
    segments: Vec<Segment>,
}

impl PathExpr {
    /// Parse an expression. Syntax errors carry the original expression.
    pub fn parse(expr: &str) -> Result<PathExpr, FilterError> {
        let segments = parse_segments(expr).map_err(|message| FilterError::InvalidPath {
            expression: expr.to_string(),
            message,
        })?;
        Ok(PathExpr {
            source: expr.to_string(),
            segments,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub(crate) fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Evaluate against a value, producing the selection (or null).
    pub fn select(&self, value: &Value) -> Value {
        eval(value, &self.segments)
    }
}

fn eval(value: &Value, segments: &[Segment]) -> Value {
    let Some((segment, rest)) = segments.split_first() else {
        return value.clone();
    };
    match segment {
        Segment::Key(key) => match value.as_object().and_then(|map| map.get(key)) {
            Some(child) => eval(child, rest),
            None => Value::Null,
        },
        Segment::Index(idx) => match value.as_array().and_then(|arr| resolve(arr, *idx)) {
            Some(child) => eval(child, rest),
            None => Value::Null,
        },
        // Projection keeps array length: elements on which the rest of the
        // path selects nothing contribute null.
        Segment::Wildcard => match value.as_array() {
            Some(arr) => Value::Array(arr.iter().map(|elem| eval(elem, rest)).collect()),
            None => Value::Null,
        },
        Segment::Predicate { key, op, literal } => match value.as_array() {
            Some(arr) => Value::Array(
                arr.iter()
                    .filter(|elem| predicate_holds(elem, key, *op, literal))
                    .map(|elem| eval(elem, rest))
                    .collect(),
            ),
            None => Value::Null,
        },
    }
}

fn resolve(arr: &[Value], idx: i64) -> Option<&Value> {
    let len = arr.len() as i64;
    let idx = if idx < 0 { len + idx } else { idx };
    if (0..len).contains(&idx) {
        arr.get(idx as usize)
    } else {
        None
    }
}

/// Whether an array element satisfies `key op literal`.
pub(crate) fn predicate_holds(elem: &Value, key: &str, op: CmpOp, literal: &Value) -> bool {
    let Some(actual) = elem.as_object().and_then(|map| map.get(key)) else {
        return false;
    };
    match op {
        CmpOp::Eq => value_equals(actual, literal),
        CmpOp::Ne => !value_equals(actual, literal),
        CmpOp::Lt | CmpOp::Le | CmpOp::Gt | CmpOp::Ge => {
            let Some(ordering) = value_ordering(actual, literal) else {
                return false;
            };
            match op {
                CmpOp::Lt => ordering.is_lt(),
                CmpOp::Le => ordering.is_le(),
                CmpOp::Gt => ordering.is_gt(),
                CmpOp::Ge => ordering.is_ge(),
                _ => unreachable!(),
            }
        }
    }
}

/// Structural equality with cross-type numeric comparison (`1 == 1.0`).
fn value_equals(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Int(x), Value::Float(y)) | (Value::Float(y), Value::Int(x)) => *x as f64 == *y,
        _ => a == b,
    }
}

/// Ordering is defined for number pairs and string pairs only.
fn value_ordering(a: &Value, b: &Value) -> Option<std::cmp::Ordering> {
    match (a, b) {
        (Value::Int(x), Value::Int(y)) => Some(x.cmp(y)),
        (Value::Int(_) | Value::Float(_), Value::Int(_) | Value::Float(_)) => {
            as_f64(a).partial_cmp(&as_f64(b))
        }
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

fn as_f64(v: &Value) -> f64 {
    match v {
        Value::Int(i) => *i as f64,
        Value::Float(f) => *f,
        _ => f64::NAN,
    }
}

impl Segment {
    /// Whether descending into an object member named `key` consumes this
    /// segment.
    pub(crate) fn admits_key(&self, key: &str) -> bool {
        matches!(self, Segment::Key(k) if k == key)
    }

    /// Whether descending into array element `idx` (of `len`, with value
    /// `elem`) consumes this segment.
    pub(crate) fn admits_element(&self, idx: usize, len: usize, elem: &Value) -> bool {
        match self {
            Segment::Index(i) => {
                let resolved = if *i < 0 { len as i64 + i } else { *i };
                resolved == idx as i64
            }
            Segment::Wildcard => true,
            Segment::Predicate { key, op, literal } => predicate_holds(elem, key, *op, literal),
            Segment::Key(_) => false,
        }
    }
}

// ---------------------------------------------------------------------------
// Expression parser
// ---------------------------------------------------------------------------

fn parse_segments(expr: &str) -> Result<Vec<Segment>, String> {
    if expr.is_empty() {
        return Err("empty path expression".to_string());
    }
    let bytes = expr.as_bytes();
    let mut segments = Vec::new();
    let mut pos = 0usize;
    let mut expect_member = true; // a bare name is only legal at the start or after '.'

    while pos < bytes.len() {
        match bytes[pos] {
            b'.' => {
                if expect_member {
                    return Err(format!("unexpected '.' at offset {pos}"));
                }
                pos += 1;
                expect_member = true;
            }
            b'[' => {
                let close = find_bracket_close(expr, pos)?;
                segments.push(parse_bracket(&expr[pos + 1..close])?);
                pos = close + 1;
                expect_member = false;
            }
            _ => {
                if !expect_member {
                    return Err(format!("expected '.' or '[' at offset {pos}"));
                }
                let end = expr[pos..]
                    .find(['.', '['])
                    .map(|i| pos + i)
                    .unwrap_or(expr.len());
                let name = &expr[pos..end];
                if name.is_empty() {
                    return Err(format!("empty member name at offset {pos}"));
                }
                segments.push(Segment::Key(name.to_string()));
                pos = end;
                expect_member = false;
            }
        }
    }
    if expect_member {
        return Err("trailing '.'".to_string());
    }
    Ok(segments)
}

/// Find the `]` matching the `[` at `open`, skipping over double-quoted
/// string literals (predicates may compare against strings containing `]`).
fn find_bracket_close(expr: &str, open: usize) -> Result<usize, String> {
    let bytes = expr.as_bytes();
    let mut in_string = false;
    let mut escaped = false;
    for (i, &b) in bytes.iter().enumerate().skip(open + 1) {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
        } else if b == b'"' {
            in_string = true;
        } else if b == b']' {
            return Ok(i);
        }
    }
    Err(format!("unclosed '[' at offset {open}"))
}

fn parse_bracket(content: &str) -> Result<Segment, String> {
    let content = content.trim();
    if content == "*" {
        return Ok(Segment::Wildcard);
    }
    if let Some(predicate) = content.strip_prefix('?') {
        return parse_predicate(predicate);
    }
    content
        .parse::<i64>()
        .map(Segment::Index)
        .map_err(|_| format!("expected index, '*', or '?predicate' in brackets, got {content:?}"))
}

fn parse_predicate(body: &str) -> Result<Segment, String> {
    // Longest operators first so "<=" is not read as "<".
    const OPS: [(&str, CmpOp); 6] = [
        ("==", CmpOp::Eq),
        ("!=", CmpOp::Ne),
        ("<=", CmpOp::Le),
        (">=", CmpOp::Ge),
        ("<", CmpOp::Lt),
        (">", CmpOp::Gt),
    ];
    let (split, (_, op)) = OPS
        .iter()
        .filter_map(|candidate| body.find(candidate.0).map(|i| (i, candidate)))
        .min_by_key(|(i, candidate)| (*i, std::cmp::Reverse(candidate.0.len())))
        .ok_or_else(|| format!("predicate {body:?} has no comparison operator"))?;

    let key = body[..split].trim();
    if key.is_empty() {
        return Err(format!("predicate {body:?} has no key"));
    }
    let literal_text = body[split + op_len(*op)..].trim();
    let literal: serde_json::Value = serde_json::from_str(literal_text)
        .map_err(|_| format!("predicate literal {literal_text:?} is not a JSON scalar"))?;
    if literal.is_array() || literal.is_object() {
        return Err(format!("predicate literal {literal_text:?} must be a scalar"));
    }
    Ok(Segment::Predicate {
        key: key.to_string(),
        op: *op,
        literal: crate::value::from_json(literal),
    })
}

fn op_len(op: CmpOp) -> usize {
    match op {
        CmpOp::Lt | CmpOp::Gt => 1,
        _ => 2,
    }
}

// ---------------------------------------------------------------------------
// Include filter
// ---------------------------------------------------------------------------

/// Selects the sub-tree a path expression points at. Selecting nothing
/// yields null, which the rest of the chain carries forward.
#[derive(Debug)]
pub struct IncludeFilter {
    expr: PathExpr,
}

impl IncludeFilter {
    pub fn new(path: &str) -> Result<Self, FilterError> {
        Ok(IncludeFilter {
            expr: PathExpr::parse(path)?,
        })
    }
}

impl Filter for IncludeFilter {
    fn name(&self) -> &'static str {
        "include"
    }

    fn apply(&self, value: Value) -> Result<Value, FilterError> {
        Ok(self.expr.select(&value))
    }
}
