//! Permissive literal grammar shared by the heuristic and pythonic paths.
//!
//! Models emit argument values in a mix of JSON and Python spellings:
//! single-quoted strings, `True`/`None`, tuples, trailing commas. This
//! module is a deliberately narrow recursive-descent parser over exactly
//! those shapes — quoted strings, numbers, boolean/null keywords, lists,
//! tuples, and maps. It is not an expression evaluator; anything outside
//! the literal grammar is rejected so untrusted model output can never
//! drive arbitrary code paths.

use serde_json::{Map, Number, Value};

use crate::error::LiteralError;

/// Gate deciding whether a raw argument value is worth a literal parse.
///
/// Used on the heuristic (schema-less) path: values that do not look like a
/// quoted string, bracketed structure, boolean/null keyword, or decimal
/// number stay plain strings without a parse attempt.
pub fn looks_like_literal(input: &str) -> bool {
    let s = input.trim();
    if s.len() >= 2 {
        let quoted = (s.starts_with('\'') && s.ends_with('\''))
            || (s.starts_with('"') && s.ends_with('"'));
        let bracketed = (s.starts_with('[') && s.ends_with(']'))
            || (s.starts_with('{') && s.ends_with('}'));
        if quoted || bracketed {
            return true;
        }
    }
    if matches!(
        s.to_ascii_lowercase().as_str(),
        "true" | "false" | "none" | "null"
    ) {
        return true;
    }
    is_decimal(s)
}

/// Accepts an optionally negated run of digits with at most one dot.
fn is_decimal(s: &str) -> bool {
    let body = s.strip_prefix('-').unwrap_or(s);
    let mut digits = 0usize;
    let mut dots = 0usize;
    for c in body.chars() {
        match c {
            '0'..='9' => digits += 1,
            '.' => {
                dots += 1;
                if dots > 1 {
                    return false;
                }
            }
            _ => return false,
        }
    }
    digits > 0
}

/// Parses a complete literal value, requiring the whole input to match.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use toolparse::literal::parse_literal;
///
/// assert_eq!(parse_literal("'Paris'").unwrap(), json!("Paris"));
/// assert_eq!(parse_literal("[1, 2, 3,]").unwrap(), json!([1, 2, 3]));
/// assert_eq!(parse_literal("None").unwrap(), json!(null));
/// assert!(parse_literal("not a literal").is_err());
/// ```
pub fn parse_literal(input: &str) -> Result<Value, LiteralError> {
    let mut cursor = Cursor::new(input);
    cursor.skip_whitespace();
    let value = parse_value(&mut cursor)?;
    cursor.skip_whitespace();
    match cursor.peek() {
        None => Ok(value),
        Some(_) => Err(LiteralError::TrailingInput { pos: cursor.pos() }),
    }
}

/// Parses the argument list of a pythonic call, e.g.
/// `city="Paris", days=3` or `"Paris", 3`.
///
/// Keyword arguments keep their names; positional arguments get synthetic
/// `arg_0`, `arg_1`, … names in positional order. A value that is not a
/// literal falls back to the bare identifier token, else to its trimmed
/// source text. `**`-splatted arguments carry no usable name and are
/// skipped. Unbalanced brackets or an unterminated string fail the whole
/// list.
pub fn parse_call_arguments(input: &str) -> Result<Map<String, Value>, LiteralError> {
    let mut arguments = Map::new();
    let mut positional = 0usize;
    for piece in split_top_level(input)? {
        let piece = piece.trim();
        if piece.is_empty() || piece.starts_with("**") {
            continue;
        }
        match split_keyword(piece) {
            Some((key, value_src)) => {
                arguments.insert(key.to_string(), value_or_token(value_src));
            }
            None => {
                arguments.insert(format!("arg_{positional}"), value_or_token(piece));
                positional += 1;
            }
        }
    }
    Ok(arguments)
}

/// Splits `key=value` when the left side is an identifier and the `=` is
/// not part of a comparison operator.
fn split_keyword(piece: &str) -> Option<(&str, &str)> {
    let eq = piece.find('=')?;
    if piece[eq..].starts_with("==") {
        return None;
    }
    let key = piece[..eq].trim();
    if is_identifier(key) {
        Some((key, piece[eq + 1..].trim()))
    } else {
        None
    }
}

/// Literal value, bare identifier, or the source text itself as a string.
fn value_or_token(src: &str) -> Value {
    match parse_literal(src) {
        Ok(value) => value,
        Err(_) => Value::String(src.to_string()),
    }
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_')
}

/// Splits on commas that sit outside any string or bracket nesting.
fn split_top_level(input: &str) -> Result<Vec<&str>, LiteralError> {
    let mut pieces = Vec::new();
    let mut depth = 0usize;
    let mut in_string: Option<char> = None;
    let mut escaped = false;
    let mut start = 0usize;
    for (pos, ch) in input.char_indices() {
        if let Some(quote) = in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == quote {
                in_string = None;
            }
            continue;
        }
        match ch {
            '\'' | '"' => in_string = Some(ch),
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => {
                depth = depth
                    .checked_sub(1)
                    .ok_or(LiteralError::UnbalancedArguments)?;
            }
            ',' if depth == 0 => {
                pieces.push(&input[start..pos]);
                start = pos + 1;
            }
            _ => {}
        }
    }
    if depth != 0 || in_string.is_some() {
        return Err(LiteralError::UnbalancedArguments);
    }
    pieces.push(&input[start..]);
    Ok(pieces)
}

/// Character cursor over the input with byte-position tracking.
struct Cursor<'a> {
    input: &'a str,
    iter: std::iter::Peekable<std::str::CharIndices<'a>>,
}

impl<'a> Cursor<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            iter: input.char_indices().peekable(),
        }
    }

    fn peek(&mut self) -> Option<char> {
        self.iter.peek().map(|&(_, c)| c)
    }

    fn pos(&mut self) -> usize {
        let end = self.input.len();
        self.iter.peek().map_or(end, |&(pos, _)| pos)
    }

    fn bump(&mut self) -> Option<char> {
        self.iter.next().map(|(_, c)| c)
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    /// Consumes `ch` if it is next.
    fn eat(&mut self, ch: char) -> bool {
        if self.peek() == Some(ch) {
            self.bump();
            true
        } else {
            false
        }
    }
}

fn parse_value(cursor: &mut Cursor<'_>) -> Result<Value, LiteralError> {
    cursor.skip_whitespace();
    match cursor.peek() {
        None => Err(LiteralError::UnexpectedEnd),
        Some('\'') | Some('"') => parse_string(cursor).map(Value::String),
        Some('[') => parse_sequence(cursor, '[', ']'),
        Some('(') => parse_sequence(cursor, '(', ')'),
        Some('{') => parse_map(cursor),
        Some(c) if c == '-' || c == '+' || c.is_ascii_digit() => parse_number(cursor),
        Some(c) if c.is_alphabetic() || c == '_' => parse_keyword(cursor),
        Some(ch) => Err(LiteralError::UnexpectedChar {
            ch,
            pos: cursor.pos(),
        }),
    }
}

fn parse_string(cursor: &mut Cursor<'_>) -> Result<String, LiteralError> {
    let quote = cursor.bump().ok_or(LiteralError::UnexpectedEnd)?;
    let mut out = String::new();
    loop {
        match cursor.bump() {
            None => return Err(LiteralError::UnexpectedEnd),
            Some(c) if c == quote => return Ok(out),
            Some('\\') => match cursor.bump() {
                None => return Err(LiteralError::UnexpectedEnd),
                Some('n') => out.push('\n'),
                Some('t') => out.push('\t'),
                Some('r') => out.push('\r'),
                Some('0') => out.push('\0'),
                Some(c @ ('\\' | '\'' | '"')) => out.push(c),
                // Unknown escape: keep the backslash, like Python does.
                Some(c) => {
                    out.push('\\');
                    out.push(c);
                }
            },
            Some(c) => out.push(c),
        }
    }
}

/// Lists and tuples both become JSON arrays. Trailing commas tolerated.
fn parse_sequence(
    cursor: &mut Cursor<'_>,
    open: char,
    close: char,
) -> Result<Value, LiteralError> {
    debug_assert_eq!(cursor.peek(), Some(open));
    cursor.bump();
    let mut items = Vec::new();
    loop {
        cursor.skip_whitespace();
        if cursor.eat(close) {
            return Ok(Value::Array(items));
        }
        items.push(parse_value(cursor)?);
        cursor.skip_whitespace();
        if cursor.eat(',') {
            continue;
        }
        if cursor.eat(close) {
            return Ok(Value::Array(items));
        }
        return match cursor.peek() {
            None => Err(LiteralError::UnexpectedEnd),
            Some(ch) => Err(LiteralError::UnexpectedChar {
                ch,
                pos: cursor.pos(),
            }),
        };
    }
}

fn parse_map(cursor: &mut Cursor<'_>) -> Result<Value, LiteralError> {
    debug_assert_eq!(cursor.peek(), Some('{'));
    cursor.bump();
    let mut map = Map::new();
    loop {
        cursor.skip_whitespace();
        if cursor.eat('}') {
            return Ok(Value::Object(map));
        }
        let key = parse_value(cursor)?;
        cursor.skip_whitespace();
        if !cursor.eat(':') {
            return match cursor.peek() {
                None => Err(LiteralError::UnexpectedEnd),
                Some(ch) => Err(LiteralError::UnexpectedChar {
                    ch,
                    pos: cursor.pos(),
                }),
            };
        }
        let value = parse_value(cursor)?;
        // JSON object keys must be strings; other literal keys keep their
        // source rendering.
        let key = match key {
            Value::String(s) => s,
            other => other.to_string(),
        };
        map.insert(key, value);
        cursor.skip_whitespace();
        if cursor.eat(',') {
            continue;
        }
        if cursor.eat('}') {
            return Ok(Value::Object(map));
        }
        return match cursor.peek() {
            None => Err(LiteralError::UnexpectedEnd),
            Some(ch) => Err(LiteralError::UnexpectedChar {
                ch,
                pos: cursor.pos(),
            }),
        };
    }
}

fn parse_number(cursor: &mut Cursor<'_>) -> Result<Value, LiteralError> {
    let mut literal = String::new();
    if let Some(c @ ('-' | '+')) = cursor.peek() {
        literal.push(c);
        cursor.bump();
    }
    let mut digits = 0usize;
    let mut is_float = false;
    while let Some(c) = cursor.peek() {
        match c {
            '0'..='9' => {
                digits += 1;
                literal.push(c);
                cursor.bump();
            }
            '.' if !is_float => {
                is_float = true;
                literal.push(c);
                cursor.bump();
            }
            'e' | 'E' => {
                is_float = true;
                literal.push(c);
                cursor.bump();
                if let Some(s @ ('-' | '+')) = cursor.peek() {
                    literal.push(s);
                    cursor.bump();
                }
            }
            _ => break,
        }
    }
    if digits == 0 {
        return match cursor.peek() {
            None => Err(LiteralError::UnexpectedEnd),
            Some(ch) => Err(LiteralError::UnexpectedChar {
                ch,
                pos: cursor.pos(),
            }),
        };
    }
    if !is_float {
        if let Ok(n) = literal.parse::<i64>() {
            return Ok(Value::Number(n.into()));
        }
        // Integer too large for i64: fall through to the float path.
    }
    let f: f64 = literal
        .parse()
        .map_err(|_| LiteralError::NumberOutOfRange {
            literal: literal.clone(),
        })?;
    Number::from_f64(f)
        .map(Value::Number)
        .ok_or(LiteralError::NumberOutOfRange { literal })
}

/// Boolean and null keywords, case-insensitive to cover both Python and
/// JSON spellings.
fn parse_keyword(cursor: &mut Cursor<'_>) -> Result<Value, LiteralError> {
    let mut word = String::new();
    while let Some(c) = cursor.peek() {
        if c.is_alphanumeric() || c == '_' {
            word.push(c);
            cursor.bump();
        } else {
            break;
        }
    }
    match word.to_ascii_lowercase().as_str() {
        "true" => Ok(Value::Bool(true)),
        "false" => Ok(Value::Bool(false)),
        "none" | "null" => Ok(Value::Null),
        _ => Err(LiteralError::UnknownKeyword { word }),
    }
}
