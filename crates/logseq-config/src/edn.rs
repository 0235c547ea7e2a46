//! A reader for the EDN subset found in Logseq configuration files.
//!
//! Every form of the EDN grammar is read, but only maps and scalars are
//! ever inspected. Numbers keep their integer/float distinction; ratios and
//! big-number suffixes are accepted and read as floats or integers.

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum EdnError {
    #[error("unexpected end of input")]
    UnexpectedEof,

    #[error("unexpected {found:?} at offset {offset}")]
    Unexpected { found: char, offset: usize },

    #[error("invalid number {text:?} at offset {offset}")]
    InvalidNumber { text: String, offset: usize },

    #[error("invalid escape at offset {offset}")]
    InvalidEscape { offset: usize },

    #[error("map at offset {offset} has a key without a value")]
    OddMap { offset: usize },

    #[error("expected a single form, found more input at offset {offset}")]
    TrailingInput { offset: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Nil,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Char(char),
    /// Keyword without its leading colon, e.g. `journal/file-name-format`.
    Keyword(String),
    Symbol(String),
    List(Vec<Value>),
    Vector(Vec<Value>),
    Set(Vec<Value>),
    /// Entries in source order.
    Map(Vec<(Value, Value)>),
    Tagged(String, Box<Value>),
    Regex(String),
}

impl Value {
    /// Value stored under keyword `key` when `self` is a map.
    pub fn get(&self, key: &str) -> Option<&Value> {
        let Value::Map(entries) = self else {
            return None;
        };
        entries.iter().find_map(|(k, v)| match k {
            Value::Keyword(name) if name == key => Some(v),
            _ => None,
        })
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_keyword(&self) -> Option<&str> {
        match self {
            Value::Keyword(k) => Some(k),
            _ => None,
        }
    }

    pub fn is_map(&self) -> bool {
        matches!(self, Value::Map(_))
    }
}

/// Reads exactly one form from `src`. Whitespace, commas and comments may
/// surround it.
pub fn parse(src: &str) -> Result<Value, EdnError> {
    let mut reader = Reader { src, pos: 0 };
    let value = reader.read_form()?.ok_or(EdnError::UnexpectedEof)?;
    reader.skip_ignored()?;
    if reader.pos < src.len() {
        return Err(EdnError::TrailingInput { offset: reader.pos });
    }
    Ok(value)
}

struct Reader<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Reader<'a> {
    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn unexpected(&self, found: char) -> EdnError {
        EdnError::Unexpected {
            found,
            offset: self.pos,
        }
    }

    /// Skips whitespace, commas, line comments and `#_` discarded forms.
    fn skip_ignored(&mut self) -> Result<(), EdnError> {
        loop {
            match self.peek() {
                Some(c) if c.is_whitespace() || c == ',' => {
                    self.bump();
                }
                Some(';') => {
                    while let Some(c) = self.bump() {
                        if c == '\n' {
                            break;
                        }
                    }
                }
                Some('#') if self.src[self.pos..].starts_with("#_") => {
                    self.pos += 2;
                    self.read_form()?.ok_or(EdnError::UnexpectedEof)?;
                }
                _ => return Ok(()),
            }
        }
    }

    /// Reads the next form, or `None` at the end of input.
    fn read_form(&mut self) -> Result<Option<Value>, EdnError> {
        self.skip_ignored()?;
        let Some(c) = self.peek() else {
            return Ok(None);
        };
        let value = match c {
            '(' => Value::List(self.read_seq(')')?),
            '[' => Value::Vector(self.read_seq(']')?),
            '{' => self.read_map()?,
            '"' => Value::String(self.read_string()?),
            '\\' => Value::Char(self.read_char()?),
            ':' => {
                self.bump();
                let name = self.read_token();
                if name.is_empty() {
                    return Err(self.peek().map_or(EdnError::UnexpectedEof, |c| {
                        self.unexpected(c)
                    }));
                }
                Value::Keyword(name.to_string())
            }
            '#' => self.read_dispatch()?,
            ')' | ']' | '}' => return Err(self.unexpected(c)),
            _ => self.read_atom()?,
        };
        Ok(Some(value))
    }

    /// Reads forms up to `close`, consuming the opening delimiter first.
    fn read_seq(&mut self, close: char) -> Result<Vec<Value>, EdnError> {
        self.bump();
        let mut items = Vec::new();
        loop {
            self.skip_ignored()?;
            match self.peek() {
                None => return Err(EdnError::UnexpectedEof),
                Some(c) if c == close => {
                    self.bump();
                    return Ok(items);
                }
                Some(_) => {
                    let item = self.read_form()?.ok_or(EdnError::UnexpectedEof)?;
                    items.push(item);
                }
            }
        }
    }

    fn read_map(&mut self) -> Result<Value, EdnError> {
        let offset = self.pos;
        let items = self.read_seq('}')?;
        if items.len() % 2 != 0 {
            return Err(EdnError::OddMap { offset });
        }
        let mut entries = Vec::with_capacity(items.len() / 2);
        let mut items = items.into_iter();
        while let (Some(k), Some(v)) = (items.next(), items.next()) {
            entries.push((k, v));
        }
        Ok(Value::Map(entries))
    }

    fn read_dispatch(&mut self) -> Result<Value, EdnError> {
        self.bump();
        match self.peek() {
            Some('{') => Ok(Value::Set(self.read_seq('}')?)),
            Some('"') => Ok(Value::Regex(self.read_raw_string()?)),
            Some(c) if c.is_alphabetic() => {
                let tag = self.read_token().to_string();
                let value = self.read_form()?.ok_or(EdnError::UnexpectedEof)?;
                Ok(Value::Tagged(tag, Box::new(value)))
            }
            Some(c) => Err(self.unexpected(c)),
            None => Err(EdnError::UnexpectedEof),
        }
    }

    fn read_string(&mut self) -> Result<String, EdnError> {
        self.bump();
        let mut out = String::new();
        loop {
            let offset = self.pos;
            match self.bump().ok_or(EdnError::UnexpectedEof)? {
                '"' => return Ok(out),
                '\\' => {
                    let escaped = match self.bump().ok_or(EdnError::UnexpectedEof)? {
                        't' => '\t',
                        'r' => '\r',
                        'n' => '\n',
                        'b' => '\u{8}',
                        'f' => '\u{c}',
                        '\\' => '\\',
                        '"' => '"',
                        'u' => self.read_unicode(offset)?,
                        _ => return Err(EdnError::InvalidEscape { offset }),
                    };
                    out.push(escaped);
                }
                c => out.push(c),
            }
        }
    }

    /// Regex bodies keep their backslashes.
    fn read_raw_string(&mut self) -> Result<String, EdnError> {
        self.bump();
        let mut out = String::new();
        loop {
            match self.bump().ok_or(EdnError::UnexpectedEof)? {
                '"' => return Ok(out),
                '\\' => {
                    out.push('\\');
                    out.push(self.bump().ok_or(EdnError::UnexpectedEof)?);
                }
                c => out.push(c),
            }
        }
    }

    fn read_unicode(&mut self, offset: usize) -> Result<char, EdnError> {
        let hex = self
            .src
            .get(self.pos..self.pos + 4)
            .ok_or(EdnError::InvalidEscape { offset })?;
        let code = u32::from_str_radix(hex, 16).map_err(|_| EdnError::InvalidEscape { offset })?;
        self.pos += 4;
        char::from_u32(code).ok_or(EdnError::InvalidEscape { offset })
    }

    fn read_char(&mut self) -> Result<char, EdnError> {
        let offset = self.pos;
        self.bump();
        let first = self.bump().ok_or(EdnError::UnexpectedEof)?;
        let start = self.pos - first.len_utf8();
        let rest = self.read_token();
        let name = &self.src[start..start + first.len_utf8() + rest.len()];
        match name {
            "newline" => Ok('\n'),
            "space" => Ok(' '),
            "tab" => Ok('\t'),
            "return" => Ok('\r'),
            "formfeed" => Ok('\u{c}'),
            "backspace" => Ok('\u{8}'),
            _ if name.len() == first.len_utf8() => Ok(first),
            _ if name.starts_with('u') && name.len() == 5 => {
                u32::from_str_radix(&name[1..], 16)
                    .ok()
                    .and_then(char::from_u32)
                    .ok_or(EdnError::InvalidEscape { offset })
            }
            _ => Err(EdnError::InvalidEscape { offset }),
        }
    }

    /// Symbol and keyword characters up to the next delimiter.
    fn read_token(&mut self) -> &'a str {
        let src = self.src;
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_whitespace() || matches!(c, ',' | '(' | ')' | '[' | ']' | '{' | '}' | '"' | ';')
            {
                break;
            }
            self.bump();
        }
        &src[start..self.pos]
    }

    fn read_atom(&mut self) -> Result<Value, EdnError> {
        let offset = self.pos;
        let token = self.read_token();
        if token.is_empty() {
            return Err(self.peek().map_or(EdnError::UnexpectedEof, |c| self.unexpected(c)));
        }
        let starts_number = {
            let mut chars = token.chars();
            match chars.next() {
                Some(c) if c.is_ascii_digit() => true,
                Some('+' | '-') => chars.next().is_some_and(|c| c.is_ascii_digit()),
                _ => false,
            }
        };
        if starts_number {
            return parse_number(token).ok_or_else(|| EdnError::InvalidNumber {
                text: token.to_string(),
                offset,
            });
        }
        Ok(match token {
            "nil" => Value::Nil,
            "true" => Value::Bool(true),
            "false" => Value::Bool(false),
            _ => Value::Symbol(token.to_string()),
        })
    }
}

fn parse_number(token: &str) -> Option<Value> {
    if let Some(int) = token.strip_suffix('N') {
        return int.parse().ok().map(Value::Integer);
    }
    if let Some(decimal) = token.strip_suffix('M') {
        return decimal.parse().ok().map(Value::Float);
    }
    if let Some((num, den)) = token.split_once('/') {
        let num: f64 = num.parse().ok()?;
        let den: f64 = den.parse().ok()?;
        return Some(Value::Float(num / den));
    }
    if let Ok(int) = token.parse::<i64>() {
        return Some(Value::Integer(int));
    }
    token.parse::<f64>().ok().map(Value::Float)
}
