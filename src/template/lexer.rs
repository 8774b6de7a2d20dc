// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Splits template source into text runs and tokenised actions

use crate::error::TemplateError;

const LEFT_DELIM: &str = "{{";
const RIGHT_DELIM: &str = "}}";
const LEFT_COMMENT: &str = "/*";
const RIGHT_COMMENT: &str = "*/";
/// Whitespace removed by trim markers; ASCII only
const TRIM_SPACE: [char; 4] = [' ', '\t', '\r', '\n'];

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Token {
    /// A helper function name
    Ident(String),
    /// `.` (empty chain) or `.A.B`
    Field(Vec<String>),
    /// `$name.A.B`; the bare root variable is named `$`
    Variable(String, Vec<String>),
    Str(String),
    Int(i64),
    Bool(bool),
    Nil,
    If,
    Else,
    End,
    Range,
    Declare,
    Assign,
    Pipe,
    Comma,
    LParen,
    RParen,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Item {
    Text(String),
    Action { line: usize, tokens: Vec<Token> },
}

/// Lex a whole template source
pub(crate) fn lex(source: &str) -> Result<Vec<Item>, TemplateError> {
    let mut items = Vec::new();
    let mut rest = source;
    let mut line = 1;
    let mut trim_leading = false;

    while let Some(start) = rest.find(LEFT_DELIM) {
        let after = &rest[start + LEFT_DELIM.len()..];
        let trim_trailing = starts_with_trim_marker(after);

        let mut text = &rest[..start];
        if trim_leading {
            text = text.trim_start_matches(TRIM_SPACE);
        }
        if trim_trailing {
            text = text.trim_end_matches(TRIM_SPACE);
        }
        if !text.is_empty() {
            items.push(Item::Text(text.to_string()));
        }
        line += rest[..start].matches('\n').count();

        let body = if trim_trailing { &after[1..] } else { after };
        let action_line = line;

        let (consumed, trim_next) = if body.trim_start().starts_with(LEFT_COMMENT) {
            lex_comment(body, action_line)?
        } else {
            let (tokens, consumed, trim_next) = lex_action(body, action_line)?;
            if tokens.is_empty() {
                return Err(TemplateError::syntax(action_line, "missing value for command"));
            }
            items.push(Item::Action {
                line: action_line,
                tokens,
            });
            (consumed, trim_next)
        };

        line += body[..consumed].matches('\n').count();
        trim_leading = trim_next;
        rest = &body[consumed..];
    }

    let text = if trim_leading {
        rest.trim_start_matches(TRIM_SPACE)
    } else {
        rest
    };
    if !text.is_empty() {
        items.push(Item::Text(text.to_string()));
    }

    Ok(items)
}

/// `{{- ` requires whitespace after the dash, otherwise it is a negative number
fn starts_with_trim_marker(s: &str) -> bool {
    let mut chars = s.chars();
    chars.next() == Some('-') && chars.next().is_some_and(|c| TRIM_SPACE.contains(&c))
}

/// Returns the byte length consumed through the closing delimiter and whether it trims
fn close_delimiter(s: &str) -> Option<(usize, bool)> {
    if s.starts_with(RIGHT_DELIM) {
        return Some((RIGHT_DELIM.len(), false));
    }
    let ws = s.len() - s.trim_start_matches(TRIM_SPACE).len();
    let after = &s[ws..];
    if ws > 0 && after.starts_with('-') && after[1..].starts_with(RIGHT_DELIM) {
        return Some((ws + 1 + RIGHT_DELIM.len(), true));
    }
    None
}

fn lex_comment(body: &str, line: usize) -> Result<(usize, bool), TemplateError> {
    let open = body.len() - body.trim_start().len();
    let inner = &body[open + LEFT_COMMENT.len()..];
    let end = inner
        .find(RIGHT_COMMENT)
        .ok_or_else(|| TemplateError::syntax(line, "unclosed comment"))?;
    let after = open + LEFT_COMMENT.len() + end + RIGHT_COMMENT.len();

    let (len, trim) = close_delimiter(&body[after..])
        .ok_or_else(|| TemplateError::syntax(line, "comment ends before closing delimiter"))?;
    Ok((after + len, trim))
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn take_while(s: &str, pred: impl Fn(char) -> bool) -> &str {
    let end = s.find(|c: char| !pred(c)).unwrap_or(s.len());
    &s[..end]
}

/// Parses `.A.B` chains; returns the names and the bytes consumed
fn field_chain(s: &str, line: usize) -> Result<(Vec<String>, usize), TemplateError> {
    let mut fields = Vec::new();
    let mut pos = 0;
    while s[pos..].starts_with('.') {
        let name = take_while(&s[pos + 1..], is_ident_char);
        if name.is_empty() {
            break;
        }
        if name.starts_with(|c: char| c.is_ascii_digit()) {
            return Err(TemplateError::syntax(line, format!("bad field name '{}'", name)));
        }
        fields.push(name.to_string());
        pos += 1 + name.len();
    }
    Ok((fields, pos))
}

fn lex_action(body: &str, line: usize) -> Result<(Vec<Token>, usize, bool), TemplateError> {
    let mut tokens = Vec::new();
    let mut pos = 0;
    let mut line = line;

    loop {
        let rest = &body[pos..];
        if let Some((len, trim)) = close_delimiter(rest) {
            return Ok((tokens, pos + len, trim));
        }

        let Some(c) = rest.chars().next() else {
            return Err(TemplateError::syntax(line, "unclosed action"));
        };

        if c.is_whitespace() {
            if c == '\n' {
                line += 1;
            }
            pos += c.len_utf8();
            continue;
        }

        let (token, len) = match c {
            '"' => lex_quoted(rest, line)?,
            '`' => {
                let end = rest[1..]
                    .find('`')
                    .ok_or_else(|| TemplateError::syntax(line, "unterminated raw quoted string"))?;
                (Token::Str(rest[1..1 + end].to_string()), end + 2)
            }
            ':' if rest.starts_with(":=") => (Token::Declare, 2),
            '=' => (Token::Assign, 1),
            '|' => (Token::Pipe, 1),
            ',' => (Token::Comma, 1),
            '(' => (Token::LParen, 1),
            ')' => (Token::RParen, 1),
            '$' => {
                let name = take_while(&rest[1..], is_ident_char);
                let (fields, chain) = field_chain(&rest[1 + name.len()..], line)?;
                (
                    Token::Variable(format!("${}", name), fields),
                    1 + name.len() + chain,
                )
            }
            '.' => {
                let (fields, chain) = field_chain(rest, line)?;
                (Token::Field(fields), chain.max(1))
            }
            '-' | '0'..='9' => lex_number(rest, line)?,
            c if c.is_ascii_alphabetic() || c == '_' => {
                let word = take_while(rest, is_ident_char);
                let token = match word {
                    "if" => Token::If,
                    "else" => Token::Else,
                    "end" => Token::End,
                    "range" => Token::Range,
                    "true" => Token::Bool(true),
                    "false" => Token::Bool(false),
                    "nil" => Token::Nil,
                    _ => Token::Ident(word.to_string()),
                };
                (token, word.len())
            }
            other => {
                return Err(TemplateError::syntax(
                    line,
                    format!("unexpected character {:?} in action", other),
                ))
            }
        };

        tokens.push(token);
        pos += len;
    }
}

fn lex_quoted(s: &str, line: usize) -> Result<(Token, usize), TemplateError> {
    let mut out = String::new();
    let mut chars = s.char_indices().skip(1);
    while let Some((i, c)) = chars.next() {
        match c {
            '"' => return Ok((Token::Str(out), i + 1)),
            '\n' => break,
            '\\' => {
                let escaped = match chars.next() {
                    Some((_, 'n')) => '\n',
                    Some((_, 't')) => '\t',
                    Some((_, 'r')) => '\r',
                    Some((_, '"')) => '"',
                    Some((_, '\\')) => '\\',
                    Some((_, other)) => {
                        return Err(TemplateError::syntax(
                            line,
                            format!("unknown escape sequence \\{}", other),
                        ))
                    }
                    None => break,
                };
                out.push(escaped);
            }
            c => out.push(c),
        }
    }
    Err(TemplateError::syntax(line, "unterminated quoted string"))
}

fn lex_number(s: &str, line: usize) -> Result<(Token, usize), TemplateError> {
    let sign = usize::from(s.starts_with('-'));
    let digits = take_while(&s[sign..], |c| c.is_ascii_digit());
    let len = sign + digits.len();
    let literal = &s[..len];

    let trailing = s[len..].chars().next();
    if digits.is_empty() || trailing.is_some_and(|c| is_ident_char(c) || c == '.') {
        let bad = take_while(s, |c| is_ident_char(c) || c == '.' || c == '-');
        return Err(TemplateError::syntax(
            line,
            format!("bad number syntax: {}", bad),
        ));
    }

    literal
        .parse::<i64>()
        .map(|n| (Token::Int(n), len))
        .map_err(|_| TemplateError::syntax(line, format!("number out of range: {}", literal)))
}
