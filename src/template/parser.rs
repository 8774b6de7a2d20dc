// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Builds the node tree from lexed items

use crate::constants::limits::MAX_NESTING;
use crate::error::TemplateError;
use crate::template::helpers::Helper;
use crate::template::lexer::{Item, Token};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Node {
    Text(String),
    Action {
        line: usize,
        pipe: Pipeline,
    },
    If {
        line: usize,
        branches: Vec<(Pipeline, Vec<Node>)>,
        otherwise: Vec<Node>,
    },
    Range {
        line: usize,
        index: Option<String>,
        element: Option<String>,
        pipe: Pipeline,
        body: Vec<Node>,
        otherwise: Vec<Node>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Binding {
    Declare,
    Assign,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Pipeline {
    pub(crate) target: Option<(String, Binding)>,
    pub(crate) commands: Vec<Command>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Command {
    pub(crate) operands: Vec<Operand>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Operand {
    Dot(Vec<String>),
    Variable(String, Vec<String>),
    Call(Helper),
    Str(String),
    Int(i64),
    Bool(bool),
    Nil,
    Sub(Pipeline),
}

enum Terminator {
    Eof,
    Else { line: usize, rest: Vec<Token> },
    End,
}

pub(crate) fn parse(items: Vec<Item>) -> Result<Vec<Node>, TemplateError> {
    let mut parser = Parser {
        items: items.into_iter(),
        depth: 0,
        line: 1,
    };
    match parser.parse_list()? {
        (nodes, Terminator::Eof) => Ok(nodes),
        (_, Terminator::Else { line, .. }) => Err(TemplateError::syntax(line, "unexpected {{else}}")),
        (_, Terminator::End) => Err(TemplateError::syntax(parser.line, "unexpected {{end}}")),
    }
}

struct Parser {
    items: std::vec::IntoIter<Item>,
    depth: usize,
    line: usize,
}

impl Parser {
    fn parse_list(&mut self) -> Result<(Vec<Node>, Terminator), TemplateError> {
        let mut nodes = Vec::new();

        while let Some(item) = self.items.next() {
            let (line, tokens) = match item {
                Item::Text(text) => {
                    nodes.push(Node::Text(text));
                    continue;
                }
                Item::Action { line, tokens } => (line, tokens),
            };
            self.line = line;

            match tokens.first() {
                Some(Token::If) => nodes.push(self.parse_if(line, &tokens[1..])?),
                Some(Token::Range) => nodes.push(self.parse_range(line, &tokens[1..])?),
                Some(Token::Else) => {
                    return Ok((
                        nodes,
                        Terminator::Else {
                            line,
                            rest: tokens[1..].to_vec(),
                        },
                    ))
                }
                Some(Token::End) => {
                    if tokens.len() > 1 {
                        return Err(TemplateError::syntax(line, "unexpected tokens after end"));
                    }
                    return Ok((nodes, Terminator::End));
                }
                _ => nodes.push(Node::Action {
                    line,
                    pipe: parse_pipeline(&tokens, line, true)?,
                }),
            }
        }

        Ok((nodes, Terminator::Eof))
    }

    fn enter(&mut self, line: usize) -> Result<(), TemplateError> {
        self.depth += 1;
        if self.depth > MAX_NESTING {
            return Err(TemplateError::syntax(
                line,
                format!("control blocks nested deeper than {}", MAX_NESTING),
            ));
        }
        Ok(())
    }

    fn parse_if(&mut self, line: usize, tokens: &[Token]) -> Result<Node, TemplateError> {
        self.enter(line)?;
        let mut branches = Vec::new();
        let mut condition = parse_pipeline(tokens, line, true)?;

        let otherwise = loop {
            let (body, terminator) = self.parse_list()?;
            branches.push((condition, body));

            match terminator {
                Terminator::End => break Vec::new(),
                Terminator::Eof => return Err(TemplateError::syntax(line, "unexpected EOF in if")),
                Terminator::Else { line, rest } => match rest.first() {
                    None => break self.parse_else(line)?,
                    Some(Token::If) => condition = parse_pipeline(&rest[1..], line, true)?,
                    Some(_) => {
                        return Err(TemplateError::syntax(line, "unexpected tokens after else"))
                    }
                },
            }
        };

        self.depth -= 1;
        Ok(Node::If {
            line,
            branches,
            otherwise,
        })
    }

    fn parse_range(&mut self, line: usize, tokens: &[Token]) -> Result<Node, TemplateError> {
        self.enter(line)?;

        let (index, element, rest) = match tokens {
            [Token::Variable(i, fi), Token::Comma, Token::Variable(e, fe), Token::Declare, rest @ ..]
                if fi.is_empty() && fe.is_empty() =>
            {
                (Some(i.clone()), Some(e.clone()), rest)
            }
            [Token::Variable(e, fe), Token::Declare, rest @ ..] if fe.is_empty() => {
                (None, Some(e.clone()), rest)
            }
            _ => (None, None, tokens),
        };
        let pipe = parse_pipeline(rest, line, false)?;

        let (body, terminator) = self.parse_list()?;
        let otherwise = match terminator {
            Terminator::End => Vec::new(),
            Terminator::Eof => return Err(TemplateError::syntax(line, "unexpected EOF in range")),
            Terminator::Else { line, rest } if rest.is_empty() => self.parse_else(line)?,
            Terminator::Else { line, .. } => {
                return Err(TemplateError::syntax(line, "unexpected tokens after else"))
            }
        };

        self.depth -= 1;
        Ok(Node::Range {
            line,
            index,
            element,
            pipe,
            body,
            otherwise,
        })
    }

    fn parse_else(&mut self, line: usize) -> Result<Vec<Node>, TemplateError> {
        match self.parse_list()? {
            (nodes, Terminator::End) => Ok(nodes),
            (_, Terminator::Else { line, .. }) => {
                Err(TemplateError::syntax(line, "unexpected {{else}} after else"))
            }
            (_, Terminator::Eof) => Err(TemplateError::syntax(line, "unexpected EOF in else")),
        }
    }
}

fn parse_pipeline(
    tokens: &[Token],
    line: usize,
    allow_binding: bool,
) -> Result<Pipeline, TemplateError> {
    let (target, tokens) = match tokens {
        [Token::Variable(name, fields), Token::Declare, rest @ ..] if fields.is_empty() => {
            (Some((name.clone(), Binding::Declare)), rest)
        }
        [Token::Variable(name, fields), Token::Assign, rest @ ..] if fields.is_empty() => {
            (Some((name.clone(), Binding::Assign)), rest)
        }
        _ => (None, tokens),
    };

    if target.is_some() && !allow_binding {
        return Err(TemplateError::syntax(line, "variable binding not allowed here"));
    }
    if tokens.is_empty() {
        return Err(TemplateError::syntax(line, "missing value for command"));
    }

    let commands = split_commands(tokens, line)?
        .into_iter()
        .map(|segment| parse_command(segment, line))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Pipeline { target, commands })
}

fn split_commands(tokens: &[Token], line: usize) -> Result<Vec<&[Token]>, TemplateError> {
    let mut segments = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (i, token) in tokens.iter().enumerate() {
        match token {
            Token::LParen => {
                depth += 1;
                if depth > MAX_NESTING {
                    return Err(TemplateError::syntax(
                        line,
                        format!("parentheses nested deeper than {}", MAX_NESTING),
                    ));
                }
            }
            Token::RParen => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| TemplateError::syntax(line, "unexpected right paren"))?;
            }
            Token::Pipe if depth == 0 => {
                segments.push(&tokens[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    if depth != 0 {
        return Err(TemplateError::syntax(line, "unclosed left paren"));
    }
    segments.push(&tokens[start..]);

    if segments.iter().any(|s| s.is_empty()) {
        return Err(TemplateError::syntax(line, "missing command in pipeline"));
    }
    Ok(segments)
}

fn parse_command(tokens: &[Token], line: usize) -> Result<Command, TemplateError> {
    let mut operands = Vec::new();
    let mut i = 0;

    while i < tokens.len() {
        let operand = match &tokens[i] {
            Token::LParen => {
                let close = matching_paren(tokens, i, line)?;
                let inner = parse_pipeline(&tokens[i + 1..close], line, false)?;
                i = close;
                Operand::Sub(inner)
            }
            Token::Ident(name) => {
                let helper = Helper::lookup(name).ok_or_else(|| {
                    TemplateError::syntax(line, format!("function \"{}\" not defined", name))
                })?;
                if i > 0 {
                    return Err(TemplateError::syntax(
                        line,
                        format!("function \"{}\" must be called first or wrapped in parentheses", name),
                    ));
                }
                Operand::Call(helper)
            }
            Token::Field(fields) => Operand::Dot(fields.clone()),
            Token::Variable(name, fields) => Operand::Variable(name.clone(), fields.clone()),
            Token::Str(s) => Operand::Str(s.clone()),
            Token::Int(n) => Operand::Int(*n),
            Token::Bool(b) => Operand::Bool(*b),
            Token::Nil => Operand::Nil,
            other => {
                return Err(TemplateError::syntax(
                    line,
                    format!("unexpected {} in command", describe(other)),
                ))
            }
        };
        operands.push(operand);
        i += 1;
    }

    Ok(Command { operands })
}

fn matching_paren(tokens: &[Token], open: usize, line: usize) -> Result<usize, TemplateError> {
    let mut depth = 0usize;
    for (i, token) in tokens.iter().enumerate().skip(open) {
        match token {
            Token::LParen => depth += 1,
            Token::RParen => {
                depth -= 1;
                if depth == 0 {
                    return Ok(i);
                }
            }
            _ => {}
        }
    }
    Err(TemplateError::syntax(line, "unclosed left paren"))
}

fn describe(token: &Token) -> &'static str {
    match token {
        Token::If => "keyword if",
        Token::Else => "keyword else",
        Token::End => "keyword end",
        Token::Range => "keyword range",
        Token::Declare => "\":=\"",
        Token::Assign => "\"=\"",
        Token::Comma => "\",\"",
        Token::Pipe => "\"|\"",
        Token::RParen => "right paren",
        _ => "token",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::lexer::lex;

    fn parse_source(source: &str) -> Result<Vec<Node>, TemplateError> {
        parse(lex(source)?)
    }

    #[test]
    fn test_parse_declaration() {
        let nodes = parse_source(r#"{{ $cpu := getCPU $data "100m" }}"#).unwrap();
        let Node::Action { pipe, .. } = &nodes[0] else {
            panic!("expected action");
        };
        assert_eq!(pipe.target, Some(("$cpu".to_string(), Binding::Declare)));
        assert_eq!(
            pipe.commands[0].operands,
            vec![
                Operand::Call(Helper::Cpu),
                Operand::Variable("$data".to_string(), vec![]),
                Operand::Str("100m".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_pipes_and_parens() {
        let nodes = parse_source(r#"{{ upper (replace .ProjectName "-" "_") | lower }}"#).unwrap();
        let Node::Action { pipe, .. } = &nodes[0] else {
            panic!("expected action");
        };
        assert_eq!(pipe.commands.len(), 2);
        assert!(matches!(pipe.commands[0].operands[1], Operand::Sub(_)));
    }

    #[test]
    fn test_parse_if_else_chain() {
        let nodes =
            parse_source("{{ if .Environment }}a{{ else if .ProjectName }}b{{ else }}c{{ end }}")
                .unwrap();
        let Node::If {
            branches,
            otherwise,
            ..
        } = &nodes[0]
        else {
            panic!("expected if");
        };
        assert_eq!(branches.len(), 2);
        assert_eq!(otherwise, &vec![Node::Text("c".to_string())]);
    }

    #[test]
    fn test_parse_range_with_variables() {
        let nodes = parse_source("{{ range $i, $e := .Optionals }}{{ $e.Name }}{{ end }}").unwrap();
        let Node::Range { index, element, .. } = &nodes[0] else {
            panic!("expected range");
        };
        assert_eq!(index.as_deref(), Some("$i"));
        assert_eq!(element.as_deref(), Some("$e"));
    }

    #[test]
    fn test_parse_rejects_unknown_function() {
        let err = parse_source("{{ getDisk . 1 }}").unwrap_err();
        assert_eq!(
            err,
            TemplateError::syntax(1, "function \"getDisk\" not defined")
        );
    }

    #[test]
    fn test_parse_rejects_unbalanced_blocks() {
        assert!(parse_source("{{ if true }}a").is_err());
        assert!(parse_source("a{{ end }}").is_err());
        assert!(parse_source("{{ else }}").is_err());
        assert!(parse_source("{{ (lower .ProjectName }}").is_err());
        assert!(parse_source("{{ lower .ProjectName | }}").is_err());
    }

    #[test]
    fn test_parse_limits_nesting() {
        let deep = "{{ if true }}".repeat(MAX_NESTING + 1) + &"{{ end }}".repeat(MAX_NESTING + 1);
        let err = parse_source(&deep).unwrap_err();
        assert!(err.to_string().contains("nested deeper"));

        let ok = "{{ if true }}".repeat(MAX_NESTING) + &"{{ end }}".repeat(MAX_NESTING);
        assert!(parse_source(&ok).is_ok());
    }

    fn nested_parens(depth: usize) -> String {
        format!(
            "{{{{ {}.ProjectName{} }}}}",
            "(".repeat(depth),
            ")".repeat(depth)
        )
    }

    #[test]
    fn test_parse_limits_paren_nesting() {
        let err = parse_source(&nested_parens(MAX_NESTING + 1)).unwrap_err();
        assert_eq!(
            err,
            TemplateError::syntax(1, format!("parentheses nested deeper than {}", MAX_NESTING))
        );
        assert!(parse_source(&nested_parens(MAX_NESTING)).is_ok());
    }

    #[test]
    fn test_parse_rejects_very_deep_parens() {
        let err = parse_source(&nested_parens(20_000)).unwrap_err();
        assert!(err.to_string().contains("parentheses nested deeper"));
    }
}
