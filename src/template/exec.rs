// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Single-pass evaluation of a parsed template against one request

use crate::constants::limits::MAX_STEPS;
use crate::error::TemplateError;
use crate::request::{ManifestRequest, ResourceRequest};
use crate::template::parser::{Binding, Command, Node, Operand, Pipeline};
use crate::template::value::Value;

pub(crate) fn execute(nodes: &[Node], request: &ManifestRequest) -> Result<String, TemplateError> {
    let root = Value::Request(request);
    let mut state = State {
        vars: vec![("$".to_string(), root.clone())],
        out: String::new(),
        steps: 0,
    };
    state.walk(nodes, &root)?;
    Ok(state.out)
}

struct State<'a> {
    vars: Vec<(String, Value<'a>)>,
    out: String,
    steps: usize,
}

impl<'a> State<'a> {
    fn step(&mut self, line: usize) -> Result<(), TemplateError> {
        self.steps += 1;
        if self.steps > MAX_STEPS {
            return Err(TemplateError::exec(
                line,
                format!("exceeded {} evaluation steps", MAX_STEPS),
            ));
        }
        Ok(())
    }

    fn walk(&mut self, nodes: &[Node], dot: &Value<'a>) -> Result<(), TemplateError> {
        for node in nodes {
            match node {
                Node::Text(text) => self.out.push_str(text),
                Node::Action { line, pipe } => {
                    self.step(*line)?;
                    let value = self.pipeline(pipe, dot, *line)?;
                    if pipe.target.is_none() {
                        value
                            .write_to(&mut self.out)
                            .map_err(|e| TemplateError::exec(*line, e))?;
                    }
                }
                Node::If {
                    line,
                    branches,
                    otherwise,
                } => {
                    let mark = self.vars.len();
                    let mut taken = false;
                    for (condition, body) in branches {
                        self.step(*line)?;
                        if self.pipeline(condition, dot, *line)?.is_truthy() {
                            self.walk(body, dot)?;
                            taken = true;
                            break;
                        }
                    }
                    if !taken {
                        self.walk(otherwise, dot)?;
                    }
                    self.vars.truncate(mark);
                }
                Node::Range {
                    line,
                    index,
                    element,
                    pipe,
                    body,
                    otherwise,
                } => {
                    self.step(*line)?;
                    let items: &'a [ResourceRequest] = match self.pipeline(pipe, dot, *line)? {
                        Value::Resources(items) => items,
                        Value::Nil => &[],
                        other => {
                            return Err(TemplateError::exec(
                                *line,
                                format!("range can't iterate over {}", other.kind()),
                            ))
                        }
                    };
                    if items.is_empty() {
                        self.walk(otherwise, dot)?;
                        continue;
                    }
                    for (i, item) in items.iter().enumerate() {
                        self.step(*line)?;
                        let mark = self.vars.len();
                        let value = Value::Resource(item);
                        if let Some(name) = index {
                            let i = i64::try_from(i).unwrap_or(i64::MAX);
                            self.vars.push((name.clone(), Value::Int(i)));
                        }
                        if let Some(name) = element {
                            self.vars.push((name.clone(), value.clone()));
                        }
                        self.walk(body, &value)?;
                        self.vars.truncate(mark);
                    }
                }
            }
        }
        Ok(())
    }

    fn pipeline(
        &mut self,
        pipe: &Pipeline,
        dot: &Value<'a>,
        line: usize,
    ) -> Result<Value<'a>, TemplateError> {
        let mut value = None;
        for command in &pipe.commands {
            self.step(line)?;
            value = Some(self.command(command, dot, value, line)?);
        }
        let value = value.unwrap_or(Value::Nil);

        match &pipe.target {
            Some((name, Binding::Declare)) => self.vars.push((name.clone(), value.clone())),
            Some((name, Binding::Assign)) => {
                let slot = self
                    .vars
                    .iter_mut()
                    .rev()
                    .find(|(n, _)| n == name)
                    .ok_or_else(|| {
                        TemplateError::exec(line, format!("undefined variable: {}", name))
                    })?;
                slot.1 = value.clone();
            }
            None => {}
        }
        Ok(value)
    }

    fn command(
        &mut self,
        command: &Command,
        dot: &Value<'a>,
        piped: Option<Value<'a>>,
        line: usize,
    ) -> Result<Value<'a>, TemplateError> {
        let (first, rest) = command
            .operands
            .split_first()
            .ok_or_else(|| TemplateError::exec(line, "empty command"))?;

        if let Operand::Call(helper) = first {
            let mut args = rest
                .iter()
                .map(|operand| self.operand(operand, dot, line))
                .collect::<Result<Vec<_>, _>>()?;
            args.extend(piped);
            return helper.call(args).map_err(|e| TemplateError::exec(line, e));
        }

        if !rest.is_empty() || piped.is_some() {
            return Err(TemplateError::exec(
                line,
                "can't give argument to non-function",
            ));
        }
        self.operand(first, dot, line)
    }

    fn operand(
        &mut self,
        operand: &Operand,
        dot: &Value<'a>,
        line: usize,
    ) -> Result<Value<'a>, TemplateError> {
        let (base, fields) = match operand {
            Operand::Dot(fields) => (dot.clone(), fields),
            Operand::Variable(name, fields) => {
                let value = self
                    .vars
                    .iter()
                    .rev()
                    .find(|(n, _)| n == name)
                    .map(|(_, v)| v.clone())
                    .ok_or_else(|| {
                        TemplateError::exec(line, format!("undefined variable: {}", name))
                    })?;
                (value, fields)
            }
            Operand::Str(s) => return Ok(Value::Str(s.clone())),
            Operand::Int(n) => return Ok(Value::Int(*n)),
            Operand::Bool(b) => return Ok(Value::Bool(*b)),
            Operand::Nil => return Ok(Value::Nil),
            Operand::Sub(pipe) => return self.pipeline(pipe, dot, line),
            Operand::Call(helper) => {
                return Err(TemplateError::exec(
                    line,
                    format!("{} used as a value", helper.name()),
                ))
            }
        };

        fields.iter().try_fold(base, |value, field| {
            value.field(field).map_err(|e| TemplateError::exec(line, e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::ResourceName;
    use crate::template::{lexer::lex, parser::parse};

    fn run(source: &str, request: &ManifestRequest) -> Result<String, TemplateError> {
        let nodes = parse(lex(source)?)?;
        execute(&nodes, request)
    }

    fn make_request() -> ManifestRequest {
        ManifestRequest::new(
            "boogie-test",
            "dev",
            vec![
                ResourceRequest::new(ResourceName::Cpu, 2, None).unwrap(),
                ResourceRequest::new(ResourceName::Memory, 1, Some("Gi")).unwrap(),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_field_interpolation() {
        let out = run("{{ .ProjectName }}/{{ $.Environment }}", &make_request()).unwrap();
        assert_eq!(out, "boogie-test/dev");
    }

    #[test]
    fn test_variables_and_helpers() {
        let source = r#"{{ $data := . }}{{ $name := replace $data.ProjectName "-" "_" }}RES-{{ upper $data.Environment }}-{{ upper $name }}"#;
        let out = run(source, &make_request()).unwrap();
        assert_eq!(out, "RES-DEV-BOOGIE_TEST");
    }

    #[test]
    fn test_pipes_pass_last_argument() {
        let out = run(r#"{{ .ProjectName | upper | lower }}"#, &make_request()).unwrap();
        assert_eq!(out, "boogie-test");
    }

    #[test]
    fn test_parenthesised_call() {
        let out = run(r#"{{ upper (replace .ProjectName "-" ".") }}"#, &make_request()).unwrap();
        assert_eq!(out, "BOOGIE.TEST");
    }

    #[test]
    fn test_resolver_output_is_spliced() {
        let out = run(
            r#"{"cpu": {{ getCPU . "100m" }}, "mem": {{ getMEM . "100Mi" }}, "pvc": {{ getPVC . 1 }}}"#,
            &make_request(),
        )
        .unwrap();
        assert_eq!(out, r#"{"cpu": 2, "mem": "1Gi", "pvc": 1}"#);
    }

    #[test]
    fn test_if_else() {
        let source = "{{ if .Environment }}env={{ .Environment }}{{ else }}none{{ end }}";
        assert_eq!(run(source, &make_request()).unwrap(), "env=dev");

        let bare = ManifestRequest::new("boogie-test", "", Vec::new()).unwrap();
        assert_eq!(run(source, &bare).unwrap(), "none");
    }

    #[test]
    fn test_range_over_optionals() {
        let source = "{{ range $i, $o := .Optionals }}{{ $i }}:{{ .Name }}={{ $o.Count }}{{ .Unit }};{{ end }}";
        assert_eq!(run(source, &make_request()).unwrap(), "0:cpu=2;1:memory=1Gi;");

        let empty = ManifestRequest::new("x", "", Vec::new()).unwrap();
        let source = "{{ range .Optionals }}x{{ else }}empty{{ end }}";
        assert_eq!(run(source, &empty).unwrap(), "empty");
    }

    #[test]
    fn test_block_variables_are_scoped() {
        let source = "{{ if true }}{{ $x := 1 }}{{ end }}{{ $x }}";
        let err = run(source, &make_request()).unwrap_err();
        assert_eq!(err, TemplateError::exec(1, "undefined variable: $x"));
    }

    #[test]
    fn test_assignment_updates_outer_variable() {
        let source = r#"{{ $x := "a" }}{{ if true }}{{ $x = "b" }}{{ end }}{{ $x }}"#;
        assert_eq!(run(source, &make_request()).unwrap(), "b");
    }

    #[test]
    fn test_undefined_field() {
        let err = run("{{ .Project }}", &make_request()).unwrap_err();
        assert_eq!(
            err,
            TemplateError::exec(1, "can't evaluate field Project in type request")
        );
    }

    #[test]
    fn test_non_function_with_arguments() {
        let err = run("{{ .ProjectName 1 }}", &make_request()).unwrap_err();
        assert!(err.to_string().contains("can't give argument to non-function"));
    }

    #[test]
    fn test_cannot_print_request() {
        let err = run("{{ . }}", &make_request()).unwrap_err();
        assert!(err.to_string().contains("can't print value of type request"));
    }

    #[test]
    fn test_step_limit() {
        let many: Vec<ResourceRequest> = (0..500)
            .map(|i| ResourceRequest::new(ResourceName::Volumes, i, None).unwrap())
            .collect();
        let request = ManifestRequest::new("x", "", many).unwrap();
        let inner = "{{ range $.Optionals }}{{ .Count }}{{ end }}".repeat(100);
        let source = format!("{{{{ range .Optionals }}}}{}{{{{ end }}}}", inner);

        let err = run(&source, &request).unwrap_err();
        assert_eq!(
            err.to_string(),
            format!("line 1: execution error: exceeded {} evaluation steps", MAX_STEPS)
        );
    }
}
