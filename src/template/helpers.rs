// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! The fixed helper set callable from templates

use crate::resolve::{resolve_cpu, resolve_memory, resolve_storage, resolve_volumes, QuotaDefault};
use crate::template::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Helper {
    Lower,
    Upper,
    Replace,
    Cpu,
    Memory,
    Volumes,
    Storage,
}

impl Helper {
    pub(crate) fn lookup(name: &str) -> Option<Self> {
        match name {
            "lower" => Some(Helper::Lower),
            "upper" => Some(Helper::Upper),
            "replace" => Some(Helper::Replace),
            "getCPU" => Some(Helper::Cpu),
            "getMEM" => Some(Helper::Memory),
            "getPVC" => Some(Helper::Volumes),
            "getStorage" => Some(Helper::Storage),
            _ => None,
        }
    }

    pub(crate) fn name(self) -> &'static str {
        match self {
            Helper::Lower => "lower",
            Helper::Upper => "upper",
            Helper::Replace => "replace",
            Helper::Cpu => "getCPU",
            Helper::Memory => "getMEM",
            Helper::Volumes => "getPVC",
            Helper::Storage => "getStorage",
        }
    }

    fn arity(self) -> usize {
        match self {
            Helper::Lower | Helper::Upper => 1,
            Helper::Replace => 3,
            Helper::Cpu | Helper::Memory | Helper::Volumes | Helper::Storage => 2,
        }
    }

    pub(crate) fn call<'a>(self, args: Vec<Value<'a>>) -> Result<Value<'a>, String> {
        if args.len() != self.arity() {
            return Err(format!(
                "wrong number of args for {}: want {} got {}",
                self.name(),
                self.arity(),
                args.len()
            ));
        }

        let result = match self {
            Helper::Lower => self.string_arg(&args, 0)?.to_lowercase(),
            Helper::Upper => self.string_arg(&args, 0)?.to_uppercase(),
            Helper::Replace => {
                let input = self.string_arg(&args, 0)?;
                let from = self.string_arg(&args, 1)?;
                let to = self.string_arg(&args, 2)?;
                input.replace(from, to)
            }
            Helper::Cpu | Helper::Memory | Helper::Volumes | Helper::Storage => {
                let Value::Request(request) = &args[0] else {
                    return Err(format!(
                        "{} expects the request as its first argument, got {}",
                        self.name(),
                        args[0].kind()
                    ));
                };
                let default = self.default_arg(&args[1])?;
                let resolve = match self {
                    Helper::Cpu => resolve_cpu,
                    Helper::Memory => resolve_memory,
                    Helper::Volumes => resolve_volumes,
                    _ => resolve_storage,
                };
                resolve(*request, &default)
            }
        };

        Ok(Value::Str(result))
    }

    fn string_arg<'v>(self, args: &'v [Value<'_>], index: usize) -> Result<&'v str, String> {
        match &args[index] {
            Value::Str(s) => Ok(s),
            other => Err(format!(
                "wrong type for argument {} of {}: expected string, got {}",
                index + 1,
                self.name(),
                other.kind()
            )),
        }
    }

    fn default_arg(self, value: &Value<'_>) -> Result<QuotaDefault, String> {
        match value {
            Value::Str(s) => Ok(QuotaDefault::String(s.clone())),
            Value::Int(n) => Ok(QuotaDefault::Integer(*n)),
            other => Err(format!(
                "default for {} must be a string or integer, got {}",
                self.name(),
                other.kind()
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::{ManifestRequest, ResourceName, ResourceRequest};

    fn s(v: &str) -> Value<'static> {
        Value::Str(v.to_string())
    }

    #[test]
    fn test_string_helpers() {
        assert_eq!(Helper::Upper.call(vec![s("boogie_test")]).unwrap(), s("BOOGIE_TEST"));
        assert_eq!(Helper::Lower.call(vec![s("DEV")]).unwrap(), s("dev"));
        assert_eq!(
            Helper::Replace
                .call(vec![s("boogie-test-app"), s("-"), s("_")])
                .unwrap(),
            s("boogie_test_app")
        );
    }

    #[test]
    fn test_wrong_arity() {
        let err = Helper::Upper.call(vec![s("a"), s("b")]).unwrap_err();
        assert_eq!(err, "wrong number of args for upper: want 1 got 2");
    }

    #[test]
    fn test_wrong_argument_type() {
        let err = Helper::Lower.call(vec![Value::Int(3)]).unwrap_err();
        assert_eq!(
            err,
            "wrong type for argument 1 of lower: expected string, got int"
        );
    }

    #[test]
    fn test_resolvers_take_request_and_default() {
        let request = ManifestRequest::new(
            "boogie-test",
            "dev",
            vec![ResourceRequest::new(ResourceName::Volumes, 3, None).unwrap()],
        )
        .unwrap();

        assert_eq!(
            Helper::Volumes
                .call(vec![Value::Request(&request), Value::Int(1)])
                .unwrap(),
            s("3")
        );
        assert_eq!(
            Helper::Memory
                .call(vec![Value::Request(&request), s("100Mi")])
                .unwrap(),
            s("\"100Mi\"")
        );

        let err = Helper::Cpu
            .call(vec![Value::Request(&request), Value::Bool(true)])
            .unwrap_err();
        assert_eq!(err, "default for getCPU must be a string or integer, got bool");

        let err = Helper::Storage.call(vec![s("x"), s("1Gi")]).unwrap_err();
        assert!(err.contains("expects the request"));
    }
}
