//! The function library templates are resolved against.
//!
//! Each function has two halves: an argument check, run once at parse time,
//! and the call itself, run for every rendered record.

pub mod context;
pub mod locale;
pub mod random;

use crate::error::{RenderError, TemplateError};
use crate::template::{RenderContext, RenderState};
use std::collections::HashMap;
use std::fmt;

/// Signature of a template function.
pub type TemplateFn =
    fn(&[Arg], &mut RenderState, &RenderContext<'_>) -> Result<String, RenderError>;

/// Signature of a parse-time argument check.
pub type ArgCheck = fn(&[Arg]) -> Result<(), String>;

/// A literal argument inside an action.
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    Int(i64),
    Float(f64),
    Str(String),
}

impl Arg {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Arg::Int(v) => Some(*v as f64),
            Arg::Float(v) => Some(*v),
            Arg::Str(_) => None,
        }
    }
}

impl fmt::Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arg::Int(v) => write!(f, "{v}"),
            Arg::Float(v) => write!(f, "{v}"),
            Arg::Str(v) => f.write_str(v),
        }
    }
}

#[derive(Clone, Copy)]
struct Function {
    check: ArgCheck,
    call: TemplateFn,
}

/// Registry of named template functions.
#[derive(Clone, Default)]
pub struct FunctionLibrary {
    functions: HashMap<&'static str, Function>,
}

impl FunctionLibrary {
    /// An empty library.
    pub fn new() -> Self {
        Self::default()
    }

    /// The library every emitter template is parsed against.
    pub fn standard() -> Self {
        let mut library = Self::new();

        library.register("index", no_args, context::index);
        library.register("now", no_args, context::now);
        library.register("unix_time", no_args, context::unix_time);
        library.register("env", one_string, context::env);
        library.register("key", no_args, context::key);
        library.register("value", no_args, context::value);

        library.register("uuid", no_args, random::uuid);
        library.register("digits", digit_count, random::digits);
        library.register("integer", int_range, random::integer);
        library.register("float", float_range, random::float);
        library.register("bool", no_args, random::boolean);
        library.register("oneof", at_least_one, random::one_of);

        library.register("locale", no_args, locale::locale);
        library.register("name", no_args, locale::name);
        library.register("surname", no_args, locale::surname);
        library.register("email", no_args, locale::email);
        library.register("city", no_args, locale::city);
        library.register("country", no_args, locale::country);

        library
    }

    /// Add or replace a function.
    pub fn register(&mut self, name: &'static str, check: ArgCheck, call: TemplateFn) {
        self.functions.insert(name, Function { check, call });
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    pub(crate) fn resolve(
        &self,
        template: &str,
        name: &str,
        args: &[Arg],
    ) -> Result<(&'static str, TemplateFn), TemplateError> {
        let (registered, function) =
            self.functions
                .get_key_value(name)
                .ok_or_else(|| TemplateError::UnknownFunction {
                    template: template.to_string(),
                    function: name.to_string(),
                })?;

        (function.check)(args).map_err(|reason| TemplateError::InvalidArguments {
            template: template.to_string(),
            function: name.to_string(),
            reason,
        })?;

        Ok((*registered, function.call))
    }
}

impl fmt::Debug for FunctionLibrary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.functions.keys().collect();
        names.sort();
        f.debug_struct("FunctionLibrary")
            .field("functions", &names)
            .finish()
    }
}

fn no_args(args: &[Arg]) -> Result<(), String> {
    if args.is_empty() {
        Ok(())
    } else {
        Err(format!("expected no arguments, got {}", args.len()))
    }
}

fn one_string(args: &[Arg]) -> Result<(), String> {
    match args {
        [Arg::Str(_)] => Ok(()),
        _ => Err("expected one string argument".to_string()),
    }
}

fn at_least_one(args: &[Arg]) -> Result<(), String> {
    if args.is_empty() {
        Err("expected at least one argument".to_string())
    } else {
        Ok(())
    }
}

fn digit_count(args: &[Arg]) -> Result<(), String> {
    match args {
        [Arg::Int(n)] if (0..=64).contains(n) => Ok(()),
        _ => Err("expected one digit count between 0 and 64".to_string()),
    }
}

fn int_range(args: &[Arg]) -> Result<(), String> {
    match args {
        [Arg::Int(min), Arg::Int(max)] if min <= max => Ok(()),
        [Arg::Int(min), Arg::Int(max)] => Err(format!("min {min} is greater than max {max}")),
        _ => Err("expected two integers MIN MAX".to_string()),
    }
}

fn float_range(args: &[Arg]) -> Result<(), String> {
    match args {
        [min, max] => match (min.as_f64(), max.as_f64()) {
            (Some(min), Some(max)) if !min.is_finite() || !max.is_finite() => {
                Err(format!("bounds must be finite, got {min} and {max}"))
            }
            (Some(min), Some(max)) if min <= max => Ok(()),
            (Some(min), Some(max)) => Err(format!("min {min} is greater than max {max}")),
            _ => Err("expected two numbers MIN MAX".to_string()),
        },
        _ => Err("expected two numbers MIN MAX".to_string()),
    }
}
