//! Template parsing and rendering.

use crate::error::{RenderError, TemplateError};
use crate::functions::{Arg, FunctionLibrary, TemplateFn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fmt;

/// Per-emitter render state: the seeded RNG and the current record index.
///
/// A state is owned by exactly one emitter and is never shared, so the same
/// seed always reproduces the same sequence of records for that emitter.
pub struct RenderState {
    rng: StdRng,
    index: u64,
}

impl RenderState {
    /// Create a state seeded with `seed`, starting at record index 0.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            index: 0,
        }
    }

    /// Index of the record currently being rendered.
    pub fn index(&self) -> u64 {
        self.index
    }

    /// Move on to the next record.
    pub fn advance(&mut self) {
        self.index += 1;
    }

    pub(crate) fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }
}

impl fmt::Debug for RenderState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderState")
            .field("index", &self.index)
            .finish_non_exhaustive()
    }
}

/// Values a render call may consult besides its own state.
///
/// Built fresh for every pass, which is what keeps one emitter's locale from
/// leaking into another emitter's records.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    locale: &'a str,
    key: Option<&'a str>,
    value: Option<&'a str>,
}

impl<'a> RenderContext<'a> {
    pub fn new(locale: &'a str) -> Self {
        Self {
            locale,
            key: None,
            value: None,
        }
    }

    /// Bind an already rendered record, used by output formats.
    pub fn with_record(mut self, key: &'a str, value: &'a str) -> Self {
        self.key = Some(key);
        self.value = Some(value);
        self
    }

    pub fn locale(&self) -> &'a str {
        self.locale
    }

    pub fn key(&self) -> Option<&'a str> {
        self.key
    }

    pub fn value(&self) -> Option<&'a str> {
        self.value
    }
}

#[derive(Clone)]
enum Segment {
    Literal(String),
    Call {
        function: &'static str,
        call: TemplateFn,
        args: Vec<Arg>,
    },
}

impl fmt::Debug for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Literal(text) => f.debug_tuple("Literal").field(text).finish(),
            Segment::Call { function, args, .. } => f
                .debug_struct("Call")
                .field("function", function)
                .field("args", args)
                .finish(),
        }
    }
}

/// A parsed template, ready to be rendered any number of times.
#[derive(Debug, Clone)]
pub struct Template {
    name: String,
    segments: Vec<Segment>,
}

impl Template {
    /// Parse `source` into a template, resolving every action against
    /// `library`. Function names and argument shapes are checked here so that
    /// rendering only fails on data-dependent conditions.
    pub fn parse(
        name: &str,
        source: &str,
        library: &FunctionLibrary,
    ) -> Result<Self, TemplateError> {
        let mut segments = Vec::new();
        let mut rest = source;
        let mut offset = 0;

        while let Some(start) = rest.find("{{") {
            if start > 0 {
                segments.push(Segment::Literal(rest[..start].to_string()));
            }

            let body = &rest[start + 2..];
            let end = body.find("}}").ok_or_else(|| TemplateError::UnclosedAction {
                template: name.to_string(),
                offset: offset + start,
            })?;

            let action = body[..end].trim();
            if action.is_empty() {
                return Err(TemplateError::EmptyAction {
                    template: name.to_string(),
                    offset: offset + start,
                });
            }

            segments.push(parse_action(name, action, library)?);

            let consumed = start + 2 + end + 2;
            offset += consumed;
            rest = &rest[consumed..];
        }

        if !rest.is_empty() {
            segments.push(Segment::Literal(rest.to_string()));
        }

        Ok(Self {
            name: name.to_string(),
            segments,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Render one record.
    pub fn render(
        &self,
        state: &mut RenderState,
        context: &RenderContext<'_>,
    ) -> Result<String, RenderError> {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Call { call, args, .. } => out.push_str(&call(args, state, context)?),
            }
        }
        Ok(out)
    }
}

struct Token {
    text: String,
    quoted: bool,
}

fn parse_action(
    template: &str,
    action: &str,
    library: &FunctionLibrary,
) -> Result<Segment, TemplateError> {
    let tokens = tokenize(template, action)?;
    let mut tokens = tokens.into_iter();

    // tokenize never returns an empty list for a non-empty action
    let head = match tokens.next() {
        Some(token) if !token.quoted => token.text,
        Some(token) => {
            return Err(TemplateError::UnknownFunction {
                template: template.to_string(),
                function: format!("\"{}\"", token.text),
            })
        }
        None => {
            return Err(TemplateError::EmptyAction {
                template: template.to_string(),
                offset: 0,
            })
        }
    };

    let args: Vec<Arg> = tokens.map(to_arg).collect();
    let (function, call) = library.resolve(template, &head, &args)?;

    Ok(Segment::Call {
        function,
        call,
        args,
    })
}

fn to_arg(token: Token) -> Arg {
    if token.quoted {
        return Arg::Str(token.text);
    }
    if let Ok(int) = token.text.parse::<i64>() {
        return Arg::Int(int);
    }
    if let Ok(float) = token.text.parse::<f64>() {
        return Arg::Float(float);
    }
    Arg::Str(token.text)
}

fn tokenize(template: &str, action: &str) -> Result<Vec<Token>, TemplateError> {
    let mut tokens = Vec::new();
    let mut chars = action.chars().peekable();

    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }

        if c == '"' {
            chars.next();
            let mut text = String::new();
            let mut closed = false;
            while let Some(c) = chars.next() {
                match c {
                    '\\' => match chars.next() {
                        Some('n') => text.push('\n'),
                        Some('t') => text.push('\t'),
                        Some(other) => text.push(other),
                        None => break,
                    },
                    '"' => {
                        closed = true;
                        break;
                    }
                    other => text.push(other),
                }
            }
            if !closed {
                return Err(TemplateError::UnterminatedString {
                    template: template.to_string(),
                    action: action.to_string(),
                });
            }
            tokens.push(Token { text, quoted: true });
            continue;
        }

        let mut text = String::new();
        while let Some(&c) = chars.peek() {
            if c.is_whitespace() {
                break;
            }
            text.push(c);
            chars.next();
        }
        tokens.push(Token {
            text,
            quoted: false,
        });
    }

    Ok(tokens)
}
