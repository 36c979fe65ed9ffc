//! String formatting with bender-supplied values
//!
//! The template is parsed once at construction. `{}` takes the next
//! positional value, `{0}` a specific one, `{name}` a named one, and `{{` /
//! `}}` produce literal braces. Strings are substituted as-is; every other
//! value is rendered as compact JSON.
//!
//! Copyright (c) 2025 Bender Team
//! Licensed under the Apache-2.0 license

use crate::bender::{Bender, Scope};
use crate::error::{Error, Result};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
enum Segment {
    Literal(String),
    Positional(usize),
    Named(String),
}

/// Builds a string by substituting the results of benders into a template
///
/// ```
/// use bender_core::{Bender, Format};
/// use serde_json::json;
///
/// let fmt = Format::with_named(
///     "{} {} {last}",
///     [Bender::select(["first"]).unwrap(), Bender::select(["second"]).unwrap()],
///     [("last", Bender::select(["last"]).unwrap())],
/// )
/// .unwrap();
/// let source = json!({"first": "Edsger", "second": "W.", "last": "Dijkstra"});
/// assert_eq!(Bender::from(fmt).call(&source).unwrap(), json!("Edsger W. Dijkstra"));
/// ```
#[derive(Debug, Clone)]
pub struct Format {
    template: String,
    segments: Vec<Segment>,
    positional: Vec<Bender>,
    /// In the order supplied; a repeated name replaces the earlier entry
    named: Vec<(String, Bender)>,
}

impl Format {
    /// Template with positional placeholders only
    pub fn new<I, B>(template: &str, positional: I) -> Result<Self>
    where
        I: IntoIterator<Item = B>,
        B: Into<Bender>,
    {
        Self::with_named(template, positional, std::iter::empty::<(String, Bender)>())
    }

    /// Template with positional and named placeholders
    ///
    /// Fails when the template is malformed or refers to a value that was not
    /// supplied.
    pub fn with_named<I, B, N, K, V>(template: &str, positional: I, named: N) -> Result<Self>
    where
        I: IntoIterator<Item = B>,
        B: Into<Bender>,
        N: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Bender>,
    {
        let segments = parse(template)?;
        let positional: Vec<Bender> = positional.into_iter().map(Into::into).collect();
        let mut named_benders: Vec<(String, Bender)> = Vec::new();
        for (key, bender) in named {
            let key = key.into();
            let bender = bender.into();
            match named_benders.iter_mut().find(|(name, _)| *name == key) {
                Some(entry) => entry.1 = bender,
                None => named_benders.push((key, bender)),
            }
        }
        let named = named_benders;

        for segment in &segments {
            match segment {
                Segment::Positional(index) if *index >= positional.len() => {
                    return Err(Error::configuration(
                        "format",
                        format!(
                            "placeholder {{{}}} has no value ({} positional given)",
                            index,
                            positional.len()
                        ),
                    ));
                }
                Segment::Named(name) if !named.iter().any(|(n, _)| n == name) => {
                    return Err(Error::configuration(
                        "format",
                        format!("placeholder {{{}}} has no value", name),
                    ));
                }
                _ => {}
            }
        }

        Ok(Self {
            template: template.to_string(),
            segments,
            positional,
            named,
        })
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    /// Positional values are evaluated first, then named ones, each in the
    /// order supplied, so the first failure is always the same one.
    pub(crate) fn eval(&self, document: &Value, scope: Scope<'_>) -> Result<Value> {
        let positional = self
            .positional
            .iter()
            .map(|bender| bender.eval(document, scope))
            .collect::<Result<Vec<_>>>()?;
        let named = self
            .named
            .iter()
            .map(|(name, bender)| Ok((name.as_str(), bender.eval(document, scope)?)))
            .collect::<Result<Vec<_>>>()?;

        let mut out = String::with_capacity(self.template.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Positional(index) => render(&mut out, &positional[*index]),
                Segment::Named(name) => {
                    if let Some((_, value)) = named.iter().find(|(n, _)| *n == name.as_str()) {
                        render(&mut out, value);
                    }
                }
            }
        }
        Ok(Value::String(out))
    }
}

fn render(out: &mut String, value: &Value) {
    match value {
        Value::String(s) => out.push_str(s),
        other => out.push_str(&other.to_string()),
    }
}

fn parse(template: &str) -> Result<Vec<Segment>> {
    let invalid = |message: String| Error::configuration("format", message);

    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut next_auto = 0usize;
    let mut numbering: Option<bool> = None; // Some(true) = automatic, Some(false) = manual
    let mut chars = template.char_indices().peekable();

    while let Some((pos, c)) = chars.next() {
        match c {
            '{' if chars.peek().map(|&(_, n)| n) == Some('{') => {
                chars.next();
                literal.push('{');
            }
            '}' if chars.peek().map(|&(_, n)| n) == Some('}') => {
                chars.next();
                literal.push('}');
            }
            '}' => return Err(invalid(format!("single '}}' at position {}", pos))),
            '{' => {
                let mut field = String::new();
                let mut closed = false;
                for (_, n) in chars.by_ref() {
                    if n == '}' {
                        closed = true;
                        break;
                    }
                    field.push(n);
                }
                if !closed {
                    return Err(invalid(format!("unclosed '{{' at position {}", pos)));
                }

                if !literal.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut literal)));
                }

                let segment = if field.is_empty() {
                    if numbering == Some(false) {
                        return Err(invalid(
                            "cannot switch from manual to automatic field numbering".to_string(),
                        ));
                    }
                    numbering = Some(true);
                    next_auto += 1;
                    Segment::Positional(next_auto - 1)
                } else if let Ok(index) = field.parse::<usize>() {
                    if numbering == Some(true) {
                        return Err(invalid(
                            "cannot switch from automatic to manual field numbering".to_string(),
                        ));
                    }
                    numbering = Some(false);
                    Segment::Positional(index)
                } else if is_identifier(&field) {
                    Segment::Named(field)
                } else {
                    return Err(invalid(format!("unsupported placeholder {{{}}}", field)));
                };
                segments.push(segment);
            }
            other => literal.push(other),
        }
    }

    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }
    Ok(segments)
}

fn is_identifier(field: &str) -> bool {
    let mut chars = field.chars();
    matches!(chars.next(), Some(c) if c.is_alphabetic() || c == '_')
        && chars.all(|c| c.is_alphanumeric() || c == '_')
}
