//! Positional field coercion.

use crate::models::{EventKind, RawField, RawRecord};

use super::fields::{layout, FieldKind, FieldSpec};
use super::ValidationError;

/// Walks a raw record against the layout of one event kind.
///
/// Arity is checked up front, so every accessor only has to coerce.
pub struct FieldReader<'a> {
    kind: EventKind,
    layout: &'static [FieldSpec],
    fields: &'a [RawField],
    index: usize,
}

impl<'a> FieldReader<'a> {
    pub fn new(kind: EventKind, record: &'a RawRecord) -> Result<Self, ValidationError> {
        let layout = layout(kind);
        if record.len() != layout.len() {
            return Err(ValidationError::new(
                kind.as_str(),
                format!(
                    "expected {} fields, found {}",
                    layout.len(),
                    record.len()
                ),
            ));
        }

        Ok(Self {
            kind,
            layout,
            fields: record.fields(),
            index: 0,
        })
    }

    /// True once every field has been consumed.
    pub fn is_exhausted(&self) -> bool {
        self.index == self.fields.len()
    }

    pub fn float(&mut self, name: &str) -> Result<f64, ValidationError> {
        let (spec, raw) = self.next(name, FieldKind::Float);
        match raw.as_number() {
            Some(n) if n.is_finite() => Ok(n),
            Some(n) => Err(self.error(spec, format!("expected a finite number, found {}", n))),
            None => Err(self.error(spec, format!("expected a number, found text {}", raw))),
        }
    }

    pub fn integer(&mut self, name: &str) -> Result<i64, ValidationError> {
        let (spec, raw) = self.next(name, FieldKind::Integer);
        match raw.as_number() {
            Some(n)
                if n.is_finite()
                    && n.fract() == 0.0
                    && n >= i64::MIN as f64
                    && n <= i64::MAX as f64 =>
            {
                Ok(n as i64)
            }
            Some(n) => Err(self.error(spec, format!("expected an integer, found {}", n))),
            None => Err(self.error(spec, format!("expected an integer, found text {}", raw))),
        }
    }

    pub fn text(&mut self, name: &str) -> Result<String, ValidationError> {
        let (spec, raw) = self.next(name, FieldKind::Text);
        match raw.as_text() {
            Some(s) => Ok(s.to_string()),
            None => Err(self.error(spec, format!("expected text, found number {}", raw))),
        }
    }

    /// Identifiers that may have been serialised as numbers.
    ///
    /// Text and log tokens are kept as written; only JSON numbers are
    /// rendered to their shortest decimal form.
    pub fn text_or_number(&mut self, name: &str) -> Result<String, ValidationError> {
        let (spec, raw) = self.next(name, FieldKind::TextOrNumber);
        match raw {
            RawField::Text(s) | RawField::Token(s) => Ok(s.clone()),
            RawField::Number(n) if n.is_finite() => Ok(n.to_string()),
            RawField::Number(n) => {
                let message = format!("expected text or a finite number, found {}", n);
                Err(self.error(spec, message))
            }
        }
    }

    pub fn flag(&mut self, name: &str) -> Result<bool, ValidationError> {
        let (spec, raw) = self.next(name, FieldKind::Flag);
        match raw.as_text() {
            Some("True") => Ok(true),
            Some("False") => Ok(false),
            _ => {
                let message = format!("expected \"True\" or \"False\", found {}", raw);
                Err(self.error(spec, message))
            }
        }
    }

    fn next(&mut self, name: &str, kind: FieldKind) -> (FieldSpec, &'a RawField) {
        let spec = self.layout[self.index];
        debug_assert_eq!(spec.name, name, "{} layout out of step", self.kind);
        debug_assert_eq!(spec.kind, kind, "{}.{} coerced as the wrong kind", self.kind, name);
        let fields = self.fields;
        let raw = &fields[self.index];
        self.index += 1;
        (spec, raw)
    }

    fn error(&self, spec: FieldSpec, message: String) -> ValidationError {
        ValidationError::new(
            format!("{}[{}].{}", self.kind, self.index - 1, spec.name),
            message,
        )
    }
}
