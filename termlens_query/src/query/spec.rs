//! Rendered, parameter-checked queries

use std::collections::HashSet;
use std::fmt;

use crate::backend::QueryParam;
use crate::error::{QueryError, Result};

/// Query text plus its bound parameters, ready for the executor.
///
/// Construction enforces that every `@name` placeholder in the text has
/// exactly one parameter and that every parameter is referenced at least
/// once, so an executor never sees an unbound or stray binding.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyticalQuerySpec {
    query_text: String,
    parameters: Vec<QueryParam>,
}

impl AnalyticalQuerySpec {
    pub fn new(query_text: impl Into<String>, parameters: Vec<QueryParam>) -> Result<Self> {
        let query_text = query_text.into();

        let mut bound = HashSet::with_capacity(parameters.len());
        for param in &parameters {
            if !bound.insert(param.name.as_str()) {
                return Err(QueryError::DuplicateParameter(param.name.clone()));
            }
        }

        let names = placeholders(&query_text);
        if let Some(missing) = names.iter().find(|name| !bound.contains(*name)) {
            return Err(QueryError::UnboundPlaceholder(missing.to_string()));
        }
        let referenced: HashSet<&str> = names.into_iter().collect();
        if let Some(unused) = parameters
            .iter()
            .find(|p| !referenced.contains(p.name.as_str()))
        {
            return Err(QueryError::UnusedParameter(unused.name.clone()));
        }

        Ok(Self {
            query_text,
            parameters,
        })
    }

    pub fn query_text(&self) -> &str {
        &self.query_text
    }

    pub fn parameters(&self) -> &[QueryParam] {
        &self.parameters
    }

    pub fn param(&self, name: &str) -> Option<&QueryParam> {
        self.parameters.iter().find(|p| p.name == name)
    }
}

impl fmt::Display for AnalyticalQuerySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.query_text)?;
        for param in &self.parameters {
            write!(f, " [{}]", param)?;
        }
        Ok(())
    }
}

/// Names of all `@placeholder`s in `text`, in order of appearance.
///
/// Quoted strings and back-ticked identifiers are skipped.
pub fn placeholders(text: &str) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut names = Vec::new();
    let mut quote: Option<u8> = None;
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        match quote {
            Some(q) => {
                if b == q {
                    quote = None;
                }
                i += 1;
            }
            None if b == b'\'' || b == b'"' || b == b'`' => {
                quote = Some(b);
                i += 1;
            }
            None if b == b'@' => {
                let start = i + 1;
                let mut end = start;
                while end < bytes.len() && (bytes[end].is_ascii_alphanumeric() || bytes[end] == b'_') {
                    end += 1;
                }
                if end > start && !bytes[start].is_ascii_digit() {
                    names.push(&text[start..end]);
                }
                i = end.max(start);
            }
            None => i += 1,
        }
    }
    names
}
