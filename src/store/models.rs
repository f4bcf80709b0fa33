use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Longest accepted `name` and `username`, in characters.
pub const MAX_NAME_LEN: usize = 50;

const REQUIRED: &str = "This field is required.";
const BLANK: &str = "This field may not be blank.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedQuery {
    pub id: i64,
    pub name: String,
    pub query: String,
    pub username: String,
    pub date: NaiveDate,
    pub query_comment: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuerySummary {
    pub id: i64,
    pub name: String,
    pub username: String,
    pub date: NaiveDate,
}

impl From<&SavedQuery> for QuerySummary {
    fn from(q: &SavedQuery) -> Self {
        Self {
            id: q.id,
            name: q.name.clone(),
            username: q.username.clone(),
            date: q.date,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    /// Id of the commented query
    pub query: i64,
    pub username: String,
    pub comment_text: String,
}

/// Field name to messages, serialized as a plain JSON object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            for message in messages {
                if !first {
                    f.write_str("; ")?;
                }
                write!(f, "{}: {}", field, message)?;
                first = false;
            }
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Body of `POST /api/db/post/query`, before validation
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewQueryRequest {
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub query_comment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewQuery {
    pub query: String,
    pub name: String,
    pub username: String,
    pub query_comment: String,
}

impl NewQueryRequest {
    pub fn validate(self) -> Result<NewQuery, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let query = text_field(&mut errors, "query", self.query, None);
        let name = text_field(&mut errors, "name", self.name, Some(MAX_NAME_LEN));
        let username = text_field(&mut errors, "username", self.username, Some(MAX_NAME_LEN));
        let query_comment = text_field(&mut errors, "query_comment", self.query_comment, None);

        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(NewQuery {
            query,
            name,
            username,
            query_comment,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment {
    pub query: i64,
    pub username: String,
    pub comment_text: String,
}

impl NewComment {
    /// Build from the raw path segments of
    /// `POST /api/db/post/comment/{query_id}/{username}/{comment}`.
    pub fn parse(query_id: &str, username: &str, comment: &str) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let query = match query_id.trim().parse::<i64>() {
            Ok(id) => id,
            Err(_) => {
                errors.add("query", "Incorrect type. Expected pk value, received str.");
                0
            }
        };
        let username = text_field(
            &mut errors,
            "username",
            Some(username.to_string()),
            Some(MAX_NAME_LEN),
        );
        let comment_text = text_field(&mut errors, "comment_text", Some(comment.to_string()), None);

        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(Self {
            query,
            username,
            comment_text,
        })
    }
}

fn text_field(
    errors: &mut ValidationErrors,
    field: &str,
    value: Option<String>,
    max_len: Option<usize>,
) -> String {
    let Some(value) = value else {
        errors.add(field, REQUIRED);
        return String::new();
    };
    let value = value.trim().to_string();
    if value.is_empty() {
        errors.add(field, BLANK);
    } else if let Some(max) = max_len {
        if value.chars().count() > max {
            errors.add(
                field,
                format!("Ensure this field has no more than {} characters.", max),
            );
        }
    }
    value
}
