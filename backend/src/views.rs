//! HTML templates.
//!
//! Templates are plain HTML with `{{ field }}` placeholders. They are compiled
//! once at startup so that a broken template stops the server before it
//! accepts requests; rendering a compiled template cannot fail.

use crate::github::AuthorizeUrls;
use std::result;

/// `Result` type for `Error`.
pub type Result<T, E = Error> = result::Result<T, E>;

/// The home page template source.
pub const HOME_TEMPLATE: &str = include_str!("../templates/home.html");

/// Errors encountered compiling a template.
#[derive(Debug, thiserror::Error, Eq, PartialEq)]
pub enum Error {
    /// A `{{` without a matching `}}`.
    #[error("unclosed placeholder at byte {0}")]
    Unclosed(usize),

    /// A placeholder naming a field that doesn’t exist.
    #[error("unknown field {0:?}")]
    UnknownField(String),
}

/// A value that can be substituted into a template.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Field {
    /// [`AuthorizeUrls::user_info_url`]
    UserInfoUrl,
    /// [`AuthorizeUrls::user_emails_url`]
    UserEmailsUrl,
    /// [`AuthorizeUrls::user_orgs_url`]
    UserOrgsUrl,
}

impl Field {
    /// Look up a field by its placeholder name.
    fn parse(name: &str) -> Result<Self> {
        match name {
            "user_info_url" => Ok(Self::UserInfoUrl),
            "user_emails_url" => Ok(Self::UserEmailsUrl),
            "user_orgs_url" => Ok(Self::UserOrgsUrl),
            _ => Err(Error::UnknownField(name.to_owned())),
        }
    }

    /// Get the unescaped value of this field.
    fn value(self, urls: &AuthorizeUrls) -> &str {
        match self {
            Self::UserInfoUrl => urls.user_info_url.as_str(),
            Self::UserEmailsUrl => urls.user_emails_url.as_str(),
            Self::UserOrgsUrl => urls.user_orgs_url.as_str(),
        }
    }
}

/// A piece of a compiled template.
#[derive(Clone, Debug, Eq, PartialEq)]
enum Segment {
    /// Output as is.
    Literal(String),
    /// Output the field, HTML escaped.
    Field(Field),
}

/// A compiled template that renders [`AuthorizeUrls`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Template {
    /// Segments in output order.
    segments: Vec<Segment>,
}

impl Template {
    /// Compile template source.
    ///
    /// # Errors
    ///
    /// Returns an error if a placeholder is unclosed or names an unknown
    /// field.
    pub fn compile(source: &str) -> Result<Self> {
        let mut segments = Vec::new();
        let mut rest = source;
        let mut offset = 0;

        while let Some(start) = rest.find("{{") {
            if start > 0 {
                segments.push(Segment::Literal(rest[..start].to_owned()));
            }

            let inner = &rest[start + 2..];
            let end = inner
                .find("}}")
                .ok_or(Error::Unclosed(offset + start))?;
            segments.push(Segment::Field(Field::parse(inner[..end].trim())?));

            let consumed = start + 2 + end + 2;
            offset += consumed;
            rest = &rest[consumed..];
        }

        if !rest.is_empty() {
            segments.push(Segment::Literal(rest.to_owned()));
        }

        Ok(Self { segments })
    }

    /// Compile the built in home page template.
    ///
    /// # Errors
    ///
    /// Returns an error if the template is broken.
    pub fn home() -> Result<Self> {
        Self::compile(HOME_TEMPLATE)
    }

    /// Render the template.
    ///
    /// Fields are escaped for use in double quoted attributes, which is also
    /// safe in text.
    #[must_use]
    pub fn render(&self, urls: &AuthorizeUrls) -> String {
        let mut output = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => output.push_str(text),
                Segment::Field(field) => {
                    html_escape::encode_double_quoted_attribute_to_string(
                        field.value(urls),
                        &mut output,
                    );
                }
            }
        }
        output
    }
}
