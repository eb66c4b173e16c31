//! Code snippets shared by registered users.
//!
//! A snippet belongs to the user who created it. Titles must mention
//! "django" and the JavaScript/friendly pairing is refused; both rules are
//! checked when a draft is built, before any store access.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::user::{UserId, Username};

/// Maximum snippet title length in characters.
pub const SNIPPET_TITLE_MAX: usize = 100;

/// Word every snippet title must contain, case-insensitively.
pub const SNIPPET_TITLE_KEYWORD: &str = "django";

/// Language used to highlight a snippet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Python,
    Javascript,
}

/// Highlighting theme for a snippet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    #[default]
    Friendly,
    Monokai,
}

/// Error returned when a stored or submitted choice is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {value:?}")]
pub struct ChoiceParseError {
    pub kind: &'static str,
    pub value: String,
}

impl Language {
    /// Wire and storage tag.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Python => "python",
            Self::Javascript => "javascript",
        }
    }
}

impl Style {
    /// Wire and storage tag.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Friendly => "friendly",
            Self::Monokai => "monokai",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = ChoiceParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "python" => Ok(Self::Python),
            "javascript" => Ok(Self::Javascript),
            other => Err(ChoiceParseError {
                kind: "language",
                value: other.to_owned(),
            }),
        }
    }
}

impl FromStr for Style {
    type Err = ChoiceParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "friendly" => Ok(Self::Friendly),
            "monokai" => Ok(Self::Monokai),
            other => Err(ChoiceParseError {
                kind: "style",
                value: other.to_owned(),
            }),
        }
    }
}

/// Store-assigned snippet identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct SnippetId(i64);

/// Error returned for non-positive snippet identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("snippet identifiers must be positive")]
pub struct InvalidSnippetId;

impl SnippetId {
    /// Validate and construct a [`SnippetId`].
    pub fn new(id: i64) -> Result<Self, InvalidSnippetId> {
        if id <= 0 {
            return Err(InvalidSnippetId);
        }
        Ok(Self(id))
    }

    /// Raw identifier value.
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for SnippetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<SnippetId> for i64 {
    fn from(value: SnippetId) -> Self {
        value.0
    }
}

impl TryFrom<i64> for SnippetId {
    type Error = InvalidSnippetId;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// The user a snippet belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnippetOwner {
    pub id: UserId,
    pub username: Username,
}

/// A stored snippet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snippet {
    pub id: SnippetId,
    pub title: String,
    pub code: String,
    pub lineos: bool,
    pub language: Language,
    pub style: Style,
    pub owner: SnippetOwner,
    pub created_at: DateTime<Utc>,
}

impl Snippet {
    /// Whether `user` may change or delete this snippet, given their role.
    pub fn writable_by(&self, user: UserId, is_admin: bool) -> bool {
        is_admin || self.owner.id == user
    }
}

/// Raw snippet inputs as received from an inbound adapter.
#[derive(Debug, Clone, Copy, Default)]
pub struct SnippetParts<'a> {
    pub title: Option<&'a str>,
    pub code: Option<&'a str>,
    pub lineos: Option<bool>,
    pub language: Option<&'a str>,
    pub style: Option<&'a str>,
}

/// Reasons a snippet payload is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SnippetValidationError {
    #[error("title must not be empty")]
    EmptyTitle,
    #[error("title must be at most {max} characters")]
    TitleTooLong { max: usize },
    #[error("title must contain the word \"django\"")]
    TitleMissingKeyword,
    #[error("code must not be empty")]
    EmptyCode,
    #[error(transparent)]
    UnknownChoice(ChoiceParseError),
    #[error("friendly style is not allowed with javascript")]
    StyleNotAllowed,
}

impl SnippetValidationError {
    /// Request field the failure refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyTitle | Self::TitleTooLong { .. } | Self::TitleMissingKeyword => "title",
            Self::EmptyCode => "code",
            Self::UnknownChoice(err) => err.kind,
            Self::StyleNotAllowed => "style",
        }
    }

    /// Stable machine-readable failure code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyTitle => "empty_title",
            Self::TitleTooLong { .. } => "title_too_long",
            Self::TitleMissingKeyword => "title_missing_keyword",
            Self::EmptyCode => "empty_code",
            Self::UnknownChoice(_) => "invalid_choice",
            Self::StyleNotAllowed => "style_not_allowed",
        }
    }
}

/// Validated snippet contents, used for both creation and replacement.
///
/// ## Invariants
/// - `title` is trimmed, non-empty, at most [`SNIPPET_TITLE_MAX`] characters
///   and contains [`SNIPPET_TITLE_KEYWORD`] in any case.
/// - `code` is not blank.
/// - `language` and `style` are never JavaScript with the friendly style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnippetDraft {
    title: String,
    code: String,
    lineos: bool,
    language: Language,
    style: Style,
}

impl SnippetDraft {
    /// Validate raw inputs; omitted options take their defaults.
    ///
    /// # Examples
    /// ```
    /// use campus_auth::domain::{Language, SnippetDraft, SnippetParts};
    ///
    /// let draft = SnippetDraft::try_from_parts(SnippetParts {
    ///     title: Some("Django views"),
    ///     code: Some("print('hi')"),
    ///     ..SnippetParts::default()
    /// })
    /// .unwrap();
    /// assert_eq!(draft.language(), Language::Python);
    /// ```
    pub fn try_from_parts(parts: SnippetParts<'_>) -> Result<Self, SnippetValidationError> {
        let title = parts.title.map(str::trim).unwrap_or_default();
        if title.is_empty() {
            return Err(SnippetValidationError::EmptyTitle);
        }
        if title.chars().count() > SNIPPET_TITLE_MAX {
            return Err(SnippetValidationError::TitleTooLong {
                max: SNIPPET_TITLE_MAX,
            });
        }
        if !title.to_lowercase().contains(SNIPPET_TITLE_KEYWORD) {
            return Err(SnippetValidationError::TitleMissingKeyword);
        }

        let code = parts.code.unwrap_or_default();
        if code.trim().is_empty() {
            return Err(SnippetValidationError::EmptyCode);
        }

        let language = parts
            .language
            .map(str::parse::<Language>)
            .transpose()
            .map_err(SnippetValidationError::UnknownChoice)?
            .unwrap_or_default();
        let style = parts
            .style
            .map(str::parse::<Style>)
            .transpose()
            .map_err(SnippetValidationError::UnknownChoice)?
            .unwrap_or_default();
        if language == Language::Javascript && style == Style::Friendly {
            return Err(SnippetValidationError::StyleNotAllowed);
        }

        Ok(Self {
            title: title.to_owned(),
            code: code.to_owned(),
            lineos: parts.lineos.unwrap_or(false),
            language,
            style,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn lineos(&self) -> bool {
        self.lineos
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn style(&self) -> Style {
        self.style
    }
}
