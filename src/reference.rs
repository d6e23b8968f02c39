//! User-supplied asset references.

use crate::cache::is_plain_segment;
use crate::InstallError;
use std::fmt;
use std::str::FromStr;

/// A parsed reference to an asset in the registry.
///
/// A reference is either an opaque registry identifier (`42`) or an
/// `author/title` pair (`jane/Widget`). Parsing is pure: it never touches the
/// network or the filesystem.
///
/// The author/title form is split on the **first** `/`, so `a/b/c` names
/// author `a` and title `b/c`. Titles containing `/` are not otherwise
/// supported.
///
/// # Example
///
/// ```rust
/// use gibson::AssetReference;
///
/// let by_id: AssetReference = "42".parse().unwrap();
/// assert_eq!(by_id, AssetReference::ById("42".to_string()));
///
/// let by_author: AssetReference = "jane/Widget".parse().unwrap();
/// assert_eq!(by_author.author_title(), Some(("jane", "Widget")));
/// assert_eq!(by_author.to_string(), "jane/Widget");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AssetReference {
    /// A registry identifier.
    ById(String),
    /// An author and the exact title of one of their assets.
    ByAuthor {
        /// The registry user who published the asset.
        author: String,
        /// The asset title, matched case-sensitively.
        title: String,
    },
}

impl AssetReference {
    /// Parse a raw reference.
    ///
    /// Surrounding whitespace is ignored. Empty input, an author/title form
    /// with an empty side, and author/title parts that are not plain path
    /// names (`..`, `.`, a leading `/`) are rejected with
    /// [`InstallError::InvalidReference`].
    pub fn parse(raw: &str) -> Result<Self, InstallError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(InstallError::invalid_reference(raw, "reference is empty"));
        }

        match trimmed.split_once('/') {
            None => Ok(Self::ById(trimmed.to_string())),
            Some(("", _)) => Err(InstallError::invalid_reference(raw, "author is empty")),
            Some((_, "")) => Err(InstallError::invalid_reference(raw, "title is empty")),
            Some((author, _)) if !is_plain_segment(author) => Err(
                InstallError::invalid_reference(raw, "author must be a plain name"),
            ),
            Some((_, title)) if !is_plain_segment(title) => Err(
                InstallError::invalid_reference(raw, "title must not contain '.' or '..' parts"),
            ),
            Some((author, title)) => Ok(Self::ByAuthor {
                author: author.to_string(),
                title: title.to_string(),
            }),
        }
    }

    /// The author and title, for author/title references.
    pub fn author_title(&self) -> Option<(&str, &str)> {
        match self {
            Self::ById(_) => None,
            Self::ByAuthor { author, title } => Some((author, title)),
        }
    }

    /// Whether this reference is a registry identifier.
    pub fn is_by_id(&self) -> bool {
        matches!(self, Self::ById(_))
    }
}

impl FromStr for AssetReference {
    type Err = InstallError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for AssetReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ById(id) => f.write_str(id),
            Self::ByAuthor { author, title } => write!(f, "{author}/{title}"),
        }
    }
}
