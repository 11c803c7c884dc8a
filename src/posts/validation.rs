use once_cell::sync::Lazy;
use thiserror::Error;

pub const TITLE_MIN_LEN: usize = 5;
pub const TITLE_MAX_LEN: usize = 60;
pub const CONTENT_MIN_LEN: usize = 100;
pub const CONTENT_MAX_LEN: usize = 1600;
pub const AUTHOR_MIN_LEN: usize = 2;
pub const AUTHOR_MAX_LEN: usize = 70;

/// Share of special characters (0.0-1.0) above which text is rejected
pub const MAX_SPECIAL_RATIO: f64 = 0.10;

/// Length of a run of one letter or digit that counts as noise
pub const MAX_CHAR_RUN: usize = 4;

pub const SPECIAL_CHARS: &str = "!@#$%^&*()_+{}[]:;\"'<,>.?/\\|~`";

pub const DEFAULT_SPAM_PHRASES: &[&str] = &[
    "buy now",
    "discount",
    "click here",
    "act now",
    "limited offer",
    "free money",
];

/// One specific reason a title, content or author string was rejected
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("title cannot be empty")]
    TitleEmpty,

    #[error("title must be between 5 and 60 characters")]
    TitleLengthInvalid,

    #[error("title contains too many special characters")]
    TitleInvalidChars,

    #[error("title contains consecutive whitespace")]
    TitleFormatInvalid,

    #[error("title contains spam phrases")]
    TitleSpammy,

    #[error("title words must start with an uppercase letter followed by lowercase letters")]
    TitleCapitalizationInvalid,

    #[error("content cannot be empty")]
    ContentEmpty,

    #[error("content must be between 100 and 1600 characters")]
    ContentLengthInvalid,

    #[error("content is not valid unicode text")]
    ContentEncodingInvalid,

    #[error("content contains too many special characters")]
    ContentInvalidChars,

    #[error("content repeats the same character 4 or more times in a row")]
    ContentConsecutiveChar,

    #[error("author cannot be empty")]
    AuthorEmpty,

    #[error("author name must be between 2 and 70 characters")]
    AuthorNameInvalid,
}

impl ValidationError {
    /// Post field the failure belongs to
    pub fn field(&self) -> &'static str {
        use ValidationError::*;
        match self {
            TitleEmpty
            | TitleLengthInvalid
            | TitleInvalidChars
            | TitleFormatInvalid
            | TitleSpammy
            | TitleCapitalizationInvalid => "title",
            ContentEmpty
            | ContentLengthInvalid
            | ContentEncodingInvalid
            | ContentInvalidChars
            | ContentConsecutiveChar => "content",
            AuthorEmpty | AuthorNameInvalid => "author",
        }
    }

    /// Stable error code for client handling
    pub fn code(&self) -> &'static str {
        use ValidationError::*;
        match self {
            TitleEmpty => "TITLE_EMPTY",
            TitleLengthInvalid => "TITLE_LENGTH_INVALID",
            TitleInvalidChars => "TITLE_INVALID_CHARS",
            TitleFormatInvalid => "TITLE_FORMAT_INVALID",
            TitleSpammy => "TITLE_SPAMMY",
            TitleCapitalizationInvalid => "TITLE_CAPITALIZATION_INVALID",
            ContentEmpty => "CONTENT_EMPTY",
            ContentLengthInvalid => "CONTENT_LENGTH_INVALID",
            ContentEncodingInvalid => "CONTENT_ENCODING_INVALID",
            ContentInvalidChars => "CONTENT_INVALID_CHARS",
            ContentConsecutiveChar => "CONTENT_CONSECUTIVE_CHAR",
            AuthorEmpty => "AUTHOR_EMPTY",
            AuthorNameInvalid => "AUTHOR_NAME_INVALID",
        }
    }
}

/// Editorial rules applied to every post before it reaches the store.
///
/// The only configurable piece is the spam denylist; everything else is fixed.
/// Phrases are matched against the lowercased title, so they are stored lowercase.
#[derive(Debug, Clone)]
pub struct ValidationRules {
    spam_phrases: Vec<String>,
}

static DEFAULT_RULES: Lazy<ValidationRules> = Lazy::new(ValidationRules::default);

impl Default for ValidationRules {
    fn default() -> Self {
        Self::new(DEFAULT_SPAM_PHRASES.iter().copied())
    }
}

impl ValidationRules {
    pub fn new<I, S>(spam_phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            spam_phrases: spam_phrases
                .into_iter()
                .map(|p| p.as_ref().trim().to_lowercase())
                .filter(|p| !p.is_empty())
                .collect(),
        }
    }

    pub fn spam_phrases(&self) -> &[String] {
        &self.spam_phrases
    }

    pub fn validate_title(&self, title: &str) -> Result<(), ValidationError> {
        if title.is_empty() {
            return Err(ValidationError::TitleEmpty);
        }

        let len = title.chars().count();
        if !(TITLE_MIN_LEN..=TITLE_MAX_LEN).contains(&len) {
            return Err(ValidationError::TitleLengthInvalid);
        }

        if exceeds_special_ratio(title, len) {
            return Err(ValidationError::TitleInvalidChars);
        }

        if has_consecutive_whitespace(title) {
            return Err(ValidationError::TitleFormatInvalid);
        }

        let lowered = title.to_lowercase();
        if self.spam_phrases.iter().any(|p| lowered.contains(p.as_str())) {
            return Err(ValidationError::TitleSpammy);
        }

        if !title.split_whitespace().all(is_capitalized_word) {
            return Err(ValidationError::TitleCapitalizationInvalid);
        }

        Ok(())
    }

    pub fn validate_content(&self, content: &str) -> Result<(), ValidationError> {
        if content.is_empty() {
            return Err(ValidationError::ContentEmpty);
        }

        let len = content.chars().count();
        if !(CONTENT_MIN_LEN..=CONTENT_MAX_LEN).contains(&len) {
            return Err(ValidationError::ContentLengthInvalid);
        }

        if !is_clean_text(content) {
            return Err(ValidationError::ContentEncodingInvalid);
        }

        if exceeds_special_ratio(content, len) {
            return Err(ValidationError::ContentInvalidChars);
        }

        if has_char_run(content, MAX_CHAR_RUN) {
            return Err(ValidationError::ContentConsecutiveChar);
        }

        Ok(())
    }

    pub fn validate_author_name(&self, name: &str) -> Result<(), ValidationError> {
        if name.is_empty() {
            return Err(ValidationError::AuthorEmpty);
        }

        let len = name.chars().count();
        if !(AUTHOR_MIN_LEN..=AUTHOR_MAX_LEN).contains(&len) {
            return Err(ValidationError::AuthorNameInvalid);
        }

        Ok(())
    }

    /// Title, then content, then author; the first failure wins.
    pub fn validate_post(&self, title: &str, content: &str, author: &str) -> Result<(), ValidationError> {
        self.validate_title(title)?;
        self.validate_content(content)?;
        self.validate_author_name(author)
    }
}

pub fn validate_title(title: &str) -> Result<(), ValidationError> {
    DEFAULT_RULES.validate_title(title)
}

pub fn validate_content(content: &str) -> Result<(), ValidationError> {
    DEFAULT_RULES.validate_content(content)
}

/// Byte-level entry point for content that has not been decoded yet
pub fn validate_content_bytes(content: &[u8]) -> Result<(), ValidationError> {
    if content.is_empty() {
        return Err(ValidationError::ContentEmpty);
    }
    let text = std::str::from_utf8(content).map_err(|_| ValidationError::ContentEncodingInvalid)?;
    DEFAULT_RULES.validate_content(text)
}

pub fn validate_author_name(name: &str) -> Result<(), ValidationError> {
    DEFAULT_RULES.validate_author_name(name)
}

pub fn validate_post(title: &str, content: &str, author: &str) -> Result<(), ValidationError> {
    DEFAULT_RULES.validate_post(title, content, author)
}

fn is_special(c: char) -> bool {
    SPECIAL_CHARS.contains(c)
}

fn exceeds_special_ratio(text: &str, len: usize) -> bool {
    let specials = text.chars().filter(|c| is_special(*c)).count();
    specials as f64 / len as f64 > MAX_SPECIAL_RATIO
}

fn has_consecutive_whitespace(text: &str) -> bool {
    let mut prev_ws = false;
    for c in text.chars() {
        let ws = c.is_whitespace();
        if ws && prev_ws {
            return true;
        }
        prev_ws = ws;
    }
    false
}

// Single-character words are exempt, as are numeric tokens like "2" or "3.5".
fn is_capitalized_word(word: &str) -> bool {
    if word.chars().count() <= 1 {
        return true;
    }
    if word.parse::<f64>().map_or(false, f64::is_finite) {
        return true;
    }

    // Judged on letters only, so "Rust?", "Hello," and "Don't" pass
    let mut letters = word.chars().filter(|c| c.is_alphabetic());
    match letters.next() {
        Some(first) => first.is_uppercase() && letters.all(char::is_lowercase),
        None => true,
    }
}

// U+FFFD only shows up after a lossy decode upstream.
fn is_clean_text(text: &str) -> bool {
    !text
        .chars()
        .any(|c| c == char::REPLACEMENT_CHARACTER || (c.is_control() && !matches!(c, '\t' | '\n' | '\r')))
}

fn has_char_run(text: &str, run: usize) -> bool {
    let mut prev: Option<char> = None;
    let mut count = 0;
    for c in text.chars() {
        if c.is_alphanumeric() && Some(c) == prev {
            count += 1;
        } else {
            count = 1;
        }
        if c.is_alphanumeric() && count >= run {
            return true;
        }
        prev = Some(c);
    }
    false
}
