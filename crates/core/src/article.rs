//! Article field enumerants and validation.
//!
//! Status and media-type values are stored as lowercase TEXT in both the
//! live store and version-store snapshots; parsing rejects anything outside
//! the known sets with a [`CoreError::Validation`].

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Article status
// ---------------------------------------------------------------------------

pub const STATUS_DRAFT: &str = "draft";
pub const STATUS_PUBLISHED: &str = "published";
pub const STATUS_ARCHIVED: &str = "archived";

/// Lifecycle status of a live article.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArticleStatus {
    Draft,
    Published,
    Archived,
}

impl ArticleStatus {
    /// The canonical lowercase storage form.
    pub fn as_str(&self) -> &'static str {
        match self {
            ArticleStatus::Draft => STATUS_DRAFT,
            ArticleStatus::Published => STATUS_PUBLISHED,
            ArticleStatus::Archived => STATUS_ARCHIVED,
        }
    }

    /// Parse a status string (case-insensitive).
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s.to_ascii_lowercase().as_str() {
            STATUS_DRAFT => Ok(ArticleStatus::Draft),
            STATUS_PUBLISHED => Ok(ArticleStatus::Published),
            STATUS_ARCHIVED => Ok(ArticleStatus::Archived),
            other => Err(CoreError::Validation(format!(
                "Invalid article status '{other}'. Valid statuses: {STATUS_DRAFT}, {STATUS_PUBLISHED}, {STATUS_ARCHIVED}"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Media type
// ---------------------------------------------------------------------------

pub const MEDIA_IMAGE: &str = "image";
pub const MEDIA_VIDEO: &str = "video";
pub const MEDIA_AUDIO: &str = "audio";
pub const MEDIA_OTHER: &str = "other";

/// Kind of a media attachment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Image,
    Video,
    Audio,
    Other,
}

impl MediaType {
    /// The canonical lowercase storage form.
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Image => MEDIA_IMAGE,
            MediaType::Video => MEDIA_VIDEO,
            MediaType::Audio => MEDIA_AUDIO,
            MediaType::Other => MEDIA_OTHER,
        }
    }

    /// Parse a media type string (case-insensitive).
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s.to_ascii_lowercase().as_str() {
            MEDIA_IMAGE => Ok(MediaType::Image),
            MEDIA_VIDEO => Ok(MediaType::Video),
            MEDIA_AUDIO => Ok(MediaType::Audio),
            MEDIA_OTHER => Ok(MediaType::Other),
            other => Err(CoreError::Validation(format!(
                "Invalid media type '{other}'. Valid types: {MEDIA_IMAGE}, {MEDIA_VIDEO}, {MEDIA_AUDIO}, {MEDIA_OTHER}"
            ))),
        }
    }

    /// Map a MIME content type to a media type for uploads.
    pub fn from_mime(content_type: &str) -> Self {
        let prefix = content_type
            .split('/')
            .next()
            .unwrap_or("")
            .to_ascii_lowercase();
        match prefix.as_str() {
            "image" => MediaType::Image,
            "video" => MediaType::Video,
            "audio" => MediaType::Audio,
            _ => MediaType::Other,
        }
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate an article title (non-empty, <= 200 chars).
pub fn validate_title(title: &str) -> Result<(), CoreError> {
    if title.trim().is_empty() {
        return Err(CoreError::Validation("Title must not be empty".into()));
    }
    if title.len() > 200 {
        return Err(CoreError::Validation(
            "Title must be at most 200 characters".into(),
        ));
    }
    Ok(())
}

/// Validate article content source (non-empty, <= 200 000 chars).
pub fn validate_content(content: &str) -> Result<(), CoreError> {
    if content.trim().is_empty() {
        return Err(CoreError::Validation("Content must not be empty".into()));
    }
    if content.len() > 200_000 {
        return Err(CoreError::Validation(
            "Content must be at most 200000 characters".into(),
        ));
    }
    Ok(())
}

/// Validate a media URL (non-empty, <= 2000 chars).
pub fn validate_media_url(url: &str) -> Result<(), CoreError> {
    if url.trim().is_empty() {
        return Err(CoreError::Validation("Media URL must not be empty".into()));
    }
    if url.len() > 2000 {
        return Err(CoreError::Validation(
            "Media URL must be at most 2000 characters".into(),
        ));
    }
    Ok(())
}

/// Validate a media description (<= 500 chars when present).
pub fn validate_media_description(description: &str) -> Result<(), CoreError> {
    if description.len() > 500 {
        return Err(CoreError::Validation(
            "Media description must be at most 500 characters".into(),
        ));
    }
    Ok(())
}

/// Validate a comment body (non-empty, <= 5000 chars).
pub fn validate_comment_text(text: &str) -> Result<(), CoreError> {
    if text.trim().is_empty() {
        return Err(CoreError::Validation(
            "Comment text must not be empty".into(),
        ));
    }
    if text.len() > 5000 {
        return Err(CoreError::Validation(
            "Comment text must be at most 5000 characters".into(),
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
