use std::fs;
use std::path::Path;

use actix_multipart::form::{MultipartForm, tempfile::TempFile, text::Text};
use chrono::{NaiveDateTime, Utc};
use thiserror::Error;

use crate::domain::post::{NewPost, PostUpdate};
use crate::domain::types::{
    CategoryId, LocationId, PostBody, PostTitle, Slug, TypeConstraintError, UserId,
};

/// Accepted `pub_date` input formats: the datetime-local widget value and a
/// plain space-separated timestamp.
const PUB_DATE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"];

const IMAGE_EXTENSIONS: &[&str] = &["gif", "jpeg", "jpg", "png", "webp"];

/// Uploaded post images land under this directory inside the media root and
/// are served from the matching `/media` mount.
const IMAGE_SUBDIR: &str = "post_images";

fn parse_pub_date(value: &str) -> Result<NaiveDateTime, PostFormError> {
    let trimmed = value.trim();
    PUB_DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
        .ok_or_else(|| PostFormError::InvalidDate(trimmed.to_string()))
}

/// Select inputs submit an empty string when nothing is chosen.
fn parse_optional_id(value: Option<Text<String>>) -> Result<Option<i32>, PostFormError> {
    match value.as_deref().map(|raw| raw.trim()) {
        None | Some("") => Ok(None),
        Some(raw) => raw
            .parse::<i32>()
            .map(Some)
            .map_err(|_| PostFormError::Validation(format!("invalid identifier: {raw}"))),
    }
}

fn sanitize_file_stem(stem: &str) -> String {
    let cleaned: String = stem
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .take(40)
        .collect();
    if cleaned.is_empty() {
        "image".to_string()
    } else {
        cleaned
    }
}

/// Copy an uploaded image out of its temp file into the media root and
/// return the web path it will be served from. A zero-length part means the
/// file input was left empty.
fn store_image(upload: TempFile, media_root: &Path) -> Result<Option<String>, PostFormError> {
    if upload.size == 0 {
        return Ok(None);
    }

    let original = upload.file_name.as_deref().unwrap_or_default();
    let extension = Path::new(original)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .filter(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
        .ok_or_else(|| PostFormError::UnsupportedImage(original.to_string()))?;

    let stem = sanitize_file_stem(
        Path::new(original)
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or_default(),
    );
    let file_name = format!("{stem}-{}.{extension}", Utc::now().timestamp_micros());

    let directory = media_root.join(IMAGE_SUBDIR);
    fs::create_dir_all(&directory)?;
    fs::copy(upload.file.path(), directory.join(&file_name))?;

    Ok(Some(format!("/media/{IMAGE_SUBDIR}/{file_name}")))
}

#[derive(MultipartForm)]
pub struct PostForm {
    pub title: Text<String>,
    pub text: Text<String>,
    pub slug: Text<String>,
    pub pub_date: Text<String>,
    pub category_id: Option<Text<String>>,
    pub location_id: Option<Text<String>>,
    #[multipart(limit = "5MB")]
    pub image: Option<TempFile>,
    /// Checkbox: present when ticked, absent otherwise.
    pub is_published: Option<Text<String>>,
}

impl PostForm {
    /// Validate the text fields and stash the uploaded image, if any, under
    /// the media root. `image: None` in the payload means "no new upload",
    /// not "clear the image".
    pub fn into_payload(self, media_root: &Path) -> Result<PostFormPayload, PostFormError> {
        let category_id = parse_optional_id(self.category_id)?
            .map(CategoryId::new)
            .transpose()?;
        let location_id = parse_optional_id(self.location_id)?
            .map(LocationId::new)
            .transpose()?;

        let title = PostTitle::new(self.title.into_inner())?;
        let text = PostBody::new(self.text.into_inner())?;
        let slug = Slug::new(self.slug.into_inner())?;
        let pub_date = parse_pub_date(&self.pub_date)?;

        // Only touch the filesystem once the rest of the form is valid.
        let image = match self.image {
            Some(upload) => store_image(upload, media_root)?,
            None => None,
        };

        Ok(PostFormPayload {
            title,
            text,
            slug,
            pub_date,
            is_published: self.is_published.is_some(),
            category_id,
            location_id,
            image,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PostFormPayload {
    pub title: PostTitle,
    pub text: PostBody,
    pub slug: Slug,
    pub pub_date: NaiveDateTime,
    pub is_published: bool,
    pub category_id: Option<CategoryId>,
    pub location_id: Option<LocationId>,
    pub image: Option<String>,
}

impl PostFormPayload {
    pub fn into_new_post(self, author_id: UserId) -> NewPost {
        NewPost {
            title: self.title,
            text: self.text,
            slug: self.slug,
            pub_date: self.pub_date,
            is_published: self.is_published,
            author_id,
            category_id: self.category_id,
            location_id: self.location_id,
            image: self.image,
            created_at: Utc::now().naive_utc(),
        }
    }

    pub fn into_post_update(self) -> PostUpdate {
        PostUpdate {
            title: self.title,
            text: self.text,
            slug: self.slug,
            pub_date: self.pub_date,
            is_published: self.is_published,
            category_id: self.category_id,
            location_id: self.location_id,
            image: self.image,
        }
    }
}

#[derive(Debug, Error)]
pub enum PostFormError {
    #[error("Post form validation failed: {0}")]
    Validation(String),
    #[error("Post form contains invalid data: {0}")]
    TypeConstraint(String),
    #[error("Publication date is not a valid timestamp: {0}")]
    InvalidDate(String),
    #[error("Unsupported image file: {0}")]
    UnsupportedImage(String),
    #[error("Failed to store the uploaded image")]
    ImageStore(#[from] std::io::Error),
}

impl From<TypeConstraintError> for PostFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}
