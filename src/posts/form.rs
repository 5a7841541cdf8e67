//! Post form: submitted data, validation and the form shown to authors.

use std::collections::BTreeMap;

use serde::Serialize;
use validator::{Validate, ValidationError, ValidationErrors};

use super::group_repository::GroupRepository;
use super::types::{Group, Post};
use crate::db::DbPool;
use crate::Result;

pub(crate) const REQUIRED: &str = "This field is required.";
pub(crate) const INVALID_CHOICE: &str =
    "Select a valid choice. That choice is not one of the available choices.";
pub(crate) const INVALID_IMAGE: &str =
    "Upload a valid image. The file you uploaded was either not an image or a corrupted image.";
pub(crate) const CONTRADICTION: &str =
    "Please either submit a file or check the clear checkbox, not both.";

/// An uploaded image file as received from the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    /// File name supplied by the client.
    pub file_name: String,
    /// Declared content type, if any.
    pub content_type: Option<String>,
    /// Raw file bytes.
    pub data: Vec<u8>,
}

/// Raw field values of a submitted post form.
///
/// Only the fields authors may set are represented; anything else in the
/// request (an `author` field, for instance) is dropped by the extractor.
#[derive(Debug, Clone, Default, Validate)]
pub struct PostSubmission {
    /// Post text (required).
    #[validate(custom(function = "not_empty_trimmed"))]
    pub text: String,
    /// Selected group ID as submitted; empty means "no group".
    pub group: Option<String>,
    /// Newly uploaded image.
    pub image: Option<ImageUpload>,
    /// "Clear image" checkbox.
    pub clear_image: bool,
}

impl PostSubmission {
    /// Create a submission with only text.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Select a group by its raw form value.
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    /// Attach an uploaded image.
    pub fn with_image(mut self, image: ImageUpload) -> Self {
        self.image = Some(image);
        self
    }
}

/// Reject text that is empty or only whitespace.
fn not_empty_trimmed(value: &str) -> std::result::Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("required").with_message(REQUIRED.into()));
    }
    Ok(())
}

/// Field name to error messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FormErrors(BTreeMap<String, Vec<String>>);

impl FormErrors {
    /// Create an empty error set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error for a field.
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    /// Errors for one field.
    pub fn field(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Check whether a field has errors.
    pub fn has(&self, field: &str) -> bool {
        !self.field(field).is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<ValidationErrors> for FormErrors {
    fn from(errors: ValidationErrors) -> Self {
        let mut form_errors = FormErrors::new();
        for (field, field_errors) in errors.field_errors() {
            let field = field.to_string();
            for error in field_errors {
                let message = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid value for {}", field));
                form_errors.add(&field, message);
            }
        }
        form_errors
    }
}

/// What to do with a post's image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageChange {
    /// Leave the current image as it is.
    Keep,
    /// Remove the current image.
    Clear,
    /// Store this upload as the new image.
    Replace(ImageUpload),
}

/// A validated post form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanedPost {
    /// Trimmed text.
    pub text: String,
    /// Selected group.
    pub group_id: Option<i64>,
    pub image: ImageChange,
}

/// Result of validating a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormOutcome {
    Valid(CleanedPost),
    Invalid(FormErrors),
}

/// Checks submissions against the available groups and the upload limit.
#[derive(Debug, Clone)]
pub struct PostFormValidator {
    choices: Vec<Group>,
    max_image_size: u64,
}

impl PostFormValidator {
    /// Create a validator offering the given groups.
    pub fn new(choices: Vec<Group>, max_image_size: u64) -> Self {
        Self {
            choices,
            max_image_size,
        }
    }

    /// Create a validator offering every group in the database.
    pub async fn load(pool: &DbPool, max_image_size: u64) -> Result<Self> {
        let choices = GroupRepository::new(pool).list_all().await?;
        Ok(Self::new(choices, max_image_size))
    }

    /// The groups an author can choose from.
    pub fn choices(&self) -> &[Group] {
        &self.choices
    }

    /// Take the group choices, for building the form page.
    pub fn into_choices(self) -> Vec<Group> {
        self.choices
    }

    /// Validate a submission.
    pub fn validate(&self, submission: &PostSubmission) -> FormOutcome {
        let mut errors = match submission.validate() {
            Ok(()) => FormErrors::new(),
            Err(e) => FormErrors::from(e),
        };

        let group_id = self.clean_group(submission.group.as_deref(), &mut errors);
        let image = self.clean_image(submission, &mut errors);

        if !errors.is_empty() {
            return FormOutcome::Invalid(errors);
        }

        FormOutcome::Valid(CleanedPost {
            text: submission.text.trim().to_string(),
            group_id,
            image,
        })
    }

    fn clean_group(&self, raw: Option<&str>, errors: &mut FormErrors) -> Option<i64> {
        let raw = raw.map(str::trim).filter(|s| !s.is_empty())?;

        let id = raw
            .parse::<i64>()
            .ok()
            .filter(|id| self.choices.iter().any(|g| g.id == *id));
        if id.is_none() {
            errors.add("group", INVALID_CHOICE);
        }
        id
    }

    fn clean_image(&self, submission: &PostSubmission, errors: &mut FormErrors) -> ImageChange {
        let Some(upload) = submission.image.as_ref().filter(|u| !u.data.is_empty()) else {
            return if submission.clear_image {
                ImageChange::Clear
            } else {
                ImageChange::Keep
            };
        };

        if submission.clear_image {
            errors.add("image", CONTRADICTION);
            return ImageChange::Keep;
        }

        if upload.data.len() as u64 > self.max_image_size {
            errors.add(
                "image",
                format!(
                    "The file is too large ({} bytes). The maximum size is {} bytes.",
                    upload.data.len(),
                    self.max_image_size
                ),
            );
            return ImageChange::Keep;
        }

        if image::load_from_memory(&upload.data).is_err() {
            errors.add("image", INVALID_IMAGE);
            return ImageChange::Keep;
        }

        ImageChange::Replace(upload.clone())
    }
}

/// The post form as shown to an author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostForm {
    /// Current text value.
    pub text: String,
    /// Current group value (group ID as text).
    pub group: Option<String>,
    /// Image currently attached to the post.
    pub image: Option<String>,
    /// Field errors from the last submission.
    pub errors: FormErrors,
    /// Groups offered in the group selector.
    pub group_choices: Vec<Group>,
}

impl PostForm {
    /// An empty form for a new post.
    pub fn blank(group_choices: Vec<Group>) -> Self {
        Self {
            text: String::new(),
            group: None,
            image: None,
            errors: FormErrors::new(),
            group_choices,
        }
    }

    /// A form prefilled with an existing post.
    pub fn from_post(post: &Post, group_choices: Vec<Group>) -> Self {
        Self {
            text: post.text.clone(),
            group: post.group_id.map(|id| id.to_string()),
            image: post.image.clone(),
            errors: FormErrors::new(),
            group_choices,
        }
    }

    /// A form redisplaying a rejected submission with its errors.
    pub fn from_submission(
        submission: &PostSubmission,
        current_image: Option<String>,
        errors: FormErrors,
        group_choices: Vec<Group>,
    ) -> Self {
        Self {
            text: submission.text.clone(),
            group: submission.group.clone().filter(|g| !g.trim().is_empty()),
            image: current_image,
            errors,
            group_choices,
        }
    }

    /// Check whether the form carries errors.
    pub fn is_bound_with_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// A tiny valid GIF used by the unit tests.
#[cfg(test)]
pub(crate) const SMALL_GIF: &[u8] = &[
    0x47, 0x49, 0x46, 0x38, 0x39, 0x61, 0x02, 0x00, 0x01, 0x00, 0x80, 0x00, 0x00, 0x00, 0x00, 0x00,
    0xFF, 0xFF, 0xFF, 0x21, 0xF9, 0x04, 0x00, 0x00, 0x00, 0x00, 0x00, 0x2C, 0x00, 0x00, 0x00, 0x00,
    0x02, 0x00, 0x01, 0x00, 0x00, 0x02, 0x02, 0x0C, 0x0A, 0x00, 0x3B,
];
