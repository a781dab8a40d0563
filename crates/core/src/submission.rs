//! Character submission input and its validation.
//!
//! Validation is synchronous and runs before any write, so a refused
//! submission never leaves partial state behind.

use serde::Deserialize;
use validator::Validate;

use crate::error::CoreError;
use crate::media::MusicPlatform;
use crate::storage::{UploadFile, MAX_UPLOAD_BYTES};

/// Prefix of the line appended to a prompt summary when a prompt file was uploaded.
pub const PROMPT_FILE_MARKER: &str = "[Prompt file]: ";

/// Raw submission as entered by the user.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubmissionInput {
    pub name: String,
    pub short_worldview: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub has_music: bool,
    #[serde(default)]
    pub ai_tool_used: Option<String>,
    #[serde(default)]
    pub prompt_summary: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(skip)]
    pub image_file: Option<UploadFile>,
    #[serde(skip)]
    pub prompt_file: Option<UploadFile>,
    #[serde(default)]
    pub music_url: Option<String>,
    #[serde(default)]
    pub music_title: Option<String>,
    #[serde(default)]
    pub music_platform: MusicPlatform,
    /// Accepted for compatibility and ignored: ownership is never self-asserted.
    #[serde(default)]
    pub verified_owner: bool,
    #[serde(default)]
    pub agreed_to_terms: bool,
}

/// Where the submitted image comes from.
#[derive(Debug, Clone)]
pub enum ImageSource {
    Url(String),
    File(UploadFile),
}

/// Music details of a submission with `has_music = true`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MusicDraft {
    pub platform: MusicPlatform,
    pub url: String,
    pub title: Option<String>,
}

/// A submission that passed every check, with all text trimmed.
#[derive(Debug, Clone)]
pub struct ValidatedSubmission {
    pub name: String,
    pub short_worldview: String,
    pub description: Option<String>,
    pub has_music: bool,
    pub ai_tool_used: Option<String>,
    pub prompt_summary: Option<String>,
    pub image: ImageSource,
    pub prompt_file: Option<UploadFile>,
    pub music: Option<MusicDraft>,
}

#[derive(Debug, Validate)]
struct RequiredText {
    #[validate(length(min = 1, max = 100, message = "name must be 1-100 characters"))]
    name: String,
    #[validate(length(min = 1, max = 40, message = "short_worldview must be 1-40 characters"))]
    short_worldview: String,
}

/// Check `input` and normalize it.
///
/// Order of checks: required text, image reference, terms agreement,
/// music URL.
pub fn validate_submission(input: SubmissionInput) -> Result<ValidatedSubmission, CoreError> {
    let text = RequiredText {
        name: input.name.trim().to_string(),
        short_worldview: input.short_worldview.trim().to_string(),
    };
    text.validate()
        .map_err(|e| CoreError::Validation(e.to_string()))?;

    let image = match (non_blank(input.image_url), input.image_file) {
        (Some(url), None) => {
            ensure_http_url(&url, "image_url")?;
            ImageSource::Url(url)
        }
        (None, Some(file)) => {
            ensure_image_file(&file)?;
            ImageSource::File(file)
        }
        (Some(_), Some(_)) => {
            return Err(CoreError::Validation(
                "Provide exactly one of image_url or image_file, not both".into(),
            ))
        }
        (None, None) => {
            return Err(CoreError::Validation(
                "An image_url or image_file is required".into(),
            ))
        }
    };

    if let Some(file) = &input.prompt_file {
        ensure_upload_size(file, "prompt_file")?;
    }

    if !input.agreed_to_terms {
        return Err(CoreError::Validation(
            "Agreement to the terms of use is required".into(),
        ));
    }

    let music = if input.has_music {
        let url = non_blank(input.music_url).ok_or_else(|| {
            CoreError::Validation("music_url is required when has_music is true".into())
        })?;
        ensure_http_url(&url, "music_url")?;
        Some(MusicDraft {
            platform: input.music_platform,
            url,
            title: non_blank(input.music_title),
        })
    } else {
        None
    };

    Ok(ValidatedSubmission {
        name: text.name,
        short_worldview: text.short_worldview,
        description: non_blank(input.description),
        has_music: input.has_music,
        ai_tool_used: non_blank(input.ai_tool_used),
        prompt_summary: non_blank(input.prompt_summary),
        image,
        prompt_file: input.prompt_file,
        music,
    })
}

/// Combine the typed prompt text with the uploaded prompt file reference.
pub fn compose_prompt_summary(text: Option<&str>, prompt_file_url: Option<&str>) -> Option<String> {
    let mut summary = text.map(str::trim).unwrap_or_default().to_string();
    if let Some(url) = prompt_file_url {
        summary.push('\n');
        summary.push_str(PROMPT_FILE_MARKER);
        summary.push_str(url);
    }
    if summary.is_empty() {
        None
    } else {
        Some(summary)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn ensure_http_url(url: &str, field: &str) -> Result<(), CoreError> {
    let lower = url.to_ascii_lowercase();
    if lower.starts_with("https://") || lower.starts_with("http://") {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "{field} must be an http(s) URL"
        )))
    }
}

fn ensure_upload_size(file: &UploadFile, field: &str) -> Result<(), CoreError> {
    if file.bytes.is_empty() {
        return Err(CoreError::Validation(format!("{field} is empty")));
    }
    if file.bytes.len() > MAX_UPLOAD_BYTES {
        return Err(CoreError::Validation(format!(
            "{field} exceeds the {MAX_UPLOAD_BYTES} byte limit"
        )));
    }
    Ok(())
}

fn ensure_image_file(file: &UploadFile) -> Result<(), CoreError> {
    ensure_upload_size(file, "image_file")?;
    match file.content_type.as_deref() {
        Some(ct) if !ct.starts_with("image/") => Err(CoreError::Validation(format!(
            "image_file must be an image, got '{ct}'"
        ))),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn valid_input() -> SubmissionInput {
        SubmissionInput {
            name: "Luna".into(),
            short_worldview: "A moon warrior guarding the night".into(),
            image_url: Some("https://img.example/luna.png".into()),
            agreed_to_terms: true,
            ..Default::default()
        }
    }

    fn png(bytes: &[u8]) -> UploadFile {
        UploadFile {
            file_name: "luna.png".into(),
            content_type: Some("image/png".into()),
            bytes: bytes.to_vec(),
        }
    }

    #[test]
    fn valid_submission_is_trimmed() {
        let input = SubmissionInput {
            name: "  Luna  ".into(),
            description: Some("   ".into()),
            ..valid_input()
        };
        let validated = validate_submission(input).unwrap();
        assert_eq!(validated.name, "Luna");
        assert!(validated.description.is_none());
        assert!(validated.music.is_none());
    }

    #[test]
    fn empty_name_rejected() {
        let input = SubmissionInput {
            name: "   ".into(),
            ..valid_input()
        };
        assert_matches!(validate_submission(input), Err(CoreError::Validation(_)));
    }

    #[test]
    fn name_length_counts_characters_not_bytes() {
        let input = SubmissionInput {
            name: "ミ".repeat(100),
            ..valid_input()
        };
        assert!(validate_submission(input).is_ok());

        let too_long = SubmissionInput {
            name: "ミ".repeat(101),
            ..valid_input()
        };
        assert_matches!(validate_submission(too_long), Err(CoreError::Validation(_)));
    }

    #[test]
    fn worldview_over_forty_chars_rejected() {
        let input = SubmissionInput {
            short_worldview: "x".repeat(41),
            ..valid_input()
        };
        let err = validate_submission(input).unwrap_err();
        assert!(err.to_string().contains("short_worldview"));
    }

    #[test]
    fn missing_image_rejected() {
        let input = SubmissionInput {
            image_url: Some("  ".into()),
            ..valid_input()
        };
        let err = validate_submission(input).unwrap_err();
        assert!(err.to_string().contains("image_url or image_file"));
    }

    #[test]
    fn both_image_sources_rejected() {
        let input = SubmissionInput {
            image_file: Some(png(b"data")),
            ..valid_input()
        };
        let err = validate_submission(input).unwrap_err();
        assert!(err.to_string().contains("exactly one"));
    }

    #[test]
    fn image_file_alone_is_accepted() {
        let input = SubmissionInput {
            image_url: None,
            image_file: Some(png(b"data")),
            ..valid_input()
        };
        assert_matches!(
            validate_submission(input).unwrap().image,
            ImageSource::File(_)
        );
    }

    #[test]
    fn non_image_file_rejected() {
        let mut file = png(b"data");
        file.content_type = Some("application/pdf".into());
        let input = SubmissionInput {
            image_url: None,
            image_file: Some(file),
            ..valid_input()
        };
        assert_matches!(validate_submission(input), Err(CoreError::Validation(_)));
    }

    #[test]
    fn empty_prompt_file_rejected() {
        let input = SubmissionInput {
            prompt_file: Some(UploadFile {
                file_name: "prompt.txt".into(),
                content_type: Some("text/plain".into()),
                bytes: Vec::new(),
            }),
            ..valid_input()
        };
        let err = validate_submission(input).unwrap_err();
        assert!(err.to_string().contains("prompt_file is empty"));
    }

    #[test]
    fn oversized_files_rejected() {
        let big = vec![0u8; MAX_UPLOAD_BYTES + 1];
        let image = SubmissionInput {
            image_url: None,
            image_file: Some(png(&big)),
            ..valid_input()
        };
        assert_matches!(validate_submission(image), Err(CoreError::Validation(_)));

        let prompt = SubmissionInput {
            prompt_file: Some(UploadFile {
                file_name: "prompt.txt".into(),
                content_type: None,
                bytes: big,
            }),
            ..valid_input()
        };
        let err = validate_submission(prompt).unwrap_err();
        assert!(err.to_string().contains("prompt_file exceeds"));
    }

    #[test]
    fn terms_must_be_accepted() {
        let input = SubmissionInput {
            agreed_to_terms: false,
            ..valid_input()
        };
        let err = validate_submission(input).unwrap_err();
        assert!(err.to_string().contains("terms"));
    }

    #[test]
    fn has_music_requires_music_url() {
        let input = SubmissionInput {
            has_music: true,
            music_url: Some("".into()),
            ..valid_input()
        };
        let err = validate_submission(input).unwrap_err();
        assert!(err.to_string().contains("music_url"));
    }

    #[test]
    fn music_draft_carries_platform_and_title() {
        let input = SubmissionInput {
            has_music: true,
            music_url: Some("https://audio.example/track.mp3".into()),
            music_title: Some(" Moonlight ".into()),
            music_platform: MusicPlatform::Soundcloud,
            ..valid_input()
        };
        let music = validate_submission(input).unwrap().music.unwrap();
        assert_eq!(music.platform, MusicPlatform::Soundcloud);
        assert_eq!(music.title.as_deref(), Some("Moonlight"));
    }

    #[test]
    fn music_url_ignored_without_has_music() {
        let input = SubmissionInput {
            has_music: false,
            music_url: Some("https://audio.example/track.mp3".into()),
            ..valid_input()
        };
        assert!(validate_submission(input).unwrap().music.is_none());
    }

    #[test]
    fn prompt_summary_composition() {
        assert_eq!(compose_prompt_summary(None, None), None);
        assert_eq!(compose_prompt_summary(Some("  "), None), None);
        assert_eq!(
            compose_prompt_summary(Some("1girl, silver hair"), None).as_deref(),
            Some("1girl, silver hair")
        );
        assert_eq!(
            compose_prompt_summary(Some("1girl"), Some("https://f/p.txt")).as_deref(),
            Some("1girl\n[Prompt file]: https://f/p.txt")
        );
        assert_eq!(
            compose_prompt_summary(None, Some("https://f/p.txt")).as_deref(),
            Some("\n[Prompt file]: https://f/p.txt")
        );
    }
}
