//! Audio upload validation and language normalization.

use vee_core::text::contains_arabic;

use crate::errors::{Result, VoiceError};

/// Transcription size cap in megabytes (the Whisper API limit).
pub const MAX_AUDIO_MB: usize = 25;

/// Supported upload formats for transcription.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AudioFormat {
    /// WebM/Opus (browser recordings).
    Webm,
    /// MP3.
    Mp3,
    /// WAV.
    Wav,
    /// M4A/AAC.
    M4a,
    /// Ogg/Vorbis.
    Ogg,
}

impl AudioFormat {
    /// File extension used when naming the multipart upload.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Webm => "webm",
            Self::Mp3 => "mp3",
            Self::Wav => "wav",
            Self::M4a => "m4a",
            Self::Ogg => "ogg",
        }
    }

    /// MIME type sent with the multipart upload.
    pub fn mime(self) -> &'static str {
        match self {
            Self::Webm => "audio/webm",
            Self::Mp3 => "audio/mpeg",
            Self::Wav => "audio/wav",
            Self::M4a => "audio/m4a",
            Self::Ogg => "audio/ogg",
        }
    }

    fn from_token(token: &str) -> Option<Self> {
        match token {
            "webm" => Some(Self::Webm),
            "mp3" | "mpeg" => Some(Self::Mp3),
            "wav" => Some(Self::Wav),
            "m4a" => Some(Self::M4a),
            "ogg" => Some(Self::Ogg),
            _ => None,
        }
    }
}

/// One transcription result.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transcript {
    /// The transcribed text.
    pub text: String,
    /// Normalized language tag, `"ar"` or `"en"`.
    pub language: String,
}

/// Determine the upload's format from its MIME type, falling back to the
/// filename extension.
pub fn detect_format(content_type: Option<&str>, filename: Option<&str>) -> Result<AudioFormat> {
    if let Some(ct) = content_type {
        let ct = ct.to_lowercase();
        for token in ["webm", "mpeg", "mp3", "wav", "m4a", "ogg"] {
            if ct.contains(token)
                && let Some(format) = AudioFormat::from_token(token)
            {
                return Ok(format);
            }
        }
    }
    if let Some(name) = filename
        && let Some((_, ext)) = name.rsplit_once('.')
        && let Some(format) = AudioFormat::from_token(&ext.to_lowercase())
    {
        return Ok(format);
    }
    Err(VoiceError::UnsupportedFormat(
        content_type.or(filename).unwrap_or("unknown").to_string(),
    ))
}

/// Enforce the transcription size cap.
pub fn validate_audio_size(audio: &[u8]) -> Result<()> {
    let max_bytes = MAX_AUDIO_MB * 1024 * 1024;
    if audio.len() > max_bytes {
        return Err(VoiceError::TooLarge {
            size_bytes: audio.len(),
            max_bytes,
        });
    }
    Ok(())
}

/// Normalize the transcription API's language report to `"ar"` or `"en"`.
///
/// When the report is missing or unrecognized, fall back to script
/// detection on the transcript itself.
pub fn normalize_language(reported: Option<&str>, text: &str) -> String {
    match reported.map(str::to_lowercase).as_deref() {
        Some("ar" | "arabic") => "ar".to_string(),
        Some("en" | "english") => "en".to_string(),
        _ => {
            if contains_arabic(text) {
                "ar".to_string()
            } else {
                "en".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn detects_format_from_content_type() {
        assert_eq!(
            detect_format(Some("audio/webm;codecs=opus"), None).unwrap(),
            AudioFormat::Webm
        );
        assert_eq!(
            detect_format(Some("audio/mpeg"), None).unwrap(),
            AudioFormat::Mp3
        );
        assert_eq!(
            detect_format(Some("audio/x-wav"), None).unwrap(),
            AudioFormat::Wav
        );
    }

    #[test]
    fn falls_back_to_filename_extension() {
        assert_eq!(
            detect_format(Some("application/octet-stream"), Some("memo.OGG")).unwrap(),
            AudioFormat::Ogg
        );
        assert_eq!(detect_format(None, Some("a.m4a")).unwrap(), AudioFormat::M4a);
    }

    #[test]
    fn rejects_unknown_format() {
        let err = detect_format(Some("video/mp4"), Some("clip.mp4")).unwrap_err();
        assert_matches!(err, VoiceError::UnsupportedFormat(_));
    }

    #[test]
    fn size_cap_is_25_mb() {
        assert!(validate_audio_size(&vec![0u8; 1024]).is_ok());
        let err = validate_audio_size(&vec![0u8; 26 * 1024 * 1024]).unwrap_err();
        assert_matches!(err, VoiceError::TooLarge { .. });
    }

    #[test]
    fn normalizes_reported_languages() {
        assert_eq!(normalize_language(Some("arabic"), ""), "ar");
        assert_eq!(normalize_language(Some("AR"), ""), "ar");
        assert_eq!(normalize_language(Some("english"), ""), "en");
    }

    #[test]
    fn falls_back_to_script_detection() {
        assert_eq!(normalize_language(None, "كم سعرة حرارية؟"), "ar");
        assert_eq!(normalize_language(Some("fr"), "bonjour"), "en");
        assert_eq!(normalize_language(Some("de"), "ما هو الفطور؟"), "ar");
    }
}
