use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConversionMode {
    Audio,
    Video,
}

impl Default for ConversionMode {
    fn default() -> Self {
        Self::Audio
    }
}

impl ConversionMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Audio => "audio",
            Self::Video => "video",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioBitrate {
    Kbps128,
    Kbps192,
    Kbps256,
    Kbps320,
}

impl Default for AudioBitrate {
    fn default() -> Self {
        Self::Kbps192
    }
}

impl AudioBitrate {
    pub const ALL: [AudioBitrate; 4] = [Self::Kbps128, Self::Kbps192, Self::Kbps256, Self::Kbps320];

    /// Value sent as `quality` for audio requests.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Kbps128 => "128",
            Self::Kbps192 => "192",
            Self::Kbps256 => "256",
            Self::Kbps320 => "320",
        }
    }
}

impl fmt::Display for AudioBitrate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} kbps", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    Mp3,
    M4a,
    Aac,
    Opus,
    Flac,
    Alac,
    Wav,
}

impl Default for AudioFormat {
    fn default() -> Self {
        Self::Mp3
    }
}

impl AudioFormat {
    pub const ALL: [AudioFormat; 7] = [
        Self::Mp3,
        Self::M4a,
        Self::Aac,
        Self::Opus,
        Self::Flac,
        Self::Alac,
        Self::Wav,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Mp3 => "mp3",
            Self::M4a => "m4a",
            Self::Aac => "aac",
            Self::Opus => "opus",
            Self::Flac => "flac",
            Self::Alac => "alac",
            Self::Wav => "wav",
        }
    }

    /// The backend ignores the bitrate for these.
    pub fn is_lossless(self) -> bool {
        matches!(self, Self::Flac | Self::Alac | Self::Wav)
    }
}

impl fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_str().to_uppercase())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoHeight {
    P360,
    P480,
    P720,
    P1080,
    P1440,
}

impl Default for VideoHeight {
    fn default() -> Self {
        Self::P720
    }
}

impl VideoHeight {
    pub const ALL: [VideoHeight; 5] = [Self::P360, Self::P480, Self::P720, Self::P1080, Self::P1440];

    pub fn pixels(self) -> u32 {
        match self {
            Self::P360 => 360,
            Self::P480 => 480,
            Self::P720 => 720,
            Self::P1080 => 1080,
            Self::P1440 => 1440,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::P360 => "SD (360p)",
            Self::P480 => "SD (480p)",
            Self::P720 => "HD (720p)",
            Self::P1080 => "Full HD (1080p)",
            Self::P1440 => "2K (1440p)",
        }
    }
}

/// Body of `POST /download`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversionRequest {
    pub url: String,
    #[serde(rename = "type")]
    pub mode: ConversionMode,
    pub format: String,
    pub quality: String,
}

impl ConversionRequest {
    pub fn audio(url: impl Into<String>, bitrate: AudioBitrate, format: AudioFormat) -> Self {
        Self {
            url: url.into(),
            mode: ConversionMode::Audio,
            format: format.as_str().to_string(),
            quality: bitrate.as_str().to_string(),
        }
    }

    pub fn video(url: impl Into<String>, height: VideoHeight) -> Self {
        Self {
            url: url.into(),
            mode: ConversionMode::Video,
            format: "mp4".to_string(),
            quality: height.pixels().to_string(),
        }
    }
}

/// Backend reply. Only `success` decides the outcome; a body without it is a failure.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ConversionResult {
    #[serde(default)]
    pub success: bool,
    pub filename: Option<String>,
    pub quality: Option<String>,
    /// Bytes. Any JSON number is accepted.
    pub size: Option<f64>,
    pub error: Option<String>,
    pub path: Option<String>,
    #[serde(rename = "type")]
    pub mode: Option<ConversionMode>,
}

/// `"<filename> (<quality>) - <size> MB"` with one decimal.
pub fn result_line(filename: &str, quality: &str, size: f64) -> String {
    let size_mb = size / 1024.0 / 1024.0;
    format!("{} ({}) - {:.1} MB", filename, quality, size_mb)
}

pub fn file_path(filename: &str) -> String {
    format!("/file/{}", urlencoding::encode(filename))
}

pub fn looks_like_youtube(url: &str) -> bool {
    url.contains("youtube.com") || url.contains("youtu.be")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_video_labels() {
        assert_eq!(VideoHeight::P360.label(), "SD (360p)");
        assert_eq!(VideoHeight::P480.label(), "SD (480p)");
        assert_eq!(VideoHeight::P720.label(), "HD (720p)");
        assert_eq!(VideoHeight::P1080.label(), "Full HD (1080p)");
        assert_eq!(VideoHeight::P1440.label(), "2K (1440p)");
        assert_eq!(VideoHeight::default(), VideoHeight::P720);
    }

    #[test]
    fn test_audio_request_body() {
        let request = ConversionRequest::audio(
            "https://youtu.be/abc",
            AudioBitrate::Kbps320,
            AudioFormat::Flac,
        );
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "url": "https://youtu.be/abc",
                "type": "audio",
                "format": "flac",
                "quality": "320",
            })
        );
    }

    #[test]
    fn test_video_request_body() {
        let request = ConversionRequest::video("https://www.youtube.com/watch?v=x", VideoHeight::P1080);
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["type"], "video");
        assert_eq!(body["format"], "mp4");
        assert_eq!(body["quality"], "1080");
    }

    #[test]
    fn test_result_without_success_is_failure() {
        let result: ConversionResult =
            serde_json::from_str(r#"{"error": "FFmpeg not found"}"#).unwrap();
        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("FFmpeg not found"));
    }

    #[test]
    fn test_result_with_extra_fields() {
        let result: ConversionResult = serde_json::from_str(
            r#"{"success": true, "filename": "clip_720p.mp4", "path": "/srv/clip_720p.mp4",
                "quality": "720p MP4", "type": "video", "size": 1048576}"#,
        )
        .unwrap();
        assert!(result.success);
        assert_eq!(result.mode, Some(ConversionMode::Video));
        assert_eq!(result.size, Some(1_048_576.0));
    }

    #[test]
    fn test_result_line() {
        assert_eq!(
            result_line("song.mp3", "320kbps MP3", 5_242_880.0),
            "song.mp3 (320kbps MP3) - 5.0 MB"
        );
        assert_eq!(result_line("a.wav", "WAV Lossless", 0.0), "a.wav (WAV Lossless) - 0.0 MB");
        assert_eq!(result_line("b.mp4", "720p MP4", 1_572_864.0), "b.mp4 (720p MP4) - 1.5 MB");
    }

    #[test]
    fn test_float_size_is_accepted() {
        let result: ConversionResult = serde_json::from_str(
            r#"{"success": true, "filename": "song.mp3", "quality": "320kbps MP3", "size": 5242880.0}"#,
        )
        .unwrap();
        assert_eq!(result.size, Some(5_242_880.0));
        assert_eq!(
            result_line("song.mp3", "320kbps MP3", result.size.unwrap()),
            "song.mp3 (320kbps MP3) - 5.0 MB"
        );
    }

    #[test]
    fn test_file_path_encodes_segment() {
        assert_eq!(file_path("song.mp3"), "/file/song.mp3");
        assert_eq!(file_path("my song #1.mp3"), "/file/my%20song%20%231.mp3");
        assert_eq!(file_path("a/b.mp3"), "/file/a%2Fb.mp3");
    }

    #[test]
    fn test_looks_like_youtube() {
        assert!(looks_like_youtube("https://www.youtube.com/watch?v=1"));
        assert!(looks_like_youtube("youtu.be/xyz"));
        assert!(!looks_like_youtube("https://vimeo.com/1"));
        assert!(!looks_like_youtube(""));
    }

    #[test]
    fn test_format_display_is_uppercase() {
        assert_eq!(AudioFormat::Opus.to_string(), "OPUS");
        assert!(AudioFormat::Alac.is_lossless());
        assert!(!AudioFormat::M4a.is_lossless());
    }
}
