//! Aspect-ratio classification via `ffprobe`.

use std::ffi::OsStr;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use tubely_core::models::AspectClassification;

use crate::command::{describe_failure, run_tool};
use crate::error::ProcessingError;

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Vec<ProbeStream>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    codec_type: Option<String>,
    display_aspect_ratio: Option<String>,
}

/// Classify the first video stream of `ffprobe -print_format json -show_streams` output.
pub fn parse_probe_output(stdout: &[u8]) -> Result<AspectClassification, ProcessingError> {
    let probe: ProbeOutput = serde_json::from_slice(stdout)
        .map_err(|e| ProcessingError::Probe(format!("unparseable ffprobe output: {}", e)))?;

    let stream = probe
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"))
        .ok_or(ProcessingError::NoVideoStream)?;

    Ok(AspectClassification::from_ratio(
        stream.display_aspect_ratio.as_deref(),
    ))
}

#[derive(Debug, Clone)]
pub struct MediaInspector {
    ffprobe_path: String,
    timeout: Duration,
}

impl MediaInspector {
    pub fn new(ffprobe_path: impl Into<String>, timeout: Duration) -> Self {
        Self {
            ffprobe_path: ffprobe_path.into(),
            timeout,
        }
    }

    #[tracing::instrument(skip(self), fields(
        process.executable.name = "ffprobe",
        process.executable.path = %self.ffprobe_path,
        file.path = %path.display()
    ))]
    pub async fn classify(&self, path: &Path) -> Result<AspectClassification, ProcessingError> {
        let start = std::time::Instant::now();

        let output = run_tool(
            &self.ffprobe_path,
            [
                OsStr::new("-v"),
                OsStr::new("error"),
                OsStr::new("-print_format"),
                OsStr::new("json"),
                OsStr::new("-show_streams"),
                path.as_os_str(),
            ],
            self.timeout,
        )
        .await?;

        if !output.status.success() {
            let failure = describe_failure(&output);
            tracing::error!(error = %failure, "ffprobe failed");
            return Err(ProcessingError::Probe(failure));
        }

        let classification = parse_probe_output(&output.stdout)?;

        tracing::info!(
            classification = %classification,
            duration_ms = start.elapsed().as_millis() as u64,
            "Video probe completed"
        );

        Ok(classification)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_landscape_and_portrait() {
        let landscape = br#"{"streams":[{"codec_type":"video","display_aspect_ratio":"16:9"}]}"#;
        assert_eq!(
            parse_probe_output(landscape).unwrap(),
            AspectClassification::Landscape
        );

        let portrait = br#"{"streams":[{"codec_type":"video","display_aspect_ratio":"9:16"}]}"#;
        assert_eq!(
            parse_probe_output(portrait).unwrap(),
            AspectClassification::Portrait
        );
    }

    #[test]
    fn test_skips_audio_streams() {
        let output = br#"{"streams":[
            {"codec_type":"audio","codec_name":"aac"},
            {"codec_type":"video","display_aspect_ratio":"9:16","width":1080,"height":1920}
        ]}"#;
        assert_eq!(
            parse_probe_output(output).unwrap(),
            AspectClassification::Portrait
        );
    }

    #[test]
    fn test_unknown_or_missing_ratio_is_other() {
        let square = br#"{"streams":[{"codec_type":"video","display_aspect_ratio":"1:1"}]}"#;
        assert_eq!(parse_probe_output(square).unwrap(), AspectClassification::Other);

        let missing = br#"{"streams":[{"codec_type":"video"}]}"#;
        assert_eq!(parse_probe_output(missing).unwrap(), AspectClassification::Other);
    }

    #[test]
    fn test_no_video_stream_is_named_error() {
        for output in [
            &br#"{"streams":[]}"#[..],
            &br#"{}"#[..],
            &br#"{"streams":[{"codec_type":"audio"}]}"#[..],
        ] {
            assert!(matches!(
                parse_probe_output(output),
                Err(ProcessingError::NoVideoStream)
            ));
        }
    }

    #[test]
    fn test_garbage_output_is_probe_error() {
        assert!(matches!(
            parse_probe_output(b"not json"),
            Err(ProcessingError::Probe(_))
        ));
    }
}
