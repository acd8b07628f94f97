//! Stand-in `ffprobe` and `ffmpeg` executables.

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy)]
pub enum ProbeBehavior {
    /// Report one video stream with this display aspect ratio.
    Aspect(&'static str),
    /// Exit non-zero with a message on stderr.
    Fail,
}

pub struct FakeTools {
    pub ffprobe: PathBuf,
    pub ffmpeg: PathBuf,
    probe_marker: PathBuf,
    ffmpeg_marker: PathBuf,
}

impl FakeTools {
    pub fn install(dir: &Path, probe: ProbeBehavior) -> Self {
        std::fs::create_dir_all(dir).expect("Failed to create tool directory");

        let probe_marker = dir.join("ffprobe.called");
        let ffmpeg_marker = dir.join("ffmpeg.called");

        let probe_body = match probe {
            ProbeBehavior::Aspect(ratio) => format!(
                "echo '{{\"streams\":[{{\"index\":0,\"codec_type\":\"video\",\"display_aspect_ratio\":\"{}\"}}]}}'\nexit 0",
                ratio
            ),
            ProbeBehavior::Fail => "echo 'moov atom not found' >&2\nexit 1".to_string(),
        };
        let ffprobe = write_script(
            dir,
            "ffprobe",
            &format!("touch '{}'\n{}", probe_marker.display(), probe_body),
        );

        // Invoked as: -i <in> ... <out>; the output is a plain copy of the input.
        let ffmpeg = write_script(
            dir,
            "ffmpeg",
            &format!(
                "touch '{}'\nin=\"$2\"\nfor last; do :; done\ncp \"$in\" \"$last\"",
                ffmpeg_marker.display()
            ),
        );

        Self {
            ffprobe,
            ffmpeg,
            probe_marker,
            ffmpeg_marker,
        }
    }

    pub fn probe_called(&self) -> bool {
        self.probe_marker.exists()
    }

    pub fn ffmpeg_called(&self) -> bool {
        self.ffmpeg_marker.exists()
    }

    /// Replace `ffmpeg` with one that writes a truncated output file and then fails.
    pub fn fail_transcode(&self) {
        let dir = self.ffmpeg.parent().expect("ffmpeg script has a parent directory");
        write_script(
            dir,
            "ffmpeg",
            &format!(
                "touch '{}'\nfor last; do :; done\nprintf 'partial' > \"$last\"\necho 'Conversion failed!' >&2\nexit 1",
                self.ffmpeg_marker.display()
            ),
        );
    }
}

fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).expect("Failed to write tool script");
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
        .expect("Failed to make tool script executable");
    path
}
