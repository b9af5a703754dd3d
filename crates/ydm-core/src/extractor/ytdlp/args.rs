//! Command-line arguments for a yt-dlp run.

use std::ffi::OsString;

use crate::extractor::{ExtractOptions, PostProcess};

use super::parse::{FILE_TEMPLATE, PROGRESS_TEMPLATE};

/// Arguments for a download of `url` with `options`.
pub(super) fn download_args(url: &str, options: &ExtractOptions) -> Vec<OsString> {
    let mut args: Vec<OsString> = Vec::new();

    push(&mut args, ["-f", &options.format, "-o", &options.output_template]);
    if options.no_playlist {
        push(&mut args, ["--no-playlist"]);
    }
    push(&mut args, ["--newline", "--progress", "--progress-template", PROGRESS_TEMPLATE]);
    push(&mut args, ["--print", FILE_TEMPLATE]);

    for step in &options.post_process {
        match step {
            PostProcess::ExtractAudio { codec, quality } => push(
                &mut args,
                ["-x", "--audio-format", codec, "--audio-quality", quality],
            ),
            PostProcess::MergeOutput { container } => {
                push(&mut args, ["--merge-output-format", container])
            }
        }
    }
    if let Some(secs) = options.clip_secs {
        push(&mut args, ["--download-sections", &format!("*0-{secs}")]);
    }
    if let Some(ffmpeg) = &options.ffmpeg_location {
        args.push(OsString::from("--ffmpeg-location"));
        args.push(ffmpeg.clone().into_os_string());
    }
    push(&mut args, ["--", url]);
    args
}

fn push<const N: usize>(args: &mut Vec<OsString>, items: [&str; N]) {
    args.extend(items.into_iter().map(OsString::from));
}

/// Arguments for a metadata-only probe of `url`.
pub(super) fn probe_args(url: &str) -> Vec<OsString> {
    ["-J", "--no-playlist", "--no-warnings", "--", url]
        .into_iter()
        .map(OsString::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn strings(args: Vec<OsString>) -> Vec<String> {
        args.into_iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    fn window(args: &[String], flag: &str) -> Option<String> {
        let i = args.iter().position(|a| a == flag)?;
        args.get(i + 1).cloned()
    }

    #[test]
    fn audio_download_args() {
        let opts = ExtractOptions::new("bestaudio/best", "/dl/%(title)s_dl_1.%(ext)s")
            .with_post_process(PostProcess::ExtractAudio {
                codec: "mp3".into(),
                quality: "320K".into(),
            })
            .with_ffmpeg(Some(PathBuf::from("/usr/bin/ffmpeg")));
        let args = strings(download_args("https://youtu.be/dQw4w9WgXcQ", &opts));
        assert_eq!(window(&args, "-f").as_deref(), Some("bestaudio/best"));
        assert_eq!(
            window(&args, "-o").as_deref(),
            Some("/dl/%(title)s_dl_1.%(ext)s")
        );
        assert!(args.contains(&"-x".to_string()));
        assert_eq!(window(&args, "--audio-format").as_deref(), Some("mp3"));
        assert_eq!(window(&args, "--audio-quality").as_deref(), Some("320K"));
        assert_eq!(
            window(&args, "--ffmpeg-location").as_deref(),
            Some("/usr/bin/ffmpeg")
        );
        assert!(args.contains(&"--no-playlist".to_string()));
        assert_eq!(args.last().map(String::as_str), Some("https://youtu.be/dQw4w9WgXcQ"));
        assert_eq!(args[args.len() - 2], "--");
    }

    #[test]
    fn clip_and_merge_args() {
        let opts = ExtractOptions::new("bestvideo[height<=360]", "/p/x.%(ext)s")
            .with_post_process(PostProcess::MergeOutput {
                container: "mp4".into(),
            })
            .with_clip(30);
        let args = strings(download_args("u", &opts));
        assert_eq!(window(&args, "--merge-output-format").as_deref(), Some("mp4"));
        assert_eq!(window(&args, "--download-sections").as_deref(), Some("*0-30"));
        assert!(window(&args, "--ffmpeg-location").is_none());
        assert!(!args.contains(&"-x".to_string()));
    }

    #[test]
    fn progress_templates_are_requested() {
        let args = strings(download_args("u", &ExtractOptions::new("best", "o")));
        assert_eq!(
            window(&args, "--progress-template").as_deref(),
            Some(PROGRESS_TEMPLATE)
        );
        assert_eq!(window(&args, "--print").as_deref(), Some(FILE_TEMPLATE));
        assert!(args.contains(&"--newline".to_string()));
    }

    #[test]
    fn probe_is_json_only() {
        let args = strings(probe_args("u"));
        assert_eq!(args, vec!["-J", "--no-playlist", "--no-warnings", "--", "u"]);
    }
}
