use std::{fmt, io::Write};

use anyhow::Result;
use serde::Serialize;

use crate::domain::Video;

const RULE_HEAVY: &str = "═══════════════════════════════════════════════════════════";
const RULE_LIGHT: &str = "───────────────────────────────────────────────────────────";

#[derive(Debug, Clone, Copy, Default)]
pub struct OutputOptions {
    pub json: bool,
    pub verbose: bool,
}

#[derive(Serialize)]
struct VideosDocument<'a> {
    videos: &'a [Video],
    quota_used: u64,
}

#[derive(Serialize)]
struct ErrorDocument {
    error: String,
}

pub fn display_videos<W: Write>(
    w: &mut W,
    heading: &str,
    videos: &[Video],
    quota_used: u64,
    opts: OutputOptions,
) -> Result<()> {
    if opts.json {
        serde_json::to_writer_pretty(&mut *w, &VideosDocument { videos, quota_used })?;
        writeln!(w)?;
        return Ok(());
    }

    if videos.is_empty() {
        writeln!(w, "No videos found.")?;
        return Ok(());
    }

    writeln!(w, "{RULE_HEAVY}")?;
    writeln!(w, "  {heading}")?;
    writeln!(w, "{RULE_HEAVY}")?;
    writeln!(w)?;

    for (i, video) in videos.iter().enumerate() {
        writeln!(w, "  {}. {}", i + 1, video.title)?;
        writeln!(
            w,
            "     {} · {} views · {} likes ({:.1}%) · {}",
            video.channel,
            Thousands(video.view_count),
            Thousands(video.like_count),
            video.engagement_rate(),
            format_duration(video.duration_secs)
        )?;
        if let Some(published) = video.published_at {
            writeln!(w, "     published {}", published.format("%Y-%m-%d"))?;
        }
        writeln!(w, "     {}", video.shorts_url())?;
        writeln!(w)?;
    }

    writeln!(w, "{RULE_LIGHT}")?;
    writeln!(w, "  Found {} video(s)", videos.len())?;
    writeln!(w, "{RULE_HEAVY}")?;
    Ok(())
}

pub fn display_error<W: Write>(w: &mut W, err: &anyhow::Error, opts: OutputOptions) {
    let _ = if opts.json {
        let doc = ErrorDocument {
            error: format!("{err:#}"),
        };
        serde_json::to_writer_pretty(&mut *w, &doc)
            .map_err(std::io::Error::from)
            .and_then(|_| writeln!(w))
    } else {
        writeln!(w, "Error: {err:#}")
    };
}

/// Silent in JSON mode.
pub fn display_progress<W: Write>(w: &mut W, message: &str, opts: OutputOptions) {
    if opts.json {
        return;
    }
    let _ = writeln!(w, "→ {message}");
}

fn format_duration(secs: u32) -> String {
    match (secs / 3600, secs % 3600 / 60, secs % 60) {
        (0, 0, s) => format!("{s}s"),
        (0, m, s) => format!("{m}m{s:02}s"),
        (h, m, s) => format!("{h}h{m:02}m{s:02}s"),
    }
}

struct Thousands(u64);

impl fmt::Display for Thousands {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.0.to_string();
        let mut out = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                out.push(',');
            }
            out.push(ch);
        }
        f.write_str(&out)
    }
}

#[cfg(test)]
mod tests {
    use anyhow::anyhow;

    use super::*;

    fn render(videos: &[Video], opts: OutputOptions) -> String {
        let mut buf = Vec::new();
        display_videos(&mut buf, "VERIFIED SHORTS", videos, 102, opts).unwrap();
        String::from_utf8(buf).unwrap()
    }

    fn sample() -> Video {
        Video {
            id: "abc".into(),
            title: "Rust in 60 seconds".into(),
            channel: "Ferris".into(),
            view_count: 1_234_567,
            like_count: 12_345,
            duration_secs: 59,
            ..Default::default()
        }
    }

    #[test]
    fn text_lists_each_video_with_its_url() {
        let out = render(&[sample()], OutputOptions::default());
        assert!(out.contains("VERIFIED SHORTS"));
        assert!(out.contains("1. Rust in 60 seconds"));
        assert!(out.contains("Ferris · 1,234,567 views · 12,345 likes (1.0%) · 59s"));
        assert!(out.contains("https://www.youtube.com/shorts/abc"));
        assert!(out.contains("Found 1 video(s)"));
    }

    #[test]
    fn empty_text_output_says_so() {
        assert_eq!(render(&[], OutputOptions::default()), "No videos found.\n");
    }

    #[test]
    fn json_carries_videos_and_quota() {
        let out = render(
            &[sample()],
            OutputOptions {
                json: true,
                verbose: false,
            },
        );
        let doc: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(doc["quota_used"], 102);
        assert_eq!(doc["videos"][0]["id"], "abc");
        assert_eq!(doc["videos"][0]["duration_secs"], 59);
        assert_eq!(doc["videos"][0]["view_count"], 1_234_567);
    }

    #[test]
    fn errors_render_as_text_or_json() {
        let err = anyhow!("search request failed: boom");

        let mut text = Vec::new();
        display_error(&mut text, &err, OutputOptions::default());
        assert_eq!(String::from_utf8(text).unwrap(), "Error: search request failed: boom\n");

        let mut json = Vec::new();
        display_error(
            &mut json,
            &err,
            OutputOptions {
                json: true,
                verbose: false,
            },
        );
        let doc: serde_json::Value = serde_json::from_slice(&json).unwrap();
        assert_eq!(doc["error"], "search request failed: boom");
    }

    #[test]
    fn progress_is_silent_in_json_mode() {
        let mut buf = Vec::new();
        display_progress(
            &mut buf,
            "Searching...",
            OutputOptions {
                json: true,
                verbose: true,
            },
        );
        assert!(buf.is_empty());

        display_progress(&mut buf, "Searching...", OutputOptions::default());
        assert_eq!(String::from_utf8(buf).unwrap(), "→ Searching...\n");
    }

    #[test]
    fn durations_and_counts_are_human_readable() {
        assert_eq!(format_duration(45), "45s");
        assert_eq!(format_duration(90), "1m30s");
        assert_eq!(format_duration(5445), "1h30m45s");
        assert_eq!(Thousands(0).to_string(), "0");
        assert_eq!(Thousands(999).to_string(), "999");
        assert_eq!(Thousands(1000).to_string(), "1,000");
        assert_eq!(Thousands(1_234_567).to_string(), "1,234,567");
    }
}
