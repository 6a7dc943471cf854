//! Story list presentation.

use std::io::Write;

use anyhow::Result;
use serde::Serialize;

use freshstories_core::{OutputFormat, Story};

/// Story as written in JSON output.
#[derive(Debug, Serialize)]
struct StoryEntry<'a> {
    id: u64,
    title: &'a str,
    url: String,
}

/// Write `stories` to `out` in the configured format.
pub fn render(stories: &[Story], format: OutputFormat, out: &mut impl Write) -> Result<()> {
    match format {
        OutputFormat::Text => render_text(stories, out),
        OutputFormat::Json => render_json(stories, out),
    }
}

/// One numbered line per story: `1. Title <link>`.
fn render_text(stories: &[Story], out: &mut impl Write) -> Result<()> {
    writeln!(out, "Stories")?;
    if stories.is_empty() {
        writeln!(out, "(no fresh stories)")?;
    }
    for (i, story) in stories.iter().enumerate() {
        writeln!(out, "{}. {} <{}>", i + 1, story.title, story.link())?;
    }
    Ok(())
}

fn render_json(stories: &[Story], out: &mut impl Write) -> Result<()> {
    let entries: Vec<_> = stories
        .iter()
        .map(|s| StoryEntry {
            id: s.id,
            title: &s.title,
            url: s.link(),
        })
        .collect();
    serde_json::to_writer_pretty(&mut *out, &entries)?;
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stories() -> Vec<Story> {
        vec![
            Story {
                id: 41,
                title: "Rust 2.0 released".to_string(),
                url: Some("https://blog.example.org/rust".to_string()),
                score: 512,
                time: 1_700_000_000,
            },
            Story {
                id: 40,
                title: "Ask HN: What are you working on?".to_string(),
                url: None,
                score: 88,
                time: 1_699_999_000,
            },
        ]
    }

    fn render_to_string(stories: &[Story], format: OutputFormat) -> String {
        let mut buf = Vec::new();
        render(stories, format, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_render_text_numbered() {
        let text = render_to_string(&stories(), OutputFormat::Text);
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "Stories");
        assert_eq!(lines[1], "1. Rust 2.0 released <https://blog.example.org/rust>");
        assert_eq!(
            lines[2],
            "2. Ask HN: What are you working on? <https://news.ycombinator.com/item?id=40>"
        );
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_render_text_empty() {
        let text = render_to_string(&[], OutputFormat::Text);
        assert_eq!(text, "Stories\n(no fresh stories)\n");
    }

    #[test]
    fn test_render_json() {
        let json = render_to_string(&stories(), OutputFormat::Json);
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let entries = value.as_array().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0]["id"], 41);
        assert_eq!(entries[0]["title"], "Rust 2.0 released");
        assert_eq!(
            entries[1]["url"],
            "https://news.ycombinator.com/item?id=40"
        );
    }
}
