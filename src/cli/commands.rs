use std::fmt::Write as _;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::{Args, ValueEnum};

use crate::config::AppConfig;
use crate::present::input::colorize_input;
use crate::present::source::source_view_text;
use crate::present::{render as render_document, Rendered};
use crate::session::{clean_paste, Clipboard, ClipboardPayload, EditSession, SystemClipboard};

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    /// Linked HTML as produced by the pipeline
    #[default]
    Html,
    /// Preview markup with colored links
    Preview,
    /// Escaped, highlighted "view source" markup
    Source,
    /// Visible text of the source view
    Text,
    /// Every view as one JSON object
    Json,
}

#[derive(Args, Debug, Clone)]
pub struct RenderArgs {
    /// Input file; reads stdin when omitted or `-`
    #[arg()]
    pub input: Option<PathBuf>,
    /// Which output surface to print
    #[arg(long, value_enum, default_value_t = View::Html)]
    pub view: View,
}

#[derive(Args, Debug, Clone)]
pub struct ExampleArgs {
    /// Which output surface to print
    #[arg(long, value_enum, default_value_t = View::Html)]
    pub view: View,
    /// Print the example input instead of rendering it
    #[arg(long)]
    pub raw: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ColorizeArgs {
    /// Input file; reads stdin when omitted or `-`
    #[arg()]
    pub input: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct PasteArgs {
    /// File holding the clipboard's text/html flavor
    #[arg(long)]
    pub html: Option<PathBuf>,
    /// File holding the clipboard's text/plain flavor
    #[arg(long)]
    pub plain: Option<PathBuf>,
}

pub fn render(config: &AppConfig, args: &RenderArgs) -> Result<String> {
    let input = read_input(args.input.as_deref())?;
    let rendered = render_document(&input, &config.palette);
    format_view(&rendered, args.view)
}

pub fn example(config: &AppConfig, args: &ExampleArgs) -> Result<String> {
    let session = EditSession::bootstrap(config);
    if args.raw {
        return Ok(with_newline(session.text().to_string()));
    }
    format_view(session.rendered(), args.view)
}

pub fn colorize(config: &AppConfig, args: &ColorizeArgs) -> Result<String> {
    let input = read_input(args.input.as_deref())?;
    Ok(with_newline(colorize_input(&input, &config.palette.preview)))
}

pub fn paste(args: &PasteArgs) -> Result<String> {
    if args.html.is_none() && args.plain.is_none() {
        bail!("paste needs --html and/or --plain");
    }
    let payload = ClipboardPayload {
        html: args.html.as_deref().map(read_file).transpose()?,
        plain: args.plain.as_deref().map(read_file).transpose()?,
    };
    Ok(with_newline(clean_paste(&payload)))
}

#[derive(Args, Debug, Clone)]
pub struct CopyArgs {
    /// Input file; reads stdin when omitted or `-`. Copies the example
    /// document when `--example` is set.
    #[arg()]
    pub input: Option<PathBuf>,
    /// Copy the built-in example document instead of reading input
    #[arg(long, conflicts_with = "input")]
    pub example: bool,
}

pub fn copy(config: &AppConfig, args: &CopyArgs) -> Result<String> {
    let mut clipboard = SystemClipboard::open()?;
    copy_to(config, args, &mut clipboard)
}

fn copy_to(config: &AppConfig, args: &CopyArgs, clipboard: &mut dyn Clipboard) -> Result<String> {
    let mut session = if args.example {
        EditSession::bootstrap(config)
    } else {
        let mut session = EditSession::new(config);
        session.input(&read_input(args.input.as_deref())?, None);
        session
    };
    let now = Instant::now();
    session
        .copy_source(clipboard, now)
        .context("copying source view")?;
    Ok(with_newline(session.copy_label(now).to_string()))
}

fn format_view(rendered: &Rendered, view: View) -> Result<String> {
    let out = match view {
        View::Html => rendered.html.clone(),
        View::Preview => rendered.preview.clone(),
        View::Source => rendered.source.clone(),
        View::Text => source_view_text(&rendered.source),
        View::Json => {
            serde_json::to_string_pretty(rendered).context("serialising rendered views")?
        }
    };
    Ok(with_newline(out))
}

fn with_newline(mut out: String) -> String {
    if !out.ends_with('\n') {
        let _ = writeln!(&mut out);
    }
    out
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) if path != Path::new("-") => read_file(path),
        _ => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("reading input from stdin")?;
            Ok(buf)
        }
    }
}

fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    type TestResult<T = ()> = Result<T>;

    #[test]
    fn render_reads_file_and_prints_html() -> TestResult {
        let temp = TempDir::new()?;
        let path = temp.path().join("notes.txt");
        fs::write(&path, "call 212-555-1234\n-age(21)\n")?;
        let output = render(
            &AppConfig::default(),
            &RenderArgs {
                input: Some(path),
                view: View::Html,
            },
        )?;
        assert_eq!(
            output,
            "• call <a href=\"tel:2125551234\">(212) 555-1234</a>\n<br>&emsp;— Age requirement: 21+\n"
        );
        Ok(())
    }

    #[test]
    fn example_json_has_every_view() -> TestResult {
        let output = example(
            &AppConfig::default(),
            &ExampleArgs {
                view: View::Json,
                raw: false,
            },
        )?;
        let value: serde_json::Value = serde_json::from_str(&output)?;
        for key in ["html", "preview", "source"] {
            assert!(value.get(key).and_then(|v| v.as_str()).is_some(), "missing {key}");
        }
        Ok(())
    }

    #[test]
    fn example_text_view_matches_html() -> TestResult {
        let config = AppConfig::default();
        let html = example(
            &config,
            &ExampleArgs {
                view: View::Html,
                raw: false,
            },
        )?;
        let text = example(
            &config,
            &ExampleArgs {
                view: View::Text,
                raw: false,
            },
        )?;
        assert_eq!(html, text);
        Ok(())
    }

    #[derive(Default)]
    struct MemoryClipboard {
        contents: Option<String>,
    }

    impl Clipboard for MemoryClipboard {
        fn write_text(&mut self, text: &str) -> Result<(), crate::session::ClipboardError> {
            self.contents = Some(text.to_string());
            Ok(())
        }
    }

    #[test]
    fn copy_writes_linked_html_of_input() -> TestResult {
        let temp = TempDir::new()?;
        let path = temp.path().join("notes.txt");
        fs::write(&path, "https://x.org/?a=1&b=2
")?;
        let mut clipboard = MemoryClipboard::default();
        let output = copy_to(
            &AppConfig::default(),
            &CopyArgs {
                input: Some(path),
                example: false,
            },
            &mut clipboard,
        )?;
        assert_eq!(output, "Copied!\n");
        assert_eq!(
            clipboard.contents.as_deref(),
            Some(r#"• <a href="https://x.org/?a=1&b=2" target="_blank" rel="noopener noreferrer">x.org/?a=1&b=2</a>"#)
        );
        Ok(())
    }

    #[test]
    fn copy_example_matches_html_view() -> TestResult {
        let config = AppConfig::default();
        let mut clipboard = MemoryClipboard::default();
        copy_to(
            &config,
            &CopyArgs {
                input: None,
                example: true,
            },
            &mut clipboard,
        )?;
        let html = EditSession::bootstrap(&config).rendered().html.clone();
        assert_eq!(clipboard.contents, Some(html));
        Ok(())
    }

    #[test]
    fn paste_requires_a_flavor() {
        let err = paste(&PasteArgs {
            html: None,
            plain: None,
        })
        .expect_err("no flavors");
        assert!(err.to_string().contains("--html"));
    }

    #[test]
    fn paste_prefers_html_flavor() -> TestResult {
        let temp = TempDir::new()?;
        let html = temp.path().join("clip.html");
        let plain = temp.path().join("clip.txt");
        fs::write(&html, "<a href=\"https://x.org\">X</a><a href=\"mailto:a@b.co\">a@b.co</a>")?;
        fs::write(&plain, "fallback")?;
        let output = paste(&PasteArgs {
            html: Some(html),
            plain: Some(plain),
        })?;
        assert_eq!(output, "X a@b.co\n");
        Ok(())
    }
}
