use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use scripture_formatter::{FragmentRenderer, to_plain_text};
use scripture_parser::{ChapterNormalizer, DisplayPreferences, NormalizedChapter, SourceFormat};

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Normalized chapter as pretty-printed JSON
    #[default]
    Json,
    /// One HTML fragment per block
    Html,
    /// Plain text with verse numbers
    Text,
}

#[derive(Args, Debug)]
pub struct Normalize {
    /// Source format identifier (tagged-json, legacy-html, verse-array or an alias)
    #[arg(short, long, env = "SCRIPTURE_FORMAT")]
    pub format: String,

    /// Book identifier used for the title fallback (e.g. gen, psa)
    #[arg(short, long)]
    pub book: String,

    /// Chapter number, starting at 1
    #[arg(short, long)]
    pub chapter: u32,

    /// Payload file (default: stdin)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// YAML file with display preferences
    #[arg(long)]
    pub prefs: Option<PathBuf>,

    /// Show footnotes as inline markers
    #[arg(long)]
    pub show_footnotes: bool,

    /// Drop descriptive notes such as psalm superscriptions
    #[arg(long)]
    pub hide_description: bool,

    /// Drop cross-reference paragraphs
    #[arg(long)]
    pub hide_cross_reference: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    pub output: OutputFormat,

    /// Prepend the chapter title to HTML output
    #[arg(long)]
    pub with_title: bool,
}

impl Normalize {
    pub fn execute(&self) -> Result<()> {
        let format: SourceFormat = self.format.parse()?;
        let preferences = self.preferences()?;
        let payload = read_payload(self.input.as_deref())?;

        tracing::info!(
            format = %format,
            book = %self.book,
            chapter = self.chapter,
            bytes = payload.len(),
            "Normalizing chapter"
        );

        let chapter = ChapterNormalizer::new()
            .with_preferences(preferences)
            .normalize(format, &payload, &self.book, self.chapter)
            .with_context(|| format!("Failed to normalize {} {}", self.book, self.chapter))?;

        if chapter.is_unavailable() {
            tracing::warn!(title = %chapter.title, "No usable content in payload");
        } else {
            tracing::info!(
                title = %chapter.title,
                blocks = chapter.blocks.len(),
                verses = chapter.verse_count(),
                "Normalized chapter"
            );
        }

        let rendered = self.render(&chapter)?;
        writeln!(io::stdout(), "{rendered}")?;
        Ok(())
    }

    /// Preferences from the YAML file, overridden by the command-line flags
    fn preferences(&self) -> Result<DisplayPreferences> {
        let mut preferences = match &self.prefs {
            Some(path) => load_preferences(path)?,
            None => DisplayPreferences::default(),
        };
        if self.show_footnotes {
            preferences.show_footnotes = true;
        }
        if self.hide_description {
            preferences.show_description = false;
        }
        if self.hide_cross_reference {
            preferences.show_cross_reference = false;
        }
        Ok(preferences)
    }

    fn render(&self, chapter: &NormalizedChapter) -> Result<String> {
        let rendered = match self.output {
            OutputFormat::Json => serde_json::to_string_pretty(chapter)?,
            OutputFormat::Html => FragmentRenderer::new()
                .with_title(self.with_title)
                .render_chapter(chapter),
            OutputFormat::Text => to_plain_text(chapter),
        };
        Ok(rendered)
    }
}

fn load_preferences(path: &Path) -> Result<DisplayPreferences> {
    let yaml = fs::read_to_string(path)
        .with_context(|| format!("Failed to read preferences file {}", path.display()))?;
    serde_yaml::from_str(&yaml)
        .with_context(|| format!("Invalid preferences file {}", path.display()))
}

fn read_payload(input: Option<&Path>) -> Result<String> {
    match input {
        Some(path) if path != Path::new("-") => fs::read_to_string(path)
            .with_context(|| format!("Failed to read payload {}", path.display())),
        _ => {
            let mut payload = String::new();
            io::stdin()
                .read_to_string(&mut payload)
                .context("Failed to read payload from stdin")?;
            Ok(payload)
        }
    }
}
