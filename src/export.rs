// src/export.rs
// =============================================================================
// Where the rendered views end up: files, stdout, or the clipboard.
//
// - Artifacts bundles the three views of one contributor list
// - write_files() saves contributors.{json,html,md,png|webp} into a directory
// - Clipboard is a small trait so the copy actions can be tested without
//   a display server; SystemClipboard is the arboard-backed version
// =============================================================================

use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};

use arboard::ImageData;
use clap::ValueEnum;
use image::RgbaImage;
use reqwest::Client;
use tracing::debug;

use crate::error::{HubError, HubResult};
use crate::github::Contributor;
use crate::render::mosaic::{self, load_avatars};
use crate::render::{render_json, render_markdown_list, render_table, ExportFormat, MosaicLayout, MosaicOptions};

// Which views to produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed contributor records
    Json,
    /// HTML avatar table for README files
    Table,
    /// Plain Markdown pipe table
    Markdown,
    /// Circular-avatar mosaic image
    Image,
    /// Everything above
    All,
}

impl OutputFormat {
    pub fn wants_json(self) -> bool {
        matches!(self, OutputFormat::Json | OutputFormat::All)
    }

    pub fn wants_table(self) -> bool {
        matches!(self, OutputFormat::Table | OutputFormat::All)
    }

    pub fn wants_markdown(self) -> bool {
        matches!(self, OutputFormat::Markdown | OutputFormat::All)
    }

    pub fn wants_image(self) -> bool {
        matches!(self, OutputFormat::Image | OutputFormat::All)
    }
}

// The thing to put on the clipboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CopyTarget {
    Json,
    Table,
    Image,
}

// The rendered mosaic plus its encoded bytes
#[derive(Debug, Clone)]
pub struct MosaicImage {
    pub canvas: RgbaImage,
    pub bytes: Vec<u8>,
    pub format: ExportFormat,
    /// Avatars replaced by placeholders
    pub missing: usize,
}

impl MosaicImage {
    pub fn file_name(&self) -> String {
        format!("contributors.{}", self.format.extension())
    }

    pub fn data_url(&self) -> String {
        mosaic::to_data_url(&self.bytes, self.format)
    }
}

// All requested views of one contributor list
#[derive(Debug, Clone, Default)]
pub struct Artifacts {
    pub json: Option<String>,
    pub table: Option<String>,
    pub markdown: Option<String>,
    pub image: Option<MosaicImage>,
}

// Renders the views selected by `format`
//
// Avatars are only downloaded when the image is requested (or needed for
// an image copy).
pub async fn build_artifacts(
    http: &Client,
    contributors: &[Contributor],
    format: OutputFormat,
    image_format: ExportFormat,
    mosaic_options: MosaicOptions,
    copy: Option<CopyTarget>,
) -> HubResult<Artifacts> {
    let mut artifacts = Artifacts::default();

    if format.wants_json() || copy == Some(CopyTarget::Json) {
        artifacts.json = Some(render_json(contributors)?);
    }
    if format.wants_table() || copy == Some(CopyTarget::Table) {
        artifacts.table = Some(render_table(contributors));
    }
    if format.wants_markdown() {
        artifacts.markdown = Some(render_markdown_list(contributors));
    }

    if format.wants_image() || copy == Some(CopyTarget::Image) {
        let layout = MosaicLayout::new(contributors.len(), mosaic_options);
        let avatars = load_avatars(http, contributors, layout.diameter()).await;
        let missing = avatars.iter().filter(|a| a.is_missing()).count();

        if let Some(canvas) = mosaic::compose(&layout, &avatars) {
            let bytes = mosaic::encode(&canvas, image_format)?;
            artifacts.image = Some(MosaicImage {
                canvas,
                bytes,
                format: image_format,
                missing,
            });
        }
    }

    Ok(artifacts)
}

// Saves the artifacts selected by `format` into `dir`, creating it if needed
//
// Artifacts rendered only for a clipboard copy are not written.
// Returns the paths written, in json / table / markdown / image order.
pub fn write_files(dir: &Path, artifacts: &Artifacts, format: OutputFormat) -> HubResult<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;
    let mut written = Vec::new();

    if let Some(json) = artifacts.json.as_ref().filter(|_| format.wants_json()) {
        written.push(write_file(dir, "contributors.json", json.as_bytes())?);
    }
    if let Some(table) = artifacts.table.as_ref().filter(|_| format.wants_table()) {
        written.push(write_file(dir, "contributors.html", table.as_bytes())?);
    }
    if let Some(markdown) = artifacts.markdown.as_ref().filter(|_| format.wants_markdown()) {
        written.push(write_file(dir, "contributors.md", markdown.as_bytes())?);
    }
    if let Some(image) = artifacts.image.as_ref().filter(|_| format.wants_image()) {
        written.push(write_file(dir, &image.file_name(), &image.bytes)?);
    }

    Ok(written)
}

pub fn write_file(dir: &Path, name: &str, bytes: &[u8]) -> HubResult<PathBuf> {
    let path = dir.join(name);
    fs::write(&path, bytes)?;
    debug!(path = %path.display(), bytes = bytes.len(), "wrote artifact");
    Ok(path)
}

// Anything that can receive text or an RGBA image
pub trait Clipboard {
    fn set_text(&mut self, text: &str) -> HubResult<()>;
    fn set_image(&mut self, image: &RgbaImage) -> HubResult<()>;
}

// The system clipboard via arboard
pub struct SystemClipboard {
    inner: arboard::Clipboard,
}

impl SystemClipboard {
    pub fn open() -> HubResult<Self> {
        let inner = arboard::Clipboard::new().map_err(|e| HubError::Clipboard(e.to_string()))?;
        Ok(Self { inner })
    }
}

impl Clipboard for SystemClipboard {
    fn set_text(&mut self, text: &str) -> HubResult<()> {
        self.inner
            .set_text(text.to_string())
            .map_err(|e| HubError::Clipboard(e.to_string()))
    }

    fn set_image(&mut self, image: &RgbaImage) -> HubResult<()> {
        self.inner
            .set_image(ImageData {
                width: image.width() as usize,
                height: image.height() as usize,
                bytes: Cow::Borrowed(image.as_raw().as_slice()),
            })
            .map_err(|e| HubError::Clipboard(e.to_string()))
    }
}

// Copies the chosen artifact
//
// Returns false when that artifact was not rendered (e.g. no contributors,
// so there is no image to copy).
pub fn copy_to(clipboard: &mut dyn Clipboard, artifacts: &Artifacts, target: CopyTarget) -> HubResult<bool> {
    match target {
        CopyTarget::Json => match &artifacts.json {
            Some(json) => clipboard.set_text(json).map(|_| true),
            None => Ok(false),
        },
        CopyTarget::Table => match &artifacts.table {
            Some(table) if !table.is_empty() => clipboard.set_text(table).map(|_| true),
            _ => Ok(false),
        },
        CopyTarget::Image => match &artifacts.image {
            Some(image) => clipboard.set_image(&image.canvas).map(|_| true),
            None => Ok(false),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[derive(Default)]
    struct RecordingClipboard {
        text: Option<String>,
        image_size: Option<(u32, u32)>,
    }

    impl Clipboard for RecordingClipboard {
        fn set_text(&mut self, text: &str) -> HubResult<()> {
            self.text = Some(text.to_string());
            Ok(())
        }

        fn set_image(&mut self, image: &RgbaImage) -> HubResult<()> {
            self.image_size = Some(image.dimensions());
            Ok(())
        }
    }

    fn sample_artifacts() -> Artifacts {
        let canvas = RgbaImage::from_pixel(4, 2, Rgba([0, 0, 0, 255]));
        Artifacts {
            json: Some("[]".into()),
            table: Some("<table></table>".into()),
            markdown: None,
            image: Some(MosaicImage {
                bytes: mosaic::encode(&canvas, ExportFormat::Png).unwrap(),
                canvas,
                format: ExportFormat::Png,
                missing: 0,
            }),
        }
    }

    #[test]
    fn test_output_format_selection() {
        assert!(OutputFormat::All.wants_image());
        assert!(OutputFormat::All.wants_markdown());
        assert!(OutputFormat::Json.wants_json());
        assert!(!OutputFormat::Json.wants_table());
        assert!(!OutputFormat::Table.wants_image());
    }

    #[test]
    fn test_write_files_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");

        let written = write_files(&out, &sample_artifacts(), OutputFormat::All).unwrap();

        let names: Vec<_> = written
            .iter()
            .filter_map(|p| p.file_name().and_then(|n| n.to_str()))
            .collect();
        assert_eq!(names, vec!["contributors.json", "contributors.html", "contributors.png"]);
        assert_eq!(fs::read_to_string(out.join("contributors.json")).unwrap(), "[]");
    }

    #[test]
    fn test_write_files_honours_format() {
        let dir = tempfile::tempdir().unwrap();
        let written = write_files(dir.path(), &sample_artifacts(), OutputFormat::Image).unwrap();
        assert_eq!(written, vec![dir.path().join("contributors.png")]);
    }

    #[test]
    fn test_copy_targets() {
        let artifacts = sample_artifacts();
        let mut clipboard = RecordingClipboard::default();

        assert!(copy_to(&mut clipboard, &artifacts, CopyTarget::Table).unwrap());
        assert_eq!(clipboard.text.as_deref(), Some("<table></table>"));

        assert!(copy_to(&mut clipboard, &artifacts, CopyTarget::Image).unwrap());
        assert_eq!(clipboard.image_size, Some((4, 2)));
    }

    #[test]
    fn test_copy_missing_artifact_is_noop() {
        let mut clipboard = RecordingClipboard::default();
        let copied = copy_to(&mut clipboard, &Artifacts::default(), CopyTarget::Image).unwrap();
        assert!(!copied);
        assert!(clipboard.image_size.is_none());
    }

    #[tokio::test]
    async fn test_build_artifacts_for_empty_list() {
        let artifacts = build_artifacts(
            &Client::new(),
            &[],
            OutputFormat::All,
            ExportFormat::Png,
            MosaicOptions::default(),
            None,
        )
        .await
        .unwrap();

        assert_eq!(artifacts.json.as_deref(), Some("[]"));
        assert_eq!(artifacts.table.as_deref(), Some(""));
        assert!(artifacts.image.is_none());
    }
}
