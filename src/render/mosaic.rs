// src/render/mosaic.rs
// =============================================================================
// The image view: every contributor's avatar, clipped to a circle, laid out
// in a grid on a transparent canvas.
//
// Layout (logical pixels):
//   avatar 70, padding 15, canvas at most 800 wide
//   per_row = floor(800 / 85) = 9
//   width   = min(800, per_row * 85 + 15)
//   height  = ceil(n / per_row) * 85 + 15
// The bitmap is drawn at `scale` times that size (2 by default) so the
// exported image stays sharp on high-density screens.
//
// Avatars are downloaded concurrently but kept in contributor order, so the
// grid reads row by row in the same order GitHub ranks contributors.
//
// Rust concepts:
// - Streams: futures::stream with .buffered() (ordered, bounded concurrency)
// - Enums with data: Avatar::Loaded(image) vs Avatar::Missing
// =============================================================================

use std::io::Cursor;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use clap::ValueEnum;
use futures::stream::{self, StreamExt};
use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use reqwest::Client;
use tracing::{debug, warn};
use url::Url;

use crate::error::HubResult;
use crate::github::Contributor;

pub const AVATAR_SIZE: u32 = 70;
pub const PADDING: u32 = 15;
pub const MAX_WIDTH: u32 = 800;
pub const SCALE: u32 = 2;

// How many avatars we download at once
const DOWNLOAD_CONCURRENCY: usize = 16;

const PLACEHOLDER: Rgba<u8> = Rgba([0xd1, 0xd5, 0xdb, 0xff]);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MosaicOptions {
    pub avatar_size: u32,
    pub padding: u32,
    pub max_width: u32,
    pub scale: u32,
}

impl Default for MosaicOptions {
    fn default() -> Self {
        Self {
            avatar_size: AVATAR_SIZE,
            padding: PADDING,
            max_width: MAX_WIDTH,
            scale: SCALE,
        }
    }
}

// Grid geometry for a given number of avatars
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MosaicLayout {
    options: MosaicOptions,
    count: usize,
    per_row: u32,
}

impl MosaicLayout {
    pub fn new(count: usize, options: MosaicOptions) -> Self {
        let options = MosaicOptions {
            avatar_size: options.avatar_size.max(1),
            scale: options.scale.max(1),
            ..options
        };
        let cell = options.avatar_size + options.padding;
        // Always at least one column, even on a very narrow canvas
        let per_row = (options.max_width / cell).max(1);

        Self {
            options,
            count,
            per_row,
        }
    }

    pub fn for_count(count: usize) -> Self {
        Self::new(count, MosaicOptions::default())
    }

    pub fn per_row(&self) -> u32 {
        self.per_row
    }

    pub fn rows(&self) -> u32 {
        (self.count as u32).div_ceil(self.per_row)
    }

    // Canvas size before scaling
    pub fn logical_size(&self) -> (u32, u32) {
        let cell = self.cell();
        let width = self
            .options
            .max_width
            .min(self.per_row * cell + self.options.padding)
            // A single column wider than max_width still has to fit its avatar
            .max(cell + self.options.padding);
        let height = self.rows() * cell + self.options.padding;
        (width, height)
    }

    // Bitmap size in pixels
    pub fn canvas_size(&self) -> (u32, u32) {
        let (w, h) = self.logical_size();
        (w * self.options.scale, h * self.options.scale)
    }

    // Avatar diameter in pixels
    pub fn diameter(&self) -> u32 {
        self.options.avatar_size * self.options.scale
    }

    // Top-left pixel of avatar `index` (row-major)
    pub fn cell_origin(&self, index: usize) -> (u32, u32) {
        let index = index as u32;
        let row = index / self.per_row;
        let col = index % self.per_row;
        let cell = self.cell();
        let x = col * cell + self.options.padding;
        let y = row * cell + self.options.padding;
        (x * self.options.scale, y * self.options.scale)
    }

    fn cell(&self) -> u32 {
        self.options.avatar_size + self.options.padding
    }
}

// An avatar ready to draw, or a gap to fill with a placeholder
#[derive(Debug, Clone)]
pub enum Avatar {
    Loaded(DynamicImage),
    Missing,
}

impl Avatar {
    pub fn is_missing(&self) -> bool {
        matches!(self, Avatar::Missing)
    }
}

// Output formats for the exported image
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Png,
    Webp,
}

impl ExportFormat {
    pub fn mime(self) -> &'static str {
        match self {
            ExportFormat::Png => "image/png",
            ExportFormat::Webp => "image/webp",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Webp => "webp",
        }
    }

    fn image_format(self) -> ImageFormat {
        match self {
            ExportFormat::Png => ImageFormat::Png,
            ExportFormat::Webp => ImageFormat::WebP,
        }
    }
}

// Downloads every avatar, at most DOWNLOAD_CONCURRENCY at a time
//
// The result has one entry per contributor, in the same order. A download
// or decode failure becomes Avatar::Missing instead of failing the mosaic.
pub async fn load_avatars(client: &Client, contributors: &[Contributor], size: u32) -> Vec<Avatar> {
    let downloads = contributors.iter().map(|dev| {
        let client = client.clone();
        let url = sized_avatar_url(&dev.avatar_url, size);
        let login = dev.login.clone();
        async move {
            match fetch_avatar(&client, &url).await {
                Ok(image) => Avatar::Loaded(image),
                Err(e) => {
                    warn!(%login, %url, error = %e, "avatar unavailable, using placeholder");
                    Avatar::Missing
                }
            }
        }
    });

    // .buffered() keeps output order, unlike .buffer_unordered()
    stream::iter(downloads)
        .buffered(DOWNLOAD_CONCURRENCY)
        .collect()
        .await
}

async fn fetch_avatar(client: &Client, url: &str) -> HubResult<DynamicImage> {
    let bytes = client.get(url).send().await?.error_for_status()?.bytes().await?;
    Ok(image::load_from_memory(&bytes)?)
}

// Asks GitHub's avatar CDN for an image close to the size we draw
fn sized_avatar_url(avatar_url: &str, size: u32) -> String {
    match Url::parse(avatar_url) {
        Ok(mut url) => {
            let pairs: Vec<(String, String)> = url
                .query_pairs()
                .filter(|(k, _)| k != "s")
                .map(|(k, v)| (k.into_owned(), v.into_owned()))
                .collect();
            url.query_pairs_mut()
                .clear()
                .extend_pairs(pairs)
                .append_pair("s", &size.to_string());
            url.to_string()
        }
        Err(_) => avatar_url.to_string(),
    }
}

// Draws the mosaic
//
// Returns None when there are no avatars (nothing to export).
pub fn compose(layout: &MosaicLayout, avatars: &[Avatar]) -> Option<RgbaImage> {
    if avatars.is_empty() {
        return None;
    }

    let (width, height) = layout.canvas_size();
    let diameter = layout.diameter();
    let mut canvas = RgbaImage::new(width, height);

    for (index, avatar) in avatars.iter().enumerate() {
        let tile = match avatar {
            Avatar::Loaded(image) => {
                imageops::resize(&image.to_rgba8(), diameter, diameter, FilterType::Triangle)
            }
            Avatar::Missing => RgbaImage::from_pixel(diameter, diameter, PLACEHOLDER),
        };
        let (x, y) = layout.cell_origin(index);
        draw_circle(&mut canvas, &tile, x, y);
    }

    debug!(width, height, avatars = avatars.len(), "composed mosaic");
    Some(canvas)
}

// Copies `tile` onto the canvas, keeping only the inscribed circle.
// Edge pixels get partial alpha so the rim is smooth.
fn draw_circle(canvas: &mut RgbaImage, tile: &RgbaImage, x0: u32, y0: u32) {
    let radius = tile.width() as f32 / 2.0;

    for (tx, ty, pixel) in tile.enumerate_pixels() {
        let (cx, cy) = (x0 + tx, y0 + ty);
        if cx >= canvas.width() || cy >= canvas.height() {
            continue;
        }

        let dx = tx as f32 + 0.5 - radius;
        let dy = ty as f32 + 0.5 - radius;
        let distance = (dx * dx + dy * dy).sqrt();
        let coverage = (radius - distance + 0.5).clamp(0.0, 1.0);
        if coverage <= 0.0 {
            continue;
        }

        let mut out = *pixel;
        out[3] = (pixel[3] as f32 * coverage).round() as u8;
        canvas.put_pixel(cx, cy, out);
    }
}

// Encodes the canvas as PNG or (lossless) WebP
pub fn encode(canvas: &RgbaImage, format: ExportFormat) -> HubResult<Vec<u8>> {
    let mut out = Cursor::new(Vec::new());
    canvas.write_to(&mut out, format.image_format())?;
    Ok(out.into_inner())
}

// data:image/png;base64,....
pub fn to_data_url(bytes: &[u8], format: ExportFormat) -> String {
    format!("data:{};base64,{}", format.mime(), STANDARD.encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::http::StatusCode as AxumStatus;
    use axum::response::IntoResponse;
    use axum::{routing::get, Router};
    use tokio::net::TcpListener;

    fn solid(color: [u8; 4]) -> Avatar {
        Avatar::Loaded(DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            16,
            16,
            Rgba(color),
        )))
    }

    #[test]
    fn test_layout_for_hundred_contributors() {
        let layout = MosaicLayout::for_count(100);
        assert_eq!(layout.per_row(), 9);
        assert_eq!(layout.rows(), 12);
        assert_eq!(layout.logical_size(), (780, 1035));
        assert_eq!(layout.canvas_size(), (1560, 2070));
        assert_eq!(layout.diameter(), 140);
    }

    #[test]
    fn test_cell_origins_are_row_major() {
        let layout = MosaicLayout::for_count(20);
        assert_eq!(layout.cell_origin(0), (30, 30));
        assert_eq!(layout.cell_origin(1), (200, 30));
        assert_eq!(layout.cell_origin(9), (30, 200));
        assert_eq!(layout.cell_origin(10), (200, 200));
    }

    #[test]
    fn test_narrow_canvas_keeps_one_column() {
        let layout = MosaicLayout::new(
            3,
            MosaicOptions {
                max_width: 40,
                ..MosaicOptions::default()
            },
        );
        assert_eq!(layout.per_row(), 1);
        assert_eq!(layout.logical_size(), (100, 3 * 85 + 15));
    }

    #[test]
    fn test_no_avatars_no_image() {
        assert!(compose(&MosaicLayout::for_count(0), &[]).is_none());
    }

    #[test]
    fn test_compose_clips_to_circles() {
        let avatars = vec![solid([255, 0, 0, 255]), Avatar::Missing];
        let layout = MosaicLayout::for_count(avatars.len());
        let canvas = compose(&layout, &avatars).unwrap();

        assert_eq!(canvas.dimensions(), layout.canvas_size());

        // Centre of the first circle is the avatar colour
        assert_eq!(canvas.get_pixel(100, 100), &Rgba([255, 0, 0, 255]));
        // The square's corner lies outside the circle
        assert_eq!(canvas.get_pixel(31, 31)[3], 0);
        // Padding stays transparent
        assert_eq!(canvas.get_pixel(0, 0)[3], 0);
        // Missing avatar becomes a grey disc
        assert_eq!(canvas.get_pixel(270, 100), &PLACEHOLDER);
    }

    #[test]
    fn test_encode_png_and_webp() {
        let layout = MosaicLayout::for_count(1);
        let canvas = compose(&layout, &[solid([0, 128, 255, 255])]).unwrap();

        let png = encode(&canvas, ExportFormat::Png).unwrap();
        let decoded = image::load_from_memory(&png).unwrap();
        assert_eq!((decoded.width(), decoded.height()), layout.canvas_size());

        let webp = encode(&canvas, ExportFormat::Webp).unwrap();
        assert_eq!(&webp[0..4], b"RIFF");
        assert_eq!(&webp[8..12], b"WEBP");
    }

    #[test]
    fn test_data_url_prefix() {
        let url = to_data_url(b"abc", ExportFormat::Png);
        assert_eq!(url, "data:image/png;base64,YWJj");
        assert!(to_data_url(b"", ExportFormat::Webp).starts_with("data:image/webp;base64,"));
    }

    #[test]
    fn test_sized_avatar_url() {
        assert_eq!(
            sized_avatar_url("https://avatars.githubusercontent.com/u/1?v=4", 140),
            "https://avatars.githubusercontent.com/u/1?v=4&s=140"
        );
        assert_eq!(
            sized_avatar_url("https://avatars.githubusercontent.com/u/1?s=20&v=4", 140),
            "https://avatars.githubusercontent.com/u/1?v=4&s=140"
        );
        assert_eq!(sized_avatar_url("not a url", 140), "not a url");
    }

    #[tokio::test]
    async fn test_load_avatars_keeps_order_and_marks_failures() {
        std::env::set_var("NO_PROXY", "127.0.0.1,localhost");

        let mut png = Cursor::new(Vec::new());
        RgbaImage::from_pixel(4, 4, Rgba([1, 2, 3, 255]))
            .write_to(&mut png, ImageFormat::Png)
            .unwrap();
        let png = png.into_inner();

        let app = Router::new()
            .route(
                "/ok.png",
                get(move || {
                    let png = png.clone();
                    async move { png }
                }),
            )
            .route("/gone.png", get(|| async { AxumStatus::NOT_FOUND.into_response() }))
            .route("/junk.png", get(|| async { "not an image" }));
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        let dev = |path: &str| Contributor {
            login: path.into(),
            avatar_url: format!("http://{addr}/{path}"),
            html_url: String::new(),
            contributions: 1,
        };
        let contributors = vec![dev("ok.png"), dev("gone.png"), dev("junk.png"), dev("ok.png")];

        let avatars = load_avatars(&Client::new(), &contributors, 140).await;

        let missing: Vec<bool> = avatars.iter().map(Avatar::is_missing).collect();
        assert_eq!(missing, vec![false, true, true, false]);
    }
}
