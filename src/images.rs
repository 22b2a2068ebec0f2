use crate::{
    config::{Config, Thumbnails},
    error::{Result, VitrineError},
    file_ops::create_directory_safely,
    indexer::build_index,
};
use colored::Colorize;
use image::{ImageFormat, codecs::jpeg::JpegEncoder, imageops::FilterType};
use std::fs;
use std::path::Path;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ThumbnailSummary {
    pub generated: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Writes a copy of `source` at most `settings.width` pixels wide to `target`,
/// keeping the aspect ratio and the source format. Returns the new size.
pub fn create_thumbnail(source: &Path, target: &Path, settings: &Thumbnails) -> Result<(u32, u32)> {
    let img = image::open(source)?;
    if img.width() == 0 || img.height() == 0 {
        return Err(VitrineError::InvalidName(format!(
            "{} has no pixels",
            source.display()
        )));
    }

    let width = settings.width.min(img.width());
    let height = ((img.height() as f32) * (width as f32 / img.width() as f32))
        .round()
        .max(1.0) as u32;
    let thumb = if width == img.width() {
        img
    } else {
        img.resize_exact(width, height, FilterType::Triangle)
    };

    if let Some(parent) = target.parent() {
        create_directory_safely(parent)?;
    }

    match ImageFormat::from_path(source)? {
        ImageFormat::Jpeg => {
            let mut buffer = Vec::new();
            let mut encoder = JpegEncoder::new_with_quality(&mut buffer, settings.quality.min(100));
            encoder.encode_image(&thumb.to_rgb8())?;
            fs::write(target, buffer)?;
        }
        format => thumb.save_with_format(target, format)?,
    }

    Ok((thumb.width(), thumb.height()))
}

/// Fills the thumbnail mirror for every indexed image that has no thumbnail
/// yet, or for all of them when `force` is set.
pub fn generate_thumbnails(root: &Path, config: &Config, force: bool) -> Result<ThumbnailSummary> {
    let index = build_index(root, &config.catalog)?;
    let mirror = root.join(&config.catalog.thumbnail_dir);
    let mut summary = ThumbnailSummary::default();

    for record in index.records() {
        if record.has_thumbnail() && !force {
            summary.skipped += 1;
            continue;
        }

        let source = root.join(&record.path);
        let target = mirror.join(&record.path);
        match create_thumbnail(&source, &target, &config.thumbnails) {
            Ok((width, height)) => {
                summary.generated += 1;
                println!(
                    "{} {} ({}x{})",
                    "Thumbnail".green(),
                    record.path.yellow(),
                    width,
                    height
                );
            }
            Err(e) => {
                summary.failed += 1;
                println!("{} {}: {}", "Failed".red(), record.path.yellow(), e);
            }
        }
    }

    println!(
        "{} {} generated, {} skipped, {} failed",
        "Thumbnails:".blue(),
        summary.generated.to_string().cyan(),
        summary.skipped.to_string().cyan(),
        summary.failed.to_string().cyan()
    );
    Ok(summary)
}
