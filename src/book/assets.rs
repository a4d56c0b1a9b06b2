//! Image copying into the output tree.

use std::fs;

use image::ImageFormat;
use log::debug;
use percent_encoding::percent_decode_str;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::latex::AssetStore;
use crate::util::is_gif;

use super::create_parent_dir;

/// Stores images under `output_dir/chapter_dir`, converting GIFs to PNG.
#[derive(Debug, Clone, Copy)]
pub struct FsAssets<'a> {
    config: &'a Config,
}

impl<'a> FsAssets<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }
}

impl AssetStore for FsAssets<'_> {
    fn store_image(&mut self, src: &str) -> Result<String> {
        let source = self.config.source_path(src);
        let data = fs::read(&source).map_err(|e| Error::io(&source, e))?;
        let convert = is_gif(src, &data);

        let decoded = percent_decode_str(src).decode_utf8_lossy();
        let name = if convert {
            png_name(&decoded)
        } else {
            decoded.into_owned()
        };
        let relative = self.config.chapter_relative(&name);
        let dest = self.config.output_path(&relative);
        create_parent_dir(&dest)?;

        if convert {
            let image = image::load_from_memory_with_format(&data, ImageFormat::Gif)
                .map_err(|e| Error::Image {
                    path: source.clone(),
                    source: e,
                })?;
            image
                .save_with_format(&dest, ImageFormat::Png)
                .map_err(|e| Error::Image {
                    path: dest.clone(),
                    source: e,
                })?;
        } else {
            fs::write(&dest, &data).map_err(|e| Error::io(&dest, e))?;
        }

        debug!("stored {src} as {relative}");
        Ok(relative)
    }
}

/// Replace the file extension of `src` with `.png`.
fn png_name(src: &str) -> String {
    match src.rsplit_once('.') {
        Some((stem, ext)) if !ext.contains('/') && !stem.is_empty() && !stem.ends_with('/') => {
            format!("{stem}.png")
        }
        _ => format!("{src}.png"),
    }
}
