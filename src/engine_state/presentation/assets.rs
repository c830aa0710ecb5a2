//! # Asset Catalog
//!
//! Loads block and hand textures from the asset directory. A texture that is missing or
//! cannot be decoded is replaced by a neutral 1x1 texel, so a bad asset never keeps a
//! block from being created.

use std::path::{Path, PathBuf};

use log::{info, warn};
use thiserror::Error;

use crate::engine_state::voxels::block::block_type::BlockKind;

/// Texture file for each block kind, keyed by kind name.
static BLOCK_TEXTURE_FILES: phf::Map<&'static str, &'static str> = phf::phf_map! {
    "wood" => "wood.png",
    "stone" => "stone.png",
    "iron" => "iron.png",
};

/// Texture file for the hand.
pub const HAND_TEXTURE_FILE: &str = "hand.png";

/// RGBA of the neutral fallback texel.
pub const FALLBACK_RGBA: [u8; 4] = [128, 128, 128, 255];

/// Errors raised while loading a texture.
#[derive(Error, Debug)]
pub enum AssetError {
    /// No texture file is registered for the key.
    #[error("no texture registered for {0}")]
    Unregistered(String),

    /// The file could not be opened or decoded.
    #[error("failed to load texture {path}: {source}")]
    Image {
        /// File that failed
        path: PathBuf,
        /// Underlying decoder error
        #[source]
        source: image::ImageError,
    },
}

/// Decoded RGBA8 texture.
#[derive(Clone, Debug, PartialEq)]
pub struct Texture {
    /// Width in texels
    pub width: u32,
    /// Height in texels
    pub height: u32,
    /// Tightly packed RGBA8 texels
    pub rgba: Vec<u8>,
    /// Whether this is the neutral fallback
    pub is_fallback: bool,
}

impl Texture {
    /// The neutral 1x1 texture.
    pub fn fallback() -> Self {
        Self {
            width: 1,
            height: 1,
            rgba: FALLBACK_RGBA.to_vec(),
            is_fallback: true,
        }
    }

    fn load(path: &Path) -> Result<Self, AssetError> {
        let image = image::open(path)
            .map_err(|source| AssetError::Image {
                path: path.to_path_buf(),
                source,
            })?
            .to_rgba8();
        Ok(Self {
            width: image.width(),
            height: image.height(),
            rgba: image.into_raw(),
            is_fallback: false,
        })
    }
}

/// Index of the hand texture in the catalog.
pub const HAND_TEXTURE_INDEX: u32 = BlockKind::ALL.len() as u32;

/// Every texture the game draws with, one slot per block kind plus the hand.
#[derive(Clone, Debug)]
pub struct AssetCatalog {
    textures: Vec<Texture>,
}

impl AssetCatalog {
    /// Loads every texture from `asset_dir`, falling back where needed.
    pub fn load(asset_dir: &Path) -> Self {
        let mut textures: Vec<Texture> = BlockKind::ALL
            .iter()
            .map(|kind| Self::load_or_fallback(asset_dir, Self::block_texture_file(*kind)))
            .collect();
        textures.push(Self::load_or_fallback(asset_dir, Ok(HAND_TEXTURE_FILE)));

        let fallbacks = textures.iter().filter(|t| t.is_fallback).count();
        info!(
            "Loaded {} textures from {} ({} fallbacks)",
            textures.len(),
            asset_dir.display(),
            fallbacks
        );
        Self { textures }
    }

    /// A catalog made only of fallback textures.
    pub fn fallback_only() -> Self {
        Self {
            textures: vec![Texture::fallback(); BlockKind::ALL.len() + 1],
        }
    }

    /// Texture file registered for a block kind.
    pub fn block_texture_file(kind: BlockKind) -> Result<&'static str, AssetError> {
        BLOCK_TEXTURE_FILES
            .get(kind.name())
            .copied()
            .ok_or_else(|| AssetError::Unregistered(kind.name().to_owned()))
    }

    fn load_or_fallback(asset_dir: &Path, file: Result<&str, AssetError>) -> Texture {
        match file.and_then(|file| Texture::load(&asset_dir.join(file))) {
            Ok(texture) => texture,
            Err(err) => {
                warn!("{err}; using neutral texture");
                Texture::fallback()
            }
        }
    }

    /// Slot of a block kind's texture.
    pub fn texture_index(&self, kind: BlockKind) -> u32 {
        u32::from(kind.level() - 1)
    }

    /// Texture for a block kind.
    pub fn block_texture(&self, kind: BlockKind) -> &Texture {
        &self.textures[self.texture_index(kind) as usize]
    }

    /// Texture for the hand.
    pub fn hand_texture(&self) -> &Texture {
        &self.textures[HAND_TEXTURE_INDEX as usize]
    }

    /// Every texture in slot order.
    pub fn textures(&self) -> &[Texture] {
        &self.textures
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_kind_has_a_texture_file() {
        for kind in BlockKind::ALL {
            let file = AssetCatalog::block_texture_file(kind).unwrap();
            assert!(file.starts_with(kind.name()));
        }
    }

    #[test]
    fn missing_directory_falls_back() {
        let catalog = AssetCatalog::load(Path::new("no/such/asset/dir"));
        assert_eq!(catalog.textures().len(), 4);
        assert!(catalog.textures().iter().all(|t| t.is_fallback));
        assert_eq!(catalog.block_texture(BlockKind::Iron).rgba, FALLBACK_RGBA);
        assert!(catalog.hand_texture().is_fallback);
    }

    #[test]
    fn texture_slots_follow_levels() {
        let catalog = AssetCatalog::fallback_only();
        assert_eq!(catalog.texture_index(BlockKind::Wood), 0);
        assert_eq!(catalog.texture_index(BlockKind::Iron), 2);
        assert_eq!(HAND_TEXTURE_INDEX, 3);
    }
}
