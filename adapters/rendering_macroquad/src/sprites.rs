use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use glam::Vec2;
use macroquad::{
    color::WHITE,
    math::{Rect, Vec2 as MacroquadVec2},
    texture::{self, DrawTextureParams, Texture2D},
};
use tilebound_core::SheetKey;

const SUPPORTED_MANIFEST_VERSION: u32 = 1;
const ALL_SHEET_KEYS: [SheetKey; 4] = [
    SheetKey::Background,
    SheetKey::Foreground,
    SheetKey::Enemies,
    SheetKey::Character,
];

/// Side length of one tile region inside every sheet, in source pixels.
pub(crate) const SHEET_TILE_LENGTH: f32 = 64.0;

/// Parameters describing how a sheet region should be blitted on screen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct BlitParams {
    /// Position in screen-space pixels where the region's top-left corner is placed.
    pub position: Vec2,
    /// Desired size in screen-space pixels.
    pub dest_size: Vec2,
    /// Horizontal pixel offset of the source region within its sheet.
    pub source_x: u32,
    /// Vertical pixel offset of the source region within its sheet.
    pub source_y: u32,
}

impl BlitParams {
    /// Creates blit parameters anchored at the provided position and size,
    /// sourcing the sheet's top-left region.
    #[must_use]
    pub(crate) fn new(position: Vec2, dest_size: Vec2) -> Self {
        Self {
            position,
            dest_size,
            source_x: 0,
            source_y: 0,
        }
    }

    /// Overrides the source region sampled from the sheet.
    #[must_use]
    pub(crate) fn with_source(mut self, source_x: u32, source_y: u32) -> Self {
        self.source_x = source_x;
        self.source_y = source_y;
        self
    }
}

/// Cache of sheet textures loaded from the manifest.
///
/// A role whose image failed to load is simply absent; blits against it are
/// silent no-ops so the session keeps running with that sheet undrawn.
#[derive(Debug)]
pub(crate) struct SheetAtlas {
    textures: HashMap<SheetKey, Texture2D>,
}

impl SheetAtlas {
    /// Loads the default sheet manifest from disk.
    pub(crate) fn from_default_manifest() -> Result<Self> {
        Self::from_manifest_path(Self::default_manifest_path())
    }

    /// Loads sheets from the manifest located at the provided path.
    pub(crate) fn from_manifest_path(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_manifest_with_loader(path, default_loader)
    }

    /// Returns the default manifest path relative to the repository root.
    #[must_use]
    pub(crate) fn default_manifest_path() -> PathBuf {
        PathBuf::from("assets/manifest.toml")
    }

    /// Blits the requested region of a sheet, skipping silently when the
    /// sheet texture is unavailable.
    pub(crate) fn blit(&self, key: SheetKey, params: BlitParams) {
        let Some(texture) = self.textures.get(&key) else {
            return;
        };

        let draw_params = DrawTextureParams {
            dest_size: Some(MacroquadVec2::new(params.dest_size.x, params.dest_size.y)),
            source: Some(Rect::new(
                params.source_x as f32,
                params.source_y as f32,
                SHEET_TILE_LENGTH,
                SHEET_TILE_LENGTH,
            )),
            ..DrawTextureParams::default()
        };

        texture::draw_texture_ex(
            *texture,
            params.position.x,
            params.position.y,
            WHITE,
            draw_params,
        );
    }

    /// Returns whether the atlas holds a texture for the provided role.
    #[must_use]
    pub(crate) fn contains(&self, key: SheetKey) -> bool {
        self.textures.contains_key(&key)
    }

    /// Retrieves the texture associated with the provided role.
    #[must_use]
    pub(crate) fn texture(&self, key: SheetKey) -> Option<Texture2D> {
        self.textures.get(&key).copied()
    }

    fn from_manifest_with_loader(
        path: impl AsRef<Path>,
        mut loader: impl FnMut(SheetKey, &Path) -> Result<Texture2D>,
    ) -> Result<Self> {
        let manifest_path = path.as_ref();
        let contents = fs::read_to_string(manifest_path).with_context(|| {
            format!(
                "failed to read sheet manifest at {}",
                manifest_path.display()
            )
        })?;
        let base = manifest_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let entries = parse_manifest(&contents, &base)?;
        Ok(Self::from_entries(entries, &mut loader))
    }

    fn from_entries(
        entries: Vec<(SheetKey, PathBuf)>,
        loader: &mut impl FnMut(SheetKey, &Path) -> Result<Texture2D>,
    ) -> Self {
        let mut textures = HashMap::with_capacity(entries.len());
        for (key, path) in entries {
            match loader(key, &path) {
                Ok(texture) => {
                    let _ = textures.insert(key, texture);
                }
                Err(error) => {
                    eprintln!(
                        "warning: sheet {key:?} unavailable, cells using it will not draw: {error:#}"
                    );
                }
            }
        }
        Self { textures }
    }
}

fn default_loader(_key: SheetKey, path: &Path) -> Result<Texture2D> {
    let bytes = fs::read(path)
        .with_context(|| format!("failed to read sheet image at {}", path.display()))?;
    Ok(Texture2D::from_file_with_format(&bytes, None))
}

#[derive(Debug, serde::Deserialize)]
struct Manifest {
    version: u32,
    sheets: HashMap<String, String>,
}

fn parse_manifest(contents: &str, base_path: &Path) -> Result<Vec<(SheetKey, PathBuf)>> {
    let manifest: Manifest =
        toml::from_str(contents).context("failed to parse sheet manifest toml contents")?;
    if manifest.version != SUPPORTED_MANIFEST_VERSION {
        bail!(
            "unsupported sheet manifest version {}; expected {}",
            manifest.version,
            SUPPORTED_MANIFEST_VERSION
        );
    }

    let mut resolved = HashMap::new();
    for (name, relative_path) in manifest.sheets {
        let key = parse_sheet_key(&name)
            .with_context(|| format!("unknown sheet key `{name}` in manifest"))?;
        let path = base_path.join(relative_path);
        if resolved.insert(key, path).is_some() {
            bail!("sheet manifest contains duplicate entry for {key:?}");
        }
    }

    let mut ordered = Vec::with_capacity(ALL_SHEET_KEYS.len());
    for key in ALL_SHEET_KEYS {
        let Some(path) = resolved.remove(&key) else {
            bail!("sheet manifest missing entry for {key:?}");
        };
        ordered.push((key, path));
    }

    if !resolved.is_empty() {
        let unexpected = resolved
            .into_keys()
            .map(|key| format!("{key:?}"))
            .collect::<Vec<_>>()
            .join(", ");
        bail!("sheet manifest contains unexpected keys: {unexpected}");
    }

    Ok(ordered)
}

fn parse_sheet_key(name: &str) -> Result<SheetKey> {
    match name {
        "Background" => Ok(SheetKey::Background),
        "Foreground" => Ok(SheetKey::Foreground),
        "Enemies" => Ok(SheetKey::Enemies),
        "Character" => Ok(SheetKey::Character),
        _ => bail!("unknown sheet key `{name}`"),
    }
}
