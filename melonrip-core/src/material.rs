//! Materials
//!
//! A material is identified by the raw (TEXIMAGE_PARAM, PLTT_BASE,
//! POLYGON_ATTR) triple in effect when a polygon was drawn. [`MaterialTable`]
//! interns those triples in first-seen order; faces refer to materials by
//! that index.
//!
//! [`MaterialDescriptor`] is the renderer-neutral reading of one key: blend
//! method, culling, texture wrapping and how vertex color combines with the
//! texture. It is a pure function of the key and the final DISP3DCNT.

use crate::regs::{DispCnt, PolygonAttr, PolygonMode, TexParam};
use crate::texture::{TexelFormat, TextureKey};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Register snapshot that distinguishes one material from another.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MaterialKey {
    pub tex_param: TexParam,
    pub tex_pal: u32,
    pub polygon_attr: PolygonAttr,
}

impl MaterialKey {
    pub fn new(tex_param: TexParam, tex_pal: u32, polygon_attr: PolygonAttr) -> Self {
        Self {
            tex_param,
            tex_pal,
            polygon_attr,
        }
    }

    /// Texture sampled by this material, if any.
    pub fn texture(&self) -> Option<TextureKey> {
        match self.tex_param.format() {
            TexelFormat::None => None,
            _ => Some(TextureKey::new(self.tex_param, self.tex_pal)),
        }
    }
}

/// Insertion-ordered set of material keys.
#[derive(Debug, Default, Clone)]
pub struct MaterialTable {
    keys: Vec<MaterialKey>,
    index: HashMap<MaterialKey, u32>,
}

impl MaterialTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of `key`, assigning the next index on first sight.
    pub fn intern(&mut self, key: MaterialKey) -> u32 {
        if let Some(&i) = self.index.get(&key) {
            return i;
        }
        let i = self.keys.len() as u32;
        self.keys.push(key);
        self.index.insert(key, i);
        i
    }

    pub fn get(&self, index: u32) -> Option<&MaterialKey> {
        self.keys.get(index as usize)
    }

    pub fn keys(&self) -> &[MaterialKey] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn into_keys(self) -> Vec<MaterialKey> {
        self.keys
    }
}

/// How a material's alpha should be treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlendMethod {
    Opaque,
    /// Binary alpha; cut out below a threshold.
    Clip,
    /// Real translucency.
    Blend,
}

/// Texture coordinate wrapping along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WrapMode {
    Clamp,
    Repeat,
    Mirror,
}

impl WrapMode {
    /// Flip only takes effect together with repeat.
    pub fn from_flags(repeat: bool, flip: bool) -> Self {
        match (repeat, flip) {
            (false, _) => Self::Clamp,
            (true, false) => Self::Repeat,
            (true, true) => Self::Mirror,
        }
    }

    /// Map a texture coordinate into 0..=1 the way the sampler would.
    pub fn apply(self, coord: f32) -> f32 {
        match self {
            Self::Clamp => coord.clamp(0.0, 1.0),
            Self::Repeat => coord - coord.floor(),
            Self::Mirror => {
                let period = coord.rem_euclid(2.0);
                if period > 1.0 {
                    2.0 - period
                } else {
                    period
                }
            }
        }
    }
}

/// How the texture color combines with the vertex color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Combine {
    /// vertex color x texture color; alpha multiplies in.
    Modulate,
    /// Texture alpha mixes between vertex color and texture color.
    Decal,
}

/// Renderer-neutral description of one material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialDescriptor {
    pub key: MaterialKey,
    pub texture: Option<TextureKey>,
    pub polygon_mode: PolygonMode,
    pub texel_format: TexelFormat,
    /// Polygon alpha normalized to 0..=1.
    pub alpha: f32,
    pub blend: BlendMethod,
    pub backface_culling: bool,
    pub wrap_s: WrapMode,
    pub wrap_t: WrapMode,
    pub combine: Combine,
    /// Vertex color is an index into the toon ramp.
    pub toon_ramp: bool,
}

impl MaterialDescriptor {
    pub fn from_key(key: MaterialKey, disp_cnt: DispCnt) -> Self {
        let tex = key.tex_param;
        let attr = key.polygon_attr;
        let format = tex.format();
        let mode = attr.mode();
        let poly_alpha = attr.alpha();
        let texture = key.texture();

        let modulates = matches!(mode, PolygonMode::Modulate | PolygonMode::ToonHighlight);

        let blend = if poly_alpha < 31 {
            BlendMethod::Blend
        } else if texture.is_some() && modulates {
            if format.is_translucent() {
                BlendMethod::Blend
            } else if (format.is_paletted() && tex.color0_transparent())
                || format == TexelFormat::Compressed4x4
            {
                BlendMethod::Clip
            } else {
                BlendMethod::Opaque
            }
        } else {
            BlendMethod::Opaque
        };

        Self {
            key,
            texture,
            polygon_mode: mode,
            texel_format: format,
            alpha: poly_alpha as f32 / 31.0,
            blend,
            backface_culling: !attr.render_back(),
            wrap_s: WrapMode::from_flags(tex.repeat_s(), tex.flip_s()),
            wrap_t: WrapMode::from_flags(tex.repeat_t(), tex.flip_t()),
            combine: if mode == PolygonMode::Decal {
                Combine::Decal
            } else {
                Combine::Modulate
            },
            toon_ramp: mode == PolygonMode::ToonHighlight && !disp_cnt.highlight_shading(),
        }
    }
}
