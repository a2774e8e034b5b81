//! MelonRipper Dump Decoding
//!
//! Decodes the `.dump` files written by melonDS's MelonRipper: a recording of
//! the Nintendo DS 3D engine's polygon submissions and register writes, plus a
//! snapshot of VRAM.
//!
//! # Pipeline
//! - [`dump`]: single-pass parser over the tagged record stream
//! - [`vram`]: flattens banked VRAM into texture and palette memory
//! - [`texture`]: decodes the seven DS texel formats into RGBA images
//! - [`toon`]: resolves toon/highlight vertex colors after the stream ends
//! - [`material`]: material keys and their renderer-neutral descriptors
//! - [`scene`]: the decoded scene handed to an importer
//!
//! # Examples
//! ```no_run
//! let bytes = std::fs::read("capture.dump")?;
//! let mut scene = melonrip_core::decode_dump(&bytes)?;
//! for key in scene.texture_keys() {
//!     if let Some(tex) = scene.texture(&key) {
//!         println!("{}: {}x{}", key.file_stem(), tex.width(), tex.height());
//!     }
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod dump;
pub mod error;
pub mod material;
pub mod mesh;
pub mod regs;
pub mod scene;
pub mod texture;
pub mod toon;
pub mod vram;

pub use error::{RipError, RipResult};
pub use material::{MaterialDescriptor, MaterialKey};
pub use mesh::Mesh;
pub use scene::{decode_dump, RipScene};
pub use texture::{DecodedTexture, TexelFormat, TextureKey};
