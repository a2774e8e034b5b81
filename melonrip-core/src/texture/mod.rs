pub mod cache;
pub mod compressed;
pub mod decode;
pub mod format;

pub use cache::{TextureCache, TextureKey};
pub use decode::{decode_texture, DecodedTexture, Texel};
pub use format::TexelFormat;
