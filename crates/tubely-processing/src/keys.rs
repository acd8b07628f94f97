//! Object key naming.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use rand::RngCore;
use tubely_core::constants::ASSET_NAME_BYTES;
use tubely_core::models::AspectClassification;

/// URL-safe, unpadded encoding of [`ASSET_NAME_BYTES`] bytes from the OS-seeded CSPRNG.
pub fn random_asset_name() -> String {
    let mut bytes = [0u8; ASSET_NAME_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// `<prefix>/<random><extension>`; `extension` includes its leading dot.
pub fn derive_asset_key(prefix: &str, extension: &str) -> String {
    format!("{}/{}{}", prefix, random_asset_name(), extension)
}

/// Key for a video object, partitioned by its aspect classification.
pub fn derive_key(classification: AspectClassification, extension: &str) -> String {
    derive_asset_key(classification.as_str(), extension)
}
