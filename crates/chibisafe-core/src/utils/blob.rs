use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::prelude::Engine as _;
use base64::DecodeError;

/// Characters decoded per step when no chunk size is given.
pub const DEFAULT_CHUNK_SIZE: usize = 512;

/// Base64 encodes 3 bytes in 4 characters; chunks must stay on that boundary.
const BASE64_QUANTUM: usize = 4;

/// Standard alphabet; trailing `=` padding is optional, as pickers and
/// `atob` both accept it either way.
const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Binary payload tagged with its media type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    pub data: Vec<u8>,
    pub content_type: String,
}

impl Blob {
    pub fn new(data: Vec<u8>, content_type: impl Into<String>) -> Self {
        Self {
            data,
            content_type: content_type.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Decode base64 `data` into a `Blob`, `chunk_size` characters at a time.
///
/// `chunk_size` is rounded down to a multiple of 4 (minimum 4) so every
/// chunk decodes on its own. ASCII whitespace in the input is ignored and
/// the final chunk may omit its padding.
pub fn base64_to_blob(
    data: &str,
    content_type: &str,
    chunk_size: usize,
) -> Result<Blob, DecodeError> {
    let chunk_size = (chunk_size / BASE64_QUANTUM * BASE64_QUANTUM).max(BASE64_QUANTUM);

    let encoded: Vec<u8> = data
        .bytes()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();

    let mut bytes = Vec::with_capacity(encoded.len() / BASE64_QUANTUM * 3);
    for chunk in encoded.chunks(chunk_size) {
        LENIENT.decode_vec(chunk, &mut bytes)?;
    }

    Ok(Blob::new(bytes, content_type))
}
