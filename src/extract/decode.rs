use crate::compression::{has_zlib_header, Zlib};
use crate::errors::{Error, Result};
use crate::signature::Kind;
use repr::wrapper::Prologue;

/// A payload after decompression and classification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    pub data: Vec<u8>,
    pub kind: Kind,
    /// The number of zlib layers removed: 0, 1, or 2
    pub layers: u8,
    /// The PLZP prologue, if the payload was wrapped
    pub prologue: Option<Prologue>,
}

/// Undo whatever compression was applied to the payload of entry `index`, then classify it.
///
/// * A PLZP wrapped payload is inflated from just past its prologue. The packing tool sometimes
///   compressed content before wrapping it, so if that yields another zlib stream, it is inflated
///   again.
/// * A bare zlib stream is inflated once.
/// * Anything else is passed through untouched.
pub fn decode(zlib: &mut Zlib, index: u32, payload: Vec<u8>) -> Result<Decoded> {
    let (data, layers, prologue) = if Prologue::is_tagged(&payload) {
        let prologue = Prologue::parse(&payload).ok_or(Error::TruncatedPayload {
            index,
            expected: Prologue::SIZE,
            available: payload.len(),
        })?;
        let inner = inflate(zlib, index, 1, &payload[Prologue::SIZE..])?;
        if has_zlib_header(&inner) {
            (inflate(zlib, index, 2, &inner)?, 2, Some(prologue))
        } else {
            (inner, 1, Some(prologue))
        }
    } else if has_zlib_header(&payload) {
        (inflate(zlib, index, 1, &payload)?, 1, None)
    } else {
        (payload, 0, None)
    };

    Ok(Decoded {
        kind: Kind::detect(&data),
        data,
        layers,
        prologue,
    })
}

fn inflate(zlib: &mut Zlib, index: u32, layer: u8, src: &[u8]) -> Result<Vec<u8>> {
    zlib.decompress(src)
        .map_err(|source| Error::Decompression {
            index,
            layer,
            source,
        })
}
