//! Piece-table decoder
//!
//! Maps each token id to the bytes of its vocabulary piece. Pieces of the
//! form `<0xHH>` stand for a single raw byte and `▁` stands for a space, as
//! in sentencepiece vocabularies. Bytes are concatenated and converted
//! lossily, so a character split across tokens decodes to `U+FFFD` until its
//! last byte arrives.

use crate::error::{ApiError, Result};
use std::collections::HashMap;
use std::sync::Arc;
use tokflow_core::{BoxError, Decode, TokenId};

const SPACE_PIECE: char = '\u{2581}';

#[derive(Debug, Clone, Default)]
pub struct VocabDecoder {
    pieces: Arc<HashMap<TokenId, Vec<u8>>>,
}

impl VocabDecoder {
    /// Build from `(id, piece)` pairs
    pub fn from_pieces<I, P>(pieces: I) -> Self
    where
        I: IntoIterator<Item = (TokenId, P)>,
        P: AsRef<str>,
    {
        let pieces = pieces
            .into_iter()
            .map(|(id, piece)| (id, piece_bytes(piece.as_ref())))
            .collect();
        Self {
            pieces: Arc::new(pieces),
        }
    }

    /// Parse a JSON object mapping decimal ids to pieces
    #[cfg(feature = "serde")]
    pub fn from_json_str(json: &str) -> Result<Self> {
        let raw: HashMap<String, String> = serde_json::from_str(json)?;
        let mut pieces = Vec::with_capacity(raw.len());
        for (key, piece) in raw {
            let id = key
                .trim()
                .parse::<TokenId>()
                .map_err(|_| ApiError::Vocab(format!("token id {key:?} is not an integer")))?;
            pieces.push((id, piece));
        }
        log::debug!("loaded vocabulary with {} pieces", pieces.len());
        Ok(Self::from_pieces(pieces))
    }

    /// Read and parse a JSON vocabulary file
    #[cfg(feature = "serde")]
    pub fn from_json_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Number of pieces
    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    /// Whether the vocabulary has no pieces
    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    /// Whether `id` has a piece
    pub fn contains(&self, id: TokenId) -> bool {
        self.pieces.contains_key(&id)
    }

    /// Raw bytes for one id
    pub fn piece(&self, id: TokenId) -> Option<&[u8]> {
        self.pieces.get(&id).map(Vec::as_slice)
    }
}

impl Decode for VocabDecoder {
    fn decode(&self, token_ids: &[TokenId]) -> std::result::Result<String, BoxError> {
        let mut bytes = Vec::with_capacity(token_ids.len() * 4);
        for &id in token_ids {
            let piece = self.pieces.get(&id).ok_or(ApiError::UnknownToken(id))?;
            bytes.extend_from_slice(piece);
        }
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

fn piece_bytes(piece: &str) -> Vec<u8> {
    let byte = piece
        .strip_prefix("<0x")
        .and_then(|rest| rest.strip_suffix('>'))
        .filter(|hex| hex.len() == 2)
        .and_then(|hex| u8::from_str_radix(hex, 16).ok());
    match byte {
        Some(byte) => vec![byte],
        None => piece.replace(SPACE_PIECE, " ").into_bytes(),
    }
}
