//! Print deltas to stdout as a model would stream them

use std::io::Write;
use tokflow_core::{sink_fn, BoxError, Decode, StreamingDecodeBuffer, TokenId};

/// "你" split across two tokens
const NI_HEAD: &[u8] = &[0xE4, 0xBD];
const NI_TAIL: &[u8] = &[0xA0];

/// Byte-level decoder over a tiny vocabulary
struct Bytes(Vec<&'static [u8]>);

impl Decode for Bytes {
    fn decode(&self, token_ids: &[TokenId]) -> Result<String, BoxError> {
        let mut bytes = Vec::new();
        for &id in token_ids {
            let piece = self
                .0
                .get(id as usize)
                .ok_or_else(|| format!("unknown token id {id}"))?;
            bytes.extend_from_slice(piece);
        }
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let vocab = Bytes(vec![
        b"<prompt>".as_slice(),
        b"Hello".as_slice(),
        b",".as_slice(),
        b" world".as_slice(),
        b"!".as_slice(),
        b"\n".as_slice(),
        NI_HEAD,
        NI_TAIL,
        "好".as_bytes(),
    ]);

    let sink = sink_fn(|delta: &str, is_final| {
        print!("{delta}");
        if is_final {
            println!("[end]");
        }
        let _ = std::io::stdout().flush();
    });
    let mut buffer = StreamingDecodeBuffer::new(vocab, sink);

    let batches: [&[TokenId]; 8] = [&[0, 0], &[1, 2], &[3], &[4], &[5], &[6], &[7, 8], &[4]];
    for batch in batches {
        buffer.push(batch)?;
    }
    buffer.finish()?;

    println!("{:?}", buffer.stats());
    Ok(())
}
