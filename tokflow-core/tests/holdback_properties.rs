//! Property tests for delta reassembly over a byte-level vocabulary

use proptest::prelude::*;
use tokflow_core::{
    BoxError, Decode, HoldbackPolicy, StreamingDecodeBuffer, TokenId, Transcript,
};

/// Pieces include multi-byte characters split across tokens
fn pieces() -> Vec<Vec<u8>> {
    vec![
        b"Hello".to_vec(),
        b" world".to_vec(),
        b",".to_vec(),
        b"!".to_vec(),
        b"?".to_vec(),
        b":".to_vec(),
        b";".to_vec(),
        b".".to_vec(),
        b"\n".to_vec(),
        b" ".to_vec(),
        vec![0xE4],             // 你, first byte
        vec![0xBD, 0xA0],       // 你, rest
        vec![0xC3],             // é, first byte
        vec![0xA9],             // é, rest
        vec![0xF0, 0x9F],       // 😀, first half
        vec![0x98, 0x80],       // 😀, second half
        "世".as_bytes().to_vec(),
    ]
}

const PIECE_COUNT: TokenId = 17;

struct ByteDecoder {
    pieces: Vec<Vec<u8>>,
}

impl Decode for ByteDecoder {
    fn decode(&self, token_ids: &[TokenId]) -> Result<String, BoxError> {
        let mut bytes = Vec::new();
        for &id in token_ids {
            let piece = self
                .pieces
                .get(id as usize)
                .ok_or_else(|| format!("unknown token id {id}"))?;
            bytes.extend_from_slice(piece);
        }
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

fn decoder() -> ByteDecoder {
    ByteDecoder { pieces: pieces() }
}

fn batches() -> impl Strategy<Value = Vec<Vec<TokenId>>> {
    prop::collection::vec(prop::collection::vec(0..PIECE_COUNT, 0..4), 0..40)
}

fn prompt() -> impl Strategy<Value = Vec<TokenId>> {
    prop::collection::vec(0..PIECE_COUNT, 1..4)
}

fn run(policy: HoldbackPolicy, prompt: &[TokenId], batches: &[Vec<TokenId>]) -> Transcript {
    let mut buffer = StreamingDecodeBuffer::with_policy(decoder(), Transcript::new(), policy)
        .expect("policy is valid");
    buffer.push(prompt).unwrap();
    for batch in batches {
        buffer.push(batch).unwrap();
    }
    buffer.finish().unwrap();
    buffer.into_sink()
}

proptest! {
    #[test]
    fn deltas_reassemble_the_full_decode(prompt in prompt(), batches in batches()) {
        let transcript = run(HoldbackPolicy::default(), &prompt, &batches);

        let generated: Vec<TokenId> = batches.concat();
        let expected = decoder().decode(&generated).unwrap();
        prop_assert_eq!(transcript.text(), expected);
    }

    #[test]
    fn exactly_one_final_notification_at_the_end(prompt in prompt(), batches in batches()) {
        let transcript = run(HoldbackPolicy::default(), &prompt, &batches);
        let chunks = transcript.chunks();

        prop_assert!(!chunks.is_empty());
        prop_assert!(chunks.last().unwrap().is_final);
        prop_assert_eq!(chunks.iter().filter(|chunk| chunk.is_final).count(), 1);
    }

    #[test]
    fn non_final_deltas_never_end_unstable(prompt in prompt(), batches in batches()) {
        let policy = HoldbackPolicy::default();
        let transcript = run(policy.clone(), &prompt, &batches);

        for chunk in transcript.chunks().iter().filter(|chunk| !chunk.is_final) {
            prop_assert!(!chunk.text.is_empty());
            let last = chunk.text.chars().next_back().unwrap();
            prop_assert!(!policy.soft_punctuation.contains(&last), "delta {:?}", chunk.text);
            prop_assert!(!chunk.text.ends_with('\u{FFFD}'), "delta {:?}", chunk.text);
        }
    }

    #[test]
    fn token_cap_preserves_reassembly(
        prompt in prompt(),
        batches in batches(),
        cap in 1usize..8,
    ) {
        let policy = HoldbackPolicy::default().with_max_pending_tokens(Some(cap));
        let transcript = run(policy, &prompt, &batches);

        let expected = decoder().decode(&batches.concat()).unwrap();
        prop_assert_eq!(transcript.text(), expected);
    }
}
