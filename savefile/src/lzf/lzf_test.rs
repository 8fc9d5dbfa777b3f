use super::*;

/// xorshift64, enough to get varied but repeatable inputs
struct Rng(u64);

impl Rng {
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }

    fn byte(&mut self) -> u8 {
        (self.next_u64() >> 24) as u8
    }
}

fn make_input(rng: &mut Rng, len: usize, kind: usize) -> Vec<u8> {
    match kind {
        0 => (0..len).map(|_| rng.byte()).collect(),
        1 => vec![rng.byte(); len],
        2 => b"the quick brown fox jumps over the lazy dog. "
            .iter()
            .copied()
            .cycle()
            .take(len)
            .collect(),
        _ => {
            // short runs of repeated bytes mixed with noise
            let mut v = Vec::with_capacity(len);
            while v.len() < len {
                let b = rng.byte();
                let run = (rng.next_u64() % 12) as usize + 1;
                v.extend(std::iter::repeat(b).take(run.min(len - v.len())));
            }
            v
        }
    }
}

fn assert_round_trip(input: &[u8], capacity: usize) -> bool {
    let mut packed = vec![0u8; capacity];
    let n = match compress(input, &mut packed) {
        Ok(n) => n,
        Err(LzfError::OutputTooSmall) => return false,
        Err(e) => panic!("unexpected compress error {e:?}"),
    };
    assert!(n <= capacity);

    let mut unpacked = vec![0u8; input.len()];
    let m = decompress(&packed[..n], &mut unpacked).unwrap();
    assert_eq!(m, input.len());
    assert_eq!(unpacked, input);
    true
}

#[test]
fn test_round_trip_many_inputs() {
    const LENGTHS: [usize; 8] = [0, 1, 2, 3, 17, 1024, 4099, 100_000];

    let mut rng = Rng(0x9E37_79B9_7F4A_7C15);
    let mut compressed = 0;
    for i in 0..200 {
        let len = LENGTHS[i % LENGTHS.len()];
        let input = make_input(&mut rng, len, i / LENGTHS.len() % 4);
        if assert_round_trip(&input, len) {
            compressed += 1;
        }
    }
    // the repetitive inputs must actually shrink
    assert!(compressed > 50, "only {compressed} inputs compressed");
}

#[test]
fn test_round_trip_with_slack() {
    let mut rng = Rng(42);
    for len in [1, 2, 3, 31, 32, 33, 64, 1000] {
        let input = make_input(&mut rng, len, 0);
        // random data grows by at most one control byte per 32 literals
        let capacity = len + len / MAX_LIT + 16;
        assert!(assert_round_trip(&input, capacity), "len {len}");
    }
}

#[test]
fn test_empty_input() {
    assert_eq!(compress(&[], &mut []), Ok(0));
    assert_eq!(decompress(&[], &mut []), Ok(0));
    assert_eq!(compress_to_vec(&[], 0), Ok(vec![]));
}

#[test]
fn test_known_encoding() {
    let mut out = [0u8; 16];
    let n = compress(b"abc", &mut out).unwrap();
    assert_eq!(&out[..n], &[2, b'a', b'b', b'c']);

    let n = compress(&[b'a'; 10], &mut out).unwrap();
    // literal "a", back reference of 7 at distance 1, literal "aa"
    assert_eq!(&out[..n], &[0x00, b'a', 0xA0, 0x00, 0x01, b'a', b'a']);
}

#[test]
fn test_long_match_uses_extension_byte() {
    let input = vec![7u8; 300];
    let packed = compress_to_vec(&input, 300).unwrap();
    assert!(packed.len() < 20, "{} bytes", packed.len());
    assert!(packed.iter().any(|&c| c >> 5 == 7));
    assert_eq!(decompress_to_vec(&packed, 300).unwrap(), input);
}

#[test]
fn test_compress_output_too_small() {
    let mut rng = Rng(7);
    let input = make_input(&mut rng, 1000, 0);
    let mut out = [0u8; 10];
    assert_eq!(compress(&input, &mut out), Err(LzfError::OutputTooSmall));
    assert_eq!(compress(b"x", &mut []), Err(LzfError::OutputTooSmall));
}

#[test]
fn test_overlapping_back_reference() {
    // "a", then copy 7 + 5 + 2 = 14 bytes from one byte back
    let stream = [0x00, b'a', 0xE0, 0x05, 0x00];
    let out = decompress_to_vec(&stream, 15).unwrap();
    assert_eq!(out, vec![b'a'; 15]);

    // "ab", then 4 bytes from two back
    let stream = [0x01, b'a', b'b', 0x40, 0x01];
    assert_eq!(decompress_to_vec(&stream, 6).unwrap(), b"ababab");
}

#[test]
fn test_back_reference_before_start() {
    let mut out = [0u8; 32];
    assert_eq!(
        decompress(&[0x20, 0x00], &mut out),
        Err(LzfError::BadBackReference)
    );
    assert_eq!(
        decompress(&[0x00, b'a', 0x20, 0x01], &mut out),
        Err(LzfError::BadBackReference)
    );
    // high offset bits alone reach far past a short output
    assert_eq!(
        decompress(&[0x00, b'a', 0x3F, 0xFF], &mut out),
        Err(LzfError::BadBackReference)
    );
}

#[test]
fn test_output_capacity_exceeded() {
    let stream = [0x00, b'a', 0xE0, 0x05, 0x00];
    let mut out = [0u8; 14];
    assert_eq!(decompress(&stream, &mut out), Err(LzfError::OutputTooSmall));
    // the literal made it in before the reference was refused
    assert_eq!(out[0], b'a');
    assert!(out[1..].iter().all(|&b| b == 0));

    let input = vec![3u8; 500];
    let packed = compress_to_vec(&input, 500).unwrap();
    assert_eq!(
        decompress_to_vec(&packed, 499),
        Err(LzfError::OutputTooSmall)
    );

    assert_eq!(
        decompress(&[0x03, 1, 2, 3, 4], &mut [0u8; 3]),
        Err(LzfError::OutputTooSmall)
    );
}

#[test]
fn test_truncated_stream() {
    let mut out = [0u8; 32];
    assert_eq!(decompress(&[0x05, 1, 2], &mut out), Err(LzfError::Truncated));
    assert_eq!(decompress(&[0x00, 1, 0x20], &mut out), Err(LzfError::Truncated));
    assert_eq!(
        decompress(&[0x00, 1, 0xE0, 0x05], &mut out),
        Err(LzfError::Truncated)
    );
}
