//! Write sample captures for trying out `framescan`.
//!
//! ```bash
//! cargo run --example generate_test_data -- testdata
//! framescan -f testdata/test_large_complex.bin -v
//! ```
//!
//! Every case is written twice: `test_<name>.bin` holds the raw bytes and
//! `test_<name>.hex` the same bytes as a hex string for `framescan -x`.

use std::fs;
use std::path::PathBuf;

/// Deterministic generator so captures are reproducible between runs.
struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> u64 {
        const A: u64 = 6364136223846793005;
        const C: u64 = 1442695040888963407;
        self.0 = self.0.wrapping_mul(A).wrapping_add(C);
        self.0 >> 16
    }

    fn below(&mut self, bound: u64) -> u64 {
        self.next() % bound
    }

    fn coin(&mut self) -> bool {
        self.next() & 1 == 1
    }

    fn bytes(&mut self, len: usize) -> Vec<u8> {
        (0..len).map(|_| self.next().to_le_bytes()[0]).collect()
    }
}

fn declared_len(payload: &[u8]) -> u16 {
    u16::try_from(payload.len()).expect("payload fits a 2-byte length field")
}

fn frame(payload: &[u8]) -> Vec<u8> {
    frame_with_length(payload, declared_len(payload))
}

fn frame_with_length(payload: &[u8], declared: u16) -> Vec<u8> {
    let mut bytes = vec![0x7E];
    bytes.extend_from_slice(&declared.to_be_bytes());
    bytes.extend_from_slice(payload);
    bytes.push(0x7E);
    bytes
}

/// Frame whose length field is off by 1-5 bytes in either direction.
fn bad_length_frame(rng: &mut Lcg, payload: &[u8]) -> Vec<u8> {
    let len = declared_len(payload);
    let delta = rng.below(5) as u16 + 1;
    let declared = if rng.coin() {
        len.saturating_sub(delta)
    } else {
        len + delta
    };
    frame_with_length(payload, declared)
}

fn time_record(timestamp: u64) -> Vec<u8> {
    let mut bytes = vec![0xAA, 0xAA];
    bytes.extend_from_slice(&timestamp.to_be_bytes()[2..]);
    bytes
}

fn mixed_bad_frames(rng: &mut Lcg) -> Vec<u8> {
    let mut parts = Vec::new();
    for i in 0..5 {
        parts.push(frame(format!("Frame {i}: Test payload").as_bytes()));
    }
    for i in 0..3 {
        parts.push(bad_length_frame(rng, format!("Bad length frame {i}").as_bytes()));
    }
    for i in 0..2 {
        let payload = format!("Incomplete frame {i}");
        let mut incomplete = vec![0x7E];
        incomplete.extend_from_slice(&declared_len(payload.as_bytes()).to_be_bytes());
        incomplete.extend_from_slice(payload.as_bytes());
        parts.push(incomplete);
    }
    for i in 0..4 {
        parts.push(time_record(i * 1000));
    }
    let garbage_len = rng.below(10) as usize + 1;
    parts.push(rng.bytes(garbage_len));

    // Fisher-Yates
    for i in (1..parts.len()).rev() {
        let j = rng.below(i as u64 + 1) as usize;
        parts.swap(i, j);
    }
    parts.concat()
}

fn large_complex(rng: &mut Lcg) -> Vec<u8> {
    let mut parts = vec![rng.bytes(100)];

    for i in 0..15u64 {
        let mut payload = if rng.coin() {
            format!("Frame {i} with time marker inside").into_bytes()
        } else {
            format!("Frame {i} normal").into_bytes()
        };
        if payload.len() > 20 {
            let at = rng.below(payload.len() as u64 + 1) as usize;
            payload.splice(at..at, time_record(i * 1000));
        }

        if rng.coin() && i % 3 == 0 {
            parts.push(frame_with_length(&payload, 0xFFFF));
        } else {
            parts.push(frame(&payload));
        }

        if rng.coin() {
            let len = rng.below(20) as usize + 1;
            parts.push(rng.bytes(len));
        }
        if rng.coin() {
            parts.push(time_record(i * 500));
        }
    }

    parts.push(rng.bytes(50));
    parts.concat()
}

fn main() -> std::io::Result<()> {
    let dir = PathBuf::from(std::env::args().nth(1).unwrap_or_else(|| "testdata".into()));
    fs::create_dir_all(&dir)?;

    let mut rng = Lcg(0x5EED);
    let cases: Vec<(&str, Vec<u8>)> = vec![
        ("simple_valid", [frame(b"Hello"), frame(b"World")].concat()),
        (
            "with_time_frames",
            [
                frame(b"Frame1"),
                time_record(1000),
                frame(b"Frame2"),
                time_record(2000),
            ]
            .concat(),
        ),
        ("mixed_bad_frames", mixed_bad_frames(&mut rng)),
        (
            "incomplete_at_end",
            [frame(b"Complete"), vec![0x7E, 0x00, 0x05], b"start".to_vec()].concat(),
        ),
        ("large_frame", frame(&[b'X'; 1000])),
        ("zero_length_frame", frame(b"")),
        (
            "time_frame_series",
            (0..5).flat_map(|i| time_record(i * 1000)).collect(),
        ),
        ("garbage_only", rng.bytes(50)),
        ("empty_input", Vec::new()),
        ("unicode_payload", frame("测试".as_bytes())),
        (
            "multiple_time_frames_contiguous",
            (0..3).flat_map(|i| time_record(0x12_3456 + i)).collect(),
        ),
        ("time_frame_inside_frame", frame(b"Hello\xAA\xAAWorld")),
        ("large_complex", large_complex(&mut rng)),
    ];

    for (name, data) in &cases {
        let bin = dir.join(format!("test_{name}.bin"));
        fs::write(&bin, data)?;
        println!("Written {} bytes to {}", data.len(), bin.display());

        let hex_path = dir.join(format!("test_{name}.hex"));
        fs::write(&hex_path, hex::encode(data))?;
        println!("Written hex to {}", hex_path.display());
    }

    Ok(())
}
