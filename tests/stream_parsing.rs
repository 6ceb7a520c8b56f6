use std::io::Write;

use framescan::{
    ChunkSource, FrameFormat, FrameParser, FrameStream, OutputFormat, ReadSource, Record,
    RecordKind, RecordRenderer, decode_hex_input,
};

fn frame(payload: &[u8]) -> Vec<u8> {
    frame_with_length(payload, u16::try_from(payload.len()).unwrap())
}

fn frame_with_length(payload: &[u8], declared: u16) -> Vec<u8> {
    let mut bytes = vec![0x7E];
    bytes.extend_from_slice(&declared.to_be_bytes());
    bytes.extend_from_slice(payload);
    bytes.push(0x7E);
    bytes
}

fn time_record(timestamp: u64) -> Vec<u8> {
    let mut bytes = vec![0xAA, 0xAA];
    bytes.extend_from_slice(&timestamp.to_be_bytes()[2..]);
    bytes
}

fn parse(capture: &[u8]) -> (Vec<Record>, FrameStream<ChunkSource>) {
    let mut stream = FrameStream::new(
        ChunkSource::from_bytes(capture.to_vec()),
        FrameParser::default(),
    );
    let records = stream.by_ref().map(Result::unwrap).collect();
    (records, stream)
}

fn kinds(records: &[Record]) -> Vec<RecordKind> {
    records.iter().map(Record::kind).collect()
}

#[test]
fn simple_valid_frames() {
    let capture = [frame(b"Hello"), frame(b"World")].concat();
    let (records, stream) = parse(&capture);

    assert_eq!(kinds(&records), [RecordKind::Frame, RecordKind::Frame]);
    assert_eq!(records[0].bytes().as_ref(), frame(b"Hello").as_slice());
    assert_eq!(records[1].bytes().as_ref(), frame(b"World").as_slice());
    assert_eq!(stream.stats().frames_found, 2);
    assert_eq!(stream.stats().bytes_processed, capture.len() as u64);
}

#[test]
fn frames_interleaved_with_time_records() {
    let capture = [
        frame(b"Frame1"),
        time_record(1000),
        frame(b"Frame2"),
        time_record(2000),
    ]
    .concat();
    let (records, stream) = parse(&capture);
    let format = FrameFormat::default();

    assert_eq!(
        kinds(&records),
        [
            RecordKind::Frame,
            RecordKind::Time,
            RecordKind::Frame,
            RecordKind::Time
        ]
    );
    assert_eq!(records[1].timestamp(&format), Some(1000));
    assert_eq!(records[3].timestamp(&format), Some(2000));
    assert_eq!(stream.stats().time_frames_found, 2);
}

#[test]
fn incomplete_frame_at_end_is_dropped() {
    let mut capture = frame(b"Complete");
    capture.extend_from_slice(&[0x7E, 0x00, 0x05]);
    capture.extend_from_slice(b"start");
    let (records, stream) = parse(&capture);

    assert_eq!(kinds(&records), [RecordKind::Frame]);
    assert_eq!(stream.discarded_at_end(), 8);
    assert_eq!(stream.stats().invalid_frames, 0);
}

#[test]
fn bad_length_fields_are_recovered() {
    let capture = [
        frame_with_length(b"Bad length frame 0", 15),
        frame(b"good"),
        frame_with_length(b"Bad length frame 1", 22),
        frame(b"tail"),
    ]
    .concat();
    let (records, stream) = parse(&capture);

    // The oversized frame cuts at its own end marker once the buffer holds it.
    assert_eq!(
        kinds(&records),
        [
            RecordKind::Recovered,
            RecordKind::Frame,
            RecordKind::Recovered,
            RecordKind::Frame
        ]
    );
    assert_eq!(records[0].len(), 18 + 4);
    assert_eq!(records[2].len(), 18 + 4);
    assert_eq!(stream.stats().invalid_frames, 2);
    assert_eq!(stream.stats().frames_found, 2);
}

#[test]
fn ffff_length_with_immediate_end_marker() {
    let capture = [0x7E, 0xFF, 0xFF, 0x41, 0x42, 0x7E];
    let (records, stream) = parse(&capture);

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].kind(), RecordKind::Recovered);
    assert_eq!(records[0].bytes().as_ref(), capture);
    assert_eq!(stream.stats().invalid_frames, 1);
}

#[test]
fn large_and_zero_length_frames() {
    let big = frame(&[b'X'; 1000]);
    let capture = [big.clone(), frame(b"")].concat();
    let (records, _) = parse(&capture);

    assert_eq!(kinds(&records), [RecordKind::Frame, RecordKind::Frame]);
    assert_eq!(records[0].len(), big.len());
    assert_eq!(records[1].len(), 4);
}

#[test]
fn contiguous_time_records() {
    let capture: Vec<u8> = (0..3).flat_map(|i| time_record(0x12_3456 + i)).collect();
    let (records, stream) = parse(&capture);
    let format = FrameFormat::default();

    let timestamps: Vec<_> = records.iter().map(|r| r.timestamp(&format)).collect();
    assert_eq!(timestamps, [Some(0x12_3456), Some(0x12_3457), Some(0x12_3458)]);
    assert_eq!(stream.stats().time_frames_found, 3);
}

#[test]
fn time_marker_inside_frame_payload_stays_in_frame() {
    let capture = frame(b"Hello\xAA\xAAWorld");
    let (records, stream) = parse(&capture);

    assert_eq!(kinds(&records), [RecordKind::Frame]);
    assert_eq!(stream.stats().time_frames_found, 0);
}

#[test]
fn unicode_payload() {
    let capture = frame("测试".as_bytes());
    let (records, _) = parse(&capture);
    assert_eq!(records.len(), 1);
    assert_eq!(&records[0].bytes()[3..9], "测试".as_bytes());
}

#[test]
fn garbage_only_and_empty_input() {
    let garbage: Vec<u8> = (0u8..50).map(|i| i.wrapping_mul(37) | 0x01).filter(|b| *b != 0x7E && *b != 0xAA).collect();
    let (records, stream) = parse(&garbage);
    assert!(records.is_empty());
    assert_eq!(stream.stats().bytes_processed, garbage.len() as u64);

    let (records, stream) = parse(&[]);
    assert!(records.is_empty());
    assert_eq!(stream.stats().records(), 0);
}

#[test]
fn garbage_between_and_around_records() {
    let capture = [
        vec![0x01, 0x02, 0x03, 0x04],
        frame(b"Frame 0 normal"),
        vec![0x11, 0x22],
        time_record(500),
        frame(b"Frame 1 normal"),
        vec![0x33; 9],
    ]
    .concat();
    let (records, stream) = parse(&capture);

    assert_eq!(
        kinds(&records),
        [RecordKind::Frame, RecordKind::Time, RecordKind::Frame]
    );
    assert_eq!(stream.discarded_at_end(), 0);
}

#[test]
fn chunk_size_does_not_change_records() {
    let capture = [
        vec![0x42; 3],
        frame(b"first"),
        time_record(7),
        frame(&[0xAA; 12]),
        time_record(0xAAAA),
        frame(b"last"),
    ]
    .concat();
    let (expected, _) = parse(&capture);
    assert_eq!(expected.len(), 5);

    for chunk_size in [1, 2, 3, 5, 8, 13, 4096] {
        let stream = FrameStream::new(
            ChunkSource::from_bytes(capture.clone()),
            FrameParser::default(),
        )
        .with_chunk_size(chunk_size);
        let records: Vec<_> = stream.map(Result::unwrap).collect();
        assert_eq!(records, expected, "chunk size {chunk_size}");
    }
}

#[test]
fn reads_capture_from_file() {
    let capture = [frame(b"on disk"), time_record(42)].concat();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(&capture).unwrap();

    let reader = std::fs::File::open(file.path()).unwrap();
    let stream = FrameStream::new(ReadSource::new(reader), FrameParser::default());
    let records: Vec<_> = stream.map(Result::unwrap).collect();

    assert_eq!(kinds(&records), [RecordKind::Frame, RecordKind::Time]);
}

#[test]
fn hex_input_through_json_rendering() {
    let bytes = decode_hex_input("0x7e:00:05:48:65:6c:6c:6f:7e aaaa000000000001").unwrap();
    let format = FrameFormat::default();
    let renderer = RecordRenderer::new(OutputFormat::Json, format.clone()).with_parse_time(true);
    let stream = FrameStream::new(ChunkSource::from_bytes(bytes), FrameParser::new(format));

    let mut out = Vec::new();
    for record in stream {
        renderer.write_record(&mut out, &record.unwrap()).unwrap();
    }

    assert_eq!(
        String::from_utf8(out).unwrap(),
        concat!(
            "{\"type\": \"frame\", \"hex\": \"7e000548656c6c6f7e\", \"length\": 9}\n",
            "{\"type\": \"time_frame\", \"hex\": \"aaaa000000000001\", \"length\": 8, \"timestamp\": 1}\n",
        )
    );
}

#[test]
fn custom_format_with_multibyte_markers() {
    let format = FrameFormat::builder()
        .frame_start(vec![0xC0, 0xDE])
        .frame_end(vec![0xED, 0x0C])
        .length_field_offset(2)
        .length_field_size(1)
        .time_marker(vec![0x54, 0x4D])
        .time_record_length(6)
        .build()
        .unwrap();

    let capture = [
        vec![0x00, 0xC0],
        vec![0xC0, 0xDE, 0x03, b'a', b'b', b'c', 0xED, 0x0C],
        vec![0x54, 0x4D, 0x00, 0x00, 0x01, 0x00],
    ]
    .concat();

    let stream = FrameStream::new(ChunkSource::from_bytes(capture), FrameParser::new(format.clone()))
        .with_chunk_size(1);
    let records: Vec<_> = stream.map(Result::unwrap).collect();

    assert_eq!(kinds(&records), [RecordKind::Frame, RecordKind::Time]);
    assert_eq!(records[0].len(), 8);
    assert_eq!(records[1].timestamp(&format), Some(0x100));
}
