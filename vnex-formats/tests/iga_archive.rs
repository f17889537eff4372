//! End-to-end extraction from a hand-built IGA archive.

use vnex_core::decode::ArchiveDecoder;
use vnex_core::error::VnexError;
use vnex_core::stream::MemoryStream;
use vnex_formats::IgaDecoder;

/// Packed-integer encoder: 7-bit big-endian groups, each shifted left one
/// bit, low bit set on the final byte.
fn push_packed(out: &mut Vec<u8>, value: u32) {
    let mut groups = Vec::new();
    let mut v = value;
    loop {
        groups.push((v & 0x7F) as u8);
        v >>= 7;
        if v == 0 {
            break;
        }
    }
    groups.reverse();
    let last = groups.len() - 1;
    for (i, g) in groups.into_iter().enumerate() {
        out.push((g << 1) | u8::from(i == last));
    }
}

fn obfuscate(plain: &[u8]) -> Vec<u8> {
    plain
        .iter()
        .enumerate()
        .map(|(i, &b)| b ^ ((i + 2) & 0xFF) as u8)
        .collect()
}

/// Two entries: "abc.txt" -> b"123" and "dir/another.txt" -> 16 x b'A'.
fn build_archive() -> Vec<u8> {
    let names: [&[u8]; 2] = [b"abc.txt", b"dir/another.txt"];
    let payloads: [&[u8]; 2] = [b"123", &[b'A'; 16]];

    let mut table = Vec::new();
    let mut name_offset = 0u32;
    let mut data_offset = 0u32;
    for (name, payload) in names.iter().zip(&payloads) {
        push_packed(&mut table, name_offset);
        push_packed(&mut table, data_offset);
        push_packed(&mut table, payload.len() as u32);
        name_offset += name.len() as u32;
        data_offset += payload.len() as u32;
    }

    let mut name_region = Vec::new();
    for name in names {
        for &b in name {
            push_packed(&mut name_region, b as u32);
        }
    }

    let mut out = Vec::new();
    out.extend_from_slice(b"IGA0");
    out.extend_from_slice(&[0u8; 12]);
    push_packed(&mut out, table.len() as u32);
    out.extend_from_slice(&table);
    push_packed(&mut out, name_region.len() as u32);
    out.extend_from_slice(&name_region);
    for payload in payloads {
        out.extend_from_slice(&obfuscate(payload));
    }
    out
}

#[test]
fn test_recognition() {
    let data = build_archive();
    let decoder = IgaDecoder::new();
    assert!(decoder.is_recognized(&mut MemoryStream::new(&data)));
    assert!(!decoder.is_recognized(&mut MemoryStream::new(b"GXT\x00....")));
    assert!(!decoder.is_recognized(&mut MemoryStream::new(b"IG")));
}

#[test]
fn test_read_meta() {
    let data = build_archive();
    let mut stream = MemoryStream::new(&data);
    let meta = IgaDecoder::new().read_meta(&mut stream).unwrap();

    assert_eq!(meta.len(), 2);
    let first = &meta.entries()[0];
    assert_eq!(first.name, "abc.txt");
    assert_eq!(first.size, 3);
    let second = &meta.entries()[1];
    assert_eq!(second.name, "dir/another.txt");
    assert_eq!(second.size, 16);
    // The payload region is anchored to the end of the file.
    assert_eq!(second.offset + second.size, data.len() as u64);
}

#[test]
fn test_extract_all() {
    let data = build_archive();
    let decoder = IgaDecoder::new();
    let mut stream = MemoryStream::new(&data);
    let meta = decoder.read_meta(&mut stream).unwrap();

    let abc = decoder
        .read_file(&mut stream, &meta, meta.get("abc.txt").unwrap())
        .unwrap();
    assert_eq!(abc.data, b"123");

    let another = decoder
        .read_file(&mut stream, &meta, meta.get("dir/another.txt").unwrap())
        .unwrap();
    assert_eq!(another.data, vec![b'A'; 16]);
}

#[test]
fn test_extraction_is_idempotent_and_order_independent() {
    let data = build_archive();
    let decoder = IgaDecoder::new();
    let mut stream = MemoryStream::new(&data);
    let meta = decoder.read_meta(&mut stream).unwrap();

    // Last entry first, then the first one twice.
    let second = meta.get("dir/another.txt").unwrap();
    let first = meta.get("abc.txt").unwrap();
    assert_eq!(
        decoder.read_file(&mut stream, &meta, second).unwrap().data,
        vec![b'A'; 16]
    );
    let a = decoder.read_file(&mut stream, &meta, first).unwrap();
    let b = decoder.read_file(&mut stream, &meta, first).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.data, b"123");
}

#[test]
fn test_empty_table() {
    let mut data = Vec::new();
    data.extend_from_slice(b"IGA0");
    data.extend_from_slice(&[0u8; 12]);
    push_packed(&mut data, 0);

    let mut stream = MemoryStream::new(&data);
    let meta = IgaDecoder::new().read_meta(&mut stream).unwrap();
    assert!(meta.is_empty());
}

#[test]
fn test_bad_magic() {
    let mut data = build_archive();
    data[0] = b'X';
    let mut stream = MemoryStream::new(&data);
    assert!(matches!(
        IgaDecoder::new().read_meta(&mut stream).unwrap_err(),
        VnexError::InvalidMagic { .. }
    ));
}

#[test]
fn test_table_overrunning_its_declared_size() {
    // Declared table length of 2 bytes, but the first triple needs 3.
    let mut data = Vec::new();
    data.extend_from_slice(b"IGA0");
    data.extend_from_slice(&[0u8; 12]);
    push_packed(&mut data, 2);
    data.extend_from_slice(&[0x01, 0x01, 0x01]);

    let mut stream = MemoryStream::new(&data);
    assert!(matches!(
        IgaDecoder::new().read_meta(&mut stream).unwrap_err(),
        VnexError::CorruptData { .. }
    ));
}

#[test]
fn test_payload_region_larger_than_file() {
    // One entry claiming 100 payload bytes in a file with none.
    let mut data = Vec::new();
    data.extend_from_slice(b"IGA0");
    data.extend_from_slice(&[0u8; 12]);
    push_packed(&mut data, 3);
    for value in [0, 0, 100] {
        push_packed(&mut data, value);
    }

    let mut stream = MemoryStream::new(&data);
    assert!(matches!(
        IgaDecoder::new().read_meta(&mut stream).unwrap_err(),
        VnexError::CorruptData { .. }
    ));
}
