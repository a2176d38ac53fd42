//! Decoding of the embedded reference blobs.
//!
//! `entropy.txt` is a sequence of `<u32 little-endian length><length bytes of
//! gzipped JSON>` records; the word lists are plain gzipped text, one word
//! per line.

use flate2::read::GzDecoder;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::Deserialize;
use std::io::{BufRead, BufReader, Read};

use super::entropy_set::{CharStats, EntropyStats};
use crate::error::Error;

#[derive(Deserialize)]
struct EntropyRecord {
    #[serde(rename = "Key")]
    key: CharStats,
    #[serde(rename = "Val")]
    val: EntropyStats,
}

pub(super) fn split_length_prefixed(mut data: &[u8]) -> Result<Vec<&[u8]>, Error> {
    let mut records = Vec::new();
    while !data.is_empty() {
        if data.len() < 4 {
            return Err(Error::ResourceInit(
                "truncated length prefix in entropy data".to_owned(),
            ));
        }
        let len = u32::from_le_bytes([data[0], data[1], data[2], data[3]]) as usize;
        data = &data[4..];
        if data.len() < len {
            return Err(Error::ResourceInit(format!(
                "entropy record claims {len} bytes but only {} remain",
                data.len()
            )));
        }
        records.push(&data[..len]);
        data = &data[len..];
    }
    Ok(records)
}

pub(super) fn gunzip(data: &[u8]) -> Result<Vec<u8>, Error> {
    let mut out = Vec::new();
    GzDecoder::new(data)
        .read_to_end(&mut out)
        .map_err(|e| Error::ResourceInit(format!("gzip decompression failed: {e}")))?;
    Ok(out)
}

pub(super) fn parse_entropy_table(json: &[u8]) -> Result<FxHashMap<CharStats, EntropyStats>, Error> {
    let records: Vec<EntropyRecord> = serde_json::from_slice(json)
        .map_err(|e| Error::ResourceInit(format!("entropy table JSON is invalid: {e}")))?;
    Ok(records.into_iter().map(|r| (r.key, r.val)).collect())
}

pub(super) fn load_word_set(gz: &[u8]) -> Result<FxHashSet<String>, Error> {
    let reader = BufReader::new(GzDecoder::new(gz));
    let mut set = FxHashSet::default();
    for line in reader.lines() {
        let line = line.map_err(|e| Error::ResourceInit(format!("word list unreadable: {e}")))?;
        let word = line.trim();
        if !word.is_empty() {
            set.insert(word.to_owned());
        }
    }
    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    fn gz(data: &[u8]) -> Vec<u8> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data).unwrap();
        encoder.finish().unwrap()
    }

    fn with_prefix(records: &[&[u8]]) -> Vec<u8> {
        let mut out = Vec::new();
        for record in records {
            out.extend_from_slice(&u32::try_from(record.len()).unwrap().to_le_bytes());
            out.extend_from_slice(record);
        }
        out
    }

    #[test]
    fn test_split_length_prefixed_roundtrip() {
        let blob = with_prefix(&[b"alpha", b"", b"gamma"]);
        let records = split_length_prefixed(&blob).unwrap();
        assert_eq!(records, vec![b"alpha".as_slice(), b"".as_slice(), b"gamma".as_slice()]);
    }

    #[test]
    fn test_split_rejects_truncated_prefix() {
        assert!(matches!(
            split_length_prefixed(&[1, 0]),
            Err(Error::ResourceInit(_))
        ));
    }

    #[test]
    fn test_split_rejects_short_record() {
        let mut blob = 10u32.to_le_bytes().to_vec();
        blob.extend_from_slice(b"only4");
        assert!(matches!(split_length_prefixed(&blob), Err(Error::ResourceInit(_))));
    }

    #[test]
    fn test_gunzip_roundtrip() {
        assert_eq!(gunzip(&gz(b"reference data")).unwrap(), b"reference data");
        assert!(matches!(gunzip(b"not gzip"), Err(Error::ResourceInit(_))));
    }

    #[test]
    fn test_parse_entropy_table() {
        let json = br#"[{"Key":{"Lowers":4,"Uppers":4,"Digits":4,"Symbols":3},
                         "Val":{"Avg":1.0,"Dev":0.02,"Min":0.9,"Max":1.05}}]"#;
        let table = parse_entropy_table(json).unwrap();
        let key = CharStats { lowers: 4, uppers: 4, digits: 4, symbols: 3 };
        let stats = table.get(&key).unwrap();
        assert!((stats.avg - 1.0).abs() < f64::EPSILON);
        assert!((stats.dev - 0.02).abs() < f64::EPSILON);
    }

    #[test]
    fn test_parse_rejects_bad_json() {
        assert!(matches!(parse_entropy_table(b"{"), Err(Error::ResourceInit(_))));
    }

    #[test]
    fn test_load_word_set_skips_blank_lines() {
        let set = load_word_set(&gz(b"password\n\nhello\n")).unwrap();
        assert_eq!(set.len(), 2);
        assert!(set.contains("password"));
        assert!(set.contains("hello"));
    }
}
