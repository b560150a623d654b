use std::collections::BTreeMap;
use std::io::Write;

use bytes::Bytes;
use sha1::{Digest, Sha1};
use tempfile::NamedTempFile;

use super::*;
use crate::bencode::{decode, encode, BencodeError, DecodeOptions, Value};

const SINGLE_FILE: &[u8] = b"d8:announce26:http://tracker.example.com4:infod6:lengthi123456e4:name13:test_file.txt12:piece lengthi262144e6:pieces20:aaaaaaaaaaaaaaaaaaaaee";

fn dict(entries: Vec<(&str, Value)>) -> Value {
    Value::Dict(
        entries
            .into_iter()
            .map(|(k, v)| (Bytes::copy_from_slice(k.as_bytes()), v))
            .collect(),
    )
}

fn pieces(count: usize) -> Value {
    Value::Bytes(Bytes::from(vec![0xabu8; count * 20]))
}

fn single_file_info() -> Vec<(&'static str, Value)> {
    vec![
        ("name", Value::string("file.bin")),
        ("piece length", Value::Integer(16384)),
        ("pieces", pieces(2)),
        ("length", Value::Integer(20000)),
    ]
}

fn file_entry(length: i64, path: &[&str]) -> Value {
    dict(vec![
        ("length", Value::Integer(length)),
        (
            "path",
            Value::List(path.iter().map(|p| Value::string(p)).collect()),
        ),
    ])
}

fn torrent(info: Vec<(&str, Value)>, extra: Vec<(&str, Value)>) -> Vec<u8> {
    let mut root = vec![
        ("announce", Value::string("http://tracker.example.com/announce")),
        ("info", dict(info)),
    ];
    root.extend(extra);
    encode(&dict(root)).unwrap()
}

fn parse(info: Vec<(&str, Value)>, extra: Vec<(&str, Value)>) -> Result<Metainfo, MetainfoError> {
    Metainfo::from_bytes(&torrent(info, extra))
}

fn without(mut info: Vec<(&'static str, Value)>, key: &str) -> Vec<(&'static str, Value)> {
    info.retain(|(k, _)| *k != key);
    info
}

fn with(
    mut info: Vec<(&'static str, Value)>,
    key: &'static str,
    value: Value,
) -> Vec<(&'static str, Value)> {
    info.retain(|(k, _)| *k != key);
    info.push((key, value));
    info
}

#[test]
fn test_parse_single_file() {
    let metainfo = Metainfo::from_bytes(SINGLE_FILE).unwrap();

    assert_eq!(metainfo.announce, "http://tracker.example.com");
    assert_eq!(metainfo.info.name, "test_file.txt");
    assert_eq!(metainfo.info.piece_length, 262144);
    assert_eq!(
        metainfo.info.files,
        vec![File {
            length: 123456,
            path: vec!["test_file.txt".to_string()],
        }]
    );
    assert_eq!(metainfo.info.pieces, vec![[b'a'; 20]]);
    assert!(!metainfo.info.is_multi_file());
    assert_eq!(metainfo.info.total_length(), 123456);
    assert_eq!(metainfo.announce_list, None);
    assert_eq!(metainfo.creation_date, None);
    assert!(metainfo.diagnostics().is_empty());
}

#[test]
fn test_info_hash_matches_encoded_info() {
    let metainfo = Metainfo::from_bytes(SINGLE_FILE).unwrap();

    let root = decode(SINGLE_FILE).unwrap();
    let info_bytes = encode(root.get(b"info").unwrap()).unwrap();
    let expected: [u8; 20] = Sha1::digest(&info_bytes).into();

    assert_eq!(metainfo.info_hash.as_bytes(), &expected);
    assert_eq!(&metainfo.raw_info()[..], info_bytes.as_slice());
}

#[test]
fn test_trailing_bytes_after_root() {
    let mut data = SINGLE_FILE.to_vec();
    data.push(b'\n');

    let clean = Metainfo::from_bytes(SINGLE_FILE).unwrap();
    let metainfo = Metainfo::from_bytes(&data).unwrap();
    assert_eq!(metainfo.info_hash, clean.info_hash);
    assert_eq!(metainfo.info, clean.info);

    let strict = ParseOptions {
        decode: DecodeOptions::default(),
        ..ParseOptions::default()
    };
    assert!(matches!(
        Metainfo::from_bytes_with(&data, &strict),
        Err(MetainfoError::Bencode(BencodeError::TrailingData(141)))
    ));
}

#[test]
fn test_info_hash_covers_unknown_keys() {
    let plain = parse(single_file_info(), vec![]).unwrap();
    let extended = parse(
        with(single_file_info(), "source", Value::string("example")),
        vec![],
    )
    .unwrap();

    assert_eq!(plain.info, extended.info);
    assert_ne!(plain.info_hash, extended.info_hash);
}

#[test]
fn test_info_hash_ignores_input_key_order() {
    // Same info dictionary with keys out of order.
    let unsorted = b"d8:announce26:http://tracker.example.com4:infod4:name13:test_file.txt6:lengthi123456e6:pieces20:aaaaaaaaaaaaaaaaaaaa12:piece lengthi262144eee";
    let a = Metainfo::from_bytes(SINGLE_FILE).unwrap();
    let b = Metainfo::from_bytes(unsorted).unwrap();
    assert_eq!(a.info_hash, b.info_hash);
}

#[test]
fn test_info_hash_hex() {
    let hex = "0123456789abcdef0123456789abcdef01234567";
    let hash = InfoHash::from_hex(hex).unwrap();
    assert_eq!(hash.to_hex(), hex);
    assert_eq!(hash.to_string(), hex);
    assert_eq!(format!("{:?}", hash), format!("InfoHash({})", hex));

    assert!(matches!(
        InfoHash::from_hex("0123"),
        Err(MetainfoError::InvalidInfoHashLength(2))
    ));
    assert!(matches!(
        InfoHash::from_hex("zz"),
        Err(MetainfoError::InvalidInfoHashHex(_))
    ));
    assert!(matches!(
        InfoHash::from_hex(&"z".repeat(40)),
        Err(MetainfoError::InvalidInfoHashHex(
            hex::FromHexError::InvalidHexCharacter { c: 'z', index: 0 }
        ))
    ));
    assert!(matches!(
        InfoHash::from_hex("012"),
        Err(MetainfoError::InvalidInfoHashHex(hex::FromHexError::OddLength))
    ));
    assert!(InfoHash::from_bytes(&[0u8; 32]).is_err());
}

#[test]
fn test_parse_multi_file() {
    let info = vec![
        ("name", Value::string("album")),
        ("piece length", Value::Integer(32768)),
        ("pieces", pieces(3)),
        (
            "files",
            Value::List(vec![
                file_entry(100, &["cd1", "track01.flac"]),
                file_entry(0, &["cover.jpg"]),
            ]),
        ),
    ];
    let metainfo = parse(info, vec![]).unwrap();

    assert!(metainfo.info.is_multi_file());
    assert_eq!(metainfo.info.name, "album");
    assert_eq!(metainfo.info.files.len(), 2);
    assert_eq!(metainfo.info.files[0].path, vec!["cd1", "track01.flac"]);
    assert_eq!(metainfo.info.files[1].length, 0);
    assert_eq!(metainfo.info.total_length(), 100);
    assert_eq!(metainfo.info.piece_count(), 3);
    assert_eq!(metainfo.info.piece_hash(2), Some(&[0xab; 20]));
    assert_eq!(metainfo.info.piece_hash(3), None);
}

#[test]
fn test_files_take_precedence_over_length() {
    let info = with(
        single_file_info(),
        "files",
        Value::List(vec![file_entry(7, &["a.txt"])]),
    );
    let metainfo = parse(info, vec![]).unwrap();

    assert!(metainfo.info.is_multi_file());
    assert_eq!(
        metainfo.info.files,
        vec![File {
            length: 7,
            path: vec!["a.txt".to_string()],
        }]
    );
}

#[test]
fn test_multi_file_without_root_length() {
    let info = with(
        without(single_file_info(), "length"),
        "files",
        Value::List(vec![file_entry(1, &["x"])]),
    );
    assert!(parse(info, vec![]).is_ok());
}

#[test]
fn test_malformed_files_is_error() {
    let info = with(
        without(single_file_info(), "length"),
        "files",
        Value::List(vec![file_entry(1, &["ok"]), Value::Integer(5)]),
    );
    match parse(info, vec![]) {
        Err(MetainfoError::InvalidFile { index, reason }) => {
            assert_eq!(index, 1);
            assert_eq!(reason, "expected dictionary, got integer");
        }
        other => panic!("unexpected result: {:?}", other),
    }

    // Not a list at all; the root length must not be used as a fallback.
    let info = with(single_file_info(), "files", Value::string("nope"));
    assert!(matches!(
        parse(info, vec![]),
        Err(MetainfoError::WrongType { field: "files", .. })
    ));

    let info = with(single_file_info(), "files", Value::List(vec![]));
    assert!(matches!(
        parse(info, vec![]),
        Err(MetainfoError::EmptyFileList)
    ));
}

#[test]
fn test_file_entry_validation() {
    let cases = vec![
        (dict(vec![("path", Value::List(vec![Value::string("a")]))]), "missing length"),
        (file_entry(-1, &["a"]), "negative length -1"),
        (dict(vec![("length", Value::Integer(1))]), "missing path"),
        (file_entry(1, &[]), "empty path"),
        (file_entry(1, &["..", "etc"]), "path: path traversal component"),
        (
            dict(vec![
                ("length", Value::string("1")),
                ("path", Value::List(vec![Value::string("a")])),
            ]),
            "length: expected integer, got byte string",
        ),
        (
            dict(vec![
                ("length", Value::Integer(1)),
                ("path", Value::List(vec![Value::string("a"), Value::Integer(2)])),
            ]),
            "path: list element 1: expected byte string, got integer",
        ),
    ];

    for (entry, expected) in cases {
        let info = with(
            without(single_file_info(), "length"),
            "files",
            Value::List(vec![file_entry(1, &["first"]), entry]),
        );
        match parse(info, vec![]) {
            Err(MetainfoError::InvalidFile { index, reason }) => {
                assert_eq!(index, 1);
                assert_eq!(reason, expected);
            }
            other => panic!("expected {:?}, got {:?}", expected, other),
        }
    }
}

#[test]
fn test_single_file_requires_length() {
    assert!(matches!(
        parse(without(single_file_info(), "length"), vec![]),
        Err(MetainfoError::MissingField("length"))
    ));
    assert!(matches!(
        parse(with(single_file_info(), "length", Value::Integer(-5)), vec![]),
        Err(MetainfoError::InvalidLength(-5))
    ));
}

#[test]
fn test_pieces_length_not_multiple_of_20() {
    let info = with(
        single_file_info(),
        "pieces",
        Value::Bytes(Bytes::from(vec![0u8; 41])),
    );
    assert!(matches!(
        parse(info, vec![]),
        Err(MetainfoError::InvalidPiecesLength(41))
    ));
}

#[test]
fn test_pieces_binary_payload() {
    // Piece hashes are arbitrary bytes, not text.
    let raw: Vec<u8> = (0..40).map(|i| 0xd8u8.wrapping_add(i)).collect();
    let info = with(single_file_info(), "pieces", Value::Bytes(Bytes::from(raw.clone())));
    let metainfo = parse(info, vec![]).unwrap();

    assert_eq!(metainfo.info.pieces.len(), 2);
    assert_eq!(&metainfo.info.pieces[1][..], &raw[20..]);
}

#[test]
fn test_piece_length_must_be_positive() {
    for bad in [0, -1, -262144] {
        let info = with(single_file_info(), "piece length", Value::Integer(bad));
        match parse(info, vec![]) {
            Err(MetainfoError::InvalidPieceLength(n)) => assert_eq!(n, bad),
            other => panic!("unexpected result: {:?}", other),
        }
    }
}

#[test]
fn test_required_fields() {
    for key in ["name", "piece length", "pieces"] {
        match parse(without(single_file_info(), key), vec![]) {
            Err(MetainfoError::MissingField(field)) => assert_eq!(field, key),
            other => panic!("unexpected result for {}: {:?}", key, other),
        }
    }

    assert!(matches!(
        parse(with(single_file_info(), "name", Value::Integer(3)), vec![]),
        Err(MetainfoError::WrongType {
            field: "name",
            expected: "byte string",
            found: "integer",
        })
    ));
    assert!(matches!(
        parse(with(single_file_info(), "piece length", Value::string("big")), vec![]),
        Err(MetainfoError::WrongType {
            field: "piece length",
            ..
        })
    ));
}

#[test]
fn test_missing_announce() {
    let data = encode(&dict(vec![("info", dict(single_file_info()))])).unwrap();
    assert!(matches!(
        Metainfo::from_bytes(&data),
        Err(MetainfoError::MissingField("announce"))
    ));

    let data = encode(&dict(vec![
        ("announce", Value::Integer(1)),
        ("info", dict(single_file_info())),
    ]))
    .unwrap();
    assert!(matches!(
        Metainfo::from_bytes(&data),
        Err(MetainfoError::WrongType {
            field: "announce",
            ..
        })
    ));

    let data = encode(&dict(vec![
        ("announce", Value::Bytes(Bytes::from_static(b"\xff\xfe"))),
        ("info", dict(single_file_info())),
    ]))
    .unwrap();
    let metainfo = Metainfo::from_bytes(&data).unwrap();
    assert_eq!(metainfo.announce, "\u{FFFD}\u{FFFD}");
    assert_eq!(
        metainfo.diagnostics(),
        &[Diagnostic::LossyText { field: "announce" }]
    );
}

#[test]
fn test_missing_or_mistyped_info() {
    let data = encode(&dict(vec![("announce", Value::string("http://t"))])).unwrap();
    assert!(matches!(
        Metainfo::from_bytes(&data),
        Err(MetainfoError::MissingField("info"))
    ));

    let data = encode(&dict(vec![
        ("announce", Value::string("http://t")),
        ("info", Value::List(vec![])),
    ]))
    .unwrap();
    assert!(matches!(
        Metainfo::from_bytes(&data),
        Err(MetainfoError::WrongType {
            field: "info",
            expected: "dictionary",
            found: "list",
        })
    ));
}

#[test]
fn test_root_must_be_dictionary() {
    assert!(matches!(
        Metainfo::from_bytes(b"l4:spame"),
        Err(MetainfoError::NotADictionary("list"))
    ));
    assert!(matches!(
        Metainfo::from_bytes(b"d8:announce"),
        Err(MetainfoError::Bencode(_))
    ));
}

#[test]
fn test_name_is_normalized() {
    let info = with(single_file_info(), "name", Value::string("../../etc/passwd"));
    let metainfo = parse(info, vec![]).unwrap();
    assert_eq!(metainfo.info.name, "etc_passwd");
    assert_eq!(metainfo.info.files[0].path, vec!["etc_passwd"]);

    let info = with(single_file_info(), "name", Value::string("/./"));
    assert!(matches!(
        parse(info, vec![]),
        Err(MetainfoError::InvalidName(_))
    ));
}

#[test]
fn test_name_invalid_utf8_is_replaced() {
    let info = with(
        single_file_info(),
        "name",
        Value::Bytes(Bytes::from_static(b"caf\xe9.txt")),
    );
    let metainfo = parse(info, vec![]).unwrap();

    assert_eq!(metainfo.info.name, "caf\u{FFFD}.txt");
    assert_eq!(metainfo.info.files[0].path, vec!["caf\u{FFFD}.txt"]);
    assert_eq!(
        metainfo.diagnostics(),
        &[Diagnostic::LossyText { field: "name" }]
    );
    assert_eq!(
        metainfo.diagnostics()[0].to_string(),
        "name is not valid utf-8, replaced invalid bytes"
    );

    // The hash still covers the original bytes.
    let root = decode(&torrent(
        with(
            single_file_info(),
            "name",
            Value::Bytes(Bytes::from_static(b"caf\xe9.txt")),
        ),
        vec![],
    ))
    .unwrap();
    let info_bytes = encode(root.get(b"info").unwrap()).unwrap();
    assert_eq!(&metainfo.raw_info()[..], info_bytes.as_slice());
}

#[test]
fn test_private_flag_preserved() {
    let absent = parse(single_file_info(), vec![]).unwrap();
    let set = parse(with(single_file_info(), "private", Value::Integer(1)), vec![]).unwrap();
    let zero = parse(with(single_file_info(), "private", Value::Integer(0)), vec![]).unwrap();

    assert_eq!(absent.info.private, None);
    assert_eq!(set.info.private, Some(1));
    assert_eq!(zero.info.private, Some(0));
    assert!(set.is_private());
    assert!(!zero.is_private());
    assert!(!absent.is_private());
}

#[test]
fn test_private_wrong_type_is_soft() {
    let metainfo = parse(
        with(single_file_info(), "private", Value::string("yes")),
        vec![],
    )
    .unwrap();

    assert_eq!(metainfo.info.private, None);
    assert_eq!(
        metainfo.diagnostics(),
        &[Diagnostic::WrongType {
            field: "private",
            expected: "integer",
            found: "byte string",
        }]
    );
}

#[test]
fn test_optional_fields() {
    let metainfo = parse(
        single_file_info(),
        vec![
            ("creation date", Value::Integer(1_700_000_000)),
            ("comment", Value::string("a comment")),
            ("created by", Value::string("metabit")),
            ("encoding", Value::string("UTF-8")),
            (
                "announce-list",
                Value::List(vec![
                    Value::List(vec![Value::string("http://a"), Value::string("http://b")]),
                    Value::List(vec![Value::string("udp://c")]),
                ]),
            ),
        ],
    )
    .unwrap();

    assert_eq!(metainfo.creation_date, Some(1_700_000_000));
    assert_eq!(metainfo.comment.as_deref(), Some("a comment"));
    assert_eq!(metainfo.created_by.as_deref(), Some("metabit"));
    assert_eq!(metainfo.encoding.as_deref(), Some("UTF-8"));
    assert_eq!(
        metainfo.announce_list,
        Some(vec![
            vec!["http://a".to_string(), "http://b".to_string()],
            vec!["udp://c".to_string()],
        ])
    );
    assert!(metainfo.diagnostics().is_empty());
}

#[test]
fn test_optional_fields_wrong_type_do_not_abort() {
    let metainfo = parse(
        single_file_info(),
        vec![
            ("creation date", Value::string("yesterday")),
            ("comment", Value::Integer(5)),
            ("created by", Value::Bytes(Bytes::from_static(b"\xff"))),
            ("encoding", Value::List(vec![])),
            ("announce-list", Value::string("http://a")),
        ],
    )
    .unwrap();

    assert_eq!(metainfo.creation_date, None);
    assert_eq!(metainfo.comment, None);
    assert_eq!(metainfo.created_by, None);
    assert_eq!(metainfo.encoding, None);
    assert_eq!(metainfo.announce_list, None);

    let fields: Vec<&str> = metainfo.diagnostics().iter().map(|d| d.field()).collect();
    assert_eq!(
        fields,
        vec!["announce-list", "creation date", "comment", "created by", "encoding"]
    );
    assert_eq!(
        metainfo.diagnostics()[3],
        Diagnostic::InvalidText {
            field: "created by"
        }
    );
}

#[test]
fn test_announce_list_best_effort() {
    let metainfo = parse(
        single_file_info(),
        vec![(
            "announce-list",
            Value::List(vec![
                Value::List(vec![Value::string("http://a"), Value::Integer(1)]),
                Value::string("http://not-a-tier"),
                Value::List(vec![]),
                Value::List(vec![Value::string("http://b")]),
            ]),
        )],
    )
    .unwrap();

    assert_eq!(
        metainfo.announce_list,
        Some(vec![vec!["http://a".to_string()], vec!["http://b".to_string()]])
    );
    assert_eq!(
        metainfo.diagnostics(),
        &[
            Diagnostic::SkippedTracker { tier: 0, index: 1 },
            Diagnostic::SkippedTier {
                tier: 1,
                found: "byte string",
            },
            Diagnostic::EmptyTier { tier: 2 },
        ]
    );
    assert_eq!(
        metainfo.diagnostics()[1].to_string(),
        "skipping announce-list tier 1: expected list, got byte string"
    );
}

#[test]
fn test_trackers_deduplicated() {
    let metainfo = parse(
        single_file_info(),
        vec![(
            "announce-list",
            Value::List(vec![
                Value::List(vec![
                    Value::string("http://tracker.example.com/announce"),
                    Value::string("http://backup"),
                ]),
                Value::List(vec![Value::string("http://backup")]),
            ]),
        )],
    )
    .unwrap();

    assert_eq!(
        metainfo.trackers(),
        vec!["http://tracker.example.com/announce", "http://backup"]
    );
}

#[test]
fn test_decode_limits_apply() {
    let options = ParseOptions {
        decode: DecodeOptions {
            max_byte_string_length: 10,
            ..DecodeOptions::default()
        },
        ..ParseOptions::default()
    };
    assert!(matches!(
        Metainfo::from_bytes_with(SINGLE_FILE, &options),
        Err(MetainfoError::Bencode(_))
    ));
}

#[test]
fn test_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(SINGLE_FILE).unwrap();
    file.flush().unwrap();

    let from_file = Metainfo::from_file(file.path()).unwrap();
    let from_bytes = Metainfo::from_bytes(SINGLE_FILE).unwrap();

    assert_eq!(from_file.info, from_bytes.info);
    assert_eq!(from_file.info_hash, from_bytes.info_hash);
}

#[test]
fn test_from_file_missing_reports_clean_path() {
    let dir = tempfile::tempdir().unwrap();
    let messy = dir.path().join("sub").join("..").join("missing.torrent");

    match Metainfo::from_file(&messy) {
        Err(MetainfoError::Io { path, source }) => {
            assert_eq!(path, dir.path().join("missing.torrent"));
            assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn test_from_file_too_large() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(SINGLE_FILE).unwrap();
    file.flush().unwrap();

    let options = ParseOptions {
        max_file_size: 64,
        ..ParseOptions::default()
    };
    match Metainfo::from_file_with(file.path(), &options) {
        Err(MetainfoError::FileTooLarge { size, max, .. }) => {
            assert_eq!(size, SINGLE_FILE.len() as u64);
            assert_eq!(max, 64);
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn test_raw_info_roundtrips() {
    let mut info = BTreeMap::new();
    info.insert(Bytes::from_static(b"name"), Value::string("x"));
    info.insert(Bytes::from_static(b"piece length"), Value::Integer(1));
    info.insert(Bytes::from_static(b"pieces"), pieces(1));
    info.insert(Bytes::from_static(b"length"), Value::Integer(1));
    let info = Value::Dict(info);

    let data = encode(&dict(vec![
        ("announce", Value::string("http://t")),
        ("info", info.clone()),
    ]))
    .unwrap();
    let metainfo = Metainfo::from_bytes(&data).unwrap();

    assert_eq!(decode(metainfo.raw_info()).unwrap(), info);
    assert_eq!(
        metainfo.info_hash,
        InfoHash::from_info_bytes(&encode(&info).unwrap())
    );
}
