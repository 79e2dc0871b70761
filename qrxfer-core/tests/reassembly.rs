//! End-to-end reassembly scenarios over the public API: records in, a
//! digest-verified file out.

use qrxfer_core::codec;
use qrxfer_core::error::XferError;
use qrxfer_core::hash::sha3;
use qrxfer_core::{IngestOutcome, ReconstructionSession};
use serde_json::json;

/// Produce wire records for `bytes` the way a conforming producer does:
/// fragment 0 carries the metadata, 1..=N carry the payload blocks.
fn make_records(bytes: &[u8], block_size: usize, password: Option<&str>) -> Vec<String> {
    let blocks: Vec<&[u8]> = bytes.chunks(block_size).collect();
    let total = blocks.len() as u32;

    let meta = json!({
        "file_name": "a.txt",
        "total_blocks": total,
        "hash": sha3::digest_hex(bytes),
    });

    let mut records = vec![
        json!({
            "index": 0,
            "total": total,
            "data": codec::encode_payload(meta.to_string().as_bytes(), password, 3).unwrap(),
        })
        .to_string(),
    ];
    for (i, block) in blocks.iter().enumerate() {
        records.push(
            json!({
                "index": i as u32 + 1,
                "total": total,
                "data": codec::encode_payload(block, password, 3).unwrap(),
            })
            .to_string(),
        );
    }
    records
}

fn ingest_all(session: &mut ReconstructionSession, records: &[String]) {
    for record in records {
        session.ingest(record);
    }
}

#[test]
fn end_to_end_plain() {
    let mut session = ReconstructionSession::new();
    ingest_all(&mut session, &make_records(b"hello world", 6, None));

    let file = session.reconstruct().unwrap();
    assert_eq!(file.file_name, "a.txt");
    assert_eq!(file.bytes, b"hello world");

    // A completed session cannot be replayed.
    assert!(session.store().is_empty());
    assert!(session.metadata().is_none());
}

#[test]
fn end_to_end_encrypted() {
    let data: Vec<u8> = (0u8..=255).cycle().take(10_000).collect();
    let mut session = ReconstructionSession::new();
    ingest_all(&mut session, &make_records(&data, 1024, Some("correct horse")));
    session.set_password(Some("correct horse".into()));

    let file = session.reconstruct().unwrap();
    assert_eq!(file.bytes, data);
}

#[test]
fn out_of_order_arrival_is_fine() {
    let mut records = make_records(b"the blocks arrive shuffled", 5, None);
    records.reverse();
    let mut session = ReconstructionSession::new();
    ingest_all(&mut session, &records);

    assert_eq!(session.reconstruct().unwrap().bytes, b"the blocks arrive shuffled");
}

#[test]
fn duplicate_scans_do_not_grow_the_store() {
    let records = make_records(b"scanned twice", 4, None);
    let mut session = ReconstructionSession::new();
    ingest_all(&mut session, &records);
    let size = session.store().len();

    for record in &records {
        assert!(matches!(session.ingest(record), IngestOutcome::Duplicate { .. }));
    }
    assert_eq!(session.store().len(), size);
    assert_eq!(session.reconstruct().unwrap().bytes, b"scanned twice");
}

#[test]
fn missing_block_names_the_first_gap() {
    let records = make_records(b"123456789", 3, None); // blocks 1, 2, 3
    let mut session = ReconstructionSession::new();
    session.ingest(&records[0]);
    session.ingest(&records[1]);
    session.ingest(&records[3]);

    match session.reconstruct() {
        Err(XferError::MissingBlock(2)) => {}
        other => panic!("expected MissingBlock(2), got {other:?}"),
    }

    // Scan the gap and retry: collected fragments survived the failure.
    session.ingest(&records[2]);
    assert_eq!(session.reconstruct().unwrap().bytes, b"123456789");
}

#[test]
fn swapped_blocks_fail_the_digest() {
    let records = make_records(b"abcdefghijkl", 3, None); // blocks 1..=4
    let swap = |text: &str, index: u32| {
        let mut v: serde_json::Value = serde_json::from_str(text).unwrap();
        v["index"] = json!(index);
        v.to_string()
    };

    let mut session = ReconstructionSession::new();
    session.ingest(&records[0]);
    session.ingest(&swap(&records[1], 3)); // block 1 payload under index 3
    session.ingest(&records[2]);
    session.ingest(&swap(&records[3], 1)); // block 3 payload under index 1
    session.ingest(&records[4]);

    match session.reconstruct() {
        Err(XferError::Integrity { .. }) => {}
        other => panic!("expected Integrity, got {other:?}"),
    }
}

#[test]
fn forged_digest_fails_verification() {
    let mut records = make_records(b"hello world", 6, None);
    let meta = json!({
        "file_name": "a.txt",
        "total_blocks": 2,
        "hash": sha3::digest_hex(b"something else entirely"),
    });
    records[0] = json!({
        "index": 0,
        "total": 2,
        "data": codec::encode_payload(meta.to_string().as_bytes(), None, 3).unwrap(),
    })
    .to_string();

    let mut session = ReconstructionSession::new();
    ingest_all(&mut session, &records);
    match session.reconstruct() {
        Err(XferError::Integrity { expected, actual }) => {
            assert_eq!(expected, sha3::digest_hex(b"something else entirely"));
            assert_eq!(actual, sha3::digest_hex(b"hello world"));
        }
        other => panic!("expected Integrity, got {other:?}"),
    }
}

#[test]
fn wrong_password_clears_it_for_reprompt() {
    let records = make_records(b"secret payload", 7, Some("right"));
    let mut session = ReconstructionSession::new();
    ingest_all(&mut session, &records);

    session.set_password(Some("wrong".into()));
    assert!(session.reconstruct().unwrap_err().is_authentication());
    assert!(!session.has_password());

    session.set_password(Some("right".into()));
    assert_eq!(session.reconstruct().unwrap().bytes, b"secret payload");
}

#[test]
fn tampered_block_never_reconstructs() {
    use base64::Engine as _;
    let b64 = &base64::engine::general_purpose::STANDARD;

    let records = make_records(b"tamper detection sample data", 8, Some("pw"));
    let mut session = ReconstructionSession::new();

    // Flip one byte inside block 2's ciphertext.
    let mut v: serde_json::Value = serde_json::from_str(&records[2]).unwrap();
    let mut raw = b64.decode(v["data"].as_str().unwrap()).unwrap();
    let last = raw.len() - 1;
    raw[last] ^= 0x40;
    v["data"] = json!(b64.encode(&raw));

    session.ingest(&records[0]);
    session.ingest(&records[1]);
    session.ingest(&v.to_string());
    session.ingest(&records[3]);
    session.ingest(&records[4]);
    session.set_password(Some("pw".into()));

    let err = session.reconstruct().unwrap_err();
    match &err {
        XferError::Block { index: 2, source } => {
            assert!(matches!(source.as_ref(), XferError::Authentication));
        }
        other => panic!("expected Block {{ index: 2 }}, got {other:?}"),
    }
}

#[test]
fn total_falls_back_to_per_fragment_hint() {
    let data = b"metadata without a count";
    let blocks: Vec<&[u8]> = data.chunks(9).collect();
    let total = blocks.len() as u32;

    // Producer variant that omits total_blocks from the metadata payload.
    let meta = json!({ "file_name": "a.txt", "hash": sha3::digest_hex(data) });
    let mut session = ReconstructionSession::new();
    session.ingest(
        &json!({
            "index": 0,
            "total": total,
            "data": codec::encode_payload(meta.to_string().as_bytes(), None, 3).unwrap(),
        })
        .to_string(),
    );
    for (i, block) in blocks.iter().enumerate() {
        session.ingest(
            &json!({
                "index": i as u32 + 1,
                "total": total,
                "data": codec::encode_payload(block, None, 3).unwrap(),
            })
            .to_string(),
        );
    }

    assert_eq!(session.reconstruct().unwrap().bytes, data);
}

#[test]
fn empty_file_round_trips() {
    let mut session = ReconstructionSession::new();
    ingest_all(&mut session, &make_records(b"", 16, None));
    let file = session.reconstruct().unwrap();
    assert_eq!(file.bytes, b"");
}
