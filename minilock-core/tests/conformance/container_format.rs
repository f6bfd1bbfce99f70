//! Conformance: container framing and header shape.

use minilock_core::{encrypt_file, hash, parse_container, Keys};

fn sample_container() -> (Vec<u8>, Keys, Keys) {
    let sender = Keys::generate().unwrap();
    let recipient = Keys::generate().unwrap();
    let container = encrypt_file(
        "report.pdf",
        b"quarterly numbers, do not forward",
        &sender,
        &[recipient.clone()],
    )
    .unwrap();
    (container, sender, recipient)
}

/// The container starts with the literal ASCII bytes `miniLock`.
#[test]
fn container_begins_with_magic_bytes() {
    let (container, _, _) = sample_container();
    assert_eq!(
        &container[..8],
        &[0x6D, 0x69, 0x6E, 0x69, 0x4C, 0x6F, 0x63, 0x6B]
    );
}

/// Bytes 8..12, read little-endian, give the exact length of the JSON
/// header region, and that region parses as a well-formed header.
#[test]
fn header_length_prefix_and_json_shape() {
    let (container, _, _) = sample_container();

    let mut len_bytes = [0u8; 4];
    len_bytes.copy_from_slice(&container[8..12]);
    let header_len = u32::from_le_bytes(len_bytes) as usize;
    assert!(12 + header_len <= container.len());

    let value: serde_json::Value =
        serde_json::from_slice(&container[12..12 + header_len]).unwrap();
    assert_eq!(value["version"], 1);

    let ephemeral = value["ephemeral"].as_str().unwrap();
    assert_eq!(
        minilock_core::encoding::from_base64(ephemeral).unwrap().len(),
        32
    );

    let envelopes = value["decryptInfo"].as_object().unwrap();
    assert_eq!(envelopes.len(), 1);
    for (nonce_b64, envelope_b64) in envelopes {
        assert_eq!(
            minilock_core::encoding::from_base64(nonce_b64).unwrap().len(),
            24
        );
        assert!(envelope_b64.as_str().is_some());
    }
}

/// The header-declared file hash equals BLAKE2s-256 of the ciphertext
/// region.
#[test]
fn declared_file_hash_matches_ciphertext_region() {
    let (container, _, recipient) = sample_container();
    let (header, ciphertext) = parse_container(&container).unwrap();
    let (file_info, _) = header.extract_file_info(&recipient).unwrap();
    assert_eq!(
        file_info.file_hash,
        hash::blake2s_256(ciphertext).to_vec()
    );
}

/// The sender ID recovered by the recipient is the sender's encoded ID.
#[test]
fn recovered_sender_id_matches_sender() {
    let (container, sender, recipient) = sample_container();
    let (sender_id, _, _) = minilock_core::decrypt_file(&container, &recipient).unwrap();
    assert_eq!(sender_id, sender.encode_id().unwrap());
}
