//! Conformance: every tampered byte is noticed.
//!
//! No flipped bit anywhere in a container may survive to plaintext:
//! frame corruption surfaces as `BadMagic`/`BadLength`, ciphertext
//! corruption as `HashMismatch` (or `Authentication` at the stream
//! layer), envelope corruption as `CannotDecrypt`.

use minilock_core::{decrypt_file, encrypt_file, parse_container, Keys, MiniLockError};

fn sample() -> (Vec<u8>, Keys) {
    let sender = Keys::generate().unwrap();
    let recipient = Keys::generate().unwrap();
    let container = encrypt_file(
        "ledger.csv",
        b"the complete ledger contents for the audit",
        &sender,
        &[recipient.clone()],
    )
    .unwrap();
    (container, recipient)
}

#[test]
fn flipped_magic_byte_is_bad_magic() {
    let (mut container, recipient) = sample();
    container[0] ^= 0x01;
    assert!(matches!(
        decrypt_file(&container, &recipient),
        Err(MiniLockError::BadMagic)
    ));
}

#[test]
fn oversized_declared_header_is_bad_length() {
    let (mut container, recipient) = sample();
    container[8..12].copy_from_slice(&u32::MAX.to_le_bytes());
    assert!(matches!(
        decrypt_file(&container, &recipient),
        Err(MiniLockError::BadLength)
    ));
}

#[test]
fn truncation_inside_frame_is_rejected() {
    let (container, recipient) = sample();
    assert!(matches!(
        decrypt_file(&container[..10], &recipient),
        Err(MiniLockError::BadLength)
    ));
    assert!(matches!(
        decrypt_file(&container[..7], &recipient),
        Err(MiniLockError::BadMagic)
    ));
}

/// Any flipped byte in the ciphertext region fails before plaintext is
/// produced — as a hash mismatch (checked first) or, at the stream
/// layer, an authentication failure. Never silent corruption.
#[test]
fn flipped_ciphertext_bytes_are_rejected() {
    let (container, recipient) = sample();
    let (_, ciphertext) = parse_container(&container).unwrap();
    let ciphertext_begin = container.len() - ciphertext.len();

    let offsets = [0, 4, 100, ciphertext.len() / 2, ciphertext.len() - 1];
    for &offset in &offsets {
        let mut tampered = container.clone();
        tampered[ciphertext_begin + offset] ^= 0x01;
        let result = decrypt_file(&tampered, &recipient);
        assert!(
            matches!(
                &result,
                Err(MiniLockError::HashMismatch) | Err(MiniLockError::Authentication)
            ),
            "ciphertext flip at offset {offset} produced {:?}",
            result.err()
        );
    }
}

/// Any flipped byte in a recipient's envelope makes that envelope read
/// as "not ours": the search exhausts and reports `CannotDecrypt` —
/// no panic, no partial result.
#[test]
fn flipped_envelope_bytes_are_cannot_decrypt() {
    let (container, recipient) = sample();
    let (header, ciphertext) = parse_container(&container).unwrap();

    let envelope_len = header.decrypt_info.values().next().unwrap().len();
    for offset in [0, envelope_len / 2, envelope_len - 1] {
        let (mut header, _) = parse_container(&container).unwrap();
        for envelope in header.decrypt_info.values_mut() {
            envelope[offset] ^= 0x01;
        }
        assert!(matches!(
            header.decrypt_contents(ciphertext, &recipient),
            Err(MiniLockError::CannotDecrypt)
        ));
    }
}
