//! Conformance: round-trip laws over recipient sets.

use minilock_core::constants::CHUNK_SIZE;
use minilock_core::{decrypt_file, encrypt_file, Keys, MiniLockError};

/// Every listed recipient recovers the identical
/// `(sender ID, filename, payload)` triple.
#[test]
fn all_recipients_recover_identical_results() {
    let sender = Keys::generate().unwrap();
    let recipients: Vec<Keys> = (0..3).map(|_| Keys::generate().unwrap()).collect();
    let payload = b"shared secret for the whole group";

    let container = encrypt_file("group.txt", payload, &sender, &recipients).unwrap();

    let expected_sender_id = sender.encode_id().unwrap();
    for recipient in &recipients {
        let (sender_id, filename, contents) = decrypt_file(&container, recipient).unwrap();
        assert_eq!(sender_id, expected_sender_id);
        assert_eq!(filename, "group.txt");
        assert_eq!(contents, payload);
    }
}

/// A sender may address themself.
#[test]
fn sender_as_recipient_round_trips() {
    let sender = Keys::generate().unwrap();
    let container = encrypt_file("self.txt", b"note to self", &sender, &[sender.clone()]).unwrap();
    let (sender_id, filename, contents) = decrypt_file(&container, &sender).unwrap();
    assert_eq!(sender_id, sender.encode_id().unwrap());
    assert_eq!(filename, "self.txt");
    assert_eq!(contents, b"note to self");
}

/// A key that was never addressed cannot open the container.
#[test]
fn outsider_cannot_decrypt() {
    let sender = Keys::generate().unwrap();
    let recipient = Keys::generate().unwrap();
    let outsider = Keys::generate().unwrap();

    let container = encrypt_file("private.txt", b"not for you", &sender, &[recipient]).unwrap();
    assert!(matches!(
        decrypt_file(&container, &outsider),
        Err(MiniLockError::CannotDecrypt)
    ));
}

#[test]
fn empty_payload_round_trips() {
    let sender = Keys::generate().unwrap();
    let recipient = Keys::generate().unwrap();
    let container = encrypt_file("empty.bin", b"", &sender, &[recipient.clone()]).unwrap();
    let (_, filename, contents) = decrypt_file(&container, &recipient).unwrap();
    assert_eq!(filename, "empty.bin");
    assert!(contents.is_empty());
}

#[test]
fn single_byte_payload_round_trips() {
    let sender = Keys::generate().unwrap();
    let recipient = Keys::generate().unwrap();
    let container = encrypt_file("one.bin", &[0xFF], &sender, &[recipient.clone()]).unwrap();
    let (_, _, contents) = decrypt_file(&container, &recipient).unwrap();
    assert_eq!(contents, [0xFF]);
}

/// A payload spanning many chunks (10 full chunks plus a 167-byte
/// remainder, as in the reference multi-block test) survives the
/// parallel fan-out byte for byte.
#[test]
fn multi_chunk_payload_round_trips() {
    let sender = Keys::generate().unwrap();
    let recipient = Keys::generate().unwrap();

    let message = b" this is a longer message consisting of 100 characters, repeated ad nauseum to create a test case.. ";
    let payload: Vec<u8> = message
        .iter()
        .cycle()
        .take(10 * CHUNK_SIZE + 167)
        .copied()
        .collect();

    let container =
        encrypt_file("This is another filename.txt", &payload, &sender, &[recipient.clone()])
            .unwrap();
    let (_, filename, contents) = decrypt_file(&container, &recipient).unwrap();
    assert_eq!(filename, "This is another filename.txt");
    assert_eq!(contents, payload);
}
