//! Integration tests for the MnemoVault crypto module.

use mnemovault::crypto::{
    export_jwk, fingerprint, import_jwk, Aes256GcmCipher, SymmetricCipher, VaultKey, NONCE_LEN,
    TAG_LEN,
};
use mnemovault::errors::MnemoVaultError;

// ---------------------------------------------------------------------------
// Encryption round-trip
// ---------------------------------------------------------------------------

#[test]
fn encrypt_decrypt_roundtrip() {
    let cipher = Aes256GcmCipher;
    let key = VaultKey::new([0xABu8; 32]);
    let nonce = cipher.generate_nonce();
    let plaintext = b"AIzaSyExampleKey-0123456789";

    let ciphertext = cipher.encrypt(&key, &nonce, plaintext).expect("encrypt");

    // Ciphertext carries the 16-byte tag.
    assert_eq!(ciphertext.len(), plaintext.len() + TAG_LEN);

    let recovered = cipher.decrypt(&key, &nonce, &ciphertext).expect("decrypt");
    assert_eq!(recovered, plaintext);
}

#[test]
fn same_plaintext_under_different_nonces_differs() {
    let cipher = Aes256GcmCipher;
    let key = VaultKey::new([0xCDu8; 32]);
    let plaintext = b"sk-abc123";

    let n1 = cipher.generate_nonce();
    let n2 = cipher.generate_nonce();
    assert_ne!(n1, n2);

    let ct1 = cipher.encrypt(&key, &n1, plaintext).unwrap();
    let ct2 = cipher.encrypt(&key, &n2, plaintext).unwrap();
    assert_ne!(ct1, ct2);
}

#[test]
fn decrypt_with_wrong_key_fails() {
    let cipher = Aes256GcmCipher;
    let nonce = cipher.generate_nonce();
    let ciphertext = cipher
        .encrypt(&VaultKey::new([0x01u8; 32]), &nonce, b"sk-abc123")
        .unwrap();

    let result = cipher.decrypt(&VaultKey::new([0x02u8; 32]), &nonce, &ciphertext);
    assert!(matches!(result, Err(MnemoVaultError::DecryptionFailed)));
}

#[test]
fn decrypt_with_wrong_nonce_fails() {
    let cipher = Aes256GcmCipher;
    let key = VaultKey::new([0x03u8; 32]);
    let nonce = cipher.generate_nonce();
    let ciphertext = cipher.encrypt(&key, &nonce, b"sk-abc123").unwrap();

    let mut other = nonce;
    other[0] ^= 0xFF;
    assert!(cipher.decrypt(&key, &other, &ciphertext).is_err());
}

#[test]
fn truncated_or_short_inputs_fail_without_panicking() {
    let cipher = Aes256GcmCipher;
    let key = VaultKey::new([0x04u8; 32]);
    let nonce = cipher.generate_nonce();

    assert!(cipher.decrypt(&key, &nonce, &[0u8; 5]).is_err());
    assert!(cipher.decrypt(&key, &nonce[..8], &[0u8; 32]).is_err());
    assert!(cipher.decrypt(&key, &[], &[]).is_err());
    assert!(cipher.encrypt(&key, &[0u8; 16], b"x").is_err());
}

#[test]
fn empty_plaintext_roundtrips() {
    let cipher = Aes256GcmCipher;
    let key = cipher.generate_key().unwrap();
    let nonce = cipher.generate_nonce();

    let ct = cipher.encrypt(&key, &nonce, b"").unwrap();
    assert_eq!(ct.len(), TAG_LEN);
    assert!(cipher.decrypt(&key, &nonce, &ct).unwrap().is_empty());
}

#[test]
fn nonce_has_expected_length() {
    assert_eq!(Aes256GcmCipher.generate_nonce().len(), NONCE_LEN);
    assert_eq!(NONCE_LEN, 12);
}

// ---------------------------------------------------------------------------
// Key material (JWK)
// ---------------------------------------------------------------------------

#[test]
fn exported_key_imports_to_same_bytes() {
    let cipher = Aes256GcmCipher;
    let key = cipher.generate_key().unwrap();

    let material = export_jwk(&key).unwrap();
    let back = import_jwk(&material).unwrap();
    assert_eq!(key.as_bytes(), back.as_bytes());
}

#[test]
fn exported_key_is_a_json_web_key() {
    let material = export_jwk(&VaultKey::new([0x11u8; 32])).unwrap();
    let value: serde_json::Value = serde_json::from_str(&material).unwrap();

    assert_eq!(value["kty"], "oct");
    assert_eq!(value["alg"], "A256GCM");
    assert_eq!(value["ext"], true);
    let ops: Vec<&str> = value["key_ops"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap())
        .collect();
    assert!(ops.contains(&"encrypt"));
    assert!(ops.contains(&"decrypt"));
    // 32 bytes in unpadded base64url.
    assert_eq!(value["k"].as_str().unwrap().len(), 43);
}

#[test]
fn key_imported_from_hand_written_jwk_decrypts() {
    let cipher = Aes256GcmCipher;
    let written = VaultKey::new([0x22u8; 32]);
    let nonce = cipher.generate_nonce();
    let ct = cipher.encrypt(&written, &nonce, b"sk-abc123").unwrap();

    // A JWK without key_ops or ext is still acceptable.
    let k = {
        let full: serde_json::Value =
            serde_json::from_str(&export_jwk(&written).unwrap()).unwrap();
        full["k"].as_str().unwrap().to_string()
    };
    let minimal = format!(r#"{{"kty":"oct","alg":"A256GCM","k":"{k}"}}"#);

    let imported = cipher.import_key(&minimal).unwrap();
    assert_eq!(cipher.decrypt(&imported, &nonce, &ct).unwrap(), b"sk-abc123");
}

#[test]
fn malformed_key_material_is_corrupt() {
    let cases = [
        "",
        "not json",
        r#"{"kty":"RSA","alg":"A256GCM","k":"AAAA"}"#,
        r#"{"kty":"oct","alg":"A128GCM","k":"AAAA"}"#,
        r#"{"kty":"oct","alg":"A256GCM","k":"***"}"#,
        r#"{"kty":"oct","alg":"A256GCM","k":"AAAA"}"#,
        r#"{"kty":"oct","alg":"A256GCM","k":"AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA","key_ops":["encrypt"]}"#,
    ];

    for case in cases {
        let err = import_jwk(case).unwrap_err();
        assert!(
            matches!(err, MnemoVaultError::KeyMaterialCorrupt(_)),
            "{case:?} should be corrupt, got {err:?}"
        );
    }
}

#[test]
fn fingerprint_is_stable_and_short() {
    let material = export_jwk(&VaultKey::new([0x33u8; 32])).unwrap();
    let a = fingerprint(&material);
    let b = fingerprint(&material);
    assert_eq!(a, b);
    assert_eq!(a.len(), 16);
    assert!(!material.contains(&a));

    let other = export_jwk(&VaultKey::new([0x34u8; 32])).unwrap();
    assert_ne!(fingerprint(&other), a);
}

#[test]
fn vault_key_debug_is_redacted() {
    let key = VaultKey::new([0x55u8; 32]);
    let shown = format!("{key:?}");
    assert!(shown.contains("redacted"));
    assert!(!shown.contains("55"));
}
