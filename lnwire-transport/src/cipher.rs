// This file is Copyright its original authors, visible in version control
// history.
//
// This file is licensed under the Apache License, Version 2.0 <LICENSE-APACHE
// or http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your option.
// You may not use this file except in accordance with one or both of these
// licenses.

//! ChaCha20-Poly1305 with the BOLT 8 nonce layout, and the HKDF both the handshake and the key
//! rotation derive from.

use bitcoin_hashes::{Hash, HashEngine, Hmac, HmacEngine};
use bitcoin_hashes::sha256::Hash as Sha256;

use chacha20poly1305::{ChaCha20Poly1305, Key, Nonce};
use chacha20poly1305::aead::{Aead, KeyInit, Payload};

use crate::NoiseError;

/// The 96 bit nonce: four zero bytes followed by the counter in little-endian. Only the low two
/// counter bytes are ever non-zero in practice since keys rotate after 1000 messages.
fn nonce_from_counter(counter: u64) -> Nonce {
	let mut nonce = [0u8; 12];
	nonce[4..].copy_from_slice(&counter.to_le_bytes()[..]);
	Nonce::from(nonce)
}

/// Encrypts `plaintext` under `key` and the given nonce counter, authenticating `ad`. Returns
/// ciphertext with the 16 byte tag appended.
pub(crate) fn encrypt_with_ad(key: &[u8; 32], counter: u64, ad: &[u8], plaintext: &[u8]) -> Vec<u8> {
	let cipher = ChaCha20Poly1305::new(Key::from_slice(key));
	cipher
		.encrypt(&nonce_from_counter(counter), Payload { msg: plaintext, aad: ad })
		.expect("in-memory aead encryption does not fail")
}

/// Decrypts and authenticates `ciphertext` (with trailing tag) under `key`, the given nonce
/// counter and `ad`.
pub(crate) fn decrypt_with_ad(
	key: &[u8; 32], counter: u64, ad: &[u8], ciphertext: &[u8],
) -> Result<Vec<u8>, NoiseError> {
	let cipher = ChaCha20Poly1305::new(Key::from_slice(key));
	cipher
		.decrypt(&nonce_from_counter(counter), Payload { msg: ciphertext, aad: ad })
		.map_err(|_| NoiseError::BadTag)
}

/// HKDF as defined in [BOLT #8](https://github.com/lightning/bolts/blob/master/08-transport.md#handshake-state)
/// and [RFC 5869](https://tools.ietf.org/html/rfc5869), with a zero-length `info` field.
/// Returns the first 64 octets as two 32 byte arrays.
pub(crate) fn hkdf_extract_expand(salt: &[u8], ikm: &[u8]) -> ([u8; 32], [u8; 32]) {
	let mut hmac = HmacEngine::<Sha256>::new(salt);
	hmac.input(ikm);
	let prk = Hmac::from_engine(hmac).into_inner();
	let mut hmac = HmacEngine::<Sha256>::new(&prk[..]);
	hmac.input(&[1; 1]);
	let t1 = Hmac::from_engine(hmac).into_inner();
	let mut hmac = HmacEngine::<Sha256>::new(&prk[..]);
	hmac.input(&t1);
	hmac.input(&[2; 1]);
	(t1, Hmac::from_engine(hmac).into_inner())
}
