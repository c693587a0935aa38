// This file is Copyright its original authors, visible in version control
// history.
//
// This file is licensed under the Apache License, Version 2.0 <LICENSE-APACHE
// or http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your option.
// You may not use this file except in accordance with one or both of these
// licenses.

//! Length prefixed, authenticated message framing on top of the keys a completed handshake
//! derived.

use zeroize::Zeroize;

use crate::cipher::{decrypt_with_ad, encrypt_with_ad, hkdf_extract_expand};
use crate::{NoiseError, LN_MAX_MSG_LEN};

/// Nonce value at which the corresponding key is rotated and the nonce starts over.
const KEY_ROTATION_PERIOD: u64 = 1000;

/// Size of the encrypted length prefix: 2 byte length + 16 byte tag.
pub const ENCRYPTED_LENGTH_SIZE: usize = 18;

/// An established encrypted connection to a peer.
///
/// Frames are `encrypt(len) || encrypt(payload)`, each carrying its own tag and consuming one
/// nonce. Per direction, after 1000 AEAD operations the key is rotated from the retained
/// chaining key and the nonce resets to zero. The caller must decrypt each frame's length
/// prefix before its payload so the receiving nonce stays aligned with the sender's.
pub struct Transport {
	pub(crate) sending_key: [u8; 32],
	pub(crate) receiving_key: [u8; 32],

	pub(crate) sending_chaining_key: [u8; 32],
	pub(crate) receiving_chaining_key: [u8; 32],

	pub(crate) sending_nonce: u64,
	pub(crate) receiving_nonce: u64,
}

impl Transport {
	pub(crate) fn new(sending_key: [u8; 32], receiving_key: [u8; 32], chaining_key: [u8; 32]) -> Transport {
		Transport {
			sending_key,
			receiving_key,
			sending_chaining_key: chaining_key,
			receiving_chaining_key: chaining_key,
			sending_nonce: 0,
			receiving_nonce: 0,
		}
	}

	/// Encrypts the given message, returning the encrypted length prefix followed by the
	/// encrypted message. Panics if `msg.len() > 65535`.
	pub fn encrypt_message(&mut self, msg: &[u8]) -> Vec<u8> {
		if msg.len() > LN_MAX_MSG_LEN {
			panic!("Attempted to encrypt message longer than 65535 bytes!");
		}

		let mut res = Vec::with_capacity(msg.len() + 16 * 2 + 2);

		res.extend_from_slice(&encrypt_with_ad(
			&self.sending_key,
			self.sending_nonce,
			&[],
			&(msg.len() as u16).to_be_bytes(),
		));
		self.increment_sending_nonce();

		res.extend_from_slice(&encrypt_with_ad(&self.sending_key, self.sending_nonce, &[], msg));
		self.increment_sending_nonce();

		res
	}

	/// Decrypts a message length prefix from the peer. The input must be exactly the 18 byte
	/// encrypted prefix; the returned length is that of the plaintext message, so the encrypted
	/// message spans the following `length + 16` bytes.
	pub fn decrypt_length(&mut self, msg: &[u8]) -> Result<u16, NoiseError> {
		assert_eq!(msg.len(), ENCRYPTED_LENGTH_SIZE);

		let length_bytes =
			decrypt_with_ad(&self.receiving_key, self.receiving_nonce, &[], msg)?;
		self.increment_receiving_nonce();

		let mut res = [0; 2];
		res.copy_from_slice(&length_bytes);
		Ok(u16::from_be_bytes(res))
	}

	/// Decrypts a message body. Panics if `msg.len() > 65535 + 16`.
	pub fn decrypt_message(&mut self, msg: &[u8]) -> Result<Vec<u8>, NoiseError> {
		if msg.len() > LN_MAX_MSG_LEN + 16 {
			panic!("Attempted to decrypt message longer than 65535 + 16 bytes!");
		}

		let res = decrypt_with_ad(&self.receiving_key, self.receiving_nonce, &[], msg)?;
		self.increment_receiving_nonce();

		Ok(res)
	}

	fn increment_sending_nonce(&mut self) {
		Self::increment_nonce(
			&mut self.sending_nonce,
			&mut self.sending_chaining_key,
			&mut self.sending_key,
		);
	}

	fn increment_receiving_nonce(&mut self) {
		Self::increment_nonce(
			&mut self.receiving_nonce,
			&mut self.receiving_chaining_key,
			&mut self.receiving_key,
		);
	}

	fn increment_nonce(nonce: &mut u64, chaining_key: &mut [u8; 32], key: &mut [u8; 32]) {
		*nonce += 1;
		if *nonce == KEY_ROTATION_PERIOD {
			Self::rotate_key(chaining_key, key);
			*nonce = 0;
		}
	}

	fn rotate_key(chaining_key: &mut [u8; 32], key: &mut [u8; 32]) {
		tracing::trace!("rotating transport key");
		let (new_chaining_key, new_key) = hkdf_extract_expand(&chaining_key[..], &key[..]);
		chaining_key.copy_from_slice(&new_chaining_key);
		key.copy_from_slice(&new_key);
	}
}

impl Drop for Transport {
	fn drop(&mut self) {
		self.sending_key.zeroize();
		self.receiving_key.zeroize();
		self.sending_chaining_key.zeroize();
		self.receiving_chaining_key.zeroize();
	}
}
