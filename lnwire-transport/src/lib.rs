// This file is Copyright its original authors, visible in version control
// history.
//
// This file is licensed under the Apache License, Version 2.0 <LICENSE-APACHE
// or http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your option.
// You may not use this file except in accordance with one or both of these
// licenses.

#![deny(missing_docs)]
#![deny(non_upper_case_globals)]
#![deny(non_camel_case_types)]
#![deny(non_snake_case)]
#![deny(unused_mut)]

//! [BOLT 8](https://github.com/lightning/bolts/blob/master/08-transport.md) transport encryption
//! for Lightning Network peers.
//!
//! A connection starts with the three act `Noise_XK` handshake, driven by the state types in
//! [`handshake`]: each act consumes the previous state, so acts can only be performed in order
//! and a failed state can not be reused. A completed handshake yields a [`Transport`] which
//! encrypts and decrypts the length prefixed message stream and rotates its keys every 1000
//! messages.
//!
//! [`Transport`]: transport::Transport

mod cipher;
pub mod handshake;
pub mod transport;

pub use crate::handshake::{Initiator, InitiatorAwaitingActTwo, Responder, ResponderAwaitingActThree};
pub use crate::transport::Transport;

use core::fmt;

/// Act One and Act Two size: 1 (version) + 33 (pubkey) + 16 (tag)
pub const ACT_ONE_SIZE: usize = 50;
/// Act Two has the same layout as Act One
pub const ACT_TWO_SIZE: usize = 50;
/// Act Three size: 1 (version) + 33 + 16 (encrypted pubkey) + 16 (tag)
pub const ACT_THREE_SIZE: usize = 66;

/// Maximum Lightning message data length according to
/// [BOLT-8](https://github.com/lightning/bolts/blob/master/08-transport.md#lightning-message-specification)
/// and [BOLT-1](https://github.com/lightning/bolts/blob/master/01-messaging.md#lightning-message-format):
pub const LN_MAX_MSG_LEN: usize = ::core::u16::MAX as usize; // Must be equal to 65535

/// Errors surfaced by the handshake acts and the encrypted transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoiseError {
	/// An act message had the wrong length
	InvalidActLength {
		/// length the current act requires
		expected: usize,
		/// length that was read off the wire
		got: usize,
	},
	/// An act message carried a version byte other than zero
	UnknownHandshakeVersion(u8),
	/// An act carried bytes that do not parse as a compressed secp256k1 point
	InvalidPublicKey,
	/// AEAD authentication failed, during an act or on the message stream
	BadTag,
}

impl fmt::Display for NoiseError {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match *self {
			NoiseError::InvalidActLength { expected, got } => {
				write!(f, "Handshake act had length {} instead of {}", got, expected)
			},
			NoiseError::UnknownHandshakeVersion(version) => {
				write!(f, "Unknown handshake version number {}", version)
			},
			NoiseError::InvalidPublicKey => f.write_str("Invalid public key"),
			NoiseError::BadTag => f.write_str("Bad MAC"),
		}
	}
}

impl std::error::Error for NoiseError { }
