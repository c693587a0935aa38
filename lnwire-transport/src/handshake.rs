// This file is Copyright its original authors, visible in version control
// history.
//
// This file is licensed under the Apache License, Version 2.0 <LICENSE-APACHE
// or http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your option.
// You may not use this file except in accordance with one or both of these
// licenses.

//! The three act `Noise_XK` handshake.
//!
//! Every act consumes the state that produced it and returns the next one, so an out of order
//! act is a type error rather than a runtime panic, and an act that failed leaves nothing
//! behind to misuse. The initiator walks `Initiator -> InitiatorAwaitingActTwo -> Transport`,
//! the responder walks `Responder -> ResponderAwaitingActThree -> Transport`.

use bitcoin_hashes::{Hash, HashEngine};
use bitcoin_hashes::sha256::Hash as Sha256;

use secp256k1::{PublicKey, Secp256k1, SecretKey};
use secp256k1::ecdh::SharedSecret;

use zeroize::{Zeroize, Zeroizing};

use crate::cipher::{decrypt_with_ad, encrypt_with_ad, hkdf_extract_expand};
use crate::transport::Transport;
use crate::{NoiseError, ACT_ONE_SIZE, ACT_THREE_SIZE, ACT_TWO_SIZE};

// Sha256("Noise_XK_secp256k1_ChaChaPoly_SHA256")
const NOISE_CK: [u8; 32] = [0x26, 0x40, 0xf5, 0x2e, 0xeb, 0xcd, 0x9e, 0x88, 0x29, 0x58, 0x95, 0x1c, 0x79, 0x42, 0x50, 0xee, 0xdb, 0x28, 0x00, 0x2c, 0x05, 0xd7, 0xdc, 0x2e, 0xa0, 0xf1, 0x95, 0x40, 0x60, 0x42, 0xca, 0xf1];
// Sha256(NOISE_CK || "lightning")
const NOISE_H: [u8; 32] = [0xd1, 0xfb, 0xf6, 0xde, 0xe4, 0xf6, 0x86, 0xf1, 0x32, 0xfd, 0x70, 0x2c, 0x4a, 0xbf, 0x8f, 0xba, 0x4b, 0xb4, 0x20, 0xd8, 0x9d, 0x2a, 0x04, 0x8a, 0x3c, 0x4f, 0x4c, 0x09, 0x2e, 0x37, 0xb6, 0x76];

/// The rolling handshake hash and chaining key shared by both directions.
struct HandshakeHash {
	h: [u8; 32],
	ck: [u8; 32],
}

impl HandshakeHash {
	/// Starts the transcript from the precomputed protocol name and prologue hashes, mixing in
	/// the responder's static public key (which the initiator knows a priori and the responder
	/// is).
	fn new(responder_static: &PublicKey) -> HandshakeHash {
		let mut sha = Sha256::engine();
		sha.input(&NOISE_H);
		sha.input(&responder_static.serialize()[..]);
		HandshakeHash {
			h: Sha256::from_engine(sha).into_inner(),
			ck: NOISE_CK,
		}
	}

	fn mix_hash(&mut self, data: &[u8]) {
		let mut sha = Sha256::engine();
		sha.input(&self.h);
		sha.input(data);
		self.h = Sha256::from_engine(sha).into_inner();
	}

	/// Advances the chaining key with an ECDH output and returns the temporary key.
	fn mix_key(&mut self, ss: &SharedSecret) -> Zeroizing<[u8; 32]> {
		let (ck, temp_k) = hkdf_extract_expand(&self.ck, &ss.secret_bytes());
		self.ck = ck;
		Zeroizing::new(temp_k)
	}
}

impl Drop for HandshakeHash {
	fn drop(&mut self) {
		self.ck.zeroize();
	}
}

/// Produces `0x00 || our_pub || tag` while mixing the transcript, as both Act One and Act Two
/// do on the sending side.
fn outbound_act<C: secp256k1::Signing>(
	secp_ctx: &Secp256k1<C>, state: &mut HandshakeHash, our_key: &SecretKey,
	their_key: &PublicKey,
) -> ([u8; 50], Zeroizing<[u8; 32]>) {
	let our_pub = PublicKey::from_secret_key(secp_ctx, our_key);

	state.mix_hash(&our_pub.serialize()[..]);

	let ss = SharedSecret::new(their_key, our_key);
	let temp_k = state.mix_key(&ss);

	let mut act = [0; 50];
	act[1..34].copy_from_slice(&our_pub.serialize()[..]);
	let tag = encrypt_with_ad(&temp_k, 0, &state.h, &[]);
	act[34..].copy_from_slice(&tag);

	state.mix_hash(&act[34..]);

	(act, temp_k)
}

/// Consumes a 50 byte `0x00 || their_pub || tag` act, the receiving-side counterpart of
/// [`outbound_act`].
fn inbound_act(
	state: &mut HandshakeHash, act: &[u8], our_key: &SecretKey,
) -> Result<(PublicKey, Zeroizing<[u8; 32]>), NoiseError> {
	if act.len() != ACT_ONE_SIZE {
		return Err(NoiseError::InvalidActLength { expected: ACT_ONE_SIZE, got: act.len() });
	}
	if act[0] != 0 {
		return Err(NoiseError::UnknownHandshakeVersion(act[0]));
	}

	let their_pub = PublicKey::from_slice(&act[1..34]).map_err(|_| NoiseError::InvalidPublicKey)?;

	state.mix_hash(&their_pub.serialize()[..]);

	let ss = SharedSecret::new(&their_pub, our_key);
	let temp_k = state.mix_key(&ss);

	decrypt_with_ad(&temp_k, 0, &state.h, &act[34..])?;

	state.mix_hash(&act[34..]);

	Ok((their_pub, temp_k))
}

/// An outbound handshake before Act One has been produced.
pub struct Initiator {
	secp_ctx: Secp256k1<secp256k1::SignOnly>,
	state: HandshakeHash,
	local_static_key: SecretKey,
	local_ephemeral_key: SecretKey,
	remote_static_key: PublicKey,
}

/// An outbound handshake that has sent Act One and waits for the peer's Act Two.
pub struct InitiatorAwaitingActTwo {
	secp_ctx: Secp256k1<secp256k1::SignOnly>,
	state: HandshakeHash,
	local_static_key: SecretKey,
	local_ephemeral_key: SecretKey,
}

/// An inbound handshake waiting for a peer's Act One.
pub struct Responder {
	secp_ctx: Secp256k1<secp256k1::SignOnly>,
	state: HandshakeHash,
	local_static_key: SecretKey,
	local_ephemeral_key: SecretKey,
}

/// An inbound handshake that has sent Act Two and waits for the peer's Act Three.
pub struct ResponderAwaitingActThree {
	state: HandshakeHash,
	local_ephemeral_key: SecretKey,
	temp_k2: Zeroizing<[u8; 32]>,
}

impl Initiator {
	/// Starts a handshake towards a peer whose static public key is known. The ephemeral key
	/// must be fresh randomness for every connection.
	pub fn new(
		local_static_key: SecretKey, remote_static_key: PublicKey, ephemeral_key: SecretKey,
	) -> Initiator {
		Initiator {
			secp_ctx: Secp256k1::signing_only(),
			state: HandshakeHash::new(&remote_static_key),
			local_static_key,
			local_ephemeral_key: ephemeral_key,
			remote_static_key,
		}
	}

	/// Produces the 50 byte Act One message.
	pub fn act_one(mut self) -> ([u8; ACT_ONE_SIZE], InitiatorAwaitingActTwo) {
		let (act, _temp_k1) = outbound_act(
			&self.secp_ctx,
			&mut self.state,
			&self.local_ephemeral_key,
			&self.remote_static_key,
		);

		(act, InitiatorAwaitingActTwo {
			secp_ctx: self.secp_ctx,
			state: self.state,
			local_static_key: self.local_static_key,
			local_ephemeral_key: self.local_ephemeral_key,
		})
	}
}

impl InitiatorAwaitingActTwo {
	/// Consumes the peer's 50 byte Act Two and produces the 66 byte Act Three together with the
	/// ready-to-use transport.
	pub fn process_act_two(
		mut self, act_two: &[u8],
	) -> Result<([u8; ACT_THREE_SIZE], Transport), NoiseError> {
		let (remote_ephemeral_key, temp_k2) =
			inbound_act(&mut self.state, act_two, &self.local_ephemeral_key)?;

		let our_node_id = PublicKey::from_secret_key(&self.secp_ctx, &self.local_static_key);

		let mut act = [0; ACT_THREE_SIZE];
		let ciphertext = encrypt_with_ad(&temp_k2, 1, &self.state.h, &our_node_id.serialize()[..]);
		act[1..50].copy_from_slice(&ciphertext);

		self.state.mix_hash(&act[1..50]);

		let ss = SharedSecret::new(&remote_ephemeral_key, &self.local_static_key);
		let temp_k3 = self.state.mix_key(&ss);

		let tag = encrypt_with_ad(&temp_k3, 0, &self.state.h, &[]);
		act[50..].copy_from_slice(&tag);

		// The initiator sends under the first 32 derived bytes and receives under the last 32.
		// The responder assigns them the other way around; making this "consistent" breaks the
		// protocol.
		let (sk, rk) = hkdf_extract_expand(&self.state.ck, &[]);
		let transport = Transport::new(sk, rk, self.state.ck);
		tracing::debug!("noise handshake complete, initiator keys derived");

		Ok((act, transport))
	}
}

impl Responder {
	/// Starts an inbound handshake. The ephemeral key must be fresh randomness for every
	/// connection.
	pub fn new(local_static_key: SecretKey, ephemeral_key: SecretKey) -> Responder {
		let secp_ctx = Secp256k1::signing_only();
		let our_node_id = PublicKey::from_secret_key(&secp_ctx, &local_static_key);
		Responder {
			secp_ctx,
			state: HandshakeHash::new(&our_node_id),
			local_static_key,
			local_ephemeral_key: ephemeral_key,
		}
	}

	/// Consumes the peer's 50 byte Act One and produces the 50 byte Act Two.
	pub fn process_act_one(
		mut self, act_one: &[u8],
	) -> Result<([u8; ACT_TWO_SIZE], ResponderAwaitingActThree), NoiseError> {
		let (remote_ephemeral_key, _temp_k1) =
			inbound_act(&mut self.state, act_one, &self.local_static_key)?;

		let (act, temp_k2) = outbound_act(
			&self.secp_ctx,
			&mut self.state,
			&self.local_ephemeral_key,
			&remote_ephemeral_key,
		);

		Ok((act, ResponderAwaitingActThree {
			state: self.state,
			local_ephemeral_key: self.local_ephemeral_key,
			temp_k2,
		}))
	}
}

impl ResponderAwaitingActThree {
	/// Consumes the peer's 66 byte Act Three, learning the peer's static public key, and
	/// returns it together with the ready-to-use transport.
	pub fn process_act_three(
		mut self, act_three: &[u8],
	) -> Result<(PublicKey, Transport), NoiseError> {
		if act_three.len() != ACT_THREE_SIZE {
			return Err(NoiseError::InvalidActLength {
				expected: ACT_THREE_SIZE,
				got: act_three.len(),
			});
		}
		if act_three[0] != 0 {
			return Err(NoiseError::UnknownHandshakeVersion(act_three[0]));
		}

		let their_node_id_bytes =
			decrypt_with_ad(&self.temp_k2, 1, &self.state.h, &act_three[1..50])?;
		let their_node_id = PublicKey::from_slice(&their_node_id_bytes)
			.map_err(|_| NoiseError::InvalidPublicKey)?;

		self.state.mix_hash(&act_three[1..50]);

		let ss = SharedSecret::new(&their_node_id, &self.local_ephemeral_key);
		let temp_k3 = self.state.mix_key(&ss);

		decrypt_with_ad(&temp_k3, 0, &self.state.h, &act_three[50..])?;

		// Directional mirror of the initiator's split: first 32 bytes receive, last 32 send.
		let (rk, sk) = hkdf_extract_expand(&self.state.ck, &[]);
		let transport = Transport::new(sk, rk, self.state.ck);
		tracing::debug!("noise handshake complete, responder keys derived");

		Ok((their_node_id, transport))
	}
}
