//! Serialization: invoice -> bech32 string.

use bech32::{u5, Variant};

use core::fmt;
use core::fmt::{Display, Formatter};

use crate::de::ROUTE_HOP_BYTES;
use crate::words::WordWriter;
use crate::{
	fallback_versions, Currency, Fallback, RawDataPart, RawHrp, RawTaggedField, SiPrefix,
	SignedRawInvoice, TaggedField, TIMESTAMP_WORDS,
};

impl Display for SignedRawInvoice {
	/// Encodes the complete invoice: human readable part, data part and the trailing 104
	/// signature words, bech32 encoded without a length cap.
	fn fmt(&self, f: &mut Formatter) -> fmt::Result {
		let hrp = self.raw_invoice.hrp.to_string();

		let mut writer = WordWriter::new();
		for word in self.raw_invoice.data.to_words() {
			writer.write_word(word);
		}

		let (recovery_id, signature_bytes) = self.signature.serialize_compact();
		writer.write_bytes(&signature_bytes);
		writer.write_uint_be(recovery_id.to_i32() as u64, 1);

		let encoded = bech32::encode(&hrp, writer.into_words(), Variant::Bech32)
			.map_err(|_| fmt::Error)?;
		f.write_str(&encoded)
	}
}

impl Display for RawHrp {
	fn fmt(&self, f: &mut Formatter) -> fmt::Result {
		let amount = match self.raw_amount {
			Some(ref amt) => amt.to_string(),
			None => String::new(),
		};

		let si_prefix = match self.si_prefix {
			Some(ref si) => si.to_string(),
			None => String::new(),
		};

		write!(
			f,
			"ln{}{}{}",
			self.currency,
			amount,
			si_prefix
		)
	}
}

impl Display for Currency {
	fn fmt(&self, f: &mut Formatter) -> fmt::Result {
		let currency_code = match *self {
			Currency::Bitcoin => "bc",
			Currency::BitcoinTestnet => "tb",
			Currency::Regtest => "bcrt",
			Currency::Simnet => "sb",
		};
		f.write_str(currency_code)
	}
}

impl Display for SiPrefix {
	fn fmt(&self, f: &mut Formatter) -> fmt::Result {
		write!(f, "{}",
			match *self {
				SiPrefix::Milli => "m",
				SiPrefix::Micro => "u",
				SiPrefix::Nano => "n",
				SiPrefix::Pico => "p",
			}
		)
	}
}

impl RawDataPart {
	/// The 5-bit word serialization of the data part without the trailing signature words: the
	/// 7 word timestamp followed by the tagged fields in their stored order.
	pub fn to_words(&self) -> Vec<u5> {
		let mut writer = WordWriter::new();
		writer.write_uint_be(self.timestamp.as_unix_timestamp(), TIMESTAMP_WORDS);
		for field in self.tagged_fields.iter() {
			field.write_words(&mut writer);
		}
		writer.into_words()
	}
}

impl RawTaggedField {
	fn write_words(&self, writer: &mut WordWriter) {
		match *self {
			RawTaggedField::KnownSemantics(ref field) => {
				let payload = field.payload_words();
				writer.write_word(field.tag());
				writer.write_uint_be(payload.len() as u64, 2);
				for word in payload {
					writer.write_word(word);
				}
			},
			RawTaggedField::UnknownSemantics(ref words) => {
				for word in words.iter() {
					writer.write_word(*word);
				}
			},
		}
	}
}

impl TaggedField {
	/// The value serialization of this field, without the tag and length words.
	pub(crate) fn payload_words(&self) -> Vec<u5> {
		let mut payload = WordWriter::new();

		match *self {
			TaggedField::PaymentHash(ref hash) | TaggedField::DescriptionHash(ref hash) => {
				payload.write_bytes(&hash.0[..]);
			},
			TaggedField::Description(ref description) => {
				payload.write_bytes(description.as_bytes());
			},
			TaggedField::PayeePubKey(ref pub_key) => {
				payload.write_bytes(&pub_key.serialize()[..]);
			},
			TaggedField::ExpiryTime(ref expiry) => {
				write_uint_be_minimal(&mut payload, expiry.as_seconds());
			},
			TaggedField::MinFinalCltvExpiry(ref cltv) => {
				write_uint_be_minimal(&mut payload, cltv.0);
			},
			TaggedField::Fallback(ref fallback) => {
				match *fallback {
					Fallback::SegWitProgram { version, ref program } => {
						payload.write_word(version);
						payload.write_bytes(program);
					},
					Fallback::PubKeyHash(ref hash) => {
						payload.write_word(u5::try_from_u8(fallback_versions::VERSION_P2PKH)
							.expect("17 < 32"));
						payload.write_bytes(&hash[..]);
					},
					Fallback::ScriptHash(ref hash) => {
						payload.write_word(u5::try_from_u8(fallback_versions::VERSION_P2SH)
							.expect("18 < 32"));
						payload.write_bytes(&hash[..]);
					},
				}
			},
			TaggedField::PrivateRoute(ref route) => {
				let mut bytes = Vec::with_capacity(route.len() * ROUTE_HOP_BYTES);
				for hop in route.iter() {
					bytes.extend_from_slice(&hop.src_node_id.serialize()[..]);
					bytes.extend_from_slice(&hop.short_channel_id.to_be_bytes());
					bytes.extend_from_slice(&hop.fees.base_msat.to_be_bytes());
					bytes.extend_from_slice(&hop.fees.proportional_millionths.to_be_bytes());
					bytes.extend_from_slice(&hop.cltv_expiry_delta.to_be_bytes());
				}
				payload.write_bytes(&bytes);
			},
		}

		payload.into_words()
	}
}

/// Appends `value` in the smallest number of 5-bit words that can hold it. Zero occupies no
/// words at all, which readers fold back to zero.
fn write_uint_be_minimal(writer: &mut WordWriter, value: u64) {
	let word_count = encoded_uint_words(value);
	if word_count > 0 {
		writer.write_uint_be(value, word_count);
	}
}

fn encoded_uint_words(value: u64) -> usize {
	(64 - value.leading_zeros() as usize + 4) / 5
}
