//! Deserialization: bech32 string -> checked invoice.

use bech32::{u5, FromBase32, Variant};

use bitcoin_hashes::Hash;
use bitcoin_hashes::sha256;

use secp256k1::{Message, PublicKey, Secp256k1};
use secp256k1::ecdsa::{RecoverableSignature, RecoveryId};

use core::str::FromStr;

use crate::words::{self, WordReader};
use crate::{
	constants, fallback_versions, Currency, Description, ExpiryTime, Fallback, InvoiceSignature,
	MinFinalCltvExpiry, ParseError, PayeePubKey, PositiveTimestamp, PrivateRoute, RawDataPart,
	RawHrp, RawInvoice, RawTaggedField, RouteHintHop, RoutingFees, Sha256, SiPrefix,
	SignedRawInvoice, TaggedField, SIGNATURE_WORDS, TIMESTAMP_WORDS,
};

impl FromStr for Currency {
	type Err = ParseError;

	fn from_str(currency_prefix: &str) -> Result<Currency, ParseError> {
		match currency_prefix {
			"bc" => Ok(Currency::Bitcoin),
			"tb" => Ok(Currency::BitcoinTestnet),
			"bcrt" => Ok(Currency::Regtest),
			"sb" => Ok(Currency::Simnet),
			_ => Err(ParseError::UnknownCurrency),
		}
	}
}

impl FromStr for SiPrefix {
	type Err = ParseError;

	fn from_str(currency_prefix: &str) -> Result<SiPrefix, ParseError> {
		use crate::SiPrefix::*;
		match currency_prefix {
			"m" => Ok(Milli),
			"u" => Ok(Micro),
			"n" => Ok(Nano),
			"p" => Ok(Pico),
			_ => Err(ParseError::UnknownSiPrefix),
		}
	}
}

impl FromStr for RawHrp {
	type Err = ParseError;

	/// Parses a human readable part of the form `ln{currency}{amount}{si prefix}`. The parse is
	/// two-pass: first the string is cut into a letter run, a digit run and a trailing
	/// multiplier letter, then each token is validated on its own.
	fn from_str(hrp: &str) -> Result<RawHrp, ParseError> {
		if !hrp.starts_with("ln") {
			return Err(ParseError::BadPrefix);
		}
		let rest = &hrp[2..];

		// tokenize
		let bytes = rest.as_bytes();
		let mut amount_start = 0;
		while amount_start < bytes.len() && bytes[amount_start].is_ascii_lowercase() {
			amount_start += 1;
		}
		let mut amount_end = amount_start;
		while amount_end < bytes.len() && bytes[amount_end].is_ascii_digit() {
			amount_end += 1;
		}
		let currency_run = &rest[..amount_start];
		let digit_run = &rest[amount_start..amount_end];
		let multiplier_run = &rest[amount_end..];

		// validate
		let currency = Currency::from_str(currency_run)?;

		if digit_run.is_empty() && !multiplier_run.is_empty() {
			return Err(ParseError::BadPrefix);
		}

		let raw_amount = if digit_run.is_empty() {
			None
		} else {
			let amount = digit_run.parse::<u64>().map_err(ParseError::ParseAmountError)?;
			if amount == 0 {
				return Err(ParseError::InvalidAmount);
			}
			Some(amount)
		};

		let si_prefix = if multiplier_run.is_empty() {
			None
		} else if multiplier_run.len() == 1 && multiplier_run.as_bytes()[0].is_ascii_lowercase() {
			Some(SiPrefix::from_str(multiplier_run)?)
		} else {
			return Err(ParseError::BadPrefix);
		};

		Ok(RawHrp {
			currency,
			raw_amount,
			si_prefix,
		})
	}
}

impl FromStr for SignedRawInvoice {
	type Err = ParseError;

	/// Decodes a bech32 encoded invoice, resolves the payee public key (from the payee pub key
	/// field if present, from signature recovery otherwise) and verifies the signature against
	/// it.
	fn from_str(s: &str) -> Result<SignedRawInvoice, ParseError> {
		let (hrp, data, variant) = bech32::decode(s)?;
		if variant != Variant::Bech32 {
			// bech32m checksums are not valid for invoices
			return Err(ParseError::Bech32Error(bech32::Error::InvalidChecksum));
		}

		if data.len() < TIMESTAMP_WORDS + SIGNATURE_WORDS {
			return Err(ParseError::TooShortDataPart);
		}

		let raw_hrp: RawHrp = hrp.parse()?;
		let data_part = RawDataPart::from_base32(&data)?;

		let signature_words = &data[data.len() - SIGNATURE_WORDS..];
		let signature_bytes = words::words_to_bytes(&signature_words[..SIGNATURE_WORDS - 1], false);
		let recovery_flag = signature_words[SIGNATURE_WORDS - 1].to_u8();
		if recovery_flag > 3 {
			return Err(ParseError::InvalidRecoveryId);
		}
		let recovery_id = RecoveryId::from_i32(recovery_flag as i32)
			.expect("flag checked to be in [0,3]");
		let signature = RecoverableSignature::from_compact(&signature_bytes, recovery_id)
			.map_err(ParseError::MalformedSignature)?;

		let hash = RawInvoice::hash_from_parts(
			hrp.as_bytes(),
			&data[..data.len() - SIGNATURE_WORDS]
		);

		let raw_invoice = RawInvoice {
			hrp: raw_hrp,
			data: data_part,
		};

		let secp_ctx = Secp256k1::verification_only();
		let message = Message::from_slice(&hash[..])
			.expect("Hash is 32 bytes long, same as MESSAGE_SIZE");

		let (payee_pub_key, used_sig_recovery) = match raw_invoice.payee_pub_key() {
			Some(pk) => (pk.clone(), false),
			None => {
				let recovered = secp_ctx.recover_ecdsa(&message, &signature)
					.map_err(|_| ParseError::InvalidSignature)?;
				(PayeePubKey(recovered), true)
			},
		};

		// Redundant after recovery, but keeps the contract uniform for both key sources.
		secp_ctx.verify_ecdsa(&message, &signature.to_standard(), &payee_pub_key)
			.map_err(|_| ParseError::InvalidSignature)?;

		Ok(SignedRawInvoice {
			raw_invoice,
			hash,
			signature: InvoiceSignature(signature),
			payee_pub_key,
			used_sig_recovery,
		})
	}
}

impl FromBase32 for RawDataPart {
	type Err = ParseError;

	/// Parses the timestamp and the tagged field stream. The final 104 signature words must
	/// still be present but are not part of the data.
	fn from_base32(data: &[u5]) -> Result<RawDataPart, ParseError> {
		if data.len() < TIMESTAMP_WORDS + SIGNATURE_WORDS {
			return Err(ParseError::TooShortDataPart);
		}

		let mut reader = WordReader::new(data);
		let timestamp = PositiveTimestamp::from_unix_timestamp(reader.read_uint_be(TIMESTAMP_WORDS)?)
			.expect("35 bits can't exceed MAX_TIMESTAMP");

		let tagged_fields = parse_tagged_fields(&mut reader)?;

		Ok(RawDataPart {
			timestamp,
			tagged_fields,
		})
	}
}

/// Reads tagged fields off `reader` until only the trailing signature words are left. Unknown
/// tags and known tags whose payload does not parse are preserved as raw word runs.
fn parse_tagged_fields(reader: &mut WordReader) -> Result<Vec<RawTaggedField>, ParseError> {
	let mut fields: Vec<RawTaggedField> = Vec::new();

	while reader.words_remaining() > SIGNATURE_WORDS {
		let tag = reader.read_word()?;
		if tag.to_u8() == constants::TAG_PADDING {
			// padding carries no length word and no payload
			continue;
		}

		let length = reader.read_uint_be(2)? as usize;
		if reader.words_remaining() < SIGNATURE_WORDS
			|| length > reader.words_remaining() - SIGNATURE_WORDS
		{
			// the field runs into the trailing signature words
			return Err(ParseError::UnexpectedEndOfTaggedFields);
		}
		let field_words = reader.take(length)?;

		match parse_tagged_field(tag, field_words) {
			Ok(field) => fields.push(RawTaggedField::KnownSemantics(field)),
			Err(ParseError::Skip) => {
				let mut raw = Vec::with_capacity(3 + field_words.len());
				raw.push(tag);
				raw.push(u5::try_from_u8(((length >> 5) & 0x1f) as u8).expect("length < 1024"));
				raw.push(u5::try_from_u8((length & 0x1f) as u8).expect("value masked to 5 bits"));
				raw.extend_from_slice(field_words);
				fields.push(RawTaggedField::UnknownSemantics(raw));
			},
			Err(e) => return Err(e),
		}
	}

	Ok(fields)
}

fn parse_tagged_field(tag: u5, field_data: &[u5]) -> Result<TaggedField, ParseError> {
	match tag.to_u8() {
		constants::TAG_PAYMENT_HASH =>
			Ok(TaggedField::PaymentHash(Sha256::from_base32(field_data)?)),
		constants::TAG_PRIVATE_ROUTE =>
			Ok(TaggedField::PrivateRoute(PrivateRoute::from_base32(field_data)?)),
		constants::TAG_EXPIRY_TIME =>
			Ok(TaggedField::ExpiryTime(ExpiryTime::from_base32(field_data)?)),
		constants::TAG_FALLBACK =>
			Ok(TaggedField::Fallback(Fallback::from_base32(field_data)?)),
		constants::TAG_DESCRIPTION =>
			Ok(TaggedField::Description(Description::from_base32(field_data)?)),
		constants::TAG_PAYEE_PUB_KEY =>
			Ok(TaggedField::PayeePubKey(PayeePubKey::from_base32(field_data)?)),
		constants::TAG_DESCRIPTION_HASH =>
			Ok(TaggedField::DescriptionHash(Sha256::from_base32(field_data)?)),
		constants::TAG_MIN_FINAL_CLTV_EXPIRY =>
			Ok(TaggedField::MinFinalCltvExpiry(MinFinalCltvExpiry::from_base32(field_data)?)),
		_ => {
			// "A reader MUST skip over unknown fields"
			Err(ParseError::Skip)
		}
	}
}

impl FromBase32 for Sha256 {
	type Err = ParseError;

	fn from_base32(field_data: &[u5]) -> Result<Sha256, ParseError> {
		if field_data.len() != 52 {
			// "A reader MUST skip over […] p, h […] fields that do not have data_lengths of 52"
			Err(ParseError::Skip)
		} else {
			Ok(Sha256(sha256::Hash::from_slice(&words::words_to_bytes(field_data, false))
				.expect("52 words regroup to exactly 32 bytes")))
		}
	}
}

impl FromBase32 for Description {
	type Err = ParseError;

	fn from_base32(field_data: &[u5]) -> Result<Description, ParseError> {
		let bytes = words::words_to_bytes(field_data, false);
		let description = String::from_utf8(bytes).map_err(|_| ParseError::Skip)?;
		Ok(Description::new(description)
			.expect("Max len is 639=floor(1023*5/8) due to the 10 bit length field"))
	}
}

impl FromBase32 for PayeePubKey {
	type Err = ParseError;

	fn from_base32(field_data: &[u5]) -> Result<PayeePubKey, ParseError> {
		if field_data.len() != 53 {
			// "A reader MUST skip over […] n […] fields that do not have data_lengths of 53"
			Err(ParseError::Skip)
		} else {
			let data_bytes = words::words_to_bytes(field_data, false);
			let pub_key = PublicKey::from_slice(&data_bytes).map_err(|_| ParseError::Skip)?;
			Ok(pub_key.into())
		}
	}
}

impl FromBase32 for ExpiryTime {
	type Err = ParseError;

	fn from_base32(field_data: &[u5]) -> Result<ExpiryTime, ParseError> {
		match words::parse_uint_be(field_data) {
			Some(expiry) => Ok(ExpiryTime::from_seconds(expiry)),
			None => Err(ParseError::IntegerOverflowError),
		}
	}
}

impl FromBase32 for MinFinalCltvExpiry {
	type Err = ParseError;

	fn from_base32(field_data: &[u5]) -> Result<MinFinalCltvExpiry, ParseError> {
		match words::parse_uint_be(field_data) {
			Some(expiry) => Ok(MinFinalCltvExpiry(expiry)),
			None => Err(ParseError::IntegerOverflowError),
		}
	}
}

impl FromBase32 for Fallback {
	type Err = ParseError;

	fn from_base32(field_data: &[u5]) -> Result<Fallback, ParseError> {
		if field_data.is_empty() {
			return Err(ParseError::Skip);
		}

		let version = field_data[0];
		let bytes = words::words_to_bytes(&field_data[1..], false);

		match version.to_u8() {
			fallback_versions::VERSION_SEGWIT => {
				Ok(Fallback::SegWitProgram {
					version,
					program: bytes,
				})
			},
			fallback_versions::VERSION_P2PKH => {
				if bytes.len() != 20 {
					return Err(ParseError::Skip);
				}
				let mut pkh = [0u8; 20];
				pkh.copy_from_slice(&bytes);
				Ok(Fallback::PubKeyHash(pkh))
			},
			fallback_versions::VERSION_P2SH => {
				if bytes.len() != 20 {
					return Err(ParseError::Skip);
				}
				let mut sh = [0u8; 20];
				sh.copy_from_slice(&bytes);
				Ok(Fallback::ScriptHash(sh))
			},
			_ => Err(ParseError::Skip),
		}
	}
}

/// The packed size of one route hop: 33 byte pubkey, 8 byte short_channel_id, two 4 byte fees
/// and the 2 byte cltv_expiry_delta.
pub(crate) const ROUTE_HOP_BYTES: usize = 51;

impl FromBase32 for PrivateRoute {
	type Err = ParseError;

	fn from_base32(field_data: &[u5]) -> Result<PrivateRoute, ParseError> {
		let bytes = words::words_to_bytes(field_data, false);

		if bytes.len() % ROUTE_HOP_BYTES != 0 {
			return Err(ParseError::InvalidSliceLength("route hop".to_owned()));
		}

		let mut route_hops = Vec::with_capacity(bytes.len() / ROUTE_HOP_BYTES);
		for hop_bytes in bytes.chunks(ROUTE_HOP_BYTES) {
			let mut channel_id = [0u8; 8];
			channel_id.copy_from_slice(&hop_bytes[33..41]);
			let mut fee_base = [0u8; 4];
			fee_base.copy_from_slice(&hop_bytes[41..45]);
			let mut fee_proportional = [0u8; 4];
			fee_proportional.copy_from_slice(&hop_bytes[45..49]);
			let mut cltv_expiry_delta = [0u8; 2];
			cltv_expiry_delta.copy_from_slice(&hop_bytes[49..51]);

			route_hops.push(RouteHintHop {
				src_node_id: PublicKey::from_slice(&hop_bytes[0..33])
					.map_err(|_| ParseError::Skip)?,
				short_channel_id: u64::from_be_bytes(channel_id),
				fees: RoutingFees {
					base_msat: u32::from_be_bytes(fee_base),
					proportional_millionths: u32::from_be_bytes(fee_proportional),
				},
				cltv_expiry_delta: u16::from_be_bytes(cltv_expiry_delta),
			})
		}

		Ok(PrivateRoute(route_hops))
	}
}

#[cfg(test)]
mod test {
	use bech32::u5;
	use secp256k1::Secp256k1;
	use secp256k1::SecretKey;

	use core::str::FromStr;

	use crate::words::WordWriter;
	use crate::{ParseError, RawHrp, RawInvoice, SignedRawInvoice, TIMESTAMP_WORDS};

	/// Appends a real signature over `data` (produced with a throwaway key) plus the recovery
	/// flag and returns the final bech32 string.
	fn sign_data_part(hrp: &str, data: Vec<u5>) -> String {
		let hash = RawInvoice::hash_from_parts(hrp.as_bytes(), &data);
		let message = secp256k1::Message::from_slice(&hash).unwrap();
		let key = SecretKey::from_slice(&[42; 32]).unwrap();
		let signature = Secp256k1::new().sign_ecdsa_recoverable(&message, &key);
		let (recovery_id, signature_bytes) = signature.serialize_compact();

		let mut writer = WordWriter::new();
		for word in &data {
			writer.write_word(*word);
		}
		writer.write_bytes(&signature_bytes);
		writer.write_uint_be(recovery_id.to_i32() as u64, 1);

		bech32::encode(hrp, writer.into_words(), bech32::Variant::Bech32).unwrap()
	}

	fn timestamp_words(timestamp: u64) -> WordWriter {
		let mut writer = WordWriter::new();
		writer.write_uint_be(timestamp, TIMESTAMP_WORDS);
		writer
	}

	#[test]
	fn test_parse_currency_prefix() {
		use crate::Currency;

		assert_eq!("bc".parse::<Currency>(), Ok(Currency::Bitcoin));
		assert_eq!("tb".parse::<Currency>(), Ok(Currency::BitcoinTestnet));
		assert_eq!("bcrt".parse::<Currency>(), Ok(Currency::Regtest));
		assert_eq!("sb".parse::<Currency>(), Ok(Currency::Simnet));
		assert_eq!("something_else".parse::<Currency>(), Err(ParseError::UnknownCurrency))
	}

	#[test]
	fn test_parse_si_prefix() {
		use crate::SiPrefix;

		assert_eq!("m".parse::<SiPrefix>(), Ok(SiPrefix::Milli));
		assert_eq!("u".parse::<SiPrefix>(), Ok(SiPrefix::Micro));
		assert_eq!("n".parse::<SiPrefix>(), Ok(SiPrefix::Nano));
		assert_eq!("p".parse::<SiPrefix>(), Ok(SiPrefix::Pico));
		assert_eq!("fuel".parse::<SiPrefix>(), Err(ParseError::UnknownSiPrefix));
	}

	#[test]
	fn test_parse_raw_hrp() {
		use crate::{Currency, SiPrefix};

		let hrp = RawHrp::from_str("lnbc").unwrap();
		assert_eq!(hrp.currency, Currency::Bitcoin);
		assert_eq!(hrp.raw_amount, None);
		assert_eq!(hrp.si_prefix, None);

		let hrp = RawHrp::from_str("lnbc2500u").unwrap();
		assert_eq!(hrp.currency, Currency::Bitcoin);
		assert_eq!(hrp.raw_amount, Some(2500));
		assert_eq!(hrp.si_prefix, Some(SiPrefix::Micro));
		assert_eq!(hrp.raw_amount.unwrap() * hrp.si_prefix.unwrap().multiplier(), 2_500_000_000);

		let hrp = RawHrp::from_str("lntb20m").unwrap();
		assert_eq!(hrp.currency, Currency::BitcoinTestnet);
		assert_eq!(hrp.raw_amount, Some(20));
		assert_eq!(hrp.si_prefix, Some(SiPrefix::Milli));

		let hrp = RawHrp::from_str("lnbcrt").unwrap();
		assert_eq!(hrp.currency, Currency::Regtest);

		// an amount without a multiplier letter counts whole bitcoins
		let hrp = RawHrp::from_str("lnbc2").unwrap();
		assert_eq!(hrp.raw_amount, Some(2));
		assert_eq!(hrp.si_prefix, None);

		assert_eq!(RawHrp::from_str("bc2500u"), Err(ParseError::BadPrefix));
		assert_eq!(RawHrp::from_str("lnfoo"), Err(ParseError::UnknownCurrency));
		assert_eq!(RawHrp::from_str("lnbc2500x"), Err(ParseError::UnknownSiPrefix));
		assert_eq!(RawHrp::from_str("lnbc25m00"), Err(ParseError::BadPrefix));
		assert_eq!(RawHrp::from_str("lnbc2500u u"), Err(ParseError::BadPrefix));
		assert_eq!(RawHrp::from_str("lnbc0p"), Err(ParseError::InvalidAmount));
		assert_eq!(RawHrp::from_str("lnbc0"), Err(ParseError::InvalidAmount));
	}

	#[test]
	fn test_decode_minimal_invoice() {
		// a timestamp, no tagged fields and a garbage signature: structurally fine but the
		// signature can't verify
		let mut writer = timestamp_words(1496314658);
		for _ in 0..104 {
			writer.write_word(u5::try_from_u8(0).unwrap());
		}
		let encoded = bech32::encode("lnbc", writer.into_words(), bech32::Variant::Bech32).unwrap();

		assert_eq!(encoded.parse::<SignedRawInvoice>(), Err(ParseError::InvalidSignature));
	}

	#[test]
	fn test_decode_signed_minimal_invoice() {
		use crate::Currency;

		let writer = timestamp_words(1496314658);
		let encoded = sign_data_part("lnbc", writer.into_words());
		let invoice = encoded.parse::<SignedRawInvoice>().unwrap();

		assert_eq!(invoice.raw_invoice().currency(), Currency::Bitcoin);
		assert_eq!(invoice.raw_invoice().amount_pico_btc(), None);
		assert_eq!(invoice.raw_invoice().data.timestamp.as_unix_timestamp(), 1496314658);
		assert!(invoice.raw_invoice().data.tagged_fields.is_empty());
		assert!(invoice.used_sig_recovery());
		assert!(invoice.check_signature());
	}

	#[test]
	fn test_decode_too_short() {
		let writer = timestamp_words(1496314658);
		let encoded = bech32::encode("lnbc", writer.into_words(), bech32::Variant::Bech32).unwrap();
		assert_eq!(encoded.parse::<SignedRawInvoice>(), Err(ParseError::TooShortDataPart));
	}

	#[test]
	fn test_payment_hash_length_gates_field_semantics() {
		use crate::constants::TAG_PAYMENT_HASH;
		use crate::{RawTaggedField, TaggedField};

		// well-formed payment hash: 52 zero words
		let mut writer = timestamp_words(1496314658);
		writer.write_uint_be(TAG_PAYMENT_HASH as u64, 1);
		writer.write_uint_be(52, 2);
		writer.write_bytes(&[0; 32]);
		let invoice = sign_data_part("lnbc", writer.into_words())
			.parse::<SignedRawInvoice>().unwrap();

		assert_eq!(invoice.raw_invoice().data.tagged_fields.len(), 1);
		assert!(matches!(
			invoice.raw_invoice().data.tagged_fields[0],
			RawTaggedField::KnownSemantics(TaggedField::PaymentHash(_))
		));
		assert_eq!(invoice.raw_invoice().unknown_tagged_fields().count(), 0);

		// declared length 53: the very same kind of payload may not be interpreted
		let mut writer = timestamp_words(1496314658);
		writer.write_uint_be(TAG_PAYMENT_HASH as u64, 1);
		writer.write_uint_be(53, 2);
		writer.write_bytes(&[0; 32]);
		writer.write_uint_be(0, 1);
		let invoice = sign_data_part("lnbc", writer.into_words())
			.parse::<SignedRawInvoice>().unwrap();

		assert_eq!(invoice.raw_invoice().payment_hash(), None);
		assert_eq!(invoice.raw_invoice().unknown_tagged_fields().count(), 1);
		let raw = invoice.raw_invoice().unknown_tagged_fields().next().unwrap();
		assert_eq!(raw.len(), 3 + 53);
		assert_eq!(raw[0].to_u8(), TAG_PAYMENT_HASH);
	}

	#[test]
	fn test_padding_words_are_skipped() {
		use crate::constants::{TAG_PADDING, TAG_MIN_FINAL_CLTV_EXPIRY};

		let mut writer = timestamp_words(1496314658);
		writer.write_uint_be(TAG_PADDING as u64, 1);
		writer.write_uint_be(TAG_PADDING as u64, 1);
		writer.write_uint_be(TAG_MIN_FINAL_CLTV_EXPIRY as u64, 1);
		writer.write_uint_be(1, 2);
		writer.write_uint_be(12, 1);
		writer.write_uint_be(TAG_PADDING as u64, 1);
		let invoice = sign_data_part("lnbc", writer.into_words())
			.parse::<SignedRawInvoice>().unwrap();

		assert_eq!(invoice.raw_invoice().data.tagged_fields.len(), 1);
		assert_eq!(invoice.min_final_cltv_expiry(), 12);
	}

	#[test]
	fn test_unknown_tag_is_preserved() {
		use crate::RawTaggedField;

		// tag 16 carries payment secrets in newer BOLT11 revisions; here it is just opaque
		let mut writer = timestamp_words(1496314658);
		writer.write_uint_be(16, 1);
		writer.write_uint_be(52, 2);
		writer.write_bytes(&[0x11; 32]);
		let invoice = sign_data_part("lnbc", writer.into_words())
			.parse::<SignedRawInvoice>().unwrap();

		match &invoice.raw_invoice().data.tagged_fields[0] {
			RawTaggedField::UnknownSemantics(words) => {
				assert_eq!(words.len(), 3 + 52);
				assert_eq!(words[0].to_u8(), 16);
			},
			_ => panic!("tag 16 must not gain semantics"),
		}
	}

	#[test]
	fn test_unknown_fallback_version_is_preserved() {
		use crate::constants::TAG_FALLBACK;

		let mut writer = timestamp_words(1496314658);
		writer.write_uint_be(TAG_FALLBACK as u64, 1);
		writer.write_uint_be(33, 2);
		writer.write_uint_be(19, 1); // witness version 19 is not a known fallback
		writer.write_bytes(&[0x07; 20]);
		let invoice = sign_data_part("lnbc", writer.into_words())
			.parse::<SignedRawInvoice>().unwrap();

		assert!(invoice.raw_invoice().fallbacks().is_empty());
		assert_eq!(invoice.raw_invoice().unknown_tagged_fields().count(), 1);
	}

	#[test]
	fn test_partial_route_hop_is_fatal() {
		use crate::constants::TAG_PRIVATE_ROUTE;

		// 52 bytes is one byte past a whole hop
		let mut writer = timestamp_words(1496314658);
		writer.write_uint_be(TAG_PRIVATE_ROUTE as u64, 1);
		writer.write_uint_be(84, 2);
		writer.write_bytes(&[0; 52]);
		let res = sign_data_part("lnbc", writer.into_words()).parse::<SignedRawInvoice>();

		assert_eq!(res, Err(ParseError::InvalidSliceLength("route hop".to_owned())));
	}

	#[test]
	fn test_field_length_crossing_into_signature_is_fatal() {
		use crate::constants::TAG_DESCRIPTION;

		// the declared length extends into the final 104 words
		let mut writer = timestamp_words(1496314658);
		writer.write_uint_be(TAG_DESCRIPTION as u64, 1);
		writer.write_uint_be(80, 2);
		writer.write_bytes(&[0x61; 10]); // 16 words, far less than declared
		let encoded = sign_data_part("lnbc", writer.into_words());

		assert_eq!(encoded.parse::<SignedRawInvoice>(), Err(ParseError::UnexpectedEndOfTaggedFields));
	}
}
