#![deny(missing_docs)]
#![deny(non_upper_case_globals)]
#![deny(non_camel_case_types)]
#![deny(non_snake_case)]
#![deny(unused_mut)]

//! This crate provides data structures to represent
//! [lightning BOLT11](https://github.com/lightning/bolts/blob/master/11-payment-encoding.md)
//! invoices and functions to create, encode and decode these.
//!
//!   * For parsing use `str::parse::<SignedRawInvoice>(&self)` (see the docs of
//!     `impl FromStr for SignedRawInvoice`)
//!   * For constructing invoices build a [`RawInvoice`] and call [`RawInvoice::sign`]
//!   * For serializing invoices use the `Display`/`ToString` traits

extern crate bech32;
extern crate bitcoin_hashes;
extern crate secp256k1;
#[cfg(feature = "serde")]
extern crate serde;

use bech32::u5;
use bitcoin_hashes::Hash;
use bitcoin_hashes::sha256;

use secp256k1::PublicKey;
use secp256k1::{Message, Secp256k1};
use secp256k1::ecdsa::RecoverableSignature;

use core::fmt::{Display, Formatter, self};
use core::iter::FilterMap;
use core::num::ParseIntError;
use core::ops::Deref;
use core::slice::Iter;
use core::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Deserializer, Serialize, Serializer, de::Error};

mod de;
mod ser;
mod words;

/// Errors that indicate what is wrong with the invoice. They have some granularity for debug
/// reasons, but should generally result in an "invalid BOLT11 invoice" message for the user.
#[allow(missing_docs)]
#[derive(PartialEq, Eq, Debug, Clone)]
pub enum ParseError {
	Bech32Error(bech32::Error),
	ParseAmountError(ParseIntError),
	MalformedSignature(secp256k1::Error),
	BadPrefix,
	UnknownCurrency,
	UnknownSiPrefix,
	InvalidAmount,
	TooShortDataPart,
	UnexpectedEndOfTaggedFields,
	IntegerOverflowError,
	InvalidSliceLength(String),
	InvalidRecoveryId,
	InvalidSignature,

	/// Not an error, but used internally to signal that a part of the invoice should be ignored
	/// according to BOLT11
	Skip,
}

impl Display for ParseError {
	fn fmt(&self, f: &mut Formatter) -> fmt::Result {
		match *self {
			ParseError::Bech32Error(ref e) => write!(f, "Invalid bech32: {}", e),
			ParseError::ParseAmountError(ref e) => write!(f, "Invalid amount in hrp: {}", e),
			ParseError::MalformedSignature(ref e) => write!(f, "Invalid secp256k1 signature: {}", e),
			ParseError::BadPrefix => f.write_str("Did not begin with 'ln'"),
			ParseError::UnknownCurrency => f.write_str("Currency code unknown"),
			ParseError::UnknownSiPrefix => f.write_str("Unknown SI prefix"),
			ParseError::InvalidAmount => f.write_str("Amount has to be positive when specified"),
			ParseError::TooShortDataPart => {
				f.write_str("Data part too short (should be at least 111 bech32 chars long)")
			},
			ParseError::UnexpectedEndOfTaggedFields => {
				f.write_str("Tagged fields part ended unexpectedly")
			},
			ParseError::IntegerOverflowError => {
				f.write_str("Number could not be stored in a u64")
			},
			ParseError::InvalidSliceLength(ref function) => {
				write!(f, "Slice in function {} had the wrong length", function)
			},
			ParseError::InvalidRecoveryId => {
				f.write_str("Recovery id is out of range (should be in [0,3])")
			},
			ParseError::InvalidSignature => f.write_str("Signature invalid"),
			ParseError::Skip => {
				f.write_str("Tagged field should be skipped")
			},
		}
	}
}

impl std::error::Error for ParseError { }

impl From<bech32::Error> for ParseError {
	fn from(e: bech32::Error) -> Self {
		ParseError::Bech32Error(e)
	}
}

/// The number of bits used to represent timestamps as defined in BOLT 11.
const TIMESTAMP_BITS: usize = 35;

/// The number of 5-bit words the timestamp occupies on the wire.
pub(crate) const TIMESTAMP_WORDS: usize = TIMESTAMP_BITS / 5;

/// The number of 5-bit words at the end of the data part holding the 512-bit signature and the
/// recovery flag.
pub(crate) const SIGNATURE_WORDS: usize = 104;

/// The maximum timestamp as seconds since the Unix epoch allowed by [BOLT 11].
///
/// [BOLT 11]: https://github.com/lightning/bolts/blob/master/11-payment-encoding.md
pub const MAX_TIMESTAMP: u64 = (1 << TIMESTAMP_BITS) - 1;

/// Default expiry time as defined by [BOLT 11].
///
/// [BOLT 11]: https://github.com/lightning/bolts/blob/master/11-payment-encoding.md
pub const DEFAULT_EXPIRY_TIME: u64 = 3600;

/// Default minimum final CLTV expiry as defined by [BOLT 11].
///
/// [BOLT 11]: https://github.com/lightning/bolts/blob/master/11-payment-encoding.md
pub const DEFAULT_MIN_FINAL_CLTV_EXPIRY: u64 = 9;

/// Represents a signed `RawInvoice` whose signature has been checked against the payee public
/// key, as produced by parsing or by [`RawInvoice::sign`].
///
/// # Invariants
/// The hash is the SHA-256 digest of the invoice pre-image (hrp bytes followed by the
/// byte-packed data part without the trailing signature words) and is what the signature
/// commits to.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct SignedRawInvoice {
	/// The raw invoice that the signature belongs to
	raw_invoice: RawInvoice,

	/// Hash of the `RawInvoice` that will be used to check the signature.
	///
	/// * if the `SignedRawInvoice` was deserialized the hash is of from the original encoded
	/// form, since it's not guaranteed that encoding it again will lead to the same result since
	/// integers could have been encoded with leading zeroes etc.
	/// * if the `SignedRawInvoice` was constructed manually the hash will be the calculated hash
	/// from the `RawInvoice`
	hash: [u8; 32],

	/// signature of the payment request
	signature: InvoiceSignature,

	/// The public key of the payee, either taken from the payee pub key field or recovered from
	/// the signature
	payee_pub_key: PayeePubKey,

	/// True if `payee_pub_key` came from ECDSA public key recovery rather than an explicit
	/// payee field
	used_sig_recovery: bool,
}

/// Represents an syntactically correct Invoice for a payment on the lightning network,
/// but without the signature information.
/// De- and encoding should not lead to information loss but may lead to different hashes.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct RawInvoice {
	/// human readable part
	pub hrp: RawHrp,

	/// data part
	pub data: RawDataPart,
}

/// Data of the `RawInvoice` that is encoded in the human readable part
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct RawHrp {
	/// The currency deferred from the 3rd and 4th character of the bech32 transaction
	pub currency: Currency,

	/// The amount that, multiplied by the SI prefix, has to be payed
	pub raw_amount: Option<u64>,

	/// SI prefix that gets multiplied with the `raw_amount`
	pub si_prefix: Option<SiPrefix>,
}

/// Data of the `RawInvoice` that is encoded in the data part
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct RawDataPart {
	/// generation time of the invoice
	pub timestamp: PositiveTimestamp,

	/// tagged fields of the payment request, in wire order
	pub tagged_fields: Vec<RawTaggedField>,
}

/// A timestamp that refers to a date after 1 January 1970.
///
/// # Invariants
///
/// The Unix timestamp representing the stored time has to be positive and no greater than
/// [`MAX_TIMESTAMP`].
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct PositiveTimestamp(Duration);

/// SI prefixes for the human readable part
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum SiPrefix {
	/// 10^-3
	Milli,
	/// 10^-6
	Micro,
	/// 10^-9
	Nano,
	/// 10^-12
	Pico,
}

impl SiPrefix {
	/// Returns the multiplier to go from a BTC value to picoBTC implied by this SiPrefix.
	/// This is effectively 10^12 * the prefix multiplier
	pub fn multiplier(&self) -> u64 {
		match *self {
			SiPrefix::Milli => 1_000_000_000,
			SiPrefix::Micro => 1_000_000,
			SiPrefix::Nano => 1_000,
			SiPrefix::Pico => 1,
		}
	}

	/// Returns all enum variants of `SiPrefix` sorted in descending order of their associated
	/// multiplier.
	pub fn values_desc() -> &'static [SiPrefix] {
		use crate::SiPrefix::*;
		static VALUES: [SiPrefix; 4] = [Milli, Micro, Nano, Pico];
		&VALUES
	}
}

/// The number of pico-units a whole unit of the base asset consists of, used when no SI prefix
/// letter is present in the human readable part.
pub(crate) const PICO_PER_WHOLE: u64 = 1_000_000_000_000;

/// Enum representing the crypto currencies (or networks) supported by this library
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Currency {
	/// Bitcoin mainnet
	Bitcoin,

	/// Bitcoin testnet
	BitcoinTestnet,

	/// Bitcoin regtest
	Regtest,

	/// Bitcoin simnet
	Simnet,
}

/// Tagged field which may have an unknown tag
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RawTaggedField {
	/// Parsed tagged field with known tag
	KnownSemantics(TaggedField),
	/// tagged field which was not parsed due to an unknown tag or undefined field semantics,
	/// stored as the complete word run (tag, length and payload) so re-encoding is lossless
	UnknownSemantics(Vec<u5>),
}

/// Tagged field with known tag
///
/// For descriptions of the enum values please refer to the enclosed type's docs.
#[allow(missing_docs)]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TaggedField {
	PaymentHash(Sha256),
	PrivateRoute(PrivateRoute),
	ExpiryTime(ExpiryTime),
	Fallback(Fallback),
	Description(Description),
	PayeePubKey(PayeePubKey),
	DescriptionHash(Sha256),
	MinFinalCltvExpiry(MinFinalCltvExpiry),
}

/// SHA-256 hash
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Sha256(pub sha256::Hash);

/// Description string
///
/// # Invariants
/// The description can be at most 639 __bytes__ long
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Description(String);

/// Payee public key
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PayeePubKey(pub PublicKey);

/// Positive duration that defines when (relatively to the timestamp) in the future the invoice
/// expires
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ExpiryTime(Duration);

/// `min_final_cltv_expiry` to use for the last HTLC in the route
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MinFinalCltvExpiry(pub u64);

/// Fallback address in case no LN payment is possible
#[allow(missing_docs)]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Fallback {
	SegWitProgram {
		version: u5,
		program: Vec<u8>,
	},
	PubKeyHash([u8; 20]),
	ScriptHash([u8; 20]),
}

/// Recoverable signature
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InvoiceSignature(pub RecoverableSignature);

/// Private routing information
///
/// # Invariants
/// The encoded route has to be <1024 5bit characters long (<=12 hops)
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PrivateRoute(pub Vec<RouteHintHop>);

/// A channel descriptor for a hop along a payment path, as packed into the `r` field
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RouteHintHop {
	/// The node_id of the non-target end of the route
	pub src_node_id: PublicKey,
	/// The short_channel_id of this channel
	pub short_channel_id: u64,
	/// The fees which must be paid to use this channel
	pub fees: RoutingFees,
	/// The difference in CLTV values between this node and the next node.
	pub cltv_expiry_delta: u16,
}

/// Fees for routing via a given channel or a node
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RoutingFees {
	/// Flat amount charged for using a channel
	pub base_msat: u32,
	/// Amount charged per transferred, in millionths of the payment amount
	pub proportional_millionths: u32,
}

/// Tag constants as specified in BOLT11
#[allow(missing_docs)]
pub mod constants {
	pub const TAG_PADDING: u8 = 0;
	pub const TAG_PAYMENT_HASH: u8 = 1;
	pub const TAG_PRIVATE_ROUTE: u8 = 3;
	pub const TAG_EXPIRY_TIME: u8 = 6;
	pub const TAG_FALLBACK: u8 = 9;
	pub const TAG_DESCRIPTION: u8 = 13;
	pub const TAG_PAYEE_PUB_KEY: u8 = 19;
	pub const TAG_DESCRIPTION_HASH: u8 = 23;
	pub const TAG_MIN_FINAL_CLTV_EXPIRY: u8 = 24;
}

/// Fallback address version constants as specified in BOLT11
#[allow(missing_docs)]
pub mod fallback_versions {
	pub const VERSION_SEGWIT: u8 = 0;
	pub const VERSION_P2PKH: u8 = 17;
	pub const VERSION_P2SH: u8 = 18;
}

impl SignedRawInvoice {
	/// Disassembles the `SignedRawInvoice` into its three parts:
	///  1. raw invoice
	///  2. hash of the raw invoice
	///  3. signature
	pub fn into_parts(self) -> (RawInvoice, [u8; 32], InvoiceSignature) {
		(self.raw_invoice, self.hash, self.signature)
	}

	/// The `RawInvoice` which was signed.
	pub fn raw_invoice(&self) -> &RawInvoice {
		&self.raw_invoice
	}

	/// The hash of the `RawInvoice` that was signed.
	pub fn signable_hash(&self) -> &[u8; 32] {
		&self.hash
	}

	/// InvoiceSignature for the invoice.
	pub fn signature(&self) -> &InvoiceSignature {
		&self.signature
	}

	/// The public key of the payee this invoice pays to.
	pub fn payee_pub_key(&self) -> &PublicKey {
		&self.payee_pub_key.0
	}

	/// Whether [`Self::payee_pub_key`] was recovered from the signature rather than read from an
	/// explicit payee pub key field.
	pub fn used_sig_recovery(&self) -> bool {
		self.used_sig_recovery
	}

	/// Recovers the public key used for signing the invoice from the recoverable signature.
	pub fn recover_payee_pub_key(&self) -> Result<PayeePubKey, secp256k1::Error> {
		let hash = Message::from_slice(&self.hash[..])
			.expect("Hash is 32 bytes long, same as MESSAGE_SIZE");

		Ok(PayeePubKey(Secp256k1::verification_only().recover_ecdsa(
			&hash,
			&self.signature
		)?))
	}

	/// Checks if the signature is valid for the included payee public key or, if none exists,
	/// for the recovered signature (which should always be true?).
	pub fn check_signature(&self) -> bool {
		let included_pub_key = self.raw_invoice.payee_pub_key();

		let mut recovered_pub_key = Option::None;
		if included_pub_key.is_none() {
			let recovered = match self.recover_payee_pub_key() {
				Ok(pk) => pk,
				Err(_) => return false,
			};
			recovered_pub_key = Some(recovered);
		}

		let pub_key = included_pub_key.or_else(|| recovered_pub_key.as_ref())
			.expect("One is always present");

		let hash = Message::from_slice(&self.hash[..])
			.expect("Hash is 32 bytes long, same as MESSAGE_SIZE");

		let secp_context = Secp256k1::verification_only();
		let verification_result = secp_context.verify_ecdsa(
			&hash,
			&self.signature.to_standard(),
			pub_key
		);

		match verification_result {
			Ok(()) => true,
			Err(_) => false,
		}
	}

	/// Returns the invoice's expiry time in seconds, or [`DEFAULT_EXPIRY_TIME`] when the field
	/// is absent.
	pub fn expiry_time(&self) -> Duration {
		self.raw_invoice.expiry_time()
			.map(|x| *x.as_duration())
			.unwrap_or(Duration::from_secs(DEFAULT_EXPIRY_TIME))
	}

	/// Returns the invoice's `min_final_cltv_expiry` time, if present, otherwise
	/// [`DEFAULT_MIN_FINAL_CLTV_EXPIRY`].
	pub fn min_final_cltv_expiry(&self) -> u64 {
		self.raw_invoice.min_final_cltv_expiry()
			.map(|x| x.0)
			.unwrap_or(DEFAULT_MIN_FINAL_CLTV_EXPIRY)
	}
}

/// Finds the first element of an enum stream of a given variant and extracts one member of the
/// variant. If no element was found `None` gets returned.
macro_rules! find_extract {
	($iter:expr, $enm:pat, $enm_var:ident) => {
		find_all_extract!($iter, $enm, $enm_var).next()
	};
}

/// Finds the all elements of an enum stream of a given variant and extracts one member of the
/// variant through an iterator.
macro_rules! find_all_extract {
	($iter:expr, $enm:pat, $enm_var:ident) => {
		$iter.filter_map(|tf| match *tf {
			$enm => Some($enm_var),
			_ => None,
		})
	};
}

#[allow(missing_docs)]
impl RawInvoice {
	/// Hash the HRP as bytes and signatureless data part.
	fn hash_from_parts(hrp_bytes: &[u8], data_without_signature: &[u5]) -> [u8; 32] {
		let mut preimage = Vec::from(hrp_bytes);
		preimage.extend_from_slice(&words::words_to_bytes_padded(data_without_signature));
		let mut hash: [u8; 32] = Default::default();
		hash.copy_from_slice(&sha256::Hash::hash(&preimage)[..]);
		hash
	}

	/// Calculate the hash of the encoded `RawInvoice` which should be signed.
	pub fn signable_hash(&self) -> [u8; 32] {
		RawInvoice::hash_from_parts(
			self.hrp.to_string().as_bytes(),
			&self.data.to_words()
		)
	}

	/// Signs the invoice using the supplied `sign_method`. This function MAY fail with an error
	/// of type `E`, but the signature produced on success MUST be a recoverable signature valid
	/// for the given hash.
	pub fn sign<F, E>(self, sign_method: F) -> Result<SignedRawInvoice, E>
		where F: FnOnce(&Message) -> Result<RecoverableSignature, E>
	{
		let raw_hash = self.signable_hash();
		let hash = Message::from_slice(&raw_hash[..])
			.expect("Hash is 32 bytes long, same as MESSAGE_SIZE");
		let signature = sign_method(&hash)?;

		let (payee_pub_key, used_sig_recovery) = match self.payee_pub_key() {
			Some(pk) => (pk.clone(), false),
			None => {
				let recovered = Secp256k1::verification_only().recover_ecdsa(&hash, &signature)
					.expect("the produced signature must be recoverable for the signed hash");
				(PayeePubKey(recovered), true)
			},
		};

		Ok(SignedRawInvoice {
			raw_invoice: self,
			hash: raw_hash,
			signature: InvoiceSignature(signature),
			payee_pub_key,
			used_sig_recovery,
		})
	}

	/// Returns an iterator over all tagged fields with known semantics.
	pub fn known_tagged_fields(&self)
		-> FilterMap<Iter<RawTaggedField>, fn(&RawTaggedField) -> Option<&TaggedField>>
	{
		fn match_raw(raw: &RawTaggedField) -> Option<&TaggedField> {
			match *raw {
				RawTaggedField::KnownSemantics(ref tf) => Some(tf),
				_ => None,
			}
		}

		self.data.tagged_fields.iter().filter_map(match_raw)
	}

	/// Returns an iterator over the tagged fields that were not interpreted, as raw word runs.
	pub fn unknown_tagged_fields(&self)
		-> FilterMap<Iter<RawTaggedField>, fn(&RawTaggedField) -> Option<&Vec<u5>>>
	{
		fn match_raw(raw: &RawTaggedField) -> Option<&Vec<u5>> {
			match *raw {
				RawTaggedField::UnknownSemantics(ref words) => Some(words),
				_ => None,
			}
		}

		self.data.tagged_fields.iter().filter_map(match_raw)
	}

	pub fn payment_hash(&self) -> Option<&Sha256> {
		find_extract!(self.known_tagged_fields(), TaggedField::PaymentHash(ref x), x)
	}

	pub fn description(&self) -> Option<&Description> {
		find_extract!(self.known_tagged_fields(), TaggedField::Description(ref x), x)
	}

	pub fn payee_pub_key(&self) -> Option<&PayeePubKey> {
		find_extract!(self.known_tagged_fields(), TaggedField::PayeePubKey(ref x), x)
	}

	pub fn description_hash(&self) -> Option<&Sha256> {
		find_extract!(self.known_tagged_fields(), TaggedField::DescriptionHash(ref x), x)
	}

	pub fn expiry_time(&self) -> Option<&ExpiryTime> {
		find_extract!(self.known_tagged_fields(), TaggedField::ExpiryTime(ref x), x)
	}

	pub fn min_final_cltv_expiry(&self) -> Option<&MinFinalCltvExpiry> {
		find_extract!(self.known_tagged_fields(), TaggedField::MinFinalCltvExpiry(ref x), x)
	}

	pub fn fallbacks(&self) -> Vec<&Fallback> {
		find_all_extract!(self.known_tagged_fields(), TaggedField::Fallback(ref x), x).collect()
	}

	pub fn private_routes(&self) -> Vec<&PrivateRoute> {
		find_all_extract!(self.known_tagged_fields(), TaggedField::PrivateRoute(ref x), x).collect()
	}

	pub fn amount_pico_btc(&self) -> Option<u64> {
		self.hrp.raw_amount.map(|v| {
			v * self.hrp.si_prefix.as_ref().map_or(PICO_PER_WHOLE, |si| { si.multiplier() })
		})
	}

	pub fn currency(&self) -> Currency {
		self.hrp.currency.clone()
	}
}

impl RawHrp {
	/// Builds the human readable part for the given currency and pico-BTC amount, picking the
	/// shortest amount rendering: the biggest SI multiplier (or no multiplier at all for whole
	/// bitcoins) under which the amount is a whole number.
	pub fn from_amount_pico(currency: Currency, amount_pico_btc: Option<u64>) -> RawHrp {
		let (raw_amount, si_prefix) = match amount_pico_btc {
			None => (None, None),
			Some(amount) if amount % PICO_PER_WHOLE == 0 => (Some(amount / PICO_PER_WHOLE), None),
			Some(amount) => {
				let si_prefix = *SiPrefix::values_desc()
					.iter()
					.find(|prefix| amount % prefix.multiplier() == 0)
					.expect("Pico should always match");
				(Some(amount / si_prefix.multiplier()), Some(si_prefix))
			},
		};

		RawHrp {
			currency,
			raw_amount,
			si_prefix,
		}
	}
}

impl PositiveTimestamp {
	/// Creates a `PositiveTimestamp` from a Unix timestamp in the range `0..=MAX_TIMESTAMP`.
	///
	/// Otherwise, returns a [`CreationError::TimestampOutOfBounds`].
	pub fn from_unix_timestamp(unix_seconds: u64) -> Result<Self, CreationError> {
		if unix_seconds <= MAX_TIMESTAMP {
			Ok(Self(Duration::from_secs(unix_seconds)))
		} else {
			Err(CreationError::TimestampOutOfBounds)
		}
	}

	/// Creates a `PositiveTimestamp` from a [`Duration`] since the Unix epoch in the range
	/// `0..=MAX_TIMESTAMP`.
	///
	/// Note that the subsecond part is dropped as it is not representable in BOLT 11 invoices.
	pub fn from_duration_since_epoch(duration: Duration) -> Result<Self, CreationError> {
		Self::from_unix_timestamp(duration.as_secs())
	}

	/// Returns the Unix timestamp representing the stored time
	pub fn as_unix_timestamp(&self) -> u64 {
		self.0.as_secs()
	}

	/// Returns the duration of the stored time since the Unix epoch
	pub fn as_duration_since_epoch(&self) -> Duration {
		self.0
	}
}

impl From<TaggedField> for RawTaggedField {
	fn from(tf: TaggedField) -> Self {
		RawTaggedField::KnownSemantics(tf)
	}
}

impl TaggedField {
	/// Numeric representation of the field's tag
	pub fn tag(&self) -> u5 {
		let tag = match *self {
			TaggedField::PaymentHash(_) => constants::TAG_PAYMENT_HASH,
			TaggedField::PrivateRoute(_) => constants::TAG_PRIVATE_ROUTE,
			TaggedField::ExpiryTime(_) => constants::TAG_EXPIRY_TIME,
			TaggedField::Fallback(_) => constants::TAG_FALLBACK,
			TaggedField::Description(_) => constants::TAG_DESCRIPTION,
			TaggedField::PayeePubKey(_) => constants::TAG_PAYEE_PUB_KEY,
			TaggedField::DescriptionHash(_) => constants::TAG_DESCRIPTION_HASH,
			TaggedField::MinFinalCltvExpiry(_) => constants::TAG_MIN_FINAL_CLTV_EXPIRY,
		};

		u5::try_from_u8(tag).expect("all tags defined are <32")
	}
}

impl Description {
	/// Creates a new `Description` if `description` is at most 639 __bytes__ long,
	/// returns `CreationError::DescriptionTooLong` otherwise
	///
	/// Please note that single characters may use more than one byte due to UTF8 encoding.
	pub fn new(description: String) -> Result<Description, CreationError> {
		if description.len() > 639 {
			Err(CreationError::DescriptionTooLong)
		} else {
			Ok(Description(description))
		}
	}

	/// Returns the underlying description `String`
	pub fn into_inner(self) -> String {
		self.0
	}
}

impl Into<String> for Description {
	fn into(self) -> String {
		self.into_inner()
	}
}

impl Deref for Description {
	type Target = str;

	fn deref(&self) -> &str {
		&self.0
	}
}

impl From<PublicKey> for PayeePubKey {
	fn from(pk: PublicKey) -> Self {
		PayeePubKey(pk)
	}
}

impl Deref for PayeePubKey {
	type Target = PublicKey;

	fn deref(&self) -> &PublicKey {
		&self.0
	}
}

impl ExpiryTime {
	/// Construct an `ExpiryTime` from seconds.
	pub fn from_seconds(seconds: u64) -> ExpiryTime {
		ExpiryTime(Duration::from_secs(seconds))
	}

	/// Returns the expiry time in seconds
	pub fn as_seconds(&self) -> u64 {
		self.0.as_secs()
	}

	/// Returns a reference to the underlying `Duration` (=expiry time)
	pub fn as_duration(&self) -> &Duration {
		&self.0
	}
}

impl PrivateRoute {
	/// Creates a new (partial) route from a list of hops
	pub fn new(hops: Vec<RouteHintHop>) -> Result<PrivateRoute, CreationError> {
		if hops.len() <= 12 {
			Ok(PrivateRoute(hops))
		} else {
			Err(CreationError::RouteTooLong)
		}
	}

	/// Returns the underlying list of hops
	pub fn into_inner(self) -> Vec<RouteHintHop> {
		self.0
	}
}

impl Deref for PrivateRoute {
	type Target = Vec<RouteHintHop>;

	fn deref(&self) -> &Vec<RouteHintHop> {
		&self.0
	}
}

impl Deref for InvoiceSignature {
	type Target = RecoverableSignature;

	fn deref(&self) -> &RecoverableSignature {
		&self.0
	}
}

impl Deref for SignedRawInvoice {
	type Target = RawInvoice;

	fn deref(&self) -> &RawInvoice {
		&self.raw_invoice
	}
}

/// Errors that may occur when constructing a new `RawInvoice`
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum CreationError {
	/// The supplied description string was longer than 639 __bytes__ (see [`Description::new`])
	DescriptionTooLong,

	/// The specified route has too many hops and can't be encoded
	RouteTooLong,

	/// The Unix timestamp of the supplied date is less than zero or greater than 35-bits
	TimestampOutOfBounds,

	/// The supplied amount was zero, which invoices may not carry
	InvalidAmount,
}

impl Display for CreationError {
	fn fmt(&self, f: &mut Formatter) -> fmt::Result {
		match self {
			CreationError::DescriptionTooLong => f.write_str("The supplied description string was longer than 639 bytes"),
			CreationError::RouteTooLong => f.write_str("The specified route has too many hops and can't be encoded"),
			CreationError::TimestampOutOfBounds => f.write_str("The Unix timestamp of the supplied date is less than zero or greater than 35-bits"),
			CreationError::InvalidAmount => f.write_str("The supplied amount has to be positive"),
		}
	}
}

impl std::error::Error for CreationError { }

#[cfg(feature = "serde")]
impl Serialize for SignedRawInvoice {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error> where S: Serializer {
		serializer.serialize_str(self.to_string().as_str())
	}
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for SignedRawInvoice {
	fn deserialize<D>(deserializer: D) -> Result<SignedRawInvoice, D::Error> where D: Deserializer<'de> {
		let bolt11 = String::deserialize(deserializer)?
			.parse::<SignedRawInvoice>()
			.map_err(|e| D::Error::custom(format!("{:?}", e)))?;

		Ok(bolt11)
	}
}
