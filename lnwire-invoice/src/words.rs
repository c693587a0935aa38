//! A linear cursor over the 5-bit words making up the data part of an invoice.
//!
//! The 5<->8 bit regrouping below is the canonical bech32 convert-bits computation: big-endian
//! bit concatenation, with the final group zero-padded on the low bits when writing and any
//! trailing partial byte discarded when reading (it encodes nothing).

use bech32::u5;

use crate::ParseError;

/// Reads 5-bit words off a slice, advancing a position. Every read past the end of the slice
/// fails with [`ParseError::UnexpectedEndOfTaggedFields`].
pub(crate) struct WordReader<'a> {
	words: &'a [u5],
	position: usize,
}

impl<'a> WordReader<'a> {
	pub(crate) fn new(words: &'a [u5]) -> WordReader<'a> {
		WordReader {
			words,
			position: 0,
		}
	}

	pub(crate) fn words_remaining(&self) -> usize {
		self.words.len() - self.position
	}

	/// Consumes `word_count` words and returns them as a subslice.
	pub(crate) fn take(&mut self, word_count: usize) -> Result<&'a [u5], ParseError> {
		if self.words_remaining() < word_count {
			return Err(ParseError::UnexpectedEndOfTaggedFields);
		}
		let words = &self.words[self.position..self.position + word_count];
		self.position += word_count;
		Ok(words)
	}

	pub(crate) fn read_word(&mut self) -> Result<u5, ParseError> {
		Ok(self.take(1)?[0])
	}

	/// Consumes `word_count` words and folds them most-significant-first into an unsigned
	/// integer.
	pub(crate) fn read_uint_be(&mut self, word_count: usize) -> Result<u64, ParseError> {
		let words = self.take(word_count)?;
		parse_uint_be(words).ok_or(ParseError::IntegerOverflowError)
	}

	/// Consumes `word_count` words and regroups them into bytes, dropping a trailing partial
	/// byte.
	pub(crate) fn read_bytes(&mut self, word_count: usize) -> Result<Vec<u8>, ParseError> {
		let words = self.take(word_count)?;
		Ok(words_to_bytes(words, false))
	}
}

/// Folds words most-significant-first into a u64, `None` on overflow.
pub(crate) fn parse_uint_be(words: &[u5]) -> Option<u64> {
	words.iter().try_fold(0u64, |acc, word| {
		acc.checked_mul(32)?.checked_add(word.to_u8() as u64)
	})
}

/// Appends 5-bit words to a growing data part.
pub(crate) struct WordWriter {
	words: Vec<u5>,
}

impl WordWriter {
	pub(crate) fn new() -> WordWriter {
		WordWriter {
			words: Vec::new(),
		}
	}

	pub(crate) fn write_word(&mut self, word: u5) {
		self.words.push(word);
	}

	/// Appends `word_count` words holding `value` most-significant-first; the low 5 bits of
	/// `value` land in the final word. `word_count` must be greater than zero.
	pub(crate) fn write_uint_be(&mut self, value: u64, word_count: usize) {
		debug_assert!(word_count > 0, "zero-width integers are not writable");
		for i in (0..word_count).rev() {
			let shift = i * 5;
			let word = if shift < 64 { ((value >> shift) & 0x1f) as u8 } else { 0 };
			self.words.push(u5::try_from_u8(word).expect("value masked to 5 bits"));
		}
	}

	/// Appends the 5-bit regrouping of `bytes`, zero-padding the final word on the low bits.
	pub(crate) fn write_bytes(&mut self, bytes: &[u8]) {
		bytes_to_words(bytes, &mut self.words);
	}

	pub(crate) fn into_words(self) -> Vec<u5> {
		self.words
	}
}

/// Regroups 5-bit words into bytes. With `pad` the final partial byte is emitted zero-padded on
/// the low bits, without it the trailing fragment is dropped.
pub(crate) fn words_to_bytes(words: &[u5], pad: bool) -> Vec<u8> {
	let mut result = Vec::with_capacity(words.len() * 5 / 8 + 1);
	let mut acc: u32 = 0;
	let mut bits: u32 = 0;
	for word in words {
		acc = (acc << 5) | word.to_u8() as u32;
		bits += 5;
		while bits >= 8 {
			bits -= 8;
			result.push(((acc >> bits) & 0xff) as u8);
		}
	}
	if pad && bits > 0 {
		result.push(((acc << (8 - bits)) & 0xff) as u8);
	}
	result
}

/// Regroups 5-bit words into bytes, zero-padding a trailing partial byte. This is the packing
/// used for the signature pre-image.
pub(crate) fn words_to_bytes_padded(words: &[u5]) -> Vec<u8> {
	words_to_bytes(words, true)
}

/// Regroups bytes into 5-bit words, zero-padding the final word on the low bits.
pub(crate) fn bytes_to_words(bytes: &[u8], result: &mut Vec<u5>) {
	let mut acc: u32 = 0;
	let mut bits: u32 = 0;
	for byte in bytes {
		acc = (acc << 8) | *byte as u32;
		bits += 8;
		while bits >= 5 {
			bits -= 5;
			result.push(u5::try_from_u8(((acc >> bits) & 0x1f) as u8).expect("value masked to 5 bits"));
		}
	}
	if bits > 0 {
		result.push(u5::try_from_u8(((acc << (5 - bits)) & 0x1f) as u8).expect("value masked to 5 bits"));
	}
}

#[cfg(test)]
mod test {
	use bech32::u5;
	use super::*;

	fn words(raw: &[u8]) -> Vec<u5> {
		raw.iter().map(|v| u5::try_from_u8(*v).unwrap()).collect()
	}

	#[test]
	fn regroup_known_values() {
		let mut out = Vec::new();
		bytes_to_words(&[0xff], &mut out);
		assert_eq!(out, words(&[31, 28]));

		let mut out = Vec::new();
		bytes_to_words(&[0x00, 0x01, 0x02, 0x03, 0x04], &mut out);
		assert_eq!(out, words(&[0, 0, 0, 16, 4, 0, 24, 4]));

		assert_eq!(words_to_bytes(&words(&[31, 28]), false), vec![0xff]);
		// the trailing 2 bits of padding are dropped without padding, kept with it
		assert_eq!(words_to_bytes_padded(&words(&[31, 28])), vec![0xff, 0x80]);
	}

	#[test]
	fn regroup_round_trip() {
		let bytes: Vec<u8> = (0u8..=255).collect();
		let mut as_words = Vec::new();
		bytes_to_words(&bytes, &mut as_words);
		assert_eq!(as_words.len(), (bytes.len() * 8 + 4) / 5);
		assert_eq!(words_to_bytes(&as_words, false), bytes);

		// a word vector whose bit length is a multiple of 40 survives both directions
		let start = words(&[1, 2, 3, 4, 5, 6, 7, 8]);
		let mut back = Vec::new();
		bytes_to_words(&words_to_bytes(&start, false), &mut back);
		assert_eq!(back, start);
	}

	#[test]
	fn uint_be_round_trip() {
		let mut writer = WordWriter::new();
		writer.write_uint_be(1496314658, 7);
		let stored = writer.into_words();
		assert_eq!(stored.len(), 7);

		let mut reader = WordReader::new(&stored);
		assert_eq!(reader.read_uint_be(7).unwrap(), 1496314658);
		assert_eq!(reader.words_remaining(), 0);
	}

	#[test]
	fn read_past_end() {
		let stored = words(&[1, 2, 3]);
		let mut reader = WordReader::new(&stored);
		assert_eq!(reader.read_bytes(4), Err(crate::ParseError::UnexpectedEndOfTaggedFields));
		// a failed read does not advance the cursor
		assert_eq!(reader.words_remaining(), 3);
		assert_eq!(reader.read_uint_be(3).unwrap(), 1 * 1024 + 2 * 32 + 3);
	}

	#[test]
	fn uint_overflow() {
		// 13 words can hold 65 bits
		let stored = words(&[31; 13]);
		let mut reader = WordReader::new(&stored);
		assert_eq!(reader.read_uint_be(13), Err(crate::ParseError::IntegerOverflowError));
	}
}
