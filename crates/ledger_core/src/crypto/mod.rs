//! Field sealing.
//!
//! The core never decides how fields are protected; it calls a
//! [`FieldCipher`]. Sealed payloads are the canonical CBOR encoding of the
//! plaintext [`FieldValue`], passed through the cipher.
//!
//! [`PlainCipher`] is the identity cipher. With the `encryption` feature,
//! `AesFieldCipher` seals with AES-256-GCM, binding each payload to its field.
//!
//! ```ignore
//! use ledger_core::crypto::{AesFieldCipher, FieldKey};
//!
//! let cipher = AesFieldCipher::new(FieldKey::generate());
//! let data_set = DataSet::new(config, statics).with_cipher(Arc::new(cipher));
//! ```

#[cfg(feature = "encryption")]
mod encrypted;

#[cfg(feature = "encryption")]
pub use encrypted::*;

use crate::error::{CoreError, CoreResult};
use crate::value::{EncryptedValue, FieldId, FieldValue};

/// Encrypt/decrypt capability keyed by field.
pub trait FieldCipher: Send + Sync {
    /// Seals plaintext bytes of a field.
    fn encrypt(&self, field: FieldId, plaintext: &[u8]) -> CoreResult<Vec<u8>>;

    /// Opens sealed bytes of a field.
    fn decrypt(&self, field: FieldId, sealed: &[u8]) -> CoreResult<Vec<u8>>;
}

/// Cipher that stores the encoded plaintext as is.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainCipher;

impl FieldCipher for PlainCipher {
    fn encrypt(&self, _field: FieldId, plaintext: &[u8]) -> CoreResult<Vec<u8>> {
        Ok(plaintext.to_vec())
    }

    fn decrypt(&self, _field: FieldId, sealed: &[u8]) -> CoreResult<Vec<u8>> {
        Ok(sealed.to_vec())
    }
}

/// Seals a plaintext value.
pub fn seal(cipher: &dyn FieldCipher, field: FieldId, value: FieldValue) -> CoreResult<FieldValue> {
    let plain = match value {
        FieldValue::Encrypted(sealed) => sealed.plain().clone(),
        other => other,
    };
    let mut encoded = Vec::new();
    ciborium::into_writer(&plain, &mut encoded).map_err(|e| CoreError::codec(e.to_string()))?;
    let sealed = cipher.encrypt(field, &encoded)?;
    Ok(FieldValue::Encrypted(EncryptedValue::new(plain, sealed)))
}

/// Opens sealed bytes into a sealed value pair.
pub fn open(cipher: &dyn FieldCipher, field: FieldId, sealed: &[u8]) -> CoreResult<FieldValue> {
    let encoded = cipher.decrypt(field, sealed)?;
    let plain: FieldValue =
        ciborium::from_reader(encoded.as_slice()).map_err(|e| CoreError::codec(e.to_string()))?;
    if matches!(plain, FieldValue::Encrypted(_)) {
        return Err(CoreError::codec("nested sealed value"));
    }
    Ok(FieldValue::Encrypted(EncryptedValue::new(
        plain,
        sealed.to_vec(),
    )))
}

/// Key-less stand-ins when the `encryption` feature is disabled.
#[cfg(not(feature = "encryption"))]
mod stub {
    use crate::error::{CoreError, CoreResult};

    /// Field key (stub when encryption disabled).
    #[derive(Debug, Clone)]
    pub struct FieldKey {
        _private: (),
    }

    impl FieldKey {
        /// Always returns an error when encryption is disabled.
        pub fn from_bytes(_bytes: &[u8]) -> CoreResult<Self> {
            Err(CoreError::encryption_not_enabled())
        }

        /// Always returns an error when encryption is disabled.
        pub fn derive_from_password(_password: &[u8], _salt: &[u8]) -> CoreResult<Self> {
            Err(CoreError::encryption_not_enabled())
        }
    }
}

#[cfg(not(feature = "encryption"))]
pub use stub::*;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Currency, Money};

    /// Reverses bytes so sealed output visibly differs from the encoding.
    struct ReverseCipher;

    impl FieldCipher for ReverseCipher {
        fn encrypt(&self, field: FieldId, plaintext: &[u8]) -> CoreResult<Vec<u8>> {
            let mut out: Vec<u8> = plaintext.iter().rev().copied().collect();
            out.push(field.tag());
            Ok(out)
        }

        fn decrypt(&self, field: FieldId, sealed: &[u8]) -> CoreResult<Vec<u8>> {
            match sealed.split_last() {
                Some((tag, body)) if *tag == field.tag() => Ok(body.iter().rev().copied().collect()),
                _ => Err(CoreError::decryption_failed("field tag mismatch")),
            }
        }
    }

    #[test]
    fn seal_then_open_preserves_plaintext() {
        let value = FieldValue::Money(Money::new(1250, Currency::new("GBP")));
        let sealed = seal(&ReverseCipher, FieldId::OpeningBalance, value.clone()).unwrap();
        let FieldValue::Encrypted(pair) = &sealed else {
            panic!("expected sealed value");
        };
        let opened = open(&ReverseCipher, FieldId::OpeningBalance, pair.sealed()).unwrap();
        assert_eq!(opened, value);
        assert_eq!(opened.as_money(), value.as_money());
    }

    #[test]
    fn open_rejects_other_field() {
        let sealed = seal(&ReverseCipher, FieldId::Notes, FieldValue::text("secret")).unwrap();
        let FieldValue::Encrypted(pair) = &sealed else {
            panic!("expected sealed value");
        };
        let result = open(&ReverseCipher, FieldId::Password, pair.sealed());
        assert!(matches!(result, Err(CoreError::DecryptionFailed { .. })));
    }

    #[test]
    fn resealing_does_not_nest() {
        let once = seal(&PlainCipher, FieldId::Name, FieldValue::text("x")).unwrap();
        let twice = seal(&PlainCipher, FieldId::Name, once.clone()).unwrap();
        let FieldValue::Encrypted(pair) = &twice else {
            panic!("expected sealed value");
        };
        assert!(!matches!(pair.plain(), FieldValue::Encrypted(_)));
        assert_eq!(once, twice);
    }

    #[test]
    fn garbage_is_a_codec_error() {
        let result = open(&PlainCipher, FieldId::Name, &[0xff, 0x00, 0x13]);
        assert!(matches!(result, Err(CoreError::Codec { .. })));
    }
}
