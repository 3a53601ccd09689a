//! External identifiers.
//!
//! An external id packs an asset type with an item's ids so that items of
//! different lists can be referenced through one 64-bit number:
//!
//! ```text
//!  63    60 59    56 55                32 31                         0
//! +--------+--------+--------------------+----------------------------+
//! | asset  | (prev) |       major        |            base            |
//! +--------+--------+--------------------+----------------------------+
//! ```
//!
//! The major id may use bits 32-59. An alternate id moves the previous asset
//! tag into bits 56-59 so the item can be re-tagged without losing its
//! original identity; that requires the major id to fit below bit 56.

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::fmt;

const ASSET_SHIFT: u32 = 60;
const MAJOR_SHIFT: u32 = 32;
const ALTERNATE_SHIFT: u32 = 56;
const TAG_MASK: u64 = 0xF;
const BASE_MASK: u64 = 0xFFFF_FFFF;
/// Asset bits, as seen after shifting the id down by the major shift.
const ASSET_MASK: u64 = 0xF000_0000;
const ALTERNATE_MASK: u64 = 0x0F00_0000;
const MAJOR_LIMIT: u64 = 1 << 28;
const ALTERNATE_MAJOR_LIMIT: u64 = 1 << 24;

/// Kind of asset an external id refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetType {
    /// Deposit account.
    Deposit,
    /// Cash account.
    Cash,
    /// Auto-expense cash account.
    AutoExpense,
    /// Loan account.
    Loan,
    /// Portfolio.
    Portfolio,
    /// Security.
    Security,
    /// Payee.
    Payee,
    /// Holding of a security in a portfolio.
    SecurityHolding,
}

impl AssetType {
    /// Every asset type.
    pub const ALL: [AssetType; 8] = [
        Self::Deposit,
        Self::Cash,
        Self::AutoExpense,
        Self::Loan,
        Self::Portfolio,
        Self::Security,
        Self::Payee,
        Self::SecurityHolding,
    ];

    /// Returns the 4-bit tag of the asset type.
    #[must_use]
    pub const fn id(self) -> u64 {
        match self {
            Self::Deposit => 1,
            Self::Cash => 2,
            Self::AutoExpense => 3,
            Self::Loan => 4,
            Self::Portfolio => 5,
            Self::Security => 6,
            Self::Payee => 7,
            Self::SecurityHolding => 8,
        }
    }

    /// Looks up an asset type by tag.
    pub fn from_id(tag: u64) -> CoreResult<Self> {
        Self::ALL
            .into_iter()
            .find(|asset| asset.id() == tag)
            .ok_or(CoreError::UnknownAssetType { tag })
    }
}

/// A composite 64-bit external identifier.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExternalId(u64);

impl ExternalId {
    /// Encodes an asset type and base id.
    #[must_use]
    pub const fn new(asset: AssetType, base: u32) -> Self {
        Self(base as u64 + (asset.id() << ASSET_SHIFT))
    }

    /// Encodes an asset type, major id and base id.
    ///
    /// # Errors
    ///
    /// Returns an error if the major id does not fit in 28 bits.
    pub fn with_major(asset: AssetType, major: u32, base: u32) -> CoreResult<Self> {
        let major = u64::from(major);
        if major >= MAJOR_LIMIT {
            return Err(CoreError::id_out_of_range("major id", major, MAJOR_LIMIT));
        }
        Ok(Self(
            (asset.id() << ASSET_SHIFT) + (major << MAJOR_SHIFT) + u64::from(base),
        ))
    }

    /// Wraps a raw id.
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw id.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }

    /// Decodes the asset type.
    pub fn asset_type(self) -> CoreResult<AssetType> {
        AssetType::from_id(self.0 >> ASSET_SHIFT)
    }

    /// Decodes the major id.
    ///
    /// For alternate ids this includes the previous asset tag in its top
    /// bits; use [`original_major`](Self::original_major) there.
    #[must_use]
    pub const fn major(self) -> u32 {
        ((self.0 >> MAJOR_SHIFT) & !ASSET_MASK) as u32
    }

    /// Decodes the major id with any previous asset tag stripped.
    #[must_use]
    pub const fn original_major(self) -> u32 {
        ((self.0 >> MAJOR_SHIFT) & !(ASSET_MASK | ALTERNATE_MASK)) as u32
    }

    /// Decodes the base id.
    #[must_use]
    pub const fn base(self) -> u32 {
        (self.0 & BASE_MASK) as u32
    }

    /// Decodes all three components.
    pub fn decode(self) -> CoreResult<(AssetType, u32, u32)> {
        Ok((self.asset_type()?, self.major(), self.base()))
    }

    /// Re-tags the id with a new asset type, keeping the old tag in bits
    /// 56-59 and the major and base ids unchanged.
    ///
    /// # Errors
    ///
    /// Returns an error if the major id (or an earlier alternate tag)
    /// occupies bits 56-59.
    pub fn to_alternate(self, asset: AssetType) -> CoreResult<Self> {
        let major = u64::from(self.major());
        if major >= ALTERNATE_MAJOR_LIMIT {
            return Err(CoreError::id_out_of_range(
                "major id",
                major,
                ALTERNATE_MAJOR_LIMIT,
            ));
        }
        let previous = self.0 >> ASSET_SHIFT;
        let retained = self.0 & ((1 << ALTERNATE_SHIFT) - 1);
        Ok(Self(
            (asset.id() << ASSET_SHIFT) | (previous << ALTERNATE_SHIFT) | retained,
        ))
    }

    /// Decodes the asset type an alternate id was derived from.
    pub fn previous_type(self) -> CoreResult<Option<AssetType>> {
        match (self.0 >> ALTERNATE_SHIFT) & TAG_MASK {
            0 => Ok(None),
            tag => AssetType::from_id(tag).map(Some),
        }
    }
}

impl fmt::Debug for ExternalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ExternalId({:#018x})", self.0)
    }
}

impl fmt::Display for ExternalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<ExternalId> for u64 {
    fn from(id: ExternalId) -> Self {
        id.0
    }
}
