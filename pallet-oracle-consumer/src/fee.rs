//! Multi-denomination fee limits.
//!
//! The oracle chain charges its own tokens, so a fee limit is a list of coins in the oracle
//! chain's denominations rather than a balance of the local currency. [`FeeLimit`] parses the
//! usual coin-list notation, e.g. `"100uband"` or `"100uband,5uatom"`.

use core::{fmt, str::FromStr};

use super::*;

/// Longest denomination accepted by the oracle chain.
pub const MAX_DENOM_LEN: u32 = 128;

/// Most denominations a single fee limit can list.
pub const MAX_FEE_DENOMS: u32 = 16;

const MIN_DENOM_LEN: usize = 3;

pub type Denom = BoundedVec<u8, ConstU32<MAX_DENOM_LEN>>;

#[derive(Encode, Decode, Clone, PartialEq, Eq, RuntimeDebug, TypeInfo, MaxEncodedLen)]
pub struct Coin {
    pub denom: Denom,
    pub amount: u128,
}

/// Coins sorted by denomination, each denomination at most once and no zero amounts.
#[derive(
    Encode, Decode, Clone, Default, PartialEq, Eq, RuntimeDebug, TypeInfo, MaxEncodedLen,
)]
pub struct FeeLimit(BoundedVec<Coin, ConstU32<MAX_FEE_DENOMS>>);

impl FeeLimit {
    pub fn coins(&self) -> &[Coin] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_empty()
    }

    /// The amount allowed in `denom`, zero if the denomination is not listed.
    pub fn amount_of(&self, denom: &[u8]) -> u128 {
        self.0
            .iter()
            .find(|coin| coin.denom.as_slice() == denom)
            .map(|coin| coin.amount)
            .unwrap_or(0)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, RuntimeDebug)]
pub enum ParseFeeError {
    /// An entry is not of the form `<amount><denom>`.
    InvalidCoin,
    /// The amount does not fit in 128 bits.
    InvalidAmount,
    /// The denomination is too short, too long or has forbidden characters.
    InvalidDenom,
    /// The same denomination is listed twice.
    DuplicateDenom,
    /// More than `MAX_FEE_DENOMS` denominations.
    TooManyDenoms,
}

impl fmt::Display for ParseFeeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Self::InvalidCoin => "invalid coin expression",
            Self::InvalidAmount => "invalid coin amount",
            Self::InvalidDenom => "invalid denomination",
            Self::DuplicateDenom => "duplicate denomination",
            Self::TooManyDenoms => "too many denominations",
        };
        f.write_str(reason)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ParseFeeError {}

impl FromStr for FeeLimit {
    type Err = ParseFeeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Ok(Self::default());
        }

        let mut coins = s
            .split(',')
            .map(|entry| parse_coin(entry.trim()))
            .collect::<Result<Vec<_>, _>>()?;

        coins.sort_by(|a, b| a.denom.as_slice().cmp(b.denom.as_slice()));
        if coins.windows(2).any(|pair| pair[0].denom == pair[1].denom) {
            return Err(ParseFeeError::DuplicateDenom);
        }
        coins.retain(|coin| coin.amount > 0);

        coins
            .try_into()
            .map(Self)
            .map_err(|()| ParseFeeError::TooManyDenoms)
    }
}

impl fmt::Display for FeeLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, coin) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            let denom = core::str::from_utf8(&coin.denom).map_err(|_| fmt::Error)?;
            write!(f, "{}{}", coin.amount, denom)?;
        }
        Ok(())
    }
}

fn parse_coin(entry: &str) -> Result<Coin, ParseFeeError> {
    let split = entry
        .find(|c: char| !c.is_ascii_digit())
        .ok_or(ParseFeeError::InvalidCoin)?;
    let (amount, denom) = entry.split_at(split);
    if amount.is_empty() {
        return Err(ParseFeeError::InvalidCoin);
    }

    let amount = amount
        .parse::<u128>()
        .map_err(|_| ParseFeeError::InvalidAmount)?;
    let denom = denom.trim_start();
    ensure_valid_denom(denom)?;
    let denom = denom
        .as_bytes()
        .to_vec()
        .try_into()
        .map_err(|()| ParseFeeError::InvalidDenom)?;

    Ok(Coin { denom, amount })
}

fn ensure_valid_denom(denom: &str) -> Result<(), ParseFeeError> {
    let mut chars = denom.chars();
    let starts_with_letter = chars.next().map_or(false, |c| c.is_ascii_alphabetic());
    let rest_allowed = chars.all(|c| c.is_ascii_alphanumeric() || "/:._-".contains(c));

    if denom.len() < MIN_DENOM_LEN || !starts_with_letter || !rest_allowed {
        return Err(ParseFeeError::InvalidDenom);
    }
    Ok(())
}
