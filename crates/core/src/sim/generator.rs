//! Test-sequence generators.
//!
//! Pure functions producing access sequences. Every generator keeps only ids in
//! `[0, memory_blocks)`.

use std::fmt;

use rand::Rng;
use serde::de::{self, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

use crate::common::BlockId;
use crate::common::block::in_domain;

/// A named way of producing an access sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum TestCase {
    /// `0..2N` twice; see [`sequential`].
    Sequential {
        /// N.
        num_blocks: usize,
    },
    /// Partial repeat pattern; see [`mid_repeat`].
    #[serde(alias = "mid_repeat")]
    MidRepeat {
        /// N.
        num_blocks: usize,
    },
    /// Uniform random ids; see [`random`].
    Random {
        /// Sequence length; falls back to the configured count.
        #[serde(default)]
        count: Option<usize>,
    },
    /// User-supplied ids; see [`parse_custom`] and [`filter_custom`].
    Custom {
        /// Text or list of ids.
        input: CustomInput,
    },
}

/// Raw custom input as supplied by the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CustomInput {
    /// Ids separated by commas and/or whitespace.
    Text(String),
    /// Ids as a list; see [`CustomId`] for how each element is read.
    List(Vec<CustomId>),
}

/// One element of a custom id list, reduced to its leading integer.
///
/// Numbers are truncated toward zero and strings keep their leading integer
/// (`"12abc"` reads as 12). Any other JSON value reads as `None`. Negative and
/// missing ids are dropped by [`filter_custom`] instead of failing the load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CustomId(
    /// The leading integer, if the element had one.
    pub Option<i64>,
);

impl From<i64> for CustomId {
    fn from(id: i64) -> Self {
        Self(Some(id))
    }
}

impl<'de> Deserialize<'de> for CustomId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(CustomIdVisitor).map(Self)
    }
}

struct CustomIdVisitor;

impl<'de> Visitor<'de> for CustomIdVisitor {
    type Value = Option<i64>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a block id")
    }

    fn visit_bool<E: de::Error>(self, _: bool) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(Some(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(Some(i64::try_from(v).unwrap_or(i64::MAX)))
    }

    #[allow(clippy::cast_possible_truncation)]
    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        // `as` saturates, which keeps huge values out of range.
        Ok(v.is_finite().then(|| v.trunc() as i64))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(leading_integer(v))
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        deserializer.deserialize_any(self)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, seq: A) -> Result<Self::Value, A::Error> {
        let _ = IgnoredAny.visit_seq(seq)?;
        Ok(None)
    }

    fn visit_map<A: MapAccess<'de>>(self, map: A) -> Result<Self::Value, A::Error> {
        let _ = IgnoredAny.visit_map(map)?;
        Ok(None)
    }
}

impl TestCase {
    /// Produces the sequence for this test case.
    ///
    /// # Arguments
    ///
    /// * `memory_blocks` - Exclusive upper bound on block ids.
    /// * `random_count` - Length used by `Random` when it has no explicit count.
    /// * `rng` - Source of randomness for `Random`.
    pub fn generate<R: Rng>(
        &self,
        memory_blocks: u64,
        random_count: usize,
        rng: &mut R,
    ) -> Vec<BlockId> {
        match self {
            Self::Sequential { num_blocks } => sequential(*num_blocks, memory_blocks),
            Self::MidRepeat { num_blocks } => mid_repeat(*num_blocks, memory_blocks),
            Self::Random { count } => random(count.unwrap_or(random_count), memory_blocks, rng),
            Self::Custom {
                input: CustomInput::Text(text),
            } => parse_custom(text, memory_blocks),
            Self::Custom {
                input: CustomInput::List(list),
            } => filter_custom(list, memory_blocks),
        }
    }
}

/// Ascending run `0..min(2N, memory_blocks)`, then the same run again.
///
/// ```
/// use cachestep_core::sim::generator::sequential;
///
/// assert_eq!(sequential(2, 1024), vec![0, 1, 2, 3, 0, 1, 2, 3]);
/// assert_eq!(sequential(4, 3), vec![0, 1, 2, 0, 1, 2]);
/// ```
pub fn sequential(num_blocks: usize, memory_blocks: u64) -> Vec<BlockId> {
    let end = (num_blocks as u64).saturating_mul(2).min(memory_blocks);
    (0..end).chain(0..end).collect()
}

/// `0..N`, then `1..N`, then `N..2N`, then everything so far once more.
///
/// Each run is clipped to `memory_blocks`, so the length never depends on how
/// far N exceeds it.
///
/// ```
/// use cachestep_core::sim::generator::mid_repeat;
///
/// let seq = mid_repeat(3, 1024);
/// assert_eq!(seq, vec![0, 1, 2, 1, 2, 3, 4, 5, 0, 1, 2, 1, 2, 3, 4, 5]);
/// ```
pub fn mid_repeat(num_blocks: usize, memory_blocks: u64) -> Vec<BlockId> {
    let n = num_blocks as u64;
    let low = n.min(memory_blocks);
    let high = n.saturating_mul(2).min(memory_blocks);
    let once: Vec<BlockId> = (0..low).chain(1..low).chain(low..high).collect();
    once.iter().chain(once.iter()).copied().collect()
}

/// `count` independent uniform draws from `[0, memory_blocks)`.
///
/// Returns an empty sequence when `memory_blocks` is zero.
pub fn random<R: Rng>(count: usize, memory_blocks: u64, rng: &mut R) -> Vec<BlockId> {
    if memory_blocks == 0 {
        return Vec::new();
    }
    (0..count)
        .map(|_| rng.random_range(0..memory_blocks))
        .collect()
}

/// Parses ids separated by commas and/or whitespace.
///
/// Each token contributes its leading integer, so `2.5` reads as 2 and `12abc`
/// as 12. Tokens without one, and ids outside `[0, memory_blocks)`, are
/// skipped.
///
/// ```
/// use cachestep_core::sim::generator::parse_custom;
///
/// assert_eq!(parse_custom("1, 2 x 3,,-4 2000\n5", 1024), vec![1, 2, 3, 5]);
/// assert_eq!(parse_custom("2.5, 12abc, 3", 1024), vec![2, 12, 3]);
/// ```
pub fn parse_custom(text: &str, memory_blocks: u64) -> Vec<BlockId> {
    text.split(|c: char| c == ',' || c.is_whitespace())
        .filter_map(leading_integer)
        .filter_map(|id| BlockId::try_from(id).ok())
        .filter(|&id| in_domain(id, memory_blocks))
        .collect()
}

/// Keeps the ids of `list` that fall inside `[0, memory_blocks)`.
pub fn filter_custom(list: &[CustomId], memory_blocks: u64) -> Vec<BlockId> {
    list.iter()
        .filter_map(|id| id.0)
        .filter_map(|id| BlockId::try_from(id).ok())
        .filter(|&id| in_domain(id, memory_blocks))
        .collect()
}

/// Optional sign and the digits that follow it; `None` without a digit.
fn leading_integer(token: &str) -> Option<i64> {
    let token = token.trim_start();
    let (negative, rest) = token.strip_prefix('-').map_or_else(
        || (false, token.strip_prefix('+').unwrap_or(token)),
        |rest| (true, rest),
    );
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    // Too many digits to fit is out of range anyway.
    let value = rest[..digits].parse::<i64>().ok()?;
    Some(if negative { -value } else { value })
}
