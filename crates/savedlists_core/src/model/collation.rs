//! Locale-style title collation.
//!
//! # Responsibility
//! - Order list titles the way a user expects to read them, not by code
//!   point.
//!
//! # Invariants
//! - Ordering follows the Unicode Collation Algorithm with root-locale
//!   (CLDR) data: punctuation before digits before letters, `ß` as `ss`,
//!   `Ø` next to `O`.
//! - Comparison is multi-level: base letters, then accents, then case.
//!   Lower levels only break ties left by higher ones.
//! - Titles equal at the configured strength compare `Equal`; callers keep
//!   their relative order with a stable sort.

use icu_collator::{Collator, CollatorOptions, Strength};
use log::warn;
use std::cmp::Ordering;
use std::fmt::{Debug, Formatter};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Separator in the fallback accent key. Sorts below every combining mark,
/// so an unaccented letter precedes its accented variants.
const ACCENT_BOUNDARY: u32 = 0;

/// Number of collation levels taken into account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum CollationStrength {
    /// Base letters only: `a == A == ä`.
    Primary,
    /// Base letters and accents: `a == A`, `a < ä`.
    Secondary,
    /// Base letters, accents and case: `a < A < ä`.
    #[default]
    Tertiary,
}

impl CollationStrength {
    fn to_icu(self) -> Strength {
        match self {
            Self::Primary => Strength::Primary,
            Self::Secondary => Strength::Secondary,
            Self::Tertiary => Strength::Tertiary,
        }
    }
}

/// Title comparator with root-locale collation rules.
pub struct TitleCollator {
    strength: CollationStrength,
    // `None` only when the compiled collation data failed to load.
    unicode: Option<Collator>,
}

impl TitleCollator {
    pub fn new(strength: CollationStrength) -> Self {
        let mut options = CollatorOptions::new();
        options.strength = Some(strength.to_icu());

        let unicode = match Collator::try_new(&Default::default(), options) {
            Ok(collator) => Some(collator),
            Err(err) => {
                warn!(
                    "event=collator_init module=model status=degraded reason=icu_data_unavailable error={err}"
                );
                None
            }
        };
        Self { strength, unicode }
    }

    /// Compares two titles at the configured strength.
    pub fn compare(&self, lhs: &str, rhs: &str) -> Ordering {
        match &self.unicode {
            Some(collator) => collator.compare(lhs, rhs),
            None => compare_by_key(self.strength, lhs, rhs),
        }
    }
}

impl Default for TitleCollator {
    fn default() -> Self {
        Self::new(CollationStrength::default())
    }
}

impl Debug for TitleCollator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TitleCollator")
            .field("strength", &self.strength)
            .field("unicode", &self.unicode.is_some())
            .finish()
    }
}

/// Decomposition-based ordering used when collation data is missing.
/// Letters without a canonical decomposition (`ß`, `Ø`) sort by code point.
fn compare_by_key(strength: CollationStrength, lhs: &str, rhs: &str) -> Ordering {
    let lhs = CollationKey::new(lhs);
    let rhs = CollationKey::new(rhs);

    let primary = lhs.base.cmp(&rhs.base);
    if primary != Ordering::Equal || strength == CollationStrength::Primary {
        return primary;
    }

    let secondary = lhs.accents.cmp(&rhs.accents);
    if secondary != Ordering::Equal || strength == CollationStrength::Secondary {
        return secondary;
    }

    lhs.case.cmp(&rhs.case)
}

struct CollationKey {
    base: Vec<char>,
    accents: Vec<u32>,
    case: Vec<bool>,
}

impl CollationKey {
    fn new(value: &str) -> Self {
        let mut base = Vec::with_capacity(value.len());
        let mut accents = Vec::with_capacity(value.len());
        let mut case = Vec::with_capacity(value.len());

        for ch in value.nfd() {
            if is_combining_mark(ch) {
                accents.push(u32::from(ch));
                continue;
            }
            if !base.is_empty() {
                accents.push(ACCENT_BOUNDARY);
            }
            base.extend(ch.to_lowercase());
            case.push(ch.is_uppercase());
        }

        Self {
            base,
            accents,
            case,
        }
    }
}
