//! # Dimension Validation
//!
//! Decides whether an element carries every dimension its type requires.
//!
//! A required dimension passes when it is present, finite and strictly
//! positive. Under [`Strictness::Lenient`], a thickness of exactly zero also
//! passes for the types whose profile allows it (beam and the two leveling
//! layers).
//!
//! Validation never fails with an error: the outcome, including the exact
//! list of offending fields, is returned as a [`ValidationResult`].
//!
//! ## Example
//!
//! ```rust
//! use takeoff_core::calculations::validation::{validate, Strictness};
//! use takeoff_core::elements::{Dimension, Element};
//!
//! let floor = Element::leveling_floor(4.0, 3.0, 0.0);
//!
//! let strict = validate(&floor, Strictness::Strict);
//! assert!(!strict.ok);
//! assert_eq!(strict.missing_or_invalid, vec![Dimension::Thickness]);
//!
//! assert!(validate(&floor, Strictness::Lenient).ok);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::elements::{Dimension, Element};
use crate::errors::{CalcError, CalcResult};

/// How strictly required dimensions are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strictness {
    /// Every required dimension must be > 0
    #[default]
    Strict,
    /// Thickness may be 0 where the element profile allows it
    Lenient,
}

impl Strictness {
    pub fn name(&self) -> &'static str {
        match self {
            Strictness::Strict => "strict",
            Strictness::Lenient => "lenient",
        }
    }
}

impl fmt::Display for Strictness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Strictness {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(Strictness::Strict),
            "lenient" => Ok(Strictness::Lenient),
            other => Err(CalcError::configuration(format!(
                "strictness must be 'strict' or 'lenient', got '{}'",
                other
            ))),
        }
    }
}

/// Outcome of validating one element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub ok: bool,
    /// Failing fields in canonical dimension order, without duplicates
    pub missing_or_invalid: Vec<Dimension>,
}

impl ValidationResult {
    /// Convert a failed validation into an `InvalidElement` error.
    pub fn into_result(self, element: &Element) -> CalcResult<()> {
        if self.ok {
            Ok(())
        } else {
            Err(CalcError::invalid_element(
                element.element_type,
                self.missing_or_invalid,
            ))
        }
    }
}

/// Validate an element's dimensions against its type.
pub fn validate(element: &Element, strictness: Strictness) -> ValidationResult {
    let profile = element.element_type.profile();
    let allow_zero_thickness =
        strictness == Strictness::Lenient && profile.zero_thickness_allowed;

    let missing_or_invalid: Vec<Dimension> = profile
        .required
        .iter()
        .copied()
        .filter(|&dim| {
            let allow_zero = allow_zero_thickness && dim == Dimension::Thickness;
            !dimension_ok(element.get(dim), allow_zero)
        })
        .collect();

    ValidationResult {
        ok: missing_or_invalid.is_empty(),
        missing_or_invalid,
    }
}

fn dimension_ok(value: Option<f64>, allow_zero: bool) -> bool {
    match value {
        // -0.0 compares equal to 0.0 but would print as "-0.000"
        Some(v) if v.is_finite() => v > 0.0 || (allow_zero && v == 0.0 && v.is_sign_positive()),
        _ => false,
    }
}
