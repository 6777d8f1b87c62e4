//! Size resolution for new panes
//!
//! `-l 10`, `-l 30%` and the legacy `-p 30` are tagged into a [`SizeSpec`]
//! when arguments are parsed; [`resolve`] then turns the spec into a concrete
//! cell size against the target pane's current dimensions.

use thiserror::Error;

use crate::wm::SplitDirection;

/// Largest size accepted (the range of a C `int`)
const SIZE_MAXIMUM: u64 = i32::MAX as u64;

/// Requested size of the new pane, still unvalidated
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum SizeSpec {
    /// Let the layout pick (half)
    #[default]
    Unspecified,
    /// Lines or columns, from `-l N`
    Absolute(String),
    /// Percentage of the target pane, from `-l N%`
    Percentage(String),
    /// Percentage from the legacy `-p N`
    LegacyPercentage(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SizeError {
    #[error("{what} {reason}")]
    Invalid { what: &'static str, reason: &'static str },

    #[error("size and percentage cannot both be given")]
    Conflict,
}

impl SizeSpec {
    /// Tag the `-l` and `-p` argument values
    pub fn from_args(lines: Option<&str>, percentage: Option<&str>) -> Result<Self, SizeError> {
        match (lines, percentage) {
            (Some(_), Some(_)) => Err(SizeError::Conflict),
            (Some(l), None) => match l.strip_suffix('%') {
                Some(p) => Ok(SizeSpec::Percentage(p.to_string())),
                None => Ok(SizeSpec::Absolute(l.to_string())),
            },
            (None, Some(p)) => Ok(SizeSpec::LegacyPercentage(p.to_string())),
            (None, None) => Ok(SizeSpec::Unspecified),
        }
    }
}

/// Resolve a size spec against the target pane's width and height
///
/// Percentages are taken of the height for a top/bottom split and of the
/// width for a left/right split, truncating toward zero.
pub fn resolve(
    spec: &SizeSpec,
    direction: SplitDirection,
    width: u32,
    height: u32,
) -> Result<Option<u32>, SizeError> {
    let reference = match direction {
        SplitDirection::Vertical => height,
        SplitDirection::Horizontal => width,
    };
    match spec {
        SizeSpec::Unspecified => Ok(None),
        SizeSpec::Absolute(n) => {
            let n = parse_number(n, SIZE_MAXIMUM, "lines")?;
            Ok(Some(n))
        }
        SizeSpec::Percentage(p) => {
            let p = parse_number(p, 100, "percentage")?;
            Ok(Some(percent_of(reference, p)))
        }
        SizeSpec::LegacyPercentage(p) => {
            let p = parse_number(p, 100, "create pane failed: -p")?;
            Ok(Some(percent_of(reference, p)))
        }
    }
}

fn percent_of(reference: u32, percentage: u32) -> u32 {
    let size = u64::from(reference) * u64::from(percentage) / 100;
    // percentage <= 100 keeps this within reference
    u32::try_from(size).unwrap_or(reference)
}

/// Parse a non-negative decimal within `0..=maximum`
fn parse_number(value: &str, maximum: u64, what: &'static str) -> Result<u32, SizeError> {
    let invalid = |reason| SizeError::Invalid { what, reason };

    let digits = value.trim();
    if let Some(rest) = digits.strip_prefix('-') {
        if !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid("too small"));
        }
        return Err(invalid("invalid"));
    }
    let digits = digits.strip_prefix('+').unwrap_or(digits);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid("invalid"));
    }
    let n: u64 = digits.parse().map_err(|_| invalid("too large"))?;
    if n > maximum {
        return Err(invalid("too large"));
    }
    u32::try_from(n).map_err(|_| invalid("too large"))
}
