//! Numeric conversion helpers used when reading configuration.
//!
//! JSON numbers arrive as `i64`/`f64`; gameplay state is `i32`/`f32`. These
//! helpers narrow by clamping and never panic.

/// Clamp an `i64` into the `i32` domain.
#[expect(
    clippy::cast_possible_truncation,
    reason = "The value is clamped to the i32 bounds before casting."
)]
#[must_use]
pub fn saturating_i32(value: i64) -> i32 {
    value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

/// Narrow an `f64` into `f32`, clamping to the finite `f32` range.
///
/// Returns `None` for NaN so callers can fall back to their default.
#[expect(
    clippy::cast_possible_truncation,
    reason = "The value is clamped to the f32 bounds before casting."
)]
#[must_use]
pub fn clamp_f32(value: f64) -> Option<f32> {
    if value.is_nan() {
        return None;
    }
    Some(value.clamp(f64::from(f32::MIN), f64::from(f32::MAX)) as f32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(7, 7)]
    #[case(i64::MAX, i32::MAX)]
    #[case(i64::MIN, i32::MIN)]
    fn saturating_i32_clamps(#[case] input: i64, #[case] expected: i32) {
        assert_eq!(saturating_i32(input), expected);
    }

    #[rstest]
    fn clamp_f32_rejects_nan() {
        assert_eq!(clamp_f32(f64::NAN), None);
    }

    #[rstest]
    fn clamp_f32_saturates_infinity() {
        assert_eq!(clamp_f32(f64::INFINITY), Some(f32::MAX));
        assert_eq!(clamp_f32(-1.5), Some(-1.5));
    }
}
