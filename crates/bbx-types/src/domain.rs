//! Variable domains: the declared bounds and integrality of one search variable.

use serde::{Deserialize, Serialize};

use crate::errors::{BbxError, BbxResult};

/// A named scalar range `[min, max]`, either integer-valued or continuous.
///
/// Domains are immutable once constructed; finite bounds with `min <= max`
/// are checked by [`VariableDomain::new`] and on deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "DomainSpec")]
pub struct VariableDomain {
    name: String,
    min: f64,
    max: f64,
    is_integer: bool,
}

/// Unchecked wire form of a domain.
#[derive(Debug, Clone, Deserialize)]
struct DomainSpec {
    name: String,
    min: f64,
    max: f64,
    #[serde(default)]
    is_integer: bool,
}

impl TryFrom<DomainSpec> for VariableDomain {
    type Error = BbxError;

    fn try_from(spec: DomainSpec) -> BbxResult<Self> {
        VariableDomain::new(spec.name, spec.min, spec.max, spec.is_integer)
    }
}

impl VariableDomain {
    /// Creates a domain, failing fast when `min > max` or a bound is not finite.
    pub fn new(name: impl Into<String>, min: f64, max: f64, is_integer: bool) -> BbxResult<Self> {
        let name = name.into();
        if !min.is_finite() || !max.is_finite() || min > max {
            return Err(BbxError::InvalidDomain { name, min, max });
        }
        Ok(Self {
            name,
            min,
            max,
            is_integer,
        })
    }

    pub fn continuous(name: impl Into<String>, min: f64, max: f64) -> BbxResult<Self> {
        Self::new(name, min, max, false)
    }

    pub fn integer(name: impl Into<String>, min: i64, max: i64) -> BbxResult<Self> {
        Self::new(name, min as f64, max as f64, true)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn is_integer(&self) -> bool {
        self.is_integer
    }

    /// Width of the range, `|max - min|`.
    pub fn range(&self) -> f64 {
        (self.max - self.min).abs()
    }

    /// Number of discretization points actually available for `requested`.
    ///
    /// Integer domains cannot offer more points than they hold integers, so
    /// the request is capped at `|max - min| + 1`. Continuous domains return
    /// the request unchanged.
    pub fn steps(&self, requested: usize) -> usize {
        if self.is_integer {
            let available = (self.range() as usize).saturating_add(1);
            requested.min(available)
        } else {
            requested
        }
    }

    /// Distance between neighbouring discretization points for `requested`.
    ///
    /// Integer domains use a step of `1.0` once the request exceeds the range.
    /// Otherwise the range is split into `requested - 1` equal intervals.
    /// Fewer than two points leaves a single point (the minimum), reported as
    /// a step of `0.0`.
    pub fn step_size(&self, requested: usize) -> f64 {
        if self.is_integer && requested as f64 > self.range() {
            return 1.0;
        }
        if requested < 2 {
            return 0.0;
        }
        self.range() / (requested - 1) as f64
    }

    /// Whether `value` lies inside `[min, max]`.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Clamps `value` into `[min, max]`, rounding for integer domains.
    pub fn clamp(&self, value: f64) -> f64 {
        let clamped = value.clamp(self.min, self.max);
        if self.is_integer {
            clamped.round().clamp(self.min, self.max)
        } else {
            clamped
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_inverted_bounds() {
        let err = VariableDomain::continuous("x", 2.0, 1.0).unwrap_err();
        assert!(matches!(err, BbxError::InvalidDomain { ref name, .. } if name == "x"));
        assert!(VariableDomain::continuous("nan", f64::NAN, 1.0).is_err());
    }

    #[test]
    fn rejects_infinite_bounds() {
        assert!(VariableDomain::continuous("x", 0.0, f64::INFINITY).is_err());
        assert!(VariableDomain::continuous("x", f64::NEG_INFINITY, 0.0).is_err());
        assert!(VariableDomain::continuous("x", f64::NEG_INFINITY, f64::INFINITY).is_err());
    }

    #[test]
    fn full_width_integer_domain_does_not_overflow() {
        let k = VariableDomain::integer("k", i64::MIN, i64::MAX).unwrap();
        assert_eq!(k.steps(3), 3);
        assert_eq!(k.steps(usize::MAX), usize::MAX);
        assert!(k.step_size(3).is_finite());
        assert!(k.step_size(3) > 1.0);
    }

    #[test]
    fn degenerate_domain_is_allowed() {
        let d = VariableDomain::continuous("x", 4.0, 4.0).unwrap();
        assert_eq!(d.range(), 0.0);
        assert!(d.contains(4.0));
    }

    #[test]
    fn integer_steps_capped_by_range() {
        let d = VariableDomain::integer("k", 0, 10).unwrap();
        for n in 1..40 {
            assert_eq!(d.steps(n), n.min(11));
        }
    }

    #[test]
    fn continuous_steps_unchanged() {
        let d = VariableDomain::continuous("x", -1.0, 1.0).unwrap();
        for n in [1, 2, 3, 17, 1000] {
            assert_eq!(d.steps(n), n);
        }
    }

    #[test]
    fn integer_step_size_is_one_beyond_range() {
        let d = VariableDomain::integer("k", 0, 10).unwrap();
        assert_eq!(d.step_size(11), 1.0);
        assert_eq!(d.step_size(20), 1.0);
        assert_eq!(d.step_size(3), 5.0);

        let narrow = VariableDomain::integer("n", 5, 5).unwrap();
        assert_eq!(narrow.step_size(1), 1.0);
        assert_eq!(narrow.step_size(3), 1.0);
    }

    #[test]
    fn continuous_step_size_splits_range() {
        let d = VariableDomain::continuous("x", 0.0, 10.0).unwrap();
        assert_eq!(d.step_size(3), 5.0);
        assert_eq!(d.step_size(2), 10.0);
        assert_eq!(d.step_size(11), 1.0);
    }

    #[test]
    fn single_split_yields_zero_step() {
        let d = VariableDomain::continuous("x", 0.0, 10.0).unwrap();
        assert_eq!(d.step_size(1), 0.0);
        assert_eq!(d.step_size(0), 0.0);

        let k = VariableDomain::integer("k", 0, 10).unwrap();
        assert_eq!(k.step_size(1), 0.0);
        assert_eq!(k.steps(1), 1);
    }

    #[test]
    fn clamp_rounds_integers() {
        let k = VariableDomain::integer("k", 0, 10).unwrap();
        assert_eq!(k.clamp(3.6), 4.0);
        assert_eq!(k.clamp(-2.0), 0.0);
        assert_eq!(k.clamp(12.0), 10.0);

        let x = VariableDomain::continuous("x", 0.0, 1.0).unwrap();
        assert_eq!(x.clamp(0.25), 0.25);
    }

    #[test]
    fn deserialization_validates_bounds() {
        let ok: VariableDomain =
            serde_json::from_str(r#"{"name":"x","min":0.0,"max":1.0}"#).unwrap();
        assert!(!ok.is_integer());

        let bad = serde_json::from_str::<VariableDomain>(r#"{"name":"x","min":2.0,"max":1.0}"#);
        assert!(bad.is_err());
    }
}
