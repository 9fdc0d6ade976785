//! Distance metrics.
//!
//! | Metric | Formula |
//! |--------|---------|
//! | Euclidean | √Σ(u−v)² |
//! | Cityblock | Σ\|u−v\| |
//! | Chebyshev | max\|u−v\| |
//! | Minkowski(p) | (Σ\|u−v\|ᵖ)^(1/p) |
//! | SEuclidean | √Σ(u−v)²/var |
//! | Hamming | fraction of differing components |
//! | Jaccard | differing / non-zero-in-either |
//! | Cosine | 1 − u·v/(‖u‖‖v‖) |
//! | Correlation | cosine of mean-centred rows |
//! | Mahalanobis | √((u−v)Σ⁻¹(u−v)ᵀ) |
//!
//! Anything else goes through [`Metric::custom`].

use crate::error::{Error, Result};
use core::fmt;
use core::str::FromStr;
use std::sync::Arc;

/// Caller-supplied pairwise distance.
pub type DistanceFn = Arc<dyn Fn(&[f64], &[f64]) -> f64 + Send + Sync>;

/// Metric selector for [`pdist`](crate::distance::pdist).
#[derive(Clone, Default)]
pub enum Metric {
    /// 2-norm of the difference.
    #[default]
    Euclidean,
    /// 1-norm of the difference (Manhattan).
    Cityblock,
    /// ∞-norm of the difference.
    Chebyshev,
    /// p-norm of the difference.
    Minkowski {
        /// Norm order; must be finite and positive.
        p: f64,
    },
    /// Euclidean distance with each dimension scaled by its sample variance.
    SEuclidean,
    /// Proportion of disagreeing components.
    Hamming,
    /// Proportion of disagreeing components among those non-zero in either row.
    Jaccard,
    /// One minus the cosine of the angle between rows.
    Cosine,
    /// Cosine distance after centring each row on its mean.
    Correlation,
    /// Distance under the inverse sample covariance of the observations.
    Mahalanobis,
    /// Caller-supplied function, evaluated once per unordered pair.
    Custom(DistanceFn),
}

impl Metric {
    /// Minkowski metric of order `p`.
    pub fn minkowski(p: f64) -> Self {
        Metric::Minkowski { p }
    }

    /// Wrap a caller-supplied distance function.
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&[f64], &[f64]) -> f64 + Send + Sync + 'static,
    {
        Metric::Custom(Arc::new(f))
    }

    /// Canonical name.
    pub fn name(&self) -> &'static str {
        match self {
            Metric::Euclidean => "euclidean",
            Metric::Cityblock => "cityblock",
            Metric::Chebyshev => "chebyshev",
            Metric::Minkowski { .. } => "minkowski",
            Metric::SEuclidean => "seuclidean",
            Metric::Hamming => "hamming",
            Metric::Jaccard => "jaccard",
            Metric::Cosine => "cosine",
            Metric::Correlation => "correlation",
            Metric::Mahalanobis => "mahalanobis",
            Metric::Custom(_) => "custom",
        }
    }

    /// Whether this is plain Euclidean distance.
    pub fn is_euclidean(&self) -> bool {
        matches!(self, Metric::Euclidean)
    }

    /// Whether the metric has a boolean-input path.
    pub fn supports_bool(&self) -> bool {
        matches!(self, Metric::Hamming | Metric::Jaccard)
    }
}

impl fmt::Debug for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::Minkowski { p } => f.debug_struct("Minkowski").field("p", p).finish(),
            Metric::Custom(_) => f.write_str("Custom(..)"),
            other => f.write_str(other.name()),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::Minkowski { p } => write!(f, "minkowski(p={p})"),
            other => f.write_str(other.name()),
        }
    }
}

impl FromStr for Metric {
    type Err = Error;

    /// Parse a metric name. Short aliases are accepted; `minkowski` defaults to `p = 2`.
    fn from_str(s: &str) -> Result<Self> {
        let metric = match s.to_ascii_lowercase().as_str() {
            "euclidean" | "euclid" | "eu" | "e" => Metric::Euclidean,
            "cityblock" | "cblock" | "cb" | "c" => Metric::Cityblock,
            "chebyshev" | "cheby" | "cheb" | "ch" => Metric::Chebyshev,
            "minkowski" | "mi" | "m" => Metric::Minkowski { p: 2.0 },
            "seuclidean" | "se" | "s" => Metric::SEuclidean,
            "hamming" | "hamm" | "ha" | "h" => Metric::Hamming,
            "jaccard" | "jacc" | "ja" | "j" => Metric::Jaccard,
            "cosine" | "cos" => Metric::Cosine,
            "correlation" | "co" => Metric::Correlation,
            "mahalanobis" | "mahal" => Metric::Mahalanobis,
            _ => return Err(Error::UnknownMetric(s.to_string())),
        };
        Ok(metric)
    }
}

#[inline]
pub(crate) fn euclidean(u: &[f64], v: &[f64]) -> f64 {
    sq_euclidean(u, v).sqrt()
}

#[inline]
pub(crate) fn sq_euclidean(u: &[f64], v: &[f64]) -> f64 {
    u.iter()
        .zip(v)
        .map(|(a, b)| {
            let d = a - b;
            d * d
        })
        .sum()
}

#[inline]
pub(crate) fn cityblock(u: &[f64], v: &[f64]) -> f64 {
    u.iter().zip(v).map(|(a, b)| (a - b).abs()).sum()
}

#[inline]
pub(crate) fn chebyshev(u: &[f64], v: &[f64]) -> f64 {
    u.iter().zip(v).map(|(a, b)| (a - b).abs()).fold(0.0, f64::max)
}

#[inline]
pub(crate) fn minkowski(u: &[f64], v: &[f64], p: f64) -> f64 {
    u.iter()
        .zip(v)
        .map(|(a, b)| (a - b).abs().powf(p))
        .sum::<f64>()
        .powf(p.recip())
}

#[inline]
pub(crate) fn seuclidean(u: &[f64], v: &[f64], var: &[f64]) -> f64 {
    u.iter()
        .zip(v)
        .zip(var)
        .map(|((a, b), s)| {
            let d = a - b;
            d * d / s
        })
        .sum::<f64>()
        .sqrt()
}

#[inline]
pub(crate) fn hamming(u: &[f64], v: &[f64]) -> f64 {
    let differ = u.iter().zip(v).filter(|(a, b)| a != b).count();
    differ as f64 / u.len() as f64
}

#[inline]
pub(crate) fn jaccard(u: &[f64], v: &[f64]) -> f64 {
    let (differ, nonzero) = u
        .iter()
        .zip(v)
        .fold((0usize, 0usize), |(differ, nonzero), (a, b)| {
            let any = *a != 0.0 || *b != 0.0;
            (
                differ + usize::from(any && a != b),
                nonzero + usize::from(any),
            )
        });
    if nonzero == 0 {
        0.0
    } else {
        differ as f64 / nonzero as f64
    }
}

#[inline]
pub(crate) fn hamming_bool(u: &[bool], v: &[bool]) -> f64 {
    let differ = u.iter().zip(v).filter(|(a, b)| a != b).count();
    differ as f64 / u.len() as f64
}

#[inline]
pub(crate) fn jaccard_bool(u: &[bool], v: &[bool]) -> f64 {
    let (differ, nonzero) = u
        .iter()
        .zip(v)
        .fold((0usize, 0usize), |(differ, nonzero), (a, b)| {
            (differ + usize::from(a != b), nonzero + usize::from(*a || *b))
        });
    if nonzero == 0 {
        0.0
    } else {
        differ as f64 / nonzero as f64
    }
}

#[inline]
pub(crate) fn dot(u: &[f64], v: &[f64]) -> f64 {
    u.iter().zip(v).map(|(a, b)| a * b).sum()
}

/// Cosine distance given precomputed norms.
#[inline]
pub(crate) fn cosine(u: &[f64], v: &[f64], norm_u: f64, norm_v: f64) -> f64 {
    (1.0 - dot(u, v) / (norm_u * norm_v)).max(0.0)
}

/// `(u - v) VI (u - v)ᵀ` with `vi` row-major `dim × dim`.
#[inline]
pub(crate) fn mahalanobis(u: &[f64], v: &[f64], vi: &[f64]) -> f64 {
    let dim = u.len();
    let mut acc = 0.0;
    for i in 0..dim {
        let di = u[i] - v[i];
        let row = &vi[i * dim..(i + 1) * dim];
        let inner: f64 = row
            .iter()
            .zip(u.iter().zip(v))
            .map(|(w, (a, b))| w * (a - b))
            .sum();
        acc += di * inner;
    }
    acc.max(0.0).sqrt()
}
