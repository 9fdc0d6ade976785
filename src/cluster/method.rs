//! Linkage methods and their Lance–Williams coefficients.

use crate::error::{Error, Result};
use core::fmt;
use core::str::FromStr;

/// Linkage method for hierarchical clustering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Method {
    /// Single linkage: minimum distance between clusters.
    #[default]
    Single,
    /// Complete linkage: maximum distance between clusters.
    Complete,
    /// Average linkage (UPGMA): mean pairwise distance.
    Average,
    /// Weighted linkage (WPGMA): mean of the two parents' distances.
    Weighted,
    /// Centroid linkage (UPGMC): distance between size-weighted centroids.
    Centroid,
    /// Median linkage (WPGMC): distance between unweighted centroids.
    Median,
    /// Ward's method: minimize within-cluster variance.
    Ward,
}

/// Coefficients of the Lance–Williams update
///
/// ```text
/// d(q,u) = α_s·d(s,u) + α_t·d(t,u) + β·d(s,t) + γ·|d(s,u) − d(t,u)|
/// ```
///
/// For centroid, median and Ward the distances are squared.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LanceWilliams {
    /// Weight on d(s,u).
    pub alpha_s: f64,
    /// Weight on d(t,u).
    pub alpha_t: f64,
    /// Weight on d(s,t).
    pub beta: f64,
    /// Weight on |d(s,u) − d(t,u)|.
    pub gamma: f64,
}

impl LanceWilliams {
    /// Evaluate the recurrence.
    #[inline]
    pub fn apply(&self, d_su: f64, d_tu: f64, d_st: f64) -> f64 {
        self.alpha_s * d_su + self.alpha_t * d_tu + self.beta * d_st + self.gamma * (d_su - d_tu).abs()
    }
}

impl Method {
    /// All methods, distance-only first.
    pub const ALL: [Method; 7] = [
        Method::Single,
        Method::Complete,
        Method::Average,
        Method::Weighted,
        Method::Centroid,
        Method::Median,
        Method::Ward,
    ];

    /// Canonical name.
    pub fn name(self) -> &'static str {
        match self {
            Method::Single => "single",
            Method::Complete => "complete",
            Method::Average => "average",
            Method::Weighted => "weighted",
            Method::Centroid => "centroid",
            Method::Median => "median",
            Method::Ward => "ward",
        }
    }

    /// Whether the method needs raw observations under the Euclidean metric.
    pub fn requires_euclidean(self) -> bool {
        matches!(self, Method::Centroid | Method::Median | Method::Ward)
    }

    /// Whether the method keeps running centroids instead of a distance recurrence.
    pub(crate) fn tracks_centroids(self) -> bool {
        matches!(self, Method::Centroid | Method::Median)
    }

    /// Lance–Williams coefficients for merging `s` and `t`, updating against `u`.
    ///
    /// Centroid, median and Ward coefficients act on squared Euclidean
    /// distances. The engine computes centroid and median heights from
    /// running centres instead, which gives the same values.
    pub fn coefficients(self, n_s: usize, n_t: usize, n_u: usize) -> LanceWilliams {
        let (s, t, u) = (n_s as f64, n_t as f64, n_u as f64);
        match self {
            Method::Single => LanceWilliams {
                alpha_s: 0.5,
                alpha_t: 0.5,
                beta: 0.0,
                gamma: -0.5,
            },
            Method::Complete => LanceWilliams {
                alpha_s: 0.5,
                alpha_t: 0.5,
                beta: 0.0,
                gamma: 0.5,
            },
            Method::Average => LanceWilliams {
                alpha_s: s / (s + t),
                alpha_t: t / (s + t),
                beta: 0.0,
                gamma: 0.0,
            },
            Method::Weighted => LanceWilliams {
                alpha_s: 0.5,
                alpha_t: 0.5,
                beta: 0.0,
                gamma: 0.0,
            },
            Method::Centroid => LanceWilliams {
                alpha_s: s / (s + t),
                alpha_t: t / (s + t),
                beta: -(s * t) / ((s + t) * (s + t)),
                gamma: 0.0,
            },
            Method::Median => LanceWilliams {
                alpha_s: 0.5,
                alpha_t: 0.5,
                beta: -0.25,
                gamma: 0.0,
            },
            Method::Ward => {
                let total = u + s + t;
                LanceWilliams {
                    alpha_s: (u + s) / total,
                    alpha_t: (u + t) / total,
                    beta: -u / total,
                    gamma: 0.0,
                }
            }
        }
    }

    /// Distance from the merged cluster `q = s ∪ t` to `u`.
    ///
    /// Single and complete use `min`/`max`, the exact closed form of their
    /// coefficients. Ward applies the recurrence to squared distances.
    /// Centroid and median are handled by the engine from running centroids.
    #[inline]
    pub(crate) fn update(self, d_su: f64, d_tu: f64, d_st: f64, n_s: usize, n_t: usize, n_u: usize) -> f64 {
        match self {
            Method::Single => d_su.min(d_tu),
            Method::Complete => d_su.max(d_tu),
            Method::Average => {
                let (s, t) = (n_s as f64, n_t as f64);
                (s * d_su + t * d_tu) / (s + t)
            }
            Method::Weighted => 0.5 * (d_su + d_tu),
            Method::Ward | Method::Centroid | Method::Median => self
                .coefficients(n_s, n_t, n_u)
                .apply(d_su * d_su, d_tu * d_tu, d_st * d_st)
                .max(0.0)
                .sqrt(),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Method {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Method::ALL
            .into_iter()
            .find(|m| m.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::UnknownMethod(s.to_string()))
    }
}
