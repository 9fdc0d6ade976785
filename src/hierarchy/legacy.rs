//! Conversion to and from the legacy 1-indexed, 3-column linkage format.
//!
//! ```text
//!   current (0-based)            legacy (1-based)
//!   [0, 1, 1.0, 2]        ⇄      [1, 2, 1.0]
//!   [2, 3, 1.5, 3]               [3, 4, 1.5]
//! ```
//!
//! The legacy format has no count column; counts are recomputed on import.

use super::dendrogram::Dendrogram;
use super::validate::{check_linkage, check_structure};
use crate::error::Result;
use ndarray::{s, Array2, ArrayView2};

/// Convert a legacy (n−1)×3 matrix with 1-based ids into a linkage matrix.
///
/// The shifted matrix must pass the structural checks (distances, id
/// range, uniqueness, ordering); counts are then recomputed from the leaves.
///
/// ```rust
/// use hcluster::from_legacy_linkage;
/// use ndarray::array;
///
/// let legacy = array![[1.0, 2.0, 1.0], [3.0, 4.0, 1.5]];
/// let z = from_legacy_linkage(legacy.view()).unwrap();
/// assert_eq!(z, array![[0.0, 1.0, 1.0, 2.0], [2.0, 3.0, 1.5, 3.0]]);
/// ```
pub fn from_legacy_linkage(z: ArrayView2<'_, f64>) -> Result<Array2<f64>> {
    let mut shifted = z.to_owned();
    if shifted.ncols() >= 2 {
        shifted.slice_mut(s![.., 0..2]).mapv_inplace(|v| v - 1.0);
    }
    let n = check_structure(shifted.view(), 3)?;
    Ok(Dendrogram::from_structure(shifted.view(), n).to_linkage())
}

/// Convert a linkage matrix to the legacy (n−1)×3, 1-based format.
pub fn to_legacy_linkage(z: ArrayView2<'_, f64>) -> Result<Array2<f64>> {
    check_linkage(z)?;
    let mut out = z.slice(s![.., 0..3]).to_owned();
    out.slice_mut(s![.., 0..2]).mapv_inplace(|v| v + 1.0);
    Ok(out)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, unused_results)]
mod tests {
    use super::*;
    use crate::cluster::{linkage, Method};
    use crate::distance::{random_condensed, Metric};
    use crate::error::{Corruption, Error, ErrorKind};
    use ndarray::array;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn to_legacy_drops_counts() {
        let z = array![[0.0, 1.0, 1.0, 2.0], [2.0, 3.0, 1.5, 3.0]];
        assert_eq!(
            to_legacy_linkage(z.view()).unwrap(),
            array![[1.0, 2.0, 1.0], [3.0, 4.0, 1.5]]
        );
    }

    #[test]
    fn roundtrip_over_random_linkages() {
        let mut rng = StdRng::seed_from_u64(7);
        for n in 2..12 {
            let y = random_condensed(n, &mut rng).unwrap();
            for method in [Method::Single, Method::Average, Method::Complete] {
                let z = linkage((&y).into(), method, &Metric::Euclidean).unwrap();
                let legacy = to_legacy_linkage(z.view()).unwrap();
                assert_eq!(legacy.dim(), (n - 1, 3));
                assert_eq!(from_legacy_linkage(legacy.view()).unwrap(), z);
            }
        }
    }

    #[test]
    fn legacy_column_order_preserved() {
        let legacy = array![[2.0, 1.0, 1.0], [3.0, 4.0, 2.0]];
        let z = from_legacy_linkage(legacy.view()).unwrap();
        assert_eq!(z, array![[1.0, 0.0, 1.0, 2.0], [2.0, 3.0, 2.0, 3.0]]);
        assert_eq!(to_legacy_linkage(z.view()).unwrap(), legacy);

        let legacy = array![[3.0, 1.0, 0.5], [4.0, 2.0, 0.8], [6.0, 5.0, 1.2]];
        let z = from_legacy_linkage(legacy.view()).unwrap();
        assert_eq!(z.column(3).to_vec(), vec![2.0, 2.0, 4.0]);
        assert_eq!(to_legacy_linkage(z.view()).unwrap(), legacy);
    }

    #[test]
    fn from_legacy_rejects_bad_structure() {
        // Zero is not a valid 1-based id.
        let err = from_legacy_linkage(array![[0.0, 1.0, 1.0]].view()).unwrap_err();
        assert_eq!(
            err,
            Error::corrupt(0, Corruption::IdOutOfRange { value: -1.0 })
        );

        let err = from_legacy_linkage(array![[1.0, 2.0, 1.0, 2.0]].view()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ShapeMismatch);

        let err = from_legacy_linkage(array![[1.0, 2.0, -1.0]].view()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CorruptStructure);
    }

    #[test]
    fn to_legacy_validates() {
        let z = array![[0.0, 1.0, 1.0, 7.0]];
        assert_eq!(to_legacy_linkage(z.view()).unwrap_err().kind(), ErrorKind::CorruptStructure);
    }
}
