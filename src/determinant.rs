// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! 3x3 determinants by cofactor expansion along the first row.

use crate::error::Error;

/// Returns the determinant of a row-major 3x3 matrix.  Any other
/// shape, including a ragged one, is an `InvalidDimension` error.
pub fn determinant<R: AsRef<[f64]>>(matrix: &[R]) -> Result<f64, Error> {
    if matrix.len() != 3 {
        return Err(Error::InvalidDimension {
            rows: matrix.len(),
            columns: matrix.first().map_or(0, |r| r.as_ref().len()),
        });
    }
    if let Some(bad) = matrix.iter().find(|r| r.as_ref().len() != 3) {
        return Err(Error::InvalidDimension {
            rows: 3,
            columns: bad.as_ref().len(),
        });
    }

    let (a, b, c) = (matrix[0].as_ref(), matrix[1].as_ref(), matrix[2].as_ref());
    Ok(det3(&[
        [a[0], a[1], a[2]],
        [b[0], b[1], b[2]],
        [c[0], c[1], c[2]],
    ]))
}

/// The unchecked form, for callers that already hold a fixed-size
/// matrix.
#[inline]
pub fn det3(m: &[[f64; 3]; 3]) -> f64 {
    m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
        - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
        + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
}
