// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::{ChangePointResult, Constraints, OnsetError, SeriesView};

/// Offline detector contract: full series in, full result out.
pub trait OfflineDetector {
    fn detect(
        &self,
        x: &SeriesView<'_>,
        constraints: &Constraints,
    ) -> Result<ChangePointResult, OnsetError>;
}
