// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

pub mod l2;
pub mod model;
pub mod normal;

pub use l2::{CostL2Mean, L2Cache};
pub use model::CostModel;
pub use normal::{CostNormalMeanVar, NormalCache, VARIANCE_REGULARIZATION};
