pub mod layer_set;
pub mod matrix;
pub mod qr_code;
pub mod threshold;

pub use layer_set::{DistributionStats, LayerSet};
pub use matrix::BitMatrix;
pub use qr_code::{ECLevel, QrMatrix, Version};
pub use threshold::ThresholdParams;
