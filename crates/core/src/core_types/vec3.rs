//! Vector type alias for sampled wind.

use nalgebra::Vector3;

/// Wind sample at a point: `x` = zonal wind u (m/s), `y` = meridional wind v
/// (m/s), `z` = vertical motion omega (Pa/s).
///
/// This is a simple alias for `nalgebra::Vector3<f64>`, so a reversed wind is
/// just `-wind`.
pub type WindVector = Vector3<f64>;
