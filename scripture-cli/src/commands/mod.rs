pub mod formats;
pub mod normalize;
