pub mod bitmap;
pub mod matrix;

pub use bitmap::NodeBitmap;
pub use matrix::SquareMatrix;
