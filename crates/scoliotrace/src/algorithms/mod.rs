pub mod color;
pub mod stats;
pub mod equalize;
pub mod median;
pub mod edges;
pub mod isolation;
pub mod threshold;
pub mod crop;
pub mod trace;
pub mod compose;

pub use color::*;
pub use stats::*;
pub use equalize::*;
pub use median::*;
pub use edges::*;
pub use isolation::*;
pub use threshold::*;
pub use crop::*;
pub use trace::*;
pub use compose::*;
