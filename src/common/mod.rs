/// Capability traits the algorithms are written against
pub mod traits;

pub use traits::{Direction, GraphView};
