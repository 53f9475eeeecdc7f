/// Implementation of the OpenMinSet indexed priority queue.
pub mod open_min_set;


pub use open_min_set::OpenMinSet;
