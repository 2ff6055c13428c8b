//! Generations of deduplicated trees and how they grow

mod enumerator;
mod expand;
mod set;

pub use enumerator::{Enumerator, RunReport, StepReport};
pub use expand::{expand, expand_with, ExpandOptions};
pub use set::Generation;
