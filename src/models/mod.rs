pub mod coords;
pub mod visit;

pub use coords::Coords;
pub use visit::{Visit, VisitKind, VisitType};
