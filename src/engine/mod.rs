pub mod diff;
pub mod selection;
pub mod session;
pub mod verdict;

pub use diff::first_diff_offset;
pub use selection::{resolve_selection, RawSelection, SelectionSpan};
pub use session::{Phase, ReadingSession};
pub use verdict::{within_tolerance, Outcome};
