pub mod accent;
pub mod engine;
pub mod output;
pub mod table;

pub use engine::{Engine, LineOutcome, TranslitState, TALING_MARK};
pub use output::OutputBuffer;
pub use table::{ClassEntry, ClassKind, ClassTable, ConjunctMode};
