//! CLI command implementations
//!
//! One module per subcommand. Each `execute` takes its parsed
//! arguments, the shared services and the output format.

pub mod clear;
pub mod index;
pub mod info;
pub mod interactive;
pub mod search;

pub use clear::ClearArgs;
pub use index::IndexArgs;
pub use info::InfoArgs;
pub use interactive::InteractiveArgs;
pub use search::SearchArgs;
