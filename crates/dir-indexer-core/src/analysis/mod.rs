pub mod statistics;
pub mod tree;

pub use statistics::{ExtensionSummary, ReportStatistics};
pub use tree::{build_tree, TreeNode};
