pub mod traits;
pub mod path;
pub mod label_setting;
pub mod all_paths;

pub use traits::{
    LabelUpdate, Objective, PathSearchAlgorithm, SearchResult, SearchStats, SearchTree, StepRecord,
};
pub use path::{path_legs, path_value, path_weight, reconstruct_path, PathLeg};
pub use label_setting::LabelSetting;
