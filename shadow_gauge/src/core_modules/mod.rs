pub mod estimator;
pub mod frame;
pub mod frame_history;
pub mod histogram;
pub mod pixel;
pub mod segmenter;
pub mod shadow_summary;
pub mod stability;
pub mod stats;
