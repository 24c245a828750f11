pub mod insight;
pub mod report;
pub mod smoothing;
pub mod valence;
pub mod validation;
pub mod window;
