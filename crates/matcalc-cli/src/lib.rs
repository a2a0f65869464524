pub mod classifiers;
pub mod util;
