pub mod vocab;
pub mod accumulate;
pub mod normalize;
pub mod model;
pub mod builder;
pub mod source;
