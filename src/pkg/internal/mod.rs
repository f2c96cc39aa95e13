pub mod adaptors;
pub mod documents;
pub mod normalize;
pub mod scoring;
pub mod tiers;
