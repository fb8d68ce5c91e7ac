pub mod aligner;
pub mod searcher;

pub use aligner::{Aligner, TabularHit};
pub use searcher::{
    group_by_target, DomainAlignment, ProfileHits, ProfileSearcher, SearchOptions, TargetHit,
    TargetView,
};
