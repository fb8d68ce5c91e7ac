//! Annotation core: turning raw tool hits into classified domain architectures

pub mod classify;
pub mod coverage;
pub mod deoverlap;
pub mod filter;
pub mod hit;
pub mod nter;
pub mod records;

pub use classify::{classify, cter_string, nter_string, summarize, Flag, SummaryRow};
pub use coverage::{reduce_target, TargetSpan, Threshold, TriplicationCall};
pub use deoverlap::{deoverlap, sort_tuples, DomainTuple};
pub use filter::filter_domains;
pub use hit::Hit;
pub use nter::{select_nearest, NterEntry, NterMapping};
pub use records::{group_by_target, DomainAlignment, ProfileHits, TabularHit, TargetHit, TargetView};
