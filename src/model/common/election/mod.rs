mod access_code;
mod candidate;
mod visibility;

pub use access_code::{AccessCode, ACCESS_CODE_LENGTH};
pub use candidate::Candidate;
pub use visibility::Visibility;

/// Our election IDs are integers, allocated sequentially by the store.
pub type ElectionId = u32;
/// Candidates are identified by their position in the election's candidate list.
pub type CandidateIndex = usize;
