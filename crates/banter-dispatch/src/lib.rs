//! Response orchestration for the Banter companion engine.
//!
//! Routes each utterance through the duplicate-question memory, the local
//! rule table, and the streaming fallback, and maps the resulting intent key
//! to an audio cue group and an animation trigger on the host collaborators.

pub mod dispatcher;
pub mod error;
pub mod modality;
pub mod traits;

pub use dispatcher::{Collaborators, Reply, ReplySource, ResponseDispatcher};
pub use error::DispatchError;
pub use modality::{group_clips_by_prefix, resolve_cue_group, select_trigger};
pub use traits::{
    AnimationDriver, AudioClip, CueGroups, CueLibrary, CuePlayer, MessageRenderer, RuleSource,
};
