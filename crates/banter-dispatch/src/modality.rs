//! Intent-to-modality mapping: cue group lookup and animation trigger choice.

use banter_core::config::AnimationConfig;
use banter_core::types::FALLBACK_INTENT;

use crate::traits::{AnimationDriver, AudioClip, CueGroups};

/// Build cue groups from a flat clip list, keyed by the asset-name prefix
/// before the first underscore. Clips without an underscore group under
/// their whole name.
pub fn group_clips_by_prefix(clips: impl IntoIterator<Item = AudioClip>) -> CueGroups {
    let mut groups = CueGroups::new();
    for clip in clips {
        let key = clip
            .name
            .split_once('_')
            .map(|(prefix, _)| prefix)
            .unwrap_or(&clip.name)
            .to_string();
        groups.entry(key).or_default().push(clip);
    }
    groups
}

/// Look up the cue group for an intent key, falling back to the `fallback`
/// group when the key has no group of its own. `None` when neither exists.
pub fn resolve_cue_group<'a>(
    groups: &'a CueGroups,
    intent: &str,
) -> Option<(&'a str, &'a [AudioClip])> {
    groups
        .get_key_value(intent)
        .or_else(|| groups.get_key_value(FALLBACK_INTENT))
        .map(|(key, clips)| (key.as_str(), clips.as_slice()))
}

/// Choose the animation trigger for an intent key.
///
/// The streaming-fallback intent uses its dedicated trigger; greeting- and
/// farewell-flavored keys use theirs; everything else uses the generic
/// success trigger. A choice the driver does not know degrades to the
/// generic success trigger.
pub fn select_trigger<'a>(
    intent: &str,
    config: &'a AnimationConfig,
    driver: &dyn AnimationDriver,
) -> &'a str {
    let chosen = if intent == FALLBACK_INTENT {
        &config.fallback_trigger
    } else if ["hello", "hi", "hey"].iter().any(|g| intent.contains(g)) {
        &config.greeting_trigger
    } else if ["bye", "thanks"].iter().any(|f| intent.contains(f)) {
        &config.farewell_trigger
    } else {
        &config.success_trigger
    };

    if driver.has_trigger(chosen) {
        chosen
    } else {
        tracing::debug!(trigger = %chosen, "Unknown animation trigger, degrading to success");
        &config.success_trigger
    }
}
