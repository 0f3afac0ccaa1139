//! Known raise and dispel actions.
//!
//! Sources that report raw action ids instead of a category resolve them
//! through this table. Anything not listed is not tracked.

use phf::phf_map;

use crate::casts::CastCategory;

/// Static data about a tracked action
#[derive(Debug, Clone, Copy)]
pub struct ActionInfo {
    pub name: &'static str,
    pub category: CastCategory,
}

impl ActionInfo {
    const fn raise(name: &'static str) -> Self {
        Self {
            name,
            category: CastCategory::Raise,
        }
    }

    const fn dispel(name: &'static str) -> Self {
        Self {
            name,
            category: CastCategory::Dispel,
        }
    }
}

/// Get action info for an action id
pub fn get_action_info(action_id: u32) -> Option<&'static ActionInfo> {
    TRACKED_ACTIONS.get(&action_id)
}

/// Category of a tracked action, if any
pub fn cast_category(action_id: u32) -> Option<CastCategory> {
    get_action_info(action_id).map(|info| info.category)
}

/// Action lookup table indexed by action id
pub static TRACKED_ACTIONS: phf::Map<u32, ActionInfo> = phf_map! {
    // ═══════════════════════════════════════════════════════════════════════
    // Raises
    // ═══════════════════════════════════════════════════════════════════════
    125u32 => ActionInfo::raise("Raise"),            // CNJ / WHM
    173u32 => ActionInfo::raise("Resurrection"),     // ACN / SMN / SCH
    3603u32 => ActionInfo::raise("Ascend"),          // AST
    7523u32 => ActionInfo::raise("Verraise"),        // RDM
    18317u32 => ActionInfo::raise("Angel Whisper"),  // BLU
    24287u32 => ActionInfo::raise("Egeiro"),         // SGE

    // ═══════════════════════════════════════════════════════════════════════
    // Dispels
    // ═══════════════════════════════════════════════════════════════════════
    7568u32 => ActionInfo::dispel("Esuna"),
    7408u32 => ActionInfo::dispel("The Warden's Paean"), // BRD
    18318u32 => ActionInfo::dispel("Exuviation"),        // BLU
};
