//! Jobs with an inherent raise or dispel ability.
//!
//! Backs the "restrict to capable jobs" display gates. Limited-use duty
//! actions are ignored; only abilities a job learns on its own count.

use phf::phf_map;

use crate::casts::CastCategory;

/// Minimum levels at which a job can raise / dispel
#[derive(Debug, Clone, Copy)]
pub struct JobCapability {
    pub abbreviation: &'static str,
    pub raise_min_level: Option<u8>,
    pub dispel_min_level: Option<u8>,
}

impl JobCapability {
    const fn new(
        abbreviation: &'static str,
        raise_min_level: Option<u8>,
        dispel_min_level: Option<u8>,
    ) -> Self {
        Self {
            abbreviation,
            raise_min_level,
            dispel_min_level,
        }
    }

    /// Whether a character of this job at `level` can perform the action
    pub fn can_perform(&self, category: CastCategory, level: u8) -> bool {
        let min = match category {
            CastCategory::Raise => self.raise_min_level,
            CastCategory::Dispel => self.dispel_min_level,
        };
        min.is_some_and(|min| level >= min)
    }
}

/// Look up capability data for a job id
pub fn get_job_capability(job_id: u8) -> Option<&'static JobCapability> {
    JOB_CAPABILITIES.get(&job_id)
}

/// Whether the given job and level can perform actions of `category`.
/// Unknown jobs can do neither.
pub fn is_capable(job_id: u8, level: u8, category: CastCategory) -> bool {
    get_job_capability(job_id).is_some_and(|job| job.can_perform(category, level))
}

/// Capability table indexed by job id
pub static JOB_CAPABILITIES: phf::Map<u8, JobCapability> = phf_map! {
    6u8 => JobCapability::new("CNJ", Some(1), Some(1)),
    23u8 => JobCapability::new("BRD", None, Some(35)),
    24u8 => JobCapability::new("WHM", Some(1), Some(1)),
    26u8 => JobCapability::new("ACN", Some(1), None),
    27u8 => JobCapability::new("SMN", Some(1), None),
    28u8 => JobCapability::new("SCH", Some(1), Some(1)),
    33u8 => JobCapability::new("AST", Some(1), Some(1)),
    35u8 => JobCapability::new("RDM", Some(64), None),
    36u8 => JobCapability::new("BLU", Some(1), Some(1)),
    40u8 => JobCapability::new("SGE", Some(1), Some(1)),
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_gated_jobs() {
        assert!(!is_capable(35, 63, CastCategory::Raise));
        assert!(is_capable(35, 64, CastCategory::Raise));
        assert!(!is_capable(35, 90, CastCategory::Dispel));

        assert!(!is_capable(23, 34, CastCategory::Dispel));
        assert!(is_capable(23, 35, CastCategory::Dispel));
        assert!(!is_capable(23, 90, CastCategory::Raise));
    }

    #[test]
    fn unknown_job_is_incapable() {
        // Warrior
        assert!(!is_capable(21, 90, CastCategory::Raise));
        assert!(!is_capable(21, 90, CastCategory::Dispel));
    }
}
