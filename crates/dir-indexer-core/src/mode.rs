use crate::config::ModeConfig;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportMode {
    /// All records serialized into the report artifact.
    Embedded,
    /// Records written to an indexed SQLite store queried at view time.
    Relational,
}

impl fmt::Display for ReportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportMode::Embedded => write!(f, "embedded"),
            ReportMode::Relational => write!(f, "relational"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModeFlags {
    pub force_relational: bool,
    pub force_embedded: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModeWarning {
    /// Both flags were given; the relational flag wins.
    ConflictingFlags,
    /// Embedding was forced above the threshold.
    OversizedEmbedded { file_count: usize, threshold: usize },
}

impl fmt::Display for ModeWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModeWarning::ConflictingFlags => write!(
                f,
                "both relational and embedded modes were requested; using relational mode"
            ),
            ModeWarning::OversizedEmbedded {
                file_count,
                threshold,
            } => write!(
                f,
                "embedding {} files (threshold {}) may exhaust memory in the report viewer",
                file_count, threshold
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeDecision {
    pub mode: ReportMode,
    pub warnings: Vec<ModeWarning>,
}

impl ModeDecision {
    /// True when the operator has to confirm before an oversized dataset is
    /// embedded.
    pub fn requires_confirmation(&self) -> bool {
        self.warnings
            .iter()
            .any(|w| matches!(w, ModeWarning::OversizedEmbedded { .. }))
    }
}

/// Choose the report mode for a scan of `file_count` files.
pub fn select_mode(file_count: usize, flags: ModeFlags, config: &ModeConfig) -> ModeDecision {
    let threshold = config.relational_threshold;
    let mut warnings = Vec::new();

    if flags.force_relational {
        if flags.force_embedded {
            warnings.push(ModeWarning::ConflictingFlags);
        }
        return ModeDecision {
            mode: ReportMode::Relational,
            warnings,
        };
    }

    if file_count > threshold {
        if !flags.force_embedded {
            return ModeDecision {
                mode: ReportMode::Relational,
                warnings,
            };
        }
        warnings.push(ModeWarning::OversizedEmbedded {
            file_count,
            threshold,
        });
    }

    ModeDecision {
        mode: ReportMode::Embedded,
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ModeConfig {
        ModeConfig {
            relational_threshold: 200_000,
        }
    }

    #[test]
    fn test_large_scan_goes_relational() {
        let decision = select_mode(250_000, ModeFlags::default(), &config());
        assert_eq!(decision.mode, ReportMode::Relational);
        assert!(decision.warnings.is_empty());
    }

    #[test]
    fn test_forced_embedding_above_threshold_warns() {
        let flags = ModeFlags {
            force_embedded: true,
            ..Default::default()
        };
        let decision = select_mode(250_000, flags, &config());
        assert_eq!(decision.mode, ReportMode::Embedded);
        assert!(decision.requires_confirmation());
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let decision = select_mode(200_000, ModeFlags::default(), &config());
        assert_eq!(decision.mode, ReportMode::Embedded);
        assert!(decision.warnings.is_empty());
    }

    #[test]
    fn test_relational_flag_overrides_embedded_flag() {
        let flags = ModeFlags {
            force_relational: true,
            force_embedded: true,
        };
        let decision = select_mode(10, flags, &config());
        assert_eq!(decision.mode, ReportMode::Relational);
        assert_eq!(decision.warnings, vec![ModeWarning::ConflictingFlags]);
        assert!(!decision.requires_confirmation());
    }

    #[test]
    fn test_threshold_is_configurable() {
        let decision = select_mode(
            160_000,
            ModeFlags::default(),
            &ModeConfig {
                relational_threshold: 150_000,
            },
        );
        assert_eq!(decision.mode, ReportMode::Relational);
    }
}
