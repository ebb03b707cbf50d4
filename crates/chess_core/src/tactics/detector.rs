//! Detector trait and the combined pipeline

use super::fork::ForkDetector;
use super::hanging::HangingPieceDetector;
use super::pin::PinDetector;
use super::types::{PatternType, TacticalPattern};
use crate::position::Position;

/// Common contract for tactical pattern detectors
///
/// Detectors are stateless and independent: none reads another's output, so
/// they can run in any order or in parallel and their results concatenated.
/// Finding nothing is the common case, not an error.
pub trait PatternDetector: Send + Sync {
    /// Short identifier used in logs and reports
    fn name(&self) -> &'static str;

    /// Pattern types this detector can emit
    fn supported_types(&self) -> &'static [PatternType];

    /// Scan `position` and return every finding
    fn detect(&self, position: &Position) -> Vec<TacticalPattern>;
}

/// Every registered detector, in reporting order
pub fn default_detectors() -> Vec<Box<dyn PatternDetector>> {
    vec![
        Box::new(PinDetector),
        Box::new(ForkDetector),
        Box::new(HangingPieceDetector),
    ]
}

/// Run all detectors and concatenate their findings
pub fn detect_all(position: &Position) -> Vec<TacticalPattern> {
    default_detectors()
        .iter()
        .flat_map(|detector| detector.detect(position))
        .collect()
}

/// Order findings by severity (highest first), then by value
///
/// Stable, so equal findings keep detector order.
pub fn summarize(mut patterns: Vec<TacticalPattern>) -> Vec<TacticalPattern> {
    patterns.sort_by(|a, b| {
        b.severity
            .cmp(&a.severity)
            .then_with(|| b.value.cmp(&a.value))
    });
    patterns
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tactics::types::PatternSeverity;

    #[test]
    fn test_starting_position_has_no_patterns() {
        //! Nothing is pinned, forked or hanging before the first move
        assert!(detect_all(&Position::starting()).is_empty());
    }

    #[test]
    fn test_supported_types_are_disjoint() {
        let detectors = default_detectors();
        let mut seen = Vec::new();
        for detector in &detectors {
            for kind in detector.supported_types() {
                assert!(!seen.contains(kind), "{} duplicated", kind);
                seen.push(*kind);
            }
        }
        assert_eq!(seen.len(), 7);
    }

    #[test]
    fn test_summarize_orders_by_severity_then_value() {
        //! Knight fork of king and rook plus a hanging pawn elsewhere
        let position: Position = "4k3/3r4/5N2/8/8/p7/8/R3K3 w - - 0 1".parse().unwrap();
        let patterns = summarize(detect_all(&position));
        assert_eq!(patterns.len(), 2);
        assert_eq!(patterns[0].pattern_type, PatternType::KnightFork);
        assert_eq!(patterns[1].pattern_type, PatternType::HangingPiece);
        for pair in patterns.windows(2) {
            assert!(pair[0].severity >= pair[1].severity);
            if pair[0].severity == pair[1].severity {
                assert!(pair[0].value >= pair[1].value);
            }
        }
        assert!(patterns.iter().any(|p| p.severity >= PatternSeverity::High));
    }
}
