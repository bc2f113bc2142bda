//! Risk Scoring Module
//!
//! Deploy frequency in the scanned window mapped to a coarse tier.
//! An early signal for "serial deployer" behaviour, not a security audit.

use crate::models::types::RiskTier;
use crate::utils::constants::MEDIUM_RISK_DEPLOY_THRESHOLD;

/// `Medium` above the threshold, `Low` otherwise
pub fn score(deploy_count: u32) -> RiskTier {
    if deploy_count > MEDIUM_RISK_DEPLOY_THRESHOLD {
        RiskTier::Medium
    } else {
        RiskTier::Low
    }
}

impl RiskTier {
    /// Human-readable explanation, logged with every completed analysis
    pub fn recommendation(&self) -> &'static str {
        match self {
            RiskTier::Low => "Few recent deployments from this address.",
            RiskTier::Medium => {
                "Frequent deployer. Review the other contracts before interacting."
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_boundary() {
        assert_eq!(score(0), RiskTier::Low);
        assert_eq!(score(5), RiskTier::Low);
        assert_eq!(score(6), RiskTier::Medium);
        assert_eq!(score(50), RiskTier::Medium);
    }

    #[test]
    fn test_recommendation_follows_tier() {
        assert!(score(2).recommendation().starts_with("Few recent deployments"));
        assert!(score(9).recommendation().starts_with("Frequent deployer"));
        assert_ne!(RiskTier::Low.recommendation(), RiskTier::Medium.recommendation());
    }

    #[test]
    fn test_tier_serialization() {
        assert_eq!(serde_json::to_value(RiskTier::Medium).unwrap(), "Medium");
        assert_eq!(RiskTier::Low.as_str(), "Low");
    }
}
