use redforge_core::model::{TargetProfile, Technique, TechniqueSource};

/// Platform-intersection bonus.
const W_PLATFORM: f64 = 3.0;
/// Per-matching-domain bonus.
const W_DOMAIN: f64 = 2.0;
/// AI-like profile + ATLAS source bonus.
const W_AI: f64 = 2.5;
/// Flat weight applied to platform-less techniques, chosen as the smallest
/// of the three flat weights above so they stay eligible without dominating.
const BASELINE: f64 = 2.0;

/// Ranks techniques against a `TargetProfile` and returns the top `limit`.
pub struct TtpSelector;

impl TtpSelector {
    /// Scores and ranks `techniques`, returning at most `limit` entries with
    /// `score` populated, highest first. Ties break by source (ATLAS first
    /// for AI-like profiles, otherwise ATT&CK first), then by
    /// `technique_id` lexicographically.
    #[must_use]
    pub fn select(profile: &TargetProfile, techniques: &[Technique], limit: usize) -> Vec<Technique> {
        let is_ai = profile.is_ai_like();
        let risk_bonus = profile.risk_scale();

        let mut scored: Vec<Technique> = techniques
            .iter()
            .cloned()
            .map(|mut t| {
                t.score = Self::score(&t, profile, is_ai, risk_bonus);
                t
            })
            .collect();

        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| Self::source_rank(a.source, is_ai).cmp(&Self::source_rank(b.source, is_ai)))
                .then_with(|| a.technique_id.cmp(&b.technique_id))
        });

        scored.truncate(limit);
        scored
    }

    fn score(technique: &Technique, profile: &TargetProfile, is_ai: bool, risk_bonus: f64) -> f64 {
        let platform_score = if technique.platforms.is_empty() {
            BASELINE
        } else if technique
            .platforms
            .iter()
            .any(|p| profile.platforms.contains(p))
        {
            W_PLATFORM
        } else {
            0.0
        };

        let domain_score = profile
            .domains
            .iter()
            .filter(|d| technique.metadata.get("domain").and_then(|v| v.as_str()) == Some(d.as_str()))
            .count() as f64
            * W_DOMAIN;

        let ai_score = if is_ai && technique.source == TechniqueSource::Atlas {
            W_AI
        } else {
            0.0
        };

        platform_score + domain_score + ai_score + risk_bonus
    }

    /// Lower rank sorts first. ATLAS wins ties for AI-like targets,
    /// otherwise ATT&CK wins.
    fn source_rank(source: TechniqueSource, is_ai: bool) -> u8 {
        match (source, is_ai) {
            (TechniqueSource::Atlas, true) | (TechniqueSource::Attack, false) => 0,
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn technique(id: &str, source: TechniqueSource, platforms: Vec<&str>) -> Technique {
        Technique::new(
            id,
            id,
            source,
            Vec::new(),
            platforms.into_iter().map(str::to_string).collect(),
        )
    }

    #[test]
    fn platform_match_outscores_baseline() {
        let mut profile = TargetProfile::default();
        profile.platforms = vec!["web".to_string()];
        let matching = technique("T1", TechniqueSource::Attack, vec!["web"]);
        let platformless = technique("T2", TechniqueSource::Attack, vec![]);
        let ranked = TtpSelector::select(&profile, &[matching, platformless], 2);
        assert_eq!(ranked[0].technique_id, "T1");
        assert!(ranked[0].score > ranked[1].score);
    }

    #[test]
    fn ai_like_profile_prefers_atlas_on_tie() {
        let mut profile = TargetProfile::default();
        profile.agent_type = "llm-assistant".to_string();
        let atlas = technique("A1", TechniqueSource::Atlas, vec![]);
        let attack = technique("B1", TechniqueSource::Attack, vec![]);
        let ranked = TtpSelector::select(&profile, &[attack, atlas], 2);
        assert_eq!(ranked[0].source, TechniqueSource::Atlas);
    }

    #[test]
    fn ties_break_lexicographically() {
        let profile = TargetProfile::default();
        let a = technique("T2", TechniqueSource::Attack, vec![]);
        let b = technique("T1", TechniqueSource::Attack, vec![]);
        let ranked = TtpSelector::select(&profile, &[a, b], 2);
        assert_eq!(ranked[0].technique_id, "T1");
    }

    #[test]
    fn limit_truncates_results() {
        let profile = TargetProfile::default();
        let techniques: Vec<_> = (0..5)
            .map(|i| technique(&format!("T{i}"), TechniqueSource::Attack, vec![]))
            .collect();
        assert_eq!(TtpSelector::select(&profile, &techniques, 3).len(), 3);
    }
}
