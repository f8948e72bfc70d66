use serde::Deserialize;
use validator::Validate;

use crate::validation::{has_text, one_or_many};

/// Insight generation request; the analysis type may arrive under three names.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateInsightRequest {
    pub user_id: Option<i64>,
    pub analysis_type: Option<String>,
    pub insight_type: Option<String>,
    pub focus_area: Option<String>,
    #[serde(default)]
    pub force_regenerate: bool,
}

impl CreateInsightRequest {
    /// First non-blank of `analysisType`, `insightType`, `focusArea`.
    pub fn resolved_analysis_type(&self) -> Option<&str> {
        [&self.analysis_type, &self.insight_type, &self.focus_area]
            .into_iter()
            .map(Option::as_deref)
            .find(|v| has_text(*v))
            .flatten()
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionRequest {
    pub user_id: Option<i64>,
    pub suggestion_type: Option<String>,
    pub user_goal: Option<String>,
    pub time_frame: Option<String>,
    pub preferred_intensity: Option<String>,
    pub experience_level: Option<String>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub focus_areas: Vec<String>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub equipment: Vec<String>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub dietary_preferences: Vec<String>,
    pub weekly_schedule: Option<String>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub preferred_times: Vec<String>,
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn insight(json: &str) -> CreateInsightRequest {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn focus_area_alone_resolves() {
        let req = insight(r#"{"focusArea":"fitness"}"#);
        assert_eq!(req.resolved_analysis_type(), Some("fitness"));
        assert!(!req.force_regenerate);
    }

    #[test]
    fn explicit_type_wins_over_aliases() {
        let req = insight(r#"{"analysisType":"nutrition","focusArea":"fitness"}"#);
        assert_eq!(req.resolved_analysis_type(), Some("nutrition"));

        // Key order on the wire does not matter.
        let req = insight(r#"{"focusArea":"fitness","insightType":"sleep","analysisType":"nutrition"}"#);
        assert_eq!(req.resolved_analysis_type(), Some("nutrition"));
    }

    #[test]
    fn blank_values_are_skipped() {
        let req = insight(r#"{"analysisType":"  ","insightType":"overall","focusArea":"fitness"}"#);
        assert_eq!(req.resolved_analysis_type(), Some("overall"));

        let req = insight(r#"{"analysisType":"","forceRegenerate":true}"#);
        assert_eq!(req.resolved_analysis_type(), None);
        assert!(req.force_regenerate);
    }

    #[test]
    fn suggestion_lists_accept_single_values() {
        let req: SuggestionRequest = serde_json::from_str(
            r#"{
                "suggestionType":"exercise",
                "focusAreas":"core",
                "equipment":["mat","kettlebell"],
                "preferredTimes":"morning"
            }"#,
        )
        .unwrap();
        assert_eq!(req.focus_areas, vec!["core"]);
        assert_eq!(req.equipment, vec!["mat", "kettlebell"]);
        assert!(req.dietary_preferences.is_empty());
        assert_eq!(req.preferred_times, vec!["morning"]);
    }
}
