use serde::{Deserialize, Serialize};

/// Stage 1: business context plus ranked opportunity areas.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemAnalysis {
    pub business_context: String,
    pub opportunities: Vec<Opportunity>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Opportunity {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Estimated monthly cost of leaving the problem unsolved, in dollars.
    pub estimated_monthly_cost: f64,
    pub severity: String,
    pub ai_solution_category: String,
}

/// Stage 2: per-opportunity candidate tools grounded in current product data.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolResearch {
    pub opportunities: Vec<OpportunityTools>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpportunityTools {
    pub opportunity: String,
    pub tools: Vec<CandidateTool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateTool {
    pub name: String,
    pub pricing: String,
    #[serde(default)]
    pub integration_notes: Option<String>,
    #[serde(default)]
    pub case_study: Option<String>,
}

/// Stage 3: curated shortlist with normalized costs and a roadmap.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CuratedTools {
    pub shortlist: Vec<CuratedTool>,
    #[serde(default)]
    pub roadmap: Vec<RoadmapPhase>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CuratedTool {
    pub name: String,
    pub monthly_investment: f64,
    #[serde(default)]
    pub annual_investment: Option<f64>,
    #[serde(default)]
    pub roi_estimate: Option<String>,
    #[serde(default)]
    pub payback_months: Option<f64>,
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoadmapPhase {
    pub phase: String,
    #[serde(default)]
    pub duration_weeks: Option<u32>,
    #[serde(default)]
    pub actions: Vec<String>,
}

/// Stage 4: the final structured report delivered to the reader.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalReport {
    pub executive_summary: String,
    pub recommendations: Vec<Recommendation>,
    pub implementation_plan: Vec<PlanPhase>,
    #[serde(default)]
    pub success_metrics: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub title: String,
    #[serde(default)]
    pub detail: Option<String>,
    #[serde(default)]
    pub priority: Option<u32>,
    #[serde(default)]
    pub monthly_investment: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanPhase {
    pub name: String,
    #[serde(default)]
    pub timeline: Option<String>,
    #[serde(default)]
    pub steps: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn problem_analysis_accepts_camel_case_wire_format() {
        let value = json!({
            "businessContext": "Small logistics firm, manual dispatch",
            "opportunities": [{
                "title": "Automated dispatch",
                "estimatedMonthlyCost": 4200.0,
                "severity": "high",
                "aiSolutionCategory": "workflow-automation"
            }]
        });
        let parsed: ProblemAnalysis = serde_json::from_value(value).expect("should deserialize");
        assert_eq!(parsed.opportunities.len(), 1);
        assert_eq!(parsed.opportunities[0].estimated_monthly_cost, 4200.0);
    }

    #[test]
    fn curated_tools_optional_fields_default() {
        let value = json!({
            "shortlist": [{ "name": "DispatchBot", "monthlyInvestment": 500.0 }]
        });
        let parsed: CuratedTools = serde_json::from_value(value).expect("should deserialize");
        assert_eq!(parsed.shortlist[0].monthly_investment, 500.0);
        assert!(parsed.shortlist[0].annual_investment.is_none());
        assert!(parsed.roadmap.is_empty());
    }

    #[test]
    fn final_report_requires_summary() {
        let value = json!({ "recommendations": [], "implementationPlan": [] });
        assert!(serde_json::from_value::<FinalReport>(value).is_err());
    }
}
