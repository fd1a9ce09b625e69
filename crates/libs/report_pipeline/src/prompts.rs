//! Prompt builders for the four pipeline stages.
//!
//! Pure functions: quiz answers and prior-stage output in, instruction text
//! out. Every builder ends with an explicit single-JSON-object instruction
//! matching the schemas in `common_types::stage_output`.

use serde_json::Value;

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

const JSON_ONLY: &str = "Respond with a single JSON object only. No markdown fences, no prose \
                         before or after the JSON.";

/// Stage 1: problem analysis over the raw quiz answers.
#[must_use]
pub fn build_stage1_prompt(answers: &Value) -> String {
    format!(
        "You are an AI adoption consultant analyzing a business readiness quiz.\n\
         \n\
         Quiz answers:\n{answers}\n\
         \n\
         Identify the business context and the top 3-5 opportunity areas where AI could \
         reduce cost or manual effort, ranked by impact. For each opportunity estimate the \
         monthly cost of leaving it unsolved (in USD), rate its severity (low/medium/high), \
         and name the category of AI solution that addresses it.\n\
         \n\
         {JSON_ONLY} Schema:\n\
         {{\"businessContext\": string,\n \
           \"opportunities\": [{{\"title\": string, \"description\": string, \
         \"estimatedMonthlyCost\": number, \"severity\": string, \
         \"aiSolutionCategory\": string}}]}}",
        answers = pretty(answers),
    )
}

/// Stage 2: tool research grounded in current, real third-party product data.
#[must_use]
pub fn build_stage2_prompt(problem_analysis: &Value) -> String {
    format!(
        "You are researching real, currently available AI tools for a client.\n\
         \n\
         Problem analysis:\n{analysis}\n\
         \n\
         For each opportunity listed above, find 2-4 real products on the market today. \
         Include current pricing, notes on integration effort, and one piece of case-study \
         evidence per tool where available. Only name products that actually exist; do not \
         invent tools or prices.\n\
         \n\
         {JSON_ONLY} Schema:\n\
         {{\"opportunities\": [{{\"opportunity\": string, \
         \"tools\": [{{\"name\": string, \"pricing\": string, \
         \"integrationNotes\": string, \"caseStudy\": string}}]}}]}}",
        analysis = pretty(problem_analysis),
    )
}

/// Stage 3: curation of the researched tools into a costed shortlist.
#[must_use]
pub fn build_stage3_prompt(problem_analysis: &Value, tool_research: &Value) -> String {
    format!(
        "You are curating an AI tool stack for a client.\n\
         \n\
         Problem analysis:\n{analysis}\n\
         \n\
         Researched tools:\n{research}\n\
         \n\
         Select the strongest tool per opportunity. Normalize pricing to a monthly and \
         annual investment in USD, estimate ROI and payback period against the opportunity's \
         estimated monthly cost, and lay out an implementation roadmap in phases.\n\
         \n\
         {JSON_ONLY} Schema:\n\
         {{\"shortlist\": [{{\"name\": string, \"monthlyInvestment\": number, \
         \"annualInvestment\": number, \"roiEstimate\": string, \"paybackMonths\": number, \
         \"reason\": string}}],\n \
           \"roadmap\": [{{\"phase\": string, \"durationWeeks\": number, \
         \"actions\": [string]}}]}}",
        analysis = pretty(problem_analysis),
        research = pretty(tool_research),
    )
}

/// Stage 4: the final report, written from the analysis and the curated stack.
#[must_use]
pub fn build_stage4_prompt(problem_analysis: &Value, curated_tools: &Value) -> String {
    format!(
        "You are writing a personalized AI readiness report for a business owner. Write in \
         clear, non-technical language.\n\
         \n\
         Problem analysis:\n{analysis}\n\
         \n\
         Curated tool stack:\n{curated}\n\
         \n\
         Produce the final report: an executive summary, prioritized recommendations \
         carrying the investment figures from the curated stack, a phased implementation \
         plan, and concrete success metrics the owner can track.\n\
         \n\
         {JSON_ONLY} Schema:\n\
         {{\"executiveSummary\": string,\n \
           \"recommendations\": [{{\"title\": string, \"detail\": string, \
         \"priority\": number, \"monthlyInvestment\": number}}],\n \
           \"implementationPlan\": [{{\"name\": string, \"timeline\": string, \
         \"steps\": [string]}}],\n \
           \"successMetrics\": [string]}}",
        analysis = pretty(problem_analysis),
        curated = pretty(curated_tools),
    )
}
