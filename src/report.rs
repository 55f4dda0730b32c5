//! # Nutrition Report
//!
//! Typed model of the inference service's answer, the code-fence stripping
//! the answer needs before parsing, and a plain-text rendering of the report
//! card for the terminal.
//!
//! The wire shape is the contract the prompt demands. Every nested field is
//! optional-tolerant because the model occasionally omits sections; the
//! renderer skips what is missing rather than failing.

use serde::{Deserialize, Serialize};

use crate::error::{SnapError, SnapResult};

/// Traffic-light verdict color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerdictColor {
    Green,
    Yellow,
    Red,
}

impl VerdictColor {
    /// Short badge label for the rendered card.
    pub fn badge(self) -> &'static str {
        match self {
            VerdictColor::Green => "HEALTHY",
            VerdictColor::Yellow => "OKAY",
            VerdictColor::Red => "CAUTION",
        }
    }

    fn glyph(self) -> &'static str {
        match self {
            VerdictColor::Green => "✓",
            VerdictColor::Yellow => "•",
            VerdictColor::Red => "!",
        }
    }
}

/// Overall verdict: a one-line quip plus a traffic-light color.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Verdict {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub color: Option<VerdictColor>,
}

/// Whether a highlighted number speaks for or against the product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HighlightKind {
    Good,
    Bad,
}

/// One highlighted nutrition figure, e.g. label "Calories", value "200kcal".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Highlight {
    pub label: String,
    pub value: String,
    #[serde(default)]
    pub desc: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<HighlightKind>,
}

/// Plain-language translation of one ingredient-list term.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Translation {
    pub origin: String,
    #[serde(default)]
    pub simplified: Option<String>,
    #[serde(default)]
    pub explain: String,
}

/// Advice section: who the product suits, what to watch, what to do.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Advice {
    #[serde(default)]
    pub target: Option<String>,
    #[serde(default)]
    pub warning: Option<String>,
    #[serde(default)]
    pub action: Option<String>,
}

/// The parsed analysis report.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionReport {
    #[serde(default)]
    pub product_name: String,
    #[serde(default)]
    pub verdict: Verdict,
    #[serde(default)]
    pub highlights: Vec<Highlight>,
    #[serde(default)]
    pub translations: Vec<Translation>,
    #[serde(default)]
    pub advice: Advice,
}

impl NutritionReport {
    /// Verdict color with the yellow fallback the card rendering uses when
    /// the model left it out.
    pub fn verdict_color(&self) -> VerdictColor {
        self.verdict.color.unwrap_or(VerdictColor::Yellow)
    }
}

/// Remove markdown code-fence wrapping from a model answer.
///
/// Models sometimes wrap the JSON in ```` ```json ... ``` ```` despite being
/// told not to; strip every fence marker and trim.
pub fn strip_code_fences(text: &str) -> String {
    text.replace("```json", "").replace("```", "").trim().to_string()
}

/// Parse a model answer into a report.
///
/// Failure is a malformed-report error, deliberately distinct from a
/// transport failure: it means the response contract was not honored, which
/// an identical retry cannot fix.
pub fn parse_report(text: &str) -> SnapResult<NutritionReport> {
    let cleaned = strip_code_fences(text);
    serde_json::from_str(&cleaned).map_err(|e| SnapError::malformed_report(e.to_string()))
}

/// Render the report as a plain-text card: verdict banner, highlight grid,
/// ingredient translations, then the advice section. The terminal
/// counterpart of the original's shareable card.
pub fn render(report: &NutritionReport) -> String {
    let color = report.verdict_color();
    let mut out = String::new();
    let rule = "─".repeat(46);

    out.push_str(&rule);
    out.push('\n');
    out.push_str(&format!(
        "  {}  [{}]\n",
        if report.product_name.is_empty() {
            "(unnamed product)"
        } else {
            &report.product_name
        },
        color.badge()
    ));
    if !report.verdict.title.is_empty() {
        out.push_str(&format!("  {} \"{}\"\n", color.glyph(), report.verdict.title));
    }
    out.push_str(&rule);
    out.push('\n');

    if !report.highlights.is_empty() {
        out.push_str("  Highlights\n");
        for item in &report.highlights {
            let marker = match item.kind {
                Some(HighlightKind::Good) => "+",
                Some(HighlightKind::Bad) => "-",
                None => "·",
            };
            out.push_str(&format!("   {} {}: {}\n", marker, item.label, item.value));
            if let Some(desc) = &item.desc {
                out.push_str(&format!("     {}\n", desc));
            }
        }
        out.push('\n');
    }

    if !report.translations.is_empty() {
        out.push_str("  Ingredient translator\n");
        for item in &report.translations {
            match &item.simplified {
                Some(simplified) => {
                    out.push_str(&format!("   {} -> {}\n", item.origin, simplified))
                }
                None => out.push_str(&format!("   {}\n", item.origin)),
            }
            if !item.explain.is_empty() {
                out.push_str(&format!("     {}\n", item.explain));
            }
        }
        out.push('\n');
    }

    let advice = &report.advice;
    if advice.target.is_some() || advice.warning.is_some() || advice.action.is_some() {
        out.push_str("  Advice\n");
        if let Some(target) = &advice.target {
            out.push_str(&format!("   suits:  {}\n", target));
        }
        if let Some(warning) = &advice.warning {
            out.push_str(&format!("   watch:  {}\n", warning));
        }
        if let Some(action) = &advice.action {
            out.push_str(&format!("   do:     {}\n", action));
        }
    }

    out.push_str(&rule);
    out.push('\n');
    out
}
