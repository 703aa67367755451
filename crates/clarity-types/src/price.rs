//! Structured price breakdown attached to an AI answer.
//!
//! On the wire this is one flat JSON object with a `"type"` discriminator,
//! which is how the model emits it. In Rust the pricing block is a tagged
//! union so a diagnosis lookup (where prices may not apply) cannot be confused
//! with a procedure or drug lookup (where they must).

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceKind {
    Procedure,
    Diagnosis,
    Drug,
}

impl PriceKind {
    pub fn label(&self) -> &'static str {
        match self {
            PriceKind::Procedure => "Procedure",
            PriceKind::Diagnosis => "Diagnosis",
            PriceKind::Drug => "Drug",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceData {
    /// Procedure, diagnosis or drug name
    pub procedure_name: String,
    /// e.g. "29877 (CPT)", "M17.11 (ICD-10)"
    pub code: String,
    #[serde(default)]
    pub description: String,
    /// Clinical reasons, or indications for a drug
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub common_reasons: Vec<String>,
    /// Related codes, generic alternatives, or treatments for a diagnosis
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub similar_codes: Vec<SimilarCode>,
    #[serde(flatten)]
    pub detail: PriceDetail,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PriceDetail {
    Procedure(Pricing),
    Diagnosis(DiagnosisPricing),
    Drug(Pricing),
}

/// Full price ladder: gross ≥ commercial ≥ cash ≥ baseline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pricing {
    /// Chargemaster sticker price, or AWP for drugs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gross_charge: Option<String>,
    /// Medicare rate, or NADAC for drugs
    pub medicare_baseline: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cash_pay_estimate: Option<String>,
    pub commercial_range: String,
    #[serde(default)]
    pub carriers: Vec<CarrierRate>,
}

/// Diagnosis codes carry no price of their own, so every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosisPricing {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gross_charge: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medicare_baseline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cash_pay_estimate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commercial_range: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub carriers: Vec<CarrierRate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarrierRate {
    pub name: String,
    #[serde(deserialize_with = "crate::lenient::string")]
    pub price: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimilarCode {
    pub code: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

impl PriceData {
    /// Decode the model's `data` object. Nulls count as absent, and a
    /// missing or oddly-cased `"type"` is read as the lowercase kind,
    /// defaulting to `procedure`.
    pub fn from_model_value(mut value: Value) -> Result<Self> {
        crate::lenient::strip_nulls(&mut value);
        if let Some(obj) = value.as_object_mut() {
            let kind = obj
                .get("type")
                .and_then(Value::as_str)
                .map(|t| t.trim().to_ascii_lowercase())
                .unwrap_or_else(|| "procedure".to_string());
            obj.insert("type".to_string(), Value::String(kind));
        }
        Ok(serde_json::from_value(value)?)
    }

    pub fn kind(&self) -> PriceKind {
        match self.detail {
            PriceDetail::Procedure(_) => PriceKind::Procedure,
            PriceDetail::Diagnosis(_) => PriceKind::Diagnosis,
            PriceDetail::Drug(_) => PriceKind::Drug,
        }
    }

    pub fn commercial_range(&self) -> Option<&str> {
        match &self.detail {
            PriceDetail::Procedure(p) | PriceDetail::Drug(p) => Some(&p.commercial_range),
            PriceDetail::Diagnosis(d) => d.commercial_range.as_deref(),
        }
    }

    pub fn carriers(&self) -> &[CarrierRate] {
        match &self.detail {
            PriceDetail::Procedure(p) | PriceDetail::Drug(p) => &p.carriers,
            PriceDetail::Diagnosis(d) => &d.carriers,
        }
    }
}
