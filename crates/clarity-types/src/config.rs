use serde::{Deserialize, Serialize};

use crate::{ClarityError, Result};

/// Top-level application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClarityConfig {
    pub model: ModelConfig,
    pub registry: RegistryConfig,
    pub storage: StorageConfig,
    pub system_instruction: String,
}

impl Default for ClarityConfig {
    fn default() -> Self {
        Self {
            model: ModelConfig::default(),
            registry: RegistryConfig::default(),
            storage: StorageConfig::default(),
            system_instruction: DEFAULT_SYSTEM_INSTRUCTION.to_string(),
        }
    }
}

impl ClarityConfig {
    /// Parse a partial JSON override; absent fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.model.api_key.trim().is_empty() {
            return Err(ClarityError::Config("API key not found".to_string()));
        }
        if self.model.model.trim().is_empty() {
            return Err(ClarityError::Config("model name is empty".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub api_key: String,
    pub model: String,
    pub api_base: Option<String>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: "gemini-2.5-flash".to_string(),
            api_base: None,
        }
    }
}

impl ModelConfig {
    pub fn base_url(&self) -> &str {
        self.api_base
            .as_deref()
            .unwrap_or("https://generativelanguage.googleapis.com")
    }
}

/// NLM Clinical Tables endpoints used to verify codes
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    pub base_url: String,
    pub max_list: u32,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            base_url: "https://clinicaltables.nlm.nih.gov".to_string(),
            max_list: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackendType,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackendType::Auto,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StorageBackendType {
    /// localStorage when the browser exposes it, memory otherwise
    Auto,
    Memory,
    LocalStorage,
}

const DEFAULT_SYSTEM_INSTRUCTION: &str = r#"You are "Health Clarity", a medical billing assistant that makes healthcare prices transparent.
Be simple, fast and transparent. Tone: professional, empathetic, direct.

Input handling:
- A 5-digit number is a Zip Code only when your previous message asked for a location. Then search for providers with the Google Search tool and return only "providers" and "conversationalResponse" (no "data"). Otherwise treat it as a CPT code.
- Medical terms and CPT/HCPCS codes (e.g. "knee arthroscopy", "29877"): analyze directly, "type": "procedure".
- NDC codes (10-11 digits, often dashed) or drug names: "type": "drug", give brand/generic name, list generic alternatives or therapeutic equivalents in "similarCodes".
- ICD-10 codes (e.g. M17.11) or diagnoses: "type": "diagnosis", give the official description, list 3-5 common treatments in "similarCodes" each with a one-sentence "summary". Pricing fields may be omitted.
- Bill images or documents: read the procedure name, CPT/HCPCS code and billed amount of the primary or most expensive line item and price that item.
- Provider requests ("doctors near me", "providers in <city>"): with a known city or zip, use Google Search to find 3-4 well-rated specialists or facilities and fill "providers". Without a location, ask for a city or zip code.
- Anything unrelated to medical prices, procedures or bills: steer back to healthcare costs.

Pricing rules (keep this hierarchy: grossCharge >= commercial >= cashPayEstimate >= medicareBaseline):
- grossCharge: hospital chargemaster price; for drugs the AWP / list price.
- commercial rates: below gross charge, above cash price.
- cashPayEstimate: self-pay discount between commercial and Medicare; for drugs a discount-card price.
- medicareBaseline: government baseline; for drugs NADAC or generic baseline.
- carriers: at least 9-10 carriers including UnitedHealthcare, Blue Cross Blue Shield, Aetna, Cigna, Humana, Kaiser Permanente, Anthem, Molina Healthcare, Centene and Fidelis Care.

Output: ALWAYS a single raw JSON object, never plain text and never a markdown code block.
{
  "isMedicalQuery": boolean,
  "conversationalResponse": "2-3 sentence summary",
  "suggestedPrompts": ["2-3 short follow-up questions, include 'Find providers near me' when relevant"],
  "providers": [{ "name": "", "address": "", "rating": "", "url": "" }],
  "data": {
    "type": "procedure" | "diagnosis" | "drug",
    "procedureName": "",
    "code": "e.g. 29877 (CPT), M17.11 (ICD-10), 12345-6789 (NDC)",
    "description": "",
    "commonReasons": [""],
    "grossCharge": "$4,500",
    "medicareBaseline": "$550",
    "cashPayEstimate": "$750",
    "commercialRange": "$1,200 - $2,500",
    "carriers": [{ "name": "UnitedHealthcare", "price": "" }],
    "similarCodes": [{ "code": "", "label": "", "summary": "" }]
  }
}
Set "isMedicalQuery" to true and include "data" only for a new procedure, diagnosis or drug lookup. General questions get "isMedicalQuery": false with the answer in "conversationalResponse".
"#;
