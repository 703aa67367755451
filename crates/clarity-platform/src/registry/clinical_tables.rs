//! NLM Clinical Tables code search.
//!
//! `GET {base}/api/{table}/v3/search?terms=<code>&maxList=<n>` answers with
//! a positional array: `[total, [codes], extra, [[code, label, ...], ...]]`.

use async_trait::async_trait;
use gloo_net::http::Request;
use serde_json::Value;

use clarity_core::ports::{CodeRegistry, CodeRegistryPort, RegistryMatch};
use clarity_types::{config::RegistryConfig, ClarityError, Result};

pub struct ClinicalTablesRegistry {
    config: RegistryConfig,
}

impl ClinicalTablesRegistry {
    pub fn new(config: RegistryConfig) -> Self {
        Self { config }
    }

    pub fn search_url(&self, registry: CodeRegistry) -> String {
        format!(
            "{}/api/{}/v3/search",
            self.config.base_url.trim_end_matches('/'),
            table_name(registry)
        )
    }
}

pub fn table_name(registry: CodeRegistry) -> &'static str {
    match registry {
        CodeRegistry::Icd10 => "icd10cm",
        CodeRegistry::Hcpcs => "hcpcs",
        CodeRegistry::Ndc => "ndc",
    }
}

#[async_trait(?Send)]
impl CodeRegistryPort for ClinicalTablesRegistry {
    async fn search(&self, registry: CodeRegistry, term: &str) -> Result<Option<RegistryMatch>> {
        let max_list = self.config.max_list.to_string();
        let response = Request::get(&self.search_url(registry))
            .query([("terms", term), ("maxList", max_list.as_str())])
            .send()
            .await
            .map_err(|e| ClarityError::Network(e.to_string()))?;

        if !response.ok() {
            return Err(ClarityError::Registry(format!(
                "{} search returned HTTP {}",
                registry.label(),
                response.status()
            )));
        }

        let data: Value = response
            .json()
            .await
            .map_err(|e| ClarityError::Registry(e.to_string()))?;

        parse_search_response(&data)
    }
}

/// First `[code, label]` row of a search reply, or `None` when the count
/// is zero.
pub fn parse_search_response(data: &Value) -> Result<Option<RegistryMatch>> {
    let total = data
        .get(0)
        .and_then(Value::as_u64)
        .ok_or_else(|| ClarityError::Registry("missing match count".to_string()))?;
    if total == 0 {
        return Ok(None);
    }

    let row = data
        .get(3)
        .and_then(|rows| rows.get(0))
        .and_then(Value::as_array)
        .ok_or_else(|| ClarityError::Registry("missing display rows".to_string()))?;

    let field = |i: usize| row.get(i).and_then(Value::as_str).map(str::to_string);
    match (field(0), field(1)) {
        (Some(code), Some(label)) => Ok(Some(RegistryMatch { code, label })),
        _ => Err(ClarityError::Registry(
            "display row has no code and label".to_string(),
        )),
    }
}
