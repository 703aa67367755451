#[cfg(test)]
mod tests {
    use crate::config::*;
    use crate::error::*;
    use crate::event::*;
    use crate::message::*;
    use crate::price::*;
    use crate::reply::*;
    use crate::session::*;
    use crate::theme::*;
    use serde_json::json;

    fn knee_scope() -> PriceData {
        PriceData {
            procedure_name: "Knee arthroscopy".to_string(),
            code: "29877 (CPT)".to_string(),
            description: "Arthroscopic knee surgery".to_string(),
            common_reasons: vec!["Meniscus tear".to_string()],
            similar_codes: vec![],
            detail: PriceDetail::Procedure(Pricing {
                gross_charge: Some("$12,000".to_string()),
                medicare_baseline: "$550".to_string(),
                cash_pay_estimate: Some("$900".to_string()),
                commercial_range: "$1,200 - $2,500".to_string(),
                carriers: vec![CarrierRate {
                    name: "Aetna".to_string(),
                    price: "$1,800".to_string(),
                }],
            }),
        }
    }

    // ─── Message Tests ───────────────────────────────────────

    #[test]
    fn test_message_user() {
        let msg = Message::user("1", "What is CPT 99213?");
        assert_eq!(msg.sender, Sender::User);
        assert_eq!(msg.text, "What is CPT 99213?");
        assert!(!msg.is_thinking);
        assert!(!msg.is_ai());
    }

    #[test]
    fn test_message_ai_builders() {
        let msg = Message::ai("2", "Here is the breakdown")
            .with_suggestions(vec!["Find providers near me".to_string()])
            .with_providers(vec![Provider::new("Clinic", "1 Main St")]);
        assert!(msg.is_ai());
        assert_eq!(msg.suggested_prompts.as_ref().unwrap().len(), 1);
        assert_eq!(msg.providers.as_ref().unwrap()[0].name, "Clinic");
    }

    #[test]
    fn test_message_thinking_placeholder() {
        let msg = Message::thinking("3");
        assert!(msg.is_ai());
        assert!(msg.is_thinking);
        assert!(msg.text.is_empty());
    }

    #[test]
    fn test_message_wire_names_are_camel_case() {
        let msg = Message::user("1", "hi").with_attachment("data:image/png;base64,AAAA");
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["sender"], "user");
        assert_eq!(value["attachmentUrl"], "data:image/png;base64,AAAA");
        assert!(value.get("isThinking").is_none());
        assert!(value["timestamp"].is_string());
    }

    #[test]
    fn test_message_timestamp_reparsed() {
        let msg = Message::ai("9", "answer");
        let json = serde_json::to_string(&msg).unwrap();
        let back: Message = serde_json::from_str(&json).unwrap();
        assert_eq!(back.timestamp, msg.timestamp);
        assert_eq!(back, msg);
    }

    #[test]
    fn test_provider_sponsored() {
        let ad = Provider::sponsored();
        assert_eq!(ad.name, "Sponsored Result");
        assert_eq!(ad.address, "Ad");
        assert!(ad.is_ad);
        let value = serde_json::to_value(&ad).unwrap();
        assert_eq!(value["isAd"], true);
    }

    #[test]
    fn test_provider_minimal_json() {
        let p: Provider = serde_json::from_value(json!({"name": "Dr. Lee"})).unwrap();
        assert_eq!(p.name, "Dr. Lee");
        assert!(p.address.is_empty());
        assert!(!p.is_ad);
    }

    // ─── Attachment Tests ────────────────────────────────────

    #[test]
    fn test_attachment_from_data_url() {
        let att = Attachment::from_data_url("data:image/png;base64,iVBORw0KGgo=").unwrap();
        assert_eq!(att.mime_type, "image/png");
        assert_eq!(att.data, "iVBORw0KGgo=");
    }

    #[test]
    fn test_attachment_from_data_url_invalid() {
        assert!(Attachment::from_data_url("not a data url").is_err());
        assert!(Attachment::from_data_url("image/png;base64,AAAA").is_err());
        assert!(Attachment::from_data_url("data:image/png;base64,").is_err());
    }

    // ─── PriceData Tests ─────────────────────────────────────

    #[test]
    fn test_price_data_flat_wire_form() {
        let value = serde_json::to_value(knee_scope()).unwrap();
        assert_eq!(value["type"], "procedure");
        assert_eq!(value["procedureName"], "Knee arthroscopy");
        assert_eq!(value["medicareBaseline"], "$550");
        assert_eq!(value["carriers"][0]["name"], "Aetna");
    }

    #[test]
    fn test_price_data_missing_type_is_procedure() {
        let data = PriceData::from_model_value(json!({
            "procedureName": "Office visit",
            "code": "99213 (CPT)",
            "description": "Established patient visit",
            "medicareBaseline": "$90",
            "commercialRange": "$120 - $200",
            "carriers": []
        }))
        .unwrap();
        assert_eq!(data.kind(), PriceKind::Procedure);
        assert_eq!(data.commercial_range(), Some("$120 - $200"));
    }

    #[test]
    fn test_price_data_diagnosis_without_prices() {
        let data = PriceData::from_model_value(json!({
            "type": "Diagnosis",
            "procedureName": "Primary osteoarthritis, right knee",
            "code": "M17.11 (ICD-10)",
            "description": "Wear-and-tear arthritis",
            "similarCodes": [
                {"code": "27447", "label": "Total knee replacement", "summary": "Replaces the joint."}
            ]
        }))
        .unwrap();
        assert_eq!(data.kind(), PriceKind::Diagnosis);
        assert!(data.commercial_range().is_none());
        assert!(data.carriers().is_empty());
        assert_eq!(data.similar_codes[0].summary.as_deref(), Some("Replaces the joint."));
    }

    #[test]
    fn test_price_data_nulls_read_as_absent() {
        let data = PriceData::from_model_value(json!({
            "type": "diagnosis",
            "procedureName": "Low back pain",
            "code": "M54.5 (ICD-10)",
            "description": null,
            "commonReasons": null,
            "similarCodes": [null, {"code": "97110", "label": "Therapeutic exercise", "summary": null}],
            "medicareBaseline": null,
            "commercialRange": null,
            "carriers": null
        }))
        .unwrap();
        assert_eq!(data.kind(), PriceKind::Diagnosis);
        assert!(data.description.is_empty());
        assert!(data.common_reasons.is_empty());
        assert!(data.carriers().is_empty());
        assert_eq!(data.similar_codes.len(), 1);
        assert!(data.similar_codes[0].summary.is_none());
    }

    #[test]
    fn test_lenient_bool_and_strip_nulls() {
        use crate::lenient::{bool_value, strip_nulls};
        assert_eq!(bool_value(&json!(true)), Some(true));
        assert_eq!(bool_value(&json!(" False ")), Some(false));
        assert_eq!(bool_value(&json!("yes")), None);
        assert_eq!(bool_value(&json!(1)), None);

        let mut value = json!({"a": null, "b": [null, {"c": null, "d": 1}]});
        strip_nulls(&mut value);
        assert_eq!(value, json!({"b": [{"d": 1}]}));
    }

    #[test]
    fn test_price_data_drug_requires_pricing() {
        let result = PriceData::from_model_value(json!({
            "type": "drug",
            "procedureName": "Atorvastatin",
            "code": "0071-0155 (NDC)",
            "description": "Statin"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_price_kind_label() {
        assert_eq!(PriceKind::Diagnosis.label(), "Diagnosis");
        assert_eq!(PriceKind::Procedure.label(), "Procedure");
        assert_eq!(PriceKind::Drug.label(), "Drug");
    }

    // ─── Session Tests ───────────────────────────────────────

    #[test]
    fn test_derive_title_long() {
        let title = derive_title("This is a very long opening message that exceeds thirty chars");
        assert_eq!(title, "This is a very long opening me...");
        assert_eq!(title.chars().count(), TITLE_MAX_CHARS + 3);
    }

    #[test]
    fn test_derive_title_short_and_exact() {
        assert_eq!(derive_title("CPT 99213"), "CPT 99213");
        let exact = "a".repeat(TITLE_MAX_CHARS);
        assert_eq!(derive_title(&exact), exact);
    }

    #[test]
    fn test_derive_title_counts_chars_not_bytes() {
        let text = "é".repeat(31);
        let title = derive_title(&text);
        assert_eq!(title, format!("{}...", "é".repeat(30)));
    }

    #[test]
    fn test_session_new() {
        let session = ChatSession::new("100".to_string(), "knee arthroscopy");
        assert_eq!(session.id, "100");
        assert_eq!(session.title, "knee arthroscopy");
        assert!(session.messages.is_empty());
        assert!(session.price_data_map.is_empty());
        assert!(chrono::DateTime::parse_from_rfc3339(&session.created_at).is_ok());
    }

    #[test]
    fn test_session_summary() {
        let mut session = ChatSession::new("1".to_string(), "Test");
        session.messages.push(Message::user("m1", "hello"));
        let summary = session.summary();
        assert_eq!(summary.id, "1");
        assert_eq!(summary.title, "Test");
        assert_eq!(summary.message_count, 1);
    }

    #[test]
    fn test_share_summary_with_price() {
        let mut session = ChatSession::new("1".to_string(), "knee arthroscopy");
        session.messages.push(Message::user("m1", "knee arthroscopy"));
        session.messages.push(Message::ai("m2", "Here you go"));
        session.price_data_map.insert("m2".to_string(), knee_scope());
        assert_eq!(
            session.share_summary(),
            "Health Clarity Check: knee arthroscopy - Estimated: $1,200 - $2,500. Check fair prices here!"
        );
    }

    #[test]
    fn test_share_summary_without_price() {
        let session = ChatSession::new("1".to_string(), "hello");
        assert_eq!(
            session.share_summary(),
            "Health Clarity Check: hello. Check fair prices here!"
        );
    }

    #[test]
    fn test_session_serialization_roundtrip() {
        let mut session = ChatSession::new("1".to_string(), "knee");
        session.messages.push(Message::user("m1", "knee"));
        session.messages.push(Message::ai("m2", "answer"));
        session.price_data_map.insert("m2".to_string(), knee_scope());

        let json = serde_json::to_string(&vec![session.clone()]).unwrap();
        assert!(json.contains("\"priceDataMap\""));
        assert!(json.contains("\"createdAt\""));
        let back: Vec<ChatSession> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, vec![session]);
    }

    // ─── Reply Tests ─────────────────────────────────────────

    #[test]
    fn test_reply_offline() {
        let reply = HealthReply::offline();
        assert!(!reply.is_medical_query);
        assert_eq!(reply.conversational_response, OFFLINE_RESPONSE);
        assert!(reply.suggested_prompts.is_empty());
        assert!(reply.providers.is_empty());
    }

    #[test]
    fn test_reply_unavailable() {
        let reply = HealthReply::unavailable();
        assert_eq!(reply.conversational_response, UNAVAILABLE_RESPONSE);
        assert_eq!(reply.suggested_prompts.len(), 3);
    }

    #[test]
    fn test_reply_plain_text() {
        let reply = HealthReply::plain_text("No prices for ICD codes.");
        assert_eq!(reply.conversational_response, "No prices for ICD codes.");
        assert_eq!(reply.suggested_prompts, vec!["Search for a CPT code", "Upload a bill"]);
    }

    #[test]
    fn test_reply_price_data_requires_medical_flag() {
        let mut reply = HealthReply::plain_text("x");
        reply.data = Some(knee_scope());
        assert!(reply.price_data().is_none());
        reply.is_medical_query = true;
        assert!(reply.price_data().is_some());
    }

    // ─── Config Tests ────────────────────────────────────────

    #[test]
    fn test_config_defaults() {
        let config = ClarityConfig::default();
        assert_eq!(config.model.model, "gemini-2.5-flash");
        assert_eq!(config.model.base_url(), "https://generativelanguage.googleapis.com");
        assert_eq!(config.registry.max_list, 1);
        assert_eq!(config.storage.backend, StorageBackendType::Auto);
        assert!(config.system_instruction.contains("isMedicalQuery"));
    }

    #[test]
    fn test_config_partial_override() {
        let config = ClarityConfig::from_json(r#"{"model": {"api_key": "k"}}"#).unwrap();
        assert_eq!(config.model.api_key, "k");
        assert_eq!(config.model.model, "gemini-2.5-flash");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_missing_key_invalid() {
        let err = ClarityConfig::default().validate().unwrap_err();
        assert!(matches!(err, ClarityError::Config(_)));
    }

    // ─── Theme Tests ─────────────────────────────────────────

    #[test]
    fn test_theme_parse_and_toggle() {
        assert_eq!("dark".parse::<Theme>().unwrap(), Theme::Dark);
        assert_eq!("light".parse::<Theme>().unwrap(), Theme::Light);
        assert!("blue".parse::<Theme>().is_err());
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
        assert_eq!(Theme::default(), Theme::Light);
        assert_eq!(Theme::Dark.to_string(), "dark");
    }

    // ─── Event / Error Tests ─────────────────────────────────

    #[test]
    fn test_event_serialization() {
        let event = ClarityEvent::ReplyReady {
            session_id: "s".to_string(),
            message_id: "m".to_string(),
            has_price_data: true,
        };
        let json = serde_json::to_string(&event).unwrap();
        let back: ClarityEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            ClarityError::TurnInFlight("42".to_string()).to_string(),
            "A turn is already in flight for session 42"
        );
        assert_eq!(ClarityError::EmptyInput.to_string(), "Nothing to send");
    }

    #[test]
    fn test_error_from_serde() {
        let err: ClarityError = serde_json::from_str::<serde_json::Value>("{bad")
            .unwrap_err()
            .into();
        assert!(matches!(err, ClarityError::Serialization(_)));
    }
}
