use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

use super::error::SourceError;
use super::model::{Contract, Service};

#[derive(Clone, Debug, Deserialize)]
pub(super) struct RawContract {
    pub(super) value: String,
    #[serde(default, rename = "mimeType")]
    pub(super) mime_type: String,
}

#[derive(Clone, Debug, Deserialize)]
pub(super) struct RawService {
    pub(super) name: String,
    #[serde(default)]
    pub(super) version: String,
    #[serde(default)]
    pub(super) capabilities: BTreeMap<String, RawContract>,
    #[serde(default)]
    pub(super) expectations: BTreeMap<String, BTreeMap<String, RawContract>>,
}

#[derive(Clone, Debug, Deserialize)]
pub(super) struct RawEnvironmentState {
    pub(super) environment: String,
    #[serde(default, rename = "serviceContracts")]
    pub(super) service_contracts: Vec<RawService>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawEnvironmentFile {
    Many(Vec<RawEnvironmentState>),
    One(RawEnvironmentState),
}

fn parse_contract(service: &str, contract: &str, raw: RawContract) -> Result<Contract, SourceError> {
    let value = serde_json::from_str::<Value>(&raw.value).map_err(|source| {
        SourceError::MalformedContract {
            service: service.to_owned(),
            contract: contract.to_owned(),
            source,
        }
    })?;

    Ok(Contract {
        value,
        mime_type: raw.mime_type,
    })
}

pub(super) fn map_service(raw: RawService) -> Result<Service, SourceError> {
    let mut capabilities = BTreeMap::new();
    for (kind, contract) in raw.capabilities {
        let parsed = parse_contract(&raw.name, &kind, contract)?;
        capabilities.insert(kind, parsed);
    }

    let mut expectations = BTreeMap::new();
    for (provider, contracts) in raw.expectations {
        let mut by_kind = BTreeMap::new();
        for (kind, contract) in contracts {
            let label = format!("{provider}/{kind}");
            let parsed = parse_contract(&raw.name, &label, contract)?;
            by_kind.insert(kind, parsed);
        }
        expectations.insert(provider, by_kind);
    }

    Ok(Service {
        name: raw.name,
        version: raw.version,
        capabilities,
        expectations,
    })
}

pub(super) fn map_environment_state(state: RawEnvironmentState) -> Result<Vec<Service>, SourceError> {
    state
        .service_contracts
        .into_iter()
        .map(map_service)
        .collect()
}

pub(super) fn parse_environment_state(
    raw: &str,
    origin: &str,
) -> Result<RawEnvironmentState, SourceError> {
    serde_json::from_str(raw).map_err(|source| SourceError::Json {
        origin: origin.to_owned(),
        source,
    })
}

pub(super) fn parse_environment_file(
    raw: &str,
    origin: &str,
) -> Result<Vec<RawEnvironmentState>, SourceError> {
    let parsed = serde_json::from_str::<RawEnvironmentFile>(raw).map_err(|source| {
        SourceError::Json {
            origin: origin.to_owned(),
            source,
        }
    })?;

    Ok(match parsed {
        RawEnvironmentFile::Many(states) => states,
        RawEnvironmentFile::One(state) => vec![state],
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn raw_service(raw: &str) -> RawService {
        serde_json::from_str(raw).unwrap()
    }

    #[test]
    fn maps_empty_service() {
        let service = map_service(raw_service(
            r#"{"name":"ui","version":"1.0.0","capabilities":{},"expectations":{}}"#,
        ))
        .unwrap();

        assert_eq!(service.name, "ui");
        assert_eq!(service.version, "1.0.0");
        assert!(service.capabilities.is_empty());
        assert!(service.expectations.is_empty());
        assert!(!service.is_provider());
        assert!(!service.is_consumer());
    }

    #[test]
    fn parses_contract_values_as_json() {
        let service = map_service(raw_service(
            r#"{
                "name": "ui",
                "version": "1.0.0",
                "capabilities": {
                    "rest": {"value": "{\"paths\":[\"/a\"]}", "mimeType": "application/json"}
                },
                "expectations": {
                    "provider": {
                        "jms": {"value": "\"jms\"", "mimeType": "application/json"},
                        "rest": {"value": "{}", "mimeType": "application/json"}
                    }
                }
            }"#,
        ))
        .unwrap();

        assert_eq!(
            service.capabilities["rest"].value,
            json!({"paths": ["/a"]})
        );
        assert_eq!(service.capabilities["rest"].mime_type, "application/json");
        assert_eq!(service.expectations["provider"]["jms"].value, json!("jms"));
        assert_eq!(service.expectations["provider"].len(), 2);
        assert!(service.is_provider());
        assert!(service.is_consumer());
    }

    #[test]
    fn maps_multiple_providers() {
        let service = map_service(raw_service(
            r#"{
                "name": "ui",
                "version": "1.0.0",
                "expectations": {
                    "first": {"rest": {"value": "{}", "mimeType": "application/json"}},
                    "second": {"rest": {"value": "{}", "mimeType": "application/json"}},
                    "third": {"rest": {"value": "{}", "mimeType": "application/json"}}
                }
            }"#,
        ))
        .unwrap();

        let providers = service.expectations.keys().cloned().collect::<Vec<_>>();
        assert_eq!(providers, ["first", "second", "third"]);
    }

    #[test]
    fn rejects_malformed_contract_value() {
        let error = map_service(raw_service(
            r#"{
                "name": "ui",
                "version": "1.0.0",
                "capabilities": {"rest": {"value": "{not json", "mimeType": "application/json"}}
            }"#,
        ))
        .unwrap_err();

        match error {
            SourceError::MalformedContract {
                service, contract, ..
            } => {
                assert_eq!(service, "ui");
                assert_eq!(contract, "rest");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn environment_file_accepts_single_state_or_list() {
        let single = parse_environment_file(
            r#"{"environment":"UAT","serviceContracts":[]}"#,
            "test",
        )
        .unwrap();
        assert_eq!(single.len(), 1);
        assert_eq!(single[0].environment, "UAT");

        let many = parse_environment_file(
            r#"[{"environment":"SIT","serviceContracts":[]},{"environment":"UAT"}]"#,
            "test",
        )
        .unwrap();
        let names = many
            .iter()
            .map(|state| state.environment.as_str())
            .collect::<Vec<_>>();
        assert_eq!(names, ["SIT", "UAT"]);
    }

    #[test]
    fn environment_state_reports_origin_on_bad_json() {
        let error = parse_environment_state("[", "http://registry/interrelationship/UAT")
            .unwrap_err();
        assert!(error.to_string().contains("interrelationship/UAT"));
    }
}
