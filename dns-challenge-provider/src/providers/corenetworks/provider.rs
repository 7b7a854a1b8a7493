//! Core Networks `DnsProvider` trait implementation

use async_trait::async_trait;

use crate::error::{ProviderError, Result};
use crate::providers::common::{parse_record_type, record_type_to_string};
use crate::traits::{DnsProvider, ErrorContext, ProviderErrorMapper};
use crate::types::{DnsRecord, NewRecord, RecordFilter, Zone, ZoneKind};

use super::{CoreNetworksProvider, CoreNetworksRecord, CoreNetworksZone, RecordBody};

/// Path of a zone resource; the zone name is a single URL segment.
fn zone_path(zone: &str) -> String {
    format!("/dnszones/{}", urlencoding::encode(zone))
}

/// Query string for a record listing; unset fields are not sent.
fn records_query(filter: &RecordFilter) -> String {
    let mut params: Vec<String> = Vec::new();
    if let Some(name) = &filter.name {
        params.push(format!("name={}", urlencoding::encode(name)));
    }
    if let Some(record_type) = filter.record_type {
        params.push(format!("type={}", record_type_to_string(record_type)));
    }
    if let Some(data) = &filter.data {
        params.push(format!("data={}", urlencoding::encode(data)));
    }
    if params.is_empty() {
        String::new()
    } else {
        format!("?{}", params.join("&"))
    }
}

impl CoreNetworksProvider {
    fn convert_record(&self, record: CoreNetworksRecord) -> Result<DnsRecord> {
        Ok(DnsRecord {
            record_type: parse_record_type(&record.record_type, self.provider_name())?,
            name: record.name,
            data: record.data,
            ttl: record.ttl,
        })
    }
}

#[async_trait]
impl DnsProvider for CoreNetworksProvider {
    fn id(&self) -> &'static str {
        self.provider_name()
    }

    async fn zone(&self, name: &str) -> Result<Vec<Zone>> {
        let zone: CoreNetworksZone = self
            .get(&zone_path(name), ErrorContext::zone(name))
            .await?;

        Ok(vec![Zone {
            name: zone.name,
            active: zone.active,
            kind: ZoneKind::from(zone.zone_type),
        }])
    }

    async fn records(&self, zone: &str, filter: &RecordFilter) -> Result<Vec<DnsRecord>> {
        let path = format!("{}/records/{}", zone_path(zone), records_query(filter));
        let records: Vec<CoreNetworksRecord> = self.get(&path, ErrorContext::zone(zone)).await?;

        // Records of types this crate does not model cannot match a typed filter; skip them
        // instead of failing the whole listing.
        let mut result = Vec::with_capacity(records.len());
        for record in records {
            match self.convert_record(record) {
                Ok(record) => result.push(record),
                Err(ProviderError::UnsupportedRecordType { record_type, .. }) => {
                    log::debug!("[{}] Skipping {record_type} record", self.provider_name());
                }
                Err(e) => return Err(e),
            }
        }
        Ok(result)
    }

    async fn add_record(&self, zone: &str, record: &NewRecord) -> Result<()> {
        let path = zone_path(zone);
        let body = RecordBody {
            name: Some(&record.name),
            record_type: Some(record_type_to_string(record.record_type)),
            data: Some(&record.data),
            ttl: Some(record.ttl),
        };

        self.post(
            &format!("{path}/records/"),
            &body,
            ErrorContext::zone(zone).with_param("record"),
        )
        .await?;

        let Err(e) = self.commit_if_enabled(zone, &path).await else {
            return Ok(());
        };
        // Withdraw the staged record so a later commit does not publish it
        let withdraw = RecordBody { ttl: None, ..body };
        let note = match self
            .post(
                &format!("{path}/records/delete"),
                &withdraw,
                ErrorContext::zone(zone),
            )
            .await
        {
            Ok(()) => "commit failed, staged record withdrawn",
            Err(rollback) => {
                log::warn!(
                    "[{}] Staged record {} in zone {zone} could not be withdrawn: {rollback}",
                    self.provider_name(),
                    record.name
                );
                "commit failed, record left staged"
            }
        };
        Err(e.with_note(note))
    }

    async fn delete_record(&self, zone: &str, filter: &RecordFilter) -> Result<()> {
        // The API deletes every record matching the body; an empty body would wipe the zone
        if filter.is_empty() {
            return Err(ProviderError::InvalidParameter {
                provider: self.provider_name().to_string(),
                param: "filter".to_string(),
                detail: "at least one of name, type or data must be set".to_string(),
            });
        }

        let path = zone_path(zone);
        let body = RecordBody {
            name: filter.name.as_deref(),
            record_type: filter.record_type.map(record_type_to_string),
            data: filter.data.as_deref(),
            ttl: None,
        };

        self.post(
            &format!("{path}/records/delete"),
            &body,
            ErrorContext::zone(zone).with_param("filter"),
        )
        .await?;
        self.commit_if_enabled(zone, &path)
            .await
            .map_err(|e| e.with_note("commit failed, deletion left staged"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ProviderOptions;

    #[test]
    fn zone_path_encodes_segment() {
        assert_eq!(zone_path("example.com"), "/dnszones/example.com");
        assert_eq!(zone_path("a/b"), "/dnszones/a%2Fb");
    }

    #[test]
    fn records_query_includes_set_fields() {
        let filter = RecordFilter::txt("_acme-challenge", "a b+c");
        assert_eq!(
            records_query(&filter),
            "?name=_acme-challenge&type=TXT&data=a%20b%2Bc"
        );
        assert_eq!(records_query(&RecordFilter::default()), "");
    }

    #[tokio::test]
    async fn delete_with_empty_filter_is_rejected_locally() {
        // Unroutable endpoint: the call must fail before any request is made
        let options = ProviderOptions {
            base_url: Some("http://127.0.0.1:9".to_string()),
            ..ProviderOptions::default()
        };
        let provider =
            CoreNetworksProvider::new("user".to_string(), "pass".to_string(), &options).unwrap();

        let err = provider
            .delete_record("example.com", &RecordFilter::default())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ProviderError::InvalidParameter { ref param, .. } if param == "filter"
        ));
    }

    #[test]
    fn unsupported_record_type_is_reported() {
        let provider = CoreNetworksProvider::new(
            String::new(),
            String::new(),
            &ProviderOptions::default(),
        )
        .unwrap();
        let err = provider
            .convert_record(CoreNetworksRecord {
                name: "@".to_string(),
                record_type: "HINFO".to_string(),
                data: "x".to_string(),
                ttl: 60,
            })
            .unwrap_err();
        assert!(matches!(err, ProviderError::UnsupportedRecordType { .. }));
    }
}
