//! Test helpers
//!
//! Mock implementations and factory methods for tests.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use dns_challenge_provider::{
    DnsProvider, DnsRecord, DnsRecordType, NewRecord, ProviderCredentials, ProviderError,
    RecordFilter, Result as ProviderResult, Zone, ZoneKind,
};
use tokio::sync::RwLock;

use crate::config::{ChallengeSettings, CredentialSource};
use crate::services::ChallengeContext;
use crate::traits::{CnameLookup, CnameLookupError, ProviderConnector};

// ===== MockDnsProvider =====

/// A call received by [`MockDnsProvider`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderCall {
    Zone(String),
    Records { zone: String, filter: RecordFilter },
    AddRecord { zone: String, record: NewRecord },
    DeleteRecord { zone: String, filter: RecordFilter },
}

/// In-memory provider that records every call.
///
/// Zones not configured answer with `DomainNotFound`.
pub struct MockDnsProvider {
    zones: RwLock<HashMap<String, ProviderResult<Vec<Zone>>>>,
    records: RwLock<Vec<(String, DnsRecord)>>,
    add_error: RwLock<Option<ProviderError>>,
    delete_error: RwLock<Option<ProviderError>>,
    calls: RwLock<Vec<ProviderCall>>,
}

impl MockDnsProvider {
    pub fn new() -> Self {
        Self {
            zones: RwLock::new(HashMap::new()),
            records: RwLock::new(Vec::new()),
            add_error: RwLock::new(None),
            delete_error: RwLock::new(None),
            calls: RwLock::new(Vec::new()),
        }
    }

    pub fn with_zone(mut self, name: &str, active: bool, kind: ZoneKind) -> Self {
        self.zones.get_mut().insert(
            name.to_string(),
            Ok(vec![Zone {
                name: name.to_string(),
                active,
                kind,
            }]),
        );
        self
    }

    /// Active master zone.
    pub fn with_master_zone(self, name: &str) -> Self {
        self.with_zone(name, true, ZoneKind::Master)
    }

    /// Zone lookup that succeeds with no zones.
    pub fn with_empty_zone(mut self, name: &str) -> Self {
        self.zones.get_mut().insert(name.to_string(), Ok(Vec::new()));
        self
    }

    pub fn with_zone_error(mut self, name: &str, error: ProviderError) -> Self {
        self.zones.get_mut().insert(name.to_string(), Err(error));
        self
    }

    pub fn with_record(mut self, zone: &str, record: DnsRecord) -> Self {
        self.records.get_mut().push((zone.to_string(), record));
        self
    }

    pub fn failing_add(mut self, error: ProviderError) -> Self {
        *self.add_error.get_mut() = Some(error);
        self
    }

    pub fn failing_delete(mut self, error: ProviderError) -> Self {
        *self.delete_error.get_mut() = Some(error);
        self
    }

    pub async fn calls(&self) -> Vec<ProviderCall> {
        self.calls.read().await.clone()
    }

    /// Names passed to `zone`, in call order.
    pub async fn zone_queries(&self) -> Vec<String> {
        self.calls
            .read()
            .await
            .iter()
            .filter_map(|call| match call {
                ProviderCall::Zone(name) => Some(name.clone()),
                _ => None,
            })
            .collect()
    }

    pub async fn adds(&self) -> Vec<(String, NewRecord)> {
        self.calls
            .read()
            .await
            .iter()
            .filter_map(|call| match call {
                ProviderCall::AddRecord { zone, record } => Some((zone.clone(), record.clone())),
                _ => None,
            })
            .collect()
    }

    pub async fn deletes(&self) -> Vec<(String, RecordFilter)> {
        self.calls
            .read()
            .await
            .iter()
            .filter_map(|call| match call {
                ProviderCall::DeleteRecord { zone, filter } => {
                    Some((zone.clone(), filter.clone()))
                }
                _ => None,
            })
            .collect()
    }

    /// Records currently stored in `zone`.
    pub async fn records_in(&self, zone: &str) -> Vec<DnsRecord> {
        self.records
            .read()
            .await
            .iter()
            .filter(|(z, _)| z == zone)
            .map(|(_, r)| r.clone())
            .collect()
    }

    fn matches(record: &DnsRecord, filter: &RecordFilter) -> bool {
        filter.name.as_ref().is_none_or(|n| *n == record.name)
            && filter.record_type.is_none_or(|t| t == record.record_type)
            && filter.data.as_ref().is_none_or(|d| *d == record.data)
    }
}

#[async_trait]
impl DnsProvider for MockDnsProvider {
    fn id(&self) -> &'static str {
        "mock"
    }

    async fn zone(&self, name: &str) -> ProviderResult<Vec<Zone>> {
        self.calls
            .write()
            .await
            .push(ProviderCall::Zone(name.to_string()));

        match self.zones.read().await.get(name) {
            Some(result) => result.clone(),
            None => Err(ProviderError::DomainNotFound {
                provider: "mock".to_string(),
                domain: name.to_string(),
                raw_message: None,
            }),
        }
    }

    async fn records(&self, zone: &str, filter: &RecordFilter) -> ProviderResult<Vec<DnsRecord>> {
        self.calls.write().await.push(ProviderCall::Records {
            zone: zone.to_string(),
            filter: filter.clone(),
        });

        Ok(self
            .records
            .read()
            .await
            .iter()
            .filter(|(z, r)| z == zone && Self::matches(r, filter))
            .map(|(_, r)| r.clone())
            .collect())
    }

    async fn add_record(&self, zone: &str, record: &NewRecord) -> ProviderResult<()> {
        self.calls.write().await.push(ProviderCall::AddRecord {
            zone: zone.to_string(),
            record: record.clone(),
        });

        if let Some(error) = self.add_error.read().await.clone() {
            return Err(error);
        }
        self.records.write().await.push((
            zone.to_string(),
            DnsRecord {
                name: record.name.clone(),
                record_type: record.record_type,
                data: record.data.clone(),
                ttl: record.ttl,
            },
        ));
        Ok(())
    }

    async fn delete_record(&self, zone: &str, filter: &RecordFilter) -> ProviderResult<()> {
        self.calls.write().await.push(ProviderCall::DeleteRecord {
            zone: zone.to_string(),
            filter: filter.clone(),
        });

        if filter.is_empty() {
            return Err(ProviderError::InvalidParameter {
                provider: "mock".to_string(),
                param: "filter".to_string(),
                detail: "empty".to_string(),
            });
        }
        if let Some(error) = self.delete_error.read().await.clone() {
            return Err(error);
        }
        self.records
            .write()
            .await
            .retain(|(z, r)| !(z == zone && Self::matches(r, filter)));
        Ok(())
    }
}

/// A TXT record as the provider would report it.
pub fn txt_record(name: &str, data: &str) -> DnsRecord {
    DnsRecord {
        name: name.to_string(),
        record_type: DnsRecordType::Txt,
        data: data.to_string(),
        ttl: 300,
    }
}

// ===== CountingConnector =====

/// Connector handing out a fixed provider and counting connections.
pub struct CountingConnector {
    provider: Option<Arc<dyn DnsProvider>>,
    connections: AtomicUsize,
}

impl CountingConnector {
    pub fn new(provider: Arc<dyn DnsProvider>) -> Self {
        Self {
            provider: Some(provider),
            connections: AtomicUsize::new(0),
        }
    }

    /// Connector whose every login is rejected.
    pub fn rejecting() -> Self {
        Self {
            provider: None,
            connections: AtomicUsize::new(0),
        }
    }

    pub fn connections(&self) -> usize {
        self.connections.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProviderConnector for CountingConnector {
    async fn connect(
        &self,
        _credentials: ProviderCredentials,
    ) -> ProviderResult<Arc<dyn DnsProvider>> {
        self.connections.fetch_add(1, Ordering::SeqCst);
        // Give concurrent callers a chance to race on the registry
        tokio::task::yield_now().await;

        self.provider
            .clone()
            .ok_or_else(|| ProviderError::InvalidCredentials {
                provider: "mock".to_string(),
                raw_message: Some("login rejected".to_string()),
            })
    }
}

// ===== StaticCnameLookup =====

/// Table-driven CNAME lookup; names not in the table have no CNAME.
#[derive(Default)]
pub struct StaticCnameLookup {
    answers: HashMap<String, Result<Option<String>, CnameLookupError>>,
    queries: AtomicUsize,
}

impl StaticCnameLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cname(mut self, name: &str, target: &str) -> Self {
        self.answers
            .insert(name.to_string(), Ok(Some(target.to_string())));
        self
    }

    pub fn with_failure(mut self, name: &str, detail: &str) -> Self {
        self.answers.insert(
            name.to_string(),
            Err(CnameLookupError(detail.to_string())),
        );
        self
    }

    pub fn queries(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CnameLookup for StaticCnameLookup {
    async fn cname(&self, name: &str) -> Result<Option<String>, CnameLookupError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        self.answers.get(name).cloned().unwrap_or(Ok(None))
    }
}

// ===== Factory methods =====

/// Create a test `ChallengeContext` around a mock provider and CNAME table.
pub fn create_test_context(
    provider: Arc<MockDnsProvider>,
    lookup: StaticCnameLookup,
) -> (Arc<ChallengeContext>, Arc<CountingConnector>, Arc<StaticCnameLookup>) {
    let connector = Arc::new(CountingConnector::new(provider));
    let lookup = Arc::new(lookup);
    let ctx = Arc::new(ChallengeContext::in_memory(
        connector.clone(),
        lookup.clone(),
        ChallengeSettings::default(),
    ));
    (ctx, connector, lookup)
}

/// Valid Core Networks credentials for tests.
pub fn test_credentials() -> ProviderCredentials {
    ProviderCredentials::CoreNetworks {
        username: "test-user".to_string(),
        password: "test-password".to_string(),
    }
}

/// Credential source with both fields set.
pub fn test_source(identity: &str) -> CredentialSource {
    CredentialSource::new(
        identity,
        HashMap::from([
            ("username".to_string(), "test-user".to_string()),
            ("password".to_string(), "test-password".to_string()),
        ]),
    )
}
