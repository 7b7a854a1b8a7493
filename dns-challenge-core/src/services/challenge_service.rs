//! DNS-01 challenge record lifecycle

use std::sync::Arc;

use dns_challenge_provider::{
    DnsProvider, NewRecord, ProviderCredentials, ProviderError, RecordFilter, Zone,
    full_name_to_relative, normalize_domain_name,
};

use crate::config::CredentialSource;
use crate::error::{ChallengeError, CoreResult, ProviderOperation};
use crate::services::{ChallengeContext, ZoneResolver};

/// Places and removes challenge TXT records for one credential identity.
pub struct ChallengeService {
    ctx: Arc<ChallengeContext>,
    identity: String,
    credentials: ProviderCredentials,
}

impl ChallengeService {
    /// Validate the credential input. No network activity happens here.
    ///
    /// # Errors
    ///
    /// [`ChallengeError::Configuration`] when a credential field is missing or blank.
    pub fn new(ctx: Arc<ChallengeContext>, source: &CredentialSource) -> CoreResult<Self> {
        Ok(Self {
            credentials: source.credentials()?,
            identity: source.identity.clone(),
            ctx,
        })
    }

    /// Create the TXT record `validation_value` for `validation_name`, following CNAMEs.
    pub async fn perform(
        &self,
        domain: &str,
        validation_name: &str,
        validation_value: &str,
    ) -> CoreResult<()> {
        let resolved = self.resolved_name(domain, validation_name).await?;
        let provider = self.provider().await?;
        let zone = ZoneResolver::new(Arc::clone(&provider))
            .find_zone(&resolved)
            .await
            .map_err(|e| e.in_domain(domain))?;

        let record = NewRecord::txt(
            full_name_to_relative(&resolved, &zone.name),
            validation_value,
            self.ctx.settings.ttl,
        );
        provider
            .add_record(&zone.name, &record)
            .await
            .map_err(|source| {
                Self::provider_error(ProviderOperation::AddRecord, &resolved, &zone, domain, source)
            })?;

        log::info!(
            "Added TXT record {resolved} in zone {} for {domain}",
            zone.name
        );
        Ok(())
    }

    /// Remove the TXT record created by [`perform`](Self::perform) for the same inputs.
    ///
    /// Exactly one record must match; zero or several matches delete nothing.
    pub async fn cleanup(
        &self,
        domain: &str,
        validation_name: &str,
        validation_value: &str,
    ) -> CoreResult<()> {
        let key = normalize_domain_name(validation_name);
        let resolved = self.ctx.name_cache.get(&key).await.ok_or_else(|| {
            ChallengeError::UnknownValidationName {
                validation_name: validation_name.to_string(),
                domain: domain.to_string(),
            }
        })?;

        let provider = self.provider().await?;
        let zone = ZoneResolver::new(Arc::clone(&provider))
            .find_zone(&resolved)
            .await
            .map_err(|e| e.in_domain(domain))?;

        let relative = full_name_to_relative(&resolved, &zone.name);
        let filter = RecordFilter::txt(relative.as_str(), validation_value);

        let records = provider
            .records(&zone.name, &filter)
            .await
            .map_err(|source| {
                Self::provider_error(
                    ProviderOperation::ListRecords,
                    &resolved,
                    &zone,
                    domain,
                    source,
                )
            })?;
        match records.as_slice() {
            [record] if record.name.eq_ignore_ascii_case(&relative) => {}
            _ => {
                return Err(ChallengeError::RecordNotFound {
                    record: resolved,
                    zone: zone.name,
                    domain: domain.to_string(),
                    matches: records.len(),
                });
            }
        }

        provider
            .delete_record(&zone.name, &filter)
            .await
            .map_err(|source| {
                Self::provider_error(
                    ProviderOperation::DeleteRecord,
                    &resolved,
                    &zone,
                    domain,
                    source,
                )
            })?;

        log::info!(
            "Deleted TXT record {resolved} in zone {} for {domain}",
            zone.name
        );
        Ok(())
    }

    /// Resolve a record name and its zone without changing anything.
    ///
    /// Returns `(resolved name, zone)`.
    pub async fn find_zone(&self, name: &str) -> CoreResult<(String, Zone)> {
        let resolved = self.ctx.cname_resolver().resolve(name).await?;
        let provider = self.provider().await?;
        let zone = ZoneResolver::new(provider).find_zone(&resolved).await?;
        Ok((resolved, zone))
    }

    /// Cached resolution of `validation_name`, resolving and caching on a miss.
    async fn resolved_name(&self, domain: &str, validation_name: &str) -> CoreResult<String> {
        let key = normalize_domain_name(validation_name);
        if let Some(resolved) = self.ctx.name_cache.get(&key).await {
            return Ok(resolved);
        }

        let resolved = self
            .ctx
            .cname_resolver()
            .resolve(&key)
            .await
            .map_err(|e| e.in_domain(domain))?;
        if resolved != key {
            log::info!("{validation_name} is redirected by CNAME to {resolved}");
        }

        self.ctx.name_cache.insert(key, resolved.clone()).await;
        Ok(resolved)
    }

    /// Cached provider client for this identity, logging in on first use.
    async fn provider(&self) -> CoreResult<Arc<dyn DnsProvider>> {
        let provider = self
            .ctx
            .provider_registry
            .get_or_connect(
                &self.identity,
                self.credentials.clone(),
                self.ctx.connector.as_ref(),
            )
            .await
            .map_err(|source| match source {
                ProviderError::InvalidCredentials { .. } => ChallengeError::Authentication {
                    identity: self.identity.clone(),
                    source,
                },
                _ => ChallengeError::Connect {
                    identity: self.identity.clone(),
                    source,
                },
            })?;
        log::debug!("Using {} client for {}", provider.id(), self.identity);
        Ok(provider)
    }

    fn provider_error(
        operation: ProviderOperation,
        record: &str,
        zone: &Zone,
        domain: &str,
        source: ProviderError,
    ) -> ChallengeError {
        ChallengeError::Provider {
            operation,
            record: record.to_string(),
            zone: zone.name.clone(),
            domain: domain.to_string(),
            source,
        }
    }
}
