//! Brand detection combining the local brand table with the BIN lookup.

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc, RwLock,
};

use cards::{card_type, consts::RELIABLE_PREFIX_LENGTH, CardBrand, CardNumber, DetectedCardType};
use common_enums::Environment;
use common_utils::crypto::{self, Sha256};
use error_stack::ResultExt;
use futures::{stream, StreamExt};
use masking::Secret;
use router_env::{logger, tracing::Instrument, types::Tag};
use rustc_hash::FxHashMap;

use crate::{
    errors::{ApiError, CustomResult},
    services::{
        BinLookupRequest, BinLookupService, CardEncryptor, DetectCardTypeRepository,
        DetectedCardTypesStream,
    },
};

#[derive(Clone, Debug)]
enum BinLookupResult {
    Loading,
    Available(Vec<DetectedCardType>),
}

type BinLookupCache = Arc<RwLock<FxHashMap<String, BinLookupResult>>>;

/// Emits the local estimate first, then the BIN lookup result once the number is long enough
/// and a public key is available. Lookup results are cached per hashed BIN.
pub struct DefaultDetectCardTypeRepository {
    card_encryptor: Arc<dyn CardEncryptor>,
    bin_lookup_service: Arc<dyn BinLookupService>,
    cache: BinLookupCache,
    request_id: Arc<AtomicU64>,
}

impl std::fmt::Debug for DefaultDetectCardTypeRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DefaultDetectCardTypeRepository")
            .finish_non_exhaustive()
    }
}

impl DefaultDetectCardTypeRepository {
    pub fn new(
        card_encryptor: Arc<dyn CardEncryptor>,
        bin_lookup_service: Arc<dyn BinLookupService>,
    ) -> Self {
        Self {
            card_encryptor,
            bin_lookup_service,
            cache: Arc::default(),
            request_id: Arc::default(),
        }
    }

    fn cached(&self, key: &str) -> Option<BinLookupResult> {
        self.cache
            .read()
            .map_err(|_err| logger::error!(tag = %Tag::CardTypeDetection, "bin lookup cache lock poisoned"))
            .ok()
            .and_then(|cache| cache.get(key).cloned())
    }
}

impl DetectCardTypeRepository for DefaultDetectCardTypeRepository {
    fn detect_card_type(
        &self,
        card_number: &CardNumber,
        public_key: Option<&Secret<String>>,
        supported_card_brands: &[CardBrand],
        environment: Environment,
        client_key: &Secret<String>,
    ) -> DetectedCardTypesStream {
        let local = card_type::detect_locally(card_number, supported_card_brands);
        let local_only = stream::once(futures::future::ready(Ok(local.clone()))).boxed();

        let Some(public_key) = public_key.cloned() else {
            return local_only;
        };
        if card_number.len() < RELIABLE_PREFIX_LENGTH {
            return local_only;
        }

        let bin = card_number.prefix(RELIABLE_PREFIX_LENGTH);
        let key = match crypto::hashed_key(&Sha256, &Secret::new(bin.clone())) {
            Ok(key) => key,
            Err(error) => {
                logger::error!(tag = %Tag::CardTypeDetection, ?error, "failed to hash bin");
                return local_only;
            }
        };

        match self.cached(&key) {
            Some(BinLookupResult::Available(detected_card_types)) => {
                logger::debug!(tag = %Tag::CardTypeDetection, "bin lookup served from cache");
                return stream::once(futures::future::ready(Ok(detected_card_types))).boxed();
            }
            Some(BinLookupResult::Loading) => {
                logger::debug!(tag = %Tag::CardTypeDetection, "bin lookup already in progress");
                return local_only;
            }
            None => {}
        }

        let request_id = self.request_id.fetch_add(1, Ordering::Relaxed);
        let lookup = BinLookup {
            card_encryptor: Arc::clone(&self.card_encryptor),
            bin_lookup_service: Arc::clone(&self.bin_lookup_service),
            cache: Arc::clone(&self.cache),
            key,
            bin: Secret::new(bin),
            public_key,
            supported_card_brands: supported_card_brands
                .iter()
                .map(ToString::to_string)
                .collect(),
            environment,
            client_key: client_key.clone(),
            request_id: request_id.to_string(),
        };
        let span = router_env::tracing::debug_span!("bin_lookup", request_id);

        async_stream::stream! {
            yield Ok(local);
            match lookup.claim() {
                BinLookupClaim::Pending(pending) => yield lookup.run(pending).instrument(span).await,
                BinLookupClaim::Cached(detected_card_types) => yield Ok(detected_card_types),
                BinLookupClaim::InProgress => {
                    logger::debug!(tag = %Tag::CardTypeDetection, "bin lookup already in progress");
                }
            }
        }
        .boxed()
    }
}

/// One in-flight BIN lookup.
struct BinLookup {
    card_encryptor: Arc<dyn CardEncryptor>,
    bin_lookup_service: Arc<dyn BinLookupService>,
    cache: BinLookupCache,
    key: String,
    bin: Secret<String>,
    public_key: Secret<String>,
    supported_card_brands: Vec<String>,
    environment: Environment,
    client_key: Secret<String>,
    request_id: String,
}

enum BinLookupClaim {
    Pending(PendingEntry),
    Cached(Vec<DetectedCardType>),
    InProgress,
}

/// A `Loading` cache entry owned by one lookup. Dropping it unsettled removes the entry, so a
/// cancelled lookup does not block later ones for the same BIN.
struct PendingEntry {
    cache: BinLookupCache,
    key: String,
    settled: bool,
}

impl PendingEntry {
    fn settle(mut self, result: &CustomResult<Vec<DetectedCardType>, ApiError>) {
        self.settled = true;
        let Ok(mut cache) = self.cache.write() else {
            logger::error!(tag = %Tag::CardTypeDetection, "bin lookup cache lock poisoned");
            return;
        };
        match result {
            Ok(detected_card_types) => {
                cache.insert(
                    self.key.clone(),
                    BinLookupResult::Available(detected_card_types.clone()),
                );
            }
            Err(error) => {
                logger::warn!(tag = %Tag::CardTypeDetection, ?error, "bin lookup failed");
                cache.remove(&self.key);
            }
        }
    }
}

impl Drop for PendingEntry {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        if let Ok(mut cache) = self.cache.write() {
            if matches!(cache.get(&self.key), Some(BinLookupResult::Loading)) {
                cache.remove(&self.key);
            }
        }
        logger::debug!(tag = %Tag::CardTypeDetection, "bin lookup dropped before completion");
    }
}

impl BinLookup {
    /// Marks the BIN as loading unless another lookup got there first.
    fn claim(&self) -> BinLookupClaim {
        let Ok(mut cache) = self.cache.write() else {
            logger::error!(tag = %Tag::CardTypeDetection, "bin lookup cache lock poisoned");
            return BinLookupClaim::InProgress;
        };
        match cache.get(&self.key) {
            Some(BinLookupResult::Available(detected_card_types)) => {
                BinLookupClaim::Cached(detected_card_types.clone())
            }
            Some(BinLookupResult::Loading) => BinLookupClaim::InProgress,
            None => {
                cache.insert(self.key.clone(), BinLookupResult::Loading);
                BinLookupClaim::Pending(PendingEntry {
                    cache: Arc::clone(&self.cache),
                    key: self.key.clone(),
                    settled: false,
                })
            }
        }
    }

    async fn run(self, pending: PendingEntry) -> CustomResult<Vec<DetectedCardType>, ApiError> {
        let result = self.fetch().await;
        pending.settle(&result);
        result
    }

    async fn fetch(&self) -> CustomResult<Vec<DetectedCardType>, ApiError> {
        use masking::PeekInterface;

        let encrypted_bin = self
            .card_encryptor
            .encrypt_bin(self.bin.peek(), &self.public_key)
            .change_context(ApiError::RequestEncryptionFailed)?;

        let request = BinLookupRequest {
            encrypted_bin,
            request_id: self.request_id.clone(),
            supported_brands: self.supported_card_brands.clone(),
        };

        let response = self
            .bin_lookup_service
            .make_bin_lookup(request, self.environment, &self.client_key)
            .await?;

        let detected_card_types = response
            .brands
            .into_iter()
            .filter_map(|brand| brand.into_detected_card_type())
            .collect::<Vec<_>>();

        logger::info!(
            tag = %Tag::CardTypeDetection,
            brands = ?detected_card_types
                .iter()
                .map(|detected| detected.card_brand.tx_variant())
                .collect::<Vec<_>>(),
            "bin lookup completed"
        );

        Ok(detected_card_types)
    }
}
