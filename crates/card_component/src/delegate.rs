//! The card form event loop.
//!
//! [`CardDelegate::initialize`] spawns one task that owns the raw input, the latest detection
//! result, the address lists and the public key. Input updates and collaborator completions are
//! queued as [`CardEvent`]s and handled one at a time, so reductions never race. The latest
//! detection event always wins, results of superseded requests are applied as they arrive.

use std::sync::Arc;

use cards::{CardBrand, DetectedCardType};
use common_enums::AddressFormUiState;
use error_stack::Report;
use futures::StreamExt;
use masking::Secret;
use router_env::{logger, tracing::Instrument, types::Tag};
use tokio::{
    sync::{mpsc, watch},
    task::{JoinHandle, JoinSet},
};

use crate::{
    address::{self, AddressItem, AddressListItem},
    component_state::{CardComponentState, ComponentStateBuilder},
    configuration::CardComponentParams,
    errors::{ApiError, CardComponentError, CustomResult},
    reducer,
    services::{
        AddressRepository, CardEncryptor, DetectCardTypeRepository, GenericEncryptor,
        PublicKeyRepository,
    },
    types::{BinLookupData, CardInputData, CardInputUpdate, CardOutputData},
};

pub type BinValueListener = Arc<dyn Fn(String) + Send + Sync>;
pub type BinLookupListener = Arc<dyn Fn(Vec<BinLookupData>) + Send + Sync>;

/// Collaborators injected into the card form.
#[derive(Clone)]
pub struct CardServices {
    pub public_key_repository: Arc<dyn PublicKeyRepository>,
    pub detect_card_type_repository: Arc<dyn DetectCardTypeRepository>,
    pub address_repository: Arc<dyn AddressRepository>,
    pub card_encryptor: Arc<dyn CardEncryptor>,
    pub generic_encryptor: Arc<dyn GenericEncryptor>,
}

impl std::fmt::Debug for CardServices {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CardServices").finish_non_exhaustive()
    }
}

#[derive(Debug)]
enum CardEvent {
    InputChanged(CardInputUpdate),
    PublicKeyFetched(CustomResult<Secret<String>, ApiError>),
    CardTypesDetected {
        request_id: u64,
        result: CustomResult<Vec<DetectedCardType>, ApiError>,
    },
    CountriesFetched(CustomResult<Vec<AddressItem>, ApiError>),
    StatesFetched(CustomResult<Vec<AddressItem>, ApiError>),
}

/// Card form before it is started.
pub struct CardDelegate {
    params: Arc<CardComponentParams>,
    services: CardServices,
    on_bin_value: Option<BinValueListener>,
    on_bin_lookup: Option<BinLookupListener>,
}

impl std::fmt::Debug for CardDelegate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CardDelegate")
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

impl CardDelegate {
    pub fn new(params: CardComponentParams, services: CardServices) -> Self {
        Self {
            params: Arc::new(params),
            services,
            on_bin_value: None,
            on_bin_lookup: None,
        }
    }

    /// Called with the BIN whenever it changes.
    pub fn on_bin_value(mut self, listener: impl Fn(String) + Send + Sync + 'static) -> Self {
        self.on_bin_value = Some(Arc::new(listener));
        self
    }

    /// Called with the detected brands whenever the detection result changes.
    pub fn on_bin_lookup(
        mut self,
        listener: impl Fn(Vec<BinLookupData>) + Send + Sync + 'static,
    ) -> Self {
        self.on_bin_lookup = Some(Arc::new(listener));
        self
    }

    /// Starts the event loop on the current Tokio runtime.
    ///
    /// The public key is requested right away, and the country list when the form collects a
    /// full address.
    pub fn initialize(self) -> CardDelegateHandle {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (error_tx, error_rx) = mpsc::unbounded_channel();

        let input = CardInputData::default();
        let state_builder = ComponentStateBuilder::new(
            Arc::clone(&self.params),
            Arc::clone(&self.services.card_encryptor),
            Arc::clone(&self.services.generic_encryptor),
        );
        let output = reducer::create_output_data(&self.params, &input, &[], &[], &[]);
        let (state, _) = state_builder.build(&output, None);
        let (output_tx, output_rx) = watch::channel(output);
        let (state_tx, state_rx) = watch::channel(state);

        let event_loop = CardEventLoop {
            params: self.params,
            services: self.services,
            state_builder,
            input,
            detected_card_types: Vec::new(),
            reliable_supported_brands: None,
            country_options: Vec::new(),
            state_options: Vec::new(),
            public_key: None,
            detection_request_id: 0,
            last_bin_value: String::new(),
            on_bin_value: self.on_bin_value,
            on_bin_lookup: self.on_bin_lookup,
            events: event_tx.downgrade(),
            output_tx,
            state_tx,
            error_tx,
            tasks: JoinSet::new(),
        };

        let span = router_env::tracing::info_span!("card_delegate");
        let task = tokio::spawn(event_loop.run(event_rx).instrument(span));

        CardDelegateHandle {
            events: event_tx,
            output_data: output_rx,
            component_state: state_rx,
            errors: error_rx,
            task,
        }
    }
}

/// Handle of a running card form.
#[derive(Debug)]
pub struct CardDelegateHandle {
    events: mpsc::UnboundedSender<CardEvent>,
    output_data: watch::Receiver<CardOutputData>,
    component_state: watch::Receiver<CardComponentState>,
    errors: mpsc::UnboundedReceiver<Report<CardComponentError>>,
    task: JoinHandle<()>,
}

impl CardDelegateHandle {
    pub fn update_input(&self, update: CardInputUpdate) {
        if self.events.send(CardEvent::InputChanged(update)).is_err() {
            logger::warn!(tag = %Tag::Lifecycle, "input update after the card form was cleared");
        }
    }

    pub fn output_data(&self) -> CardOutputData {
        self.output_data.borrow().clone()
    }

    pub fn component_state(&self) -> CardComponentState {
        self.component_state.borrow().clone()
    }

    pub fn subscribe_output_data(&self) -> watch::Receiver<CardOutputData> {
        self.output_data.clone()
    }

    pub fn subscribe_component_state(&self) -> watch::Receiver<CardComponentState> {
        self.component_state.clone()
    }

    /// Waits for the next collaborator or encryption failure.
    pub async fn next_error(&mut self) -> Option<Report<CardComponentError>> {
        self.errors.recv().await
    }

    /// Failures reported so far and not yet taken.
    pub fn take_errors(&mut self) -> Vec<Report<CardComponentError>> {
        std::iter::from_fn(|| self.errors.try_recv().ok()).collect()
    }

    /// The current state, if it can be submitted.
    pub fn submit(&self) -> CustomResult<CardComponentState, CardComponentError> {
        let state = self.component_state();
        if !state.is_ready {
            return Err(Report::new(CardComponentError::MissingPublicKey));
        }
        if !state.is_input_valid {
            return Err(Report::new(CardComponentError::InvalidInput));
        }
        Ok(state)
    }

    /// Stops the event loop and every collaborator request it started.
    pub fn on_cleared(self) {
        logger::info!(tag = %Tag::Lifecycle, "card form cleared");
        self.task.abort();
    }
}

struct CardEventLoop {
    params: Arc<CardComponentParams>,
    services: CardServices,
    state_builder: ComponentStateBuilder,
    input: CardInputData,
    detected_card_types: Vec<DetectedCardType>,
    reliable_supported_brands: Option<Vec<CardBrand>>,
    country_options: Vec<AddressListItem>,
    state_options: Vec<AddressListItem>,
    public_key: Option<Secret<String>>,
    detection_request_id: u64,
    last_bin_value: String,
    on_bin_value: Option<BinValueListener>,
    on_bin_lookup: Option<BinLookupListener>,
    events: mpsc::WeakUnboundedSender<CardEvent>,
    output_tx: watch::Sender<CardOutputData>,
    state_tx: watch::Sender<CardComponentState>,
    error_tx: mpsc::UnboundedSender<Report<CardComponentError>>,
    tasks: JoinSet<()>,
}

impl CardEventLoop {
    async fn run(mut self, mut events: mpsc::UnboundedReceiver<CardEvent>) {
        self.fetch_public_key();
        if self.params.address_configuration.ui_state() == AddressFormUiState::FullAddress {
            self.request_country_list();
        }

        loop {
            tokio::select! {
                event = events.recv() => match event {
                    Some(event) => self.handle(event),
                    None => break,
                },
                Some(joined) = self.tasks.join_next(), if !self.tasks.is_empty() => {
                    if let Err(error) = joined {
                        logger::error!(tag = %Tag::Lifecycle, ?error, "collaborator task failed");
                    }
                }
            }
        }

        logger::debug!(tag = %Tag::Lifecycle, "card form event loop stopped");
    }

    fn handle(&mut self, event: CardEvent) {
        match event {
            CardEvent::InputChanged(update) => self.on_input_changed(update),
            CardEvent::PublicKeyFetched(Ok(public_key)) => {
                logger::info!(tag = %Tag::PublicKeyRequest, "public key fetched");
                self.public_key = Some(public_key);
                self.update_output_data();
            }
            CardEvent::PublicKeyFetched(Err(error)) => {
                logger::error!(tag = %Tag::PublicKeyRequest, ?error, "unable to fetch public key");
                self.report(error.change_context(CardComponentError::PublicKeyFetchFailed));
            }
            CardEvent::CardTypesDetected { request_id, result } => {
                let detected_card_types = match result {
                    Ok(detected_card_types) => detected_card_types,
                    Err(error) => {
                        logger::warn!(tag = %Tag::CardTypeDetection, request_id, ?error, "card type detection failed");
                        self.report(error.change_context(CardComponentError::CardTypeDetectionFailed));
                        Vec::new()
                    }
                };
                logger::debug!(
                    tag = %Tag::CardTypeDetection,
                    request_id,
                    brands = ?detected_card_types
                        .iter()
                        .map(|detected| (detected.card_brand.tx_variant(), detected.is_reliable))
                        .collect::<Vec<_>>(),
                    "detected card types"
                );
                self.on_card_types_detected(detected_card_types);
            }
            CardEvent::CountriesFetched(Ok(countries)) => self.on_countries_fetched(&countries),
            CardEvent::StatesFetched(Ok(states)) => {
                logger::debug!(tag = %Tag::AddressListRequest, states = states.len(), "state list received");
                self.state_options = address::initialize_state_options(&states);
                self.update_output_data();
            }
            CardEvent::CountriesFetched(Err(error)) | CardEvent::StatesFetched(Err(error)) => {
                logger::error!(tag = %Tag::AddressListRequest, ?error, "unable to fetch address list");
                self.report(error.change_context(CardComponentError::AddressListFetchFailed));
            }
        }
    }

    fn on_input_changed(&mut self, update: CardInputUpdate) {
        let previous_card_number = self.input.card_number.clone();
        let previous_country = self.input.address.country.clone();
        update.apply(&mut self.input);

        if self.input.card_number != previous_card_number {
            self.request_card_type_detection();
        }
        if self.input.address.country != previous_country {
            let country = self.input.address.country.clone();
            self.request_state_list(&country);
        }

        self.update_output_data();
    }

    fn on_card_types_detected(&mut self, detected_card_types: Vec<DetectedCardType>) {
        if detected_card_types != self.detected_card_types {
            if let Some(listener) = &self.on_bin_lookup {
                listener(detected_card_types.iter().map(BinLookupData::from).collect());
            }
        }

        let reliable_supported_brands = detected_card_types
            .iter()
            .filter(|detected| detected.is_reliable && detected.is_supported)
            .map(|detected| detected.card_brand.clone())
            .collect::<Vec<_>>();
        if self.reliable_supported_brands.as_ref() != Some(&reliable_supported_brands) {
            if self.input.selected_card_brand.take().is_some() {
                logger::debug!(tag = %Tag::CardTypeDetection, "selected card brand reset");
            }
            self.reliable_supported_brands = Some(reliable_supported_brands);
        }

        self.detected_card_types = detected_card_types;
        self.update_output_data();
    }

    fn on_countries_fetched(&mut self, countries: &[AddressItem]) {
        logger::debug!(tag = %Tag::AddressListRequest, countries = countries.len(), "country list received");
        self.country_options = address::initialize_country_options(
            &self.params.shopper_locale,
            &self.params.address_configuration,
            countries,
        );

        let selected_country = self
            .country_options
            .iter()
            .find(|option| option.selected)
            .map(|option| option.code.clone());
        if let Some(country) = selected_country {
            if country != self.input.address.country {
                self.input.address.country = country.clone();
                self.request_state_list(&country);
            }
        }

        self.update_output_data();
    }

    fn update_output_data(&mut self) {
        let output = reducer::create_output_data(
            &self.params,
            &self.input,
            &self.detected_card_types,
            &self.country_options,
            &self.state_options,
        );

        let (state, error) = self.state_builder.build(&output, self.public_key.as_ref());
        if let Some(error) = error {
            self.report(error);
        }
        logger::trace!(
            tag = %Tag::OutputDataUpdate,
            is_valid = output.is_valid(),
            is_ready = state.is_ready,
            "output data updated"
        );

        if state.bin_value != self.last_bin_value {
            self.last_bin_value = state.bin_value.clone();
            if let Some(listener) = &self.on_bin_value {
                listener(state.bin_value.clone());
            }
        }

        self.output_tx.send_replace(output);
        self.state_tx.send_replace(state);
    }

    fn report(&self, error: Report<CardComponentError>) {
        if self.error_tx.send(error).is_err() {
            logger::debug!(tag = %Tag::Lifecycle, "error dropped, no receiver");
        }
    }

    fn fetch_public_key(&mut self) {
        let Some(events) = self.events.upgrade() else {
            return;
        };
        let repository = Arc::clone(&self.services.public_key_repository);
        let environment = self.params.environment;
        let client_key = self.params.client_key.clone();

        self.tasks.spawn(async move {
            let result = repository.fetch_public_key(environment, &client_key).await;
            // Fails only once the form is cleared.
            let _ = events.send(CardEvent::PublicKeyFetched(result));
        });
    }

    fn request_card_type_detection(&mut self) {
        let Some(events) = self.events.upgrade() else {
            return;
        };
        self.detection_request_id = self.detection_request_id.wrapping_add(1);
        let request_id = self.detection_request_id;

        let mut detections = self.services.detect_card_type_repository.detect_card_type(
            &self.input.card_number,
            self.public_key.as_ref(),
            &self.params.supported_card_brands,
            self.params.environment,
            &self.params.client_key,
        );

        self.tasks.spawn(async move {
            while let Some(result) = detections.next().await {
                if events
                    .send(CardEvent::CardTypesDetected { request_id, result })
                    .is_err()
                {
                    break;
                }
            }
        });
    }

    fn request_country_list(&mut self) {
        let Some(events) = self.events.upgrade() else {
            return;
        };
        let repository = Arc::clone(&self.services.address_repository);
        let shopper_locale = self.params.shopper_locale.clone();
        let environment = self.params.environment;

        self.tasks.spawn(async move {
            let result = repository.get_country_list(&shopper_locale, environment).await;
            let _ = events.send(CardEvent::CountriesFetched(result));
        });
    }

    fn request_state_list(&mut self, country_code: &str) {
        if self.params.address_configuration.ui_state() != AddressFormUiState::FullAddress
            || country_code.is_empty()
        {
            return;
        }
        let Some(events) = self.events.upgrade() else {
            return;
        };
        let repository = Arc::clone(&self.services.address_repository);
        let shopper_locale = self.params.shopper_locale.clone();
        let environment = self.params.environment;
        let country_code = country_code.to_string();

        self.tasks.spawn(async move {
            let result = repository
                .get_state_list(&shopper_locale, environment, &country_code)
                .await;
            let _ = events.send(CardEvent::StatesFetched(result));
        });
    }
}
