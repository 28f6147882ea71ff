#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR" ), "/", "README.md"))]

pub mod address;
pub mod component_state;
pub mod configs;
pub mod configuration;
pub mod consts;
pub mod delegate;
pub mod detect_card_type;
pub mod dual_brand;
pub mod errors;
pub mod installments;
pub mod reducer;
pub mod services;
pub mod stored;
pub mod types;

pub use self::{
    component_state::{CardComponentState, ComponentStateBuilder},
    configuration::{CardComponentParams, CardConfiguration},
    delegate::{CardDelegate, CardDelegateHandle},
    types::{CardInputData, CardInputUpdate, CardOutputData},
};
