//! Clients module - reference entities (clients, sites, splits), services, and traits.

mod clients_model;
mod clients_service;
mod clients_traits;

#[cfg(test)]
mod clients_service_tests;

pub use clients_model::{Client, NewClient, NewSite, NewSplit, Site, Split};
pub use clients_service::ClientService;
pub use clients_traits::{ClientRepositoryTrait, ClientServiceTrait};
