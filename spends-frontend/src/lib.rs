pub mod config;
pub mod dashboard;
pub mod handlers;
pub mod models;
pub mod services;
pub mod startup;
pub mod validation;
pub mod workflow;

use config::Settings;
use dashboard::DashboardOptions;
use services::distribution::DistributionClient;
use services::export_contracts::ExportContractClient;
use services::sub_registrar::SubRegistrarClient;
use services::{
    ApiClient, DictionaryClient, NotificationCenter, PaymentRequestClient, WorkflowActions,
};
use std::sync::Arc;
use std::time::Duration;

/// Shared application state: backend clients and the notification centre.
#[derive(Clone)]
pub struct AppState {
    pub requests: PaymentRequestClient,
    pub dictionaries: Arc<DictionaryClient>,
    pub distribution: DistributionClient,
    pub sub_registrar: SubRegistrarClient,
    pub export_contracts: ExportContractClient,
    pub actions: Arc<WorkflowActions>,
    pub notifications: Arc<NotificationCenter>,
    pub dashboard: DashboardOptions,
}

impl AppState {
    pub fn new(api: Arc<ApiClient>, settings: &Settings) -> Self {
        let requests = PaymentRequestClient::new(api.clone());
        let dictionaries = Arc::new(DictionaryClient::new(
            api.clone(),
            Duration::from_secs(settings.dictionaries.cache_ttl_seconds),
        ));
        let notifications = Arc::new(NotificationCenter::new());
        let actions = Arc::new(WorkflowActions::new(
            requests.clone(),
            dictionaries.clone(),
            notifications.clone(),
        ));

        Self {
            requests,
            dictionaries,
            distribution: DistributionClient::new(api.clone()),
            sub_registrar: SubRegistrarClient::new(api.clone()),
            export_contracts: ExportContractClient::new(api),
            actions,
            notifications,
            dashboard: DashboardOptions {
                registrar_demo_fallback: settings.dashboard.registrar_demo_fallback,
            },
        }
    }
}
