use std::sync::Arc;

use crate::services::advice_service::AdviceProvider;
use crate::services::forecasting_service::ForecastService;
use crate::services::symbol_resolver::SymbolResolver;

#[derive(Clone)]
pub struct AppState {
    pub forecaster: ForecastService,
    pub symbols: Arc<SymbolResolver>,
    pub advisor: Option<Arc<dyn AdviceProvider>>,
}
