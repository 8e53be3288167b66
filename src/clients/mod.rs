pub mod current_client;
pub mod export_client;
pub mod prediction_client;
pub mod probability_client;
pub mod series_client;
pub mod statistics_client;
