//! Integration tests for geospatial context aggregation

mod aggregation_scenarios;
mod config_loading;
mod notice_feed;
mod telemetry_events;
mod test_utils;
