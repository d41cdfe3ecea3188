//! Integration tests for the nestegg engines
//!
//! Tests are organized by topic:
//! - `cash_flows` - Transaction expansion, clipping and period conservation
//! - `simulation` - Path mechanics, reproducibility and cancellation
//! - `validation` - Parameter bounds and market override shapes
