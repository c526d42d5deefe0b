pub mod metal_rate_sync;
