pub mod staleness;
