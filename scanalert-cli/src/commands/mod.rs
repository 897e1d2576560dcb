pub mod alerts;
pub mod clusters;
pub mod reconcile;
