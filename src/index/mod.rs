// In-memory state shared between the ingestion task and query handlers

pub mod keys;
pub mod progress;
pub mod subscriptions;
pub mod transactions;

pub use keys::AddressKey;
pub use progress::ProgressTracker;
pub use subscriptions::SubscriptionRegistry;
pub use transactions::TransactionIndex;
