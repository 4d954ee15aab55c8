pub mod fs_match_source;
pub mod fs_record_store;
pub mod ndjson_notifier;
pub mod notifier_factory;
pub mod rabbitmq_notifier;

pub use fs_match_source::FsMatchSource;
pub use fs_record_store::FsRecordStore;
pub use ndjson_notifier::{NdjsonNotifier, NoopNotifier};
pub use notifier_factory::build_notifier;
pub use rabbitmq_notifier::RabbitMqNotifier;
