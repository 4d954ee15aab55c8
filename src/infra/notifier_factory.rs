use crate::app::ports::NotifierPort;
use crate::config::{NotifierKind, Settings};
use crate::error::Result;
use crate::infra::ndjson_notifier::{NdjsonNotifier, NoopNotifier};
use crate::infra::rabbitmq_notifier::RabbitMqNotifier;

/// Build the notifier selected by configuration.
pub fn build_notifier(settings: &Settings) -> Result<Box<dyn NotifierPort>> {
    let notifier: Box<dyn NotifierPort> = match settings.notifier {
        NotifierKind::Rabbitmq => Box::new(RabbitMqNotifier::new(&settings.rabbitmq)?),
        NotifierKind::Ndjson => Box::new(NdjsonNotifier::new(
            &settings.notify_log_path,
            settings.rabbitmq.routing_key.as_str(),
        )),
        NotifierKind::None => Box::new(NoopNotifier),
    };
    Ok(notifier)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_each_kind() {
        for kind in [NotifierKind::Rabbitmq, NotifierKind::Ndjson, NotifierKind::None] {
            let settings = Settings {
                notifier: kind,
                ..Settings::default()
            };
            assert!(build_notifier(&settings).is_ok(), "{kind:?}");
        }
    }

    #[test]
    fn bad_broker_url_surfaces_as_config_error() {
        let mut settings = Settings::default();
        settings.rabbitmq.api_url = "::nope::".to_string();
        let err = build_notifier(&settings).err().unwrap();
        assert!(err.is_fatal());
    }
}
