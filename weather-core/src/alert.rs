//! Threshold subscriptions and the fan-out that evaluates them.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::model::Measurements;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SubscriptionId(pub u64);

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A low-temperature watcher. The threshold is always in Celsius; callers
/// convert user input before subscribing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlertSubscription {
    id: SubscriptionId,
    threshold_c: f64,
}

impl AlertSubscription {
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    pub fn threshold_c(&self) -> f64 {
        self.threshold_c
    }

    /// Fires when the new temperature is strictly below the threshold.
    pub fn check(&self, measurements: &Measurements) -> Option<Alert> {
        (measurements.temperature_c < self.threshold_c).then(|| Alert {
            subscription: self.id,
            threshold_c: self.threshold_c,
            temperature_c: measurements.temperature_c,
        })
    }
}

/// A breached threshold, produced during fan-out.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub subscription: SubscriptionId,
    pub threshold_c: f64,
    pub temperature_c: f64,
}

impl std::fmt::Display for Alert {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Temperature is below {}°C. Warning!", self.threshold_c)
    }
}

/// Ordered subscriber list. Subscriptions are never removed or merged:
/// registering the same threshold twice yields two independent watchers.
#[derive(Debug, Default)]
pub struct Notifier {
    subscriptions: Vec<AlertSubscription>,
    next_id: u64,
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, threshold_c: f64) -> AlertSubscription {
        let subscription = AlertSubscription {
            id: SubscriptionId(self.next_id),
            threshold_c,
        };
        self.next_id += 1;
        self.subscriptions.push(subscription);
        subscription
    }

    pub fn subscriptions(&self) -> &[AlertSubscription] {
        &self.subscriptions
    }

    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    /// Evaluate every subscription against `measurements` in registration
    /// order and return the alerts that fired, in the same order.
    pub fn notify(&self, measurements: &Measurements) -> Vec<Alert> {
        self.subscriptions
            .iter()
            .filter_map(|s| s.check(measurements))
            .inspect(|alert| {
                warn!(
                    subscription = %alert.subscription,
                    threshold_c = alert.threshold_c,
                    temperature_c = alert.temperature_c,
                    "{alert}"
                );
            })
            .collect()
    }
}
