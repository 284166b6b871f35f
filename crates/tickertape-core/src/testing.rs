//! Scripted host and tween engine used by the core tests

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Semaphore;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::animation::{AnimatedValue, Tween, TweenEngine, TweenOutcome};
use crate::metrics::{MeasureHost, NodeId, TextDirection};
use crate::{Error, Result};

/// Measurement host whose widths and readiness are set by the test
pub struct ScriptedHost {
    widths: Mutex<HashMap<NodeId, Option<f64>>>,
    gate: Mutex<Option<Arc<Semaphore>>>,
    measured_at: Mutex<Vec<Instant>>,
    direction: TextDirection,
}

impl ScriptedHost {
    pub fn new(container: f64, content: f64) -> Self {
        Self::with_direction(container, content, TextDirection::LeftToRight)
    }

    pub fn with_direction(container: f64, content: f64, direction: TextDirection) -> Self {
        let mut widths = HashMap::new();
        widths.insert(NodeId::Container, Some(container));
        widths.insert(NodeId::Content, Some(content));
        Self {
            widths: Mutex::new(widths),
            gate: Mutex::new(None),
            measured_at: Mutex::new(Vec::new()),
            direction,
        }
    }

    pub fn set_widths(&self, container: f64, content: f64) {
        let mut widths = self.widths.lock().unwrap();
        widths.insert(NodeId::Container, Some(container));
        widths.insert(NodeId::Content, Some(content));
    }

    pub fn detach(&self, node: NodeId) {
        self.widths.lock().unwrap().insert(node, None);
    }

    /// Make every later width query wait for a permit on the returned gate.
    /// Widths are captured when the query starts, not when it is released.
    pub fn hold(&self) -> Arc<Semaphore> {
        let gate = Arc::new(Semaphore::new(0));
        *self.gate.lock().unwrap() = Some(gate.clone());
        gate
    }

    /// Let later queries answer immediately again
    pub fn release(&self) {
        *self.gate.lock().unwrap() = None;
    }

    /// Number of measurements started (one per container query)
    pub fn measure_count(&self) -> usize {
        self.measured_at.lock().unwrap().len()
    }

    pub fn measured_at(&self) -> Vec<Instant> {
        self.measured_at.lock().unwrap().clone()
    }
}

#[async_trait]
impl MeasureHost for ScriptedHost {
    async fn measure_width(&self, node: NodeId) -> Result<f64> {
        let width = self.widths.lock().unwrap().get(&node).copied().flatten();
        if node == NodeId::Container {
            self.measured_at.lock().unwrap().push(Instant::now());
        }
        let gate = self.gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.acquire()
                .await
                .map_err(|e| Error::Other(e.to_string()))?
                .forget();
        }
        width.ok_or(Error::NodeNotReady(node))
    }

    fn layout_direction(&self) -> TextDirection {
        self.direction
    }
}

/// Tween engine that jumps to the target after the tween's delay and
/// duration, recording every tween it was asked to run
#[derive(Default)]
pub struct RecordingEngine {
    tweens: Mutex<Vec<Tween>>,
}

impl RecordingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tweens(&self) -> Vec<Tween> {
        self.tweens.lock().unwrap().clone()
    }

    pub fn targets(&self) -> Vec<f64> {
        self.tweens().iter().map(|t| t.to).collect()
    }
}

#[async_trait]
impl TweenEngine for RecordingEngine {
    async fn timing(
        &self,
        value: &AnimatedValue,
        tween: Tween,
        cancel: &CancellationToken,
    ) -> TweenOutcome {
        self.tweens.lock().unwrap().push(tween.clone());
        let wait = tween.delay + tween.duration;
        tokio::select! {
            _ = cancel.cancelled() => TweenOutcome { finished: false },
            _ = tokio::time::sleep(wait) => {
                let finished = value.write(tween.to, cancel);
                TweenOutcome { finished }
            }
        }
    }
}

/// Short duration helper for tests
pub fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}
