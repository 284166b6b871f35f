//! Container/content width measurement against the host layout
//!
//! Both widths are queried concurrently and only ever surface as a pair, so a
//! container width from one content state is never combined with a content
//! width from another. Every call takes a cancellation token; once the token
//! is cancelled the call resolves to `None` no matter when the host answers.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use super::fit::{FitDecision, FitThresholds};
use crate::{Error, Result};

/// The two nodes a marquee measures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeId {
    /// The visible viewport
    Container,
    /// The single-line text inside it
    Content,
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeId::Container => f.write_str("container"),
            NodeId::Content => f.write_str("content"),
        }
    }
}

/// Horizontal text direction, which mirrors every drive target
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextDirection {
    #[default]
    LeftToRight,
    RightToLeft,
}

impl TextDirection {
    pub fn from_rtl(is_rtl: bool) -> Self {
        if is_rtl {
            TextDirection::RightToLeft
        } else {
            TextDirection::LeftToRight
        }
    }

    #[inline]
    pub fn is_rtl(self) -> bool {
        self == TextDirection::RightToLeft
    }

    /// Sign of the outbound travel: content moves left in LTR, right in RTL
    #[inline]
    pub fn travel_sign(self) -> f64 {
        match self {
            TextDirection::LeftToRight => -1.0,
            TextDirection::RightToLeft => 1.0,
        }
    }
}

/// Host layout seam: reports rendered widths of marquee nodes
#[async_trait]
pub trait MeasureHost: Send + Sync {
    /// Width of a rendered node. Fails with `Error::NodeNotReady` if the node
    /// is not attached yet.
    async fn measure_width(&self, node: NodeId) -> Result<f64>;

    /// Host-level text direction detection
    fn layout_direction(&self) -> TextDirection {
        TextDirection::LeftToRight
    }
}

/// A simultaneously measured container/content pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Metrics {
    pub container_width: f64,
    pub content_width: f64,
    /// Extra slack added to the overflow distance
    pub threshold: f64,
}

impl Metrics {
    pub fn new(container_width: f64, content_width: f64, threshold: f64) -> Self {
        Self {
            container_width,
            content_width,
            threshold,
        }
    }

    /// Overflow distance: content − container + threshold
    #[inline]
    pub fn distance(&self) -> f64 {
        self.content_width - self.container_width + self.threshold
    }

    pub fn decide(&self, thresholds: &FitThresholds) -> FitDecision {
        thresholds.evaluate(self.container_width, self.content_width, self.threshold)
    }
}

/// Measures both nodes of a marquee as one cancellable operation
#[derive(Clone)]
pub struct MetricsProber {
    host: Arc<dyn MeasureHost>,
    threshold: f64,
}

impl MetricsProber {
    pub fn new(host: Arc<dyn MeasureHost>, threshold: f64) -> Self {
        Self { host, threshold }
    }

    pub fn host(&self) -> &Arc<dyn MeasureHost> {
        &self.host
    }

    /// Measure container and content together.
    ///
    /// Returns `None` if `cancel` fires before or while the host answers.
    pub async fn measure(&self, cancel: &CancellationToken) -> Option<Result<Metrics>> {
        if cancel.is_cancelled() {
            return None;
        }

        let probe = async {
            let (container, content) = tokio::try_join!(
                self.width_of(NodeId::Container),
                self.width_of(NodeId::Content),
            )?;
            Ok(Metrics::new(container, content, self.threshold))
        };

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => return None,
            result = probe => result,
        };

        if cancel.is_cancelled() {
            tracing::trace!("Discarding measurement resolved after cancellation");
            return None;
        }
        Some(result)
    }

    async fn width_of(&self, node: NodeId) -> Result<f64> {
        let value = self.host.measure_width(node).await?;
        if !value.is_finite() || value < 0.0 {
            return Err(Error::InvalidWidth { node, value });
        }
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedHost;

    #[tokio::test]
    async fn test_measures_both_nodes() {
        let host = Arc::new(ScriptedHost::new(100.0, 300.0));
        let prober = MetricsProber::new(host.clone(), 2.0);

        let metrics = prober
            .measure(&CancellationToken::new())
            .await
            .unwrap()
            .unwrap();

        assert_eq!(metrics, Metrics::new(100.0, 300.0, 2.0));
        assert_eq!(metrics.distance(), 202.0);
        assert_eq!(host.measure_count(), 1);
    }

    #[tokio::test]
    async fn test_missing_node_is_not_ready() {
        let host = Arc::new(ScriptedHost::new(100.0, 300.0));
        host.detach(NodeId::Content);
        let prober = MetricsProber::new(host, 0.0);

        let result = prober.measure(&CancellationToken::new()).await.unwrap();
        assert!(matches!(result, Err(Error::NodeNotReady(NodeId::Content))));
    }

    #[tokio::test]
    async fn test_non_finite_width_is_rejected() {
        let host = Arc::new(ScriptedHost::new(f64::NAN, 300.0));
        let prober = MetricsProber::new(host, 0.0);

        let result = prober.measure(&CancellationToken::new()).await.unwrap();
        assert!(matches!(
            result,
            Err(Error::InvalidWidth { node: NodeId::Container, .. })
        ));
    }

    #[tokio::test]
    async fn test_cancelled_before_start_resolves_to_none() {
        let host = Arc::new(ScriptedHost::new(100.0, 300.0));
        let prober = MetricsProber::new(host.clone(), 0.0);
        let token = CancellationToken::new();
        token.cancel();

        assert!(prober.measure(&token).await.is_none());
        assert_eq!(host.measure_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_while_pending_resolves_to_none() {
        let host = Arc::new(ScriptedHost::new(100.0, 300.0));
        let gate = host.hold();
        let prober = MetricsProber::new(host, 0.0);
        let token = CancellationToken::new();

        let pending = {
            let token = token.clone();
            tokio::spawn(async move { prober.measure(&token).await })
        };
        tokio::task::yield_now().await;
        token.cancel();
        gate.add_permits(8);

        assert!(pending.await.unwrap().is_none());
    }

    #[test]
    fn test_travel_sign_mirrors() {
        assert_eq!(TextDirection::LeftToRight.travel_sign(), -1.0);
        assert_eq!(TextDirection::RightToLeft.travel_sign(), 1.0);
        assert!(TextDirection::from_rtl(true).is_rtl());
    }
}
