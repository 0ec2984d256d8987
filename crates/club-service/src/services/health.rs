//! Readiness probing

use crate::dto::{HealthCheck, ReadinessResponse};

use super::context::ServiceContext;

pub struct HealthService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> HealthService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Ping every registered dependency
    pub async fn readiness(&self) -> ReadinessResponse {
        let mut checks = Vec::with_capacity(self.ctx.health_probes().len());
        for probe in self.ctx.health_probes() {
            let result = probe.check().await;
            if let Err(e) = &result {
                tracing::warn!(dependency = probe.name(), error = %e, "Readiness check failed");
            }
            checks.push(HealthCheck {
                name: probe.name(),
                status: if result.is_ok() { "healthy" } else { "unhealthy" },
                error: result.err().map(|e| e.to_string()),
            });
        }

        let status = if checks.iter().all(|c| c.error.is_none()) {
            "ready"
        } else {
            "not_ready"
        };
        ReadinessResponse { status, checks }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{StaticProbe, TestHarness};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_readiness_reports_each_probe() {
        let harness = TestHarness::with_probes(vec![
            Arc::new(StaticProbe::healthy("postgres")),
            Arc::new(StaticProbe::failing("redis")),
        ]);
        let response = HealthService::new(&harness.ctx).readiness().await;

        assert_eq!(response.status, "not_ready");
        assert!(!response.is_ready());
        assert_eq!(response.checks[0].status, "healthy");
        assert_eq!(response.checks[1].name, "redis");
        assert!(response.checks[1].error.is_some());
    }

    #[tokio::test]
    async fn test_ready_without_failures() {
        let harness = TestHarness::with_probes(vec![Arc::new(StaticProbe::healthy("postgres"))]);
        assert!(HealthService::new(&harness.ctx).readiness().await.is_ready());
    }
}
