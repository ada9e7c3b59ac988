use crate::core::Pipeline;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub async fn run(&self) -> Result<String> {
        tracing::info!("Starting grouping run");

        // Extract
        let population = self.pipeline.extract().await?;
        tracing::info!("Loaded {} profiles", population.len());
        self.monitor.log_stats("extract");

        // Transform
        let outcome = self.pipeline.transform(population).await?;
        tracing::info!(
            "Formed {} groups, {} profiles left over",
            outcome.result.points,
            outcome.result.unmatched(&outcome.population).len()
        );
        self.monitor.log_stats("group");

        // Load
        let output_path = self.pipeline.load(outcome).await?;
        tracing::info!("Output saved to: {}", output_path);
        self.monitor.log_final_stats();

        Ok(output_path)
    }
}
