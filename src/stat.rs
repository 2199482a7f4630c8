use serde::{Serialize, Serializer};
use std::time::Duration;
use tracing::info;

#[derive(Debug, Clone, Default, Serialize)]
pub struct Stats {
    #[serde(rename = "total_time_secs", serialize_with = "as_secs")]
    pub total_time: Duration,
    pub makespan: usize,
    pub initial_heuristic: f64,
    pub expanded_nodes: usize,
    pub generated_nodes: usize,
}

fn as_secs<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(duration.as_secs_f64())
}

impl Stats {
    pub fn print(&self) {
        info!(
            "Makespan {:?} Time(microseconds) {:?} Initial heuristic {:?} Expanded nodes number: {:?} Generated nodes number: {:?}",
            self.makespan,
            self.total_time.as_micros(),
            self.initial_heuristic,
            self.expanded_nodes,
            self.generated_nodes
        );
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
