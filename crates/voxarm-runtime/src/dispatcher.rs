//! Concurrent tool-call dispatch with order-preserving results.
//!
//! Every call in a batch runs on its own task; results are collected in
//! the batch's original order so the conversation history stays aligned
//! with what the model asked for.  A failing call never poisons its
//! siblings: each slot carries its own [`Outcome`].

use serde_json::Value;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use voxarm_tools::ToolRegistry;
use voxarm_types::{Outcome, ToolCall, ToolError};

enum Pending {
    Running(JoinHandle<Outcome<Value>>),
    Done(Outcome<Value>),
}

/// Execute a batch of tool calls and return one `(call_id, outcome)` pair
/// per input call, in input order.
///
/// Unknown tool names resolve immediately to `tool_not_found` without
/// spawning a task.  A panicked tool surfaces as `execution_failed`.
pub async fn dispatch(
    registry: &ToolRegistry,
    batch: &[ToolCall],
) -> Vec<(String, Outcome<Value>)> {
    let mut pending = Vec::with_capacity(batch.len());
    for call in batch {
        match registry.get(&call.name) {
            Some(tool) => {
                info!(tool = %call.name, call_id = %call.id, "dispatching tool call");
                let args = call.args.clone();
                pending.push(Pending::Running(tokio::spawn(async move {
                    tool.call(&args).await
                })));
            }
            None => {
                warn!(tool = %call.name, call_id = %call.id, "unknown tool requested");
                pending.push(Pending::Done(Err(ToolError::not_found(&call.name))));
            }
        }
    }

    let mut results = Vec::with_capacity(batch.len());
    for (call, slot) in batch.iter().zip(pending) {
        let outcome = match slot {
            Pending::Done(outcome) => outcome,
            Pending::Running(handle) => match handle.await {
                Ok(outcome) => outcome,
                Err(e) => Err(ToolError::execution_failed(format!(
                    "tool '{}' panicked: {e}",
                    call.name
                ))),
            },
        };
        match &outcome {
            Ok(_) => info!(tool = %call.name, call_id = %call.id, "tool call succeeded"),
            Err(e) => warn!(tool = %call.name, call_id = %call.id, code = %e.code, "tool call failed"),
        }
        results.push((call.id.clone(), outcome));
    }
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::{json, Map};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use voxarm_tools::{ParamSpec, Tool};

    struct EchoTool;

    #[async_trait]
    impl Tool for EchoTool {
        fn name(&self) -> &str {
            "echo"
        }
        fn description(&self) -> &str {
            "Echoes its arguments back."
        }
        fn params(&self) -> &[ParamSpec] {
            &[]
        }
        async fn call(&self, args: &Map<String, Value>) -> Outcome<Value> {
            Ok(Value::Object(args.clone()))
        }
    }

    struct FailingTool;

    #[async_trait]
    impl Tool for FailingTool {
        fn name(&self) -> &str {
            "always_fails"
        }
        fn description(&self) -> &str {
            "Fails unconditionally."
        }
        fn params(&self) -> &[ParamSpec] {
            &[]
        }
        async fn call(&self, _args: &Map<String, Value>) -> Outcome<Value> {
            Err(ToolError::execution_failed("deliberate failure"))
        }
    }

    struct CountingTool {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl Tool for CountingTool {
        fn name(&self) -> &str {
            "counter"
        }
        fn description(&self) -> &str {
            "Counts invocations."
        }
        fn params(&self) -> &[ParamSpec] {
            &[]
        }
        async fn call(&self, _args: &Map<String, Value>) -> Outcome<Value> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            Ok(json!({ "count": n }))
        }
    }

    fn call(id: &str, name: &str) -> ToolCall {
        ToolCall {
            id: id.to_string(),
            name: name.to_string(),
            args: Map::new(),
        }
    }

    #[tokio::test]
    async fn results_keep_batch_order_with_mixed_outcomes() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(EchoTool));
        registry.register(Arc::new(FailingTool));

        let batch = vec![
            call("c1", "always_fails"),
            call("c2", "no_such_tool"),
            call("c3", "echo"),
        ];
        let results = dispatch(&registry, &batch).await;

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].0, "c1");
        assert_eq!(results[0].1.as_ref().unwrap_err().code, "execution_failed");
        assert_eq!(results[1].0, "c2");
        assert_eq!(results[1].1.as_ref().unwrap_err().code, "tool_not_found");
        assert_eq!(
            results[1].1.as_ref().unwrap_err().message,
            "Unknown tool: 'no_such_tool'"
        );
        assert_eq!(results[2].0, "c3");
        assert!(results[2].1.is_ok());
    }

    #[tokio::test]
    async fn unknown_tool_does_not_block_known_ones() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(CountingTool {
            calls: calls.clone(),
        }));

        let batch = vec![call("c1", "missing"), call("c2", "counter")];
        let results = dispatch(&registry, &batch).await;

        assert!(results[0].1.is_err());
        assert!(results[1].1.is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn empty_batch_yields_no_results() {
        let registry = ToolRegistry::new();
        let results = dispatch(&registry, &[]).await;
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn echo_receives_its_own_arguments() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(EchoTool));

        let mut args = Map::new();
        args.insert("angle".to_string(), json!(42));
        let batch = vec![ToolCall {
            id: "c1".to_string(),
            name: "echo".to_string(),
            args,
        }];
        let results = dispatch(&registry, &batch).await;
        assert_eq!(results[0].1.as_ref().unwrap()["angle"], 42);
    }
}
