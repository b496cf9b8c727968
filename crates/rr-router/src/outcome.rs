//! Route responses as the frontend receives them.

use std::sync::Arc;

use serde::Serialize;

use rr_search::RouteResult;

use crate::RoutingResult;

/// A route plus whether it came from the cache.
///
/// Cache hits share the `Arc` stored by the first computation, so repeated
/// lookups return the identical result object.
#[derive(Clone, Debug)]
pub struct RouteOutcome {
    pub result: Arc<RouteResult>,
    pub cached: bool,
}

#[derive(Serialize)]
struct Payload<'a> {
    #[serde(flatten)]
    result: &'a RouteResult,
    cached: bool,
}

impl RouteOutcome {
    fn payload(&self) -> Payload<'_> {
        Payload { result: &self.result, cached: self.cached }
    }

    /// The response body: every route field plus `cached`.
    pub fn to_json(&self) -> RoutingResult<String> {
        Ok(serde_json::to_string(&self.payload())?)
    }

    pub fn to_json_value(&self) -> RoutingResult<serde_json::Value> {
        Ok(serde_json::to_value(self.payload())?)
    }
}

impl Serialize for RouteOutcome {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.payload().serialize(serializer)
    }
}
