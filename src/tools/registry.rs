use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::{json, Map, Value as J};

use crate::clients::wttr::WttrClient;
use crate::core::error::ToolError;
use crate::core::tool::Tool;
use crate::tools::weather::GetWeatherTool;

#[derive(Clone)]
pub struct Registry(pub Arc<BTreeMap<&'static str, Arc<dyn Tool>>>);

impl Registry {
    pub fn with_tools<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = Arc<dyn Tool>>,
    {
        let map = iter.into_iter().map(|t| (t.name(), t)).collect();
        Registry(Arc::new(map))
    }

    /// `{"tools": [descriptor, ...]}` for `tools/list`.
    pub fn tools_list(&self) -> J {
        let tools: Vec<J> = self.0.values().map(|t| t.descriptor()).collect();
        json!({ "tools": tools })
    }

    /// Capability map advertised by `initialize`: name -> `{description, inputSchema}`.
    pub fn capabilities(&self) -> Map<String, J> {
        self.0
            .values()
            .map(|t| {
                (
                    t.name().to_owned(),
                    json!({ "description": t.description(), "inputSchema": t.input_schema() }),
                )
            })
            .collect()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.0.keys().copied().collect()
    }

    pub async fn call(&self, name: &str, args: &J) -> Result<J, ToolError> {
        let tool = self
            .0
            .get(name)
            .ok_or_else(|| ToolError::MethodNotFound(format!("Unknown tool: {name}")))?;
        tool.call(args).await
    }
}

pub fn build_registry(client: WttrClient) -> Registry {
    let weather: Arc<dyn Tool> = Arc::new(GetWeatherTool::new(client));
    Registry::with_tools([weather])
}
