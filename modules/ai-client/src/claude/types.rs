use serde::{Deserialize, Serialize};

// =============================================================================
// Messages
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum Role {
    User,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct WireMessage {
    pub role: Role,
    pub content: String,
}

impl WireMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub(crate) enum ContentBlock {
    #[serde(rename = "tool_use")]
    ToolUse {
        #[allow(dead_code)]
        id: String,
        name: String,
        input: serde_json::Value,
    },
    #[serde(other)]
    Other,
}

// =============================================================================
// Tool Definition
// =============================================================================

#[derive(Debug, Clone, Serialize)]
pub(crate) struct ToolDefinitionWire {
    pub name: String,
    pub description: String,
    pub input_schema: serde_json::Value,
}

// =============================================================================
// Chat Request
// =============================================================================

#[derive(Debug, Clone, Serialize)]
pub(crate) struct ChatRequest {
    pub model: String,
    pub max_tokens: u32,
    pub messages: Vec<WireMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<ToolDefinitionWire>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<serde_json::Value>,
}

impl ChatRequest {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            max_tokens: 4096,
            messages: Vec::new(),
            system: None,
            tools: None,
            tool_choice: None,
        }
    }

    pub fn system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    pub fn message(mut self, message: WireMessage) -> Self {
        self.messages.push(message);
        self
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Force the model to answer through exactly this tool.
    pub fn forced_tool(mut self, tool: ToolDefinitionWire) -> Self {
        self.tool_choice = Some(serde_json::json!({
            "type": "tool",
            "name": tool.name,
        }));
        self.tools = Some(vec![tool]);
        self
    }
}

// =============================================================================
// Chat Response
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ChatResponse {
    pub content: Vec<ContentBlock>,
    pub stop_reason: Option<String>,
}

impl ChatResponse {
    /// Input of the forced tool call. A reply cut off by `max_tokens` or one
    /// without the tool block is an error.
    pub fn into_tool_input(self, tool_name: &str) -> anyhow::Result<serde_json::Value> {
        if self.stop_reason.as_deref() == Some("max_tokens") {
            anyhow::bail!("Claude reply hit max_tokens before finishing the {tool_name} call");
        }

        self.content
            .into_iter()
            .find_map(|block| match block {
                ContentBlock::ToolUse { name, input, .. } if name == tool_name => Some(input),
                _ => None,
            })
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "Claude reply has no {tool_name} call (stop_reason: {})",
                    self.stop_reason.as_deref().unwrap_or("none")
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forced_tool_sets_tool_choice() {
        let request = ChatRequest::new("claude-test").forced_tool(ToolDefinitionWire {
            name: "structured_response".to_string(),
            description: "d".to_string(),
            input_schema: serde_json::json!({ "type": "object" }),
        });
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["tool_choice"]["name"], "structured_response");
        assert_eq!(value["tools"][0]["input_schema"]["type"], "object");
        assert!(value.get("system").is_none());
    }

    #[test]
    fn response_finds_tool_input_among_blocks() {
        let response: ChatResponse = serde_json::from_value(serde_json::json!({
            "content": [
                { "type": "thinking", "thinking": "..." },
                { "type": "text", "text": "Here you go" },
                { "type": "tool_use", "id": "t1", "name": "structured_response", "input": { "trends": [] } }
            ],
            "stop_reason": "tool_use"
        }))
        .unwrap();
        assert_eq!(
            response.into_tool_input("structured_response").unwrap(),
            serde_json::json!({ "trends": [] })
        );
    }

    #[test]
    fn reply_without_tool_block_is_an_error() {
        let response: ChatResponse = serde_json::from_value(serde_json::json!({
            "content": [{ "type": "text", "text": "I cannot do that" }],
            "stop_reason": "end_turn"
        }))
        .unwrap();
        let err = response.into_tool_input("structured_response").unwrap_err();
        assert!(err.to_string().contains("end_turn"));
    }

    #[test]
    fn truncated_reply_is_an_error() {
        let response: ChatResponse = serde_json::from_value(serde_json::json!({
            "content": [
                { "type": "tool_use", "id": "t1", "name": "structured_response", "input": {} }
            ],
            "stop_reason": "max_tokens"
        }))
        .unwrap();
        let err = response.into_tool_input("structured_response").unwrap_err();
        assert!(err.to_string().contains("max_tokens"));
    }
}
