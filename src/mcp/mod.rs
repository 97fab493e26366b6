// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Tool protocol surface: the `web_search` tool and the stdio JSON-RPC server

pub mod server;
pub mod tool;

pub use server::McpServer;
pub use tool::{tool_definition, ToolContent, ToolError, ToolResult, WebSearchTool, TOOL_NAME};
