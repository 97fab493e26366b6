// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod http_server;
pub mod search;

pub use http_server::{create_router, start_server, AppState};
pub use search::{search_handler, SearchApiRequest};
