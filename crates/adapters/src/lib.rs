// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! sy-adapters: Out-of-core adapters for Switchyard machine seams.

mod dot;
mod publish;
mod source;

pub use dot::DotVisualizer;
pub use publish::{ChannelPublisher, TracingPublisher};
pub use source::ChannelEventSource;
