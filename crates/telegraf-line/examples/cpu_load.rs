// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Basic example: report CPU load and request latency to Telegraf over UDP.
//!
//! Enable a `socket_listener` input in Telegraf:
//!
//! ```toml
//! [[inputs.socket_listener]]
//!   service_address = "udp://127.0.0.1:8094"
//! ```
//!
//! and then:
//!
//! ```sh
//! cargo run --example cpu_load
//! ```

use std::time::Instant;
use telegraf_line::{Client, Measurement, TimeUnit};

fn main() -> telegraf_line::Result<()> {
    let started = Instant::now();

    // 1. Connect and set tags shared by every measurement
    let mut client = Client::udp("127.0.0.1:8094")?.with_default_tags([("host", "example")]);

    // 2. A plain measurement with a float and an integer field
    let cpu = Measurement::builder("cpu")
        .field("load_avg", 1.4)
        .field("counter", 1)
        .build();
    println!("{}", cpu);
    client.write(&cpu)?;

    // 3. A latency measurement without a timestamp; Telegraf stamps it
    let latency = Measurement::builder("request")
        .tag("path", "/api")
        .duration_since("took_ms", started, TimeUnit::Milliseconds)
        .no_timestamp()
        .build();
    println!("{}", latency);
    client.write(&latency)?;

    client.close()
}
