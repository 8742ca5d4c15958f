use crate::{models::DiagnosticsResponse, relay::Relay};
use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;
use std::sync::{Mutex, OnceLock};
use sysinfo::System;
use tracing::info;

static SYSTEM_MONITOR: OnceLock<Mutex<System>> = OnceLock::new();

/// Report relay counters and process resource usage
pub async fn diagnostics(
    State(relay): State<Arc<Relay>>,
) -> (StatusCode, Json<DiagnosticsResponse>) {

    let stats = relay.stats().await;

    // System stats
    let (cpu_usage, memory_alloc, memory_free, memory_total) = {
        let sys_lock = SYSTEM_MONITOR.get_or_init(|| {
            Mutex::new(System::new_all())
        });
        match sys_lock.lock() {
            Ok(mut sys) => {
                sys.refresh_cpu();
                sys.refresh_memory();
                (
                    sys.global_cpu_info().cpu_usage(),
                    sys.used_memory(),
                    sys.free_memory(),
                    sys.total_memory(),
                )
            }
            Err(_) => (0.0, 0, 0, 0)
        }
    };

    info!(
        "Diagnostics: CPU: {:.2}%, Mem: {}/{} MB (Free: {} MB), Conn: {}, Rooms: {}, Members: {}",
        cpu_usage,
        memory_alloc / 1024 / 1024,
        memory_total / 1024 / 1024,
        memory_free / 1024 / 1024,
        stats.connections,
        stats.rooms,
        stats.members
    );

    (
        StatusCode::OK,
        Json(DiagnosticsResponse {
            n_conn: saturating_u32(stats.connections),
            n_joined_conn: saturating_u32(stats.joined_connections),
            n_rooms: saturating_u32(stats.rooms),
            n_members: saturating_u32(stats.members),
            cpu_usage,
            memory_alloc,
            memory_total,
            memory_free,
        }),
    )
}

/// Counters are reported as u32; clamp instead of wrapping.
pub(crate) fn saturating_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}
