// euler2d - a 2D compressible Euler equations solver
// Copyright (C) 2026 Euler2D contributors

// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as
// published by the Free Software Foundation, either version 3 of the
// License, or (at your option) any later version.

// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.

// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Rasterizing the density field to an image and shipping it to connected
//! viewers over WebSocket.
//!
//! Grounded on `original_source/src/broadcast.hh`'s `GridConverter` (the
//! preimage/clip/scale formulas) and `Broadcast` (the `open(port,
//! max_clients, timeout_ms, max_fps)` constructor shape). The reference
//! hands off frames to its broadcaster thread through the grid's own mutex
//! and condition variable (`broadcast_signal`); this crate decouples that
//! hand-off into [`FrameSlot`], a single-slot, most-recent-wins channel, so
//! the broadcaster has no knowledge of `Grid` internals beyond the
//! rasterized image it is handed.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::grid::Grid;
use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use image::{ImageBuffer, Rgb, RgbImage};
use std::io::Write;
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};
use tungstenite::{Message, WebSocket};

/// Clip `log10(rho)` to `[min, max]`. Mirrors `GridConverter`'s preimage.
fn preimage(rho: f64, min: f64, max: f64) -> f64 {
    rho.log10().clamp(min, max)
}

/// Map a clipped preimage value to a `u8` grey level. Mirrors
/// `GridConverter`'s `255.001 * (x - min) / (max - min)`.
fn to_byte(x: f64, min: f64, max: f64) -> u8 {
    (255.001 * (x - min) / (max - min)) as u8
}

/// Rasterize the grid's density field (interior cells only, ghost cells
/// excluded) into a greyscale-as-RGB image.
pub fn render_frame(grid: &Grid, config: &Config) -> RgbImage {
    let (nu, nv) = (grid.nu - 2 * grid.nghost, grid.nv - 2 * grid.nghost);
    let (min, max) = (config.broadcast_preimage_min, config.broadcast_preimage_max);
    ImageBuffer::from_fn(nu as u32, nv as u32, |i, j| {
        let rho = grid.cons[(0, i as usize + grid.nghost, j as usize + grid.nghost)];
        let byte = to_byte(preimage(rho, min, max), min, max);
        Rgb([byte, byte, byte])
    })
}

/// A single-slot, most-recent-wins hand-off from worker threads to the
/// broadcaster thread. A frame produced while the broadcaster is still busy
/// with the previous one replaces it rather than queuing.
pub struct FrameSlot {
    tx: Sender<RgbImage>,
    rx: Receiver<RgbImage>,
}

impl FrameSlot {
    pub fn new() -> Self {
        let (tx, rx) = bounded(1);
        Self { tx, rx }
    }

    pub fn sender(&self) -> FrameSender {
        FrameSender { tx: self.tx.clone() }
    }

    pub fn receiver(&self) -> Receiver<RgbImage> {
        self.rx.clone()
    }
}

impl Default for FrameSlot {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone)]
pub struct FrameSender {
    tx: Sender<RgbImage>,
}

impl FrameSender {
    /// Publish a frame, overwriting any unconsumed previous frame.
    pub fn publish(&self, frame: RgbImage) {
        match self.tx.try_send(frame) {
            Ok(()) => {}
            Err(TrySendError::Full(frame)) => {
                // drop the stale frame, then retry once; if the broadcaster
                // raced us and drained it first, the retry succeeds.
                let _ = self.tx.try_recv();
                let _ = self.tx.try_send(frame);
            }
            Err(TrySendError::Disconnected(_)) => {}
        }
    }
}

/// A sink that turns rendered frames into an external signal. The reference
/// has exactly one sink (a WebSocket server); the trait exists so tests and
/// alternative deployments can swap it out.
pub trait BroadcastSink {
    fn open(&mut self, port: u16, max_clients: usize, timeout_ms: u64, max_fps: u32) -> Result<()>;
    fn broadcast(&mut self, frame: &RgbImage) -> Result<()>;
    fn close(&mut self) -> Result<()>;
}

type ClientSocket = WebSocket<TcpStream>;

/// A synchronous WebSocket server broadcasting raw, tightly packed
/// `NU*NV*3`-byte RGB frames (row-major `(u, v, channel)`) to every
/// connected client, capped at `max_clients`. Mirrors `Broadcast{global_grid,
/// port, max_clients, timeout_ms, max_fps}`'s constructor contract.
pub struct WebSocketSink {
    clients: Arc<Mutex<Vec<ClientSocket>>>,
    listener_handle: Option<JoinHandle<()>>,
    max_fps: u32,
    last_sent: Option<Instant>,
}

impl WebSocketSink {
    pub fn new() -> Self {
        Self {
            clients: Arc::new(Mutex::new(Vec::new())),
            listener_handle: None,
            max_fps: 24,
            last_sent: None,
        }
    }
}

impl Default for WebSocketSink {
    fn default() -> Self {
        Self::new()
    }
}

impl BroadcastSink for WebSocketSink {
    fn open(&mut self, port: u16, max_clients: usize, timeout_ms: u64, max_fps: u32) -> Result<()> {
        self.max_fps = max_fps.max(1);

        let listener = TcpListener::bind(("0.0.0.0", port)).map_err(|e| Error::Transport(e.to_string()))?;
        let clients = Arc::clone(&self.clients);

        self.listener_handle = Some(std::thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(stream) = stream else { continue };
                if timeout_ms > 0 {
                    let _ = stream.set_read_timeout(Some(Duration::from_millis(timeout_ms)));
                }
                let Ok(socket) = tungstenite::accept(stream) else { continue };

                let mut guard = clients.lock().expect("client list mutex poisoned");
                if guard.len() >= max_clients {
                    log::debug!("broadcast: rejecting connection, at max_clients ({max_clients})");
                    continue;
                }
                guard.push(socket);
                log::info!("broadcast: client connected ({} / {})", guard.len(), max_clients);
            }
        }));

        Ok(())
    }

    fn broadcast(&mut self, frame: &RgbImage) -> Result<()> {
        if let Some(last) = self.last_sent {
            let min_interval = Duration::from_secs_f64(1.0 / self.max_fps as f64);
            if last.elapsed() < min_interval {
                return Ok(());
            }
        }

        let raw = frame.clone().into_raw();

        let mut clients = self.clients.lock().expect("client list mutex poisoned");
        clients.retain_mut(|client| client.send(Message::Binary(raw.clone())).is_ok());
        self.last_sent = Some(Instant::now());
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        let mut clients = self.clients.lock().expect("client list mutex poisoned");
        for client in clients.iter_mut() {
            let _ = client.close(None);
            let _ = client.get_mut().flush();
        }
        clients.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preimage_clips_to_configured_range() {
        assert_eq!(preimage(1e10, -1.0, 1.0), 1.0);
        assert_eq!(preimage(1e-10, -1.0, 1.0), -1.0);
    }

    #[test]
    fn to_byte_maps_endpoints_to_black_and_near_white() {
        assert_eq!(to_byte(-1.0, -1.0, 1.0), 0);
        assert_eq!(to_byte(1.0, -1.0, 1.0), 255);
    }

    #[test]
    fn frame_slot_overwrites_unconsumed_frame() {
        let slot = FrameSlot::new();
        let sender = slot.sender();
        let rx = slot.receiver();
        sender.publish(RgbImage::new(2, 2));
        sender.publish(RgbImage::new(4, 4));
        let got = rx.try_recv().unwrap();
        assert_eq!(got.dimensions(), (4, 4));
        assert!(rx.try_recv().is_err());
    }
}
