// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::path::PathBuf;

use clap::Parser;
use log::{error, info};

use gsrx::core::config::GsConfig;
use gsrx::core::error::Result;
use gsrx::core::gs::{DisplaySink, Frame, GifPathId, VideoMode, GS};
use gsrx::core::loader::PacketDump;
use gsrx::core::save_state::SaveState;

/// PlayStation 2 Graphics Synthesizer packet player
#[derive(Parser)]
#[command(name = "gsrx")]
#[command(about = "Replays GIF packet dumps through a software GS", long_about = None)]
struct Args {
    /// GIF packet dump (raw little-endian quad-words)
    packet_file: Option<PathBuf>,

    /// Configuration file (TOML)
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// GIF lane the dump is fed into
    #[arg(short = 'p', long, default_value_t = 3, value_parser = clap::value_parser!(u8).range(1..=3))]
    path: u8,

    /// Number of vsyncs to run after the dump
    #[arg(short = 'n', long, default_value = "1")]
    vsyncs: u32,

    /// Write the final displayed frame as a PAM image
    #[arg(short = 'o', long)]
    frame_out: Option<PathBuf>,

    /// Restore a save state before replaying
    #[arg(long)]
    load_state: Option<PathBuf>,

    /// Write a save state after replaying
    #[arg(long)]
    save_state: Option<PathBuf>,

    /// Write the drawing registers as JSON after replaying
    #[arg(long)]
    dump_registers: Option<PathBuf>,
}

/// Display that only counts presented frames
struct FrameCounter {
    presented: u64,
}

impl DisplaySink for FrameCounter {
    fn present(&mut self, frame: &Frame) {
        self.presented += 1;
        log::debug!(
            "Presented frame {} ({}x{})",
            self.presented,
            frame.width,
            frame.height
        );
    }
}

fn lane(path: u8) -> GifPathId {
    match path {
        1 => GifPathId::Path1,
        2 => GifPathId::Path2,
        _ => GifPathId::Path3,
    }
}

fn main() -> Result<()> {
    // A missing .env file is not an error
    let _ = dotenvy::dotenv();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("gsrx v{}", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();

    let config = GsConfig::from_env(args.config.as_deref()).inspect_err(|e| {
        error!("Failed to load configuration: {}", e);
    })?;
    let mut gs = GS::try_new(config)?;
    gs.set_interrupt_handler(Box::new(|interrupt| {
        info!("GS interrupt: {:?}", interrupt);
    }));
    gs.open(Box::new(FrameCounter { presented: 0 }), VideoMode::Ntsc);

    if let Some(state_path) = &args.load_state {
        info!("Loading save state from: {}", state_path.display());
        SaveState::load_from_file(state_path)?.apply_to(&mut gs)?;
    }

    if let Some(packet_path) = &args.packet_file {
        let dump = PacketDump::load(packet_path).inspect_err(|e| {
            error!("Failed to load packet dump: {}", e);
        })?;
        let lane = lane(args.path);
        info!("Replaying {} quad-words on {:?}", dump.qwords().len(), lane);
        gs.transfer(lane, dump.qwords());
    }

    for _ in 0..args.vsyncs {
        gs.vsync();
    }

    if let Some(frame_path) = &args.frame_out {
        let frame = gs.framebuffer();
        frame.save_pam(frame_path)?;
        info!(
            "Frame {}x{} written to {}",
            frame.width,
            frame.height,
            frame_path.display()
        );
    }

    if let Some(state_path) = &args.save_state {
        SaveState::from_gs(&gs).save_to_file(state_path)?;
    }

    if let Some(dump_path) = &args.dump_registers {
        let json = serde_json::to_string_pretty(gs.env())?;
        std::fs::write(dump_path, json)?;
        info!("Drawing registers written to {}", dump_path.display());
    }

    gs.close();
    info!("Done after {} frames", gs.frame_count());
    Ok(())
}
