// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Compute device selection
//!
//! The device is picked once at startup from an ordered preference list.
//! An explicitly requested device is used as-is or startup fails; `auto`
//! walks CUDA, then the Apple accelerator, then CPU.

use clap::ValueEnum;
use ort::execution_providers::{
    CUDAExecutionProvider, CoreMLExecutionProvider, ExecutionProvider,
};
use serde::Serialize;
use std::fmt;
use tracing::{debug, info, warn};

use super::errors::LoadError;

/// Device requested on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum DevicePreference {
    /// Best available: CUDA, then Apple silicon, then CPU
    #[default]
    Auto,
    Cpu,
    Cuda,
    /// Apple silicon (served through the CoreML execution provider)
    Mps,
}

/// Device the model is actually bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Device {
    Cpu,
    Cuda,
    Mps,
}

impl Device {
    pub fn as_str(&self) -> &'static str {
        match self {
            Device::Cpu => "cpu",
            Device::Cuda => "cuda",
            Device::Mps => "mps",
        }
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl DevicePreference {
    /// Devices to try, in order
    pub fn candidates(self) -> Vec<Device> {
        match self {
            DevicePreference::Auto => vec![Device::Cuda, Device::Mps, Device::Cpu],
            DevicePreference::Cpu => vec![Device::Cpu],
            DevicePreference::Cuda => vec![Device::Cuda],
            DevicePreference::Mps => vec![Device::Mps],
        }
    }
}

/// Answers whether a device can host an inference session
pub trait DeviceProbe {
    fn is_available(&self, device: Device) -> bool;
}

/// Probe backed by ONNX Runtime's execution provider registry
#[derive(Debug, Default, Clone, Copy)]
pub struct OrtDeviceProbe;

impl DeviceProbe for OrtDeviceProbe {
    fn is_available(&self, device: Device) -> bool {
        match device {
            Device::Cpu => true,
            Device::Cuda => CUDAExecutionProvider::default()
                .is_available()
                .unwrap_or(false),
            Device::Mps => {
                cfg!(target_os = "macos")
                    && CoreMLExecutionProvider::default()
                        .is_available()
                        .unwrap_or(false)
            }
        }
    }
}

/// Bind to the first candidate device on which `build` succeeds
///
/// The probe only says whether a provider is compiled in, not whether the
/// hardware is there, so a device counts as usable once `build` succeeds
/// on it. Under `Auto` a device failure (provider registration or session
/// construction) moves on to the next candidate. An explicitly requested
/// device gets one attempt. Errors unrelated to the device, such as a
/// dimension mismatch, end the search.
pub fn bind_device<T, F>(
    preference: DevicePreference,
    probe: &dyn DeviceProbe,
    mut build: F,
) -> Result<(Device, T), LoadError>
where
    F: FnMut(Device) -> Result<T, LoadError>,
{
    let candidates = preference.candidates();
    let mut last_error = None;

    for device in candidates.iter().copied() {
        if !probe.is_available(device) {
            debug!("Device {} not available", device);
            continue;
        }

        match build(device) {
            Ok(bound) => {
                if preference == DevicePreference::Auto && device != Device::Cpu {
                    info!("{} available, using it for inference", device);
                }
                return Ok((device, bound));
            }
            Err(e) if preference == DevicePreference::Auto && e.is_device_failure() => {
                warn!("Failed to initialize {}: {}. Trying next device", device, e);
                last_error = Some(e);
            }
            Err(e) => return Err(e),
        }
    }

    Err(last_error.unwrap_or_else(|| {
        LoadError::DeviceUnavailable(candidates.last().copied().unwrap_or(Device::Cpu))
    }))
}
