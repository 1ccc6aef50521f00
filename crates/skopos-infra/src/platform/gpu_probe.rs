// Copyright 2025 eraflo
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

//! wgpu-based GPU classification.

use skopos_core::capability::{GpuClass, Probed};
use wgpu::{DeviceType, RequestAdapterOptions};

/// Converts a WGPU device type to the generic GPU class.
fn device_type_to_class(device_type: DeviceType) -> Probed<GpuClass> {
    match device_type {
        DeviceType::DiscreteGpu => Probed::Known(GpuClass::Discrete),
        DeviceType::IntegratedGpu | DeviceType::VirtualGpu => Probed::Known(GpuClass::Integrated),
        DeviceType::Cpu => Probed::Known(GpuClass::Software),
        _ => Probed::Unknown,
    }
}

/// Asks WGPU for the default adapter and classifies it.
///
/// Headless hosts and machines without a usable backend yield
/// [`Probed::Unknown`] rather than an error; the caller treats that as one
/// more low-end signal, which is the conservative reading.
pub fn classify_gpu() -> Probed<GpuClass> {
    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
    let adapter = match pollster::block_on(instance.request_adapter(&RequestAdapterOptions {
        power_preference: wgpu::PowerPreference::HighPerformance,
        compatible_surface: None,
        force_fallback_adapter: false,
    })) {
        Ok(adapter) => adapter,
        Err(error) => {
            log::warn!("no usable graphics adapter: {error}");
            return Probed::Unknown;
        }
    };

    let info = adapter.get_info();
    let class = device_type_to_class(info.device_type);
    log::info!(
        "graphics adapter: \"{}\" ({:?} via {:?}) classified as {class}",
        info.name,
        info.device_type,
        info.backend,
    );
    class
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_types_map_onto_classes() {
        assert_eq!(
            device_type_to_class(DeviceType::DiscreteGpu),
            Probed::Known(GpuClass::Discrete)
        );
        assert_eq!(
            device_type_to_class(DeviceType::IntegratedGpu),
            Probed::Known(GpuClass::Integrated)
        );
        assert_eq!(
            device_type_to_class(DeviceType::VirtualGpu),
            Probed::Known(GpuClass::Integrated)
        );
        assert_eq!(
            device_type_to_class(DeviceType::Cpu),
            Probed::Known(GpuClass::Software)
        );
        assert_eq!(device_type_to_class(DeviceType::Other), Probed::Unknown);
    }
}
