// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
use wgpu::{AddressMode, SamplerBorderColor, SamplerDescriptor};

use crate::bindings::sampler::{FilterMode, SamplerConfig, WrapMode};

fn address_mode(wrap: WrapMode, clamp_to_border: bool) -> AddressMode {
    match wrap {
        WrapMode::Repeat => AddressMode::Repeat,
        WrapMode::Clamp | WrapMode::ClampToEdge => AddressMode::ClampToEdge,
        WrapMode::MirroredRepeat => AddressMode::MirrorRepeat,
        WrapMode::ClampToBorder if clamp_to_border => AddressMode::ClampToBorder,
        WrapMode::ClampToBorder => {
            logwise::warn_sync!("Device lacks ADDRESS_MODE_CLAMP_TO_BORDER; clamping to edge instead");
            AddressMode::ClampToEdge
        }
    }
}

/// Builds a sampler for `config`.
///
/// `clamp_to_border` reports whether the device enabled `Features::ADDRESS_MODE_CLAMP_TO_BORDER`.
pub(super) fn create_sampler(device: &wgpu::Device, config: SamplerConfig, clamp_to_border: bool, label: &str) -> wgpu::Sampler {
    let filter = match config.filter {
        FilterMode::Nearest => wgpu::FilterMode::Nearest,
        FilterMode::Linear => wgpu::FilterMode::Linear,
    };
    let address_mode_u = address_mode(config.wrap_s, clamp_to_border);
    let address_mode_v = address_mode(config.wrap_t, clamp_to_border);
    let border_color = (address_mode_u == AddressMode::ClampToBorder || address_mode_v == AddressMode::ClampToBorder)
        .then_some(SamplerBorderColor::TransparentBlack);

    let s = SamplerDescriptor {
        label: Some(label),
        address_mode_u,
        address_mode_v,
        address_mode_w: AddressMode::ClampToEdge,
        mag_filter: filter,
        min_filter: filter,
        //no mipmaps
        mipmap_filter: wgpu::FilterMode::Nearest,
        lod_min_clamp: 0.0,
        lod_max_clamp: 0.0,
        compare: None,
        anisotropy_clamp: 1,
        border_color,
    };
    device.create_sampler(&s)
}
