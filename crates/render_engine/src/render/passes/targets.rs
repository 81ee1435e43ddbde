//! Off-screen render targets
//!
//! Every target is created once at a fixed size and rewritten every frame.
//! Each one remembers its attachment set so that clears only ever touch
//! attachments that exist.

use crate::render::api::device::{
    ClearFlags, DepthAttachment, FilterMode, FramebufferDescriptor, FramebufferHandle, GraphicsDevice,
    SamplerState, TextureDescriptor, TextureFormat, TextureHandle, TextureKind, WrapMode,
};
use crate::render::RenderResult;

/// Attachments a clear may touch on this framebuffer
pub fn clear_flags_for(descriptor: &FramebufferDescriptor) -> ClearFlags {
    let mut flags = ClearFlags::empty();
    if !descriptor.color_attachments.is_empty() {
        flags |= ClearFlags::COLOR;
    }
    if descriptor.depth != DepthAttachment::None {
        flags |= ClearFlags::DEPTH;
    }
    flags
}

fn depth_texture(
    device: &mut dyn GraphicsDevice,
    kind: TextureKind,
    resolution: u32,
    wrap: WrapMode,
) -> RenderResult<TextureHandle> {
    device.create_texture(
        &TextureDescriptor {
            kind,
            width: resolution,
            height: resolution,
            format: TextureFormat::Depth24,
            sampler: SamplerState {
                min_filter: FilterMode::Nearest,
                mag_filter: FilterMode::Nearest,
                wrap_s: wrap,
                wrap_t: wrap,
            },
        },
        None,
    )
}

/// 2D depth map rendered from the directional light
#[derive(Debug, Clone, PartialEq)]
pub struct ShadowMap {
    framebuffer: FramebufferHandle,
    descriptor: FramebufferDescriptor,
    depth: TextureHandle,
    resolution: u32,
}

impl ShadowMap {
    /// Depth-only target of `resolution` x `resolution`
    pub fn new(device: &mut dyn GraphicsDevice, resolution: u32) -> RenderResult<Self> {
        let depth = depth_texture(device, TextureKind::Texture2D, resolution, WrapMode::ClampToBorder)?;
        let descriptor = FramebufferDescriptor {
            color_attachments: Vec::new(),
            depth: DepthAttachment::Texture(depth),
            width: resolution,
            height: resolution,
        };
        let framebuffer = device.create_framebuffer(&descriptor)?;
        log::debug!("Shadow map {}x{} created", resolution, resolution);
        Ok(Self { framebuffer, descriptor, depth, resolution })
    }

    /// Framebuffer handle
    pub fn framebuffer(&self) -> FramebufferHandle {
        self.framebuffer
    }

    /// Depth texture sampled by the lighting pass
    pub fn depth_texture(&self) -> TextureHandle {
        self.depth
    }

    /// Edge length in texels
    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    /// Attachments to clear
    pub fn clear_flags(&self) -> ClearFlags {
        clear_flags_for(&self.descriptor)
    }
}

/// Depth cubemap rendered from the point light
#[derive(Debug, Clone, PartialEq)]
pub struct CubeShadowMap {
    framebuffer: FramebufferHandle,
    descriptor: FramebufferDescriptor,
    depth: TextureHandle,
    resolution: u32,
}

impl CubeShadowMap {
    /// Depth-only cubemap target; every face is `resolution` square
    pub fn new(device: &mut dyn GraphicsDevice, resolution: u32) -> RenderResult<Self> {
        let depth = depth_texture(device, TextureKind::CubeMap, resolution, WrapMode::ClampToEdge)?;
        let descriptor = FramebufferDescriptor {
            color_attachments: Vec::new(),
            depth: DepthAttachment::Texture(depth),
            width: resolution,
            height: resolution,
        };
        let framebuffer = device.create_framebuffer(&descriptor)?;
        log::debug!("Cube shadow map {}x{} per face created", resolution, resolution);
        Ok(Self { framebuffer, descriptor, depth, resolution })
    }

    /// Framebuffer handle
    pub fn framebuffer(&self) -> FramebufferHandle {
        self.framebuffer
    }

    /// Depth cubemap sampled by the lighting pass
    pub fn depth_texture(&self) -> TextureHandle {
        self.depth
    }

    /// Face edge length in texels
    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    /// Attachments to clear
    pub fn clear_flags(&self) -> ClearFlags {
        clear_flags_for(&self.descriptor)
    }
}

/// Geometry buffer for deferred shading
///
/// Colour attachments in draw-buffer order: position, normal + roughness,
/// albedo + metallic. Depth lives in a renderbuffer owned by the framebuffer.
#[derive(Debug, Clone, PartialEq)]
pub struct GBuffer {
    framebuffer: FramebufferHandle,
    descriptor: FramebufferDescriptor,
    position: TextureHandle,
    normal_roughness: TextureHandle,
    albedo_metallic: TextureHandle,
}

impl GBuffer {
    /// Texture unit of the position attachment in the composite pass
    pub const POSITION_UNIT: u32 = 0;
    /// Texture unit of the normal + roughness attachment
    pub const NORMAL_UNIT: u32 = 1;
    /// Texture unit of the albedo + metallic attachment
    pub const ALBEDO_UNIT: u32 = 2;

    /// Allocate all attachments at `width` x `height`
    pub fn new(device: &mut dyn GraphicsDevice, width: u32, height: u32) -> RenderResult<Self> {
        let mut attachment = |format: TextureFormat| {
            device.create_texture(
                &TextureDescriptor {
                    kind: TextureKind::Texture2D,
                    width,
                    height,
                    format,
                    sampler: SamplerState {
                        min_filter: FilterMode::Nearest,
                        mag_filter: FilterMode::Nearest,
                        wrap_s: WrapMode::ClampToEdge,
                        wrap_t: WrapMode::ClampToEdge,
                    },
                },
                None,
            )
        };
        let position = attachment(TextureFormat::Rgba16F)?;
        let normal_roughness = attachment(TextureFormat::Rgba16F)?;
        let albedo_metallic = attachment(TextureFormat::Rgba8)?;

        let descriptor = FramebufferDescriptor {
            color_attachments: vec![position, normal_roughness, albedo_metallic],
            depth: DepthAttachment::Renderbuffer,
            width,
            height,
        };
        let framebuffer = device.create_framebuffer(&descriptor)?;
        log::debug!("G-buffer {}x{} created", width, height);

        Ok(Self { framebuffer, descriptor, position, normal_roughness, albedo_metallic })
    }

    /// Framebuffer handle
    pub fn framebuffer(&self) -> FramebufferHandle {
        self.framebuffer
    }

    /// Attachment set, in draw-buffer order
    pub fn descriptor(&self) -> &FramebufferDescriptor {
        &self.descriptor
    }

    /// Size in pixels
    pub fn size(&self) -> (u32, u32) {
        (self.descriptor.width, self.descriptor.height)
    }

    /// Attachments with their composite texture units
    pub fn sampled_attachments(&self) -> [(u32, &'static str, TextureHandle); 3] {
        [
            (Self::POSITION_UNIT, "gPosition", self.position),
            (Self::NORMAL_UNIT, "gNormal", self.normal_roughness),
            (Self::ALBEDO_UNIT, "gAlbedoSpec", self.albedo_metallic),
        ]
    }

    /// Attachments to clear
    pub fn clear_flags(&self) -> ClearFlags {
        clear_flags_for(&self.descriptor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::backends::HeadlessDevice;

    #[test]
    fn test_shadow_targets_are_depth_only() {
        let mut device = HeadlessDevice::new();
        let shadow = ShadowMap::new(&mut device, 1024).expect("shadow map");
        let cube = CubeShadowMap::new(&mut device, 512).expect("cube map");

        assert_eq!(shadow.clear_flags(), ClearFlags::DEPTH);
        assert_eq!(cube.clear_flags(), ClearFlags::DEPTH);
        assert!(device.framebuffer(cube.framebuffer()).expect("fb").is_depth_only());
        assert_eq!(
            device.texture(cube.depth_texture()).expect("texture").descriptor.kind,
            TextureKind::CubeMap
        );
    }

    #[test]
    fn test_gbuffer_has_three_colour_attachments() {
        let mut device = HeadlessDevice::new();
        let gbuffer = GBuffer::new(&mut device, 1280, 720).expect("gbuffer");

        assert_eq!(gbuffer.descriptor().color_attachments.len(), 3);
        assert_eq!(gbuffer.descriptor().depth, DepthAttachment::Renderbuffer);
        assert_eq!(gbuffer.clear_flags(), ClearFlags::COLOR | ClearFlags::DEPTH);

        let units: Vec<u32> = gbuffer.sampled_attachments().iter().map(|(unit, _, _)| *unit).collect();
        assert_eq!(units, vec![0, 1, 2]);
        let formats: Vec<_> = gbuffer
            .descriptor()
            .color_attachments
            .iter()
            .map(|t| device.texture(*t).expect("texture").descriptor.format)
            .collect();
        assert_eq!(formats, vec![TextureFormat::Rgba16F, TextureFormat::Rgba16F, TextureFormat::Rgba8]);
    }

    #[test]
    fn test_zero_sized_target_fails() {
        let mut device = HeadlessDevice::new();
        assert!(ShadowMap::new(&mut device, 0).is_err());
    }
}
