//! Resolved material: three texture slots plus presence flags

use crate::assets::MaterialDesc;
use crate::render::api::device::{GraphicsDevice, TextureHandle};
use crate::render::api::ShaderProgram;

/// Texture unit of the base colour map
pub const BASE_COLOR_UNIT: u32 = 0;
/// Texture unit of the normal map
pub const NORMAL_UNIT: u32 = 1;
/// Texture unit of the metallic-roughness map
pub const METALLIC_ROUGHNESS_UNIT: u32 = 2;

/// Material bound before each primitive draw
///
/// Every slot always holds a valid handle. A slot the asset did not provide
/// holds the fallback texture and has its presence flag cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Material {
    /// Base colour texture
    pub base_color: TextureHandle,
    /// Normal map
    pub normal: TextureHandle,
    /// Metallic-roughness texture
    pub metallic_roughness: TextureHandle,
    /// Base colour comes from the asset
    pub has_base_color: bool,
    /// Normal map comes from the asset
    pub has_normal: bool,
    /// Metallic-roughness comes from the asset
    pub has_metallic_roughness: bool,
}

impl Material {
    /// Material with every slot on the fallback texture
    pub fn fallback(fallback: TextureHandle) -> Self {
        Self {
            base_color: fallback,
            normal: fallback,
            metallic_roughness: fallback,
            has_base_color: false,
            has_normal: false,
            has_metallic_roughness: false,
        }
    }

    /// Resolve texture indices against the uploaded texture table
    ///
    /// An index outside `textures` is treated like an absent slot.
    pub fn resolve(desc: Option<&MaterialDesc>, textures: &[TextureHandle], fallback: TextureHandle) -> Self {
        let Some(desc) = desc else {
            return Self::fallback(fallback);
        };

        let slot = |index: Option<usize>, label: &str| -> (TextureHandle, bool) {
            match index {
                Some(i) => match textures.get(i) {
                    Some(handle) => (*handle, true),
                    None => {
                        log::warn!(
                            "Material {:?} {} texture {} is out of range ({} uploaded)",
                            desc.name,
                            label,
                            i,
                            textures.len()
                        );
                        (fallback, false)
                    }
                },
                None => (fallback, false),
            }
        };

        let (base_color, has_base_color) = slot(desc.base_color_texture, "base colour");
        let (normal, has_normal) = slot(desc.normal_texture, "normal");
        let (metallic_roughness, has_metallic_roughness) = slot(desc.metallic_roughness_texture, "metallic-roughness");

        Self {
            base_color,
            normal,
            metallic_roughness,
            has_base_color,
            has_normal,
            has_metallic_roughness,
        }
    }

    /// Set presence flags and bind the three slots to units 0, 1 and 2
    pub fn bind(&self, device: &mut dyn GraphicsDevice, shader: &ShaderProgram) {
        shader.set_bool(device, "hasNormal", self.has_normal);
        shader.set_bool(device, "hasBaseColor", self.has_base_color);
        shader.set_bool(device, "hasMetallicRoughness", self.has_metallic_roughness);

        shader.set_int(device, "BaseColorTex", BASE_COLOR_UNIT as i32);
        device.bind_texture(BASE_COLOR_UNIT, self.base_color);
        shader.set_int(device, "NormalTex", NORMAL_UNIT as i32);
        device.bind_texture(NORMAL_UNIT, self.normal);
        shader.set_int(device, "MetallicRoughnessTex", METALLIC_ROUGHNESS_UNIT as i32);
        device.bind_texture(METALLIC_ROUGHNESS_UNIT, self.metallic_roughness);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FALLBACK: TextureHandle = TextureHandle(99);

    #[test]
    fn test_missing_slots_use_fallback() {
        let desc = MaterialDesc {
            base_color_texture: Some(1),
            ..MaterialDesc::default()
        };
        let textures = [TextureHandle(10), TextureHandle(11)];

        let material = Material::resolve(Some(&desc), &textures, FALLBACK);

        assert!(material.has_base_color);
        assert_eq!(material.base_color, TextureHandle(11));
        assert!(!material.has_normal);
        assert_eq!(material.normal, FALLBACK);
        assert!(!material.has_metallic_roughness);
        assert_eq!(material.metallic_roughness, FALLBACK);
    }

    #[test]
    fn test_out_of_range_index_is_absent() {
        let desc = MaterialDesc {
            normal_texture: Some(5),
            ..MaterialDesc::default()
        };
        let material = Material::resolve(Some(&desc), &[TextureHandle(1)], FALLBACK);

        assert!(!material.has_normal);
        assert_eq!(material.normal, FALLBACK);
    }

    #[test]
    fn test_no_material_is_all_fallback() {
        assert_eq!(Material::resolve(None, &[], FALLBACK), Material::fallback(FALLBACK));
    }
}
